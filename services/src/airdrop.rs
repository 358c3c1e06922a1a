//! Faucet-funded batch transfers.
//!
//! A drop is two ledger transactions: the faucet credits the funder with
//! the batch total plus a fee reserve, then the funder pays every target in
//! one transfer. Each is confirmed before the next step runs.

use std::sync::Arc;
use std::time::Instant;

use devdrop_crypto::Keypair;
use devdrop_ledger_client::{ClientError, LedgerClient};
use devdrop_types::{Account, Cluster, ClusterConfig, Commitment, DropBatch, TxSignature};
use devdrop_utils::format_duration;
use tracing::{debug, info, Instrument};

use crate::spans::drop_span;
use crate::{DevdropConfig, DevdropError};

/// Lamports requested on top of a batch total to pay the transfer fee.
pub const DEFAULT_FEE_RESERVE: u64 = 5_000;

#[derive(Clone)]
pub struct AirdropService {
    client: Arc<dyn LedgerClient>,
    cluster: ClusterConfig,
    commitment: Commitment,
    fee_reserve: u64,
}

impl AirdropService {
    pub fn new(client: Arc<dyn LedgerClient>, cluster: ClusterConfig) -> Self {
        Self {
            client,
            cluster,
            commitment: Commitment::default(),
            fee_reserve: DEFAULT_FEE_RESERVE,
        }
    }

    pub fn from_config(client: Arc<dyn LedgerClient>, config: &DevdropConfig) -> Self {
        Self {
            client,
            cluster: config.cluster_config(),
            commitment: config.commitment,
            fee_reserve: config.fee_reserve_lamports,
        }
    }

    pub fn with_commitment(mut self, commitment: Commitment) -> Self {
        self.commitment = commitment;
        self
    }

    pub fn with_fee_reserve(mut self, lamports: u64) -> Self {
        self.fee_reserve = lamports;
        self
    }

    pub fn network(&self) -> Cluster {
        self.cluster.network
    }

    /// Fund every target of `batch` from a faucet-topped `funder`.
    ///
    /// Returns the signature of the confirmed transfer. Without a funder
    /// nothing is submitted and `Ok(None)` is returned. The funder must not
    /// itself be a target.
    pub async fn drop(
        &self,
        funder: Option<&Keypair>,
        batch: &DropBatch,
    ) -> Result<Option<TxSignature>, DevdropError> {
        let Some(funder) = funder else {
            debug!("no funder configured, skipping drop");
            return Ok(None);
        };
        let payer = funder.account();
        if batch.wallets().contains(&payer) {
            return Err(DevdropError::Validation(format!(
                "funder {payer} cannot also be a drop target"
            )));
        }
        self.ensure_faucet()?;

        let total = batch.total()?;
        let request = total.checked_add(self.fee_reserve).ok_or_else(|| {
            DevdropError::Validation(format!(
                "batch total {total} plus fee reserve {} overflows",
                self.fee_reserve
            ))
        })?;

        async {
            let funding = self
                .client
                .request_faucet_funds(&payer, request)
                .await
                .map_err(|e| self.faucet_error(e))?;
            self.confirm(&funding).await?;
            debug!(%payer, lamports = request, "funder credited");

            let recipients: Vec<(Account, u64)> = batch
                .targets()
                .iter()
                .map(|t| (t.wallet.clone(), t.drop))
                .collect();
            let signature = self
                .client
                .transfer(funder, &recipients)
                .await
                .map_err(|e| DevdropError::AirdropFailed(e.to_string()))?;
            self.confirm(&signature).await?;

            info!(%signature, lamports = total, "drop confirmed");
            Ok::<_, DevdropError>(Some(signature))
        }
        .instrument(drop_span(self.network(), batch.len()))
        .await
    }

    /// Ask the faucet for `lamports` directly into `account`.
    pub async fn request_dev_funds(
        &self,
        account: Option<&Account>,
        lamports: u64,
    ) -> Result<Option<TxSignature>, DevdropError> {
        let Some(account) = account else {
            debug!("no account configured, skipping faucet request");
            return Ok(None);
        };
        self.ensure_faucet()?;

        let signature = self
            .client
            .request_faucet_funds(account, lamports)
            .await
            .map_err(|e| self.faucet_error(e))?;
        self.confirm(&signature).await?;
        info!(%account, lamports, %signature, "faucet funds confirmed");
        Ok(Some(signature))
    }

    fn ensure_faucet(&self) -> Result<(), DevdropError> {
        if self.network().supports_faucet() {
            Ok(())
        } else {
            Err(DevdropError::UnsupportedNetwork {
                network: self.network(),
                detail: "faucet is only available on devnet".into(),
            })
        }
    }

    fn faucet_error(&self, e: ClientError) -> DevdropError {
        match e {
            ClientError::FaucetUnavailable(detail) => DevdropError::UnsupportedNetwork {
                network: self.network(),
                detail,
            },
            other => DevdropError::AirdropFailed(other.to_string()),
        }
    }

    async fn confirm(&self, signature: &TxSignature) -> Result<(), DevdropError> {
        let started = Instant::now();
        self.client
            .confirm_transaction(signature, self.commitment)
            .await
            .map_err(|e| DevdropError::AirdropFailed(e.to_string()))?;
        debug!(
            %signature,
            commitment = %self.commitment,
            elapsed = %format_duration(started.elapsed()),
            "confirmed"
        );
        Ok(())
    }
}
