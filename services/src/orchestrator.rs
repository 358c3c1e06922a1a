//! Snapshot, drop, snapshot.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use devdrop_crypto::Keypair;
use devdrop_ledger_client::LedgerClient;
use devdrop_types::{Account, DropBatch, SnapshotReport, TxSignature};
use devdrop_utils::format_duration;
use tracing::{info, warn};

use crate::{AirdropService, BalanceTracker, DevdropConfig, DevdropError};

/// Everything one orchestrated drop observed.
///
/// `before` and `after` are both present whatever the outcome; a failed
/// drop still reports what the ledger looked like afterwards.
#[derive(Clone, Debug)]
pub struct DropReport {
    pub before: SnapshotReport,
    pub outcome: Result<Option<TxSignature>, DevdropError>,
    pub after: SnapshotReport,
}

impl DropReport {
    pub fn signature(&self) -> Option<&TxSignature> {
        self.outcome.as_ref().ok().and_then(Option::as_ref)
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Signed balance change of every wallet read successfully both times.
    pub fn deltas(&self) -> BTreeMap<Account, i128> {
        self.before.balances.delta(&self.after.balances)
    }
}

pub struct DropOrchestrator {
    tracker: BalanceTracker,
    airdrop: AirdropService,
    confirm_timeout: Option<Duration>,
}

impl DropOrchestrator {
    pub fn new(tracker: BalanceTracker, airdrop: AirdropService) -> Self {
        Self {
            tracker,
            airdrop,
            confirm_timeout: None,
        }
    }

    pub fn from_config(client: Arc<dyn LedgerClient>, config: &DevdropConfig) -> Self {
        Self {
            tracker: BalanceTracker::from_config(Arc::clone(&client), config),
            airdrop: AirdropService::from_config(client, config),
            confirm_timeout: config.confirm_timeout(),
        }
    }

    /// Bound the drop step. Expiry is reported as `AirdropFailed`.
    pub fn with_confirm_timeout(mut self, timeout: Duration) -> Self {
        self.confirm_timeout = Some(timeout);
        self
    }

    pub fn tracker(&self) -> &BalanceTracker {
        &self.tracker
    }

    pub fn airdrop(&self) -> &AirdropService {
        &self.airdrop
    }

    /// Snapshot the batch's wallets, run the drop, snapshot them again.
    ///
    /// The second snapshot starts only after the drop has returned.
    pub async fn run(&self, funder: Option<&Keypair>, batch: &DropBatch) -> DropReport {
        let wallets = batch.wallets();
        let before = self.tracker.snapshot(&wallets).await;

        let outcome = match self.confirm_timeout {
            Some(limit) => tokio::time::timeout(limit, self.airdrop.drop(funder, batch))
                .await
                .unwrap_or_else(|_| {
                    Err(DevdropError::AirdropFailed(format!(
                        "not confirmed within {}",
                        format_duration(limit)
                    )))
                }),
            None => self.airdrop.drop(funder, batch).await,
        };

        match &outcome {
            Ok(Some(signature)) => info!(%signature, targets = batch.len(), "drop complete"),
            Ok(None) => info!("drop skipped"),
            Err(e) => warn!(error = %e, "drop failed"),
        }

        let after = self.tracker.snapshot(&wallets).await;
        DropReport {
            before,
            outcome,
            after,
        }
    }
}
