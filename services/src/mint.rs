//! Fungible token mints: creation and supply issuance.
//!
//! Amounts passed in are whole tokens. They are scaled by `10^decimals`
//! before reaching the ledger, and overflow is refused before any
//! submission.

use std::sync::Arc;

use devdrop_crypto::Keypair;
use devdrop_ledger_client::{ClientError, LedgerClient};
use devdrop_types::{to_base_units, Account, Commitment, HoldingAccount, Mint};
use tracing::{info, Instrument};

use crate::spans::mint_span;
use crate::{DevdropConfig, DevdropError};

fn mint_error(e: ClientError) -> DevdropError {
    DevdropError::Mint(e.to_string())
}

#[derive(Clone)]
pub struct TokenMintService {
    client: Arc<dyn LedgerClient>,
    commitment: Commitment,
}

impl TokenMintService {
    pub fn new(client: Arc<dyn LedgerClient>) -> Self {
        Self {
            client,
            commitment: Commitment::default(),
        }
    }

    pub fn from_config(client: Arc<dyn LedgerClient>, config: &DevdropConfig) -> Self {
        Self {
            client,
            commitment: config.commitment,
        }
    }

    pub fn with_commitment(mut self, commitment: Commitment) -> Self {
        self.commitment = commitment;
        self
    }

    /// Create a mint whose mint and freeze authority are both `authority`,
    /// and make sure the authority holds an account for it.
    pub async fn create_mint(&self, authority: &Keypair, decimals: u8) -> Result<Mint, DevdropError> {
        let owner = authority.account();
        async {
            let address = self
                .client
                .create_mint(authority, &owner, &owner, decimals)
                .await
                .map_err(mint_error)?;
            let holding = self
                .client
                .get_or_create_holding_account(authority, &address, &owner)
                .await
                .map_err(mint_error)?;
            info!(mint = %address, holding = %holding.address, decimals, "mint created");
            self.refresh(&address).await
        }
        .instrument(mint_span("create", owner.as_str()))
        .await
    }

    /// Issue `amount` whole tokens into the authority's holding account.
    pub async fn mint_initial_supply(
        &self,
        authority: &Keypair,
        mint: &Mint,
        amount: u64,
    ) -> Result<Mint, DevdropError> {
        self.issue(authority, mint, amount)
            .instrument(mint_span("initial-supply", mint.address.as_str()))
            .await
    }

    /// [`create_mint`](Self::create_mint) followed by
    /// [`mint_initial_supply`](Self::mint_initial_supply).
    pub async fn create_mint_with_supply(
        &self,
        authority: &Keypair,
        decimals: u8,
        amount: u64,
    ) -> Result<Mint, DevdropError> {
        let mint = self.create_mint(authority, decimals).await?;
        self.mint_initial_supply(authority, &mint, amount).await
    }

    /// Issue `amount` more whole tokens of an existing mint.
    pub async fn mint_more(
        &self,
        mint: &Mint,
        authority: &Keypair,
        amount: u64,
    ) -> Result<Mint, DevdropError> {
        self.issue(authority, mint, amount)
            .instrument(mint_span("mint-more", mint.address.as_str()))
            .await
    }

    /// Look up or create `owner`'s holding account for `mint`, paid by `payer`.
    pub async fn holding_account(
        &self,
        payer: &Keypair,
        mint: &Account,
        owner: &Account,
    ) -> Result<HoldingAccount, DevdropError> {
        self.client
            .get_or_create_holding_account(payer, mint, owner)
            .await
            .map_err(mint_error)
    }

    /// Current on-ledger record of a mint.
    pub async fn refresh(&self, mint: &Account) -> Result<Mint, DevdropError> {
        self.client.get_mint(mint).await.map_err(mint_error)
    }

    async fn issue(&self, authority: &Keypair, mint: &Mint, amount: u64) -> Result<Mint, DevdropError> {
        let signer = authority.account();
        if signer != mint.mint_authority {
            return Err(DevdropError::Validation(format!(
                "{signer} is not the mint authority of {}",
                mint.address
            )));
        }
        let base_units = to_base_units(amount, mint.decimals)?;

        let holding = self
            .client
            .get_or_create_holding_account(authority, &mint.address, &signer)
            .await
            .map_err(mint_error)?;
        let signature = self
            .client
            .mint_to(authority, &mint.address, &holding.address, authority, base_units)
            .await
            .map_err(mint_error)?;
        self.client
            .confirm_transaction(&signature, self.commitment)
            .await
            .map_err(mint_error)?;

        let refreshed = self.refresh(&mint.address).await?;
        if refreshed.decimals != mint.decimals || refreshed.supply < base_units {
            return Err(DevdropError::Mint(format!(
                "mint {} reads back inconsistent: decimals {}, supply {}",
                mint.address, refreshed.decimals, refreshed.supply
            )));
        }
        info!(%signature, base_units, supply = refreshed.supply, "supply issued");
        Ok(refreshed)
    }
}
