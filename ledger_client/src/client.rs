//! The contract between the services and the remote ledger.

use async_trait::async_trait;
use devdrop_crypto::Keypair;
use devdrop_types::{Account, Commitment, HoldingAccount, Mint, TxSignature};

use crate::ClientResult;

/// Round-trips the services make against the ledger.
///
/// Every method is one request to the endpoint. Implementations must not
/// retry internally; callers own retry policy.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Native balance of `account` in lamports.
    async fn get_balance(&self, account: &Account) -> ClientResult<u64>;

    /// Base-unit balance of `owner`'s holding account for `mint`.
    ///
    /// Returns 0 when the owner has no holding account for the mint.
    async fn get_token_balance(&self, owner: &Account, mint: &Account) -> ClientResult<u64>;

    /// Ask the cluster faucet to credit `account`. Test clusters only.
    async fn request_faucet_funds(&self, account: &Account, lamports: u64)
        -> ClientResult<TxSignature>;

    /// Submit one transaction moving lamports from `payer` to each recipient.
    async fn transfer(
        &self,
        payer: &Keypair,
        recipients: &[(Account, u64)],
    ) -> ClientResult<TxSignature>;

    /// Wait until `signature` reaches `commitment` or the ledger reports failure.
    async fn confirm_transaction(
        &self,
        signature: &TxSignature,
        commitment: Commitment,
    ) -> ClientResult<()>;

    /// Create a new mint and return its address.
    async fn create_mint(
        &self,
        payer: &Keypair,
        mint_authority: &Account,
        freeze_authority: &Account,
        decimals: u8,
    ) -> ClientResult<Account>;

    /// Fetch the `owner`'s holding account for `mint`, creating it if absent.
    ///
    /// Only returns once the account is usable.
    async fn get_or_create_holding_account(
        &self,
        payer: &Keypair,
        mint: &Account,
        owner: &Account,
    ) -> ClientResult<HoldingAccount>;

    /// Mint `amount` base units into the `destination` holding account.
    async fn mint_to(
        &self,
        payer: &Keypair,
        mint: &Account,
        destination: &Account,
        mint_authority: &Keypair,
        amount: u64,
    ) -> ClientResult<TxSignature>;

    /// Read the current mint record.
    async fn get_mint(&self, mint: &Account) -> ClientResult<Mint>;
}
