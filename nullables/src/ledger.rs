//! Nullable ledger: an in-memory cluster that never touches the network.

use async_trait::async_trait;
use devdrop_crypto::Keypair;
use devdrop_ledger_client::{ClientError, ClientResult, LedgerClient, METHOD_NOT_FOUND};
use devdrop_types::{Account, Cluster, Commitment, HoldingAccount, Mint, TxSignature};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// One request observed by the [`NullLedger`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerCall {
    GetBalance(Account),
    GetTokenBalance { owner: Account, mint: Account },
    RequestFaucetFunds { account: Account, lamports: u64 },
    Transfer { payer: Account, recipients: Vec<(Account, u64)> },
    ConfirmTransaction(TxSignature),
    CreateMint { payer: Account, decimals: u8 },
    GetOrCreateHoldingAccount { mint: Account, owner: Account },
    MintTo { mint: Account, destination: Account, amount: u64 },
    GetMint(Account),
}

impl LedgerCall {
    /// Whether this call changes ledger state.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::RequestFaucetFunds { .. }
                | Self::Transfer { .. }
                | Self::CreateMint { .. }
                | Self::GetOrCreateHoldingAccount { .. }
                | Self::MintTo { .. }
        )
    }
}

#[derive(Default)]
struct LedgerState {
    balances: HashMap<Account, u64>,
    mints: HashMap<Account, Mint>,
    /// Keyed by (owner, mint).
    holdings: HashMap<(Account, Account), HoldingAccount>,
    /// `None` for applied transactions, `Some(reason)` for failed ones.
    transactions: HashMap<TxSignature, Option<String>>,
    calls: Vec<LedgerCall>,
    failing_balances: HashMap<Account, ClientError>,
    confirm_failure: Option<ClientError>,
    transfer_failure: Option<ClientError>,
    mint_to_failure: Option<ClientError>,
    /// Reason recorded against the next submitted transaction.
    next_transaction_failure: Option<String>,
    next_id: u64,
}

impl LedgerState {
    fn next_bytes<const N: usize>(&mut self, marker: u8) -> [u8; N] {
        self.next_id += 1;
        let mut bytes = [marker; N];
        bytes[..8].copy_from_slice(&self.next_id.to_le_bytes());
        bytes
    }

    fn next_signature(&mut self) -> TxSignature {
        TxSignature::from_bytes(&self.next_bytes::<64>(0xD5))
    }

    /// Record a submitted transaction, failed if a failure was queued.
    fn submit(&mut self) -> TxSignature {
        let signature = self.next_signature();
        let outcome = self.next_transaction_failure.take();
        self.transactions.insert(signature.clone(), outcome);
        signature
    }

    fn next_address(&mut self) -> Account {
        Account::from_public_key(&self.next_bytes::<32>(0xA7))
    }

    fn holding_by_address(&mut self, address: &Account) -> Option<&mut HoldingAccount> {
        self.holdings.values_mut().find(|h| &h.address == address)
    }
}

fn rejected(message: impl Into<String>) -> ClientError {
    ClientError::Rpc {
        code: -32002,
        message: message.into(),
    }
}

/// A deterministic in-memory ledger bound to one cluster.
///
/// Transactions apply at submission and confirm immediately unless a
/// confirmation failure is injected. Only `Cluster::Devnet` serves the faucet.
pub struct NullLedger {
    cluster: Cluster,
    latency: Option<Duration>,
    state: Mutex<LedgerState>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl NullLedger {
    pub fn new(cluster: Cluster) -> Self {
        Self {
            cluster,
            latency: None,
            state: Mutex::new(LedgerState::default()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// A ledger on the test network.
    pub fn devnet() -> Self {
        Self::new(Cluster::Devnet)
    }

    /// Delay every balance read by `latency`, so concurrent reads overlap.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn cluster(&self) -> Cluster {
        self.cluster
    }

    fn state(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ── Setup ──────────────────────────────────────────────────────────

    pub fn set_balance(&self, account: &Account, lamports: u64) {
        self.state().balances.insert(account.clone(), lamports);
    }

    /// Make every balance read of `account` fail with `error`.
    pub fn fail_balance_for(&self, account: &Account, error: ClientError) {
        self.state().failing_balances.insert(account.clone(), error);
    }

    /// Make every confirmation fail with `error`.
    pub fn fail_confirmations(&self, error: ClientError) {
        self.state().confirm_failure = Some(error);
    }

    /// Make every transfer submission fail with `error`.
    pub fn fail_transfers(&self, error: ClientError) {
        self.state().transfer_failure = Some(error);
    }

    /// Make every `mint_to` submission fail with `error`.
    pub fn fail_mint_to(&self, error: ClientError) {
        self.state().mint_to_failure = Some(error);
    }

    /// Accept the next submitted transaction but report it failed with
    /// `reason` when it is confirmed.
    pub fn fail_next_transaction(&self, reason: impl Into<String>) {
        self.state().next_transaction_failure = Some(reason.into());
    }

    // ── Inspection (not recorded as calls) ─────────────────────────────

    pub fn balance_of(&self, account: &Account) -> u64 {
        self.state().balances.get(account).copied().unwrap_or(0)
    }

    pub fn token_balance_of(&self, owner: &Account, mint: &Account) -> u64 {
        self.state()
            .holdings
            .get(&(owner.clone(), mint.clone()))
            .map_or(0, |h| h.amount)
    }

    pub fn holding_count(&self) -> usize {
        self.state().holdings.len()
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<LedgerCall> {
        self.state().calls.clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.state().calls.iter().filter(|c| c.is_mutation()).count()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Highest number of balance reads that were in flight at once.
    pub fn max_concurrent_reads(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, call: LedgerCall) {
        self.state().calls.push(call);
    }

    async fn simulate_read_latency(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        match self.latency {
            Some(latency) => tokio::time::sleep(latency).await,
            None => tokio::task::yield_now().await,
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::devnet()
    }
}

#[async_trait]
impl LedgerClient for NullLedger {
    async fn get_balance(&self, account: &Account) -> ClientResult<u64> {
        self.record(LedgerCall::GetBalance(account.clone()));
        self.simulate_read_latency().await;

        let state = self.state();
        if let Some(error) = state.failing_balances.get(account) {
            return Err(error.clone());
        }
        Ok(state.balances.get(account).copied().unwrap_or(0))
    }

    async fn get_token_balance(&self, owner: &Account, mint: &Account) -> ClientResult<u64> {
        self.record(LedgerCall::GetTokenBalance {
            owner: owner.clone(),
            mint: mint.clone(),
        });
        self.simulate_read_latency().await;

        let state = self.state();
        if let Some(error) = state.failing_balances.get(owner) {
            return Err(error.clone());
        }
        Ok(state
            .holdings
            .get(&(owner.clone(), mint.clone()))
            .map_or(0, |h| h.amount))
    }

    async fn request_faucet_funds(
        &self,
        account: &Account,
        lamports: u64,
    ) -> ClientResult<TxSignature> {
        self.record(LedgerCall::RequestFaucetFunds {
            account: account.clone(),
            lamports,
        });
        if !self.cluster.supports_faucet() {
            return Err(ClientError::FaucetUnavailable(format!(
                "{METHOD_NOT_FOUND}: requestAirdrop is not served on {}",
                self.cluster
            )));
        }

        let mut state = self.state();
        let balance = state.balances.entry(account.clone()).or_insert(0);
        *balance = balance
            .checked_add(lamports)
            .ok_or_else(|| rejected("balance overflow"))?;
        Ok(state.submit())
    }

    async fn transfer(
        &self,
        payer: &Keypair,
        recipients: &[(Account, u64)],
    ) -> ClientResult<TxSignature> {
        let from = payer.account();
        self.record(LedgerCall::Transfer {
            payer: from.clone(),
            recipients: recipients.to_vec(),
        });

        let mut state = self.state();
        if let Some(error) = &state.transfer_failure {
            return Err(error.clone());
        }

        let total = recipients
            .iter()
            .try_fold(0u64, |acc, (_, lamports)| acc.checked_add(*lamports))
            .ok_or_else(|| rejected("transfer total overflow"))?;
        let available = state.balances.get(&from).copied().unwrap_or(0);
        if available < total {
            return Err(rejected(format!(
                "insufficient funds: need {total}, have {available}"
            )));
        }

        state.balances.insert(from, available - total);
        for (to, lamports) in recipients {
            *state.balances.entry(to.clone()).or_insert(0) += lamports;
        }
        Ok(state.submit())
    }

    async fn confirm_transaction(
        &self,
        signature: &TxSignature,
        _commitment: Commitment,
    ) -> ClientResult<()> {
        self.record(LedgerCall::ConfirmTransaction(signature.clone()));
        tokio::task::yield_now().await;

        let state = self.state();
        if let Some(error) = &state.confirm_failure {
            return Err(error.clone());
        }
        match state.transactions.get(signature) {
            Some(None) => Ok(()),
            Some(Some(reason)) => Err(ClientError::TransactionFailed {
                signature: signature.to_string(),
                reason: reason.clone(),
            }),
            None => Err(ClientError::NotFound(format!("signature {signature}"))),
        }
    }

    async fn create_mint(
        &self,
        payer: &Keypair,
        mint_authority: &Account,
        freeze_authority: &Account,
        decimals: u8,
    ) -> ClientResult<Account> {
        self.record(LedgerCall::CreateMint {
            payer: payer.account(),
            decimals,
        });

        let mut state = self.state();
        let address = state.next_address();
        state.mints.insert(
            address.clone(),
            Mint {
                address: address.clone(),
                decimals,
                supply: 0,
                mint_authority: mint_authority.clone(),
                freeze_authority: freeze_authority.clone(),
            },
        );
        Ok(address)
    }

    async fn get_or_create_holding_account(
        &self,
        _payer: &Keypair,
        mint: &Account,
        owner: &Account,
    ) -> ClientResult<HoldingAccount> {
        self.record(LedgerCall::GetOrCreateHoldingAccount {
            mint: mint.clone(),
            owner: owner.clone(),
        });

        let mut state = self.state();
        if !state.mints.contains_key(mint) {
            return Err(ClientError::NotFound(format!("mint {mint}")));
        }
        let key = (owner.clone(), mint.clone());
        if let Some(existing) = state.holdings.get(&key) {
            return Ok(existing.clone());
        }
        let holding = HoldingAccount {
            address: state.next_address(),
            mint: mint.clone(),
            owner: owner.clone(),
            amount: 0,
        };
        state.holdings.insert(key, holding.clone());
        Ok(holding)
    }

    async fn mint_to(
        &self,
        _payer: &Keypair,
        mint: &Account,
        destination: &Account,
        mint_authority: &Keypair,
        amount: u64,
    ) -> ClientResult<TxSignature> {
        self.record(LedgerCall::MintTo {
            mint: mint.clone(),
            destination: destination.clone(),
            amount,
        });

        let mut state = self.state();
        if let Some(error) = &state.mint_to_failure {
            return Err(error.clone());
        }

        let record = state
            .mints
            .get(mint)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("mint {mint}")))?;
        if record.mint_authority != mint_authority.account() {
            return Err(rejected("mint authority does not match"));
        }
        let supply = record
            .supply
            .checked_add(amount)
            .ok_or_else(|| rejected("supply overflow"))?;

        let holding = state
            .holding_by_address(destination)
            .ok_or_else(|| ClientError::NotFound(format!("holding account {destination}")))?;
        if &holding.mint != mint {
            return Err(rejected("holding account belongs to another mint"));
        }
        holding.amount += amount;

        if let Some(record) = state.mints.get_mut(mint) {
            record.supply = supply;
        }
        Ok(state.submit())
    }

    async fn get_mint(&self, mint: &Account) -> ClientResult<Mint> {
        self.record(LedgerCall::GetMint(mint.clone()));
        self.state()
            .mints
            .get(mint)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("mint {mint}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(seed: u8) -> Account {
        Account::from_public_key(&[seed; 32])
    }

    #[tokio::test]
    async fn faucet_only_on_devnet() {
        let devnet = NullLedger::devnet();
        let sig = devnet.request_faucet_funds(&account(1), 50).await.unwrap();
        devnet
            .confirm_transaction(&sig, Commitment::Confirmed)
            .await
            .unwrap();
        assert_eq!(devnet.balance_of(&account(1)), 50);

        let mainnet = NullLedger::new(Cluster::MainnetBeta);
        let err = mainnet
            .request_faucet_funds(&account(1), 50)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::FaucetUnavailable(_)));
        assert_eq!(mainnet.balance_of(&account(1)), 0);
    }

    #[tokio::test]
    async fn transfer_moves_funds() {
        let ledger = NullLedger::devnet();
        let payer = Keypair::from_seed(&[9u8; 32]);
        ledger.set_balance(&payer.account(), 100);

        ledger
            .transfer(&payer, &[(account(1), 30), (account(2), 20)])
            .await
            .unwrap();
        assert_eq!(ledger.balance_of(&payer.account()), 50);
        assert_eq!(ledger.balance_of(&account(1)), 30);
        assert_eq!(ledger.balance_of(&account(2)), 20);
    }

    #[tokio::test]
    async fn transfer_rejects_overdraft() {
        let ledger = NullLedger::devnet();
        let payer = Keypair::from_seed(&[9u8; 32]);
        let err = ledger.transfer(&payer, &[(account(1), 1)]).await.unwrap_err();
        assert!(matches!(err, ClientError::Rpc { .. }));
        assert_eq!(ledger.balance_of(&account(1)), 0);
    }

    #[tokio::test]
    async fn unknown_signature_not_found() {
        let ledger = NullLedger::devnet();
        let err = ledger
            .confirm_transaction(&TxSignature::from_bytes(&[1u8; 64]), Commitment::Confirmed)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }

    #[tokio::test]
    async fn queued_failure_hits_only_the_next_transaction() {
        let ledger = NullLedger::devnet();
        ledger.fail_next_transaction("insufficient compute");
        let failed = ledger.request_faucet_funds(&account(1), 5).await.unwrap();
        let applied = ledger.request_faucet_funds(&account(1), 5).await.unwrap();

        let err = ledger
            .confirm_transaction(&failed, Commitment::Confirmed)
            .await
            .unwrap_err();
        match err {
            ClientError::TransactionFailed { signature, reason } => {
                assert_eq!(signature, failed.to_string());
                assert_eq!(reason, "insufficient compute");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        ledger
            .confirm_transaction(&applied, Commitment::Confirmed)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn holding_account_is_reused() {
        let ledger = NullLedger::devnet();
        let payer = Keypair::from_seed(&[9u8; 32]);
        let owner = payer.account();
        let mint = ledger.create_mint(&payer, &owner, &owner, 6).await.unwrap();

        let first = ledger
            .get_or_create_holding_account(&payer, &mint, &owner)
            .await
            .unwrap();
        let second = ledger
            .get_or_create_holding_account(&payer, &mint, &owner)
            .await
            .unwrap();
        assert_eq!(first.address, second.address);
        assert_eq!(ledger.holding_count(), 1);
    }

    #[tokio::test]
    async fn mint_to_requires_authority() {
        let ledger = NullLedger::devnet();
        let payer = Keypair::from_seed(&[9u8; 32]);
        let stranger = Keypair::from_seed(&[10u8; 32]);
        let owner = payer.account();
        let mint = ledger.create_mint(&payer, &owner, &owner, 0).await.unwrap();
        let holding = ledger
            .get_or_create_holding_account(&payer, &mint, &owner)
            .await
            .unwrap();

        assert!(ledger
            .mint_to(&payer, &mint, &holding.address, &stranger, 10)
            .await
            .is_err());
        ledger
            .mint_to(&payer, &mint, &holding.address, &payer, 10)
            .await
            .unwrap();
        assert_eq!(ledger.token_balance_of(&owner, &mint), 10);
        assert_eq!(ledger.get_mint(&mint).await.unwrap().supply, 10);
    }

    #[tokio::test]
    async fn balance_failures_are_per_account() {
        let ledger = NullLedger::devnet();
        ledger.set_balance(&account(2), 7);
        ledger.fail_balance_for(&account(1), ClientError::Timeout("slow".into()));

        assert!(ledger.get_balance(&account(1)).await.is_err());
        assert_eq!(ledger.get_balance(&account(2)).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn calls_are_recorded_in_order() {
        let ledger = NullLedger::devnet();
        ledger.get_balance(&account(1)).await.unwrap();
        ledger.get_mint(&account(2)).await.unwrap_err();
        assert_eq!(
            ledger.calls(),
            vec![
                LedgerCall::GetBalance(account(1)),
                LedgerCall::GetMint(account(2))
            ]
        );
        assert_eq!(ledger.mutation_count(), 0);
    }
}
