//! Concurrent balance snapshots.
//!
//! A snapshot issues one read per distinct account, at most
//! `max_concurrent` of them in flight, and files each failure under its
//! account instead of aborting the rest.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use devdrop_ledger_client::LedgerClient;
use devdrop_types::{Account, BalanceSnapshot, SnapshotReport};
use futures_util::stream::{self, StreamExt};
use tracing::{debug, warn, Instrument};

use crate::spans::snapshot_span;
use crate::{DevdropConfig, DevdropError};

/// What a snapshot reads for each account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BalanceKind {
    /// Native balance in lamports.
    Native,
    /// Base-unit amount held for this mint.
    Token(Account),
}

impl BalanceKind {
    fn label(&self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Token(_) => "token",
        }
    }
}

#[derive(Clone)]
pub struct BalanceTracker {
    client: Arc<dyn LedgerClient>,
    max_concurrent: Option<usize>,
}

impl BalanceTracker {
    /// A tracker with no bound on in-flight reads.
    pub fn new(client: Arc<dyn LedgerClient>) -> Self {
        Self {
            client,
            max_concurrent: None,
        }
    }

    pub fn from_config(client: Arc<dyn LedgerClient>, config: &DevdropConfig) -> Self {
        Self {
            client,
            max_concurrent: config.max_concurrent_queries,
        }
    }

    /// Cap the number of reads in flight per snapshot. A limit of 0 is treated as 1.
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrent = Some(limit.max(1));
        self
    }

    /// Current native balance of one account.
    pub async fn balance(&self, account: &Account) -> Result<u64, DevdropError> {
        Ok(self.client.get_balance(account).await?)
    }

    /// Native balances of `accounts`.
    pub async fn snapshot(&self, accounts: &[Account]) -> SnapshotReport {
        self.snapshot_with(&BalanceKind::Native, accounts).await
    }

    /// Token balances of `owners` for `mint`.
    pub async fn snapshot_token(&self, owners: &[Account], mint: &Account) -> SnapshotReport {
        self.snapshot_with(&BalanceKind::Token(mint.clone()), owners)
            .await
    }

    pub async fn snapshot_with(&self, kind: &BalanceKind, accounts: &[Account]) -> SnapshotReport {
        let unique: BTreeSet<Account> = accounts.iter().cloned().collect();
        let span = snapshot_span(kind.label(), unique.len());
        self.fan_out(kind, unique).instrument(span).await
    }

    async fn fan_out(&self, kind: &BalanceKind, accounts: BTreeSet<Account>) -> SnapshotReport {
        if accounts.is_empty() {
            return SnapshotReport::default();
        }
        let limit = self.max_concurrent.unwrap_or(accounts.len()).max(1);

        let results: Vec<_> = stream::iter(accounts)
            .map(|account| {
                let client = Arc::clone(&self.client);
                async move {
                    let result = match kind {
                        BalanceKind::Native => client.get_balance(&account).await,
                        BalanceKind::Token(mint) => client.get_token_balance(&account, mint).await,
                    };
                    (account, result)
                }
            })
            .buffer_unordered(limit)
            .collect()
            .await;

        let mut balances = Vec::with_capacity(results.len());
        let mut failures = BTreeMap::new();
        for (account, result) in results {
            match result {
                Ok(amount) => {
                    debug!(%account, amount, "balance read");
                    balances.push((account, amount));
                }
                Err(e) => {
                    warn!(%account, error = %e, "balance read failed");
                    failures.insert(account, e.to_string());
                }
            }
        }

        SnapshotReport {
            balances: balances.into_iter().collect::<BalanceSnapshot>(),
            failures,
        }
    }
}
