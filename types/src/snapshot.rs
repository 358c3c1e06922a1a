//! Point-in-time balance captures.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::Account;

/// Balances of a set of accounts captured at one instant, in base units.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot(BTreeMap<Account, u64>);

impl BalanceSnapshot {
    pub fn get(&self, account: &Account) -> Option<u64> {
        self.0.get(account).copied()
    }

    pub fn contains(&self, account: &Account) -> bool {
        self.0.contains_key(account)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Account, u64)> {
        self.0.iter().map(|(a, b)| (a, *b))
    }

    /// Per-account change from `self` to `later`, for accounts present in both.
    pub fn delta(&self, later: &BalanceSnapshot) -> BTreeMap<Account, i128> {
        self.0
            .iter()
            .filter_map(|(account, before)| {
                later
                    .get(account)
                    .map(|after| (account.clone(), i128::from(after) - i128::from(*before)))
            })
            .collect()
    }
}

impl FromIterator<(Account, u64)> for BalanceSnapshot {
    fn from_iter<I: IntoIterator<Item = (Account, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Outcome of one snapshot request.
///
/// Every requested account lands in exactly one of `balances` or `failures`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotReport {
    pub balances: BalanceSnapshot,
    /// Error detail for accounts whose query failed.
    pub failures: BTreeMap<Account, String>,
}

impl SnapshotReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// All accounts covered by this report, succeeded or failed.
    pub fn accounts(&self) -> Vec<Account> {
        let mut all: Vec<Account> = self
            .balances
            .accounts()
            .chain(self.failures.keys())
            .cloned()
            .collect();
        all.sort();
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(seed: u8) -> Account {
        Account::from_public_key(&[seed; 32])
    }

    #[test]
    fn delta_skips_missing_accounts() {
        let before: BalanceSnapshot = [(account(1), 10), (account(2), 5)].into_iter().collect();
        let after: BalanceSnapshot = [(account(1), 15)].into_iter().collect();

        let delta = before.delta(&after);
        assert_eq!(delta.get(&account(1)), Some(&5));
        assert!(!delta.contains_key(&account(2)));
    }

    #[test]
    fn delta_can_be_negative() {
        let before: BalanceSnapshot = [(account(1), 10)].into_iter().collect();
        let after: BalanceSnapshot = [(account(1), 3)].into_iter().collect();
        assert_eq!(before.delta(&after).get(&account(1)), Some(&-7));
    }

    #[test]
    fn report_accounts_cover_failures() {
        let mut report = SnapshotReport {
            balances: [(account(1), 1)].into_iter().collect(),
            failures: BTreeMap::new(),
        };
        report.failures.insert(account(2), "timeout".into());
        assert!(!report.is_complete());

        let mut expected = vec![account(1), account(2)];
        expected.sort();
        assert_eq!(report.accounts(), expected);
    }
}
