//! Airdrop targets.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::amount::lamports_from_sol;
use crate::{Account, TypesError};

/// A requested transfer target: `drop` base units to `wallet`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropAccount {
    pub wallet: Account,
    pub drop: u64,
}

impl DropAccount {
    pub fn new(wallet: Account, drop: u64) -> Self {
        Self { wallet, drop }
    }

    /// Build a target from a whole-unit native amount (e.g. `1.5` SOL).
    pub fn from_sol(wallet: Account, sol: f64) -> Result<Self, TypesError> {
        Ok(Self {
            wallet,
            drop: lamports_from_sol(sol)?,
        })
    }
}

/// An ordered, validated airdrop batch.
///
/// Never empty and never names the same wallet twice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DropBatch {
    targets: Vec<DropAccount>,
}

impl DropBatch {
    pub fn new(targets: Vec<DropAccount>) -> Result<Self, TypesError> {
        if targets.is_empty() {
            return Err(TypesError::EmptyBatch);
        }
        let mut seen = HashSet::with_capacity(targets.len());
        for target in &targets {
            if !seen.insert(&target.wallet) {
                return Err(TypesError::DuplicateWallet(target.wallet.to_string()));
            }
        }
        Ok(Self { targets })
    }

    pub fn targets(&self) -> &[DropAccount] {
        &self.targets
    }

    /// Recipient wallets in batch order.
    pub fn wallets(&self) -> Vec<Account> {
        self.targets.iter().map(|t| t.wallet.clone()).collect()
    }

    /// Sum of all requested drops.
    pub fn total(&self) -> Result<u64, TypesError> {
        self.targets
            .iter()
            .try_fold(0u64, |acc, t| acc.checked_add(t.drop))
            .ok_or(TypesError::TotalOverflow)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl<'de> Deserialize<'de> for DropBatch {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let targets = Vec::<DropAccount>::deserialize(deserializer)?;
        DropBatch::new(targets).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet(seed: u8) -> Account {
        Account::from_public_key(&[seed; 32])
    }

    #[test]
    fn total_and_order() {
        let batch = DropBatch::new(vec![
            DropAccount::new(wallet(1), 10),
            DropAccount::new(wallet(2), 20),
        ])
        .unwrap();
        assert_eq!(batch.total().unwrap(), 30);
        assert_eq!(batch.wallets(), vec![wallet(1), wallet(2)]);
    }

    #[test]
    fn rejects_duplicates() {
        let err = DropBatch::new(vec![
            DropAccount::new(wallet(1), 1),
            DropAccount::new(wallet(1), 2),
        ])
        .unwrap_err();
        assert!(matches!(err, TypesError::DuplicateWallet(_)));
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(DropBatch::new(vec![]).unwrap_err(), TypesError::EmptyBatch);
    }

    #[test]
    fn total_overflow() {
        let batch = DropBatch::new(vec![
            DropAccount::new(wallet(1), u64::MAX),
            DropAccount::new(wallet(2), 1),
        ])
        .unwrap();
        assert_eq!(batch.total(), Err(TypesError::TotalOverflow));
    }

    #[test]
    fn deserialize_validates() {
        let w = wallet(9);
        let json = format!(r#"[{{"wallet":"{w}","drop":1}},{{"wallet":"{w}","drop":2}}]"#);
        assert!(serde_json::from_str::<DropBatch>(&json).is_err());
    }

    #[test]
    fn from_sol_rejects_negative() {
        assert!(DropAccount::from_sol(wallet(1), -0.1).is_err());
        assert_eq!(DropAccount::from_sol(wallet(1), 2.0).unwrap().drop, 2_000_000_000);
    }
}
