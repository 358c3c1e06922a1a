use proptest::prelude::*;

use devdrop_types::{to_base_units, Account, DropAccount, DropBatch, TypesError};

proptest! {
    /// Base-unit conversion agrees with u128 arithmetic whenever it fits.
    #[test]
    fn base_units_match_wide_arithmetic(amount in 0u64..1_000_000_000_000, decimals in 0u8..=19) {
        let wide = u128::from(amount) * 10u128.pow(u32::from(decimals));
        match to_base_units(amount, decimals) {
            Ok(base) => prop_assert_eq!(u128::from(base), wide),
            Err(TypesError::AmountOverflow { .. }) => prop_assert!(wide > u128::from(u64::MAX)),
            Err(other) => prop_assert!(false, "unexpected error {}", other),
        }
    }

    /// A batch of distinct wallets is accepted and its total is the plain sum.
    #[test]
    fn distinct_wallets_accepted(drops in prop::collection::vec(0u64..1_000_000, 1..32)) {
        let targets: Vec<DropAccount> = drops
            .iter()
            .enumerate()
            .map(|(i, d)| DropAccount::new(Account::from_public_key(&[i as u8; 32]), *d))
            .collect();
        let batch = DropBatch::new(targets).unwrap();
        prop_assert_eq!(batch.total().unwrap(), drops.iter().sum::<u64>());
        prop_assert_eq!(batch.len(), drops.len());
    }

    /// Repeating any wallet makes the batch invalid.
    #[test]
    fn any_repeat_rejected(len in 2usize..16, dup in 0usize..16) {
        let mut targets: Vec<DropAccount> = (0..len)
            .map(|i| DropAccount::new(Account::from_public_key(&[i as u8; 32]), 1))
            .collect();
        let repeated = targets[dup % len].wallet.clone();
        targets.push(DropAccount::new(repeated, 7));
        prop_assert!(matches!(DropBatch::new(targets), Err(TypesError::DuplicateWallet(_))));
    }

    /// Parsing an account string yields the same bytes it was built from.
    #[test]
    fn account_string_round_trip(bytes in prop::array::uniform32(0u8..)) {
        let account = Account::from_public_key(&bytes);
        let parsed: Account = account.as_str().parse().unwrap();
        prop_assert_eq!(parsed.to_bytes(), bytes);
    }
}
