//! Token mint and holding account records.

use serde::{Deserialize, Serialize};

use crate::Account;

/// An on-ledger token type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mint {
    /// Address of the mint account.
    pub address: Account,
    /// Base-unit precision. Fixed at creation.
    pub decimals: u8,
    /// Total supply in base units.
    pub supply: u64,
    /// Account allowed to mint new supply.
    pub mint_authority: Account,
    /// Account allowed to freeze holding accounts.
    pub freeze_authority: Account,
}

/// A per-(owner, mint) balance record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingAccount {
    pub address: Account,
    pub mint: Account,
    pub owner: Account,
    /// Balance in base units.
    pub amount: u64,
}
