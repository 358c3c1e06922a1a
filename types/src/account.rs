//! Account identifiers: base58-encoded Ed25519 public keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// An on-ledger account, identified by its public key.
///
/// Always holds a string that decodes to exactly 32 bytes, so any `Account`
/// can be handed to the ledger without further checks.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Account(String);

impl Account {
    /// Number of raw bytes behind an account identifier.
    pub const LEN: usize = 32;

    /// Build an account from raw public key bytes.
    pub fn from_public_key(bytes: &[u8; 32]) -> Self {
        Self(bs58::encode(bytes).into_string())
    }

    /// Return the base58 string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode back to raw public key bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        // Length was checked on construction.
        if let Ok(decoded) = bs58::decode(&self.0).into_vec() {
            out.copy_from_slice(&decoded);
        }
        out
    }
}

impl FromStr for Account {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decoded = bs58::decode(trimmed)
            .into_vec()
            .map_err(|_| TypesError::InvalidAccount(s.to_string()))?;
        if decoded.len() != Self::LEN {
            return Err(TypesError::InvalidAccount(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl TryFrom<String> for Account {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Account> for String {
    fn from(account: Account) -> Self {
        account.0
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
