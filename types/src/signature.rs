//! Transaction signatures.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// A base58 transaction identifier returned by the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxSignature(String);

impl TxSignature {
    /// Raw signature length in bytes.
    pub const LEN: usize = 64;

    pub fn from_bytes(bytes: &[u8; 64]) -> Self {
        Self(bs58::encode(bytes).into_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        if let Ok(decoded) = bs58::decode(&self.0).into_vec() {
            out.copy_from_slice(&decoded);
        }
        out
    }
}

impl FromStr for TxSignature {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = bs58::decode(s)
            .into_vec()
            .map_err(|_| TypesError::InvalidSignature(s.to_string()))?;
        if decoded.len() != Self::LEN {
            return Err(TypesError::InvalidSignature(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for TxSignature {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TxSignature> for String {
    fn from(sig: TxSignature) -> Self {
        sig.0
    }
}

impl fmt::Display for TxSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_64_bytes_only() {
        let sig = TxSignature::from_bytes(&[5u8; 64]);
        assert_eq!(sig.as_str().parse::<TxSignature>().unwrap(), sig);

        let short = bs58::encode([5u8; 32]).into_string();
        assert!(short.parse::<TxSignature>().is_err());
        assert!("".parse::<TxSignature>().is_err());
    }
}
