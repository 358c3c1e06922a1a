//! Commitment levels for transaction confirmation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// How final a transaction must be before it counts as confirmed.
///
/// Ordered from weakest to strongest, so `observed >= required` means the
/// requirement is met.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::Confirmed => "confirmed",
            Self::Finalized => "finalized",
        }
    }

    /// Whether a transaction observed at `self` satisfies `required`.
    pub fn satisfies(&self, required: Commitment) -> bool {
        *self >= required
    }
}

impl FromStr for Commitment {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "processed" => Ok(Self::Processed),
            "confirmed" => Ok(Self::Confirmed),
            "finalized" => Ok(Self::Finalized),
            _ => Err(TypesError::UnknownCommitment(s.to_string())),
        }
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering() {
        assert!(Commitment::Finalized.satisfies(Commitment::Confirmed));
        assert!(Commitment::Confirmed.satisfies(Commitment::Confirmed));
        assert!(!Commitment::Processed.satisfies(Commitment::Confirmed));
    }

    #[test]
    fn parse() {
        assert_eq!("Confirmed".parse::<Commitment>().unwrap(), Commitment::Confirmed);
        assert!("eventually".parse::<Commitment>().is_err());
    }
}
