use thiserror::Error;

/// Parse and validation failures for the shared types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid account {0}: expected a base58 encoded 32-byte public key")]
    InvalidAccount(String),

    #[error("invalid transaction signature {0}")]
    InvalidSignature(String),

    #[error("unknown cluster: {0}")]
    UnknownCluster(String),

    #[error("unknown commitment level: {0}")]
    UnknownCommitment(String),

    #[error("invalid amount {0}: must be finite and non-negative")]
    InvalidAmount(String),

    #[error("amount overflows base units: {amount} with {decimals} decimals")]
    AmountOverflow { amount: u64, decimals: u8 },

    #[error("drop batch is empty")]
    EmptyBatch,

    #[error("drop batch contains {0} more than once")]
    DuplicateWallet(String),

    #[error("drop batch total overflows u64")]
    TotalOverflow,
}
