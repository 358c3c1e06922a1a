use devdrop_ledger_client::ClientError;
use devdrop_types::{Cluster, TypesError};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum DevdropError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported network {network}: {detail}")]
    UnsupportedNetwork { network: Cluster, detail: String },

    #[error("network error: {0}")]
    Network(#[from] ClientError),

    #[error("mint failed: {0}")]
    Mint(String),

    #[error("Airdrop failed: {0}")]
    AirdropFailed(String),

    #[error("config error: {0}")]
    Config(String),
}

impl From<TypesError> for DevdropError {
    fn from(e: TypesError) -> Self {
        DevdropError::Validation(e.to_string())
    }
}
