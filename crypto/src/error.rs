use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid keypair bytes: {0}")]
    InvalidKeypair(String),

    #[error("keypair file {path}: {reason}")]
    KeypairFile { path: String, reason: String },
}
