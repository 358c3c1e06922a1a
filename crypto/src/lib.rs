//! Cryptographic primitives for devdrop.
//!
//! - **Ed25519** keypairs: the signing capability behind payers, funders and
//!   mint authorities
//! - Keypair files in the ledger's JSON byte-array format
//! - Detached message signing and verification

pub mod error;
pub mod keys;
pub mod sign;

pub use error::CryptoError;
pub use keys::{read_keypair_file, write_keypair_file, Keypair};
pub use sign::{sign_message, verify_signature};
