//! Ed25519 keypairs.

use devdrop_types::Account;
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use std::fmt;
use std::path::Path;

use crate::CryptoError;

/// A signing identity.
///
/// Deliberately not `Clone` or `Serialize`; the secret half zeroizes on drop.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new keypair from the OS random source.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Derive a keypair from a 32-byte seed (deterministic).
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Parse the 64-byte `secret || public` form.
    ///
    /// Fails if the public half does not belong to the secret half.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes: &[u8; 64] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidKeypair(format!("expected 64 bytes, got {}", bytes.len()))
        })?;
        let signing_key = SigningKey::from_keypair_bytes(bytes)
            .map_err(|e| CryptoError::InvalidKeypair(e.to_string()))?;
        Ok(Self { signing_key })
    }

    /// The 64-byte `secret || public` form.
    pub fn to_bytes(&self) -> [u8; 64] {
        self.signing_key.to_keypair_bytes()
    }

    /// The account this keypair controls.
    pub fn account(&self) -> Account {
        Account::from_public_key(self.signing_key.verifying_key().as_bytes())
    }

    /// Sign a message, returning the raw 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("account", &self.account())
            .finish_non_exhaustive()
    }
}

/// Load a keypair stored as a JSON array of 64 bytes.
pub fn read_keypair_file(path: impl AsRef<Path>) -> Result<Keypair, CryptoError> {
    let path = path.as_ref();
    let file_error = |reason: String| CryptoError::KeypairFile {
        path: path.display().to_string(),
        reason,
    };

    let content = std::fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
    let bytes: Vec<u8> = serde_json::from_str(&content).map_err(|e| file_error(e.to_string()))?;
    Keypair::from_bytes(&bytes)
}

/// Store a keypair as a JSON array of 64 bytes.
pub fn write_keypair_file(keypair: &Keypair, path: impl AsRef<Path>) -> Result<(), CryptoError> {
    let path = path.as_ref();
    let json = serde_json::to_string(&keypair.to_bytes().to_vec()).map_err(|e| {
        CryptoError::KeypairFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
    })?;
    std::fs::write(path, json).map_err(|e| CryptoError::KeypairFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_deterministic() {
        let a = Keypair::from_seed(&[42u8; 32]);
        let b = Keypair::from_seed(&[42u8; 32]);
        assert_eq!(a.account(), b.account());
        assert_ne!(a.account(), Keypair::from_seed(&[43u8; 32]).account());
    }

    #[test]
    fn generated_keys_differ() {
        assert_ne!(Keypair::generate().account(), Keypair::generate().account());
    }

    #[test]
    fn bytes_round_trip() {
        let kp = Keypair::from_seed(&[1u8; 32]);
        let restored = Keypair::from_bytes(&kp.to_bytes()).unwrap();
        assert_eq!(restored.account(), kp.account());
    }

    #[test]
    fn mismatched_public_half_rejected() {
        let mut bytes = Keypair::from_seed(&[1u8; 32]).to_bytes();
        bytes[40] ^= 0xFF;
        assert!(Keypair::from_bytes(&bytes).is_err());
        assert!(Keypair::from_bytes(&bytes[..32]).is_err());
    }

    #[test]
    fn keypair_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("id.json");
        let kp = Keypair::from_seed(&[8u8; 32]);

        write_keypair_file(&kp, &path).unwrap();
        let loaded = read_keypair_file(&path).unwrap();
        assert_eq!(loaded.account(), kp.account());
    }

    #[test]
    fn missing_keypair_file() {
        let err = read_keypair_file("/nonexistent/devdrop/id.json").unwrap_err();
        assert!(matches!(err, CryptoError::KeypairFile { .. }));
    }

    #[test]
    fn debug_hides_secret() {
        let kp = Keypair::from_seed(&[2u8; 32]);
        let shown = format!("{kp:?}");
        assert!(shown.contains(kp.account().as_str()));
    }
}
