//! Detached Ed25519 signatures over arbitrary messages.

use devdrop_types::Account;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use crate::Keypair;

/// Sign a message and return the signature base58-encoded.
pub fn sign_message(message: &[u8], keypair: &Keypair) -> String {
    bs58::encode(keypair.sign(message)).into_string()
}

/// Verify a raw signature against a message and the signer's account.
///
/// Returns `false` for malformed keys as well as bad signatures.
pub fn verify_signature(message: &[u8], signature: &[u8; 64], signer: &Account) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&signer.to_bytes()) else {
        return false;
    };
    let sig = Signature::from_bytes(signature);
    verifying_key.verify(message, &sig).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify() {
        let kp = Keypair::from_seed(&[1u8; 32]);
        let sig = kp.sign(b"drop");
        assert!(verify_signature(b"drop", &sig, &kp.account()));
    }

    #[test]
    fn wrong_message_fails() {
        let kp = Keypair::from_seed(&[1u8; 32]);
        let sig = kp.sign(b"drop");
        assert!(!verify_signature(b"mint", &sig, &kp.account()));
    }

    #[test]
    fn wrong_signer_fails() {
        let kp1 = Keypair::from_seed(&[1u8; 32]);
        let kp2 = Keypair::from_seed(&[2u8; 32]);
        let sig = kp1.sign(b"drop");
        assert!(!verify_signature(b"drop", &sig, &kp2.account()));
    }

    #[test]
    fn encoded_signature_is_64_bytes() {
        let kp = Keypair::from_seed(&[3u8; 32]);
        let encoded = sign_message(b"payload", &kp);
        assert!(encoded.parse::<devdrop_types::TxSignature>().is_ok());
    }
}
