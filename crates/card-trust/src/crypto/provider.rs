//! The cryptographic provider capability.
//!
//! The verifier never touches key material directly. It imports keys and
//! checks signatures through `CardCrypto`, so alternate algorithms or test
//! doubles can be plugged in without changing the verification algorithm.

use ed25519_dalek::VerifyingKey;

use crate::error::Result;

use super::{keys, signing};

/// Asymmetric key import and signature verification.
pub trait CardCrypto: Send + Sync {
    /// Imported public key representation.
    type PublicKey: Send + Sync;

    /// Import a public key from its byte encoding.
    ///
    /// Fails with `CardError::InvalidKey` when the bytes are not a key.
    fn import_public_key(&self, bytes: &[u8]) -> Result<Self::PublicKey>;

    /// Check `signature` over `message` with `key`.
    ///
    /// Malformed signatures and mismatched keys are reported as `false`.
    fn verify_signature(&self, signature: &[u8], message: &[u8], key: &Self::PublicKey) -> bool;
}

/// Ed25519 provider backed by `ed25519-dalek`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519CardCrypto;

impl CardCrypto for Ed25519CardCrypto {
    type PublicKey = VerifyingKey;

    fn import_public_key(&self, bytes: &[u8]) -> Result<VerifyingKey> {
        keys::import_verifying_key(bytes)
    }

    fn verify_signature(&self, signature: &[u8], message: &[u8], key: &VerifyingKey) -> bool {
        signing::verify(key, message, signature)
    }
}
