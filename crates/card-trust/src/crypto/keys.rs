//! Ed25519 key pairs and public key import.
//!
//! Public keys travel in two encodings: 32 raw bytes, or a DER
//! SubjectPublicKeyInfo wrapping those bytes (44 bytes for Ed25519).
//! Both are accepted on import.

use ed25519_dalek::pkcs8::{DecodePublicKey, EncodePublicKey};
use ed25519_dalek::{SigningKey, VerifyingKey};
use zeroize::Zeroize;

use crate::error::{CardError, Result};

/// Length of a raw Ed25519 public key.
pub const RAW_PUBLIC_KEY_LEN: usize = 32;

/// An Ed25519 key pair for signing cards.
///
/// The signing key is zeroized on drop to prevent private key leakage.
pub struct Ed25519KeyPair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl Ed25519KeyPair {
    /// Generate a new random Ed25519 key pair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut rand::thread_rng());
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Reconstruct a key pair from raw signing key bytes.
    pub fn from_signing_key_bytes(bytes: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(bytes);
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Return a reference to the signing key.
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// Return the verifying (public) key.
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// Return the signing key bytes. Caller must zeroize after use.
    pub fn signing_key_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// Return the raw verifying key bytes.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.verifying_key.to_bytes()
    }

    /// Return the verifying key as DER SubjectPublicKeyInfo.
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        export_public_key_der(&self.verifying_key)
    }
}

impl Drop for Ed25519KeyPair {
    fn drop(&mut self) {
        let mut bytes = self.signing_key.to_bytes();
        bytes.zeroize();
    }
}

/// Import a verifying key from raw or DER-encoded bytes.
pub fn import_verifying_key(bytes: &[u8]) -> Result<VerifyingKey> {
    if bytes.len() == RAW_PUBLIC_KEY_LEN {
        let mut raw = [0u8; RAW_PUBLIC_KEY_LEN];
        raw.copy_from_slice(bytes);
        return VerifyingKey::from_bytes(&raw)
            .map_err(|e| CardError::InvalidKey(format!("invalid ed25519 public key: {e}")));
    }

    VerifyingKey::from_public_key_der(bytes)
        .map_err(|e| CardError::InvalidKey(format!("invalid public key encoding: {e}")))
}

/// Export a verifying key as DER SubjectPublicKeyInfo.
pub fn export_public_key_der(key: &VerifyingKey) -> Result<Vec<u8>> {
    key.to_public_key_der()
        .map(|doc| doc.as_bytes().to_vec())
        .map_err(|e| CardError::InvalidKey(format!("cannot encode public key: {e}")))
}
