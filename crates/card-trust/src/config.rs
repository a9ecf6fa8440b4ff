//! Policy files — trust policies persisted as versioned JSON.
//!
//! File format:
//! ```json
//! {
//!     "version": 1,
//!     "policy": {
//!         "verify_self_signature": true,
//!         "verify_service_signature": true,
//!         "self_signer": "self",
//!         "service_signer": "service",
//!         "service_public_key": "<base64>",
//!         "whitelists": [
//!             [ { "signer": "hr", "public_key": "<base64>" } ]
//!         ]
//!     }
//! }
//! ```
//!
//! Loading a policy file is configuration time: a bad service key or a bad
//! whitelist key is an error here, before any card is seen.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::card::{decode_b64, encode_b64};
use crate::crypto::CardCrypto;
use crate::error::{CardError, Result};
use crate::verify::{TrustPolicy, VerifierCredential, Whitelist, SELF_SIGNER, SERVICE_SIGNER};

// ── File format constants ─────────────────────────────────────────────────────

const POLICY_FILE_VERSION: u32 = 1;

fn default_true() -> bool {
    true
}

fn default_self_signer() -> String {
    SELF_SIGNER.to_string()
}

fn default_service_signer() -> String {
    SERVICE_SIGNER.to_string()
}

// ── On-disk structures ────────────────────────────────────────────────────────

/// Wrapper written to disk for a policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyFile {
    /// Format version number.
    pub version: u32,
    /// The stored policy.
    pub policy: PolicyConfig,
}

/// Serializable form of a trust policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default = "default_true")]
    pub verify_self_signature: bool,
    #[serde(default = "default_true")]
    pub verify_service_signature: bool,
    #[serde(default = "default_self_signer")]
    pub self_signer: String,
    #[serde(default = "default_service_signer")]
    pub service_signer: String,
    /// Base64 service public key (raw or DER).
    pub service_public_key: String,
    #[serde(default)]
    pub whitelists: Vec<Vec<CredentialConfig>>,
}

/// Serializable whitelist credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialConfig {
    pub signer: String,
    /// Base64 public key (raw or DER).
    pub public_key: String,
}

impl PolicyConfig {
    /// Default checks, anchored on `service_public_key`, no whitelists.
    pub fn new(service_public_key: &[u8]) -> Self {
        Self {
            verify_self_signature: true,
            verify_service_signature: true,
            self_signer: default_self_signer(),
            service_signer: default_service_signer(),
            service_public_key: encode_b64(service_public_key),
            whitelists: Vec::new(),
        }
    }

    /// Append a whitelist of `(signer, public key)` pairs.
    pub fn with_whitelist(mut self, credentials: &[(&str, &[u8])]) -> Self {
        self.whitelists.push(
            credentials
                .iter()
                .map(|(signer, key)| CredentialConfig {
                    signer: signer.to_string(),
                    public_key: encode_b64(key),
                })
                .collect(),
        );
        self
    }

    /// Decode keys, build the policy, and validate every whitelist key.
    ///
    /// # Errors
    ///
    /// Returns `CardError::InvalidFormat` for bad base64,
    /// `CardError::InvalidKey` for a bad service key, or
    /// `CardError::InvalidWhitelistKey` for a bad whitelist key.
    pub fn build_policy<C: CardCrypto>(&self, crypto: C) -> Result<TrustPolicy<C>> {
        let service_key = decode_b64("service public key", &self.service_public_key)?;

        let whitelists = self
            .whitelists
            .iter()
            .map(|credentials| {
                credentials
                    .iter()
                    .map(|c| {
                        Ok(VerifierCredential::new(
                            c.signer.clone(),
                            decode_b64("whitelist public key", &c.public_key)?,
                        ))
                    })
                    .collect::<Result<Vec<_>>>()
                    .map(Whitelist::new)
            })
            .collect::<Result<Vec<_>>>()?;

        let policy = TrustPolicy::builder(crypto, &service_key)
            .verify_self_signature(self.verify_self_signature)
            .verify_service_signature(self.verify_service_signature)
            .self_signer(self.self_signer.clone())
            .service_signer(self.service_signer.clone())
            .whitelists(whitelists)
            .build()?;

        policy.validate_whitelists()?;
        Ok(policy)
    }
}

impl PolicyFile {
    pub fn new(policy: PolicyConfig) -> Self {
        Self {
            version: POLICY_FILE_VERSION,
            policy,
        }
    }

    /// Parse a policy file from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: PolicyFile = serde_json::from_str(json)
            .map_err(|e| CardError::InvalidFileFormat(format!("policy file: {e}")))?;

        if file.version != POLICY_FILE_VERSION {
            return Err(CardError::InvalidFileFormat(format!(
                "unsupported policy file version {} (expected {})",
                file.version, POLICY_FILE_VERSION
            )));
        }
        Ok(file)
    }

    /// Load a policy file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Write the policy file to disk as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CardError::SerializationError(e.to_string()))?;
        std::fs::write(path, json.as_bytes())?;
        Ok(())
    }
}
