//! Raw signed model — the wire form of a card.
//!
//! JSON format:
//! ```json
//! {
//!     "contentSnapshot": "<base64 content JSON>",
//!     "signatures": [
//!         { "signer": "self", "signature": "<base64>", "snapshot": "<base64, optional>" }
//!     ]
//! }
//! ```
//! A card exported "as base64" is the base64 of that JSON document.

use serde::{Deserialize, Serialize};

use crate::error::{CardError, Result};

use super::content::RawCardContent;
use super::{decode_b64, encode_b64};

/// One signature as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSignature {
    /// Signer identifier.
    pub signer: String,
    /// Base64 signature bytes.
    pub signature: String,
    /// Base64 extra bytes the signer committed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<String>,
}

/// A card's content snapshot together with the signatures over it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSignedModel {
    /// Base64 content snapshot.
    #[serde(rename = "contentSnapshot")]
    pub content_snapshot: String,
    /// Signatures in the order they were added.
    #[serde(default)]
    pub signatures: Vec<RawSignature>,
}

impl RawSignedModel {
    /// Create an unsigned model from raw snapshot bytes.
    pub fn new(content_snapshot: &[u8]) -> Self {
        Self {
            content_snapshot: encode_b64(content_snapshot),
            signatures: Vec::new(),
        }
    }

    /// Create an unsigned model from card content.
    pub fn from_content(content: &RawCardContent) -> Result<Self> {
        Ok(Self::new(&content.snapshot()?))
    }

    /// Decode the content snapshot bytes.
    pub fn content_snapshot_bytes(&self) -> Result<Vec<u8>> {
        decode_b64("content snapshot", &self.content_snapshot)
    }

    /// Parse a model from its JSON form.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CardError::InvalidFormat(e.to_string()))
    }

    /// Serialize the model to JSON.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| CardError::SerializationError(e.to_string()))
    }

    /// Parse a model from base64-encoded JSON.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let json = decode_b64("card", encoded.trim())?;
        serde_json::from_slice(&json).map_err(|e| CardError::InvalidFormat(e.to_string()))
    }

    /// Serialize the model to base64-encoded JSON.
    pub fn to_base64(&self) -> Result<String> {
        Ok(encode_b64(self.to_json_string()?.as_bytes()))
    }

    /// Does the model already carry a signature from `signer`?
    pub fn has_signer(&self, signer: &str) -> bool {
        self.signatures.iter().any(|s| s.signer == signer)
    }
}
