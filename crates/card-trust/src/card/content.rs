//! Card content — the structure encoded in a card's content snapshot.

use serde::{Deserialize, Serialize};

use crate::error::{CardError, Result};

/// Content format version written by this crate.
pub const CARD_VERSION: &str = "5.0";

/// Card content as it is serialized into the content snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCardContent {
    /// Subject the card asserts an identity for.
    pub identity: String,
    /// Base64 public key of the subject.
    pub public_key: String,
    /// Content format version.
    pub version: String,
    /// Creation timestamp (seconds since Unix epoch).
    pub created_at: u64,
    /// Card this one replaces, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_card_id: Option<String>,
}

impl RawCardContent {
    /// Build content for `identity` with the current time.
    pub fn new(identity: impl Into<String>, public_key: &[u8]) -> Self {
        Self {
            identity: identity.into(),
            public_key: super::encode_b64(public_key),
            version: CARD_VERSION.to_string(),
            created_at: crate::time::now_secs(),
            previous_card_id: None,
        }
    }

    /// Mark this content as replacing a previous card.
    pub fn with_previous_card_id(mut self, id: impl Into<String>) -> Self {
        self.previous_card_id = Some(id.into());
        self
    }

    /// Canonical snapshot bytes.
    pub fn snapshot(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| CardError::SerializationError(e.to_string()))
    }

    /// Parse content back out of snapshot bytes.
    pub fn from_snapshot(snapshot: &[u8]) -> Result<Self> {
        serde_json::from_slice(snapshot)
            .map_err(|e| CardError::InvalidFormat(format!("invalid card content: {e}")))
    }
}
