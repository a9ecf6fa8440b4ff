//! Parsed cards.
//!
//! A `Card` is produced once from a `RawSignedModel` and never mutated.
//! Parsing decodes the wire form; it does not verify anything.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

use crate::error::Result;

use super::content::RawCardContent;
use super::raw::{RawSignature, RawSignedModel};
use super::{decode_b64, encode_b64};

/// Content-derived card identifier.
///
/// Format: lowercase hex of the first 32 bytes of SHA-512(content_snapshot).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub String);

impl CardId {
    /// Compute the identifier of a content snapshot.
    pub fn from_snapshot(snapshot: &[u8]) -> Self {
        let hash = Sha512::digest(snapshot);
        Self(hex::encode(&hash[..32]))
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One signer's claim on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSignature {
    pub signer: String,
    pub signature: Vec<u8>,
    /// Extra bytes appended to the content snapshot before verification.
    pub snapshot: Option<Vec<u8>>,
}

/// An immutable, parsed identity card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: CardId,
    pub identity: String,
    /// Subject public key bytes, checked against the self signature.
    pub public_key: Vec<u8>,
    pub version: String,
    pub created_at: u64,
    pub previous_card_id: Option<CardId>,
    pub content_snapshot: Vec<u8>,
    /// Signatures in wire order. Signer ids may repeat.
    pub signatures: Vec<CardSignature>,
}

impl Card {
    /// Signer identifiers in signature order.
    pub fn signers(&self) -> impl Iterator<Item = &str> {
        self.signatures.iter().map(|s| s.signer.as_str())
    }

    /// First signature made by `signer`.
    pub fn signature_by(&self, signer: &str) -> Option<&CardSignature> {
        self.signatures.iter().find(|s| s.signer == signer)
    }

    /// Rebuild the wire form of this card.
    pub fn to_raw(&self) -> RawSignedModel {
        RawSignedModel {
            content_snapshot: encode_b64(&self.content_snapshot),
            signatures: self
                .signatures
                .iter()
                .map(|s| RawSignature {
                    signer: s.signer.clone(),
                    signature: encode_b64(&s.signature),
                    snapshot: s.snapshot.as_deref().map(encode_b64),
                })
                .collect(),
        }
    }
}

/// Parse a raw signed model into a card.
///
/// The subject key is carried as bytes and only imported when a self
/// signature check runs, so an unimportable key never blocks parsing.
pub fn parse_card(raw: &RawSignedModel) -> Result<Card> {
    let content_snapshot = raw.content_snapshot_bytes()?;
    let content = RawCardContent::from_snapshot(&content_snapshot)?;
    let public_key = decode_b64("public key", &content.public_key)?;

    let signatures = raw
        .signatures
        .iter()
        .map(|s| {
            Ok(CardSignature {
                signer: s.signer.clone(),
                signature: decode_b64("signature", &s.signature)?,
                snapshot: s
                    .snapshot
                    .as_deref()
                    .map(|snap| decode_b64("signature snapshot", snap))
                    .transpose()?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Card {
        id: CardId::from_snapshot(&content_snapshot),
        identity: content.identity,
        public_key,
        version: content.version,
        created_at: content.created_at,
        previous_card_id: content.previous_card_id.map(CardId),
        content_snapshot,
        signatures,
    })
}
