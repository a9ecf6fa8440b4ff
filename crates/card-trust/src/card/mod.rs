//! Cards — signed identity records and their wire form.
//!
//! The card module provides:
//! - The raw signed model (base64 content snapshot + raw signatures)
//! - The content structure the snapshot encodes
//! - Parsing a raw model into an immutable `Card`
//! - Signing raw models as self, service, or third-party signers
//! - Import helpers that parse and verify in one step

pub mod card;
pub mod content;
pub mod import;
pub mod raw;
pub mod signer;

pub use card::{parse_card, Card, CardId, CardSignature};
pub use content::{RawCardContent, CARD_VERSION};
pub use import::{import_card_from_base64, import_card_from_json, import_card_from_raw};
pub use raw::{RawSignature, RawSignedModel};
pub use signer::CardSigner;

pub(crate) fn encode_b64(bytes: &[u8]) -> String {
    base64::Engine::encode(&base64::engine::general_purpose::STANDARD, bytes)
}

pub(crate) fn decode_b64(field: &str, value: &str) -> crate::error::Result<Vec<u8>> {
    base64::Engine::decode(&base64::engine::general_purpose::STANDARD, value)
        .map_err(|e| crate::error::CardError::InvalidFormat(format!("invalid base64 {field}: {e}")))
}
