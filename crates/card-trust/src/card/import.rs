//! Card import — parse a wire-encoded card and verify it in one step.
//!
//! A card that parses but is rejected by the verifier yields
//! `CardError::CardNotVerified`, with no indication of which check failed.

use crate::error::{CardError, Result};
use crate::verify::CardVerifier;

use super::card::{parse_card, Card};
use super::raw::RawSignedModel;

/// Parse and verify a raw signed model.
pub fn import_card_from_raw(raw: &RawSignedModel, verifier: &dyn CardVerifier) -> Result<Card> {
    let card = parse_card(raw)?;
    if !verifier.verify_card(&card) {
        log::debug!("card {} rejected on import", card.id);
        return Err(CardError::CardNotVerified);
    }
    Ok(card)
}

/// Parse and verify a card from its JSON form.
pub fn import_card_from_json(json: &str, verifier: &dyn CardVerifier) -> Result<Card> {
    import_card_from_raw(&RawSignedModel::from_json_str(json)?, verifier)
}

/// Parse and verify a card from base64-encoded JSON.
pub fn import_card_from_base64(encoded: &str, verifier: &dyn CardVerifier) -> Result<Card> {
    import_card_from_raw(&RawSignedModel::from_base64(encoded)?, verifier)
}
