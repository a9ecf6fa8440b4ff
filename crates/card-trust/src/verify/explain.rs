//! Verification explanation — a diagnostic breakdown of a trust decision.
//!
//! This sits beside `verify_card`, not inside it: the verdict stays a bare
//! boolean, and callers that need to know why a card was rejected (logs,
//! operator tooling) ask here. Every check is evaluated; nothing
//! short-circuits.

use crate::card::{Card, CardId};
use crate::crypto::CardCrypto;

use super::policy::TrustPolicy;
use super::primitive::{check_signer, SignatureCheck};
use super::whitelist::{resolve, WhitelistOutcome};

/// Outcome of one fixed-role signature check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The policy does not require this check.
    Skipped,
    /// No signature from the required signer.
    Missing,
    /// The required signature (or the key it needs) is invalid.
    Invalid,
    Valid,
}

impl CheckOutcome {
    /// Does this outcome let the card through?
    pub fn holds(self) -> bool {
        matches!(self, CheckOutcome::Skipped | CheckOutcome::Valid)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CheckOutcome::Skipped => "skipped",
            CheckOutcome::Missing => "missing",
            CheckOutcome::Invalid => "invalid",
            CheckOutcome::Valid => "valid",
        }
    }
}

impl From<SignatureCheck> for CheckOutcome {
    fn from(check: SignatureCheck) -> Self {
        match check {
            SignatureCheck::Missing => CheckOutcome::Missing,
            SignatureCheck::Invalid => CheckOutcome::Invalid,
            SignatureCheck::Valid => CheckOutcome::Valid,
        }
    }
}

/// Breakdown of verifying a card against a policy.
#[derive(Debug, Clone)]
pub struct CardVerification {
    pub card_id: CardId,
    pub self_signature: CheckOutcome,
    pub service_signature: CheckOutcome,
    /// One outcome per policy whitelist, in policy order.
    pub whitelists: Vec<WhitelistOutcome>,
    /// Overall verdict; always equal to `verify_card`.
    pub is_valid: bool,
    /// Verification timestamp (seconds since Unix epoch).
    pub verified_at: u64,
}

/// Explain how `card` fares under `policy`.
pub fn explain_card<C: CardCrypto>(card: &Card, policy: &TrustPolicy<C>) -> CardVerification {
    let crypto = policy.crypto();

    let self_signature = if !policy.verify_self_signature() {
        CheckOutcome::Skipped
    } else {
        match crypto.import_public_key(&card.public_key) {
            Ok(key) => check_signer(crypto, card, policy.self_signer(), &key).into(),
            Err(_) if card.signature_by(policy.self_signer()).is_none() => CheckOutcome::Missing,
            Err(_) => CheckOutcome::Invalid,
        }
    };

    let service_signature = if !policy.verify_service_signature() {
        CheckOutcome::Skipped
    } else {
        check_signer(
            crypto,
            card,
            policy.service_signer(),
            policy.service_public_key(),
        )
        .into()
    };

    let whitelists: Vec<WhitelistOutcome> = policy
        .whitelists()
        .iter()
        .map(|whitelist| resolve(crypto, card, whitelist))
        .collect();

    let is_valid = self_signature.holds()
        && service_signature.holds()
        && whitelists.iter().all(WhitelistOutcome::is_valid);

    CardVerification {
        card_id: card.id.clone(),
        self_signature,
        service_signature,
        whitelists,
        is_valid,
        verified_at: crate::time::now_secs(),
    }
}
