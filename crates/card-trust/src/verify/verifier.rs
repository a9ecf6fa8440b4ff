//! Card verifier — the single trust decision.
//!
//! `verify_card` is the conjunction of three checks, evaluated in order
//! and short-circuiting on the first failure:
//! 1. Self signature (if required), against the card's own public key
//! 2. Service signature (if required), against the policy's trust anchor
//! 3. Every whitelist (an empty set of whitelists holds vacuously)
//!
//! The verdict is deliberately a bare `bool`. Use `explain_card` when a
//! breakdown is needed for diagnostics.

use crate::card::Card;
use crate::crypto::CardCrypto;

use super::policy::TrustPolicy;
use super::primitive::verify_signer;
use super::whitelist::resolve_and_verify;

/// A strategy deciding whether a card is trusted.
pub trait CardVerifier: Send + Sync {
    fn verify_card(&self, card: &Card) -> bool;
}

impl<C: CardCrypto> CardVerifier for TrustPolicy<C> {
    fn verify_card(&self, card: &Card) -> bool {
        verify_card(card, self)
    }
}

/// Is `card` trusted under `policy`?
pub fn verify_card<C: CardCrypto>(card: &Card, policy: &TrustPolicy<C>) -> bool {
    self_signature_holds(card, policy)
        && service_signature_holds(card, policy)
        && whitelists_hold(card, policy)
}

fn self_signature_holds<C: CardCrypto>(card: &Card, policy: &TrustPolicy<C>) -> bool {
    if !policy.verify_self_signature() {
        return true;
    }

    let crypto = policy.crypto();
    let Ok(key) = crypto.import_public_key(&card.public_key) else {
        log::debug!("card {}: subject public key cannot be imported", card.id);
        return false;
    };

    let valid = verify_signer(crypto, card, policy.self_signer(), &key);
    if !valid {
        log::debug!("card {}: self signature check failed", card.id);
    }
    valid
}

fn service_signature_holds<C: CardCrypto>(
    card: &Card,
    policy: &TrustPolicy<C>,
) -> bool {
    if !policy.verify_service_signature() {
        return true;
    }

    let valid = verify_signer(
        policy.crypto(),
        card,
        policy.service_signer(),
        policy.service_public_key(),
    );
    if !valid {
        log::debug!("card {}: service signature check failed", card.id);
    }
    valid
}

fn whitelists_hold<C: CardCrypto>(card: &Card, policy: &TrustPolicy<C>) -> bool {
    policy.whitelists().iter().enumerate().all(|(index, whitelist)| {
        let valid = resolve_and_verify(policy.crypto(), card, whitelist);
        if !valid {
            log::debug!("card {}: whitelist {index} not satisfied", card.id);
        }
        valid
    })
}
