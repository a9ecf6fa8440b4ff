//! Signature verification primitive.
//!
//! Decides whether one signer's claim on a card holds under one key.
//! Only the first signature carrying the signer id is considered.

use crate::card::Card;
use crate::crypto::CardCrypto;

/// Outcome of checking a single signer's claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureCheck {
    /// The card carries no signature from this signer.
    Missing,
    /// A signature is present but does not verify.
    Invalid,
    Valid,
}

impl SignatureCheck {
    pub fn is_valid(self) -> bool {
        matches!(self, SignatureCheck::Valid)
    }
}

/// Check `signer`'s signature on `card` against `key`.
pub fn check_signer<C: CardCrypto>(
    crypto: &C,
    card: &Card,
    signer: &str,
    key: &C::PublicKey,
) -> SignatureCheck {
    let Some(signature) = card.signature_by(signer) else {
        return SignatureCheck::Missing;
    };

    let extra = signature.snapshot.as_deref().unwrap_or_default();
    let mut message = Vec::with_capacity(card.content_snapshot.len() + extra.len());
    message.extend_from_slice(&card.content_snapshot);
    message.extend_from_slice(extra);

    if crypto.verify_signature(&signature.signature, &message, key) {
        SignatureCheck::Valid
    } else {
        SignatureCheck::Invalid
    }
}

/// Is `signer`'s signature on `card` valid under `key`?
pub fn verify_signer<C: CardCrypto>(
    crypto: &C,
    card: &Card,
    signer: &str,
    key: &C::PublicKey,
) -> bool {
    check_signer(crypto, card, signer, key).is_valid()
}
