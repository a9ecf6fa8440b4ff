//! Whitelists — groups of trusted third-party signers.
//!
//! A card satisfies a whitelist when it carries a valid signature from a
//! credential in that whitelist. Resolution is first-match: the first
//! credential (in whitelist order) whose signer id appears anywhere on the
//! card is the only one tried. A later credential sharing that signer id
//! is never consulted, even if the first one fails.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::crypto::CardCrypto;

use super::primitive::verify_signer;

/// A trusted signer's identity and public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierCredential {
    pub signer: String,
    pub public_key: Vec<u8>,
}

impl VerifierCredential {
    pub fn new(signer: impl Into<String>, public_key: impl Into<Vec<u8>>) -> Self {
        Self {
            signer: signer.into(),
            public_key: public_key.into(),
        }
    }
}

/// Ordered credentials, any one of which satisfies the whitelist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Whitelist {
    credentials: Vec<VerifierCredential>,
}

impl Whitelist {
    pub fn new(credentials: Vec<VerifierCredential>) -> Self {
        Self { credentials }
    }

    pub fn credentials(&self) -> &[VerifierCredential] {
        &self.credentials
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// First credential whose signer id is present on `card`.
    pub fn select(&self, card: &Card) -> Option<&VerifierCredential> {
        let present: HashSet<&str> = card.signers().collect();
        self.credentials
            .iter()
            .find(|c| present.contains(c.signer.as_str()))
    }
}

/// Outcome of resolving one whitelist against a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhitelistOutcome {
    /// No credential's signer signed the card.
    NoMatchingSigner,
    /// The selected credential's key could not be imported.
    KeyImportFailed { signer: String },
    /// The selected signer's signature did not verify.
    InvalidSignature { signer: String },
    Verified { signer: String },
}

impl WhitelistOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, WhitelistOutcome::Verified { .. })
    }
}

/// Resolve `whitelist` against `card`, reporting how it was decided.
pub fn resolve<C: CardCrypto>(crypto: &C, card: &Card, whitelist: &Whitelist) -> WhitelistOutcome {
    let Some(credential) = whitelist.select(card) else {
        return WhitelistOutcome::NoMatchingSigner;
    };
    let signer = credential.signer.clone();

    let key = match crypto.import_public_key(&credential.public_key) {
        Ok(key) => key,
        Err(e) => {
            log::warn!("whitelist credential '{signer}' has an unusable key: {e}");
            return WhitelistOutcome::KeyImportFailed { signer };
        }
    };

    if verify_signer(crypto, card, &signer, &key) {
        WhitelistOutcome::Verified { signer }
    } else {
        WhitelistOutcome::InvalidSignature { signer }
    }
}

/// Does `card` satisfy `whitelist`?
pub fn resolve_and_verify<C: CardCrypto>(crypto: &C, card: &Card, whitelist: &Whitelist) -> bool {
    resolve(crypto, card, whitelist).is_valid()
}
