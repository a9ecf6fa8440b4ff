//! card-trust — multi-party trust verification for signed identity cards.
//!
//! A card is a signed identity record. Several parties may sign it: the
//! subject itself, the issuing service, and any number of third parties.
//! A `TrustPolicy` says which of those signatures are required, and
//! `verify_card` returns a single fail-closed verdict.
//!
//! Provides card parsing and import, Ed25519 signing and verification,
//! whitelist-based group trust, policy files, and a diagnostic
//! explanation API alongside the boolean verifier.

pub mod card;
pub mod config;
pub mod crypto;
pub mod error;
pub mod time;
pub mod verify;

// Re-export primary types
pub use card::{parse_card, Card, CardId, CardSignature, CardSigner, RawCardContent, RawSignedModel};
pub use config::{PolicyConfig, PolicyFile};
pub use crypto::{CardCrypto, Ed25519CardCrypto, Ed25519KeyPair};
pub use error::{CardError, Result};
pub use verify::{
    explain_card, verify_card, CardVerification, CardVerifier, CheckOutcome, TrustPolicy,
    TrustPolicyBuilder, VerifierCredential, Whitelist, WhitelistOutcome, SELF_SIGNER,
    SERVICE_SIGNER,
};
