//! Card trust verification.
//!
//! The verify module provides:
//! - The signature verification primitive (one signer, one key)
//! - Whitelists of trusted third-party signers and their resolver
//! - Immutable trust policies and their builder
//! - The boolean card verifier and its `CardVerifier` trait
//! - A separate explanation API for diagnostics
//!
//! A card is trusted only if every required check holds: the subject's
//! self signature, the issuing service's signature, and at least one
//! credential from EACH whitelist.

pub mod explain;
pub mod policy;
pub mod primitive;
pub mod verifier;
pub mod whitelist;

/// Default signer identifier for the subject's own signature.
pub const SELF_SIGNER: &str = "self";

/// Default signer identifier for the issuing service's signature.
pub const SERVICE_SIGNER: &str = "service";

pub use explain::{explain_card, CardVerification, CheckOutcome};
pub use policy::{TrustPolicy, TrustPolicyBuilder};
pub use primitive::{check_signer, verify_signer, SignatureCheck};
pub use verifier::{verify_card, CardVerifier};
pub use whitelist::{resolve, resolve_and_verify, VerifierCredential, Whitelist, WhitelistOutcome};
