//! Cryptographic primitives for card-trust.
//!
//! This module provides:
//! - Ed25519 key pairs and public key import (raw or SPKI DER)
//! - Ed25519 signing and verification helpers
//! - The `CardCrypto` provider capability the verifier delegates to

pub mod keys;
pub mod provider;
pub mod signing;

pub use keys::Ed25519KeyPair;
pub use provider::{CardCrypto, Ed25519CardCrypto};
