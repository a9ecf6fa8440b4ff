//! Trust policies — the immutable rule set a card is verified against.
//!
//! A policy is built once and shared across any number of verifications.
//! The service public key is the trust anchor for the issuing authority and
//! is imported at build time, so a bad anchor is a configuration error
//! rather than a per-card rejection. Whitelist keys are imported lazily and
//! fail closed per card; `validate_whitelists` checks them up front.

use crate::crypto::CardCrypto;
use crate::error::{CardError, Result};

use super::whitelist::Whitelist;
use super::{SELF_SIGNER, SERVICE_SIGNER};

/// Immutable card trust policy.
pub struct TrustPolicy<C: CardCrypto> {
    crypto: C,
    verify_self_signature: bool,
    verify_service_signature: bool,
    self_signer: String,
    service_signer: String,
    service_public_key: C::PublicKey,
    whitelists: Vec<Whitelist>,
}

impl<C: CardCrypto> TrustPolicy<C> {
    /// Start building a policy anchored on `service_public_key`.
    pub fn builder(crypto: C, service_public_key: &[u8]) -> TrustPolicyBuilder<C> {
        TrustPolicyBuilder::new(crypto, service_public_key)
    }

    pub fn crypto(&self) -> &C {
        &self.crypto
    }

    pub fn verify_self_signature(&self) -> bool {
        self.verify_self_signature
    }

    pub fn verify_service_signature(&self) -> bool {
        self.verify_service_signature
    }

    pub fn self_signer(&self) -> &str {
        &self.self_signer
    }

    pub fn service_signer(&self) -> &str {
        &self.service_signer
    }

    pub fn service_public_key(&self) -> &C::PublicKey {
        &self.service_public_key
    }

    pub fn whitelists(&self) -> &[Whitelist] {
        &self.whitelists
    }

    /// Check that every whitelist credential key can be imported.
    ///
    /// # Errors
    ///
    /// Returns `CardError::InvalidWhitelistKey` naming the first bad
    /// credential.
    pub fn validate_whitelists(&self) -> Result<()> {
        for (index, whitelist) in self.whitelists.iter().enumerate() {
            for credential in whitelist.credentials() {
                if self.crypto.import_public_key(&credential.public_key).is_err() {
                    return Err(CardError::InvalidWhitelistKey {
                        whitelist: index,
                        signer: credential.signer.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl<C: CardCrypto + std::fmt::Debug> std::fmt::Debug for TrustPolicy<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustPolicy")
            .field("crypto", &self.crypto)
            .field("verify_self_signature", &self.verify_self_signature)
            .field("verify_service_signature", &self.verify_service_signature)
            .field("self_signer", &self.self_signer)
            .field("service_signer", &self.service_signer)
            .field("whitelists", &self.whitelists.len())
            .finish_non_exhaustive()
    }
}

/// Builder for trust policies.
pub struct TrustPolicyBuilder<C: CardCrypto> {
    crypto: C,
    service_public_key: Vec<u8>,
    verify_self_signature: bool,
    verify_service_signature: bool,
    self_signer: String,
    service_signer: String,
    whitelists: Vec<Whitelist>,
}

impl<C: CardCrypto> TrustPolicyBuilder<C> {
    /// Both fixed-role checks are on by default, with no whitelists.
    pub fn new(crypto: C, service_public_key: &[u8]) -> Self {
        Self {
            crypto,
            service_public_key: service_public_key.to_vec(),
            verify_self_signature: true,
            verify_service_signature: true,
            self_signer: SELF_SIGNER.to_string(),
            service_signer: SERVICE_SIGNER.to_string(),
            whitelists: Vec::new(),
        }
    }

    /// Require (or not) the card subject's own signature.
    pub fn verify_self_signature(mut self, enabled: bool) -> Self {
        self.verify_self_signature = enabled;
        self
    }

    /// Require (or not) the issuing service's signature.
    pub fn verify_service_signature(mut self, enabled: bool) -> Self {
        self.verify_service_signature = enabled;
        self
    }

    /// Override the signer id used for self signatures.
    pub fn self_signer(mut self, signer: impl Into<String>) -> Self {
        self.self_signer = signer.into();
        self
    }

    /// Override the signer id used for service signatures.
    pub fn service_signer(mut self, signer: impl Into<String>) -> Self {
        self.service_signer = signer.into();
        self
    }

    /// Add a whitelist. Every whitelist must be satisfied.
    pub fn whitelist(mut self, whitelist: Whitelist) -> Self {
        self.whitelists.push(whitelist);
        self
    }

    /// Add multiple whitelists.
    pub fn whitelists(mut self, whitelists: Vec<Whitelist>) -> Self {
        self.whitelists.extend(whitelists);
        self
    }

    /// Import the service key and freeze the policy.
    ///
    /// # Errors
    ///
    /// Returns `CardError::InvalidKey` if the service key cannot be imported.
    pub fn build(self) -> Result<TrustPolicy<C>> {
        let service_public_key = self
            .crypto
            .import_public_key(&self.service_public_key)
            .map_err(|e| CardError::InvalidKey(format!("service public key: {e}")))?;

        log::debug!(
            "trust policy built: self={}, service={}, whitelists={}",
            self.verify_self_signature,
            self.verify_service_signature,
            self.whitelists.len()
        );

        Ok(TrustPolicy {
            crypto: self.crypto,
            verify_self_signature: self.verify_self_signature,
            verify_service_signature: self.verify_service_signature,
            self_signer: self.self_signer,
            service_signer: self.service_signer,
            service_public_key,
            whitelists: self.whitelists,
        })
    }
}
