//! Card signing.
//!
//! Each signer signs `content_snapshot ++ extra`, where `extra` is an
//! optional snapshot of additional data the signer commits to. A model
//! carries at most one signature per signer when built through here.

use ed25519_dalek::SigningKey;

use crate::crypto::signing;
use crate::error::{CardError, Result};
use crate::verify::SELF_SIGNER;

use super::encode_b64;
use super::raw::{RawSignature, RawSignedModel};

/// Signs raw card models with one key.
pub struct CardSigner<'a> {
    signing_key: &'a SigningKey,
}

impl<'a> CardSigner<'a> {
    pub fn new(signing_key: &'a SigningKey) -> Self {
        Self { signing_key }
    }

    /// Append a signature by `signer`.
    pub fn sign(&self, raw: &mut RawSignedModel, signer: &str, extra: Option<&[u8]>) -> Result<()> {
        if raw.has_signer(signer) {
            return Err(CardError::DuplicateSigner(signer.to_string()));
        }

        let mut message = raw.content_snapshot_bytes()?;
        if let Some(extra) = extra {
            message.extend_from_slice(extra);
        }

        let signature = signing::sign(self.signing_key, &message);
        raw.signatures.push(RawSignature {
            signer: signer.to_string(),
            signature: encode_b64(&signature),
            snapshot: extra.map(encode_b64),
        });

        log::debug!("added '{signer}' signature");
        Ok(())
    }

    /// Append the subject's own signature.
    pub fn self_sign(&self, raw: &mut RawSignedModel, extra: Option<&[u8]>) -> Result<()> {
        self.sign(raw, SELF_SIGNER, extra)
    }
}
