//! Error types for card-trust.
//!
//! Errors here are structural: malformed keys, malformed card files,
//! unreadable policy files. A card that simply fails verification is not
//! an error from the verifier's point of view; it yields `false`.

/// Card error types covering parsing, configuration and import.
#[derive(Debug, thiserror::Error)]
pub enum CardError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid key for signer '{signer}' in whitelist {whitelist}")]
    InvalidWhitelistKey { whitelist: usize, signer: String },

    #[error("Invalid card format: {0}")]
    InvalidFormat(String),

    #[error("Card already signed by '{0}'")]
    DuplicateSigner(String),

    #[error("Card is not verified")]
    CardNotVerified,

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, CardError>;
