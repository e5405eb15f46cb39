//! JWS error types

use thiserror::Error;

/// JWS operation result type
pub type Result<T> = std::result::Result<T, JwsError>;

/// JWS error types
///
/// Every failure in this crate is reported as one of these variants; nothing
/// is retried or swallowed internally.
#[derive(Debug, Error)]
pub enum JwsError {
    /// Header has no `alg` parameter, or its `alg` cannot be resolved
    #[error("Invalid JWS header: {reason}")]
    InvalidHeader {
        /// What is wrong with the header
        reason: String,
        /// Underlying resolution failure, if any
        #[source]
        source: Option<Box<JwsError>>,
    },

    /// `sign`/`verify` was called before a header resolved an algorithm
    #[error("No signing algorithm resolved; set a header before signing or verifying")]
    MissingAlgorithm,

    /// Identifier is not one this registry offers
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Malformed base64url, compact token or embedded JSON
    #[error("Decode error: {0}")]
    Decode(String),

    /// Cryptographic verification failed
    #[error("Could not validate signature")]
    Signature,

    /// Key material could not be imported for the resolved algorithm
    #[error("Invalid key format: {0}")]
    KeyFormat(String),

    /// Header or payload could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl JwsError {
    /// Create an invalid header error with no underlying cause
    #[must_use]
    pub fn invalid_header(reason: impl Into<String>) -> Self {
        Self::InvalidHeader {
            reason: reason.into(),
            source: None,
        }
    }

    /// Create an unsupported algorithm error
    #[must_use]
    pub fn unsupported_algorithm(alg: impl Into<String>) -> Self {
        Self::UnsupportedAlgorithm(alg.into())
    }

    /// Create a decode error
    #[must_use]
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a key format error
    #[must_use]
    pub fn key_format(msg: impl Into<String>) -> Self {
        Self::KeyFormat(msg.into())
    }

    /// Create a serialization error
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Wrap a resolution failure as an invalid header
    pub(crate) fn from_resolution(alg: &str, cause: JwsError) -> Self {
        Self::InvalidHeader {
            reason: format!("`alg` value {alg:?} is not supported"),
            source: Some(Box::new(cause)),
        }
    }
}

impl From<base64::DecodeError> for JwsError {
    fn from(e: base64::DecodeError) -> Self {
        Self::Decode(format!("invalid base64url: {e}"))
    }
}
