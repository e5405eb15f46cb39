//! JSON Web Signature (JWS) compact signing and verification
//!
//! This crate provides:
//! - HS256/384/512, RS256 and ES256/384/512 algorithms
//! - A closed algorithm table with allow-list registries
//! - The canonical `header.payload` signing input
//! - A [`Jws`] context for repeated sign/verify over one header and payload
//! - Compact `header.payload.signature` tokens
//!
//! Key material is borrowed per call and never stored.
//!
//! ```
//! use cryypt_jws::{Header, Payload};
//! use serde_json::json;
//!
//! let header = Header::new("HS256");
//! let payload = Payload::from(json!({"sub": "1234"}));
//!
//! let signature = cryypt_jws::sign(&header, &payload, "secret")?;
//! cryypt_jws::verify(&header, &payload, &signature, "secret")?;
//! # Ok::<(), cryypt_jws::JwsError>(())
//! ```

pub mod algorithms;
pub mod compact;
mod context;
mod error;
pub mod keys;
pub mod signing_input;
mod types;

pub use algorithms::{Algorithm, BitDepth, Family, Registry};
pub use context::{Jws, State};
pub use error::{JwsError, Result};
pub use keys::{SigningKey, VerifyingKey};
pub use types::{Header, Payload, RESERVED_PARAMS};

/// Sign `payload` under `header`, returning the base64url signature.
///
/// # Errors
/// Returns `JwsError::InvalidHeader` if `header` has no usable `alg`, and
/// `JwsError::KeyFormat` if `key` does not suit that algorithm.
pub fn sign<'k>(
    header: &Header,
    payload: &Payload,
    key: impl Into<SigningKey<'k>>,
) -> Result<String> {
    Jws::new()
        .with_header(header.clone())?
        .with_payload(payload.clone())
        .sign(key)
}

/// Check a base64url `signature` over `header` and `payload`.
///
/// # Errors
/// Returns `JwsError::Signature` if the signature does not match, plus the
/// header, decoding and key errors of [`Jws::verify`].
pub fn verify<'k>(
    header: &Header,
    payload: &Payload,
    signature: &str,
    key: impl Into<VerifyingKey<'k>>,
) -> Result<()> {
    Jws::new()
        .with_header(header.clone())?
        .with_payload(payload.clone())
        .verify(signature, key)
}
