//! Canonical signing input
//!
//! `BASE64URL(header) || "." || BASE64URL(payload)`, unpadded. Header and
//! payload are serialized independently and the result is rebuilt on every
//! call, never cached.

use crate::error::{JwsError, Result};
use crate::types::{Header, Payload};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

/// Build the signing input for `header` and `payload`.
///
/// # Errors
/// Returns `JwsError::Serialization` if either part cannot be serialized.
pub fn build(header: &Header, payload: &Payload) -> Result<String> {
    let header_json =
        serde_json::to_vec(header).map_err(|e| JwsError::serialization(e.to_string()))?;
    let header_b64 = base64_url_encode(&header_json);
    let payload_b64 = base64_url_encode(&payload.to_bytes()?);

    let mut signing_input = String::with_capacity(header_b64.len() + 1 + payload_b64.len());
    signing_input.push_str(&header_b64);
    signing_input.push('.');
    signing_input.push_str(&payload_b64);
    Ok(signing_input)
}

/// Base64 URL-safe encoding without padding (RFC 7515)
#[inline]
pub(crate) fn base64_url_encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Base64 URL-safe decoding without padding (RFC 7515)
#[inline]
pub(crate) fn base64_url_decode(input: &str) -> Result<Vec<u8>> {
    Ok(URL_SAFE_NO_PAD.decode(input)?)
}
