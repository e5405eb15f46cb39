//! Compact serialization
//!
//! `BASE64URL(header) || "." || BASE64URL(payload) || "." || BASE64URL(signature)`

use crate::algorithms::Registry;
use crate::context::Jws;
use crate::error::{JwsError, Result};
use crate::keys::{SigningKey, VerifyingKey};
use crate::signing_input::base64_url_decode;
use crate::types::{Header, Payload};

/// A compact JWS split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Decoded protected header
    pub header: Header,
    /// Decoded payload; its `to_bytes` are exactly the transmitted bytes
    pub payload: Payload,
    /// Raw signature bytes
    pub signature: Vec<u8>,
    signing_input: String,
}

impl Decoded {
    /// The first two segments exactly as they appeared in the token.
    #[must_use]
    pub fn signing_input(&self) -> &str {
        &self.signing_input
    }
}

/// Sign `payload` under `header` and return the full compact token.
///
/// # Errors
/// Fails as [`Jws::set_header`] and [`Jws::sign`] do.
pub fn encode<'k>(
    header: &Header,
    payload: &Payload,
    key: impl Into<SigningKey<'k>>,
) -> Result<String> {
    let jws = Jws::new()
        .with_header(header.clone())?
        .with_payload(payload.clone());
    let signature = jws.sign(key)?;
    let mut token = jws.signing_input()?;
    token.push('.');
    token.push_str(&signature);
    Ok(token)
}

/// Split and decode a compact token without checking its signature.
///
/// # Errors
/// Returns `JwsError::Decode` if the token does not have three base64url
/// segments or its header is not JSON, and `JwsError::InvalidHeader` if the
/// header is JSON but not an object.
pub fn decode(token: &str) -> Result<Decoded> {
    let mut parts = token.split('.');
    let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(JwsError::decode("compact JWS must have exactly three segments"));
    };

    let header_json = base64_url_decode(header_b64)?;
    let header: serde_json::Value = serde_json::from_slice(&header_json)
        .map_err(|e| JwsError::decode(format!("header is not JSON: {e}")))?;
    let header = Header::try_from(header)?;
    let payload = Payload::from_decoded(base64_url_decode(payload_b64)?);
    let signature = base64_url_decode(signature_b64)?;

    Ok(Decoded {
        header,
        payload,
        signature,
        signing_input: format!("{header_b64}.{payload_b64}"),
    })
}

/// Decode `token` and check its signature against the default registry.
///
/// # Errors
/// See [`verify_with`].
pub fn verify<'k>(token: &str, key: impl Into<VerifyingKey<'k>>) -> Result<Decoded> {
    verify_with(token, key, &Registry::default())
}

/// Decode `token`, resolve its `alg` through `registry`, and check the
/// signature. The signature covers the token's segments as transmitted.
///
/// # Errors
/// Returns `JwsError::Decode` for malformed tokens, `JwsError::InvalidHeader`
/// if `alg` is missing or not in `registry`, and `JwsError::Signature` if the
/// signature does not match.
pub fn verify_with<'k>(
    token: &str,
    key: impl Into<VerifyingKey<'k>>,
    registry: &Registry,
) -> Result<Decoded> {
    let decoded = decode(token)?;
    let alg = decoded
        .header
        .alg()
        .ok_or_else(|| JwsError::invalid_header("JWS header must have an `alg` parameter"))?;
    let algorithm = registry
        .resolve(alg)
        .map_err(|e| JwsError::from_resolution(alg, e))?;

    algorithm.verify(decoded.signing_input.as_bytes(), &decoded.signature, key)?;
    Ok(decoded)
}
