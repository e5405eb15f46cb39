//! JWS signing context
//!
//! A [`Jws`] holds at most one header, the algorithm resolved from it, and an
//! optional payload. Sign and verify are only reachable once a header has
//! resolved an algorithm.

use crate::algorithms::{Algorithm, Registry};
use crate::error::{JwsError, Result};
use crate::keys::{SigningKey, VerifyingKey};
use crate::signing_input::{self, base64_url_decode, base64_url_encode};
use crate::types::{Header, Payload};

/// Where a context is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// No header yet
    Empty,
    /// Header validated and algorithm resolved; payload defaults to `{}`
    HeaderSet,
    /// Header and payload both set
    Ready,
}

#[derive(Debug, Clone)]
struct Resolved {
    header: Header,
    algorithm: Algorithm,
}

/// JWS signing context.
///
/// Not meant for concurrent mutation; use one context per logical signing
/// operation, or share an [`Algorithm`] instead.
#[derive(Debug, Clone, Default)]
pub struct Jws {
    registry: Registry,
    resolved: Option<Resolved>,
    payload: Option<Payload>,
}

impl Jws {
    /// An empty context resolving against the default registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve algorithms against `registry` instead of the default one.
    ///
    /// A header already set is resolved again against `registry`.
    ///
    /// # Errors
    /// Returns `JwsError::InvalidHeader` if `registry` does not offer the
    /// algorithm of the header already set.
    pub fn with_registry(mut self, registry: Registry) -> Result<Self> {
        if let Some(resolved) = &self.resolved {
            let alg = resolved.algorithm.name();
            registry
                .resolve(alg)
                .map_err(|e| JwsError::from_resolution(alg, e))?;
        }
        self.registry = registry;
        Ok(self)
    }

    /// Consume the context and return it with `header` set.
    ///
    /// # Errors
    /// See [`Jws::set_header`].
    pub fn with_header(mut self, header: Header) -> Result<Self> {
        self.set_header(header)?;
        Ok(self)
    }

    /// Consume the context and return it with `payload` set.
    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<Payload>) -> Self {
        self.set_payload(payload);
        self
    }

    /// Validate `header`, resolve its `alg` and store both.
    ///
    /// On failure the context is left exactly as it was.
    ///
    /// # Errors
    /// Returns `JwsError::InvalidHeader` if `alg` is missing, not a string, or
    /// not offered by this context's registry.
    pub fn set_header(&mut self, header: Header) -> Result<()> {
        let alg = match header.get("alg") {
            None => return Err(JwsError::invalid_header("JWS header must have an `alg` parameter")),
            Some(value) => value
                .as_str()
                .ok_or_else(|| JwsError::invalid_header("`alg` must be a string"))?,
        };
        let algorithm = self
            .registry
            .resolve(alg)
            .map_err(|e| JwsError::from_resolution(alg, e))?;

        self.resolved = Some(Resolved { header, algorithm });
        Ok(())
    }

    /// Store `payload`. The resolved algorithm is untouched.
    pub fn set_payload(&mut self, payload: impl Into<Payload>) {
        self.payload = Some(payload.into());
    }

    /// Drop header, algorithm and payload, returning to [`State::Empty`].
    pub fn reset(&mut self) {
        self.resolved = None;
        self.payload = None;
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> State {
        match (&self.resolved, &self.payload) {
            (None, _) => State::Empty,
            (Some(_), None) => State::HeaderSet,
            (Some(_), Some(_)) => State::Ready,
        }
    }

    /// The validated header, if any.
    #[must_use]
    pub fn header(&self) -> Option<&Header> {
        self.resolved.as_ref().map(|r| &r.header)
    }

    /// The resolved algorithm, if any.
    #[must_use]
    pub fn algorithm(&self) -> Option<Algorithm> {
        self.resolved.as_ref().map(|r| r.algorithm)
    }

    /// The explicitly set payload, if any.
    #[must_use]
    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// The registry headers are resolved against.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The exact string that is signed and verified.
    ///
    /// # Errors
    /// Returns `JwsError::MissingAlgorithm` before a header is set, and
    /// `JwsError::Serialization` if header or payload cannot be serialized.
    pub fn signing_input(&self) -> Result<String> {
        let resolved = self.resolved.as_ref().ok_or(JwsError::MissingAlgorithm)?;
        self.build_input(&resolved.header)
    }

    /// Sign the current header and payload.
    ///
    /// Returns the signature as unpadded base64url.
    ///
    /// # Errors
    /// Returns `JwsError::MissingAlgorithm` before a header is set, and
    /// `JwsError::KeyFormat` if `key` does not suit the resolved algorithm.
    pub fn sign<'k>(&self, key: impl Into<SigningKey<'k>>) -> Result<String> {
        let resolved = self.resolved.as_ref().ok_or(JwsError::MissingAlgorithm)?;
        let input = self.build_input(&resolved.header)?;
        let signature = resolved.algorithm.sign(input.as_bytes(), key)?;
        Ok(base64_url_encode(&signature))
    }

    /// Check a base64url `signature` against the current header and payload.
    ///
    /// # Errors
    /// Returns `JwsError::MissingAlgorithm` before a header is set,
    /// `JwsError::Decode` if `signature` is not unpadded base64url, and
    /// `JwsError::Signature` if it does not match.
    pub fn verify<'k>(&self, signature: &str, key: impl Into<VerifyingKey<'k>>) -> Result<()> {
        let resolved = self.resolved.as_ref().ok_or(JwsError::MissingAlgorithm)?;
        let signature = base64_url_decode(signature)?;
        let input = self.build_input(&resolved.header)?;
        resolved.algorithm.verify(input.as_bytes(), &signature, key)
    }

    fn build_input(&self, header: &Header) -> Result<String> {
        match &self.payload {
            Some(payload) => signing_input::build(header, payload),
            None => signing_input::build(header, &Payload::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn transitions_through_states() {
        let mut jws = Jws::new();
        assert_eq!(jws.state(), State::Empty);

        jws.set_header(Header::new("HS256")).unwrap();
        assert_eq!(jws.state(), State::HeaderSet);
        assert_eq!(jws.algorithm(), Some(Algorithm::HS256));

        jws.set_payload(json!({"sub": "1234"}));
        assert_eq!(jws.state(), State::Ready);

        jws.reset();
        assert_eq!(jws.state(), State::Empty);
        assert!(jws.header().is_none());
    }

    #[test]
    fn failed_header_leaves_previous_state() {
        let mut jws = Jws::new().with_header(Header::new("ES256")).unwrap();

        let err = jws.set_header(Header::new("RS512")).unwrap_err();
        assert!(matches!(err, JwsError::InvalidHeader { .. }));
        assert_eq!(jws.algorithm(), Some(Algorithm::ES256));
        assert_eq!(jws.header().and_then(Header::alg), Some("ES256"));
    }

    #[test]
    fn narrower_registry_refuses_header_already_set() {
        let jws = Jws::new().with_header(Header::new("HS256")).unwrap();

        let err = jws
            .clone()
            .with_registry(Registry::only([Algorithm::ES256]))
            .unwrap_err();
        match err {
            JwsError::InvalidHeader { source: Some(source), .. } => {
                assert!(matches!(*source, JwsError::UnsupportedAlgorithm(ref id) if id == "HS256"));
            }
            other => panic!("unexpected {other}"),
        }

        let jws = jws
            .with_registry(Registry::only([Algorithm::HS256]))
            .unwrap();
        assert_eq!(jws.algorithm(), Some(Algorithm::HS256));
        assert!(!jws.registry().supports(Algorithm::ES256));
    }

    #[test]
    fn registry_bound_first_restricts_later_headers() {
        let mut jws = Jws::new()
            .with_registry(Registry::only([Algorithm::ES256]))
            .unwrap();

        let err = jws.set_header(Header::new("HS256")).unwrap_err();
        assert!(matches!(err, JwsError::InvalidHeader { source: Some(_), .. }));
        assert_eq!(jws.state(), State::Empty);
        assert!(matches!(jws.sign("secret"), Err(JwsError::MissingAlgorithm)));

        jws.set_header(Header::new("ES256")).unwrap();
    }

    #[test]
    fn non_string_alg_is_invalid() {
        let header = Header::default().with_param("alg", 256);
        let err = Jws::new().with_header(header).unwrap_err();
        assert!(matches!(err, JwsError::InvalidHeader { source: None, .. }));
    }

    #[test]
    fn empty_context_cannot_build_input() {
        assert!(matches!(
            Jws::new().signing_input(),
            Err(JwsError::MissingAlgorithm)
        ));
    }

    #[test]
    fn signing_input_tracks_payload_changes() {
        let mut jws = Jws::new().with_header(Header::new("HS256")).unwrap();
        assert_eq!(jws.signing_input().unwrap(), "eyJhbGciOiJIUzI1NiJ9.e30");

        jws.set_payload(json!({"sub": "1234"}));
        assert_eq!(
            jws.signing_input().unwrap(),
            "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxMjM0In0"
        );
    }
}
