//! JWS header and payload types

use crate::error::{JwsError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Header parameters this crate gives a meaning to.
///
/// `alg` is required; the others are optional hints carried through untouched.
pub const RESERVED_PARAMS: [&str; 6] = ["alg", "typ", "jku", "kid", "x5u", "x5t"];

/// JWS header.
///
/// An insertion-ordered JSON object. Parameters outside [`RESERVED_PARAMS`]
/// are preserved and serialized in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header(Map<String, Value>);

impl Header {
    /// Create a header carrying only `alg`.
    #[must_use]
    pub fn new(alg: &str) -> Self {
        let mut params = Map::new();
        params.insert("alg".to_string(), Value::String(alg.to_string()));
        Self(params)
    }

    /// Set the `typ` parameter.
    #[must_use]
    pub fn with_type(self, typ: &str) -> Self {
        self.with_param("typ", typ)
    }

    /// Set the `kid` parameter.
    #[must_use]
    pub fn with_key_id(self, kid: &str) -> Self {
        self.with_param("kid", kid)
    }

    /// Set the `jku` parameter.
    #[must_use]
    pub fn with_jwk_set_url(self, jku: &str) -> Self {
        self.with_param("jku", jku)
    }

    /// Set the `x5u` parameter.
    #[must_use]
    pub fn with_x509_url(self, x5u: &str) -> Self {
        self.with_param("x5u", x5u)
    }

    /// Set the `x5t` parameter.
    #[must_use]
    pub fn with_x509_thumbprint(self, x5t: &str) -> Self {
        self.with_param("x5t", x5t)
    }

    /// Set an arbitrary parameter, replacing any previous value.
    #[must_use]
    pub fn with_param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    /// The `alg` value, if present and a string.
    #[must_use]
    pub fn alg(&self) -> Option<&str> {
        self.str_param("alg")
    }

    /// The `typ` value.
    #[must_use]
    pub fn typ(&self) -> Option<&str> {
        self.str_param("typ")
    }

    /// The `jku` value.
    #[must_use]
    pub fn jku(&self) -> Option<&str> {
        self.str_param("jku")
    }

    /// The `kid` value.
    #[must_use]
    pub fn kid(&self) -> Option<&str> {
        self.str_param("kid")
    }

    /// The `x5u` value.
    #[must_use]
    pub fn x5u(&self) -> Option<&str> {
        self.str_param("x5u")
    }

    /// The `x5t` value.
    #[must_use]
    pub fn x5t(&self) -> Option<&str> {
        self.str_param("x5t")
    }

    /// Look up any parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Whether `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Borrow the underlying parameter map.
    #[must_use]
    pub fn params(&self) -> &Map<String, Value> {
        &self.0
    }

    fn str_param(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for Header {
    fn from(params: Map<String, Value>) -> Self {
        Self(params)
    }
}

impl TryFrom<Value> for Header {
    type Error = JwsError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(params) => Ok(Self(params)),
            other => Err(JwsError::invalid_header(format!(
                "header must be a JSON object, got {other}"
            ))),
        }
    }
}

/// JWS payload.
///
/// The payload is opaque: JSON values are serialized, raw bytes are encoded
/// as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// A JSON value, serialized before encoding
    Json(Value),
    /// Bytes encoded without interpretation
    Raw(Vec<u8>),
}

impl Payload {
    /// Bytes that get base64url-encoded into the signing input.
    ///
    /// # Errors
    /// Returns `JwsError::Serialization` if a JSON payload cannot be serialized.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Self::Json(value) => {
                serde_json::to_vec(value).map_err(|e| JwsError::serialization(e.to_string()))
            }
            Self::Raw(bytes) => Ok(bytes.clone()),
        }
    }

    /// Serialize any `Serialize` value into a JSON payload.
    ///
    /// # Errors
    /// Returns `JwsError::Serialization` if `value` cannot be represented as JSON.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|e| JwsError::serialization(e.to_string()))
    }

    /// Interpret decoded bytes.
    ///
    /// Bytes become `Json` only when serializing the parsed value reproduces
    /// them exactly, so `to_bytes` always returns the bytes that were signed.
    /// Anything else, including JSON with extra whitespace, stays `Raw`.
    #[must_use]
    pub fn from_decoded(bytes: Vec<u8>) -> Self {
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) if serde_json::to_vec(&value).is_ok_and(|out| out == bytes) => {
                Self::Json(value)
            }
            _ => Self::Raw(bytes),
        }
    }
}

impl Default for Payload {
    fn default() -> Self {
        Self::Json(Value::Object(Map::new()))
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Raw(bytes)
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Self::Raw(bytes.to_vec())
    }
}
