//! JWS signing algorithms
//!
//! An [`Algorithm`] is a (family, bit depth) pair drawn from a fixed table.
//! Identifiers are parsed as a two-letter family prefix followed by a bit
//! depth, with no partial matches. A [`Registry`] decides which of the table's
//! entries a caller is willing to resolve.

mod ecdsa;
mod hmac;
mod rsa;

use crate::error::{JwsError, Result};
use crate::keys::{SigningKey, VerifyingKey};
use std::fmt;
use std::str::FromStr;

/// Signature family selected by the identifier prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// `HS`: HMAC with SHA-2
    Hmac,
    /// `RS`: RSASSA-PKCS1-v1_5
    Rsa,
    /// `ES`: ECDSA over a NIST curve
    Ecdsa,
}

impl Family {
    /// Identifier prefix for this family.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Hmac => "HS",
            Self::Rsa => "RS",
            Self::Ecdsa => "ES",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "HS" => Some(Self::Hmac),
            "RS" => Some(Self::Rsa),
            "ES" => Some(Self::Ecdsa),
            _ => None,
        }
    }
}

/// Hash/curve strength selected by the identifier suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BitDepth {
    /// SHA-256, P-256
    Bits256,
    /// SHA-384, P-384
    Bits384,
    /// SHA-512, P-521
    Bits512,
}

impl BitDepth {
    /// Numeric bit depth.
    #[must_use]
    pub fn bits(self) -> u16 {
        match self {
            Self::Bits256 => 256,
            Self::Bits384 => 384,
            Self::Bits512 => 512,
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "256" => Some(Self::Bits256),
            "384" => Some(Self::Bits384),
            "512" => Some(Self::Bits512),
            _ => None,
        }
    }
}

/// A resolved signing algorithm.
///
/// Holds no key material and no mutable state, so one value can be shared
/// freely across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Algorithm {
    family: Family,
    depth: BitDepth,
}

impl Algorithm {
    /// HMAC using SHA-256
    pub const HS256: Self = Self::of(Family::Hmac, BitDepth::Bits256);
    /// HMAC using SHA-384
    pub const HS384: Self = Self::of(Family::Hmac, BitDepth::Bits384);
    /// HMAC using SHA-512
    pub const HS512: Self = Self::of(Family::Hmac, BitDepth::Bits512);
    /// RSASSA-PKCS1-v1_5 using SHA-256
    pub const RS256: Self = Self::of(Family::Rsa, BitDepth::Bits256);
    /// ECDSA using P-256 and SHA-256
    pub const ES256: Self = Self::of(Family::Ecdsa, BitDepth::Bits256);
    /// ECDSA using P-384 and SHA-384
    pub const ES384: Self = Self::of(Family::Ecdsa, BitDepth::Bits384);
    /// ECDSA using P-521 and SHA-512
    pub const ES512: Self = Self::of(Family::Ecdsa, BitDepth::Bits512);

    /// Every algorithm this crate implements.
    pub const ALL: [Self; 7] = [
        Self::HS256,
        Self::HS384,
        Self::HS512,
        Self::RS256,
        Self::ES256,
        Self::ES384,
        Self::ES512,
    ];

    const fn of(family: Family, depth: BitDepth) -> Self {
        Self { family, depth }
    }

    /// Combine a family and bit depth.
    ///
    /// # Errors
    /// Returns `JwsError::UnsupportedAlgorithm` for combinations the family
    /// does not offer. RSA is limited to SHA-256.
    pub fn new(family: Family, depth: BitDepth) -> Result<Self> {
        let alg = Self::of(family, depth);
        if Self::ALL.contains(&alg) {
            Ok(alg)
        } else {
            Err(JwsError::unsupported_algorithm(alg.name()))
        }
    }

    /// Parse an identifier such as `"ES384"`.
    ///
    /// # Errors
    /// Returns `JwsError::UnsupportedAlgorithm` unless `id` is exactly one of
    /// the supported identifiers.
    pub fn parse(id: &str) -> Result<Self> {
        let (prefix, suffix) = match (id.get(..2), id.get(2..)) {
            (Some(prefix), Some(suffix)) => (prefix, suffix),
            _ => return Err(JwsError::unsupported_algorithm(id)),
        };
        match (Family::from_prefix(prefix), BitDepth::from_suffix(suffix)) {
            (Some(family), Some(depth)) => Self::new(family, depth),
            _ => Err(JwsError::unsupported_algorithm(id)),
        }
    }

    /// Identifier as it appears in a header's `alg`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match (self.family, self.depth) {
            (Family::Hmac, BitDepth::Bits256) => "HS256",
            (Family::Hmac, BitDepth::Bits384) => "HS384",
            (Family::Hmac, BitDepth::Bits512) => "HS512",
            (Family::Rsa, BitDepth::Bits256) => "RS256",
            (Family::Rsa, BitDepth::Bits384) => "RS384",
            (Family::Rsa, BitDepth::Bits512) => "RS512",
            (Family::Ecdsa, BitDepth::Bits256) => "ES256",
            (Family::Ecdsa, BitDepth::Bits384) => "ES384",
            (Family::Ecdsa, BitDepth::Bits512) => "ES512",
        }
    }

    /// Signature family.
    #[must_use]
    pub fn family(&self) -> Family {
        self.family
    }

    /// Bit depth.
    #[must_use]
    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    /// Sign `message` with `key`.
    ///
    /// HMAC and ECDSA (RFC 6979 nonces) signatures are deterministic for a
    /// given key and message.
    ///
    /// # Errors
    /// Returns `JwsError::KeyFormat` if `key` cannot be used with this
    /// algorithm.
    pub fn sign<'k>(&self, message: &[u8], key: impl Into<SigningKey<'k>>) -> Result<Vec<u8>> {
        let key = key.into();
        tracing::debug!(alg = self.name(), key = key.kind(), "signing");
        match self.family {
            Family::Hmac => hmac::sign(self.depth, message, key),
            Family::Rsa => rsa::sign(self.depth, message, key),
            Family::Ecdsa => ecdsa::sign(self.depth, message, key),
        }
    }

    /// Check `signature` over `message` with `key`.
    ///
    /// # Errors
    /// Returns `JwsError::Signature` if the signature does not match, and
    /// `JwsError::KeyFormat` if `key` cannot be used with this algorithm.
    pub fn verify<'k>(
        &self,
        message: &[u8],
        signature: &[u8],
        key: impl Into<VerifyingKey<'k>>,
    ) -> Result<()> {
        let key = key.into();
        let result = match self.family {
            Family::Hmac => hmac::verify(self.depth, message, signature, key),
            Family::Rsa => rsa::verify(self.depth, message, signature, key),
            Family::Ecdsa => ecdsa::verify(self.depth, message, signature, key),
        };
        if let Err(e) = &result {
            tracing::debug!(alg = self.name(), key = key.kind(), error = %e, "verification failed");
        }
        result
    }

    fn index(self) -> u16 {
        let family = match self.family {
            Family::Hmac => 0,
            Family::Rsa => 1,
            Family::Ecdsa => 2,
        };
        let depth = match self.depth {
            BitDepth::Bits256 => 0,
            BitDepth::Bits384 => 1,
            BitDepth::Bits512 => 2,
        };
        family * 3 + depth
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = JwsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// The set of algorithms a context is willing to resolve.
///
/// Defaults to every supported algorithm. Restricting it keeps a verifier
/// from accepting an `alg` it did not expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registry {
    allowed: u16,
}

impl Registry {
    /// A registry offering only `algorithms`.
    #[must_use]
    pub fn only(algorithms: impl IntoIterator<Item = Algorithm>) -> Self {
        let allowed = algorithms
            .into_iter()
            .fold(0, |mask, alg| mask | (1 << alg.index()));
        Self { allowed }
    }

    /// Resolve an identifier to an algorithm this registry offers.
    ///
    /// # Errors
    /// Returns `JwsError::UnsupportedAlgorithm` if `id` is not a supported
    /// identifier or is outside this registry.
    pub fn resolve(&self, id: &str) -> Result<Algorithm> {
        let alg = Algorithm::parse(id)?;
        if !self.supports(alg) {
            return Err(JwsError::unsupported_algorithm(id));
        }
        tracing::debug!(alg = alg.name(), "resolved algorithm");
        Ok(alg)
    }

    /// Whether `alg` is offered.
    #[must_use]
    pub fn supports(&self, alg: Algorithm) -> bool {
        self.allowed & (1 << alg.index()) != 0
    }

    /// Offered algorithms, in table order.
    pub fn algorithms(&self) -> impl Iterator<Item = Algorithm> + '_ {
        Algorithm::ALL.into_iter().filter(|alg| self.supports(*alg))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::only(Algorithm::ALL)
    }
}
