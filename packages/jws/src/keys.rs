//! Key material handles
//!
//! Keys are borrowed for the duration of one `sign`/`verify` call and never
//! stored. Each handle is either an encoded form (imported on demand by the
//! algorithm family that receives it) or an already parsed key object.

use rsa::{RsaPrivateKey, RsaPublicKey};

/// Key material used to produce a signature.
#[derive(Clone, Copy)]
pub enum SigningKey<'a> {
    /// Encoded key bytes: an HMAC secret, or a PEM/DER/raw asymmetric key
    Encoded(&'a [u8]),
    /// Parsed RSA private key
    Rsa(&'a RsaPrivateKey),
    /// Parsed P-256 ECDSA signing key
    P256(&'a p256::ecdsa::SigningKey),
    /// Parsed P-384 ECDSA signing key
    P384(&'a p384::ecdsa::SigningKey),
    /// Parsed P-521 ECDSA signing key
    P521(&'a p521::ecdsa::SigningKey),
}

/// Key material used to check a signature.
#[derive(Clone, Copy)]
pub enum VerifyingKey<'a> {
    /// Encoded key bytes: an HMAC secret, or a PEM/DER/raw public key
    Encoded(&'a [u8]),
    /// Parsed RSA public key
    Rsa(&'a RsaPublicKey),
    /// Parsed P-256 ECDSA verifying key
    P256(&'a p256::ecdsa::VerifyingKey),
    /// Parsed P-384 ECDSA verifying key
    P384(&'a p384::ecdsa::VerifyingKey),
    /// Parsed P-521 ECDSA verifying key
    P521(&'a p521::ecdsa::VerifyingKey),
}

impl SigningKey<'_> {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Encoded(_) => "encoded key",
            Self::Rsa(_) => "RSA private key",
            Self::P256(_) => "P-256 signing key",
            Self::P384(_) => "P-384 signing key",
            Self::P521(_) => "P-521 signing key",
        }
    }
}

impl VerifyingKey<'_> {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Encoded(_) => "encoded key",
            Self::Rsa(_) => "RSA public key",
            Self::P256(_) => "P-256 verifying key",
            Self::P384(_) => "P-384 verifying key",
            Self::P521(_) => "P-521 verifying key",
        }
    }
}

impl std::fmt::Debug for SigningKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SigningKey").field(&self.kind()).finish()
    }
}

impl std::fmt::Debug for VerifyingKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("VerifyingKey").field(&self.kind()).finish()
    }
}

macro_rules! impl_key_from {
    ($key:ident, $($src:ty => $variant:ident),+ $(,)?) => {
        $(
            impl<'a> From<&'a $src> for $key<'a> {
                fn from(key: &'a $src) -> Self {
                    Self::$variant(key)
                }
            }
        )+

        impl<'a> From<&'a str> for $key<'a> {
            fn from(key: &'a str) -> Self {
                Self::Encoded(key.as_bytes())
            }
        }

        impl<'a> From<&'a String> for $key<'a> {
            fn from(key: &'a String) -> Self {
                Self::Encoded(key.as_bytes())
            }
        }

        impl<'a> From<&'a [u8]> for $key<'a> {
            fn from(key: &'a [u8]) -> Self {
                Self::Encoded(key)
            }
        }

        impl<'a> From<&'a Vec<u8>> for $key<'a> {
            fn from(key: &'a Vec<u8>) -> Self {
                Self::Encoded(key)
            }
        }

        impl<'a, const N: usize> From<&'a [u8; N]> for $key<'a> {
            fn from(key: &'a [u8; N]) -> Self {
                Self::Encoded(key)
            }
        }
    };
}

impl_key_from!(SigningKey,
    RsaPrivateKey => Rsa,
    p256::ecdsa::SigningKey => P256,
    p384::ecdsa::SigningKey => P384,
    p521::ecdsa::SigningKey => P521,
);

impl_key_from!(VerifyingKey,
    RsaPublicKey => Rsa,
    p256::ecdsa::VerifyingKey => P256,
    p384::ecdsa::VerifyingKey => P384,
    p521::ecdsa::VerifyingKey => P521,
);

/// Whether encoded key bytes look like a PEM document.
pub(crate) fn is_pem(bytes: &[u8]) -> bool {
    bytes.trim_ascii_start().starts_with(b"-----BEGIN")
}

/// Borrow PEM bytes as text.
pub(crate) fn pem_str(bytes: &[u8]) -> crate::Result<&str> {
    std::str::from_utf8(bytes).map_err(|_| crate::JwsError::key_format("PEM key is not valid UTF-8"))
}
