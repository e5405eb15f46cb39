//! ECDSA signing (ES256, ES384, ES512)
//!
//! Bit depth selects both curve and digest: P-256/SHA-256, P-384/SHA-384 and
//! P-521/SHA-512. Signatures use the fixed-width `r || s` encoding.

use super::BitDepth;
use crate::error::{JwsError, Result};
use crate::keys::{self, SigningKey, VerifyingKey};

macro_rules! curve {
    ($module:ident, $krate:ident, $curve:literal, $field_len:literal) => {
        mod $module {
            use super::*;
            use $krate::ecdsa::signature::{Signer, Verifier};
            use $krate::ecdsa::{Signature, SigningKey, VerifyingKey};
            use $krate::elliptic_curve::sec1::ToEncodedPoint;
            use $krate::pkcs8::{DecodePrivateKey, DecodePublicKey};
            use $krate::{PublicKey, SecretKey};

            pub(super) const CURVE: &str = $curve;

            /// Import a private key from PEM (PKCS#8 or SEC1), a raw scalar,
            /// or DER (PKCS#8 or SEC1).
            pub(super) fn signing_key(bytes: &[u8]) -> Result<SigningKey> {
                let secret = if keys::is_pem(bytes) {
                    let pem = keys::pem_str(bytes)?;
                    SecretKey::from_pkcs8_pem(pem)
                        .map_err(|e| e.to_string())
                        .or_else(|_| SecretKey::from_sec1_pem(pem).map_err(|e| e.to_string()))
                } else if bytes.len() == $field_len {
                    SecretKey::from_slice(bytes).map_err(|e| e.to_string())
                } else {
                    SecretKey::from_pkcs8_der(bytes)
                        .map_err(|e| e.to_string())
                        .or_else(|_| SecretKey::from_sec1_der(bytes).map_err(|e| e.to_string()))
                }
                .map_err(|e| {
                    JwsError::key_format(format!("Invalid {CURVE} private key: {e}"))
                })?;

                SigningKey::from_bytes(&secret.to_bytes()).map_err(|e| {
                    JwsError::key_format(format!("Invalid {CURVE} private key: {e}"))
                })
            }

            /// Import a public key from PEM (SPKI), a SEC1 point, bare
            /// `x || y` coordinates, or SPKI DER.
            pub(super) fn verifying_key(bytes: &[u8]) -> Result<VerifyingKey> {
                let public = if keys::is_pem(bytes) {
                    let pem = keys::pem_str(bytes)?;
                    PublicKey::from_public_key_pem(pem).map_err(|e| e.to_string())
                } else if bytes.len() == 2 * $field_len {
                    let mut point = Vec::with_capacity(bytes.len() + 1);
                    point.push(0x04);
                    point.extend_from_slice(bytes);
                    PublicKey::from_sec1_bytes(&point).map_err(|e| e.to_string())
                } else {
                    PublicKey::from_sec1_bytes(bytes)
                        .map_err(|e| e.to_string())
                        .or_else(|_| PublicKey::from_public_key_der(bytes).map_err(|e| e.to_string()))
                }
                .map_err(|e| JwsError::key_format(format!("Invalid {CURVE} public key: {e}")))?;

                VerifyingKey::from_sec1_bytes(public.to_encoded_point(false).as_bytes())
                    .map_err(|e| JwsError::key_format(format!("Invalid {CURVE} public key: {e}")))
            }

            pub(super) fn sign(key: &SigningKey, message: &[u8]) -> Vec<u8> {
                let signature: Signature = key.sign(message);
                signature.to_bytes().to_vec()
            }

            pub(super) fn verify(key: &VerifyingKey, message: &[u8], signature: &[u8]) -> Result<()> {
                let signature = Signature::from_slice(signature).map_err(|_| JwsError::Signature)?;
                key.verify(message, &signature).map_err(|_| JwsError::Signature)
            }
        }
    };
}

curve!(es256, p256, "P-256", 32);
curve!(es384, p384, "P-384", 48);
curve!(es512, p521, "P-521", 66);

pub(super) fn sign(depth: BitDepth, message: &[u8], key: SigningKey<'_>) -> Result<Vec<u8>> {
    match (depth, key) {
        (BitDepth::Bits256, SigningKey::P256(key)) => Ok(es256::sign(key, message)),
        (BitDepth::Bits256, SigningKey::Encoded(bytes)) => {
            Ok(es256::sign(&es256::signing_key(bytes)?, message))
        }
        (BitDepth::Bits384, SigningKey::P384(key)) => Ok(es384::sign(key, message)),
        (BitDepth::Bits384, SigningKey::Encoded(bytes)) => {
            Ok(es384::sign(&es384::signing_key(bytes)?, message))
        }
        (BitDepth::Bits512, SigningKey::P521(key)) => Ok(es512::sign(key, message)),
        (BitDepth::Bits512, SigningKey::Encoded(bytes)) => {
            Ok(es512::sign(&es512::signing_key(bytes)?, message))
        }
        (depth, other) => Err(JwsError::key_format(format!(
            "ES{} requires a {} signing key, got {}",
            depth.bits(),
            curve_name(depth),
            other.kind()
        ))),
    }
}

pub(super) fn verify(
    depth: BitDepth,
    message: &[u8],
    signature: &[u8],
    key: VerifyingKey<'_>,
) -> Result<()> {
    match (depth, key) {
        (BitDepth::Bits256, VerifyingKey::P256(key)) => es256::verify(key, message, signature),
        (BitDepth::Bits256, VerifyingKey::Encoded(bytes)) => {
            es256::verify(&es256::verifying_key(bytes)?, message, signature)
        }
        (BitDepth::Bits384, VerifyingKey::P384(key)) => es384::verify(key, message, signature),
        (BitDepth::Bits384, VerifyingKey::Encoded(bytes)) => {
            es384::verify(&es384::verifying_key(bytes)?, message, signature)
        }
        (BitDepth::Bits512, VerifyingKey::P521(key)) => es512::verify(key, message, signature),
        (BitDepth::Bits512, VerifyingKey::Encoded(bytes)) => {
            es512::verify(&es512::verifying_key(bytes)?, message, signature)
        }
        (depth, other) => Err(JwsError::key_format(format!(
            "ES{} requires a {} verifying key, got {}",
            depth.bits(),
            curve_name(depth),
            other.kind()
        ))),
    }
}

fn curve_name(depth: BitDepth) -> &'static str {
    match depth {
        BitDepth::Bits256 => es256::CURVE,
        BitDepth::Bits384 => es384::CURVE,
        BitDepth::Bits512 => es512::CURVE,
    }
}
