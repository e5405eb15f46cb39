//! RSASSA-PKCS1-v1_5 signing (RS256)
//!
//! Only the SHA-256 variant is offered; `Algorithm::new` refuses RS384 and
//! RS512 before any key is touched.

use super::BitDepth;
use crate::error::{JwsError, Result};
use crate::keys::{self, SigningKey, VerifyingKey};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs1v15;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

pub(super) fn sign(depth: BitDepth, message: &[u8], key: SigningKey<'_>) -> Result<Vec<u8>> {
    require_sha256(depth)?;
    let private_key = match key {
        SigningKey::Rsa(key) => key.clone(),
        SigningKey::Encoded(bytes) => import_private_key(bytes)?,
        other => {
            return Err(JwsError::key_format(format!(
                "RS256 requires an RSA private key, got {}",
                other.kind()
            )));
        }
    };

    let signing_key = pkcs1v15::SigningKey::<Sha256>::new(private_key);
    let signature = signing_key
        .try_sign(message)
        .map_err(|e| JwsError::key_format(format!("RSA signing failed: {e}")))?;
    Ok(signature.to_vec())
}

pub(super) fn verify(
    depth: BitDepth,
    message: &[u8],
    signature: &[u8],
    key: VerifyingKey<'_>,
) -> Result<()> {
    require_sha256(depth)?;
    let public_key = match key {
        VerifyingKey::Rsa(key) => key.clone(),
        VerifyingKey::Encoded(bytes) => import_public_key(bytes)?,
        other => {
            return Err(JwsError::key_format(format!(
                "RS256 requires an RSA public key, got {}",
                other.kind()
            )));
        }
    };

    let verifying_key = pkcs1v15::VerifyingKey::<Sha256>::new(public_key);
    let signature = pkcs1v15::Signature::try_from(signature).map_err(|_| JwsError::Signature)?;
    verifying_key
        .verify(message, &signature)
        .map_err(|_| JwsError::Signature)
}

fn require_sha256(depth: BitDepth) -> Result<()> {
    match depth {
        BitDepth::Bits256 => Ok(()),
        other => Err(JwsError::unsupported_algorithm(format!("RS{}", other.bits()))),
    }
}

/// Import a private key from PEM or DER, PKCS#8 or PKCS#1.
fn import_private_key(bytes: &[u8]) -> Result<RsaPrivateKey> {
    let imported = if keys::is_pem(bytes) {
        let pem = keys::pem_str(bytes)?;
        RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
            .map_err(|e| e.to_string())
    } else {
        RsaPrivateKey::from_pkcs8_der(bytes)
            .or_else(|_| RsaPrivateKey::from_pkcs1_der(bytes))
            .map_err(|e| e.to_string())
    };
    imported.map_err(|e| JwsError::key_format(format!("Invalid RSA private key: {e}")))
}

/// Import a public key from PEM or DER, SPKI or PKCS#1.
fn import_public_key(bytes: &[u8]) -> Result<RsaPublicKey> {
    let imported = if keys::is_pem(bytes) {
        let pem = keys::pem_str(bytes)?;
        RsaPublicKey::from_public_key_pem(pem)
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
            .map_err(|e| e.to_string())
    } else {
        RsaPublicKey::from_public_key_der(bytes)
            .or_else(|_| RsaPublicKey::from_pkcs1_der(bytes))
            .map_err(|e| e.to_string())
    };
    imported.map_err(|e| JwsError::key_format(format!("Invalid RSA public key: {e}")))
}
