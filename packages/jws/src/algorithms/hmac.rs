//! HMAC-SHA2 signing (HS256, HS384, HS512)

use super::BitDepth;
use crate::error::{JwsError, Result};
use crate::keys::{SigningKey, VerifyingKey};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

pub(super) fn sign(depth: BitDepth, message: &[u8], key: SigningKey<'_>) -> Result<Vec<u8>> {
    match key {
        SigningKey::Encoded(secret) => mac(depth, message, secret),
        other => Err(JwsError::key_format(format!(
            "HMAC requires a shared secret, got {}",
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
    let secret = match key {
        VerifyingKey::Encoded(secret) => secret,
        other => {
            return Err(JwsError::key_format(format!(
                "HMAC requires a shared secret, got {}",
                other.kind()
            )));
        }
    };

    let expected = mac(depth, message, secret)?;
    if bool::from(expected.ct_eq(signature)) {
        Ok(())
    } else {
        Err(JwsError::Signature)
    }
}

fn mac(depth: BitDepth, message: &[u8], secret: &[u8]) -> Result<Vec<u8>> {
    match depth {
        BitDepth::Bits256 => digest::<HmacSha256>(message, secret),
        BitDepth::Bits384 => digest::<HmacSha384>(message, secret),
        BitDepth::Bits512 => digest::<HmacSha512>(message, secret),
    }
}

fn digest<M: Mac + KeyInit>(message: &[u8], secret: &[u8]) -> Result<Vec<u8>> {
    let mut mac = <M as Mac>::new_from_slice(secret)
        .map_err(|_| JwsError::key_format("Invalid HMAC key"))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}
