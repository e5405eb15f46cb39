//! Sign/verify behaviour across every supported algorithm

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use cryypt_jws::{Algorithm, Header, Jws, JwsError, Payload};
use proptest::prelude::*;
use serde_json::json;

const RSA_PRIVATE: &str = include_str!("fixtures/rsa_private.pem");
const RSA_PUBLIC: &str = include_str!("fixtures/rsa_public.pem");
const RSA_OTHER_PUBLIC: &str = include_str!("fixtures/rsa_other_public.pem");
const P256_PRIVATE: &str = include_str!("fixtures/p256_private.pem");
const P256_PUBLIC: &str = include_str!("fixtures/p256_public.pem");
const P384_PRIVATE: &str = include_str!("fixtures/p384_private.pem");
const P384_PUBLIC: &str = include_str!("fixtures/p384_public.pem");
const P521_PRIVATE: &str = include_str!("fixtures/p521_private.pem");
const P521_PUBLIC: &str = include_str!("fixtures/p521_public.pem");

/// (signing key, verifying key, a verifying key that must not match)
fn key_material(alg: Algorithm) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    match alg.name() {
        "HS256" | "HS384" | "HS512" => (b"secret".to_vec(), b"secret".to_vec(), b"wrong".to_vec()),
        "RS256" => (
            RSA_PRIVATE.into(),
            RSA_PUBLIC.into(),
            RSA_OTHER_PUBLIC.into(),
        ),
        "ES256" => {
            let other = p256::ecdsa::SigningKey::from_slice(&[7u8; 32]).unwrap();
            let other = other.verifying_key().to_encoded_point(false);
            (P256_PRIVATE.into(), P256_PUBLIC.into(), other.as_bytes().to_vec())
        }
        "ES384" => {
            let other = p384::ecdsa::SigningKey::from_slice(&[7u8; 48]).unwrap();
            let other = other.verifying_key().to_encoded_point(false);
            (P384_PRIVATE.into(), P384_PUBLIC.into(), other.as_bytes().to_vec())
        }
        "ES512" => {
            let other = p521::ecdsa::SigningKey::from_slice(&[1u8; 66]).unwrap();
            let other = p521::ecdsa::VerifyingKey::from(&other).to_encoded_point(false);
            (P521_PRIVATE.into(), P521_PUBLIC.into(), other.as_bytes().to_vec())
        }
        other => unreachable!("no fixture for {other}"),
    }
}

fn context(alg: Algorithm, payload: impl Into<Payload>) -> Jws {
    Jws::new()
        .with_header(Header::new(alg.name()).with_key_id("key-1"))
        .unwrap()
        .with_payload(payload)
}

#[test]
fn every_algorithm_round_trips() {
    for alg in Algorithm::ALL {
        let (signing, verifying, _) = key_material(alg);
        let jws = context(alg, json!({"sub": "1234", "n": 42}));

        let signature = jws.sign(&signing).unwrap();
        jws.verify(&signature, &verifying)
            .unwrap_or_else(|e| panic!("{alg} failed to verify: {e}"));
    }
}

#[test]
fn wrong_key_is_a_signature_error() {
    for alg in Algorithm::ALL {
        let (signing, _, wrong) = key_material(alg);
        let jws = context(alg, json!({"sub": "1234"}));

        let signature = jws.sign(&signing).unwrap();
        let err = jws.verify(&signature, &wrong).unwrap_err();
        assert!(matches!(err, JwsError::Signature), "{alg}: {err}");
    }
}

#[test]
fn altered_header_is_a_signature_error() {
    for alg in Algorithm::ALL {
        let (signing, verifying, _) = key_material(alg);
        let signature = context(alg, json!({"sub": "1234"})).sign(&signing).unwrap();

        let tampered = Jws::new()
            .with_header(Header::new(alg.name()).with_key_id("key-2"))
            .unwrap()
            .with_payload(json!({"sub": "1234"}));
        let err = tampered.verify(&signature, &verifying).unwrap_err();
        assert!(matches!(err, JwsError::Signature), "{alg}: {err}");
    }
}

#[test]
fn hmac_is_deterministic() {
    for alg in [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512] {
        let jws = context(alg, json!({"sub": "1234"}));
        assert_eq!(jws.sign("secret").unwrap(), jws.sign("secret").unwrap());
    }
}

#[test]
fn hs256_scenario() {
    let header = Header::new("HS256");
    let payload = Payload::from(json!({"sub": "1234"}));

    let signature = cryypt_jws::sign(&header, &payload, "secret").unwrap();
    assert_eq!(signature, "eg9As4Jk9uiOcZkYfdll13ZAqvLlY35hlo3sfgH_4_4");

    cryypt_jws::verify(&header, &payload, &signature, "secret").unwrap();
    let err = cryypt_jws::verify(&header, &payload, &signature, "wrong").unwrap_err();
    assert!(matches!(err, JwsError::Signature));
}

#[test]
fn hs384_and_hs512_known_answers() {
    let payload = Payload::from(json!({"sub": "1234"}));
    assert_eq!(
        cryypt_jws::sign(&Header::new("HS384"), &payload, "secret").unwrap(),
        "YD6NAjHSp_j4FLjz3OwsimwZ9tmv-fciG94jw7vDF-N01JNzVUizsEQc57i7ADZm"
    );
    assert_eq!(
        cryypt_jws::sign(&Header::new("HS512"), &payload, "secret").unwrap(),
        "BtZq_bZFex_lScexplf3U9MYEPZmx969qQI1OXJKOr761BCbKrmqJIySA57245rqa68gpZZtHRyN03yd78LJhg"
    );
}

#[test]
fn rs256_matches_reference_signature() {
    let expected = include_str!("fixtures/rs256_known_signature.txt").trim();
    let header = Header::new("RS256");
    let payload = Payload::from(json!({"sub": "1234"}));

    let signature = cryypt_jws::sign(&header, &payload, RSA_PRIVATE).unwrap();
    assert_eq!(signature, expected);
    cryypt_jws::verify(&header, &payload, expected, RSA_PUBLIC).unwrap();
}

#[test]
fn unset_context_reports_missing_algorithm() {
    let jws = Jws::new().with_payload(json!({"sub": "1234"}));

    assert!(matches!(jws.sign("secret"), Err(JwsError::MissingAlgorithm)));
    assert!(matches!(
        jws.verify("eg9As4Jk9uiOcZkYfdll13ZAqvLlY35hlo3sfgH_4_4", "secret"),
        Err(JwsError::MissingAlgorithm)
    ));
}

#[test]
fn header_without_alg_is_rejected() {
    let mut jws = Jws::new();
    let err = jws.set_header(Header::default().with_param("typ", "JWT")).unwrap_err();
    assert!(matches!(err, JwsError::InvalidHeader { .. }));

    jws.set_header(Header::new("HS256")).unwrap();
}

#[test]
fn unknown_identifiers_are_invalid_headers() {
    for alg in ["HS128", "XX256", "RS384", "RS512"] {
        let err = Jws::new().with_header(Header::new(alg)).unwrap_err();
        match err {
            JwsError::InvalidHeader { source: Some(source), .. } => {
                assert!(matches!(*source, JwsError::UnsupportedAlgorithm(ref id) if id == alg));
            }
            other => panic!("{alg}: unexpected {other}"),
        }
    }
}

#[test]
fn malformed_signature_encoding_is_a_decode_error() {
    let jws = context(Algorithm::HS256, json!({}));
    for signature in ["not base64!", "AAAA=", "A"] {
        assert!(matches!(
            jws.verify(signature, "secret"),
            Err(JwsError::Decode(_))
        ));
    }
}

#[test]
fn context_is_reusable() {
    let mut jws = context(Algorithm::ES256, json!({"n": 1}));
    let first = jws.sign(P256_PRIVATE).unwrap();
    jws.verify(&first, P256_PUBLIC).unwrap();
    jws.verify(&first, P256_PUBLIC).unwrap();

    jws.set_payload(json!({"n": 2}));
    assert!(matches!(
        jws.verify(&first, P256_PUBLIC),
        Err(JwsError::Signature)
    ));
    let second = jws.sign(P256_PRIVATE).unwrap();
    jws.verify(&second, P256_PUBLIC).unwrap();
}

#[test]
fn empty_payload_signs() {
    for alg in Algorithm::ALL {
        let (signing, verifying, _) = key_material(alg);
        let jws = Jws::new().with_header(Header::new(alg.name())).unwrap();
        let signature = jws.sign(&signing).unwrap();
        jws.verify(&signature, &verifying).unwrap();
    }
}

#[test]
fn algorithm_is_shareable_across_threads() {
    let alg = Algorithm::HS512;
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let message = format!("message-{i}");
                let sig = alg.sign(message.as_bytes(), "secret").unwrap();
                alg.verify(message.as_bytes(), &sig, "secret").unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

fn flip(bytes: &mut [u8], index: usize, mask: u8) {
    let i = index % bytes.len();
    bytes[i] ^= mask;
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn flipped_signature_byte_fails(
        alg_index in 0..Algorithm::ALL.len(),
        index in any::<usize>(),
        mask in 1u8..=255,
    ) {
        let alg = Algorithm::ALL[alg_index];
        let (signing, verifying, _) = key_material(alg);
        let jws = context(alg, json!({"sub": "1234"}));

        let message = jws.signing_input().unwrap();
        let mut signature = alg.sign(message.as_bytes(), &signing).unwrap();
        flip(&mut signature, index, mask);

        let err = alg.verify(message.as_bytes(), &signature, &verifying).unwrap_err();
        prop_assert!(matches!(err, JwsError::Signature), "{}: {}", alg, err);
    }

    #[test]
    fn flipped_payload_byte_fails(
        alg_index in 0..Algorithm::ALL.len(),
        payload in proptest::collection::vec(any::<u8>(), 1..64),
        index in any::<usize>(),
        mask in 1u8..=255,
    ) {
        let alg = Algorithm::ALL[alg_index];
        let (signing, verifying, _) = key_material(alg);
        let signature = context(alg, payload.clone()).sign(&signing).unwrap();

        let mut tampered = payload;
        flip(&mut tampered, index, mask);
        let err = context(alg, tampered).verify(&signature, &verifying).unwrap_err();
        prop_assert!(matches!(err, JwsError::Signature), "{}: {}", alg, err);
    }

    #[test]
    fn flipped_header_byte_fails(
        alg_index in 0..Algorithm::ALL.len(),
        index in any::<usize>(),
        mask in 1u8..=255,
    ) {
        let alg = Algorithm::ALL[alg_index];
        let (signing, verifying, _) = key_material(alg);
        let header = Header::new(alg.name()).with_key_id("key-1");
        let token =
            cryypt_jws::compact::encode(&header, &Payload::from(json!({"sub": "1234"})), &signing)
                .unwrap();

        let (header_b64, rest) = token.split_once('.').unwrap();
        let mut header_json = URL_SAFE_NO_PAD.decode(header_b64).unwrap();
        flip(&mut header_json, index, mask);
        let tampered = format!("{}.{rest}", URL_SAFE_NO_PAD.encode(&header_json));

        // A flip inside `alg` can land on another identifier or family
        let err = cryypt_jws::compact::verify(&tampered, &verifying).unwrap_err();
        prop_assert!(
            matches!(
                err,
                JwsError::Signature
                    | JwsError::Decode(_)
                    | JwsError::InvalidHeader { .. }
                    | JwsError::KeyFormat(_)
            ),
            "{}: {}",
            alg,
            err
        );
    }

    #[test]
    fn flipped_header_byte_with_same_alg_is_a_signature_error(
        alg_index in 0..Algorithm::ALL.len(),
        index in any::<usize>(),
        mask in 1u8..=255,
    ) {
        let alg = Algorithm::ALL[alg_index];
        let (signing, verifying, _) = key_material(alg);
        let header = Header::new(alg.name()).with_key_id("key-1");
        let token =
            cryypt_jws::compact::encode(&header, &Payload::default(), &signing).unwrap();

        // Flip only within the `kid` value, keeping the JSON well formed
        let (header_b64, rest) = token.split_once('.').unwrap();
        let mut header_json = URL_SAFE_NO_PAD.decode(header_b64).unwrap();
        let kid = header_json.len() - "key-1\"}".len();
        let i = kid + index % "key-1".len();
        header_json[i] = b'a' + (header_json[i] ^ mask) % 26;
        prop_assume!(header_json[i] != b"key-1"[i - kid]);
        let tampered = format!("{}.{rest}", URL_SAFE_NO_PAD.encode(&header_json));

        let err = cryypt_jws::compact::verify(&tampered, &verifying).unwrap_err();
        prop_assert!(matches!(err, JwsError::Signature), "{}: {}", alg, err);
    }
}
