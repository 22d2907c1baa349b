//! Freshly generated keys, as JWK JSON values.
//!
//! Every function returns the private JWK. Use [`public`] to strip the
//! private members.

use std::sync::LazyLock;

use base64ct::{Base64UrlUnpadded, Encoding};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::RsaPrivateKey;
use serde_json::{json, Value};

// RSA key generation is slow, so every RSA JWK shares one key
static RSA_KEY: LazyLock<RsaPrivateKey> =
    LazyLock::new(|| RsaPrivateKey::new(&mut OsRng, 2048).expect("should generate RSA key"));

fn b64(bytes: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(bytes)
}

/// An RSA JWK with primes.
#[must_use]
pub fn rsa_jwk(kid: &str, alg: &str) -> Value {
    let key = &*RSA_KEY;
    let primes = key.primes();
    json!({
        "kty": "RSA",
        "kid": kid,
        "alg": alg,
        "n": b64(&key.n().to_bytes_be()),
        "e": b64(&key.e().to_bytes_be()),
        "d": b64(&key.d().to_bytes_be()),
        "p": b64(&primes[0].to_bytes_be()),
        "q": b64(&primes[1].to_bytes_be()),
    })
}

/// An EC JWK on `crv` (`P-256`, `P-384`, or `P-521`), without `alg`.
///
/// # Panics
///
/// Panics if `crv` is not a supported curve.
#[must_use]
pub fn ec_jwk(kid: &str, crv: &str) -> Value {
    let (point, d) = match crv {
        "P-256" => {
            let secret = p256::SecretKey::random(&mut OsRng);
            let point = secret.public_key().to_encoded_point(false);
            (point.as_bytes().to_vec(), secret.to_bytes().to_vec())
        }
        "P-384" => {
            let secret = p384::SecretKey::random(&mut OsRng);
            let point = secret.public_key().to_encoded_point(false);
            (point.as_bytes().to_vec(), secret.to_bytes().to_vec())
        }
        "P-521" => {
            let secret = p521::SecretKey::random(&mut OsRng);
            let point = secret.public_key().to_encoded_point(false);
            (point.as_bytes().to_vec(), secret.to_bytes().to_vec())
        }
        _ => panic!("unsupported curve {crv}"),
    };

    // uncompressed point: 0x04 || x || y
    let (x, y) = point[1..].split_at((point.len() - 1) / 2);
    json!({
        "kty": "EC",
        "kid": kid,
        "crv": crv,
        "x": b64(x),
        "y": b64(y),
        "d": b64(&d),
    })
}

/// An Ed25519 OKP JWK with `alg` set to `EdDSA`.
#[must_use]
pub fn ed25519_jwk(kid: &str) -> Value {
    let signing_key = ed25519_dalek::SigningKey::generate(&mut OsRng);
    json!({
        "kty": "OKP",
        "kid": kid,
        "alg": "EdDSA",
        "crv": "Ed25519",
        "x": b64(signing_key.verifying_key().as_bytes()),
        "d": b64(signing_key.as_bytes()),
    })
}

/// The public half of a JWK produced by this module.
#[must_use]
pub fn public(mut jwk: Value) -> Value {
    if let Some(members) = jwk.as_object_mut() {
        for member in ["d", "p", "q"] {
            members.remove(member);
        }
    }
    jwk
}
