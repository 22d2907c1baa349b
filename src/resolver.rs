//! # Key Material Resolver
//!
//! Turns a [`Jwk`] into a [`JwtSigner`].
//!
//! The effective algorithm is the caller's hint (usually the token header's
//! `alg`) if there is one, otherwise the JWK's own `alg`. The key type then
//! decides which algorithms are acceptable and which members are required:
//!
//! | `kty` | algorithms                  | required      | curve                             |
//! |-------|-----------------------------|---------------|-----------------------------------|
//! | RSA   | `RS256`, `RS384`, `RS512`   | `n`, `e`      | n/a                               |
//! | EC    | `ES256`, `ES384`, `ES512`   | `x`, `y`      | `crv`, else inferred from the alg |
//! | OKP   | `EdDSA`                     | `crv`, `x`    | `crv`                             |
//!
//! In every case `d`, when present, makes the signer signing capable.
//!
//! Resolution is all or nothing: a missing member, an unsupported
//! combination, or key material that does not form a valid key yields no
//! signer.

use anyhow::{anyhow, bail};

use crate::jose::jwa::Algorithm;
use crate::jose::jwk::{Curve, Jwk, KeyType};
use crate::keys::{decode_member, EcdsaKey, Ed25519Key, RsaKey};
use crate::signature::JwtSigner;

/// Resolve `jwk` to a signer, using `alg` in preference to the JWK's own
/// algorithm. Returns `None` when no signer can be built.
#[must_use]
pub fn resolve(jwk: &Jwk, alg: Option<Algorithm>) -> Option<JwtSigner> {
    match try_resolve(jwk, alg) {
        Ok(signer) => Some(signer),
        Err(e) => {
            tracing::debug!(kid = ?jwk.kid, "unable to resolve JWK: {e}");
            None
        }
    }
}

/// As [`resolve`], but reports why resolution failed.
///
/// # Errors
///
/// Returns an error describing the first rule the JWK failed.
pub fn try_resolve(jwk: &Jwk, alg: Option<Algorithm>) -> anyhow::Result<JwtSigner> {
    let Some(algorithm) = alg.or_else(|| jwk.algorithm()) else {
        bail!("no algorithm given and JWK has no recognised 'alg'");
    };

    match jwk.kty {
        KeyType::Rsa => rsa(jwk, algorithm),
        KeyType::Ec => ec(jwk, algorithm),
        KeyType::Okp => okp(jwk, algorithm),
    }
}

fn rsa(jwk: &Jwk, algorithm: Algorithm) -> anyhow::Result<JwtSigner> {
    let (Some(n), Some(e)) = (&jwk.n, &jwk.e) else {
        bail!("RSA key requires 'n' and 'e'");
    };
    if !matches!(algorithm, Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512) {
        bail!("{algorithm} cannot be used with an RSA key");
    }

    let n = decode_member("n", n)?;
    let e = decode_member("e", e)?;
    let d = jwk.d.as_deref().map(|d| decode_member("d", d)).transpose()?;
    let primes = match (&jwk.p, &jwk.q) {
        (Some(p), Some(q)) => Some((decode_member("p", p)?, decode_member("q", q)?)),
        _ => None,
    };

    let key = RsaKey::from_components(
        algorithm,
        &n,
        &e,
        d.as_deref(),
        primes.as_ref().map(|(p, q)| (p.as_slice(), q.as_slice())),
    )?;
    Ok(JwtSigner::new(key))
}

fn ec(jwk: &Jwk, algorithm: Algorithm) -> anyhow::Result<JwtSigner> {
    let (Some(x), Some(y)) = (&jwk.x, &jwk.y) else {
        bail!("EC key requires 'x' and 'y'");
    };

    // the key's own curve wins over the one implied by the algorithm
    let curve = jwk
        .curve()
        .or_else(|| Curve::for_algorithm(algorithm))
        .ok_or_else(|| anyhow!("unable to determine curve for EC key"))?;
    if !matches!(algorithm, Algorithm::ES256 | Algorithm::ES384 | Algorithm::ES512) {
        bail!("{algorithm} cannot be used with an EC key");
    }

    let x = decode_member("x", x)?;
    let y = decode_member("y", y)?;
    let d = jwk.d.as_deref().map(|d| decode_member("d", d)).transpose()?;

    let key = EcdsaKey::from_coordinates(algorithm, curve, &x, &y, d.as_deref())?;
    Ok(JwtSigner::new(key))
}

fn okp(jwk: &Jwk, algorithm: Algorithm) -> anyhow::Result<JwtSigner> {
    if algorithm != Algorithm::EdDSA {
        bail!("{algorithm} cannot be used with an OKP key");
    }
    let Some(curve) = jwk.curve() else {
        bail!("OKP key requires a recognised 'crv'");
    };
    let Some(x) = &jwk.x else {
        bail!("OKP key requires 'x'");
    };
    if curve != Curve::Ed25519 {
        bail!("{curve:?} is not an Edwards curve");
    }

    let x = decode_member("x", x)?;
    let d = jwk.d.as_deref().map(|d| decode_member("d", d)).transpose()?;

    let key = Ed25519Key::from_bytes(&x, d.as_deref())?;
    Ok(JwtSigner::new(key))
}
