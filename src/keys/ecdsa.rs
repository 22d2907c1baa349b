use ::ecdsa::signature::{Signer as _, Verifier as _};
use anyhow::bail;
use p256::elliptic_curve::sec1::ToEncodedPoint as _;

use crate::jose::jwa::Algorithm;
use crate::jose::jwk::Curve;
use crate::signature::Signer;

enum CurveKey {
    P256 {
        verifying_key: p256::ecdsa::VerifyingKey,
        signing_key: Option<p256::ecdsa::SigningKey>,
    },
    P384 {
        verifying_key: p384::ecdsa::VerifyingKey,
        signing_key: Option<p384::ecdsa::SigningKey>,
    },
    P521 {
        verifying_key: p521::ecdsa::VerifyingKey,
        signing_key: Option<p521::ecdsa::SigningKey>,
    },
}

/// An elliptic curve key used with ECDSA (`ES256`, `ES384`, `ES512`).
///
/// The curve decides the digest. The algorithm is what the key reports and
/// expects in token headers, so a P-384 key resolved for `ES256` signs with
/// SHA-384 and labels its tokens `ES256`.
pub struct EcdsaKey {
    algorithm: Algorithm,
    curve: Curve,
    key: CurveKey,
}

impl EcdsaKey {
    /// Build a key from affine coordinates and, optionally, the private
    /// scalar. All values are big-endian bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if `algorithm` is not an ECDSA algorithm, the curve
    /// is not a NIST curve, the point is not on the curve, or the private
    /// scalar does not belong to the point.
    pub fn from_coordinates(
        algorithm: Algorithm, curve: Curve, x: &[u8], y: &[u8], d: Option<&[u8]>,
    ) -> anyhow::Result<Self> {
        if !matches!(algorithm, Algorithm::ES256 | Algorithm::ES384 | Algorithm::ES512) {
            bail!("{algorithm} is not an ECDSA algorithm");
        }

        // uncompressed SEC1 point
        let mut sec1 = vec![0x04];
        sec1.extend_from_slice(x);
        sec1.extend_from_slice(y);

        let key = match curve {
            Curve::P256 => {
                let signing_key = match d {
                    Some(d) => {
                        let secret = p256::SecretKey::from_slice(d)?;
                        let public = secret.public_key().to_encoded_point(false);
                        if public.as_bytes() != sec1.as_slice() {
                            bail!("private key does not match public key");
                        }
                        Some(p256::ecdsa::SigningKey::from(secret))
                    }
                    None => None,
                };
                CurveKey::P256 {
                    verifying_key: p256::ecdsa::VerifyingKey::from_sec1_bytes(&sec1)?,
                    signing_key,
                }
            }
            Curve::P384 => {
                let signing_key = match d {
                    Some(d) => {
                        let secret = p384::SecretKey::from_slice(d)?;
                        let public = secret.public_key().to_encoded_point(false);
                        if public.as_bytes() != sec1.as_slice() {
                            bail!("private key does not match public key");
                        }
                        Some(p384::ecdsa::SigningKey::from(secret))
                    }
                    None => None,
                };
                CurveKey::P384 {
                    verifying_key: p384::ecdsa::VerifyingKey::from_sec1_bytes(&sec1)?,
                    signing_key,
                }
            }
            Curve::P521 => {
                let signing_key = match d {
                    Some(d) => {
                        let secret = p521::SecretKey::from_slice(d)?;
                        let public = secret.public_key().to_encoded_point(false);
                        if public.as_bytes() != sec1.as_slice() {
                            bail!("private key does not match public key");
                        }
                        Some(p521::ecdsa::SigningKey::from_slice(d)?)
                    }
                    None => None,
                };
                CurveKey::P521 {
                    verifying_key: p521::ecdsa::VerifyingKey::from_sec1_bytes(&sec1)?,
                    signing_key,
                }
            }
            Curve::Ed25519 => bail!("{curve:?} is not an ECDSA curve"),
        };

        Ok(Self {
            algorithm,
            curve,
            key,
        })
    }

    /// The curve the key is on.
    #[must_use]
    pub const fn curve(&self) -> Curve {
        self.curve
    }
}

impl Signer for EcdsaKey {
    fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn can_sign(&self) -> bool {
        match &self.key {
            CurveKey::P256 { signing_key, .. } => signing_key.is_some(),
            CurveKey::P384 { signing_key, .. } => signing_key.is_some(),
            CurveKey::P521 { signing_key, .. } => signing_key.is_some(),
        }
    }

    fn try_sign(&self, msg: &[u8]) -> anyhow::Result<Vec<u8>> {
        match &self.key {
            CurveKey::P256 {
                signing_key: Some(key),
                ..
            } => {
                let signature: p256::ecdsa::Signature = key.try_sign(msg)?;
                Ok(signature.to_bytes().to_vec())
            }
            CurveKey::P384 {
                signing_key: Some(key),
                ..
            } => {
                let signature: p384::ecdsa::Signature = key.try_sign(msg)?;
                Ok(signature.to_bytes().to_vec())
            }
            CurveKey::P521 {
                signing_key: Some(key),
                ..
            } => {
                let signature: p521::ecdsa::Signature = key.try_sign(msg)?;
                Ok(signature.to_bytes().to_vec())
            }
            _ => bail!("EC key has no private key"),
        }
    }

    fn verify(&self, msg: &[u8], signature: &[u8]) -> anyhow::Result<()> {
        match &self.key {
            CurveKey::P256 { verifying_key, .. } => {
                let signature = p256::ecdsa::Signature::from_slice(signature)?;
                verifying_key.verify(msg, &signature)?;
            }
            CurveKey::P384 { verifying_key, .. } => {
                let signature = p384::ecdsa::Signature::from_slice(signature)?;
                verifying_key.verify(msg, &signature)?;
            }
            CurveKey::P521 { verifying_key, .. } => {
                let signature = p521::ecdsa::Signature::from_slice(signature)?;
                verifying_key.verify(msg, &signature)?;
            }
        }
        Ok(())
    }
}
