use anyhow::bail;
use ::rsa::pkcs1v15::{
    Signature, SigningKey as Pkcs1SigningKey, VerifyingKey as Pkcs1VerifyingKey,
};
use ::rsa::signature::{SignatureEncoding as _, Signer as _, Verifier as _};
use ::rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use sha2::{Sha256, Sha384, Sha512};

use crate::jose::jwa::Algorithm;
use crate::signature::Signer;

enum SigningKey {
    Rs256(Pkcs1SigningKey<Sha256>),
    Rs384(Pkcs1SigningKey<Sha384>),
    Rs512(Pkcs1SigningKey<Sha512>),
}

impl SigningKey {
    fn sign(&self, msg: &[u8]) -> anyhow::Result<Vec<u8>> {
        let signature = match self {
            Self::Rs256(key) => key.try_sign(msg)?,
            Self::Rs384(key) => key.try_sign(msg)?,
            Self::Rs512(key) => key.try_sign(msg)?,
        };
        Ok(signature.to_vec())
    }
}

enum VerifyingKey {
    Rs256(Pkcs1VerifyingKey<Sha256>),
    Rs384(Pkcs1VerifyingKey<Sha384>),
    Rs512(Pkcs1VerifyingKey<Sha512>),
}

impl VerifyingKey {
    fn verify(&self, msg: &[u8], signature: &Signature) -> anyhow::Result<()> {
        match self {
            Self::Rs256(key) => key.verify(msg, signature)?,
            Self::Rs384(key) => key.verify(msg, signature)?,
            Self::Rs512(key) => key.verify(msg, signature)?,
        }
        Ok(())
    }
}

/// An RSA key used with RSASSA-PKCS1-v1_5 (`RS256`, `RS384`, `RS512`).
pub struct RsaKey {
    algorithm: Algorithm,
    verifying_key: VerifyingKey,
    signing_key: Option<SigningKey>,
}

impl RsaKey {
    /// Build a key from big-endian modulus and exponent bytes. A private
    /// exponent makes the key signing capable; prime factors are recovered
    /// from it when `primes` is not supplied.
    ///
    /// # Errors
    ///
    /// Returns an error if `algorithm` is not an RSA algorithm or the
    /// components do not form a valid key.
    pub fn from_components(
        algorithm: Algorithm, n: &[u8], e: &[u8], d: Option<&[u8]>,
        primes: Option<(&[u8], &[u8])>,
    ) -> anyhow::Result<Self> {
        let n = BigUint::from_bytes_be(n);
        let e = BigUint::from_bytes_be(e);
        let public_key = RsaPublicKey::new(n.clone(), e.clone())?;

        let private_key = match d {
            Some(d) => {
                let primes = primes.map_or_else(Vec::new, |(p, q)| {
                    vec![BigUint::from_bytes_be(p), BigUint::from_bytes_be(q)]
                });
                let key = RsaPrivateKey::from_components(n, e, BigUint::from_bytes_be(d), primes)?;
                key.validate()?;
                Some(key)
            }
            None => None,
        };

        let (verifying_key, signing_key) = match algorithm {
            Algorithm::RS256 => (
                VerifyingKey::Rs256(Pkcs1VerifyingKey::new(public_key)),
                private_key.map(|k| SigningKey::Rs256(Pkcs1SigningKey::new(k))),
            ),
            Algorithm::RS384 => (
                VerifyingKey::Rs384(Pkcs1VerifyingKey::new(public_key)),
                private_key.map(|k| SigningKey::Rs384(Pkcs1SigningKey::new(k))),
            ),
            Algorithm::RS512 => (
                VerifyingKey::Rs512(Pkcs1VerifyingKey::new(public_key)),
                private_key.map(|k| SigningKey::Rs512(Pkcs1SigningKey::new(k))),
            ),
            _ => bail!("{algorithm} is not an RSA algorithm"),
        };

        Ok(Self {
            algorithm,
            verifying_key,
            signing_key,
        })
    }
}

impl Signer for RsaKey {
    fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn can_sign(&self) -> bool {
        self.signing_key.is_some()
    }

    fn try_sign(&self, msg: &[u8]) -> anyhow::Result<Vec<u8>> {
        let Some(signing_key) = &self.signing_key else {
            bail!("RSA key has no private exponent");
        };
        signing_key.sign(msg)
    }

    fn verify(&self, msg: &[u8], signature: &[u8]) -> anyhow::Result<()> {
        let signature = Signature::try_from(signature)?;
        self.verifying_key.verify(msg, &signature)
    }
}
