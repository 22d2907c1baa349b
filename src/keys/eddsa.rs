use anyhow::{anyhow, bail};
use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier as _, VerifyingKey};

use crate::jose::jwa::Algorithm;
use crate::signature::Signer;

/// An Ed25519 key used with `EdDSA`.
pub struct Ed25519Key {
    verifying_key: VerifyingKey,
    signing_key: Option<SigningKey>,
}

impl Ed25519Key {
    /// Build a key from the public key bytes (`x`) and, optionally, the
    /// private key seed (`d`).
    ///
    /// # Errors
    ///
    /// Returns an error if either value has the wrong length, `x` is not a
    /// valid point, or `d` does not derive `x`.
    pub fn from_bytes(x: &[u8], d: Option<&[u8]>) -> anyhow::Result<Self> {
        let x_bytes = x.try_into().map_err(|_| anyhow!("invalid public key length"))?;
        let verifying_key = VerifyingKey::from_bytes(x_bytes)
            .map_err(|e| anyhow!("unable to build verifying key: {e}"))?;

        let signing_key = match d {
            Some(d) => {
                let d_bytes = d.try_into().map_err(|_| anyhow!("invalid secret key length"))?;
                let signing_key = SigningKey::from_bytes(d_bytes);
                if signing_key.verifying_key() != verifying_key {
                    bail!("private key does not match public key");
                }
                Some(signing_key)
            }
            None => None,
        };

        Ok(Self {
            verifying_key,
            signing_key,
        })
    }
}

impl Signer for Ed25519Key {
    fn algorithm(&self) -> Algorithm {
        Algorithm::EdDSA
    }

    fn can_sign(&self) -> bool {
        self.signing_key.is_some()
    }

    fn try_sign(&self, msg: &[u8]) -> anyhow::Result<Vec<u8>> {
        let Some(signing_key) = &self.signing_key else {
            bail!("OKP key has no private key");
        };
        Ok(signing_key.try_sign(msg)?.to_bytes().to_vec())
    }

    fn verify(&self, msg: &[u8], signature: &[u8]) -> anyhow::Result<()> {
        let signature = Signature::from_slice(signature)
            .map_err(|e| anyhow!("unable to build signature: {e}"))?;
        self.verifying_key
            .verify(msg, &signature)
            .map_err(|e| anyhow!("unable to verify signature: {e}"))
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::OsRng;

    use super::*;

    #[test]
    fn sign_and_verify() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let x = signing_key.verifying_key().to_bytes();
        let d = signing_key.to_bytes();

        let private = Ed25519Key::from_bytes(&x, Some(d.as_slice())).expect("should build key");
        let public = Ed25519Key::from_bytes(&x, None).expect("should build key");
        assert!(private.can_sign());
        assert!(!public.can_sign());

        let sig = private.try_sign(b"message").expect("should sign");
        assert!(public.verify(b"message", &sig).is_ok());
        assert!(public.verify(b"tampered", &sig).is_err());

        let err = public.try_sign(b"message").expect_err("should fail");
        assert_eq!(err.to_string(), "OKP key has no private key");
    }

    #[test]
    fn mismatched_private_key() {
        let x = SigningKey::generate(&mut OsRng).verifying_key().to_bytes();
        let d = SigningKey::generate(&mut OsRng).to_bytes();
        assert!(Ed25519Key::from_bytes(&x, Some(d.as_slice())).is_err());
    }

    #[test]
    fn short_public_key() {
        assert!(Ed25519Key::from_bytes(&[0; 31], None).is_err());
    }
}
