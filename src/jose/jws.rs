//! # JSON Web Signature (JWS)
//!
//! JWS ([RFC7515]) represents content secured with digital signatures using
//! JSON-based data structures. Only the compact serialisation is supported:
//! three base64url segments (header, payload, signature) joined by `.`.
//!
//! [RFC7515]: https://www.rfc-editor.org/rfc/rfc7515

use anyhow::{anyhow, bail};
use base64ct::{Base64UrlUnpadded, Encoding};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::jose::codec::{self, JsonCodec};
use crate::jose::jwt::{Header, Jwt};
use crate::signature::Signer;

/// The three segments of a compact JWS, still base64url encoded.
struct Compact<'a> {
    header: &'a str,
    payload: &'a str,
    signature: &'a str,
}

impl<'a> Compact<'a> {
    fn split(token: &'a str) -> anyhow::Result<Self> {
        let parts = token.split('.').collect::<Vec<&str>>();
        let &[header, payload, signature] = parts.as_slice() else {
            bail!("invalid Compact JWS format");
        };
        Ok(Self {
            header,
            payload,
            signature,
        })
    }

    fn signing_input(&self) -> String {
        format!("{}.{}", self.header, self.payload)
    }
}

/// Encode the provided header and claims and sign, returning a JWT in compact
/// JWS form.
///
/// # Errors
///
/// Returns an error if the header or claims cannot be encoded, or the signer
/// is unable to sign.
pub fn encode<T>(
    header: &Header, claims: &T, signer: &dyn Signer, codec: &dyn JsonCodec,
) -> anyhow::Result<String>
where
    T: Serialize,
{
    tracing::debug!(alg = %header.alg, kid = ?header.kid, "encode");

    let header_enc = Base64UrlUnpadded::encode_string(&codec::to_vec(codec, header)?);
    let claims_enc = Base64UrlUnpadded::encode_string(&codec::to_vec(codec, claims)?);
    let payload = format!("{header_enc}.{claims_enc}");

    let sig = signer.try_sign(payload.as_bytes())?;
    let sig_enc = Base64UrlUnpadded::encode_string(&sig);

    Ok(format!("{payload}.{sig_enc}"))
}

/// Decode only the header of a compact JWS. The signature is not checked.
///
/// # Errors
///
/// Returns an error if the token is not a compact JWS or the header cannot be
/// decoded.
pub fn header(token: &str, codec: &dyn JsonCodec) -> anyhow::Result<Header> {
    let compact = Compact::split(token)?;
    let decoded = Base64UrlUnpadded::decode_vec(compact.header)
        .map_err(|e| anyhow!("issue decoding header: {e}"))?;
    codec::from_slice(codec, &decoded).map_err(|e| anyhow!("issue deserializing header: {e}"))
}

/// Verify the token's signature with `signer`, then decode the claims.
///
/// The header `alg` must name the signer's algorithm.
///
/// # Errors
///
/// Returns an error if the token is malformed, the algorithm does not match,
/// the signature is invalid, or the claims cannot be decoded as `T`.
pub fn decode<T>(
    token: &str, signer: &dyn Signer, codec: &dyn JsonCodec,
) -> anyhow::Result<Jwt<T>>
where
    T: DeserializeOwned,
{
    let compact = Compact::split(token)?;

    let decoded = Base64UrlUnpadded::decode_vec(compact.header)
        .map_err(|e| anyhow!("issue decoding header: {e}"))?;
    let header: Header = codec::from_slice(codec, &decoded)
        .map_err(|e| anyhow!("issue deserializing header: {e}"))?;
    let sig = Base64UrlUnpadded::decode_vec(compact.signature)
        .map_err(|e| anyhow!("issue decoding signature: {e}"))?;

    if header.alg != signer.algorithm().as_str() {
        bail!("'alg' {} does not match signer algorithm {}", header.alg, signer.algorithm());
    }
    signer.verify(compact.signing_input().as_bytes(), &sig)?;

    let decoded = Base64UrlUnpadded::decode_vec(compact.payload)
        .map_err(|e| anyhow!("issue decoding claims: {e}"))?;
    let claims = codec::from_slice(codec, &decoded)
        .map_err(|e| anyhow!("issue deserializing claims: {e}"))?;

    Ok(Jwt { header, claims })
}

/// Decode the claims without checking the signature.
///
/// For inspecting untrusted tokens only. Never use in place of [`decode`].
///
/// # Errors
///
/// Returns an error if the token is not a compact JWS or the claims cannot be
/// decoded as `T`.
pub fn unverified<T>(token: &str, codec: &dyn JsonCodec) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let compact = Compact::split(token)?;
    let decoded = Base64UrlUnpadded::decode_vec(compact.payload)
        .map_err(|e| anyhow!("issue decoding claims: {e}"))?;
    codec::from_slice(codec, &decoded).map_err(|e| anyhow!("issue deserializing claims: {e}"))
}

#[cfg(test)]
mod test {
    use serde_json::{json, Value};

    use super::*;
    use crate::jose::codec::SerdeJson;
    use crate::jose::jwa::Algorithm;

    // Signs by echoing the message back; verifies by comparison.
    struct Echo;

    impl Signer for Echo {
        fn algorithm(&self) -> Algorithm {
            Algorithm::EdDSA
        }

        fn can_sign(&self) -> bool {
            true
        }

        fn try_sign(&self, msg: &[u8]) -> anyhow::Result<Vec<u8>> {
            Ok(msg.to_vec())
        }

        fn verify(&self, msg: &[u8], signature: &[u8]) -> anyhow::Result<()> {
            if msg != signature {
                bail!("signature mismatch");
            }
            Ok(())
        }
    }

    fn header() -> Header {
        Header {
            alg: "EdDSA".into(),
            typ: Some("JWT".into()),
            kid: Some("k1".into()),
            ..Header::default()
        }
    }

    #[test]
    fn encode_decode() {
        let token =
            encode(&header(), &json!({"sub": "123"}), &Echo, &SerdeJson).expect("should encode");
        assert_eq!(token.split('.').count(), 3);

        let jwt: Jwt<Value> = decode(&token, &Echo, &SerdeJson).expect("should decode");
        assert_eq!(jwt.header, header());
        assert_eq!(jwt.claims, json!({"sub": "123"}));
    }

    #[test]
    fn tampered_payload() {
        let token =
            encode(&header(), &json!({"sub": "123"}), &Echo, &SerdeJson).expect("should encode");
        let parts = token.split('.').collect::<Vec<_>>();
        let forged = Base64UrlUnpadded::encode_string(br#"{"sub":"456"}"#);
        let tampered = format!("{}.{forged}.{}", parts[0], parts[2]);

        let err = decode::<Value>(&tampered, &Echo, &SerdeJson).expect_err("should fail");
        assert_eq!(err.to_string(), "signature mismatch");
    }

    #[test]
    fn algorithm_mismatch() {
        let header = Header {
            alg: "RS256".into(),
            ..Header::default()
        };
        let token = encode(&header, &json!({}), &Echo, &SerdeJson).expect("should encode");
        assert!(decode::<Value>(&token, &Echo, &SerdeJson).is_err());
    }

    #[test]
    fn malformed_token() {
        let err = decode::<Value>("a.b", &Echo, &SerdeJson).expect_err("should fail");
        assert_eq!(err.to_string(), "invalid Compact JWS format");
        assert!(unverified::<Value>("a.b.c.d", &SerdeJson).is_err());
    }

    #[test]
    fn unverified_ignores_signature() {
        let token =
            encode(&header(), &json!({"sub": "123"}), &Echo, &SerdeJson).expect("should encode");
        let parts = token.split('.').collect::<Vec<_>>();
        let unsigned = format!("{}.{}.AAAA", parts[0], parts[1]);

        let claims: Value = unverified(&unsigned, &SerdeJson).expect("should decode");
        assert_eq!(claims, json!({"sub": "123"}));
    }
}
