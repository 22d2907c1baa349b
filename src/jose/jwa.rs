//! # JSON Web Algorithms (JWA)
//!
//! JWA [RFC7518] defines a set of cryptographic algorithms for use with
//! JWS ([RFC7515]), JWE ([RFC7516]), and JWK ([RFC7517]).
//!
//! Only the asymmetric signature algorithms are supported here.
//!
//! [RFC7515]: https://www.rfc-editor.org/rfc/rfc7515
//! [RFC7516]: https://www.rfc-editor.org/rfc/rfc7516
//! [RFC7517]: https://www.rfc-editor.org/rfc/rfc7517
//! [RFC7518]: https://www.rfc-editor.org/rfc/rfc7518

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Algorithm is used to specify the signing algorithm used by the signer.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// RSASSA-PKCS1-v1_5 using SHA-256
    #[serde(rename = "RS256")]
    RS256,

    /// RSASSA-PKCS1-v1_5 using SHA-384
    #[serde(rename = "RS384")]
    RS384,

    /// RSASSA-PKCS1-v1_5 using SHA-512
    #[serde(rename = "RS512")]
    RS512,

    /// ECDSA using P-256 and SHA-256
    #[serde(rename = "ES256")]
    ES256,

    /// ECDSA using P-384 and SHA-384
    #[serde(rename = "ES384")]
    ES384,

    /// ECDSA using P-521 and SHA-512
    #[serde(rename = "ES512")]
    ES512,

    /// Edwards-curve digital signatures
    #[serde(rename = "EdDSA")]
    EdDSA,
}

impl Algorithm {
    /// Map a free-form `alg` string to an algorithm. Unrecognised values
    /// yield `None` rather than an error.
    #[must_use]
    pub fn parse(alg: &str) -> Option<Self> {
        match alg {
            "RS256" => Some(Self::RS256),
            "RS384" => Some(Self::RS384),
            "RS512" => Some(Self::RS512),
            "ES256" => Some(Self::ES256),
            "ES384" => Some(Self::ES384),
            "ES512" => Some(Self::ES512),
            "EdDSA" => Some(Self::EdDSA),
            _ => None,
        }
    }

    /// The registered `alg` header value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RS256 => "RS256",
            Self::RS384 => "RS384",
            Self::RS512 => "RS512",
            Self::ES256 => "ES256",
            Self::ES384 => "ES384",
            Self::ES512 => "ES512",
            Self::EdDSA => "EdDSA",
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod test {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("RS256", Some(Algorithm::RS256))]
    #[case("ES512", Some(Algorithm::ES512))]
    #[case("EdDSA", Some(Algorithm::EdDSA))]
    #[case("HS256", None)]
    #[case("eddsa", None)]
    #[case("", None)]
    fn parse(#[case] alg: &str, #[case] expected: Option<Algorithm>) {
        assert_eq!(Algorithm::parse(alg), expected);
    }

    #[test]
    fn display_matches_header_value() {
        for alg in ["RS256", "RS384", "RS512", "ES256", "ES384", "ES512", "EdDSA"] {
            let parsed = Algorithm::parse(alg).expect("should parse");
            assert_eq!(parsed.to_string(), alg);
        }
    }
}
