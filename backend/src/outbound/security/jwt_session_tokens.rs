//! HS256 JSON Web Token implementation of the session token port.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::domain::SessionClaims;
use crate::domain::ports::{SessionTokenError, SessionTokens};

/// Signs and verifies admin session tokens with a shared secret.
#[derive(Clone)]
pub struct JwtSessionTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionTokens {
    /// Build a signer from the raw secret bytes.
    ///
    /// `exp` must be present but is not compared with the wall clock here;
    /// the session service checks it against its injected clock.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl std::fmt::Debug for JwtSessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionTokens").finish_non_exhaustive()
    }
}

impl SessionTokens for JwtSessionTokens {
    fn issue(&self, claims: &SessionClaims) -> Result<String, SessionTokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|err| SessionTokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<SessionClaims, SessionTokenError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| SessionTokenError::invalid(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AdminId, SUPER_ADMIN_ROLE};
    use chrono::Utc;
    use rstest::{fixture, rstest};

    const SECRET: &[u8] = b"test-secret-with-enough-bytes";

    #[fixture]
    fn tokens() -> JwtSessionTokens {
        JwtSessionTokens::new(SECRET)
    }

    fn claims_expiring_in(seconds: i64) -> SessionClaims {
        let now = Utc::now().timestamp();
        SessionClaims {
            sub: AdminId::random(),
            username: "admin".to_owned(),
            role: SUPER_ADMIN_ROLE.to_owned(),
            iat: now,
            exp: now + seconds,
        }
    }

    #[rstest]
    fn issued_tokens_verify(tokens: JwtSessionTokens) {
        let claims = claims_expiring_in(3600);
        let token = tokens.issue(&claims).expect("issue");
        assert_eq!(tokens.verify(&token).expect("verify"), claims);
    }

    #[rstest]
    fn past_expiry_is_left_to_the_caller(tokens: JwtSessionTokens) {
        let claims = claims_expiring_in(-60);
        let token = tokens.issue(&claims).expect("issue");
        assert_eq!(tokens.verify(&token), Ok(claims));
    }

    #[rstest]
    fn tokens_without_expiry_are_invalid(tokens: JwtSessionTokens) {
        #[derive(serde::Serialize)]
        struct NoExpiry<'a> {
            sub: &'a str,
        }
        let token = encode(
            &Header::new(Algorithm::HS256),
            &NoExpiry {
                sub: "00000000-0000-0000-0000-000000000000",
            },
            &EncodingKey::from_secret(SECRET),
        )
        .expect("encode");
        let err = tokens.verify(&token).expect_err("missing exp");
        assert!(matches!(err, SessionTokenError::Invalid { .. }));
    }

    #[rstest]
    fn tokens_signed_with_another_secret_are_invalid(tokens: JwtSessionTokens) {
        let foreign = JwtSessionTokens::new(b"another-secret")
            .issue(&claims_expiring_in(3600))
            .expect("issue");
        let err = tokens.verify(&foreign).expect_err("foreign signature");
        assert!(matches!(err, SessionTokenError::Invalid { .. }));
    }

    #[rstest]
    #[case("")]
    #[case("not-a-token")]
    #[case("a.b.c")]
    fn garbage_is_invalid(tokens: JwtSessionTokens, #[case] token: &str) {
        let err = tokens.verify(token).expect_err("garbage");
        assert!(matches!(err, SessionTokenError::Invalid { .. }));
    }
}
