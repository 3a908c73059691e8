//! HS256 access tokens carrying `{id, username}`.

use chrono::Utc;
use domains::{AccessTokenVerifier, Credentials, TokenError};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct AccessClaims {
    id: String,
    username: String,
    #[serde(default)]
    iat: Option<i64>,
}

pub struct JwtAccessTokenVerifier {
    key: DecodingKey,
    validation: Validation,
    /// Tokens issued longer ago than this are refused, `exp` or not.
    max_age_secs: Option<i64>,
}

impl JwtAccessTokenVerifier {
    pub fn new(secret: &SecretString, max_age_secs: Option<i64>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // `exp` is checked when present but not required; age comes from `iat`.
        validation.required_spec_claims.clear();
        Self {
            key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation,
            max_age_secs,
        }
    }
}

impl AccessTokenVerifier for JwtAccessTokenVerifier {
    fn verify(&self, token: &str) -> Result<Credentials, TokenError> {
        let data = decode::<AccessClaims>(token, &self.key, &self.validation).map_err(|err| {
            debug!(error = %err, "access token rejected");
            match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;
        let claims = data.claims;

        if let (Some(max_age), Some(iat)) = (self.max_age_secs, claims.iat) {
            if Utc::now().timestamp() - iat > max_age {
                return Err(TokenError::Expired);
            }
        }

        Ok(Credentials {
            id: claims.id,
            username: claims.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Claims<'a> {
        id: &'a str,
        username: &'a str,
        iat: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        exp: Option<i64>,
    }

    const SECRET: &str = "super-secret-access-key";

    fn sign(secret: &str, iat: i64, exp: Option<i64>) -> String {
        let claims = Claims {
            id: "user-123",
            username: "dicoding",
            iat,
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn verifier(max_age: Option<i64>) -> JwtAccessTokenVerifier {
        JwtAccessTokenVerifier::new(&SecretString::from(SECRET.to_string()), max_age)
    }

    #[test]
    fn accepts_fresh_token() {
        let token = sign(SECRET, Utc::now().timestamp(), None);
        let creds = verifier(Some(3000)).verify(&token).unwrap();
        assert_eq!(
            creds,
            Credentials {
                id: "user-123".into(),
                username: "dicoding".into()
            }
        );
    }

    #[test]
    fn rejects_foreign_signature() {
        let token = sign("another-key", Utc::now().timestamp(), None);
        assert_eq!(verifier(None).verify(&token), Err(TokenError::Invalid));
        assert_eq!(verifier(None).verify("not-a-jwt"), Err(TokenError::Invalid));
    }

    #[test]
    fn rejects_token_past_max_age() {
        let token = sign(SECRET, Utc::now().timestamp() - 3600, None);
        assert_eq!(verifier(Some(60)).verify(&token), Err(TokenError::Expired));
        assert!(verifier(None).verify(&token).is_ok());
    }

    #[test]
    fn rejects_expired_exp_claim() {
        let now = Utc::now().timestamp();
        let token = sign(SECRET, now - 7200, Some(now - 3600));
        assert_eq!(verifier(None).verify(&token), Err(TokenError::Expired));
    }
}
