use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::auth::{AuthConfig, AuthError, AuthResult};

/// Claims carried by an access token. The token is stateless: validity is a
/// function of the signature and expiry alone, so deactivating an account is
/// the only pre-expiry revocation mechanism (enforced by the request guard).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AccessTokenClaims {
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
    pub username: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone)]
pub struct SignedAccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    token_ttl: Duration,
}

impl JwtService {
    pub fn from_config(config: &AuthConfig) -> AuthResult<Self> {
        let secret_bytes = config.jwt_secret.as_bytes();
        let encoding_key = EncodingKey::from_secret(secret_bytes);
        let decoding_key = DecodingKey::from_secret(secret_bytes);

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[config.audience.clone()]);
        validation.set_issuer(&[config.issuer.clone()]);
        validation.leeway = 30;

        Ok(Self {
            encoding_key,
            decoding_key,
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            token_ttl: Duration::seconds(config.token_ttl_secs),
        })
    }

    pub fn issue_access_token(
        &self,
        admin_id: i32,
        username: &str,
        email: &str,
        role: &str,
    ) -> AuthResult<SignedAccessToken> {
        let now = Utc::now();
        let expires_at = now + self.token_ttl;

        let claims = AccessTokenClaims {
            sub: admin_id.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            role: role.to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        Ok(SignedAccessToken { token, expires_at })
    }

    /// Decode and validate a token, collapsing all failure modes into the
    /// expired/invalid split the guard reports.
    pub fn decode_access_token(&self, token: &str) -> AuthResult<AccessTokenClaims> {
        match decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(err) => match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(AuthError::TokenExpired),
                _ => Err(AuthError::TokenInvalid),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_config(ttl_secs: i64) -> AuthConfig {
        AuthConfig {
            issuer: "https://consultancy.test".into(),
            audience: "consultancy-api".into(),
            token_ttl_secs: ttl_secs,
            jwt_secret: "super-secret-test-key".into(),
        }
    }

    #[test]
    fn issues_and_decodes_access_tokens() {
        let service = JwtService::from_config(&make_test_config(86_400)).expect("jwt service");

        let token = service
            .issue_access_token(7, "jordan", "jordan@example.com", "super-admin")
            .expect("issue token");

        let claims = service
            .decode_access_token(&token.token)
            .expect("decode token");

        assert_eq!(claims.sub, "7");
        assert_eq!(claims.username, "jordan");
        assert_eq!(claims.email, "jordan@example.com");
        assert_eq!(claims.role, "super-admin");
        assert_eq!(claims.exp - claims.iat, 86_400);
    }

    #[test]
    fn rejects_expired_tokens() {
        // TTL past the 30s decode leeway so the token is already expired.
        let service = JwtService::from_config(&make_test_config(-120)).expect("jwt service");
        let token = service
            .issue_access_token(1, "sam", "sam@example.com", "admin")
            .expect("issue token");

        match service.decode_access_token(&token.token) {
            Err(AuthError::TokenExpired) => {}
            other => panic!("expected TokenExpired, got {other:?}"),
        }
    }

    #[test]
    fn rejects_tokens_signed_with_another_key() {
        let issuing = JwtService::from_config(&make_test_config(600)).expect("jwt service");
        let mut other_config = make_test_config(600);
        other_config.jwt_secret = "a-different-secret".into();
        let verifying = JwtService::from_config(&other_config).expect("jwt service");

        let token = issuing
            .issue_access_token(1, "sam", "sam@example.com", "admin")
            .expect("issue token");

        match verifying.decode_access_token(&token.token) {
            Err(AuthError::TokenInvalid) => {}
            other => panic!("expected TokenInvalid, got {other:?}"),
        }
    }
}
