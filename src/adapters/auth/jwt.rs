//! HS256 session tokens.
//!
//! A single service both issues and validates tokens, since both sides share
//! the signing secret.

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, Role, Timestamp, UserId};
use crate::domain::user::User;
use crate::ports::{IssuedToken, SessionValidator, TokenIssuer};

/// Claims carried by every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id
    pub sub: String,
    pub email: String,
    pub role: String,
    pub iat: u64,
    pub exp: u64,
}

pub struct JwtSessionService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: u64,
}

impl JwtSessionService {
    pub fn new(secret: &SecretString, ttl_secs: u64) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            ttl_secs,
        }
    }

    /// Issue a token as if it had been issued at `issued_at`.
    pub fn issue_at(&self, user: &User, issued_at: Timestamp) -> Result<IssuedToken, AuthError> {
        let expires_at = issued_at.plus_secs(self.ttl_secs);
        let claims = SessionClaims {
            sub: user.id.to_string(),
            email: user.email.as_str().to_string(),
            role: user.role.as_str().to_string(),
            iat: issued_at.as_unix_secs(),
            exp: expires_at.as_unix_secs(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(
            |e| {
                tracing::error!(error = %e, "Failed to sign session token");
                AuthError::service_unavailable("token signing failed")
            },
        )?;
        Ok(IssuedToken { token, expires_at })
    }

    fn decode_claims(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Session token expired");
                    AuthError::TokenExpired
                }
                ErrorKind::InvalidSignature => {
                    tracing::warn!("Session token signature mismatch");
                    AuthError::InvalidSignature
                }
                _ => {
                    tracing::debug!(error = %e, "Malformed session token");
                    AuthError::MalformedToken
                }
            })
    }
}

impl TokenIssuer for JwtSessionService {
    fn issue(&self, user: &User) -> Result<IssuedToken, AuthError> {
        self.issue_at(user, Timestamp::now())
    }
}

#[async_trait]
impl SessionValidator for JwtSessionService {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.decode_claims(token)?;
        let id: UserId = claims.sub.parse().map_err(|_| AuthError::MalformedToken)?;
        let role: Role = claims.role.parse()?;
        Ok(AuthenticatedUser::new(id, claims.email, role))
    }
}
