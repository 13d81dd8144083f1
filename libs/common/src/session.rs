//! Stateless session tokens
//!
//! A session token is an HS256 JWT signed with a process-wide secret. It
//! carries the account id and its role; nothing is stored server side, so
//! every request rebuilds the session from the signed payload alone.

use axum::http::{HeaderMap, header::AUTHORIZATION};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::role::Role;

/// Name of the cookie holding the session token
pub const SESSION_COOKIE: &str = "session-token";

const MIN_SECRET_LEN: usize = 32;

/// Errors raised while configuring, issuing or verifying session tokens
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session configuration error: {0}")]
    Configuration(String),

    #[error("Session token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Session token configuration
#[derive(Clone)]
pub struct SessionConfig {
    /// HMAC secret shared by every service that reads sessions
    pub secret: String,
    /// Token lifetime in seconds (default: 30 days)
    pub max_age: i64,
    /// Mark the session cookie `Secure`, for deployments behind TLS
    pub secure_cookie: bool,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"<redacted>")
            .field("max_age", &self.max_age)
            .field("secure_cookie", &self.secure_cookie)
            .finish()
    }
}

impl SessionConfig {
    /// Create a new SessionConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SESSION_SECRET`: signing secret, at least 32 bytes (required)
    /// - `SESSION_MAX_AGE`: token lifetime in seconds (default: 2592000)
    /// - `SESSION_COOKIE_SECURE`: `true`/`1` to send the cookie over HTTPS only (default: false)
    pub fn from_env() -> Result<Self, SessionError> {
        let secret = std::env::var("SESSION_SECRET").map_err(|_| {
            SessionError::Configuration("SESSION_SECRET environment variable not set".to_string())
        })?;

        let max_age = std::env::var("SESSION_MAX_AGE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30 * 24 * 60 * 60);

        let secure_cookie = std::env::var("SESSION_COOKIE_SECURE")
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self::new(secret, max_age)?.with_secure_cookie(secure_cookie))
    }

    pub fn new(secret: impl Into<String>, max_age: i64) -> Result<Self, SessionError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(SessionError::Configuration(format!(
                "SESSION_SECRET must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }
        if max_age <= 0 {
            return Err(SessionError::Configuration(
                "SESSION_MAX_AGE must be positive".to_string(),
            ));
        }

        Ok(Self {
            secret,
            max_age,
            secure_cookie: false,
        })
    }

    pub fn with_secure_cookie(mut self, secure_cookie: bool) -> Self {
        self.secure_cookie = secure_cookie;
        self
    }
}

/// Session token claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id, from whichever store matched at login
    pub sub: Uuid,
    /// Role tag derived at login
    pub role: Role,
    pub email: String,
    pub name: String,
    /// Issued at time
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

/// Identity embedded into a new session token
#[derive(Debug, Clone)]
pub struct SessionSubject<'a> {
    pub id: Uuid,
    pub role: Role,
    pub email: &'a str,
    pub name: &'a str,
}

/// Issues and verifies session tokens
#[derive(Clone)]
pub struct SessionTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    max_age: i64,
    secure_cookie: bool,
}

impl SessionTokens {
    pub fn new(config: SessionConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            max_age: config.max_age,
            secure_cookie: config.secure_cookie,
        }
    }

    /// Sign a token for a freshly verified account
    pub fn issue(&self, subject: &SessionSubject<'_>) -> Result<String, SessionError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject.id,
            role: subject.role,
            email: subject.email.to_string(),
            name: subject.name.to_string(),
            iat: now,
            exp: now + self.max_age,
        };

        self.encode(&claims)
    }

    /// Check signature and expiry, returning the embedded claims
    pub fn verify(&self, token: &str) -> Result<Claims, SessionError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }

    /// Token lifetime in seconds
    pub fn max_age(&self) -> i64 {
        self.max_age
    }

    /// Cookie carrying a token issued by these settings
    pub fn cookie(&self, token: String) -> Cookie<'static> {
        session_cookie(token, self.secure_cookie)
    }

    fn encode(&self, claims: &Claims) -> Result<String, SessionError> {
        Ok(encode(
            &Header::new(Algorithm::HS256),
            claims,
            &self.encoding_key,
        )?)
    }
}

/// Pull a session token out of a request: bearer header first, then cookie
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Cookie carrying a freshly issued session token
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Cookie shape used to clear the session cookie
pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use axum::http::header::COOKIE;
    use serial_test::serial;

    const SECRET: &str = "an-adequately-long-test-secret-0123456789";

    fn tokens() -> SessionTokens {
        SessionTokens::new(SessionConfig::new(SECRET, 3600).unwrap())
    }

    fn subject(role: Role) -> (Uuid, SessionSubject<'static>) {
        let id = Uuid::new_v4();
        (
            id,
            SessionSubject {
                id,
                role,
                email: "provider1@example.com",
                name: "Service Provider 1",
            },
        )
    }

    #[test]
    fn test_issue_then_verify_keeps_identity_and_role() {
        let tokens = tokens();
        let (id, subject) = subject(Role::ServiceProvider);

        let token = tokens.issue(&subject).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, Role::ServiceProvider);
        assert_eq!(claims.email, "provider1@example.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let (_, subject) = subject(Role::User);
        let foreign = SessionTokens::new(
            SessionConfig::new("another-secret-that-is-long-enough-0000", 3600).unwrap(),
        );
        let token = foreign.issue(&subject).unwrap();

        assert!(tokens().verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let tokens = tokens();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: Role::Admin,
            email: "admin1@example.com".to_string(),
            name: "Admin 1".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = tokens.encode(&claims).unwrap();

        assert!(tokens.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(tokens().verify("not-a-jwt").is_err());
    }

    #[test]
    fn test_short_secret_is_rejected() {
        assert!(matches!(
            SessionConfig::new("short", 3600),
            Err(SessionError::Configuration(_))
        ));
        assert!(SessionConfig::new(SECRET, 0).is_err());
    }

    #[test]
    #[serial]
    fn test_session_config_from_env() {
        unsafe {
            std::env::set_var("SESSION_SECRET", SECRET);
            std::env::remove_var("SESSION_MAX_AGE");
            std::env::remove_var("SESSION_COOKIE_SECURE");
        }

        let config = SessionConfig::from_env().unwrap();
        assert_eq!(config.max_age, 2_592_000);
        assert!(!config.secure_cookie);

        unsafe {
            std::env::set_var("SESSION_COOKIE_SECURE", "true");
        }
        assert!(SessionConfig::from_env().unwrap().secure_cookie);

        unsafe {
            std::env::set_var("SESSION_MAX_AGE", "60");
        }
        assert_eq!(SessionConfig::from_env().unwrap().max_age, 60);

        unsafe {
            std::env::remove_var("SESSION_SECRET");
            std::env::remove_var("SESSION_MAX_AGE");
            std::env::remove_var("SESSION_COOKIE_SECURE");
        }
        assert!(SessionConfig::from_env().is_err());
    }

    #[test]
    fn test_token_from_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));

        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; session-token=abc.def.ghi"),
        );

        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_missing_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(token_from_headers(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(token_from_headers(&headers), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc".to_string(), false);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_ne!(cookie.secure(), Some(true));
    }

    #[test]
    fn test_session_cookie_is_secure_behind_tls() {
        let secure_tokens = SessionTokens::new(
            SessionConfig::new(SECRET, 3600)
                .unwrap()
                .with_secure_cookie(true),
        );

        let cookie = secure_tokens.cookie("abc".to_string());
        assert_eq!(cookie.secure(), Some(true));
        assert!(cookie.to_string().contains("Secure"));
        assert_eq!(tokens().cookie("abc".to_string()).secure(), Some(false));
    }
}
