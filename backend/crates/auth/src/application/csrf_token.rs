//! CSRF Token Service
//!
//! Stateless, short-lived HS256 tokens binding a user identifier to an
//! issue/expiry window. Verification pins the algorithm to HS256.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::application::config::AuthConfig;
use crate::domain::value_object::{csrf_claims::CsrfClaims, user_id::UserId};
use crate::error::{AuthError, AuthResult};

#[derive(Clone)]
pub struct CsrfTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    has_secret: bool,
    ttl: Duration,
    leeway: Duration,
}

impl CsrfTokenService {
    pub fn new(secret: &[u8], ttl: Duration, leeway: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            has_secret: !secret.is_empty(),
            ttl,
            leeway,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.csrf_secret, config.csrf_ttl, config.csrf_leeway)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `user_id`, valid from now for the configured TTL
    pub fn generate_token(&self, user_id: UserId) -> AuthResult<String> {
        self.generate_token_at(user_id, Utc::now())
    }

    pub fn generate_token_at(&self, user_id: UserId, now: DateTime<Utc>) -> AuthResult<String> {
        if !self.has_secret {
            return Err(AuthError::Signing("empty signing secret".to_string()));
        }

        let ttl =
            chrono::Duration::from_std(self.ttl).map_err(|e| AuthError::Signing(e.to_string()))?;
        let claims = CsrfClaims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify a token and return the user it was issued to
    pub fn verify_token(&self, token: &str) -> AuthResult<UserId> {
        self.verify_token_at(token, Utc::now())
    }

    /// Verify against an explicit clock
    ///
    /// Every time check runs against `now`. Issue times get the leeway;
    /// the expiry comparison is strict.
    pub fn verify_token_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<UserId> {
        if !self.has_secret {
            return Err(AuthError::InvalidToken("empty signing secret".to_string()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<CsrfClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?
            .claims;

        let now = now.timestamp();
        if claims.exp < now {
            return Err(AuthError::TokenExpired);
        }
        if claims.iat > now + self.leeway.as_secs() as i64 {
            return Err(AuthError::InvalidToken("issued in the future".to_string()));
        }

        claims
            .sub
            .parse::<UserId>()
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

impl fmt::Debug for CsrfTokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsrfTokenService")
            .field("ttl", &self.ttl)
            .field("leeway", &self.leeway)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn service() -> CsrfTokenService {
        CsrfTokenService::new(SECRET, Duration::from_secs(60), Duration::from_secs(5))
    }

    #[test]
    fn test_issue_then_verify() {
        let csrf = service();
        let user_id = UserId::new();

        let token = csrf.generate_token(user_id).unwrap();
        assert_eq!(csrf.verify_token(&token).unwrap(), user_id);
    }

    #[test]
    fn test_expired_by_simulated_clock() {
        let csrf = service();
        let now = Utc::now();
        let token = csrf.generate_token_at(UserId::new(), now).unwrap();

        let later = now + chrono::Duration::seconds(61);
        let err = csrf.verify_token_at(&token, later).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[test]
    fn test_verify_at_simulated_past() {
        let csrf = service();
        let user_id = UserId::new();
        let issued = Utc::now() - chrono::Duration::minutes(10);
        let token = csrf.generate_token_at(user_id, issued).unwrap();

        let shortly_after = issued + chrono::Duration::seconds(1);
        assert_eq!(csrf.verify_token_at(&token, shortly_after).unwrap(), user_id);
    }

    #[test]
    fn test_issued_in_future_is_invalid() {
        let csrf = service();
        let now = Utc::now();
        let token = csrf
            .generate_token_at(UserId::new(), now + chrono::Duration::seconds(30))
            .unwrap();

        let err = csrf.verify_token_at(&token, now).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_expired_long_ago_by_real_clock() {
        let csrf = service();
        let issued = Utc::now() - chrono::Duration::minutes(10);
        let token = csrf.generate_token_at(UserId::new(), issued).unwrap();

        let err = csrf.verify_token(&token).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[test]
    fn test_valid_at_exact_expiry() {
        let csrf = service();
        let now = Utc::now();
        let user_id = UserId::new();
        let token = csrf.generate_token_at(user_id, now).unwrap();

        let at_expiry = now + chrono::Duration::seconds(60);
        assert_eq!(csrf.verify_token_at(&token, at_expiry).unwrap(), user_id);
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let csrf = service();
        let token = csrf.generate_token(UserId::new()).unwrap();

        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        let err = csrf.verify_token(&tampered).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_other_secret_is_invalid() {
        let token = service().generate_token(UserId::new()).unwrap();
        let other = CsrfTokenService::new(
            b"another-secret-another-secret-xx",
            Duration::from_secs(60),
            Duration::from_secs(5),
        );

        let err = other.verify_token(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_other_algorithm_is_invalid() {
        let now = Utc::now().timestamp();
        let claims = CsrfClaims {
            sub: UserId::new().to_string(),
            iat: now,
            exp: now + 60,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let err = service().verify_token(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_garbage_is_invalid() {
        let err = service().verify_token("not.a.token").unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));

        let err = service().verify_token("").unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_non_uuid_subject_is_invalid() {
        let now = Utc::now().timestamp();
        let claims = CsrfClaims {
            sub: "alice".to_string(),
            iat: now,
            exp: now + 60,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let err = service().verify_token(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_empty_secret_cannot_sign() {
        let csrf = CsrfTokenService::new(b"", Duration::from_secs(60), Duration::from_secs(5));
        let err = csrf.generate_token(UserId::new()).unwrap_err();
        assert!(matches!(err, AuthError::Signing(_)));
    }

    #[test]
    fn test_empty_secret_rejects_empty_key_tokens() {
        let csrf = CsrfTokenService::new(b"", Duration::from_secs(60), Duration::from_secs(5));
        let now = Utc::now().timestamp();
        let claims = CsrfClaims {
            sub: UserId::new().to_string(),
            iat: now,
            exp: now + 60,
        };
        let forged = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b""),
        )
        .unwrap();

        let err = csrf.verify_token(&forged).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }
}
