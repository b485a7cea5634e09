//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::crypto::{from_base64, try_random_bytes};
use platform::password::HashParameters;
use thiserror::Error;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Minimum CSRF signing secret length in bytes
pub const MIN_CSRF_SECRET_LEN: usize = 32;

/// Configuration loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Session lifetime in the store and on the cookie; `None` never expires
    pub session_ttl: Option<Duration>,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Request header carrying the CSRF token (lowercase)
    pub csrf_header_name: String,
    /// HMAC-SHA256 key for CSRF tokens
    pub csrf_secret: Vec<u8>,
    /// CSRF token lifetime
    pub csrf_ttl: Duration,
    /// Clock-skew tolerance when parsing CSRF tokens
    pub csrf_leeway: Duration,
    /// Upper bound on every session store and user lookup call
    pub store_timeout: Duration,
    /// Argon2id cost parameters for new hashes
    pub password_params: HashParameters,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "session_id".to_string(),
            session_ttl: Some(Duration::from_secs(7 * 24 * 3600)), // 1 week
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            csrf_header_name: "x-csrf-token".to_string(),
            csrf_secret: Vec::new(),
            csrf_ttl: Duration::from_secs(60),
            csrf_leeway: Duration::from_secs(5),
            store_timeout: Duration::from_secs(2),
            password_params: HashParameters::default(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random CSRF secret (for development)
    pub fn with_random_secret() -> Result<Self, ConfigError> {
        let secret = try_random_bytes(MIN_CSRF_SECRET_LEN).map_err(|e| ConfigError::Invalid {
            name: "CSRF_SECRET",
            reason: e.to_string(),
        })?;
        Ok(Self {
            csrf_secret: secret,
            ..Default::default()
        })
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Result<Self, ConfigError> {
        Ok(Self {
            cookie_secure: false,
            ..Self::with_random_secret()?
        })
    }

    /// Load from process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable source
    ///
    /// `CSRF_SECRET` is required (Base64, at least 32 bytes). Everything else
    /// falls back to [`AuthConfig::default`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let secret = lookup("CSRF_SECRET").ok_or(ConfigError::Missing("CSRF_SECRET"))?;
        config.csrf_secret = from_base64(secret.trim().trim_end_matches('=')).map_err(|e| {
            ConfigError::Invalid {
                name: "CSRF_SECRET",
                reason: e.to_string(),
            }
        })?;
        if config.csrf_secret.len() < MIN_CSRF_SECRET_LEN {
            return Err(ConfigError::Invalid {
                name: "CSRF_SECRET",
                reason: format!("must decode to at least {MIN_CSRF_SECRET_LEN} bytes"),
            });
        }

        if let Some(name) = lookup("SESSION_COOKIE_NAME") {
            config.session_cookie_name = name;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "SESSION_TTL_SECS")? {
            config.session_ttl = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(secure) = parse_var::<bool>(&lookup, "COOKIE_SECURE")? {
            config.cookie_secure = secure;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "CSRF_TOKEN_TTL_SECS")? {
            config.csrf_ttl = Duration::from_secs(secs);
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "STORE_TIMEOUT_MS")? {
            config.store_timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// Cookie attributes for the session cookie
    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: self.session_ttl.map(|ttl| ttl.as_secs()),
        }
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    lookup(name)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
                name,
                reason: e.to_string(),
            })
        })
        .transpose()
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("session_cookie_name", &self.session_cookie_name)
            .field("session_ttl", &self.session_ttl)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .field("csrf_header_name", &self.csrf_header_name)
            .field("csrf_secret", &"***")
            .field("csrf_ttl", &self.csrf_ttl)
            .field("csrf_leeway", &self.csrf_leeway)
            .field("store_timeout", &self.store_timeout)
            .field("password_params", &self.password_params)
            .finish()
    }
}
