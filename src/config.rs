//! Configuration types.

use std::net::IpAddr;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Google's public endpoints, overridable for testing.
pub const DEFAULT_GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";

/// OAuth client registration.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: SecretString,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
}

/// Mailbox collaborator settings.
#[derive(Debug, Clone)]
pub struct MailboxConfig {
    pub api_base: String,
    pub tokeninfo_url: String,
    /// Upper bound on any single collaborator call.
    pub call_timeout: Duration,
    /// Number of messages returned by a listing.
    pub page_size: u32,
}

impl Default for MailboxConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_GMAIL_API_BASE.to_string(),
            tokeninfo_url: DEFAULT_TOKENINFO_URL.to_string(),
            call_timeout: Duration::from_secs(30),
            page_size: 5,
        }
    }
}

/// Server configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Where the OAuth callback sends the browser, with the token appended.
    pub frontend_url: String,
    pub allowed_origins: Vec<String>,
    pub oauth: OAuthConfig,
    pub mailbox: MailboxConfig,
}

impl ServerConfig {
    /// Build config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, ConfigError> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
        };
        let or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let oauth = OAuthConfig {
            client_id: required("CLIENT_ID")?,
            client_secret: SecretString::from(required("CLIENT_SECRET")?),
            redirect_uri: required("REDIRECT_URI")?,
            auth_url: or_default("GOOGLE_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: or_default("GOOGLE_TOKEN_URL", DEFAULT_TOKEN_URL),
        };

        let defaults = MailboxConfig::default();
        let mailbox = MailboxConfig {
            api_base: or_default("GMAIL_API_BASE", DEFAULT_GMAIL_API_BASE),
            tokeninfo_url: or_default("GOOGLE_TOKENINFO_URL", DEFAULT_TOKENINFO_URL),
            call_timeout: parse_or(&lookup, "MAILBOX_TIMEOUT_SECS", defaults.call_timeout.as_secs())
                .map(Duration::from_secs)?,
            page_size: parse_or(&lookup, "MAILBOX_PAGE_SIZE", defaults.page_size)?,
        };

        let allowed_origins: Vec<String> = or_default("ALLOWED_ORIGINS", DEFAULT_FRONTEND_URL)
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            bind_addr: parse_or(&lookup, "BIND_ADDR", IpAddr::from([0, 0, 0, 0]))?,
            port: parse_or(&lookup, "PORT", 5000)?,
            frontend_url: or_default("FRONTEND_URL", DEFAULT_FRONTEND_URL),
            allowed_origins,
            oauth,
            mailbox,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{raw:?}: {e}"),
        }),
    }
}
