//! Connection and test-user configuration read from the environment

use std::time::Duration;

use crate::error::{CoreError, CoreResult};
use crate::ident::Ident;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_USER: &str = "root";
pub const DEFAULT_DATABASE: &str = "athar_db";
pub const DEFAULT_PORT: u16 = 3306;
pub const DEFAULT_TEST_PHONE: &str = "07761763665";
pub const DEFAULT_TEST_OTP: &str = "123456";
pub const DEFAULT_STATEMENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where to connect and how long any single statement may take
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: Ident,
    pub port: u16,
    pub statement_timeout: Duration,
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("port", &self.port)
            .field("statement_timeout", &self.statement_timeout)
            .finish()
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            user: DEFAULT_USER.to_string(),
            password: String::new(),
            database: Ident::new(DEFAULT_DATABASE),
            port: DEFAULT_PORT,
            statement_timeout: DEFAULT_STATEMENT_TIMEOUT,
        }
    }
}

impl ConnectionConfig {
    /// Build from `DB_HOST`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`, `DB_PORT`
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset or empty keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let database = match get("DB_NAME") {
            Some(name) => Ident::parse(name.trim()).map_err(|e| CoreError::ConfigInvalid {
                key: "DB_NAME".to_string(),
                message: e.to_string(),
            })?,
            None => defaults.database,
        };

        let port = match get("DB_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| CoreError::ConfigInvalid {
                key: "DB_PORT".to_string(),
                message: format!("'{raw}' is not a valid port: {e}"),
            })?,
            None => defaults.port,
        };

        Ok(Self {
            host: get("DB_HOST").unwrap_or(defaults.host),
            user: get("DB_USER").unwrap_or(defaults.user),
            password: lookup("DB_PASSWORD")
                .map(|p| strip_single_quotes(&p).to_string())
                .unwrap_or_default(),
            database,
            port,
            statement_timeout: defaults.statement_timeout,
        })
    }

    /// `user@host:port/database` for log lines (never the password)
    pub fn display_target(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }
}

/// `'secret'` → `secret`; anything else is returned unchanged
fn strip_single_quotes(value: &str) -> &str {
    match value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')) {
        Some(inner) => inner,
        None => {
            if value.starts_with('\'') || value.ends_with('\'') {
                log::warn!("DB_PASSWORD has an unbalanced single quote; using it verbatim");
            }
            value
        }
    }
}

/// The single credentialed test account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestUserConfig {
    /// Natural key of the test user
    pub phone: String,

    /// Echoed to the console only
    pub otp_code: String,
}

impl Default for TestUserConfig {
    fn default() -> Self {
        Self {
            phone: DEFAULT_TEST_PHONE.to_string(),
            otp_code: DEFAULT_TEST_OTP.to_string(),
        }
    }
}

impl TestUserConfig {
    /// Build from `TEST_PHONE_NUMBER` and `TEST_OTP_CODE`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            phone: lookup("TEST_PHONE_NUMBER")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.phone),
            otp_code: lookup("TEST_OTP_CODE")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.otp_code),
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
