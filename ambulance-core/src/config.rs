//! Document store configuration.
//!
//! Resolved once at process startup and passed into the store. Request
//! handling never reads environment variables.

use std::fmt;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 27017;
pub const DEFAULT_DATABASE: &str = "ambulance-wl";
pub const DEFAULT_COLLECTION: &str = "ambulance";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the MongoDB document store
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub collection: String,
    /// Deadline for each unit of work, including connection setup
    pub timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            username: String::new(),
            password: String::new(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl StoreConfig {
    /// Read `AMBULANCE_API_MONGODB_*` variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`StoreConfig::from_env`] with an injectable variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |suffix: &str| lookup(&format!("AMBULANCE_API_MONGODB_{}", suffix));

        let port = match var("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "invalid MongoDB port, using {}", DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => defaults.port,
        };

        let timeout = match var("TIMEOUT_SECONDS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    tracing::warn!(
                        value = %raw,
                        "invalid MongoDB timeout, using {}s",
                        DEFAULT_TIMEOUT.as_secs()
                    );
                    DEFAULT_TIMEOUT
                }
            },
            None => defaults.timeout,
        };

        Self {
            host: var("HOST").unwrap_or(defaults.host),
            port,
            username: var("USERNAME").unwrap_or(defaults.username),
            password: var("PASSWORD").unwrap_or(defaults.password),
            database: var("DATABASE").unwrap_or(defaults.database),
            collection: var("COLLECTION").unwrap_or(defaults.collection),
            timeout,
        }
    }

    /// Connection string, with credentials when a username is set
    pub fn connection_uri(&self) -> String {
        if self.username.is_empty() {
            format!("mongodb://{}:{}", self.host, self.port)
        } else {
            format!(
                "mongodb://{}:{}@{}:{}",
                self.username, self.password, self.host, self.port
            )
        }
    }

    /// Loggable summary with the password left out
    pub fn redacted(&self) -> String {
        format!(
            "//{}@{}:{}/{}/{}",
            self.username, self.host, self.port, self.database, self.collection
        )
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("database", &self.database)
            .field("collection", &self.collection)
            .field("timeout", &self.timeout)
            .finish()
    }
}
