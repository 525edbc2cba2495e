//! Server configuration - environment loading
//!
//! Configuration is read from environment variables (the CLI loads `.env`
//! first and applies its flags on top):
//! - `PORT`, `BIND_HOST`: listen address (default: 0.0.0.0:3000)
//! - `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`: connection
//! - `DATABASE_URL`: full connection URL, overrides the discrete `DB_*` values
//! - `DB_MAX_CONNECTIONS`, `DB_QUERY_TIMEOUT_SECS`, `DB_ACQUIRE_TIMEOUT_MS`,
//!   `DB_CONNECT_RETRIES`, `DB_CONNECT_BACKOFF_MS`: pool and failure policy
//! - `REQUEST_TIMEOUT_SECS`, `DISPLAY_TIMEZONE`, `CORS_PERMISSIVE`

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;
use sqlx::postgres::PgConnectOptions;

use crate::clock::DEFAULT_TIMEZONE;

/// Configuration error. Unlike database outages these stop startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },

    #[error("unknown timezone: '{0}'")]
    Timezone(String),

    #[error("invalid DATABASE_URL: {0}")]
    DatabaseUrl(#[source] sqlx::Error),
}

/// Database connection settings
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Full connection URL; wins over the discrete fields when set
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub name: String,
    /// Pool size
    pub max_connections: u32,
    /// Upper bound for a single query
    pub query_timeout: Duration,
    /// How long a query waits for a pooled connection
    pub acquire_timeout: Duration,
    /// Schema initialization attempts at startup
    pub connect_retries: u32,
    /// First backoff delay between attempts, doubled each time
    pub connect_backoff: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: None,
            name: "postgres".to_string(),
            max_connections: 5,
            query_timeout: Duration::from_secs(5),
            acquire_timeout: Duration::from_millis(1500),
            connect_retries: 3,
            connect_backoff: Duration::from_millis(500),
        }
    }
}

// Credentials stay out of logs.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .field("query_timeout", &self.query_timeout)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("connect_retries", &self.connect_retries)
            .field("connect_backoff", &self.connect_backoff)
            .finish()
    }
}

impl DatabaseConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable source (for testing)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            url: non_empty(lookup("DATABASE_URL")),
            host: non_empty(lookup("DB_HOST")).unwrap_or(defaults.host),
            port: parse_var(&lookup, "DB_PORT")?.unwrap_or(defaults.port),
            user: non_empty(lookup("DB_USER")).unwrap_or(defaults.user),
            password: non_empty(lookup("DB_PASSWORD")),
            name: non_empty(lookup("DB_NAME")).unwrap_or(defaults.name),
            max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS")?
                .unwrap_or(defaults.max_connections),
            query_timeout: parse_var(&lookup, "DB_QUERY_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.query_timeout),
            acquire_timeout: parse_var(&lookup, "DB_ACQUIRE_TIMEOUT_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.acquire_timeout),
            connect_retries: parse_var(&lookup, "DB_CONNECT_RETRIES")?
                .unwrap_or(defaults.connect_retries),
            connect_backoff: parse_var(&lookup, "DB_CONNECT_BACKOFF_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.connect_backoff),
        })
    }

    /// Build sqlx connect options from the URL or the discrete fields.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = &self.url {
            return PgConnectOptions::from_str(url).map_err(ConfigError::DatabaseUrl);
        }

        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.name);

        Ok(match &self.password {
            Some(password) => options.password(password),
            None => options,
        })
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:3000)
    pub bind_addr: SocketAddr,

    /// Allow any origin (default: false = local front-end dev servers only)
    pub cors_permissive: bool,

    /// Outer bound on a whole request
    pub request_timeout: Duration,

    /// Timezone used for the health check's `currentTime`
    pub timezone: Tz,

    pub database: DatabaseConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 3000),
            cors_permissive: false,
            request_timeout: Duration::from_secs(30),
            timezone: DEFAULT_TIMEZONE,
            database: DatabaseConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable source (for testing)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host: IpAddr = parse_var(&lookup, "BIND_HOST")?.unwrap_or(defaults.bind_addr.ip());
        let port: u16 = parse_var(&lookup, "PORT")?.unwrap_or(defaults.bind_addr.port());

        let timezone = match non_empty(lookup("DISPLAY_TIMEZONE")) {
            Some(name) => parse_timezone(&name)?,
            None => defaults.timezone,
        };

        Ok(Self {
            bind_addr: SocketAddr::new(host, port),
            cors_permissive: parse_flag(&lookup, "CORS_PERMISSIVE")?
                .unwrap_or(defaults.cors_permissive),
            request_timeout: parse_var(&lookup, "REQUEST_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            timezone,
            database: DatabaseConfig::from_lookup(lookup)?,
        })
    }
}

/// Parse an IANA timezone name such as `Asia/Kolkata`.
pub fn parse_timezone(name: &str) -> Result<Tz, ConfigError> {
    name.parse::<Tz>()
        .map_err(|_| ConfigError::Timezone(name.to_string()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match non_empty(lookup(var)) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(None),
    }
}

fn parse_flag<F>(lookup: &F, var: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup(var)) {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::Invalid { var, value }),
        },
        None => Ok(None),
    }
}
