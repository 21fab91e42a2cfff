//! Runtime configuration read from environment variables.

use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::ConfigError;

const DEFAULT_IMAGE_DIR: &str = "public/schoolImages";
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

#[derive(Debug)]
pub struct DatabaseConfig {
    /// Full connection URL, including credentials and TLS mode.
    pub url: SecretString,
    pub pool_size: u32,
    pub run_migrations: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub image_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub log_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    Postgres,
    MySql,
}

impl FromStr for Driver {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Driver::Postgres),
            "mysql" => Ok(Driver::MySql),
            other => Err(format!("unsupported driver '{}'", other)),
        }
    }
}

impl Driver {
    fn scheme(&self) -> &'static str {
        match self {
            Driver::Postgres => "postgres",
            Driver::MySql => "mysql",
        }
    }

    /// Query parameter selecting TLS with or without certificate verification.
    fn tls_param(&self, verify: bool) -> (&'static str, &'static str) {
        match (self, verify) {
            (Driver::Postgres, true) => ("sslmode", "verify-full"),
            (Driver::Postgres, false) => ("sslmode", "require"),
            (Driver::MySql, true) => ("ssl-mode", "VERIFY_IDENTITY"),
            (Driver::MySql, false) => ("ssl-mode", "REQUIRED"),
        }
    }
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let url = match var("DATABASE_URL") {
            Some(url) => SecretString::from(url),
            None => database_url_from_parts(&var)?,
        };

        let database = DatabaseConfig {
            url,
            pool_size: parse_or("DB_POOL_SIZE", var("DB_POOL_SIZE"), DEFAULT_POOL_SIZE)?,
            run_migrations: parse_bool("DB_RUN_MIGRATIONS", var("DB_RUN_MIGRATIONS"), true)?,
        };
        if database.pool_size == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_POOL_SIZE",
                reason: "must be greater than 0".to_string(),
            });
        }

        let server = ServerConfig {
            bind: parse_or(
                "SCHOOLDIR_BIND",
                var("SCHOOLDIR_BIND"),
                SocketAddr::from(([0, 0, 0, 0], 3000)),
            )?,
            image_dir: var("SCHOOLDIR_IMAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGE_DIR)),
            max_upload_bytes: parse_or(
                "SCHOOLDIR_MAX_UPLOAD_BYTES",
                var("SCHOOLDIR_MAX_UPLOAD_BYTES"),
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
            log_json: parse_bool("SCHOOLDIR_LOG_JSON", var("SCHOOLDIR_LOG_JSON"), false)?,
        };

        tracing::debug!(
            bind = %server.bind,
            image_dir = %server.image_dir.display(),
            pool_size = database.pool_size,
            "Configuration loaded"
        );

        Ok(Self { database, server })
    }
}

fn required<F>(var: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    var(key).ok_or(ConfigError::Missing { key })
}

fn database_url_from_parts<F>(var: &F) -> Result<SecretString, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let driver: Driver = parse_or("DB_DRIVER", var("DB_DRIVER"), Driver::Postgres)?;
    let host = required(var, "DB_HOST")?;
    let user = required(var, "DB_USER")?;
    let password = SecretString::from(required(var, "DB_PASSWORD")?);
    let name = required(var, "DB_NAME")?;
    let verify = parse_bool("DB_SSL_VERIFY", var("DB_SSL_VERIFY"), true)?;

    let invalid = |key: &'static str, reason: String| ConfigError::Invalid { key, reason };

    let mut url = Url::parse(&format!("{}://{}", driver.scheme(), host))
        .map_err(|e| invalid("DB_HOST", e.to_string()))?;
    url.set_username(&user)
        .map_err(|_| invalid("DB_USER", "cannot be used in a connection URL".to_string()))?;
    url.set_password(Some(password.expose_secret()))
        .map_err(|_| invalid("DB_PASSWORD", "cannot be used in a connection URL".to_string()))?;
    url.set_path(&format!("/{}", name));

    let (param, mode) = driver.tls_param(verify);
    url.query_pairs_mut().append_pair(param, mode);

    Ok(SecretString::from(String::from(url)))
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match value {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: format!("'{}': {}", raw, e),
        }),
        None => Ok(default),
    }
}

fn parse_bool(key: &'static str, value: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match value.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                key,
                reason: format!("'{}' is not a boolean", v),
            }),
        },
    }
}
