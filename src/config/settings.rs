use std::env;
use std::str::FromStr;

use jsonwebtoken::Algorithm;
use rand::RngCore;
use tracing::warn;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/postboard.db";
const DEFAULT_EXPIRE_MINUTES: i64 = 30;
const MIN_PRODUCTION_SECRET_LEN: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in production")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
    #[error("SECRET_KEY must be at least {MIN_PRODUCTION_SECRET_LEN} bytes in production")]
    WeakSecret,
    #[error("SECRET_KEY appears to be a placeholder value")]
    PlaceholderSecret,
    #[error("Unsupported JWT algorithm {0:?}; only HS256, HS384 and HS512 are accepted")]
    UnsupportedAlgorithm(Algorithm),
}

/// Runtime settings for the API server and the admin CLI.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub jwt: JwtSettings,
}

#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub algorithm: Algorithm,
    pub expire_minutes: i64,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = current_environment();
        let is_production = environment == "production";

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_var("PORT", 8000u16)?;

        let jwt = JwtSettings {
            secret: load_secret(is_production)?,
            algorithm: parse_algorithm()?,
            expire_minutes: parse_var("ACCESS_TOKEN_EXPIRE_MINUTES", DEFAULT_EXPIRE_MINUTES)?,
        };

        if jwt.expire_minutes <= 0 {
            return Err(ConfigError::Invalid {
                key: "ACCESS_TOKEN_EXPIRE_MINUTES",
                value: jwt.expire_minutes.to_string(),
            });
        }

        Ok(Self {
            database_url,
            host,
            port,
            environment,
            jwt,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl JwtSettings {
    /// Settings for tests and tooling that never leave the process.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            algorithm: Algorithm::HS256,
            expire_minutes: DEFAULT_EXPIRE_MINUTES,
        }
    }
}

fn current_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

fn parse_algorithm() -> Result<Algorithm, ConfigError> {
    let algorithm = match env::var("ALGORITHM") {
        Ok(value) => Algorithm::from_str(value.trim()).map_err(|_| ConfigError::Invalid {
            key: "ALGORITHM",
            value,
        })?,
        Err(_) => Algorithm::HS256,
    };

    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        other => Err(ConfigError::UnsupportedAlgorithm(other)),
    }
}

fn load_secret(is_production: bool) -> Result<String, ConfigError> {
    match env::var("SECRET_KEY") {
        Ok(secret) if !secret.is_empty() => {
            if is_production {
                validate_production_secret(&secret)?;
            }
            Ok(secret)
        }
        _ if is_production => Err(ConfigError::Missing("SECRET_KEY")),
        _ => {
            warn!("SECRET_KEY not set; generating ephemeral signing key (development only)");
            Ok(generate_secret())
        }
    }
}

fn validate_production_secret(secret: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_PRODUCTION_SECRET_LEN {
        return Err(ConfigError::WeakSecret);
    }

    let lowered = secret.to_ascii_lowercase();
    if lowered.contains("example") || lowered.contains("changeme") || lowered.contains("default")
    {
        return Err(ConfigError::PlaceholderSecret);
    }

    Ok(())
}

fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
