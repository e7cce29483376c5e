use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    pub upload: UploadConfig,
    pub app: AppConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    /// Pool acquire / connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Per-statement execution timeout in seconds.
    pub statement_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in hours.
    pub expiry_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub origin: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Raw-file cap advertised to clients (bytes). The browser checks this
    /// before encoding; the server never sees raw files.
    pub max_file_size: usize,
    /// Hard cap on the base64-encoded image payload, in characters.
    pub max_encoded_image_chars: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub environment: Environment,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

/// Default base64 payload cap (~10 MB of encoded characters).
pub const DEFAULT_MAX_ENCODED_IMAGE_CHARS: usize = 10_000_000;

/// Default raw-file cap advertised to clients (5 MB).
pub const DEFAULT_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

impl Config {
    pub fn from_env() -> Result<Self> {
        // Server configuration
        let host = env::var("SERVER_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string())
            .parse::<IpAddr>()
            .context("Failed to parse SERVER_HOST")?;

        let port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("Failed to parse SERVER_PORT")?;

        // Database configuration
        let db_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let db_max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(val) => Some(
                val.parse()
                    .context("Failed to parse DATABASE_MAX_CONNECTIONS")?,
            ),
            Err(_) => Some(20),
        };
        let db_min_connections = match env::var("DATABASE_MIN_CONNECTIONS") {
            Ok(val) => Some(
                val.parse()
                    .context("Failed to parse DATABASE_MIN_CONNECTIONS")?,
            ),
            Err(_) => Some(1),
        };
        let connect_timeout_secs = match env::var("DATABASE_CONNECT_TIMEOUT_SECS") {
            Ok(val) => val
                .parse()
                .context("Failed to parse DATABASE_CONNECT_TIMEOUT_SECS")?,
            Err(_) => 10,
        };
        let statement_timeout_secs = match env::var("DATABASE_STATEMENT_TIMEOUT_SECS") {
            Ok(val) => val
                .parse()
                .context("Failed to parse DATABASE_STATEMENT_TIMEOUT_SECS")?,
            Err(_) => 30,
        };

        // JWT configuration
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        let jwt_expiry_hours = match env::var("JWT_EXPIRY_HOURS") {
            Ok(val) => val.parse().context("Failed to parse JWT_EXPIRY_HOURS")?,
            Err(_) => 168, // 7 days
        };

        // CORS configuration
        let cors_origin =
            env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".to_string());

        // Upload caps
        let max_file_size = match env::var("MAX_FILE_SIZE") {
            Ok(val) => val.parse().context("Failed to parse MAX_FILE_SIZE")?,
            Err(_) => DEFAULT_MAX_FILE_SIZE,
        };
        let max_encoded_image_chars = match env::var("MAX_ENCODED_IMAGE_CHARS") {
            Ok(val) => val
                .parse()
                .context("Failed to parse MAX_ENCODED_IMAGE_CHARS")?,
            Err(_) => DEFAULT_MAX_ENCODED_IMAGE_CHARS,
        };

        // App configuration
        let environment = env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string())
            .parse()
            .unwrap_or_default();
        let app_name = env::var("APP_NAME").unwrap_or_else(|_| "SafetyKU Backend".to_string());

        Ok(Config {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: db_url,
                max_connections: db_max_connections,
                min_connections: db_min_connections,
                connect_timeout_secs,
                statement_timeout_secs,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                expiry_hours: jwt_expiry_hours,
            },
            cors: CorsConfig {
                origin: cors_origin,
            },
            upload: UploadConfig {
                max_file_size,
                max_encoded_image_chars,
            },
            app: AppConfig {
                name: app_name,
                environment,
            },
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            "development" => Ok(Environment::Development),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

// Use once_cell for a global config instance that's initialized once
use once_cell::sync::OnceCell;

static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn init() -> Result<&'static Config> {
    CONFIG.get_or_try_init(Config::from_env)
}

#[allow(unused)]
pub fn get() -> &'static Config {
    CONFIG.get().expect("Config is not initialized")
}

/// Environment even when the global config has not been initialized
/// (error responses are also rendered from tests without a full config).
pub fn environment() -> Environment {
    CONFIG.get().map(|c| c.app.environment).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_parses_case_insensitively() {
        assert_eq!(
            "Production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert_eq!(
            "staging".parse::<Environment>().unwrap(),
            Environment::Staging
        );
        assert!("prod??".parse::<Environment>().is_err());
    }

    #[test]
    fn default_environment_is_development() {
        assert_eq!(Environment::default(), Environment::Development);
    }
}
