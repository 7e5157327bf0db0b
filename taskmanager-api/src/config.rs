/// Configuration management for the API server
///
/// Loads configuration from environment variables (after reading an optional
/// `.env` file) into a type-safe struct.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 3000)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: `*`)
/// - `PRODUCTION`: Enables HSTS when `true` (default: false)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: Token signing secret, at least 32 characters (required)
/// - `JWT_PREVIOUS_SECRETS`: Comma-separated retired secrets still accepted
/// - `JWT_EXPIRATION_HOURS`: Token lifetime; unset means tokens never expire
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use taskmanager_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;
use taskmanager_shared::auth::jwt::JwtKeys;

/// Minimum accepted length of a signing secret
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted token lifetime (100 years)
pub const MAX_EXPIRATION_HOURS: i64 = 24 * 365 * 100;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` allows any origin
    pub cors_origins: Vec<String>,

    /// Production mode (enables HSTS)
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Current signing secret
    ///
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Retired secrets, accepted for verification only
    pub previous_secrets: Vec<String>,

    /// Token lifetime in hours (None = non-expiring tokens)
    pub expiration_hours: Option<i64>,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("previous_secrets", &self.previous_secrets.len())
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

impl JwtConfig {
    /// Builds the signing/verification keys described by this config
    pub fn keys(&self) -> JwtKeys {
        JwtKeys::new(self.secret.clone())
            .with_previous_secrets(self.previous_secrets.clone())
            .with_lifetime(self.expiration_hours.map(|hours| {
                chrono::Duration::try_hours(hours).unwrap_or(chrono::Duration::MAX)
            }))
    }
}

/// Splits a comma-separated list, dropping blanks
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    /// - Any signing secret is shorter than 32 characters
    /// - The token lifetime is not between 1 hour and 100 years
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()?;
        let cors_origins = split_list(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()));
        let production = env::var("PRODUCTION")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        let previous_secrets = split_list(&env::var("JWT_PREVIOUS_SECRETS").unwrap_or_default());
        let expiration_hours = match env::var("JWT_EXPIRATION_HOURS") {
            Ok(raw) => Some(raw.parse::<i64>()?),
            Err(_) => None,
        };

        let config = Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
                production,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                previous_secrets,
                expiration_hours,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks invariants that cannot be expressed in the types
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.jwt.secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("JWT_SECRET must be at least {} characters long", MIN_SECRET_LEN);
        }

        if self
            .jwt
            .previous_secrets
            .iter()
            .any(|secret| secret.len() < MIN_SECRET_LEN)
        {
            anyhow::bail!(
                "Every JWT_PREVIOUS_SECRETS entry must be at least {} characters long",
                MIN_SECRET_LEN
            );
        }

        if let Some(hours) = self.jwt.expiration_hours {
            if hours <= 0 || hours > MAX_EXPIRATION_HOURS {
                anyhow::bail!(
                    "JWT_EXPIRATION_HOURS must be between 1 and {}",
                    MAX_EXPIRATION_HOURS
                );
            }
        }

        Ok(())
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
