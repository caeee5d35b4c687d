use std::env;
use std::fmt;
use std::str::FromStr;

/// Longest accepted token lifetime (ten years).
pub const MAX_JWT_TTL_HOURS: i64 = 24 * 365 * 10;

/// Deployment environment, selects database URL and log format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Production,
    Test,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "test" => Ok(AppEnvironment::Test),
            other => Err(ConfigError::InvalidEnvironment(other.to_string())),
        }
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Test => "test",
        };
        f.write_str(name)
    }
}

/// How log lines are rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
    Off,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub environment: AppEnvironment,
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub database_test_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub metrics_port: Option<u16>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Local overrides first; dotenvy never replaces variables already set
        dotenvy::from_filename(".env.local").ok();
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").or_else(|| lookup("NODE_ENV")) {
            Some(value) => value.parse()?,
            None => AppEnvironment::Development,
        };

        let server_host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let server_port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        let database_test_url = lookup("DATABASE_TEST_URL").filter(|v| !v.is_empty());
        if environment == AppEnvironment::Test && database_test_url.is_none() {
            return Err(ConfigError::MissingTestDatabaseUrl);
        }

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingJwtSecret)?;

        let jwt_ttl_hours = match lookup("JWT_TTL_HOURS") {
            Some(value) => value
                .parse::<i64>()
                .ok()
                .filter(|hours| (1..=MAX_JWT_TTL_HOURS).contains(hours))
                .ok_or(ConfigError::InvalidTokenTtl)?,
            None => 24 * 30,
        };

        let metrics_port = match lookup("METRICS_PORT") {
            Some(value) => Some(value.parse().map_err(|_| ConfigError::InvalidMetricsPort)?),
            None => None,
        };

        Ok(Config {
            environment,
            server_host,
            server_port,
            database_url,
            database_test_url,
            jwt_secret,
            jwt_ttl_hours,
            metrics_port,
        })
    }

    /// Database URL for the active environment.
    pub fn current_database_url(&self) -> &str {
        match (self.environment, &self.database_test_url) {
            (AppEnvironment::Test, Some(url)) => url,
            _ => &self.database_url,
        }
    }

    pub fn log_format(&self) -> LogFormat {
        match self.environment {
            AppEnvironment::Development => LogFormat::Pretty,
            AppEnvironment::Production => LogFormat::Json,
            AppEnvironment::Test => LogFormat::Off,
        }
    }

    /// Filter used when RUST_LOG is not set.
    pub fn default_log_filter(&self) -> &'static str {
        match self.environment {
            AppEnvironment::Development => "conduit=debug,tower_http=debug",
            AppEnvironment::Production => "conduit=info,tower_http=info",
            AppEnvironment::Test => "off",
        }
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DATABASE_URL environment variable not set")]
    MissingDatabaseUrl,

    #[error("DATABASE_TEST_URL environment variable not set (required in test environment)")]
    MissingTestDatabaseUrl,

    #[error("JWT_SECRET environment variable not set")]
    MissingJwtSecret,

    #[error("Invalid environment '{0}', expected development, production or test")]
    InvalidEnvironment(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid metrics port number")]
    InvalidMetricsPort,

    #[error("JWT_TTL_HOURS must be between 1 and {} hours", MAX_JWT_TTL_HOURS)]
    InvalidTokenTtl,
}
