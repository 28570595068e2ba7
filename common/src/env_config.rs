use std::{env, sync::Arc};

#[derive(Clone, Debug)]
/// Configuration struct for the SDK.
///
/// Holds the connection settings of both remote services plus
/// the logging preferences of the process that embeds them.
pub struct Config {
    // environment
    pub environment: String, // development or production
    /// A boolean indicating whether console logging is enabled.
    pub console_logging_enabled: bool,
    /// Optional file the log output is mirrored to.
    pub log_file: Option<String>,
    /// Maximum log level, as accepted by `log::LevelFilter::from_str`.
    pub log_level: String,
    /// Connection settings of the billing service.
    pub billing: ServiceConfig,
    /// Connection settings of the payments service.
    pub payments: ServiceConfig,
    /// Payments provider used when a session is opened without one.
    pub default_payments_provider: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Base URL and service token of one remote service.
///
/// Both values are optional. A service missing either of them is
/// considered unconfigured and answers every request with a dummy
/// "not found" response instead of touching the network.
pub struct ServiceConfig {
    /// Base URL of the service, e.g. `https://billing.example.org`.
    pub url: Option<String>,
    /// Token sent in the `X-Service-Auth` header.
    pub token: Option<String>,
}

impl ServiceConfig {
    /// Creates a `ServiceConfig`, treating blank values as missing.
    pub fn new(url: Option<String>, token: Option<String>) -> Self {
        ServiceConfig {
            url: non_blank(url),
            token: non_blank(token),
        }
    }

    /// Reads `<PREFIX>_URL` and `<PREFIX>_TOKEN` from the environment.
    pub fn from_env(prefix: &str) -> Self {
        dotenvy::dotenv().ok();

        ServiceConfig::new(
            env::var(format!("{}_URL", prefix)).ok(),
            env::var(format!("{}_TOKEN", prefix)).ok(),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.token.is_some()
    }
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    ///
    /// # Environment Variables
    ///
    /// All optional:
    /// - `ENVIRONMENT`: default "development"
    /// - `ENABLE_CONSOLE_LOGGING`: default true
    /// - `LOG_FILE`: no file logging when unset
    /// - `LOG_LEVEL`: default "info"
    /// - `BILLING_URL`, `BILLING_TOKEN`: billing service connection
    /// - `PAYMENTS_URL`, `PAYMENTS_TOKEN`: payments service connection
    /// - `PAYMENTS_DEFAULT_PROVIDER`: provider used when none is given
    pub fn from_env() -> Arc<Self> {
        dotenvy::dotenv().ok();

        Arc::new(Config {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            console_logging_enabled: parse_flag(env::var("ENABLE_CONSOLE_LOGGING").ok(), true),
            log_file: non_blank(env::var("LOG_FILE").ok()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            billing: ServiceConfig::from_env("BILLING"),
            payments: ServiceConfig::from_env("PAYMENTS"),
            default_payments_provider: non_blank(env::var("PAYMENTS_DEFAULT_PROVIDER").ok()),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(value: Option<String>, default: bool) -> bool {
    match value {
        Some(v) => matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
        None => default,
    }
}
