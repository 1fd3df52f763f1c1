use clap::{Args, Parser, ValueEnum};

/// Shared secret used when `NOTIFICATION_API_KEY` is not set.
pub const DEFAULT_API_KEY: &str = "dev-api-key-change-in-production";

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub auth: AuthConfig,

    #[command(flatten)]
    pub expo: ExpoConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "PUSH_RELAY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Seconds to wait for in-flight requests during shutdown
    #[arg(long, env = "PUSH_RELAY_SHUTDOWN_TIMEOUT_SECS", default_value_t = 5)]
    pub shutdown_timeout_secs: u64,

    /// Maximum accepted request body size in bytes (Default: 10MB)
    #[arg(long, env = "PUSH_RELAY_BODY_LIMIT_BYTES", default_value_t = 10_485_760)]
    pub body_limit_bytes: usize,
}

#[derive(Clone, Debug, Args)]
pub struct AuthConfig {
    /// Shared secret expected in the X-API-Key header of notification endpoints
    #[arg(long, env = "NOTIFICATION_API_KEY", default_value = DEFAULT_API_KEY)]
    pub api_key: String,
}

impl AuthConfig {
    #[must_use]
    pub fn uses_default_key(&self) -> bool {
        self.api_key == DEFAULT_API_KEY
    }
}

#[derive(Clone, Debug, Args)]
pub struct ExpoConfig {
    /// Expo access token, required when enhanced push security is enabled for the project
    #[arg(long, env = "EXPO_ACCESS_TOKEN")]
    pub access_token: Option<String>,

    /// Base URL of the Expo push service
    #[arg(long, env = "EXPO_BASE_URL", default_value = "https://exp.host")]
    pub base_url: String,

    /// Timeout for a single push batch request
    #[arg(long, env = "EXPO_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "PUSH_RELAY_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// OTLP collector endpoint; traces and metrics are only exported when set
    #[arg(long, env = "PUSH_RELAY_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_args() {
        let config = Config::parse_from(["push-relay"]);
        assert_eq!(config.server.body_limit_bytes, 10 * 1024 * 1024);
        assert_eq!(config.expo.base_url, "https://exp.host");
        assert_eq!(config.telemetry.log_format, LogFormat::Text);
    }

    #[test]
    fn test_explicit_api_key_is_not_default() {
        let config = Config::parse_from(["push-relay", "--api-key", "s3cret"]);
        assert_eq!(config.auth.api_key, "s3cret");
        assert!(!config.auth.uses_default_key());
    }

    #[test]
    fn test_log_format_parses_json() {
        let config = Config::parse_from(["push-relay", "--log-format", "json"]);
        assert_eq!(config.telemetry.log_format, LogFormat::Json);
    }
}
