use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env as std_env;
use std::path::Path;
use std::time::Duration;
use strum::{AsRefStr, Display, EnumString};
use thiserror::Error;
use tracing::{info, warn};

use crate::logging::{AppLogger, LogLevel};

/// Default values for configuration
const DEFAULT_APP_NAME: &str = "Lane Zen";
const DEFAULT_APP_VERSION: &str = "1.0.0";
const DEFAULT_API_URL: &str = "http://localhost:4000";
const DEFAULT_API_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_LOCAL_STORAGE_PREFIX: &str = "lanezen_";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const CONFIG_DIR: &str = "config";

/// Prefix for environment variables, e.g. `LANEZEN_USE_MOCK_DATA=true`.
pub const ENV_PREFIX: &str = "LANEZEN";

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ConfigError),
}

/// Deployment environment the process runs in.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Qa,
    Production,
}

/// Settings exactly as read from files and the environment, before any
/// defaulting or parsing.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawSettings {
    pub app_name: Option<String>,
    pub app_version: Option<String>,
    pub environment: Option<String>,
    pub api_url: Option<String>,
    pub api_timeout: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub use_mock_data: Option<String>,
    pub debug_mode: Option<String>,
    pub log_level: Option<String>,
    pub log_json: Option<String>,
    pub enable_analytics: Option<String>,
    pub analytics_id: Option<String>,
    pub feature_experimental: Option<String>,
    pub local_storage_prefix: Option<String>,
    pub host: Option<String>,
    pub port: Option<String>,
}

/// Resolved application configuration. Built once at startup and shared
/// read-only afterwards.
#[derive(Clone, Debug, Serialize)]
pub struct AppConfig {
    pub app_name: String,
    pub app_version: String,
    pub environment: RuntimeEnvironment,

    /// Base URL of the forecasting API
    pub api_url: String,

    /// Request timeout for outbound calls, in milliseconds
    pub api_timeout_ms: u64,

    /// Hosted backend base URL
    pub supabase_url: Option<String>,

    /// Hosted backend anon key
    #[serde(skip_serializing)]
    pub supabase_anon_key: Option<String>,

    pub use_mock_data: bool,
    pub debug_mode: bool,
    pub log_level: LogLevel,

    /// Log in JSON format (structured logging)
    pub log_json: bool,

    pub enable_analytics: bool,
    pub analytics_id: Option<String>,
    pub feature_experimental: bool,
    pub local_storage_prefix: String,

    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::resolve(RawSettings::default())
    }
}

/// Only the literal string `true` enables a flag.
fn flag(value: &Option<String>) -> bool {
    value.as_deref() == Some("true")
}

/// Treats empty and whitespace-only values as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_environment(value: Option<String>) -> RuntimeEnvironment {
    match present(value) {
        None => RuntimeEnvironment::Development,
        Some(name) => name.trim().parse().unwrap_or_else(|_| {
            warn!(
                "Unknown environment '{}', falling back to {}",
                name,
                RuntimeEnvironment::Development
            );
            RuntimeEnvironment::Development
        }),
    }
}

fn parse_log_level(value: Option<String>) -> LogLevel {
    match present(value) {
        None => LogLevel::default(),
        Some(level) => level.trim().parse().unwrap_or_else(|_| {
            warn!("Unknown log level '{}', falling back to info", level);
            LogLevel::default()
        }),
    }
}

fn parse_timeout(value: Option<String>) -> u64 {
    match present(value) {
        None => DEFAULT_API_TIMEOUT_MS,
        Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
            warn!(
                "Invalid api_timeout '{}', falling back to {}ms",
                raw, DEFAULT_API_TIMEOUT_MS
            );
            DEFAULT_API_TIMEOUT_MS
        }),
    }
}

fn parse_port(value: Option<String>) -> u16 {
    match present(value) {
        None => DEFAULT_PORT,
        Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|_| {
            warn!("Invalid port '{}', falling back to {}", raw, DEFAULT_PORT);
            DEFAULT_PORT
        }),
    }
}

impl AppConfig {
    /// Applies defaults and parsing rules to raw settings.
    pub fn resolve(raw: RawSettings) -> Self {
        Self {
            app_name: present(raw.app_name).unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            app_version: present(raw.app_version)
                .unwrap_or_else(|| DEFAULT_APP_VERSION.to_string()),
            environment: parse_environment(raw.environment),
            api_url: present(raw.api_url).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_timeout_ms: parse_timeout(raw.api_timeout),
            supabase_url: present(raw.supabase_url),
            supabase_anon_key: present(raw.supabase_anon_key),
            use_mock_data: flag(&raw.use_mock_data),
            debug_mode: flag(&raw.debug_mode),
            log_level: parse_log_level(raw.log_level),
            log_json: flag(&raw.log_json),
            enable_analytics: flag(&raw.enable_analytics),
            analytics_id: present(raw.analytics_id),
            feature_experimental: flag(&raw.feature_experimental),
            local_storage_prefix: present(raw.local_storage_prefix)
                .unwrap_or_else(|| DEFAULT_LOCAL_STORAGE_PREFIX.to_string()),
            host: present(raw.host).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_port(raw.port),
        }
    }

    /// Replaces the environment, e.g. from a `--env` command-line flag.
    pub fn with_environment(mut self, name: &str) -> Self {
        self.environment = parse_environment(Some(name.to_string()));
        self
    }

    pub fn is_production(&self) -> bool {
        self.environment == RuntimeEnvironment::Production
    }

    pub fn is_qa(&self) -> bool {
        self.environment == RuntimeEnvironment::Qa
    }

    pub fn is_development(&self) -> bool {
        self.environment == RuntimeEnvironment::Development
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_millis(self.api_timeout_ms)
    }

    /// Both backend credentials, when both are configured.
    pub fn backend_credentials(&self) -> Option<(&str, &str)> {
        match (&self.supabase_url, &self.supabase_anon_key) {
            (Some(url), Some(key)) => Some((url.as_str(), key.as_str())),
            _ => None,
        }
    }

    pub fn logger(&self) -> AppLogger {
        AppLogger::new(self.environment, self.log_level)
    }
}

/// Initializes tracing using the provided log level as the default filter.
/// Output goes to stderr; `RUST_LOG` overrides the filter.
pub fn init_tracing(level: LogLevel, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("lane_zen={},tower_http=info", level);
    let filter_directive = std_env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let builder = fmt()
        .with_env_filter(EnvFilter::new(filter_directive))
        .with_writer(std::io::stderr);

    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}

/// Runs `load` with a temporary warn-level subscriber writing to `writer`.
///
/// Configuration is resolved before `init_tracing` can run, so fallback
/// warnings raised while resolving would otherwise have no subscriber.
pub fn with_bootstrap_logging<W, T>(writer: W, load: impl FnOnce() -> T) -> T
where
    W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    use tracing_subscriber::{fmt, EnvFilter};

    let bootstrap = fmt()
        .with_env_filter(EnvFilter::new("lane_zen=warn"))
        .with_ansi(false)
        .with_writer(writer)
        .finish();
    tracing::subscriber::with_default(bootstrap, load)
}

/// Loads application configuration from `./config` and the environment.
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    load_config_from(Path::new(CONFIG_DIR))
}

/// Loads application configuration
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. `{dir}/default.toml`
/// 3. `{dir}/{environment}.toml`
/// 4. Environment variables (`LANEZEN_*`)
pub fn load_config_from(dir: &Path) -> Result<AppConfig, AppConfigError> {
    let run_env = std_env::var(format!("{}_ENVIRONMENT", ENV_PREFIX))
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| RuntimeEnvironment::default().to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !dir.exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            dir.display()
        );
    }

    let settings = Config::builder()
        .add_source(File::with_name(&dir.join("default").to_string_lossy()).required(false))
        .add_source(File::with_name(&dir.join(&run_env).to_string_lossy()).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX))
        .build()?;

    let raw: RawSettings = settings.try_deserialize()?;
    let config = AppConfig::resolve(raw);

    info!("Configuration loaded successfully");
    Ok(config)
}
