//! Configuration management for the kiosk client

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the visitor backend, including the `/api` prefix
    pub base_url: String,
    /// Request timeout; the transport default applies when unset
    pub timeout_secs: Option<u64>,
    pub supplier_search_limit: u32,
    pub supplier_search_debounce_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct KioskConfig {
    pub page_size: usize,
    /// Minimum number of active visitors before the purpose filter is offered
    pub filter_threshold: usize,
    /// Host recorded for every delivery check-in
    pub warehouse_host: String,
    pub return_home_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub kiosk: KioskConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // KIOSK_API__BASE_URL, KIOSK_KIOSK__PAGE_SIZE, ...
            .add_source(
                Environment::with_prefix("KIOSK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("api.base_url", env::var("KIOSK_API_URL").ok())?
            .build()?;

        config.try_deserialize()
    }

    /// Same as [`AppConfig::load`], reading a `.env` file first if present
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load()
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.supplier_search_debounce_ms)
    }
}

impl KioskConfig {
    pub fn return_home_delay(&self) -> Duration {
        Duration::from_millis(self.return_home_delay_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api".to_string(),
            timeout_secs: None,
            supplier_search_limit: 20,
            supplier_search_debounce_ms: 250,
        }
    }
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            page_size: 8,
            filter_threshold: 10,
            warehouse_host: "Warehouse".to_string(),
            return_home_delay_ms: 500,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
