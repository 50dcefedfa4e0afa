use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::{Environment, ScaffoldConfig};
use crate::infrastructure::observability::TracingConfig;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3333";
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: ApiSettings,
    pub ffmpeg: FfmpegSettings,
    pub logging: LoggingSettings,
    pub scaffold: ScaffoldConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FfmpegSettings {
    pub binary: String,
    pub working_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Settings {
    /// Layers built-in defaults, the optional `appsettings.<Environment>` file
    /// and `APP_`-prefixed environment variables, in that order.
    ///
    /// Nested keys use a double underscore: `APP_API__BASE_URL`.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("api.base_url", DEFAULT_API_BASE_URL)?
            .set_default("api.timeout_secs", DEFAULT_API_TIMEOUT_SECS)?
            .set_default("ffmpeg.binary", "ffmpeg")?
            .set_default("logging.level", "info")?
            .set_default("logging.enable_json", false)?
            .set_default("scaffold.enabled", false)?
            .set_default("scaffold.mock_response_delay_ms", 0)?
            .add_source(File::with_name(&environment.settings_file()).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn tracing_config(&self, environment: Environment) -> TracingConfig {
        TracingConfig {
            environment: environment.to_string(),
            json_format: self.logging.enable_json,
            level: self.logging.level.clone(),
        }
    }
}
