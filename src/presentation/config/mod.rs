mod environment;
mod scaffold_config;
mod settings;

pub use environment::Environment;
pub use scaffold_config::{SCAFFOLD_VIDEO_ID, ScaffoldConfig};
pub use settings::{
    ApiSettings, DEFAULT_API_BASE_URL, DEFAULT_API_TIMEOUT_SECS, FfmpegSettings, LoggingSettings,
    Settings,
};
