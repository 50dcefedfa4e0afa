/// Configuration for tracing initialization.
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    /// Base level for third-party crates; this crate always logs at debug.
    pub level: String,
}

impl TracingConfig {
    pub fn default_filter(&self) -> String {
        format!("{},video_transcriber=debug", self.level)
    }
}
