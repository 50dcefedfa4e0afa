use std::time::Duration;

use serde::Deserialize;

pub const SCAFFOLD_VIDEO_ID: &str = "scaffold-video";

/// Runs the host against in-memory engine and service stand-ins, so the whole
/// flow can be exercised without ffmpeg or a reachable server.
///
/// Loaded as the `[scaffold]` section of `Settings` (`APP_SCAFFOLD__ENABLED`).
#[derive(Debug, Clone, Deserialize)]
pub struct ScaffoldConfig {
    pub enabled: bool,
    pub mock_response_delay_ms: u64,
}

impl ScaffoldConfig {
    pub fn mock_delay(&self) -> Duration {
        Duration::from_millis(self.mock_response_delay_ms)
    }
}
