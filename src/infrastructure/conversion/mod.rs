mod ffmpeg_engine;
mod mock_conversion_engine;
mod progress_tracker;

pub use ffmpeg_engine::FfmpegEngine;
pub use mock_conversion_engine::MockConversionEngine;
pub use progress_tracker::{ProgressTracker, parse_duration_line};
