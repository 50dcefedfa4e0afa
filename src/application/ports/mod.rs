mod conversion_engine;
mod video_api;

pub use conversion_engine::{ConversionEngine, ConversionError, ProgressCallback};
pub use video_api::{TranscriptionError, UploadError, VideoApi};
