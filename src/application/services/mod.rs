mod media_converter;
mod transcription_pipeline;

pub use media_converter::MediaConverter;
pub use transcription_pipeline::{PipelineError, TranscriptionPipeline};
