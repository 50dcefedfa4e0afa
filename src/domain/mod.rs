mod audio_artifact;
mod conversion_progress;
mod conversion_spec;
mod run_id;
mod selected_video;
mod status;
mod video_id;

pub use audio_artifact::{AUDIO_FILE_NAME, AUDIO_MIME_TYPE, AudioArtifact};
pub use conversion_progress::ConversionProgress;
pub use conversion_spec::ConversionSpec;
pub use run_id::RunId;
pub use selected_video::{SelectedVideo, SelectedVideoError, media_type_from_extension};
pub use status::{PipelineStage, Status, StatusKind};
pub use video_id::VideoId;
