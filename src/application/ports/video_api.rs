use async_trait::async_trait;

use crate::domain::{AudioArtifact, VideoId};

/// The remote service that stores uploaded audio and transcribes it.
///
/// Both calls are single-shot; retrying is left to the caller.
#[async_trait]
pub trait VideoApi: Send + Sync {
    async fn upload_audio(&self, artifact: &AudioArtifact) -> Result<VideoId, UploadError>;

    async fn request_transcription(
        &self,
        video_id: &VideoId,
        prompt: Option<&str>,
    ) -> Result<(), TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("upload request failed: {0}")]
    Request(String),
    #[error("upload rejected with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid upload response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("transcription request failed: {0}")]
    Request(String),
    #[error("transcription rejected with status {status}: {body}")]
    Status { status: u16, body: String },
}
