use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::application::ports::{TranscriptionError, UploadError, VideoApi};
use crate::domain::{AudioArtifact, VideoId};

/// Video service stand-in that records every call it receives.
pub struct MockVideoApi {
    video_id: VideoId,
    fail_upload: bool,
    fail_transcription: bool,
    delay: Duration,
    upload_calls: AtomicUsize,
    transcription_calls: Mutex<Vec<(VideoId, Option<String>)>>,
}

impl MockVideoApi {
    pub fn new(video_id: impl Into<String>) -> Self {
        Self {
            video_id: VideoId::new(video_id),
            fail_upload: false,
            fail_transcription: false,
            delay: Duration::ZERO,
            upload_calls: AtomicUsize::new(0),
            transcription_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_upload(mut self) -> Self {
        self.fail_upload = true;
        self
    }

    pub fn failing_transcription(mut self) -> Self {
        self.fail_transcription = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn transcription_calls(&self) -> Vec<(VideoId, Option<String>)> {
        self.transcription_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl VideoApi for MockVideoApi {
    async fn upload_audio(&self, _artifact: &AudioArtifact) -> Result<VideoId, UploadError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail_upload {
            return Err(UploadError::Status {
                status: 500,
                body: "mock upload failure".to_string(),
            });
        }
        Ok(self.video_id.clone())
    }

    async fn request_transcription(
        &self,
        video_id: &VideoId,
        prompt: Option<&str>,
    ) -> Result<(), TranscriptionError> {
        if let Ok(mut calls) = self.transcription_calls.lock() {
            calls.push((video_id.clone(), prompt.map(str::to_string)));
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail_transcription {
            return Err(TranscriptionError::Status {
                status: 500,
                body: "mock transcription failure".to_string(),
            });
        }
        Ok(())
    }
}
