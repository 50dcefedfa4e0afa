use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::application::services::{PipelineError, TranscriptionPipeline};
use crate::domain::{SelectedVideo, Status, StatusKind, VideoId};

type VideoUploadedCallback = Box<dyn Fn(&VideoId) + Send + Sync>;

/// Holds the user's file and prompt and hands them to the pipeline.
///
/// The host is notified through `on_video_uploaded` exactly once per
/// successful run.
pub struct VideoInputForm {
    pipeline: Arc<TranscriptionPipeline>,
    selected: Mutex<Option<SelectedVideo>>,
    prompt: Mutex<String>,
    on_video_uploaded: VideoUploadedCallback,
}

impl VideoInputForm {
    pub fn new(
        pipeline: Arc<TranscriptionPipeline>,
        on_video_uploaded: impl Fn(&VideoId) + Send + Sync + 'static,
    ) -> Self {
        Self {
            pipeline,
            selected: Mutex::new(None),
            prompt: Mutex::new(String::new()),
            on_video_uploaded: Box::new(on_video_uploaded),
        }
    }

    pub fn status(&self) -> Status {
        self.pipeline.status()
    }

    pub fn pipeline(&self) -> &Arc<TranscriptionPipeline> {
        &self.pipeline
    }

    /// Replaces the current selection and returns the pipeline to `Waiting`,
    /// discarding whatever the previous run left behind.
    pub fn select_file(&self, video: SelectedVideo) -> Result<(), FormError> {
        self.pipeline.reset().map_err(|e| match e {
            PipelineError::NotReady { status } => FormError::RunInProgress { status },
            other => FormError::Pipeline(other),
        })?;

        tracing::info!(
            file_name = %video.file_name(),
            media_type = %video.media_type(),
            size_bytes = video.size_bytes(),
            "Video selected"
        );

        *lock(&self.selected) = Some(video);
        Ok(())
    }

    pub fn selected_video(&self) -> Option<SelectedVideo> {
        lock(&self.selected).clone()
    }

    pub fn set_prompt(&self, prompt: impl Into<String>) -> Result<(), FormError> {
        let status = self.pipeline.status().kind();
        if status != StatusKind::Waiting {
            return Err(FormError::PromptLocked { status });
        }
        *lock(&self.prompt) = prompt.into();
        Ok(())
    }

    pub fn prompt(&self) -> String {
        lock(&self.prompt).clone()
    }

    pub fn can_edit_prompt(&self) -> bool {
        self.pipeline.status().kind() == StatusKind::Waiting
    }

    pub fn can_submit(&self) -> bool {
        self.can_edit_prompt() && lock(&self.selected).is_some()
    }

    pub fn button_label(&self) -> String {
        self.pipeline.status().message()
    }

    pub async fn submit(&self) -> Result<VideoId, FormError> {
        let video = self
            .selected_video()
            .ok_or(FormError::NoVideoSelected)?;

        let prompt = {
            let prompt = lock(&self.prompt);
            (!prompt.trim().is_empty()).then(|| prompt.clone())
        };

        let video_id = self.pipeline.submit(video, prompt).await?;
        (self.on_video_uploaded)(&video_id);
        Ok(video_id)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("no video selected")]
    NoVideoSelected,
    #[error("a run is in progress (status {status})")]
    RunInProgress { status: StatusKind },
    #[error("prompt cannot be edited (status {status})")]
    PromptLocked { status: StatusKind },
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}
