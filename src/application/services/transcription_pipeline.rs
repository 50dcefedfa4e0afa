use std::sync::Arc;

use tokio::sync::watch;
use tracing::Instrument;

use super::MediaConverter;
use crate::application::ports::{ConversionError, TranscriptionError, UploadError, VideoApi};
use crate::domain::{
    ConversionProgress, ConversionSpec, PipelineStage, RunId, SelectedVideo, Status, StatusKind,
    VideoId,
};

/// Drives one video through conversion, upload and transcription, publishing
/// every state change on a watch channel.
///
/// Only one run may be in flight at a time. `submit` claims the pipeline by
/// moving it from `Waiting` to `Converting` atomically, so a concurrent second
/// submission is rejected without side effects.
pub struct TranscriptionPipeline {
    converter: MediaConverter,
    api: Arc<dyn VideoApi>,
    spec: ConversionSpec,
    status: watch::Sender<Status>,
    progress: watch::Sender<ConversionProgress>,
}

impl TranscriptionPipeline {
    pub fn new(converter: MediaConverter, api: Arc<dyn VideoApi>) -> Self {
        let (status, _) = watch::channel(Status::Waiting);
        let (progress, _) = watch::channel(ConversionProgress::START);
        Self {
            converter,
            api,
            spec: ConversionSpec::default(),
            status,
            progress,
        }
    }

    pub fn status(&self) -> Status {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Status> {
        self.status.subscribe()
    }

    /// Last progress reported by the converter. Kept after the run ends and
    /// cleared when the next run starts or the pipeline is reset.
    pub fn conversion_progress(&self) -> ConversionProgress {
        *self.progress.borrow()
    }

    pub async fn submit(
        &self,
        video: SelectedVideo,
        prompt: Option<String>,
    ) -> Result<VideoId, PipelineError> {
        self.begin_run()?;
        let guard = RunGuard {
            status: &self.status,
            armed: true,
        };

        let run_id = RunId::new();
        let span = tracing::info_span!(
            "pipeline_run",
            run_id = %run_id,
            file_name = %video.file_name(),
        );

        let result = self
            .run(&video, prompt.as_deref())
            .instrument(span.clone())
            .await;
        guard.disarm();

        let _entered = span.enter();
        match &result {
            Ok(video_id) => {
                self.transition(Status::Success {
                    video_id: video_id.clone(),
                });
                tracing::info!(video_id = %video_id, "Pipeline run completed");
            }
            Err(e) => {
                let stage = e.stage().unwrap_or(PipelineStage::Conversion);
                tracing::error!(error = %e, stage = %stage, "Pipeline run failed");
                self.transition(Status::Error { stage });
            }
        }

        result
    }

    /// Returns to `Waiting` and forgets the previous run. Not allowed while a
    /// run is in flight.
    pub fn reset(&self) -> Result<(), PipelineError> {
        let mut rejected = None;
        self.status.send_if_modified(|status| {
            if status.is_running() {
                rejected = Some(status.kind());
                return false;
            }
            let changed = *status != Status::Waiting;
            *status = Status::Waiting;
            changed
        });

        if let Some(status) = rejected {
            return Err(PipelineError::NotReady { status });
        }

        self.progress.send_replace(ConversionProgress::START);
        tracing::debug!("Pipeline reset");
        Ok(())
    }

    async fn run(
        &self,
        video: &SelectedVideo,
        prompt: Option<&str>,
    ) -> Result<VideoId, PipelineError> {
        let on_progress = |progress: ConversionProgress| self.report_progress(progress);
        let artifact = self
            .converter
            .convert(video, &self.spec, &on_progress)
            .await
            .map_err(PipelineError::Conversion)?;

        self.transition(Status::Uploading);
        let video_id = self
            .api
            .upload_audio(&artifact)
            .await
            .map_err(PipelineError::Upload)?;

        self.transition(Status::Generating {
            video_id: video_id.clone(),
        });
        self.api
            .request_transcription(&video_id, prompt)
            .await
            .map_err(PipelineError::Transcription)?;

        Ok(video_id)
    }

    fn begin_run(&self) -> Result<(), PipelineError> {
        let mut rejected = None;
        self.status.send_if_modified(|status| {
            if *status != Status::Waiting {
                rejected = Some(status.kind());
                return false;
            }
            self.progress.send_replace(ConversionProgress::START);
            *status = Status::Converting {
                progress: ConversionProgress::START,
            };
            true
        });

        match rejected {
            Some(status) => {
                tracing::warn!(status = %status, "Submission rejected: pipeline is not waiting");
                Err(PipelineError::NotReady { status })
            }
            None => {
                tracing::debug!(status = %StatusKind::Converting, "Status transition");
                Ok(())
            }
        }
    }

    fn report_progress(&self, progress: ConversionProgress) {
        self.progress.send_replace(progress);
        self.status.send_if_modified(|status| match status {
            Status::Converting { progress: current } if *current != progress => {
                *current = progress;
                true
            }
            _ => false,
        });
        tracing::trace!(percent = progress.percent(), "Conversion progress");
    }

    fn transition(&self, next: Status) {
        tracing::debug!(status = %next.kind(), "Status transition");
        self.status.send_replace(next);
    }
}

/// Moves a still-running status to `Error` when `submit` is dropped before
/// the run settles.
struct RunGuard<'a> {
    status: &'a watch::Sender<Status>,
    armed: bool,
}

impl RunGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let mut abandoned = None;
        self.status.send_if_modified(|status| {
            let stage = match status {
                Status::Converting { .. } => PipelineStage::Conversion,
                Status::Uploading => PipelineStage::Upload,
                Status::Generating { .. } => PipelineStage::Transcription,
                _ => return false,
            };
            abandoned = Some(stage);
            *status = Status::Error { stage };
            true
        });

        if let Some(stage) = abandoned {
            tracing::warn!(stage = %stage, "Pipeline run abandoned before completion");
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("pipeline is not ready for submission (status {status})")]
    NotReady { status: StatusKind },
    #[error("conversion: {0}")]
    Conversion(ConversionError),
    #[error("upload: {0}")]
    Upload(UploadError),
    #[error("transcription: {0}")]
    Transcription(TranscriptionError),
}

impl PipelineError {
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            PipelineError::NotReady { .. } => None,
            PipelineError::Conversion(_) => Some(PipelineStage::Conversion),
            PipelineError::Upload(_) => Some(PipelineStage::Upload),
            PipelineError::Transcription(_) => Some(PipelineStage::Transcription),
        }
    }
}
