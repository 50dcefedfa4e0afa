use std::fmt;

use super::{ConversionProgress, VideoId};

/// Where the current run stands.
///
/// `Waiting` is the initial state. `Success` and `Error` are terminal for a
/// run; only a new file selection or an explicit reset leaves them.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Status {
    #[default]
    Waiting,
    Converting { progress: ConversionProgress },
    Uploading,
    Generating { video_id: VideoId },
    Success { video_id: VideoId },
    Error { stage: PipelineStage },
}

impl Status {
    pub fn kind(&self) -> StatusKind {
        match self {
            Status::Waiting => StatusKind::Waiting,
            Status::Converting { .. } => StatusKind::Converting,
            Status::Uploading => StatusKind::Uploading,
            Status::Generating { .. } => StatusKind::Generating,
            Status::Success { .. } => StatusKind::Success,
            Status::Error { .. } => StatusKind::Error,
        }
    }

    /// Text shown on the submit control for this state.
    pub fn message(&self) -> String {
        match self {
            Status::Waiting => "Carregar vídeo".to_string(),
            Status::Converting { progress } => {
                format!("Convertendo({}%)...", progress.percent())
            }
            Status::Uploading => "Carregando...".to_string(),
            Status::Generating { .. } => "Transcrevendo... Quase lá".to_string(),
            Status::Success { .. } => "Sucesso!".to_string(),
            Status::Error { .. } => "Erro".to_string(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.kind().is_running()
    }

    pub fn is_terminal(&self) -> bool {
        self.kind().is_terminal()
    }

    pub fn video_id(&self) -> Option<&VideoId> {
        match self {
            Status::Generating { video_id } | Status::Success { video_id } => Some(video_id),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    Waiting,
    Converting,
    Uploading,
    Generating,
    Success,
    Error,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Waiting => "WAITING",
            StatusKind::Converting => "CONVERTING",
            StatusKind::Uploading => "UPLOADING",
            StatusKind::Generating => "GENERATING",
            StatusKind::Success => "SUCCESS",
            StatusKind::Error => "ERROR",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(
            self,
            StatusKind::Converting | StatusKind::Uploading | StatusKind::Generating
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StatusKind::Success | StatusKind::Error)
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The pipeline stage a run failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Conversion,
    Upload,
    Transcription,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Conversion => "conversion",
            PipelineStage::Upload => "upload",
            PipelineStage::Transcription => "transcription",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
