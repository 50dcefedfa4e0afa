use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::application::ports::{ConversionEngine, ConversionError};
use crate::domain::{AudioArtifact, ConversionProgress, ConversionSpec, SelectedVideo};

/// Turns a selected video into the compressed audio track the remote service
/// expects, using a single conversion engine for the whole session.
pub struct MediaConverter {
    engine: Arc<dyn ConversionEngine>,
    loaded: OnceCell<()>,
}

impl MediaConverter {
    pub fn new(engine: Arc<dyn ConversionEngine>) -> Self {
        Self {
            engine,
            loaded: OnceCell::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.initialized()
    }

    pub async fn convert(
        &self,
        video: &SelectedVideo,
        spec: &ConversionSpec,
        on_progress: &(dyn Fn(ConversionProgress) + Send + Sync),
    ) -> Result<AudioArtifact, ConversionError> {
        tracing::info!(
            file_name = %video.file_name(),
            size_bytes = video.size_bytes(),
            "Conversion started"
        );

        self.ensure_loaded().await?;

        self.engine
            .write_file(&spec.source_name, video.data())
            .await?;

        let report = |fraction: f64| on_progress(ConversionProgress::new(fraction));
        self.engine.exec(&spec.to_args(), &report).await?;

        let data = self.engine.read_file(&spec.target_name).await?;
        if data.is_empty() {
            return Err(ConversionError::EmptyOutput);
        }

        let artifact = AudioArtifact::mp3(data);
        tracing::info!(size_bytes = artifact.size_bytes(), "Conversion finished");

        Ok(artifact)
    }

    async fn ensure_loaded(&self) -> Result<(), ConversionError> {
        self.loaded
            .get_or_try_init(|| async {
                tracing::debug!("Loading conversion engine");
                self.engine.load().await
            })
            .await?;
        Ok(())
    }
}
