use async_trait::async_trait;

/// Receives raw fractional progress readings from an engine.
pub type ProgressCallback<'a> = dyn Fn(f64) + Send + Sync + 'a;

/// An external media conversion engine with its own private file system.
///
/// Engines are expensive to initialize: `load` is called once per session by
/// the owning adapter, after which the remaining methods may be used any
/// number of times.
#[async_trait]
pub trait ConversionEngine: Send + Sync {
    async fn load(&self) -> Result<(), ConversionError>;

    async fn write_file(&self, name: &str, data: &[u8]) -> Result<(), ConversionError>;

    async fn exec(
        &self,
        args: &[String],
        on_progress: &ProgressCallback<'_>,
    ) -> Result<(), ConversionError>;

    async fn read_file(&self, name: &str) -> Result<Vec<u8>, ConversionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("engine unavailable: {0}")]
    EngineUnavailable(String),
    #[error("writing input failed: {0}")]
    WriteFailed(String),
    #[error("conversion command failed: {0}")]
    ExecFailed(String),
    #[error("reading output failed: {0}")]
    ReadFailed(String),
    #[error("conversion produced no output")]
    EmptyOutput,
}
