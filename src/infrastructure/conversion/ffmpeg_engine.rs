use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::OnceCell;

use super::ProgressTracker;
use crate::application::ports::{ConversionEngine, ConversionError, ProgressCallback};

const STDERR_TAIL_LINES: usize = 8;

/// Conversion engine backed by the `ffmpeg` executable.
///
/// Files written through the engine live in a private temporary workspace
/// created by `load` and removed when the engine is dropped.
pub struct FfmpegEngine {
    binary: PathBuf,
    working_root: Option<PathBuf>,
    workspace: OnceCell<TempDir>,
}

impl FfmpegEngine {
    pub fn new(binary: impl Into<PathBuf>, working_root: Option<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            working_root,
            workspace: OnceCell::new(),
        }
    }

    pub fn workspace_path(&self) -> Option<&Path> {
        self.workspace.get().map(TempDir::path)
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, String> {
        let workspace = self
            .workspace_path()
            .ok_or_else(|| "engine not loaded".to_string())?;
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(format!("invalid file name: {}", name));
        }
        Ok(workspace.join(name))
    }

    fn create_workspace(&self) -> std::io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("video-transcriber-");
        match &self.working_root {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        }
    }
}

#[async_trait]
impl ConversionEngine for FfmpegEngine {
    async fn load(&self) -> Result<(), ConversionError> {
        let output = Command::new(&self.binary)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                ConversionError::EngineUnavailable(format!(
                    "failed to run {}: {}",
                    self.binary.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(ConversionError::EngineUnavailable(format!(
                "{} -version exited with {}",
                self.binary.display(),
                output.status
            )));
        }

        let version = String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string();

        let workspace = self
            .workspace
            .get_or_try_init(|| async { self.create_workspace() })
            .await
            .map_err(|e| ConversionError::EngineUnavailable(format!("workspace: {}", e)))?;

        tracing::info!(
            version = %version,
            workspace = %workspace.path().display(),
            "ffmpeg engine loaded"
        );

        Ok(())
    }

    async fn write_file(&self, name: &str, data: &[u8]) -> Result<(), ConversionError> {
        let path = self.resolve(name).map_err(ConversionError::WriteFailed)?;
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| ConversionError::WriteFailed(format!("{}: {}", name, e)))?;
        tracing::debug!(name, size_bytes = data.len(), "Wrote engine input file");
        Ok(())
    }

    async fn exec(
        &self,
        args: &[String],
        on_progress: &ProgressCallback<'_>,
    ) -> Result<(), ConversionError> {
        let workspace = self
            .workspace_path()
            .ok_or_else(|| ConversionError::EngineUnavailable("engine not loaded".to_string()))?;

        tracing::debug!(args = ?args, "Running ffmpeg");

        let mut child = Command::new(&self.binary)
            .current_dir(workspace)
            .args(["-hide_banner", "-nostats", "-progress", "pipe:1", "-y"])
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ConversionError::ExecFailed(format!("spawn: {}", e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ConversionError::ExecFailed("stdout not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ConversionError::ExecFailed("stderr not captured".to_string()))?;

        let mut stdout_lines = BufReader::new(stdout).lines();
        let mut stderr_lines = BufReader::new(stderr).lines();
        let mut tracker = ProgressTracker::new();
        let mut stderr_tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);
        let mut stdout_open = true;
        let mut stderr_open = true;

        while stdout_open || stderr_open {
            tokio::select! {
                line = stdout_lines.next_line(), if stdout_open => match line {
                    Ok(Some(line)) => {
                        if let Some(fraction) = tracker.on_progress_line(&line) {
                            on_progress(fraction);
                        }
                    }
                    _ => stdout_open = false,
                },
                line = stderr_lines.next_line(), if stderr_open => match line {
                    Ok(Some(line)) => {
                        tracker.on_log_line(&line);
                        if stderr_tail.len() == STDERR_TAIL_LINES {
                            stderr_tail.pop_front();
                        }
                        stderr_tail.push_back(line);
                    }
                    _ => stderr_open = false,
                },
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| ConversionError::ExecFailed(format!("wait: {}", e)))?;

        if !status.success() {
            let tail = stderr_tail.into_iter().collect::<Vec<_>>().join("\n");
            return Err(ConversionError::ExecFailed(format!(
                "ffmpeg exited with {}: {}",
                status, tail
            )));
        }

        tracing::debug!(duration = ?tracker.total(), "ffmpeg finished");
        Ok(())
    }

    async fn read_file(&self, name: &str) -> Result<Vec<u8>, ConversionError> {
        let path = self.resolve(name).map_err(ConversionError::ReadFailed)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| ConversionError::ReadFailed(format!("{}: {}", name, e)))
    }
}
