use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::application::ports::{ConversionEngine, ConversionError, ProgressCallback};

/// In-memory engine that reports scripted progress and writes a fixed output.
pub struct MockConversionEngine {
    progress_steps: Vec<f64>,
    output: Vec<u8>,
    fail_exec: bool,
    step_delay: Duration,
    files: Mutex<HashMap<String, Vec<u8>>>,
    load_calls: AtomicUsize,
    exec_args: Mutex<Vec<Vec<String>>>,
}

impl MockConversionEngine {
    pub fn new(output: Vec<u8>) -> Self {
        Self {
            progress_steps: vec![0.25, 0.5, 0.75, 1.0],
            output,
            fail_exec: false,
            step_delay: Duration::ZERO,
            files: Mutex::new(HashMap::new()),
            load_calls: AtomicUsize::new(0),
            exec_args: Mutex::new(Vec::new()),
        }
    }

    pub fn with_progress_steps(mut self, steps: Vec<f64>) -> Self {
        self.progress_steps = steps;
        self
    }

    /// Makes `exec` fail after reporting every progress step.
    pub fn failing_after_progress(mut self) -> Self {
        self.fail_exec = true;
        self
    }

    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    pub fn exec_args(&self) -> Vec<Vec<String>> {
        self.exec_args.lock().map(|a| a.clone()).unwrap_or_default()
    }

    pub fn file(&self, name: &str) -> Option<Vec<u8>> {
        self.files.lock().ok()?.get(name).cloned()
    }

    fn output_name(args: &[String]) -> Option<&str> {
        args.last().map(String::as_str)
    }
}

#[async_trait::async_trait]
impl ConversionEngine for MockConversionEngine {
    async fn load(&self) -> Result<(), ConversionError> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn write_file(&self, name: &str, data: &[u8]) -> Result<(), ConversionError> {
        let mut files = self
            .files
            .lock()
            .map_err(|e| ConversionError::WriteFailed(e.to_string()))?;
        files.insert(name.to_string(), data.to_vec());
        Ok(())
    }

    async fn exec(
        &self,
        args: &[String],
        on_progress: &ProgressCallback<'_>,
    ) -> Result<(), ConversionError> {
        if let Ok(mut calls) = self.exec_args.lock() {
            calls.push(args.to_vec());
        }

        for step in &self.progress_steps {
            if !self.step_delay.is_zero() {
                tokio::time::sleep(self.step_delay).await;
            }
            on_progress(*step);
        }

        if self.fail_exec {
            return Err(ConversionError::ExecFailed(
                "mock engine configured to fail".to_string(),
            ));
        }

        let output_name = Self::output_name(args)
            .ok_or_else(|| ConversionError::ExecFailed("no output file given".to_string()))?;
        let mut files = self
            .files
            .lock()
            .map_err(|e| ConversionError::ExecFailed(e.to_string()))?;
        files.insert(output_name.to_string(), self.output.clone());
        Ok(())
    }

    async fn read_file(&self, name: &str) -> Result<Vec<u8>, ConversionError> {
        self.file(name)
            .ok_or_else(|| ConversionError::ReadFailed(format!("{} not found", name)))
    }
}
