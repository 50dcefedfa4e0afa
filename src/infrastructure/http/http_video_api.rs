use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde::{Deserialize, Serialize};

use crate::application::ports::{TranscriptionError, UploadError, VideoApi};
use crate::domain::{AudioArtifact, VideoId};
use crate::infrastructure::observability::sanitize_prompt;

/// Client for the video service's upload and transcription endpoints.
pub struct HttpVideoApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpVideoApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    video: UploadedVideo,
}

#[derive(Debug, Deserialize)]
struct UploadedVideo {
    id: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct TranscriptionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt: Option<&'a str>,
}

fn video_id_from_value(value: serde_json::Value) -> Result<VideoId, UploadError> {
    match value {
        serde_json::Value::String(id) if !id.is_empty() => Ok(VideoId::new(id)),
        serde_json::Value::Number(id) => Ok(VideoId::new(id.to_string())),
        other => Err(UploadError::InvalidResponse(format!(
            "unexpected video.id: {}",
            other
        ))),
    }
}

#[async_trait]
impl VideoApi for HttpVideoApi {
    async fn upload_audio(&self, artifact: &AudioArtifact) -> Result<VideoId, UploadError> {
        let url = format!("{}/videos", self.base_url);

        let file_part = multipart::Part::bytes(artifact.data.to_vec())
            .file_name(artifact.file_name.clone())
            .mime_str(&artifact.mime_type)
            .map_err(|e| UploadError::Request(format!("mime: {}", e)))?;

        let form = multipart::Form::new().part("file", file_part);

        tracing::debug!(size_bytes = artifact.size_bytes(), "Uploading audio");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Request(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(UploadError::Status { status, body });
        }

        let payload: UploadResponse = response
            .json()
            .await
            .map_err(|e| UploadError::InvalidResponse(format!("body: {}", e)))?;

        let video_id = video_id_from_value(payload.video.id)?;
        tracing::info!(video_id = %video_id, "Audio uploaded");

        Ok(video_id)
    }

    async fn request_transcription(
        &self,
        video_id: &VideoId,
        prompt: Option<&str>,
    ) -> Result<(), TranscriptionError> {
        let url = format!("{}/videos/{}/transcription", self.base_url, video_id);

        tracing::debug!(
            video_id = %video_id,
            prompt = %sanitize_prompt(prompt.unwrap_or_default()),
            "Requesting transcription"
        );

        let response = self
            .client
            .post(&url)
            .json(&TranscriptionRequest { prompt })
            .send()
            .await
            .map_err(|e| TranscriptionError::Request(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TranscriptionError::Status { status, body });
        }

        tracing::info!(video_id = %video_id, "Transcription requested");
        Ok(())
    }
}
