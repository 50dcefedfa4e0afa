use bytes::Bytes;

pub const AUDIO_FILE_NAME: &str = "audio.mp3";
pub const AUDIO_MIME_TYPE: &str = "audio/mpeg";

/// Compressed audio produced by conversion and sent to the upload endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub data: Bytes,
}

impl AudioArtifact {
    pub fn mp3(data: impl Into<Bytes>) -> Self {
        Self {
            file_name: AUDIO_FILE_NAME.to_string(),
            mime_type: AUDIO_MIME_TYPE.to_string(),
            data: data.into(),
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }
}
