use bytes::Bytes;

/// A video payload the user picked, together with its declared media type.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedVideo {
    file_name: String,
    media_type: String,
    data: Bytes,
}

impl SelectedVideo {
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Result<Self, SelectedVideoError> {
        let media_type = media_type.into();
        if !media_type.starts_with("video/") {
            return Err(SelectedVideoError::UnsupportedMediaType(media_type));
        }

        let data = data.into();
        if data.is_empty() {
            return Err(SelectedVideoError::Empty);
        }

        Ok(Self {
            file_name: file_name.into(),
            media_type,
            data,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Maps a file extension to the video media type used when selecting a file
/// from disk.
pub fn media_type_from_extension(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "mp4" | "m4v" => Some("video/mp4"),
        "mov" => Some("video/quicktime"),
        "webm" => Some("video/webm"),
        "mkv" => Some("video/x-matroska"),
        "avi" => Some("video/x-msvideo"),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SelectedVideoError {
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("video payload is empty")]
    Empty,
}
