/// Description of the output the conversion engine must produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSpec {
    pub source_name: String,
    pub target_name: String,
    pub stream_selector: String,
    pub audio_codec: String,
    pub audio_bitrate: String,
}

impl ConversionSpec {
    /// Engine arguments: input, stream map, bitrate, codec, output.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "-i".to_string(),
            self.source_name.clone(),
            "-map".to_string(),
            self.stream_selector.clone(),
            "-b:a".to_string(),
            self.audio_bitrate.clone(),
            "-acodec".to_string(),
            self.audio_codec.clone(),
            self.target_name.clone(),
        ]
    }
}

/// Audio only, 20 kbps MP3. The transcription service expects exactly this
/// format, so it is not configurable.
impl Default for ConversionSpec {
    fn default() -> Self {
        Self {
            source_name: "input.mp4".to_string(),
            target_name: "output.mp3".to_string(),
            stream_selector: "0:a".to_string(),
            audio_codec: "libmp3lame".to_string(),
            audio_bitrate: "20k".to_string(),
        }
    }
}
