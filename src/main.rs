use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};

use video_transcriber::application::ports::{ConversionEngine, VideoApi};
use video_transcriber::application::services::{MediaConverter, TranscriptionPipeline};
use video_transcriber::domain::{SelectedVideo, media_type_from_extension};
use video_transcriber::infrastructure::conversion::{FfmpegEngine, MockConversionEngine};
use video_transcriber::infrastructure::http::{HttpVideoApi, MockVideoApi};
use video_transcriber::infrastructure::observability::init_tracing;
use video_transcriber::presentation::config::SCAFFOLD_VIDEO_ID;
use video_transcriber::presentation::{Environment, Settings, VideoInputForm};

const USAGE: &str = "usage: video-transcriber <video-file> [prompt]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&settings.tracing_config(environment));

    let mut args = std::env::args().skip(1);
    let Some(video_path) = args.next().map(PathBuf::from) else {
        bail!(USAGE);
    };
    let prompt = args.collect::<Vec<_>>().join(" ");

    let scaffold = &settings.scaffold;
    let (engine, api): (Arc<dyn ConversionEngine>, Arc<dyn VideoApi>) = if scaffold.enabled {
        tracing::warn!("Scaffold mode enabled: using in-memory engine and service");
        (
            Arc::new(
                MockConversionEngine::new(b"ID3 scaffold audio".to_vec())
                    .with_step_delay(scaffold.mock_delay()),
            ),
            Arc::new(MockVideoApi::new(SCAFFOLD_VIDEO_ID).with_delay(scaffold.mock_delay())),
        )
    } else {
        (
            Arc::new(FfmpegEngine::new(
                &settings.ffmpeg.binary,
                settings.ffmpeg.working_dir.clone(),
            )),
            Arc::new(
                HttpVideoApi::new(&settings.api.base_url, settings.api.timeout())
                    .context("Failed to build HTTP client")?,
            ),
        )
    };

    let pipeline = Arc::new(TranscriptionPipeline::new(MediaConverter::new(engine), api));
    let form = VideoInputForm::new(Arc::clone(&pipeline), |video_id| {
        println!("{}", video_id);
    });

    form.select_file(read_video(&video_path).await?)?;
    form.set_prompt(prompt)?;

    let mut status_rx = pipeline.subscribe();
    let mut last_message = String::new();
    let submission = form.submit();
    tokio::pin!(submission);

    let result = loop {
        tokio::select! {
            result = &mut submission => break result,
            Ok(()) = status_rx.changed() => {
                let message = status_rx.borrow_and_update().message();
                print_status(&message, &mut last_message);
            }
        }
    };
    print_status(&pipeline.status().message(), &mut last_message);

    result.context("Transcription pipeline failed")?;
    Ok(())
}

fn print_status(message: &str, last_message: &mut String) {
    if message != last_message.as_str() {
        eprintln!("{}", message);
        *last_message = message.to_string();
    }
}

async fn read_video(path: &Path) -> anyhow::Result<SelectedVideo> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let media_type = media_type_from_extension(extension)
        .with_context(|| format!("Unsupported video file: {}", path.display()))?;

    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "video".to_string());

    Ok(SelectedVideo::new(file_name, media_type, data)?)
}
