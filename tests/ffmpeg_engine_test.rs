use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use video_transcriber::application::ports::{ConversionEngine, ConversionError};
use video_transcriber::application::services::MediaConverter;
use video_transcriber::domain::{ConversionProgress, ConversionSpec, SelectedVideo};
use video_transcriber::infrastructure::conversion::FfmpegEngine;

fn ffmpeg_with_mp3_encoder() -> bool {
    std::process::Command::new("ffmpeg")
        .args(["-hide_banner", "-encoders"])
        .output()
        .map(|o| o.status.success() && String::from_utf8_lossy(&o.stdout).contains("libmp3lame"))
        .unwrap_or(false)
}

/// Renders a small test-pattern video with a sine tone, or `None` when the
/// local ffmpeg cannot produce one.
fn build_test_video(seconds: u32) -> Option<Vec<u8>> {
    let output = tempfile::Builder::new().suffix(".mp4").tempfile().ok()?;
    let status = std::process::Command::new("ffmpeg")
        .args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "lavfi",
            "-i",
            &format!("testsrc=duration={}:size=160x120:rate=10", seconds),
            "-f",
            "lavfi",
            "-i",
            &format!("sine=frequency=440:duration={}", seconds),
            "-c:v",
            "mpeg4",
            "-c:a",
            "aac",
            "-shortest",
            output.path().to_str()?,
        ])
        .output()
        .ok()?;

    if !status.status.success() {
        return None;
    }
    std::fs::read(output.path()).ok()
}

/// Writes an executable `ffmpeg` stand-in that answers `-version` and runs
/// `body` for any other invocation.
#[cfg(unix)]
fn fake_ffmpeg(dir: &TempDir, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.path().join("ffmpeg");
    let script = format!(
        "#!/bin/sh\nif [ \"$1\" = \"-version\" ]; then\n  echo \"ffmpeg version 0.0-fake\"\n  exit 0\nfi\n{}\n",
        body
    );
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

    // A concurrent fork may still hold the write handle (ETXTBSY) for a moment.
    for _ in 0..50 {
        match std::process::Command::new(&path).arg("-version").output() {
            Err(e) if e.raw_os_error() == Some(26) => {
                std::thread::sleep(std::time::Duration::from_millis(10))
            }
            _ => break,
        }
    }
    path
}

#[cfg(unix)]
const CONVERTING_FFMPEG: &str = r#"printf '%s\n' "$@" > args.txt
echo "  Duration: 00:00:10.00, start: 0.000000, bitrate: 128 kb/s" >&2
sleep 0.2
echo "out_time_us=4000000"
echo "out_time_us=12000000"
echo "progress=end"
printf 'ID3fake' > output.mp3"#;

#[cfg(unix)]
#[tokio::test]
async fn given_progress_stream_when_executing_then_reports_elapsed_over_logged_duration() {
    let bin_dir = TempDir::new().unwrap();
    let engine = FfmpegEngine::new(fake_ffmpeg(&bin_dir, CONVERTING_FFMPEG), None);
    engine.load().await.unwrap();
    let readings = Mutex::new(Vec::new());

    engine
        .exec(&ConversionSpec::default().to_args(), &|fraction: f64| {
            readings.lock().unwrap().push(fraction)
        })
        .await
        .unwrap();

    assert_eq!(*readings.lock().unwrap(), vec![0.4, 1.2, 1.0]);
}

#[cfg(unix)]
#[tokio::test]
async fn given_conversion_command_when_executing_then_progress_flags_precede_it() {
    let bin_dir = TempDir::new().unwrap();
    let engine = FfmpegEngine::new(fake_ffmpeg(&bin_dir, CONVERTING_FFMPEG), None);
    engine.load().await.unwrap();
    let args = ConversionSpec::default().to_args();

    engine.exec(&args, &|_: f64| {}).await.unwrap();

    let recorded = String::from_utf8(engine.read_file("args.txt").await.unwrap()).unwrap();
    let mut expected = vec!["-hide_banner", "-nostats", "-progress", "pipe:1", "-y"]
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>();
    expected.extend(args);
    assert_eq!(recorded.lines().collect::<Vec<_>>(), expected);
}

#[cfg(unix)]
#[tokio::test]
async fn given_failing_command_when_executing_then_error_carries_stderr_tail() {
    let bin_dir = TempDir::new().unwrap();
    let body = "for i in 1 2 3 4 5 6 7 8 9 10; do echo \"noise $i\" >&2; done\necho boom >&2\nexit 3";
    let engine = FfmpegEngine::new(fake_ffmpeg(&bin_dir, body), None);
    engine.load().await.unwrap();

    let result = engine
        .exec(&ConversionSpec::default().to_args(), &|_: f64| {})
        .await;

    match result {
        Err(ConversionError::ExecFailed(message)) => {
            assert!(message.contains("exit status: 3"), "{}", message);
            assert!(message.ends_with("boom"), "{}", message);
            assert!(message.contains("noise 4"), "{}", message);
            assert!(!message.contains("noise 3"), "{}", message);
        }
        other => panic!("expected exec failure, got {:?}", other),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn given_fake_engine_when_converting_then_artifact_comes_from_workspace_with_clamped_progress() {
    let bin_dir = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let engine = Arc::new(FfmpegEngine::new(
        fake_ffmpeg(&bin_dir, CONVERTING_FFMPEG),
        Some(root.path().to_path_buf()),
    ));
    let converter = MediaConverter::new(engine.clone());
    let video = SelectedVideo::new("clip.mp4", "video/mp4", b"fake mp4".to_vec()).unwrap();
    let seen = Mutex::new(Vec::new());

    let artifact = converter
        .convert(
            &video,
            &ConversionSpec::default(),
            &|progress: ConversionProgress| seen.lock().unwrap().push(progress.fraction()),
        )
        .await
        .unwrap();

    assert_eq!(artifact.data.as_ref(), b"ID3fake");
    assert_eq!(*seen.lock().unwrap(), vec![0.4, 1.0, 1.0]);
    assert!(engine.workspace_path().unwrap().starts_with(root.path()));
    assert_eq!(engine.read_file("input.mp4").await.unwrap(), b"fake mp4");
}

#[tokio::test]
async fn given_missing_binary_when_loading_then_engine_is_unavailable() {
    let engine = FfmpegEngine::new("/nonexistent/ffmpeg-binary", None);

    let result = engine.load().await;

    assert!(matches!(result, Err(ConversionError::EngineUnavailable(_))));
    assert!(engine.workspace_path().is_none());
}

#[tokio::test]
async fn given_unloaded_engine_when_writing_then_write_fails() {
    let engine = FfmpegEngine::new("ffmpeg", None);

    let result = engine.write_file("input.mp4", b"data").await;

    assert!(matches!(result, Err(ConversionError::WriteFailed(_))));
}

#[tokio::test]
async fn given_loaded_engine_when_writing_path_like_name_then_write_fails() {
    if !ffmpeg_with_mp3_encoder() {
        return;
    }
    let root = tempfile::TempDir::new().unwrap();
    let engine = FfmpegEngine::new("ffmpeg", Some(root.path().to_path_buf()));
    engine.load().await.unwrap();

    let result = engine.write_file("../escape.mp4", b"data").await;

    assert!(matches!(result, Err(ConversionError::WriteFailed(_))));
    assert!(engine.workspace_path().unwrap().starts_with(root.path()));
}

#[tokio::test]
async fn given_loaded_engine_when_writing_then_file_reads_back() {
    if !ffmpeg_with_mp3_encoder() {
        return;
    }
    let engine = FfmpegEngine::new("ffmpeg", None);
    engine.load().await.unwrap();

    engine.write_file("notes.bin", b"payload").await.unwrap();
    let data = engine.read_file("notes.bin").await.unwrap();

    assert_eq!(data, b"payload");
}

#[tokio::test]
async fn given_invalid_input_when_executing_then_returns_exec_error() {
    if !ffmpeg_with_mp3_encoder() {
        return;
    }
    let engine = FfmpegEngine::new("ffmpeg", None);
    engine.load().await.unwrap();
    engine
        .write_file("input.mp4", b"definitely not a video")
        .await
        .unwrap();

    let result = engine
        .exec(&ConversionSpec::default().to_args(), &|_: f64| {})
        .await;

    assert!(matches!(result, Err(ConversionError::ExecFailed(_))));
}

#[tokio::test]
async fn given_ten_second_video_when_converting_then_produces_mp3_audio_with_progress() {
    if !ffmpeg_with_mp3_encoder() {
        return;
    }
    let Some(video_bytes) = build_test_video(10) else {
        return;
    };
    let video = SelectedVideo::new("ten-seconds.mp4", "video/mp4", video_bytes).unwrap();
    let converter = MediaConverter::new(Arc::new(FfmpegEngine::new("ffmpeg", None)));
    let seen = Mutex::new(Vec::new());

    let artifact = converter
        .convert(
            &video,
            &ConversionSpec::default(),
            &|progress: ConversionProgress| seen.lock().unwrap().push(progress),
        )
        .await
        .unwrap();

    assert_eq!(artifact.file_name, "audio.mp3");
    assert!(!artifact.data.is_empty());
    let header = &artifact.data[..3];
    assert!(header == b"ID3" || (header[0] == 0xFF && header[1] & 0xE0 == 0xE0));
    // 20 kbps over 10 seconds is roughly 25 KB.
    assert!(artifact.data.len() < 60_000);

    let seen = seen.lock().unwrap();
    assert!(!seen.is_empty());
    assert!(seen.iter().all(|p| (0.0..=1.0).contains(&p.fraction())));
    assert_eq!(seen.last().copied(), Some(ConversionProgress::COMPLETE));
}
