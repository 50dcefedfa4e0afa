use std::time::Duration;

use video_transcriber::infrastructure::conversion::{ProgressTracker, parse_duration_line};

#[test]
fn given_ffmpeg_duration_line_when_parsing_then_returns_duration() {
    let line = "  Duration: 00:01:02.50, start: 0.000000, bitrate: 1205 kb/s";

    assert_eq!(
        parse_duration_line(line),
        Some(Duration::from_millis(62_500))
    );
}

#[test]
fn given_unrelated_line_when_parsing_duration_then_returns_none() {
    assert_eq!(parse_duration_line("Stream #0:0: Video: h264"), None);
    assert_eq!(parse_duration_line("  Duration: N/A, bitrate: N/A"), None);
}

#[test]
fn given_known_duration_when_reading_out_time_then_reports_fraction() {
    let mut tracker = ProgressTracker::new();
    tracker.on_log_line("  Duration: 00:00:10.00, start: 0.000000, bitrate: 800 kb/s");

    let fraction = tracker.on_progress_line("out_time_us=4000000").unwrap();

    assert!((fraction - 0.4).abs() < 1e-9);
}

#[test]
fn given_unknown_duration_when_reading_out_time_then_reports_nothing() {
    let mut tracker = ProgressTracker::new();

    assert_eq!(tracker.on_progress_line("out_time_us=4000000"), None);
}

#[test]
fn given_progress_end_marker_when_reading_then_reports_complete() {
    let mut tracker = ProgressTracker::new();

    assert_eq!(tracker.on_progress_line("progress=end"), Some(1.0));
    assert_eq!(tracker.on_progress_line("progress=continue"), None);
}

#[test]
fn given_unavailable_out_time_when_reading_then_ignores_line() {
    let mut tracker = ProgressTracker::new();
    tracker.on_log_line("  Duration: 00:00:10.00, start: 0.000000, bitrate: 800 kb/s");

    assert_eq!(tracker.on_progress_line("out_time_us=N/A"), None);
    assert_eq!(tracker.on_progress_line("bitrate=  20.0kbits/s"), None);
}

#[test]
fn given_second_duration_line_when_tracking_then_keeps_input_duration() {
    let mut tracker = ProgressTracker::new();
    tracker.on_log_line("  Duration: 00:00:10.00, start: 0.000000, bitrate: 800 kb/s");
    tracker.on_log_line("  Duration: 00:00:20.00, start: 0.000000, bitrate: 800 kb/s");

    assert_eq!(tracker.total(), Some(Duration::from_secs(10)));
}
