use std::time::Duration;

/// Turns ffmpeg's textual output into fractional progress.
///
/// The total duration comes from the `Duration:` line ffmpeg logs on stderr
/// when probing the input; elapsed time comes from the `out_time_us=` keys of
/// the `-progress` stream on stdout.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    total: Option<Duration>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> Option<Duration> {
        self.total
    }

    /// Feeds one stderr line. Only the first input duration is kept.
    pub fn on_log_line(&mut self, line: &str) {
        if self.total.is_some() {
            return;
        }
        if let Some(duration) = parse_duration_line(line) {
            self.total = Some(duration);
        }
    }

    /// Feeds one line of the `-progress` stream and returns the completed
    /// fraction when the line carries a usable reading.
    pub fn on_progress_line(&mut self, line: &str) -> Option<f64> {
        let (key, value) = line.trim().split_once('=')?;
        match key {
            "out_time_us" | "out_time_ms" => {
                let elapsed_us: i64 = value.trim().parse().ok()?;
                let total = self.total?;
                if total.is_zero() {
                    return None;
                }
                Some(elapsed_us.max(0) as f64 / total.as_micros() as f64)
            }
            "progress" if value.trim() == "end" => Some(1.0),
            _ => None,
        }
    }
}

/// Parses `  Duration: 00:01:02.50, start: 0.000000, bitrate: 1205 kb/s`.
pub fn parse_duration_line(line: &str) -> Option<Duration> {
    let rest = line.trim_start().strip_prefix("Duration:")?;
    let timestamp = rest.split(',').next()?.trim();
    parse_timestamp(timestamp)
}

fn parse_timestamp(timestamp: &str) -> Option<Duration> {
    let mut parts = timestamp.split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some(Duration::from_secs(hours * 3600 + minutes * 60) + Duration::from_secs_f64(seconds))
}
