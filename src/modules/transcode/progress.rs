use std::sync::LazyLock;

use regex::Regex;

static ELAPSED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"time=(\d+):(\d{2}):(\d{2}(?:\.\d+)?)").expect("elapsed-time pattern is valid")
});

/// Seconds encoded so far, from the first `time=HH:MM:SS.ff` marker in `chunk`.
pub fn parse_elapsed(chunk: &str) -> Option<f64> {
    let caps = ELAPSED_RE.captures(chunk)?;
    let hours: f64 = caps[1].parse().ok()?;
    let minutes: f64 = caps[2].parse().ok()?;
    let seconds: f64 = caps[3].parse().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

pub fn percent(elapsed: f64, duration: f64) -> u8 {
    ((elapsed / duration).clamp(0.0, 1.0) * 100.0).floor() as u8
}

/// Turns raw encoder stderr chunks into percentages for a single job.
#[derive(Debug)]
pub struct ProgressTracker {
    duration: f64,
    last: Option<u8>,
}

impl ProgressTracker {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            last: None,
        }
    }

    /// Returns a percentage only when it moves past the last one returned.
    /// With an unknown duration nothing is ever returned.
    pub fn observe(&mut self, chunk: &str) -> Option<u8> {
        if self.duration.is_nan() || self.duration <= 0.0 {
            return None;
        }

        let pct = percent(parse_elapsed(chunk)?, self.duration);
        if self.last.is_some_and(|last| pct <= last) {
            return None;
        }

        self.last = Some(pct);
        Some(pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATS_LINE: &str =
        "frame=  240 fps= 48 q=28.0 size=    1024kB time=00:00:05.00 bitrate=1677.7kbits/s speed=0.98x\r";

    #[test]
    fn parses_stats_line() {
        assert_eq!(parse_elapsed(STATS_LINE), Some(5.0));
        assert_eq!(parse_elapsed("time=01:02:03.50"), Some(3723.5));
    }

    #[test]
    fn ignores_input_duration_header() {
        assert_eq!(parse_elapsed("  Duration: 00:01:00.00, start: 0.000000, bitrate: 9000 kb/s\n"), None);
        assert_eq!(parse_elapsed("Press [q] to stop"), None);
    }

    #[test]
    fn takes_first_marker_of_a_chunk() {
        let chunk = "time=00:00:01.00 bitrate=N/A\rframe=2 time=00:00:09.00\r";
        assert_eq!(parse_elapsed(chunk), Some(1.0));
    }

    #[test]
    fn percent_is_floored_and_clamped() {
        assert_eq!(percent(0.0, 10.0), 0);
        assert_eq!(percent(3.339, 10.0), 33);
        assert_eq!(percent(9.999, 10.0), 99);
        assert_eq!(percent(12.0, 10.0), 100);
        assert_eq!(percent(-1.0, 10.0), 0);
    }

    #[test]
    fn emits_each_percentage_once_and_never_goes_back() {
        let mut tracker = ProgressTracker::new(100.0);
        let chunks = [
            "time=00:00:00.00",
            "time=00:00:00.40",
            "time=00:00:10.00",
            "time=00:00:10.90",
            "no marker here",
            "time=00:00:05.00",
            "time=00:00:55.00",
            "time=00:01:40.00",
            "time=00:01:45.00",
        ];

        let emitted: Vec<u8> = chunks.iter().filter_map(|c| tracker.observe(c)).collect();
        assert_eq!(emitted, vec![0, 10, 55, 100]);
    }

    #[test]
    fn unknown_duration_emits_nothing() {
        let mut tracker = ProgressTracker::new(0.0);
        assert_eq!(tracker.observe("time=00:00:05.00"), None);

        let mut tracker = ProgressTracker::new(f64::NAN);
        assert_eq!(tracker.observe("time=00:00:05.00"), None);
    }
}
