//! Stopwatch and survival timing
//!
//! Times are shown and persisted as `HH:MM:SS`. Parsing is fail-soft: any
//! blank or malformed value reads as zero so a corrupt record can never
//! block a round.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whole-second duration shown on the stopwatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct StopwatchTime {
    secs: u64,
}

impl StopwatchTime {
    pub const ZERO: Self = Self { secs: 0 };

    pub fn from_secs(secs: u64) -> Self {
        Self { secs }
    }

    /// Whole seconds of a fractional duration. Negative and NaN read as zero.
    pub fn from_secs_f64(secs: f64) -> Self {
        if secs.is_finite() && secs > 0.0 {
            Self { secs: secs.floor() as u64 }
        } else {
            Self::ZERO
        }
    }

    /// `None` when the total does not fit in a u64
    pub fn from_hms(hours: u64, minutes: u64, seconds: u64) -> Option<Self> {
        let secs = hours
            .checked_mul(3600)?
            .checked_add(minutes.checked_mul(60)?)?
            .checked_add(seconds)?;
        Some(Self { secs })
    }

    pub fn total_secs(&self) -> u64 {
        self.secs
    }

    pub fn is_zero(&self) -> bool {
        self.secs == 0
    }

    /// Strict `HH:MM:SS` parse
    pub fn try_parse(text: &str) -> Option<Self> {
        let mut parts = text.trim().split(':');
        let mut next = || parts.next()?.trim().parse::<u64>().ok();
        let (h, m, s) = (next()?, next()?, next()?);
        if parts.next().is_some() {
            return None;
        }
        Self::from_hms(h, m, s)
    }

    /// Fail-soft parse: blank or malformed text is `00:00:00`
    pub fn parse(text: &str) -> Self {
        Self::try_parse(text).unwrap_or_default()
    }
}

impl fmt::Display for StopwatchTime {
    /// Hours wrap at a day, like a time-span component
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = (self.secs / 3600) % 24;
        let minutes = (self.secs / 60) % 60;
        let seconds = self.secs % 60;
        write!(f, "{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

/// Running stopwatch for the current flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTimer {
    /// Session clock (seconds) when the current play started
    pub last_play_time: f64,
    /// Seconds since `last_play_time` at the last update
    pub elapsed: f64,
    /// What the stopwatch label reads
    displayed: StopwatchTime,
}

impl SessionTimer {
    pub fn new(now: f64) -> Self {
        Self {
            last_play_time: now,
            elapsed: 0.0,
            displayed: StopwatchTime::ZERO,
        }
    }

    /// Start counting from `now`
    pub fn restart(&mut self, now: f64) {
        self.last_play_time = now;
        self.elapsed = 0.0;
    }

    /// Advance the stopwatch display to `now`
    pub fn update(&mut self, now: f64) {
        self.elapsed = (now - self.last_play_time).max(0.0);
        self.displayed = StopwatchTime::from_secs_f64(self.elapsed);
    }

    pub fn displayed(&self) -> StopwatchTime {
        self.displayed
    }

    pub fn display_text(&self) -> String {
        self.displayed.to_string()
    }

    /// Seconds since the last play started, without touching the display
    pub fn idle_for(&self, now: f64) -> f64 {
        now - self.last_play_time
    }

    /// Zero the display. Returns whether it showed anything.
    pub fn reset_display(&mut self) -> bool {
        let was_running = !self.displayed.is_zero();
        self.displayed = StopwatchTime::ZERO;
        was_running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_round_trip() {
        assert_eq!(StopwatchTime::parse("01:02:03").to_string(), "01:02:03");
    }

    #[test]
    fn test_fail_soft_defaults() {
        for bad in ["", "   ", "1:2", "aa:bb:cc", "01:02:03:04", "-1:00:00",
            "99999999999999999:00:00", "00:99999999999999999999:00"] {
            assert_eq!(StopwatchTime::parse(bad).to_string(), "00:00:00", "input {:?}", bad);
        }
    }

    #[test]
    fn test_from_hms_rejects_overflow() {
        assert_eq!(StopwatchTime::from_hms(1, 2, 3).map(|t| t.total_secs()), Some(3723));
        assert_eq!(StopwatchTime::from_hms(u64::MAX / 3600 + 1, 0, 0), None);
        assert_eq!(StopwatchTime::from_hms(0, 0, u64::MAX).map(|t| t.total_secs()), Some(u64::MAX));
        assert_eq!(StopwatchTime::from_hms(0, 1, u64::MAX), None);
    }

    #[test]
    fn test_minutes_overflow_normalizes() {
        assert_eq!(StopwatchTime::parse("00:75:00").to_string(), "01:15:00");
    }

    #[test]
    fn test_ordering_by_duration() {
        assert!(StopwatchTime::parse("00:01:00") > StopwatchTime::parse("00:00:59"));
    }

    #[test]
    fn test_timer_update_and_reset() {
        let mut timer = SessionTimer::new(10.0);
        timer.update(73.9);
        assert_eq!(timer.display_text(), "00:01:03");
        assert!(timer.reset_display());
        assert_eq!(timer.display_text(), "00:00:00");
        assert!(!timer.reset_display());
    }

    #[test]
    fn test_clock_going_backwards_reads_zero() {
        let mut timer = SessionTimer::new(10.0);
        timer.update(5.0);
        assert!(timer.displayed().is_zero());
    }

    proptest! {
        #[test]
        fn prop_format_parse_round_trip(h in 0u64..24, m in 0u64..60, s in 0u64..60) {
            let text = format!("{:02}:{:02}:{:02}", h, m, s);
            prop_assert_eq!(StopwatchTime::parse(&text).to_string(), text);
        }
    }
}
