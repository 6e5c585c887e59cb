//! Best survival time
//!
//! One record, persisted under `PreviousBestTime` as `HH:MM:SS`. A round
//! beats it only by lasting strictly longer.

use serde::{Deserialize, Serialize};

use crate::effects::Command;
use crate::platform::SettingsStore;
use crate::settings::keys;
use crate::sim::StopwatchTime;

/// Longest survival so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BestTime {
    pub time: StopwatchTime,
}

impl BestTime {
    pub fn new(time: StopwatchTime) -> Self {
        Self { time }
    }

    /// Load from the store. Missing or malformed values read as zero.
    pub fn load(store: &dyn SettingsStore) -> Self {
        let stored = store.get_setting(keys::PREVIOUS_BEST_TIME).unwrap_or_default();
        let time = StopwatchTime::parse(&stored);
        log::info!("Best time {}", time);
        Self { time }
    }

    /// Whether a finished round sets a new record
    pub fn qualifies(&self, elapsed: StopwatchTime) -> bool {
        elapsed > self.time
    }

    /// Replace the record if `elapsed` beats it. Returns whether it did.
    pub fn submit(&mut self, elapsed: StopwatchTime) -> bool {
        if !self.qualifies(elapsed) {
            return false;
        }
        self.time = elapsed;
        true
    }

    /// Command that writes the record to the settings store
    pub fn persist_command(&self) -> Command {
        Command::Persist {
            key: keys::PREVIOUS_BEST_TIME.to_string(),
            value: self.time.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_missing_record_is_zero() {
        let best = BestTime::load(&MemoryStore::new());
        assert!(best.time.is_zero());
    }

    #[test]
    fn test_malformed_record_is_zero() {
        let store = MemoryStore::new().with(keys::PREVIOUS_BEST_TIME, "yesterday");
        assert!(BestTime::load(&store).time.is_zero());
    }

    #[test]
    fn test_only_longer_rounds_qualify() {
        let mut best = BestTime::new(StopwatchTime::from_secs(42));
        assert!(!best.submit(StopwatchTime::from_secs(42)));
        assert!(!best.submit(StopwatchTime::from_secs(10)));
        assert!(best.submit(StopwatchTime::from_secs(43)));
        assert_eq!(best.time.total_secs(), 43);
    }

    #[test]
    fn test_zero_round_never_qualifies() {
        let best = BestTime::default();
        assert!(!best.qualifies(StopwatchTime::ZERO));
        assert!(best.qualifies(StopwatchTime::from_secs(1)));
    }

    #[test]
    fn test_persist_command_round_trip() {
        let best = BestTime::new(StopwatchTime::from_secs(125));
        let Command::Persist { key, value } = best.persist_command() else {
            panic!("expected a persist command");
        };
        assert_eq!(value, "00:02:05");

        let store = MemoryStore::new().with(&key, &value);
        assert_eq!(BestTime::load(&store).time.total_secs(), 125);
    }

    #[test]
    fn test_overflowing_record_is_zero() {
        let store = MemoryStore::new().with(keys::PREVIOUS_BEST_TIME, "99999999999999999:00:00");
        let best = BestTime::load(&store);
        assert!(best.time.is_zero());
        assert!(best.qualifies(StopwatchTime::from_secs(1)));
    }
}
