//! Scheduler configuration.

use fishwatch_common::EorzeaDuration;
use serde::{Deserialize, Serialize};

use crate::weather::DEFAULT_MATCH_LIMIT;

/// Tuning for the availability scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Catchable windows kept per fish (1-100)
    pub max_windows: usize,
    /// Candidate periods examined per fish per pass
    pub match_limit: usize,
    /// Eorzea days of forecast history kept when pruning
    pub cache_retention_days: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_windows: 10,
            match_limit: DEFAULT_MATCH_LIMIT,
            cache_retention_days: 2,
        }
    }
}

impl SchedulerConfig {
    /// Clamps values to usable ranges.
    pub fn validate(&mut self) {
        self.max_windows = self.max_windows.clamp(1, 100);
        self.match_limit = self.match_limit.clamp(1, 1_000_000);
        self.cache_retention_days = self.cache_retention_days.clamp(1, 30);
    }

    /// Forecast history kept when pruning.
    #[must_use]
    pub fn retention(&self) -> EorzeaDuration {
        EorzeaDuration::from_days(i64::from(self.cache_retention_days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SchedulerConfig::default();
        assert_eq!(config.max_windows, 10);
        assert_eq!(config.match_limit, 10_000);
        assert_eq!(config.retention(), EorzeaDuration::from_days(2));
    }

    #[test]
    fn test_config_validation() {
        let mut config = SchedulerConfig {
            max_windows: 0,
            match_limit: 0,
            cache_retention_days: 500,
        };
        config.validate();
        assert_eq!(config.max_windows, 1);
        assert_eq!(config.match_limit, 1);
        assert_eq!(config.cache_retention_days, 30);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SchedulerConfig = serde_json::from_str(r#"{"max_windows": 5}"#).unwrap();
        assert_eq!(config.max_windows, 5);
        assert_eq!(config.match_limit, DEFAULT_MATCH_LIMIT);
    }
}
