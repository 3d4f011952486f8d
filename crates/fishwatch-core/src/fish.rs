//! Fish definitions and daily availability.

use std::collections::BTreeSet;

use fishwatch_common::{
    EorzeaDuration, EorzeaInstant, FishId, TimeRange, WeatherId, ZoneId,
};
use serde::{Deserialize, Serialize};

/// How a fish reacts to the Fish Eyes mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FishEyes {
    /// Daily hours always apply.
    #[default]
    Unaffected,
    /// Daily hours are ignored while Fish Eyes is on.
    Affected,
    /// Affected, and the buff must be used within this many Earth seconds.
    Timed(u32),
}

impl FishEyes {
    /// Whether Fish Eyes lifts the daily-hours restriction.
    #[must_use]
    pub fn ignores_hours(self) -> bool {
        !matches!(self, Self::Unaffected)
    }
}

/// A predator that must be caught before the fish bites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Predator {
    /// The predator fish
    pub fish: FishId,
    /// How many must be caught
    pub count: u32,
}

/// Availability conditions that can be replaced at runtime.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FishConditions {
    /// Start of the daily window (Eorzea hours)
    pub start_hour: f32,
    /// End of the daily window (Eorzea hours, wraps when below `start_hour`)
    pub end_hour: f32,
    /// Accepted weathers (empty = any)
    pub weather_set: BTreeSet<WeatherId>,
    /// Accepted weathers for the preceding period (empty = any)
    pub previous_weather_set: BTreeSet<WeatherId>,
}

/// A catchable fish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fish {
    /// Catalog id
    pub id: FishId,
    /// Display name
    pub name: String,
    /// Zone whose weather governs the fish
    pub zone: ZoneId,
    /// Start of the daily window (Eorzea hours)
    #[serde(default)]
    pub start_hour: f32,
    /// End of the daily window (Eorzea hours)
    #[serde(default = "default_end_hour")]
    pub end_hour: f32,
    /// Accepted weathers (empty = any)
    #[serde(default)]
    pub weather_set: BTreeSet<WeatherId>,
    /// Accepted weathers for the preceding period (empty = any)
    #[serde(default)]
    pub previous_weather_set: BTreeSet<WeatherId>,
    /// Fish that must be caught first, in order
    #[serde(default)]
    pub predators: Vec<Predator>,
    /// Fisher's Intuition duration in Earth seconds
    #[serde(default)]
    pub intuition_length: Option<u32>,
    /// Fish Eyes behaviour
    #[serde(default)]
    pub fish_eyes: FishEyes,
}

const fn default_end_hour() -> f32 {
    24.0
}

impl Fish {
    /// Creates an unrestricted fish (all day, any weather, no predators).
    #[must_use]
    pub fn new(id: FishId, name: impl Into<String>, zone: ZoneId) -> Self {
        Self {
            id,
            name: name.into(),
            zone,
            start_hour: 0.0,
            end_hour: 24.0,
            weather_set: BTreeSet::new(),
            previous_weather_set: BTreeSet::new(),
            predators: Vec::new(),
            intuition_length: None,
            fish_eyes: FishEyes::Unaffected,
        }
    }

    /// Sets the daily window.
    #[must_use]
    pub fn with_hours(mut self, start_hour: f32, end_hour: f32) -> Self {
        self.start_hour = start_hour;
        self.end_hour = end_hour;
        self
    }

    /// Sets the accepted weathers.
    #[must_use]
    pub fn with_weather(mut self, weathers: impl IntoIterator<Item = WeatherId>) -> Self {
        self.weather_set = weathers.into_iter().collect();
        self
    }

    /// Sets the accepted weathers for the preceding period.
    #[must_use]
    pub fn with_previous_weather(mut self, weathers: impl IntoIterator<Item = WeatherId>) -> Self {
        self.previous_weather_set = weathers.into_iter().collect();
        self
    }

    /// Adds a predator requirement.
    #[must_use]
    pub fn with_predator(mut self, fish: FishId, count: u32) -> Self {
        self.predators.push(Predator { fish, count });
        self
    }

    /// Sets the intuition buff length in Earth seconds.
    #[must_use]
    pub fn with_intuition(mut self, seconds: u32) -> Self {
        self.intuition_length = Some(seconds);
        self
    }

    /// Sets the Fish Eyes behaviour.
    #[must_use]
    pub fn with_fish_eyes(mut self, fish_eyes: FishEyes) -> Self {
        self.fish_eyes = fish_eyes;
        self
    }

    /// Current replaceable conditions.
    #[must_use]
    pub fn conditions(&self) -> FishConditions {
        FishConditions {
            start_hour: self.start_hour,
            end_hour: self.end_hour,
            weather_set: self.weather_set.clone(),
            previous_weather_set: self.previous_weather_set.clone(),
        }
    }

    /// Replaces hours and weather requirements.
    pub fn apply_conditions(&mut self, conditions: FishConditions) {
        self.start_hour = conditions.start_hour;
        self.end_hour = conditions.end_hour;
        self.weather_set = conditions.weather_set;
        self.previous_weather_set = conditions.previous_weather_set;
    }

    /// Whether the window wraps past midnight.
    #[must_use]
    pub fn wraps_midnight(&self) -> bool {
        self.end_hour < self.start_hour
    }

    /// Whether the daily window covers the whole day, taking Fish Eyes into
    /// account.
    #[must_use]
    pub fn is_all_day(&self, fish_eyes: bool) -> bool {
        (self.start_hour <= 0.0 && self.end_hour >= 24.0)
            || (fish_eyes && self.fish_eyes.ignores_hours())
    }

    /// Available all day in any weather. Predators are not considered here;
    /// see [`Catalog::is_always_available`](crate::catalog::Catalog::is_always_available).
    #[must_use]
    pub fn is_unrestricted(&self, fish_eyes: bool) -> bool {
        self.weather_set.is_empty()
            && self.previous_weather_set.is_empty()
            && self.is_all_day(fish_eyes)
    }

    /// Length of the daily window.
    #[must_use]
    pub fn daily_duration(&self) -> EorzeaDuration {
        let diff = f64::from((self.end_hour - self.start_hour).abs());
        let hours = if self.wraps_midnight() { 24.0 - diff } else { diff };
        EorzeaDuration::from_hours(hours)
    }

    /// Intuition buff length on the Eorzea clock.
    #[must_use]
    pub fn intuition(&self) -> Option<EorzeaDuration> {
        self.intuition_length.map(EorzeaDuration::from_earth_seconds)
    }

    fn window_on_day(&self, midnight: EorzeaInstant) -> TimeRange {
        let start = midnight + EorzeaDuration::from_hours(f64::from(self.start_hour));
        TimeRange::starting_at(start, self.daily_duration())
    }

    /// The daily window current at, or next after, the start of `period`.
    ///
    /// The returned range is not clipped and may start before or end after
    /// `period`.
    #[must_use]
    pub fn available_range_during(&self, period: TimeRange, fish_eyes: bool) -> TimeRange {
        if self.is_all_day(fish_eyes) {
            return period;
        }
        let midnight = period.start.start_of_day();
        let hour = period.start.hours_into_day();
        let end_hour = f64::from(self.end_hour);
        if self.wraps_midnight() {
            if hour < end_hour {
                // Started yesterday.
                self.window_on_day(midnight - EorzeaDuration::DAY)
            } else {
                self.window_on_day(midnight)
            }
        } else if hour < end_hour {
            self.window_on_day(midnight)
        } else {
            self.window_on_day(midnight + EorzeaDuration::DAY)
        }
    }

    /// Daily windows touching `period`, earliest first.
    ///
    /// A wrap-around fish yields two when the period starts inside
    /// yesterday's window and also reaches today's start hour. The ranges
    /// are unclipped and may not overlap `period`.
    #[must_use]
    pub fn intrinsic_ranges(&self, period: TimeRange, fish_eyes: bool) -> Vec<TimeRange> {
        let primary = self.available_range_during(period, fish_eyes);
        let mut ranges = vec![primary];
        if self.wraps_midnight() && !self.is_all_day(fish_eyes) {
            let today = self.window_on_day(period.start.start_of_day());
            if today.start > primary.start && today.overlaps(&period) {
                ranges.push(today);
            }
        }
        ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period_at(day: i64, hour: i64) -> TimeRange {
        TimeRange::starting_at(EorzeaInstant::from_day_hour(day, hour), EorzeaDuration::PERIOD)
    }

    fn fish(start: f32, end: f32) -> Fish {
        Fish::new(FishId::new(1), "Test", ZoneId::new(1)).with_hours(start, end)
    }

    #[test]
    fn test_daily_duration() {
        assert_eq!(fish(4.0, 8.0).daily_duration(), EorzeaDuration::from_hours(4.0));
        assert_eq!(fish(22.0, 4.0).daily_duration(), EorzeaDuration::from_hours(6.0));
        assert_eq!(fish(17.5, 20.0).daily_duration(), EorzeaDuration::from_hours(2.5));
    }

    #[test]
    fn test_all_day_returns_period() {
        let period = period_at(3, 8);
        assert_eq!(fish(0.0, 24.0).available_range_during(period, false), period);
    }

    #[test]
    fn test_same_day_window() {
        let f = fish(10.0, 14.0);
        let range = f.available_range_during(period_at(3, 8), false);
        assert_eq!(range.start, EorzeaInstant::from_day_hour(3, 10));
        assert_eq!(range.end, EorzeaInstant::from_day_hour(3, 14));

        // Past today's end hour: tomorrow's window.
        let range = f.available_range_during(period_at(3, 16), false);
        assert_eq!(range.start, EorzeaInstant::from_day_hour(4, 10));
    }

    #[test]
    fn test_wrap_window_started_yesterday() {
        let f = fish(22.0, 4.0);
        let range = f.available_range_during(period_at(5, 0), false);
        assert_eq!(range.start, EorzeaInstant::from_day_hour(4, 22));
        assert_eq!(range.end, EorzeaInstant::from_day_hour(5, 4));

        let range = f.available_range_during(period_at(5, 16), false);
        assert_eq!(range.start, EorzeaInstant::from_day_hour(5, 22));
        assert_eq!(range.end, EorzeaInstant::from_day_hour(6, 4));
    }

    #[test]
    fn test_wrap_window_overnight_from_midnight() {
        let f = fish(22.0, 2.0);
        let period = period_at(10, 0);
        assert_eq!(
            f.available_range_during(period, false),
            TimeRange::new(EorzeaInstant::from_day_hour(9, 22), EorzeaInstant::from_day_hour(10, 2))
        );
        assert_eq!(f.intrinsic_ranges(period, false).len(), 1);
    }

    #[test]
    fn test_wrap_window_splits_period() {
        // 06:00-02:00 covers 00:00-02:00 (from yesterday) and 06:00-08:00.
        let f = fish(6.0, 2.0);
        let period = period_at(5, 0);
        let ranges = f.intrinsic_ranges(period, false);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].intersection(&period), Some(TimeRange::new(
            EorzeaInstant::from_day_hour(5, 0),
            EorzeaInstant::from_day_hour(5, 2),
        )));
        assert_eq!(ranges[1].intersection(&period), Some(TimeRange::new(
            EorzeaInstant::from_day_hour(5, 6),
            EorzeaInstant::from_day_hour(5, 8),
        )));
    }

    #[test]
    fn test_wrap_window_single_range_when_today_starts_later() {
        let ranges = fish(22.0, 4.0).intrinsic_ranges(period_at(5, 0), false);
        assert_eq!(ranges.len(), 1);
    }

    #[test]
    fn test_fish_eyes_ignores_hours() {
        let f = fish(10.0, 12.0).with_fish_eyes(FishEyes::Timed(60));
        let period = period_at(2, 16);
        assert_eq!(f.available_range_during(period, true), period);
        assert_ne!(f.available_range_during(period, false), period);

        let stubborn = fish(10.0, 12.0);
        assert!(!stubborn.is_all_day(true));
    }

    #[test]
    fn test_unrestricted() {
        assert!(fish(0.0, 24.0).is_unrestricted(false));
        assert!(!fish(0.0, 24.0).with_weather([WeatherId::FOG]).is_unrestricted(false));
        assert!(!fish(1.0, 24.0).is_unrestricted(false));
    }

    #[test]
    fn test_intuition_converts_earth_seconds() {
        let f = fish(0.0, 24.0).with_intuition(350);
        assert_eq!(f.intuition(), Some(EorzeaDuration::from_hours(2.0)));
    }

    #[test]
    fn test_conditions_roundtrip() {
        let mut f = fish(1.0, 3.0).with_weather([WeatherId::RAIN]);
        let mut conditions = f.conditions();
        conditions.end_hour = 5.0;
        conditions.weather_set.insert(WeatherId::SHOWERS);
        f.apply_conditions(conditions);
        assert_eq!(f.end_hour, 5.0);
        assert_eq!(f.weather_set.len(), 2);
    }

    #[test]
    fn test_deserialize_defaults() {
        let f: Fish = serde_json::from_str(r#"{"id": 7, "name": "Carp", "zone": 2}"#).unwrap();
        assert!(f.is_unrestricted(false));
        assert_eq!(f.fish_eyes, FishEyes::Unaffected);

        let f: Fish = serde_json::from_str(
            r#"{"id": 8, "name": "Pike", "zone": 2, "fish_eyes": {"timed": 45}}"#,
        )
        .unwrap();
        assert_eq!(f.fish_eyes, FishEyes::Timed(45));
    }
}
