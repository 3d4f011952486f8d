//! Weather forecasting.
//!
//! This module provides:
//! - The deterministic forecast target for any 8-bell period
//! - Per-zone weather-rate tables mapping a target to a weather
//! - An append-only cache of computed targets
//! - A lazy matcher yielding periods that satisfy a weather pattern

use std::collections::{BTreeSet, VecDeque};

use ahash::AHashMap;
use fishwatch_common::{
    EarthInstant, EorzeaDuration, EorzeaInstant, ForecastError, TimeRange, WeatherId, ZoneId,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, trace};

/// Default number of candidate periods a matcher examines.
pub const DEFAULT_MATCH_LIMIT: usize = 10_000;

/// Forecast target (0-99) for the weather period containing `at`.
///
/// Bit-exact with the game's own weather roll; all arithmetic is `u32`
/// wrapping.
#[must_use]
pub fn forecast_target(at: EarthInstant) -> u8 {
    let unix = at.unix_seconds();
    let bell = unix.div_euclid(175);
    // 16:00 -> 0, 00:00 -> 8, 08:00 -> 16
    let increment = (bell + 8 - bell.rem_euclid(8)).rem_euclid(24) as u32;
    let total_days = (unix / 4200) as u32;

    let calc_base = total_days.wrapping_mul(100).wrapping_add(increment);
    let step1 = (calc_base << 11) ^ calc_base;
    let step2 = (step1 >> 8) ^ step1;
    (step2 % 100) as u8
}

/// One 8-bell weather period and its forecast target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeatherPeriod {
    /// Period start, aligned to 0/8/16 bells
    pub start: EorzeaInstant,
    /// Forecast target in `[0, 100)`
    pub target: u8,
}

impl WeatherPeriod {
    /// Exclusive end of the period.
    #[must_use]
    pub fn end(&self) -> EorzeaInstant {
        self.start + EorzeaDuration::PERIOD
    }

    /// The period as a time range.
    #[must_use]
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end())
    }
}

/// Ordered `(weather, threshold)` pairs for one zone.
///
/// A target selects the first weather whose threshold exceeds it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherRates(Vec<(WeatherId, u8)>);

impl WeatherRates {
    /// Wraps a rate list. Call [`validate`](Self::validate) before use.
    #[must_use]
    pub fn new(entries: Vec<(WeatherId, u8)>) -> Self {
        Self(entries)
    }

    /// Checks thresholds are in `1..=100`, non-decreasing and end at 100.
    pub fn validate(&self, zone: ZoneId) -> Result<(), ForecastError> {
        let invalid = |reason: String| ForecastError::InvalidRates { zone, reason };

        let Some(&(_, last)) = self.0.last() else {
            return Err(invalid("empty rate table".to_string()));
        };
        let mut previous = 0u8;
        for &(weather, threshold) in &self.0 {
            if threshold == 0 || threshold > 100 {
                return Err(invalid(format!("threshold {threshold} for {weather} out of range")));
            }
            if threshold < previous {
                return Err(invalid(format!(
                    "threshold {threshold} for {weather} is below previous {previous}"
                )));
            }
            previous = threshold;
        }
        if last != 100 {
            return Err(invalid(format!("last threshold is {last}, expected 100")));
        }
        Ok(())
    }

    /// Weather selected by `target`.
    #[must_use]
    pub fn weather_for(&self, target: u8) -> Option<WeatherId> {
        self.0
            .iter()
            .find(|&&(_, threshold)| threshold > target)
            .map(|&(weather, _)| weather)
    }
}

/// Weather-rate tables by zone.
#[derive(Debug, Clone, Default)]
pub struct ZoneWeatherTable {
    zones: AHashMap<ZoneId, WeatherRates>,
}

impl ZoneWeatherTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a zone's rates after validating them.
    pub fn insert(&mut self, zone: ZoneId, rates: WeatherRates) -> Result<(), ForecastError> {
        rates.validate(zone)?;
        self.zones.insert(zone, rates);
        Ok(())
    }

    /// Rates for a zone.
    pub fn get(&self, zone: ZoneId) -> Result<&WeatherRates, ForecastError> {
        self.zones.get(&zone).ok_or(ForecastError::UnknownZone(zone))
    }

    /// Whether the zone has a table.
    #[must_use]
    pub fn contains(&self, zone: ZoneId) -> bool {
        self.zones.contains_key(&zone)
    }

    /// Number of zones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether no zones are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Weather in `zone` for a forecast `target`.
    pub fn weather_for_zone(&self, zone: ZoneId, target: u8) -> Result<WeatherId, ForecastError> {
        let rates = self.get(zone)?;
        rates.weather_for(target).ok_or_else(|| ForecastError::InvalidRates {
            zone,
            reason: format!("no weather covers target {target}"),
        })
    }
}

/// Append-only cache of forecast targets, keyed by period start.
///
/// Entries are strictly increasing. New entries may only go after the last
/// one; old entries are pruned from the front.
#[derive(Debug, Clone, Default)]
pub struct ForecastCache {
    entries: VecDeque<(EorzeaInstant, u8)>,
}

impl ForecastCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached periods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest cached period start.
    #[must_use]
    pub fn first(&self) -> Option<EorzeaInstant> {
        self.entries.front().map(|&(start, _)| start)
    }

    /// Newest cached period start.
    #[must_use]
    pub fn last(&self) -> Option<EorzeaInstant> {
        self.entries.back().map(|&(start, _)| start)
    }

    /// Time covered from the oldest period start to the newest period end.
    #[must_use]
    pub fn span(&self) -> Option<TimeRange> {
        Some(TimeRange::new(
            self.first()?,
            self.last()? + EorzeaDuration::PERIOD,
        ))
    }

    /// Cached target for a period start.
    #[must_use]
    pub fn get(&self, period_start: EorzeaInstant) -> Option<u8> {
        self.entries
            .binary_search_by_key(&period_start, |&(start, _)| start)
            .ok()
            .and_then(|i| self.entries.get(i))
            .map(|&(_, target)| target)
    }

    /// Iterates cached `(period_start, target)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (EorzeaInstant, u8)> + '_ {
        self.entries.iter().copied()
    }

    /// Appends a forecast. Rejects unaligned periods and anything at or
    /// before the newest entry, leaving the cache unchanged.
    pub fn insert(&mut self, period_start: EorzeaInstant, target: u8) -> Result<(), ForecastError> {
        if !period_start.is_period_aligned() {
            error!("Rejected unaligned forecast insert at {}", period_start);
            return Err(ForecastError::UnalignedPeriod(period_start));
        }
        if let Some(last) = self.last() {
            if period_start <= last {
                error!(
                    "Rejected forecast insert at {} (last cached period {})",
                    period_start, last
                );
                return Err(ForecastError::NonMonotonicInsert { period_start, last });
            }
        }
        self.entries.push_back((period_start, target));
        Ok(())
    }

    /// Target for a period, computing it when missing.
    ///
    /// Periods after the newest entry are appended; periods before the
    /// oldest entry or inside gaps are computed without being stored.
    /// Returns the target and whether it was appended.
    fn resolve(&mut self, period_start: EorzeaInstant) -> (u8, bool) {
        if let Some(target) = self.get(period_start) {
            return (target, false);
        }
        let target = forecast_target(period_start.to_earth());
        let after_last = self.last().map_or(true, |last| period_start > last);
        if after_last {
            self.entries.push_back((period_start, target));
        }
        (target, after_last)
    }

    /// Drops entries starting before `cutoff`. Returns how many were removed.
    pub fn prune_before(&mut self, cutoff: EorzeaInstant) -> usize {
        let keep_from = self.entries.partition_point(|&(start, _)| start < cutoff);
        self.entries.drain(..keep_from).count()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Forecast service: zone tables plus the shared forecast cache.
#[derive(Debug, Clone)]
pub struct WeatherService {
    cache: ForecastCache,
    zones: ZoneWeatherTable,
    retention: EorzeaDuration,
}

impl WeatherService {
    /// Creates a service keeping `retention` of history before the current
    /// period when pruning.
    #[must_use]
    pub fn new(zones: ZoneWeatherTable, retention: EorzeaDuration) -> Self {
        Self {
            cache: ForecastCache::new(),
            zones,
            retention,
        }
    }

    /// The forecast cache.
    #[must_use]
    pub fn cache(&self) -> &ForecastCache {
        &self.cache
    }

    /// The zone tables.
    #[must_use]
    pub fn zones(&self) -> &ZoneWeatherTable {
        &self.zones
    }

    /// How much history `prune` keeps.
    #[must_use]
    pub fn retention(&self) -> EorzeaDuration {
        self.retention
    }

    /// Appends a forecast to the cache.
    pub fn insert_forecast(
        &mut self,
        period_start: EorzeaInstant,
        target: u8,
    ) -> Result<(), ForecastError> {
        self.cache.insert(period_start, target)
    }

    /// Weather in `zone` for a forecast `target`.
    pub fn weather_for_zone(&self, zone: ZoneId, target: u8) -> Result<WeatherId, ForecastError> {
        self.zones.weather_for_zone(zone, target)
    }

    /// Weather in `zone` during the period containing `at`.
    pub fn weather_at(&mut self, zone: ZoneId, at: EorzeaInstant) -> Result<WeatherId, ForecastError> {
        let (target, _) = self.cache.resolve(at.start_of_period());
        self.zones.weather_for_zone(zone, target)
    }

    /// Lazily yields periods from the one containing `start` onwards whose
    /// weather is in `current` and whose preceding period's weather is in
    /// `previous`. Empty sets match anything.
    ///
    /// At most `limit` candidate periods are examined. When `previous` is
    /// non-empty the period before the first candidate is looked up too; it
    /// only supplies the "previous" weather and does not count towards
    /// `limit`.
    pub fn find_matching_periods<'a>(
        &'a mut self,
        start: EorzeaInstant,
        zone: ZoneId,
        previous: &'a BTreeSet<WeatherId>,
        current: &'a BTreeSet<WeatherId>,
        limit: usize,
    ) -> Result<PeriodMatches<'a>, ForecastError> {
        let rates = self.zones.get(zone)?;
        Ok(PeriodMatches::new(
            &mut self.cache,
            rates,
            start,
            previous,
            current,
            limit,
        ))
    }

    /// The next `count` periods from the one containing `start`, with the
    /// weather each brings to `zone`.
    pub fn upcoming_weather(
        &mut self,
        zone: ZoneId,
        start: EorzeaInstant,
        count: usize,
    ) -> Result<Vec<(WeatherPeriod, WeatherId)>, ForecastError> {
        let mut period = start.start_of_period();
        let mut upcoming = Vec::with_capacity(count);
        for _ in 0..count {
            let (target, _) = self.cache.resolve(period);
            let weather = self.zones.weather_for_zone(zone, target)?;
            upcoming.push((WeatherPeriod { start: period, target }, weather));
            period += EorzeaDuration::PERIOD;
        }
        Ok(upcoming)
    }

    /// Drops cached forecasts older than the retention window before the
    /// start of the period containing `now`.
    pub fn prune(&mut self, now: EorzeaInstant) -> usize {
        let cutoff = now.start_of_period() - self.retention;
        let removed = self.cache.prune_before(cutoff);
        match self.cache.span() {
            Some(span) => info!(
                "Forecast cache pruned {} entries: {} cached, covering {}",
                removed,
                self.cache.len(),
                span
            ),
            None => info!("Forecast cache pruned {} entries: cache empty", removed),
        }
        removed
    }

    /// Clears the cache and seeds it with the period before `now`.
    pub fn reset(&mut self, now: EorzeaInstant) {
        self.cache.clear();
        let previous = now.start_of_period() - EorzeaDuration::PERIOD;
        let (target, _) = self.cache.resolve(previous);
        trace!("Seeded forecast cache at {} with target {}", previous, target);
    }
}

/// Lazy sequence of periods matching a weather pattern.
///
/// Created by [`WeatherService::find_matching_periods`]. Forecasts computed
/// past the end of the cache are appended as the iterator advances and stay
/// valid if it is dropped early.
#[derive(Debug)]
pub struct PeriodMatches<'a> {
    cache: &'a mut ForecastCache,
    rates: &'a WeatherRates,
    previous: &'a BTreeSet<WeatherId>,
    current: &'a BTreeSet<WeatherId>,
    next_start: EorzeaInstant,
    previous_weather: Option<WeatherId>,
    remaining: usize,
    examined: usize,
    appended: usize,
}

impl<'a> PeriodMatches<'a> {
    fn new(
        cache: &'a mut ForecastCache,
        rates: &'a WeatherRates,
        start: EorzeaInstant,
        previous: &'a BTreeSet<WeatherId>,
        current: &'a BTreeSet<WeatherId>,
        limit: usize,
    ) -> Self {
        let mut matches = Self {
            cache,
            rates,
            previous,
            current,
            next_start: start.start_of_period(),
            previous_weather: None,
            remaining: limit,
            examined: 0,
            appended: 0,
        };
        if !matches.previous.is_empty() {
            let lookback = matches.next_start - EorzeaDuration::PERIOD;
            matches.previous_weather = matches.weather_of(lookback).1;
        }
        matches
    }

    fn weather_of(&mut self, period_start: EorzeaInstant) -> (u8, Option<WeatherId>) {
        let (target, appended) = self.cache.resolve(period_start);
        if appended {
            self.appended += 1;
        }
        (target, self.rates.weather_for(target))
    }

    /// Candidate periods examined so far.
    #[must_use]
    pub fn examined(&self) -> usize {
        self.examined
    }

    /// Forecasts this iterator added to the cache.
    #[must_use]
    pub fn appended(&self) -> usize {
        self.appended
    }

    /// Start of the next period that would be examined.
    #[must_use]
    pub fn next_start(&self) -> EorzeaInstant {
        self.next_start
    }
}

impl Iterator for PeriodMatches<'_> {
    type Item = WeatherPeriod;

    fn next(&mut self) -> Option<WeatherPeriod> {
        while self.remaining > 0 {
            self.remaining -= 1;
            self.examined += 1;

            let start = self.next_start;
            self.next_start += EorzeaDuration::PERIOD;
            let (target, weather) = self.weather_of(start);
            let previous_weather = std::mem::replace(&mut self.previous_weather, weather);

            let previous_ok = self.previous.is_empty()
                || previous_weather.is_some_and(|w| self.previous.contains(&w));
            let current_ok =
                self.current.is_empty() || weather.is_some_and(|w| self.current.contains(&w));
            if previous_ok && current_ok {
                return Some(WeatherPeriod { start, target });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const P0: i64 = 34_971_408_000_000;

    fn period(n: i64) -> EorzeaInstant {
        EorzeaInstant::from_millis(P0) + EorzeaDuration::from_millis(n * 28_800_000)
    }

    fn set(ids: &[u16]) -> BTreeSet<WeatherId> {
        ids.iter().copied().map(WeatherId::new).collect()
    }

    fn example_rates() -> WeatherRates {
        WeatherRates::new(
            [(3, 20), (1, 50), (2, 80), (4, 90), (7, 100)]
                .into_iter()
                .map(|(w, t)| (WeatherId::new(w), t))
                .collect(),
        )
    }

    fn example_service() -> WeatherService {
        let mut zones = ZoneWeatherTable::new();
        zones.insert(ZoneId::new(1), example_rates()).unwrap();
        WeatherService::new(zones, EorzeaDuration::from_days(2))
    }

    #[test]
    fn test_forecast_reference_vectors() {
        let vectors: [(i64, u8); 11] = [
            (0, 56),
            (1400, 12),
            (2800, 0),
            (4200, 64),
            (1_500_000_000, 52),
            (1_700_000_000, 53),
            (1_700_001_400, 2),
            (1_700_002_800, 42),
            (1_234_567_890, 41),
            (2_000_000_000, 87),
            (4_000_000_000, 35),
        ];
        for (secs, expected) in vectors {
            assert_eq!(
                forecast_target(EarthInstant::from_unix_seconds(secs)),
                expected,
                "target for unix {secs}"
            );
        }
    }

    #[test]
    fn test_forecast_for_period_starts() {
        let expected = [53, 2, 42, 18, 42, 82];
        for (n, &target) in expected.iter().enumerate() {
            let start = period(n as i64);
            assert_eq!(forecast_target(start.to_earth()), target, "period {n}");
        }
    }

    #[test]
    fn test_weather_for_uses_first_exceeding_threshold() {
        let rates = example_rates();
        assert_eq!(rates.weather_for(0), Some(WeatherId::new(3)));
        assert_eq!(rates.weather_for(19), Some(WeatherId::new(3)));
        assert_eq!(rates.weather_for(20), Some(WeatherId::new(1)));
        assert_eq!(rates.weather_for(50), Some(WeatherId::new(2)));
        assert_eq!(rates.weather_for(99), Some(WeatherId::new(7)));
    }

    #[test]
    fn test_rate_validation() {
        let zone = ZoneId::new(9);
        assert!(example_rates().validate(zone).is_ok());
        assert!(WeatherRates::default().validate(zone).is_err());
        let short = WeatherRates::new(vec![(WeatherId::CLOUDS, 60)]);
        assert!(short.validate(zone).is_err());
        let unordered = WeatherRates::new(vec![(WeatherId::CLOUDS, 60), (WeatherId::FOG, 40), (WeatherId::RAIN, 100)]);
        assert!(unordered.validate(zone).is_err());
    }

    #[test]
    fn test_unknown_zone() {
        let service = example_service();
        assert_eq!(
            service.weather_for_zone(ZoneId::new(42), 10),
            Err(ForecastError::UnknownZone(ZoneId::new(42)))
        );
    }

    #[test]
    fn test_cache_rejects_non_monotonic_insert() {
        let mut cache = ForecastCache::new();
        cache.insert(period(1), 10).unwrap();
        assert!(matches!(
            cache.insert(period(1), 20),
            Err(ForecastError::NonMonotonicInsert { .. })
        ));
        assert!(cache.insert(period(0), 20).is_err());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(period(1)), Some(10));
    }

    #[test]
    fn test_cache_rejects_unaligned_insert() {
        let mut cache = ForecastCache::new();
        let unaligned = period(0) + EorzeaDuration::HOUR;
        assert_eq!(
            cache.insert(unaligned, 5),
            Err(ForecastError::UnalignedPeriod(unaligned))
        );
    }

    #[test]
    fn test_worked_example() {
        for previous in [set(&[]), set(&[3])] {
            let mut service = example_service();
            service.insert_forecast(period(0), 10).unwrap();
            service.insert_forecast(period(1), 50).unwrap();
            service.insert_forecast(period(2), 90).unwrap();

            let current = set(&[2]);
            let mut matches = service
                .find_matching_periods(period(0), ZoneId::new(1), &previous, &current, 3)
                .unwrap();
            let found: Vec<_> = matches.by_ref().map(|p| p.start).collect();
            assert_eq!(found, vec![period(1)], "previous set {previous:?}");
            assert_eq!(matches.examined(), 3);
            assert_eq!(matches.appended(), 0);
        }
    }

    #[test]
    fn test_matcher_appends_after_cache_end() {
        let mut service = example_service();
        service.insert_forecast(period(0), 10).unwrap();
        let any = set(&[]);
        let found: Vec<_> = {
            let mut matches = service
                .find_matching_periods(period(0), ZoneId::new(1), &any, &any, 4)
                .unwrap();
            let found: Vec<_> = matches.by_ref().collect();
            assert_eq!(matches.appended(), 3);
            assert_eq!(matches.next_start(), period(4));
            found
        };

        assert_eq!(found.len(), 4);
        assert_eq!(found[0].target, 10, "cached target wins over computed");
        assert_eq!(service.cache().len(), 4);
        assert_eq!(service.cache().last(), Some(period(3)));
    }

    #[test]
    fn test_matcher_does_not_insert_before_first_entry() {
        let mut service = example_service();
        service.insert_forecast(period(5), 10).unwrap();
        let any = set(&[]);
        let count = service
            .find_matching_periods(period(0), ZoneId::new(1), &any, &any, 3)
            .unwrap()
            .count();

        assert_eq!(count, 3);
        assert_eq!(service.cache().len(), 1);
        assert_eq!(service.cache().first(), Some(period(5)));
    }

    #[test]
    fn test_mid_period_start_includes_containing_period() {
        let mut service = example_service();
        let any = set(&[]);
        let first = service
            .find_matching_periods(period(2) + EorzeaDuration::HOUR, ZoneId::new(1), &any, &any, 1)
            .unwrap()
            .next()
            .unwrap();
        assert_eq!(first.start, period(2));
        assert_eq!(first.target, 42);
    }

    #[test]
    fn test_lookback_not_counted_against_limit() {
        let mut service = example_service();
        // Period 1 has target 2 (weather 3), period 2 has target 42 (weather 1).
        let previous = set(&[3]);
        let current = set(&[1]);
        let found: Vec<_> = service
            .find_matching_periods(period(2), ZoneId::new(1), &previous, &current, 1)
            .unwrap()
            .collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].start, period(2));
    }

    #[test]
    fn test_limit_bounds_fruitless_search() {
        let mut service = example_service();
        let any = set(&[]);
        let never = set(&[999]);
        let mut matches = service
            .find_matching_periods(period(0), ZoneId::new(1), &any, &never, 25)
            .unwrap();
        assert!(matches.next().is_none());
        assert_eq!(matches.examined(), 25);
    }

    #[test]
    fn test_prune_keeps_retention_window() {
        let mut service = example_service();
        let any = set(&[]);
        let _ = service
            .find_matching_periods(period(0), ZoneId::new(1), &any, &any, 20)
            .unwrap()
            .count();
        assert_eq!(service.cache().len(), 20);

        // Two days (six periods) before period 12 is period 6.
        let removed = service.prune(period(12) + EorzeaDuration::HOUR);
        assert_eq!(removed, 6);
        assert_eq!(service.cache().first(), Some(period(6)));
    }

    #[test]
    fn test_reset_seeds_previous_period() {
        let mut service = example_service();
        service.insert_forecast(period(10), 1).unwrap();
        service.reset(period(3) + EorzeaDuration::HOUR);
        assert_eq!(service.cache().len(), 1);
        assert_eq!(service.cache().first(), Some(period(2)));
        assert_eq!(service.cache().get(period(2)), Some(42));
    }

    #[test]
    fn test_upcoming_weather() {
        let mut service = example_service();
        let upcoming = service.upcoming_weather(ZoneId::new(1), period(0), 3).unwrap();
        let weathers: Vec<_> = upcoming.iter().map(|(_, w)| w.raw()).collect();
        // Targets 53, 2, 42.
        assert_eq!(weathers, vec![2, 3, 1]);
    }

    proptest! {
        #[test]
        fn prop_target_in_range(secs in 0i64..5_000_000_000i64) {
            prop_assert!(forecast_target(EarthInstant::from_unix_seconds(secs)) < 100);
        }

        #[test]
        fn prop_target_constant_within_period(n in 0i64..3_000_000i64, offset in 0i64..1400) {
            let start = EarthInstant::from_unix_seconds(n * 1400);
            let inside = EarthInstant::from_unix_seconds(n * 1400 + offset);
            prop_assert_eq!(forecast_target(start), forecast_target(inside));
        }

        #[test]
        fn prop_cache_stays_strictly_increasing(starts in proptest::collection::vec(0i64..40, 1..30)) {
            let mut service = example_service();
            let any = BTreeSet::new();
            for n in starts {
                let _ = service
                    .find_matching_periods(period(n), ZoneId::new(1), &any, &any, 3)
                    .unwrap()
                    .count();
            }
            let cached: Vec<_> = service.cache().iter().map(|(s, _)| s).collect();
            prop_assert!(cached.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
