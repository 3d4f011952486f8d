//! Per-fish window scheduling.
//!
//! Each pass tops a fish's list of catchable windows back up to
//! `max_windows`:
//! - expired windows are dropped from the front
//! - windows withheld by an earlier pass are restored
//! - matching weather periods are pulled from the forecast service and
//!   intersected with the fish's daily hours and its predators' windows
//! - a window reaching the end of its weather period is continued into the
//!   following period when that one matches too
//!
//! Anything beyond `max_windows` is withheld until the next pass.

use fishwatch_common::{
    merge_into, EorzeaDuration, EorzeaInstant, FishwatchResult, TimeRange,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::catalog::Catalog;
use crate::config::SchedulerConfig;
use crate::fish::Fish;
use crate::weather::{WeatherPeriod, WeatherService};

/// Upper bound on periods peeked to finish the last window. A daily window
/// is at most 24 bells, so it can touch at most four periods.
const MAX_CONTINUATION_PERIODS: usize = 4;

/// Scheduler-owned availability state of one fish.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FishSchedule {
    catchable_ranges: Vec<TimeRange>,
    incomplete_ranges: Vec<TimeRange>,
}

impl FishSchedule {
    /// Creates an empty schedule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Upcoming windows, earliest first.
    #[must_use]
    pub fn catchable_ranges(&self) -> &[TimeRange] {
        &self.catchable_ranges
    }

    /// Windows computed past `max_windows`, restored on a later pass.
    #[must_use]
    pub fn incomplete_ranges(&self) -> &[TimeRange] {
        &self.incomplete_ranges
    }

    /// Forgets every window.
    pub fn clear(&mut self) {
        self.catchable_ranges.clear();
        self.incomplete_ranges.clear();
    }

    /// Whether the first window has started.
    #[must_use]
    pub fn is_catchable(&self, now: EorzeaInstant) -> bool {
        self.catchable_ranges.first().is_some_and(|r| r.start <= now)
    }

    /// The window containing `now`, or the next one.
    #[must_use]
    pub fn next_window(&self, now: EorzeaInstant) -> Option<TimeRange> {
        self.catchable_ranges.iter().copied().find(|r| r.end > now)
    }

    /// Fraction of time catchable between the first window's start and the
    /// last window's end. `1.0` with no windows.
    #[must_use]
    pub fn uptime(&self) -> f64 {
        let (Some(first), Some(last)) = (self.catchable_ranges.first(), self.catchable_ranges.last())
        else {
            return 1.0;
        };
        let span = (last.end - first.start).as_millis();
        if span <= 0 {
            return 1.0;
        }
        let covered: i64 = self
            .catchable_ranges
            .iter()
            .map(|r| r.duration().as_millis())
            .sum();
        covered as f64 / span as f64
    }

    fn expire(&mut self, now: EorzeaInstant) -> bool {
        let before = self.catchable_ranges.len();
        self.catchable_ranges.retain(|r| r.end > now);
        self.incomplete_ranges.retain(|r| r.end > now);
        self.catchable_ranges.len() != before
    }

    fn stash_overflow(&mut self, max_windows: usize) {
        if self.catchable_ranges.len() > max_windows {
            let mut tail = self.catchable_ranges.split_off(max_windows);
            tail.append(&mut self.incomplete_ranges);
            self.incomplete_ranges = tail;
        }
    }
}

/// One scheduling pass at a fixed "now".
pub struct Scheduler<'a> {
    catalog: &'a Catalog,
    weather: &'a mut WeatherService,
    config: &'a SchedulerConfig,
    fish_eyes: bool,
    now: EorzeaInstant,
}

impl<'a> Scheduler<'a> {
    /// Creates a pass over `catalog` at `now`.
    pub fn new(
        catalog: &'a Catalog,
        weather: &'a mut WeatherService,
        config: &'a SchedulerConfig,
        fish_eyes: bool,
        now: EorzeaInstant,
    ) -> Self {
        Self {
            catalog,
            weather,
            config,
            fish_eyes,
            now,
        }
    }

    /// Brings one fish's schedule up to date. Returns whether it changed.
    ///
    /// On error the windows committed so far are kept.
    pub fn update(&mut self, fish: &Fish, schedule: &mut FishSchedule) -> FishwatchResult<bool> {
        let mut changed = schedule.expire(self.now);

        if self.catalog.is_always_available(fish.id, self.fish_eyes) {
            trace!("{} {} is always available", fish.id, fish.name);
            return Ok(changed);
        }

        let max_windows = self.config.max_windows;
        let result = self.fill(fish, schedule, max_windows);
        schedule.stash_overflow(max_windows);

        changed |= result?;
        if changed {
            debug!(
                "{} {} now has {} windows ({} withheld)",
                fish.id,
                fish.name,
                schedule.catchable_ranges.len(),
                schedule.incomplete_ranges.len()
            );
        }
        Ok(changed)
    }

    fn fill(
        &mut self,
        fish: &Fish,
        schedule: &mut FishSchedule,
        max_windows: usize,
    ) -> FishwatchResult<bool> {
        let mut changed = false;

        if schedule.catchable_ranges.len() < max_windows && !schedule.incomplete_ranges.is_empty() {
            for range in std::mem::take(&mut schedule.incomplete_ranges) {
                merge_into(&mut schedule.catchable_ranges, range)?;
            }
            changed = true;
        }

        changed |= self.expand(fish, schedule, max_windows)?;
        changed |= self.continue_last(fish, schedule, max_windows)?;
        Ok(changed)
    }

    /// Where to resume searching: the end of the last window, moved up to the
    /// next period boundary when it falls mid-period.
    fn resume_point(&self, schedule: &FishSchedule) -> EorzeaInstant {
        match schedule.catchable_ranges.last() {
            Some(last) if last.end.is_period_aligned() => last.end,
            Some(last) => last.end.start_of_period() + EorzeaDuration::PERIOD,
            None => self.now,
        }
    }

    fn expand(
        &mut self,
        fish: &Fish,
        schedule: &mut FishSchedule,
        max_windows: usize,
    ) -> FishwatchResult<bool> {
        let mut changed = false;
        let mut cursor = self.resume_point(schedule);
        let mut budget = self.config.match_limit;

        while schedule.catchable_ranges.len() < max_windows {
            let (period, examined) = {
                let mut matches = self.weather.find_matching_periods(
                    cursor,
                    fish.zone,
                    &fish.previous_weather_set,
                    &fish.weather_set,
                    budget,
                )?;
                let period = matches.next();
                (period, matches.examined())
            };
            budget = budget.saturating_sub(examined);

            let Some(period) = period else {
                warn!(
                    "Stopped early for {} {}: {} of {} windows after {} periods",
                    fish.id,
                    fish.name,
                    schedule.catchable_ranges.len(),
                    max_windows,
                    self.config.match_limit
                );
                break;
            };
            cursor = period.end();
            changed |= self.consider(fish, schedule, period)?;
        }
        Ok(changed)
    }

    /// Extends the last window into following periods while the fish's daily
    /// window carries on past it. Stops once a window beyond `max_windows`
    /// has been started; that one is finished after it is restored.
    fn continue_last(
        &mut self,
        fish: &Fish,
        schedule: &mut FishSchedule,
        max_windows: usize,
    ) -> FishwatchResult<bool> {
        let mut changed = false;
        for _ in 0..MAX_CONTINUATION_PERIODS {
            if schedule.catchable_ranges.len() > max_windows {
                break;
            }
            let Some(&last) = schedule.catchable_ranges.last() else {
                break;
            };
            if !self.may_continue(fish, last) {
                break;
            }
            let period = self
                .weather
                .find_matching_periods(
                    last.end,
                    fish.zone,
                    &fish.previous_weather_set,
                    &fish.weather_set,
                    1,
                )?
                .next();
            let Some(period) = period else {
                break;
            };
            if !self.consider(fish, schedule, period)? {
                break;
            }
            changed = true;
        }
        Ok(changed)
    }

    /// Whether `last` ends on a period boundary inside one of the fish's
    /// daily windows.
    fn may_continue(&self, fish: &Fish, last: TimeRange) -> bool {
        if !last.end.is_period_aligned() {
            return false;
        }
        let last_instant = last.end - EorzeaDuration::from_millis(1);
        fish.intrinsic_ranges(TimeRange::period_containing(last_instant), self.fish_eyes)
            .iter()
            .any(|r| r.contains(last_instant) && r.end > last.end)
    }

    /// Adds the parts of `period` during which the fish is up. Returns
    /// whether anything was added.
    fn consider(
        &mut self,
        fish: &Fish,
        schedule: &mut FishSchedule,
        period: WeatherPeriod,
    ) -> FishwatchResult<bool> {
        let window = period.range();
        let mut added = false;
        for intrinsic in fish.intrinsic_ranges(window, self.fish_eyes) {
            let Some(clipped) = intrinsic.intersection(&window) else {
                continue;
            };
            if clipped.end <= self.now {
                continue;
            }
            let Some(accepted) = self.gate_predators(fish, intrinsic, window)? else {
                trace!("{} {}: predators not up during {}", fish.id, fish.name, clipped);
                continue;
            };
            let Some(piece) = accepted.intersection(&window) else {
                continue;
            };
            if piece.end <= self.now {
                continue;
            }
            merge_into(&mut schedule.catchable_ranges, piece)?;
            added = true;
        }
        Ok(added)
    }

    /// Narrows `candidate` to when every predator (plus intuition) allows it.
    /// `None` rejects the candidate.
    fn gate_predators(
        &mut self,
        fish: &Fish,
        candidate: TimeRange,
        window: TimeRange,
    ) -> FishwatchResult<Option<TimeRange>> {
        if fish.predators.is_empty() {
            return Ok(Some(candidate));
        }
        let catalog = self.catalog;
        let intuition = fish.intuition().unwrap_or(EorzeaDuration::ZERO);

        let mut accepted: Option<TimeRange> = None;
        let mut always_up = 0usize;
        for predator in &fish.predators {
            if catalog.is_always_available(predator.fish, self.fish_eyes) {
                always_up += 1;
                continue;
            }
            let Some(predator_fish) = catalog.get(predator.fish) else {
                return Ok(None);
            };
            let Some(range) = self.predator_window(predator_fish, candidate, intuition)? else {
                return Ok(None);
            };
            accepted = match accepted {
                None => Some(range),
                Some(current) => {
                    if let Some(overlap) = current.intersection(&range) {
                        Some(overlap)
                    } else if current.abuts_end(&range) {
                        // Predators are listed in the order they are caught.
                        Some(range)
                    } else {
                        return Ok(None);
                    }
                }
            };
        }

        let Some(mut accepted) = accepted else {
            return Ok(Some(candidate));
        };
        if always_up == 1 && fish.predators.len() > 1 {
            accepted.end = accepted.end.max(window.end);
        }
        Ok(candidate.intersection(&accepted.extend_end(intuition)))
    }

    /// A predator window usable for `candidate`, trying the candidate's
    /// start, the start minus the intuition length, then the previous period.
    fn predator_window(
        &mut self,
        predator: &Fish,
        candidate: TimeRange,
        intuition: EorzeaDuration,
    ) -> FishwatchResult<Option<TimeRange>> {
        let mut lookups = vec![candidate.start];
        if !intuition.is_empty() {
            lookups.push(candidate.start - intuition);
        }
        lookups.push(candidate.start.start_of_period() - EorzeaDuration::PERIOD);

        for from in lookups {
            let period = self
                .weather
                .find_matching_periods(
                    from,
                    predator.zone,
                    &predator.previous_weather_set,
                    &predator.weather_set,
                    1,
                )?
                .next();
            let Some(period) = period else {
                continue;
            };
            let window = period.range();
            let range = predator.available_range_during(window, self.fish_eyes);
            if !window.overlaps(&range) || range.end <= self.now {
                continue;
            }
            if range.extend_end(intuition).overlaps(&candidate) {
                return Ok(Some(range));
            }
        }
        Ok(None)
    }
}
