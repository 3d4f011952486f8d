//! The owning availability engine.
//!
//! [`AvailabilityEngine`] holds the catalog, the weather service and one
//! [`FishSchedule`] per fish. Hosts drive it from clock events via
//! [`AvailabilityEngine::on_bell`] and read results back through the query
//! methods.

use std::collections::BTreeMap;

use fishwatch_common::{EorzeaInstant, FishId, FishwatchError, FishwatchResult, TimeRange};
use tracing::{debug, error, info};

use crate::catalog::Catalog;
use crate::clock::ClockEvent;
use crate::config::SchedulerConfig;
use crate::fish::FishConditions;
use crate::scheduler::{FishSchedule, Scheduler};
use crate::weather::WeatherService;

/// Catalog, forecasts and schedules for every fish.
#[derive(Debug)]
pub struct AvailabilityEngine {
    catalog: Catalog,
    weather: WeatherService,
    schedules: BTreeMap<FishId, FishSchedule>,
    config: SchedulerConfig,
    fish_eyes: bool,
    last_bell: Option<u8>,
}

impl AvailabilityEngine {
    /// Creates an engine over `catalog`. The config is clamped to its valid
    /// ranges first.
    pub fn new(catalog: Catalog, mut config: SchedulerConfig) -> Self {
        config.validate();
        let weather = WeatherService::new(catalog.zones().clone(), config.retention());
        let schedules = catalog.ids().map(|id| (id, FishSchedule::new())).collect();
        Self {
            catalog,
            weather,
            schedules,
            config,
            fish_eyes: false,
            last_bell: None,
        }
    }

    /// Handles a bell change. Prunes old forecasts when a weather period
    /// starts, then runs a pass. Returns `false` if this bell was already
    /// handled.
    pub fn on_bell(&mut self, event: ClockEvent, now: EorzeaInstant) -> bool {
        let bell = event.bell();
        if self.last_bell == Some(bell) {
            return false;
        }
        self.last_bell = Some(bell);
        info!("{}", event.description());

        if event.is_period_boundary() {
            self.weather.prune(now);
        }
        self.run_pass(now);
        true
    }

    /// Updates every fish in id order. Returns how many schedules changed.
    ///
    /// A failing fish is logged and skipped; it is retried on the next pass.
    pub fn run_pass(&mut self, now: EorzeaInstant) -> usize {
        let ids: Vec<FishId> = self.catalog.ids().collect();
        let mut changed = 0;
        for id in ids {
            match self.update_fish(id, now) {
                Ok(true) => changed += 1,
                Ok(false) => {}
                Err(e) => error!("Failed to update {}: {}", id, e),
            }
        }
        debug!("Pass at {} changed {} schedules", now, changed);
        changed
    }

    /// Runs the scheduler for one fish.
    pub fn update_fish(&mut self, id: FishId, now: EorzeaInstant) -> FishwatchResult<bool> {
        let fish = self.catalog.get(id).ok_or(FishwatchError::UnknownFish(id))?;
        let schedule = self.schedules.entry(id).or_default();
        Scheduler::new(&self.catalog, &mut self.weather, &self.config, self.fish_eyes, now)
            .update(fish, schedule)
    }

    /// Switches Fish Eyes on or off and rebuilds every schedule.
    pub fn set_fish_eyes(&mut self, enabled: bool, now: EorzeaInstant) {
        if self.fish_eyes == enabled {
            return;
        }
        info!("Fish Eyes {}", if enabled { "enabled" } else { "disabled" });
        self.fish_eyes = enabled;
        for schedule in self.schedules.values_mut() {
            schedule.clear();
        }
        self.run_pass(now);
    }

    /// Clears one fish's schedule and rebuilds it.
    pub fn reinit_fish(&mut self, id: FishId, now: EorzeaInstant) -> FishwatchResult<bool> {
        if let Some(schedule) = self.schedules.get_mut(&id) {
            schedule.clear();
        }
        self.update_fish(id, now)
    }

    /// Replaces a fish's hours and weather, then rebuilds its schedule.
    pub fn set_fish_conditions(
        &mut self,
        id: FishId,
        conditions: FishConditions,
        now: EorzeaInstant,
    ) -> FishwatchResult<bool> {
        self.catalog.set_conditions(id, conditions)?;
        self.reinit_fish(id, now)
    }

    /// Drops all forecasts and schedules, e.g. after time travel.
    pub fn reset(&mut self, now: EorzeaInstant) {
        info!("Resetting availability at {}", now);
        self.weather.reset(now);
        for schedule in self.schedules.values_mut() {
            schedule.clear();
        }
        self.last_bell = None;
    }

    /// Whether the fish can be caught at `now`.
    #[must_use]
    pub fn is_catchable(&self, id: FishId, now: EorzeaInstant) -> bool {
        self.is_always_available(id)
            || self.schedules.get(&id).is_some_and(|s| s.is_catchable(now))
    }

    /// Whether the fish is up all day in any weather.
    #[must_use]
    pub fn is_always_available(&self, id: FishId) -> bool {
        self.catalog.is_always_available(id, self.fish_eyes)
    }

    /// See [`FishSchedule::uptime`].
    #[must_use]
    pub fn uptime(&self, id: FishId) -> f64 {
        self.schedules.get(&id).map_or(1.0, FishSchedule::uptime)
    }

    /// The window containing `now`, or the next one.
    #[must_use]
    pub fn next_window(&self, id: FishId, now: EorzeaInstant) -> Option<TimeRange> {
        self.schedules.get(&id)?.next_window(now)
    }

    /// Upcoming windows of a fish, earliest first.
    #[must_use]
    pub fn catchable_ranges(&self, id: FishId) -> &[TimeRange] {
        self.schedules
            .get(&id)
            .map(FishSchedule::catchable_ranges)
            .unwrap_or_default()
    }

    /// The schedule of a fish.
    #[must_use]
    pub fn schedule(&self, id: FishId) -> Option<&FishSchedule> {
        self.schedules.get(&id)
    }

    /// The fish catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The weather service and its forecast cache.
    #[must_use]
    pub fn weather(&self) -> &WeatherService {
        &self.weather
    }

    /// Mutable weather service, for ad-hoc forecast queries.
    pub fn weather_mut(&mut self) -> &mut WeatherService {
        &mut self.weather
    }

    /// The clamped scheduler settings.
    #[must_use]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Whether Fish Eyes is on.
    #[must_use]
    pub fn fish_eyes(&self) -> bool {
        self.fish_eyes
    }
}
