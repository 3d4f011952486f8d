//! Eorzea clock and bell ticker.
//!
//! The clock reads the system time, applies an optional time-travel offset
//! and reports a [`ClockEvent`] whenever the Eorzea bell changes. It is
//! polled; nothing here sleeps or spawns.

use fishwatch_common::{EarthInstant, EorzeaInstant, BELLS_PER_PERIOD};
use serde::{Deserialize, Serialize};

/// Converts an Earth instant to Eorzea time.
#[must_use]
pub fn to_eorzea(earth: EarthInstant) -> EorzeaInstant {
    earth.to_eorzea()
}

/// Converts an Eorzea instant to Earth time, rounding up.
#[must_use]
pub fn to_earth(eorzea: EorzeaInstant) -> EarthInstant {
    eorzea.to_earth()
}

/// Events produced while polling the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClockEvent {
    /// The bell (hour 0-23) changed.
    BellChanged(u8),
}

impl ClockEvent {
    /// The bell this event reports.
    #[must_use]
    pub fn bell(self) -> u8 {
        match self {
            Self::BellChanged(bell) => bell,
        }
    }

    /// Whether a new weather period starts at this bell (0, 8 or 16).
    #[must_use]
    pub fn is_period_boundary(self) -> bool {
        self.bell() % BELLS_PER_PERIOD == 0
    }

    /// Get a description of this event.
    #[must_use]
    pub fn description(self) -> String {
        match self {
            Self::BellChanged(bell) if self.is_period_boundary() => {
                format!("Bell {bell}:00, new weather period")
            }
            Self::BellChanged(bell) => format!("Bell {bell}:00"),
        }
    }
}

/// Polling Eorzea clock with time-travel support.
#[derive(Debug, Clone, Default)]
pub struct EorzeaClock {
    /// Signed Earth-millisecond offset applied to the system time.
    offset_ms: i64,
    /// Last bell reported by `poll_at`.
    last_bell: Option<u8>,
}

impl EorzeaClock {
    /// Creates a clock reading real time.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current Earth time, including any time-travel offset.
    #[must_use]
    pub fn now_earth(&self) -> EarthInstant {
        EarthInstant::now().offset_millis(self.offset_ms)
    }

    /// Current Eorzea time.
    #[must_use]
    pub fn now(&self) -> EorzeaInstant {
        self.now_earth().to_eorzea()
    }

    /// Current bell (0-23).
    #[must_use]
    pub fn bell(&self) -> u8 {
        self.now().bell()
    }

    /// Polls the system clock.
    pub fn poll(&mut self) -> Option<ClockEvent> {
        let now = self.now_earth();
        self.poll_at(now)
    }

    /// Reports a bell change at `earth`, once per distinct bell.
    ///
    /// The first poll after construction (or after time travel) always fires.
    pub fn poll_at(&mut self, earth: EarthInstant) -> Option<ClockEvent> {
        let bell = earth.to_eorzea().bell();
        if self.last_bell == Some(bell) {
            return None;
        }
        self.last_bell = Some(bell);
        Some(ClockEvent::BellChanged(bell))
    }

    /// Makes "now" read as `target`.
    pub fn travel_to(&mut self, target: EarthInstant) {
        self.travel_from(EarthInstant::now(), target);
    }

    /// Sets the offset so that `real_now` reads as `target`.
    pub fn travel_from(&mut self, real_now: EarthInstant, target: EarthInstant) {
        self.offset_ms = target.as_millis().saturating_sub(real_now.as_millis());
        self.last_bell = None;
    }

    /// Returns to real time.
    pub fn restore(&mut self) {
        self.offset_ms = 0;
        self.last_bell = None;
    }

    /// Whether a time-travel offset is active.
    #[must_use]
    pub fn is_time_traveling(&self) -> bool {
        self.offset_ms != 0
    }

    /// The active offset in Earth milliseconds.
    #[must_use]
    pub fn offset_millis(&self) -> i64 {
        self.offset_ms
    }
}
