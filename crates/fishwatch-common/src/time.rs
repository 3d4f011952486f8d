//! Earth and Eorzea instants.
//!
//! Both clocks count milliseconds since the Unix epoch. Eorzea time runs
//! 3600/175 (= 144/7) times faster than Earth time, so the conversions are
//! done in integer arithmetic on that reduced ratio:
//! - Earth → Eorzea: `floor(earth * 144 / 7)`
//! - Eorzea → Earth: `ceil(eorzea * 7 / 144)`
//!
//! Converting Earth → Eorzea → Earth is exact; the other direction can only
//! move forward by less than one Earth millisecond.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Numerator of the Earth → Eorzea ratio (3600/175 reduced).
const EORZEA_RATIO_NUM: i128 = 144;
/// Denominator of the Earth → Eorzea ratio (3600/175 reduced).
const EORZEA_RATIO_DEN: i128 = 7;

/// Milliseconds in an Eorzea hour (a "bell").
pub const MS_PER_HOUR: i64 = 60 * 60 * 1000;
/// Milliseconds in an Eorzea day.
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;
/// Milliseconds in a weather period (8 bells).
pub const MS_PER_PERIOD: i64 = 8 * MS_PER_HOUR;
/// Bells in a weather period.
pub const BELLS_PER_PERIOD: u8 = 8;

fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

/// A point on the real-world clock (Unix milliseconds).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EarthInstant(i64);

impl EarthInstant {
    /// Creates an instant from Unix milliseconds.
    #[must_use]
    pub const fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    /// Creates an instant from Unix seconds.
    #[must_use]
    pub const fn from_unix_seconds(secs: i64) -> Self {
        Self(secs * 1000)
    }

    /// Current wall-clock time.
    #[must_use]
    pub fn now() -> Self {
        let ms = match std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH) {
            Ok(d) => i64::try_from(d.as_millis()).unwrap_or(i64::MAX),
            Err(e) => -i64::try_from(e.duration().as_millis()).unwrap_or(i64::MAX),
        };
        Self(ms)
    }

    /// Unix milliseconds.
    #[must_use]
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// Unix seconds, floored.
    #[must_use]
    pub const fn unix_seconds(self) -> i64 {
        self.0.div_euclid(1000)
    }

    /// Converts to the Eorzea clock.
    #[must_use]
    pub fn to_eorzea(self) -> EorzeaInstant {
        let scaled = i128::from(self.0) * EORZEA_RATIO_NUM;
        EorzeaInstant(saturate(scaled.div_euclid(EORZEA_RATIO_DEN)))
    }

    /// Offsets this instant by a signed number of Earth milliseconds.
    #[must_use]
    pub const fn offset_millis(self, ms: i64) -> Self {
        Self(self.0.saturating_add(ms))
    }
}

/// A point on the simulated Eorzea clock (Eorzea milliseconds since epoch).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EorzeaInstant(i64);

impl EorzeaInstant {
    /// Creates an instant from Eorzea milliseconds.
    #[must_use]
    pub const fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    /// Creates an instant at `hour` on Eorzea day `day` (days since epoch).
    #[must_use]
    pub const fn from_day_hour(day: i64, hour: i64) -> Self {
        Self(day * MS_PER_DAY + hour * MS_PER_HOUR)
    }

    /// Eorzea milliseconds.
    #[must_use]
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// Converts to the Earth clock, rounding up.
    #[must_use]
    pub fn to_earth(self) -> EarthInstant {
        let scaled = i128::from(self.0) * EORZEA_RATIO_DEN;
        // ceil(a / b) == -floor(-a / b)
        EarthInstant(saturate(-(-scaled).div_euclid(EORZEA_RATIO_NUM)))
    }

    /// Midnight of the Eorzea day containing this instant.
    #[must_use]
    pub const fn start_of_day(self) -> Self {
        Self(self.0.div_euclid(MS_PER_DAY) * MS_PER_DAY)
    }

    /// Start of the 8-bell weather period containing this instant.
    #[must_use]
    pub const fn start_of_period(self) -> Self {
        Self(self.0.div_euclid(MS_PER_PERIOD) * MS_PER_PERIOD)
    }

    /// Whether this instant falls exactly on a weather-period boundary.
    #[must_use]
    pub const fn is_period_aligned(self) -> bool {
        self.0.rem_euclid(MS_PER_PERIOD) == 0
    }

    /// Days since the Eorzea epoch.
    #[must_use]
    pub const fn day(self) -> i64 {
        self.0.div_euclid(MS_PER_DAY)
    }

    /// The bell (hour of day, 0-23).
    #[must_use]
    pub const fn bell(self) -> u8 {
        (self.0.rem_euclid(MS_PER_DAY) / MS_PER_HOUR) as u8
    }

    /// Fractional hours elapsed since midnight.
    #[must_use]
    pub fn hours_into_day(self) -> f64 {
        self.0.rem_euclid(MS_PER_DAY) as f64 / MS_PER_HOUR as f64
    }
}

impl std::fmt::Display for EorzeaInstant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let within_day = self.0.rem_euclid(MS_PER_DAY);
        let minutes = within_day / 60_000;
        write!(f, "day {} {:02}:{:02} ET", self.day(), minutes / 60, minutes % 60)
    }
}

/// A signed span of Eorzea time, in milliseconds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EorzeaDuration(i64);

impl EorzeaDuration {
    /// Zero-length span.
    pub const ZERO: Self = Self(0);
    /// One bell.
    pub const HOUR: Self = Self(MS_PER_HOUR);
    /// One weather period.
    pub const PERIOD: Self = Self(MS_PER_PERIOD);
    /// One Eorzea day.
    pub const DAY: Self = Self(MS_PER_DAY);

    /// Creates a span from Eorzea milliseconds.
    #[must_use]
    pub const fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    /// Creates a span from (possibly fractional) Eorzea hours.
    #[must_use]
    pub fn from_hours(hours: f64) -> Self {
        Self((hours * MS_PER_HOUR as f64).round() as i64)
    }

    /// Creates a span from whole Eorzea days.
    #[must_use]
    pub const fn from_days(days: i64) -> Self {
        Self(days * MS_PER_DAY)
    }

    /// The Eorzea span covered by `secs` seconds of real time.
    #[must_use]
    pub fn from_earth_seconds(secs: u32) -> Self {
        let scaled = i128::from(secs) * 1000 * EORZEA_RATIO_NUM;
        Self(saturate(scaled.div_euclid(EORZEA_RATIO_DEN)))
    }

    /// Eorzea milliseconds.
    #[must_use]
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// Span in fractional Eorzea hours.
    #[must_use]
    pub fn as_hours(self) -> f64 {
        self.0 as f64 / MS_PER_HOUR as f64
    }

    /// Whether the span is zero or negative.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 <= 0
    }
}

impl Add<EorzeaDuration> for EorzeaInstant {
    type Output = Self;

    fn add(self, rhs: EorzeaDuration) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign<EorzeaDuration> for EorzeaInstant {
    fn add_assign(&mut self, rhs: EorzeaDuration) {
        *self = *self + rhs;
    }
}

impl Sub<EorzeaDuration> for EorzeaInstant {
    type Output = Self;

    fn sub(self, rhs: EorzeaDuration) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign<EorzeaDuration> for EorzeaInstant {
    fn sub_assign(&mut self, rhs: EorzeaDuration) {
        *self = *self - rhs;
    }
}

impl Sub for EorzeaInstant {
    type Output = EorzeaDuration;

    fn sub(self, rhs: Self) -> EorzeaDuration {
        EorzeaDuration(self.0.saturating_sub(rhs.0))
    }
}

impl Add for EorzeaDuration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_conversion() {
        // 175 Earth seconds is exactly one bell.
        let earth = EarthInstant::from_unix_seconds(175);
        assert_eq!(earth.to_eorzea().as_millis(), MS_PER_HOUR);
        assert_eq!(EorzeaInstant::from_millis(MS_PER_HOUR).to_earth(), earth);
    }

    #[test]
    fn test_period_start_maps_to_whole_earth_ms() {
        // An 8-bell period is 1400 Earth seconds.
        let period = EorzeaInstant::from_millis(34_971_408_000_000);
        assert!(period.is_period_aligned());
        assert_eq!(period.to_earth().as_millis(), 1_699_999_000_000);
    }

    #[test]
    fn test_to_earth_rounds_up() {
        let e = EorzeaInstant::from_millis(1);
        assert_eq!(e.to_earth().as_millis(), 1);
        let zero = EorzeaInstant::from_millis(0);
        assert_eq!(zero.to_earth().as_millis(), 0);
    }

    #[test]
    fn test_day_and_period_math() {
        let t = EorzeaInstant::from_day_hour(10, 13) + EorzeaDuration::from_millis(1234);
        assert_eq!(t.bell(), 13);
        assert_eq!(t.day(), 10);
        assert_eq!(t.start_of_day(), EorzeaInstant::from_day_hour(10, 0));
        assert_eq!(t.start_of_period(), EorzeaInstant::from_day_hour(10, 8));
        assert!(!t.is_period_aligned());
    }

    #[test]
    fn test_negative_instants_floor() {
        let t = EorzeaInstant::from_millis(-1);
        assert_eq!(t.bell(), 23);
        assert_eq!(t.start_of_period().as_millis(), -MS_PER_PERIOD);
    }

    #[test]
    fn test_earth_seconds_to_eorzea_span() {
        assert_eq!(EorzeaDuration::from_earth_seconds(175), EorzeaDuration::HOUR);
        assert_eq!(EorzeaDuration::from_hours(1.5).as_millis(), 90 * 60 * 1000);
    }

    #[test]
    fn test_display() {
        let t = EorzeaInstant::from_day_hour(3, 22);
        assert_eq!(t.to_string(), "day 3 22:00 ET");
    }

    proptest! {
        #[test]
        fn prop_earth_roundtrip_is_exact(ms in 0i64..4_000_000_000_000i64) {
            let earth = EarthInstant::from_millis(ms);
            prop_assert_eq!(earth.to_eorzea().to_earth(), earth);
        }

        #[test]
        fn prop_eorzea_roundtrip_never_moves_back(ms in 0i64..80_000_000_000_000i64) {
            let eorzea = EorzeaInstant::from_millis(ms);
            let back = eorzea.to_earth().to_eorzea();
            prop_assert!(back >= eorzea);
            prop_assert!(back.as_millis() - eorzea.as_millis() < 21);
        }
    }
}
