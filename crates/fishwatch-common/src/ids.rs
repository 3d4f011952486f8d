//! ID types for fish, zones and weather.

use serde::{Deserialize, Serialize};

/// Identifier for a fish (the item id of the catch).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FishId(u32);

impl FishId {
    /// Creates a fish ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for FishId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier for a zone (territory) with its own weather-rate table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ZoneId(u32);

impl ZoneId {
    /// Creates a zone ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "zone {}", self.0)
    }
}

/// Identifier for a weather type.
///
/// Weather ids are data-driven (zone tables reference them), so this is a
/// newtype with named constants for the well-known types rather than a closed
/// enum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct WeatherId(u16);

impl WeatherId {
    /// Creates a weather ID from a raw value.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Clear Skies.
    pub const CLEAR_SKIES: Self = Self(1);
    /// Fair Skies.
    pub const FAIR_SKIES: Self = Self(2);
    /// Clouds.
    pub const CLOUDS: Self = Self(3);
    /// Fog.
    pub const FOG: Self = Self(4);
    /// Wind.
    pub const WIND: Self = Self(5);
    /// Gales.
    pub const GALES: Self = Self(6);
    /// Rain.
    pub const RAIN: Self = Self(7);
    /// Showers.
    pub const SHOWERS: Self = Self(8);
    /// Thunder.
    pub const THUNDER: Self = Self(9);
    /// Thunderstorms.
    pub const THUNDERSTORMS: Self = Self(10);
    /// Dust Storms.
    pub const DUST_STORMS: Self = Self(11);
    /// Heat Waves.
    pub const HEAT_WAVES: Self = Self(14);
    /// Snow.
    pub const SNOW: Self = Self(15);
    /// Blizzards.
    pub const BLIZZARDS: Self = Self(16);
    /// Gloom.
    pub const GLOOM: Self = Self(17);
    /// Umbral Wind.
    pub const UMBRAL_WIND: Self = Self(49);
    /// Umbral Static.
    pub const UMBRAL_STATIC: Self = Self(50);

    /// Display name for the well-known weather types.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self.0 {
            1 => "Clear Skies",
            2 => "Fair Skies",
            3 => "Clouds",
            4 => "Fog",
            5 => "Wind",
            6 => "Gales",
            7 => "Rain",
            8 => "Showers",
            9 => "Thunder",
            10 => "Thunderstorms",
            11 => "Dust Storms",
            14 => "Heat Waves",
            15 => "Snow",
            16 => "Blizzards",
            17 => "Gloom",
            49 => "Umbral Wind",
            50 => "Umbral Static",
            _ => "Unknown",
        }
    }
}

impl std::fmt::Display for WeatherId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
