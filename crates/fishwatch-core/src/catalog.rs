//! Fish catalog loading and validation.
//!
//! This module provides:
//! - Catalog files in JSON or RON, versioned with [`SchemaVersion::CATALOG`]
//! - Validation of hours, predators and zone weather tables on load
//! - Lookup by fish id and derived always-available status

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use fishwatch_common::{
    CatalogError, FishId, FishwatchError, FishwatchResult, SchemaVersion, ZoneId,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::fish::{Fish, FishConditions};
use crate::weather::{WeatherRates, ZoneWeatherTable};

/// Default catalog location, relative to the working directory.
pub const DEFAULT_CATALOG_PATH: &str = "data/catalog.json";

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// A zone and its weather rates as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneDefinition {
    /// Zone id
    pub id: ZoneId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// `(weather, threshold)` pairs
    pub weather_rates: WeatherRates,
}

/// On-disk catalog layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Schema the file was written with.
    #[serde(default)]
    pub schema_version: SchemaVersion,
    /// Zones with weather tables.
    pub zones: Vec<ZoneDefinition>,
    /// Fish entries.
    pub fish: Vec<Fish>,
}

/// Validated, read-only fish and zone data.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    fish: BTreeMap<FishId, Fish>,
    zones: ZoneWeatherTable,
    zone_names: BTreeMap<ZoneId, String>,
}

impl Catalog {
    /// Validates a parsed catalog file.
    pub fn from_file(file: CatalogFile) -> CatalogResult<Self> {
        if !SchemaVersion::CATALOG.can_read(&file.schema_version) {
            return Err(CatalogError::VersionMismatch {
                expected: SchemaVersion::CATALOG.to_string(),
                actual: file.schema_version.to_string(),
            });
        }

        let mut catalog = Self::default();
        for zone in file.zones {
            catalog.zones.insert(zone.id, zone.weather_rates)?;
            if !zone.name.is_empty() {
                catalog.zone_names.insert(zone.id, zone.name);
            }
        }
        for fish in file.fish {
            if catalog.fish.contains_key(&fish.id) {
                return Err(CatalogError::DuplicateFish(fish.id));
            }
            catalog.fish.insert(fish.id, fish);
        }
        for fish in catalog.fish.values() {
            catalog.validate_fish(fish)?;
        }

        debug!(
            "Validated catalog: {} fish in {} zones",
            catalog.fish.len(),
            catalog.zones.len()
        );
        Ok(catalog)
    }

    /// Parses a JSON catalog.
    pub fn from_json_str(text: &str) -> CatalogResult<Self> {
        let file: CatalogFile = serde_json::from_str(text).map_err(|e| CatalogError::Parse {
            format: "JSON",
            message: e.to_string(),
        })?;
        Self::from_file(file)
    }

    /// Parses a RON catalog.
    pub fn from_ron_str(text: &str) -> CatalogResult<Self> {
        let file: CatalogFile = ron::from_str(text).map_err(|e| CatalogError::Parse {
            format: "RON",
            message: e.to_string(),
        })?;
        Self::from_file(file)
    }

    /// Loads a catalog, choosing the format from the file extension.
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let text = fs::read_to_string(path)?;
        let catalog = match extension.as_str() {
            "json" => Self::from_json_str(&text)?,
            "ron" => Self::from_ron_str(&text)?,
            other => return Err(CatalogError::UnsupportedFormat(other.to_string())),
        };
        info!("Loaded {} fish from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    fn validate_fish(&self, fish: &Fish) -> CatalogResult<()> {
        let hours = 0.0..=24.0;
        let empty = (fish.start_hour - fish.end_hour).abs() < f32::EPSILON;
        if empty || !hours.contains(&fish.start_hour) || !hours.contains(&fish.end_hour) {
            return Err(CatalogError::InvalidHours {
                fish: fish.id,
                start_hour: fish.start_hour,
                end_hour: fish.end_hour,
            });
        }
        if !self.zones.contains(fish.zone) {
            return Err(CatalogError::MissingZone {
                fish: fish.id,
                zone: fish.zone,
            });
        }
        for predator in &fish.predators {
            if predator.fish == fish.id {
                return Err(CatalogError::SelfPredator(fish.id));
            }
            if !self.fish.contains_key(&predator.fish) {
                return Err(CatalogError::UnknownPredator {
                    fish: fish.id,
                    predator: predator.fish,
                });
            }
        }
        Ok(())
    }

    /// Number of fish.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fish.len()
    }

    /// Whether the catalog has no fish.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fish.is_empty()
    }

    /// Gets a fish by id.
    #[must_use]
    pub fn get(&self, id: FishId) -> Option<&Fish> {
        self.fish.get(&id)
    }

    /// Finds a fish by name (case-insensitive).
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Fish> {
        self.fish.values().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// All fish in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Fish> {
        self.fish.values()
    }

    /// All fish ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = FishId> + '_ {
        self.fish.keys().copied()
    }

    /// Zone weather tables.
    #[must_use]
    pub fn zones(&self) -> &ZoneWeatherTable {
        &self.zones
    }

    /// Display name of a zone, if the catalog gave one.
    #[must_use]
    pub fn zone_name(&self, zone: ZoneId) -> Option<&str> {
        self.zone_names.get(&zone).map(String::as_str)
    }

    /// Replaces a fish's hours and weather requirements.
    pub fn set_conditions(&mut self, id: FishId, conditions: FishConditions) -> FishwatchResult<()> {
        let mut fish = self.get(id).cloned().ok_or(FishwatchError::UnknownFish(id))?;
        fish.apply_conditions(conditions);
        self.validate_fish(&fish)?;
        self.fish.insert(id, fish);
        Ok(())
    }

    /// Available all day in any weather, with every predator (transitively)
    /// the same. Unknown fish and predator cycles are never always available.
    #[must_use]
    pub fn is_always_available(&self, id: FishId, fish_eyes: bool) -> bool {
        self.always_available_inner(id, fish_eyes, &mut BTreeSet::new())
    }

    fn always_available_inner(
        &self,
        id: FishId,
        fish_eyes: bool,
        visiting: &mut BTreeSet<FishId>,
    ) -> bool {
        let Some(fish) = self.get(id) else {
            return false;
        };
        if !fish.is_unrestricted(fish_eyes) || !visiting.insert(id) {
            return false;
        }
        let result = fish
            .predators
            .iter()
            .all(|p| self.always_available_inner(p.fish, fish_eyes, visiting));
        visiting.remove(&id);
        result
    }
}
