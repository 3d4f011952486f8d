//! Error types for the availability engine.

use crate::ids::{FishId, ZoneId};
use crate::time::EorzeaInstant;
use thiserror::Error;

/// Top-level error type for fishwatch operations.
#[derive(Debug, Error)]
pub enum FishwatchError {
    /// Interval algebra invariant violated
    #[error("Range error: {0}")]
    Range(#[from] RangeError),

    /// Forecast cache or rate table problem
    #[error("Forecast error: {0}")]
    Forecast(#[from] ForecastError),

    /// Catalog loading or validation failed
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Fish id not present in the catalog
    #[error("Unknown fish {0}")]
    UnknownFish(FishId),
}

/// Interval merge errors.
///
/// These indicate a scheduler bug rather than bad input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeError {
    /// A range was merged in before the end of the last one
    #[error("Range starting at {next_start} merged before previous end {last_end}")]
    OutOfOrder {
        /// End of the last stored range
        last_end: EorzeaInstant,
        /// Start of the rejected range
        next_start: EorzeaInstant,
    },

    /// The range being merged is empty
    #[error("Merging empty range [{start}, {end})")]
    EmptyMerge {
        /// Start of the rejected range
        start: EorzeaInstant,
        /// End of the rejected range
        end: EorzeaInstant,
    },
}

/// Weather forecast errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    /// Cache insert at or before the newest cached period
    #[error("Forecast for {period_start} inserted at or before last cached period {last}")]
    NonMonotonicInsert {
        /// Period being inserted
        period_start: EorzeaInstant,
        /// Newest period already cached
        last: EorzeaInstant,
    },

    /// Forecast insert not aligned to an 8-bell boundary
    #[error("Forecast period {0} is not aligned to a weather period")]
    UnalignedPeriod(EorzeaInstant),

    /// No weather-rate table for the zone
    #[error("No weather rates for {0}")]
    UnknownZone(ZoneId),

    /// Malformed weather-rate table
    #[error("Invalid weather rates for {zone}: {reason}")]
    InvalidRates {
        /// Zone the table belongs to
        zone: ZoneId,
        /// What is wrong with it
        reason: String,
    },
}

/// Catalog loading and validation errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog file could not be parsed
    #[error("Failed to parse {format} catalog: {message}")]
    Parse {
        /// Format that was attempted
        format: &'static str,
        /// Parser message
        message: String,
    },

    /// File extension is neither JSON nor RON
    #[error("Unsupported catalog format: {0}")]
    UnsupportedFormat(String),

    /// Catalog written by an incompatible schema
    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Version this build reads
        expected: String,
        /// Version found in the file
        actual: String,
    },

    /// Fish id appears twice
    #[error("Duplicate fish {0}")]
    DuplicateFish(FishId),

    /// Daily window outside [0, 24] or of zero length
    #[error("Fish {fish} has invalid hours {start_hour}-{end_hour}")]
    InvalidHours {
        /// Offending fish
        fish: FishId,
        /// Declared start hour
        start_hour: f32,
        /// Declared end hour
        end_hour: f32,
    },

    /// Predator is not in the catalog
    #[error("Fish {fish} lists unknown predator {predator}")]
    UnknownPredator {
        /// Fish with the predator list
        fish: FishId,
        /// Missing predator
        predator: FishId,
    },

    /// Fish lists itself as a predator
    #[error("Fish {0} lists itself as a predator")]
    SelfPredator(FishId),

    /// Fish lives in a zone with no weather table
    #[error("Fish {fish} references {zone} which has no weather rates")]
    MissingZone {
        /// Offending fish
        fish: FishId,
        /// Zone without rates
        zone: ZoneId,
    },

    /// Weather table rejected
    #[error(transparent)]
    Rates(#[from] ForecastError),
}

/// Result type alias for fishwatch operations.
pub type FishwatchResult<T> = Result<T, FishwatchError>;
