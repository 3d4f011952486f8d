//! Half-open intervals on the Eorzea clock.

use crate::error::RangeError;
use crate::time::{EorzeaDuration, EorzeaInstant};
use serde::{Deserialize, Serialize};

/// A half-open interval `[start, end)` of Eorzea time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    /// Inclusive start
    pub start: EorzeaInstant,
    /// Exclusive end
    pub end: EorzeaInstant,
}

impl TimeRange {
    /// Creates a range from its endpoints.
    #[must_use]
    pub const fn new(start: EorzeaInstant, end: EorzeaInstant) -> Self {
        Self { start, end }
    }

    /// Creates a range of `length` starting at `start`.
    #[must_use]
    pub fn starting_at(start: EorzeaInstant, length: EorzeaDuration) -> Self {
        Self::new(start, start + length)
    }

    /// The weather period (8 bells) containing `t`.
    #[must_use]
    pub fn period_containing(t: EorzeaInstant) -> Self {
        Self::starting_at(t.start_of_period(), EorzeaDuration::PERIOD)
    }

    /// Length of the range. Negative for inverted ranges.
    #[must_use]
    pub fn duration(&self) -> EorzeaDuration {
        self.end - self.start
    }

    /// Whether the range covers no time.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether `t` lies in `[start, end)`.
    #[must_use]
    pub fn contains(&self, t: EorzeaInstant) -> bool {
        self.start <= t && t < self.end
    }

    /// Whether the two ranges share any instant.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// `other` begins exactly where this range ends.
    #[must_use]
    pub fn abuts_end(&self, other: &Self) -> bool {
        self.end == other.start
    }

    /// `other` ends exactly where this range begins.
    #[must_use]
    pub fn abuts_start(&self, other: &Self) -> bool {
        self.start == other.end
    }

    /// Common part of two ranges, if non-empty.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let r = Self::new(self.start.max(other.start), self.end.min(other.end));
        (!r.is_empty()).then_some(r)
    }

    /// Smallest range covering both, defined only when they overlap or touch.
    #[must_use]
    pub fn union(&self, other: &Self) -> Option<Self> {
        if self.overlaps(other) || self.abuts_end(other) || self.abuts_start(other) {
            Some(Self::new(self.start.min(other.start), self.end.max(other.end)))
        } else {
            None
        }
    }

    /// The same range with its end pushed out by `by`.
    #[must_use]
    pub fn extend_end(&self, by: EorzeaDuration) -> Self {
        Self::new(self.start, self.end + by)
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Appends `next` to an ordered, non-overlapping list of ranges.
///
/// If `next` touches or overlaps the last range the two are replaced by their
/// union. On error the list is left unchanged.
pub fn merge_into(ranges: &mut Vec<TimeRange>, next: TimeRange) -> Result<(), RangeError> {
    if next.is_empty() {
        return Err(RangeError::EmptyMerge {
            start: next.start,
            end: next.end,
        });
    }
    if let Some(last) = ranges.last_mut() {
        if next.start < last.end {
            return Err(RangeError::OutOfOrder {
                last_end: last.end,
                next_start: next.start,
            });
        }
        if let Some(merged) = last.union(&next) {
            *last = merged;
            return Ok(());
        }
    }
    ranges.push(next);
    Ok(())
}
