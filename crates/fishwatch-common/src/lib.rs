//! # Fishwatch Common
//!
//! Shared types for the fish availability engine:
//! - Earth and Eorzea instants with exact conversion
//! - Half-open time ranges and ordered merging
//! - Fish, zone and weather identifiers
//! - Error types and the catalog schema version

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod range;
pub mod time;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::range::*;
    pub use crate::time::*;
    pub use crate::version::*;
}

pub use prelude::*;
