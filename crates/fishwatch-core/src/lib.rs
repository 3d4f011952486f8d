//! # Fishwatch Core
//!
//! Fish availability prediction.
//!
//! This crate provides:
//! - Eorzea clock with bell events and time travel
//! - Weather forecasts with an append-only cache and a lazy pattern matcher
//! - Fish definitions and catalog loading
//! - Per-fish window scheduling with predator and intuition gating
//! - [`AvailabilityEngine`], which owns all of the above

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod catalog;
pub mod clock;
pub mod config;
pub mod engine;
pub mod fish;
pub mod scheduler;
pub mod weather;


/// Prelude for convenient imports
pub mod prelude {
    pub use crate::catalog::*;
    pub use crate::clock::*;
    pub use crate::config::*;
    pub use crate::engine::*;
    pub use crate::fish::*;
    pub use crate::scheduler::*;
    pub use crate::weather::*;
}

pub use prelude::*;
