//! Common types and utilities shared across the climate-atlas crates.

pub mod bbox;
pub mod error;
pub mod time;

pub use bbox::BoundingBox;
pub use error::{ClimError, ClimResult};
pub use time::{ClimatologyPeriod, Clock, Season, SystemClock};
