//! Canonical metric points built from framed sensor blocks.
//!
//! Each completed block becomes one [`Point`]: reading codes are expanded
//! through the abbreviation table, values are parsed as floats, and the
//! result serializes to one InfluxDB line-protocol line.

pub mod abbrev;
pub mod error;
pub mod point;

pub use abbrev::canonical_name;
pub use error::{PointError, Result};
pub use point::{capture_timestamp_ns, Point, SERIES};
