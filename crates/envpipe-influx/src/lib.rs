//! Blocking HTTP delivery of line-protocol points to InfluxDB.
//!
//! One POST per point, fire-and-forget from the caller's perspective: the
//! relay logs delivery failures and drops the point. No batching, no
//! compression, no authentication.

pub mod client;
pub mod error;

pub use client::{Deliver, InfluxWriter, WriteEndpoint};
pub use error::{DeliveryError, Result};
