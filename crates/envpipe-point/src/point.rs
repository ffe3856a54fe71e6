use std::time::{SystemTime, UNIX_EPOCH};

use envpipe_frame::Block;

use crate::abbrev::canonical_name;
use crate::error::{PointError, Result};

/// Measurement name for points produced by this pipeline.
pub const SERIES: &str = "environment";

/// The canonicalized, timestamped set of metric values from one block.
///
/// Field names are unique within a point: when two readings in the same
/// block expand to the same canonical name, the later value overwrites the
/// earlier one (last-write-wins) while keeping its original position.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    fields: Vec<(String, f64)>,
    timestamp_ns: i64,
}

impl Point {
    /// Build a point from a completed block, capturing the current time.
    ///
    /// The timestamp is captured once per block, not per reading.
    pub fn from_block(block: &Block) -> Result<Self> {
        Self::from_block_at(block, capture_timestamp_ns())
    }

    /// Build a point from a completed block with an explicit timestamp.
    pub fn from_block_at(block: &Block, timestamp_ns: i64) -> Result<Self> {
        let mut fields: Vec<(String, f64)> = Vec::with_capacity(block.len());
        for line in block.lines() {
            let (key, raw_value) = split_reading(line)?;
            let name = canonical_name(key);
            let value = parse_value(raw_value)?;
            match fields.iter_mut().find(|(existing, _)| existing.as_str() == name) {
                Some(slot) => slot.1 = value,
                None => fields.push((name.to_string(), value)),
            }
        }
        Ok(Self {
            fields,
            timestamp_ns,
        })
    }

    /// The canonical field entries, in first-seen order.
    pub fn fields(&self) -> &[(String, f64)] {
        &self.fields
    }

    /// Capture timestamp, UTC nanoseconds since epoch.
    pub fn timestamp_ns(&self) -> i64 {
        self.timestamp_ns
    }

    /// True when the source block held no readings.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serialize to one InfluxDB line-protocol line, newline-terminated:
    ///
    /// ```text
    /// <series>,location=<location> <field>=<value>[,...] <timestamp>\n
    /// ```
    ///
    /// An empty point produces an empty field segment; downstream storage
    /// may reject it, but serialization does not. The location tag is not
    /// escaped — reserved characters in the configured location produce an
    /// invalid line.
    pub fn to_line_protocol(&self, series: &str, location: &str) -> String {
        let fields = self
            .fields
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{series},location={location} {fields} {}\n",
            self.timestamp_ns
        )
    }
}

/// Current UTC time as nanoseconds since epoch.
pub fn capture_timestamp_ns() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64)
        .unwrap_or(0)
}

/// Split one raw reading on the first `:` separator.
fn split_reading(line: &str) -> Result<(&str, &str)> {
    line.split_once(':').ok_or_else(|| PointError::MalformedReading {
        line: line.to_string(),
    })
}

fn parse_value(raw: &str) -> Result<f64> {
    raw.parse().map_err(|source| PointError::InvalidNumber {
        value: raw.to_string(),
        source,
    })
}
