//! Short-code to canonical metric-name mapping.
//!
//! The firmware keeps serial traffic small by emitting single-letter field
//! codes; the metrics database stores full names. The table is fixed at
//! build time and never mutated.

/// Expand a reading code to its canonical metric name.
///
/// Unrecognized codes pass through unchanged.
pub fn canonical_name(code: &str) -> &str {
    match code {
        "t" => "temperature",
        "h" => "humidity",
        "l" => "luminosity",
        "a" => "altitude",
        "p" => "pressure",
        other => other,
    }
}
