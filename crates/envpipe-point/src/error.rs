/// Errors that can occur while building a point from a block.
///
/// Both variants abort the current block only; the frame reader keeps
/// accepting subsequent blocks.
#[derive(Debug, thiserror::Error)]
pub enum PointError {
    /// A raw line is missing the `key:value` separator.
    #[error("malformed reading (expected key:value): {line:?}")]
    MalformedReading { line: String },

    /// A value segment is not a valid decimal number.
    #[error("invalid number {value:?}: {source}")]
    InvalidNumber {
        value: String,
        source: std::num::ParseFloatError,
    },
}

pub type Result<T> = std::result::Result<T, PointError>;
