//! Sentinel-delimited block framing for line-oriented sensor streams.
//!
//! Sensor firmware emits one reading per line and brackets each group of
//! readings with sentinel lines:
//! - `---` resets the in-progress block (recovery after truncated output)
//! - `===` completes the in-progress block
//!
//! No partial reads, no buffer management in user code.

pub mod accumulator;
pub mod error;
pub mod line;
pub mod reader;

pub use accumulator::{Block, BlockAccumulator, COMPLETE_MARKER, RESET_MARKER};
pub use error::{FrameError, Result};
pub use line::LineReader;
pub use reader::BlockReader;
