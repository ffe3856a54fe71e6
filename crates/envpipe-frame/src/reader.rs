use std::io::Read;

use crate::accumulator::{Block, BlockAccumulator};
use crate::error::Result;
use crate::line::LineReader;

/// Reads complete blocks from any `Read` stream.
///
/// Composes [`LineReader`] and [`BlockAccumulator`]: lines are pulled off
/// the stream one at a time and fed to the accumulator until a block
/// completes. There is no terminal state under normal operation — the loop
/// only ends when the stream closes or reading fails.
pub struct BlockReader<T> {
    lines: LineReader<T>,
    acc: BlockAccumulator,
}

impl<T: Read> BlockReader<T> {
    /// Create a new block reader.
    pub fn new(inner: T) -> Self {
        Self {
            lines: LineReader::new(inner),
            acc: BlockAccumulator::new(),
        }
    }

    /// Read the next completed block (blocking).
    ///
    /// Returns `Err(FrameError::StreamClosed)` when the stream ends. Lines
    /// accumulated at that point are discarded — a truncated trailing block
    /// is never emitted.
    pub fn read_block(&mut self) -> Result<Block> {
        loop {
            let line = self.lines.read_line()?;
            if let Some(block) = self.acc.push(&line) {
                return Ok(block);
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        self.lines.get_ref()
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        self.lines.get_mut()
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.lines.into_inner()
    }
}
