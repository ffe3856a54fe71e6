//! Sentinel-driven block accumulation.
//!
//! The accumulator is a two-state machine: `Empty` until the first data
//! line arrives, `Accumulating` until a sentinel resolves the block. It is
//! pure state — all I/O lives in [`crate::reader::BlockReader`].

/// Line value that discards the in-progress block.
pub const RESET_MARKER: &str = "---";

/// Line value that completes the in-progress block.
pub const COMPLETE_MARKER: &str = "===";

/// One framed group of raw readings delimited by sentinel markers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    lines: Vec<String>,
}

impl Block {
    /// Create a block from raw reading lines.
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// The raw reading lines, in arrival order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of raw reading lines in this block.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when the block completed with no readings accumulated.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Consume the block and return its lines.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Empty,
    Accumulating(Vec<String>),
}

/// Groups incoming lines into blocks using the sentinel markers.
///
/// The reset marker discards whatever has accumulated without emitting a
/// block; the completion marker emits the accumulated lines (possibly
/// zero of them). Everything else is appended verbatim.
#[derive(Debug, Default)]
pub struct BlockAccumulator {
    state: State,
}

impl BlockAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one stripped line.
    ///
    /// Returns a completed [`Block`] when `line` is the completion marker.
    pub fn push(&mut self, line: &str) -> Option<Block> {
        match line {
            RESET_MARKER => {
                let discarded = self.pending();
                if discarded > 0 {
                    tracing::debug!(discarded, "block reset, accumulated lines dropped");
                }
                self.state = State::Empty;
                None
            }
            COMPLETE_MARKER => {
                let lines = match std::mem::take(&mut self.state) {
                    State::Empty => Vec::new(),
                    State::Accumulating(lines) => lines,
                };
                Some(Block::new(lines))
            }
            _ => {
                match &mut self.state {
                    State::Empty => self.state = State::Accumulating(vec![line.to_string()]),
                    State::Accumulating(lines) => lines.push(line.to_string()),
                }
                None
            }
        }
    }

    /// Number of lines accumulated so far.
    pub fn pending(&self) -> usize {
        match &self.state {
            State::Empty => 0,
            State::Accumulating(lines) => lines.len(),
        }
    }
}
