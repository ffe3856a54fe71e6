/// Errors that can occur while framing the sensor stream.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A line contained bytes outside the ASCII range.
    #[error("line is not valid ASCII (byte 0x{byte:02x} at offset {offset})")]
    NotAscii { byte: u8, offset: usize },

    /// An I/O error occurred while reading the stream.
    #[error("stream I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before another line could be read.
    #[error("stream closed")]
    StreamClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
