use std::io::{ErrorKind, Read};

use bytes::BytesMut;

use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 4 * 1024;
const READ_CHUNK_SIZE: usize = 4 * 1024;

/// Reads terminator-stripped ASCII lines from any `Read` stream.
///
/// Handles partial reads internally — callers always get whole lines.
pub struct LineReader<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Read> LineReader<T> {
    /// Create a new line reader.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Read the next line (blocking).
    ///
    /// Returns `Err(FrameError::StreamClosed)` when EOF is reached.
    /// Timeouts from the underlying stream are treated as idle periods and
    /// retried; serial ports surface quiet line time that way.
    pub fn read_line(&mut self) -> Result<String> {
        loop {
            if let Some(line) = take_line(&mut self.buf)? {
                return Ok(line);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err)
                    if err.kind() == ErrorKind::TimedOut
                        || err.kind() == ErrorKind::WouldBlock =>
                {
                    continue
                }
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::StreamClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

/// Split one terminated line off the front of `buf`.
///
/// Returns `Ok(None)` if the buffer holds no complete line yet.
fn take_line(buf: &mut BytesMut) -> Result<Option<String>> {
    let Some(pos) = buf.iter().position(|&b| b == b'\n') else {
        return Ok(None); // Need more data
    };
    let raw = buf.split_to(pos + 1);
    decode_line(&raw).map(Some)
}

/// Decode one raw line: ASCII only, terminator and edge whitespace stripped.
fn decode_line(raw: &[u8]) -> Result<String> {
    if let Some(offset) = raw.iter().position(|b| !b.is_ascii()) {
        return Err(FrameError::NotAscii {
            byte: raw[offset],
            offset,
        });
    }
    // All-ASCII bytes are valid UTF-8, so the lossy conversion is exact.
    Ok(String::from_utf8_lossy(raw).trim().to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn reads_lf_terminated_lines() {
        let mut reader = LineReader::new(Cursor::new(b"t:21.5\nh:40.2\n".to_vec()));
        assert_eq!(reader.read_line().unwrap(), "t:21.5");
        assert_eq!(reader.read_line().unwrap(), "h:40.2");
    }

    #[test]
    fn strips_crlf_terminators() {
        let mut reader = LineReader::new(Cursor::new(b"---\r\nt:1\r\n".to_vec()));
        assert_eq!(reader.read_line().unwrap(), "---");
        assert_eq!(reader.read_line().unwrap(), "t:1");
    }

    #[test]
    fn strips_surrounding_whitespace() {
        let mut reader = LineReader::new(Cursor::new(b"  t:1  \n".to_vec()));
        assert_eq!(reader.read_line().unwrap(), "t:1");
    }

    #[test]
    fn eof_reports_stream_closed() {
        let mut reader = LineReader::new(Cursor::new(Vec::<u8>::new()));
        let err = reader.read_line().unwrap_err();
        assert!(matches!(err, FrameError::StreamClosed));
    }

    #[test]
    fn eof_mid_line_reports_stream_closed() {
        // No terminator ever arrives for the trailing fragment.
        let mut reader = LineReader::new(Cursor::new(b"t:1\nh:4".to_vec()));
        assert_eq!(reader.read_line().unwrap(), "t:1");
        let err = reader.read_line().unwrap_err();
        assert!(matches!(err, FrameError::StreamClosed));
    }

    #[test]
    fn non_ascii_byte_is_rejected() {
        let mut reader = LineReader::new(Cursor::new(b"t:2\x801\n".to_vec()));
        let err = reader.read_line().unwrap_err();
        assert!(matches!(
            err,
            FrameError::NotAscii {
                byte: 0x80,
                offset: 3
            }
        ));
    }

    #[test]
    fn partial_read_handling() {
        let byte_reader = ByteByByteReader {
            bytes: b"t:21.5\n".to_vec(),
            pos: 0,
        };
        let mut reader = LineReader::new(byte_reader);
        assert_eq!(reader.read_line().unwrap(), "t:21.5");
    }

    #[test]
    fn interrupted_read_retries() {
        let inner = FlakyReader {
            kind: ErrorKind::Interrupted,
            failed_once: false,
            bytes: b"h:40\n".to_vec(),
            pos: 0,
        };
        let mut reader = LineReader::new(inner);
        assert_eq!(reader.read_line().unwrap(), "h:40");
    }

    #[test]
    fn timed_out_read_retries() {
        let inner = FlakyReader {
            kind: ErrorKind::TimedOut,
            failed_once: false,
            bytes: b"p:1013.2\n".to_vec(),
            pos: 0,
        };
        let mut reader = LineReader::new(inner);
        assert_eq!(reader.read_line().unwrap(), "p:1013.2");
    }

    #[test]
    fn other_io_errors_propagate() {
        let inner = FlakyReader {
            kind: ErrorKind::BrokenPipe,
            failed_once: false,
            bytes: Vec::new(),
            pos: 0,
        };
        let mut reader = LineReader::new(inner);
        let err = reader.read_line().unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    #[test]
    fn accessors_and_into_inner() {
        let cursor = Cursor::new(Vec::<u8>::new());
        let mut reader = LineReader::new(cursor);

        let _ = reader.get_ref();
        let _ = reader.get_mut();
        let _inner = reader.into_inner();
    }

    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct FlakyReader {
        kind: ErrorKind,
        failed_once: bool,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for FlakyReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.failed_once {
                self.failed_once = true;
                return Err(std::io::Error::from(self.kind));
            }
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            let n = (self.bytes.len() - self.pos).min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }
}
