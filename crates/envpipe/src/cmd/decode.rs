use std::fs::File;
use std::io::{self, Read};

use envpipe_frame::{BlockReader, FrameError};
use envpipe_point::{Point, SERIES};

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::output::{print_point, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let emit = |point: &Point| print_point(point, SERIES, &args.location, format);

    let decoded = match &args.file {
        Some(path) => {
            let file = File::open(path)
                .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
            decode_stream(file, emit)?
        }
        None => decode_stream(io::stdin().lock(), emit)?,
    };

    tracing::info!(points = decoded, "decode finished");
    Ok(SUCCESS)
}

/// Run the framing and point-building stages over a capture.
///
/// Each point is handed to `emit` as soon as its block completes, so a
/// piped live stream shows output without waiting for the pipe to close.
/// Malformed blocks are skipped with a warning, same containment as the
/// relay. End of input is the normal exit, not an error.
fn decode_stream<T: Read>(input: T, mut emit: impl FnMut(&Point)) -> CliResult<usize> {
    let mut blocks = BlockReader::new(input);
    let mut decoded = 0;

    loop {
        let block = match blocks.read_block() {
            Ok(block) => block,
            Err(FrameError::StreamClosed) => break,
            Err(err) => return Err(frame_error("decode failed", err)),
        };

        match Point::from_block(&block) {
            Ok(point) => {
                emit(&point);
                decoded += 1;
            }
            Err(err) => tracing::warn!(error = %err, lines = block.len(), "skipping malformed block"),
        }
    }

    Ok(decoded)
}
