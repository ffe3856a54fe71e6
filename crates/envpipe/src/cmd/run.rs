use std::io::Read;
use std::time::Duration;

use envpipe_frame::{Block, BlockReader};
use envpipe_influx::{Deliver, InfluxWriter, WriteEndpoint};
use envpipe_point::{Point, SERIES};

use crate::cmd::RunArgs;
use crate::exit::{frame_error, CliError, CliResult, FAILURE};
use crate::output::OutputFormat;

// Idle periods surface as read timeouts; the line reader retries them.
const SERIAL_READ_TIMEOUT: Duration = Duration::from_millis(100);

pub fn run(args: RunArgs, _format: OutputFormat) -> CliResult<i32> {
    let device = args.device.to_string_lossy().into_owned();
    let port = serialport::new(device.as_str(), args.baud)
        .timeout(SERIAL_READ_TIMEOUT)
        .open()
        .map_err(|err| CliError::new(FAILURE, format!("failed opening {device}: {err}")))?;

    let mut sink = InfluxWriter::new(WriteEndpoint::new(&args.url, &args.db));

    tracing::info!(
        device = %device,
        baud = args.baud,
        url = %sink.endpoint().write_url(),
        location = %args.location,
        "relay started"
    );

    relay_loop(BlockReader::new(port), &mut sink, &args.location)
}

/// The synchronous pipeline: read a block, build the point, deliver the
/// line, block on the next read. Block-level and delivery errors are
/// contained; only stream failure ends the loop.
fn relay_loop<T: Read, D: Deliver>(
    mut blocks: BlockReader<T>,
    sink: &mut D,
    location: &str,
) -> CliResult<i32> {
    loop {
        let block = blocks
            .read_block()
            .map_err(|err| frame_error("serial stream failed", err))?;
        relay_block(&block, sink, location);
    }
}

/// Process one completed block, fire-and-forget.
fn relay_block<D: Deliver>(block: &Block, sink: &mut D, location: &str) {
    let point = match Point::from_block(block) {
        Ok(point) => point,
        Err(err) => {
            tracing::warn!(error = %err, lines = block.len(), "dropping malformed block");
            return;
        }
    };

    let line = point.to_line_protocol(SERIES, location);
    match sink.deliver(&line) {
        Ok(()) => tracing::info!(fields = point.fields().len(), "point submitted"),
        Err(err) => tracing::warn!(error = %err, "delivery failed, point dropped"),
    }
}
