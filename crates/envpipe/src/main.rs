mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "envpipe", version, about = "Serial sensor to InfluxDB relay")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_subcommand() {
        let cli = Cli::try_parse_from([
            "envpipe",
            "run",
            "--device",
            "/dev/ttyUSB0",
            "--url",
            "http://influx.host",
            "--location",
            "room1",
        ])
        .expect("run args should parse");

        let args = match cli.command {
            Command::Run(args) => args,
            other => panic!("expected run command, got {other:?}"),
        };
        assert_eq!(args.baud, 9600);
        assert_eq!(args.db, "environment");
    }

    #[test]
    fn run_requires_device() {
        let err = Cli::try_parse_from([
            "envpipe",
            "run",
            "--url",
            "http://influx.host",
            "--location",
            "room1",
        ])
        .expect_err("missing --device should fail");

        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn parses_decode_subcommand() {
        let cli = Cli::try_parse_from(["envpipe", "--format", "raw", "decode", "capture.txt"])
            .expect("decode args should parse");
        assert!(matches!(cli.command, Command::Decode(_)));
    }
}
