use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod doctor;
pub mod run;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Relay sensor blocks from a serial device to the metrics database.
    Run(RunArgs),
    /// Decode captured sensor output and print the resulting points.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
    /// Run local environment health checks.
    Doctor(DoctorArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Run(args) => run::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
        Command::Doctor(args) => doctor::run(args, format),
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Serial device path.
    #[arg(long, env = "ENVPIPE_DEVICE")]
    pub device: PathBuf,
    /// Baud rate for the serial device.
    #[arg(long, default_value_t = 9600)]
    pub baud: u32,
    /// Base URL of the metrics database.
    #[arg(long, env = "ENVPIPE_URL")]
    pub url: String,
    /// Database name for the write endpoint.
    #[arg(long, env = "ENVPIPE_DB", default_value = "environment")]
    pub db: String,
    /// Location tag attached to every point.
    #[arg(long, env = "ENVPIPE_LOCATION")]
    pub location: String,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Capture file to decode. Reads stdin when omitted.
    pub file: Option<PathBuf>,
    /// Location tag attached to every point.
    #[arg(long, default_value = "capture")]
    pub location: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug, Default)]
pub struct DoctorArgs {
    /// Serial device path to probe.
    #[arg(long)]
    pub device: Option<PathBuf>,
    /// Base URL of the metrics database to ping.
    #[arg(long)]
    pub url: Option<String>,
}
