use std::path::Path;

use envpipe_influx::{InfluxWriter, WriteEndpoint};
use serde::Serialize;

use crate::cmd::DoctorArgs;
use crate::exit::{CliResult, HEALTH_CHECK_FAILED, SUCCESS};
use crate::output::OutputFormat;

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Pass,
    Fail,
    Info,
    Skip,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorOutput {
    checks: Vec<CheckResult>,
    overall: &'static str,
}

pub fn run(args: DoctorArgs, format: OutputFormat) -> CliResult<i32> {
    let checks = vec![
        device_check(args.device.as_deref()),
        serial_ports_check(),
        endpoint_ping_check(args.url.as_deref()),
    ];

    let has_fail = checks.iter().any(|c| matches!(c.status, CheckStatus::Fail));
    let overall = if has_fail { "fail" } else { "pass" };

    let output = DoctorOutput { checks, overall };
    print_doctor(&output, format);

    if has_fail {
        Ok(HEALTH_CHECK_FAILED)
    } else {
        Ok(SUCCESS)
    }
}

fn device_check(device: Option<&Path>) -> CheckResult {
    let Some(device) = device else {
        return CheckResult {
            name: "serial_device".to_string(),
            status: CheckStatus::Skip,
            detail: "--device not set".to_string(),
        };
    };

    if device.exists() {
        CheckResult {
            name: "serial_device".to_string(),
            status: CheckStatus::Pass,
            detail: format!("{} exists", device.display()),
        }
    } else {
        CheckResult {
            name: "serial_device".to_string(),
            status: CheckStatus::Fail,
            detail: format!("{} does not exist", device.display()),
        }
    }
}

fn serial_ports_check() -> CheckResult {
    match serialport::available_ports() {
        Ok(ports) if ports.is_empty() => CheckResult {
            name: "serial_ports".to_string(),
            status: CheckStatus::Info,
            detail: "no serial ports detected".to_string(),
        },
        Ok(ports) => {
            let names = ports
                .iter()
                .map(|p| p.port_name.clone())
                .collect::<Vec<_>>()
                .join(", ");
            CheckResult {
                name: "serial_ports".to_string(),
                status: CheckStatus::Info,
                detail: names,
            }
        }
        // Enumeration failing is not itself a health failure; the device
        // check covers the path the relay actually uses.
        Err(err) => CheckResult {
            name: "serial_ports".to_string(),
            status: CheckStatus::Info,
            detail: format!("port enumeration failed: {err}"),
        },
    }
}

fn endpoint_ping_check(url: Option<&str>) -> CheckResult {
    let Some(url) = url else {
        return CheckResult {
            name: "metrics_endpoint".to_string(),
            status: CheckStatus::Skip,
            detail: "--url not set".to_string(),
        };
    };

    let writer = InfluxWriter::new(WriteEndpoint::new(url, "health"));
    match writer.ping() {
        Ok(()) => CheckResult {
            name: "metrics_endpoint".to_string(),
            status: CheckStatus::Pass,
            detail: format!("{} reachable", writer.endpoint().ping_url()),
        },
        Err(err) => CheckResult {
            name: "metrics_endpoint".to_string(),
            status: CheckStatus::Fail,
            detail: format!("ping failed: {err}"),
        },
    }
}

fn print_doctor(output: &DoctorOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("envpipe doctor\n");
            for c in &output.checks {
                println!(
                    "  [{:>4}] {:<18} {}",
                    status_text(c.status),
                    c.name,
                    c.detail
                );
            }
            if output.overall == "pass" {
                println!("\n  Result: all checks passed");
            } else {
                println!("\n  Result: one or more checks failed");
            }
        }
        OutputFormat::Raw => {
            println!("{}", output.overall);
        }
    }
}

fn status_text(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "PASS",
        CheckStatus::Fail => "FAIL",
        CheckStatus::Info => "INFO",
        CheckStatus::Skip => "SKIP",
    }
}
