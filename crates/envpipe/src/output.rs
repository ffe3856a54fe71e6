use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use envpipe_point::Point;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct PointOutput<'a> {
    series: &'a str,
    location: &'a str,
    fields: Vec<FieldOutput<'a>>,
    timestamp_ns: i64,
}

#[derive(Serialize)]
struct FieldOutput<'a> {
    name: &'a str,
    value: f64,
}

pub fn print_point(point: &Point, series: &str, location: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = PointOutput {
                series,
                location,
                fields: point
                    .fields()
                    .iter()
                    .map(|(name, value)| FieldOutput {
                        name: name.as_str(),
                        value: *value,
                    })
                    .collect(),
                timestamp_ns: point.timestamp_ns(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["METRIC", "VALUE"]);
            for (name, value) in point.fields() {
                table.add_row(vec![name.clone(), value.to_string()]);
            }
            println!("{table}");
            println!("location={location} timestamp_ns={}", point.timestamp_ns());
        }
        OutputFormat::Pretty => {
            let fields = point
                .fields()
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join(" ");
            println!("location={location} ts={} {fields}", point.timestamp_ns());
        }
        OutputFormat::Raw => {
            print_raw(point.to_line_protocol(series, location).as_bytes());
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}
