//! Score a single record with a saved pipeline.
//!
//! ```text
//! score-record '{"lead_source":"paid_ads","number_of_courses_viewed":2,"annual_income":79276.0}'
//! score-record --pipeline models/pipeline_v2.bin '{"lead_source":"events", ...}'
//! ```
//!
//! Prints `{"record": ..., "score": [...]}` on one line on success, with a
//! space after every `,` and `:`.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use scoring_engine::{prepare_input, score};
use scoring_model::{load_artifact, ModelError};
use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::Value;
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(name = "score-record")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Score a single record with a saved pipeline.")]
struct Cli {
    /// JSON string with the record, e.g. '{"lead_source":"paid_ads","number_of_courses_viewed":2,"annual_income":79276.0}'
    record: Option<String>,

    /// Path to pipeline file
    #[arg(short, long, default_value = "pipeline_v1.bin")]
    pipeline: PathBuf,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Provide a JSON record as the first argument.")]
    MissingRecord,

    #[error("Invalid JSON record: {0}")]
    InvalidRecord(String),

    #[error("Error loading pipeline: {0}")]
    Load(#[source] ModelError),

    #[error("Error scoring record: {0}")]
    Score(#[source] ModelError),

    #[error("Error writing output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::MissingRecord => 2,
            _ => 1,
        }
    }
}

/// Single-line JSON with `", "` and `": "` separators.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}

fn to_spaced_json(value: &Value) -> Result<String, CliError> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn parse_record(raw: &str) -> Result<Value, CliError> {
    let record: Value =
        serde_json::from_str(raw).map_err(|e| CliError::InvalidRecord(e.to_string()))?;
    if !record.is_object() {
        return Err(CliError::InvalidRecord("Record must be a JSON object".into()));
    }
    Ok(record)
}

fn run(cli: &Cli) -> Result<String, CliError> {
    let raw = cli
        .record
        .as_deref()
        .filter(|r| !r.is_empty())
        .ok_or(CliError::MissingRecord)?;
    let record = parse_record(raw)?;

    let pipeline = load_artifact(&cli.pipeline).map_err(CliError::Load)?;
    let scores = score(&pipeline, prepare_input(record.clone())).map_err(CliError::Score)?;

    let out = serde_json::json!({ "record": record, "score": scores });
    to_spaced_json(&out)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .compact()
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(out) => {
            println!("{}", out);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            if matches!(e, CliError::MissingRecord) {
                eprintln!("{}", Cli::command().render_help());
            }
            ExitCode::from(e.exit_code())
        }
    }
}
