//! CLI entry point for the pipeline hazard simulator.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use pipeline_core::{SimConfig, MAX_INSTRUCTIONS};
use pipesim::logging::{init_logging, Verbosity};
use pipesim::{load_with_fallback, simulate, write_json_report, write_text_report, SnapshotStyle};
use serde as _;
use serde_json as _;
#[cfg(test)]
use tempfile as _;
use thiserror as _;
use tracing::debug;
use tracing_subscriber as _;

const DEFAULT_INPUT: &str = "InstructionInputData.txt";

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Console layout.
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Four-stage pipeline hazard simulator.
///
/// Reads a program file (instructions on the first line, one
/// `<dependent> <dependency>` pair per following line) and prints the
/// non-overlapped total, the cycle-by-cycle overlapped trace and the
/// overlapped total.
#[derive(Debug, Parser)]
#[command(name = "pipesim", version)]
struct Cli {
    /// Program file; `../Data/<name>` is tried when it cannot be used.
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Dependency graph capacity (1 to 25 instruction slots).
    #[arg(long, default_value_t = MAX_INSTRUCTIONS, value_parser = parse_capacity)]
    capacity: usize,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Annotate each slot with its stage (`b:ID`).
    #[arg(long)]
    stages: bool,

    /// Do not print the state after the first cycle.
    #[arg(long)]
    skip_first_cycle: bool,

    /// Log stall injection and retirement.
    #[arg(short, long)]
    verbose: bool,

    /// Log errors only.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn config(&self) -> SimConfig {
        SimConfig {
            graph_capacity: self.capacity,
            render_first_cycle: !self.skip_first_cycle,
            tracing_enabled: self.format == OutputFormat::Json,
        }
    }

    const fn style(&self) -> SnapshotStyle {
        if self.stages {
            SnapshotStyle::Stages
        } else {
            SnapshotStyle::Compact
        }
    }
}

fn parse_capacity(value: &str) -> Result<usize, String> {
    let graph_capacity: usize = value.parse().map_err(|e: std::num::ParseIntError| e.to_string())?;
    let config = SimConfig {
        graph_capacity,
        ..SimConfig::default()
    };
    config.validate().map_err(|e| e.to_string())?;
    Ok(graph_capacity)
}

fn run(cli: &Cli) -> Result<(), u8> {
    let config = cli.config();
    debug!(input = %cli.input.display(), ?config, "starting simulation");

    let loaded = load_with_fallback(&cli.input, config.graph_capacity).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;

    let outcome = simulate(&loaded.graph, &config);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let written = match cli.format {
        OutputFormat::Text => write_text_report(&mut out, &outcome, cli.style()),
        OutputFormat::Json => write_json_report(
            &mut out,
            &outcome,
            loaded.source.as_deref(),
            &loaded.diagnostics,
        ),
    };

    written.and_then(|()| out.flush()).map_err(|e| {
        eprintln!("error: failed to write report: {e}");
        1
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(Verbosity::from_flags(cli.verbose, cli.quiet)) {
        eprintln!("warning: logging unavailable: {e}");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}
