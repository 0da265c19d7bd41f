//! Text and JSON output for simulation outcomes.

use std::io::{self, Write};

use pipeline_core::SnapshotEntry;
use serde::Serialize;

use crate::driver::SimulationOutcome;
use crate::loader::Diagnostic;

const RULE: &str = "------------------------------------------------------------------";

/// How one cycle's occupancy is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotStyle {
    /// Identities only: `c b - a`.
    #[default]
    Compact,
    /// Identity and stage: `c:IF b:ID -:EX a:WB`.
    Stages,
}

/// Formats occupied slots from newest to oldest.
#[must_use]
pub fn format_snapshot(entries: &[SnapshotEntry], style: SnapshotStyle) -> String {
    entries
        .iter()
        .map(|entry| match (style, entry.stage.mnemonic()) {
            (SnapshotStyle::Stages, Some(stage)) => format!("{}:{stage}", entry.symbol()),
            _ => entry.symbol().to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Writes the console report: totals around the per-cycle trace.
///
/// # Errors
///
/// Propagates any write failure.
pub fn write_text_report<W: Write>(
    writer: &mut W,
    outcome: &SimulationOutcome,
    style: SnapshotStyle,
) -> io::Result<()> {
    let report = &outcome.report;

    writeln!(
        writer,
        "Total time for sequential (non overlapped) execution: {} cycles",
        report.sequential_cycles
    )?;
    writeln!(writer, "{RULE}")?;
    writeln!(writer, "Overlapped execution:")?;
    for frame in &outcome.frames {
        writeln!(writer, "{}", format_snapshot(&frame.entries, style))?;
    }
    writeln!(writer, "{RULE}")?;
    writeln!(
        writer,
        "Total time for pipelined (overlapped) execution: {} cycles",
        report.actual_cycles
    )?;
    writeln!(
        writer,
        "Ideal pipelined execution without stalls: {} cycles",
        report.ideal_cycles
    )?;
    writeln!(
        writer,
        "Data hazard stalls: {} (worst case {} cycles)",
        outcome.stats.stalls, report.worst_case_cycles
    )
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(flatten)]
    outcome: &'a SimulationOutcome,
    diagnostics: &'a [Diagnostic],
}

/// Writes `outcome` as pretty-printed JSON followed by a newline.
///
/// # Errors
///
/// Propagates serialization and write failures as [`io::Error`].
pub fn write_json_report<W: Write>(
    writer: &mut W,
    outcome: &SimulationOutcome,
    source: Option<&std::path::Path>,
    diagnostics: &[Diagnostic],
) -> io::Result<()> {
    let document = JsonReport {
        source: source.map(|path| path.display().to_string()),
        outcome,
        diagnostics,
    };
    serde_json::to_writer_pretty(&mut *writer, &document)?;
    writeln!(writer)
}
