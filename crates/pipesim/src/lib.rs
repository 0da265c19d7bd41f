//! Loader, driver and reporting for the pipeline hazard simulator.

use clap as _;

/// Driving a pipeline from a loaded program.
pub mod driver;
/// Whole-file load errors.
pub mod errors;
/// Program file parsing and loading.
pub mod loader;
/// Log subscriber setup.
pub mod logging;
/// Text and JSON report output.
pub mod render;

pub use driver::{
    dependencies, feed_pipeline, run_overlapped, simulate, CycleFrame, Dependency,
    SimulationOutcome,
};
pub use errors::LoadError;
pub use loader::{load_file, load_with_fallback, parse_program, Diagnostic, Loaded};
pub use render::{format_snapshot, write_json_report, write_text_report, SnapshotStyle};
