//! Log subscriber setup for the command-line front end.

use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;

/// Requested amount of log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Warnings, including rejected input lines.
    #[default]
    Normal,
    /// Per-cycle stall and retirement detail.
    Verbose,
}

impl Verbosity {
    /// Maps the `-q`/`-v` flags; quiet wins when both are set.
    #[must_use]
    pub const fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (verbose, quiet) {
            (_, true) => Self::Quiet,
            (true, false) => Self::Verbose,
            (false, false) => Self::Normal,
        }
    }

    /// Filter directive used when `RUST_LOG` is unset.
    #[must_use]
    pub const fn default_directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "debug",
        }
    }
}

/// Builds the filter: `RUST_LOG` when set and valid, else the verbosity default.
#[must_use]
pub fn env_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_directive()))
}

/// Installs a stderr `fmt` subscriber as the global default.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init_logging(
    verbosity: Verbosity,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbosity))
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init()
}
