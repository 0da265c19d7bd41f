//! Host-facing configuration, snapshot and trace contracts.

use crate::{ConfigError, InstructionId, Stage, ALPHABET_LEN};

/// Number of pipeline stages, and the in-flight depth limit.
pub const PIPELINE_DEPTH: usize = 4;

/// Most instructions a single program may name.
pub const MAX_INSTRUCTIONS: usize = ALPHABET_LEN;

/// Graph capacity used when none is specified.
pub const DEFAULT_GRAPH_CAPACITY: usize = 10;

/// Placeholder symbol rendered for a bubble.
pub const NOOP_SYMBOL: char = '-';

/// Top-level configuration for one simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct SimConfig {
    /// Fixed slot capacity of the dependency graph.
    pub graph_capacity: usize,
    /// Render the state after the very first cycle.
    ///
    /// When false the first cycle is advanced without being reported, so
    /// the trace starts at cycle 2. Totals are unaffected.
    pub render_first_cycle: bool,
    /// Collect [`TraceEvent`]s while simulating.
    pub tracing_enabled: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            graph_capacity: MAX_INSTRUCTIONS,
            render_first_cycle: true,
            tracing_enabled: false,
        }
    }
}

impl SimConfig {
    /// Checks that the configuration can drive a run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CapacityOutOfRange`] when the graph capacity is
    /// zero or larger than the instruction alphabet.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.graph_capacity == 0 || self.graph_capacity > MAX_INSTRUCTIONS {
            return Err(ConfigError::CapacityOutOfRange {
                capacity: self.graph_capacity,
                max: MAX_INSTRUCTIONS,
            });
        }
        Ok(())
    }
}

/// One occupied pipeline slot as seen after a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct SnapshotEntry {
    /// Instruction identity, `None` for a bubble.
    pub id: Option<InstructionId>,
    /// Stage the slot is in; always one of the visible stages.
    pub stage: Stage,
}

impl SnapshotEntry {
    /// Display symbol: the identity, or [`NOOP_SYMBOL`] for a bubble.
    #[must_use]
    pub fn symbol(&self) -> char {
        self.id.map_or(NOOP_SYMBOL, InstructionId::symbol)
    }

    /// Returns true for bubbles.
    #[must_use]
    pub const fn is_bubble(&self) -> bool {
        self.id.is_none()
    }
}

/// Counter values of a pipeline at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PipelineStats {
    /// Cycles simulated so far.
    pub cycles: u32,
    /// Stalls injected so far.
    pub stalls: u32,
    /// Program instructions that reached `Completed`.
    pub completed: u32,
}

/// Deterministic events emitted while a cycle is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum TraceEvent {
    /// A queued record entered the pipeline.
    Admitted {
        /// Cycle number.
        cycle: u32,
        /// Admitted identity, `None` if a bubble had been queued.
        id: Option<InstructionId>,
    },
    /// The queue was empty, so a bubble entered the pipeline.
    BubbleInjected {
        /// Cycle number.
        cycle: u32,
    },
    /// A data-dependent instruction was held in Decode behind a bubble.
    StallInjected {
        /// Cycle number.
        cycle: u32,
        /// Instruction held in Decode.
        id: Option<InstructionId>,
    },
    /// A program instruction finished Write-Back.
    Completed {
        /// Cycle number.
        cycle: u32,
        /// Completed instruction.
        id: InstructionId,
    },
    /// The oldest record left the pipeline.
    Retired {
        /// Cycle number.
        cycle: u32,
        /// Retired identity, `None` for a bubble.
        id: Option<InstructionId>,
    },
}

/// Sink trait for deterministic trace hooks.
pub trait TraceSink {
    /// Records an event in emission order.
    fn on_event(&mut self, event: TraceEvent);
}

impl TraceSink for Vec<TraceEvent> {
    fn on_event(&mut self, event: TraceEvent) {
        self.push(event);
    }
}
