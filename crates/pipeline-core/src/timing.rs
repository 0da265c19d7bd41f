//! Closed-form cycle totals for a program held in a dependency graph.
//!
//! For `N` instructions and `M` adjacent data dependencies a four-stage
//! pipeline needs `N * 4` cycles without overlap, `N + 3` with perfect
//! overlap, and `N + 3 + M` once every hazard costs one stall. The worst case
//! (every instruction after the first stalls) is `2N + 2`. These totals are
//! derived from the graph alone and are independent of a simulation run.

use crate::{DependencyGraph, PIPELINE_DEPTH};

/// Cycles one instruction takes when nothing overlaps.
pub const BASE_CYCLES_PER_INSTRUCTION: usize = PIPELINE_DEPTH;

/// Cycles the first instruction needs beyond one, before one instruction
/// retires per cycle.
const PIPELINE_FILL_CYCLES: usize = PIPELINE_DEPTH - 1;

/// Cycles to run every instruction back to back without overlap.
#[must_use]
pub const fn sequential_cycles(graph: &DependencyGraph) -> usize {
    graph.node_count() * BASE_CYCLES_PER_INSTRUCTION
}

/// Cycles for fully overlapped execution with no stalls.
#[must_use]
pub const fn ideal_cycles(graph: &DependencyGraph) -> usize {
    graph.node_count() + PIPELINE_FILL_CYCLES
}

/// Instructions that depend on their immediate predecessor.
#[must_use]
pub fn stalls_required(graph: &DependencyGraph) -> usize {
    graph
        .ids()
        .filter(|&id| graph.depends_on_predecessor(id))
        .count()
}

/// Cycles for overlapped execution including one stall per hazard.
#[must_use]
pub fn actual_cycles(graph: &DependencyGraph) -> usize {
    graph.node_count() + stalls_required(graph) + PIPELINE_FILL_CYCLES
}

/// Upper bound on overlapped cycles for any dependency pattern.
///
/// Reported for reference only; nothing checks a run against it.
#[must_use]
pub const fn worst_case_cycles(graph: &DependencyGraph) -> usize {
    match graph.node_count() {
        0 => 0,
        n => 2 * n + 2,
    }
}

/// All cycle totals for one program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CycleReport {
    /// Instructions in the program.
    pub instructions: usize,
    /// Adjacent data dependencies, one stall each.
    pub stalls_required: usize,
    /// Non-overlapped total.
    pub sequential_cycles: usize,
    /// Overlapped total with no stalls.
    pub ideal_cycles: usize,
    /// Overlapped total including stalls.
    pub actual_cycles: usize,
    /// Worst-case overlapped bound.
    pub worst_case_cycles: usize,
}

impl CycleReport {
    /// Computes every total for `graph`.
    #[must_use]
    pub fn from_graph(graph: &DependencyGraph) -> Self {
        Self {
            instructions: graph.node_count(),
            stalls_required: stalls_required(graph),
            sequential_cycles: sequential_cycles(graph),
            ideal_cycles: ideal_cycles(graph),
            actual_cycles: actual_cycles(graph),
            worst_case_cycles: worst_case_cycles(graph),
        }
    }
}
