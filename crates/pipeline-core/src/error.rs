use thiserror::Error;

use crate::InstructionId;

/// Reasons the dependency graph rejects a node or edge.
///
/// None of these abort a run: the boolean graph methods swallow them, and the
/// loader records them as diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum GraphError {
    /// The identity's slot lies outside the graph's fixed capacity.
    #[error("slot {index} is outside the graph capacity of {capacity}")]
    CapacityExceeded {
        /// Slot index computed from the identity.
        index: usize,
        /// Fixed capacity of the graph.
        capacity: usize,
    },
    /// The identity's slot is already occupied.
    #[error("instruction '{0}' is already in the graph")]
    DuplicateNode(InstructionId),
    /// The symbol is not part of the instruction alphabet.
    #[error("'{0}' is not a recognized instruction symbol")]
    UnknownIdentity(char),
    /// An edge originates from an identity that was never added.
    #[error("instruction '{0}' has not been added to the graph")]
    NodeNotFound(InstructionId),
    /// The source node already has an edge to this destination.
    #[error("dependency {from} -> {to} is already recorded")]
    DuplicateEdge {
        /// Dependent instruction.
        from: InstructionId,
        /// Instruction depended upon.
        to: InstructionId,
    },
}

impl GraphError {
    /// Returns true for rejections caused by repeating an earlier insert.
    #[must_use]
    pub const fn is_duplicate(self) -> bool {
        matches!(self, Self::DuplicateNode(_) | Self::DuplicateEdge { .. })
    }
}

/// Invalid simulation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ConfigError {
    /// Graph capacity must be between 1 and the alphabet size.
    #[error("graph capacity {capacity} is outside 1..={max}")]
    CapacityOutOfRange {
        /// Requested capacity.
        capacity: usize,
        /// Largest supported capacity.
        max: usize,
    },
}
