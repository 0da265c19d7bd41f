use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::{GraphError, InstructionId};

/// Weighted out-edge from a dependent instruction to one it depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DirectedEdge {
    /// Instruction depended upon.
    pub to: InstructionId,
    /// Informational dependency distance; never used for scheduling.
    pub weight: i32,
}

/// Graph vertex holding an instruction identity and its out-edges.
///
/// Edges are keyed by destination only. A second edge to the same
/// destination is rejected and leaves the stored weight untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    id: InstructionId,
    edges: BTreeMap<InstructionId, i32>,
}

impl GraphNode {
    /// Creates a node with no edges.
    #[must_use]
    pub const fn new(id: InstructionId) -> Self {
        Self {
            id,
            edges: BTreeMap::new(),
        }
    }

    /// Identity of this node.
    #[must_use]
    pub const fn id(&self) -> InstructionId {
        self.id
    }

    /// Records an edge to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateEdge`] when an edge to `to` already
    /// exists.
    pub fn try_add_edge(&mut self, to: InstructionId, weight: i32) -> Result<(), GraphError> {
        match self.edges.entry(to) {
            Entry::Vacant(slot) => {
                slot.insert(weight);
                Ok(())
            }
            Entry::Occupied(_) => Err(GraphError::DuplicateEdge { from: self.id, to }),
        }
    }

    /// Records an edge to `to`, returning false if it already existed.
    pub fn add_edge(&mut self, to: InstructionId, weight: i32) -> bool {
        self.try_add_edge(to, weight).is_ok()
    }

    /// Returns true if this node has an edge to `to`.
    #[must_use]
    pub fn has_edge(&self, to: InstructionId) -> bool {
        self.edges.contains_key(&to)
    }

    /// Weight of the edge to `to`, if present.
    #[must_use]
    pub fn edge_weight(&self, to: InstructionId) -> Option<i32> {
        self.edges.get(&to).copied()
    }

    /// Number of out-edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Out-edges in ascending destination order.
    pub fn edges(&self) -> impl Iterator<Item = DirectedEdge> + '_ {
        self.edges
            .iter()
            .map(|(&to, &weight)| DirectedEdge { to, weight })
    }
}
