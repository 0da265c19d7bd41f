//! Fixed-capacity dependency graph.
//!
//! Nodes live in a dense slot vector addressed directly by
//! [`InstructionId::slot_index`]. The mapping is a bijection over the closed
//! alphabet, so there is no collision handling and the storage never resizes.
//! Empty slots are skipped by every query and by iteration.

/// Graph vertex and weighted out-edge types.
pub mod node;

pub use node::{DirectedEdge, GraphNode};

use crate::{GraphError, InstructionId, DEFAULT_GRAPH_CAPACITY};

/// Directed graph of instruction dependencies.
///
/// An edge `b -> a` means instruction `b` requires the result of `a`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGraph {
    slots: Vec<Option<GraphNode>>,
    node_count: usize,
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_GRAPH_CAPACITY)
    }
}

impl DependencyGraph {
    /// Creates an empty graph with `capacity` fixed slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            node_count: 0,
        }
    }

    /// Fixed number of node slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of nodes added so far.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.node_count
    }

    /// Total number of edges across all nodes.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.iter().map(GraphNode::edge_count).sum()
    }

    fn slot_of(&self, id: InstructionId) -> Result<usize, GraphError> {
        let index = id.slot_index();
        if index < self.capacity() {
            Ok(index)
        } else {
            Err(GraphError::CapacityExceeded {
                index,
                capacity: self.capacity(),
            })
        }
    }

    /// Adds a node for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::CapacityExceeded`] when the slot is outside the
    /// fixed capacity and [`GraphError::DuplicateNode`] when it is already
    /// occupied.
    pub fn try_add_node(&mut self, id: InstructionId) -> Result<(), GraphError> {
        let index = self.slot_of(id)?;
        let slot = &mut self.slots[index];
        if slot.is_some() {
            return Err(GraphError::DuplicateNode(id));
        }
        *slot = Some(GraphNode::new(id));
        self.node_count += 1;
        Ok(())
    }

    /// Adds a node for `id`, returning false if it was rejected.
    pub fn add_node(&mut self, id: InstructionId) -> bool {
        self.try_add_node(id).is_ok()
    }

    /// Adds a dependency edge `from -> to` carrying `weight`.
    ///
    /// Only the source must already be in the graph; the destination just has
    /// to be a valid identity.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::CapacityExceeded`] or [`GraphError::NodeNotFound`]
    /// when `from` cannot be resolved to an added node, and
    /// [`GraphError::DuplicateEdge`] when the edge already exists.
    pub fn try_add_edge(
        &mut self,
        from: InstructionId,
        to: InstructionId,
        weight: i32,
    ) -> Result<(), GraphError> {
        let index = self.slot_of(from)?;
        self.slots[index]
            .as_mut()
            .ok_or(GraphError::NodeNotFound(from))?
            .try_add_edge(to, weight)
    }

    /// Adds a dependency edge, returning false if it was rejected.
    pub fn add_edge(&mut self, from: InstructionId, to: InstructionId, weight: i32) -> bool {
        self.try_add_edge(from, to, weight).is_ok()
    }

    /// Node stored for `id`, if it has been added.
    #[must_use]
    pub fn node(&self, id: InstructionId) -> Option<&GraphNode> {
        self.slots.get(id.slot_index()).and_then(Option::as_ref)
    }

    /// Returns true if `id` has been added.
    #[must_use]
    pub fn has_node(&self, id: InstructionId) -> bool {
        self.node(id).is_some()
    }

    /// Returns true if `id` has been added and depends on `target`.
    #[must_use]
    pub fn has_edge_from(&self, id: InstructionId, target: InstructionId) -> bool {
        self.node(id).is_some_and(|node| node.has_edge(target))
    }

    /// Returns true if `id` depends on the instruction immediately before it.
    ///
    /// This is the only dependency shape that produces a hazard in a
    /// four-stage pipeline whose reads happen in Execute and whose writes are
    /// visible after Write-Back.
    #[must_use]
    pub fn depends_on_predecessor(&self, id: InstructionId) -> bool {
        id.predecessor()
            .is_some_and(|previous| self.has_edge_from(id, previous))
    }

    /// Added nodes in ascending identity order.
    pub fn iter(&self) -> impl Iterator<Item = &GraphNode> + '_ {
        self.slots.iter().flatten()
    }

    /// Added identities in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = InstructionId> + '_ {
        self.iter().map(GraphNode::id)
    }
}

impl<'a> IntoIterator for &'a DependencyGraph {
    type Item = &'a GraphNode;
    type IntoIter = std::iter::Flatten<std::slice::Iter<'a, Option<GraphNode>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter().flatten()
    }
}
