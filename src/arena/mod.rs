//! Append-only node storage
//!
//! Nodes are addressed by [`Handle`]s equal to their creation order. The
//! arena only ever grows: there is no free and no in-place edit, so any
//! handle reachable from a published version stays valid and unchanged.

mod node;

pub use node::{Handle, Node};
pub(crate) use node::{scaled, sum};

use crate::TreeError;

/// Position in the arena captured before a mutation starts.
///
/// Rolling back to a mark discards only nodes allocated after it, which
/// belong to a version that has not been published yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ArenaMark(usize);

/// Upper bound on slots reserved by [`NodeArena::with_capacity`].
pub const PREALLOCATED_NODES: usize = 1 << 16;

/// Flat, append-only pool of tree nodes.
#[derive(Debug, Clone)]
pub struct NodeArena {
    nodes: Vec<Node>,
    capacity: Option<usize>,
}

impl NodeArena {
    /// Arena that grows on demand.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            capacity: None,
        }
    }

    /// Arena limited to `capacity` nodes.
    ///
    /// The limit is enforced on allocation; at most [`PREALLOCATED_NODES`]
    /// slots are reserved up front and the rest grow on demand.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity.min(PREALLOCATED_NODES)),
            capacity: Some(capacity),
        }
    }

    /// Append `node` and return its handle.
    ///
    /// Fails with [`TreeError::ArenaExhausted`] when the configured capacity
    /// (or the handle space) is used up.
    pub fn allocate(&mut self, node: Node) -> Result<Handle, TreeError> {
        let limit = self
            .capacity
            .unwrap_or(u32::MAX as usize)
            .min(u32::MAX as usize);
        if self.nodes.len() >= limit {
            return Err(TreeError::ArenaExhausted { capacity: limit });
        }
        let handle = Handle::from_index(self.nodes.len());
        self.nodes.push(node);
        Ok(handle)
    }

    /// Read a node.
    #[inline]
    pub fn get(&self, handle: Handle) -> &Node {
        &self.nodes[handle.index()]
    }

    /// Number of nodes allocated so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node has been allocated.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Configured node limit, if any.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub(crate) fn mark(&self) -> ArenaMark {
        ArenaMark(self.nodes.len())
    }

    pub(crate) fn rollback(&mut self, mark: ArenaMark) {
        self.nodes.truncate(mark.0);
    }

    pub(crate) fn allocated_since(&self, mark: ArenaMark) -> usize {
        self.nodes.len() - mark.0
    }
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}
