//! Node allocation accounting
//!
//! Tracks how many arena nodes each version cost, to check the O(log N)
//! per-update bound.

mod allocator;

pub use allocator::AllocationTracker;

/// Detailed allocation profile (if enabled)
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct SpaceProfile {
    /// Nodes allocated by the builder
    pub build_nodes: usize,

    /// Largest number of nodes a single update allocated
    pub max_nodes_per_update: usize,

    /// Nodes allocated per update, in publication order
    pub timeline: Vec<(usize, usize)>, // (version, nodes)

    /// Updates rolled back because the arena was full
    pub rollbacks: usize,
}

impl SpaceProfile {
    /// Whether every update stayed within `bound` nodes
    pub fn satisfies_bound(&self, bound: usize) -> bool {
        self.max_nodes_per_update <= bound
    }

    /// Total nodes across build and updates
    pub fn total_nodes(&self) -> usize {
        self.build_nodes + self.timeline.iter().map(|&(_, nodes)| nodes).sum::<usize>()
    }

    /// Generate report
    pub fn report(&self) -> String {
        format!(
            "Total nodes: {}\nComponents:\n  Build: {}\n  Updates: {}\n  Max per update: {}\n  Rollbacks: {}",
            self.total_nodes(),
            self.build_nodes,
            self.timeline.len(),
            self.max_nodes_per_update,
            self.rollbacks
        )
    }
}
