//! Tree configuration

use crate::tree::height_bound;
use crate::update::RangeStrategy;

/// Configuration parameters for a persistent tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    /// Range-update strategy used for every version of this tree
    pub strategy: RangeStrategy,

    /// Arena node limit (None grows on demand)
    pub capacity: Option<usize>,

    /// Enable per-update allocation profiling
    pub profile_space: bool,

    /// Log every published version at info level instead of debug
    pub verbose: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            strategy: RangeStrategy::default(),
            capacity: None,
            profile_space: cfg!(feature = "profiling"),
            verbose: false,
        }
    }
}

impl TreeConfig {
    /// Configuration with capacity pre-sized for `len` positions and
    /// `updates` mutating operations.
    pub fn provisioned(len: usize, updates: usize) -> Self {
        Self::default().with_capacity(Self::worst_case_nodes(len, updates))
    }

    /// Configuration with capacity pre-sized for `len` positions and
    /// `updates` point updates applied to a tree that never sees a range
    /// update (such as prefix count versions).
    pub fn provisioned_for_point_updates(len: usize, updates: usize) -> Self {
        let build = (2 * len).saturating_sub(1);
        let capacity = build.saturating_add(updates.saturating_mul(Self::path_bound(len)));
        Self::default().with_capacity(capacity)
    }

    /// Nodes a point update allocates when no tag is pending on its path:
    /// one per level, root level included.
    pub fn path_bound(len: usize) -> usize {
        height_bound(len) + 1
    }

    /// Upper bound on nodes a single point or range update allocates:
    /// at most four per level, root level included.
    pub fn per_update_bound(len: usize) -> usize {
        4 * (height_bound(len) + 1)
    }

    /// Upper bound on arena size after building over `len` positions and
    /// applying `updates` updates.
    pub fn worst_case_nodes(len: usize, updates: usize) -> usize {
        let build = (2 * len).saturating_sub(1);
        build.saturating_add(updates.saturating_mul(Self::per_update_bound(len)))
    }

    /// Select the range-update strategy.
    pub fn with_strategy(mut self, strategy: RangeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Limit the arena to `capacity` nodes.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Enable allocation profiling.
    pub fn with_space_profiling(mut self, enabled: bool) -> Self {
        self.profile_space = enabled;
        self
    }

    /// Enable verbose mode.
    pub fn with_verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worst_case_nodes() {
        // 8 positions: height 3, so 16 nodes per update on top of 15 built.
        assert_eq!(TreeConfig::per_update_bound(8), 16);
        assert_eq!(TreeConfig::worst_case_nodes(8, 2), 15 + 32);
        assert_eq!(TreeConfig::worst_case_nodes(0, 0), 0);
    }

    #[test]
    fn test_point_update_provisioning() {
        // One node per level of a height-3 tree.
        assert_eq!(TreeConfig::path_bound(8), 4);
        let config = TreeConfig::provisioned_for_point_updates(8, 5);
        assert_eq!(config.capacity, Some(15 + 5 * 4));
        assert!(config.capacity < TreeConfig::provisioned(8, 5).capacity);
    }

    #[test]
    fn test_builder_methods() {
        let config = TreeConfig::provisioned(10, 3)
            .with_strategy(RangeStrategy::Permanent)
            .with_space_profiling(true)
            .with_verbose(true);

        assert_eq!(config.strategy, RangeStrategy::Permanent);
        assert_eq!(config.capacity, Some(TreeConfig::worst_case_nodes(10, 3)));
        assert!(config.profile_space);
        assert!(config.verbose);
    }
}
