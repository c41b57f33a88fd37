//! Allocation tracking for verification

use super::SpaceProfile;

/// Counts nodes allocated by each published version
#[derive(Debug)]
pub struct AllocationTracker {
    /// Nodes allocated so far (build and updates)
    total: usize,

    /// Maximum allocated by a single update
    max_per_update: usize,

    /// Number of updates recorded
    updates: usize,

    /// Profile data (if enabled)
    profile: Option<SpaceProfile>,
}

impl AllocationTracker {
    /// Create new tracker
    pub fn new(profile_enabled: bool) -> Self {
        Self {
            total: 0,
            max_per_update: 0,
            updates: 0,
            profile: profile_enabled.then(SpaceProfile::default),
        }
    }

    /// Record the builder's allocation
    pub fn record_build(&mut self, nodes: usize) {
        self.total += nodes;

        if let Some(ref mut p) = self.profile {
            p.build_nodes = nodes;
        }
    }

    /// Record the allocation of one published update
    pub fn record_update(&mut self, version: usize, nodes: usize) {
        self.total += nodes;
        self.updates += 1;
        self.max_per_update = self.max_per_update.max(nodes);

        if let Some(ref mut p) = self.profile {
            p.max_nodes_per_update = self.max_per_update;
            p.timeline.push((version, nodes));
        }
    }

    /// Record an update that was rolled back
    pub fn record_rollback(&mut self) {
        if let Some(ref mut p) = self.profile {
            p.rollbacks += 1;
        }
    }

    /// Nodes allocated by published versions
    pub fn total_nodes(&self) -> usize {
        self.total
    }

    /// Largest single-update allocation
    pub fn max_nodes_per_update(&self) -> usize {
        self.max_per_update
    }

    /// Number of updates recorded
    pub fn updates(&self) -> usize {
        self.updates
    }

    /// Borrow the profile, if profiling is enabled
    pub fn profile(&self) -> Option<&SpaceProfile> {
        self.profile.as_ref()
    }

    /// Take profile (leaves profiling disabled)
    pub fn take_profile(&mut self) -> Option<SpaceProfile> {
        self.profile.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_max_and_total() {
        let mut tracker = AllocationTracker::new(true);
        tracker.record_build(9);
        tracker.record_update(1, 4);
        tracker.record_update(2, 7);
        tracker.record_rollback();

        assert_eq!(tracker.total_nodes(), 20);
        assert_eq!(tracker.max_nodes_per_update(), 7);
        assert_eq!(tracker.updates(), 2);

        let profile = tracker.take_profile().expect("profiling enabled");
        assert_eq!(profile.timeline, vec![(1, 4), (2, 7)]);
        assert_eq!(profile.total_nodes(), 20);
        assert_eq!(profile.rollbacks, 1);
        assert!(profile.satisfies_bound(7));
        assert!(!profile.satisfies_bound(6));
    }

    #[test]
    fn test_profile_disabled() {
        let mut tracker = AllocationTracker::new(false);
        tracker.record_update(1, 3);
        assert!(tracker.profile().is_none());
        assert_eq!(tracker.max_nodes_per_update(), 3);
    }
}
