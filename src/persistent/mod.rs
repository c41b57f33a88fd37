//! Persistent segment tree
//!
//! Owns the node arena and the version table. Every mutating call reads a
//! published version, writes a new path into the arena and publishes the
//! new root only once that path is complete. A failed mutation rolls the
//! arena back to where it started, so no partially written path ever
//! becomes reachable and every earlier version stays intact.

mod config;

pub use config::TreeConfig;

use tracing::{debug, info, warn};

use crate::arena::{Handle, NodeArena};
use crate::query;
use crate::space::{AllocationTracker, SpaceProfile};
use crate::tree::Span;
use crate::update::{build::build, PointWrite, RangeStrategy, UpdateStrategy};
use crate::version::{Origin, VersionEntry, VersionId, VersionTable};
use crate::TreeError;

/// A sequence of N 64-bit values with a full history of versions.
#[derive(Debug)]
pub struct PersistentSegmentTree {
    arena: NodeArena,
    versions: VersionTable,
    len: usize,
    config: TreeConfig,
    tracker: AllocationTracker,
}

impl PersistentSegmentTree {
    /// Build version 0 over `values` with the default configuration.
    pub fn build(values: &[i64]) -> Result<Self, TreeError> {
        Self::build_with_config(values, TreeConfig::default())
    }

    /// Build version 0 over `values`.
    pub fn build_with_config(values: &[i64], config: TreeConfig) -> Result<Self, TreeError> {
        let mut arena = config
            .capacity
            .map(NodeArena::with_capacity)
            .unwrap_or_default();
        let root = build(&mut arena, values)?;

        let mut tracker = AllocationTracker::new(config.profile_space);
        tracker.record_build(arena.len());

        let mut versions = VersionTable::new();
        let origin = Origin::Build { len: values.len() };
        let id = versions.publish(VersionEntry {
            root,
            origin,
            nodes_allocated: arena.len(),
        });
        debug!(
            version = %id,
            len = values.len(),
            nodes = arena.len(),
            strategy = %config.strategy,
            "built initial version"
        );

        Ok(Self {
            arena,
            versions,
            len: values.len(),
            config,
            tracker,
        })
    }

    /// Build version 0 with `len` zeros (a frequency table with no entries).
    pub fn zeroed(len: usize, config: TreeConfig) -> Result<Self, TreeError> {
        Self::build_with_config(&vec![0; len], config)
    }

    /// Number of positions N.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree has no positions.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Configuration in use.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Range-update strategy in use.
    pub fn strategy(&self) -> RangeStrategy {
        self.config.strategy
    }

    /// Number of published versions.
    pub fn version_count(&self) -> usize {
        self.versions.len()
    }

    /// Most recently published version.
    pub fn latest(&self) -> VersionId {
        self.versions.latest().unwrap_or(VersionId::INITIAL)
    }

    /// Version table (read-only).
    pub fn versions(&self) -> &VersionTable {
        &self.versions
    }

    /// Node arena (read-only).
    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Nodes allocated across all versions.
    pub fn arena_len(&self) -> usize {
        self.arena.len()
    }

    /// Allocation accounting.
    pub fn tracker(&self) -> &AllocationTracker {
        &self.tracker
    }

    /// Allocation profile, when profiling is enabled.
    pub fn space_profile(&self) -> Option<&SpaceProfile> {
        self.tracker.profile()
    }

    /// Root handle of `version` (None for an empty tree).
    pub fn root(&self, version: VersionId) -> Result<Option<Handle>, TreeError> {
        self.versions.root(version)
    }

    /// How `version` was produced.
    pub fn origin(&self, version: VersionId) -> Result<Origin, TreeError> {
        self.versions.entry(version).map(|entry| entry.origin)
    }

    /// Version `version` was derived from (None for version 0).
    pub fn version_parent(&self, version: VersionId) -> Result<Option<VersionId>, TreeError> {
        self.origin(version).map(|origin| origin.parent())
    }

    /// One line per published version: id, origin, parent and nodes.
    pub fn version_report(&self) -> String {
        self.versions
            .iter()
            .map(|(id, entry)| match entry.origin.parent() {
                Some(parent) => format!(
                    "{} {} from {}: {} nodes",
                    id,
                    entry.origin.kind(),
                    parent,
                    entry.nodes_allocated
                ),
                None => format!("{} {}: {} nodes", id, entry.origin.kind(), entry.nodes_allocated),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn span(&self) -> Span {
        Span::root(self.len)
    }

    fn check_index(&self, index: usize) -> Result<(), TreeError> {
        if index == 0 || index > self.len {
            return Err(TreeError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(())
    }

    fn check_range(&self, lo: usize, hi: usize) -> Result<(), TreeError> {
        if lo == 0 || lo > hi || hi > self.len {
            return Err(TreeError::InvalidRange {
                lo,
                hi,
                len: self.len,
            });
        }
        Ok(())
    }

    /// Overwrite position `index` of `version`, producing a new version.
    pub fn update_point(
        &mut self,
        version: VersionId,
        index: usize,
        value: i64,
    ) -> Result<VersionId, TreeError> {
        self.write_point(version, index, PointWrite::Assign(value))
    }

    /// Add `delta` to position `index` of `version`, producing a new version.
    pub fn point_add(
        &mut self,
        version: VersionId,
        index: usize,
        delta: i64,
    ) -> Result<VersionId, TreeError> {
        self.write_point(version, index, PointWrite::Add(delta))
    }

    fn write_point(
        &mut self,
        version: VersionId,
        index: usize,
        write: PointWrite,
    ) -> Result<VersionId, TreeError> {
        self.versions.entry(version)?;
        self.check_index(index)?;

        let origin = match write {
            PointWrite::Assign(_) => Origin::Assign {
                parent: version,
                index,
            },
            PointWrite::Add(_) => Origin::PointAdd {
                parent: version,
                index,
            },
        };
        self.derive(origin, |strategy, arena, root, span| {
            strategy.write_point(arena, root, span, index, write)
        })
    }

    /// Add `delta` to every position in [lo, hi] of `version`, producing a
    /// new version.
    pub fn update_range(
        &mut self,
        version: VersionId,
        lo: usize,
        hi: usize,
        delta: i64,
    ) -> Result<VersionId, TreeError> {
        self.versions.entry(version)?;
        self.check_range(lo, hi)?;

        let origin = Origin::RangeAdd {
            parent: version,
            lo,
            hi,
        };
        self.derive(origin, |strategy, arena, root, span| {
            strategy.add_range(arena, root, span, lo, hi, delta)
        })
    }

    /// Run one update against the parent named by `origin` and publish the
    /// result, or roll the arena back if it fails.
    fn derive<F>(&mut self, origin: Origin, update: F) -> Result<VersionId, TreeError>
    where
        F: FnOnce(&RangeStrategy, &mut NodeArena, Handle, Span) -> Result<Handle, TreeError>,
    {
        let parent = origin.parent().unwrap_or(VersionId::INITIAL);
        let root = self.versions.root(parent)?.ok_or(TreeError::EmptyDomain)?;
        let span = self.span();
        let mark = self.arena.mark();

        let new_root = match update(&self.config.strategy, &mut self.arena, root, span) {
            Ok(handle) => handle,
            Err(err) => {
                let discarded = self.arena.allocated_since(mark);
                self.arena.rollback(mark);
                self.tracker.record_rollback();
                warn!(
                    parent = %parent,
                    origin = origin.kind(),
                    discarded,
                    error = %err,
                    "update rolled back"
                );
                return Err(err);
            }
        };

        let nodes = self.arena.allocated_since(mark);
        let id = self.versions.publish(VersionEntry {
            root: Some(new_root),
            origin,
            nodes_allocated: nodes,
        });
        self.tracker.record_update(id.index(), nodes);

        if self.config.verbose {
            info!(version = %id, parent = %parent, origin = origin.kind(), nodes, "published version");
        } else {
            debug!(version = %id, parent = %parent, origin = origin.kind(), nodes, "published version");
        }
        Ok(id)
    }

    /// Sum of positions [lo, hi] in `version`.
    ///
    /// `lo > hi` and empty trees give 0 without descending.
    pub fn query_range(&self, version: VersionId, lo: usize, hi: usize) -> Result<i64, TreeError> {
        let root = self.versions.root(version)?;
        if self.len == 0 || lo > hi {
            return Ok(0);
        }
        self.check_range(lo, hi)?;
        query::range_sum(&self.arena, root, self.span(), lo, hi)
    }

    /// Value at `index` in `version`.
    pub fn get(&self, version: VersionId, index: usize) -> Result<i64, TreeError> {
        let root = self.versions.root(version)?;
        self.check_index(index)?;
        let root = root.ok_or(TreeError::EmptyDomain)?;
        query::point_value(&self.arena, root, self.span(), index)
    }

    /// Sum over all positions of `version`.
    pub fn total(&self, version: VersionId) -> Result<i64, TreeError> {
        let root = self.versions.root(version)?;
        Ok(root.map_or(0, |root| self.arena.get(root).aggregate()))
    }

    /// Position of the k-th element (1-based) of `newer − older`, treating
    /// each position's value as a count.
    pub fn kth(&self, older: VersionId, newer: VersionId, k: usize) -> Result<usize, TreeError> {
        self.kth_combined(&[(newer, 1), (older, -1)], k)
    }

    /// Position of the k-th element of a signed combination of versions,
    /// walking every root in lock-step.
    pub fn kth_combined(&self, terms: &[(VersionId, i64)], k: usize) -> Result<usize, TreeError> {
        let roots = self.resolve(terms)?;
        if self.len == 0 {
            return Err(TreeError::EmptyDomain);
        }
        query::kth_combined(&self.arena, &roots, self.span(), k)
    }

    /// Count of elements of `newer − older` at positions [lo, hi].
    pub fn count_between(
        &self,
        older: VersionId,
        newer: VersionId,
        lo: usize,
        hi: usize,
    ) -> Result<i64, TreeError> {
        let roots = self.resolve(&[(newer, 1), (older, -1)])?;
        if self.len == 0 || lo > hi {
            return Ok(0);
        }
        self.check_range(lo, hi)?;
        query::combined_count(&self.arena, &roots, self.span(), lo, hi)
    }

    fn resolve(&self, terms: &[(VersionId, i64)]) -> Result<Vec<(Option<Handle>, i64)>, TreeError> {
        terms
            .iter()
            .map(|&(version, weight)| Ok((self.versions.root(version)?, weight)))
            .collect()
    }

    /// All values of `version` in index order.
    pub fn materialize(&self, version: VersionId) -> Result<Vec<i64>, TreeError> {
        let root = self.versions.root(version)?;
        query::materialize(&self.arena, root, self.span())
    }

    /// Content fingerprint of `version`: equal values give equal hashes,
    /// whatever the node layout or strategy.
    pub fn fingerprint(&self, version: VersionId) -> Result<blake3::Hash, TreeError> {
        let values = self.materialize(version)?;
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(values.len() as u64).to_le_bytes());
        for value in values {
            hasher.update(&value.to_le_bytes());
        }
        Ok(hasher.finalize())
    }

    /// Handle of the node in `version` covering exactly `span`, if the tree
    /// has a node with that span.
    pub fn node_covering(&self, version: VersionId, span: Span) -> Result<Option<Handle>, TreeError> {
        let root = self.versions.root(version)?;
        if self.len == 0 {
            return Ok(None);
        }
        Ok(query::node_covering(&self.arena, root, self.span(), span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_sum_scenario() {
        for strategy in RangeStrategy::ALL {
            let config = TreeConfig::default().with_strategy(strategy);
            let mut tree = PersistentSegmentTree::build_with_config(&[5, 6, 7, 8, 9], config).unwrap();
            let v0 = VersionId::INITIAL;

            assert_eq!(tree.query_range(v0, 1, 5).unwrap(), 35);
            let v1 = tree.update_range(v0, 2, 4, 10).unwrap();
            assert_eq!(tree.query_range(v1, 1, 5).unwrap(), 65);
            assert_eq!(tree.query_range(v0, 1, 5).unwrap(), 35);
            assert_eq!(tree.version_parent(v1).unwrap(), Some(v0));
        }
    }

    #[test]
    fn test_rollback_on_exhaustion() {
        let values = [1, 2, 3, 4, 5, 6, 7, 8];
        let config = TreeConfig::default().with_capacity(15 + 2).with_space_profiling(true);
        let mut tree = PersistentSegmentTree::build_with_config(&values, config).unwrap();

        let err = tree.update_point(VersionId::INITIAL, 3, 30).unwrap_err();
        assert_eq!(err, TreeError::ArenaExhausted { capacity: 17 });
        assert_eq!(tree.arena_len(), 15);
        assert_eq!(tree.version_count(), 1);
        assert_eq!(tree.materialize(VersionId::INITIAL).unwrap(), values.to_vec());
        assert_eq!(tree.space_profile().unwrap().rollbacks, 1);
    }

    #[test]
    fn test_provisioned_capacity_is_enough() {
        for strategy in RangeStrategy::ALL {
            let n = 37;
            let updates = 50;
            let config = TreeConfig::provisioned(n, updates).with_strategy(strategy);
            let mut tree = PersistentSegmentTree::zeroed(n, config).unwrap();
            let mut version = VersionId::INITIAL;

            for step in 0..updates {
                let lo = 1 + (step * 7) % n;
                let hi = lo + (step * 3) % (n - lo + 1);
                version = if step % 3 == 0 {
                    tree.update_point(version, hi, step as i64).unwrap()
                } else {
                    tree.update_range(version, lo, hi, 1).unwrap()
                };
            }
            assert!(tree.tracker().max_nodes_per_update() <= TreeConfig::per_update_bound(n));
        }
    }

    #[test]
    fn test_version_report_lists_history() {
        let mut tree = PersistentSegmentTree::build(&[1, 2, 3, 4]).unwrap();
        let v1 = tree.update_range(VersionId::INITIAL, 1, 4, 2).unwrap();
        tree.point_add(v1, 3, 1).unwrap();

        let report = tree.version_report();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "v0 build: 7 nodes");
        assert_eq!(lines[1], "v1 range-add from v0: 1 nodes");
        assert!(lines[2].starts_with("v2 point-add from v1: "));
    }

    #[test]
    fn test_validation_errors() {
        let mut tree = PersistentSegmentTree::build(&[1, 2, 3]).unwrap();
        let v0 = VersionId::INITIAL;

        assert_eq!(
            tree.update_point(v0, 4, 0).unwrap_err(),
            TreeError::IndexOutOfRange { index: 4, len: 3 }
        );
        assert_eq!(
            tree.update_range(v0, 3, 2, 1).unwrap_err(),
            TreeError::InvalidRange { lo: 3, hi: 2, len: 3 }
        );
        assert_eq!(
            tree.query_range(v0, 0, 2).unwrap_err(),
            TreeError::InvalidRange { lo: 0, hi: 2, len: 3 }
        );
        assert_eq!(
            tree.query_range(VersionId(9), 1, 2).unwrap_err(),
            TreeError::UnknownVersion { version: 9, published: 1 }
        );
        assert_eq!(tree.query_range(v0, 3, 2).unwrap(), 0);
    }

    #[test]
    fn test_empty_tree() {
        let mut tree = PersistentSegmentTree::build(&[]).unwrap();
        let v0 = VersionId::INITIAL;

        assert_eq!(tree.query_range(v0, 1, 1).unwrap(), 0);
        assert_eq!(tree.query_range(v0, 1, 10).unwrap(), 0);
        assert_eq!(tree.total(v0).unwrap(), 0);
        assert!(tree.materialize(v0).unwrap().is_empty());
        assert_eq!(tree.arena_len(), 0);
        assert!(tree.update_point(v0, 1, 1).is_err());
        assert_eq!(tree.kth(v0, v0, 1).unwrap_err(), TreeError::EmptyDomain);
    }
}
