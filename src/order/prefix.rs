//! Order statistics over index ranges via prefix versions

use crate::persistent::{PersistentSegmentTree, TreeConfig};
use crate::version::VersionId;
use crate::TreeError;

use super::Discretizer;

/// Answers "k-th smallest of `values[l..=r]`" and related counts.
///
/// Position d of the underlying tree counts occurrences of the d-th
/// smallest distinct value. Version i holds the counts for the first i
/// input values, so `version(r) − version(l − 1)` is exactly the multiset
/// of `values[l..=r]`.
#[derive(Debug)]
pub struct OrderStatisticTree {
    tree: PersistentSegmentTree,
    discretizer: Discretizer,
    prefix: Vec<VersionId>,
}

impl OrderStatisticTree {
    /// Build prefix versions over `values` with a capacity sized for them.
    ///
    /// Prefix versions only ever add 1 at a rank, so each one costs a single
    /// root-to-leaf path.
    pub fn from_values(values: &[i64]) -> Result<Self, TreeError> {
        let distinct = Discretizer::new(values).len();
        let config = TreeConfig::provisioned_for_point_updates(distinct, values.len());
        Self::from_values_with_config(values, config)
    }

    /// Build prefix versions over `values`.
    pub fn from_values_with_config(values: &[i64], config: TreeConfig) -> Result<Self, TreeError> {
        let discretizer = Discretizer::new(values);
        let mut tree = PersistentSegmentTree::zeroed(discretizer.len(), config)?;

        let mut prefix = Vec::with_capacity(values.len() + 1);
        let mut version = VersionId::INITIAL;
        prefix.push(version);
        for &value in values {
            let rank = discretizer.rank(value).ok_or(TreeError::EmptyDomain)?;
            version = tree.point_add(version, rank, 1)?;
            prefix.push(version);
        }

        Ok(Self {
            tree,
            discretizer,
            prefix,
        })
    }

    /// Number of input values.
    pub fn len(&self) -> usize {
        self.prefix.len() - 1
    }

    /// Whether there were no input values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Underlying count tree.
    pub fn tree(&self) -> &PersistentSegmentTree {
        &self.tree
    }

    /// Value ↔ rank mapping.
    pub fn discretizer(&self) -> &Discretizer {
        &self.discretizer
    }

    /// Version holding the first `count` values.
    pub fn prefix_version(&self, count: usize) -> Option<VersionId> {
        self.prefix.get(count).copied()
    }

    /// Rank of `value` among the distinct input values.
    pub fn rank_of(&self, value: i64) -> Option<usize> {
        self.discretizer.rank(value)
    }

    fn bounds(&self, lo: usize, hi: usize) -> Result<(VersionId, VersionId), TreeError> {
        if lo == 0 || lo > hi || hi > self.len() {
            return Err(TreeError::InvalidRange {
                lo,
                hi,
                len: self.len(),
            });
        }
        Ok((self.prefix[lo - 1], self.prefix[hi]))
    }

    /// k-th smallest (1-based) of `values[lo..=hi]` (1-based, inclusive).
    pub fn kth_smallest(&self, lo: usize, hi: usize, k: usize) -> Result<i64, TreeError> {
        let (older, newer) = self.bounds(lo, hi)?;
        let rank = self.tree.kth(older, newer, k)?;
        self.discretizer.value(rank).ok_or(TreeError::EmptyDomain)
    }

    /// Number of values in `values[lo..=hi]` that are ≤ `x`.
    pub fn count_at_most(&self, lo: usize, hi: usize, x: i64) -> Result<usize, TreeError> {
        let (older, newer) = self.bounds(lo, hi)?;
        let ranks = self.discretizer.rank_at_most(x);
        if ranks == 0 {
            return Ok(0);
        }
        let count = self.tree.count_between(older, newer, 1, ranks)?;
        Ok(count as usize)
    }
}
