//! Version-producing updates
//!
//! Every update reads one root and returns a new one. Nodes reachable from
//! the old root are only ever read; the new version consists of freshly
//! allocated path clones linked to the untouched, shared subtrees.
//!
//! Two range-update strategies are available behind [`UpdateStrategy`]:
//! - [`LazyPropagation`]: pending tags, pushed into cloned children when a
//!   later write has to descend through them
//! - [`TagPermanent`]: tags are never moved; reads accumulate them
//!
//! Both maintain the same node invariant, which lets point writes, reads and
//! the order-statistic walk share one implementation:
//! `aggregate = left.aggregate + right.aggregate + tag × span length`.

pub(crate) mod build;
mod lazy;
mod permanent;
mod point;

pub use lazy::LazyPropagation;
pub use permanent::TagPermanent;
pub use point::PointWrite;

use std::fmt;
use std::str::FromStr;

use crate::arena::{Handle, NodeArena};
use crate::tree::Span;
use crate::TreeError;

/// Interface shared by the range-update strategies.
///
/// Callers validate indices against `span` before calling; implementations
/// may assume `span.left <= lo <= hi <= span.right` and `span.contains(index)`.
pub trait UpdateStrategy {
    /// Short identifier used in logs and on the command line.
    fn name(&self) -> &'static str;

    /// Write a single position, returning the new root.
    fn write_point(
        &self,
        arena: &mut NodeArena,
        root: Handle,
        span: Span,
        index: usize,
        write: PointWrite,
    ) -> Result<Handle, TreeError>;

    /// Add `delta` to every position in [lo, hi], returning the new root.
    fn add_range(
        &self,
        arena: &mut NodeArena,
        root: Handle,
        span: Span,
        lo: usize,
        hi: usize,
        delta: i64,
    ) -> Result<Handle, TreeError>;
}

/// Range-update strategy selected per tree instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeStrategy {
    /// Lazy tags with clone-on-push-down.
    #[default]
    Lazy,
    /// Tag permanentization.
    Permanent,
}

impl RangeStrategy {
    /// All strategies, for parameterized tests and benches.
    pub const ALL: [RangeStrategy; 2] = [RangeStrategy::Lazy, RangeStrategy::Permanent];
}

impl UpdateStrategy for RangeStrategy {
    fn name(&self) -> &'static str {
        match self {
            RangeStrategy::Lazy => LazyPropagation.name(),
            RangeStrategy::Permanent => TagPermanent.name(),
        }
    }

    fn write_point(
        &self,
        arena: &mut NodeArena,
        root: Handle,
        span: Span,
        index: usize,
        write: PointWrite,
    ) -> Result<Handle, TreeError> {
        match self {
            RangeStrategy::Lazy => LazyPropagation.write_point(arena, root, span, index, write),
            RangeStrategy::Permanent => TagPermanent.write_point(arena, root, span, index, write),
        }
    }

    fn add_range(
        &self,
        arena: &mut NodeArena,
        root: Handle,
        span: Span,
        lo: usize,
        hi: usize,
        delta: i64,
    ) -> Result<Handle, TreeError> {
        match self {
            RangeStrategy::Lazy => LazyPropagation.add_range(arena, root, span, lo, hi, delta),
            RangeStrategy::Permanent => TagPermanent.add_range(arena, root, span, lo, hi, delta),
        }
    }
}

impl fmt::Display for RangeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RangeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lazy" => Ok(RangeStrategy::Lazy),
            "permanent" | "perm" => Ok(RangeStrategy::Permanent),
            other => Err(format!(
                "unknown strategy '{}' (expected 'lazy' or 'permanent')",
                other
            )),
        }
    }
}
