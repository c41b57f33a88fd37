//! # Persistent Segment Trees
//!
//! A sequence of N aggregable values where every update produces a new,
//! independently queryable version in O(log N) time and space, while all
//! earlier versions remain valid forever.
//!
//! ## Core Design
//!
//! 1. **Append-only arena**: nodes are written once and addressed by handle
//! 2. **Path copying**: an update clones only the root-to-leaf (or
//!    root-to-range-boundary) path; everything else is shared
//! 3. **Two range-update strategies**: lazy tags pushed into *cloned*
//!    children, or permanent tags accumulated by readers
//! 4. **Version arithmetic**: order statistics over an index range walk two
//!    prefix versions in lock-step and use their difference
//!
//! ## Usage Example
//!
//! ```
//! use persistree::{PersistentSegmentTree, VersionId};
//!
//! let mut tree = PersistentSegmentTree::build(&[5, 6, 7, 8, 9])?;
//! let v1 = tree.update_range(VersionId::INITIAL, 2, 4, 10)?;
//!
//! assert_eq!(tree.query_range(v1, 1, 5)?, 65);
//! assert_eq!(tree.query_range(VersionId::INITIAL, 1, 5)?, 35);
//! # Ok::<(), persistree::TreeError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

// Core modules - each implements one component of the engine
pub mod arena;      // Append-only node storage
pub mod version;    // Version id -> root table
pub mod tree;       // Span geometry and explicit-stack descent
pub mod update;     // Builder, point writer, range strategies
pub mod query;      // Range sums, point reads, k-th walks
pub mod space;      // Allocation accounting
pub mod persistent; // Tree facade and configuration
pub mod order;      // Discretizer and order-statistic tree
pub mod script;     // Line-oriented command adapter

// Re-exports for convenience
pub use arena::{Handle, Node, NodeArena};
pub use order::{Discretizer, OrderStatisticTree};
pub use persistent::{PersistentSegmentTree, TreeConfig};
pub use space::{AllocationTracker, SpaceProfile};
pub use tree::Span;
pub use update::{LazyPropagation, PointWrite, RangeStrategy, TagPermanent, UpdateStrategy};
pub use version::{Origin, VersionId, VersionTable};

use thiserror::Error;

/// Errors returned by tree operations
///
/// Contract violations are reported, never clamped; arena exhaustion aborts
/// the update before its root is published.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Position outside [1, N]
    #[error("index {index} out of range 1..={len}")]
    IndexOutOfRange {
        /// Requested position
        index: usize,
        /// Number of positions
        len: usize,
    },

    /// Range not inside [1, N], or empty where an update needs a range
    #[error("invalid range [{lo}, {hi}] for length {len}")]
    InvalidRange {
        /// First position
        lo: usize,
        /// Last position
        hi: usize,
        /// Number of positions
        len: usize,
    },

    /// Version id that was never published
    #[error("unknown version v{version} ({published} published)")]
    UnknownVersion {
        /// Requested version
        version: usize,
        /// Number of published versions
        published: usize,
    },

    /// Order-statistic rank outside [1, available]
    #[error("rank {k} out of range: {available} elements available")]
    RankOutOfRange {
        /// Requested rank
        k: usize,
        /// Elements in the queried version difference
        available: i64,
    },

    /// Arena node limit reached
    #[error("arena capacity of {capacity} nodes exhausted")]
    ArenaExhausted {
        /// Configured limit
        capacity: usize,
    },

    /// Operation needs at least one position
    #[error("tree has no positions")]
    EmptyDomain,

    /// A sum, tag or value does not fit in 64 bits
    #[error("aggregate overflows a 64-bit integer")]
    AggregateOverflow,
}
