//! Version table
//!
//! Maps version ids 0, 1, 2, … to root handles. An entry is appended only
//! after every node on the new version's path has been written, so a
//! published id always resolves to a complete tree.

use std::fmt;
use std::str::FromStr;

use crate::arena::Handle;
use crate::TreeError;

/// Identifier of a published version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct VersionId(pub usize);

impl VersionId {
    /// The version produced by the builder.
    pub const INITIAL: VersionId = VersionId(0);

    /// Position in the version table.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl FromStr for VersionId {
    type Err = std::num::ParseIntError;

    /// Accepts `3` or `v3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('v').unwrap_or(s);
        digits.parse().map(VersionId)
    }
}

/// How a version came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Built from an initial array.
    Build {
        /// Number of positions.
        len: usize,
    },
    /// Single position overwritten.
    Assign {
        /// Source version.
        parent: VersionId,
        /// Position written.
        index: usize,
    },
    /// Delta added at a single position.
    PointAdd {
        /// Source version.
        parent: VersionId,
        /// Position written.
        index: usize,
    },
    /// Delta added over a range.
    RangeAdd {
        /// Source version.
        parent: VersionId,
        /// First position (inclusive).
        lo: usize,
        /// Last position (inclusive).
        hi: usize,
    },
}

impl Origin {
    /// Version this one was derived from (None for a build).
    pub fn parent(&self) -> Option<VersionId> {
        match *self {
            Origin::Build { .. } => None,
            Origin::Assign { parent, .. }
            | Origin::PointAdd { parent, .. }
            | Origin::RangeAdd { parent, .. } => Some(parent),
        }
    }

    /// Short operation name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Origin::Build { .. } => "build",
            Origin::Assign { .. } => "assign",
            Origin::PointAdd { .. } => "point-add",
            Origin::RangeAdd { .. } => "range-add",
        }
    }
}

/// One row of the version table.
#[derive(Debug, Clone, Copy)]
pub struct VersionEntry {
    /// Root node (None for a tree over zero positions).
    pub root: Option<Handle>,
    /// How the version was produced.
    pub origin: Origin,
    /// Nodes allocated to produce this version.
    pub nodes_allocated: usize,
}

/// Append-only mapping from version id to root.
#[derive(Debug, Clone, Default)]
pub struct VersionTable {
    entries: Vec<VersionEntry>,
}

impl VersionTable {
    /// Empty table.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Publish a finished root and return its id.
    pub fn publish(&mut self, entry: VersionEntry) -> VersionId {
        let id = VersionId(self.entries.len());
        self.entries.push(entry);
        id
    }

    /// Look up a published version.
    pub fn entry(&self, version: VersionId) -> Result<&VersionEntry, TreeError> {
        self.entries
            .get(version.index())
            .ok_or(TreeError::UnknownVersion {
                version: version.index(),
                published: self.entries.len(),
            })
    }

    /// Root handle of a published version.
    pub fn root(&self, version: VersionId) -> Result<Option<Handle>, TreeError> {
        self.entry(version).map(|entry| entry.root)
    }

    /// Number of published versions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been published yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recently published version.
    pub fn latest(&self) -> Option<VersionId> {
        self.entries.len().checked_sub(1).map(VersionId)
    }

    /// Iterate over `(id, entry)` pairs in publication order.
    pub fn iter(&self) -> impl Iterator<Item = (VersionId, &VersionEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (VersionId(idx), entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_assigns_sequential_ids() {
        let mut table = VersionTable::new();
        let v0 = table.publish(VersionEntry {
            root: None,
            origin: Origin::Build { len: 0 },
            nodes_allocated: 0,
        });
        let v1 = table.publish(VersionEntry {
            root: None,
            origin: Origin::RangeAdd {
                parent: v0,
                lo: 1,
                hi: 1,
            },
            nodes_allocated: 0,
        });

        assert_eq!(v0, VersionId::INITIAL);
        assert_eq!(v1, VersionId(1));
        assert_eq!(table.latest(), Some(v1));
        assert_eq!(table.entry(v1).unwrap().origin.parent(), Some(v0));
    }

    #[test]
    fn test_unknown_version() {
        let table = VersionTable::new();
        let err = table.root(VersionId(3)).unwrap_err();
        assert!(matches!(
            err,
            TreeError::UnknownVersion {
                version: 3,
                published: 0
            }
        ));
    }

    #[test]
    fn test_parse_version_ids() {
        assert_eq!("v12".parse::<VersionId>().unwrap(), VersionId(12));
        assert_eq!("4".parse::<VersionId>().unwrap(), VersionId(4));
        assert!("vx".parse::<VersionId>().is_err());
    }
}
