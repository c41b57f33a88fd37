//! Arena node and handle types

use std::fmt;

use crate::TreeError;

/// Opaque reference to a node inside a [`NodeArena`](super::NodeArena).
///
/// The value is the node's creation-order position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct Handle(u32);

impl Handle {
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize);
        Handle(index as u32)
    }

    /// Creation-order position of the node.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A tree node.
///
/// Fields are private and there are no setters: a node is built as a value,
/// handed to the arena once, and never changes afterwards. The `with_*`
/// methods return modified copies for building the next node on a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct Node {
    left: Option<Handle>,
    right: Option<Handle>,
    aggregate: i64,
    tag: i64,
}

impl Node {
    /// Leaf holding `value`.
    pub fn leaf(value: i64) -> Self {
        Self {
            left: None,
            right: None,
            aggregate: value,
            tag: 0,
        }
    }

    /// Internal node over two children.
    pub fn branch(left: Handle, right: Handle, aggregate: i64, tag: i64) -> Self {
        Self {
            left: Some(left),
            right: Some(right),
            aggregate,
            tag,
        }
    }

    /// Left child handle (None for leaves).
    #[inline]
    pub fn left(&self) -> Option<Handle> {
        self.left
    }

    /// Right child handle (None for leaves).
    #[inline]
    pub fn right(&self) -> Option<Handle> {
        self.right
    }

    /// Both child handles, or None for a leaf.
    #[inline]
    pub fn children(&self) -> Option<(Handle, Handle)> {
        match (self.left, self.right) {
            (Some(l), Some(r)) => Some((l, r)),
            _ => None,
        }
    }

    /// Summary of the subtree (sum or count), including this node's own tag.
    #[inline]
    pub fn aggregate(&self) -> i64 {
        self.aggregate
    }

    /// Range-add delta recorded on this node.
    ///
    /// Under lazy propagation this is still owed to the children; under tag
    /// permanentization it is a permanent contribution of the node's range.
    #[inline]
    pub fn tag(&self) -> i64 {
        self.tag
    }

    /// Whether this node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none()
    }

    /// Copy with a different aggregate.
    pub fn with_aggregate(self, aggregate: i64) -> Self {
        Self { aggregate, ..self }
    }

    /// Copy with a different tag.
    pub fn with_tag(self, tag: i64) -> Self {
        Self { tag, ..self }
    }

    /// Copy relinked to new children.
    pub fn with_children(self, left: Handle, right: Handle) -> Self {
        Self {
            left: Some(left),
            right: Some(right),
            ..self
        }
    }

    /// Copy with `delta` added to the aggregate only.
    pub fn try_add(self, delta: i64) -> Result<Self, TreeError> {
        let aggregate = self
            .aggregate
            .checked_add(delta)
            .ok_or(TreeError::AggregateOverflow)?;
        Ok(Self { aggregate, ..self })
    }

    /// Copy with `delta` applied to every one of `len` positions and recorded
    /// in the tag.
    pub fn try_range_add(self, delta: i64, len: usize) -> Result<Self, TreeError> {
        let added = scaled(delta, len)?;
        let aggregate = self.aggregate.checked_add(added);
        let tag = self.tag.checked_add(delta);
        match (aggregate, tag) {
            (Some(aggregate), Some(tag)) => Ok(Self {
                aggregate,
                tag,
                ..self
            }),
            _ => Err(TreeError::AggregateOverflow),
        }
    }
}

/// `delta × len`, or [`TreeError::AggregateOverflow`].
pub(crate) fn scaled(delta: i64, len: usize) -> Result<i64, TreeError> {
    i64::try_from(len)
        .ok()
        .and_then(|len| delta.checked_mul(len))
        .ok_or(TreeError::AggregateOverflow)
}

/// `a + b`, or [`TreeError::AggregateOverflow`].
pub(crate) fn sum(a: i64, b: i64) -> Result<i64, TreeError> {
    a.checked_add(b).ok_or(TreeError::AggregateOverflow)
}
