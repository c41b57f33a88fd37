//! Single-position writes
//!
//! Descends iteratively from the root to the target leaf, recording each
//! visited node and the untouched sibling in a [`DescentPath`], then
//! rebuilds the path bottom-up. Only the O(log N) nodes on the path are
//! allocated; every sibling handle is reused as-is.

use tracing::trace;

use crate::arena::{scaled, sum, Handle, Node, NodeArena};
use crate::tree::{height_bound, DescentPath, Direction, Span};
use crate::TreeError;

/// What to do with the target position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointWrite {
    /// Replace the stored value.
    Assign(i64),
    /// Add to the stored value.
    Add(i64),
}

/// Write one position and return the new root.
///
/// With `push_down` set, pending tags met on the way are moved into freshly
/// cloned children before descending (lazy propagation). Without it, tags
/// stay where they are and an assigned leaf stores its value minus the tags
/// inherited from its ancestors (tag permanentization).
pub(crate) fn write_point(
    arena: &mut NodeArena,
    root: Handle,
    root_span: Span,
    index: usize,
    write: PointWrite,
    push_down: bool,
) -> Result<Handle, TreeError> {
    debug_assert!(root_span.contains(index));

    let mut path = DescentPath::with_height(height_bound(root_span.length()));
    let mut current = *arena.get(root);
    let mut span = root_span;
    let mut inherited = 0i64;

    while let Some((left, right)) = current.children() {
        let (left_span, right_span) = span.children();
        let mut left_node = *arena.get(left);
        let mut right_node = *arena.get(right);
        let mut left_handle = left;
        let mut right_handle = right;

        let tag = current.tag();
        if push_down && tag != 0 {
            trace!(span = %span, tag, "pushing tag into cloned children");
            left_node = left_node.try_range_add(tag, left_span.length())?;
            right_node = right_node.try_range_add(tag, right_span.length())?;
            current = current.with_tag(0);
            // The sibling is finished as soon as it carries the tag.
            if left_span.contains(index) {
                right_handle = arena.allocate(right_node)?;
            } else {
                left_handle = arena.allocate(left_node)?;
            }
        } else {
            inherited = sum(inherited, tag)?;
        }

        if left_span.contains(index) {
            path.push_level(current, right_handle, Direction::Left);
            current = left_node;
            span = left_span;
        } else {
            path.push_level(current, left_handle, Direction::Right);
            current = right_node;
            span = right_span;
        }
    }

    let leaf = match write {
        PointWrite::Assign(value) => Node::leaf(
            value
                .checked_sub(inherited)
                .ok_or(TreeError::AggregateOverflow)?,
        ),
        PointWrite::Add(delta) => current.try_add(delta)?,
    };
    let mut handle = arena.allocate(leaf)?;

    while let Some(token) = path.pop_level() {
        let sibling = token.sibling;
        let (left, right) = match token.direction {
            Direction::Left => (handle, sibling),
            Direction::Right => (sibling, handle),
        };
        let span = path.recompute_span(root_span);
        let children = sum(arena.get(left).aggregate(), arena.get(right).aggregate())?;
        let aggregate = sum(children, scaled(token.node.tag(), span.length())?)?;
        handle = arena.allocate(
            token
                .node
                .with_children(left, right)
                .with_aggregate(aggregate),
        )?;
    }

    Ok(handle)
}
