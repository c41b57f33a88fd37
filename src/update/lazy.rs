//! Range add with lazy propagation and clone-on-push-down
//!
//! A node fully inside the update range is cloned with its aggregate bumped
//! and its pending tag increased; its children stay shared with the source
//! version. A partially overlapping node that carries a pending tag first
//! moves the tag into *cloned* children, never into the shared originals,
//! since older versions still read those children with the tag unapplied.

use tracing::trace;

use crate::arena::{sum, Handle, Node, NodeArena};
use crate::tree::Span;
use crate::TreeError;

use super::point::{write_point, PointWrite};
use super::UpdateStrategy;

/// Eager path cloning with pending tags pushed into cloned children.
#[derive(Debug, Clone, Copy, Default)]
pub struct LazyPropagation;

impl UpdateStrategy for LazyPropagation {
    fn name(&self) -> &'static str {
        "lazy"
    }

    fn write_point(
        &self,
        arena: &mut NodeArena,
        root: Handle,
        span: Span,
        index: usize,
        write: PointWrite,
    ) -> Result<Handle, TreeError> {
        write_point(arena, root, span, index, write, true)
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
        let node = *arena.get(root);
        add_range(arena, node, span, lo, hi, delta)
    }
}

/// `node` is a value, not a handle: after a push-down the child to descend
/// into exists only as an unallocated copy, which is finished here and
/// allocated exactly once.
fn add_range(
    arena: &mut NodeArena,
    node: Node,
    span: Span,
    lo: usize,
    hi: usize,
    delta: i64,
) -> Result<Handle, TreeError> {
    if span.covered_by(lo, hi) {
        return arena.allocate(node.try_range_add(delta, span.length())?);
    }

    let Some((left, right)) = node.children() else {
        // Unreachable for valid ranges: a leaf that overlaps is covered.
        return arena.allocate(node.try_range_add(delta, span.overlap(lo, hi))?);
    };
    let (left_span, right_span) = span.children();

    let mut node = node;
    let mut left_node = *arena.get(left);
    let mut right_node = *arena.get(right);
    let pushed = node.tag() != 0;
    if pushed {
        let tag = node.tag();
        trace!(span = %span, tag, "pushing tag into cloned children");
        left_node = left_node.try_range_add(tag, left_span.length())?;
        right_node = right_node.try_range_add(tag, right_span.length())?;
        node = node.with_tag(0);
    }

    let new_left = if left_span.overlap(lo, hi) > 0 {
        add_range(arena, left_node, left_span, lo, hi, delta)?
    } else if pushed {
        arena.allocate(left_node)?
    } else {
        left
    };
    let new_right = if right_span.overlap(lo, hi) > 0 {
        add_range(arena, right_node, right_span, lo, hi, delta)?
    } else if pushed {
        arena.allocate(right_node)?
    } else {
        right
    };

    let aggregate = sum(arena.get(new_left).aggregate(), arena.get(new_right).aggregate())?;
    arena.allocate(node.with_children(new_left, new_right).with_aggregate(aggregate))
}
