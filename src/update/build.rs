//! Version 0 construction

use crate::arena::{sum, Handle, Node, NodeArena};
use crate::tree::Span;
use crate::TreeError;

/// Build the initial tree over `values` (position i holds `values[i - 1]`).
///
/// Allocates exactly 2N−1 nodes; an empty slice yields no root.
pub fn build(arena: &mut NodeArena, values: &[i64]) -> Result<Option<Handle>, TreeError> {
    if values.is_empty() {
        return Ok(None);
    }
    build_span(arena, values, Span::root(values.len())).map(Some)
}

/// Recursion depth is the tree height, ⌈log2 N⌉.
fn build_span(arena: &mut NodeArena, values: &[i64], span: Span) -> Result<Handle, TreeError> {
    if span.is_leaf() {
        return arena.allocate(Node::leaf(values[span.left - 1]));
    }

    let (left_span, right_span) = span.children();
    let left = build_span(arena, values, left_span)?;
    let right = build_span(arena, values, right_span)?;
    let aggregate = sum(arena.get(left).aggregate(), arena.get(right).aggregate())?;

    arena.allocate(Node::branch(left, right, aggregate, 0))
}
