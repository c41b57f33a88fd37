//! Read-only descents over a single version
//!
//! Both range strategies keep `aggregate` inclusive of the node's own tag but
//! exclusive of every ancestor's tag, so one reader serves both: carry the
//! sum of tags met on the way down and add `inherited × length` wherever the
//! descent stops. Nothing is pushed down or written.

use crate::arena::{Handle, NodeArena};
use crate::tree::Span;
use crate::TreeError;

/// Narrow a wide intermediate back to the stored width.
pub(crate) fn narrow(value: i128) -> Result<i64, TreeError> {
    i64::try_from(value).map_err(|_| TreeError::AggregateOverflow)
}

/// Sum of positions [lo, hi] under `root`. Empty ranges and empty trees
/// give 0.
///
/// Tags are accumulated in 128 bits, so only a result that does not fit in
/// `i64` fails.
pub fn range_sum(
    arena: &NodeArena,
    root: Option<Handle>,
    span: Span,
    lo: usize,
    hi: usize,
) -> Result<i64, TreeError> {
    match root {
        Some(root) if lo <= hi && span.overlap(lo, hi) > 0 => {
            narrow(sum_span(arena, root, span, lo, hi, 0))
        }
        _ => Ok(0),
    }
}

/// Recursion depth is the tree height.
pub(crate) fn sum_span(
    arena: &NodeArena,
    handle: Handle,
    span: Span,
    lo: usize,
    hi: usize,
    inherited: i128,
) -> i128 {
    let node = arena.get(handle);
    if span.covered_by(lo, hi) {
        return i128::from(node.aggregate()) + inherited * span.length() as i128;
    }

    let Some((left, right)) = node.children() else {
        return i128::from(node.aggregate()) + inherited;
    };
    let (left_span, right_span) = span.children();
    let carried = inherited + i128::from(node.tag());

    let mut total = 0;
    if left_span.overlap(lo, hi) > 0 {
        total += sum_span(arena, left, left_span, lo, hi, carried);
    }
    if right_span.overlap(lo, hi) > 0 {
        total += sum_span(arena, right, right_span, lo, hi, carried);
    }
    total
}

/// Value stored at `index`.
pub fn point_value(
    arena: &NodeArena,
    root: Handle,
    span: Span,
    index: usize,
) -> Result<i64, TreeError> {
    let mut node = arena.get(root);
    let mut span = span;
    let mut inherited = 0i128;

    while let Some((left, right)) = node.children() {
        inherited += i128::from(node.tag());
        let (left_span, right_span) = span.children();
        if left_span.contains(index) {
            node = arena.get(left);
            span = left_span;
        } else {
            node = arena.get(right);
            span = right_span;
        }
    }

    narrow(i128::from(node.aggregate()) + inherited)
}

/// All values of a version in index order.
pub fn materialize(
    arena: &NodeArena,
    root: Option<Handle>,
    span: Span,
) -> Result<Vec<i64>, TreeError> {
    let Some(root) = root else {
        return Ok(Vec::new());
    };

    let mut values = Vec::with_capacity(span.length());
    let mut stack = vec![(root, span, 0i128)];

    while let Some((handle, span, inherited)) = stack.pop() {
        let node = arena.get(handle);
        match node.children() {
            None => values.push(narrow(i128::from(node.aggregate()) + inherited)?),
            Some((left, right)) => {
                let (left_span, right_span) = span.children();
                let carried = inherited + i128::from(node.tag());
                // Right first so the left subtree is emitted first.
                stack.push((right, right_span, carried));
                stack.push((left, left_span, carried));
            }
        }
    }

    Ok(values)
}

/// Handle of the node whose span is exactly `target`, if the tree has one.
pub fn node_covering(
    arena: &NodeArena,
    root: Option<Handle>,
    span: Span,
    target: Span,
) -> Option<Handle> {
    let mut handle = root?;
    let mut span = span;

    loop {
        if span == target {
            return Some(handle);
        }
        let (left, right) = arena.get(handle).children()?;
        let (left_span, right_span) = span.children();
        if target.covered_by(left_span.left, left_span.right) {
            handle = left;
            span = left_span;
        } else if target.covered_by(right_span.left, right_span.right) {
            handle = right;
            span = right_span;
        } else {
            return None;
        }
    }
}
