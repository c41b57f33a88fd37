//! Range add with tag permanentization
//!
//! Tags are never pushed down and never cleared. Every visited node gets
//! its aggregate bumped by `delta × overlap`; a fully covered node also
//! records `delta` in its tag and the descent stops there. Readers add
//! `tag × (queried length inside the node)` for every tag met on the way
//! down, which the query engine does for both strategies.

use crate::arena::{scaled, Handle, NodeArena};
use crate::tree::Span;
use crate::TreeError;

use super::point::{write_point, PointWrite};
use super::UpdateStrategy;

/// Range updates that only clone nodes overlapping the range.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagPermanent;

impl UpdateStrategy for TagPermanent {
    fn name(&self) -> &'static str {
        "permanent"
    }

    fn write_point(
        &self,
        arena: &mut NodeArena,
        root: Handle,
        span: Span,
        index: usize,
        write: PointWrite,
    ) -> Result<Handle, TreeError> {
        write_point(arena, root, span, index, write, false)
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
        add_range(arena, root, span, lo, hi, delta)
    }
}

fn add_range(
    arena: &mut NodeArena,
    handle: Handle,
    span: Span,
    lo: usize,
    hi: usize,
    delta: i64,
) -> Result<Handle, TreeError> {
    let node = *arena.get(handle);
    if span.covered_by(lo, hi) {
        return arena.allocate(node.try_range_add(delta, span.length())?);
    }

    let bumped = node.try_add(scaled(delta, span.overlap(lo, hi))?)?;
    let Some((left, right)) = node.children() else {
        return arena.allocate(bumped);
    };
    let (left_span, right_span) = span.children();

    let new_left = if left_span.overlap(lo, hi) > 0 {
        add_range(arena, left, left_span, lo, hi, delta)?
    } else {
        left
    };
    let new_right = if right_span.overlap(lo, hi) > 0 {
        add_range(arena, right, right_span, lo, hi, delta)?
    } else {
        right
    };

    arena.allocate(bumped.with_children(new_left, new_right))
}
