//! Order statistics over combinations of versions
//!
//! A tree whose position i counts occurrences of rank i answers "k-th
//! smallest" by walking down. Walking several roots of the same tree in
//! lock-step with signed weights answers it for the *difference* of those
//! versions: with prefix versions, `version(r) − version(l − 1)` holds
//! exactly the elements of index range [l, r].

use crate::arena::{Handle, NodeArena};
use crate::tree::Span;
use crate::TreeError;

use super::range::{narrow, sum_span};

/// Signed count of ranks in [lo, hi] over a combination of roots.
pub fn combined_count(
    arena: &NodeArena,
    terms: &[(Option<Handle>, i64)],
    span: Span,
    lo: usize,
    hi: usize,
) -> Result<i64, TreeError> {
    narrow(wide_count(arena, terms, span, lo, hi))
}

fn wide_count(
    arena: &NodeArena,
    terms: &[(Option<Handle>, i64)],
    span: Span,
    lo: usize,
    hi: usize,
) -> i128 {
    if lo > hi || span.overlap(lo, hi) == 0 {
        return 0;
    }
    terms
        .iter()
        .filter_map(|&(root, weight)| root.map(|root| (root, weight)))
        .map(|(root, weight)| i128::from(weight) * sum_span(arena, root, span, lo, hi, 0))
        .sum()
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    handle: Handle,
    weight: i64,
    /// Tags of strict ancestors not reflected in `handle`'s aggregate.
    inherited: i128,
}

/// Position holding the k-th element (1-based) of the weighted combination.
pub fn kth_combined(
    arena: &NodeArena,
    terms: &[(Option<Handle>, i64)],
    span: Span,
    k: usize,
) -> Result<usize, TreeError> {
    let available = wide_count(arena, terms, span, span.left, span.right);
    let Some(rank) = i128::try_from(k)
        .ok()
        .filter(|&rank| rank >= 1 && rank <= available)
    else {
        return Err(TreeError::RankOutOfRange {
            k,
            available: narrow(available)?,
        });
    };

    let mut cursors = Vec::with_capacity(terms.len());
    for &(root, weight) in terms {
        let handle = root.ok_or(TreeError::EmptyDomain)?;
        cursors.push(Cursor {
            handle,
            weight,
            inherited: 0,
        });
    }

    let mut span = span;
    let mut remaining = rank;

    while !span.is_leaf() {
        let Some(children) = cursors
            .iter()
            .map(|cursor| arena.get(cursor.handle).children())
            .collect::<Option<Vec<_>>>()
        else {
            break;
        };
        let (left_span, right_span) = span.children();

        let left_count: i128 = cursors
            .iter()
            .zip(&children)
            .map(|(cursor, &(left, _))| {
                let carried = cursor.inherited + i128::from(arena.get(cursor.handle).tag());
                let count = i128::from(arena.get(left).aggregate())
                    + carried * left_span.length() as i128;
                i128::from(cursor.weight) * count
            })
            .sum();

        let go_left = left_count >= remaining;
        if !go_left {
            remaining -= left_count;
        }

        for (cursor, &(left, right)) in cursors.iter_mut().zip(&children) {
            cursor.inherited += i128::from(arena.get(cursor.handle).tag());
            cursor.handle = if go_left { left } else { right };
        }
        span = if go_left { left_span } else { right_span };
    }

    Ok(span.left)
}

/// k-th element of `newer − older`.
pub fn kth_between(
    arena: &NodeArena,
    older: Option<Handle>,
    newer: Option<Handle>,
    span: Span,
    k: usize,
) -> Result<usize, TreeError> {
    kth_combined(arena, &[(newer, 1), (older, -1)], span, k)
}
