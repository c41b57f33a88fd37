//! Explicit-stack descent
//!
//! A root-to-leaf walk records one token per level: the node visited and
//! which child was taken. Spans are recomputed from the root on demand,
//! so the stack only grows with the height of the tree, never with N.

use super::Span;
use crate::arena::{Handle, Node};

/// Which child a descent step took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Went into the left half
    Left,

    /// Went into the right half
    Right,
}

/// One level of a recorded descent.
#[derive(Debug, Clone, Copy)]
pub struct PathToken {
    /// Node visited at this level, to be relinked on the way back up
    pub node: Node,

    /// Handle of the sibling that was not taken
    pub sibling: Handle,

    /// Which child we descended into
    pub direction: Direction,
}

/// Stack of tokens from the root down to (but excluding) the current node.
#[derive(Debug, Default)]
pub struct DescentPath {
    tokens: Vec<PathToken>,
}

impl DescentPath {
    /// Create an empty path with room for `height` levels.
    pub fn with_height(height: usize) -> Self {
        Self {
            tokens: Vec::with_capacity(height + 1),
        }
    }

    /// Record one level.
    pub fn push_level(&mut self, node: Node, sibling: Handle, direction: Direction) {
        self.tokens.push(PathToken {
            node,
            sibling,
            direction,
        });
    }

    /// Pop the deepest level.
    pub fn pop_level(&mut self) -> Option<PathToken> {
        self.tokens.pop()
    }

    /// Recompute the span of the current node by replaying directions.
    pub fn recompute_span(&self, root: Span) -> Span {
        let mut span = root;

        for token in &self.tokens {
            if span.is_leaf() {
                break;
            }

            let (left_child, right_child) = span.children();
            span = match token.direction {
                Direction::Left => left_child,
                Direction::Right => right_child,
            };
        }

        span
    }
}
