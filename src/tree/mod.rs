//! Implicit tree geometry
//!
//! Node spans are intervals [left, right] computed on demand by midpoint
//! recursion from the root span [1, N]; nothing about geometry is stored.

mod node;
mod traversal;

pub use node::Span;
pub use traversal::{DescentPath, Direction, PathToken};

/// Height of a tree over `len` positions: ⌈log2 len⌉.
pub fn height_bound(len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    (usize::BITS - (len - 1).leading_zeros()) as usize
}
