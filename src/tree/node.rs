//! Index span covered by a tree node
//!
//! Span = closed interval [left, right] ⊆ [1, N]
//! Children computed via midpoint: m = ⌊(left + right) / 2⌋
//!   Left child: [left, m]
//!   Right child: [m+1, right]
//!
//! Spans are never stored in the arena. Every descent recomputes them
//! from the root span, so a node only carries its handles and values.

use std::fmt;

/// Closed index interval covered by one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct Span {
    /// Left index (inclusive, 1-based)
    pub left: usize,

    /// Right index (inclusive)
    pub right: usize,
}

impl Span {
    /// Create span covering [left, right]
    pub fn new(left: usize, right: usize) -> Self {
        debug_assert!(left <= right, "span must be non-empty");
        Self { left, right }
    }

    /// Root span of a tree with `len` positions.
    pub fn root(len: usize) -> Self {
        Self::new(1, len.max(1))
    }

    /// Check if leaf (unit interval)
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left == self.right
    }

    /// Interval length
    #[inline]
    pub fn length(&self) -> usize {
        self.right - self.left + 1
    }

    /// Midpoint used for the split.
    #[inline]
    pub fn midpoint(&self) -> usize {
        (self.left + self.right) / 2
    }

    /// Get children via midpoint split
    ///
    /// Returns: ([left, mid], [mid+1, right])
    pub fn children(&self) -> (Span, Span) {
        debug_assert!(!self.is_leaf(), "Leaf has no children");

        let mid = self.midpoint();
        (
            Span {
                left: self.left,
                right: mid,
            },
            Span {
                left: mid + 1,
                right: self.right,
            },
        )
    }

    /// Whether `index` lies inside this span.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.left <= index && index <= self.right
    }

    /// Whether this span lies entirely inside [lo, hi].
    #[inline]
    pub fn covered_by(&self, lo: usize, hi: usize) -> bool {
        lo <= self.left && self.right <= hi
    }

    /// Number of positions shared with [lo, hi] (0 when disjoint).
    #[inline]
    pub fn overlap(&self, lo: usize, hi: usize) -> usize {
        let start = self.left.max(lo);
        let end = self.right.min(hi);
        if start > end {
            0
        } else {
            end - start + 1
        }
    }

    /// Number of splits from this span down to any leaf along the
    /// leftmost path. The left child is never shorter than the right, so
    /// this is the height of the subtree.
    pub fn depth_to_leaf(&self) -> usize {
        let mut span = *self;
        let mut depth = 0;

        while !span.is_leaf() {
            let (left_child, _) = span.children();
            span = left_child;
            depth += 1;
        }

        depth
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_leaf() {
            write!(f, "[{}]", self.left)
        } else {
            write!(f, "[{}, {}]", self.left, self.right)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_split() {
        let span = Span::new(1, 100);
        let (left, right) = span.children();

        assert_eq!(left.left, 1);
        assert_eq!(left.right, 50);
        assert_eq!(right.left, 51);
        assert_eq!(right.right, 100);
    }

    #[test]
    fn test_overlap_lengths() {
        let span = Span::new(3, 8);
        assert_eq!(span.overlap(1, 2), 0);
        assert_eq!(span.overlap(1, 4), 2);
        assert_eq!(span.overlap(5, 6), 2);
        assert_eq!(span.overlap(7, 20), 2);
        assert_eq!(span.overlap(1, 20), 6);
        assert!(span.covered_by(3, 8));
        assert!(!span.covered_by(4, 8));
    }

    #[test]
    fn test_depth_is_logarithmic() {
        for n in [1usize, 2, 3, 5, 128, 1000] {
            let depth = Span::root(n).depth_to_leaf();
            let bound = (n as f64).log2().ceil() as usize;
            assert!(
                depth <= bound,
                "n={}: depth {} exceeds ⌈log2 n⌉ = {}",
                n,
                depth,
                bound
            );
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Span::new(4, 4).to_string(), "[4]");
        assert_eq!(Span::new(1, 9).to_string(), "[1, 9]");
    }
}
