//! Value ↔ dense rank mapping

/// Maps arbitrary values to dense ranks 1..=D (D = number of distinct
/// values) and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discretizer {
    sorted: Vec<i64>,
}

impl Discretizer {
    /// Collect the distinct values of `values`.
    pub fn new(values: &[i64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        Self { sorted }
    }

    /// Number of distinct values D.
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    /// Whether no value was seen.
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Rank of a value that was seen, 1-based.
    pub fn rank(&self, value: i64) -> Option<usize> {
        self.sorted.binary_search(&value).ok().map(|idx| idx + 1)
    }

    /// Number of distinct seen values ≤ `value` (0..=D).
    pub fn rank_at_most(&self, value: i64) -> usize {
        self.sorted.partition_point(|&seen| seen <= value)
    }

    /// Value at `rank` (1-based).
    pub fn value(&self, rank: usize) -> Option<i64> {
        rank.checked_sub(1).and_then(|idx| self.sorted.get(idx)).copied()
    }

    /// Distinct values in ascending order.
    pub fn values(&self) -> &[i64] {
        &self.sorted
    }
}
