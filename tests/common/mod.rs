#![allow(dead_code)]

use proptest::prelude::*;

/// Reference model: every version stored as a full array.
#[derive(Debug, Clone)]
pub struct NaiveHistory {
    versions: Vec<Vec<i64>>,
}

impl NaiveHistory {
    pub fn new(values: &[i64]) -> Self {
        Self {
            versions: vec![values.to_vec()],
        }
    }

    pub fn version(&self, version: usize) -> &[i64] {
        &self.versions[version]
    }

    pub fn assign(&mut self, version: usize, index: usize, value: i64) -> usize {
        let mut next = self.versions[version].clone();
        next[index - 1] = value;
        self.push(next)
    }

    pub fn add_range(&mut self, version: usize, lo: usize, hi: usize, delta: i64) -> usize {
        let mut next = self.versions[version].clone();
        for value in &mut next[lo - 1..hi] {
            *value += delta;
        }
        self.push(next)
    }

    pub fn sum(&self, version: usize, lo: usize, hi: usize) -> i64 {
        self.versions[version][lo - 1..hi].iter().sum()
    }

    fn push(&mut self, values: Vec<i64>) -> usize {
        self.versions.push(values);
        self.versions.len() - 1
    }
}

/// k-th smallest of `values[lo..=hi]` by sorting.
pub fn naive_kth(values: &[i64], lo: usize, hi: usize, k: usize) -> i64 {
    let mut window = values[lo - 1..hi].to_vec();
    window.sort_unstable();
    window[k - 1]
}

/// One mutating operation, with indices reduced modulo the array length
/// and the source version modulo the number of versions at apply time.
#[derive(Debug, Clone)]
pub enum Op {
    Assign { from: usize, index: usize, value: i64 },
    RangeAdd { from: usize, a: usize, b: usize, delta: i64 },
}

pub fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<usize>(), any::<usize>(), -1_000i64..1_000)
            .prop_map(|(from, index, value)| Op::Assign { from, index, value }),
        (any::<usize>(), any::<usize>(), any::<usize>(), -50i64..50)
            .prop_map(|(from, a, b, delta)| Op::RangeAdd { from, a, b, delta }),
    ]
}
