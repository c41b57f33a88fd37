//! Query engine
//!
//! Readers take `&NodeArena` and never allocate or push tags down; a read
//! of a published version gives the same answer no matter what was
//! derived from it afterwards.

mod order;
mod range;

pub use order::{combined_count, kth_between, kth_combined};
pub use range::{materialize, node_covering, point_value, range_sum};
