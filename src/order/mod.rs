//! Order statistics on top of the persistent tree
//!
//! Raw values enter through a [`Discretizer`] that maps them to dense ranks;
//! the [`OrderStatisticTree`] keeps one prefix version per input value and
//! answers range queries from the difference of two of them.

mod discretizer;
mod prefix;

pub use discretizer::Discretizer;
pub use prefix::OrderStatisticTree;
