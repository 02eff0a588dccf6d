
pub type Item = usize;
pub type Count = u64;
pub type Itemvec = Vec<Item>;

/// Position of a transaction in the database
pub type Tid = usize;

mod itemset;
mod sparse;

pub use itemset::{Itemset, Rule};
pub use sparse::SparseItemsets;
