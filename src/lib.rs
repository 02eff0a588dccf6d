
pub mod data;
pub mod io;
pub mod miner;
pub mod model;

pub use data::{Item, Tid, Count, Itemvec, Itemset, Rule, SparseItemsets};
pub use model::{NbModel, NbFit};
pub use miner::{NbMiner, Parameters, MiningResult};

/// Mined associations that carry a precision score
pub trait Association {
    /// Share of the observed support that the null model cannot explain
    fn precision( &self ) -> f64;
}
