
use rustc_hash::FxHashSet;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::Association;
use crate::data::{Item, Itemset, Rule, SparseItemsets};

/// Mining outcome in the same sparse layout as the input database.
///
/// Rows and precision scores are parallel: the score at position i belongs
/// to the association stored in row i.
#[derive( Debug, Clone )]
pub enum MiningResult {
    /// NB-frequent itemsets with their precision scores
    Itemsets{ items: SparseItemsets, precision: Vec<f64> },
    /// NB-precise rules, antecedent and consequent rows in matching order
    Rules{ antecedents: SparseItemsets, consequents: SparseItemsets, precision: Vec<f64> },
}

impl MiningResult {

    /// Packages frequent itemsets, one row per set.
    pub fn from_itemsets( sets: &FxHashSet<Itemset>, universe: usize ) -> MiningResult {
	// a single pass over the set keeps rows and scores aligned
	let ordered: Vec<&Itemset> = sets.iter().collect();
	let precision = collect_precision( &ordered );
	let items = SparseItemsets::from_itemsets( ordered.iter().copied(), universe );
	MiningResult::Itemsets{ items, precision }
    }

    /// Packages rules as two row collections of matching order.
    pub fn from_rules( rules: &FxHashSet<Rule>, universe: usize ) -> MiningResult {
	let ordered: Vec<&Rule> = rules.iter().collect();
	let precision = collect_precision( &ordered );
	let antecedents = SparseItemsets::from_itemsets( ordered.iter().map( |rule| rule.antecedent() ), universe );
	let consequents = SparseItemsets::from_itemsets( ordered.iter().map( |rule| rule.consequent() ), universe );
	MiningResult::Rules{ antecedents, consequents, precision }
    }

    /// Number of mined associations.
    pub fn len( &self ) -> usize {
	match self {
	    MiningResult::Itemsets{ precision, .. } => precision.len(),
	    MiningResult::Rules{ precision, .. } => precision.len(),
	}
    }

    pub fn is_empty( &self ) -> bool {
	self.len() == 0
    }

    pub fn precision( &self ) -> &[f64] {
	match self {
	    MiningResult::Itemsets{ precision, .. } => precision,
	    MiningResult::Rules{ precision, .. } => precision,
	}
    }
}

fn collect_precision <A: Association> ( associations: &[&A] ) -> Vec<f64> {
    associations.iter().map( |association| association.precision() ).collect()
}

fn rows_of( sets: &SparseItemsets ) -> Vec<&[Item]> {
    sets.rows().collect()
}

impl Serialize for MiningResult {
    fn serialize <S: Serializer> ( &self, serializer: S ) -> Result<S::Ok, S::Error> {
	match self {
	    MiningResult::Itemsets{ items, precision } => {
		let mut map = serializer.serialize_map( Some( 2 ))?;
		map.serialize_entry( "itemsets", &rows_of( items ))?;
		map.serialize_entry( "precision", precision )?;
		map.end()
	    },
	    MiningResult::Rules{ antecedents, consequents, precision } => {
		let mut map = serializer.serialize_map( Some( 3 ))?;
		map.serialize_entry( "lhs", &rows_of( antecedents ))?;
		map.serialize_entry( "rhs", &rows_of( consequents ))?;
		map.serialize_entry( "precision", precision )?;
		map.end()
	    },
	}
    }
}
