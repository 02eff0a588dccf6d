
use bit_set::BitSet;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info};

use crate::data::{Count, Itemset, Rule, SparseItemsets, Tid};
use crate::model::NbModel;

mod result;

pub use result::MiningResult;

/// Caller-facing knobs of a mining run.
#[derive( Debug, Clone )]
pub struct Parameters {
    /// precision threshold for accepting a count level
    pub pi: f64,
    /// confirmations required per item of a candidate before it is frequent
    pub theta: f64,
    /// dispersion of the null model per item incidence
    pub a: f64,
    /// shape of the null model
    pub k: f64,
    /// number of items the expected counts are spread over
    pub n: usize,
    /// largest itemset size to mine
    pub maxlen: usize,
    /// mine association rules instead of itemsets
    pub rules: bool,
    /// report run statistics
    pub verbatim: bool,
    /// trace every search node and model fit
    pub debug: bool,
}

/// Depth-first miner for NB-frequent itemsets and NB-precise rules.
///
/// Candidates enter the result only after enough independent confirmations,
/// which the repository counts across the whole traversal.
pub struct NbMiner {
    params: Parameters,
    /// itemsets shrink by one item when rules are requested
    maxlen: usize,
    model: NbModel,
    /// confirmation count per proposed candidate
    repository: FxHashMap<Itemset, Count>,
    frequent_sets: FxHashSet<Itemset>,
    frequent_rules: FxHashSet<Rule>,
}

impl Parameters {

    /// Creates parameters for mining itemsets without diagnostics.
    pub fn new( pi: f64, theta: f64, a: f64, k: f64, n: usize, maxlen: usize ) -> Parameters {
	Parameters{ pi, theta, a, k, n, maxlen, rules: false, verbatim: false, debug: false }
    }
}

impl NbMiner {

    pub fn new( params: Parameters ) -> NbMiner {
	// rules grow from an itemset by one consequent item
	let maxlen = if params.rules { params.maxlen.saturating_sub( 1 ) } else { params.maxlen };
	let model = NbModel::new( params.k, params.a, params.n, params.pi );
	NbMiner{
	    params,
	    maxlen,
	    model,
	    repository: FxHashMap::default(),
	    frequent_sets: FxHashSet::default(),
	    frequent_rules: FxHashSet::default(),
	}
    }

    /// Runs the depth-first search and packages the surviving associations.
    pub fn mine( &mut self, database: &SparseItemsets ) -> MiningResult {
	// a fresh run must not see confirmations of an earlier one
	self.repository.clear();
	self.frequent_sets.clear();
	self.frequent_rules.clear();

	if self.params.verbatim {
	    info!( "mining {database}" );
	    info!( "null model with k = {}, a = {}, counts spread over {} items", self.params.k, self.params.a, self.params.n );
	}

	let all_tids: Vec<Tid> = (0 .. database.size()).collect();
	self.dfs( database, &Itemset::new(), Some( all_tids ));

	if self.params.verbatim {
	    if self.params.rules {
		info!( "{} NB-precise rules found", self.frequent_rules.len() );
	    } else {
		info!( "{} NB-frequent itemsets found", self.frequent_sets.len() );
	    }
	}

	if self.params.rules {
	    MiningResult::from_rules( &self.frequent_rules, database.universe() )
	} else {
	    MiningResult::from_itemsets( &self.frequent_sets, database.universe() )
	}
    }

    /// Number of times the candidate was proposed over the whole search.
    pub fn repository_count( &self, candidate: &Itemset ) -> Count {
	self.repository.get( candidate ).copied().unwrap_or( 0 )
    }

    pub fn iterate_frequent_itemsets<'a>( &'a self ) -> Box<dyn Iterator<Item = &'a Itemset> + 'a> {
	Box::new( self.frequent_sets.iter() )
    }

    pub fn iterate_frequent_rules<'a>( &'a self ) -> Box<dyn Iterator<Item = &'a Rule> + 'a> {
	Box::new( self.frequent_rules.iter() )
    }

    /// Expands one search node: projects the database onto the prefix,
    /// selects extension candidates and recurses into the confirmed ones.
    fn dfs( &mut self, database: &SparseItemsets, prefix: &Itemset, tidlist: Option<Vec<Tid>> ) {
	if self.params.debug {
	    debug!( "DFS for {prefix}" );
	}
	let tids = match tidlist {
	    Some( tids ) => tids,
	    None => {
		if self.params.debug {
		    debug!( "{prefix} does not occur in any transaction - dropped" );
		}
		return;
	    },
	};

	// count items in the covered transactions, skipping the prefix itself
	let mut counter: Vec<Count> = vec![ 0; database.universe() ];
	let mut tidlists: Vec<Option<Vec<Tid>>> = vec![ None; database.universe() ];
	let mut prefix_mask = BitSet::with_capacity( database.universe() );
	for item in prefix.items() {
	    prefix_mask.insert( *item );
	}
	for &tid in &tids {
	    for &item in database.row( tid ) {
		if prefix_mask.contains( item ) {
		    continue;
		}
		counter[ item ] += 1;
		tidlists[ item ].get_or_insert_with( Vec::new ).push( tid );
	    }
	}

	let candidates = if prefix.is_empty() {
	    // the root accepts every item to bootstrap the search
	    let singletons: Vec<Itemset> = (0 .. database.universe()).map( Itemset::singleton ).collect();
	    if self.params.debug {
		debug!( "added {} items for the initial run", singletons.len() );
	    }
	    singletons
	} else {
	    self.nb_select( &counter, prefix )
	};

	for candidate in candidates {
	    let count = self.confirm( &candidate );
	    if self.params.debug {
		debug!( "{candidate} - count in repository: {count}" );
	    }

	    let size = candidate.size();
	    if count as f64 >= self.params.theta * size as f64
		&& size <= self.maxlen
		&& !self.frequent_sets.contains( &candidate )
	    {
		let current = candidate.current_item().expect( "candidates carry their extension item" );
		if size > 1 {
		    // singletons bootstrap the search but are no results
		    self.frequent_sets.insert( candidate.clone() );
		    if self.params.debug {
			debug!( "{candidate} - is NB-frequent" );
		    }
		}
		let sublist = tidlists[ current ].take();
		self.dfs( database, &candidate, sublist );
	    }
	}
    }

    /// Selects extensions of the prefix whose counts the null model cannot explain.
    fn nb_select( &mut self, counter: &[Count], prefix: &Itemset ) -> Vec<Itemset> {
	let fit = self.model.fit( counter, prefix.size() );
	if self.params.debug {
	    debug!( "NBSelect for l = {prefix}" );
	    self.model.log_fit( &fit );
	}

	if !fit.has_cooccurrence() {
	    if self.params.debug {
		debug!( "no item occurs twice - nothing to select" );
	    }
	    return Vec::new();
	}

	let mut candidates = Vec::new();
	for (item, &count) in counter.iter().enumerate() {
	    // the cutoff can drop below zero, which would re-admit prefix members
	    if prefix.contains_item( item ) {
		continue;
	    }
	    if fit.selects( count ) {
		let precision = fit.precision_at( count );
		candidates.push( prefix.extend_with_precision( item, precision ));
		if self.params.rules {
		    // rules need no repeated confirmation and are kept right away
		    self.frequent_rules.insert( Rule::new( prefix.clone(), Itemset::singleton( item ), precision ));
		}
	    }
	}
	if self.params.debug {
	    debug!( "selected {} item(s) with count above {}", candidates.len(), fit.rho() );
	}
	candidates
    }

    /// Raises the candidate's confirmation count by one and returns it.
    fn confirm( &mut self, candidate: &Itemset ) -> Count {
	let count = self.repository.entry( candidate.clone() ).or_insert( 0 );
	*count += 1;
	*count
    }
}
