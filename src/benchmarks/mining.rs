use tracing::info;
use tracing_subscriber;

use rand::prelude::*;
use statrs::distribution::DiscreteUniform;

use std::time::*;

use nbmine::*;

fn main() {
    prepare_logging();

    let universe = 60;
    let patterns = vec!(
	vec!( 3, 11, 27 ),
	vec!( 5, 40 ),
	vec!( 18, 19, 20, 21 ),
    );
    let transactions = generate_transactions( 5000, universe, &patterns );
    let database = SparseItemsets::from_itemsets( transactions.iter(), universe );
    info!( "generated {database}" );

    benchmark_itemsets( &database );
    benchmark_rules( &database );
}

fn benchmark_itemsets( database: &SparseItemsets ) {
    info!( "Start benchmark: itemset mining" );
    let mut params = Parameters::new( 0.99, 0.5, 1e-4, 1.0, database.universe(), 5 );
    params.verbatim = true;
    let mut miner = NbMiner::new( params );

    let start = Instant::now();
    let result = miner.mine( database );
    let time = Instant::now().duration_since( start );
    info!( "Result: mining {} itemsets took {}ms", result.len(), time.as_millis() );
}

fn benchmark_rules( database: &SparseItemsets ) {
    info!( "Start benchmark: rule mining" );
    let mut params = Parameters::new( 0.99, 0.5, 1e-4, 1.0, database.universe(), 5 );
    params.rules = true;
    params.verbatim = true;
    let mut miner = NbMiner::new( params );

    let start = Instant::now();
    let result = miner.mine( database );
    let time = Instant::now().duration_since( start );
    info!( "Result: mining {} rules took {}ms", result.len(), time.as_millis() );
}

/// Plants each pattern into a share of the transactions and sprinkles
/// uniformly drawn noise items on top.
fn generate_transactions( count: usize, universe: usize, patterns: &[Itemvec] ) -> Vec<Itemset> {
    let mut gen = thread_rng();
    let pattern_distribution = DiscreteUniform::new( 0, patterns.len() as i64 - 1 ).unwrap();
    let noise_length_distribution = DiscreteUniform::new( 1, 4 ).unwrap();
    let item_distribution = DiscreteUniform::new( 0, universe as i64 - 1 ).unwrap();

    let mut transactions = Vec::with_capacity( count );
    for _ in 0 .. count {
	let mut items = Itemvec::new();
	if gen.gen_bool( 0.4 ) {
	    let pattern = pattern_distribution.sample( &mut gen ) as usize;
	    items.extend_from_slice( &patterns[ pattern ] );
	}
	let noise_length = noise_length_distribution.sample( &mut gen ) as usize;
	for _ in 0 .. noise_length {
	    items.push( item_distribution.sample( &mut gen ) as usize );
	}
	transactions.push( Itemset::from_items( items ));
    }
    transactions
}

fn prepare_logging() {
    let tracer = tracing_subscriber::fmt::fmt()
        .with_max_level( tracing_subscriber::filter::LevelFilter::INFO )
        .finish();
    tracing::subscriber::set_global_default( tracer ).unwrap();
}
