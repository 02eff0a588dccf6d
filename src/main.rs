
use clap::Parser;

use nbmine::*;
use nbmine::io::{read_transactions, write_result, produce_fimi};

/// Mines a FIMI transaction file for NB-frequent itemsets or NB-precise rules.
#[derive( Parser )]
#[command( about = "Depth-first miner for NB-frequent itemsets" )]
struct Cli {
    /// Transaction file in FIMI format, one transaction of space-separated items per line
    data: String,
    /// Precision threshold for accepting a count level
    #[arg( long, default_value_t = 0.9 )]
    pi: f64,
    /// Confirmations required per item of a candidate before it is frequent
    #[arg( long, default_value_t = 0.5 )]
    theta: f64,
    /// Dispersion of the null model per item incidence
    #[arg( long )]
    a: f64,
    /// Shape of the null model
    #[arg( long, default_value_t = 1.0 )]
    k: f64,
    /// Number of items to spread expected counts over, defaults to the data universe
    #[arg( long )]
    n: Option<usize>,
    /// Largest itemset size to mine
    #[arg( long, default_value_t = 5 )]
    maxlen: usize,
    /// Mine association rules instead of itemsets
    #[arg( long )]
    rules: bool,
    /// Report run statistics
    #[arg( long )]
    verbatim: bool,
    /// Trace every search node and model fit
    #[arg( long )]
    debug: bool,
    /// Write the result to this file as json
    #[arg( long )]
    output: Option<String>,
}

fn main() -> Result<(), String> {
    let cli = Cli::parse();
    prepare_logging( cli.debug );

    let database = read_transactions( &cli.data )?;
    let n = cli.n.unwrap_or( database.universe() );

    let mut params = Parameters::new( cli.pi, cli.theta, cli.a, cli.k, n, cli.maxlen );
    params.rules = cli.rules;
    params.verbatim = cli.verbatim;
    params.debug = cli.debug;

    let mut miner = NbMiner::new( params );
    let result = miner.mine( &database );

    print_result( &result );
    if let Some( path ) = &cli.output {
	write_result( &result, path )?;
    }
    Result::Ok( () )
}

fn print_result( result: &MiningResult ) {
    match result {
	MiningResult::Itemsets{ items, precision } => {
	    for (row, score) in items.rows().zip( precision.iter() ) {
		println!( "{} ({:.5})", produce_fimi( row.iter().copied(), " " ), score );
	    }
	},
	MiningResult::Rules{ antecedents, consequents, precision } => {
	    for ((lhs, rhs), score) in antecedents.rows().zip( consequents.rows() ).zip( precision.iter() ) {
		println!( "{} => {} ({:.5})", produce_fimi( lhs.iter().copied(), " " ), produce_fimi( rhs.iter().copied(), " " ), score );
	    }
	},
    }
}

fn prepare_logging( debug: bool ) {
    let level = if debug {
	tracing_subscriber::filter::LevelFilter::DEBUG
    } else {
	tracing_subscriber::filter::LevelFilter::INFO
    };
    let tracer = tracing_subscriber::fmt::fmt()
        .with_max_level( level )
        .finish();
    tracing::subscriber::set_global_default( tracer ).unwrap();
}
