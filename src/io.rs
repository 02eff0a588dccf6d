use std::path::Path;
use std::fs::File;
use std::io::{BufReader, BufRead, Write};

use serde_json as json;

use bit_set::BitSet;

use crate::data::{Item, Itemset, SparseItemsets};
use crate::miner::MiningResult;

pub type DataGenerator<T> = Box<dyn Iterator<Item = T>>;

/// Reads data in FIMI format. Creates data using the converter, which is given a line
pub fn read_data<T, F>( path: &str, converter: F ) -> Result<DataGenerator<T>, String> where
    F: Fn(&str) -> Option<T> + 'static,
{
    let path = Path::new( path );
    let file = File::open( path ).map_err( |e| e.to_string() )?;
    let reader = BufReader::new( file );
    let generator = reader.lines()
        .filter_map( |l| l.ok() )
        .filter_map( move |l| converter( &l ));
    Result::Ok( Box::new( generator ))
}

/// Parses numbers separated by splitter into an itemset. Repeated items collapse.
pub fn parse_fimi_to_itemset( line: &str, splitter: &str ) -> Option<Itemset> {
    let mut items = BitSet::new();
    for chunk in line.split( splitter ) {
	match Item::from_str_radix( chunk, 10 ) {
	    Ok( item ) => { items.insert( item ); },
	    Err( _ ) => return None,
	}
    }
    Some( Itemset::from_items( items.iter().collect() ))
}

/// Reads a FIMI transaction file into a sparse database over the smallest
/// universe that encloses all items. Lines that fail to parse are skipped.
pub fn read_transactions( path: &str ) -> Result<SparseItemsets, String> {
    let generator = read_data( path, |line| parse_fimi_to_itemset( line, " " ))?;
    let transactions: Vec<Itemset> = generator.collect();
    let universe = transactions.iter()
	.filter_map( |transaction| transaction.items().last().copied() )
	.max()
	.map_or( 0, |greatest| greatest + 1 );
    Ok( SparseItemsets::from_itemsets( transactions.iter(), universe ))
}

/// Creates a fimi string from an iterator over items
pub fn produce_fimi <I: Iterator<Item = Item>> ( items: I, separator: &str ) -> String {
    let rendered: Vec<String> = items.map( |item| item.to_string() ).collect();
    rendered.join( separator )
}

/// Writes a mining result to a file as json
pub fn write_result( result: &MiningResult, path: &str ) -> Result<(), String> {
    match json::to_string( result ) {
	json::Result::Ok( result_string ) => {
	    let path = Path::new( path );
	    let mut file = File::create( path ).map_err( |err| err.to_string() )?;
	    write!( file, "{}", result_string ).map_err( |err| err.to_string() )
	},
	json::Result::Err( err ) => Result::Err( err.to_string() ),
    }
}

#[cfg(test)]
mod test {

    use std::fs;

    use super::*;

    #[test]
    fn test_parse_fimi_lines() {
	let parsed = parse_fimi_to_itemset( "1 18 3 44", " " ).expect( "line is well formed" );
	assert_eq!( parsed, Itemset::from_items( vec!( 1, 3, 18, 44 )));

	let collapsed = parse_fimi_to_itemset( "1 1 2", " " ).expect( "line is well formed" );
	assert_eq!( collapsed.items(), &[ 1, 2 ] );

	assert!( parse_fimi_to_itemset( "1 a 2", " " ).is_none() );
	assert!( parse_fimi_to_itemset( "", " " ).is_none() );
    }

    #[test]
    fn test_produce_fimi_lines() {
	assert_eq!( produce_fimi( vec!( 1, 2, 3 ).into_iter(), " " ), "1 2 3" );
	assert_eq!( produce_fimi( Vec::new().into_iter(), " " ), "" );
    }

    #[test]
    fn test_transaction_file_round_trip() {
	let path = std::env::temp_dir().join( format!( "nbmine_io_test_{}.fimi", std::process::id() ));
	let path = path.to_str().expect( "temp path is valid unicode" );
	fs::write( path, "1 2\n2 3 3\nnot a transaction\n1\n" ).expect( "can write temp file" );

	let database = read_transactions( path ).expect( "file exists" );
	fs::remove_file( path ).expect( "file still exists" );

	assert_eq!( database.size(), 3 );
	assert_eq!( database.universe(), 4 );
	assert_eq!( database.row( 0 ), &[ 1, 2 ] );
	assert_eq!( database.row( 1 ), &[ 2, 3 ] );
	assert_eq!( database.row( 2 ), &[ 1 ] );
    }

    #[test]
    fn test_missing_file_is_an_error() {
	assert!( read_transactions( "/nonexistent/transactions.fimi" ).is_err() );
    }
}
