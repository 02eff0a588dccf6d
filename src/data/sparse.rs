
use std::fmt;

use super::{Item, Itemvec, Itemset};

/// Compressed sparse row storage of a fixed collection of itemsets.
///
/// Row t of the index array spans index[ offsets[t] .. offsets[t+1] ].
/// Transaction databases and mining results share this layout.
#[derive( Debug, Clone )]
pub struct SparseItemsets {
    /// concatenated rows of items
    index: Itemvec,
    /// row delimiters, one more entry than there are rows
    offsets: Vec<usize>,
    /// number of item identifiers the rows draw from
    universe: usize,
}

impl SparseItemsets {

    /// Builds the sparse set from its raw arrays.
    /// Pre: offsets delimit the index array and all items lie in the universe.
    pub fn from_raw( index: Itemvec, offsets: Vec<usize>, universe: usize ) -> SparseItemsets {
	assert!( offsets.first() == Some( &0 ), "offsets must start at zero" );
	assert!( *offsets.last().expect( "checked non-empty" ) == index.len(), "the last offset must close the index array" );
	for window in offsets.windows( 2 ) {
	    assert!( window[ 0 ] <= window[ 1 ], "offsets must not decrease" );
	}
	for item in &index {
	    assert!( *item < universe, "item {item} lies outside the universe of {universe} items" );
	}
	SparseItemsets{ index, offsets, universe }
    }

    /// Compresses a collection of itemsets, keeping their order.
    pub fn from_itemsets <'a, C> ( sets: C, universe: usize ) -> SparseItemsets where
	C: IntoIterator<Item = &'a Itemset>
    {
	let mut index = Itemvec::new();
	let mut offsets = vec!( 0 );
	for set in sets {
	    index.extend_from_slice( set.items() );
	    offsets.push( index.len() );
	}
	SparseItemsets::from_raw( index, offsets, universe )
    }

    /// Materializes the itemset at the given row as a fresh copy.
    pub fn get_itemset( &self, position: usize ) -> Itemset {
	Itemset::from_items( self.row( position ).to_vec() )
    }

    /// Borrows the raw item slice of one row.
    pub fn row( &self, position: usize ) -> &[Item] {
	&self.index[ self.offsets[ position ] .. self.offsets[ position + 1 ] ]
    }

    /// Iterates all rows as raw item slices.
    pub fn rows( &self ) -> impl Iterator<Item = &[Item]> {
	(0 .. self.size()).map( |position| self.row( position ))
    }

    /// Number of stored itemsets.
    pub fn size( &self ) -> usize {
	self.offsets.len() - 1
    }

    /// Number of item identifiers the rows draw from.
    pub fn universe( &self ) -> usize {
	self.universe
    }

    /// Total number of item occurrences over all rows.
    pub fn incidences( &self ) -> usize {
	self.index.len()
    }

    pub fn index( &self ) -> &[Item] {
	&self.index
    }

    pub fn offsets( &self ) -> &[usize] {
	&self.offsets
    }
}

impl fmt::Display for SparseItemsets {
    fn fmt( &self, formatter: &mut fmt::Formatter ) -> fmt::Result {
	write!( formatter, "Sparse set of {} itemsets ({} items)", self.size(), self.universe )
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_compression_round_trip() {
	let sets = vec!(
	    Itemset::from_items( vec!( 1, 18, 3, 44, 5 )),
	    Itemset::from_items( vec!( 1, 3, 18, 44 )),
	    Itemset::new(),
	    Itemset::singleton( 49 ),
	);
	let sparse = SparseItemsets::from_itemsets( sets.iter(), 50 );

	assert_eq!( sparse.size(), 4 );
	assert_eq!( sparse.universe(), 50 );
	assert_eq!( sparse.incidences(), 10 );
	for (position, set) in sets.iter().enumerate() {
	    assert_eq!( sparse.get_itemset( position ), *set );
	}
	assert_eq!( sparse.row( 2 ).len(), 0 );
	assert_eq!( format!( "{sparse}" ), "Sparse set of 4 itemsets (50 items)" );
    }

    #[test]
    fn test_raw_arrays() {
	let sparse = SparseItemsets::from_raw( vec!( 0, 2, 1 ), vec!( 0, 2, 2, 3 ), 3 );
	assert_eq!( sparse.size(), 3 );
	assert_eq!( sparse.row( 0 ), &[ 0, 2 ] );
	assert_eq!( sparse.row( 1 ).len(), 0 );
	assert_eq!( sparse.row( 2 ), &[ 1 ] );
	assert_eq!( sparse.index(), &[ 0, 2, 1 ] );
	assert_eq!( sparse.offsets(), &[ 0, 2, 2, 3 ] );
    }

    #[test]
    #[should_panic]
    fn test_offsets_must_start_at_zero() {
	SparseItemsets::from_raw( vec!( 0, 1 ), vec!( 1, 2 ), 2 );
    }

    #[test]
    #[should_panic]
    fn test_offsets_must_not_decrease() {
	SparseItemsets::from_raw( vec!( 0, 1 ), vec!( 0, 2, 1, 2 ), 2 );
    }

    #[test]
    #[should_panic]
    fn test_items_must_lie_in_universe() {
	SparseItemsets::from_raw( vec!( 0, 5 ), vec!( 0, 2 ), 5 );
    }
}
