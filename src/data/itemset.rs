
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::Association;
use super::{Item, Itemvec};

/// Immutable set of items kept in strictly ascending order.
///
/// Identity is defined by the items alone. The precision score and the
/// extension bookkeeping never enter comparisons or hashes.
#[derive( Debug, Clone )]
pub struct Itemset {
    items: Itemvec,
    /// share of the observed support that the null model cannot explain,
    /// -1.0 until a selection step computes it
    precision: f64,
    /// item this set was extended by, if it was built by extension
    current_item: Option<Item>,
}

/// Association rule with a single precision score for the whole rule.
#[derive( Debug, Clone )]
pub struct Rule {
    antecedent: Itemset,
    consequent: Itemset,
    precision: f64,
}

impl Itemset {

    /// Creates the empty itemset.
    pub fn new() -> Itemset {
	Itemset{ items: Itemvec::new(), precision: 1.0, current_item: None }
    }

    /// Creates an itemset holding a single item.
    pub fn singleton( item: Item ) -> Itemset {
	Itemset{ items: vec!( item ), precision: 1.0, current_item: Some( item ) }
    }

    /// Creates an itemset from items in any order. Repeated items collapse.
    pub fn from_items( mut items: Itemvec ) -> Itemset {
	items.sort_unstable();
	items.dedup();
	let precision = if items.len() <= 1 { 1.0 } else { -1.0 };
	Itemset{ items, precision, current_item: None }
    }

    /// Creates a new itemset with the item inserted at its sort position.
    /// Pre: the item is not contained yet.
    pub fn extend( &self, item: Item ) -> Itemset {
	let position = match self.items.binary_search( &item ) {
	    Err( position ) => position,
	    Ok( _ ) => panic!( "{self} already contains item {item}" ),
	};
	let mut items = Itemvec::with_capacity( self.items.len() + 1 );
	items.extend_from_slice( &self.items[ .. position ] );
	items.push( item );
	items.extend_from_slice( &self.items[ position .. ] );
	let precision = if self.items.is_empty() { 1.0 } else { -1.0 };
	Itemset{ items, precision, current_item: Some( item ) }
    }

    /// Extension that also records the precision computed for the larger set.
    pub fn extend_with_precision( &self, item: Item, precision: f64 ) -> Itemset {
	let mut extended = self.extend( item );
	extended.precision = precision;
	extended
    }

    pub fn is_empty( &self ) -> bool {
	self.items.is_empty()
    }

    pub fn size( &self ) -> usize {
	self.items.len()
    }

    /// Returns the item at the given position of the ascending order.
    pub fn get( &self, position: usize ) -> Item {
	self.items[ position ]
    }

    pub fn items( &self ) -> &[Item] {
	&self.items
    }

    /// Returns the item this set was last extended by.
    pub fn current_item( &self ) -> Option<Item> {
	self.current_item
    }

    pub fn contains_item( &self, item: Item ) -> bool {
	self.items.binary_search( &item ).is_ok()
    }

    /// Tests whether every item of the other set occurs in this set.
    pub fn contains( &self, other: &Itemset ) -> bool {
	if other.size() > self.size() {
	    return false;
	}
	other.items.iter().all( |item| self.contains_item( *item ))
    }
}

impl PartialEq for Itemset {
    fn eq( &self, other: &Itemset ) -> bool {
	self.items == other.items
    }
}

impl Eq for Itemset {}

impl Hash for Itemset {
    fn hash <H: Hasher> ( &self, state: &mut H ) {
	self.items.hash( state );
    }
}

impl Association for Itemset {
    fn precision( &self ) -> f64 {
	self.precision
    }
}

impl fmt::Display for Itemset {
    fn fmt( &self, formatter: &mut fmt::Formatter ) -> fmt::Result {
	let rendered: Vec<String> = self.items.iter().map( |item| item.to_string() ).collect();
	write!( formatter, "{{{}}}", rendered.join( ", " ))
    }
}

impl Rule {

    /// Creates a rule from antecedent to consequent.
    /// Pre: both sides hold at least one item.
    pub fn new( antecedent: Itemset, consequent: Itemset, precision: f64 ) -> Rule {
	assert!( !antecedent.is_empty(), "a rule needs a non-empty antecedent" );
	assert!( !consequent.is_empty(), "a rule needs a non-empty consequent" );
	Rule{ antecedent, consequent, precision }
    }

    pub fn antecedent( &self ) -> &Itemset {
	&self.antecedent
    }

    pub fn consequent( &self ) -> &Itemset {
	&self.consequent
    }
}

impl PartialEq for Rule {
    fn eq( &self, other: &Rule ) -> bool {
	self.antecedent == other.antecedent && self.consequent == other.consequent
    }
}

impl Eq for Rule {}

impl Hash for Rule {
    fn hash <H: Hasher> ( &self, state: &mut H ) {
	self.antecedent.hash( state );
	self.consequent.hash( state );
    }
}

impl Association for Rule {
    fn precision( &self ) -> f64 {
	self.precision
    }
}

impl fmt::Display for Rule {
    fn fmt( &self, formatter: &mut fmt::Formatter ) -> fmt::Result {
	write!( formatter, "{} => {}", self.antecedent, self.consequent )
    }
}
