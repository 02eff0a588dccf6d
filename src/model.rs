
use tracing::debug;

use crate::data::Count;

/// Negative-binomial null model for item counts in a projected database.
///
/// Observed co-occurrence counts are compared against the counts a
/// Gamma-mixed Poisson process of the same volume would produce.
#[derive( Debug, Clone )]
pub struct NbModel {
    /// shape of the Gamma mixing distribution
    k: f64,
    /// scale of the Gamma mixing distribution per item incidence
    a: f64,
    /// number of items the expected counts are spread over
    n: usize,
    /// precision threshold for accepting a count level
    pi: f64,
}

/// Outcome of fitting the null model to one counter array.
#[derive( Debug, Clone )]
pub struct NbFit {
    /// observed number of items per count level
    n_obs: Vec<Count>,
    /// expected number of items per count level, residual mass in the last cell
    n_model: Vec<f64>,
    /// precision per count level, only filled for scanned levels
    precision: Vec<f64>,
    /// greatest observed count
    r_max: usize,
    /// greatest count level that fails the precision threshold, -1 if none fails
    rho: i64,
    /// total number of item incidences behind the counter
    incidences: Count,
}

impl NbModel {

    pub fn new( k: f64, a: f64, n: usize, pi: f64 ) -> NbModel {
	NbModel{ k, a, n, pi }
    }

    /// Fits the model to the item counts of a database projected onto a prefix.
    ///
    /// The dispersion is rescaled by the total incidence mass and the expected
    /// counts are spread over the n items minus the prefix members.
    pub fn fit( &self, counter: &[Count], prefix_size: usize ) -> NbFit {
	let mut greatest: Count = 0;
	let mut incidences: Count = 0;
	for &count in counter {
	    if count > greatest {
		greatest = count;
	    }
	    incidences += count;
	}
	let r_max = greatest as usize;

	let mut n_obs: Vec<Count> = vec![ 0; r_max + 1 ];
	for &count in counter {
	    n_obs[ count as usize ] += 1;
	}

	let a_rescaled = self.a * incidences as f64;
	let n_rescaled = self.n as f64 - prefix_size as f64;

	// the last cell starts with the full mass and keeps the residual tail
	let mut n_model: Vec<f64> = vec![ 0.0; r_max + 1 ];
	n_model[ r_max ] = n_rescaled;
	n_model[ 0 ] = n_rescaled * (1.0 + a_rescaled).powf( -self.k );
	n_model[ r_max ] -= n_model[ 0 ];
	for r in 0 .. r_max.saturating_sub( 1 ) {
	    n_model[ r + 1 ] = (self.k + r as f64) / (r as f64 + 1.0) * a_rescaled / (1.0 + a_rescaled) * n_model[ r ];
	    n_model[ r_max ] -= n_model[ r + 1 ];
	}

	// scan downward until a level fails the threshold
	let mut precision: Vec<f64> = vec![ 0.0; r_max + 1 ];
	let mut rho: i64 = r_max as i64;
	let mut sum_obs: Count = 0;
	let mut sum_model = 0.0;
	loop {
	    let r = rho as usize;
	    sum_obs += n_obs[ r ];
	    sum_model += n_model[ r ];
	    precision[ r ] = 1.0 - sum_model / sum_obs as f64;
	    // a NaN precision, as on levels without observations, fails the threshold
	    if !( precision[ r ] >= self.pi ) {
		break;
	    }
	    rho -= 1;
	    if rho < 0 {
		break;
	    }
	}

	NbFit{ n_obs, n_model, precision, r_max, rho, incidences }
    }

    /// Writes the fitted count table to the log.
    pub fn log_fit( &self, fit: &NbFit ) {
	debug!( "k: {}", self.k );
	debug!( "item co-occurrences: {}", fit.incidences );
	debug!( "a (rescaled): {}", self.a * fit.incidences as f64 );
	debug!( "r_max: {}", fit.r_max );
	debug!( "pi: {}", self.pi );
	debug!( "r\tn_obs\tn_model\tprecision" );
	let floor = if fit.rho >= 0 { fit.rho as usize } else { 0 };
	for r in (floor ..= fit.r_max).rev() {
	    debug!( "{}\t{}\t{:.5}\t{:.5}", r, fit.n_obs[ r ], fit.n_model[ r ], fit.precision[ r ] );
	}
    }
}

impl NbFit {

    /// Greatest observed count.
    pub fn r_max( &self ) -> usize {
	self.r_max
    }

    /// Count cutoff: levels above it passed the precision threshold.
    pub fn rho( &self ) -> i64 {
	self.rho
    }

    /// Whether any item was observed at least twice.
    pub fn has_cooccurrence( &self ) -> bool {
	self.r_max >= 2
    }

    /// Whether an item with this count lies above the cutoff.
    pub fn selects( &self, count: Count ) -> bool {
	count as i64 > self.rho
    }

    /// Precision of the count level. Meaningful for selected counts only.
    pub fn precision_at( &self, count: Count ) -> f64 {
	self.precision[ count as usize ]
    }
}

#[cfg(test)]
mod test {

    use statrs::distribution::{Discrete, NegativeBinomial};

    use super::*;

    // is there a better place for this?
    macro_rules! assert_approx {
	($real:expr, $expected:expr, $delta:expr) => {
	    if $real < $expected - $delta || $real > $expected + $delta {
		panic!( "Violate {:.4} == {:.4} (+-{:.4})", $real, $expected, $delta );
	    }
	}
    }

    /// Four items, two of them counted twice, prefix of size one.
    /// Values follow the recurrence by hand.
    #[test]
    fn test_fit_small_example() {
	let model = NbModel::new( 1.0, 0.01, 4, 0.9 );
	let fit = model.fit( &[ 0, 0, 2, 2 ], 1 );

	assert_eq!( fit.r_max(), 2 );
	assert_eq!( fit.incidences, 4 );
	assert_eq!( fit.n_obs, vec!( 2, 0, 2 ));
	assert_approx!( fit.n_model[ 0 ], 2.8846153846153846, 1e-9 );
	assert_approx!( fit.n_model[ 1 ], 0.11094674556213018, 1e-9 );
	assert_approx!( fit.n_model[ 2 ], 0.004437869822485207, 1e-9 );

	assert_eq!( fit.rho(), 0 );
	assert_approx!( fit.precision[ 2 ], 0.9977810650887574, 1e-9 );
	assert_approx!( fit.precision[ 1 ], 0.9423076923076923, 1e-9 );
	assert_approx!( fit.precision[ 0 ], 0.25, 1e-9 );

	assert!( fit.has_cooccurrence() );
	assert!( fit.selects( 2 ));
	assert!( !fit.selects( 0 ));
	assert_approx!( fit.precision_at( 2 ), 0.9977810650887574, 1e-9 );
    }

    /// The expected counts match the negative binomial pmf up to the
    /// residual cell, which holds the remaining tail mass.
    #[test]
    fn test_fit_matches_negative_binomial() {
	let k = 1.7;
	let a = 0.02;
	let counter = vec!( 5, 4, 3, 2, 1, 0, 0, 0 );
	let model = NbModel::new( k, a, 100, 0.9 );
	let fit = model.fit( &counter, 2 );

	let incidences: Count = counter.iter().sum();
	let a_rescaled = a * incidences as f64;
	let success = 1.0 / (1.0 + a_rescaled);
	let reference = NegativeBinomial::new( k, success ).unwrap();

	assert_eq!( fit.r_max(), 5 );
	let mut tail = 98.0;
	for r in 0 .. fit.r_max() {
	    let expected = 98.0 * reference.pmf( r as u64 );
	    assert_approx!( fit.n_model[ r ], expected, 1e-9 );
	    tail -= expected;
	}
	assert_approx!( fit.n_model[ fit.r_max() ], tail, 1e-9 );
    }

    /// Without repeated co-occurrence there is nothing to select.
    #[test]
    fn test_degenerate_counts() {
	let model = NbModel::new( 1.0, 0.01, 4, 0.9 );

	let flat = model.fit( &[ 1, 1, 0, 1 ], 1 );
	assert_eq!( flat.r_max(), 1 );
	assert!( !flat.has_cooccurrence() );

	let empty = model.fit( &[ 0, 0, 0 ], 1 );
	assert_eq!( empty.r_max(), 0 );
	assert!( !empty.has_cooccurrence() );
	assert_eq!( empty.rho(), -1 );
    }

    /// When every level passes the threshold the cutoff drops below zero
    /// and even unobserved items count as selected.
    #[test]
    fn test_full_pass_drops_cutoff_below_zero() {
	let mut counter = vec![ 0; 10 ];
	counter[ 1 ] = 3;
	counter[ 2 ] = 3;
	let model = NbModel::new( 1.0, 0.01, 2, 0.5 );
	let fit = model.fit( &counter, 1 );

	assert_eq!( fit.r_max(), 3 );
	assert_eq!( fit.rho(), -1 );
	assert!( fit.selects( 0 ));
	assert_approx!( fit.precision_at( 0 ), 0.9, 1e-9 );
	assert_approx!( fit.precision_at( 3 ), 0.99990933, 1e-7 );
    }
}
