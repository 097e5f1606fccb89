pub mod batch;
pub mod dynamic;

pub use dynamic::{DpTable, Optimum, Params, Solver};
use knap_challenges::{knapsack::Challenge, KnapsackError};

/// Solves the 0/1 knapsack problem for parallel `values` and `weights` under
/// `capacity`.
///
/// Input is validated before any table is built: differing lengths fail with
/// [`KnapsackError::ShapeMismatch`], negative numbers with the matching
/// `Negative*` error. The returned selection is in ascending index order.
pub fn solve(values: &[i64], weights: &[i64], capacity: i64) -> Result<Optimum, KnapsackError> {
    let challenge = Challenge::from_signed(values, weights, capacity)?;
    Solver::solve(&challenge, &Params::default(), None)
}
