use super::dynamic::{Optimum, Params, Solver};
use knap_challenges::{knapsack::Challenge, KnapsackError};
use log::{info, warn};
use rayon::prelude::*;
use std::sync::atomic::AtomicBool;

/// Solves independent challenges, in parallel on the rayon pool when
/// `parallel` is set. Results keep the order of `challenges` and a failure
/// only occupies its own slot.
pub fn solve_batch(
    challenges: &[Challenge],
    params: &Params,
    parallel: bool,
    stop_flag: Option<&AtomicBool>,
) -> Vec<Result<Optimum, KnapsackError>> {
    info!(
        "[BATCH] solving {} challenges ({})",
        challenges.len(),
        if parallel { "parallel" } else { "sequential" }
    );

    let results: Vec<_> = if parallel {
        challenges
            .par_iter()
            .map(|challenge| Solver::solve(challenge, params, stop_flag))
            .collect()
    } else {
        challenges
            .iter()
            .map(|challenge| Solver::solve(challenge, params, stop_flag))
            .collect()
    };

    let num_failed = results.iter().filter(|r| r.is_err()).count();
    if num_failed > 0 {
        warn!("[BATCH] {}/{} challenges failed", num_failed, results.len());
    }
    results
}
