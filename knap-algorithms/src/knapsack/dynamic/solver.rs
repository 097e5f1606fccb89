use super::{params::Params, table::DpTable};
use knap_challenges::{
    knapsack::{Challenge, Solution},
    KnapsackError,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::atomic::AtomicBool;

/// Optimal value together with the selection that attains it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Optimum {
    pub value: u64,
    pub solution: Solution,
}

impl Optimum {
    pub fn items(&self) -> &[usize] {
        &self.solution.items
    }
}

pub struct Solver;

impl Solver {
    pub fn solve(
        challenge: &Challenge,
        params: &Params,
        stop_flag: Option<&AtomicBool>,
    ) -> Result<Optimum, KnapsackError> {
        Self::solve_with_table(challenge, params, stop_flag).map(|(optimum, _)| optimum)
    }

    /// Same as [`Solver::solve`], but hands back the filled table as well.
    pub fn solve_with_table(
        challenge: &Challenge,
        params: &Params,
        stop_flag: Option<&AtomicBool>,
    ) -> Result<(Optimum, DpTable), KnapsackError> {
        debug!(
            "[DP] solving {} items with capacity {}",
            challenge.num_items(),
            challenge.capacity()
        );
        let mut table = DpTable::allocate(
            challenge.num_items(),
            challenge.capacity(),
            params.max_table_cells,
        )?;
        table.fill(challenge, stop_flag, params.progress_interval)?;

        let items = table.backtrace(challenge);
        let value = table.optimum();
        debug!("[DP] optimum {} with {} items selected", value, items.len());

        Ok((
            Optimum {
                value,
                solution: Solution { items },
            },
            table,
        ))
    }
}
