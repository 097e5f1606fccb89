use knap_challenges::{knapsack::Challenge, KnapsackError};
use log::{debug, trace};
use std::sync::atomic::{AtomicBool, Ordering};

/// The `(n + 1) x (capacity + 1)` optimisation table, stored row-major.
///
/// Cell `(i, w)` holds the best value reachable with the first `i` items under
/// a weight budget of `w`. Row 0 is all zeros.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DpTable {
    rows: usize,
    columns: usize,
    cells: Vec<u64>,
}

impl DpTable {
    /// Reserves a zeroed table for `num_items` items and `capacity`, failing
    /// before allocation if it would hold more than `max_cells` cells.
    pub(crate) fn allocate(
        num_items: usize,
        capacity: u32,
        max_cells: u64,
    ) -> Result<Self, KnapsackError> {
        let rows = num_items.saturating_add(1);
        let columns = (capacity as usize).saturating_add(1);
        let too_large = || KnapsackError::TableTooLarge {
            rows,
            columns,
            max_cells,
        };

        let num_cells = rows.checked_mul(columns).ok_or_else(too_large)?;
        if num_cells as u64 > max_cells {
            return Err(too_large());
        }

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(num_cells)
            .map_err(|_| KnapsackError::AllocationFailed { cells: num_cells })?;
        cells.resize(num_cells, 0);

        Ok(DpTable {
            rows,
            columns,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn get(&self, item: usize, weight: usize) -> u64 {
        self.cells[item * self.columns + weight]
    }

    pub fn row(&self, item: usize) -> &[u64] {
        &self.cells[item * self.columns..(item + 1) * self.columns]
    }

    /// Value of the bottom-right cell, the optimum over all items and the full
    /// capacity.
    pub fn optimum(&self) -> u64 {
        self.cells[self.cells.len() - 1]
    }

    /// Fills rows `1..=n` bottom-up. The stop flag is polled once per row.
    pub(crate) fn fill(
        &mut self,
        challenge: &Challenge,
        stop_flag: Option<&AtomicBool>,
        progress_interval: usize,
    ) -> Result<(), KnapsackError> {
        let columns = self.columns;
        for i in 1..self.rows {
            if stop_flag.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                return Err(KnapsackError::Interrupted { rows_filled: i - 1 });
            }

            let weight = challenge.weights()[i - 1] as usize;
            let value = challenge.values()[i - 1] as u64;
            let (done, rest) = self.cells.split_at_mut(i * columns);
            let prev = &done[(i - 1) * columns..];
            let curr = &mut rest[..columns];

            for w in 0..columns {
                curr[w] = if weight > w {
                    prev[w]
                } else {
                    let include = prev[w - weight] + value;
                    // exclude on ties
                    if include > prev[w] {
                        include
                    } else {
                        prev[w]
                    }
                };
            }

            if progress_interval > 0 && i % progress_interval == 0 {
                debug!("[DP] filled {}/{} rows", i, self.rows - 1);
            }
        }
        Ok(())
    }

    /// Walks the filled table from `(n, capacity)` back to row 0 and returns
    /// the included items in ascending order.
    pub(crate) fn backtrace(&self, challenge: &Challenge) -> Vec<usize> {
        debug_assert_eq!(self.rows, challenge.num_items() + 1);
        debug_assert_eq!(self.columns, challenge.capacity() as usize + 1);

        let mut w = self.columns - 1;
        let mut items = Vec::new();
        for i in (1..self.rows).rev() {
            if self.get(i, w) != self.get(i - 1, w) {
                trace!("[DP] item {} included at budget {}", i - 1, w);
                items.push(i - 1);
                w -= challenge.weights()[i - 1] as usize;
            }
        }
        items.reverse();
        items
    }
}
