use knap_algorithms::knapsack::{dynamic, DpTable, Params, Solver};
use knap_algorithms::solve;
use knap_challenges::{
    knapsack::{Challenge, Solution},
    KnapsackError,
};
use proptest::prelude::*;
use serde_json::json;
use std::sync::atomic::AtomicBool;
use test_case::test_case;

fn brute_force(values: &[u32], weights: &[u32], capacity: u32) -> u64 {
    let n = values.len();
    (0u32..1 << n)
        .filter_map(|mask| {
            let (mut value, mut weight) = (0u64, 0u64);
            for i in 0..n {
                if mask & (1 << i) != 0 {
                    value += values[i] as u64;
                    weight += weights[i] as u64;
                }
            }
            (weight <= capacity as u64).then_some(value)
        })
        .max()
        .unwrap_or(0)
}

fn solve_unsigned(values: &[u32], weights: &[u32], capacity: u32) -> (u64, Vec<usize>) {
    let challenge = Challenge::new(values.to_vec(), weights.to_vec(), capacity).unwrap();
    let optimum = Solver::solve(&challenge, &Params::default(), None).unwrap();
    (optimum.value, optimum.solution.items)
}

#[test_case(&[60, 100, 120], &[10, 20, 30], 50, 220, &[1, 2]; "textbook")]
#[test_case(&[10], &[5], 4, 0, &[]; "item does not fit")]
#[test_case(&[], &[], 10, 0, &[]; "no items")]
#[test_case(&[3, 4], &[1, 1], 0, 0, &[]; "zero capacity")]
#[test_case(&[7], &[0], 0, 7, &[0]; "zero weight at zero capacity")]
#[test_case(&[5, 5], &[3, 3], 3, 5, &[0]; "tie keeps lower index")]
#[test_case(&[0, 4], &[1, 1], 2, 4, &[1]; "zero value never selected")]
#[test_case(&[1, 6, 18, 22, 28], &[1, 2, 5, 6, 7], 11, 40, &[2, 3]; "exact fit")]
fn test_scenarios(
    values: &[i64],
    weights: &[i64],
    capacity: i64,
    expected_value: u64,
    expected_items: &[usize],
) {
    let optimum = solve(values, weights, capacity).unwrap();
    assert_eq!(optimum.value, expected_value);
    assert_eq!(optimum.items(), expected_items);
}

#[test]
fn test_shape_mismatch_fails() {
    assert_eq!(
        solve(&[1, 2], &[1], 10),
        Err(KnapsackError::ShapeMismatch {
            num_values: 2,
            num_weights: 1
        })
    );
}

#[test]
fn test_negative_input_fails() {
    assert!(solve(&[1], &[1], -1).unwrap_err().is_invalid_input());
    assert!(solve(&[-1], &[1], 1).unwrap_err().is_invalid_input());
    assert!(solve(&[1], &[-1], 1).unwrap_err().is_invalid_input());
}

#[test]
fn test_table_shape_and_borders() {
    let challenge = Challenge::new(vec![60, 100, 120], vec![10, 20, 30], 50).unwrap();
    let (optimum, table) = Solver::solve_with_table(&challenge, &Params::default(), None).unwrap();
    assert_eq!(table.rows(), 4);
    assert_eq!(table.columns(), 51);
    assert!(table.row(0).iter().all(|&cell| cell == 0));
    assert!((0..table.rows()).all(|i| table.get(i, 0) == 0));
    assert_eq!(table.optimum(), optimum.value);
    assert_eq!(table.get(3, 50), 220);
    assert_eq!(table.get(1, 9), 0);
    assert_eq!(table.get(1, 10), 60);
    assert_eq!(table.get(2, 30), 160);
}

#[test]
fn test_rows_never_decrease() {
    let challenge = Challenge::new(vec![4, 9, 2, 7], vec![3, 5, 1, 4], 9).unwrap();
    let (_, table): (_, DpTable) =
        Solver::solve_with_table(&challenge, &Params::default(), None).unwrap();
    for i in 1..table.rows() {
        for w in 0..table.columns() {
            assert!(table.get(i, w) >= table.get(i - 1, w));
            if w > 0 {
                assert!(table.get(i, w) >= table.get(i, w - 1));
            }
        }
    }
}

#[test]
fn test_table_too_large() {
    let challenge = Challenge::new(vec![1; 10], vec![1; 10], 99).unwrap();
    let params = Params {
        max_table_cells: 1000,
        ..Params::default()
    };
    let err = Solver::solve(&challenge, &params, None).unwrap_err();
    assert_eq!(
        err,
        KnapsackError::TableTooLarge {
            rows: 11,
            columns: 100,
            max_cells: 1000
        }
    );
    assert!(err.is_resource_exhausted());

    // exactly at the limit is fine
    let params = Params {
        max_table_cells: 1100,
        ..Params::default()
    };
    assert_eq!(Solver::solve(&challenge, &params, None).unwrap().value, 10);
}

#[test]
fn test_interrupted_before_first_row() {
    let challenge = Challenge::new(vec![1, 2, 3], vec![1, 1, 1], 2).unwrap();
    let stop_flag = AtomicBool::new(true);
    assert_eq!(
        Solver::solve(&challenge, &Params::default(), Some(&stop_flag)),
        Err(KnapsackError::Interrupted { rows_filled: 0 })
    );

    let stop_flag = AtomicBool::new(false);
    let optimum = Solver::solve(&challenge, &Params::default(), Some(&stop_flag)).unwrap();
    assert_eq!(optimum.value, 5);
    assert_eq!(optimum.items(), &[1, 2]);
}

#[test]
fn test_solve_challenge_reads_hyperparameters() {
    let challenge = Challenge::new(vec![1; 4], vec![1; 4], 9).unwrap();
    let hyperparameters = json!({ "max_table_cells": 10, "progress_interval": 1 });
    let hyperparameters = hyperparameters.as_object().cloned();
    let err = dynamic::solve_challenge(&challenge, &hyperparameters).unwrap_err();
    assert!(err.to_string().contains("exceeds the limit"));

    let optimum = dynamic::solve_challenge(&challenge, &None).unwrap();
    assert_eq!(optimum.value, 4);
    assert_eq!(
        optimum.solution,
        Solution {
            items: vec![0, 1, 2, 3]
        }
    );
}

#[test]
fn test_params_initialize() {
    assert_eq!(Params::initialize(&None), Params::default());
    let h = json!({ "progress_interval": 25, "unrelated": true });
    let params = Params::initialize(&h.as_object().cloned());
    assert_eq!(params.progress_interval, 25);
    assert_eq!(params.max_table_cells, Params::default().max_table_cells);
}

#[test]
fn test_default_table_limit_is_two_gib() {
    let max_table_cells = Params::default().max_table_cells;
    assert_eq!(max_table_cells, 1 << 28);
    assert_eq!(max_table_cells * std::mem::size_of::<u64>() as u64, 2 << 30);
}

fn instance() -> impl Strategy<Value = (Vec<u32>, Vec<u32>, u32)> {
    (0usize..=12).prop_flat_map(|n| {
        (
            prop::collection::vec(0u32..50, n),
            prop::collection::vec(0u32..20, n),
            0u32..80,
        )
    })
}

proptest! {
    #[test]
    fn optimum_matches_brute_force((values, weights, capacity) in instance()) {
        let (value, items) = solve_unsigned(&values, &weights, capacity);
        prop_assert_eq!(value, brute_force(&values, &weights, capacity));

        prop_assert!(items.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(items.iter().all(|&i| i < values.len()));
        let weight: u64 = items.iter().map(|&i| weights[i] as u64).sum();
        let total: u64 = items.iter().map(|&i| values[i] as u64).sum();
        prop_assert!(weight <= capacity as u64);
        prop_assert_eq!(total, value);
    }

    #[test]
    fn more_capacity_never_hurts((values, weights, capacity) in instance(), extra in 0u32..20) {
        let (smaller, _) = solve_unsigned(&values, &weights, capacity);
        let (larger, _) = solve_unsigned(&values, &weights, capacity + extra);
        prop_assert!(larger >= smaller);
    }

    #[test]
    fn another_item_never_hurts(
        (values, weights, capacity) in instance(),
        value in 0u32..50,
        weight in 0u32..20,
    ) {
        let (before, _) = solve_unsigned(&values, &weights, capacity);
        let mut values = values;
        let mut weights = weights;
        values.push(value);
        weights.push(weight);
        let (after, _) = solve_unsigned(&values, &weights, capacity);
        prop_assert!(after >= before);
    }
}
