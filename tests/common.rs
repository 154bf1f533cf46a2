//! Common test utilities for the tdmaze test suite.
//!
//! This module provides maze fixtures and the chi-square helpers used by the
//! distribution tests.

#![allow(dead_code)]

use statrs::distribution::{ChiSquared, ContinuousCDF};
use tdmaze::{
    ExplorationSchedule, ExplorationStrategy, Grid, LearnerConfig, QTable, TdLearner,
    TrainingConfig, UpdateRule,
};

/// The 3x1 corridor with a terminal reward of 10 at its right end.
pub fn corridor() -> Grid {
    let mut grid: Grid = "3 1\n1 1 1\n".parse().unwrap();
    grid.set_reward(2, 0, 10.0).unwrap();
    grid.mark_terminal(2, 0).unwrap();
    grid
}

/// An optimistic table for `grid`: every entry starts at 100.
pub fn optimistic_table(grid: &Grid) -> QTable {
    QTable::for_grid(grid, 10.0, 0.9).unwrap()
}

pub fn learner(rule: UpdateRule, learning_rate: f64, discount: f64) -> TdLearner {
    TdLearner::new(rule, LearnerConfig::new(learning_rate, discount).unwrap()).unwrap()
}

pub fn greedy() -> ExplorationSchedule {
    ExplorationSchedule::constant(ExplorationStrategy::epsilon_greedy(0.0).unwrap()).unwrap()
}

pub fn training(runs: usize, episodes: usize, seed: u64) -> TrainingConfig {
    TrainingConfig {
        runs,
        episodes,
        seed: Some(seed),
        max_steps: None,
    }
}

/// Pearson's chi-square statistic of `counts` against a uniform expectation.
pub fn chi_square_uniform(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    let expected = total as f64 / counts.len() as f64;
    counts
        .iter()
        .map(|&observed| {
            let diff = observed as f64 - expected;
            diff * diff / expected
        })
        .sum()
}

/// Critical value of the chi-square distribution at significance `alpha`.
pub fn chi_square_critical(degrees_of_freedom: usize, alpha: f64) -> f64 {
    ChiSquared::new(degrees_of_freedom as f64)
        .unwrap()
        .inverse_cdf(1.0 - alpha)
}
