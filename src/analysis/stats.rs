//! Statistics over episode lengths

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Spread of one episode index across runs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LengthSummary {
    /// Episode index (0-based)
    pub episode: usize,
    /// Number of runs contributing
    pub runs: usize,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub min: usize,
    pub max: usize,
}

/// Mean length of each episode index, averaged over the runs that reached it.
pub fn mean_episode_lengths(runs: &[Vec<usize>]) -> Vec<f64> {
    summarize_episodes(runs)
        .into_iter()
        .map(|summary| summary.mean)
        .collect()
}

/// Per-episode summaries across runs.
///
/// Runs may differ in length; each index only counts the runs that have it.
pub fn summarize_episodes(runs: &[Vec<usize>]) -> Vec<LengthSummary> {
    let longest = runs.iter().map(Vec::len).max().unwrap_or(0);
    (0..longest)
        .map(|episode| {
            let lengths: Vec<usize> = runs
                .iter()
                .filter_map(|run| run.get(episode).copied())
                .collect();
            let values: Vec<f64> = lengths.iter().map(|&n| n as f64).collect();
            let std_dev = if values.len() > 1 {
                Statistics::population_std_dev(values.iter())
            } else {
                0.0
            };
            LengthSummary {
                episode,
                runs: lengths.len(),
                mean: Statistics::mean(values.iter()),
                std_dev,
                min: lengths.iter().copied().fold(usize::MAX, usize::min),
                max: lengths.iter().copied().fold(0, usize::max),
            }
        })
        .collect()
}

/// First episode from which the curve never rises above `target` again.
pub fn first_stable_episode(curve: &[f64], target: f64) -> Option<usize> {
    let mut stable_from = None;
    for (episode, &value) in curve.iter().enumerate() {
        if value <= target + 1e-9 {
            stable_from.get_or_insert(episode);
        } else {
            stable_from = None;
        }
    }
    stable_from
}
