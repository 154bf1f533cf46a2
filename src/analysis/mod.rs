//! Analysis tools for studying trained maze agents
//!
//! This module provides tools for summarizing episode lengths across runs
//! and for inspecting the greedy policy encoded by a trained table.

pub mod policy;
pub mod stats;

pub use policy::{GreedyRollout, greedy_rollout};
pub use stats::{LengthSummary, first_stable_episode, mean_episode_lengths, summarize_episodes};
