//! Q-learning and SARSA temporal difference learning
//!
//! This module implements tabular temporal difference (TD) control for the
//! maze agent. TD methods bootstrap value estimates from successor states,
//! so the agent improves after every step instead of after every episode.
//!
//! ## Algorithms
//!
//! - **Q-learning**: Off-policy TD control that learns optimal Q* values
//! - **SARSA**: On-policy TD control that learns Q^π for the followed policy
//!
//! ## Key Differences
//!
//! | Aspect | Q-learning | SARSA |
//! |--------|------------|-------|
//! | Policy | Off-policy (learns Q*) | On-policy (learns Q^π) |
//! | Update | Uses max_a Q(s',a') | Uses actual Q(s',a') |
//! | Exploration | Can be reckless | More conservative |
//! | Convergence | To optimal policy | To followed policy |
//!
//! ## Exploration
//!
//! Actions come from an [`ExplorationStrategy`]: uniform, ε-greedy or
//! Boltzmann (softmax). An [`ExplorationSchedule`] optionally decays ε or the
//! temperature between episodes.
//!
//! ## Usage Example
//!
//! ```no_run
//! use tdmaze::maze::Grid;
//! use tdmaze::q_learning::{ExplorationStrategy, LearnerConfig, QTable, TdLearner};
//!
//! let grid: Grid = "3 1\n1 1 1\n".parse()?;
//! let table = QTable::for_grid(&grid, 10.0, 0.9)?;
//! let learner = TdLearner::q_learning(LearnerConfig::new(1.0, 0.9)?)?;
//! let strategy = ExplorationStrategy::epsilon_greedy(0.1)?;
//! # Ok::<(), tdmaze::Error>(())
//! ```

pub mod exploration;
pub mod learner;
pub mod q_table;

// Public re-exports
pub use exploration::{DecaySchedule, ExplorationSchedule, ExplorationStrategy, StrategyKind};
pub use learner::{LearnerConfig, TdLearner, Transition, UpdateRule};
pub use q_table::QTable;
