//! Tabular temporal difference learning on grid mazes
//!
//! This crate provides:
//! - Grid mazes loaded from text files, with rewards and terminal cells
//! - A maze-walking agent restricted to valid moves
//! - Q-learning and SARSA over a dense value table
//! - Uniform, ε-greedy and Boltzmann exploration with optional decay
//! - A multi-run episode driver with observers, statistics and CSV export

pub mod agent;
pub mod analysis;
pub mod app;
pub mod cli;
pub mod error;
pub mod export;
pub mod identifiers;
pub mod maze;
pub mod pipeline;
pub mod ports;
pub mod q_learning;

pub use agent::{Action, Agent, StepOutcome};
pub use error::{Error, Result};
pub use identifiers::StateId;
pub use maze::{CellKind, Grid, GridState};
pub use pipeline::{TrainingConfig, TrainingPipeline, TrainingResult};
pub use q_learning::{
    ExplorationSchedule, ExplorationStrategy, LearnerConfig, QTable, TdLearner, UpdateRule,
};
