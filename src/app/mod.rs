//! Application layer: experiment configuration and assembly
//!
//! [`ExperimentConfig`] is the serializable description of an experiment and
//! [`Experiment`] the validated set of collaborators built from it.
//!
//! # Usage
//!
//! ```no_run
//! use tdmaze::app::{Experiment, ExperimentConfig};
//!
//! let config = ExperimentConfig::load("data/experiment.json")?;
//! let mut experiment = Experiment::from_config(&config)?;
//! let result = experiment.train(Vec::new())?;
//! println!("{:?}", result.mean_episode_lengths().last());
//! # Ok::<(), tdmaze::Error>(())
//! ```

pub mod config;
pub mod experiment;

pub use config::{
    CellConfig, ExperimentConfig, ExplorationConfig, GoalConfig, LearnerSection, TableConfig,
};
pub use experiment::Experiment;
