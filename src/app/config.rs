//! Configuration types for experiment assembly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    pipeline::TrainingConfig,
    q_learning::{DecaySchedule, LearnerConfig, StrategyKind, UpdateRule},
};

/// A grid cell given by column `x` and row `y`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellConfig {
    pub x: usize,
    pub y: usize,
}

/// A terminal cell and the reward for entering it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalConfig {
    pub x: usize,
    pub y: usize,
    #[serde(default = "GoalConfig::default_reward")]
    pub reward: f64,
}

impl GoalConfig {
    fn default_reward() -> f64 {
        10.0
    }
}

/// Initial value of every table entry, `r_max / (1 - discount)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub r_max: f64,
    pub discount: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            r_max: 10.0,
            discount: 0.0,
        }
    }
}

/// Update rule and its hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerSection {
    pub rule: UpdateRule,
    #[serde(flatten)]
    pub hyperparameters: LearnerConfig,
}

/// Exploration strategy selection
///
/// Both `epsilon` and `temperature` are kept so the strategy can be switched
/// without touching the other parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorationConfig {
    pub strategy: StrategyKind,
    pub epsilon: f64,
    pub temperature: f64,
    pub decay: Option<DecaySchedule>,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            epsilon: 0.1,
            temperature: 0.3,
            decay: None,
        }
    }
}

/// Complete description of a training experiment.
///
/// Every section has defaults, so an empty JSON object is a valid (if
/// goal-less) experiment.
///
/// # Examples
///
/// ```
/// use tdmaze::app::ExperimentConfig;
///
/// let config: ExperimentConfig = serde_json::from_str(
///     r#"{ "goals": [{ "x": 2, "y": 0, "reward": 10.0 }], "training": { "runs": 3 } }"#,
/// )?;
/// assert_eq!(config.training.runs, 3);
/// assert_eq!(config.training.episodes, 300);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Maze file; relative paths resolve against the working directory
    pub maze: Option<PathBuf>,
    pub start: CellConfig,
    pub goals: Vec<GoalConfig>,
    pub table: TableConfig,
    pub learner: LearnerSection,
    pub exploration: ExplorationConfig,
    pub training: TrainingConfig,
}

impl ExperimentConfig {
    /// Read a JSON experiment file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read experiment config {}", path.display()),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Add a goal cell.
    pub fn with_goal(mut self, x: usize, y: usize, reward: f64) -> Self {
        self.goals.push(GoalConfig { x, y, reward });
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.training.seed = Some(seed);
        self
    }
}
