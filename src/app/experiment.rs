//! Validated assembly of the collaborators of one experiment

use tracing::info;

use crate::{
    Error, Result,
    agent::Agent,
    app::config::ExperimentConfig,
    maze::Grid,
    pipeline::{TrainingConfig, TrainingPipeline, TrainingResult},
    ports::Observer,
    q_learning::{
        DecaySchedule, ExplorationSchedule, ExplorationStrategy, LearnerConfig, QTable, TdLearner,
    },
};

/// Everything a training session needs, built once from an [`ExperimentConfig`]
#[derive(Debug, Clone)]
pub struct Experiment {
    pub grid: Grid,
    pub agent: Agent,
    pub initial_table: QTable,
    pub learner: TdLearner,
    pub exploration: ExplorationSchedule,
    pub training: TrainingConfig,
}

impl Experiment {
    /// Load the configured maze file and assemble the experiment.
    pub fn from_config(config: &ExperimentConfig) -> Result<Self> {
        let path = config
            .maze
            .as_ref()
            .ok_or_else(|| Error::config("experiment has no maze file"))?;
        let grid = Grid::load(path)?;
        Self::with_grid(grid, config)
    }

    /// Assemble the experiment around an already loaded maze.
    ///
    /// Goal rewards and terminal markers from `config` are applied to `grid`.
    pub fn with_grid(mut grid: Grid, config: &ExperimentConfig) -> Result<Self> {
        for goal in &config.goals {
            grid.set_reward(goal.x, goal.y, goal.reward)?;
            grid.mark_terminal(goal.x, goal.y)?;
        }

        let start = grid.state_at(config.start.x, config.start.y)?;
        if !start.is_walkable() {
            return Err(Error::config(format!(
                "agent start ({}, {}) is a wall",
                config.start.x, config.start.y
            )));
        }
        let agent = Agent::new(config.start.x, config.start.y);

        let initial_table = QTable::for_grid(&grid, config.table.r_max, config.table.discount)?;

        let hyperparameters = config.learner.hyperparameters;
        let learner = TdLearner::new(
            config.learner.rule,
            LearnerConfig::new(hyperparameters.learning_rate, hyperparameters.discount)?,
        )?;

        let exploration = &config.exploration;
        let strategy = ExplorationStrategy::from_kind(
            exploration.strategy,
            exploration.epsilon,
            exploration.temperature,
        )?;
        let decay = exploration
            .decay
            .map(|decay| DecaySchedule::new(decay.rate, decay.floor))
            .transpose()?;
        let exploration = ExplorationSchedule::new(strategy, decay)?;

        config.training.validate()?;

        info!(
            width = grid.width(),
            height = grid.height(),
            goals = config.goals.len(),
            rule = %learner.rule(),
            strategy = %strategy,
            initial_value = initial_table.initial_value(),
            "experiment assembled"
        );

        Ok(Self {
            grid,
            agent,
            initial_table,
            learner,
            exploration,
            training: config.training.clone(),
        })
    }

    /// Train with the given observers attached.
    pub fn train(&mut self, observers: Vec<Box<dyn Observer>>) -> Result<TrainingResult> {
        let mut pipeline = TrainingPipeline::new(self.training.clone());
        for observer in observers {
            pipeline = pipeline.with_observer(observer);
        }
        pipeline.run(
            &self.grid,
            &mut self.agent,
            &self.initial_table,
            &self.exploration,
            &self.learner,
        )
    }
}
