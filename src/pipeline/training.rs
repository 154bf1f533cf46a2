//! Training pipeline: the episode driver for tabular TD agents

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    Error, Result,
    agent::{Action, Agent},
    analysis::stats,
    maze::{Grid, GridState},
    ports::Observer,
    q_learning::{ExplorationSchedule, ExplorationStrategy, QTable, TdLearner, Transition},
};

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of independent runs, each from a fresh copy of the initial table
    pub runs: usize,

    /// Number of episodes per run
    pub episodes: usize,

    /// Random seed; run `i` uses `seed + i`
    pub seed: Option<u64>,

    /// Optional cap on steps per episode; `None` runs every episode to a terminal cell
    pub max_steps: Option<usize>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            runs: 10,
            episodes: 300,
            seed: None,
            max_steps: None,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.runs == 0 {
            return Err(Error::config("runs must be at least 1"));
        }
        if self.episodes == 0 {
            return Err(Error::config("episodes must be at least 1"));
        }
        if self.max_steps == Some(0) {
            return Err(Error::config("max_steps must be at least 1 when set"));
        }
        Ok(())
    }
}

/// One step of an episode as seen by observers
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StepRecord {
    /// Step number within the episode (1-based, equals the agent's step counter)
    pub step: usize,
    pub state: GridState,
    pub action: Action,
    pub reward: f64,
    pub next_state: GridState,
    /// Action selected at `next_state`; `None` once the episode ended
    pub next_action: Option<Action>,
    pub terminal: bool,
    /// `Q(state, action)` after the update, `None` if the learner skipped it
    pub updated_value: Option<f64>,
}

/// Outcome of one episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeResult {
    /// Steps taken since the agent was reset
    pub steps: usize,
    /// Sum of rewards collected
    pub total_reward: f64,
    /// Whether the episode ended on a terminal cell
    pub reached_terminal: bool,
    /// Whether the step cap ended the episode first
    pub truncated: bool,
    /// Visited cells as `(row, col)`, start and final cell included
    pub trajectory: Vec<(usize, usize)>,
}

/// Result of one training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Run index (0-based)
    pub run: usize,

    /// Steps taken in each episode, in episode order
    pub episode_lengths: Vec<usize>,

    /// Episodes ended by the step cap
    pub truncated_episodes: usize,

    /// Trajectory of the last episode
    pub final_trajectory: Vec<(usize, usize)>,

    /// Strategy in effect after the last decay
    pub final_exploration: ExplorationStrategy,
}

impl RunResult {
    /// Average episode length over the run
    pub fn mean_length(&self) -> f64 {
        if self.episode_lengths.is_empty() {
            0.0
        } else {
            self.episode_lengths.iter().sum::<usize>() as f64 / self.episode_lengths.len() as f64
        }
    }

    /// Length of the last episode
    pub fn final_length(&self) -> Option<usize> {
        self.episode_lengths.last().copied()
    }
}

/// Result of a full training session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    pub config: TrainingConfig,

    pub learner: TdLearner,

    pub exploration: ExplorationSchedule,

    /// Per-run results, in run order
    pub runs: Vec<RunResult>,

    /// Trained table of every run, in run order
    #[serde(skip)]
    pub final_tables: Vec<QTable>,
}

impl TrainingResult {
    /// Episode lengths of every run
    pub fn episode_lengths(&self) -> Vec<Vec<usize>> {
        self.runs
            .iter()
            .map(|run| run.episode_lengths.clone())
            .collect()
    }

    /// Mean episode length per episode index, averaged over runs
    pub fn mean_episode_lengths(&self) -> Vec<f64> {
        stats::mean_episode_lengths(&self.episode_lengths())
    }

    /// Trajectory of the final episode of the last run
    pub fn last_trajectory(&self) -> Option<&[(usize, usize)]> {
        self.runs.last().map(|run| run.final_trajectory.as_slice())
    }

    /// Trained table of the last run
    pub fn last_table(&self) -> Option<&QTable> {
        self.final_tables.last()
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    ///
    /// Tables are not stored, so `final_tables` comes back empty.
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Episode driver for one agent in one maze
///
/// Each episode resets the agent, then alternates action selection, environment
/// step, next-action selection and learner update until a terminal cell is
/// reached. Runs are independent: every run trains its own copy of the initial
/// table with its own random stream.
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train `config.runs` independent runs from copies of `initial_table`.
    ///
    /// `initial_table` itself is never modified.
    pub fn run(
        &mut self,
        grid: &Grid,
        agent: &mut Agent,
        initial_table: &QTable,
        exploration: &ExplorationSchedule,
        learner: &TdLearner,
    ) -> Result<TrainingResult> {
        self.config.validate()?;
        self.validate_setup(grid, agent, initial_table)?;

        for observer in &mut self.observers {
            observer.on_training_start(self.config.runs, self.config.episodes)?;
        }

        let mut runs = Vec::with_capacity(self.config.runs);
        let mut final_tables = Vec::with_capacity(self.config.runs);

        for run in 0..self.config.runs {
            let mut table = initial_table.clone();
            let result = self.train_run(run, grid, agent, &mut table, exploration, learner)?;
            runs.push(result);
            final_tables.push(table);
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        Ok(TrainingResult {
            config: self.config.clone(),
            learner: *learner,
            exploration: *exploration,
            runs,
            final_tables,
        })
    }

    /// Train a single run of `config.episodes` episodes on `table`.
    ///
    /// The exploration schedule restarts from its initial strategy.
    pub fn train_run(
        &mut self,
        run: usize,
        grid: &Grid,
        agent: &mut Agent,
        table: &mut QTable,
        exploration: &ExplorationSchedule,
        learner: &TdLearner,
    ) -> Result<RunResult> {
        self.validate_setup(grid, agent, table)?;

        let mut rng = build_rng(self.config.seed.map(|seed| seed.wrapping_add(run as u64)));
        let mut strategy = exploration.initial();
        let mut episode_lengths = Vec::with_capacity(self.config.episodes);
        let mut truncated_episodes = 0;
        let mut final_trajectory = Vec::new();

        for observer in &mut self.observers {
            observer.on_run_start(run)?;
        }

        for episode in 0..self.config.episodes {
            let result =
                self.play_episode(run, episode, grid, agent, table, &strategy, learner, &mut rng)?;

            debug!(
                run,
                episode,
                steps = result.steps,
                truncated = result.truncated,
                "episode finished"
            );
            if result.truncated {
                truncated_episodes += 1;
            }
            episode_lengths.push(result.steps);

            for observer in &mut self.observers {
                observer.on_episode_end(run, episode, &result)?;
            }

            final_trajectory = result.trajectory;
            strategy = exploration.next(&strategy);
        }

        let result = RunResult {
            run,
            episode_lengths,
            truncated_episodes,
            final_trajectory,
            final_exploration: strategy,
        };

        info!(
            run,
            episodes = result.episode_lengths.len(),
            mean_length = result.mean_length(),
            final_length = result.final_length(),
            truncated = result.truncated_episodes,
            "run finished"
        );

        for observer in &mut self.observers {
            observer.on_run_end(run, &result)?;
        }

        Ok(result)
    }

    fn validate_setup(&self, grid: &Grid, agent: &Agent, table: &QTable) -> Result<()> {
        let (start_x, start_y) = agent.start();
        let start = grid.state_at(start_x, start_y)?;
        if !start.is_walkable() {
            return Err(Error::config(format!(
                "agent start ({start_x}, {start_y}) is a wall"
            )));
        }
        if !table.covers(grid) {
            return Err(Error::TableMismatch {
                expected: grid.len(),
                got: table.state_count(),
            });
        }
        if !grid.terminal_reachable_from(start_x, start_y) {
            return Err(Error::UnreachableTerminal {
                x: start_x,
                y: start_y,
            });
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn play_episode(
        &mut self,
        run: usize,
        episode: usize,
        grid: &Grid,
        agent: &mut Agent,
        table: &mut QTable,
        strategy: &ExplorationStrategy,
        learner: &TdLearner,
        rng: &mut StdRng,
    ) -> Result<EpisodeResult> {
        agent.reset();
        for observer in &mut self.observers {
            observer.on_episode_start(run, episode)?;
        }

        let mut state = agent.state(grid)?;
        let mut action = strategy.select(table, &state, &agent.valid_actions(grid), rng)?;
        let mut trajectory = Vec::new();
        let mut total_reward = 0.0;
        let mut truncated = false;

        loop {
            trajectory.push(state.row_col());

            let outcome = agent.step(action, grid)?;
            total_reward += outcome.reward;
            let next_actions = agent.valid_actions(grid);
            let next_action = if outcome.terminal {
                None
            } else {
                Some(strategy.select(table, &outcome.next_state, &next_actions, rng)?)
            };

            let updated_value = learner.learn(
                table,
                &Transition {
                    state,
                    action,
                    reward: outcome.reward,
                    next_state: outcome.next_state,
                    next_actions: &next_actions,
                    next_action,
                    terminal: outcome.terminal,
                },
            )?;

            let record = StepRecord {
                step: agent.steps_since_reset(),
                state,
                action,
                reward: outcome.reward,
                next_state: outcome.next_state,
                next_action,
                terminal: outcome.terminal,
                updated_value,
            };
            for observer in &mut self.observers {
                observer.on_step(run, episode, &record)?;
            }

            state = outcome.next_state;
            let Some(next_action) = next_action else {
                break;
            };
            if self
                .config
                .max_steps
                .is_some_and(|cap| agent.steps_since_reset() >= cap)
            {
                warn!(
                    run,
                    episode,
                    max_steps = agent.steps_since_reset(),
                    "episode truncated before reaching a terminal cell"
                );
                truncated = true;
                break;
            }
            action = next_action;
        }

        trajectory.push(state.row_col());

        Ok(EpisodeResult {
            steps: agent.steps_since_reset(),
            total_reward,
            reached_terminal: state.terminal,
            truncated,
            trajectory,
        })
    }
}
