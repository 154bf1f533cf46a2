//! Train command - Train a Q-learning or SARSA agent on a maze

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use anyhow::{Result, anyhow};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    analysis::{GreedyRollout, first_stable_episode, greedy_rollout},
    app::{Experiment, ExperimentConfig},
    cli::{
        commands::{parse_cell, parse_goal},
        output::{
            format_length, format_number, print_kv, print_maze, print_section, print_subsection,
        },
    },
    export::write_length_curve,
    maze::render_ascii,
    pipeline::{
        EpisodeResult, JsonlObserver, MetricsObserver, MetricsSummary, Observer, ProgressObserver,
        TrainingResult,
    },
    q_learning::{DecaySchedule, StrategyKind, UpdateRule},
};

/// Decay floor used when `--decay` is given without `--decay-floor`
const DEFAULT_DECAY_FLOOR: f64 = 0.01;

#[derive(Parser, Debug)]
#[command(about = "Train a TD agent on a maze", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Maze file (overrides the maze of --config)
    pub maze: Option<PathBuf>,

    /// JSON experiment file; flags override its fields
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Start cell as X,Y
    #[arg(long)]
    pub start: Option<String>,

    /// Goal cell as X,Y[:REWARD] (repeatable, replaces configured goals)
    #[arg(long = "goal", short = 'g')]
    pub goals: Vec<String>,

    /// Update rule (q-learning or sarsa)
    #[arg(long)]
    pub rule: Option<String>,

    /// Exploration strategy (uniform, epsilon-greedy, or boltzmann)
    #[arg(long, short = 's')]
    pub strategy: Option<String>,

    /// Exploration probability for epsilon-greedy
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Softmax temperature for boltzmann
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Multiply epsilon or temperature by this rate after every episode
    #[arg(long)]
    pub decay: Option<f64>,

    /// Lower bound for the decayed parameter
    #[arg(long)]
    pub decay_floor: Option<f64>,

    /// Learning rate (step size)
    #[arg(long, short = 'a')]
    pub learning_rate: Option<f64>,

    /// Discount factor of the update rule
    #[arg(long)]
    pub discount: Option<f64>,

    /// Reward bound used for the optimistic initial value
    #[arg(long)]
    pub r_max: Option<f64>,

    /// Discount used for the optimistic initial value
    #[arg(long)]
    pub table_discount: Option<f64>,

    /// Number of independent runs
    #[arg(long, short = 'r')]
    pub runs: Option<usize>,

    /// Number of episodes per run
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Cap on steps per episode
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Optional file for JSONL observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Include every step in the JSONL observations
    #[arg(long, default_value_t = false)]
    pub observe_steps: bool,

    /// Optional CSV file for the episode-length curve
    #[arg(long)]
    pub curve: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    experiment: ExperimentConfig,
    metrics: MetricsSummary,
    mean_episode_lengths: Vec<f64>,
    converged_at_episode: Option<usize>,
    greedy: Option<GreedyRollout>,
}

/// Forwards episode events to a metrics observer the command keeps a handle on
struct SharedMetrics {
    inner: Arc<Mutex<MetricsObserver>>,
}

impl Observer for SharedMetrics {
    fn on_episode_end(
        &mut self,
        run: usize,
        episode: usize,
        result: &EpisodeResult,
    ) -> crate::Result<()> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .on_episode_end(run, episode, result)
    }
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

/// Merge the experiment file (if any) with the command line flags.
pub fn resolve_config(args: &TrainArgs) -> Result<ExperimentConfig> {
    let mut config = match &args.config {
        Some(path) => ExperimentConfig::load(path)?,
        None => ExperimentConfig::default(),
    };

    if let Some(maze) = &args.maze {
        config.maze = Some(maze.clone());
    }
    if config.maze.is_none() {
        return Err(anyhow!("No maze given (pass a MAZE file or set \"maze\" in --config)"));
    }
    if let Some(start) = &args.start {
        let (x, y) = parse_cell(start, "--start")?;
        config.start.x = x;
        config.start.y = y;
    }
    if !args.goals.is_empty() {
        config.goals = args
            .goals
            .iter()
            .map(|goal| parse_goal(goal))
            .collect::<Result<_>>()?;
    }

    if let Some(rule) = &args.rule {
        config.learner.rule = rule.parse::<UpdateRule>()?;
    }
    if let Some(learning_rate) = args.learning_rate {
        config.learner.hyperparameters.learning_rate = learning_rate;
    }
    if let Some(discount) = args.discount {
        config.learner.hyperparameters.discount = discount;
    }
    if let Some(r_max) = args.r_max {
        config.table.r_max = r_max;
    }
    if let Some(discount) = args.table_discount {
        config.table.discount = discount;
    }

    let exploration = &mut config.exploration;
    if let Some(strategy) = &args.strategy {
        exploration.strategy = strategy.parse::<StrategyKind>()?;
    }
    if let Some(epsilon) = args.epsilon {
        exploration.epsilon = epsilon;
    }
    if let Some(temperature) = args.temperature {
        exploration.temperature = temperature;
    }
    match (args.decay, args.decay_floor) {
        (Some(rate), floor) => {
            let floor = floor
                .or(exploration.decay.map(|decay| decay.floor))
                .unwrap_or(DEFAULT_DECAY_FLOOR);
            exploration.decay = Some(DecaySchedule::new(rate, floor)?);
        }
        (None, Some(floor)) => {
            let decay = exploration
                .decay
                .ok_or_else(|| anyhow!("--decay-floor needs --decay or a configured decay"))?;
            exploration.decay = Some(DecaySchedule::new(decay.rate, floor)?);
        }
        (None, None) => {}
    }

    let training = &mut config.training;
    if let Some(runs) = args.runs {
        training.runs = runs;
    }
    if let Some(episodes) = args.episodes {
        training.episodes = episodes;
    }
    if args.seed.is_some() {
        training.seed = args.seed;
    }
    if args.max_steps.is_some() {
        training.max_steps = args.max_steps;
    }

    Ok(config)
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    let mut experiment = Experiment::from_config(&config)?;

    let summary_spec = args.summary.as_ref().map(|raw| {
        let sanitized = sanitize_summary_path(raw);
        let normalized = sanitized != *raw;
        (sanitized, normalized)
    });

    let mut observers: Vec<Box<dyn Observer>> = Vec::new();
    if !args.no_progress {
        observers.push(Box::new(ProgressObserver::new()));
    }
    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
    observers.push(Box::new(SharedMetrics {
        inner: Arc::clone(&metrics),
    }));
    if let Some(observations_path) = &args.observations {
        let mut jsonl_observer = JsonlObserver::new(observations_path)?;
        if args.observe_steps {
            jsonl_observer = jsonl_observer.with_steps();
        }
        observers.push(Box::new(jsonl_observer));
    }

    let result = experiment.train(observers)?;
    let metrics = metrics
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .summary();

    let greedy = match result.last_table() {
        Some(table) => Some(greedy_rollout(
            &experiment.grid,
            table,
            experiment.agent.start(),
            experiment.grid.len(),
        )?),
        None => None,
    };
    let curve = result.mean_episode_lengths();
    let converged_at_episode = greedy
        .as_ref()
        .filter(|rollout| rollout.reached_terminal)
        .and_then(|rollout| first_stable_episode(&curve, rollout.steps() as f64));

    print_training_summary(&experiment, &result, &metrics, greedy.as_ref(), converged_at_episode);

    if let Some(curve_path) = &args.curve {
        let rows = write_length_curve(curve_path, &result)?;
        println!("\nCurve ({rows} episodes) written to {}", curve_path.display());
    }

    if let Some(path) = &args.observations {
        println!("Observations written to {}", path.display());
    }

    if let Some((summary_path, normalized)) = summary_spec {
        if normalized {
            println!("\nNormalizing summary path to {}", summary_path.display());
        }

        if let Some(parent) = summary_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let summary = TrainingSummaryFile {
            experiment: config,
            metrics,
            mean_episode_lengths: curve,
            converged_at_episode,
            greedy,
        };

        let file = File::create(&summary_path)?;
        to_writer_pretty(file, &summary)?;
        println!("\nSummary written to {}", summary_path.display());
    }

    Ok(())
}

fn print_training_summary(
    experiment: &Experiment,
    result: &TrainingResult,
    metrics: &MetricsSummary,
    greedy: Option<&GreedyRollout>,
    converged_at_episode: Option<usize>,
) {
    let curve = result.mean_episode_lengths();

    print_section("Training Summary");
    print_kv(
        "Maze",
        &format!("{} x {}", experiment.grid.width(), experiment.grid.height()),
    );
    print_kv("Update rule", experiment.learner.rule().name());
    print_kv("Exploration", &experiment.exploration.initial().to_string());
    print_kv("Runs", &format_number(result.config.runs));
    print_kv("Episodes per run", &format_number(result.config.episodes));
    print_kv("Total steps", &format_number(metrics.total_steps));
    print_kv("First episode", &format_length(curve.first().copied()));
    print_kv("Last episode", &format_length(curve.last().copied()));
    print_kv("Average reward", &format!("{:.3}", metrics.avg_reward));
    if metrics.truncated_episodes > 0 {
        print_kv("Truncated", &format_number(metrics.truncated_episodes));
    }

    if let Some(rollout) = greedy {
        let status = if rollout.reached_terminal {
            format!("{} steps", rollout.steps())
        } else {
            "does not reach a goal".to_string()
        };
        print_kv("Greedy path", &status);
    }
    if let Some(episode) = converged_at_episode {
        print_kv("Converged at", &format!("episode {}", episode + 1));
    }

    if let Some(trajectory) = result.last_trajectory() {
        print_subsection("Final trajectory (last run)");
        print_maze(&render_ascii(&experiment.grid, trajectory));
    }
}
