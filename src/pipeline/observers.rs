//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    pipeline::training::{EpisodeResult, RunResult, StepRecord},
    ports::Observer,
};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    episodes: usize,
    last_length: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            episodes: 0,
            last_length: 0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, runs: usize, episodes: usize) -> Result<()> {
        self.episodes = episodes;
        let pb = ProgressBar::new((runs * episodes) as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(
        &mut self,
        run: usize,
        _episode: usize,
        result: &EpisodeResult,
    ) -> Result<()> {
        self.last_length = result.steps;
        if let Some(pb) = &self.progress_bar {
            pb.inc(1);
            pb.set_message(format!("run {} last length {}", run + 1, self.last_length));
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("last length {}", self.last_length));
        }
        Ok(())
    }
}

/// Metrics observer - Tracks training metrics
pub struct MetricsObserver {
    total_episodes: usize,
    total_steps: usize,
    truncated: usize,
    total_reward: f64,
    lengths: Vec<usize>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self {
            total_episodes: 0,
            total_steps: 0,
            truncated: 0,
            total_reward: 0.0,
            lengths: Vec::new(),
        }
    }

    /// Get average episode length
    pub fn avg_episode_length(&self) -> f64 {
        if self.total_episodes == 0 {
            0.0
        } else {
            self.total_steps as f64 / self.total_episodes as f64
        }
    }

    /// Get average reward per episode
    pub fn avg_reward(&self) -> f64 {
        if self.total_episodes == 0 {
            0.0
        } else {
            self.total_reward / self.total_episodes as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_episodes: self.total_episodes,
            total_steps: self.total_steps,
            truncated_episodes: self.truncated,
            avg_episode_length: self.avg_episode_length(),
            avg_reward: self.avg_reward(),
            shortest_episode: self.lengths.iter().min().copied(),
            longest_episode: self.lengths.iter().max().copied(),
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_episodes: usize,
    pub total_steps: usize,
    pub truncated_episodes: usize,
    pub avg_episode_length: f64,
    pub avg_reward: f64,
    pub shortest_episode: Option<usize>,
    pub longest_episode: Option<usize>,
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_episode_end(
        &mut self,
        _run: usize,
        _episode: usize,
        result: &EpisodeResult,
    ) -> Result<()> {
        self.total_episodes += 1;
        self.total_steps += result.steps;
        self.total_reward += result.total_reward;
        if result.truncated {
            self.truncated += 1;
        }
        self.lengths.push(result.steps);
        Ok(())
    }
}

/// One line of the JSONL export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeObservation {
    pub run: usize,
    pub episode: usize,
    pub steps: usize,
    pub total_reward: f64,
    pub truncated: bool,
    /// Visited cells as `(row, col)`
    pub trajectory: Vec<(usize, usize)>,
    /// Updated values in step order, when recorded
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub updates: Vec<StepRecord>,
}

/// JSONL observer - Exports one observation per episode in JSON Lines format
pub struct JsonlObserver {
    writer: BufWriter<File>,
    record_steps: bool,
    current_steps: Vec<StepRecord>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self {
            writer,
            record_steps: false,
            current_steps: Vec::new(),
        })
    }

    /// Also write every step record of each episode
    pub fn with_steps(mut self) -> Self {
        self.record_steps = true;
        self
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _run: usize, _episode: usize) -> Result<()> {
        self.current_steps.clear();
        Ok(())
    }

    fn on_step(&mut self, _run: usize, _episode: usize, step: &StepRecord) -> Result<()> {
        if self.record_steps {
            self.current_steps.push(*step);
        }
        Ok(())
    }

    fn on_episode_end(&mut self, run: usize, episode: usize, result: &EpisodeResult) -> Result<()> {
        let observation = EpisodeObservation {
            run,
            episode,
            steps: result.steps,
            total_reward: result.total_reward,
            truncated: result.truncated,
            trajectory: result.trajectory.clone(),
            updates: std::mem::take(&mut self.current_steps),
        };

        // Write as JSONL (one JSON object per line)
        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_run_end(&mut self, _run: usize, _result: &RunResult) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
