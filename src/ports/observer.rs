//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events,
//! allowing composable data collection without coupling training
//! logic to specific output formats or metrics.

use crate::{
    Result,
    pipeline::{EpisodeResult, RunResult, StepRecord},
};

/// Observer trait for monitoring training
///
/// Observers can be composed to collect different types of data during training.
/// Examples include:
/// - Progress bars for user feedback
/// - JSONL export of trajectories for analysis
/// - Metrics tracking for evaluation
///
/// # Event Sequence
///
/// The observer methods are called in the following order:
/// 1. `on_training_start(runs, episodes)` - Once at the beginning
/// 2. For each run:
///    - `on_run_start(run)`
///    - For each episode:
///      - `on_episode_start(run, episode)`
///      - `on_step(...)` - After every learner update
///      - `on_episode_end(run, episode, result)`
///    - `on_run_end(run, result)`
/// 3. `on_training_end()` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use tdmaze::{pipeline::EpisodeResult, ports::Observer};
///
/// struct LongestEpisode {
///     longest: usize,
/// }
///
/// impl Observer for LongestEpisode {
///     fn on_episode_end(
///         &mut self,
///         _run: usize,
///         _episode: usize,
///         result: &EpisodeResult,
///     ) -> tdmaze::Result<()> {
///         self.longest = self.longest.max(result.steps);
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    ///
    /// # Parameters
    ///
    /// * `runs` - Number of independent runs that will be trained
    /// * `episodes` - Number of episodes in each run
    fn on_training_start(&mut self, _runs: usize, _episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called before the first episode of a run, after its table was freshly copied.
    fn on_run_start(&mut self, _run: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts, after the agent was reset.
    fn on_episode_start(&mut self, _run: usize, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called for each step, after the learner update for that step.
    ///
    /// # Parameters
    ///
    /// * `run` - Index of the current run (0-based)
    /// * `episode` - Index of the current episode within the run (0-based)
    /// * `step` - The transition and the value written by the learner
    fn on_step(&mut self, _run: usize, _episode: usize, _step: &StepRecord) -> Result<()> {
        Ok(())
    }

    /// Called when an episode reaches a terminal cell or its step cap.
    fn on_episode_end(
        &mut self,
        _run: usize,
        _episode: usize,
        _result: &EpisodeResult,
    ) -> Result<()> {
        Ok(())
    }

    /// Called after the last episode of a run.
    fn on_run_end(&mut self, _run: usize, _result: &RunResult) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    ///
    /// Use this to finalize outputs, close files, or display summaries.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
