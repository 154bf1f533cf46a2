//! Training pipeline abstractions
//!
//! This module provides:
//! - The episode driver that trains independent runs of a TD agent
//! - Result types for episodes, runs and whole training sessions
//! - Observers recording progress, metrics and trajectories during training

pub mod observers;
pub mod training;

// Re-export observer implementations (adapters)
pub use observers::{
    EpisodeObservation, JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver,
};
pub use training::{
    EpisodeResult, RunResult, StepRecord, TrainingConfig, TrainingPipeline, TrainingResult,
};

pub use crate::ports::Observer;
