//! Experiment files, observation logs and curve exports

mod common;

use std::{fs, path::PathBuf};

use common::{corridor, greedy, learner, optimistic_table, training};
use tdmaze::{
    Agent, Error, Grid, TrainingPipeline, TrainingResult, UpdateRule,
    app::{Experiment, ExperimentConfig},
    export::write_length_curve,
    pipeline::{EpisodeObservation, JsonlObserver},
};
use tempfile::tempdir;

fn train_corridor(pipeline: &mut TrainingPipeline) -> TrainingResult {
    let grid = corridor();
    let table = optimistic_table(&grid);
    let learner = learner(UpdateRule::QLearning, 1.0, 0.9);
    let mut agent = Agent::new(0, 0);
    pipeline
        .run(&grid, &mut agent, &table, &greedy(), &learner)
        .unwrap()
}

#[test]
fn test_sample_experiment_trains() {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let mut config = ExperimentConfig::load(manifest.join("data/experiment.json")).unwrap();
    config.maze = Some(manifest.join("data/toy_maze.txt"));
    config.training.runs = 2;
    config.training.episodes = 40;

    let mut experiment = Experiment::from_config(&config).unwrap();
    assert_eq!(experiment.grid.width(), 10);
    assert!(experiment.grid.state_at(9, 9).unwrap().terminal);

    let result = experiment.train(Vec::new()).unwrap();
    assert_eq!(result.runs.len(), 2);
    for run in &result.runs {
        assert_eq!(run.episode_lengths.len(), 40);
        // Manhattan distance from the start to the goal
        assert!(run.episode_lengths.iter().all(|&n| n >= 18));
        assert_eq!(run.final_trajectory.last(), Some(&(9, 9)));
    }
}

#[test]
fn test_missing_maze_file_is_an_error() {
    let dir = tempdir().unwrap();
    let config = ExperimentConfig {
        maze: Some(dir.path().join("nowhere.txt")),
        ..ExperimentConfig::default()
    };
    assert!(matches!(
        Experiment::from_config(&config),
        Err(Error::Io { .. })
    ));
}

#[test]
fn test_config_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("experiment.json");
    let config = ExperimentConfig::default().with_goal(2, 0, 5.0).with_seed(3);
    config.save(&path).unwrap();

    let loaded = ExperimentConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_malformed_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"training\": { \"runs\": \"many\" } }").unwrap();
    assert!(matches!(
        ExperimentConfig::load(&path),
        Err(Error::Serialization(_))
    ));
}

#[test]
fn test_jsonl_observations() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("observations.jsonl");
    let observer = JsonlObserver::new(&path).unwrap().with_steps();
    let mut pipeline = TrainingPipeline::new(training(2, 3, 11)).with_observer(Box::new(observer));
    train_corridor(&mut pipeline);
    drop(pipeline);

    let contents = fs::read_to_string(&path).unwrap();
    let observations: Vec<EpisodeObservation> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(observations.len(), 6);
    assert_eq!((observations[0].run, observations[0].episode), (0, 0));
    assert_eq!((observations[5].run, observations[5].episode), (1, 2));
    for observation in &observations {
        assert_eq!(observation.updates.len(), observation.steps);
        assert_eq!(observation.trajectory.len(), observation.steps + 1);
        assert!(!observation.truncated);
        assert_eq!(observation.total_reward, 10.0);
    }
}

#[test]
fn test_length_curve_csv() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("curve.csv");
    let mut pipeline = TrainingPipeline::new(training(3, 4, 8));
    let result = train_corridor(&mut pipeline);

    let rows = write_length_curve(&path, &result).unwrap();
    assert_eq!(rows, 4);

    let contents = fs::read_to_string(&path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("episode,mean,std_dev,min,max"));
    assert_eq!(lines.next(), Some("1,4.0,0.0,4,4"));
    assert_eq!(lines.next(), Some("2,2.0,0.0,2,2"));
}

#[test]
fn test_training_result_summary_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("result.json");
    let mut pipeline = TrainingPipeline::new(training(2, 3, 4));
    let result = train_corridor(&mut pipeline);
    result.save(&path).unwrap();

    let loaded = TrainingResult::load(&path).unwrap();
    assert_eq!(loaded.runs, result.runs);
    assert!(loaded.final_tables.is_empty());
}

#[test]
fn test_render_goal_markers() {
    let mut grid: Grid = "3 2\n1 1 0\n0 1 1\n".parse().unwrap();
    grid.mark_terminal(2, 1).unwrap();
    let rendering = tdmaze::maze::render_ascii(&grid, &[(0, 0), (0, 1), (1, 1), (1, 2)]);
    assert_eq!(rendering, "**#\n#*X\n");
}
