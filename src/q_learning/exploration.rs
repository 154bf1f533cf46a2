//! Action-selection strategies over a Q-table
//!
//! Strategies hold only their own parameter and read the Q-table they are
//! given at selection time, so one strategy value can serve many runs.

use std::{fmt, str::FromStr};

use rand::{
    Rng,
    distr::{Distribution, weighted::WeightedIndex},
    seq::IndexedRandom,
};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, agent::Action, maze::GridState, q_learning::q_table::QTable};

/// Names of the supported strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    Uniform,
    #[default]
    EpsilonGreedy,
    Boltzmann,
}

impl StrategyKind {
    const EXPECTED: &'static str = "uniform, epsilon-greedy, boltzmann";

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Uniform => "uniform",
            StrategyKind::EpsilonGreedy => "epsilon-greedy",
            StrategyKind::Boltzmann => "boltzmann",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" | "random" => Ok(StrategyKind::Uniform),
            "epsilon-greedy" | "e-greedy" | "greedy" => Ok(StrategyKind::EpsilonGreedy),
            "boltzmann" | "softmax" => Ok(StrategyKind::Boltzmann),
            other => Err(Error::UnsupportedStrategy {
                name: other.to_string(),
                expected: Self::EXPECTED.to_string(),
            }),
        }
    }
}

/// Exploration strategy with its parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ExplorationStrategy {
    /// Uniform draw among valid actions
    Uniform,
    /// Uniform draw with probability ε, greedy otherwise
    EpsilonGreedy { epsilon: f64 },
    /// Softmax over Q-values at the given temperature
    Boltzmann { temperature: f64 },
}

impl ExplorationStrategy {
    /// ε-greedy with `epsilon` in [0, 1].
    pub fn epsilon_greedy(epsilon: f64) -> Result<Self> {
        let strategy = ExplorationStrategy::EpsilonGreedy { epsilon };
        strategy.validate()?;
        Ok(strategy)
    }

    /// Boltzmann with a strictly positive, finite temperature.
    pub fn boltzmann(temperature: f64) -> Result<Self> {
        let strategy = ExplorationStrategy::Boltzmann { temperature };
        strategy.validate()?;
        Ok(strategy)
    }

    /// Build the strategy named by `kind`, picking the parameter it uses.
    pub fn from_kind(kind: StrategyKind, epsilon: f64, temperature: f64) -> Result<Self> {
        match kind {
            StrategyKind::Uniform => Ok(ExplorationStrategy::Uniform),
            StrategyKind::EpsilonGreedy => Self::epsilon_greedy(epsilon),
            StrategyKind::Boltzmann => Self::boltzmann(temperature),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            ExplorationStrategy::Uniform => StrategyKind::Uniform,
            ExplorationStrategy::EpsilonGreedy { .. } => StrategyKind::EpsilonGreedy,
            ExplorationStrategy::Boltzmann { .. } => StrategyKind::Boltzmann,
        }
    }

    /// The tunable parameter (ε or temperature), if any.
    pub fn parameter(&self) -> Option<f64> {
        match *self {
            ExplorationStrategy::Uniform => None,
            ExplorationStrategy::EpsilonGreedy { epsilon } => Some(epsilon),
            ExplorationStrategy::Boltzmann { temperature } => Some(temperature),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            ExplorationStrategy::Uniform => Ok(()),
            ExplorationStrategy::EpsilonGreedy { epsilon } => {
                if (0.0..=1.0).contains(&epsilon) {
                    Ok(())
                } else {
                    Err(Error::config(format!(
                        "epsilon must be in [0, 1], got {epsilon}"
                    )))
                }
            }
            ExplorationStrategy::Boltzmann { temperature } => {
                if temperature > 0.0 && temperature.is_finite() {
                    Ok(())
                } else {
                    Err(Error::config(format!(
                        "temperature must be positive and finite, got {temperature}"
                    )))
                }
            }
        }
    }

    /// Pick an action among `actions` for `state`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeadEnd`] when `actions` is empty.
    pub fn select<R: Rng>(
        &self,
        table: &QTable,
        state: &GridState,
        actions: &[Action],
        rng: &mut R,
    ) -> Result<Action> {
        let dead_end = || Error::DeadEnd {
            x: state.x,
            y: state.y,
        };
        if actions.is_empty() {
            return Err(dead_end());
        }

        match *self {
            ExplorationStrategy::Uniform => actions.choose(rng).copied().ok_or_else(dead_end),
            ExplorationStrategy::EpsilonGreedy { epsilon } => {
                if rng.random::<f64>() < epsilon {
                    actions.choose(rng).copied().ok_or_else(dead_end)
                } else {
                    table.greedy_action(state.id, actions).ok_or_else(dead_end)
                }
            }
            ExplorationStrategy::Boltzmann { temperature } => {
                let weights = boltzmann_weights(table, state, actions, temperature);
                let dist = WeightedIndex::new(&weights).map_err(|e| {
                    Error::config(format!("invalid Boltzmann weights at {}: {e}", state.id))
                })?;
                Ok(actions[dist.sample(rng)])
            }
        }
    }

    /// Selection probability of each action in `actions`, in the same order.
    pub fn probabilities(
        &self,
        table: &QTable,
        state: &GridState,
        actions: &[Action],
    ) -> Vec<f64> {
        if actions.is_empty() {
            return Vec::new();
        }
        let n = actions.len() as f64;
        match *self {
            ExplorationStrategy::Uniform => vec![1.0 / n; actions.len()],
            ExplorationStrategy::EpsilonGreedy { epsilon } => {
                let greedy = table.greedy_action(state.id, actions);
                actions
                    .iter()
                    .map(|&action| {
                        let exploit = if Some(action) == greedy {
                            1.0 - epsilon
                        } else {
                            0.0
                        };
                        epsilon / n + exploit
                    })
                    .collect()
            }
            ExplorationStrategy::Boltzmann { temperature } => {
                let weights = boltzmann_weights(table, state, actions, temperature);
                let total: f64 = weights.iter().sum();
                weights.into_iter().map(|w| w / total).collect()
            }
        }
    }

    /// The same strategy with its parameter decayed once by `schedule`.
    pub fn decayed(&self, schedule: &DecaySchedule) -> Self {
        match *self {
            ExplorationStrategy::Uniform => ExplorationStrategy::Uniform,
            ExplorationStrategy::EpsilonGreedy { epsilon } => ExplorationStrategy::EpsilonGreedy {
                epsilon: schedule.apply(epsilon),
            },
            ExplorationStrategy::Boltzmann { temperature } => ExplorationStrategy::Boltzmann {
                temperature: schedule.apply(temperature),
            },
        }
    }
}

impl fmt::Display for ExplorationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ExplorationStrategy::Uniform => write!(f, "uniform"),
            ExplorationStrategy::EpsilonGreedy { epsilon } => {
                write!(f, "epsilon-greedy(ε={epsilon})")
            }
            ExplorationStrategy::Boltzmann { temperature } => {
                write!(f, "boltzmann(T={temperature})")
            }
        }
    }
}

/// Unnormalised `exp(Q/T)` weights, shifted by the maximum Q so the largest
/// weight is exactly 1 and small temperatures cannot overflow.
fn boltzmann_weights(
    table: &QTable,
    state: &GridState,
    actions: &[Action],
    temperature: f64,
) -> Vec<f64> {
    let values: Vec<f64> = actions
        .iter()
        .map(|&action| table.get(state.id, action))
        .collect();
    let max_q = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    values
        .into_iter()
        .map(|q| ((q - max_q) / temperature).exp())
        .collect()
}

/// Multiplicative per-episode decay with a lower bound
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecaySchedule {
    /// Multiplier applied after each episode, in (0, 1]
    pub rate: f64,
    /// Value the parameter never decays below
    pub floor: f64,
}

impl DecaySchedule {
    pub fn new(rate: f64, floor: f64) -> Result<Self> {
        if !(rate > 0.0 && rate <= 1.0) {
            return Err(Error::config(format!(
                "decay rate must be in (0, 1], got {rate}"
            )));
        }
        if !(floor >= 0.0 && floor.is_finite()) {
            return Err(Error::config(format!(
                "decay floor must be non-negative and finite, got {floor}"
            )));
        }
        Ok(Self { rate, floor })
    }

    pub fn apply(&self, value: f64) -> f64 {
        (value * self.rate).max(self.floor)
    }
}

/// Initial strategy plus an optional decay applied between episodes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplorationSchedule {
    initial: ExplorationStrategy,
    decay: Option<DecaySchedule>,
}

impl ExplorationSchedule {
    pub fn new(initial: ExplorationStrategy, decay: Option<DecaySchedule>) -> Result<Self> {
        initial.validate()?;
        if let (ExplorationStrategy::Boltzmann { .. }, Some(decay)) = (initial, decay) {
            if decay.floor <= 0.0 {
                return Err(Error::config(
                    "Boltzmann temperature decay needs a positive floor",
                ));
            }
        }
        Ok(Self { initial, decay })
    }

    /// A schedule that never changes the strategy.
    pub fn constant(strategy: ExplorationStrategy) -> Result<Self> {
        Self::new(strategy, None)
    }

    /// Strategy in effect for the first episode of every run.
    pub fn initial(&self) -> ExplorationStrategy {
        self.initial
    }

    pub fn decay(&self) -> Option<DecaySchedule> {
        self.decay
    }

    /// Strategy for the episode after one using `current`.
    pub fn next(&self, current: &ExplorationStrategy) -> ExplorationStrategy {
        match &self.decay {
            Some(decay) => current.decayed(decay),
            None => *current,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::maze::Grid;

    fn setup() -> (GridState, QTable) {
        let grid = Grid::open(3, 3).unwrap();
        let table = QTable::for_grid(&grid, 0.0, 0.0).unwrap();
        (grid.state_at(1, 1).unwrap(), table)
    }

    #[test]
    fn test_parse_strategy_kind() {
        assert_eq!("greedy".parse::<StrategyKind>().unwrap(), StrategyKind::EpsilonGreedy);
        assert_eq!("Boltzmann".parse::<StrategyKind>().unwrap(), StrategyKind::Boltzmann);
        assert_eq!("uniform".parse::<StrategyKind>().unwrap(), StrategyKind::Uniform);
        assert!(matches!(
            "thompson".parse::<StrategyKind>(),
            Err(Error::UnsupportedStrategy { .. })
        ));
    }

    #[test]
    fn test_parameter_validation() {
        assert!(ExplorationStrategy::epsilon_greedy(1.2).is_err());
        assert!(ExplorationStrategy::epsilon_greedy(-0.1).is_err());
        assert!(ExplorationStrategy::boltzmann(0.0).is_err());
        assert!(ExplorationStrategy::boltzmann(-1.0).is_err());
        assert!(ExplorationStrategy::boltzmann(f64::INFINITY).is_err());
        assert!(ExplorationStrategy::boltzmann(0.5).is_ok());
    }

    #[test]
    fn test_empty_action_set_is_dead_end() {
        let (state, table) = setup();
        let mut rng = StdRng::seed_from_u64(1);
        for strategy in [
            ExplorationStrategy::Uniform,
            ExplorationStrategy::EpsilonGreedy { epsilon: 0.5 },
            ExplorationStrategy::Boltzmann { temperature: 1.0 },
        ] {
            assert!(matches!(
                strategy.select(&table, &state, &[], &mut rng),
                Err(Error::DeadEnd { x: 1, y: 1 })
            ));
        }
    }

    #[test]
    fn test_greedy_with_zero_epsilon() {
        let (state, mut table) = setup();
        table.set(state.id, Action::Left, 3.0);
        table.set(state.id, Action::Down, 3.0);
        let strategy = ExplorationStrategy::epsilon_greedy(0.0).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let action = strategy.select(&table, &state, &Action::ALL, &mut rng).unwrap();
            assert_eq!(action, Action::Down);
        }
    }

    #[test]
    fn test_epsilon_greedy_probabilities() {
        let (state, mut table) = setup();
        table.set(state.id, Action::Right, 1.0);
        let strategy = ExplorationStrategy::epsilon_greedy(0.2).unwrap();
        let probs = strategy.probabilities(&table, &state, &Action::ALL);
        assert!((probs[3] - 0.85).abs() < 1e-12);
        assert!((probs[0] - 0.05).abs() < 1e-12);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_boltzmann_probabilities_follow_softmax() {
        let (state, mut table) = setup();
        table.set(state.id, Action::Up, 1.0);
        let strategy = ExplorationStrategy::boltzmann(1.0).unwrap();
        let probs = strategy.probabilities(&table, &state, &[Action::Up, Action::Down]);
        let e = std::f64::consts::E;
        assert!((probs[0] - e / (e + 1.0)).abs() < 1e-12);
        assert!((probs[1] - 1.0 / (e + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_boltzmann_large_values_small_temperature() {
        let (state, mut table) = setup();
        table.set(state.id, Action::Up, 100.0);
        table.set(state.id, Action::Down, 99.0);
        let strategy = ExplorationStrategy::boltzmann(1e-3).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let action = strategy
            .select(&table, &state, &[Action::Up, Action::Down], &mut rng)
            .unwrap();
        assert_eq!(action, Action::Up);
    }

    #[test]
    fn test_decay_schedule() {
        let decay = DecaySchedule::new(0.5, 0.1).unwrap();
        let schedule =
            ExplorationSchedule::new(ExplorationStrategy::epsilon_greedy(0.8).unwrap(), Some(decay))
                .unwrap();

        let mut current = schedule.initial();
        let mut seen = Vec::new();
        for _ in 0..4 {
            current = schedule.next(&current);
            seen.push(current.parameter().unwrap());
        }
        assert_eq!(seen, vec![0.4, 0.2, 0.1, 0.1]);
        assert!(DecaySchedule::new(0.0, 0.1).is_err());
        assert!(DecaySchedule::new(0.9, -1.0).is_err());
    }

    #[test]
    fn test_boltzmann_decay_requires_positive_floor() {
        let decay = DecaySchedule::new(0.9, 0.0).unwrap();
        assert!(
            ExplorationSchedule::new(ExplorationStrategy::boltzmann(1.0).unwrap(), Some(decay))
                .is_err()
        );
    }
}
