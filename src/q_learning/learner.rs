//! Temporal difference update rules

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    agent::Action,
    maze::GridState,
    q_learning::q_table::QTable,
};

/// Which successor value a TD update bootstraps from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateRule {
    /// Off-policy: bootstrap from max_a' Q(s',a')
    #[default]
    QLearning,
    /// On-policy: bootstrap from Q(s',a') for the action actually selected next
    Sarsa,
}

impl UpdateRule {
    const EXPECTED: &'static str = "q-learning, sarsa";

    pub fn name(self) -> &'static str {
        match self {
            UpdateRule::QLearning => "q-learning",
            UpdateRule::Sarsa => "sarsa",
        }
    }
}

impl fmt::Display for UpdateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UpdateRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "q-learning" | "qlearning" | "q_learning" | "q" => Ok(UpdateRule::QLearning),
            "sarsa" => Ok(UpdateRule::Sarsa),
            other => Err(Error::UnsupportedUpdateRule {
                name: other.to_string(),
                expected: Self::EXPECTED.to_string(),
            }),
        }
    }
}

/// Hyperparameters shared by both update rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerConfig {
    /// Step size α, in (0, 1]
    pub learning_rate: f64,
    /// Discount factor γ, in [0, 1]
    pub discount: f64,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.7,
            discount: 0.9,
        }
    }
}

impl LearnerConfig {
    pub fn new(learning_rate: f64, discount: f64) -> Result<Self> {
        let config = Self {
            learning_rate,
            discount,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::config(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.discount) {
            return Err(Error::config(format!(
                "discount must be in [0, 1], got {}",
                self.discount
            )));
        }
        Ok(())
    }
}

/// One observed transition `(s, a, r, s')` plus what is known about `s'`
#[derive(Debug, Clone, Copy)]
pub struct Transition<'a> {
    pub state: GridState,
    pub action: Action,
    pub reward: f64,
    pub next_state: GridState,
    /// Valid actions at `next_state`, as enumerated by the agent
    pub next_actions: &'a [Action],
    /// Action the policy selected at `next_state`; `None` after a terminal step
    pub next_action: Option<Action>,
    pub terminal: bool,
}

/// TD learner applying one [`UpdateRule`] to a [`QTable`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TdLearner {
    rule: UpdateRule,
    config: LearnerConfig,
}

impl TdLearner {
    pub fn new(rule: UpdateRule, config: LearnerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { rule, config })
    }

    pub fn q_learning(config: LearnerConfig) -> Result<Self> {
        Self::new(UpdateRule::QLearning, config)
    }

    pub fn sarsa(config: LearnerConfig) -> Result<Self> {
        Self::new(UpdateRule::Sarsa, config)
    }

    pub fn rule(&self) -> UpdateRule {
        self.rule
    }

    pub fn config(&self) -> LearnerConfig {
        self.config
    }

    /// TD target for a transition, or `None` for terminal transitions.
    ///
    /// Terminal states carry no bootstrapped future value, and the update is
    /// skipped entirely for them.
    pub fn target(&self, table: &QTable, transition: &Transition<'_>) -> Result<Option<f64>> {
        if transition.terminal {
            return Ok(None);
        }

        let next_id = transition.next_state.id;
        let next_q = match self.rule {
            UpdateRule::QLearning => table
                .max_q(next_id, transition.next_actions)
                .ok_or(Error::DeadEnd {
                    x: transition.next_state.x,
                    y: transition.next_state.y,
                })?,
            UpdateRule::Sarsa => {
                let next_action = transition.next_action.ok_or(Error::MissingNextAction)?;
                table.get(next_id, next_action)
            }
        };

        Ok(Some(transition.reward + self.config.discount * next_q))
    }

    /// Apply the update rule to `table`.
    ///
    /// Returns the new value of `Q(s, a)`, or `None` when the transition was
    /// terminal and the table was left untouched.
    pub fn learn(&self, table: &mut QTable, transition: &Transition<'_>) -> Result<Option<f64>> {
        let Some(target) = self.target(table, transition)? else {
            return Ok(None);
        };
        Ok(Some(table.td_update(
            transition.state.id,
            transition.action,
            target,
            self.config.learning_rate,
        )))
    }
}
