//! Dense state-action value table

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    agent::Action,
    identifiers::StateId,
    maze::{Grid, GridState},
};

/// Q-table mapping (state, action) pairs to estimated returns
///
/// Every enumerated state holds one value per [`Action`], so a lookup can
/// never miss. All entries start from the same initial value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    /// Q-values indexed by state id, then by action index
    values: Vec<[f64; Action::COUNT]>,
    /// Value every entry held after construction
    initial_value: f64,
}

impl QTable {
    /// Create a Q-table with every entry set to `r_max / (1 - discount)`.
    ///
    /// This is the optimistic upper bound on the return of a task whose
    /// rewards never exceed `r_max`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless `0 <= discount < 1` and
    /// `r_max` is finite.
    pub fn new(states: &[GridState], r_max: f64, discount: f64) -> Result<Self> {
        if !r_max.is_finite() {
            return Err(Error::config(format!("r_max must be finite, got {r_max}")));
        }
        if !(0.0..1.0).contains(&discount) {
            return Err(Error::config(format!(
                "table discount must be in [0, 1), got {discount}"
            )));
        }
        Ok(Self::with_initial_value(states, r_max / (1.0 - discount)))
    }

    /// Q-table covering every cell of `grid`.
    pub fn for_grid(grid: &Grid, r_max: f64, discount: f64) -> Result<Self> {
        Self::new(grid.all_states(), r_max, discount)
    }

    /// Q-table with an explicit uniform initial value.
    pub fn with_initial_value(states: &[GridState], initial_value: f64) -> Self {
        let state_count = states
            .iter()
            .map(|state| state.id.index() + 1)
            .max()
            .unwrap_or(0);
        Self {
            values: vec![[initial_value; Action::COUNT]; state_count],
            initial_value,
        }
    }

    /// Get Q-value for a state-action pair
    ///
    /// # Panics
    ///
    /// Panics if `state` was not part of the enumeration the table was built
    /// from. [`QTable::covers`] checks this up front.
    pub fn get(&self, state: StateId, action: Action) -> f64 {
        self.values[state.index()][action.index()]
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: StateId, action: Action, value: f64) {
        self.values[state.index()][action.index()] = value;
    }

    /// All four values of a state, in canonical action order.
    pub fn action_values(&self, state: StateId) -> &[f64; Action::COUNT] {
        &self.values[state.index()]
    }

    /// Get maximum Q-value over the given actions
    pub fn max_q(&self, state: StateId, actions: &[Action]) -> Option<f64> {
        actions
            .iter()
            .map(|&action| self.get(state, action))
            .reduce(f64::max)
    }

    /// Select greedy action (highest Q-value) from `actions`
    ///
    /// Scans in the given order and only replaces the incumbent on a strictly
    /// greater value, so ties go to the earliest action.
    pub fn greedy_action(&self, state: StateId, actions: &[Action]) -> Option<Action> {
        let (&first, rest) = actions.split_first()?;
        let mut best = first;
        let mut best_q = self.get(state, first);
        for &action in rest {
            let q = self.get(state, action);
            if q > best_q {
                best = action;
                best_q = q;
            }
        }
        Some(best)
    }

    /// Move `Q(state, action)` towards `target` by `learning_rate`.
    ///
    /// Q(s,a) ← Q(s,a) + α[target - Q(s,a)]
    pub fn td_update(
        &mut self,
        state: StateId,
        action: Action,
        target: f64,
        learning_rate: f64,
    ) -> f64 {
        let current_q = self.get(state, action);
        let new_q = current_q + learning_rate * (target - current_q);
        self.set(state, action, new_q);
        new_q
    }

    /// Whether every cell of `grid` has an entry.
    pub fn covers(&self, grid: &Grid) -> bool {
        self.values.len() >= grid.len()
    }

    /// Restore every entry to the initial value
    pub fn reset(&mut self) {
        let initial = self.initial_value;
        self.values
            .iter_mut()
            .for_each(|row| *row = [initial; Action::COUNT]);
    }

    pub fn initial_value(&self) -> f64 {
        self.initial_value
    }

    /// Number of states with entries
    pub fn state_count(&self) -> usize {
        self.values.len()
    }
}
