//! Agent position, valid-action enumeration and step transition

pub mod action;

pub use action::Action;

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    maze::{Grid, GridState},
};

/// Result of one environment step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub next_state: GridState,
    pub reward: f64,
    pub terminal: bool,
}

/// An agent moving through a [`Grid`]
///
/// The agent never stands on a wall: moves into walls or off the grid are
/// rejected by [`Agent::step`] and never offered by [`Agent::valid_actions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    x: usize,
    y: usize,
    start_x: usize,
    start_y: usize,
    steps_since_reset: usize,
}

impl Agent {
    /// Create an agent standing on its start cell.
    pub fn new(start_x: usize, start_y: usize) -> Self {
        Self {
            x: start_x,
            y: start_y,
            start_x,
            start_y,
            steps_since_reset: 0,
        }
    }

    /// Current `(x, y)`.
    pub fn position(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    /// Start `(x, y)` restored by [`Agent::reset`].
    pub fn start(&self) -> (usize, usize) {
        (self.start_x, self.start_y)
    }

    pub fn steps_since_reset(&self) -> usize {
        self.steps_since_reset
    }

    /// The grid state under the agent.
    pub fn state(&self, grid: &Grid) -> Result<GridState> {
        grid.state_at(self.x, self.y)
    }

    /// Actions that keep the agent in bounds and off walls, in canonical order.
    pub fn valid_actions(&self, grid: &Grid) -> Vec<Action> {
        valid_actions_at(grid, self.x, self.y)
    }

    /// Move one cell and report the destination, its reward and terminal flag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BlockedMove`] when `action` is not currently valid; the
    /// agent does not move in that case.
    pub fn step(&mut self, action: Action, grid: &Grid) -> Result<StepOutcome> {
        let blocked = || Error::BlockedMove {
            action,
            x: self.x,
            y: self.y,
        };
        let (nx, ny) = grid.neighbour(self.x, self.y, action).ok_or_else(blocked)?;
        let next_state = grid.state_at(nx, ny)?;
        if !next_state.is_walkable() {
            return Err(blocked());
        }

        self.x = nx;
        self.y = ny;
        self.steps_since_reset += 1;

        Ok(StepOutcome {
            next_state,
            reward: grid.reward_at(nx, ny)?,
            terminal: next_state.terminal,
        })
    }

    /// Return to the start cell and zero the step counter.
    pub fn reset(&mut self) {
        self.x = self.start_x;
        self.y = self.start_y;
        self.steps_since_reset = 0;
    }
}

/// Valid actions from an arbitrary cell, in canonical order.
pub fn valid_actions_at(grid: &Grid, x: usize, y: usize) -> Vec<Action> {
    Action::ALL
        .into_iter()
        .filter(|&action| {
            grid.neighbour(x, y, action)
                .and_then(|(nx, ny)| grid.cell(nx, ny))
                .is_some_and(GridState::is_walkable)
        })
        .collect()
}
