//! Grid geometry, walkability, rewards and terminal markers

use std::{
    collections::VecDeque,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    agent::Action,
    identifiers::StateId,
};

/// Classification of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Path,
    Wall,
}

impl CellKind {
    /// Parse a maze token: `0` is a wall, anything else is walkable.
    pub fn from_token(token: &str) -> CellKind {
        if token == "0" {
            CellKind::Wall
        } else {
            CellKind::Path
        }
    }
}

/// A single cell of the maze
///
/// Identity is the [`StateId`]; two `GridState` values compare equal when
/// they refer to the same cell, regardless of the terminal flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GridState {
    pub id: StateId,
    /// Column
    pub x: usize,
    /// Row
    pub y: usize,
    pub kind: CellKind,
    pub terminal: bool,
}

impl GridState {
    pub fn is_walkable(&self) -> bool {
        self.kind == CellKind::Path
    }

    /// Position as `(row, col)`, the convention used by trajectories.
    pub fn row_col(&self) -> (usize, usize) {
        (self.y, self.x)
    }
}

impl PartialEq for GridState {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for GridState {}

impl Hash for GridState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Static maze: one [`GridState`] and one reward per in-bounds cell
///
/// Cells are stored row-major, so the position of a cell in [`Grid::all_states`]
/// equals its [`StateId`] index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    states: Vec<GridState>,
    rewards: Vec<f64>,
}

impl Grid {
    /// Create a grid from row-major cell classifications.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyMaze`] for a zero dimension and
    /// [`Error::InvalidMaze`] when the number of cells does not match.
    pub fn new(width: usize, height: usize, cells: Vec<CellKind>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyMaze);
        }
        if cells.len() != width * height {
            return Err(Error::InvalidMaze {
                line: 0,
                message: format!(
                    "expected {} cells for a {width}x{height} maze, got {}",
                    width * height,
                    cells.len()
                ),
            });
        }

        let states = cells
            .into_iter()
            .enumerate()
            .map(|(index, kind)| GridState {
                id: StateId::new(index),
                x: index % width,
                y: index / width,
                kind,
                terminal: false,
            })
            .collect();

        Ok(Self {
            width,
            height,
            states,
            rewards: vec![0.0; width * height],
        })
    }

    /// A grid with every cell walkable.
    pub fn open(width: usize, height: usize) -> Result<Self> {
        Self::new(width, height, vec![CellKind::Path; width * height])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells (walls included).
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    fn index(&self, x: usize, y: usize) -> Result<usize> {
        if self.in_bounds(x, y) {
            Ok(y * self.width + x)
        } else {
            Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Cell at `(x, y)`, or `None` outside the grid.
    pub fn cell(&self, x: usize, y: usize) -> Option<&GridState> {
        if self.in_bounds(x, y) {
            self.states.get(y * self.width + x)
        } else {
            None
        }
    }

    pub fn state_at(&self, x: usize, y: usize) -> Result<GridState> {
        let index = self.index(x, y)?;
        Ok(self.states[index])
    }

    /// Look up a state by id.
    pub fn state(&self, id: StateId) -> Option<&GridState> {
        self.states.get(id.index())
    }

    pub fn is_walkable(&self, x: usize, y: usize) -> Result<bool> {
        Ok(self.state_at(x, y)?.is_walkable())
    }

    pub fn reward_at(&self, x: usize, y: usize) -> Result<f64> {
        let index = self.index(x, y)?;
        Ok(self.rewards[index])
    }

    pub fn set_reward(&mut self, x: usize, y: usize, reward: f64) -> Result<()> {
        let index = self.index(x, y)?;
        self.rewards[index] = reward;
        Ok(())
    }

    /// Mark the cell at `(x, y)` as ending an episode on arrival.
    ///
    /// # Errors
    ///
    /// Fails for out-of-bounds coordinates and for walls, which can never be entered.
    pub fn mark_terminal(&mut self, x: usize, y: usize) -> Result<()> {
        let index = self.index(x, y)?;
        let state = &mut self.states[index];
        if !state.is_walkable() {
            return Err(Error::config(format!(
                "cannot mark wall cell ({x}, {y}) as terminal"
            )));
        }
        state.terminal = true;
        Ok(())
    }

    pub fn all_states(&self) -> &[GridState] {
        &self.states
    }

    pub fn terminal_states(&self) -> impl Iterator<Item = &GridState> {
        self.states.iter().filter(|state| state.terminal)
    }

    /// Destination of a one-cell move, or `None` when it would leave the grid.
    pub fn neighbour(&self, x: usize, y: usize, action: Action) -> Option<(usize, usize)> {
        let (dx, dy) = action.delta();
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        self.in_bounds(nx, ny).then_some((nx, ny))
    }

    /// Whether a walkable path leads from `(x, y)` to any terminal cell.
    pub fn terminal_reachable_from(&self, x: usize, y: usize) -> bool {
        let Some(start) = self.cell(x, y) else {
            return false;
        };
        if !start.is_walkable() {
            return false;
        }

        let mut visited = vec![false; self.states.len()];
        let mut queue = VecDeque::from([(x, y)]);
        visited[start.id.index()] = true;

        while let Some((cx, cy)) = queue.pop_front() {
            if self.states[cy * self.width + cx].terminal {
                return true;
            }
            for action in Action::ALL {
                let Some((nx, ny)) = self.neighbour(cx, cy, action) else {
                    continue;
                };
                let index = ny * self.width + nx;
                if !visited[index] && self.states[index].is_walkable() {
                    visited[index] = true;
                    queue.push_back((nx, ny));
                }
            }
        }
        false
    }
}
