//! Domain identifier types for maze states.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a grid cell.
///
/// Derived from the cell position as `row * width + col`, so ids of one maze
/// are dense in `0..width * height` and can index a value table directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateId(usize);

impl StateId {
    /// Create a new state identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use tdmaze::identifiers::StateId;
    ///
    /// let state = StateId::new(7);
    /// assert_eq!(state.index(), 7);
    /// ```
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Identifier of the cell at column `x`, row `y` in a maze of the given width.
    pub fn from_position(x: usize, y: usize, width: usize) -> Self {
        Self(y * width + x)
    }

    /// Get the identifier as a dense index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

impl From<StateId> for usize {
    fn from(id: StateId) -> Self {
        id.0
    }
}
