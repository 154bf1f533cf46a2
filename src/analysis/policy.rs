//! Greedy policy inspection

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    agent::{Action, Agent},
    maze::Grid,
    q_learning::QTable,
};

/// Path produced by always taking the greedy action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreedyRollout {
    /// Visited cells as `(row, col)`, start included
    pub trajectory: Vec<(usize, usize)>,
    pub actions: Vec<Action>,
    pub reached_terminal: bool,
}

impl GreedyRollout {
    pub fn steps(&self) -> usize {
        self.actions.len()
    }
}

/// Follow the greedy action of `table` from `start` for at most `max_steps`.
///
/// The table is not updated. Ties resolve to the earliest action in
/// canonical order.
pub fn greedy_rollout(
    grid: &Grid,
    table: &QTable,
    start: (usize, usize),
    max_steps: usize,
) -> Result<GreedyRollout> {
    let mut agent = Agent::new(start.0, start.1);
    let mut state = agent.state(grid)?;
    let mut trajectory = vec![state.row_col()];
    let mut actions = Vec::new();

    while !state.terminal && actions.len() < max_steps {
        let valid = agent.valid_actions(grid);
        let action = table
            .greedy_action(state.id, &valid)
            .ok_or(Error::DeadEnd {
                x: state.x,
                y: state.y,
            })?;
        state = agent.step(action, grid)?.next_state;
        trajectory.push(state.row_col());
        actions.push(action);
    }

    Ok(GreedyRollout {
        trajectory,
        actions,
        reached_terminal: state.terminal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greedy_rollout_follows_table() {
        let mut grid: Grid = "3 1\n1 1 1\n".parse().unwrap();
        grid.mark_terminal(2, 0).unwrap();
        let mut table = QTable::for_grid(&grid, 0.0, 0.0).unwrap();
        table.set(grid.state_at(1, 0).unwrap().id, Action::Right, 1.0);

        let rollout = greedy_rollout(&grid, &table, (0, 0), 10).unwrap();
        assert!(rollout.reached_terminal);
        assert_eq!(rollout.actions, vec![Action::Right, Action::Right]);
        assert_eq!(rollout.trajectory, vec![(0, 0), (0, 1), (0, 2)]);
    }

    #[test]
    fn test_greedy_rollout_respects_cap() {
        let mut grid: Grid = "3 1\n1 1 1\n".parse().unwrap();
        grid.mark_terminal(2, 0).unwrap();
        // all values tie, so the middle cell always picks Left
        let table = QTable::for_grid(&grid, 0.0, 0.0).unwrap();

        let rollout = greedy_rollout(&grid, &table, (0, 0), 5).unwrap();
        assert!(!rollout.reached_terminal);
        assert_eq!(rollout.steps(), 5);
    }

    #[test]
    fn test_boxed_in_start_is_dead_end() {
        let mut grid: Grid = "3 1\n1 0 1\n".parse().unwrap();
        grid.mark_terminal(2, 0).unwrap();
        let table = QTable::for_grid(&grid, 0.0, 0.0).unwrap();
        assert!(matches!(
            greedy_rollout(&grid, &table, (0, 0), 5),
            Err(Error::DeadEnd { x: 0, y: 0 })
        ));
    }
}
