//! Valid-action enumeration and stepping against real mazes

use tdmaze::{Action, Agent, Error, Grid, agent::valid_actions_at};

const CROSS: &str = "\
5 5
1 1 1 1 1
1 0 1 0 1
1 1 1 1 1
1 0 1 0 1
1 1 0 1 1
";

#[test]
fn test_surrounded_cells_have_all_actions() {
    let grid = Grid::open(6, 5).unwrap();
    for y in 1..grid.height() - 1 {
        for x in 1..grid.width() - 1 {
            assert_eq!(valid_actions_at(&grid, x, y), Action::ALL.to_vec());
        }
    }
}

#[test]
fn test_surrounded_cells_in_a_maze() {
    let grid: Grid = CROSS.parse().unwrap();
    for state in grid.all_states() {
        let (x, y) = (state.x, state.y);
        if x == 0 || y == 0 || x == grid.width() - 1 || y == grid.height() - 1 {
            continue;
        }
        let surrounded = Action::ALL.iter().all(|&action| {
            let (nx, ny) = grid.neighbour(x, y, action).unwrap();
            grid.is_walkable(nx, ny).unwrap()
        });
        if state.is_walkable() && surrounded {
            assert_eq!(valid_actions_at(&grid, x, y).len(), 4, "cell ({x}, {y})");
        }
    }
    assert_eq!(valid_actions_at(&grid, 2, 2).len(), 4);
}

#[test]
fn test_cells_next_to_walls_only_have_no_actions() {
    let grid: Grid = "3 3\n1 0 1\n0 1 0\n1 0 1\n".parse().unwrap();
    assert!(valid_actions_at(&grid, 1, 1).is_empty());
    // corners see only walls and the grid edge
    for (x, y) in [(0, 0), (2, 0), (0, 2), (2, 2)] {
        assert!(valid_actions_at(&grid, x, y).is_empty());
    }
}

#[test]
fn test_edges_never_leave_the_grid() {
    let grid = Grid::open(4, 3).unwrap();
    assert_eq!(
        valid_actions_at(&grid, 0, 0),
        vec![Action::Down, Action::Right]
    );
    assert_eq!(valid_actions_at(&grid, 3, 2), vec![Action::Up, Action::Left]);
}

#[test]
fn test_walk_and_reset() {
    let mut grid: Grid = CROSS.parse().unwrap();
    grid.set_reward(4, 4, 1.0).unwrap();
    grid.mark_terminal(4, 4).unwrap();
    let mut agent = Agent::new(0, 0);

    for action in [Action::Right, Action::Right, Action::Down, Action::Down] {
        let outcome = agent.step(action, &grid).unwrap();
        assert!(!outcome.terminal);
    }
    assert_eq!(agent.position(), (2, 2));
    agent.step(Action::Down, &grid).unwrap();
    assert!(matches!(
        agent.step(Action::Down, &grid),
        Err(Error::BlockedMove { x: 2, y: 3, .. })
    ));
    assert_eq!(agent.position(), (2, 3));
    assert_eq!(agent.steps_since_reset(), 5);

    agent.reset();
    assert_eq!(agent.position(), (0, 0));
    assert_eq!(agent.steps_since_reset(), 0);
}
