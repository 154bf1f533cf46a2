//! Value-table initialization and the two TD update rules

mod common;

use common::learner;
use tdmaze::{Action, Error, Grid, QTable, UpdateRule, q_learning::Transition};

#[test]
fn test_table_initialized_to_optimistic_bound() {
    let grid: Grid = "4 3\n1 1 0 1\n1 0 1 1\n1 1 1 1\n".parse().unwrap();
    let table = QTable::for_grid(&grid, 10.0, 0.9).unwrap();
    let expected = 10.0 / (1.0 - 0.9);
    for state in grid.all_states() {
        for action in Action::ALL {
            assert_eq!(table.get(state.id, action), expected);
        }
    }
}

#[test]
fn test_unit_discount_rejected_at_initialization() {
    let grid = Grid::open(2, 2).unwrap();
    assert!(matches!(
        QTable::for_grid(&grid, 10.0, 1.0),
        Err(Error::InvalidConfiguration { .. })
    ));
}

#[test]
fn test_one_step_q_learning_stores_reward() {
    let mut grid = Grid::open(3, 1).unwrap();
    grid.set_reward(1, 0, 3.5).unwrap();
    let mut table = QTable::for_grid(&grid, 10.0, 0.5).unwrap();
    let state = grid.state_at(0, 0).unwrap();
    let next_state = grid.state_at(1, 0).unwrap();

    let updated = learner(UpdateRule::QLearning, 1.0, 0.0)
        .learn(
            &mut table,
            &Transition {
                state,
                action: Action::Right,
                reward: 3.5,
                next_state,
                next_actions: &[Action::Left, Action::Right],
                next_action: Some(Action::Left),
                terminal: false,
            },
        )
        .unwrap();

    assert_eq!(updated, Some(3.5));
    assert_eq!(table.get(state.id, Action::Right), 3.5);
}

#[test]
fn test_sarsa_uses_selected_action_not_maximum() {
    let grid = Grid::open(3, 1).unwrap();
    let state = grid.state_at(0, 0).unwrap();
    let next_state = grid.state_at(1, 0).unwrap();
    let transition = Transition {
        state,
        action: Action::Right,
        reward: 0.0,
        next_state,
        next_actions: &[Action::Left, Action::Right],
        next_action: Some(Action::Left),
        terminal: false,
    };

    let mut sarsa_table = QTable::with_initial_value(grid.all_states(), 0.0);
    sarsa_table.set(next_state.id, Action::Left, 1.0);
    sarsa_table.set(next_state.id, Action::Right, 8.0);
    let mut q_table = sarsa_table.clone();

    learner(UpdateRule::Sarsa, 1.0, 0.5)
        .learn(&mut sarsa_table, &transition)
        .unwrap();
    learner(UpdateRule::QLearning, 1.0, 0.5)
        .learn(&mut q_table, &transition)
        .unwrap();

    assert!((sarsa_table.get(state.id, Action::Right) - 0.5).abs() < 1e-12);
    assert!((q_table.get(state.id, Action::Right) - 4.0).abs() < 1e-12);
}

#[test]
fn test_terminal_transition_leaves_table_unchanged() {
    let mut grid = Grid::open(3, 1).unwrap();
    grid.set_reward(2, 0, 10.0).unwrap();
    grid.mark_terminal(2, 0).unwrap();
    let table = QTable::for_grid(&grid, 10.0, 0.9).unwrap();
    let transition = Transition {
        state: grid.state_at(1, 0).unwrap(),
        action: Action::Right,
        reward: 10.0,
        next_state: grid.state_at(2, 0).unwrap(),
        next_actions: &[Action::Left],
        next_action: None,
        terminal: true,
    };

    for rule in [UpdateRule::QLearning, UpdateRule::Sarsa] {
        let mut trained = table.clone();
        let updated = learner(rule, 0.7, 0.9)
            .learn(&mut trained, &transition)
            .unwrap();
        assert_eq!(updated, None, "{rule}");
        assert_eq!(trained, table, "{rule}");
    }
}
