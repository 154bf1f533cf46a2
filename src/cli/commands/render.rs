//! Render command - Print a maze as ASCII

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::{
        commands::parse_goal,
        output::{print_kv, print_maze, print_section},
    },
    maze::{Grid, render_ascii},
};

#[derive(Parser, Debug)]
#[command(about = "Print a maze with its goal cells")]
pub struct RenderArgs {
    /// Maze file
    pub maze: PathBuf,

    /// Goal cell as X,Y[:REWARD] (repeatable)
    #[arg(long = "goal", short = 'g')]
    pub goals: Vec<String>,
}

/// Load the maze and mark the goals given on the command line.
pub fn load_marked(args: &RenderArgs) -> Result<Grid> {
    let mut grid = Grid::load(&args.maze)?;
    for goal in &args.goals {
        let goal = parse_goal(goal)?;
        grid.set_reward(goal.x, goal.y, goal.reward)?;
        grid.mark_terminal(goal.x, goal.y)?;
    }
    Ok(grid)
}

pub fn execute(args: RenderArgs) -> Result<()> {
    let grid = load_marked(&args)?;
    let walkable = grid.all_states().iter().filter(|s| s.is_walkable()).count();

    print_section(&format!("Maze {}", args.maze.display()));
    print_kv("Size", &format!("{} x {}", grid.width(), grid.height()));
    print_kv("Walkable cells", &walkable.to_string());
    print_kv("Goals", &grid.terminal_states().count().to_string());
    println!();
    print_maze(&render_ascii(&grid, &[]));
    Ok(())
}
