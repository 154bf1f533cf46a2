//! ASCII rendering of a maze with a visited path

use super::grid::Grid;

const WALL: char = '#';
const PATH: char = '.';
const VISITED: char = '*';
const TERMINAL: char = 'X';

/// Render the maze one character per cell, one line per row.
///
/// `path` holds `(row, col)` cells, typically an episode trajectory. Cells
/// outside the grid are skipped. Terminal markers are drawn last so they stay
/// visible when the path ends on them.
pub fn render_ascii(grid: &Grid, path: &[(usize, usize)]) -> String {
    let mut canvas: Vec<Vec<char>> = (0..grid.height())
        .map(|_| vec![PATH; grid.width()])
        .collect();

    for state in grid.all_states() {
        if !state.is_walkable() {
            canvas[state.y][state.x] = WALL;
        }
    }

    for &(row, col) in path {
        if grid.in_bounds(col, row) {
            canvas[row][col] = VISITED;
        }
    }

    for state in grid.terminal_states() {
        canvas[state.y][state.x] = TERMINAL;
    }

    let mut out = String::with_capacity(grid.height() * (grid.width() + 1));
    for row in canvas {
        out.extend(row);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_walls_path_and_goal() {
        let mut grid: Grid = "3 2\n1 1 0\n0 1 1\n".parse().unwrap();
        grid.mark_terminal(2, 1).unwrap();

        let rendered = render_ascii(&grid, &[(0, 0), (0, 1), (1, 1), (1, 2), (7, 7)]);
        assert_eq!(rendered, "**#\n#*X\n");
    }

    #[test]
    fn test_render_without_path() {
        let grid: Grid = "2 1\n1 0\n".parse().unwrap();
        assert_eq!(render_ascii(&grid, &[]), ".#\n");
    }
}
