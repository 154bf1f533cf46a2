//! Plain-text maze loader
//!
//! The first line holds `<width> <height>`. Each of the next `height` lines
//! lists at least `width` space-separated tokens: `0` is a wall, any other
//! token is walkable. Tokens past `width` on a row and blank lines are ignored.

use std::{fs, path::Path, str::FromStr};

use super::grid::{CellKind, Grid};
use crate::{Error, Result};

fn parse_dimension(token: Option<&str>, name: &str) -> Result<usize> {
    let token = token.ok_or_else(|| Error::InvalidMaze {
        line: 1,
        message: format!("missing {name}"),
    })?;
    token.parse::<usize>().map_err(|_| Error::InvalidMaze {
        line: 1,
        message: format!("{name} '{token}' is not a non-negative integer"),
    })
}

impl FromStr for Grid {
    type Err = Error;

    fn from_str(source: &str) -> Result<Self> {
        let mut lines = source
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim_end()))
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header) = lines.next().ok_or(Error::EmptyMaze)?;
        let mut dims = header.split_whitespace();
        let width = parse_dimension(dims.next(), "width")?;
        let height = parse_dimension(dims.next(), "height")?;
        if width == 0 || height == 0 {
            return Err(Error::EmptyMaze);
        }

        let mut cells = Vec::with_capacity(width * height);
        for row in 0..height {
            let (line_no, line) = lines.next().ok_or_else(|| Error::InvalidMaze {
                line: 0,
                message: format!("expected {height} rows, found {row}"),
            })?;
            let tokens: Vec<&str> = line.split_whitespace().take(width).collect();
            if tokens.len() < width {
                return Err(Error::InvalidMaze {
                    line: line_no,
                    message: format!("expected {width} cells, found {}", tokens.len()),
                });
            }
            cells.extend(tokens.into_iter().map(CellKind::from_token));
        }

        if let Some((line_no, _)) = lines.next() {
            return Err(Error::InvalidMaze {
                line: line_no,
                message: format!("unexpected row beyond declared height {height}"),
            });
        }

        Grid::new(width, height, cells)
    }
}

impl Grid {
    /// Load a maze description from a file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read, so a missing maze
    /// never yields a half-built grid.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read maze file {}", path.display()),
            source,
        })?;
        source.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_corridor() {
        let grid: Grid = "3 1\n1 1 1\n".parse().unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 1);
        assert!(grid.all_states().iter().all(|s| s.is_walkable()));
    }

    #[test]
    fn test_parse_walls_and_trailing_separator() {
        let grid: Grid = "3 2\n1 0 1 \n1 1 0 \n".parse().unwrap();
        assert!(!grid.is_walkable(1, 0).unwrap());
        assert!(!grid.is_walkable(2, 1).unwrap());
        assert!(grid.is_walkable(0, 1).unwrap());
        assert_eq!(grid.state_at(2, 1).unwrap().id.index(), 5);
    }

    #[test]
    fn test_extra_tokens_ignored() {
        let grid: Grid = "2 1\n1 0 x\n".parse().unwrap();
        assert_eq!(grid.len(), 2);
        assert!(!grid.is_walkable(1, 0).unwrap());
    }

    #[test]
    fn test_any_nonzero_token_is_path() {
        let grid: Grid = "3 1\n2 a 0\n".parse().unwrap();
        assert!(grid.is_walkable(0, 0).unwrap());
        assert!(grid.is_walkable(1, 0).unwrap());
        assert!(!grid.is_walkable(2, 0).unwrap());
    }

    #[test]
    fn test_short_row_rejected() {
        let err = "3 2\n1 1 1\n1 1\n".parse::<Grid>().unwrap_err();
        assert!(matches!(err, Error::InvalidMaze { line: 3, .. }));
    }

    #[test]
    fn test_missing_rows_rejected() {
        let err = "2 3\n1 1\n1 1\n".parse::<Grid>().unwrap_err();
        assert!(matches!(err, Error::InvalidMaze { .. }));
    }

    #[test]
    fn test_extra_rows_rejected() {
        let err = "2 1\n1 1\n1 1\n".parse::<Grid>().unwrap_err();
        assert!(matches!(err, Error::InvalidMaze { line: 3, .. }));
    }

    #[test]
    fn test_bad_header() {
        assert!(matches!(
            "three 1\n1 1 1\n".parse::<Grid>(),
            Err(Error::InvalidMaze { line: 1, .. })
        ));
        assert!(matches!("".parse::<Grid>(), Err(Error::EmptyMaze)));
        assert!(matches!("0 4\n".parse::<Grid>(), Err(Error::EmptyMaze)));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = Grid::load("/definitely/not/a/maze.txt").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
