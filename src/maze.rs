//! Maze environment: grid geometry, text loader and ASCII visualizer

pub mod grid;
pub mod loader;
pub mod render;

pub use grid::{CellKind, Grid, GridState};
pub use render::render_ascii;
