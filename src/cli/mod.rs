//! CLI infrastructure for the maze learning toolkit
//!
//! This module provides the command-line interface for training TD agents on
//! maze files and rendering mazes.

pub mod commands;
pub mod output;
