//! Subcommands of the `tdmaze` binary

pub mod render;
pub mod train;

use anyhow::{Result, anyhow};

use crate::app::GoalConfig;

/// Parse an `X,Y` cell.
pub(crate) fn parse_cell(value: &str, flag: &str) -> Result<(usize, usize)> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| anyhow!("Invalid value '{value}' for {flag} (expected X,Y)"))?;
    let x = x
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid column '{x}' for {flag}"))?;
    let y = y
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid row '{y}' for {flag}"))?;
    Ok((x, y))
}

/// Parse an `X,Y[:REWARD]` goal; the reward defaults to 10.
pub(crate) fn parse_goal(value: &str) -> Result<GoalConfig> {
    let (cell, reward) = match value.split_once(':') {
        Some((cell, reward)) => {
            let reward: f64 = reward
                .trim()
                .parse()
                .map_err(|_| anyhow!("Invalid reward '{reward}' for --goal"))?;
            (cell, reward)
        }
        None => (value, 10.0),
    };
    let (x, y) = parse_cell(cell, "--goal")?;
    Ok(GoalConfig { x, y, reward })
}
