//! Error types for the planner.

use thiserror::Error;

/// Reasons a planning call is rejected before any search happens.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    #[error("cost grid has {actual} cells, expected {expected}")]
    CostGridLength { expected: usize, actual: usize },

    #[error("invalid planner configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse planner configuration: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, PlanError>;
