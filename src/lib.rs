//! Incremental D* path planning on 8-connected cost grids.
//!
//! [`DStarPlanner`] computes a shortest path from a start cell to a goal cell and, on later calls
//! with the same goal, repairs that path locally when cells along it become lethal instead of
//! searching again from scratch.
//!
//! ```
//! use dstar::{DStarPlanner, PlannerConfig};
//!
//! let mut planner = DStarPlanner::new(PlannerConfig::new(5, 5)).unwrap();
//! let mut costs = vec![0u8; 25];
//!
//! let first = planner.plan(&costs, (0, 0), (4, 4)).unwrap();
//! assert_eq!(first.path(), &[(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)]);
//!
//! costs[2 * 5 + 2] = 255;
//! let second = planner.plan(&costs, (0, 0), (4, 4)).unwrap();
//! assert!(second.found());
//! assert!(!second.path().contains(&(2, 2)));
//! ```

pub use dstar_core::*;
pub use dstar_grid as grid;

pub mod config;
pub mod error;
mod planner;
pub mod search;
mod statistics;

pub use crate::config::PlannerConfig;
pub use crate::error::{PlanError, Result};
pub use crate::planner::{DStarPlanner, PlanOutcome};
pub use crate::search::{DStarSearch, Progress};
pub use crate::statistics::SearchStatistics;
