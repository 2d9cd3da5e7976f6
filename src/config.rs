//! Planner configuration.

use serde::Deserialize;

use crate::error::{PlanError, Result};

/// Parameters fixed for the lifetime of a [`DStarPlanner`](crate::DStarPlanner).
///
/// Can be built in code or loaded from TOML; omitted fields take their defaults.
///
/// ```toml
/// width = 200
/// height = 120
/// lethal_cost = 253
/// factor = 0.25
/// lookahead = 5
/// max_expansions = 100000
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Grid width in cells.
    pub width: i32,
    /// Grid height in cells.
    pub height: i32,
    /// Nominal lethal traversal cost.
    pub lethal_cost: u8,
    /// Scale applied to `lethal_cost`; cells with a cost above the product are blocked.
    pub factor: f64,
    /// Number of parent-link steps checked for new obstacles on each incremental call.
    pub lookahead: usize,
    /// Cap on expansions per `plan()` call. `None` searches until done.
    pub max_expansions: Option<usize>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            lethal_cost: 253,
            factor: 0.25,
            lookahead: 5,
            max_expansions: None,
        }
    }
}

impl PlannerConfig {
    /// Default configuration for a `width` x `height` grid.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: PlannerConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(PlanError::InvalidConfig(format!(
                "grid must have positive extents, got {}x{}",
                self.width, self.height
            )));
        }
        if (self.width as u64) * (self.height as u64) > u32::MAX as u64 {
            return Err(PlanError::InvalidConfig(format!(
                "grid of {}x{} cells is too large",
                self.width, self.height
            )));
        }
        if !self.factor.is_finite() || self.factor < 0.0 {
            return Err(PlanError::InvalidConfig(format!(
                "factor must be finite and non-negative, got {}",
                self.factor
            )));
        }
        if self.lookahead == 0 {
            return Err(PlanError::InvalidConfig(
                "lookahead must be at least one step".into(),
            ));
        }
        Ok(())
    }

    /// Number of cells in the grid.
    pub fn cells(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
