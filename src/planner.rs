use dstar_core::traits::CostOracle;
use dstar_core::CellRecord;
use tracing::{debug, info, warn};

use crate::config::PlannerConfig;
use crate::error::{PlanError, Result};
use crate::search::{DStarSearch, Progress};
use crate::statistics::SearchStatistics;

/// Result of a planning call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlanOutcome {
    /// A path from the start (or the point the agent resumed from) to the goal, both inclusive.
    Found(Vec<(i32, i32)>),
    /// The goal cannot be reached.
    NoPath,
    /// The expansion budget ran out before the search finished.
    BudgetExhausted,
}

impl PlanOutcome {
    pub fn found(&self) -> bool {
        matches!(self, PlanOutcome::Found(_))
    }

    /// The planned path, empty unless one was found.
    pub fn path(&self) -> &[(i32, i32)] {
        match self {
            PlanOutcome::Found(path) => path,
            _ => &[],
        }
    }

    pub fn into_path(self) -> Vec<(i32, i32)> {
        match self {
            PlanOutcome::Found(path) => path,
            _ => vec![],
        }
    }
}

/// Incremental D* planner over a fixed-size cost grid.
///
/// The first call for a goal searches from scratch. Later calls with the same goal reuse the
/// search tree: they walk a few steps along the cached path from wherever the agent is now, and
/// repair the tree locally when one of those steps has become blocked.
pub struct DStarPlanner {
    config: PlannerConfig,
    search: DStarSearch,
    goal: Option<(i32, i32)>,
    path: Vec<(i32, i32)>,
}

impl DStarPlanner {
    pub fn new(config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        let search = DStarSearch::new(
            config.width,
            config.height,
            config.lethal_cost,
            config.factor,
            config.max_expansions,
        );
        Ok(DStarPlanner {
            config,
            search,
            goal: None,
            path: vec![],
        })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// The goal the search tree is currently rooted at.
    pub fn goal(&self) -> Option<(i32, i32)> {
        self.goal
    }

    /// The path returned by the last successful call.
    pub fn path(&self) -> &[(i32, i32)] {
        &self.path
    }

    /// Counters for the last call.
    pub fn statistics(&self) -> &SearchStatistics {
        self.search.statistics()
    }

    /// Search record of the cell at `state`, or `None` if it is outside the grid.
    pub fn record(&self, state: (i32, i32)) -> Option<CellRecord> {
        self.search.store().record_at(state)
    }

    /// Every cell that is `Closed` after the last call.
    pub fn expanded(&self) -> Vec<(i32, i32)> {
        self.search.store().closed_cells()
    }

    /// Drops the search tree, the frontier, the goal and the cached path.
    pub fn reset(&mut self) {
        self.search.reset();
        self.goal = None;
        self.path.clear();
    }

    /// Plans from `start` to `goal` over `costs`, given row-major with one entry per cell.
    ///
    /// A changed goal (or no usable path from the previous call) resets the search and runs it
    /// from scratch. Otherwise `start` is taken as the agent's current position and the cached
    /// path is checked and repaired ahead of it.
    ///
    /// Statistics are restarted even when the call is rejected.
    pub fn plan(
        &mut self,
        costs: &[u8],
        start: (i32, i32),
        goal: (i32, i32),
    ) -> Result<PlanOutcome> {
        self.search.begin_call();
        if costs.len() != self.config.cells() {
            return Err(PlanError::CostGridLength {
                expected: self.config.cells(),
                actual: costs.len(),
            });
        }
        self.check_bounds(start)?;
        self.check_bounds(goal)?;

        self.search.map_mut().update(costs);

        let outcome = if self.goal != Some(goal) || self.path.is_empty() {
            self.full_search(start, goal)
        } else {
            self.repair(start, goal)
        };

        self.search.statistics().log();
        Ok(self.finish(outcome))
    }

    fn check_bounds(&self, (x, y): (i32, i32)) -> Result<()> {
        if self.search.store().to_linear((x, y)).is_none() {
            return Err(PlanError::OutOfBounds {
                x,
                y,
                width: self.config.width,
                height: self.config.height,
            });
        }
        Ok(())
    }

    fn full_search(&mut self, start: (i32, i32), goal: (i32, i32)) -> PlanOutcome {
        info!(?start, ?goal, "searching from scratch");
        self.search.stats_mut().mark_full_search();
        self.search.reset();
        self.goal = Some(goal);

        let start_id = self.id(start);
        let goal_id = self.id(goal);
        self.search.insert(goal_id, 0.0);

        match self.search.run_until_closed(start_id) {
            Progress::Settled => {}
            Progress::FrontierExhausted => return PlanOutcome::NoPath,
            Progress::BudgetExhausted => return PlanOutcome::BudgetExhausted,
        }
        if !self.search.store().get(start_id).cost.is_finite() {
            return PlanOutcome::NoPath;
        }

        match self.extract_path(start, goal) {
            Some(path) => PlanOutcome::Found(path),
            None => PlanOutcome::NoPath,
        }
    }

    fn repair(&mut self, current: (i32, i32), goal: (i32, i32)) -> PlanOutcome {
        let state = self.resumption_cell(current);
        debug!(?current, resume_from = ?state, "checking cached path");

        let origin = self.id(state);
        let mut x = origin;
        let mut steps = 0;
        while steps < self.config.lookahead {
            let Some(y) = self.search.store().get(x).parent else {
                // reached the goal
                break;
            };
            if !self.search.map().is_blocked(x, y) {
                x = y;
                steps += 1;
                continue;
            }

            debug!(
                from = ?self.search.store().get(x).state,
                to = ?self.search.store().get(y).state,
                "path blocked, repairing"
            );
            self.search.stats_mut().increment_repairs();
            if self.search.modify(x, y) == Progress::BudgetExhausted {
                return PlanOutcome::BudgetExhausted;
            }
            if self.cut_off(origin) {
                return PlanOutcome::NoPath;
            }

            // Cells behind `x` may have been rerouted, so the window is checked again from the
            // resumption cell.
            x = origin;
            steps = 0;
        }

        match self.extract_path(state, goal) {
            Some(path) => PlanOutcome::Found(path),
            None => PlanOutcome::NoPath,
        }
    }

    /// Whether `id` has no route left: its cost is infinite and nothing in the frontier can
    /// lower it.
    fn cut_off(&self, id: usize) -> bool {
        !self.search.store().get(id).cost.is_finite()
            && self.search.min_key().map_or(true, |key| !key.is_finite())
    }

    /// The cell of the cached path closest to `current`, preferring the earliest on ties.
    fn resumption_cell(&self, current: (i32, i32)) -> (i32, i32) {
        let distance = |(x, y): (i32, i32)| ((x - current.0) as f64).hypot((y - current.1) as f64);
        let mut best = self.path[0];
        let mut best_distance = distance(best);
        for &cell in &self.path[1..] {
            let d = distance(cell);
            if d < best_distance {
                best = cell;
                best_distance = d;
            }
        }
        best
    }

    /// Follows parent links from `from` to `goal`.
    ///
    /// Fails if the links do not reach the goal within one visit per cell. The cost of `from` is
    /// not consulted: mid-repair it may still be raised while its parents already lead home.
    fn extract_path(&self, from: (i32, i32), goal: (i32, i32)) -> Option<Vec<(i32, i32)>> {
        let store = self.search.store();
        let mut id = self.id(from);

        let mut path = vec![from];
        while store.get(id).state != goal {
            if path.len() > store.len() {
                warn!(?from, ?goal, "parent links form a cycle");
                return None;
            }
            id = store.get(id).parent?;
            path.push(store.get(id).state);
        }
        Some(path)
    }

    fn finish(&mut self, outcome: PlanOutcome) -> PlanOutcome {
        match &outcome {
            PlanOutcome::Found(path) => {
                self.path.clone_from(path);
            }
            PlanOutcome::NoPath => {
                warn!(goal = ?self.goal, "no path to goal");
                self.goal = None;
                self.path.clear();
            }
            PlanOutcome::BudgetExhausted => {
                warn!(goal = ?self.goal, "expansion budget exhausted");
                self.goal = None;
                self.path.clear();
            }
        }
        outcome
    }

    #[track_caller]
    fn id(&self, state: (i32, i32)) -> usize {
        self.search
            .store()
            .to_linear(state)
            .expect("coordinates are bounds-checked on entry")
    }
}
