//! The D* state propagation engine.
//!
//! Costs are cost-to-goal: the search grows outward from the goal, and every cell's parent is the
//! neighbour one step closer to it. After the traversal costs change, cells are re-inserted into
//! the frontier and [`DStarSearch::process_state`] propagates the change only as far as it can
//! still matter:
//!
//! - a cell popped with `key == cost` is a LOWER state and relaxes its neighbours as in Dijkstra;
//! - a cell popped with `key < cost` is a RAISE state. It first tries to lower its own cost
//!   through neighbours that are already settled below the old key, then pushes the increase to
//!   its children and re-queues anything that might offer it (or its neighbours) a better route.

use dstar_core::traits::{CostOracle, Expander, OpenList, WeightedEdge};
use dstar_core::{CellTag, PriorityQueue};
use dstar_grid::{CostMap, EightConnectedExpander, NodeStore};
use tracing::trace;

use crate::statistics::SearchStatistics;

/// How a run of [`DStarSearch::process_state`] calls ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    /// The stopping condition was met.
    Settled,
    /// The frontier ran dry before the stopping condition was met.
    FrontierExhausted,
    /// The expansion budget ran out first.
    BudgetExhausted,
}

/// Node store, frontier and cost snapshot of one planner, plus the operations on them.
pub struct DStarSearch {
    store: NodeStore,
    open: PriorityQueue,
    map: CostMap,
    stats: SearchStatistics,
    max_expansions: Option<usize>,
    edges: Vec<WeightedEdge>,
}

impl DStarSearch {
    pub fn new(
        width: i32,
        height: i32,
        lethal_cost: u8,
        factor: f64,
        max_expansions: Option<usize>,
    ) -> Self {
        let store = NodeStore::new(width, height);
        let open = PriorityQueue::new(store.len());
        DStarSearch {
            store,
            open,
            map: CostMap::new(width, height, lethal_cost, factor),
            stats: SearchStatistics::new(),
            max_expansions,
            edges: Vec::with_capacity(8),
        }
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    pub fn map(&self) -> &CostMap {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut CostMap {
        &mut self.map
    }

    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    /// Smallest key in the frontier.
    pub fn min_key(&self) -> Option<f64> {
        self.open.min_key()
    }

    pub fn statistics(&self) -> &SearchStatistics {
        &self.stats
    }

    /// Starts a fresh set of counters for a new planning call.
    pub fn begin_call(&mut self) {
        self.stats = SearchStatistics::new();
    }

    pub(crate) fn stats_mut(&mut self) -> &mut SearchStatistics {
        &mut self.stats
    }

    /// Empties the frontier and returns every cell to `New`.
    pub fn reset(&mut self) {
        self.store.reset();
        self.open.clear();
    }

    pub fn budget_exhausted(&self) -> bool {
        self.max_expansions
            .is_some_and(|max| self.stats.expanded_nodes() >= max)
    }

    /// Inserts `id` into the frontier with cost `proposed`, or improves its existing entry.
    ///
    /// The key becomes `proposed` for a `New` cell, `min(key, proposed)` for an `Open` cell, and
    /// `min(cost, proposed)` for a `Closed` cell, so a raised cell is still expanded at the
    /// priority it was settled with.
    pub fn insert(&mut self, id: usize, proposed: f64) {
        let record = self.store.get_mut(id);
        match record.tag {
            CellTag::New => self.stats.increment_generated_nodes(),
            CellTag::Closed => self.stats.increment_reopened_nodes(),
            CellTag::Open => {}
        }
        let key = record.open_with(proposed);
        self.open.relaxed(id, key);
    }

    /// Removes the minimum entry from the frontier and marks its cell `Closed`.
    pub fn pop_min(&mut self) -> Option<(f64, usize)> {
        let (key, id) = self.open.next()?;
        let record = self.store.get_mut(id);
        debug_assert_eq!(record.tag, CellTag::Open);
        debug_assert_eq!(record.key, key);
        record.tag = CellTag::Closed;
        self.stats.increment_expanded_nodes();
        Some((key, id))
    }

    /// Expands the minimum frontier entry.
    ///
    /// Returns the smallest key left in the frontier afterwards, or `None` once it is empty.
    pub fn process_state(&mut self) -> Option<f64> {
        let (k_old, x) = self.pop_min()?;

        let mut edges = std::mem::take(&mut self.edges);
        edges.clear();
        EightConnectedExpander::new(&self.map).expand(x, &mut edges);

        trace!(
            cell = ?self.store.get(x).state,
            k_old,
            cost = self.store.get(x).cost,
            "expanding"
        );

        // RAISE: try to pull the cost back down through neighbours settled below the old key.
        if k_old < self.store.get(x).cost {
            for edge in &edges {
                let y = self.store.get(edge.successor);
                let through_y = y.cost + edge.cost;
                let record = self.store.get_mut(x);
                if y.cost <= k_old && record.cost > through_y {
                    record.parent = Some(edge.successor);
                    record.cost = through_y;
                }
            }
        }

        let x_cost = self.store.get(x).cost;
        if k_old == x_cost {
            // LOWER
            for edge in &edges {
                let y_id = edge.successor;
                let y = self.store.get(y_id);
                let through_x = x_cost + edge.cost;
                let is_child = y.parent == Some(x);
                if y.is_new()
                    || (is_child && y.cost != through_x)
                    || (!is_child && y.cost > through_x)
                {
                    self.store.get_mut(y_id).parent = Some(x);
                    self.insert(y_id, through_x);
                }
            }
        } else {
            // RAISE propagation
            for edge in &edges {
                let y_id = edge.successor;
                let y = self.store.get(y_id);
                let through_x = x_cost + edge.cost;
                let is_child = y.parent == Some(x);
                if y.is_new() || (is_child && y.cost != through_x) {
                    self.store.get_mut(y_id).parent = Some(x);
                    self.insert(y_id, through_x);
                } else if !is_child && y.cost > through_x {
                    self.insert(x, x_cost);
                } else if !is_child
                    && x_cost > y.cost + edge.cost
                    && y.is_closed()
                    && y.cost > k_old
                {
                    self.insert(y_id, y.cost);
                }
            }
        }

        self.edges = edges;
        self.open.min_key()
    }

    /// Expands until `target` is `Closed`.
    pub fn run_until_closed(&mut self, target: usize) -> Progress {
        loop {
            if self.store.get(target).is_closed() {
                return Progress::Settled;
            }
            if self.budget_exhausted() {
                return Progress::BudgetExhausted;
            }
            if self.open.is_empty() {
                return Progress::FrontierExhausted;
            }
            self.process_state();
        }
    }

    /// Repairs the search after the edge from `x` to its parent `y` became blocked.
    ///
    /// If `x` is `Closed` it is re-queued with the cost of routing through `y`, then states are
    /// processed until the frontier minimum is no smaller than `x`'s cost, at which point
    /// nothing left in the frontier can improve `x`.
    pub fn modify(&mut self, x: usize, y: usize) -> Progress {
        if self.store.get(x).is_closed() {
            let cost = self.store.get(y).cost + self.map.edge_cost(x, y);
            self.insert(x, cost);
        }

        loop {
            if self.budget_exhausted() {
                return Progress::BudgetExhausted;
            }
            match self.process_state() {
                Some(k_min) if k_min >= self.store.get(x).cost => return Progress::Settled,
                Some(_) => {}
                None => return Progress::FrontierExhausted,
            }
        }
    }
}
