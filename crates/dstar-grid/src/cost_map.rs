use dstar_core::traits::CostOracle;

use crate::{Direction, Grid};

/// Snapshot of per-cell traversal costs with a lethal threshold.
///
/// A cell is lethal when its cost is strictly greater than `lethal_cost * factor`. An edge is
/// blocked when either endpoint is lethal; unblocked edges cost the Euclidean distance between
/// the two cells.
#[derive(Clone, Debug)]
pub struct CostMap {
    costs: Grid<u8>,
    threshold: f64,
}

impl CostMap {
    pub fn new(width: i32, height: i32, lethal_cost: u8, factor: f64) -> Self {
        CostMap {
            costs: Grid::new(width, height, |_, _| 0),
            threshold: lethal_cost as f64 * factor,
        }
    }

    #[inline(always)]
    pub fn width(&self) -> i32 {
        self.costs.width()
    }

    #[inline(always)]
    pub fn height(&self) -> i32 {
        self.costs.height()
    }

    pub fn grid(&self) -> &Grid<u8> {
        &self.costs
    }

    /// Cost above which a cell is considered lethal.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Overwrites the snapshot with `costs`, given in row-major order.
    #[track_caller]
    pub fn update(&mut self, costs: &[u8]) {
        assert_eq!(
            costs.len(),
            self.costs.len(),
            "cost grid must have width * height entries"
        );
        self.costs.storage_mut().copy_from_slice(costs);
    }

    /// Sets the cost of a single cell.
    #[track_caller]
    pub fn set(&mut self, state: (i32, i32), cost: u8) {
        self.costs[state] = cost;
    }

    #[inline(always)]
    pub fn is_lethal(&self, id: usize) -> bool {
        self.costs[id] as f64 > self.threshold
    }

    #[track_caller]
    pub fn is_lethal_at(&self, state: (i32, i32)) -> bool {
        self.costs[state] as f64 > self.threshold
    }

    #[track_caller]
    fn state(&self, id: usize) -> (i32, i32) {
        self.costs
            .from_linear(id)
            .expect("cell index out of bounds of the cost map")
    }
}

impl CostOracle for CostMap {
    #[inline(always)]
    fn is_blocked(&self, a: usize, b: usize) -> bool {
        self.is_lethal(a) || self.is_lethal(b)
    }

    fn edge_cost(&self, a: usize, b: usize) -> f64 {
        if self.is_blocked(a, b) {
            return f64::INFINITY;
        }
        let (ax, ay) = self.state(a);
        let (bx, by) = self.state(b);
        match Direction::between((ax, ay), (bx, by)) {
            Some(dir) => dir.cost(),
            None => ((ax - bx) as f64).hypot((ay - by) as f64),
        }
    }
}
