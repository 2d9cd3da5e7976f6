//! Types and utilities for working with 8-connected grid maps.

use std::f64::consts::SQRT_2;

use dstar_core::traits::{CostOracle, Expander, WeightedEdge};
use enumset::EnumSet;

use crate::{CostMap, Direction};

/// Expands a cell into its in-bounds neighbours whose edge to it is not blocked.
///
/// Corner cutting is allowed: a diagonal move is only blocked by its own endpoints, not by the
/// two orthogonal cells it passes between.
pub struct EightConnectedExpander<'a> {
    map: &'a CostMap,
}

impl<'a> EightConnectedExpander<'a> {
    pub fn new(map: &'a CostMap) -> Self {
        EightConnectedExpander { map }
    }

    /// Directions in which `(x, y)` has an unblocked, in-bounds neighbour.
    #[track_caller]
    pub fn neighborhood(&self, (x, y): (i32, i32)) -> EnumSet<Direction> {
        let grid = self.map.grid();
        let id = grid
            .to_linear((x, y))
            .expect("attempt to expand cell out of bounds");
        let mut nbhood = EnumSet::empty();
        for dir in EnumSet::<Direction>::all() {
            let (dx, dy) = dir.offset();
            if let Some(nid) = grid.to_linear((x + dx, y + dy)) {
                if !self.map.is_blocked(id, nid) {
                    nbhood |= dir;
                }
            }
        }
        nbhood
    }
}

impl Expander for EightConnectedExpander<'_> {
    #[track_caller]
    fn expand(&self, id: usize, edges: &mut Vec<WeightedEdge>) {
        let grid = self.map.grid();
        let (x, y) = grid
            .from_linear(id)
            .expect("attempt to expand cell out of bounds");

        for dir in self.neighborhood((x, y)) {
            let (dx, dy) = dir.offset();
            // neighborhood() only reports in-bounds neighbours
            let Some(successor) = grid.to_linear((x + dx, y + dy)) else {
                continue;
            };
            edges.push(WeightedEdge {
                successor,
                cost: self.map.edge_cost(id, successor),
            });
        }
    }
}

pub fn octile_distance(from: (i32, i32), to: (i32, i32)) -> f64 {
    let dx = (from.0 - to.0).abs();
    let dy = (from.1 - to.1).abs();
    let diagonals = dx.min(dy);
    let orthos = dx.max(dy) - diagonals;
    orthos as f64 + diagonals as f64 * SQRT_2
}
