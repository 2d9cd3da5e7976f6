//! Traits the search is written against.

/// A priority frontier over cell indices.
pub trait OpenList {
    /// Places `id` in the frontier with priority `key`, or moves it there if already present.
    fn relaxed(&mut self, id: usize, key: f64);

    /// Removes and returns the entry with the smallest key.
    fn next(&mut self) -> Option<(f64, usize)>;

    /// Returns the smallest key without removing it.
    fn min_key(&self) -> Option<f64>;
}

/// Generates the traversable neighbours of a cell.
pub trait Expander {
    /// Pushes the neighbours of `id` onto `edges`. The caller clears `edges` beforehand.
    fn expand(&self, id: usize, edges: &mut Vec<WeightedEdge>);
}

/// Traversability and edge costs between cells, addressed by linear index.
pub trait CostOracle {
    /// Whether the edge between `a` and `b` is blocked by either endpoint.
    fn is_blocked(&self, a: usize, b: usize) -> bool;

    /// Cost of moving between `a` and `b`, or `f64::INFINITY` if the edge is blocked.
    fn edge_cost(&self, a: usize, b: usize) -> f64;
}

/// An edge to a neighbouring cell with its traversal cost.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedEdge {
    /// Linear index of the neighbour.
    pub successor: usize,
    /// Cost of moving to the neighbour.
    pub cost: f64,
}
