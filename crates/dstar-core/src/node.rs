use serde::{Deserialize, Serialize};

/// Where a cell is in the search state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellTag {
    /// Never inserted into the frontier.
    New,
    /// Currently in the frontier.
    Open,
    /// Expanded; its cost was considered stable when it was popped.
    Closed,
}

/// Search state of a single grid cell.
///
/// Parents are stored as linear indices into the owning store rather than references, so a
/// record can be copied, serialized, or reset without dangling links.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    /// Grid coordinate of the cell.
    pub state: (i32, i32),
    /// Best known cost-to-goal.
    pub cost: f64,
    /// Frontier priority. May be lower than `cost` while the cell is being repaired.
    pub key: f64,
    /// State machine tag.
    pub tag: CellTag,
    /// Linear index of the next cell towards the goal, if any.
    pub parent: Option<usize>,
}

impl CellRecord {
    /// Creates a fresh record at `state`: `New`, infinite cost and key, no parent.
    pub fn new(state: (i32, i32)) -> Self {
        CellRecord {
            state,
            cost: f64::INFINITY,
            key: f64::INFINITY,
            tag: CellTag::New,
            parent: None,
        }
    }

    /// Returns the record to its freshly constructed state, keeping the coordinate.
    pub fn clear(&mut self) {
        *self = CellRecord::new(self.state);
    }

    /// Applies the insert-or-improve key rule for a proposed cost and marks the record `Open`.
    ///
    /// Returns the key the cell must be placed in the frontier with.
    pub fn open_with(&mut self, proposed: f64) -> f64 {
        self.key = match self.tag {
            CellTag::New => proposed,
            CellTag::Open => self.key.min(proposed),
            CellTag::Closed => self.cost.min(proposed),
        };
        self.cost = proposed;
        self.tag = CellTag::Open;
        debug_assert!(self.key <= self.cost || self.key.is_nan() || self.cost.is_nan());
        self.key
    }

    /// Whether the record has ever been inserted into the frontier.
    #[inline(always)]
    pub fn is_new(&self) -> bool {
        self.tag == CellTag::New
    }

    /// Whether the record has been expanded.
    #[inline(always)]
    pub fn is_closed(&self) -> bool {
        self.tag == CellTag::Closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_key_is_proposed_cost() {
        let mut r = CellRecord::new((1, 2));
        assert_eq!(r.open_with(3.0), 3.0);
        assert_eq!(r.cost, 3.0);
        assert_eq!(r.tag, CellTag::Open);
    }

    #[test]
    fn open_record_keeps_smaller_key() {
        let mut r = CellRecord::new((0, 0));
        r.open_with(2.0);
        assert_eq!(r.open_with(5.0), 2.0);
        assert_eq!(r.cost, 5.0);
        assert_eq!(r.open_with(1.0), 1.0);
        assert_eq!(r.cost, 1.0);
    }

    #[test]
    fn closed_record_key_uses_previous_cost() {
        let mut r = CellRecord::new((0, 0));
        r.open_with(4.0);
        r.tag = CellTag::Closed;
        // raised: key stays at the old, settled cost
        assert_eq!(r.open_with(f64::INFINITY), 4.0);
        assert_eq!(r.cost, f64::INFINITY);

        r.tag = CellTag::Closed;
        r.cost = 4.0;
        // lowered: key follows the new cost
        assert_eq!(r.open_with(1.5), 1.5);
    }

    #[test]
    fn clear_keeps_coordinate() {
        let mut r = CellRecord::new((7, 3));
        r.open_with(1.0);
        r.parent = Some(12);
        r.clear();
        assert_eq!(r, CellRecord::new((7, 3)));
    }

    #[test]
    fn record_serializes_with_index_parent() {
        let mut r = CellRecord::new((1, 1));
        r.open_with(2.5);
        r.parent = Some(4);
        let json = serde_json::to_string(&r).unwrap();
        let back: CellRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
