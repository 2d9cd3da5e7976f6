use dstar_core::{CellRecord, CellTag};

use super::grid::Grid;

/// One search record per grid cell, stored contiguously and addressed by linear index.
///
/// Resetting is O(1): every slot remembers the search number it was last written in, and slots
/// from an older search read back as fresh `New` records until they are next written.
pub struct NodeStore {
    records: Grid<(u64, CellRecord)>,
    search_number: u64,
}

impl NodeStore {
    #[track_caller]
    pub fn new(width: i32, height: i32) -> Self {
        NodeStore {
            search_number: 1,
            records: Grid::new(width, height, |x, y| (0, CellRecord::new((x, y)))),
        }
    }

    #[inline(always)]
    pub fn width(&self) -> i32 {
        self.records.width()
    }

    #[inline(always)]
    pub fn height(&self) -> i32 {
        self.records.height()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Forgets every record. All cells read back as `New` with infinite cost and no parent.
    pub fn reset(&mut self) {
        self.search_number = self.search_number.checked_add(1).unwrap_or_else(|| {
            for (num, record) in self.records.storage_mut() {
                *num = 0;
                record.clear();
            }
            1
        });
    }

    #[inline(always)]
    pub fn to_linear(&self, state: (i32, i32)) -> Option<usize> {
        self.records.to_linear(state)
    }

    #[inline(always)]
    pub fn from_linear(&self, id: usize) -> Option<(i32, i32)> {
        self.records.from_linear(id)
    }

    /// Returns the record for `id`.
    #[track_caller]
    #[inline(always)]
    pub fn get(&self, id: usize) -> CellRecord {
        let (num, record) = self.records[id];
        if num == self.search_number {
            record
        } else {
            CellRecord::new(record.state)
        }
    }

    /// Returns the record for `id` for writing, bringing it into the current search first.
    #[track_caller]
    #[inline(always)]
    pub fn get_mut(&mut self, id: usize) -> &mut CellRecord {
        let search_number = self.search_number;
        let slot = &mut self.records[id];
        if slot.0 != search_number {
            slot.0 = search_number;
            slot.1.clear();
        }
        &mut slot.1
    }

    /// Returns the record at `state`, or `None` if it is out of bounds.
    pub fn record_at(&self, state: (i32, i32)) -> Option<CellRecord> {
        self.to_linear(state).map(|id| self.get(id))
    }

    /// Iterates over every record of the current search, in linear index order.
    pub fn records(&self) -> impl Iterator<Item = CellRecord> + '_ {
        (0..self.len()).map(|id| self.get(id))
    }

    /// Coordinates of every `Closed` cell, in linear index order.
    pub fn closed_cells(&self) -> Vec<(i32, i32)> {
        self.records()
            .filter(|record| record.tag == CellTag::Closed)
            .map(|record| record.state)
            .collect()
    }
}
