use crate::traits::OpenList;

const NOT_QUEUED: usize = usize::MAX;

/// Indexed binary min-heap over cell indices.
///
/// Every cell has at most one entry. Relaxing a cell that is already queued moves its existing
/// entry instead of adding a duplicate, so the most recent key is always the one that counts.
/// Ties between equal keys are broken arbitrarily.
pub struct PriorityQueue {
    // We have the invariant that positions[heap[i].1] == i for every i.
    heap: Vec<(f64, usize)>,
    positions: Vec<usize>,
}

impl PriorityQueue {
    /// Creates an empty queue able to hold cell indices in `0..capacity`.
    pub fn new(capacity: usize) -> Self {
        PriorityQueue {
            heap: vec![],
            positions: vec![NOT_QUEUED; capacity],
        }
    }

    /// Number of queued cells.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Whether `id` currently has an entry.
    pub fn contains(&self, id: usize) -> bool {
        self.positions.get(id).is_some_and(|&p| p != NOT_QUEUED)
    }

    /// Key of the entry for `id`, if queued.
    pub fn key_of(&self, id: usize) -> Option<f64> {
        match self.positions.get(id) {
            Some(&p) if p != NOT_QUEUED => Some(self.heap[p].0),
            _ => None,
        }
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        for &(_, id) in &self.heap {
            self.positions[id] = NOT_QUEUED;
        }
        self.heap.clear();
    }

    fn sift_up(&mut self, mut index: usize) {
        let entry = self.heap[index];
        while index > 0 {
            let parent_index = (index - 1) / 2;
            let parent = self.heap[parent_index];
            if parent.0 <= entry.0 {
                break;
            }
            self.heap[index] = parent;
            self.positions[parent.1] = index;
            index = parent_index;
        }
        self.heap[index] = entry;
        self.positions[entry.1] = index;
    }

    fn sift_down(&mut self, mut index: usize) {
        let entry = self.heap[index];
        loop {
            let child_1_index = index * 2 + 1;
            if child_1_index >= self.heap.len() {
                break;
            }
            let child_1 = self.heap[child_1_index];

            let child_index;
            let child;

            let child_2_index = child_1_index + 1;
            if child_2_index < self.heap.len() && self.heap[child_2_index].0 < child_1.0 {
                child_index = child_2_index;
                child = self.heap[child_2_index];
            } else {
                child_index = child_1_index;
                child = child_1;
            }

            if entry.0 <= child.0 {
                break;
            }

            self.heap[index] = child;
            self.positions[child.1] = index;
            index = child_index;
        }
        self.heap[index] = entry;
        self.positions[entry.1] = index;
    }
}

impl OpenList for PriorityQueue {
    #[track_caller]
    fn relaxed(&mut self, id: usize, key: f64) {
        assert!(id < self.positions.len(), "cell index out of range of the queue");
        let index = self.positions[id];
        if index == NOT_QUEUED {
            self.heap.push((key, id));
            self.sift_up(self.heap.len() - 1);
        } else {
            let old_key = self.heap[index].0;
            self.heap[index].0 = key;
            if key < old_key {
                self.sift_up(index);
            } else {
                self.sift_down(index);
            }
        }
    }

    fn next(&mut self) -> Option<(f64, usize)> {
        if self.heap.is_empty() {
            return None;
        }
        let ret = self.heap.swap_remove(0);
        self.positions[ret.1] = NOT_QUEUED;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(ret)
    }

    fn min_key(&self) -> Option<f64> {
        self.heap.first().map(|&(key, _)| key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_ascending_key_order() {
        let mut q = PriorityQueue::new(8);
        for (id, key) in [(0, 5.0), (1, 1.0), (2, 3.0), (3, 4.0), (4, 2.0)] {
            q.relaxed(id, key);
        }
        let order: Vec<_> = std::iter::from_fn(|| q.next()).map(|(_, id)| id).collect();
        assert_eq!(order, vec![1, 4, 2, 3, 0]);
        assert!(q.is_empty());
        assert_eq!(q.next(), None);
    }

    #[test]
    fn relaxing_moves_existing_entry() {
        let mut q = PriorityQueue::new(4);
        q.relaxed(0, 1.0);
        q.relaxed(1, 2.0);
        q.relaxed(2, 3.0);
        q.relaxed(2, 0.5);
        assert_eq!(q.len(), 3);
        assert_eq!(q.min_key(), Some(0.5));
        assert_eq!(q.next(), Some((0.5, 2)));

        q.relaxed(0, 9.0);
        assert_eq!(q.len(), 2);
        assert_eq!(q.next(), Some((2.0, 1)));
        assert_eq!(q.next(), Some((9.0, 0)));
    }

    #[test]
    fn infinite_keys_sort_last() {
        let mut q = PriorityQueue::new(3);
        q.relaxed(0, f64::INFINITY);
        q.relaxed(1, 7.0);
        assert_eq!(q.next(), Some((7.0, 1)));
        assert_eq!(q.next(), Some((f64::INFINITY, 0)));
    }

    #[test]
    fn clear_forgets_positions() {
        let mut q = PriorityQueue::new(3);
        q.relaxed(0, 1.0);
        q.relaxed(2, 2.0);
        assert!(q.contains(2));
        assert_eq!(q.key_of(2), Some(2.0));
        q.clear();
        assert!(!q.contains(0));
        assert!(!q.contains(2));
        assert_eq!(q.min_key(), None);
        q.relaxed(2, 4.0);
        assert_eq!(q.next(), Some((4.0, 2)));
    }
}
