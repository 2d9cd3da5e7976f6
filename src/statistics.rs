use std::time::Instant;

use tracing::info;

/// Counters for a single `plan()` call.
#[derive(Clone, Debug)]
pub struct SearchStatistics {
    /// Frontier pops, i.e. transitions to `Closed`
    expanded_nodes: usize,
    /// Insertions of `New` cells into the frontier
    generated_nodes: usize,
    /// Insertions of `Closed` cells back into the frontier
    reopened_nodes: usize,
    /// Blocked path edges handed to local repair
    repairs: usize,
    /// Whether the call reset the node store and searched from scratch
    full_search: bool,
    search_start_time: Instant,
}

impl Default for SearchStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchStatistics {
    pub fn new() -> Self {
        Self {
            expanded_nodes: 0,
            generated_nodes: 0,
            reopened_nodes: 0,
            repairs: 0,
            full_search: false,
            search_start_time: Instant::now(),
        }
    }

    pub fn increment_expanded_nodes(&mut self) {
        self.expanded_nodes += 1;
    }

    pub fn increment_generated_nodes(&mut self) {
        self.generated_nodes += 1;
    }

    pub fn increment_reopened_nodes(&mut self) {
        self.reopened_nodes += 1;
    }

    pub fn increment_repairs(&mut self) {
        self.repairs += 1;
    }

    pub fn mark_full_search(&mut self) {
        self.full_search = true;
    }

    pub fn expanded_nodes(&self) -> usize {
        self.expanded_nodes
    }

    pub fn generated_nodes(&self) -> usize {
        self.generated_nodes
    }

    pub fn reopened_nodes(&self) -> usize {
        self.reopened_nodes
    }

    pub fn repairs(&self) -> usize {
        self.repairs
    }

    pub fn full_search(&self) -> bool {
        self.full_search
    }

    pub fn log(&self) {
        info!(
            full_search = self.full_search,
            expanded_nodes = self.expanded_nodes,
            generated_nodes = self.generated_nodes,
            reopened_nodes = self.reopened_nodes,
            repairs = self.repairs,
            search_duration = self.search_start_time.elapsed().as_secs_f64(),
        );
    }
}
