//! Search configuration

use std::ops::Range;

/// One past the largest 32-bit counter
pub const COUNTER_SPACE: u64 = 1 << 32;

/// Configuration for search operations
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Number of worker threads for the parallel searcher (0 = auto-detect)
    pub threads: usize,
    /// Counters claimed by a worker at a time
    pub chunk_size: u64,
    /// Half-open range of counters to try
    pub counter_range: Range<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            chunk_size: 64,
            counter_range: 0..COUNTER_SPACE,
        }
    }
}

impl SearchConfig {
    pub fn new(threads: usize) -> Self {
        Self {
            threads,
            ..Default::default()
        }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_counter_range(mut self, counter_range: Range<u64>) -> Self {
        self.counter_range = counter_range;
        self
    }

    /// Worker count with auto-detection resolved
    pub fn effective_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }

    /// Counter range clamped to the 32-bit space; empty if inverted
    pub fn effective_range(&self) -> Range<u64> {
        let start = self.counter_range.start.min(COUNTER_SPACE);
        let end = self.counter_range.end.clamp(start, COUNTER_SPACE);
        start..end
    }
}
