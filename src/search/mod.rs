//! Counter search - strategies for finding an accepted counter
//!
//! Both strategies implement `SearchExecutor` and share the same contract:
//! - `SequentialSearcher` scans counters in ascending order on the calling
//!   thread and always returns the smallest accepted counter
//! - `ParallelSearcher` spreads dynamically claimed ranges over a worker
//!   pool and returns whichever accepted counter is claimed first

pub mod config;
pub mod parallel;
pub mod sequential;

pub use config::{COUNTER_SPACE, SearchConfig};
pub use parallel::ParallelSearcher;
pub use sequential::SequentialSearcher;

use crate::buffer::WorkBuffer;
use crate::error::SolveResult;
use crate::target::Threshold;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64};

/// Everything a searcher needs for one challenge
#[derive(Debug, Clone)]
pub struct SearchJob {
    pub threshold: Threshold,
    pub buffer: WorkBuffer,
}

impl SearchJob {
    pub fn new(threshold: Threshold, buffer: WorkBuffer) -> Self {
        Self { threshold, buffer }
    }

    /// Recompute the digest for `counter` and check it
    pub fn check(&self, counter: u32) -> bool {
        self.threshold.accepts(self.buffer.digest_prefix(counter))
    }
}

/// Trait for search execution backends
pub trait SearchExecutor: Send + Sync {
    /// Search `config.counter_range` for a counter whose digest prefix is
    /// within the job's threshold.
    ///
    /// Every finished trial is added to `attempts`. Setting `cancel` stops
    /// the search between trials with `SolveError::NotFound`.
    fn search(
        &self,
        job: &SearchJob,
        config: &SearchConfig,
        attempts: Arc<AtomicU64>,
        cancel: Arc<AtomicBool>,
    ) -> SolveResult<u32>;

    /// Description for logging
    fn name(&self) -> &'static str;
}
