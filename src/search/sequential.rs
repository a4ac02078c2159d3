//! Single-threaded reference searcher

use crate::buffer::COUNTER_LEN;
use crate::error::{SolveError, SolveResult};
use crate::search::{SearchConfig, SearchExecutor, SearchJob};

use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Ascending counter search over one contiguous buffer.
///
/// The counter is rewritten in place and the whole buffer is rehashed on
/// every trial, so the first hit is also the smallest accepted counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialSearcher;

impl SequentialSearcher {
    pub fn new() -> Self {
        Self
    }
}

impl SearchExecutor for SequentialSearcher {
    fn search(
        &self,
        job: &SearchJob,
        config: &SearchConfig,
        attempts: Arc<AtomicU64>,
        cancel: Arc<AtomicBool>,
    ) -> SolveResult<u32> {
        let range = config.effective_range();
        // Private contiguous copy of the payload (~12.6 MB); the counter is
        // rewritten in place and the whole buffer rehashed every trial.
        let mut buffer = job.buffer.materialize();
        let mut hasher = Sha256::new();

        for n in range.clone() {
            if cancel.load(Ordering::Relaxed) {
                tracing::debug!(next_counter = n, "sequential search cancelled");
                return Err(SolveError::NotFound);
            }

            // range is clamped to 0..2^32
            let counter = n as u32;
            buffer[..COUNTER_LEN].copy_from_slice(&counter.to_le_bytes());

            hasher.update(&buffer);
            let digest: [u8; 32] = hasher.finalize_reset().into();
            attempts.fetch_add(1, Ordering::Relaxed);

            if job.threshold.matches(&digest) {
                return Ok(counter);
            }
        }

        tracing::warn!(
            start = range.start,
            end = range.end,
            "sequential search exhausted counter range"
        );
        Err(SolveError::Exhausted)
    }

    fn name(&self) -> &'static str {
        "sequential"
    }
}
