//! Multi-threaded searcher

use crate::error::{SolveError, SolveResult};
use crate::search::{SearchConfig, SearchExecutor, SearchJob};

use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Parallel search over a rayon pool.
///
/// Workers claim `chunk_size` counters at a time from a shared atomic
/// cursor, so faster workers simply claim more ranges. Each worker keeps
/// its own hasher and feeds it the 4 counter bytes followed by the shared
/// payload, which gives the same digest as hashing the contiguous buffer.
///
/// The first worker to hit stores its counter in the result slot and raises
/// the `found` flag; everyone else stops at their next trial. The returned
/// counter is valid but not necessarily the smallest one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelSearcher;

impl ParallelSearcher {
    pub fn new() -> Self {
        Self
    }
}

impl SearchExecutor for ParallelSearcher {
    fn search(
        &self,
        job: &SearchJob,
        config: &SearchConfig,
        attempts: Arc<AtomicU64>,
        cancel: Arc<AtomicBool>,
    ) -> SolveResult<u32> {
        let range = config.effective_range();
        let total = range.end - range.start;
        let chunk_size = config.chunk_size.max(1);

        // Configure thread pool
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.effective_threads())
            .thread_name(|i| format!("hashcash-worker-{i}"))
            .build()
            .map_err(|e| SolveError::Internal(format!("failed to build worker pool: {e}")))?;

        let found = AtomicBool::new(false);
        let winner: Mutex<Option<u32>> = Mutex::new(None);
        let next_counter = AtomicU64::new(range.start);
        let scanned = AtomicU64::new(0);

        pool.broadcast(|ctx| {
            let worker = ctx.index();
            let payload = job.buffer.payload();
            let mut hasher = Sha256::new();
            let mut tried = 0u64;

            tracing::debug!(worker, "worker started");

            'claim: while !cancel.load(Ordering::Relaxed) && !found.load(Ordering::Relaxed) {
                // Grab a chunk of counters atomically
                let start = next_counter.fetch_add(chunk_size, Ordering::Relaxed);
                if start >= range.end {
                    break;
                }
                let end = (start + chunk_size).min(range.end);

                for n in start..end {
                    if cancel.load(Ordering::Relaxed) || found.load(Ordering::Relaxed) {
                        break 'claim;
                    }

                    // range is clamped to 0..2^32
                    let counter = n as u32;
                    hasher.update(counter.to_le_bytes());
                    hasher.update(payload);
                    let digest: [u8; 32] = hasher.finalize_reset().into();

                    tried += 1;
                    attempts.fetch_add(1, Ordering::Relaxed);
                    scanned.fetch_add(1, Ordering::Relaxed);

                    if job.threshold.matches(&digest) {
                        let mut slot = winner.lock();
                        if slot.is_none() {
                            *slot = Some(counter);
                            found.store(true, Ordering::SeqCst);
                            tracing::debug!(worker, counter, "worker claimed solution");
                        }
                        break 'claim;
                    }
                }
            }

            tracing::debug!(worker, tried, "worker stopped");
        });

        if let Some(counter) = winner.into_inner() {
            return Ok(counter);
        }

        if scanned.load(Ordering::SeqCst) >= total {
            tracing::warn!(
                start = range.start,
                end = range.end,
                "parallel search exhausted counter range"
            );
            Err(SolveError::Exhausted)
        } else {
            Err(SolveError::NotFound)
        }
    }

    fn name(&self) -> &'static str {
        "parallel"
    }
}
