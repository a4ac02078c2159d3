//! Challenge-to-token pipeline
//!
//! Parses the challenge, derives threshold and work buffer once, hands them
//! to the selected strategy and encodes the winning counter.

use crate::base64url;
use crate::buffer::WorkBuffer;
use crate::challenge::Challenge;
use crate::error::{FormatError, SolveError, SolveResult};
use crate::search::{
    ParallelSearcher, SearchConfig, SearchExecutor, SearchJob, SequentialSearcher,
};
use crate::target::Threshold;
use crate::types::Solution;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64};
use std::time::Instant;

/// Search strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Deterministic single-threaded scan, minimal counter
    Sequential,
    /// Worker pool with first-found-wins
    #[default]
    Parallel,
}

impl Strategy {
    fn executor(self) -> &'static dyn SearchExecutor {
        match self {
            Strategy::Sequential => &SequentialSearcher,
            Strategy::Parallel => &ParallelSearcher,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.executor().name()
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequential" => Ok(Strategy::Sequential),
            "parallel" => Ok(Strategy::Parallel),
            other => Err(format!("unknown strategy: {other}")),
        }
    }
}

/// Hashcash solver
#[derive(Debug, Clone, Default)]
pub struct Solver {
    strategy: Strategy,
    config: SearchConfig,
}

impl Solver {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            config: SearchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Solve a challenge and return the token string
    pub fn solve(&self, challenge: &str) -> SolveResult<String> {
        let solution = self.solve_with_cancel(
            challenge,
            Arc::new(AtomicU64::new(0)),
            Arc::new(AtomicBool::new(false)),
        )?;
        Ok(solution.token())
    }

    /// Solve a challenge with caller-owned progress and cancel handles.
    ///
    /// Setting `cancel` makes the search return `SolveError::NotFound`.
    pub fn solve_with_cancel(
        &self,
        challenge: &str,
        attempts: Arc<AtomicU64>,
        cancel: Arc<AtomicBool>,
    ) -> SolveResult<Solution> {
        let challenge = Challenge::parse(challenge)?;
        let threshold = challenge.threshold();

        tracing::debug!(
            easiness = challenge.easiness(),
            threshold = threshold.value(),
            strategy = %self.strategy,
            "solving hashcash challenge"
        );

        let job = SearchJob::new(threshold, WorkBuffer::new(challenge.token()));
        let started = Instant::now();
        let counter =
            self.strategy
                .executor()
                .search(&job, &self.config, attempts.clone(), cancel)?;

        tracing::info!(
            counter,
            attempts = attempts.load(std::sync::atomic::Ordering::Relaxed),
            elapsed_ms = started.elapsed().as_millis() as u64,
            strategy = %self.strategy,
            "hashcash challenge solved"
        );

        Ok(Solution::new(counter, challenge.token_text()))
    }

    /// Run [`Solver::solve`] on tokio's blocking pool
    pub async fn solve_async(&self, challenge: impl Into<String>) -> SolveResult<String> {
        let solver = self.clone();
        let challenge = challenge.into();

        tokio::task::spawn_blocking(move || solver.solve(&challenge))
            .await
            .map_err(|e| SolveError::Internal(format!("solver task failed: {e}")))?
    }
}

/// Solve with the default parallel strategy
pub fn solve(challenge: &str) -> SolveResult<String> {
    Solver::default().solve(challenge)
}

/// Non-blocking form of [`solve`]
pub async fn solve_async(challenge: impl Into<String>) -> SolveResult<String> {
    Solver::default().solve_async(challenge).await
}

/// Outcome of checking a token against its challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenCheck {
    pub counter: u32,
    /// First four digest bytes for `counter`, big-endian
    pub digest_prefix: u32,
    pub threshold: Threshold,
}

impl TokenCheck {
    pub fn is_valid(&self) -> bool {
        self.threshold.accepts(self.digest_prefix)
    }
}

/// Recompute the digest a token's counter produces for `challenge`.
///
/// Fails with a format error if either string is malformed; a well-formed
/// token that misses the threshold comes back with `is_valid() == false`.
pub fn check_token(challenge: &str, token: &str) -> SolveResult<TokenCheck> {
    let challenge = Challenge::parse(challenge)?;
    let counter = token_counter(token, challenge.token_text())?;

    Ok(TokenCheck {
        counter,
        digest_prefix: WorkBuffer::new(challenge.token()).digest_prefix(counter),
        threshold: challenge.threshold(),
    })
}

/// Check a solved token against the challenge it claims to answer
pub fn verify(challenge: &str, token: &str) -> SolveResult<bool> {
    Ok(check_token(challenge, token)?.is_valid())
}

/// Extract the counter from `1:<token_text>:<counter>`
pub fn token_counter(token: &str, token_text: &str) -> Result<u32, FormatError> {
    let malformed = |reason: &str| FormatError::MalformedSolution(reason.to_string());

    let mut parts = token.split(':');
    if parts.next() != Some("1") {
        return Err(malformed("version must be 1"));
    }
    if parts.next() != Some(token_text) {
        return Err(malformed("token does not match challenge"));
    }
    let counter = parts.next().ok_or_else(|| malformed("missing counter"))?;
    if parts.next().is_some() {
        return Err(malformed("trailing fields"));
    }

    let bytes = base64url::decode(counter).map_err(|_| malformed("counter is not base64url"))?;
    let bytes: [u8; 4] = bytes
        .try_into()
        .map_err(|_| malformed("counter must be 4 bytes"))?;

    Ok(u32::from_le_bytes(bytes))
}
