// Hashcash proof-of-work solver
pub mod base64url;
pub mod buffer;
pub mod challenge;
pub mod error;
pub mod progress;
pub mod search;
pub mod solver;
pub mod target;
pub mod types;

// Re-export for convenience
pub use buffer::WorkBuffer;
pub use challenge::Challenge;
pub use error::{FormatError, SolveError, SolveResult};
pub use search::{ParallelSearcher, SearchConfig, SearchExecutor, SequentialSearcher};
pub use solver::{Solver, Strategy, TokenCheck, check_token, solve, solve_async, verify};
pub use target::Threshold;
pub use types::Solution;
