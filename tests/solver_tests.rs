//! Integration tests for hashcash-solver.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use hashcash_solver::buffer::WorkBuffer;
use hashcash_solver::search::{COUNTER_SPACE, SearchJob};
use hashcash_solver::{
    Challenge, FormatError, ParallelSearcher, SearchConfig, SearchExecutor, SequentialSearcher,
    SolveError, Solver, Strategy, Threshold, base64url, check_token, solve, solve_async, verify,
};

fn challenge(easiness: u8, token: &[u8]) -> String {
    format!("1:{}:ignored:{}", easiness, base64url::encode(token))
}

fn counter_of(token: &str) -> u32 {
    let text = token.rsplit(':').next().unwrap();
    let bytes: [u8; 4] = base64url::decode(text).unwrap().try_into().unwrap();
    u32::from_le_bytes(bytes)
}

// =============================================================================
// END-TO-END SOLVE TESTS
// =============================================================================

#[test]
fn sequential_returns_minimal_counter() {
    let token: Vec<u8> = (0..48).collect();
    let challenge = challenge(255, &token);

    let solved = Solver::new(Strategy::Sequential).solve(&challenge).unwrap();
    let counter = counter_of(&solved);

    let buffer = WorkBuffer::new(&token);
    let threshold = Threshold::from_easiness(255);
    assert!(threshold.accepts(buffer.digest_prefix(counter)));
    for smaller in 0..counter {
        assert!(!threshold.accepts(buffer.digest_prefix(smaller)));
    }
}

#[test]
fn sequential_is_deterministic() {
    let challenge = challenge(250, &[0x5a; 48]);
    let solver = Solver::new(Strategy::Sequential);

    assert_eq!(solver.solve(&challenge).unwrap(), solver.solve(&challenge).unwrap());
}

#[test]
fn parallel_returns_valid_counter() {
    let challenge = challenge(255, &[0x11; 48]);
    let solver = Solver::new(Strategy::Parallel)
        .with_config(SearchConfig::new(4).with_chunk_size(1));

    let solved = solver.solve(&challenge).unwrap();
    assert!(verify(&challenge, &solved).unwrap());
}

#[test]
fn parallel_counter_is_no_smaller_than_sequential() {
    let challenge = challenge(255, &[0x22; 48]);

    let sequential = counter_of(&Solver::new(Strategy::Sequential).solve(&challenge).unwrap());
    let parallel = counter_of(
        &Solver::new(Strategy::Parallel)
            .with_config(SearchConfig::new(3).with_chunk_size(2))
            .solve(&challenge)
            .unwrap(),
    );

    assert!(parallel >= sequential);
}

#[test]
fn default_solve_produces_token_for_zero_material() {
    let zero = "A".repeat(64);
    let challenge = format!("1:255:ignored:{zero}");

    let solved = solve(&challenge).unwrap();

    assert!(solved.starts_with(&format!("1:{zero}:")));
    let counter_text = solved.rsplit(':').next().unwrap();
    assert_eq!(counter_text.len(), 6);
    assert!(!counter_text.contains('='));
    assert!(verify(&challenge, &solved).unwrap());
}

#[tokio::test]
async fn async_solve_matches_blocking_result() {
    let challenge = challenge(255, &[0x33; 48]);
    let solver = Solver::new(Strategy::Sequential);

    let blocking = solver.solve(&challenge).unwrap();
    let background = solver.solve_async(challenge.clone()).await.unwrap();
    assert_eq!(blocking, background);

    let default = solve_async(challenge.clone()).await.unwrap();
    assert!(verify(&challenge, &default).unwrap());
}

#[tokio::test]
async fn async_solve_surfaces_format_errors() {
    let result = solve_async("1:300:x:AAAA").await;
    assert!(matches!(
        result,
        Err(SolveError::Format(FormatError::EasinessOutOfRange(_)))
    ));
}

// =============================================================================
// FAILURE TESTS
// =============================================================================

#[test]
fn malformed_challenges_are_rejected() {
    let solver = Solver::default();

    assert!(matches!(
        solver.solve("2:10:x:AAAA"),
        Err(SolveError::Format(FormatError::UnsupportedVersion(_)))
    ));
    assert!(matches!(
        solver.solve("1:300:x:AAAA"),
        Err(SolveError::Format(FormatError::EasinessOutOfRange(_)))
    ));
    assert!(matches!(
        solver.solve("1:10:x:"),
        Err(SolveError::Format(FormatError::EmptyToken))
    ));
    assert!(matches!(
        solver.solve("1:10"),
        Err(SolveError::Format(FormatError::TooFewFields(2)))
    ));
    assert!(matches!(
        solver.solve("1:10:x:AAAA"),
        Err(SolveError::Format(FormatError::TokenLength(3)))
    ));
}

#[test]
fn narrowed_range_is_exhausted_by_both_strategies() {
    let challenge = challenge(0, &[0x44; 48]);
    let config = SearchConfig::new(2).with_counter_range(0..4);

    for strategy in [Strategy::Sequential, Strategy::Parallel] {
        let result = Solver::new(strategy).with_config(config.clone()).solve(&challenge);
        assert!(
            matches!(result, Err(SolveError::Exhausted)),
            "{strategy} returned {result:?}"
        );
    }
}

#[test]
fn top_of_counter_space_is_exhausted_without_wrapping() {
    // 0xFFFF_FFFD, 0xFFFF_FFFE and 0xFFFF_FFFF, then the space ends
    let job = SearchJob::new(Threshold::from_easiness(0), WorkBuffer::new(&[0x4c; 48]));
    let config = SearchConfig::new(2)
        .with_chunk_size(2)
        .with_counter_range(0xFFFF_FFFD..u64::MAX);
    assert_eq!(config.effective_range(), 0xFFFF_FFFD..COUNTER_SPACE);

    let executors: [&dyn SearchExecutor; 2] = [&SequentialSearcher, &ParallelSearcher];
    for executor in executors {
        let attempts = Arc::new(AtomicU64::new(0));
        let cancel = Arc::new(AtomicBool::new(false));

        let result = executor.search(&job, &config, attempts.clone(), cancel);

        assert!(
            matches!(result, Err(SolveError::Exhausted)),
            "{} returned {result:?}",
            executor.name()
        );
        // a wrap back to counter 0 would show up as extra trials
        assert_eq!(attempts.load(Ordering::Relaxed), 3, "{}", executor.name());
    }
}

#[test]
fn cancellation_yields_not_found() {
    // threshold 8: a solution is not expected within the test's lifetime
    let challenge = challenge(0, &[0x55; 48]);

    for strategy in [Strategy::Sequential, Strategy::Parallel] {
        let attempts = Arc::new(AtomicU64::new(0));
        let cancel = Arc::new(AtomicBool::new(false));

        let canceller = {
            let cancel = cancel.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(150));
                cancel.store(true, Ordering::SeqCst);
            })
        };

        let result = Solver::new(strategy)
            .with_config(SearchConfig::new(2))
            .solve_with_cancel(&challenge, attempts, cancel);
        canceller.join().unwrap();

        assert!(
            matches!(result, Err(SolveError::NotFound)),
            "{strategy} returned {result:?}"
        );
    }
}

// =============================================================================
// VERIFY TESTS
// =============================================================================

#[test]
fn verify_rejects_token_for_other_challenge() {
    let a = challenge(255, &[0x66; 48]);
    let b = challenge(255, &[0x77; 48]);
    let solved = Solver::new(Strategy::Sequential).solve(&a).unwrap();

    assert!(matches!(
        verify(&b, &solved),
        Err(SolveError::Format(FormatError::MalformedSolution(_)))
    ));
}

#[test]
fn check_token_reports_digest_prefix() {
    let token: Vec<u8> = (100..148).collect();
    let challenge = challenge(255, &token);
    let solved = Solver::new(Strategy::Sequential).solve(&challenge).unwrap();

    let check = check_token(&challenge, &solved).unwrap();

    assert_eq!(check.counter, counter_of(&solved));
    assert_eq!(check.digest_prefix, WorkBuffer::new(&token).digest_prefix(check.counter));
    assert!(check.is_valid());
}

#[test]
fn threshold_examples() {
    let zero: Challenge = format!("1:0:ignored:{}", "A".repeat(64)).parse().unwrap();
    assert_eq!(zero.threshold().value(), 8);
    assert_eq!(Threshold::from_easiness(255).value(), 2_130_706_432);
}
