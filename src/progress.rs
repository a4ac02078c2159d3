//! Terminal progress for a running search
//!
//! The bar tracks how much of the configured counter range has been tried.
//! Since every trial is an independent draw, the message also shows the
//! chance that a hit should have turned up by now, which says more about a
//! hashcash search than an ETA does.

use crate::search::SearchConfig;
use crate::solver::Strategy;
use crate::target::Threshold;

use indicatif::{HumanCount, HumanDuration, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Instant;

/// Progress bar over the counter range being searched
pub struct SearchProgress {
    bar: ProgressBar,
    started: Instant,
    hit_probability: f64,
}

impl SearchProgress {
    pub fn new(threshold: Threshold, config: &SearchConfig, strategy: Strategy) -> Self {
        let range = config.effective_range();
        let bar = ProgressBar::with_draw_target(
            Some(range.end - range.start),
            ProgressDrawTarget::stderr(),
        );

        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {prefix} {percent:>3}% of range | {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar.set_prefix(strategy.to_string());

        Self {
            bar,
            started: Instant::now(),
            hit_probability: threshold.hit_probability(),
        }
    }

    /// Refresh from the shared attempts counter
    pub fn update(&self, attempts: u64) {
        self.bar.set_position(attempts);
        self.bar.set_message(format!(
            "{} tried | {:.1} trials/s | {:.1}% chance of a hit by now",
            HumanCount(attempts),
            trial_rate(attempts, self.started.elapsed().as_secs_f64()),
            hit_chance(self.hit_probability, attempts) * 100.0
        ));
    }

    pub fn finish_solved(&self, counter: u32, attempts: u64) {
        self.bar.set_position(attempts);
        self.bar.finish_with_message(format!(
            "solved with counter {} after {} trials in {}",
            counter,
            HumanCount(attempts),
            HumanDuration(self.started.elapsed())
        ));
    }

    pub fn abandon(&self, reason: &str, attempts: u64) {
        self.bar.set_position(attempts);
        self.bar.abandon_with_message(format!(
            "{} after {} trials",
            reason,
            HumanCount(attempts)
        ));
    }
}

/// Probability that at least one of `attempts` trials was accepted
pub fn hit_chance(hit_probability: f64, attempts: u64) -> f64 {
    // 1 - (1 - p)^n without losing precision for tiny p
    -((attempts as f64) * (-hit_probability).ln_1p()).exp_m1()
}

fn trial_rate(attempts: u64, elapsed_secs: f64) -> f64 {
    if elapsed_secs > 0.0 {
        attempts as f64 / elapsed_secs
    } else {
        0.0
    }
}
