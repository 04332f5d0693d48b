//! Shared proptest configuration for domain property tests.
//!
//! Increase cases locally with: PROPTEST_CASES=800 cargo test -p bingo-backend

use std::env;

use proptest::test_runner::Config as ProptestConfig;

/// Cases from `PROPTEST_CASES` (default 32, minimum 1); shrink time bounded
/// by `PROPTEST_MAX_SHRINK_MS` when set.
pub fn proptest_config() -> ProptestConfig {
    let cases = env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(32)
        .max(1);

    let max_shrink_time = env::var("PROPTEST_MAX_SHRINK_MS")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(0);

    ProptestConfig {
        cases,
        max_shrink_time,
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}
