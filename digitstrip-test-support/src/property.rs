//! Property-test case counts with an environment override.
//!
//! Suites pass their preferred default to [`case_count`]; CI can raise or
//! lower it for every suite at once through [`CASES_ENV_KEY`].

use std::env;

/// Environment variable overriding proptest case counts.
pub const CASES_ENV_KEY: &str = "DIGITSTRIP_PBT_CASES";

/// Number of cases each property should run.
///
/// Returns `default` when the override is unset. An override that does not
/// parse as a positive integer is reported and ignored.
///
/// # Examples
/// ```
/// use digitstrip_test_support::property::case_count;
///
/// assert!(case_count(64) > 0);
/// ```
#[must_use]
pub fn case_count(default: u32) -> u32 {
    match env::var(CASES_ENV_KEY) {
        Ok(raw) => match parse_cases(&raw) {
            Ok(cases) => cases,
            Err(reason) => {
                tracing::warn!(
                    env = CASES_ENV_KEY,
                    raw = %raw,
                    reason = %reason,
                    "invalid property-test case override; using default",
                );
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_cases(raw: &str) -> Result<u32, String> {
    let parsed = raw
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("parse error: {error}"))?;
    if parsed == 0 {
        return Err("cases must be > 0".to_owned());
    }
    Ok(parsed)
}
