//! Pass/fail counts from a prior dbt test run (`run_results.json`).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::aggregate::round_to;

/// Default location of the dbt run artifact, relative to the working directory.
pub const DEFAULT_RUN_RESULTS_PATH: &str = "scripts/dbt/target/run_results.json";

const TEST_ID_PREFIX: &str = "test.";
const PASS_STATUS: &str = "pass";

/// Test counts sourced from an external run artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExternalTestSummary {
    pub tests_total: u64,
    pub tests_passed: u64,
}

impl ExternalTestSummary {
    pub fn new(tests_total: u64, tests_passed: u64) -> Self {
        Self {
            tests_total,
            tests_passed: tests_passed.min(tests_total),
        }
    }

    pub fn tests_failed(&self) -> u64 {
        self.tests_total - self.tests_passed
    }

    /// Percentage of passing tests, one decimal place; 100.0 when no tests ran.
    pub fn pass_rate_pct(&self) -> f64 {
        pass_rate_pct(self.tests_total, self.tests_passed)
    }
}

/// `round(100 * passed / max(1, total), 1)`, with zero tests reported as 100.0.
pub fn pass_rate_pct(tests_total: u64, tests_passed: u64) -> f64 {
    if tests_total == 0 {
        return 100.0;
    }
    round_to(100.0 * tests_passed as f64 / tests_total.max(1) as f64, 1)
}

#[derive(Debug, Deserialize)]
struct RunResults {
    #[serde(default)]
    results: Vec<RunResultEntry>,
}

#[derive(Debug, Deserialize)]
struct RunResultEntry {
    #[serde(default)]
    unique_id: String,
    #[serde(default)]
    status: Option<String>,
}

/// Count test entries in a `run_results.json` document.
pub fn summarize_run_results(document: &str) -> Result<ExternalTestSummary, serde_json::Error> {
    let parsed: RunResults = serde_json::from_str(document)?;
    let mut summary = ExternalTestSummary::default();
    for entry in parsed
        .results
        .iter()
        .filter(|entry| entry.unique_id.starts_with(TEST_ID_PREFIX))
    {
        summary.tests_total += 1;
        if entry.status.as_deref() == Some(PASS_STATUS) {
            summary.tests_passed += 1;
        }
    }
    Ok(summary)
}

/// Load the summary from disk.
///
/// A missing artifact is the normal "no external summary" case. An unreadable
/// or malformed one degrades to the same fallback with a warning.
pub fn load_test_summary(path: &Path) -> Option<ExternalTestSummary> {
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "no run results artifact");
        return None;
    }

    let document = match fs::read_to_string(path) {
        Ok(document) => document,
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "run results unreadable; ignoring");
            return None;
        }
    };

    match summarize_run_results(&document) {
        Ok(summary) => Some(summary),
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "run results malformed; ignoring");
            None
        }
    }
}
