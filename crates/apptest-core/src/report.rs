//! Run report

use crate::facade::RunResults;
use apptest_metrics::{summarize, summarize_runs, ResultSummary};
use apptest_stage::ResultMapping;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// One test type's results for one app
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestReport {
    /// Test type
    pub test_type: String,
    /// Stage name → output
    pub results: ResultMapping,
    /// Success/failure counts and timings
    pub summary: ResultSummary,
}

/// All test reports for one app
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppReport {
    /// App name
    pub app: String,
    /// Per-test-type reports in run order
    pub tests: Vec<TestReport>,
}

/// Summary of a full run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// When the report was built
    pub generated_at: DateTime<Utc>,
    /// Per-app reports in registration order
    pub apps: Vec<AppReport>,
}

impl RunReport {
    /// Build from facade results
    #[must_use]
    pub fn from_results(results: &RunResults) -> Self {
        let apps = results
            .iter()
            .map(|(app, tests)| AppReport {
                app: app.clone(),
                tests: tests
                    .iter()
                    .map(|(test_type, results)| TestReport {
                        test_type: test_type.clone(),
                        summary: summarize(results),
                        results: results.clone(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            apps,
        }
    }

    /// Summary pooled over every test of every app
    #[must_use]
    pub fn overall(&self) -> ResultSummary {
        summarize_runs(
            self.apps
                .iter()
                .flat_map(|app| app.tests.iter().map(|test| &test.results)),
        )
    }

    /// Check if no stage reported failure
    #[must_use]
    pub fn passed(&self) -> bool {
        self.apps
            .iter()
            .flat_map(|app| &app.tests)
            .all(|test| test.summary.all_succeeded())
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Generate text report
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut report = String::new();

        report.push_str("=== AppTest Report ===\n\n");
        let _ = writeln!(report, "Generated: {}", self.generated_at.to_rfc3339());
        let _ = writeln!(report, "Apps: {}", self.apps.len());

        for app in &self.apps {
            let _ = writeln!(report, "\n=== {} ===", app.app);
            for test in &app.tests {
                let summary = &test.summary;
                let _ = writeln!(
                    report,
                    "{}: {} stages, {} succeeded, {} failed",
                    test.test_type,
                    summary.total(),
                    summary.success_count,
                    summary.failure_count
                );
                if let Some(timing) = &summary.timing {
                    let _ = writeln!(
                        report,
                        "  timing over {} stages: mean {:.3}s, max {:.3}s",
                        summary.timed_stages, timing.mean, timing.max
                    );
                }
                if let Some(metrics) = test
                    .results
                    .get("calculate_metrics")
                    .and_then(|out| out.get("metrics"))
                {
                    let _ = writeln!(report, "  response times: {metrics}");
                }
            }
        }

        let _ = writeln!(
            report,
            "\n=== Result: {} ===",
            if self.passed() { "PASS" } else { "FAIL" }
        );
        report
    }
}
