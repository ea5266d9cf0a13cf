//! Result-mapping summaries
//!
//! Stage payloads are free-form JSON. Two conventions are read here:
//! an object's `status` field decides success, and a numeric
//! `elapsed_secs` field is a timing sample.

use crate::calculator::{MetricsCalculator, MetricsResult};
use apptest_stage::ResultMapping;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload field holding a stage's elapsed time in seconds
pub const TIMING_KEY: &str = "elapsed_secs";

/// Payload field holding a list of response-time samples
pub const RESPONSE_TIMES_KEY: &str = "response_times";

/// Outcome of a single stage as read from its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageOutcome {
    /// Stage reported success
    Success,
    /// Stage reported failure
    Failure,
}

/// Classify a stage payload
///
/// - object with `status`: `"success"` succeeds, anything else fails
/// - `false` or `null`: fails
/// - anything else: succeeds
#[must_use]
pub fn classify(payload: &Value) -> StageOutcome {
    match payload {
        Value::Object(map) => match map.get("status") {
            Some(Value::String(status)) if status == "success" => StageOutcome::Success,
            Some(_) => StageOutcome::Failure,
            None => StageOutcome::Success,
        },
        Value::Bool(false) | Value::Null => StageOutcome::Failure,
        _ => StageOutcome::Success,
    }
}

/// Numeric timing recorded in a payload, if any
#[must_use]
pub fn timing_of(payload: &Value) -> Option<f64> {
    payload
        .get(TIMING_KEY)
        .and_then(Value::as_f64)
        .filter(|t| t.is_finite())
}

/// Success/failure tally and timing aggregates
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultSummary {
    /// Stages that reported success
    pub success_count: usize,
    /// Stages that reported failure
    pub failure_count: usize,
    /// Stages that recorded a timing
    pub timed_stages: usize,
    /// Statistics over recorded timings
    pub timing: Option<MetricsResult>,
}

impl ResultSummary {
    /// Total stages seen
    #[inline]
    #[must_use]
    pub fn total(&self) -> usize {
        self.success_count + self.failure_count
    }

    /// Check if no stage failed
    #[inline]
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failure_count == 0
    }
}

/// Summarize one result mapping
#[must_use]
pub fn summarize(results: &ResultMapping) -> ResultSummary {
    summarize_runs(std::iter::once(results))
}

/// Summarize several result mappings as one population
#[must_use]
pub fn summarize_runs<'a, I>(runs: I) -> ResultSummary
where
    I: IntoIterator<Item = &'a ResultMapping>,
{
    let mut summary = ResultSummary::default();
    let mut timings = Vec::new();

    for payload in runs.into_iter().flat_map(|results| results.values()) {
        match classify(payload) {
            StageOutcome::Success => summary.success_count += 1,
            StageOutcome::Failure => summary.failure_count += 1,
        }
        if let Some(t) = timing_of(payload) {
            timings.push(t);
        }
    }

    summary.timed_stages = timings.len();
    summary.timing = MetricsCalculator::calculate(&timings).ok();
    summary
}

/// First non-empty numeric `response_times` array among `sources`
///
/// Sources are tried in the given order; the winning stage name is
/// returned with the samples.
#[must_use]
pub fn extract_response_times<'s>(
    results: &ResultMapping,
    sources: &[&'s str],
) -> Option<(&'s str, Vec<f64>)> {
    sources.iter().find_map(|&source| {
        let samples: Vec<f64> = results
            .get(source)?
            .get(RESPONSE_TIMES_KEY)?
            .as_array()?
            .iter()
            .filter_map(Value::as_f64)
            .collect();
        (!samples.is_empty()).then_some((source, samples))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn mapping(entries: &[(&str, Value)]) -> ResultMapping {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn classify_payloads() {
        assert_eq!(classify(&json!(true)), StageOutcome::Success);
        assert_eq!(classify(&json!(false)), StageOutcome::Failure);
        assert_eq!(classify(&Value::Null), StageOutcome::Failure);
        assert_eq!(classify(&json!("dummy_log.txt")), StageOutcome::Success);
        assert_eq!(classify(&json!({ "status": "success" })), StageOutcome::Success);
        assert_eq!(classify(&json!({ "status": "error" })), StageOutcome::Failure);
        assert_eq!(classify(&json!({ "entries": [] })), StageOutcome::Success);
    }

    #[test]
    fn summarize_counts_and_timings() {
        let results = mapping(&[
            ("connect", json!(true)),
            ("send_batch", json!({ "status": "success", "elapsed_secs": 0.2 })),
            ("calculate_metrics", json!({ "status": "error", "error": "boom" })),
            ("create_graphs", json!({ "status": "success", "elapsed_secs": 0.4 })),
            ("bogus_timing", json!({ "status": "success", "elapsed_secs": "fast" })),
        ]);

        let summary = summarize(&results);
        assert_eq!(summary.success_count, 4);
        assert_eq!(summary.failure_count, 1);
        assert_eq!(summary.timed_stages, 2);
        let timing = summary.timing.unwrap();
        assert!((timing.mean - 0.3).abs() < 1e-9);
        assert!(!summary.all_succeeded());
        assert_eq!(summary.total(), 5);
    }

    #[test]
    fn summarize_without_timings() {
        let summary = summarize(&mapping(&[("connect", json!(true))]));
        assert_eq!(summary.timed_stages, 0);
        assert!(summary.timing.is_none());
    }

    #[test]
    fn summarize_runs_pools_samples() {
        let a = mapping(&[("s", json!({ "elapsed_secs": 1.0 }))]);
        let b = mapping(&[("s", json!({ "elapsed_secs": 3.0 }))]);

        let summary = summarize_runs([&a, &b]);
        assert_eq!(summary.success_count, 2);
        assert_eq!(summary.timing.unwrap().median, 2.0);
    }

    #[test]
    fn extract_prefers_first_source() {
        let results = mapping(&[
            ("read_log", json!({ "response_times": [0.3] })),
            ("send_batch", json!({ "response_times": [0.1, 0.2] })),
        ]);

        let (source, samples) =
            extract_response_times(&results, &["send_batch", "read_log"]).unwrap();
        assert_eq!(source, "send_batch");
        assert_eq!(samples, vec![0.1, 0.2]);
    }

    #[test]
    fn extract_skips_empty_arrays() {
        let results = mapping(&[
            ("send_batch", json!({ "response_times": [] })),
            ("read_log", json!({ "response_times": [0.3] })),
        ]);

        let (source, _) = extract_response_times(&results, &["send_batch", "read_log"]).unwrap();
        assert_eq!(source, "read_log");
        assert!(extract_response_times(&results, &["connect"]).is_none());
    }
}
