//! Built-in stage library
//!
//! Simulated stages for the three built-in test types. Response times are
//! drawn uniformly from [`RESPONSE_TIME_RANGE`]; nothing talks to a real app.
//!
//! | collection    | stages                                                            |
//! |---------------|-------------------------------------------------------------------|
//! | `replay`      | connect, get_log, inject_data                                     |
//! | `performance` | connect, send_batch, calculate_metrics, create_graphs             |
//! | `recovery`    | connect, inject_fault, read_log, calculate_metrics, create_graphs |
//!
//! Graphs are named `<app>_<test type>_<metric>_<timestamp>.png`, so runs of
//! different apps or test types never overwrite each other.

use apptest_graph::{timestamped_name, GraphOptions, ResponseTimeGrapher};
use apptest_metrics::{
    extract_response_times, MetricsCalculator, RESPONSE_TIMES_KEY, TIMING_KEY,
};
use apptest_registry::{PERFORMANCE, RECOVERY, REPLAY};
use apptest_stage::{ActionError, InputBinding, Stage, StageCollection, StageError};
use indexmap::IndexMap;
use rand::Rng;
use serde_json::{json, Value};
use std::ops::Range;

/// Bounds of simulated response times, in seconds
pub const RESPONSE_TIME_RANGE: Range<f64> = 0.1..0.5;

/// Stages `calculate_metrics` searches for samples, in order
pub const SAMPLE_SOURCES: [&str; 2] = ["send_batch", "read_log"];

/// Settings shared by the built-in stages
#[derive(Debug, Clone, PartialEq)]
pub struct StageSettings {
    /// Where `create_graphs` writes
    pub graph: GraphOptions,
    /// Simulated samples per `send_batch` / `read_log`
    pub sample_count: usize,
}

impl StageSettings {
    /// Default settings writing graphs to `output_dir`
    #[inline]
    #[must_use]
    pub fn new(output_dir: impl Into<std::path::PathBuf>) -> Self {
        Self {
            graph: GraphOptions::new(output_dir),
            ..Self::default()
        }
    }

    /// With sample count
    #[inline]
    #[must_use]
    pub fn with_sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = sample_count;
        self
    }

    /// With graph options
    #[inline]
    #[must_use]
    pub fn with_graph(mut self, graph: GraphOptions) -> Self {
        self.graph = graph;
        self
    }
}

impl Default for StageSettings {
    fn default() -> Self {
        Self {
            graph: GraphOptions::default(),
            sample_count: 100,
        }
    }
}

fn simulate_response_times(count: usize) -> Vec<f64> {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| rng.random_range(RESPONSE_TIME_RANGE))
        .collect()
}

/// Connect to the app; input is the app name
#[must_use]
pub fn connect() -> Stage {
    Stage::infallible("connect", |app| {
        tracing::info!(app = %app, "connecting");
        Value::Bool(true)
    })
    .with_binding(InputBinding::AppName)
}

/// Fetch the app's recorded log path; input is the app name
#[must_use]
pub fn get_log() -> Stage {
    Stage::infallible("get_log", |app| {
        tracing::info!(app = %app, "getting log");
        Value::String("dummy_log.txt".to_string())
    })
    .with_binding(InputBinding::AppName)
}

/// Inject the configured batch; input is `batch_data` from the run context
#[must_use]
pub fn inject_data() -> Stage {
    Stage::infallible("inject_data", |batch| {
        tracing::info!(batch = %batch, "injecting data");
        json!({ "status": "success" })
    })
    .with_binding(InputBinding::context("batch_data"))
}

/// Inject the configured fault; input is `fault` from the run context
#[must_use]
pub fn inject_fault() -> Stage {
    Stage::infallible("inject_fault", |fault| {
        tracing::info!(fault = %fault, "injecting fault");
        json!({ "status": "success", "fault": fault })
    })
    .with_binding(InputBinding::context("fault"))
}

/// Read the recovery log and its response times; input is `recovery_log`
#[must_use]
pub fn read_log(settings: &StageSettings) -> Stage {
    let count = settings.sample_count;
    Stage::infallible("read_log", move |log_path| {
        tracing::info!(log_path = %log_path, "reading log");
        json!({
            "status": "success",
            "log_path": log_path,
            RESPONSE_TIMES_KEY: simulate_response_times(count),
            "entries": ["Log entry 1", "Log entry 2"],
        })
    })
    .with_binding(InputBinding::context("recovery_log"))
}

/// Send the configured batch and time the responses; input is `batch_data`
#[must_use]
pub fn send_batch(settings: &StageSettings) -> Stage {
    let count = settings.sample_count;
    Stage::infallible("send_batch", move |batch| {
        tracing::info!(batch = %batch, "sending batch");
        let batch_size = batch
            .get("data")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        let response_times = simulate_response_times(count);
        let elapsed: f64 = response_times.iter().sum();
        json!({
            "status": "success",
            "batch_size": batch_size,
            RESPONSE_TIMES_KEY: response_times,
            TIMING_KEY: elapsed,
        })
    })
    .with_binding(InputBinding::context("batch_data"))
}

/// Compute response-time metrics from earlier results
///
/// Fails when neither `send_batch` nor `read_log` produced samples.
/// Invalid samples yield an error payload instead.
#[must_use]
pub fn calculate_metrics() -> Stage {
    Stage::new("calculate_metrics", |results| {
        let mapping: IndexMap<String, Value> = match results {
            Value::Object(map) => map.into_iter().collect(),
            _ => IndexMap::new(),
        };
        let (source, samples) = extract_response_times(&mapping, &SAMPLE_SOURCES)
            .ok_or_else(|| ActionError::from("no response times found in results"))?;

        tracing::info!(source, samples = samples.len(), "calculating metrics");
        Ok(match MetricsCalculator::process(&samples) {
            Ok(metrics) => json!({
                "metrics": metrics,
                "status": "success",
                "sample_size": samples.len(),
                "source": source,
                RESPONSE_TIMES_KEY: samples,
            }),
            Err(e) => json!({ "status": "error", "error": e.to_string() }),
        })
    })
}

/// Render scatter and analysis plots of the samples `calculate_metrics` passed on
///
/// Input is the app name plus the earlier results; file names carry both the
/// app and `test_type`. Fails when no samples were passed on. Rendering
/// failures yield an error payload instead.
#[must_use]
pub fn create_graphs(settings: &StageSettings, test_type: &str) -> Stage {
    let grapher = ResponseTimeGrapher::new(settings.graph.clone());
    let test_type = test_type.to_string();
    Stage::new("create_graphs", move |input| {
        let app = input.get("app").and_then(Value::as_str).unwrap_or("app");
        let metrics = input.get("results").and_then(|r| r.get("calculate_metrics"));
        let samples: Vec<f64> = metrics
            .and_then(|m| m.get(RESPONSE_TIMES_KEY))
            .and_then(Value::as_array)
            .map(|values| values.iter().filter_map(Value::as_f64).collect())
            .unwrap_or_default();
        if samples.is_empty() {
            return Err(ActionError::from("no response times found in metrics results"));
        }

        let source = title_case(
            metrics
                .and_then(|m| m.get("source"))
                .and_then(Value::as_str)
                .unwrap_or("unknown"),
        );
        let prefix = format!("{}_{test_type}", file_stem(app));
        tracing::info!(app, test_type = %test_type, source = %source, "generating graphs");

        let rendered = grapher
            .create_scatter_plot(
                &samples,
                &format!("Response Times Over Time - {source}"),
                Some(&timestamped_name(&format!("{prefix}_response_times"))),
            )
            .and_then(|scatter| {
                let analysis = grapher.create_multi_plot(
                    &samples,
                    &format!("Response Time Analysis - {source}"),
                    Some(&timestamped_name(&format!("{prefix}_response_time_analysis"))),
                )?;
                Ok((scatter, analysis))
            });

        Ok(match rendered {
            Ok((scatter, analysis)) => json!({
                "status": "success",
                "graphs": {
                    "scatter_plot": scatter.display().to_string(),
                    "analysis_plot": analysis.display().to_string(),
                },
            }),
            Err(e) => {
                tracing::warn!(error = %e, "graph rendering failed");
                json!({ "status": "error", "error": e.to_string() })
            }
        })
    })
    .with_binding(InputBinding::custom(|scope| {
        Ok(json!({ "app": scope.app_name, "results": scope.results_object() }))
    }))
}

/// App name made safe for a file name: `My App/v2` → `My_App_v2`
fn file_stem(app: &str) -> String {
    app.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

/// `send_batch` → `Send Batch`
fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// connect → get_log → inject_data
pub fn replay_stages() -> Result<StageCollection, StageError> {
    StageCollection::new(vec![connect(), get_log(), inject_data()])
}

/// connect → send_batch → calculate_metrics → create_graphs
pub fn performance_stages(settings: &StageSettings) -> Result<StageCollection, StageError> {
    StageCollection::new(vec![
        connect(),
        send_batch(settings),
        calculate_metrics(),
        create_graphs(settings, PERFORMANCE),
    ])
}

/// connect → inject_fault → read_log → calculate_metrics → create_graphs
pub fn recovery_stages(settings: &StageSettings) -> Result<StageCollection, StageError> {
    StageCollection::new(vec![
        connect(),
        inject_fault(),
        read_log(settings),
        calculate_metrics(),
        create_graphs(settings, RECOVERY),
    ])
}

/// Built-in collection for a test type, if there is one
pub fn stages_for(
    test_type: &str,
    settings: &StageSettings,
) -> Option<Result<StageCollection, StageError>> {
    match test_type {
        REPLAY => Some(replay_stages()),
        PERFORMANCE => Some(performance_stages(settings)),
        RECOVERY => Some(recovery_stages(settings)),
        _ => None,
    }
}

/// All three built-in collections keyed by test type
pub fn default_collections(
    settings: &StageSettings,
) -> Result<IndexMap<String, StageCollection>, StageError> {
    Ok(IndexMap::from([
        (REPLAY.to_string(), replay_stages()?),
        (PERFORMANCE.to_string(), performance_stages(settings)?),
        (RECOVERY.to_string(), recovery_stages(settings)?),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use apptest_stage::{run_stages, RunContext};
    use pretty_assertions::assert_eq;

    fn settings(dir: &std::path::Path) -> StageSettings {
        StageSettings::new(dir)
            .with_sample_count(20)
            .with_graph(GraphOptions::new(dir).with_size(320, 240))
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("send_batch"), "Send Batch");
        assert_eq!(title_case("read_log"), "Read Log");
        assert_eq!(title_case("unknown"), "Unknown");
    }

    #[test]
    fn simulated_times_in_range() {
        let times = simulate_response_times(200);
        assert_eq!(times.len(), 200);
        assert!(times.iter().all(|t| RESPONSE_TIME_RANGE.contains(t)));
    }

    #[test]
    fn collections_have_expected_order() {
        let s = StageSettings::default();
        assert_eq!(
            replay_stages().unwrap().names(),
            vec!["connect", "get_log", "inject_data"]
        );
        assert_eq!(
            performance_stages(&s).unwrap().names(),
            vec!["connect", "send_batch", "calculate_metrics", "create_graphs"]
        );
        assert_eq!(
            recovery_stages(&s).unwrap().names(),
            vec![
                "connect",
                "inject_fault",
                "read_log",
                "calculate_metrics",
                "create_graphs"
            ]
        );
        assert!(stages_for("soak", &s).is_none());
    }

    #[test]
    fn calculate_metrics_without_samples_fails() {
        let err = calculate_metrics()
            .execute(json!({ "connect": true }))
            .unwrap_err();
        assert_eq!(err.stage(), "calculate_metrics");
        assert!(err.to_string().contains("no response times"));
    }

    #[test]
    fn calculate_metrics_reports_source() {
        let out = calculate_metrics()
            .execute(json!({ "read_log": { "response_times": [0.1, 0.2, 0.3] } }))
            .unwrap();
        assert_eq!(out["status"], "success");
        assert_eq!(out["source"], "read_log");
        assert_eq!(out["sample_size"], 3);
        assert_eq!(out["metrics"]["median"], 0.2);
    }

    #[test]
    fn send_batch_counts_batch() {
        let out = send_batch(&StageSettings::default().with_sample_count(5))
            .execute(json!({ "data": [1, 2, 3] }))
            .unwrap();
        assert_eq!(out["batch_size"], 3);
        assert_eq!(out[RESPONSE_TIMES_KEY].as_array().unwrap().len(), 5);
        assert!(out[TIMING_KEY].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn recovery_run_writes_graphs() {
        let dir = tempfile::tempdir().unwrap();
        let stages = recovery_stages(&settings(dir.path())).unwrap();
        let context = RunContext::new()
            .with("fault", json!({ "kind": "disk_full" }))
            .with("recovery_log", json!("recovery.log"));

        let results = run_stages("Svc", &stages, &context).unwrap();
        assert_eq!(results["inject_fault"]["fault"], json!({ "kind": "disk_full" }));
        assert_eq!(results["read_log"]["log_path"], "recovery.log");
        assert_eq!(results["calculate_metrics"]["source"], "read_log");

        let graphs = &results["create_graphs"];
        assert_eq!(graphs["status"], "success", "{graphs}");
        for plot in ["scatter_plot", "analysis_plot"] {
            let path = std::path::Path::new(graphs["graphs"][plot].as_str().unwrap());
            assert!(path.exists());
            let name = path.file_name().unwrap().to_string_lossy();
            assert!(name.starts_with("Svc_recovery_"), "{name}");
        }
    }

    #[test]
    fn create_graphs_names_files_per_app_and_test_type() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let metrics = json!({ "source": "send_batch", "response_times": [0.1, 0.3, 0.2] });

        let mut paths = std::collections::HashSet::new();
        for (app, test_type) in [("A", PERFORMANCE), ("B", PERFORMANCE), ("A", RECOVERY)] {
            let metrics = metrics.clone();
            let stages = StageCollection::new(vec![
                Stage::infallible("calculate_metrics", move |_| metrics.clone()),
                create_graphs(&settings, test_type),
            ])
            .unwrap();

            let results = run_stages(app, &stages, &RunContext::new()).unwrap();
            let out = &results["create_graphs"];
            assert_eq!(out["status"], "success", "{out}");
            for plot in ["scatter_plot", "analysis_plot"] {
                paths.insert(out["graphs"][plot].as_str().unwrap().to_string());
            }
        }

        assert_eq!(paths.len(), 6);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 6);
    }

    #[test]
    fn file_stem_replaces_separators() {
        assert_eq!(file_stem("My App/v2"), "My_App_v2");
        assert_eq!(file_stem("checkout-api"), "checkout-api");
    }
}
