use apptest_graph::{timestamped_name, GraphOptions, ResponseTimeGrapher};

fn samples() -> Vec<f64> {
    (0..100).map(|i| 0.1 + f64::from(i % 40) * 0.01).collect()
}

fn grapher(dir: &std::path::Path) -> ResponseTimeGrapher {
    ResponseTimeGrapher::new(GraphOptions::new(dir).with_size(400, 300))
}

fn is_png(path: &std::path::Path) -> bool {
    let bytes = std::fs::read(path).unwrap();
    bytes.starts_with(&[0x89, b'P', b'N', b'G'])
}

#[test]
fn test_scatter_plot_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = grapher(dir.path())
        .create_scatter_plot(&samples(), "Response Times Over Time", Some("scatter"))
        .unwrap();

    assert_eq!(path, dir.path().join("scatter.png"));
    assert!(is_png(&path));
}

#[test]
fn test_multi_plot_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = grapher(dir.path())
        .create_multi_plot(&samples(), "Response Time Analysis", None)
        .unwrap();

    assert!(path.starts_with(dir.path()));
    assert!(is_png(&path));
}

#[test]
fn test_constant_samples_render() {
    let dir = tempfile::tempdir().unwrap();
    let path = grapher(dir.path())
        .create_multi_plot(&[0.25; 10], "flat", Some("flat.png"))
        .unwrap();
    assert!(is_png(&path));
}

#[test]
fn test_comparison_plot_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let series = vec![
        ("p50".to_string(), vec![0.2, 0.21, 0.19]),
        ("p99".to_string(), vec![0.45, 0.48, 0.44]),
    ];
    let path = grapher(dir.path())
        .create_comparison_plot(&series, "Percentiles per run", Some("compare"))
        .unwrap();
    assert!(is_png(&path));
}

#[test]
fn test_output_dir_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("graphs").join("nested");
    let path = grapher(&nested)
        .create_scatter_plot(&[0.1, 0.2], "nested", Some("x"))
        .unwrap();
    assert!(nested.is_dir());
    assert!(path.exists());
}

#[test]
fn test_default_size_renders_every_plot() {
    let dir = tempfile::tempdir().unwrap();
    let grapher = ResponseTimeGrapher::new(GraphOptions::new(dir.path()));
    let samples = samples();

    let scatter = grapher
        .create_scatter_plot(&samples, "Response Times Over Time", None)
        .unwrap();
    let analysis = grapher
        .create_multi_plot(&samples, "Response Time Analysis", None)
        .unwrap();
    let single = grapher
        .create_multi_plot(&[0.3], "single sample", Some("single"))
        .unwrap();

    for path in [&scatter, &analysis, &single] {
        assert!(is_png(path), "{} is not a PNG", path.display());
    }
    assert_ne!(scatter, analysis);
}

#[test]
fn test_timestamped_name_keeps_metric_prefix() {
    let name = timestamped_name("Checkout_performance_response_times");
    let stamp = name
        .strip_prefix("Checkout_performance_response_times_")
        .unwrap();
    // YYYYmmdd_HHMMSS
    assert_eq!(stamp.len(), 15);
    assert_eq!(stamp.as_bytes()[8], b'_');
}
