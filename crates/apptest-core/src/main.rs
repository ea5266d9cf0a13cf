//! `apptest` command-line interface

use anyhow::Context as _;
use apptest_core::{HarnessConfig, RunReport};
use apptest_metrics::MetricsCalculator;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("apptest")
        .version(apptest_core::VERSION)
        .about("Performance, replay and recovery test harness")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("run")
                .about("Run every configured test")
                .arg(
                    Arg::new("app")
                        .long("app")
                        .action(ArgAction::Append)
                        .help("Only run this app (repeatable)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(Command::new("list").about("List configured apps and test types"))
        .subcommand(
            Command::new("metrics")
                .about("Compute response-time metrics over a JSON array of samples")
                .arg(
                    Arg::new("samples")
                        .long("samples")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("File holding a JSON array of numbers"),
                ),
        )
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<HarnessConfig> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => HarnessConfig::load(path)
            .with_context(|| format!("loading {}", path.display())),
        None => Ok(HarnessConfig::default()),
    }
}

fn init_tracing(config: &HarnessConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Report where the configuration came from; call after `init_tracing`
fn log_config_source(path: Option<&Path>, config: &HarnessConfig) {
    match path {
        Some(path) => tracing::info!(
            path = %path.display(),
            apps = config.apps.len(),
            "loaded config"
        ),
        None => tracing::info!(apps = config.apps.len(), "using default config"),
    }
}

fn run(config: &HarnessConfig, args: &ArgMatches) -> anyhow::Result<bool> {
    let apps: Vec<String> = args
        .get_many::<String>("app")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let config = if apps.is_empty() {
        config.clone()
    } else {
        config.clone().with_only_apps(&apps)
    };

    let facade = config.build_facade()?;
    let results = facade.run_all_tests()?;
    let report = RunReport::from_results(&results);

    if args.get_flag("json") {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.generate_text());
    }
    Ok(report.passed())
}

fn list(config: &HarnessConfig) -> anyhow::Result<bool> {
    let facade = config.build_facade()?;
    println!("Test types: {}", facade.tests().registered_types().join(", "));
    println!("Strategies: {}", facade.strategies().names().join(", "));
    for (app, stages) in facade.apps() {
        println!("{app}:");
        for (test_type, collection) in stages {
            println!("  {test_type}: {}", collection.names().join(" -> "));
        }
    }
    Ok(true)
}

fn metrics(args: &ArgMatches) -> anyhow::Result<bool> {
    let path = args
        .get_one::<PathBuf>("samples")
        .context("--samples is required")?;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let samples: Vec<f64> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of numbers", path.display()))?;

    let metrics = MetricsCalculator::process(&samples)?;
    println!("{}", serde_json::to_string_pretty(&metrics)?);
    Ok(true)
}

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    init_tracing(&config);
    log_config_source(
        matches.get_one::<PathBuf>("config").map(PathBuf::as_path),
        &config,
    );

    let passed = match matches.subcommand() {
        Some(("run", args)) => run(&config, args)?,
        Some(("list", _)) => list(&config)?,
        Some(("metrics", args)) => metrics(args)?,
        _ => anyhow::bail!("no subcommand given"),
    };

    std::process::exit(if passed { 0 } else { 1 });
}
