use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "condswap workspace automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the contention benchmark once per emitter strategy and compare
    Bench {
        /// Run quickly (lower sample size/time)
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// Generate report only (skip running benchmarks)
        #[arg(long, default_value_t = false)]
        report_only: bool,
    },
}

/// Baseline name and the cargo features that select the emitter.
const STRATEGIES: &[(&str, &[&str])] = &[
    ("conditional-swap", &[]),
    ("native-rmw", &["native-rmw"]),
];

const BENCH: &str = "contention_benchmark";
const REPORT_PATH: &str = "benchmark_results/report.md";

#[derive(Deserialize)]
struct Estimates {
    mean: Estimate,
}

#[derive(Deserialize)]
struct Estimate {
    point_estimate: f64,
}

#[derive(Deserialize)]
struct BenchmarkMeta {
    throughput: Option<ThroughputMeta>,
}

#[derive(Deserialize)]
enum ThroughputMeta {
    Elements(u64),
    Bytes(u64),
    BytesDecimal(u64),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Bench { quick, report_only } => {
            if !report_only {
                run_benchmarks(quick)?;
            }
            generate_report()?;
        }
    }

    Ok(())
}

fn run_benchmarks(quick: bool) -> Result<()> {
    println!("Running contention benchmarks...");

    println!("Compiling benchmarks...");
    let status = Command::new("cargo")
        .args(["build", "--bench", BENCH, "--release"])
        .status()
        .context("failed to spawn cargo build")?;
    if !status.success() {
        anyhow::bail!("Failed to compile benchmarks");
    }

    for (baseline, features) in STRATEGIES {
        println!("\n>>> Benchmarking emitter: {baseline}");
        let start = Instant::now();

        let mut cmd = Command::new("cargo");
        cmd.env("CARGO_INCREMENTAL", "0")
            .env("RUSTFLAGS", "-C opt-level=3 -C codegen-units=1");

        cmd.arg("bench").arg("--bench").arg(BENCH);
        if !features.is_empty() {
            cmd.arg("--features").arg(features.join(","));
        }

        // Args for the test runner (Criterion) go after --
        cmd.arg("--");
        cmd.arg("default_surface");
        cmd.arg("--save-baseline").arg(baseline);

        if quick {
            cmd.arg("--measurement-time").arg("0.1");
            cmd.arg("--noplot");
            cmd.arg("--sample-size").arg("10");
        }

        let status = cmd
            .status()
            .with_context(|| format!("Failed to run bench for {baseline}"))?;

        if status.success() {
            println!("Finished {baseline} in {:.2?}", start.elapsed());
        } else {
            eprintln!("Warning: Benchmark failed for {baseline}");
        }
    }

    Ok(())
}

fn generate_report() -> Result<()> {
    println!("\n>>> Generating Report...");
    let mut results: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();

    let criterion_dir = Path::new("target/criterion");
    if !criterion_dir.exists() {
        eprintln!("No criterion output found at {}", criterion_dir.display());
        return Ok(());
    }

    collect_results(criterion_dir, &mut results)?;

    let report_path = Path::new(REPORT_PATH);
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let mut file = fs::File::create(report_path)
        .with_context(|| format!("creating {}", report_path.display()))?;

    writeln!(file, "# Emitter Comparison Report")?;
    writeln!(file)?;

    let (reference, _) = STRATEGIES[0];

    write!(file, "| Workload |")?;
    for (name, _) in STRATEGIES {
        write!(file, " {name} (Ops/s) | vs {reference} |")?;
    }
    writeln!(file)?;

    write!(file, "|---|")?;
    for _ in STRATEGIES {
        write!(file, "---|---|")?;
    }
    writeln!(file)?;

    for (workload, by_strategy) in &results {
        write!(file, "| {workload} |")?;

        let reference_ops = by_strategy.get(reference).copied().unwrap_or(0.0);

        for (name, _) in STRATEGIES {
            if let Some(ops) = by_strategy.get(*name) {
                let rel = if reference_ops > 0.0 { ops / reference_ops } else { 0.0 };
                write!(file, " {} | **{rel:.2}x** |", format_ops(*ops))?;
            } else {
                write!(file, " N/A | - |")?;
            }
        }
        writeln!(file)?;
    }

    println!("Report written to {}", report_path.display());
    Ok(())
}

fn format_ops(ops: f64) -> String {
    if ops > 1_000_000.0 {
        format!("{:.2}M", ops / 1_000_000.0)
    } else if ops > 1_000.0 {
        format!("{:.2}K", ops / 1_000.0)
    } else {
        format!("{ops:.0}")
    }
}

/// Walks `target/criterion`, reading `<workload>/<baseline>/estimates.json` for
/// every baseline named in [`STRATEGIES`].
fn collect_results(dir: &Path, results: &mut BTreeMap<String, BTreeMap<String, f64>>) -> Result<()> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Ok(());
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_results(&path, results)?;
            continue;
        }
        if path.file_name().and_then(|s| s.to_str()) != Some("estimates.json") {
            continue;
        }

        let Some(baseline_dir) = path.parent() else { continue };
        let Some(baseline) = baseline_dir.file_name().and_then(|s| s.to_str()) else { continue };
        if !STRATEGIES.iter().any(|(name, _)| *name == baseline) {
            continue;
        }
        let Some(workload_dir) = baseline_dir.parent() else { continue };
        let workload = workload_dir
            .strip_prefix("target/criterion")
            .unwrap_or(workload_dir)
            .display()
            .to_string();

        let elements = read_elements(&baseline_dir.join("benchmark.json"));

        let content = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let estimates: Estimates = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;

        let time_ns = estimates.mean.point_estimate;
        if time_ns > 0.0 {
            let metric = elements.unwrap_or(1.0) * 1e9 / time_ns;
            results
                .entry(workload)
                .or_default()
                .insert(baseline.to_string(), metric);
        }
    }

    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn read_elements(path: &Path) -> Option<f64> {
    let content = fs::read_to_string(path).ok()?;
    let meta: BenchmarkMeta = serde_json::from_str(&content).ok()?;
    match meta.throughput? {
        ThroughputMeta::Elements(n) => Some(n as f64),
        ThroughputMeta::Bytes(_) | ThroughputMeta::BytesDecimal(_) => None,
    }
}
