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
#[command(about = "afloat workspace automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the contention benchmarks and compare strategies
    Bench {
        /// Run quickly (lower sample size/time)
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// Generate report only (skip running benchmarks)
        #[arg(long, default_value_t = false)]
        report_only: bool,
    },
}

/// Column order of the report; `locking` is the baseline for ratios.
const STRATEGIES: &[&str] = &["bitwise", "backoff", "locking"];
const BASELINE: &str = "locking";

/// workload -> strategy -> ops/s
type Results = BTreeMap<String, BTreeMap<String, f64>>;

#[derive(Deserialize)]
struct Estimates {
    mean: PointEstimate,
}

#[derive(Deserialize)]
struct PointEstimate {
    point_estimate: f64,
}

#[derive(Deserialize)]
struct BenchmarkInfo {
    throughput: Option<Throughput>,
}

#[derive(Deserialize)]
enum Throughput {
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
    let start = Instant::now();

    let mut cmd = Command::new("cargo");
    cmd.args(["bench", "--bench", "contention"]);

    // Args for the test runner (Criterion) go after --
    if quick {
        cmd.arg("--");
        cmd.arg("--measurement-time").arg("0.5");
        cmd.arg("--noplot");
        cmd.arg("--sample-size").arg("10");
    }

    let status = cmd.status().context("Failed to launch cargo bench")?;
    if !status.success() {
        anyhow::bail!("Contention benchmark failed");
    }

    println!("Finished in {:.2?}", start.elapsed());
    Ok(())
}

fn generate_report() -> Result<()> {
    println!("\n>>> Generating Report...");

    let criterion_dir = Path::new("target/criterion");
    if !criterion_dir.exists() {
        eprintln!("No criterion output found at {}", criterion_dir.display());
        return Ok(());
    }

    let mut results = Results::new();
    collect_results(criterion_dir, &mut results);

    let report_path = Path::new("benchmark_results/report.md");
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(report_path)
        .with_context(|| format!("Failed to create {}", report_path.display()))?;

    writeln!(file, "# Contention Benchmark Report")?;
    writeln!(file)?;

    write!(file, "| Workload |")?;
    for strategy in STRATEGIES {
        write!(file, " {strategy} (Ops/s) | vs {BASELINE} |")?;
    }
    writeln!(file)?;

    write!(file, "|---|")?;
    for _ in STRATEGIES {
        write!(file, "---|---|")?;
    }
    writeln!(file)?;

    for (workload, by_strategy) in &results {
        write!(file, "| {workload} |")?;
        let baseline = by_strategy.get(BASELINE).copied().unwrap_or(0.0);

        for strategy in STRATEGIES {
            if let Some(ops) = by_strategy.get(*strategy) {
                let rel = if baseline > 0.0 { ops / baseline } else { 0.0 };
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

/// Walks criterion output looking for `<workload>/<strategy>/new/estimates.json`.
fn collect_results(dir: &Path, results: &mut Results) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_results(&path, results);
            continue;
        }
        if path.file_name().and_then(|s| s.to_str()) != Some("estimates.json") {
            continue;
        }

        let Some(baseline_dir) = path.parent() else {
            continue;
        };
        if baseline_dir.file_name().and_then(|s| s.to_str()) != Some("new") {
            continue;
        }
        let Some(strategy_dir) = baseline_dir.parent() else {
            continue;
        };
        let Some(workload_dir) = strategy_dir.parent() else {
            continue;
        };
        let (Some(strategy), Some(workload)) = (dir_name(strategy_dir), dir_name(workload_dir))
        else {
            continue;
        };
        if !STRATEGIES.contains(&strategy.as_str()) {
            continue;
        }

        let elements = read_json::<BenchmarkInfo>(&baseline_dir.join("benchmark.json"))
            .and_then(|info| info.throughput)
            .map_or(1.0, |t| match t {
                Throughput::Elements(n) | Throughput::Bytes(n) | Throughput::BytesDecimal(n) => {
                    n as f64
                }
            });

        if let Some(estimates) = read_json::<Estimates>(&path) {
            let time_ns = estimates.mean.point_estimate;
            if time_ns > 0.0 {
                results
                    .entry(workload)
                    .or_default()
                    .insert(strategy, elements * 1e9 / time_ns);
            }
        }
    }
}

fn dir_name(path: &Path) -> Option<String> {
    path.file_name().and_then(|s| s.to_str()).map(str::to_owned)
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Option<T> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}
