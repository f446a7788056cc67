//! baseline: the reference venue-ingress scenario, end to end.
//!
//! 35 000 spectators, two 15-lane security tents, one escalator and a
//! staircase, 3.5 hours.  Usage:
//!
//! ```text
//! baseline [CONFIG.json] [--out DIR] [--replications N] [--sqlite]
//! ```
//!
//! Without a config file the built-in baseline is used.  Set `RUST_LOG`
//! (e.g. `RUST_LOG=vf_sim=debug`) for more detail than the default `info`.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vf_core::{IngressConfig, SimRng, SimTime};
use vf_output::{CsvWriter, RunSummary, write_output};
use vf_sim::{SimBuilder, SimObserver, SystemSnapshot, run_replications};

const DEFAULT_OUTPUT_DIR: &str = "output/baseline";

// ── Arguments ─────────────────────────────────────────────────────────────────

struct Args {
    config:       Option<PathBuf>,
    output_dir:   PathBuf,
    replications: Option<u64>,
    sqlite:       bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config:       None,
        output_dir:   PathBuf::from(DEFAULT_OUTPUT_DIR),
        replications: None,
        sqlite:       false,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--out" => {
                args.output_dir = it.next().context("--out needs a directory")?.into();
            }
            "--replications" => {
                let n = it.next().context("--replications needs a count")?;
                args.replications =
                    Some(n.parse().with_context(|| format!("bad replication count {n:?}"))?);
            }
            "--sqlite" => args.sqlite = true,
            flag if flag.starts_with("--") => bail!("unknown flag {flag}"),
            path => args.config = Some(path.into()),
        }
    }
    Ok(args)
}

fn load_config(path: Option<&PathBuf>) -> Result<IngressConfig> {
    let Some(path) = path else {
        return Ok(IngressConfig::baseline());
    };
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let config = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

// ── Observer: live peak tracking ──────────────────────────────────────────────

/// Logs each new peak of the total security queue as the run goes.
#[derive(Default)]
struct PeakQueueObserver {
    peak:      usize,
    peak_time: SimTime,
    snapshots: usize,
}

impl SimObserver for PeakQueueObserver {
    fn on_snapshot(&mut self, snapshot: &SystemSnapshot) {
        self.snapshots += 1;
        let queued: usize = snapshot.checkpoints.iter().map(|c| c.queued).sum();
        if queued > self.peak {
            self.peak = queued;
            self.peak_time = snapshot.time;
            info!(queued, time = %snapshot.time, "new security queue peak");
        }
    }
}

// ── Replications ──────────────────────────────────────────────────────────────

fn replicate(config: &IngressConfig, n: u64) -> Result<()> {
    let seeds: Vec<u64> = (0..n).map(|i| SimRng::derive_seed(config.seed, i)).collect();
    let t0 = Instant::now();
    let outputs = run_replications(config, &seeds)?;
    println!("{n} replications in {:.2} s", t0.elapsed().as_secs_f64());
    println!();

    println!("{:<22} {:>10} {:>12} {:>14}", "seed", "completed", "mean total", "mean sec wait");
    println!("{}", "-".repeat(62));
    for (seed, output) in seeds.iter().zip(&outputs) {
        let s = RunSummary::from_output(output, config);
        println!(
            "{:<22} {:>9.1}% {:>11.1}s {:>13.1}s",
            seed,
            s.completion_rate * 100.0,
            s.mean_total_secs.unwrap_or(f64::NAN),
            s.mean_security_wait_secs.unwrap_or(f64::NAN),
        );
    }
    Ok(())
}

// ── Output ────────────────────────────────────────────────────────────────────

#[cfg(feature = "sqlite")]
fn write_sqlite(args: &Args, output: &vf_sim::SimOutput, config: &IngressConfig) -> Result<()> {
    let mut writer = vf_output::SqliteWriter::new(&args.output_dir)?;
    write_output(&mut writer, output, config)?;
    println!("  output.db            : written");
    Ok(())
}

#[cfg(not(feature = "sqlite"))]
fn write_sqlite(_args: &Args, _output: &vf_sim::SimOutput, _config: &IngressConfig) -> Result<()> {
    bail!("--sqlite requires building with the `sqlite` feature")
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = parse_args()?;
    let config = load_config(args.config.as_ref())?;

    println!("=== baseline: venue ingress funnel ===");
    println!(
        "Population: {}  |  Horizon: {}  |  Seed: {}",
        config.population,
        SimTime(config.horizon_secs),
        config.seed
    );
    println!(
        "Lanes: {}  |  Paths: {}  |  Monitor every {} s",
        config.total_lanes(),
        config.paths.len(),
        config.monitor_interval_secs
    );
    println!();

    if let Some(n) = args.replications {
        return replicate(&config, n);
    }

    // 1. Build and run.
    let mut sim = SimBuilder::new(config.clone()).build()?;
    let mut observer = PeakQueueObserver::default();
    let t0 = Instant::now();
    sim.run(&mut observer)?;
    let elapsed = t0.elapsed();
    let output = sim.finish();

    // 2. Write output.
    let mut writer = CsvWriter::new(&args.output_dir)?;
    let summary = write_output(&mut writer, &output, &config)?;

    // 3. Report.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  entity_records.csv   : {} rows", output.records.len());
    println!("  system_snapshots.csv : {} snapshots", observer.snapshots);
    if args.sqlite {
        write_sqlite(&args, &output, &config)?;
    }
    println!("  written to {}", args.output_dir.display());
    println!();
    print!("{summary}");
    println!("security queue peaked at {} (t = {})", observer.peak, observer.peak_time);

    Ok(())
}
