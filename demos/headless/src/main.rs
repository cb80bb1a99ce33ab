//! headless — run the escalator flow simulator without a viewer.
//!
//! ```text
//! headless [config.json] [ticks] [output dir]
//! ```
//!
//! The config file holds a camelCase `SimulationConfig`; missing keys keep
//! their defaults, and a missing path runs the default 3×3 grid.  Writes
//! `agent_snapshots.csv`, `tick_summaries.csv`, `meta.json` and
//! `recording.json` into the output directory.  Set `RUST_LOG=debug` to see
//! every respawn.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use memory_stats::memory_stats;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use esc_core::{AgentId, PairId, SimClock};
use esc_output::{CsvWriter, JsonRecorder, OutputWriter, SimOutputObserver, write_meta};
use esc_sim::{SimBuilder, SimObserver, Simulation, SimulationConfig};

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_TICKS:      u64   = 20_000;
const DEFAULT_OUTPUT_DIR: &str  = "output/headless";
/// Caller dt handed to every tick; clamped by the configured dt bounds.
const FRAME_DT:           f32   = 1.0 / 60.0;
/// Snapshot interval used when the config leaves it at 0.
const DEFAULT_INTERVAL:   u64   = 50;
const PROGRESS_EVERY:     u64   = 2_000;

// ── Memory helper ─────────────────────────────────────────────────────────────

fn mem_mb() -> f64 {
    memory_stats()
        .map(|s| s.physical_mem as f64 / (1024.0 * 1024.0))
        .unwrap_or(0.0)
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Fans every callback out to the table writer and the frame recorder, and
/// prints throughput.
struct HeadlessObserver<W: OutputWriter> {
    tables:   SimOutputObserver<W>,
    recorder: JsonRecorder,
    start:    Instant,
    arrivals: u64,
}

impl<W: OutputWriter> SimObserver for HeadlessObserver<W> {
    fn on_agent_finished(&mut self, pair: PairId, agent: AgentId, count: u64) {
        self.arrivals += 1;
        self.tables.on_agent_finished(pair, agent, count);
    }

    fn on_tick_end(&mut self, clock: &SimClock, finished: usize) {
        if clock.tick % PROGRESS_EVERY == 0 {
            let elapsed = self.start.elapsed().as_secs_f64();
            println!(
                "  tick {:>7}  t={:>8.3}  arrivals={:>6}  {:.2}s  ({:.0} ticks/s)  mem={:.0} MB",
                clock.tick,
                clock.time,
                self.arrivals,
                elapsed,
                clock.tick as f64 / elapsed.max(1e-9),
                mem_mb(),
            );
        }
        self.tables.on_tick_end(clock, finished);
    }

    fn on_snapshot(&mut self, clock: &SimClock, sim: &Simulation) {
        self.tables.on_snapshot(clock, sim);
        self.recorder.on_snapshot(clock, sim);
    }

    fn on_sim_end(&mut self, clock: &SimClock) {
        self.tables.on_sim_end(clock);
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    let Some(path) = path else {
        info!("no config file given, using defaults");
        return Ok(SimulationConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    info!(path = %path.display(), "config loaded");
    Ok(config)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().map(PathBuf::from);
    let ticks = match args.next() {
        Some(n) => n.parse::<u64>().with_context(|| format!("bad tick count {n:?}"))?,
        None => DEFAULT_TICKS,
    };
    let out_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    let mut config = load_config(config_path.as_deref())?;
    if config.output_interval_ticks == 0 {
        config.output_interval_ticks = DEFAULT_INTERVAL;
    }

    println!("=== headless — escalator flow ===");
    println!(
        "Escalators: {}  |  Stairs: {}  |  People/crowd: {}  |  Ticks: {ticks}",
        config.pair_count(),
        config.stairs_num,
        config.people_num,
    );
    println!();

    // 1. Build.
    let t_build = Instant::now();
    let mut sim = SimBuilder::new(config).build()?;
    info!(elapsed_ms = t_build.elapsed().as_millis() as u64, "simulation built");

    // 2. Output.
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    write_meta(&out_dir.join("meta.json"), &sim.snapshot_meta())?;

    let mut recorder = JsonRecorder::new();
    recorder.start();
    let mut obs = HeadlessObserver {
        tables: SimOutputObserver::for_sim(CsvWriter::new(&out_dir)?, &sim),
        recorder,
        start: Instant::now(),
        arrivals: 0,
    };

    // 3. Run.
    sim.run_ticks(ticks, FRAME_DT, &mut obs);
    let elapsed = obs.start.elapsed();

    if let Some(e) = obs.tables.take_error() {
        warn!(error = %e, "table output incomplete");
    }
    obs.recorder.write_to(&out_dir.join("recording.json"))?;

    // 4. Summary.
    println!();
    println!(
        "Simulation complete in {:.3} s ({:.3} simulated s)",
        elapsed.as_secs_f64(),
        sim.time(),
    );
    println!("  frames recorded : {}", obs.recorder.len());
    println!();
    println!("{:<20} {:>10}", "Escalator", "Arrivals");
    println!("{}", "-".repeat(31));
    for (id, count) in sim.escalator_ids().iter().zip(sim.finished_counts()) {
        println!("{id:<20} {count:>10}");
    }

    Ok(())
}
