//! kvgauge Workload Runner
//!
//! Loads a keyspace through the configured driver, runs a weighted mixed
//! workload against it, and prints a JSON throughput summary.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::info;

use kvgauge_bench::fixtures::{generate_record, generate_records, record_key};
use kvgauge_core::config::{BATCH_SIZE_PROPERTY, NAMESPACE_PROPERTY};
use kvgauge_core::factory::BACKEND_PROPERTY;
use kvgauge_core::store::PATH_PROPERTY;
use kvgauge_core::{open_driver, FieldMap, Properties, TracingSink};

/// Storage backend to drive.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Backend {
    Memory,
    Sled,
}

impl Backend {
    fn as_str(&self) -> &'static str {
        match self {
            Backend::Memory => "memory",
            Backend::Sled => "sled",
        }
    }
}

/// kvgauge workload runner
#[derive(Parser, Debug)]
#[command(name = "kvgauge")]
#[command(version, about = "kvgauge workload runner")]
struct Args {
    /// Storage backend to drive
    #[arg(long, value_enum, default_value = "memory")]
    backend: Backend,

    /// Database directory for the sled backend
    #[arg(long, default_value = "./kvgauge_data")]
    path: PathBuf,

    /// Records to load before the measured phase
    #[arg(long, default_value_t = 10_000)]
    records: usize,

    /// Operations in the measured phase
    #[arg(long, default_value_t = 100_000)]
    operations: usize,

    /// Portion of reads in the mix, in percent
    #[arg(long, default_value_t = 70)]
    reads: u32,

    /// Portion of updates in the mix, in percent
    #[arg(long, default_value_t = 20)]
    updates: u32,

    /// Portion of inserts in the mix, in percent
    #[arg(long, default_value_t = 5)]
    inserts: u32,

    /// Portion of scans in the mix, in percent
    #[arg(long, default_value_t = 5)]
    scans: u32,

    /// Records requested per scan
    #[arg(long, default_value_t = 50)]
    scan_length: usize,

    /// Insert batch size (0 disables batching)
    #[arg(long, default_value_t = 0)]
    batch_size: usize,

    /// Table name
    #[arg(long, default_value = "usertable")]
    table: String,

    /// Keyspace name
    #[arg(long, default_value = "kv")]
    namespace: String,

    /// RNG seed for the operation mix
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Per-outcome operation counts.
#[derive(Debug, Default, Serialize)]
struct Tally {
    ok: u64,
    not_found: u64,
    error: u64,
}

impl Tally {
    fn record(&mut self, code: &str) {
        match code {
            "OK" => self.ok += 1,
            "NOT_FOUND" => self.not_found += 1,
            _ => self.error += 1,
        }
    }
}

/// Run summary printed as JSON.
#[derive(Debug, Serialize)]
struct Summary<'a> {
    backend: &'a str,
    records: usize,
    operations: usize,
    batch_size: usize,
    load_ms: u128,
    run_ms: u128,
    ops_per_sec: f64,
    outcomes: Tally,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("kvgauge=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    if args.reads + args.updates + args.inserts + args.scans != 100 {
        return Err("operation mix must sum to 100 percent".into());
    }
    if args.records == 0 {
        return Err("at least one record must be loaded".into());
    }

    let mut props = Properties::new()
        .with(BACKEND_PROPERTY, args.backend.as_str())
        .with(BATCH_SIZE_PROPERTY, args.batch_size.to_string())
        .with(NAMESPACE_PROPERTY, args.namespace.clone());
    if let Backend::Sled = args.backend {
        props.set(PATH_PROPERTY, args.path.to_string_lossy().to_string());
    }

    let mut driver = open_driver(&props, Arc::new(TracingSink))?;

    // Load phase.
    info!(
        "loading {} records into the {} backend",
        args.records,
        args.backend.as_str()
    );
    let loading = Instant::now();
    for (key, record) in generate_records(args.records) {
        if !driver.insert(&args.table, &key, record).is_ok() {
            return Err(format!("load failed for key {key}").into());
        }
    }
    let load_ms = loading.elapsed().as_millis();

    // Measured phase.
    info!("running {} operations", args.operations);
    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut patch = FieldMap::new();
    patch.insert("field0", vec![b'x'; 100]);
    let mut tally = Tally::default();
    let mut next_insert = args.records;

    let running = Instant::now();
    for _ in 0..args.operations {
        let roll = rng.gen_range(0..100u32);
        let code = if roll < args.reads {
            let key = record_key(rng.gen_range(0..args.records));
            driver.read(&args.table, &key, None).code()
        } else if roll < args.reads + args.updates {
            let key = record_key(rng.gen_range(0..args.records));
            driver.update(&args.table, &key, patch.clone()).code()
        } else if roll < args.reads + args.updates + args.inserts {
            let key = record_key(next_insert);
            next_insert += 1;
            let record = generate_record(&mut rng);
            driver.insert(&args.table, &key, record).code()
        } else {
            let key = record_key(rng.gen_range(0..args.records));
            driver
                .scan(&args.table, &key, args.scan_length, None)
                .code()
        };
        tally.record(code);
    }
    let run_ms = running.elapsed().as_millis();

    driver.cleanup()?;

    let summary = Summary {
        backend: args.backend.as_str(),
        records: args.records,
        operations: args.operations,
        batch_size: args.batch_size,
        load_ms,
        run_ms,
        ops_per_sec: args.operations as f64 / (run_ms.max(1) as f64 / 1000.0),
        outcomes: tally,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
