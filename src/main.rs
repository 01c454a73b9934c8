use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use poisson_rust::fields::{cubic, cubic_laplacian, only_borders};
use poisson_rust::{solve_parallel_in, solve_sequential, Net, Settings};
use rayon::ThreadPool;
use serde::Serialize;

/// Sweeps thread counts and block sizes over the cubic test problem and writes CSV results.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Convergence tolerance
    #[arg(long, default_value_t = poisson_rust::settings::DEFAULT_EPS)]
    eps: f64,
    /// Net sizes, border included
    #[arg(long, value_delimiter = ',', default_values_t = [100, 200, 300, 500])]
    sizes: Vec<usize>,
    /// Thread counts for the thread sweep; 1 runs the sequential solver
    #[arg(long, value_delimiter = ',', default_values_t = [1, 2, 4, 8])]
    threads: Vec<usize>,
    /// Block size used during the thread sweep
    #[arg(long, default_value_t = poisson_rust::settings::DEFAULT_BLOCK_SIZE)]
    block_size: usize,
    /// Block sizes for the block sweep
    #[arg(long, value_delimiter = ',', default_values_t = [8, 16, 32, 64, 128])]
    block_sizes: Vec<usize>,
    /// Thread count used during the block sweep
    #[arg(long, default_value_t = 4)]
    block_threads: usize,
    /// Directory receiving the CSV files
    #[arg(long, default_value = "results")]
    out_dir: PathBuf,
    #[arg(value_enum, short, long, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Error,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Serialize)]
struct ThreadsRow {
    threads: usize,
    #[serde(rename = "net size")]
    net_size: usize,
    iterations: usize,
    time: f64,
}

#[derive(Serialize)]
struct BlockSizeRow {
    #[serde(rename = "block size")]
    block_size: usize,
    #[serde(rename = "net size")]
    net_size: usize,
    time: f64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    poisson_rust::telemetry::init(args.log_level.as_filter())?;

    let settings = Settings {
        eps: args.eps,
        block_size: args.block_size,
        threads: args.block_threads,
    };
    settings.validate()?;

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    fs::write(
        args.out_dir.join("settings.json"),
        serde_json::to_string_pretty(&settings)?,
    )?;

    test_threads_num(&args, &settings, &args.out_dir.join("threads.csv"))?;
    test_block_size(&args, &settings, &args.out_dir.join("block_size.csv"))?;

    tracing::info!("Results written to {}", args.out_dir.display());
    Ok(())
}

fn cubic_net(size: usize) -> anyhow::Result<Net> {
    Ok(Net::new(size, only_borders(cubic), cubic_laplacian)?)
}

fn pool(threads: usize) -> anyhow::Result<ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .with_context(|| format!("building a pool of {threads} threads"))
}

fn timed<T>(run: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let result = run();
    (result, start.elapsed())
}

fn test_threads_num(args: &Args, settings: &Settings, path: &Path) -> anyhow::Result<()> {
    let mut out = csv::Writer::from_path(path)?;

    for &threads in &args.threads {
        anyhow::ensure!(threads >= 1, "thread counts must be at least 1");
        let pool = pool(threads)?;
        for &net_size in &args.sizes {
            let mut net = cubic_net(net_size)?;
            let (iterations, elapsed) = if threads == 1 {
                timed(|| solve_sequential(&mut net, settings.eps))
            } else {
                timed(|| solve_parallel_in(&pool, &mut net, settings.block_size, settings.eps))
            };
            let iterations = iterations?;

            tracing::info!(threads, net_size, iterations, time = ?elapsed, "Thread sweep");
            out.serialize(ThreadsRow {
                threads,
                net_size,
                iterations,
                time: elapsed.as_secs_f64(),
            })?;
        }
    }

    out.flush()?;
    Ok(())
}

fn test_block_size(args: &Args, settings: &Settings, path: &Path) -> anyhow::Result<()> {
    let mut out = csv::Writer::from_path(path)?;
    let pool = pool(settings.threads)?;

    for &block_size in &args.block_sizes {
        for &net_size in &args.sizes {
            let mut net = cubic_net(net_size)?;
            let (iterations, elapsed) =
                timed(|| solve_parallel_in(&pool, &mut net, block_size, settings.eps));
            iterations?;

            tracing::info!(block_size, net_size, time = ?elapsed, "Block size sweep");
            out.serialize(BlockSizeRow {
                block_size,
                net_size,
                time: elapsed.as_secs_f64(),
            })?;
        }
    }

    out.flush()?;
    Ok(())
}
