use std::time::Instant;

use clap::Parser;
use poisson_rust::fields::{cubic, cubic_laplacian, only_borders};
use poisson_rust::{solve_parallel_barrier, solve_parallel_in, solve_sequential, Net, Settings};

/// Solves one cubic test net with every solver and compares the results.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Net size, border included
    #[arg(long, default_value_t = 100)]
    size: usize,
    #[arg(long, default_value_t = 1e-4)]
    eps: f64,
    #[arg(long, default_value_t = 16)]
    block_size: usize,
    #[arg(long)]
    threads: Option<usize>,
    /// Print the converged sequential net
    #[arg(long)]
    show: bool,
}

type Solver = fn(&mut Net, &Settings) -> anyhow::Result<usize>;

fn run_sequential(net: &mut Net, settings: &Settings) -> anyhow::Result<usize> {
    Ok(solve_sequential(net, settings.eps)?)
}

fn run_rayon(net: &mut Net, settings: &Settings) -> anyhow::Result<usize> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.threads)
        .build()?;
    Ok(solve_parallel_in(&pool, net, settings.block_size, settings.eps)?)
}

fn run_barrier(net: &mut Net, settings: &Settings) -> anyhow::Result<usize> {
    Ok(solve_parallel_barrier(
        net,
        settings.threads,
        settings.block_size,
        settings.eps,
    )?)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    poisson_rust::telemetry::init("warn")?;

    let settings = Settings {
        eps: args.eps,
        block_size: args.block_size,
        threads: args.threads.unwrap_or(Settings::default().threads),
    };
    settings.validate()?;

    println!("=== Solver comparison ===");
    println!(
        "size: {}, eps: {}, block size: {}, threads: {}",
        args.size, settings.eps, settings.block_size, settings.threads
    );
    println!();

    let solvers: [(&str, Solver); 3] = [
        ("sequential", run_sequential),
        ("rayon wavefront", run_rayon),
        ("barrier wavefront", run_barrier),
    ];

    let mut results = Vec::with_capacity(solvers.len());
    for (name, solve) in solvers {
        let mut net = Net::new(args.size, only_borders(cubic), cubic_laplacian)?;
        let start = Instant::now();
        let iterations = solve(&mut net, &settings)?;
        let elapsed = start.elapsed();

        println!("{name}:");
        println!("  iterations: {iterations}");
        println!("  time:       {elapsed:?}");
        println!("  mean error: {:.6e}", net.mean_error(cubic));
        println!();
        results.push((name, net));
    }

    let (reference_name, reference) = &results[0];
    for (name, net) in &results[1..] {
        if let Some(diff) = reference.max_difference(net) {
            println!("max |{reference_name} - {name}| = {diff:.3e}");
        }
    }

    if args.show {
        println!();
        print!("{reference}");
    }
    Ok(())
}
