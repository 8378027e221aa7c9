//! Two-rank MPI ping-pong benchmark binary.
//!
//! Run under an MPI launcher with exactly two ranks:
//!
//! ```bash
//! mpirun -n 2 pingpong_bench
//! ```
//!
//! Rank 0 prints one report line per message size; rank 1 prints nothing.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use mpi::topology::Communicator;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pingpong_bench::{run_sweep, BenchError, MpiWorld, SweepConfig};

#[derive(Parser, Debug)]
#[command(name = "pingpong_bench")]
#[command(about = "Two-rank MPI ping-pong latency/bandwidth benchmark")]
struct Args {
    /// Untimed warm-up round trips per message size
    #[arg(short, long, default_value = "5")]
    warmup: usize,

    /// Timed round trips per message size
    #[arg(short, long, default_value = "50")]
    iterations: usize,

    /// Number of size steps; sizes sweep 2^0 .. 2^(steps-1) doubles
    #[arg(short, long, default_value = "27")]
    steps: u32,
}

fn main() -> ExitCode {
    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = SweepConfig {
        max_shift: args.steps,
        warm_up_reps: args.warmup,
        timed_reps: args.iterations,
    };

    // The universe handle brackets the run: MPI is finalized when it drops,
    // on the failure path as well.
    let universe = mpi::initialize().expect("Failed to initialize MPI");
    let world = universe.world();
    let rank = world.rank();
    info!(size = world.size(), rank, "mpi initialized");

    let mut transport = MpiWorld::new(&world);
    let mut out = io::stdout().lock();

    match run_sweep(&mut transport, &config, &mut out) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err @ BenchError::WorldSize { .. }) => {
            if rank == 0 {
                eprintln!("{}", err);
                eprintln!("Aborting.");
            }
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("rank {}: {}", rank, err);
            ExitCode::FAILURE
        }
    }
}
