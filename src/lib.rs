//! Two-rank ping-pong benchmark over blocking point-to-point messaging.
//!
//! This crate provides:
//! - `transport`: the blocking send/receive abstraction and its MPI backend
//! - `pingpong`: the measurement loop (size sweep, warm-up/timed phases,
//!   bandwidth derivation)

pub mod pingpong;
pub mod transport;

pub use pingpong::{
    run_sweep, Measurement, Role, SweepConfig, MAX_SHIFT, PING_TAG, PONG_TAG, TIMED_REPS,
    WARM_UP_REPS,
};
pub use transport::{MpiWorld, Transport};

/// Error returned when a benchmark run cannot proceed.
#[derive(Debug)]
pub enum BenchError {
    /// The process group does not hold exactly the required number of ranks.
    WorldSize {
        /// Ranks the benchmark needs.
        required: i32,
        /// Ranks the group actually has.
        actual: i32,
    },
    /// A report line could not be written.
    Report(std::io::Error),
}

impl std::fmt::Display for BenchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BenchError::WorldSize { required, actual } => write!(
                f,
                "this benchmark requires exactly {} ranks, you used {}",
                required, actual
            ),
            BenchError::Report(err) => write!(f, "failed to write report line: {}", err),
        }
    }
}

impl std::error::Error for BenchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BenchError::WorldSize { .. } => None,
            BenchError::Report(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for BenchError {
    fn from(err: std::io::Error) -> Self {
        BenchError::Report(err)
    }
}
