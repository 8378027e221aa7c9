//! The ping-pong measurement loop: size sweep, warm-up/timed phases, and
//! bandwidth derivation.

use std::io::Write;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::transport::Transport;
use crate::BenchError;

/// Tag on the initiator-to-responder leg of a round trip.
pub const PING_TAG: i32 = 10;
/// Tag on the responder-to-initiator leg.
pub const PONG_TAG: i32 = 20;

/// Untimed round trips run before the clock starts, per message size.
pub const WARM_UP_REPS: usize = 5;
/// Timed round trips per message size.
pub const TIMED_REPS: usize = 50;
/// One past the largest power-of-two exponent in the size sweep.
pub const MAX_SHIFT: u32 = 27;

const BYTES_PER_GIB: f64 = (1u64 << 30) as f64;

/// Sweep parameters.
///
/// `Default` is the canonical run: 27 sizes from one double (8 B) up to
/// 2^26 doubles (512 MiB), with 5 warm-up and 50 timed round trips each.
#[derive(Debug, Clone, Copy)]
pub struct SweepConfig {
    /// Sizes sweep `2^0 .. 2^(max_shift - 1)` doubles.
    pub max_shift: u32,
    /// Untimed round trips per size.
    pub warm_up_reps: usize,
    /// Timed round trips per size.
    pub timed_reps: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            max_shift: MAX_SHIFT,
            warm_up_reps: WARM_UP_REPS,
            timed_reps: TIMED_REPS,
        }
    }
}

/// Which half of the exchange choreography this participant performs.
///
/// Resolved once from the rank, then dispatched on for every round trip.
/// The asymmetric ordering (send-then-receive vs receive-then-send) is what
/// makes each repetition a synchronous round trip: the two sides can never
/// both be blocked in a receive at the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Rank 0: sends the ping, waits for the pong, owns the clock and the
    /// report.
    Initiator,
    /// Rank 1: waits for the ping, returns the pong.
    Responder,
}

impl Role {
    /// Map a rank in a two-member group to its role.
    pub fn from_rank(rank: i32) -> Self {
        if rank == 0 {
            Role::Initiator
        } else {
            Role::Responder
        }
    }

    /// The rank of the other participant.
    pub fn peer(self) -> i32 {
        match self {
            Role::Initiator => 1,
            Role::Responder => 0,
        }
    }

    /// Perform this participant's half of one round trip. The same buffer
    /// carries both legs; the transport overwrites it on receive.
    pub fn exchange<T: Transport>(self, transport: &mut T, payload: &mut [f64]) {
        let peer = self.peer();
        match self {
            Role::Initiator => {
                transport.send(payload, peer, PING_TAG);
                transport.recv(payload, peer, PONG_TAG);
            }
            Role::Responder => {
                transport.recv(payload, peer, PING_TAG);
                transport.send(payload, peer, PONG_TAG);
            }
        }
    }
}

/// Timing result for one message size.
#[derive(Debug, Clone, Copy)]
pub struct Measurement {
    /// Payload size in bytes.
    pub bytes: usize,
    /// Average one-way transfer time in seconds.
    pub avg_transfer_secs: f64,
    /// Payload bytes over average one-way transfer time, in GiB/s.
    pub bandwidth_gib_s: f64,
}

impl Measurement {
    /// Derive per-transfer metrics from the elapsed time of `timed_reps`
    /// round trips. Each round trip is two one-way transfers, assumed
    /// symmetric in cost.
    fn from_elapsed(bytes: usize, elapsed_secs: f64, timed_reps: usize) -> Self {
        let avg_transfer_secs = elapsed_secs / (2 * timed_reps) as f64;
        let bandwidth_gib_s = (bytes as f64 / BYTES_PER_GIB) / avg_transfer_secs;
        Self {
            bytes,
            avg_transfer_secs,
            bandwidth_gib_s,
        }
    }
}

fn fill_payload(len: usize, rng: &mut SmallRng) -> Vec<f64> {
    let mut payload = Vec::with_capacity(len);
    for _ in 0..len {
        payload.push(rng.random::<f64>());
    }
    payload
}

fn write_report_line<W: Write>(out: &mut W, m: &Measurement) -> Result<(), BenchError> {
    writeln!(
        out,
        "Transfer size (B): {:>10}, Transfer time (s): {:>15.9}, Bandwidth (GiB/s): {:>15.9}",
        m.bytes, m.avg_transfer_secs, m.bandwidth_gib_s
    )?;
    Ok(())
}

/// Run the full size sweep against `transport`.
///
/// Requires a group of exactly two ranks; fails fast otherwise, before any
/// exchange or report output. For every size step the payload is allocated
/// and filled once, bounced through the warm-up round trips, then through
/// the timed round trips, and dropped. Only the initiator writes report
/// lines to `out`; the responder writes nothing. Both ranks return the
/// measurement for every size step.
pub fn run_sweep<T, W>(
    transport: &mut T,
    config: &SweepConfig,
    out: &mut W,
) -> Result<Vec<Measurement>, BenchError>
where
    T: Transport,
    W: Write,
{
    let size = transport.size();
    if size != 2 {
        return Err(BenchError::WorldSize {
            required: 2,
            actual: size,
        });
    }

    let role = Role::from_rank(transport.rank());
    let mut rng = SmallRng::seed_from_u64(0);
    let mut results = Vec::with_capacity(config.max_shift as usize);

    for shift in 0..config.max_shift {
        let len = 1usize << shift;
        let bytes = len * std::mem::size_of::<f64>();
        debug!(shift, bytes, "starting size step");

        let mut payload = fill_payload(len, &mut rng);

        for _ in 0..config.warm_up_reps {
            role.exchange(transport, &mut payload);
        }

        let start = transport.time();
        for _ in 0..config.timed_reps {
            role.exchange(transport, &mut payload);
        }
        let elapsed = transport.time() - start;

        let measurement = Measurement::from_elapsed(bytes, elapsed, config.timed_reps);
        if role == Role::Initiator {
            write_report_line(out, &measurement)?;
        }
        results.push(measurement);
    }

    Ok(results)
}
