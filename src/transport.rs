//! Blocking point-to-point transport abstraction.
//!
//! The benchmark drives a [`Transport`] instead of MPI directly so that the
//! exchange choreography can be exercised in-process by the tests. The only
//! production implementation is [`MpiWorld`].

use mpi::point_to_point::{Destination, Source};
use mpi::topology::{Communicator, SimpleCommunicator};

/// Blocking two-sided communication between the members of a process group.
///
/// Messages are `f64` slices. Both participants are assumed to share the
/// fixed 8-byte floating-point representation; no width negotiation is
/// performed.
///
/// A send or receive that cannot complete is fatal to the whole run. The
/// transport signals this itself (for MPI, the default error handler aborts
/// the job); callers do not retry.
pub trait Transport {
    /// Number of participants in the group.
    fn size(&self) -> i32;

    /// 0-based identity of the calling participant.
    fn rank(&self) -> i32;

    /// Blocking tagged send of `buf` to `dest`. Returns once the transport
    /// has accepted the message for delivery.
    fn send(&mut self, buf: &[f64], dest: i32, tag: i32);

    /// Blocking tagged receive from `source`, filling `buf` in place. The
    /// incoming message must match `buf` in length.
    fn recv(&mut self, buf: &mut [f64], source: i32, tag: i32);

    /// Monotonic wall-clock reading in seconds, sub-millisecond resolution.
    fn time(&mut self) -> f64;
}

/// [`Transport`] backed by an MPI communicator.
pub struct MpiWorld<'a> {
    world: &'a SimpleCommunicator,
}

impl<'a> MpiWorld<'a> {
    /// Wrap the world communicator for the duration of a run.
    pub fn new(world: &'a SimpleCommunicator) -> Self {
        Self { world }
    }
}

impl Transport for MpiWorld<'_> {
    fn size(&self) -> i32 {
        self.world.size()
    }

    fn rank(&self) -> i32 {
        self.world.rank()
    }

    fn send(&mut self, buf: &[f64], dest: i32, tag: i32) {
        self.world.process_at_rank(dest).send_with_tag(buf, tag);
    }

    fn recv(&mut self, buf: &mut [f64], source: i32, tag: i32) {
        self.world
            .process_at_rank(source)
            .receive_into_with_tag(buf, tag);
    }

    fn time(&mut self) -> f64 {
        mpi::time()
    }
}
