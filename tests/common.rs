//! In-process transport pair for exercising both halves of the exchange.

// Test utilities may not all be used in every test file
#![allow(dead_code)]

use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Instant;

use pingpong_bench::Transport;

/// One end of an in-process two-rank group.
///
/// Messages travel over std mpsc channels, so `recv` blocks exactly like a
/// two-sided transport: the receiving side cannot proceed until its peer's
/// send has happened. Tag and source are checked on every receive.
pub struct ChannelEndpoint {
    rank: i32,
    tx: Sender<(i32, Vec<f64>)>,
    rx: Receiver<(i32, Vec<f64>)>,
    epoch: Instant,
}

/// Create a connected two-rank group.
pub fn channel_pair() -> (ChannelEndpoint, ChannelEndpoint) {
    let (tx0, rx1) = channel();
    let (tx1, rx0) = channel();
    let epoch = Instant::now();
    (
        ChannelEndpoint {
            rank: 0,
            tx: tx0,
            rx: rx0,
            epoch,
        },
        ChannelEndpoint {
            rank: 1,
            tx: tx1,
            rx: rx1,
            epoch,
        },
    )
}

impl Transport for ChannelEndpoint {
    fn size(&self) -> i32 {
        2
    }

    fn rank(&self) -> i32 {
        self.rank
    }

    fn send(&mut self, buf: &[f64], dest: i32, tag: i32) {
        assert_eq!(dest, 1 - self.rank, "sent to a rank outside the pair");
        self.tx.send((tag, buf.to_vec())).expect("peer disconnected");
    }

    fn recv(&mut self, buf: &mut [f64], source: i32, tag: i32) {
        assert_eq!(source, 1 - self.rank, "received from a rank outside the pair");
        let (got_tag, data) = self.rx.recv().expect("peer disconnected");
        assert_eq!(got_tag, tag, "tag mismatch");
        assert_eq!(data.len(), buf.len(), "message length mismatch");
        buf.copy_from_slice(&data);
    }

    fn time(&mut self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}
