//! Message types and channel wiring for the ring halo exchange and the
//! root-centred scatter/gather, built on `crossbeam::channel`.
//!
//! The ring channels (`build_ring`) are `bounded(1)`, not rendezvous
//! (`bounded(0)`): every partition in the ring runs the same
//! send-then-receive order every step, so a zero-capacity channel would
//! have every partition block on its first send waiting for a neighbour
//! that is itself blocked on its own first send — a closed cycle with no
//! partition ever reaching the matching `recv` first. A single buffered
//! slot breaks that cycle: each partition sends at most one row per
//! channel per step, so the send always has room and returns immediately,
//! and the corresponding receive drains it whenever the neighbour gets to
//! it. This is the one-shot substitute for `MPI_Sendrecv`'s atomic
//! send+receive pairing, not a literal reproduction of it. Each logical
//! MPI tag (0 for cell rows, 1 for obstacle rows, 2 for velocity series)
//! becomes its own channel pairing below rather than a single tagged
//! multiplexed one, so the independence the spec describes falls out of
//! using distinct channel objects instead of runtime dispatch.
//!
//! The scatter/gather channels (`build_scatter_gather`) stay
//! rendezvous (`bounded(0)`): those are root-to-worker, not a ring, so
//! there is no cycle to deadlock on — the root sends to a worker that is
//! already parked on the matching receive.

use crossbeam::channel::{self, Receiver, Sender};

use crate::cell::Cell;

/// One row's worth of cells plus the matching obstacle flags — bundles
/// what spec §4.3 calls tags 0 and 1 into a single message, since both
/// halves of a row always travel together and this crate has no need to
/// reorder them independently.
#[derive(Debug, Clone)]
pub struct RowMessage {
    pub cells: Vec<Cell>,
    pub obstacles: Vec<i32>,
}

impl RowMessage {
    pub fn new(cells: Vec<Cell>, obstacles: Vec<i32>) -> Self {
        debug_assert_eq!(cells.len(), obstacles.len());
        RowMessage { cells, obstacles }
    }
}

/// This partition's four halo-exchange endpoints.
pub struct RingLinks {
    pub to_left: Sender<RowMessage>,
    pub from_right: Receiver<RowMessage>,
    pub to_right: Sender<RowMessage>,
    pub from_left: Receiver<RowMessage>,
}

/// This partition's scatter/gather endpoints (root excluded — the root
/// drives scatter/gather directly against its own full grid, see
/// `tasks::run`).
pub struct ScatterGatherLinks {
    pub rows_from_root: Receiver<RowMessage>,
    pub rows_to_root: Sender<RowMessage>,
    pub velocities_to_root: Sender<Vec<f64>>,
}

/// Root-side handles: one scatter sender, one gather receiver, and one
/// velocity-series receiver per non-root partition.
pub struct RootLinks {
    pub rows_to_rank: Vec<Sender<RowMessage>>,
    pub rows_from_rank: Vec<Receiver<RowMessage>>,
    pub velocities_from_rank: Vec<Receiver<Vec<f64>>>,
}

/// Build the ring (halo exchange) channels for `size` partitions.
pub fn build_ring(size: usize) -> Vec<RingLinks> {
    // fwd[r] carries rank r -> rank (r+1) % size; bwd[r] carries rank r -> rank (r-1+size) % size.
    // Capacity 1: each channel gets exactly one send per partition per step, so a single
    // buffered slot lets that send complete without waiting on the matching receive (see
    // module docs for why a rendezvous channel here would deadlock the whole ring).
    let fwd: Vec<(Sender<RowMessage>, Receiver<RowMessage>)> =
        (0..size).map(|_| channel::bounded(1)).collect();
    let bwd: Vec<(Sender<RowMessage>, Receiver<RowMessage>)> =
        (0..size).map(|_| channel::bounded(1)).collect();

    (0..size)
        .map(|r| {
            let left = (r + size - 1) % size;
            let right = (r + 1) % size;
            RingLinks {
                to_left: bwd[r].0.clone(),
                from_right: bwd[right].1.clone(),
                to_right: fwd[r].0.clone(),
                from_left: fwd[left].1.clone(),
            }
        })
        .collect()
}

/// Build the scatter/gather channels for `size` partitions (root is rank
/// 0 and does not receive per-partition links back to itself).
pub fn build_scatter_gather(size: usize) -> (RootLinks, Vec<ScatterGatherLinks>) {
    let scatter: Vec<(Sender<RowMessage>, Receiver<RowMessage>)> =
        (0..size).map(|_| channel::bounded(0)).collect();
    let gather: Vec<(Sender<RowMessage>, Receiver<RowMessage>)> =
        (0..size).map(|_| channel::bounded(0)).collect();
    let vels: Vec<(Sender<Vec<f64>>, Receiver<Vec<f64>>)> =
        (0..size).map(|_| channel::bounded(0)).collect();

    let mut per_rank = Vec::with_capacity(size);
    let mut rows_to_rank = Vec::with_capacity(size);
    let mut rows_from_rank = Vec::with_capacity(size);
    let mut velocities_from_rank = Vec::with_capacity(size);

    for r in 0..size {
        rows_to_rank.push(scatter[r].0.clone());
        rows_from_rank.push(gather[r].1.clone());
        velocities_from_rank.push(vels[r].1.clone());

        per_rank.push(ScatterGatherLinks {
            rows_from_root: scatter[r].1.clone(),
            rows_to_root: gather[r].0.clone(),
            velocities_to_root: vels[r].0.clone(),
        });
    }

    (
        RootLinks {
            rows_to_rank,
            rows_from_rank,
            velocities_from_rank,
        },
        per_rank,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_channels_round_trip() {
        let links = build_ring(3);
        crossbeam::scope(|s| {
            s.spawn(|_| {
                let msg = RowMessage::new(vec![Cell::zero()], vec![0]);
                links[0].to_right.send(msg).unwrap();
            });
            let received = links[1].from_left.recv().unwrap();
            assert_eq!(received.obstacles, vec![0]);
        })
        .unwrap();
    }
}
