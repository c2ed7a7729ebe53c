//! The per-partition timestep driver: halo exchange, the four stencil
//! kernels in order, and the local velocity accumulation (spec §4.4).

use anyhow::{Context, Result};

use crate::exchange::{RingLinks, RowMessage};
use crate::grid::LocalGrid;
use crate::kernels::{accelerate_flow, av_velocity_sum, collide, propagate, rebound};
use crate::params::Params;
use crate::topology::Topology;

/// Exchange the two boundary rows with ring neighbours (spec §4.3):
/// first the bottom owned row out to the left / top ghost in from the
/// right, then the top owned row out to the right / bottom ghost in from
/// the left. Every partition runs this same send-then-receive order, so
/// the channels in `links` must be buffered (see `exchange` module docs)
/// — otherwise every partition's send would wait on a neighbour that is
/// itself waiting to send first, and the ring never drains.
///
/// A single partition is its own left and right neighbour; routing that
/// case through the channel would have one thread trying to rendezvous
/// with itself, so it's handled as a direct local copy instead (still
/// the exact same toroidal-wrap result the channel path would produce).
fn exchange_halos(grid: &mut LocalGrid, topology: &Topology, links: &RingLinks) -> Result<()> {
    if topology.size == 1 {
        for ii in 0..grid.nx {
            let first = grid.cells[[grid.first_owned(), ii]];
            let first_obs = grid.obstacles[[grid.first_owned(), ii]];
            let last = grid.cells[[grid.last_owned(), ii]];
            let last_obs = grid.obstacles[[grid.last_owned(), ii]];
            let (top_ghost, bottom_ghost) = (grid.top_ghost(), grid.bottom_ghost());
            grid.cells[[top_ghost, ii]] = first;
            grid.obstacles[[top_ghost, ii]] = first_obs;
            grid.cells[[bottom_ghost, ii]] = last;
            grid.obstacles[[bottom_ghost, ii]] = last_obs;
        }
        return Ok(());
    }

    let row_out = RowMessage::new(
        row_cells(grid, grid.first_owned()),
        row_obstacles(grid, grid.first_owned()),
    );
    links
        .to_left
        .send(row_out)
        .context("halo exchange: send to left neighbour failed")?;
    let top_in = links
        .from_right
        .recv()
        .context("halo exchange: receive from right neighbour failed")?;
    write_row(grid, grid.top_ghost(), &top_in);

    let row_out = RowMessage::new(
        row_cells(grid, grid.last_owned()),
        row_obstacles(grid, grid.last_owned()),
    );
    links
        .to_right
        .send(row_out)
        .context("halo exchange: send to right neighbour failed")?;
    let bottom_in = links
        .from_left
        .recv()
        .context("halo exchange: receive from left neighbour failed")?;
    write_row(grid, grid.bottom_ghost(), &bottom_in);

    Ok(())
}

fn row_cells(grid: &LocalGrid, row: usize) -> Vec<crate::cell::Cell> {
    (0..grid.nx).map(|ii| grid.cells[[row, ii]]).collect()
}

fn row_obstacles(grid: &LocalGrid, row: usize) -> Vec<i32> {
    (0..grid.nx).map(|ii| grid.obstacles[[row, ii]]).collect()
}

fn write_row(grid: &mut LocalGrid, row: usize, msg: &RowMessage) {
    for ii in 0..grid.nx {
        grid.cells[[row, ii]] = msg.cells[ii];
        grid.obstacles[[row, ii]] = msg.obstacles[ii];
    }
}

/// Drive `params.max_iters` steps on this partition's owned rows,
/// returning the raw (undivided) per-step velocity sums. `main` and
/// `tmp` are allocated once by the caller and reused for the whole run
/// (spec §9: no per-step allocation).
pub fn run_timesteps(
    topology: &Topology,
    params: &Params,
    main: &mut LocalGrid,
    tmp: &mut LocalGrid,
    links: &RingLinks,
    mut on_step: impl FnMut(usize),
) -> Result<Vec<f64>> {
    let accelerated_row = topology.accelerated_local_row();
    let mut series = Vec::with_capacity(params.max_iters);

    for t in 0..params.max_iters {
        exchange_halos(main, topology, links)?;

        if let Some(row) = accelerated_row {
            accelerate_flow(main, params, row);
        }

        propagate(main, tmp);
        rebound(main, tmp);
        collide(main, tmp, params);

        series.push(av_velocity_sum(main));
        on_step(t);
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::exchange::build_ring;

    #[test]
    fn halo_exchange_is_symmetric_for_two_partitions() {
        let links = build_ring(2);
        let nx = 2;

        let mut a = LocalGrid::new(2, nx);
        let mut b = LocalGrid::new(2, nx);
        for ii in 0..nx {
            a.cells[[1, ii]] = Cell([1.0; 9]);
            a.cells[[2, ii]] = Cell([2.0; 9]);
            b.cells[[1, ii]] = Cell([3.0; 9]);
            b.cells[[2, ii]] = Cell([4.0; 9]);
        }

        let topo_a = Topology::new(0, 2, 6, nx);
        let topo_b = Topology::new(1, 2, 6, nx);

        let (a, b) = crossbeam::scope(|s| {
            let links_a = &links[0];
            let links_b = &links[1];
            let ha = s.spawn(move |_| {
                exchange_halos(&mut a, &topo_a, links_a).unwrap();
                a
            });
            let hb = s.spawn(move |_| {
                exchange_halos(&mut b, &topo_b, links_b).unwrap();
                b
            });
            (ha.join().unwrap(), hb.join().unwrap())
        })
        .unwrap();

        // With size 2, each partition's only neighbour in both directions
        // is the other partition: a's top ghost gets b's first owned row,
        // a's bottom ghost gets b's last owned row (and symmetrically).
        assert_eq!(a.cells[[a.top_ghost(), 0]], Cell([3.0; 9]));
        assert_eq!(a.cells[[a.bottom_ghost(), 0]], Cell([4.0; 9]));
        assert_eq!(b.cells[[b.top_ghost(), 0]], Cell([1.0; 9]));
        assert_eq!(b.cells[[b.bottom_ghost(), 0]], Cell([2.0; 9]));
    }

    #[test]
    fn single_partition_wraps_onto_itself() {
        let links = &build_ring(1)[0];
        let topo = Topology::new(0, 1, 6, 2);
        let mut grid = LocalGrid::new(6, 2);
        for ii in 0..2 {
            grid.cells[[1, ii]] = Cell([7.0; 9]);
            grid.cells[[6, ii]] = Cell([8.0; 9]);
        }

        exchange_halos(&mut grid, &topo, links).unwrap();

        assert_eq!(grid.cells[[grid.top_ghost(), 0]], Cell([7.0; 9]));
        assert_eq!(grid.cells[[grid.bottom_ghost(), 0]], Cell([8.0; 9]));
    }
}
