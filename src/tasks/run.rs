//! Orchestration glue: spawns the partition cohort, scatters the initial
//! grid, drives every partition's timestep loop, gathers the final grid
//! and velocity series back at the root, and reduces the series
//! (spec §2 item 6, §4.4, §4.5).

use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::exchange::{build_ring, build_scatter_gather, RingLinks, RootLinks, RowMessage, ScatterGatherLinks};
use crate::grid::{count_flow_cells, Grid, LocalGrid, ObstacleGrid};
use crate::params::Params;
use crate::solvers::{reduce_velocity_series, run_timesteps};
use crate::topology::Topology;

/// Run the whole simulation across `partitions` cooperating partitions
/// and return the assembled final grid plus the reduced, divided
/// velocity series (one entry per timestep).
pub fn run(params: &Params, obstacles: &ObstacleGrid, partitions: usize) -> Result<(Grid, Vec<f64>)> {
    let full_grid = crate::grid::initial_grid(params);
    let n_flow = count_flow_cells(obstacles);

    let ring = build_ring(partitions);
    let (root_links, sg_links) = build_scatter_gather(partitions);

    let progress = ProgressBar::new(params.max_iters as u64);
    progress.set_style(
        ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    progress.set_message(format!("{partitions} partition(s)"));

    let (final_grid, per_partition_series) = crossbeam::scope(|scope| -> Result<(Grid, Vec<Vec<f64>>)> {
        let mut handles = Vec::with_capacity(partitions.saturating_sub(1));
        for rank in 1..partitions {
            let topology = Topology::new(rank, partitions, params.ny, params.nx);
            let ring_links = &ring[rank];
            let sg = &sg_links[rank];
            handles.push(scope.spawn(move |_| run_worker(rank, &topology, params, ring_links, sg)));
        }

        let root_topology = Topology::new(0, partitions, params.ny, params.nx);
        let root_result = run_root(
            &root_topology,
            params,
            &full_grid,
            obstacles,
            &ring[0],
            &root_links,
            &progress,
        );

        for handle in handles {
            handle
                .join()
                .map_err(|_| anyhow!("a partition worker thread panicked"))??;
        }

        root_result
    })
    .map_err(|_| anyhow!("partition cohort panicked"))??;

    progress.finish_with_message("done");

    let reduced = reduce_velocity_series(&per_partition_series, params.max_iters, n_flow);
    Ok((final_grid, reduced))
}

/// Root-side logic: own a slice of the grid directly (no channel round
/// trip with itself), scatter the rest, run its own timesteps, gather
/// everything (rows and velocity series, tags 0/1 and 2) back, and
/// return the reassembled full grid plus every partition's (undivided)
/// velocity series, root's own first.
fn run_root(
    topology: &Topology,
    params: &Params,
    full_grid: &Grid,
    full_obstacles: &ObstacleGrid,
    ring_links: &RingLinks,
    root_links: &RootLinks,
    progress: &ProgressBar,
) -> Result<(Grid, Vec<Vec<f64>>)> {
    let size = topology.size;
    let local_rows = topology.local_rows();
    let mut main = LocalGrid::new(local_rows, params.nx);
    let mut tmp = LocalGrid::new(local_rows, params.nx);

    for row in 0..local_rows {
        let local_row = row + 1;
        for ii in 0..params.nx {
            main.cells[[local_row, ii]] = full_grid[[row, ii]];
            main.obstacles[[local_row, ii]] = full_obstacles[[row, ii]];
        }
    }

    for rank in 1..size {
        let offset = topology.row_offset_for(rank);
        let rows = topology.local_rows_for(rank);
        for row in offset..offset + rows {
            let cells = (0..params.nx).map(|ii| full_grid[[row, ii]]).collect();
            let obs = (0..params.nx).map(|ii| full_obstacles[[row, ii]]).collect();
            root_links.rows_to_rank[rank]
                .send(RowMessage::new(cells, obs))
                .with_context(|| format!("scatter: send row {row} to partition {rank}"))?;
        }
    }

    let root_series = run_timesteps(topology, params, &mut main, &mut tmp, ring_links, |t| {
        progress.set_position(t as u64 + 1);
    })
    .context("root partition timestep loop failed")?;

    let mut assembled = Grid::from_elem((params.ny, params.nx), crate::cell::Cell::zero());
    for row in 0..local_rows {
        let local_row = row + 1;
        for ii in 0..params.nx {
            assembled[[row, ii]] = main.cells[[local_row, ii]];
        }
    }

    for rank in 1..size {
        let offset = topology.row_offset_for(rank);
        let rows = topology.local_rows_for(rank);
        for row in offset..offset + rows {
            let msg = root_links.rows_from_rank[rank]
                .recv()
                .with_context(|| format!("gather: receive row {row} from partition {rank}"))?;
            for ii in 0..params.nx {
                assembled[[row, ii]] = msg.cells[ii];
            }
        }
    }

    let mut all_series = Vec::with_capacity(size);
    all_series.push(root_series);
    for rank in 1..size {
        let series = root_links.velocities_from_rank[rank]
            .recv()
            .with_context(|| format!("gather: receive velocity series from partition {rank}"))?;
        all_series.push(series);
    }

    Ok((assembled, all_series))
}

/// Non-root logic: receive owned rows from the root, run the same
/// timestep loop, then send owned rows (tags 0/1) and the velocity
/// series (tag 2) back.
fn run_worker(
    rank: usize,
    topology: &Topology,
    params: &Params,
    ring_links: &RingLinks,
    sg: &ScatterGatherLinks,
) -> Result<()> {
    let local_rows = topology.local_rows();
    let mut main = LocalGrid::new(local_rows, params.nx);
    let mut tmp = LocalGrid::new(local_rows, params.nx);

    for row in 0..local_rows {
        let msg = sg
            .rows_from_root
            .recv()
            .with_context(|| format!("partition {rank}: scatter receive row {row} failed"))?;
        let local_row = row + 1;
        for ii in 0..params.nx {
            main.cells[[local_row, ii]] = msg.cells[ii];
            main.obstacles[[local_row, ii]] = msg.obstacles[ii];
        }
    }

    let series = run_timesteps(topology, params, &mut main, &mut tmp, ring_links, |_| {})
        .with_context(|| format!("partition {rank}: timestep loop failed"))?;

    for row in 0..local_rows {
        let local_row = row + 1;
        let cells = (0..params.nx).map(|ii| main.cells[[local_row, ii]]).collect();
        let obs = (0..params.nx).map(|ii| main.obstacles[[local_row, ii]]).collect();
        sg.rows_to_root
            .send(RowMessage::new(cells, obs))
            .with_context(|| format!("partition {rank}: gather send row {row} failed"))?;
    }

    sg.velocities_to_root
        .send(series)
        .with_context(|| format!("partition {rank}: velocity series send failed"))?;

    Ok(())
}
