//! The accelerate step: a body force applied to a single row of the grid.

use rayon::prelude::*;

use crate::grid::LocalGrid;
use crate::params::Params;

/// Push flow along the +x axis on `local_row` (the partition-local row
/// index that corresponds to the global row `ny - 2`), skipping cells
/// that are obstacles or where subtracting the increment would drive a
/// population negative (spec §4.1, §8 boundary behaviour).
///
/// Callers must only invoke this on the partition that owns the
/// accelerated global row; partitions that don't own it simply never
/// call this function for that step.
///
/// Columns of this single row are independent, so they're handed to
/// `rayon` the same way the teacher parallelizes bulk per-element work.
pub fn accelerate_flow(grid: &mut LocalGrid, params: &Params, local_row: usize) {
    let w1 = params.density * params.accel / 9.0;
    let w2 = params.density * params.accel / 36.0;
    let obstacles = grid.obstacles.row(local_row);

    grid.cells
        .row_mut(local_row)
        .into_par_iter()
        .enumerate()
        .for_each(|(ii, cell)| {
            if obstacles[ii] != 0 {
                return;
            }
            if !(cell.get(3) - w1 > 0.0 && cell.get(6) - w2 > 0.0 && cell.get(7) - w2 > 0.0) {
                return;
            }
            cell.0[1] += w1;
            cell.0[5] += w2;
            cell.0[8] += w2;
            cell.0[3] -= w1;
            cell.0[6] -= w2;
            cell.0[7] -= w2;
        });
}
