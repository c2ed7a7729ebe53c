//! Bounce-back: obstacle cells reflect populations along the opposite
//! direction instead of letting them stream through.

use ndarray::{s, Axis};
use rayon::prelude::*;

use crate::cell::OPPOSITE;
use crate::grid::LocalGrid;

/// For every owned obstacle cell, overwrite `cells` from `tmp` with the
/// opposite-direction population (spec §4.1). Must run after `propagate`
/// and before `collide`, since `collide` skips obstacles and therefore
/// never disturbs what this writes.
///
/// Rows are independent, so each is handed to `rayon` as its own task;
/// `main.obstacles` is a disjoint field from `main.cells`, so it can be
/// read immutably here while `main.cells` is sliced mutably per row.
pub fn rebound(main: &mut LocalGrid, tmp: &LocalGrid) {
    let nx = main.nx;
    let first = main.first_owned();
    let last = main.last_owned();
    let obstacles = &main.obstacles;

    main.cells
        .slice_mut(s![first..=last, ..])
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(offset, mut row)| {
            let jj = first + offset;
            for ii in 0..nx {
                if obstacles[[jj, ii]] == 0 {
                    continue;
                }
                let scratch = tmp.cells[[jj, ii]];
                let cell = &mut row[ii];
                for k in 1..=8 {
                    cell.0[k] = scratch.get(OPPOSITE[k]);
                }
            }
        });
}
