//! Streaming: shift each directional population into its neighbour cell.

use ndarray::{s, Axis};
use rayon::prelude::*;

use crate::grid::LocalGrid;

/// Stream `cells` into `tmp`. Operates on owned rows only; the row above
/// and below an owned row (ghosts, or other owned rows) are read directly
/// out of the padded array, so halo exchange must have already refreshed
/// the ghost rows before this runs. The column axis wraps locally via
/// modular arithmetic (spec §4.1).
///
/// Rows are independent (each reads only `src`, writes only its own row
/// of `dst`), so they're handed out to `rayon` one row per task, the way
/// the teacher parallelizes bulk per-element work over its state arrays.
pub fn propagate(src: &LocalGrid, dst: &mut LocalGrid) {
    let nx = src.nx;
    let first = src.first_owned();
    let last = src.last_owned();

    dst.cells
        .slice_mut(s![first..=last, ..])
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(offset, mut row)| {
            let jj = first + offset;
            let y_n = jj + 1;
            let y_s = jj - 1;
            for ii in 0..nx {
                let x_e = (ii + 1) % nx;
                let x_w = (ii + nx - 1) % nx;

                let mut out = row[ii];
                out.0[0] = src.cells[[jj, ii]].get(0);
                out.0[1] = src.cells[[jj, x_w]].get(1);
                out.0[2] = src.cells[[y_s, ii]].get(2);
                out.0[3] = src.cells[[jj, x_e]].get(3);
                out.0[4] = src.cells[[y_n, ii]].get(4);
                out.0[5] = src.cells[[y_s, x_w]].get(5);
                out.0[6] = src.cells[[y_s, x_e]].get(6);
                out.0[7] = src.cells[[y_n, x_e]].get(7);
                out.0[8] = src.cells[[y_n, x_w]].get(8);
                row[ii] = out;
            }
        });
}
