//! Partition-local average-velocity accumulator.

use rayon::prelude::*;

use crate::grid::LocalGrid;

/// Sum `sqrt(10000 * (u_x^2 + u_y^2))` over owned non-obstacle cells,
/// reading post-collide values out of `grid.cells`. The `10000` factor
/// and the missing division by cell count are preserved verbatim from
/// the reference implementation (spec §4.2, §9) — the division by the
/// global flow-cell count happens once, at reduction time.
///
/// Rows are independent, so each row's partial sum is computed by
/// `rayon` in its own task and the per-row totals reduced with `.sum()`.
pub fn av_velocity_sum(grid: &LocalGrid) -> f64 {
    let nx = grid.nx;

    (grid.first_owned()..=grid.last_owned())
        .into_par_iter()
        .map(|jj| {
            let mut row_total = 0.0f64;
            for ii in 0..nx {
                if grid.obstacles[[jj, ii]] != 0 {
                    continue;
                }
                let c = grid.cells[[jj, ii]];
                let rho = c.total_density();
                let u_x = (c.get(1) + c.get(5) + c.get(8) - (c.get(3) + c.get(6) + c.get(7))) / rho;
                let u_y = (c.get(2) + c.get(5) + c.get(6) - (c.get(4) + c.get(7) + c.get(8))) / rho;
                row_total += f64::from((10000.0 * (u_x * u_x + u_y * u_y)).sqrt());
            }
            row_total
        })
        .sum()
}
