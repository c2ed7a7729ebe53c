//! BGK collision: relax each non-obstacle population toward its local
//! equilibrium distribution.

use ndarray::{s, Axis};
use rayon::prelude::*;

use crate::cell::{C_SQ, W0, W1, W2};
use crate::grid::LocalGrid;
use crate::params::Params;

/// Per-direction lattice velocity components, indexed as the cell speeds
/// are: `{E, N, W, S, NE, NW, SW, SE}`.
#[inline]
fn directional_velocities(u_x: f32, u_y: f32) -> [f32; 9] {
    [
        0.0,
        u_x,
        u_y,
        -u_x,
        -u_y,
        u_x + u_y,
        -u_x + u_y,
        -u_x - u_y,
        u_x - u_y,
    ]
}

#[inline]
fn weight(k: usize) -> f32 {
    match k {
        0 => W0,
        1..=4 => W1,
        _ => W2,
    }
}

/// Relax every owned non-obstacle cell from `tmp` (post-streaming values)
/// into `main`, in place. All arithmetic is single precision and summed
/// left-to-right exactly as spec §4.1 specifies, so results are bit-stable
/// across runs and partition counts.
///
/// Rows are independent, so each is handed to `rayon` as its own task,
/// the way the teacher's hot-path state updates run over `par_iter_mut`.
pub fn collide(main: &mut LocalGrid, tmp: &LocalGrid, params: &Params) {
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
                if obstacles[[jj, ii]] != 0 {
                    continue;
                }

                let t = tmp.cells[[jj, ii]];
                let rho = t.total_density();

                let u_x = (t.get(1) + t.get(5) + t.get(8) - (t.get(3) + t.get(6) + t.get(7))) / rho;
                let u_y = (t.get(2) + t.get(5) + t.get(6) - (t.get(4) + t.get(7) + t.get(8))) / rho;
                let u_sq = u_x * u_x + u_y * u_y;
                let u = directional_velocities(u_x, u_y);

                let mut next = [0.0f32; 9];
                for k in 0..9 {
                    let w = weight(k);
                    let uk = u[k];
                    let d_eq = if k == 0 {
                        w * rho * (1.0 - u_sq / (2.0 * C_SQ))
                    } else {
                        w * rho
                            * (1.0 + uk / C_SQ + (uk * uk) / (2.0 * C_SQ * C_SQ)
                                - u_sq / (2.0 * C_SQ))
                    };
                    next[k] = t.get(k) + params.omega * (d_eq - t.get(k));
                }

                row[ii].0 = next;
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_params(omega: f32) -> Params {
        Params {
            nx: 1,
            ny: 3,
            max_iters: 1,
            reynolds_dim: 2,
            density: 0.1,
            accel: 0.0,
            omega,
        }
    }

    #[test]
    fn equilibrium_at_rest_is_a_fixed_point() {
        let params = test_params(1.0);
        let mut main = LocalGrid::new(1, 1);
        let mut tmp = LocalGrid::new(1, 1);
        let eq = crate::cell::Cell::equilibrium_at_rest(params.density);
        main.cells[[1, 0]] = eq;
        tmp.cells[[1, 0]] = eq;

        collide(&mut main, &tmp, &params);

        for k in 0..9 {
            assert!((main.cells[[1, 0]].get(k) - eq.get(k)).abs() < 1e-6);
        }
    }

    #[test]
    fn skips_obstacles() {
        let params = test_params(1.0);
        let mut main = LocalGrid::new(1, 1);
        main.obstacles[[1, 0]] = 1;
        let before = crate::cell::Cell::equilibrium_at_rest(params.density);
        main.cells[[1, 0]] = before;
        let mut tmp = LocalGrid::new(1, 1);
        tmp.cells[[1, 0]] = crate::cell::Cell([1.0; 9]);

        collide(&mut main, &tmp, &params);

        assert_eq!(main.cells[[1, 0]], before);
    }
}
