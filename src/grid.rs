//! The full grid (root-owned) and the partition-local padded grid.
//!
//! Both are stored `[row, col]` (`jj` outer, `ii` inner) in an
//! `ndarray::Array2`, which fixes the indexing-scheme ambiguity noted in
//! spec §9 to a single consistent form.

use ndarray::Array2;

use crate::cell::Cell;
use crate::params::Params;

/// The complete `ny x nx` grid, held only at the root partition between
/// scatter and gather.
pub type Grid = Array2<Cell>;
/// The complete `ny x nx` obstacle mask, nonzero = blocked.
pub type ObstacleGrid = Array2<i32>;

/// Build the initial full grid: every non-obstacle cell starts at the
/// rest-density equilibrium, `rho = rho0`, velocity zero.
pub fn initial_grid(params: &Params) -> Grid {
    Array2::from_elem((params.ny, params.nx), Cell::equilibrium_at_rest(params.density))
}

/// Count of non-blocked ("flow") cells across the whole grid, used as the
/// divisor in the final average-velocity reduction (spec §4.4).
pub fn count_flow_cells(obstacles: &ObstacleGrid) -> usize {
    obstacles.iter().filter(|&&o| o == 0).count()
}

/// A partition's local working grid: `local_rows + 2` rows (ghosts at row
/// 0 and row `local_rows + 1`), `nx` columns. Rows `1..=local_rows` are
/// owned; everything else is a copy of a neighbour's boundary row,
/// refreshed by halo exchange every step.
#[derive(Clone)]
pub struct LocalGrid {
    pub cells: Array2<Cell>,
    pub obstacles: Array2<i32>,
    pub local_rows: usize,
    pub nx: usize,
}

impl LocalGrid {
    pub fn new(local_rows: usize, nx: usize) -> Self {
        LocalGrid {
            cells: Array2::from_elem((local_rows + 2, nx), Cell::zero()),
            obstacles: Array2::from_elem((local_rows + 2, nx), 0),
            local_rows,
            nx,
        }
    }

    /// Index of the first owned row.
    #[inline]
    pub fn first_owned(&self) -> usize {
        1
    }

    /// Index of the last owned row.
    #[inline]
    pub fn last_owned(&self) -> usize {
        self.local_rows
    }

    /// Index of the bottom ghost row (receives from the left neighbour).
    #[inline]
    pub fn bottom_ghost(&self) -> usize {
        0
    }

    /// Index of the top ghost row (receives from the right neighbour).
    #[inline]
    pub fn top_ghost(&self) -> usize {
        self.local_rows + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_flow_cells_excludes_blocked() {
        let mut obs = Array2::from_elem((2, 2), 0);
        obs[[0, 0]] = 1;
        assert_eq!(count_flow_cells(&obs), 3);
    }

    #[test]
    fn local_grid_row_indices() {
        let g = LocalGrid::new(4, 8);
        assert_eq!(g.bottom_ghost(), 0);
        assert_eq!(g.first_owned(), 1);
        assert_eq!(g.last_owned(), 4);
        assert_eq!(g.top_ghost(), 5);
    }
}
