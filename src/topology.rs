//! Row-wise domain decomposition and ring-neighbour addressing.
//!
//! Partitions form a closed ring along the `ny` axis: partition `r`'s
//! left neighbour is `(r - 1) mod size`, its right neighbour is
//! `(r + 1) mod size`. Row decomposition mirrors
//! `calc_ncols_from_rank` in the reference implementation, applied to
//! rows instead of columns: every partition but the last owns
//! `ny / size` rows; the last absorbs the remainder.

/// One partition's view of the decomposition: which rows it owns, and who
/// its ring neighbours are.
#[derive(Debug, Clone, Copy)]
pub struct Topology {
    pub rank: usize,
    pub size: usize,
    pub ny: usize,
    pub nx: usize,
}

impl Topology {
    pub fn new(rank: usize, size: usize, ny: usize, nx: usize) -> Self {
        assert!(size > 0, "partition count must be at least 1");
        assert!(rank < size, "rank {rank} out of range for size {size}");
        Topology { rank, size, ny, nx }
    }

    /// Base row count every partition but the last receives.
    #[inline]
    pub fn base_rows(&self) -> usize {
        self.ny / self.size
    }

    /// Number of rows owned by `rank`: `base_rows` everywhere except the
    /// last partition, which also absorbs `ny % size`.
    pub fn local_rows_for(&self, rank: usize) -> usize {
        let base = self.base_rows();
        if rank == self.size - 1 {
            base + (self.ny % self.size)
        } else {
            base
        }
    }

    /// This partition's owned row count.
    #[inline]
    pub fn local_rows(&self) -> usize {
        self.local_rows_for(self.rank)
    }

    /// Global row index of the first row `rank` owns.
    pub fn row_offset_for(&self, rank: usize) -> usize {
        rank * self.base_rows()
    }

    /// Ring neighbour one step toward lower rank (wrapping).
    #[inline]
    pub fn left(&self) -> usize {
        (self.rank + self.size - 1) % self.size
    }

    /// Ring neighbour one step toward higher rank (wrapping).
    #[inline]
    pub fn right(&self) -> usize {
        (self.rank + 1) % self.size
    }

    /// If this partition owns the global row that `accelerate_flow`
    /// targets (`ny - 2`), its partition-local row index; `None`
    /// otherwise.
    pub fn accelerated_local_row(&self) -> Option<usize> {
        let global_row = self.ny.checked_sub(2)?;
        let offset = self.row_offset_for(self.rank);
        let local_rows = self.local_rows();
        if global_row >= offset && global_row < offset + local_rows {
            Some(global_row - offset + 1) // +1: row 0 of the padded array is the ghost
        } else {
            None
        }
    }
}
