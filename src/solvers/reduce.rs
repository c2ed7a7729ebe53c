//! Global reduction of the per-partition velocity series (spec §4.4).

/// Sum `series` pointwise across all partitions (root's own series plus
/// every other partition's gathered series) and divide by `100 *
/// n_flow`. `n_flow` is the count of non-blocked cells across the whole
/// grid; the `100` here and the `10000` inside each partition's inner
/// square root (spec §4.2) combine to the textbook average-velocity
/// normalization times an extra, deliberately preserved, factor of 100
/// (spec §9).
pub fn reduce_velocity_series(per_partition: &[Vec<f64>], max_iters: usize, n_flow: usize) -> Vec<f64> {
    let mut total = vec![0.0f64; max_iters];
    for series in per_partition {
        for (t, &v) in series.iter().enumerate() {
            total[t] += v;
        }
    }
    let divisor = 100.0 * n_flow as f64;
    if divisor > 0.0 {
        for v in total.iter_mut() {
            *v /= divisor;
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_then_divides() {
        let series = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let reduced = reduce_velocity_series(&series, 2, 2);
        assert_eq!(reduced, vec![4.0 / 200.0, 6.0 / 200.0]);
    }

    #[test]
    fn all_blocked_grid_yields_zero_series() {
        let series = vec![vec![0.0, 0.0]];
        let reduced = reduce_velocity_series(&series, 2, 0);
        assert_eq!(reduced, vec![0.0, 0.0]);
    }
}
