//! Parameter-file and obstacle-file loading (spec §6) — the "external
//! collaborator" that turns two plain-text files into the typed config
//! the rest of the crate works with.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};

use crate::grid::ObstacleGrid;
use crate::params::Params;

/// Load `nx, ny, max_iters, reynolds_dim, density, accel, omega`, one
/// whitespace-separated value per line, in that order (spec §6).
pub fn load_params(path: &Path) -> Result<Params> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("load_params: could not read {}", path.display()))?;

    let mut values = contents.split_whitespace();
    let mut next = |name: &str| -> Result<&str> {
        values
            .next()
            .ok_or_else(|| anyhow!("load_params: {}: missing value for {name}", path.display()))
    };

    let nx: usize = next("nx")?
        .parse()
        .with_context(|| format!("load_params: {}: nx is not an integer", path.display()))?;
    let ny: usize = next("ny")?
        .parse()
        .with_context(|| format!("load_params: {}: ny is not an integer", path.display()))?;
    let max_iters: usize = next("max_iters")?
        .parse()
        .with_context(|| format!("load_params: {}: max_iters is not an integer", path.display()))?;
    let reynolds_dim: i32 = next("reynolds_dim")?
        .parse()
        .with_context(|| format!("load_params: {}: reynolds_dim is not an integer", path.display()))?;
    let density: f32 = next("density")?
        .parse()
        .with_context(|| format!("load_params: {}: density is not a float", path.display()))?;
    let accel: f32 = next("accel")?
        .parse()
        .with_context(|| format!("load_params: {}: accel is not a float", path.display()))?;
    let omega: f32 = next("omega")?
        .parse()
        .with_context(|| format!("load_params: {}: omega is not a float", path.display()))?;

    if nx == 0 || ny == 0 {
        bail!("load_params: {}: nx and ny must both be positive", path.display());
    }
    if !(0.0..2.0).contains(&omega) {
        bail!("load_params: {}: omega must lie in (0, 2), got {omega}", path.display());
    }

    Ok(Params {
        nx,
        ny,
        max_iters,
        reynolds_dim,
        density,
        accel,
        omega,
    })
}

/// Load the obstacle file: any number of `x y 1` lines, each marking cell
/// `(x, y)` blocked. Cells not mentioned default to unblocked (spec §6).
pub fn load_obstacles(path: &Path, nx: usize, ny: usize) -> Result<ObstacleGrid> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("load_obstacles: could not read {}", path.display()))?;

    let mut grid = ObstacleGrid::from_elem((ny, nx), 0);

    for (line_no, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let bad_line = || anyhow!("load_obstacles: {}:{}: malformed line {line:?}", path.display(), line_no + 1);

        let x: usize = parts.next().ok_or_else(bad_line)?.parse().map_err(|_| bad_line())?;
        let y: usize = parts.next().ok_or_else(bad_line)?.parse().map_err(|_| bad_line())?;
        let blocked: i32 = parts.next().ok_or_else(bad_line)?.parse().map_err(|_| bad_line())?;

        if blocked != 1 {
            bail!(
                "load_obstacles: {}:{}: blocked flag must be 1, got {blocked}",
                path.display(),
                line_no + 1
            );
        }
        if x >= nx || y >= ny {
            bail!(
                "load_obstacles: {}:{}: coordinate ({x}, {y}) out of range for a {nx}x{ny} grid",
                path.display(),
                line_no + 1
            );
        }

        grid[[y, x]] = 1;
    }

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(contents: &str) -> tempfile_path::TempPath {
        tempfile_path::TempPath::with_contents(contents)
    }

    mod tempfile_path {
        use std::fs::File;
        use std::io::Write;
        use std::path::{Path, PathBuf};

        pub struct TempPath(PathBuf);

        impl TempPath {
            pub fn with_contents(contents: &str) -> Self {
                let mut path = std::env::temp_dir();
                path.push(format!(
                    "lbm-d2q9-test-{}-{:?}",
                    std::process::id(),
                    std::thread::current().id()
                ));
                let mut file = File::create(&path).unwrap();
                file.write_all(contents.as_bytes()).unwrap();
                TempPath(path)
            }

            pub fn path(&self) -> &Path {
                &self.0
            }
        }

        impl Drop for TempPath {
            fn drop(&mut self) {
                let _ = std::fs::remove_file(&self.0);
            }
        }
    }

    #[test]
    fn parses_params_in_order() {
        let tmp = write_temp("2\n2\n10\n2\n0.1\n0.005\n1.0\n");
        let params = load_params(tmp.path()).unwrap();
        assert_eq!(params.nx, 2);
        assert_eq!(params.ny, 2);
        assert_eq!(params.max_iters, 10);
        assert_eq!(params.reynolds_dim, 2);
        assert!((params.density - 0.1).abs() < 1e-6);
        assert!((params.accel - 0.005).abs() < 1e-6);
        assert!((params.omega - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_out_of_range_omega() {
        let tmp = write_temp("2\n2\n10\n2\n0.1\n0.005\n2.5\n");
        assert!(load_params(tmp.path()).is_err());
    }

    #[test]
    fn obstacle_file_marks_named_cells() {
        let tmp = write_temp("1 1 1\n0 0 1\n");
        let grid = load_obstacles(tmp.path(), 4, 4).unwrap();
        assert_eq!(grid[[1, 1]], 1);
        assert_eq!(grid[[0, 0]], 1);
        assert_eq!(grid[[2, 2]], 0);
    }

    #[test]
    fn obstacle_file_rejects_out_of_range_coordinates() {
        let tmp = write_temp("9 9 1\n");
        assert!(load_obstacles(tmp.path(), 4, 4).is_err());
    }

    #[test]
    fn obstacle_file_rejects_non_unit_flag() {
        let tmp = write_temp("1 1 2\n");
        assert!(load_obstacles(tmp.path(), 4, 4).is_err());
    }

    #[test]
    fn empty_obstacle_file_leaves_grid_unblocked() {
        let tmp = write_temp("");
        let grid = load_obstacles(tmp.path(), 3, 3).unwrap();
        assert!(grid.iter().all(|&v| v == 0));
    }
}
