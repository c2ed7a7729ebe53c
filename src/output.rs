//! Final-state and average-velocity file writers (spec §6), in the
//! teacher's `SystemStateTimeSeries::save` shape: build the full string,
//! one `File::create` + `write_all`, every I/O failure wrapped with the
//! path it happened at.

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use crate::cell::C_SQ;
use crate::grid::{Grid, ObstacleGrid};
use crate::params::Params;

/// Render `value` the way C's `%.12E` would: one leading digit, twelve
/// fractional digits, a capital `E`, and a signed, zero-padded-to-two
/// exponent. Rust's built-in `{:e}` leaves the exponent unpadded and
/// unsigned, which would make every output file disagree with the
/// reference byte-for-byte, so the two are stitched together here.
fn format_e12(value: f64) -> String {
    let rust_exp = format!("{value:.12e}");
    let (mantissa, exponent) = rust_exp.split_once('e').expect("{:e} always contains 'e'");
    let exponent: i32 = exponent.parse().expect("exponent is always a valid integer");
    format!("{mantissa}E{exponent:+03}")
}

/// Write `final_state.dat`: one line per cell, `jj` outer, `ii` inner:
/// `ii jj u_x u_y |u| pressure blocked`. Obstacle cells report zero
/// velocity and pressure `rho0 * c_s^2`.
pub fn write_final_state(path: &Path, params: &Params, grid: &Grid, obstacles: &ObstacleGrid) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("write_final_state: create dir {}", parent.display()))?;
    }

    let mut out = String::with_capacity(params.num_cells() * 64);
    for jj in 0..params.ny {
        for ii in 0..params.nx {
            let blocked = obstacles[[jj, ii]];
            let (u_x, u_y, u_norm, pressure) = if blocked != 0 {
                (0.0f32, 0.0f32, 0.0f32, params.density * C_SQ)
            } else {
                let c = grid[[jj, ii]];
                let rho = c.total_density();
                let u_x = (c.get(1) + c.get(5) + c.get(8) - (c.get(3) + c.get(6) + c.get(7))) / rho;
                let u_y = (c.get(2) + c.get(5) + c.get(6) - (c.get(4) + c.get(7) + c.get(8))) / rho;
                (u_x, u_y, (u_x * u_x + u_y * u_y).sqrt(), rho * C_SQ)
            };
            let u_x = format_e12(u_x as f64);
            let u_y = format_e12(u_y as f64);
            let u_norm = format_e12(u_norm as f64);
            let pressure = format_e12(pressure as f64);
            writeln!(out, "{ii} {jj} {u_x} {u_y} {u_norm} {pressure} {blocked}")
                .expect("writing to an in-memory String cannot fail");
        }
    }

    let mut file =
        File::create(path).with_context(|| format!("write_final_state: create {}", path.display()))?;
    file.write_all(out.as_bytes())
        .with_context(|| format!("write_final_state: write {}", path.display()))?;
    Ok(())
}

/// Write `av_vels.dat`: one line per step, `"{t}:\t{v:.12E}\n"`.
pub fn write_av_vels(path: &Path, av_vels: &[f64]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("write_av_vels: create dir {}", parent.display()))?;
    }

    let mut out = String::with_capacity(av_vels.len() * 24);
    for (t, v) in av_vels.iter().enumerate() {
        writeln!(out, "{t}:\t{}", format_e12(*v)).expect("writing to an in-memory String cannot fail");
    }

    let mut file =
        File::create(path).with_context(|| format!("write_av_vels: create {}", path.display()))?;
    file.write_all(out.as_bytes())
        .with_context(|| format!("write_av_vels: write {}", path.display()))?;
    Ok(())
}
