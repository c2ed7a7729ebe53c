//! `lbm <paramfile> <obstaclefile> [partitions]`
//!
//! Loads a parameter file and obstacle file, runs the D2Q9-BGK
//! timestep loop across `partitions` cooperating ring partitions
//! (default 1), writes `final_state.dat` and `av_vels.dat`, and prints
//! the Reynolds number plus elapsed/user/system time.

use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context, Result};

use lbm_d2q9_rs::config::{load_obstacles, load_params};
use lbm_d2q9_rs::output::{write_av_vels, write_final_state};
use lbm_d2q9_rs::reynolds::{calc_reynolds, CpuTime};
use lbm_d2q9_rs::tasks::run::run;

fn main() {
    if let Err(err) = logger_bro::init() {
        eprintln!("lbm: logging init failed, continuing without it: {err:#}");
    }

    if let Err(err) = try_main() {
        eprintln!("lbm: {err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        bail!("usage: {} <paramfile> <obstaclefile> [partitions]", args.first().map(String::as_str).unwrap_or("lbm"));
    }

    let param_path = Path::new(&args[1]);
    let obstacle_path = Path::new(&args[2]);
    let partitions: usize = match args.get(3) {
        Some(s) => s
            .parse()
            .with_context(|| format!("partitions argument {s:?} is not a positive integer"))?,
        None => 1,
    };
    if partitions == 0 {
        bail!("partitions must be at least 1");
    }

    log::info!("loading parameters from {}", param_path.display());
    let params = load_params(param_path)?;
    let obstacles = load_obstacles(obstacle_path, params.nx, params.ny)?;

    log::info!(
        "running {} x {} grid for {} steps across {partitions} partition(s)",
        params.nx,
        params.ny,
        params.max_iters
    );

    let wall_start = Instant::now();
    let cpu_start = CpuTime::now();

    let (final_grid, av_vels) = run(&params, &obstacles, partitions)?;

    let wall_elapsed = wall_start.elapsed();
    let cpu_end = CpuTime::now();

    write_final_state(Path::new("final_state.dat"), &params, &final_grid, &obstacles)?;
    write_av_vels(Path::new("av_vels.dat"), &av_vels)?;

    let final_av_vel = av_vels.last().copied().unwrap_or(0.0);
    let reynolds = calc_reynolds(final_av_vel, &params);

    println!("==done==");
    println!("Reynolds number:\t\t{reynolds:.12E}");
    println!("Elapsed time:\t\t\t{:.6} (s)", wall_elapsed.as_secs_f64());
    println!(
        "Elapsed user CPU time:\t\t{:.6} (s)",
        (cpu_end.user - cpu_start.user).as_secs_f64()
    );
    println!(
        "Elapsed system CPU time:\t{:.6} (s)",
        (cpu_end.system - cpu_start.system).as_secs_f64()
    );

    Ok(())
}
