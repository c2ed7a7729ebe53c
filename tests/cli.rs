//! End-to-end tests against the built `lbm` binary, covering a sample of
//! spec.md §8's concrete scenarios: each test writes its own parameter
//! and obstacle files under a throwaway working directory so output
//! files never collide between tests running in parallel.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

struct Workdir(PathBuf);

impl Workdir {
    fn new(name: &str) -> Self {
        let mut dir = std::env::temp_dir();
        dir.push(format!("lbm-d2q9-cli-test-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        Workdir(dir)
    }

    fn path(&self) -> &Path {
        &self.0
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.0.join(name);
        fs::write(&path, contents).unwrap();
        path
    }
}

impl Drop for Workdir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

fn run_lbm(workdir: &Workdir, param_file: &Path, obstacle_file: &Path, partitions: Option<usize>) {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_lbm"));
    cmd.current_dir(workdir.path()).arg(param_file).arg(obstacle_file);
    if let Some(p) = partitions {
        cmd.arg(p.to_string());
    }
    let output = cmd.output().expect("failed to spawn lbm binary");
    assert!(
        output.status.success(),
        "lbm exited with {:?}\nstdout: {}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Scenario 1: 2x2 grid, no obstacles, 0 iterations.
#[test]
fn zero_iterations_reports_rest_pressure_and_empty_velocity_series() {
    let workdir = Workdir::new("zero-iters");
    let params = workdir.write("params.txt", "2\n2\n0\n2\n0.1\n0.005\n1.0\n");
    let obstacles = workdir.write("obstacles.txt", "");

    run_lbm(&workdir, &params, &obstacles, None);

    let final_state = fs::read_to_string(workdir.path().join("final_state.dat")).unwrap();
    let lines: Vec<&str> = final_state.lines().collect();
    assert_eq!(lines.len(), 4);
    for line in &lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        assert_eq!(fields.len(), 7);
        assert_eq!(fields[2], "0.000000000000E+00"); // u_x
        assert_eq!(fields[3], "0.000000000000E+00"); // u_y
        assert_eq!(fields[4], "0.000000000000E+00"); // |u|
        assert_eq!(fields[6], "0"); // blocked
        let pressure: f64 = fields[5].replace('E', "e").parse().unwrap();
        assert!((pressure - 0.1 / 3.0).abs() < 1e-6);
    }

    let av_vels = fs::read_to_string(workdir.path().join("av_vels.dat")).unwrap();
    assert!(av_vels.is_empty());
}

/// Scenario 2: 2x2 grid, no obstacles, 1 iteration — exactly one
/// av_vels entry, and the accelerated row picks up positive u_x.
#[test]
fn one_iteration_produces_a_single_velocity_sample() {
    let workdir = Workdir::new("one-iter");
    let params = workdir.write("params.txt", "2\n2\n1\n2\n0.1\n0.005\n1.0\n");
    let obstacles = workdir.write("obstacles.txt", "");

    run_lbm(&workdir, &params, &obstacles, None);

    let av_vels = fs::read_to_string(workdir.path().join("av_vels.dat")).unwrap();
    assert_eq!(av_vels.lines().count(), 1);
    assert!(av_vels.starts_with("0:\t"));

    let final_state = fs::read_to_string(workdir.path().join("final_state.dat")).unwrap();
    let row0: Vec<&str> = final_state
        .lines()
        .filter(|l| l.split_whitespace().nth(1) == Some("0"))
        .collect();
    assert_eq!(row0.len(), 2);
    for line in row0 {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let u_x: f64 = fields[2].replace('E', "e").parse().unwrap();
        assert!(u_x > 0.0, "accelerated row should gain positive u_x, got {u_x}");
    }
}

/// Scenario 4: 8x8 grid, no obstacles, 5 iterations, run with 1, 2, and
/// 4 partitions — all three must produce byte-identical output files.
#[test]
fn partition_count_does_not_change_output() {
    let param_contents = "8\n8\n5\n2\n0.1\n0.005\n1.0\n";

    let mut final_states = Vec::new();
    let mut av_vels_outputs = Vec::new();

    for partitions in [1usize, 2, 4] {
        let workdir = Workdir::new(&format!("partitions-{partitions}"));
        let params = workdir.write("params.txt", param_contents);
        let obstacles = workdir.write("obstacles.txt", "");

        run_lbm(&workdir, &params, &obstacles, Some(partitions));

        final_states.push(fs::read_to_string(workdir.path().join("final_state.dat")).unwrap());
        av_vels_outputs.push(fs::read_to_string(workdir.path().join("av_vels.dat")).unwrap());
    }

    for i in 1..final_states.len() {
        assert_eq!(
            final_states[0], final_states[i],
            "final_state.dat differs between 1 and {} partitions",
            [1, 2, 4][i]
        );
        assert_eq!(
            av_vels_outputs[0], av_vels_outputs[i],
            "av_vels.dat differs between 1 and {} partitions",
            [1, 2, 4][i]
        );
    }
}

/// Scenario: all cells blocked — velocities and av_vels stay at zero.
#[test]
fn fully_blocked_grid_keeps_every_velocity_at_zero() {
    let workdir = Workdir::new("all-blocked");
    let params = workdir.write("params.txt", "2\n2\n3\n2\n0.1\n0.005\n1.0\n");
    let obstacles = workdir.write("obstacles.txt", "0 0 1\n1 0 1\n0 1 1\n1 1 1\n");

    run_lbm(&workdir, &params, &obstacles, None);

    let final_state = fs::read_to_string(workdir.path().join("final_state.dat")).unwrap();
    for line in final_state.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        assert_eq!(fields[6], "1");
        assert_eq!(fields[2], "0.000000000000E+00");
    }

    let av_vels = fs::read_to_string(workdir.path().join("av_vels.dat")).unwrap();
    for line in av_vels.lines() {
        let (_, value) = line.split_once(":\t").unwrap();
        assert_eq!(value, "0.000000000000E+00");
    }
}

/// Rejects a malformed parameter file instead of panicking.
#[test]
fn missing_parameter_file_is_a_clean_error_not_a_panic() {
    let workdir = Workdir::new("missing-file");
    let missing = workdir.path().join("does-not-exist.txt");
    let obstacles = workdir.write("obstacles.txt", "");

    let output = Command::new(env!("CARGO_BIN_EXE_lbm"))
        .current_dir(workdir.path())
        .arg(&missing)
        .arg(&obstacles)
        .output()
        .expect("failed to spawn lbm binary");

    assert!(!output.status.success());
    assert!(!String::from_utf8_lossy(&output.stderr).is_empty());
}
