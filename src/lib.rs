//! D2Q9-BGK lattice-Boltzmann incompressible flow solver.
//!
//! A ring of partitions, each owning a contiguous band of grid rows,
//! cooperates over `crossbeam` channels to advance a particle-distribution
//! field for a fixed number of timesteps, recording a spatially averaged
//! flow speed every step and writing the final per-cell state once done.

pub mod cell;
pub mod config;
pub mod exchange;
pub mod grid;
pub mod kernels;
pub mod output;
pub mod params;
pub mod reynolds;
pub mod solvers;
pub mod tasks;
pub mod topology;
