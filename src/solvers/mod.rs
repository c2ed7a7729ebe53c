//! The timestep driver and the global reduction it feeds (spec §4.4).

pub mod partition;
pub mod reduce;

pub use partition::run_timesteps;
pub use reduce::reduce_velocity_series;
