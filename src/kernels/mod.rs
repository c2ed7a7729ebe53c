//! The four stencil kernels plus the velocity reduction, as pure
//! functions over `LocalGrid` (spec §4.1, §4.2).

pub mod accelerate;
pub mod collide;
pub mod propagate;
pub mod rebound;
pub mod velocity;

pub use accelerate::accelerate_flow;
pub use collide::collide;
pub use propagate::propagate;
pub use rebound::rebound;
pub use velocity::av_velocity_sum;
