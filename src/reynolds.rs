//! Reynolds number and CPU-time reporting (spec §6), the two numbers
//! printed to the console after the last timestep.

use std::time::Duration;

use crate::params::Params;

/// `av_velocity_final * reynolds_dim / viscosity`, with `viscosity` from
/// `Params::viscosity` (spec §4.5, §6).
#[inline]
pub fn calc_reynolds(final_av_vel: f64, params: &Params) -> f64 {
    final_av_vel * params.reynolds_dim as f64 / params.viscosity()
}

/// User and system CPU time consumed by this process so far, read via
/// `getrusage(RUSAGE_SELF)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuTime {
    pub user: Duration,
    pub system: Duration,
}

impl CpuTime {
    pub fn now() -> Self {
        let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
        unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut usage) };
        CpuTime {
            user: timeval_to_duration(usage.ru_utime),
            system: timeval_to_duration(usage.ru_stime),
        }
    }
}

fn timeval_to_duration(tv: libc::timeval) -> Duration {
    Duration::new(tv.tv_sec.max(0) as u64, (tv.tv_usec.max(0) as u32) * 1000)
}
