//! Stick Catch - a jointed stick figure that walks, reaches and throws
//!
//! Core modules:
//! - `sim`: Deterministic simulation (segment tree, strategies, scenario driver)
//! - `vector`: 2D vector helpers on top of `glam::DVec2`
//! - `journal`: Injected event log for status lines and throw/hit events
//! - `settings`: Data-driven scenario configuration

pub mod journal;
pub mod settings;
pub mod sim;
pub mod vector;

pub use journal::{Journal, JournalEntry, JournalSink, LogSink, MemorySink};
pub use settings::{BodyPreset, SimConfig};
pub use vector::{Vector2D, VectorExt};

use glam::DVec2;
use std::f64::consts::{PI, TAU};

/// Simulation configuration constants
pub mod consts {
    /// Default discrete time step for projectile integration (seconds)
    pub const SIM_DT: f64 = 0.1;
    /// Default tick budget for running a scenario to completion
    pub const MAX_TICKS: u32 = 1000;

    /// Ground defaults
    pub const GROUND_LEVEL: f64 = 400.0;
    /// Endpoints closer than this to the ground count as touching it
    pub const GROUND_TOLERANCE: f64 = 1.0;

    /// Segments never get shorter than this
    pub const MIN_SEGMENT_LENGTH: f64 = 0.1;

    /// Walker defaults
    pub const WALK_SPEED: f64 = 5.0;
    /// Horizontal gap left between body and target before reaching starts
    pub const REACH_DISTANCE: f64 = 50.0;
    pub const MIN_GROUND_CONTACTS: usize = 2;
    pub const MIN_OBJECT_CONTACTS: usize = 3;
    /// Slowest accepted walk speed
    pub const MIN_WALK_SPEED: f64 = 1e-3;
    /// Longest walk the planner will queue
    pub const MAX_WALK_MOVES: usize = 100_000;

    /// Snowball defaults
    pub const SNOWBALL_RADIUS: f64 = 10.0;
    pub const GRAVITY: f64 = 9.8;
    /// Launch point sits this far above the body base
    pub const LAUNCH_HEIGHT: f64 = 50.0;

    /// Target defaults
    pub const TARGET_RADIUS: f64 = 20.0;
}

/// Normalize angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negatives up to exactly TAU
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Wrap an angle difference to [-π, π]
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    (angle + PI).rem_euclid(TAU) - PI
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> DVec2 {
    DVec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: DVec2) -> (f64, f64) {
    (pos.length(), pos.y.atan2(pos.x))
}
