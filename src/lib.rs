//! Orbit Hop - simulation core for a tile-hopping orbit rhythm game
//!
//! Core modules:
//! - `sim`: Grid index, object behaviors, player state machine and tick loop
//! - `renderer`: Read-only per-frame view for an external renderer
//! - `runner`: Explicit per-frame scheduler (host control point)
//! - `settings`: Data-driven game configuration

pub mod renderer;
pub mod runner;
pub mod settings;
pub mod sim;

pub use runner::FrameScheduler;
pub use settings::Settings;
pub use sim::{SimError, SimResult};

/// Game configuration constants
pub mod consts {
    /// Default tempo (beats per minute)
    pub const DEFAULT_BPM: f32 = 180.0;
    /// Starting pointer angle (pointing at -x)
    pub const START_ANGLE: f32 = std::f32::consts::PI;

    /// Facing tolerance for per-tick lookahead (fraction of a half-turn)
    pub const LOOKAHEAD_TOLERANCE: f32 = 0.05;
    /// Facing tolerance for committed moves (fraction of a half-turn)
    pub const COMMIT_TOLERANCE: f32 = 0.25;

    /// Instances of each object type placed per population
    pub const OBJECTS_PER_TYPE: u32 = 100;
    /// Objects spawn in `[-SPAWN_HALF_EXTENT, SPAWN_HALF_EXTENT)` on both axes
    pub const SPAWN_HALF_EXTENT: i32 = 50;

    /// Rendered object size relative to a cell, before the per-type multiplier
    pub const OBJECT_CELL_SCALE: f32 = 0.6;

    /// Pending session events kept when the host does not drain them
    pub const MAX_PENDING_EVENTS: usize = 1024;

    /// Host frame rate for the headless scheduler
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Largest dt forwarded to the simulation in one frame
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Normalize an angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Angular speed of the pointer in radians per second for a tempo
#[inline]
pub fn bpm_to_angular_speed(bpm: f32) -> f32 {
    bpm * std::f32::consts::PI / 60.0
}
