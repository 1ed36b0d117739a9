//! Ring Runner - an endless corridor runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, spawning, collisions, round state)
//! - `renderer`: WebGPU rendering pipeline
//! - `assets`: Player model loading with fallback surface mapping
//! - `audio`: Procedural Web Audio sound effects
//! - `settings`: User preferences

pub mod assets;
#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the cadence all tuning assumes)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Camera projection - the player flies at z = 0, camera behind at +z
    pub const CAMERA_FOV_DEG: f32 = 75.0;
    pub const CAMERA_DISTANCE: f32 = 5.0;
    pub const DEFAULT_ASPECT: f32 = 16.0 / 9.0;
    /// Fraction of the visible frustum the player may occupy
    pub const FRAME_MARGIN: f32 = 0.9;

    /// World geometry
    pub const GROUND_Y: f32 = -2.0;
    pub const CORRIDOR_HALF_WIDTH: f32 = 4.0;
    /// Lowest allowed player center, independent of the ground clamp
    pub const PLAYER_MIN_Y: f32 = -0.4;
    /// Player collision envelope radius
    pub const PLAYER_RADIUS: f32 = 0.6;

    /// Steering
    pub const STEER_SENSITIVITY: f32 = 0.4;
    pub const STEER_DEAD_ZONE: f32 = 0.05;
    pub const VELOCITY_DAMPING: f32 = 0.9;

    /// Round clock
    pub const ROUND_TIME_SECS: f64 = 60.0;
    pub const CLOCK_STEP_SECS: f64 = 0.1;
    pub const CLOCK_INTERVAL_MS: i32 = 100;

    /// Rings
    pub const RING_SCORE: u64 = 100;
    pub const RING_REWARD_SECS: f32 = 5.0;
    pub const RING_COLLECT_RADIUS: f32 = 2.5;
    pub const RING_RADIUS: f32 = 2.0;
    pub const RING_MIN_Y: f32 = 1.0;
    pub const RING_MAX_Y: f32 = 4.0;
    pub const RING_LATERAL_HALF: f32 = 4.0;
    /// Speed ramp per pickup
    pub const SPEED_PER_RING: f32 = 0.01;

    /// Spawning (per-tick Bernoulli probability, scaled by current speed)
    pub const SPAWN_RATE: f32 = 0.005;
    pub const SPAWN_DEPTH: f32 = 100.0;
    pub const RING_DEPTH_SPREAD: f32 = 30.0;
    pub const OBSTACLE_DEPTH_SPREAD: f32 = 40.0;
    pub const OBSTACLE_LATERAL_HALF: f32 = 6.0;
    /// Base obstacle collision radius, before perspective scaling
    pub const OBSTACLE_HIT_RADIUS: f32 = 1.2;
    /// Visual scale at spawn depth; grows to 1.0 at the player plane
    pub const OBSTACLE_SCALE_MIN: f32 = 0.6;

    /// Entities past this z are behind the camera and retire
    pub const RETIRE_Z: f32 = 5.0;

    /// Tutorial phase gates (seconds since round start)
    pub const TUTORIAL_GRACE_SECS: f32 = 3.0;
    pub const TUTORIAL_SECS: f32 = 23.0;
    pub const COUNTDOWN_START: u32 = 20;
    /// One-shot boosts applied at the live transition
    pub const LIVE_SPEED_BOOST: f32 = 1.15;
    pub const LIVE_OBSTACLE_MULT: f32 = 1.2;

    /// Head-bob armed at the live transition
    pub const HEADBOB_AMPLITUDE_RAD: f32 = 0.0625;
    pub const HEADBOB_PERIOD_SECS: f32 = 0.8;

    /// Crash sequence
    pub const CRASH_DURATION_SECS: f32 = 2.0;
    /// Crash time advances by a fixed step per tick, not wall time
    pub const CRASH_TICK_SECS: f32 = 0.016;

    /// Afterburner embers
    pub const MAX_EMBER_PARTICLES: usize = 100;
    pub const EMBERS_PER_TICK: usize = 3;
}

/// Linear interpolation between two scalars
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
