//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod advance;
pub mod clock;
pub mod collision;
pub mod crash;
pub mod kinematics;
pub mod particles;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod tutorial;

pub use crash::CrashState;
pub use kinematics::{Bounds, Steering};
pub use state::{
    EndCause, GameEvent, GamePhase, Obstacle, ObstacleKind, Particle, ParticleKind, Player, Ring,
    RoundState,
};
pub use tick::{TickInput, tick};
