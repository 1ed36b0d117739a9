//! Round state and core simulation types
//!
//! `RoundState` owns every per-round value. Nothing gameplay-visible lives
//! outside it, so a fresh round is just a fresh struct.

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::crash::CrashState;
use super::kinematics::Bounds;
use super::tutorial::TutorialState;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, no simulation running
    Splash,
    /// Active round (covers both tutorial and live sections)
    Playing,
    /// Round ended, final stats frozen
    GameOver,
}

/// Why the round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCause {
    TimeExpired,
    Crashed,
}

/// Events emitted by the simulation for the host to react to
/// (sound, HUD flashes, screen changes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    RingCollected,
    ObstacleHit,
    CountdownStarted,
    WentLive,
    RoundOver(EndCause),
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec3,
    /// Lateral/vertical drift, applied per tick (forward motion is the
    /// world scrolling past, not the player moving)
    pub vel: Vec2,
    /// Euler rotation for rendering (banking, pitch, crash tumble)
    pub rot: Vec3,
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Vec3::new(0.0, 1.0, 0.0),
            vel: Vec2::ZERO,
            rot: Vec3::ZERO,
        }
    }

    /// Height above the ground plane, for the HUD altimeter
    pub fn altitude(&self) -> f32 {
        self.pos.y - GROUND_Y
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// A collectible ring
#[derive(Debug, Clone)]
pub struct Ring {
    pub id: u32,
    pub pos: Vec3,
    /// Seconds added to the clock when collected
    pub reward_secs: f32,
    /// Set the tick the ring is collected; collected rings never score twice
    pub collected: bool,
}

/// Obstacle flavor, for rendering and spawn sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Building,
    Tree,
    Sentinel,
}

impl ObstacleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Building => "building",
            ObstacleKind::Tree => "tree",
            ObstacleKind::Sentinel => "sentinel",
        }
    }
}

/// A hazard approaching the player
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec3,
    /// Visual extents (width, height, depth) at full scale
    pub size: Vec3,
    /// Depth the obstacle spawned at; drives the perspective grow-in
    pub spawn_z: f32,
}

impl Obstacle {
    /// Perspective grow-in: small at spawn depth, full size at the player
    /// plane. Collision radius scales with it so visuals and hits agree.
    pub fn scale(&self) -> f32 {
        let total = -self.spawn_z;
        if total <= f32::EPSILON {
            return 1.0;
        }
        let t = ((self.pos.z - self.spawn_z) / total).clamp(0.0, 1.0);
        crate::lerp(OBSTACLE_SCALE_MIN, 1.0, t)
    }

    pub fn hit_radius(&self) -> f32 {
        OBSTACLE_HIT_RADIUS * self.scale()
    }
}

/// Cosmetic particle flavor, drives color and physics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Crash debris
    Explosion,
    /// Afterburner exhaust; alternating palette
    Ember { orange: bool },
}

/// A cosmetic particle. Opacity and scale both track `life`.
#[derive(Debug, Clone)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec3,
    pub vel: Vec3,
    pub life: f32,
    pub decay: f32,
    pub size: f32,
}

/// Complete state of one round
#[derive(Debug, Clone)]
pub struct RoundState {
    pub phase: GamePhase,

    pub score: u64,
    pub streak: u32,
    /// Remaining round time in seconds. f64 because it accumulates many
    /// small decrements over a round.
    pub time_left: f64,
    /// World scroll speed; ramps up with every ring
    pub speed: f32,
    /// Extra multiplier on obstacle scroll speed, armed at the live switch
    pub obstacle_speed_mult: f32,
    /// Ticks since the round started
    pub time_ticks: u64,

    pub tutorial: TutorialState,
    pub crash: CrashState,

    pub player: Player,
    pub rings: Vec<Ring>,
    pub obstacles: Vec<Obstacle>,
    pub particles: Vec<Particle>,
    /// Afterburner stream active (from the live switch to round end)
    pub afterburner_on: bool,

    /// Stats frozen at round end, after live state has been reset
    pub final_score: u64,
    pub final_streak: u32,

    pub bounds: Bounds,
    pub rng: Pcg32,
    next_id: u32,
}

impl RoundState {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: GamePhase::Splash,
            score: 0,
            streak: 0,
            time_left: ROUND_TIME_SECS,
            speed: 1.0,
            obstacle_speed_mult: 1.0,
            time_ticks: 0,
            tutorial: TutorialState::new(),
            crash: CrashState::Idle,
            player: Player::new(),
            rings: Vec::new(),
            obstacles: Vec::new(),
            particles: Vec::new(),
            afterburner_on: false,
            final_score: 0,
            final_streak: 0,
            bounds: Bounds::from_projection(CAMERA_FOV_DEG, DEFAULT_ASPECT, CAMERA_DISTANCE),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 0,
        }
    }

    /// Recompute movement bounds when the canvas aspect ratio changes
    pub fn set_aspect(&mut self, aspect: f32) {
        self.bounds = Bounds::from_projection(CAMERA_FOV_DEG, aspect, CAMERA_DISTANCE);
    }

    /// Begin a fresh round from the splash or game-over screen
    pub fn start_round(&mut self) {
        self.reset_round();
        self.phase = GamePhase::Playing;
    }

    /// Return every per-round value to its starting state. The RNG keeps
    /// its sequence so consecutive rounds differ.
    pub(crate) fn reset_round(&mut self) {
        self.score = 0;
        self.streak = 0;
        self.time_left = ROUND_TIME_SECS;
        self.speed = 1.0;
        self.obstacle_speed_mult = 1.0;
        self.time_ticks = 0;
        self.tutorial.reset();
        self.crash = CrashState::Idle;
        self.player = Player::new();
        self.rings.clear();
        self.obstacles.clear();
        self.particles.clear();
        self.afterburner_on = false;
    }

    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Seconds of simulated time since the round started
    pub fn elapsed_secs(&self) -> f32 {
        self.time_ticks as f32 * SIM_DT
    }

    /// Tutorial countdown value to display, if the countdown is running
    pub fn countdown_value(&self) -> Option<u32> {
        self.tutorial.countdown_value(self.time_ticks)
    }

    /// Distance from the player to the closest obstacle, for the debug HUD
    pub fn nearest_obstacle_distance(&self) -> Option<f32> {
        let ppos = self.player.pos;
        self.obstacles
            .iter()
            .map(|o| o.pos.distance(ppos))
            .min_by(|a, b| a.total_cmp(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obstacle_scale_grows_toward_player_plane() {
        let mut obstacle = Obstacle {
            id: 0,
            kind: ObstacleKind::Building,
            pos: Vec3::new(0.0, 0.0, -120.0),
            size: Vec3::new(2.0, 4.0, 2.0),
            spawn_z: -120.0,
        };
        assert!((obstacle.scale() - OBSTACLE_SCALE_MIN).abs() < 1e-5);

        obstacle.pos.z = -60.0;
        let mid = obstacle.scale();
        assert!(mid > OBSTACLE_SCALE_MIN && mid < 1.0);

        obstacle.pos.z = 0.0;
        assert!((obstacle.scale() - 1.0).abs() < 1e-5);
        assert!((obstacle.hit_radius() - OBSTACLE_HIT_RADIUS).abs() < 1e-5);

        // Past the player plane the scale stays clamped at full size
        obstacle.pos.z = 3.0;
        assert!((obstacle.scale() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn start_round_resets_everything() {
        let mut state = RoundState::new(7);
        state.start_round();
        state.score = 500;
        state.streak = 5;
        state.speed = 1.3;
        state.time_left = 12.0;
        let id = state.next_entity_id();
        state.rings.push(Ring {
            id,
            pos: Vec3::new(0.0, 2.0, -50.0),
            reward_secs: RING_REWARD_SECS,
            collected: false,
        });

        state.start_round();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.streak, 0);
        assert_eq!(state.speed, 1.0);
        assert_eq!(state.time_left, ROUND_TIME_SECS);
        assert!(state.rings.is_empty());
        assert!(!state.tutorial.live);
    }

    #[test]
    fn entity_ids_are_unique_across_rounds() {
        let mut state = RoundState::new(1);
        let a = state.next_entity_id();
        state.start_round();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }
}
