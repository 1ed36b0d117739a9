//! Probabilistic entity spawning
//!
//! Every tick rolls an independent Bernoulli trial per entity type, with
//! probability scaled by the current speed so faster rounds stay dense.

use glam::Vec3;
use rand::Rng;

use super::state::{Obstacle, ObstacleKind, Ring, RoundState};
use crate::consts::*;

/// Roll for a ring spawn this tick
pub fn roll_ring(state: &mut RoundState) {
    if state.rng.random::<f32>() < SPAWN_RATE * state.speed {
        spawn_ring(state);
    }
}

pub fn spawn_ring(state: &mut RoundState) {
    let id = state.next_entity_id();
    let x = state.rng.random_range(-RING_LATERAL_HALF..RING_LATERAL_HALF);
    let y = state.rng.random_range(RING_MIN_Y..RING_MAX_Y);
    let z = -(SPAWN_DEPTH + state.rng.random_range(0.0..RING_DEPTH_SPREAD));
    state.rings.push(Ring {
        id,
        pos: Vec3::new(x, y, z),
        reward_secs: RING_REWARD_SECS,
        collected: false,
    });
}

/// Roll for an obstacle spawn this tick. No obstacles during the tutorial.
pub fn roll_obstacle(state: &mut RoundState) {
    if !state.tutorial.live {
        return;
    }
    if state.rng.random::<f32>() < SPAWN_RATE * state.speed {
        spawn_obstacle(state);
    }
}

pub fn spawn_obstacle(state: &mut RoundState) {
    let id = state.next_entity_id();

    let roll: f32 = state.rng.random();
    let kind = if roll < 0.6 {
        ObstacleKind::Building
    } else if roll < 0.9 {
        ObstacleKind::Tree
    } else {
        ObstacleKind::Sentinel
    };

    let (size, y) = match kind {
        ObstacleKind::Building => {
            let w = state.rng.random_range(1.5..3.5);
            let h = state.rng.random_range(2.0..6.0);
            let d = state.rng.random_range(1.0..3.0);
            // Anchor on the ground, position at the volume center
            (Vec3::new(w, h, d), GROUND_Y + h / 2.0)
        }
        // Trunk plus canopy; anchored at the ground like the original
        ObstacleKind::Tree => (Vec3::new(3.0, 5.0, 3.0), GROUND_Y),
        ObstacleKind::Sentinel => (Vec3::new(1.0, 2.0, 0.6), GROUND_Y),
    };

    let x = state
        .rng
        .random_range(-OBSTACLE_LATERAL_HALF..OBSTACLE_LATERAL_HALF);
    let z = -(SPAWN_DEPTH + state.rng.random_range(0.0..OBSTACLE_DEPTH_SPREAD));

    state.obstacles.push(Obstacle {
        id,
        kind,
        pos: Vec3::new(x, y, z),
        size,
        spawn_z: z,
    });
}
