//! World scroll: entities stream toward the player plane each tick

use super::state::RoundState;
use crate::consts::*;

/// Move rings toward the camera and retire the ones that passed it
pub fn advance_rings(state: &mut RoundState) {
    let step = state.speed;
    for ring in &mut state.rings {
        ring.pos.z += step;
    }
    state.rings.retain(|r| r.pos.z <= RETIRE_Z);
}

/// Move obstacles toward the camera and retire the ones that passed it.
/// Obstacles carry an extra speed multiplier once the round goes live.
pub fn advance_obstacles(state: &mut RoundState) {
    let step = state.speed * state.obstacle_speed_mult;
    for obstacle in &mut state.obstacles {
        obstacle.pos.z += step;
    }
    state.obstacles.retain(|o| o.pos.z <= RETIRE_Z);
}
