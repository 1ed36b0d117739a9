//! Sphere-distance collision checks against the player
//!
//! Everything that can touch the player reduces to a center-distance test:
//! rings use a fixed generous pickup radius, obstacles a radius that scales
//! with their perspective grow-in.

use super::clock;
use super::state::{GameEvent, RoundState};
use crate::consts::*;

/// Collect any rings inside the pickup radius. Each ring scores at most
/// once; collected rings are removed before the next tick sees them.
pub fn collect_rings(state: &mut RoundState, events: &mut Vec<GameEvent>) {
    let ppos = state.player.pos;
    let mut rewards: Vec<f32> = Vec::new();

    for ring in &mut state.rings {
        if !ring.collected && ring.pos.distance(ppos) < RING_COLLECT_RADIUS {
            ring.collected = true;
            rewards.push(ring.reward_secs);
        }
    }

    if rewards.is_empty() {
        return;
    }
    state.rings.retain(|r| !r.collected);
    for reward in rewards {
        clock::apply_pickup(state, reward);
        events.push(GameEvent::RingCollected);
    }
}

/// Emit an obstacle hit if any hazard overlaps the player. Harmless during
/// an active crash; the sequencer already owns the round.
pub fn check_obstacles(state: &RoundState, events: &mut Vec<GameEvent>) {
    if state.crash.is_crashing() {
        return;
    }
    let ppos = state.player.pos;
    if state
        .obstacles
        .iter()
        .any(|o| o.pos.distance(ppos) < o.hit_radius())
    {
        events.push(GameEvent::ObstacleHit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Obstacle, ObstacleKind, Ring};
    use glam::Vec3;

    fn ring_at(state: &mut RoundState, pos: Vec3) {
        let id = state.next_entity_id();
        state.rings.push(Ring {
            id,
            pos,
            reward_secs: RING_REWARD_SECS,
            collected: false,
        });
    }

    #[test]
    fn ring_inside_radius_scores_once() {
        let mut state = RoundState::new(1);
        state.start_round();
        let ppos = state.player.pos;
        ring_at(&mut state, ppos + Vec3::new(1.0, 0.0, 0.0));

        let mut events = Vec::new();
        collect_rings(&mut state, &mut events);
        assert_eq!(events, vec![GameEvent::RingCollected]);
        assert_eq!(state.score, RING_SCORE);
        assert_eq!(state.streak, 1);
        assert!(state.rings.is_empty());

        // A second pass finds nothing left to collect
        events.clear();
        collect_rings(&mut state, &mut events);
        assert!(events.is_empty());
        assert_eq!(state.score, RING_SCORE);
    }

    #[test]
    fn two_rings_same_tick_both_score() {
        let mut state = RoundState::new(1);
        state.start_round();
        let ppos = state.player.pos;
        ring_at(&mut state, ppos + Vec3::new(1.0, 0.0, 0.0));
        ring_at(&mut state, ppos + Vec3::new(-1.0, 0.5, 0.0));

        let mut events = Vec::new();
        collect_rings(&mut state, &mut events);
        assert_eq!(events.len(), 2);
        assert_eq!(state.score, 2 * RING_SCORE);
        assert_eq!(state.streak, 2);
        assert!((state.time_left - (ROUND_TIME_SECS + 2.0 * RING_REWARD_SECS as f64)).abs() < 1e-9);
    }

    #[test]
    fn distant_ring_is_untouched() {
        let mut state = RoundState::new(1);
        state.start_round();
        let ppos = state.player.pos;
        ring_at(&mut state, ppos + Vec3::new(0.0, 0.0, -10.0));

        let mut events = Vec::new();
        collect_rings(&mut state, &mut events);
        assert!(events.is_empty());
        assert_eq!(state.rings.len(), 1);
    }

    #[test]
    fn obstacle_hit_radius_scales_with_depth() {
        let mut state = RoundState::new(1);
        state.start_round();
        let id = state.next_entity_id();
        let mut obstacle = Obstacle {
            id,
            kind: ObstacleKind::Building,
            pos: state.player.pos + Vec3::new(1.0, 0.0, 0.0),
            size: Vec3::new(2.0, 4.0, 2.0),
            spawn_z: -120.0,
        };
        // At the player plane scale is 1.0 so radius 1.2 > distance 1.0
        state.obstacles.push(obstacle.clone());
        let mut events = Vec::new();
        check_obstacles(&state, &mut events);
        assert_eq!(events, vec![GameEvent::ObstacleHit]);

        // Same lateral offset at spawn depth: scaled radius 0.72 < 1.0, no hit
        state.obstacles.clear();
        obstacle.pos = Vec3::new(state.player.pos.x + 1.0, state.player.pos.y, -120.0);
        state.player.pos.z = -120.0;
        state.obstacles.push(obstacle);
        events.clear();
        check_obstacles(&state, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn no_hits_reported_mid_crash() {
        let mut state = RoundState::new(1);
        state.start_round();
        crate::sim::crash::begin(&mut state);
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            kind: ObstacleKind::Sentinel,
            pos: state.player.pos,
            size: Vec3::new(1.0, 2.0, 0.6),
            spawn_z: -100.0,
        });
        let mut events = Vec::new();
        check_obstacles(&state, &mut events);
        assert!(events.is_empty());
    }
}
