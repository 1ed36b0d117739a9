//! Fixed timestep simulation tick
//!
//! One call advances the whole round by `SIM_DT`: phase machine, steering,
//! world scroll, collisions, spawning, crash playback, particles. The host
//! drives this from an accumulator so rendering cadence never changes
//! gameplay.

use super::state::{EndCause, GameEvent, GamePhase, RoundState};
use super::{advance, collision, crash, kinematics, particles, spawn, tutorial};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub steering: kinematics::Steering,
    /// Accessibility: suppress head-bob and the cosmetic ember stream
    pub reduced_motion: bool,
}

/// Advance the round by one fixed timestep
pub fn tick(state: &mut RoundState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Playing {
        return events;
    }
    state.time_ticks += 1;

    tutorial::update(state, &mut events);

    if !state.crash.is_crashing() {
        kinematics::integrate(&mut state.player, &input.steering, &state.bounds);
        if !input.reduced_motion {
            state.player.rot.x += state.tutorial.headbob_pitch(state.time_ticks);
        }

        advance::advance_rings(state);
        collision::collect_rings(state, &mut events);
        spawn::roll_ring(state);

        advance::advance_obstacles(state);
        collision::check_obstacles(state, &mut events);
        if events.contains(&GameEvent::ObstacleHit) {
            crash::begin(state);
        }
        spawn::roll_obstacle(state);
    } else if let Some(cause) = crash::update(state) {
        finish_round(state, cause, &mut events);
        return events;
    }

    if !input.reduced_motion {
        particles::stream(state);
    }
    particles::update(state);
    events
}

/// End the round: freeze final stats, reset live state, flip to GameOver.
pub(crate) fn finish_round(state: &mut RoundState, cause: EndCause, events: &mut Vec<GameEvent>) {
    state.final_score = state.score;
    state.final_streak = state.streak;
    state.reset_round();
    state.phase = GamePhase::GameOver;
    events.push(GameEvent::RoundOver(cause));
}
