//! The depleting score clock
//!
//! Time is the score resource: it drains on a host-scheduled 100 ms cadence
//! and ring pickups buy it back. Depletion runs outside the frame tick so a
//! stalled renderer cannot freeze the countdown.

use super::state::{EndCause, GameEvent, GamePhase, RoundState};
use super::tick;
use crate::consts::*;

/// Apply one ring pickup: score, streak, clock refund, and the speed ramp.
pub fn apply_pickup(state: &mut RoundState, reward_secs: f32) {
    state.score += RING_SCORE;
    state.streak += 1;
    state.time_left += reward_secs as f64;
    state.speed += SPEED_PER_RING;
}

/// One depletion step. Callbacks that arrive after the round ended are
/// no-ops, so a stray timer firing past cancellation is harmless.
pub fn fire(state: &mut RoundState) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Playing {
        return events;
    }

    state.time_left -= CLOCK_STEP_SECS;
    // Epsilon absorbs the rounding residue of repeated 0.1 subtractions
    if state.time_left <= 1e-9 {
        state.time_left = 0.0;
        tick::finish_round(state, EndCause::TimeExpired, &mut events);
    }
    events
}
