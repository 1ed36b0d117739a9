//! Crash sequencer
//!
//! After an obstacle hit the round is already lost; this plays out the
//! tumble for a fixed two seconds of crash time before the round ends.

use super::particles;
use super::state::{EndCause, RoundState};
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrashState {
    Idle,
    Crashing { elapsed: f32 },
}

impl CrashState {
    pub fn is_crashing(&self) -> bool {
        matches!(self, CrashState::Crashing { .. })
    }
}

/// Start the crash sequence. Re-entry while already crashing is a no-op so
/// overlapping hits cannot double the debris or restart the timer.
pub fn begin(state: &mut RoundState) {
    if state.crash.is_crashing() {
        return;
    }
    particles::spawn_explosion(state);
    state.crash = CrashState::Crashing { elapsed: 0.0 };
}

/// Advance the tumble by one tick. Returns the end cause once the crash
/// time is spent.
pub fn update(state: &mut RoundState) -> Option<EndCause> {
    let CrashState::Crashing { ref mut elapsed } = state.crash else {
        return None;
    };
    *elapsed += CRASH_TICK_SECS;
    let done = *elapsed > CRASH_DURATION_SECS;

    // Fall and tumble; steering is dead for the rest of the round
    state.player.pos.y = (state.player.pos.y - 0.1).max(GROUND_Y);
    state.player.rot.z += 0.2;
    state.player.rot.x += 0.1;

    done.then_some(EndCause::Crashed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_spawns_debris_once() {
        let mut state = RoundState::new(1);
        state.start_round();
        begin(&mut state);
        assert!(state.crash.is_crashing());
        let debris = state.particles.len();
        assert_eq!(debris, 20);

        // Second hit while crashing changes nothing
        begin(&mut state);
        assert_eq!(state.particles.len(), debris);
        assert_eq!(state.crash, CrashState::Crashing { elapsed: 0.0 });
    }

    #[test]
    fn crash_ends_after_two_seconds_of_crash_time() {
        let mut state = RoundState::new(1);
        state.start_round();
        begin(&mut state);

        let mut ended_at = None;
        for tick in 1..200u32 {
            if update(&mut state).is_some() {
                ended_at = Some(tick);
                break;
            }
        }
        // 2.0 / 0.016 = 125 steps, give or take float accumulation
        let ended_at = ended_at.expect("crash never ended");
        assert!((120..=127).contains(&ended_at), "ended at {ended_at}");
    }

    #[test]
    fn tumble_falls_to_the_ground_and_spins() {
        let mut state = RoundState::new(1);
        state.start_round();
        state.player.pos.y = 2.0;
        begin(&mut state);

        for _ in 0..10 {
            update(&mut state);
        }
        assert!(state.player.pos.y < 2.0);
        assert!(state.player.rot.z > 0.0);
        assert!(state.player.rot.x > 0.0);

        for _ in 0..100 {
            update(&mut state);
        }
        assert!(state.player.pos.y >= GROUND_Y);
    }

    #[test]
    fn update_is_inert_when_idle() {
        let mut state = RoundState::new(1);
        state.start_round();
        let rot = state.player.rot;
        assert_eq!(update(&mut state), None);
        assert_eq!(state.player.rot, rot);
    }
}
