//! Tutorial-to-live phase machine
//!
//! Every round opens with a hazard-free tutorial section. A countdown
//! appears after a short grace period, and at the 23 second mark the round
//! goes live exactly once: speed boost, obstacle multiplier, afterburner.

use super::particles;
use super::state::{GameEvent, RoundState};
use crate::consts::*;

#[derive(Debug, Clone, Copy)]
pub struct TutorialState {
    /// Latched true at the live transition, never unlatched mid-round
    pub live: bool,
    pub countdown_active: bool,
    countdown_start_ticks: u64,
    live_start_ticks: u64,
}

impl TutorialState {
    pub fn new() -> Self {
        Self {
            live: false,
            countdown_active: false,
            countdown_start_ticks: 0,
            live_start_ticks: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Displayed countdown value, or None outside the countdown window
    pub fn countdown_value(&self, now_ticks: u64) -> Option<u32> {
        if self.live || !self.countdown_active {
            return None;
        }
        let secs = now_ticks.saturating_sub(self.countdown_start_ticks) as f32 * SIM_DT;
        Some((COUNTDOWN_START as i64 - secs as i64).max(0) as u32)
    }

    /// Rhythmic pitch offset, active from the live transition onward
    pub fn headbob_pitch(&self, now_ticks: u64) -> f32 {
        if !self.live {
            return 0.0;
        }
        let t = now_ticks.saturating_sub(self.live_start_ticks) as f32 * SIM_DT;
        HEADBOB_AMPLITUDE_RAD * (std::f32::consts::TAU * t / HEADBOB_PERIOD_SECS).sin()
    }
}

impl Default for TutorialState {
    fn default() -> Self {
        Self::new()
    }
}

/// Advance the phase machine by one tick
pub fn update(state: &mut RoundState, events: &mut Vec<GameEvent>) {
    if state.tutorial.live {
        return;
    }

    let elapsed = state.elapsed_secs();

    if !state.tutorial.countdown_active && elapsed >= TUTORIAL_GRACE_SECS {
        state.tutorial.countdown_active = true;
        state.tutorial.countdown_start_ticks = state.time_ticks;
        events.push(GameEvent::CountdownStarted);
    }

    if elapsed >= TUTORIAL_SECS {
        state.tutorial.live = true;
        state.tutorial.live_start_ticks = state.time_ticks;
        state.speed *= LIVE_SPEED_BOOST;
        state.obstacle_speed_mult = LIVE_OBSTACLE_MULT;
        state.afterburner_on = true;
        particles::spawn_afterburner_burst(state);
        events.push(GameEvent::WentLive);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_state() -> RoundState {
        let mut state = RoundState::new(1);
        state.start_round();
        state
    }

    fn tick_to(state: &mut RoundState, ticks: u64, events: &mut Vec<GameEvent>) {
        while state.time_ticks < ticks {
            state.time_ticks += 1;
            update(state, events);
        }
    }

    #[test]
    fn countdown_starts_after_the_grace_period() {
        let mut state = playing_state();
        let mut events = Vec::new();

        tick_to(&mut state, 179, &mut events);
        assert!(events.is_empty());
        assert_eq!(state.countdown_value(), None);

        tick_to(&mut state, 180, &mut events);
        assert_eq!(events, vec![GameEvent::CountdownStarted]);
        assert_eq!(state.countdown_value(), Some(COUNTDOWN_START));
    }

    #[test]
    fn countdown_ticks_down_by_whole_seconds() {
        let mut state = playing_state();
        let mut events = Vec::new();
        tick_to(&mut state, 180, &mut events);

        tick_to(&mut state, 180 + 60, &mut events);
        assert_eq!(state.countdown_value(), Some(COUNTDOWN_START - 1));

        tick_to(&mut state, 180 + 5 * 60, &mut events);
        assert_eq!(state.countdown_value(), Some(COUNTDOWN_START - 5));
    }

    #[test]
    fn live_transition_fires_exactly_once() {
        let mut state = playing_state();
        let mut events = Vec::new();

        // One tick short of the 23 second mark
        tick_to(&mut state, 23 * 60 - 1, &mut events);
        assert!(!state.tutorial.live);

        tick_to(&mut state, 23 * 60, &mut events);
        assert!(state.tutorial.live);
        assert_eq!(events.last(), Some(&GameEvent::WentLive));
        assert!((state.speed - LIVE_SPEED_BOOST).abs() < 1e-5);
        assert_eq!(state.obstacle_speed_mult, LIVE_OBSTACLE_MULT);
        assert!(state.afterburner_on);
        assert!(!state.particles.is_empty());

        // Further ticks must not re-boost
        let speed = state.speed;
        tick_to(&mut state, 30 * 60, &mut events);
        assert_eq!(state.speed, speed);
        assert_eq!(
            events.iter().filter(|e| **e == GameEvent::WentLive).count(),
            1
        );
    }

    #[test]
    fn countdown_display_clears_when_live() {
        let mut state = playing_state();
        let mut events = Vec::new();
        tick_to(&mut state, 23 * 60, &mut events);
        assert_eq!(state.countdown_value(), None);
    }

    #[test]
    fn headbob_is_silent_during_tutorial() {
        let tutorial = TutorialState::new();
        assert_eq!(tutorial.headbob_pitch(600), 0.0);
    }

    #[test]
    fn headbob_oscillates_once_live() {
        let mut state = playing_state();
        let mut events = Vec::new();
        tick_to(&mut state, 23 * 60, &mut events);

        // Quarter period after the live start is a peak
        let quarter = (HEADBOB_PERIOD_SECS / 4.0 / SIM_DT) as u64;
        let peak = state
            .tutorial
            .headbob_pitch(state.time_ticks + quarter);
        assert!((peak - HEADBOB_AMPLITUDE_RAD).abs() < 0.01);
    }
}
