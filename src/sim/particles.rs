//! Cosmetic particles: crash debris and afterburner embers
//!
//! Particles never affect gameplay. They live in `RoundState` so the
//! renderer stays a pure function of state.

use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

use super::state::{Particle, ParticleKind, RoundState};
use crate::consts::*;

/// Debris burst at the player position when a crash begins
pub fn spawn_explosion(state: &mut RoundState) {
    let origin = state.player.pos;
    for _ in 0..20 {
        let jitter = Vec3::new(
            state.rng.random_range(-0.25..0.25),
            state.rng.random_range(-0.25..0.25),
            state.rng.random_range(-0.25..0.25),
        );
        let vel = Vec3::new(
            state.rng.random_range(-0.15..0.15),
            state.rng.random_range(-0.15..0.15),
            state.rng.random_range(-0.15..0.15),
        );
        state.particles.push(Particle {
            kind: ParticleKind::Explosion,
            pos: origin + jitter,
            vel,
            life: 1.0,
            decay: 0.02,
            size: state.rng.random_range(0.03..0.08),
        });
    }
}

/// One-shot ember ring fired at the live transition
pub fn spawn_afterburner_burst(state: &mut RoundState) {
    let origin = state.player.pos;
    for i in 0..50 {
        let angle = i as f32 / 50.0 * TAU;
        let radius = state.rng.random_range(0.2..1.0);
        let behind = state.rng.random_range(0.5..2.5);
        state.particles.push(Particle {
            kind: ParticleKind::Ember { orange: i % 2 == 0 },
            pos: origin + Vec3::new(angle.cos() * radius, angle.sin() * radius, -behind),
            vel: Vec3::new(
                angle.cos() * 0.5,
                angle.sin() * 0.5,
                state.rng.random_range(2.0..6.0),
            ),
            life: 1.0,
            decay: 0.05,
            size: state.rng.random_range(0.04..0.1),
        });
    }
}

/// Continuous exhaust while the afterburner is on, capped so a long live
/// section cannot grow the pool without bound
pub fn stream(state: &mut RoundState) {
    if !state.afterburner_on {
        return;
    }
    // The cap budgets embers only; crash debris lives in the same pool
    let mut embers = state
        .particles
        .iter()
        .filter(|p| matches!(p.kind, ParticleKind::Ember { .. }))
        .count();
    for _ in 0..EMBERS_PER_TICK {
        if embers >= MAX_EMBER_PARTICLES {
            break;
        }
        embers += 1;
        let angle = state.rng.random_range(0.0..TAU);
        let radius = state.rng.random_range(0.1..0.4);
        let orange = state.rng.random::<bool>();
        state.particles.push(Particle {
            kind: ParticleKind::Ember { orange },
            pos: state.player.pos + Vec3::new(angle.cos() * radius, angle.sin() * radius, -0.5),
            vel: Vec3::new(
                angle.cos() * state.rng.random_range(0.2..0.5),
                angle.sin() * state.rng.random_range(0.2..0.5),
                state.rng.random_range(1.5..4.5),
            ),
            life: 1.0,
            decay: 0.04,
            size: state.rng.random_range(0.03..0.08),
        });
    }
}

/// Integrate and expire the whole pool
pub fn update(state: &mut RoundState) {
    for p in &mut state.particles {
        p.pos += p.vel;
        match p.kind {
            ParticleKind::Explosion => p.vel.y -= 0.01,
            ParticleKind::Ember { .. } => {
                p.vel.y -= 0.02;
                p.vel *= 0.98;
            }
        }
        p.life -= p.decay;
    }
    state.particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explosion_debris_expires_on_its_own() {
        let mut state = RoundState::new(1);
        state.start_round();
        spawn_explosion(&mut state);
        assert_eq!(state.particles.len(), 20);

        // life 1.0 at decay 0.02 lasts 50 updates
        for _ in 0..49 {
            update(&mut state);
        }
        assert_eq!(state.particles.len(), 20);
        update(&mut state);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn stream_respects_the_pool_cap() {
        let mut state = RoundState::new(1);
        state.start_round();
        state.afterburner_on = true;
        for _ in 0..200 {
            stream(&mut state);
        }
        assert_eq!(state.particles.len(), MAX_EMBER_PARTICLES);
    }

    #[test]
    fn crash_debris_does_not_eat_the_ember_budget() {
        let mut state = RoundState::new(1);
        state.start_round();
        state.afterburner_on = true;
        spawn_explosion(&mut state);
        let debris = state.particles.len();
        for _ in 0..200 {
            stream(&mut state);
        }
        let embers = state
            .particles
            .iter()
            .filter(|p| matches!(p.kind, ParticleKind::Ember { .. }))
            .count();
        assert_eq!(embers, MAX_EMBER_PARTICLES);
        assert_eq!(state.particles.len(), MAX_EMBER_PARTICLES + debris);
    }

    #[test]
    fn stream_is_idle_without_the_afterburner() {
        let mut state = RoundState::new(1);
        state.start_round();
        for _ in 0..50 {
            stream(&mut state);
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn burst_alternates_ember_palette() {
        let mut state = RoundState::new(1);
        state.start_round();
        spawn_afterburner_burst(&mut state);
        assert_eq!(state.particles.len(), 50);
        let orange = state
            .particles
            .iter()
            .filter(|p| p.kind == ParticleKind::Ember { orange: true })
            .count();
        assert_eq!(orange, 25);
    }

    #[test]
    fn debris_falls_under_gravity() {
        let mut state = RoundState::new(1);
        state.start_round();
        state.particles.push(Particle {
            kind: ParticleKind::Explosion,
            pos: Vec3::ZERO,
            vel: Vec3::ZERO,
            life: 1.0,
            decay: 0.0,
            size: 0.05,
        });
        for _ in 0..10 {
            update(&mut state);
        }
        assert!(state.particles[0].vel.y < 0.0);
        assert!(state.particles[0].pos.y < 0.0);
    }
}
