//! Player steering, drift integration, and movement bounds

use glam::{Vec2, Vec3};

use super::state::Player;
use crate::consts::*;

/// Unified steering input for one tick. The host maps keyboard, mouse, and
/// touch onto this; the simulation never sees raw device events.
#[derive(Debug, Clone, Copy, Default)]
pub struct Steering {
    /// Normalized axis in [-1, 1] per component
    pub axis: Vec2,
    /// False when no device is actively steering; the player coasts on
    /// damped velocity instead of snapping to the axis
    pub engaged: bool,
}

/// Playable rectangle at the player plane
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub x_half: f32,
    pub y_min: f32,
    pub y_max: f32,
}

impl Bounds {
    /// Visible-frustum rectangle at the player plane, shrunk by a fixed
    /// margin and intersected with the corridor width. Keeps the player on
    /// screen at any aspect ratio.
    pub fn from_projection(fov_y_deg: f32, aspect: f32, camera_dist: f32) -> Self {
        let half_h = (fov_y_deg.to_radians() / 2.0).tan() * camera_dist;
        let half_w = half_h * aspect;
        Self {
            x_half: (half_w * FRAME_MARGIN).min(CORRIDOR_HALF_WIDTH),
            y_min: PLAYER_MIN_Y,
            y_max: half_h * FRAME_MARGIN,
        }
    }

    pub fn clamp(&self, pos: &mut Vec3) {
        pos.x = pos.x.clamp(-self.x_half, self.x_half);
        pos.y = pos.y.clamp(self.y_min, self.y_max);
        // The whole collision envelope stays above the ground plane
        if pos.y - PLAYER_RADIUS < GROUND_Y {
            pos.y = GROUND_Y + PLAYER_RADIUS;
        }
    }
}

/// Advance player position by one tick of steering and drift
pub fn integrate(player: &mut Player, steering: &Steering, bounds: &Bounds) {
    if steering.engaged {
        player.vel = apply_dead_zone(steering.axis) * STEER_SENSITIVITY;
    }

    player.pos.x += player.vel.x;
    player.pos.y += player.vel.y;
    player.vel *= VELOCITY_DAMPING;

    bounds.clamp(&mut player.pos);

    // Bank into the turn, pitch with climb/dive
    player.rot.y = player.vel.x * 0.5;
    player.rot.x = -player.vel.y * 0.3;
}

fn apply_dead_zone(axis: Vec2) -> Vec2 {
    if axis.length() < STEER_DEAD_ZONE {
        Vec2::ZERO
    } else {
        axis.clamp(Vec2::splat(-1.0), Vec2::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bounds() -> Bounds {
        Bounds::from_projection(CAMERA_FOV_DEG, DEFAULT_ASPECT, CAMERA_DISTANCE)
    }

    #[test]
    fn dead_zone_zeroes_tiny_input() {
        let mut player = Player::new();
        let steering = Steering {
            axis: Vec2::new(0.02, -0.02),
            engaged: true,
        };
        integrate(&mut player, &steering, &bounds());
        assert_eq!(player.vel, Vec2::ZERO);
    }

    #[test]
    fn disengaged_input_coasts_with_damping() {
        let mut player = Player::new();
        player.vel = Vec2::new(0.2, 0.0);
        let steering = Steering::default();

        integrate(&mut player, &steering, &bounds());
        assert!((player.pos.x - 0.2).abs() < 1e-6);
        assert!((player.vel.x - 0.2 * VELOCITY_DAMPING).abs() < 1e-6);

        // Velocity decays toward zero but is never re-set while disengaged
        for _ in 0..200 {
            integrate(&mut player, &steering, &bounds());
        }
        assert!(player.vel.length() < 1e-3);
    }

    #[test]
    fn ground_clamp_keeps_envelope_above_ground() {
        let mut player = Player::new();
        player.pos.y = PLAYER_MIN_Y;
        let steering = Steering {
            axis: Vec2::new(0.0, -1.0),
            engaged: true,
        };
        for _ in 0..50 {
            integrate(&mut player, &steering, &bounds());
        }
        assert!(player.pos.y - PLAYER_RADIUS >= GROUND_Y - 1e-6);
    }

    #[test]
    fn banking_follows_velocity() {
        let mut player = Player::new();
        let steering = Steering {
            axis: Vec2::new(1.0, 0.0),
            engaged: true,
        };
        integrate(&mut player, &steering, &bounds());
        assert!(player.rot.y > 0.0);
        assert_eq!(player.rot.x, 0.0);
    }

    proptest! {
        #[test]
        fn position_stays_in_bounds(
            ax in -1.0f32..1.0,
            ay in -1.0f32..1.0,
            ticks in 1usize..300,
        ) {
            let b = bounds();
            let mut player = Player::new();
            let steering = Steering { axis: Vec2::new(ax, ay), engaged: true };
            for _ in 0..ticks {
                integrate(&mut player, &steering, &b);
            }
            prop_assert!(player.pos.x >= -b.x_half - 1e-5);
            prop_assert!(player.pos.x <= b.x_half + 1e-5);
            prop_assert!(player.pos.y >= b.y_min - 1e-5);
            prop_assert!(player.pos.y <= b.y_max + 1e-5);
            prop_assert!(player.pos.y - PLAYER_RADIUS >= GROUND_Y - 1e-5);
        }
    }
}
