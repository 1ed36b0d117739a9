//! Per-frame scene geometry built from the round state
//!
//! Entities are projected on the CPU through a fixed perspective camera and
//! emitted as colored triangles in NDC; the pipeline draws them as-is.
//! Painter's order: ground, then far-to-near entities, player, particles.

use glam::{Vec2, Vec3};

use super::vertex::{Vertex, colors};
use crate::assets::PlayerModel;
use crate::consts::*;
use crate::sim::{GamePhase, ObstacleKind, ParticleKind, RoundState};

const RING_SEGMENTS: usize = 24;
const CIRCLE_SEGMENTS: usize = 16;
const RING_THICKNESS: f32 = 0.25;

/// Fixed camera looking down the corridor from behind the player plane
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub aspect: f32,
    /// 1 / tan(fov_y / 2)
    focal: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            aspect: aspect.max(0.1),
            focal: 1.0 / (CAMERA_FOV_DEG.to_radians() / 2.0).tan(),
        }
    }

    /// Project a world point to NDC. Returns None behind the near plane.
    pub fn project(&self, p: Vec3) -> Option<Projected> {
        let depth = CAMERA_DISTANCE - p.z;
        if depth < 0.1 {
            return None;
        }
        let ndc = Vec2::new(
            p.x * self.focal / (self.aspect * depth),
            p.y * self.focal / depth,
        );
        Some(Projected {
            ndc,
            // NDC radius of a unit world sphere at this depth (vertical axis)
            unit: self.focal / depth,
        })
    }
}

/// Result of projecting one world point
#[derive(Debug, Clone, Copy)]
pub struct Projected {
    pub ndc: Vec2,
    pub unit: f32,
}

/// Build the full frame for the current state. The player mesh is optional;
/// until the asset arrives the frame carries a flat marker instead.
pub fn build(state: &RoundState, aspect: f32, player_model: Option<&PlayerModel>) -> Vec<Vertex> {
    let cam = Camera::new(aspect);
    let mut out = Vec::with_capacity(2048);

    let tutorial = !state.tutorial.live;
    push_ground(&mut out, &cam, tutorial);

    if state.phase == GamePhase::Playing {
        // Far to near so closer entities draw over distant ones
        let mut order: Vec<usize> = (0..state.obstacles.len()).collect();
        order.sort_by(|&a, &b| state.obstacles[a].pos.z.total_cmp(&state.obstacles[b].pos.z));
        for i in order {
            push_obstacle(&mut out, &cam, state, i);
        }

        let mut order: Vec<usize> = (0..state.rings.len()).collect();
        order.sort_by(|&a, &b| state.rings[a].pos.z.total_cmp(&state.rings[b].pos.z));
        let ring_color = if tutorial {
            colors::RING_TUTORIAL
        } else {
            colors::RING
        };
        for i in order {
            push_ring(&mut out, &cam, state.rings[i].pos, ring_color);
        }

        push_player(&mut out, &cam, state, tutorial, player_model);
        push_particles(&mut out, &cam, state);
    }

    out
}

/// Ground plane as a single projected quad from the player plane to the fog
/// distance. Good enough for a flat horizon.
fn push_ground(out: &mut Vec<Vertex>, cam: &Camera, tutorial: bool) {
    let color = if tutorial {
        colors::GROUND_TUTORIAL
    } else {
        colors::GROUND
    };
    let near_half = CORRIDOR_HALF_WIDTH * 6.0;
    let corners = [
        Vec3::new(-near_half, GROUND_Y, 4.0),
        Vec3::new(near_half, GROUND_Y, 4.0),
        Vec3::new(near_half, GROUND_Y, -140.0),
        Vec3::new(-near_half, GROUND_Y, -140.0),
    ];
    let projected: Option<Vec<Vec2>> = corners
        .iter()
        .map(|&c| cam.project(c).map(|p| p.ndc))
        .collect();
    if let Some(q) = projected {
        push_quad(out, q[0], q[1], q[2], q[3], color);
    }
}

fn push_ring(out: &mut Vec<Vertex>, cam: &Camera, pos: Vec3, color: [f32; 4]) {
    let Some(p) = cam.project(pos) else { return };
    let outer = RING_RADIUS * p.unit;
    let inner = (RING_RADIUS - RING_THICKNESS) * p.unit;
    push_annulus(out, cam, p.ndc, inner, outer, color);
}

fn push_obstacle(out: &mut Vec<Vertex>, cam: &Camera, state: &RoundState, index: usize) {
    let obstacle = &state.obstacles[index];
    let Some(p) = cam.project(obstacle.pos) else {
        return;
    };
    let scale = obstacle.scale();
    let half_w = obstacle.size.x / 2.0 * scale * p.unit;
    let half_h = obstacle.size.y / 2.0 * scale * p.unit;

    match obstacle.kind {
        ObstacleKind::Building => {
            push_rect(out, cam, p.ndc, half_w, half_h, colors::BUILDING);
        }
        ObstacleKind::Tree => {
            // Trunk up from the base, canopy on top
            let trunk_h = 2.0 * scale * p.unit;
            let trunk_center = p.ndc + Vec2::new(0.0, trunk_h / 2.0);
            push_rect(
                out,
                cam,
                trunk_center,
                0.25 * scale * p.unit,
                trunk_h / 2.0,
                colors::TREE_TRUNK,
            );
            let canopy = p.ndc + Vec2::new(0.0, trunk_h);
            push_circle(out, cam, canopy, 1.5 * scale * p.unit, colors::TREE_FOLIAGE);
        }
        ObstacleKind::Sentinel => {
            let body_center = p.ndc + Vec2::new(0.0, half_h);
            push_rect(out, cam, body_center, half_w, half_h, colors::SENTINEL);
            let head = p.ndc + Vec2::new(0.0, 2.0 * half_h + 0.3 * scale * p.unit);
            push_circle(out, cam, head, 0.3 * scale * p.unit, colors::SENTINEL);
        }
    }
}

fn push_player(
    out: &mut Vec<Vertex>,
    cam: &Camera,
    state: &RoundState,
    tutorial: bool,
    model: Option<&PlayerModel>,
) {
    let Some(p) = cam.project(state.player.pos) else {
        return;
    };
    let color = if tutorial {
        colors::PLAYER_TUTORIAL
    } else {
        colors::PLAYER
    };
    if let Some(mesh) = model {
        push_player_mesh(out, cam, p, state, mesh, color);
        return;
    }
    let r = PLAYER_RADIUS * p.unit;
    push_circle(out, cam, p.ndc, r, color);

    // Nose marker banks with the turn and spins with the crash tumble
    let rot = state.player.rot;
    let lean = Vec2::new((rot.y * 2.0 + rot.z).sin(), (rot.x + rot.z).cos()) * r * 0.5;
    let dark = [color[0] * 0.5, color[1] * 0.5, color[2] * 0.5, 1.0];
    push_circle(out, cam, p.ndc + lean, r * 0.35, dark);
}

/// Loaded mesh silhouette: model-space triangles scaled into the player's
/// screen slot, shaded by the surface v coordinate and spun by the crash
/// tumble.
fn push_player_mesh(
    out: &mut Vec<Vertex>,
    cam: &Camera,
    p: Projected,
    state: &RoundState,
    mesh: &PlayerModel,
    color: [f32; 4],
) {
    let r = PLAYER_RADIUS * p.unit / mesh.half_extent();
    let (sin, cos) = state.player.rot.z.sin_cos();
    for (tri, uvs) in mesh.positions.chunks_exact(3).zip(mesh.uvs.chunks_exact(3)) {
        for (v, uv) in tri.iter().zip(uvs) {
            let x = v[0] * cos - v[1] * sin;
            let y = v[0] * sin + v[1] * cos;
            let shade = 0.7 + 0.3 * uv[1].clamp(0.0, 1.0);
            let c = [color[0] * shade, color[1] * shade, color[2] * shade, color[3]];
            out.push(Vertex::new(p.ndc.x + x * r / cam.aspect, p.ndc.y + y * r, c));
        }
    }
}

fn push_particles(out: &mut Vec<Vertex>, cam: &Camera, state: &RoundState) {
    for particle in &state.particles {
        let Some(p) = cam.project(particle.pos) else {
            continue;
        };
        let mut color = match particle.kind {
            ParticleKind::Explosion => colors::EXPLOSION,
            ParticleKind::Ember { orange: true } => colors::EMBER_ORANGE,
            ParticleKind::Ember { orange: false } => colors::EMBER_CYAN,
        };
        color[3] = particle.life.clamp(0.0, 1.0);
        let half = particle.size * particle.life * p.unit;
        push_rect(out, cam, p.ndc, half, half, color);
    }
}

fn push_quad(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(c.x, c.y, color));
    out.push(Vertex::new(d.x, d.y, color));
}

/// Axis-aligned rect around `center`. Sizes are in vertical NDC units; the
/// horizontal axis is corrected for aspect.
fn push_rect(
    out: &mut Vec<Vertex>,
    cam: &Camera,
    center: Vec2,
    half_w: f32,
    half_h: f32,
    color: [f32; 4],
) {
    let hw = half_w / cam.aspect;
    push_quad(
        out,
        center + Vec2::new(-hw, -half_h),
        center + Vec2::new(hw, -half_h),
        center + Vec2::new(hw, half_h),
        center + Vec2::new(-hw, half_h),
        color,
    );
}

fn push_circle(out: &mut Vec<Vertex>, cam: &Camera, center: Vec2, radius: f32, color: [f32; 4]) {
    use std::f32::consts::TAU;
    for i in 0..CIRCLE_SEGMENTS {
        let a0 = i as f32 / CIRCLE_SEGMENTS as f32 * TAU;
        let a1 = (i + 1) as f32 / CIRCLE_SEGMENTS as f32 * TAU;
        let p0 = center + Vec2::new(a0.cos() * radius / cam.aspect, a0.sin() * radius);
        let p1 = center + Vec2::new(a1.cos() * radius / cam.aspect, a1.sin() * radius);
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(p0.x, p0.y, color));
        out.push(Vertex::new(p1.x, p1.y, color));
    }
}

fn push_annulus(
    out: &mut Vec<Vertex>,
    cam: &Camera,
    center: Vec2,
    inner: f32,
    outer: f32,
    color: [f32; 4],
) {
    use std::f32::consts::TAU;
    for i in 0..RING_SEGMENTS {
        let a0 = i as f32 / RING_SEGMENTS as f32 * TAU;
        let a1 = (i + 1) as f32 / RING_SEGMENTS as f32 * TAU;
        let dir0 = Vec2::new(a0.cos(), a0.sin());
        let dir1 = Vec2::new(a1.cos(), a1.sin());
        let squish = |d: Vec2, r: f32| center + Vec2::new(d.x * r / cam.aspect, d.y * r);
        push_quad(
            out,
            squish(dir0, inner),
            squish(dir0, outer),
            squish(dir1, outer),
            squish(dir1, inner),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_centers_the_origin() {
        let cam = Camera::new(DEFAULT_ASPECT);
        let p = cam.project(Vec3::ZERO).unwrap();
        assert!(p.ndc.length() < 1e-6);
    }

    #[test]
    fn points_behind_the_camera_are_culled() {
        let cam = Camera::new(DEFAULT_ASPECT);
        assert!(cam.project(Vec3::new(0.0, 0.0, CAMERA_DISTANCE + 1.0)).is_none());
    }

    #[test]
    fn deeper_points_project_smaller() {
        let cam = Camera::new(DEFAULT_ASPECT);
        let near = cam.project(Vec3::new(1.0, 0.0, 0.0)).unwrap();
        let far = cam.project(Vec3::new(1.0, 0.0, -50.0)).unwrap();
        assert!(far.unit < near.unit);
        assert!(far.ndc.x.abs() < near.ndc.x.abs());
    }

    #[test]
    fn splash_frame_is_just_the_ground() {
        let state = RoundState::new(1);
        let frame = build(&state, DEFAULT_ASPECT, None);
        assert_eq!(frame.len(), 6);
    }

    #[test]
    fn playing_frame_includes_the_player() {
        let mut state = RoundState::new(1);
        state.start_round();
        let frame = build(&state, DEFAULT_ASPECT, None);
        // Ground quad plus the player circle and nose marker at minimum
        assert!(frame.len() > 6 + CIRCLE_SEGMENTS * 3);
    }

    #[test]
    fn loaded_mesh_replaces_the_fallback_marker() {
        let mut state = RoundState::new(1);
        state.start_round();
        let model = PlayerModel::from_json(
            br#"{"positions": [
                [0.0, 1.0, 0.0], [1.0, -1.0, 0.0], [-1.0, -1.0, 0.0],
                [0.0, 1.0, 0.5], [1.0, 1.0, 0.5], [0.0, -1.0, 0.5]
            ]}"#,
        )
        .unwrap();

        // Ground quad plus the two mesh triangles
        let with_mesh = build(&state, DEFAULT_ASPECT, Some(&model));
        assert_eq!(with_mesh.len(), 6 + model.positions.len());

        // Without the asset the circle and nose marker draw instead
        let fallback = build(&state, DEFAULT_ASPECT, None);
        assert_eq!(fallback.len(), 6 + CIRCLE_SEGMENTS * 6);
    }

    #[test]
    fn frame_vertex_count_is_triangle_aligned() {
        let mut state = RoundState::new(5);
        state.start_round();
        for _ in 0..600 {
            crate::sim::tick(&mut state, &crate::sim::TickInput::default());
        }
        let frame = build(&state, DEFAULT_ASPECT, None);
        assert_eq!(frame.len() % 3, 0);
    }
}
