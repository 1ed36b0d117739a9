//! Player character model loading
//!
//! The model ships as a small JSON mesh (positions plus a UV table). A
//! missing or malformed UV table is repaired in place with a spherical
//! projection instead of failing the round; only structurally broken mesh
//! data is a hard error.

use anyhow::{Context, Result, bail};
use glam::Vec3;
use serde::Deserialize;

/// Decoded player mesh, ready for upload
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerModel {
    pub positions: Vec<[f32; 3]>,
    #[serde(default)]
    pub uvs: Vec<[f32; 2]>,
}

impl PlayerModel {
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let mut model: PlayerModel =
            serde_json::from_slice(bytes).context("player model is not valid mesh JSON")?;
        if model.positions.is_empty() {
            bail!("player model has no vertices");
        }
        if !uvs_usable(&model.uvs, model.positions.len()) {
            log::warn!("player model has an unusable UV table, regenerating spherical projection");
            model.uvs = spherical_uvs(&model.positions);
        }
        Ok(model)
    }

    /// Largest coordinate magnitude, used to scale the mesh into world units
    pub fn half_extent(&self) -> f32 {
        self.positions
            .iter()
            .flat_map(|p| p.iter())
            .fold(f32::EPSILON, |m, c| m.max(c.abs()))
    }
}

fn uvs_usable(uvs: &[[f32; 2]], vertex_count: usize) -> bool {
    uvs.len() == vertex_count && uvs.iter().all(|uv| uv.iter().all(|c| c.is_finite()))
}

/// Project each vertex through the mesh centroid onto a sphere
pub fn spherical_uvs(positions: &[[f32; 3]]) -> Vec<[f32; 2]> {
    use std::f32::consts::{PI, TAU};

    let centroid = positions
        .iter()
        .fold(Vec3::ZERO, |acc, p| acc + Vec3::from_array(*p))
        / positions.len().max(1) as f32;

    positions
        .iter()
        .map(|p| {
            let d = (Vec3::from_array(*p) - centroid).normalize_or_zero();
            if d == Vec3::ZERO {
                return [0.5, 0.5];
            }
            let u = 0.5 + d.z.atan2(d.x) / TAU;
            let v = 0.5 - d.y.clamp(-1.0, 1.0).asin() / PI;
            [u, v]
        })
        .collect()
}

/// Fetch and decode the model over HTTP. Runs alongside the round; the
/// caller decides what a failure means.
#[cfg(target_arch = "wasm32")]
pub async fn fetch_player_model(url: &str) -> Result<PlayerModel> {
    use anyhow::anyhow;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let window = web_sys::window().ok_or_else(|| anyhow!("no window"))?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| anyhow!("model fetch failed: {e:?}"))?;
    let response: web_sys::Response = response
        .dyn_into()
        .map_err(|_| anyhow!("fetch returned a non-Response value"))?;
    if !response.ok() {
        bail!("model request failed with status {}", response.status());
    }
    let buffer = JsFuture::from(
        response
            .array_buffer()
            .map_err(|e| anyhow!("array_buffer unavailable: {e:?}"))?,
    )
    .await
    .map_err(|e| anyhow!("model body read failed: {e:?}"))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    PlayerModel::from_json(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_model_passes_through_untouched() {
        let json = br#"{
            "positions": [[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [-1.0, 0.0, 0.0]],
            "uvs": [[0.5, 0.0], [1.0, 1.0], [0.0, 1.0]]
        }"#;
        let model = PlayerModel::from_json(json).unwrap();
        assert_eq!(model.positions.len(), 3);
        assert_eq!(model.uvs, vec![[0.5, 0.0], [1.0, 1.0], [0.0, 1.0]]);
    }

    #[test]
    fn missing_uvs_are_regenerated() {
        let json = br#"{"positions": [[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [-1.0, 0.0, 0.0]]}"#;
        let model = PlayerModel::from_json(json).unwrap();
        assert_eq!(model.uvs.len(), model.positions.len());
    }

    #[test]
    fn non_finite_uvs_are_regenerated() {
        let json = br#"{
            "positions": [[0.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
            "uvs": [[0.5, null], [1.0, 1.0]]
        }"#;
        // null is not a float, so deserialization fails outright
        assert!(PlayerModel::from_json(json).is_err());

        let mut model = PlayerModel {
            positions: vec![[0.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
            uvs: vec![[f32::NAN, 0.0], [1.0, 1.0]],
        };
        assert!(!uvs_usable(&model.uvs, model.positions.len()));
        model.uvs = spherical_uvs(&model.positions);
        assert!(uvs_usable(&model.uvs, model.positions.len()));
    }

    #[test]
    fn half_extent_tracks_the_widest_axis() {
        let model = PlayerModel {
            positions: vec![[0.5, -3.0, 1.0], [1.0, 0.0, 0.0]],
            uvs: vec![],
        };
        assert_eq!(model.half_extent(), 3.0);
    }

    #[test]
    fn malformed_json_is_a_hard_error() {
        assert!(PlayerModel::from_json(b"not json").is_err());
        assert!(PlayerModel::from_json(br#"{"positions": []}"#).is_err());
    }

    #[test]
    fn spherical_uvs_stay_in_unit_range() {
        let positions = vec![
            [0.0, 2.0, 0.0],
            [1.0, -1.0, 1.0],
            [-1.0, -1.0, 1.0],
            [0.0, -1.0, -1.5],
        ];
        for uv in spherical_uvs(&positions) {
            assert!((0.0..=1.0).contains(&uv[0]), "u out of range: {}", uv[0]);
            assert!((0.0..=1.0).contains(&uv[1]), "v out of range: {}", uv[1]);
        }
    }
}
