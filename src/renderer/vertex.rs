//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements. The tutorial section runs desaturated; the
/// live section switches to the full palette.
pub mod colors {
    pub const RING: [f32; 4] = [0.13, 0.65, 0.25, 0.92];
    pub const RING_TUTORIAL: [f32; 4] = [0.05, 0.05, 0.05, 0.92];
    pub const PLAYER: [f32; 4] = [0.95, 0.78, 0.55, 1.0];
    pub const PLAYER_TUTORIAL: [f32; 4] = [0.6, 0.6, 0.6, 1.0];
    pub const BUILDING: [f32; 4] = [0.55, 0.45, 0.35, 1.0];
    pub const TREE_TRUNK: [f32; 4] = [0.45, 0.3, 0.15, 1.0];
    pub const TREE_FOLIAGE: [f32; 4] = [0.1, 0.5, 0.15, 1.0];
    pub const SENTINEL: [f32; 4] = [0.8, 0.2, 0.2, 1.0];
    pub const GROUND: [f32; 4] = [0.45, 0.75, 0.4, 1.0];
    pub const GROUND_TUTORIAL: [f32; 4] = [0.42, 0.42, 0.45, 1.0];
    pub const EMBER_ORANGE: [f32; 4] = [1.0, 0.67, 0.0, 1.0];
    pub const EMBER_CYAN: [f32; 4] = [0.0, 0.87, 1.0, 1.0];
    pub const EXPLOSION: [f32; 4] = [1.0, 0.45, 0.1, 1.0];

    /// Clear colors (sky)
    pub const SKY: wgpu::Color = wgpu::Color {
        r: 0.35,
        g: 0.62,
        b: 0.85,
        a: 1.0,
    };
    pub const SKY_TUTORIAL: wgpu::Color = wgpu::Color {
        r: 0.10,
        g: 0.10,
        b: 0.12,
        a: 1.0,
    };
}
