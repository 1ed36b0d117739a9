//! WebGPU rendering module
//!
//! The simulation is projected to screen-space triangles on the CPU each
//! frame; the GPU side is a single passthrough pipeline.

pub mod pipeline;
pub mod scene;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
