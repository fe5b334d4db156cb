pub mod context;
pub mod mesh;
pub mod pipeline;
#[cfg(test)]
pub mod recording;
pub mod shaders;

pub use context::{GlContext, GlowContext};
pub use mesh::VertexArray;
pub use pipeline::{DrawCall, Renderer, TriangleScene};
pub use shaders::{ShaderError, ShaderProgram, ShaderStage};
