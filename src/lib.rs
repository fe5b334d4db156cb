pub mod config;
pub mod error;
pub mod input;
pub mod render;

// Re-export commonly used types
pub use config::{AppConfig, RenderConfig, WindowConfig};
pub use error::{AppError, Result};
pub use input::InputState;
pub use render::{
    DrawCall, GlContext, GlowContext, Renderer, ShaderError, ShaderProgram, ShaderStage,
    TriangleScene, VertexArray,
};
