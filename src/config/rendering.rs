use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// RGBA background the color buffer is cleared to every frame.
    pub clear_color: [f32; 4],
    /// Off renders the blank window only; no shaders are built.
    pub draw_triangle: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.2, 0.3, 0.3, 1.0],
            draw_triangle: true,
        }
    }
}
