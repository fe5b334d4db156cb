use std::rc::Rc;

use log::{debug, info};

use crate::config::RenderConfig;
use crate::error::Result;
use crate::render::context::GlContext;
use crate::render::mesh::{VertexArray, TRIANGLE_VERTICES};
use crate::render::shaders::{triangle_shaders, ShaderProgram};

/// What to draw on top of the cleared frame.
pub struct DrawCall<'a, G: GlContext> {
    pub program: &'a ShaderProgram<G>,
    pub vertices: &'a VertexArray<G>,
}

impl<G: GlContext> Clone for DrawCall<'_, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G: GlContext> Copy for DrawCall<'_, G> {}

pub struct Renderer<G: GlContext> {
    gl: Rc<G>,
    clear_color: [f32; 4],
}

impl<G: GlContext> Renderer<G> {
    pub fn new(gl: Rc<G>, config: &RenderConfig) -> Self {
        Self {
            gl,
            clear_color: config.clear_color,
        }
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    /// Clears the frame and issues at most one triangle draw.
    ///
    /// Never blocks; presenting the frame is left to the caller.
    pub fn render_frame(&self, draw: Option<DrawCall<'_, G>>) {
        self.gl.clear_color_buffer(self.clear_color);

        if let Some(DrawCall { program, vertices }) = draw {
            if vertices.vertex_count() > 0 {
                program.set_used();
                vertices.bind();
                self.gl.draw_triangles(0, vertices.vertex_count());
            }
        }
    }

    /// Maps rendering output onto the whole `width` x `height` window.
    pub fn resize_viewport(&self, width: u32, height: u32) {
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        let height = i32::try_from(height).unwrap_or(i32::MAX);
        debug!("Viewport resized to {}x{}", width, height);
        self.gl.viewport(0, 0, width, height);
    }
}

/// The flat-colored triangle: its program and uploaded vertices.
pub struct TriangleScene<G: GlContext> {
    program: ShaderProgram<G>,
    vertices: VertexArray<G>,
}

impl<G: GlContext> TriangleScene<G> {
    pub fn new(gl: Rc<G>) -> Result<Self> {
        let program = ShaderProgram::build(
            Rc::clone(&gl),
            triangle_shaders::VERTEX_SRC,
            triangle_shaders::FRAGMENT_SRC,
        )?;
        let vertices = VertexArray::from_positions(gl, &TRIANGLE_VERTICES)?;
        info!("Triangle scene ready ({} vertices)", vertices.vertex_count());

        Ok(Self { program, vertices })
    }

    pub fn draw_call(&self) -> DrawCall<'_, G> {
        DrawCall {
            program: &self.program,
            vertices: &self.vertices,
        }
    }
}
