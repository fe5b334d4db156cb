use std::mem::size_of;
use std::rc::Rc;

use glam::Vec3;

use crate::error::{AppError, Result};
use crate::render::context::GlContext;

/// Attribute location of `aPos` in the triangle vertex shader.
pub const POSITION_LOCATION: u32 = 0;

pub const TRIANGLE_VERTICES: [Vec3; 3] = [
    Vec3::new(-0.5, -0.5, 0.0),
    Vec3::new(0.5, -0.5, 0.0),
    Vec3::new(0.0, 0.5, 0.0),
];

/// Vertex positions uploaded once into GPU storage, with the vertex-array
/// object describing them. Both objects are released on drop.
pub struct VertexArray<G: GlContext> {
    gl: Rc<G>,
    vao: G::VertexArray,
    vbo: G::Buffer,
    vertex_count: i32,
}

impl<G: GlContext> VertexArray<G> {
    pub fn from_positions(gl: Rc<G>, positions: &[Vec3]) -> Result<Self> {
        let vertex_count = i32::try_from(positions.len())
            .map_err(|_| AppError::Resource(format!("too many vertices: {}", positions.len())))?;

        let vao = gl
            .create_vertex_array()
            .map_err(|e| AppError::Resource(format!("vertex array: {e}")))?;
        let vbo = match gl.create_buffer() {
            Ok(vbo) => vbo,
            Err(e) => {
                gl.delete_vertex_array(vao);
                return Err(AppError::Resource(format!("vertex buffer: {e}")));
            }
        };

        // Bind the vertex array first so it captures the buffer and attribute layout.
        gl.bind_vertex_array(Some(vao));
        gl.upload_array_buffer(vbo, bytemuck::cast_slice(positions));
        gl.enable_float_attribute(POSITION_LOCATION, 3, size_of::<Vec3>() as i32, 0);
        gl.bind_vertex_array(None);

        Ok(Self {
            gl,
            vao,
            vbo,
            vertex_count,
        })
    }

    pub fn vertex_count(&self) -> i32 {
        self.vertex_count
    }

    pub fn bind(&self) {
        self.gl.bind_vertex_array(Some(self.vao));
    }
}

impl<G: GlContext> Drop for VertexArray<G> {
    fn drop(&mut self) {
        self.gl.delete_vertex_array(self.vao);
        self.gl.delete_buffer(self.vbo);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::{GlCall, RecordingGl};

    #[test]
    fn test_triangle_upload_layout() {
        let gl = Rc::new(RecordingGl::new());
        let vertices = VertexArray::from_positions(Rc::clone(&gl), &TRIANGLE_VERTICES).unwrap();

        assert_eq!(vertices.vertex_count(), 3);
        assert_eq!(
            gl.calls(),
            vec![
                GlCall::CreateVertexArray(1),
                GlCall::CreateBuffer(2),
                GlCall::BindVertexArray(Some(1)),
                GlCall::UploadArrayBuffer { buffer: 2, bytes: 36 },
                GlCall::EnableFloatAttribute { location: 0, components: 3, stride: 12, offset: 0 },
                GlCall::BindVertexArray(None),
            ]
        );
    }

    #[test]
    fn test_drop_releases_both_objects() {
        let gl = Rc::new(RecordingGl::new());
        let vertices = VertexArray::from_positions(Rc::clone(&gl), &TRIANGLE_VERTICES).unwrap();
        gl.clear_calls();

        drop(vertices);
        assert_eq!(gl.calls(), vec![GlCall::DeleteVertexArray(1), GlCall::DeleteBuffer(2)]);
    }

    #[test]
    fn test_allocation_failure_is_resource_error() {
        let gl = Rc::new(RecordingGl::new().exhausted());
        let result = VertexArray::from_positions(gl, &TRIANGLE_VERTICES);
        assert!(matches!(result, Err(AppError::Resource(_))));
    }

    #[test]
    fn test_empty_upload_has_no_vertices() {
        let gl = Rc::new(RecordingGl::new());
        let vertices = VertexArray::from_positions(gl, &[]).unwrap();
        assert_eq!(vertices.vertex_count(), 0);
    }
}
