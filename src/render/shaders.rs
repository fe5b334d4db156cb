// shaders.rs - Shader program build pipeline

use std::fmt;
use std::rc::Rc;

use log::{debug, error};
use thiserror::Error;

use crate::render::context::GlContext;

/// Size of the driver-side diagnostic buffer, terminator included.
///
/// Compiler and linker logs longer than `INFO_LOG_CAPACITY - 1` bytes are cut
/// off. This is a known limitation, not an error.
pub const INFO_LOG_CAPACITY: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// The step of the build pipeline an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Vertex,
    Fragment,
    Link,
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("{stage} shader compilation failed:\n{log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("Program linking failed:\n{log}")]
    Link { log: String },
    #[error("Failed to allocate {what}: {reason}")]
    Allocation { what: &'static str, reason: String },
}

impl ShaderError {
    /// `None` for allocation failures, which happen before any stage runs.
    pub fn stage(&self) -> Option<BuildStage> {
        match self {
            ShaderError::Compile { stage: ShaderStage::Vertex, .. } => Some(BuildStage::Vertex),
            ShaderError::Compile { stage: ShaderStage::Fragment, .. } => Some(BuildStage::Fragment),
            ShaderError::Link { .. } => Some(BuildStage::Link),
            ShaderError::Allocation { .. } => None,
        }
    }

    pub fn log(&self) -> Option<&str> {
        match self {
            ShaderError::Compile { log, .. } | ShaderError::Link { log } => Some(log),
            ShaderError::Allocation { .. } => None,
        }
    }
}

/// Cuts a diagnostic log down to what fits in `INFO_LOG_CAPACITY`.
pub fn truncate_info_log(mut log: String) -> String {
    let limit = INFO_LOG_CAPACITY - 1;
    if log.len() > limit {
        let mut end = limit;
        while !log.is_char_boundary(end) {
            end -= 1;
        }
        log.truncate(end);
    }
    log
}

/// A compiled shader object, deleted when it goes out of scope.
struct CompiledShader<'a, G: GlContext> {
    gl: &'a G,
    id: G::Shader,
}

impl<'a, G: GlContext> CompiledShader<'a, G> {
    fn compile(gl: &'a G, stage: ShaderStage, source: &str) -> Result<Self, ShaderError> {
        let id = gl
            .create_shader(stage)
            .map_err(|reason| ShaderError::Allocation { what: "shader object", reason })?;
        let shader = Self { gl, id };

        if !gl.compile_shader(id, source) {
            let log = truncate_info_log(gl.shader_info_log(id));
            error!("{} shader compilation failed: {}", stage, log);
            return Err(ShaderError::Compile { stage, log });
        }

        Ok(shader)
    }
}

impl<G: GlContext> Drop for CompiledShader<'_, G> {
    fn drop(&mut self) {
        self.gl.delete_shader(self.id);
    }
}

/// A linked shader program, owned for as long as it is drawn with.
pub struct ShaderProgram<G: GlContext> {
    gl: Rc<G>,
    id: G::Program,
}

impl<G: GlContext> ShaderProgram<G> {
    /// Compiles both stages and links them.
    ///
    /// Stops at the first failing stage: a vertex failure never compiles the
    /// fragment stage, and no link is attempted unless both compiled. The
    /// intermediate shader objects are released on every path.
    pub fn build(gl: Rc<G>, vertex_src: &str, fragment_src: &str) -> Result<Self, ShaderError> {
        let vertex = CompiledShader::compile(&*gl, ShaderStage::Vertex, vertex_src)?;
        let fragment = CompiledShader::compile(&*gl, ShaderStage::Fragment, fragment_src)?;

        let id = gl
            .create_program()
            .map_err(|reason| ShaderError::Allocation { what: "program object", reason })?;
        let program = Self { gl: Rc::clone(&gl), id };

        gl.attach_shader(id, vertex.id);
        gl.attach_shader(id, fragment.id);
        let linked = gl.link_program(id);
        gl.detach_shader(id, vertex.id);
        gl.detach_shader(id, fragment.id);

        if !linked {
            let log = truncate_info_log(gl.program_info_log(id));
            error!("Shader program linking failed: {}", log);
            return Err(ShaderError::Link { log });
        }

        debug!("Shader program {:?} linked", id);
        Ok(program)
    }

    pub fn id(&self) -> G::Program {
        self.id
    }

    pub fn set_used(&self) {
        self.gl.use_program(Some(self.id));
    }
}

impl<G: GlContext> Drop for ShaderProgram<G> {
    fn drop(&mut self) {
        self.gl.delete_program(self.id);
    }
}

// Shaders for the flat-colored triangle
pub mod triangle_shaders {
    pub const VERTEX_SRC: &str = r#"#version 330 core
layout (location = 0) in vec3 aPos;

void main()
{
    gl_Position = vec4(aPos.x, aPos.y, aPos.z, 1.0);
}
"#;

    pub const FRAGMENT_SRC: &str = r#"#version 330 core
out vec4 FragColor;

void main()
{
    FragColor = vec4(1.0, 0.5, 0.2, 1.0);
}
"#;
}
