//! A `GlContext` that records calls instead of talking to a driver.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::render::context::GlContext;
use crate::render::shaders::ShaderStage;

#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CreateShader(ShaderStage, u32),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    AttachShader(u32, u32),
    DetachShader(u32, u32),
    LinkProgram(u32),
    UseProgram(Option<u32>),
    DeleteProgram(u32),
    CreateVertexArray(u32),
    BindVertexArray(Option<u32>),
    DeleteVertexArray(u32),
    CreateBuffer(u32),
    UploadArrayBuffer { buffer: u32, bytes: usize },
    DeleteBuffer(u32),
    EnableFloatAttribute { location: u32, components: i32, stride: i32, offset: i32 },
    ClearColorBuffer([f32; 4]),
    DrawTriangles(i32, i32),
    Viewport(i32, i32, i32, i32),
}

#[derive(Default)]
pub struct RecordingGl {
    calls: RefCell<Vec<GlCall>>,
    next_name: Cell<u32>,
    stages: RefCell<HashMap<u32, ShaderStage>>,
    compile_failure: Option<(ShaderStage, String)>,
    link_failure: Option<String>,
    exhausted: bool,
}

impl RecordingGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiling any shader of `stage` fails with `log`.
    pub fn failing_compile(mut self, stage: ShaderStage, log: &str) -> Self {
        self.compile_failure = Some((stage, log.to_string()));
        self
    }

    pub fn failing_link(mut self, log: &str) -> Self {
        self.link_failure = Some(log.to_string());
        self
    }

    /// Every object creation fails, as if the driver ran out of names.
    pub fn exhausted(mut self) -> Self {
        self.exhausted = true;
        self
    }

    pub fn calls(&self) -> Vec<GlCall> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&GlCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| pred(*call)).count()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: GlCall) {
        self.calls.borrow_mut().push(call);
    }

    fn allocate(&self) -> Result<u32, String> {
        if self.exhausted {
            return Err("no object names left".to_string());
        }
        let name = self.next_name.get() + 1;
        self.next_name.set(name);
        Ok(name)
    }
}

impl GlContext for RecordingGl {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type VertexArray = u32;

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let name = self.allocate()?;
        self.stages.borrow_mut().insert(name, stage);
        self.record(GlCall::CreateShader(stage, name));
        Ok(name)
    }

    fn compile_shader(&self, shader: u32, _source: &str) -> bool {
        self.record(GlCall::CompileShader(shader));
        let stage = self.stages.borrow().get(&shader).copied();
        !matches!(&self.compile_failure, Some((failing, _)) if Some(*failing) == stage)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        let stage = self.stages.borrow().get(&shader).copied();
        match &self.compile_failure {
            Some((failing, log)) if Some(*failing) == stage => log.clone(),
            _ => String::new(),
        }
    }

    fn delete_shader(&self, shader: u32) {
        self.record(GlCall::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<u32, String> {
        let name = self.allocate()?;
        self.record(GlCall::CreateProgram(name));
        Ok(name)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.record(GlCall::AttachShader(program, shader));
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        self.record(GlCall::DetachShader(program, shader));
    }

    fn link_program(&self, program: u32) -> bool {
        self.record(GlCall::LinkProgram(program));
        self.link_failure.is_none()
    }

    fn program_info_log(&self, _program: u32) -> String {
        self.link_failure.clone().unwrap_or_default()
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(GlCall::UseProgram(program));
    }

    fn delete_program(&self, program: u32) {
        self.record(GlCall::DeleteProgram(program));
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        let name = self.allocate()?;
        self.record(GlCall::CreateVertexArray(name));
        Ok(name)
    }

    fn bind_vertex_array(&self, vertex_array: Option<u32>) {
        self.record(GlCall::BindVertexArray(vertex_array));
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        self.record(GlCall::DeleteVertexArray(vertex_array));
    }

    fn create_buffer(&self) -> Result<u32, String> {
        let name = self.allocate()?;
        self.record(GlCall::CreateBuffer(name));
        Ok(name)
    }

    fn upload_array_buffer(&self, buffer: u32, data: &[u8]) {
        self.record(GlCall::UploadArrayBuffer { buffer, bytes: data.len() });
    }

    fn delete_buffer(&self, buffer: u32) {
        self.record(GlCall::DeleteBuffer(buffer));
    }

    fn enable_float_attribute(&self, location: u32, components: i32, stride: i32, offset: i32) {
        self.record(GlCall::EnableFloatAttribute { location, components, stride, offset });
    }

    fn clear_color_buffer(&self, color: [f32; 4]) {
        self.record(GlCall::ClearColorBuffer(color));
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        self.record(GlCall::DrawTriangles(first, count));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(GlCall::Viewport(x, y, width, height));
    }
}
