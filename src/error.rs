use thiserror::Error;

use crate::render::shaders::{ShaderError, ShaderStage};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to create window: {0}")]
    WindowCreationFailed(String),

    #[error("Failed to load OpenGL functions: {0}")]
    ContextLoaderFailed(String),

    #[error("{stage} shader compilation failed:\n{log}")]
    ShaderCompileFailed { stage: ShaderStage, log: String },

    #[error("Shader program linking failed:\n{log}")]
    ShaderLinkFailed { log: String },

    #[error("GPU resource error: {0}")]
    Resource(String),

    #[error("Failed to present frame: {0}")]
    Presentation(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

impl From<ShaderError> for AppError {
    fn from(err: ShaderError) -> Self {
        match err {
            ShaderError::Compile { stage, log } => AppError::ShaderCompileFailed { stage, log },
            ShaderError::Link { log } => AppError::ShaderLinkFailed { log },
            ShaderError::Allocation { what, reason } => {
                AppError::Resource(format!("{what}: {reason}"))
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
