//! Error types for the showroom viewer

use thiserror::Error;

/// Main error type for the viewer
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("invalid canvas selector '{0}': expected '#<id>'")]
    InvalidSelector(String),

    #[error("drawing surface '{0}' not found in host")]
    SurfaceNotFound(String),

    #[error("Window error: {0}")]
    Window(String),

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("renderer has no GPU backend attached")]
    RendererDetached,

    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, ViewerError>;
