// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Handles render pipelines, per-node GPU resources, and frame rendering.

pub mod node_resources;
pub mod pipeline_manager;
pub mod render_engine;
pub mod renderer;

// Re-export main types
pub use pipeline_manager::{PipelineConfig, PipelineManager, PipelineStats};
pub use render_engine::{EngineSettings, RenderEngine};
pub use renderer::{Renderer, ShadowMapSettings};
