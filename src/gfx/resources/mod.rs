// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles textures, buffers, materials and bind groups for rendering.

pub mod global_bindings;
pub mod material;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{GlobalBindings, LightConfig};
pub use material::{Color, Material, MaterialId, MaterialManager, PointsMaterial};
pub use texture_resource::TextureResource;
