//! # Graphics Module
//!
//! Everything the showroom draws with: the scene graph, procedural geometry,
//! the perspective camera with orbit controls, GPU resources and the
//! renderer.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - Perspective camera and damped orbit controls
//! - **Geometry** ([`geometry`]) - Primitive shape descriptors and tessellation
//! - **Rendering Pipeline** ([`rendering`]) - PBR meshes, shadow mapping, point sprites
//! - **Scene Management** ([`scene`]) - Tagged node hierarchy and traversal
//! - **Resource Management** ([`resources`]) - Materials, textures and global uniforms
//!
//! ## Usage
//!
//! ```no_run
//! use showroom::gfx::{scene::Scene, PerspectiveCamera};
//!
//! let scene = Scene::new();
//! let mut camera = PerspectiveCamera::new(60.0, 16.0 / 9.0, 0.1, 1000.0);
//! camera.set_position(5.0, 5.0, 5.0);
//! // let engine = pollster::block_on(RenderEngine::new(window, 1280, 720, Default::default()))?;
//! ```

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::{OrbitControls, PerspectiveCamera};
pub use rendering::{RenderEngine, Renderer};
