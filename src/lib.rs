// src/lib.rs
//! Showroom
//!
//! A native product viewer built on wgpu and winit: a chair with a
//! decorative flower over a starfield, with a perspective camera and damped
//! orbit controls.
//!
//! [`viewer::Viewer::initialize`] bootstraps the scene, camera, renderer and
//! controls against a [`host::Host`]; [`product::create_product`] adds the
//! chair and flower to the scene; [`app::ShowroomApp`] drives both in a
//! window.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod host;
pub mod prelude;
pub mod product;
pub mod viewer;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::ShowroomApp;
pub use error::{Result, ViewerError};
pub use viewer::Viewer;

/// Runs the stock showroom in a window
pub fn run() -> Result<()> {
    ShowroomApp::new(config::ViewerConfig::default())?.run()
}
