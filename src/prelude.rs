//! # Showroom Prelude
//!
//! Commonly used types in one import:
//!
//! ```rust
//! use showroom::prelude::*;
//!
//! let mut host = HeadlessHost::new(1280.0, 720.0, 1.0).with_surface("viewerCanvas");
//! let mut viewer = Viewer::initialize(&mut host, &ViewerConfig::default()).unwrap();
//! let product = create_product(&mut viewer.scene);
//! assert!(viewer.scene.node(product).is_some());
//! ```

// Application and bootstrap
pub use crate::app::{ShowroomApp, WindowHost};
pub use crate::config::{
    CameraConfig, ControlsConfig, RendererConfig, StarfieldConfig, ViewerConfig,
};
pub use crate::error::{Result, ViewerError};
pub use crate::host::{CanvasSelector, HeadlessHost, Host, SurfaceHandle, Viewport};
pub use crate::product::create_product;
pub use crate::viewer::{ResizeListener, Viewer};

// Scene graph
pub use crate::gfx::geometry::Geometry;
pub use crate::gfx::resources::{Color, LightConfig, Material, PointsMaterial};
pub use crate::gfx::scene::{
    AnimationDescriptor, Node, NodeId, NodeKind, Points, Scene, Transform,
};

// Camera and rendering
pub use crate::gfx::camera::{OrbitControls, PerspectiveCamera};
pub use crate::gfx::rendering::{EngineSettings, RenderEngine, Renderer};

// Math
pub use cgmath::{Deg, Matrix4, Point3, Rad, Vector3};
