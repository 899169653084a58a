//! # Scene Management Module
//!
//! The scene graph the renderer draws: a [`Scene`] holding [`Node`] trees,
//! where every node is a group, a mesh leaf or a point cloud leaf.
//!
//! ## Key Components
//!
//! - [`Scene`] - Root container owning top-level nodes and materials
//! - [`Node`] / [`NodeKind`] - Tagged scene graph node with uniform traversal
//! - [`Transform`] - Local position, Euler rotation and scale
//! - [`Points`] - Flat point buffers such as the starfield
//! - [`Vertex3D`] - GPU vertex format for meshes
//!
//! ## Usage
//!
//! ```no_run
//! use showroom::gfx::geometry::Geometry;
//! use showroom::gfx::scene::{Node, Scene};
//!
//! let mut scene = Scene::new();
//! let mut group = Node::group("Table");
//! group
//!     .add(Node::mesh("Top", Geometry::cuboid(2.0, 0.1, 1.0), "Default"))
//!     .ok();
//! scene.add(group);
//! assert!(scene.find_by_name("Top").is_some());
//! ```

pub mod node;
pub mod points;
pub mod scene;
pub mod transform;
pub mod vertex;

// Re-export main types
pub use node::{AnimationDescriptor, Group, Mesh, Node, NodeId, NodeKind, UserData};
pub use points::Points;
pub use scene::{Scene, SceneStatistics};
pub use transform::Transform;
pub use vertex::Vertex3D;
