//! # Procedural Geometry Generation
//!
//! Primitive shapes are described by a [`Geometry`] value and tessellated into
//! [`GeometryData`] when a mesh is uploaded to the GPU, so the scene graph
//! stays cheap to build and inspect.
//!
//! ## Supported Primitives
//!
//! - **Cuboid**: box with independent width, height and depth
//! - **Cylinder**: open-ended tube with caps, separate top and bottom radii
//! - **Cone**: cylinder with a zero top radius
//! - **Sphere**: UV sphere with configurable resolution
//!
//! All shapes are Y-up and centered at the local origin.
//!
//! ## Usage
//!
//! ```rust
//! use showroom::gfx::geometry::Geometry;
//!
//! let leg = Geometry::cylinder(0.1, 0.1, 1.0, 8);
//! let data = leg.tessellate();
//! assert_eq!(data.vertex_count(), data.normals.len());
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Shape descriptor of a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Cuboid {
        width: f32,
        height: f32,
        depth: f32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
    Cone {
        radius: f32,
        height: f32,
        radial_segments: u32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
}

impl Geometry {
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Geometry::Cuboid {
            width,
            height,
            depth,
        }
    }

    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Self {
        Geometry::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments,
        }
    }

    pub fn cone(radius: f32, height: f32, radial_segments: u32) -> Self {
        Geometry::Cone {
            radius,
            height,
            radial_segments,
        }
    }

    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Geometry::Sphere {
            radius,
            width_segments,
            height_segments,
        }
    }

    /// Generates triangles for this shape
    pub fn tessellate(&self) -> GeometryData {
        match *self {
            Geometry::Cuboid {
                width,
                height,
                depth,
            } => generate_cuboid(width, height, depth),
            Geometry::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => generate_cylinder(radius_top, radius_bottom, height, radial_segments),
            Geometry::Cone {
                radius,
                height,
                radial_segments,
            } => generate_cylinder(0.0, radius, height, radial_segments),
            Geometry::Sphere {
                radius,
                width_segments,
                height_segments,
            } => generate_sphere(radius, width_segments, height_segments),
        }
    }

    /// Short human readable kind, used in logs and statistics
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Cuboid { .. } => "cuboid",
            Geometry::Cylinder { .. } => "cylinder",
            Geometry::Cone { .. } => "cone",
            Geometry::Sphere { .. } => "sphere",
        }
    }
}

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3]) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals.push(normal);
        index
    }

    fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Interleaves positions and normals into the renderer's vertex format
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        self.vertices
            .iter()
            .zip(&self.normals)
            .map(|(&position, &normal)| Vertex3D { position, normal })
            .collect()
    }
}
