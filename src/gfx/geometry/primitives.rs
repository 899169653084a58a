//! # Primitive Shape Generation
//!
//! Y-up primitives centered at the origin, with outward normals and
//! counter-clockwise front faces.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a box centered at the origin
///
/// Each face gets its own four vertices so normals stay flat.
pub fn generate_cuboid(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();
    let (x, y, z) = (width * 0.5, height * 0.5, depth * 0.5);

    #[rustfmt::skip]
    let faces: [([[f32; 3]; 4], [f32; 3]); 6] = [
        // Front (+Z)
        ([[-x, -y,  z], [ x, -y,  z], [ x,  y,  z], [-x,  y,  z]], [0.0, 0.0, 1.0]),
        // Back (-Z)
        ([[-x, -y, -z], [-x,  y, -z], [ x,  y, -z], [ x, -y, -z]], [0.0, 0.0, -1.0]),
        // Left (-X)
        ([[-x, -y, -z], [-x, -y,  z], [-x,  y,  z], [-x,  y, -z]], [-1.0, 0.0, 0.0]),
        // Right (+X)
        ([[ x, -y,  z], [ x, -y, -z], [ x,  y, -z], [ x,  y,  z]], [1.0, 0.0, 0.0]),
        // Top (+Y)
        ([[-x,  y,  z], [ x,  y,  z], [ x,  y, -z], [-x,  y, -z]], [0.0, 1.0, 0.0]),
        // Bottom (-Y)
        ([[-x, -y, -z], [ x, -y, -z], [ x, -y,  z], [-x, -y,  z]], [0.0, -1.0, 0.0]),
    ];

    for (corners, normal) in faces {
        let first = data.push_vertex(corners[0], normal);
        for corner in &corners[1..] {
            data.push_vertex(*corner, normal);
        }
        data.push_triangle(first, first + 1, first + 2);
        data.push_triangle(first + 2, first + 3, first);
    }

    data
}

/// Generate a UV sphere with specified resolution
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `width_segments` - Number of longitude segments (at least 3)
/// * `height_segments` - Number of latitude segments (at least 2)
pub fn generate_sphere(radius: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = width_segments.max(3);
    let lat_segs = height_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 to PI
        let (sin_theta, cos_theta) = theta.sin_cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32; // 0 to 2*PI
            let (sin_phi, cos_phi) = phi.sin_cos();

            let normal = [sin_theta * cos_phi, cos_theta, sin_theta * sin_phi];
            data.push_vertex(normal.map(|n| n * radius), normal);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            // Pole rows collapse to a point; skip their degenerate halves
            if lat != 0 {
                data.push_triangle(first, first + 1, second);
            }
            if lat != lat_segs - 1 {
                data.push_triangle(second, first + 1, second + 1);
            }
        }
    }

    data
}

/// Generate a capped cylinder along the Y axis
///
/// A zero `radius_top` yields a cone: the apex gets no cap and no
/// degenerate side triangles.
///
/// # Arguments
/// * `radius_top` - Radius at `+height/2`
/// * `radius_bottom` - Radius at `-height/2`
/// * `height` - Extent along Y
/// * `segments` - Number of radial segments (at least 3)
pub fn generate_cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = segments.max(3);
    let half_height = height * 0.5;
    let slope = (radius_bottom - radius_top) / height;
    let has_top = radius_top > 0.0;
    let has_bottom = radius_bottom > 0.0;

    // Side vertices, bottom/top pairs
    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        let normal = normalize([cos_a, slope, sin_a]);

        data.push_vertex([radius_bottom * cos_a, -half_height, radius_bottom * sin_a], normal);
        data.push_vertex([radius_top * cos_a, half_height, radius_top * sin_a], normal);
    }

    for i in 0..segs {
        let bottom_current = i * 2;
        let top_current = bottom_current + 1;
        let bottom_next = bottom_current + 2;
        let top_next = bottom_next + 1;

        if has_bottom {
            data.push_triangle(bottom_current, top_current, bottom_next);
        }
        if has_top {
            data.push_triangle(top_current, top_next, bottom_next);
        }
    }

    if has_top {
        push_cap(&mut data, radius_top, half_height, segs, true);
    }
    if has_bottom {
        push_cap(&mut data, radius_bottom, -half_height, segs, false);
    }

    data
}

/// Triangle fan closing one end of a cylinder
fn push_cap(data: &mut GeometryData, radius: f32, y: f32, segs: u32, top: bool) {
    let normal = if top { [0.0, 1.0, 0.0] } else { [0.0, -1.0, 0.0] };
    let center = data.push_vertex([0.0, y, 0.0], normal);
    let ring_start = data.vertices.len() as u32;

    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        data.push_vertex([radius * cos_a, y, radius * sin_a], normal);
    }

    for i in 0..segs {
        let current = ring_start + i;
        if top {
            data.push_triangle(center, current + 1, current);
        } else {
            data.push_triangle(center, current, current + 1);
        }
    }
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let length = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if length == 0.0 {
        return v;
    }
    v.map(|c| c / length)
}
