//! Per-node GPU resources
//!
//! Each drawable node gets its own vertex data and an object uniform with
//! its world matrix. Resources are keyed by [`NodeId`] in the render engine
//! and rebuilt only when the node's shape changes.

use cgmath::Matrix4;
use wgpu::util::DeviceExt;

use crate::gfx::{
    geometry::Geometry,
    resources::material::{MaterialBindings, MaterialGpuResources, PointsMaterial},
    scene::points::Points,
};
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

/// Object uniform: world transform plus per-node flags
///
/// MUST match `Object` in the shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub receive_shadow: f32,
    pub _padding: [f32; 3],
}

impl ObjectUniform {
    pub fn new(model: Matrix4<f32>, receive_shadow: bool) -> Self {
        Self {
            model: model.into(),
            receive_shadow: if receive_shadow { 1.0 } else { 0.0 },
            _padding: [0.0; 3],
        }
    }
}

pub type ObjectUBO = UniformBuffer<ObjectUniform>;

/// Bind group 1 of every scene pipeline
pub fn object_bind_group_layout(device: &wgpu::Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_rendering(binding_types::uniform())
        .create(device, "Object Bind Group Layout")
}

pub struct ObjectBinding {
    ubo: ObjectUBO,
    bind_group: wgpu::BindGroup,
}

impl ObjectBinding {
    pub fn new(device: &wgpu::Device, layout: &BindGroupLayoutWithDesc, content: ObjectUniform) -> Self {
        let ubo = ObjectUBO::new_with_data(device, &content);
        let bind_group = BindGroupBuilder::new(layout)
            .resource(ubo.binding_resource())
            .create(device, "Object Bind Group");
        Self { ubo, bind_group }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, content: ObjectUniform) {
        self.ubo.update_content(queue, content);
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// Uploaded triangle mesh
pub struct MeshBuffers {
    geometry: Geometry,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    pub fn new(device: &wgpu::Device, geometry: Geometry) -> Self {
        let data = geometry.tessellate();
        let vertices = data.to_vertices();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "Uploaded {} mesh: {} vertices, {} triangles",
            geometry.kind(),
            data.vertex_count(),
            data.triangle_count()
        );

        Self {
            geometry,
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }
}

/// Uploaded point cloud: one instance per point
pub struct PointBuffers {
    instance_buffer: wgpu::Buffer,
    count: u32,
    material: MaterialGpuResources,
    material_source: PointsMaterial,
}

impl PointBuffers {
    pub fn new(device: &wgpu::Device, bindings: &MaterialBindings, points: &Points) -> Self {
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Instance Buffer"),
            contents: bytemuck::cast_slice(points.positions()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            instance_buffer,
            count: points.len() as u32,
            material: MaterialGpuResources::new(device, bindings, &points.material.to_uniform()),
            material_source: points.material,
        }
    }

    /// True when the GPU copy no longer describes `points`
    pub fn is_stale(&self, points: &Points) -> bool {
        self.count as usize != points.len()
    }

    pub fn update_material(&mut self, queue: &wgpu::Queue, material: &PointsMaterial) {
        if self.material_source != *material {
            self.material.update(queue, material.to_uniform());
            self.material_source = *material;
        }
    }

    pub fn material_bind_group(&self) -> &wgpu::BindGroup {
        self.material.bind_group()
    }

    /// Instance layout for the points pipeline: one `vec3<f32>` per point
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

/// GPU state of one drawable node
pub enum NodeResources {
    Mesh {
        buffers: MeshBuffers,
        object: ObjectBinding,
    },
    Points {
        buffers: PointBuffers,
        object: ObjectBinding,
    },
}

impl NodeResources {
    pub fn object(&self) -> &ObjectBinding {
        match self {
            NodeResources::Mesh { object, .. } | NodeResources::Points { object, .. } => object,
        }
    }
}

/// Draw helpers on render passes
pub trait DrawNode {
    fn draw_mesh(&mut self, mesh: &MeshBuffers);
    fn draw_points(&mut self, points: &PointBuffers);
}

impl DrawNode for wgpu::RenderPass<'_> {
    fn draw_mesh(&mut self, mesh: &MeshBuffers) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, 0..1);
    }

    fn draw_points(&mut self, points: &PointBuffers) {
        if points.count == 0 {
            return;
        }
        self.set_vertex_buffer(0, points.instance_buffer.slice(..));
        // Two triangles per point, expanded in the vertex shader
        self.draw(0..6, 0..points.count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::SquareMatrix;

    #[test]
    fn test_object_uniform_is_shader_aligned() {
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 80);
        let uniform = ObjectUniform::new(Matrix4::identity(), true);
        assert_eq!(uniform.receive_shadow, 1.0);
        assert_eq!(uniform.model[3], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_point_instance_stride() {
        let layout = PointBuffers::desc();
        assert_eq!(layout.array_stride, 12);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Instance);
    }
}
