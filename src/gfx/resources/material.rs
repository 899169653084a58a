//! Material system for PBR rendering
//!
//! Provides material definitions and centralized management with GPU resource handling.
//! Materials are stored in MaterialManager and meshes reference them by ID, so parts
//! that share a surface (all wooden chair parts, say) share one material.

use std::collections::HashMap;
use wgpu::Device;

use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

/// Material ID for referencing materials
pub type MaterialId = String;

/// An sRGB color with components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from a `0xRRGGBB` literal
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xFF) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    /// Converts to linear space for lighting
    pub fn to_linear(self) -> [f32; 3] {
        fn decode(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        [decode(self.r), decode(self.g), decode(self.b)]
    }
}

/// GPU uniform data for materials
///
/// Shared by mesh materials and point materials; `point_size` is only read by
/// the points pipeline.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub point_size: f32,
    _padding: f32,
}

pub type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Material bind group layout, shared by every material
pub struct MaterialBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
}

impl MaterialBindings {
    pub fn new(device: &Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Material Bind Group");

        MaterialBindings { bind_group_layout }
    }

    pub fn bind_group_layouts(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn create_bind_group(&self, device: &Device, ubo: &MaterialUBO) -> wgpu::BindGroup {
        BindGroupBuilder::new(&self.bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Material Bind Group")
    }
}

/// GPU side of one material: its uniform buffer and bind group
pub struct MaterialGpuResources {
    ubo: MaterialUBO,
    bind_group: wgpu::BindGroup,
}

impl MaterialGpuResources {
    pub fn new(device: &Device, bindings: &MaterialBindings, uniform: &MaterialUniform) -> Self {
        let ubo = MaterialUBO::new_with_data(device, uniform);
        let bind_group = bindings.create_bind_group(device, &ubo);
        Self { ubo, bind_group }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, uniform: MaterialUniform) {
        self.ubo.update_content(queue, uniform);
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// Material definition with PBR properties
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub color: Color,
    pub metallic: f32,
    pub roughness: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            color: Color::rgb(0.8, 0.8, 0.8),
            metallic: 0.0,
            roughness: 0.5,
        }
    }
}

impl Material {
    /// Creates a new material with basic PBR properties
    ///
    /// # Arguments
    /// * `name` - Unique name for this material
    /// * `color` - Base color
    /// * `metallic` - Metallic factor (0.0 = dielectric, 1.0 = metallic)
    /// * `roughness` - Surface roughness (0.0 = mirror, 1.0 = rough)
    pub fn new(name: &str, color: Color, metallic: f32, roughness: f32) -> Self {
        Self {
            name: name.to_string(),
            color,
            metallic: metallic.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
        }
    }

    pub fn to_uniform(&self) -> MaterialUniform {
        let [r, g, b] = self.color.to_linear();
        MaterialUniform {
            base_color: [r, g, b, 1.0],
            metallic: self.metallic,
            roughness: self.roughness,
            point_size: 0.0,
            _padding: 0.0,
        }
    }
}

/// Flat-colored, fixed-size material for point clouds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointsMaterial {
    pub color: Color,
    pub size: f32,
}

impl PointsMaterial {
    pub fn new(color: Color, size: f32) -> Self {
        Self { color, size }
    }

    pub fn to_uniform(&self) -> MaterialUniform {
        let [r, g, b] = self.color.to_linear();
        MaterialUniform {
            base_color: [r, g, b, 1.0],
            metallic: 0.0,
            roughness: 1.0,
            point_size: self.size,
            _padding: 0.0,
        }
    }
}

/// Manages all materials of a scene
///
/// Centralized storage for all materials. Meshes reference materials by ID
/// rather than storing material data directly.
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
    default_material: Material,
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialManager {
    pub fn new() -> Self {
        Self {
            materials: HashMap::new(),
            default_material: Material::default(),
        }
    }

    /// Adds a material, replacing any material of the same name
    ///
    /// Returns the ID meshes use to reference it.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = material.name.clone();
        if let Some(previous) = self.materials.insert(id.clone(), material) {
            log::debug!("Material '{}' replaced", previous.name);
        }
        id
    }

    pub fn get_material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    /// Gets a material with fallback to the default material
    ///
    /// Used during rendering so a dangling material ID still draws.
    pub fn get_material_or_default(&self, id: &str) -> &Material {
        self.materials.get(id).unwrap_or(&self.default_material)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        let brown = Color::from_hex(0x8B4513);
        assert_eq!(brown.r, 0x8B as f32 / 255.0);
        assert_eq!(brown.g, 0x45 as f32 / 255.0);
        assert_eq!(brown.b, 0x13 as f32 / 255.0);
        assert_eq!(Color::from_hex(0xFFFFFF), Color::WHITE);
    }

    #[test]
    fn test_linear_conversion_keeps_endpoints() {
        assert_eq!(Color::WHITE.to_linear(), [1.0, 1.0, 1.0]);
        assert_eq!(Color::BLACK.to_linear(), [0.0, 0.0, 0.0]);
        let mid = Color::rgb(0.5, 0.5, 0.5).to_linear();
        assert!(mid[0] > 0.2 && mid[0] < 0.23);
    }

    #[test]
    fn test_material_factors_are_clamped() {
        let material = Material::new("m", Color::WHITE, 1.5, -0.2);
        assert_eq!(material.metallic, 1.0);
        assert_eq!(material.roughness, 0.0);
    }

    #[test]
    fn test_manager_fallback_and_replace() {
        let mut manager = MaterialManager::new();
        assert!(manager.is_empty());

        let id = manager.add_material(Material::new("wood", Color::from_hex(0x8B4513), 0.1, 0.7));
        assert_eq!(id, "wood");
        assert_eq!(manager.get_material_or_default("wood").roughness, 0.7);
        assert_eq!(manager.get_material_or_default("missing").name, "Default");

        manager.add_material(Material::new("wood", Color::WHITE, 0.0, 0.2));
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.get_material("wood").map(|m| m.roughness), Some(0.2));
    }

    #[test]
    fn test_uniform_layout_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<MaterialUniform>() % 16, 0);
        let uniform = PointsMaterial::new(Color::WHITE, 0.1).to_uniform();
        assert_eq!(uniform.point_size, 0.1);
        assert_eq!(uniform.base_color, [1.0, 1.0, 1.0, 1.0]);
    }
}
