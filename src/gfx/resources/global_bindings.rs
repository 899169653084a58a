//! Global uniform bindings for camera and scene data
//!
//! Manages GPU uniform buffers and bind groups for global rendering state
//! that is shared across all nodes in a scene, including camera matrices
//! and lighting data for shadow mapping.

use cgmath::{InnerSpace, Matrix4, Point3, Vector3};

use crate::{
    gfx::camera::{camera_utils::CameraUniform, perspective_camera::OPENGL_TO_WGPU_MATRIX},
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in the shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],

    // Unit vector pointing from the lit surface towards the light
    light_direction: [f32; 3],
    shadows_enabled: f32,
    light_color: [f32; 3],
    light_intensity: f32,
    light_view_proj: [[f32; 4]; 4],
    ambient: [f32; 4],

    // Billboard axes for point sprites
    camera_right: [f32; 4],
    camera_up: [f32; 4],
}

/// Directional light with an orthographic shadow frustum
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub color: [f32; 3],
    pub intensity: f32,
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    /// Half-width of the shadow frustum
    pub shadow_extent: f32,
    pub shadow_near: f32,
    pub shadow_far: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [5.0, 10.0, 7.5],
            target: [0.0, 0.0, 0.0],
            color: [1.0, 1.0, 1.0],
            intensity: 2.5,
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 0.25,
            shadow_extent: 6.0,
            shadow_near: 0.5,
            shadow_far: 40.0,
        }
    }
}

impl LightConfig {
    /// Direction from the target towards the light, normalized
    pub fn direction(&self) -> [f32; 3] {
        let offset = Point3::from(self.position) - Point3::from(self.target);
        if offset.magnitude2() == 0.0 {
            return [0.0, 1.0, 0.0];
        }
        offset.normalize().into()
    }

    /// Light-space view projection used by the shadow pass
    pub fn view_projection(&self) -> Matrix4<f32> {
        let eye = Point3::new(self.position[0], self.position[1], self.position[2]);
        let target = Point3::new(self.target[0], self.target[1], self.target[2]);
        let view = Matrix4::look_at_rh(eye, target, Vector3::unit_y());
        let e = self.shadow_extent;
        let proj = OPENGL_TO_WGPU_MATRIX * cgmath::ortho(-e, e, -e, e, self.shadow_near, self.shadow_far);
        proj * view
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Updates the global uniform buffer with camera and light data
///
/// Called once per frame before any pass is recorded.
pub fn update_global_ubo_with_light(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    light: LightConfig,
    shadows_enabled: bool,
) {
    ubo.update_content(queue, global_content(camera, light, shadows_enabled));
}

fn global_content(camera: CameraUniform, light: LightConfig, shadows_enabled: bool) -> GlobalUBOContent {
    GlobalUBOContent {
        view_position: camera.view_position,
        view_proj: camera.view_proj,

        light_direction: light.direction(),
        shadows_enabled: if shadows_enabled { 1.0 } else { 0.0 },
        light_color: light.color,
        light_intensity: light.intensity,
        light_view_proj: light.view_projection().into(),
        ambient: [
            light.ambient_color[0],
            light.ambient_color[1],
            light.ambient_color[2],
            light.ambient_intensity,
        ],

        camera_right: camera.right,
        camera_up: camera.up,
    }
}

/// Owns the global uniform buffer and its bind group
///
/// Bound to slot 0 in all render pipelines.
pub struct GlobalBindings {
    ubo: GlobalUBO,
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let ubo = GlobalUBO::new(device);
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform()) // Global uniforms (camera + light)
            .create(device, "Globals Bind Group");

        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Global Bind Group");

        GlobalBindings {
            ubo,
            bind_group_layout,
            bind_group,
        }
    }

    pub fn update(
        &mut self,
        queue: &wgpu::Queue,
        camera: CameraUniform,
        light: LightConfig,
        shadows_enabled: bool,
    ) {
        update_global_ubo_with_light(&mut self.ubo, queue, camera, light, shadows_enabled);
    }

    /// Used when creating render pipelines that need access to global uniforms.
    pub fn bind_group_layouts(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_groups(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Transform, Vector4};

    #[test]
    fn test_global_content_is_shader_aligned() {
        assert_eq!(std::mem::size_of::<GlobalUBOContent>(), 224);
        assert_eq!(std::mem::size_of::<GlobalUBOContent>() % 16, 0);
    }

    #[test]
    fn test_light_frustum_contains_origin() {
        let light = LightConfig::default();
        let clip = light.view_projection() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0);
        assert!(ndc.z >= 0.0 && ndc.z <= 1.0);

        let top = light
            .view_projection()
            .transform_point(Point3::new(0.0, 2.0, 0.0));
        assert!(top.z >= 0.0 && top.z <= 1.0);
    }

    #[test]
    fn test_default_light_direction_points_up_and_out() {
        let [x, y, z] = LightConfig::default().direction();
        assert!((x * x + y * y + z * z - 1.0).abs() < 1e-5);
        assert!(y > 0.0 && x > 0.0 && z > 0.0);
    }

    #[test]
    fn test_shadow_flag_is_encoded() {
        let camera = CameraUniform::default();
        let on = global_content(camera, LightConfig::default(), true);
        let off = global_content(camera, LightConfig::default(), false);
        assert_eq!(on.shadows_enabled, 1.0);
        assert_eq!(off.shadows_enabled, 0.0);
    }
}
