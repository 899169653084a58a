//! WGPU-based rendering engine
//!
//! Draws a [`Scene`] in two passes: a depth-only shadow pass from the
//! directional light, then the main pass with PBR meshes and point clouds,
//! multisampled when antialiasing is on.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use wgpu::TextureFormat;

use crate::error::{Result, ViewerError};
use crate::gfx::{
    camera::perspective_camera::PerspectiveCamera,
    resources::{
        global_bindings::{GlobalBindings, LightConfig},
        material::{Color, MaterialBindings, MaterialGpuResources, MaterialId},
        texture_resource::TextureResource,
    },
    scene::{node::NodeId, node::NodeKind, scene::Scene, vertex::Vertex3D},
};
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
};

use super::node_resources::{
    object_bind_group_layout, DrawNode, MeshBuffers, NodeResources, ObjectBinding, ObjectUniform,
    PointBuffers,
};
use super::pipeline_manager::{PipelineConfig, PipelineManager};

const SHADOW_PIPELINE: &str = "Shadow";
const PBR_PIPELINE: &str = "PBR";
const POINTS_PIPELINE: &str = "Points";

/// Sample count used when antialiasing is requested
const MSAA_SAMPLES: u32 = 4;

/// Start-up options of the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    pub antialias: bool,
    pub vsync: bool,
    pub clear_color: Color,
    pub shadow_map_size: u32,
    pub light: LightConfig,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            antialias: true,
            vsync: true,
            clear_color: Color::BLACK,
            shadow_map_size: 2048,
            light: LightConfig::default(),
        }
    }
}

/// One entry of the per-frame draw list, in scene traversal order
#[derive(Debug, Clone, Copy)]
struct DrawItem {
    node: NodeId,
    cast_shadow: bool,
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    sample_count: u32,
    clear_color: wgpu::Color,

    depth_texture: TextureResource,
    msaa_target: Option<TextureResource>,
    pipeline_manager: PipelineManager,
    global_bindings: GlobalBindings,
    object_layout: BindGroupLayoutWithDesc,
    material_bindings: MaterialBindings,

    shadow_map: TextureResource,
    shadow_bind_group: wgpu::BindGroup,
    light_config: LightConfig,

    nodes: HashMap<NodeId, NodeResources>,
    materials: HashMap<MaterialId, MaterialGpuResources>,
    meshes: Vec<(DrawItem, MaterialId)>,
    point_clouds: Vec<NodeId>,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `target` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    /// * `settings` - Antialiasing, vsync, clear color and shadow map size
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        settings: EngineSettings,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(target)
            .map_err(|e| ViewerError::Gpu(format!("cannot create surface: {}", e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| ViewerError::Gpu(format!("no suitable adapter: {}", e)))?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| ViewerError::Gpu(format!("cannot open device: {}", e)))?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| ViewerError::Gpu("surface reports no formats".into()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: if settings.vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let sample_count = if !settings.antialias {
            1
        } else if adapter
            .get_texture_format_features(format)
            .flags
            .sample_count_supported(MSAA_SAMPLES)
        {
            MSAA_SAMPLES
        } else {
            log::warn!("{:?} does not support {}x MSAA, antialiasing disabled", format, MSAA_SAMPLES);
            1
        };

        let depth_texture = TextureResource::create_depth_texture(
            &device,
            config.width,
            config.height,
            sample_count,
            "depth_texture",
        );
        let msaa_target = (sample_count > 1).then(|| {
            TextureResource::create_msaa_target(&device, config.width, config.height, format, sample_count)
        });

        // Shadow map is sampled with hardware comparison in the PBR pass
        let shadow_map = TextureResource::create_shadow_map(&device, settings.shadow_map_size);
        let shadow_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_depth_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Comparison))
            .create(&device, "Shadow Bind Group Layout");
        let shadow_sampler = shadow_map
            .sampler
            .as_ref()
            .ok_or_else(|| ViewerError::Gpu("shadow map has no sampler".into()))?;
        let shadow_bind_group = BindGroupBuilder::new(&shadow_layout)
            .texture(&shadow_map.view)
            .sampler(shadow_sampler)
            .create(&device, "Shadow Bind Group");

        let global_bindings = GlobalBindings::new(&device);
        let object_layout = object_bind_group_layout(&device);
        let material_bindings = MaterialBindings::new(&device);

        let device_handle: Arc<wgpu::Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        for (name, source) in [
            ("pbr", include_str!("pbr.wgsl")),
            ("shadow", include_str!("shadow_pass.wgsl")),
            ("points", include_str!("points.wgsl")),
        ] {
            pipeline_manager
                .load_shader(name, source)
                .map_err(ViewerError::Gpu)?;
        }

        // Both faces go into the shadow map so thin parts still cast
        pipeline_manager.register_pipeline(
            SHADOW_PIPELINE,
            PipelineConfig::default()
                .with_label("SHADOW")
                .with_shader("shadow")
                .with_vertex_buffers(vec![Vertex3D::desc()])
                .with_depth(TextureResource::DEPTH_FORMAT)
                .with_depth_bias(2, 2.0)
                .with_cull_mode(None)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layouts().clone(),
                    object_layout.layout.clone(),
                ])
                .with_vertex_only(),
        );

        pipeline_manager.register_pipeline(
            PBR_PIPELINE,
            PipelineConfig::default()
                .with_label("PBR")
                .with_shader("pbr")
                .with_vertex_buffers(vec![Vertex3D::desc()])
                .with_depth(TextureResource::DEPTH_FORMAT)
                .with_sample_count(sample_count)
                .with_color_target(format)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layouts().clone(),
                    object_layout.layout.clone(),
                    material_bindings.bind_group_layouts().clone(),
                    shadow_layout.layout.clone(),
                ]),
        );

        pipeline_manager.register_pipeline(
            POINTS_PIPELINE,
            PipelineConfig::default()
                .with_label("POINTS")
                .with_shader("points")
                .with_vertex_buffers(vec![PointBuffers::desc()])
                .with_depth(TextureResource::DEPTH_FORMAT)
                .with_sample_count(sample_count)
                .with_color_target(format)
                .with_cull_mode(None)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layouts().clone(),
                    object_layout.layout.clone(),
                    material_bindings.bind_group_layouts().clone(),
                ]),
        );

        pipeline_manager
            .create_all_pipelines()
            .map_err(|errors| ViewerError::Gpu(errors.join("; ")))?;

        let stats = pipeline_manager.get_stats();
        log::info!(
            "Render engine ready: {}x{} {:?}, {} pipelines, {}x MSAA",
            config.width,
            config.height,
            format,
            stats.total_pipelines,
            sample_count
        );

        let [r, g, b] = settings.clear_color.to_linear();
        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            format,
            sample_count,
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: 1.0,
            },
            depth_texture,
            msaa_target,
            pipeline_manager,
            global_bindings,
            object_layout,
            material_bindings,
            shadow_map,
            shadow_bind_group,
            light_config: settings.light,
            nodes: HashMap::new(),
            materials: HashMap::new(),
            meshes: Vec::new(),
            point_clouds: Vec::new(),
        })
    }

    /// Renders one frame of `scene` as seen by `camera`
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    pub fn render_frame(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
        shadows_enabled: bool,
    ) -> Result<()> {
        self.sync_scene(scene);
        self.global_bindings.update(
            &self.queue,
            camera.uniform_data(),
            self.light_config,
            shadows_enabled,
        );

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(ViewerError::Gpu("out of memory acquiring frame".into()));
            }
            Err(e) => {
                log::warn!("Skipping frame: {}", e);
                return Ok(());
            }
        };
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // PASS 1: shadow depth, cleared even when disabled
        {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Depth Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let pipeline = self
                .pipeline_manager
                .get_pipeline(SHADOW_PIPELINE)
                .filter(|_| shadows_enabled);
            if let Some(pipeline) = pipeline {
                shadow_pass.set_pipeline(pipeline);
                shadow_pass.set_bind_group(0, self.global_bindings.bind_groups(), &[]);

                for (item, _) in self.meshes.iter().filter(|(item, _)| item.cast_shadow) {
                    if let Some(NodeResources::Mesh { buffers, object }) = self.nodes.get(&item.node) {
                        shadow_pass.set_bind_group(1, object.bind_group(), &[]);
                        shadow_pass.draw_mesh(buffers);
                    }
                }
            }
        }

        // PASS 2: main scene
        {
            let (view, resolve_target) = match &self.msaa_target {
                Some(msaa) => (&msaa.view, Some(&surface_view)),
                None => (&surface_view, None),
            };
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_groups(), &[]);

            if let Some(pipeline) = self.pipeline_manager.get_pipeline(PBR_PIPELINE) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(3, &self.shadow_bind_group, &[]);

                for (item, material_id) in &self.meshes {
                    let (Some(NodeResources::Mesh { buffers, object }), Some(material)) =
                        (self.nodes.get(&item.node), self.materials.get(material_id))
                    else {
                        continue;
                    };
                    render_pass.set_bind_group(1, object.bind_group(), &[]);
                    render_pass.set_bind_group(2, material.bind_group(), &[]);
                    render_pass.draw_mesh(buffers);
                }
            }

            if let Some(pipeline) = self.pipeline_manager.get_pipeline(POINTS_PIPELINE) {
                render_pass.set_pipeline(pipeline);

                for id in &self.point_clouds {
                    if let Some(NodeResources::Points { buffers, object }) = self.nodes.get(id) {
                        render_pass.set_bind_group(1, object.bind_group(), &[]);
                        render_pass.set_bind_group(2, buffers.material_bind_group(), &[]);
                        render_pass.draw_points(buffers);
                    }
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Brings per-node GPU resources in line with the scene graph
    ///
    /// New nodes are uploaded, changed shapes re-uploaded, transforms and
    /// materials rewritten (the uniform buffers skip unchanged data) and
    /// resources of nodes no longer in the scene dropped.
    fn sync_scene(&mut self, scene: &Scene) {
        let device = &self.device;
        let queue = &self.queue;
        let object_layout = &self.object_layout;
        let material_bindings = &self.material_bindings;
        let nodes = &mut self.nodes;
        let meshes = &mut self.meshes;
        let point_clouds = &mut self.point_clouds;

        meshes.clear();
        point_clouds.clear();
        let mut seen = HashSet::new();

        scene.traverse_with_world(&mut |node, world| {
            let id = node.id();
            match &node.kind {
                NodeKind::Group(_) => return,
                NodeKind::Mesh(mesh) => {
                    let content = ObjectUniform::new(world, mesh.receive_shadow);
                    let outdated = !matches!(
                        nodes.get(&id),
                        Some(NodeResources::Mesh { buffers, .. }) if *buffers.geometry() == mesh.geometry
                    );
                    if outdated {
                        nodes.insert(
                            id,
                            NodeResources::Mesh {
                                buffers: MeshBuffers::new(device, mesh.geometry),
                                object: ObjectBinding::new(device, object_layout, content),
                            },
                        );
                    } else if let Some(NodeResources::Mesh { object, .. }) = nodes.get_mut(&id) {
                        object.update(queue, content);
                    }
                    meshes.push((
                        DrawItem {
                            node: id,
                            cast_shadow: mesh.cast_shadow,
                        },
                        mesh.material.clone(),
                    ));
                }
                NodeKind::Points(points) => {
                    let content = ObjectUniform::new(world, false);
                    let outdated = !matches!(
                        nodes.get(&id),
                        Some(NodeResources::Points { buffers, .. }) if !buffers.is_stale(points)
                    );
                    if outdated {
                        nodes.insert(
                            id,
                            NodeResources::Points {
                                buffers: PointBuffers::new(device, material_bindings, points),
                                object: ObjectBinding::new(device, object_layout, content),
                            },
                        );
                    } else if let Some(NodeResources::Points { buffers, object }) = nodes.get_mut(&id) {
                        object.update(queue, content);
                        buffers.update_material(queue, &points.material);
                    }
                    point_clouds.push(id);
                }
            }
            seen.insert(id);
        });

        let before = nodes.len();
        nodes.retain(|id, _| seen.contains(id));
        if nodes.len() != before {
            log::debug!("Dropped GPU resources of {} removed nodes", before - nodes.len());
        }

        for (_, material_id) in meshes.iter() {
            let material = scene.material_manager.get_material_or_default(material_id);
            match self.materials.get_mut(material_id) {
                Some(resources) => resources.update(queue, material.to_uniform()),
                None => {
                    log::debug!("Uploading material '{}'", material_id);
                    self.materials.insert(
                        material_id.clone(),
                        MaterialGpuResources::new(device, material_bindings, &material.to_uniform()),
                    );
                }
            }
        }
    }

    /// Reconfigures the surface and recreates size-dependent targets
    ///
    /// Zero sizes (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if (width, height) == (self.config.width, self.config.height) {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture = TextureResource::create_depth_texture(
            &self.device,
            width,
            height,
            self.sample_count,
            "depth_texture",
        );
        if self.msaa_target.is_some() {
            self.msaa_target = Some(TextureResource::create_msaa_target(
                &self.device,
                width,
                height,
                self.format,
                self.sample_count,
            ));
        }
        log::debug!("Render engine resized to {}x{}", width, height);
    }
}
