//! Scene bootstrapper
//!
//! [`Viewer::initialize`] builds the four handles the rest of the
//! application works with (scene, camera, renderer and controls) against a
//! [`Host`], and keeps the resize listener that holds camera and renderer in
//! step with the host viewport.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cgmath::Point3;
use rand::Rng;

use crate::config::ViewerConfig;
use crate::error::{Result, ViewerError};
use crate::gfx::{
    camera::{orbit_controls::OrbitControls, perspective_camera::PerspectiveCamera},
    rendering::renderer::Renderer,
    scene::{node::Node, points::Points, scene::Scene},
};
use crate::host::{CanvasSelector, Host};

/// Name of the background point cloud node
pub const STARFIELD_NAME: &str = "Starfield";

/// Aspect used until a viewport with an area is reported
const FALLBACK_ASPECT: f32 = 1.0;

/// Registration of the viewport resize listener
///
/// Clones share one registration. After [`ResizeListener::dispose`] resize
/// events are ignored for the rest of the process.
#[derive(Debug, Clone)]
pub struct ResizeListener {
    active: Arc<AtomicBool>,
}

impl ResizeListener {
    fn register() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn dispose(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            log::debug!("Resize listener disposed");
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

/// Handles produced by the bootstrapper
pub struct Viewer {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub renderer: Renderer,
    pub controls: OrbitControls,
    resize_listener: ResizeListener,
}

impl Viewer {
    /// Builds the viewer with a thread-local random source for the starfield
    pub fn initialize(host: &mut impl Host, config: &ViewerConfig) -> Result<Self> {
        Self::initialize_with_rng(host, config, &mut rand::rng())
    }

    /// Builds the viewer, drawing star positions from `rng`
    ///
    /// # Errors
    /// - [`ViewerError::InvalidSelector`] if the configured selector is not `#<id>`
    /// - [`ViewerError::SurfaceNotFound`] if the host has no such surface
    pub fn initialize_with_rng(
        host: &mut impl Host,
        config: &ViewerConfig,
        rng: &mut impl Rng,
    ) -> Result<Self> {
        let selector = CanvasSelector::parse(&config.canvas_selector)?;
        let surface = host
            .find_surface(&selector)
            .ok_or_else(|| ViewerError::SurfaceNotFound(selector.to_string()))?;
        log::debug!("Located drawing surface {:?}", surface);

        let mut scene = Scene::new();
        let stars = Points::starfield(rng, &config.starfield);
        scene.add(Node::points(STARFIELD_NAME, stars));

        let viewport = host.viewport();
        let aspect = if viewport.is_empty() {
            log::warn!(
                "Viewport {}x{} has no area, using aspect {} until the first resize",
                viewport.width,
                viewport.height,
                FALLBACK_ASPECT
            );
            FALLBACK_ASPECT
        } else {
            (viewport.width / viewport.height) as f32
        };
        let camera_config = &config.camera;
        let mut camera = PerspectiveCamera::new(
            camera_config.fov_degrees,
            aspect,
            camera_config.near,
            camera_config.far,
        );
        let [x, y, z] = camera_config.position;
        camera.set_position(x, y, z);
        let target = Point3::from(camera_config.target);
        camera.look_at(target);
        camera.update_view_proj();

        let mut renderer = Renderer::new(surface.clone(), config.renderer.antialias);
        renderer.set_size(viewport.width, viewport.height);
        renderer.set_pixel_ratio(host.device_pixel_ratio());
        renderer.shadow_map.enabled = config.renderer.shadows;

        // Appended unconditionally; a second append of the same surface is
        // reported by the host and only logged
        if !host.append_surface(&surface) {
            log::warn!("Drawing surface '{}' was already attached to the host", surface.id);
        }

        let controls = OrbitControls::from_config(target, &config.controls);
        let resize_listener = ResizeListener::register();

        let viewer = Self {
            scene,
            camera,
            renderer,
            controls,
            resize_listener,
        };

        let stats = viewer.scene.statistics();
        log::info!(
            "Viewer initialized on {}: {}x{} @{}x, {} stars",
            selector,
            viewport.width,
            viewport.height,
            viewer.renderer.pixel_ratio(),
            stats.point_count
        );
        Ok(viewer)
    }

    /// Applies the host's current viewport to camera and renderer
    ///
    /// # Returns
    /// `false` if the listener was disposed or the viewport has no area
    pub fn handle_resize(&mut self, host: &impl Host) -> bool {
        if !self.resize_listener.is_active() {
            return false;
        }
        let viewport = host.viewport();
        if viewport.is_empty() {
            return false;
        }

        self.camera.aspect = (viewport.width / viewport.height) as f32;
        self.camera.update_projection_matrix();
        self.renderer.set_pixel_ratio(host.device_pixel_ratio());
        self.renderer.set_size(viewport.width, viewport.height);
        log::debug!("Resized to {}x{}", viewport.width, viewport.height);
        true
    }

    /// Returns a handle through which the resize listener can be disposed
    pub fn resize_listener(&self) -> ResizeListener {
        self.resize_listener.clone()
    }

    /// Advances the controls and draws one frame
    pub fn render(&mut self) -> Result<()> {
        self.controls.update(&mut self.camera);
        self.renderer.render(&self.scene, &self.camera)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::node::NodeKind;
    use crate::host::HeadlessHost;
    use rand::{rngs::StdRng, SeedableRng};

    fn host() -> HeadlessHost {
        HeadlessHost::new(1200.0, 800.0, 2.0).with_surface("viewerCanvas")
    }

    fn viewer(host: &mut HeadlessHost) -> Viewer {
        let mut rng = StdRng::seed_from_u64(7);
        Viewer::initialize_with_rng(host, &ViewerConfig::default(), &mut rng).unwrap()
    }

    #[test]
    fn test_initialize_builds_stock_handles() {
        let mut host = host();
        let viewer = viewer(&mut host);

        assert_eq!(viewer.camera.aspect, 1.5);
        assert_eq!(viewer.camera.fovy.0, 60.0);
        assert_eq!(viewer.camera.znear, 0.1);
        assert_eq!(viewer.camera.zfar, 1000.0);
        assert_eq!(viewer.camera.position, Point3::new(5.0, 5.0, 5.0));
        assert_eq!(viewer.camera.target(), Point3::new(0.0, 0.0, 0.0));
        assert!(viewer.renderer.antialias());
        assert_eq!(viewer.renderer.surface().id, "viewerCanvas");
        assert!(viewer.renderer.shadow_map.enabled);
        assert_eq!(viewer.renderer.drawing_buffer_size(), (2400, 1600));
        assert!(viewer.controls.enable_damping);
        assert!(viewer.controls.enable_pan);
        assert!(viewer.controls.enable_zoom);
        assert_eq!(host.append_count("viewerCanvas"), 1);
    }

    #[test]
    fn test_starfield_is_in_scene_and_bounded() {
        let mut host = host();
        let viewer = viewer(&mut host);

        let node = viewer.scene.find_by_name(STARFIELD_NAME).unwrap();
        let NodeKind::Points(stars) = &node.kind else {
            panic!("starfield is not a point cloud");
        };
        assert_eq!(stars.positions().len(), 15000);
        assert!(stars.positions().iter().all(|v| (-100.0..=100.0).contains(v)));
    }

    #[test]
    fn test_resize_keeps_aspect_exact() {
        let mut host = host();
        let mut viewer = viewer(&mut host);

        for (w, h) in [(1920.0, 1080.0), (333.0, 777.0), (1.0, 3.0)] {
            host.set_viewport(w, h);
            assert!(viewer.handle_resize(&host));
            assert_eq!(viewer.camera.aspect, (w / h) as f32);
            assert_eq!(viewer.renderer.size(), (w, h));
        }
    }

    #[test]
    fn test_zero_area_resize_is_ignored() {
        let mut host = host();
        let mut viewer = viewer(&mut host);

        host.set_viewport(0.0, 0.0);
        assert!(!viewer.handle_resize(&host));
        assert_eq!(viewer.camera.aspect, 1.5);
    }

    #[test]
    fn test_collapsed_viewport_at_startup_uses_fallback_aspect() {
        for (w, h) in [(0.0, 600.0), (0.0, 0.0), (800.0, 0.0)] {
            let mut host = HeadlessHost::new(w, h, 1.0).with_surface("viewerCanvas");
            let mut viewer = viewer(&mut host);
            assert_eq!(viewer.camera.aspect, FALLBACK_ASPECT);
            assert!(viewer.camera.projection_matrix().x.x.is_finite());

            host.set_viewport(1600.0, 900.0);
            assert!(viewer.handle_resize(&host));
            assert_eq!(viewer.camera.aspect, (1600.0_f64 / 900.0) as f32);
        }
    }

    #[test]
    fn test_disposed_listener_stops_resizing() {
        let mut host = host();
        let mut viewer = viewer(&mut host);
        let listener = viewer.resize_listener();

        listener.dispose();
        host.set_viewport(500.0, 1000.0);

        assert!(!viewer.handle_resize(&host));
        assert!(!viewer.resize_listener().is_active());
        assert_eq!(viewer.camera.aspect, 1.5);
    }

    #[test]
    fn test_missing_surface_fails_fast() {
        let mut host = HeadlessHost::new(800.0, 600.0, 1.0);
        let result = Viewer::initialize(&mut host, &ViewerConfig::default());
        assert!(matches!(result, Err(ViewerError::SurfaceNotFound(id)) if id == "#viewerCanvas"));
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let mut host = host();
        let config = ViewerConfig::default().with_canvas_selector("canvas");
        let result = Viewer::initialize(&mut host, &config);
        assert!(matches!(result, Err(ViewerError::InvalidSelector(_))));
    }

    #[test]
    fn test_second_initialize_appends_again() {
        let mut host = host();
        let _first = viewer(&mut host);
        let second = viewer(&mut host);

        assert_eq!(host.append_count("viewerCanvas"), 2);
        assert_eq!(second.scene.statistics().points, 1);
    }
}
