//! Renderer handle
//!
//! [`Renderer`] holds the surface binding and frame-size settings the
//! bootstrapper configures. The GPU side, a [`RenderEngine`], is attached
//! later by the application driver once a window exists, so the handle can
//! be built and inspected without a GPU.

use crate::error::{Result, ViewerError};
use crate::gfx::{camera::perspective_camera::PerspectiveCamera, scene::scene::Scene};
use crate::host::SurfaceHandle;

use super::render_engine::RenderEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowMapSettings {
    pub enabled: bool,
}

pub struct Renderer {
    surface: SurfaceHandle,
    antialias: bool,
    size: (f64, f64),
    pixel_ratio: f64,
    pub shadow_map: ShadowMapSettings,
    engine: Option<RenderEngine>,
}

impl Renderer {
    pub fn new(surface: SurfaceHandle, antialias: bool) -> Self {
        Self {
            surface,
            antialias,
            size: (0.0, 0.0),
            pixel_ratio: 1.0,
            shadow_map: ShadowMapSettings { enabled: false },
            engine: None,
        }
    }

    pub fn surface(&self) -> &SurfaceHandle {
        &self.surface
    }

    pub fn antialias(&self) -> bool {
        self.antialias
    }

    /// Sets the logical size and resizes the drawing buffer to match
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.size = (width, height);
        self.resize_engine();
    }

    pub fn size(&self) -> (f64, f64) {
        self.size
    }

    pub fn set_pixel_ratio(&mut self, pixel_ratio: f64) {
        self.pixel_ratio = pixel_ratio;
        self.resize_engine();
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Physical size of the drawing buffer
    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        let (width, height) = self.size;
        (
            (width * self.pixel_ratio).round().max(0.0) as u32,
            (height * self.pixel_ratio).round().max(0.0) as u32,
        )
    }

    /// Hands the GPU backend to this renderer, sized to the drawing buffer
    pub fn attach_engine(&mut self, engine: RenderEngine) {
        log::info!("Renderer attached to GPU backend for surface '{}'", self.surface.id);
        self.engine = Some(engine);
        self.resize_engine();
    }

    pub fn is_attached(&self) -> bool {
        self.engine.is_some()
    }

    /// Draws one frame
    pub fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<()> {
        let shadows = self.shadow_map.enabled;
        let engine = self.engine.as_mut().ok_or(ViewerError::RendererDetached)?;
        engine.render_frame(scene, camera, shadows)
    }

    fn resize_engine(&mut self) {
        let (width, height) = self.drawing_buffer_size();
        if let Some(engine) = self.engine.as_mut() {
            engine.resize(width, height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drawing_buffer_follows_pixel_ratio() {
        let mut renderer = Renderer::new(SurfaceHandle::new("viewerCanvas"), true);
        renderer.set_size(800.0, 600.0);
        assert_eq!(renderer.drawing_buffer_size(), (800, 600));

        renderer.set_pixel_ratio(1.5);
        assert_eq!(renderer.drawing_buffer_size(), (1200, 900));

        renderer.set_size(333.5, 100.25);
        assert_eq!(renderer.drawing_buffer_size(), (500, 150));
    }

    #[test]
    fn test_render_without_engine_fails() {
        let mut renderer = Renderer::new(SurfaceHandle::new("viewerCanvas"), false);
        let camera = PerspectiveCamera::new(60.0, 1.0, 0.1, 1000.0);
        let result = renderer.render(&Scene::new(), &camera);

        assert!(matches!(result, Err(ViewerError::RendererDetached)));
        assert!(!renderer.is_attached());
    }
}
