//! Viewer configuration
//!
//! All startup constants of the showroom live here. [`ViewerConfig::default`]
//! reproduces the stock scene; the `with_*` methods override single values.

use crate::gfx::resources::material::Color;

/// Selector of the drawing surface the viewer binds to by default
pub const DEFAULT_CANVAS_SELECTOR: &str = "#viewerCanvas";

/// Top-level configuration consumed by [`crate::viewer::Viewer::initialize`]
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// `#<id>` selector of the drawing surface
    pub canvas_selector: String,
    /// Initial logical window size used by the native driver
    pub window_size: (u32, u32),
    pub starfield: StarfieldConfig,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub renderer: RendererConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            canvas_selector: DEFAULT_CANVAS_SELECTOR.to_string(),
            window_size: (1200, 800),
            starfield: StarfieldConfig::default(),
            camera: CameraConfig::default(),
            controls: ControlsConfig::default(),
            renderer: RendererConfig::default(),
        }
    }
}

impl ViewerConfig {
    pub fn with_canvas_selector(mut self, selector: &str) -> Self {
        self.canvas_selector = selector.to_owned();
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    pub fn with_star_count(mut self, count: usize) -> Self {
        self.starfield.count = count;
        self
    }

    pub fn with_antialias(mut self, antialias: bool) -> Self {
        self.renderer.antialias = antialias;
        self
    }

    pub fn with_shadows(mut self, shadows: bool) -> Self {
        self.renderer.shadows = shadows;
        self
    }

    pub fn with_damping(mut self, enable: bool) -> Self {
        self.controls.enable_damping = enable;
        self
    }
}

/// Random point cloud drawn behind the product
#[derive(Debug, Clone)]
pub struct StarfieldConfig {
    pub count: usize,
    /// Side length of the cube, centered at the origin, the stars are drawn in
    pub extent: f32,
    pub color: Color,
    /// Billboard size in world units
    pub size: f32,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            count: 5000,
            extent: 200.0,
            color: Color::WHITE,
            size: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
            position: [5.0, 5.0, 5.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ControlsConfig {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_rotate: bool,
    pub enable_pan: bool,
    pub enable_zoom: bool,
    /// Radians per pixel of pointer motion
    pub rotate_speed: f32,
    /// Multiplier on the per-notch dolly scale
    pub zoom_speed: f32,
    /// Fraction of the orbit distance moved per pixel of pointer motion
    pub pan_speed: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            enable_rotate: true,
            enable_pan: true,
            enable_zoom: true,
            rotate_speed: 0.005,
            zoom_speed: 1.0,
            pan_speed: 0.002,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub antialias: bool,
    pub shadows: bool,
    pub vsync: bool,
    pub clear_color: Color,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            antialias: true,
            shadows: true,
            vsync: true,
            clear_color: Color::BLACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_scene() {
        let config = ViewerConfig::default();
        assert_eq!(config.canvas_selector, "#viewerCanvas");
        assert_eq!(config.starfield.count, 5000);
        assert_eq!(config.starfield.extent, 200.0);
        assert_eq!(config.starfield.size, 0.1);
        assert_eq!(config.camera.fov_degrees, 60.0);
        assert_eq!(config.camera.near, 0.1);
        assert_eq!(config.camera.far, 1000.0);
        assert_eq!(config.camera.position, [5.0, 5.0, 5.0]);
        assert!(config.renderer.antialias);
        assert!(config.renderer.shadows);
        assert!(config.controls.enable_damping);
        assert!(config.controls.enable_pan);
        assert!(config.controls.enable_zoom);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ViewerConfig::default()
            .with_canvas_selector("#other")
            .with_star_count(10)
            .with_shadows(false)
            .with_damping(false);
        assert_eq!(config.canvas_selector, "#other");
        assert_eq!(config.starfield.count, 10);
        assert!(!config.renderer.shadows);
        assert!(!config.controls.enable_damping);
    }
}
