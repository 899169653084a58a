//! Host environment the viewer binds to
//!
//! The bootstrapper never talks to a window system directly. It asks a
//! [`Host`] for the drawing surface behind a selector, the viewport size and
//! the device pixel ratio, and asks it to attach the surface once the
//! renderer is bound. `WindowHost` in [`crate::app`] backs this with a
//! `winit` window; [`HeadlessHost`] keeps everything in memory.

use std::collections::HashMap;

use crate::error::{Result, ViewerError};

/// Parsed `#<id>` surface selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasSelector {
    id: String,
}

impl CanvasSelector {
    /// Parses an id selector such as `#viewerCanvas`
    ///
    /// Only id selectors are supported; the id must be non-empty and free of
    /// whitespace.
    pub fn parse(selector: &str) -> Result<Self> {
        let id = selector
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ViewerError::InvalidSelector(selector.to_owned()))?;

        if id.is_empty() || id.contains(|c: char| c.is_whitespace() || c == '#') {
            return Err(ViewerError::InvalidSelector(selector.to_owned()));
        }

        Ok(Self { id: id.to_owned() })
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for CanvasSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.id)
    }
}

/// Handle of a drawing surface owned by the host
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurfaceHandle {
    pub id: String,
}

impl SurfaceHandle {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_owned() }
    }
}

/// Logical viewport size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// True for minimized or collapsed viewports, or unusable sizes
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

pub trait Host {
    /// Looks up the surface named by `selector`
    fn find_surface(&self, selector: &CanvasSelector) -> Option<SurfaceHandle>;

    fn viewport(&self) -> Viewport;

    fn device_pixel_ratio(&self) -> f64;

    /// Attaches `surface` for display
    ///
    /// # Returns
    /// `true` when the surface was newly attached, `false` if it already was
    fn append_surface(&mut self, surface: &SurfaceHandle) -> bool;
}

/// In-memory host for tests and offscreen use
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    surfaces: HashMap<String, SurfaceHandle>,
    attached: HashMap<String, usize>,
    viewport: Viewport,
    pixel_ratio: f64,
}

impl HeadlessHost {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self {
            surfaces: HashMap::new(),
            attached: HashMap::new(),
            viewport: Viewport::new(width, height),
            pixel_ratio,
        }
    }

    /// Registers a surface the bootstrapper can find by id
    pub fn with_surface(mut self, id: &str) -> Self {
        self.surfaces.insert(id.to_owned(), SurfaceHandle::new(id));
        self
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
    }

    /// How many times `id` was appended
    pub fn append_count(&self, id: &str) -> usize {
        self.attached.get(id).copied().unwrap_or(0)
    }
}

impl Host for HeadlessHost {
    fn find_surface(&self, selector: &CanvasSelector) -> Option<SurfaceHandle> {
        self.surfaces.get(selector.id()).cloned()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn append_surface(&mut self, surface: &SurfaceHandle) -> bool {
        let count = self.attached.entry(surface.id.clone()).or_insert(0);
        *count += 1;
        *count == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_selector() {
        let selector = CanvasSelector::parse("#viewerCanvas").unwrap();
        assert_eq!(selector.id(), "viewerCanvas");
        assert_eq!(selector.to_string(), "#viewerCanvas");
        assert_eq!(CanvasSelector::parse("  #a ").unwrap().id(), "a");
    }

    #[test]
    fn test_parse_rejects_non_id_selectors() {
        for bad in ["viewerCanvas", "#", ".canvas", "#a b", "##a", ""] {
            assert!(
                matches!(CanvasSelector::parse(bad), Err(ViewerError::InvalidSelector(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_headless_lookup_and_append() {
        let mut host = HeadlessHost::new(800.0, 600.0, 2.0).with_surface("viewerCanvas");
        let selector = CanvasSelector::parse("#viewerCanvas").unwrap();
        let surface = host.find_surface(&selector).unwrap();

        assert!(host.find_surface(&CanvasSelector::parse("#other").unwrap()).is_none());
        assert!(host.append_surface(&surface));
        assert!(!host.append_surface(&surface));
        assert_eq!(host.append_count("viewerCanvas"), 2);
        assert_eq!(host.viewport().aspect(), 800.0 / 600.0);
    }

    #[test]
    fn test_empty_viewport() {
        assert!(Viewport::new(0.0, 600.0).is_empty());
        assert!(Viewport::new(800.0, f64::NAN).is_empty());
        assert!(!Viewport::new(1.0, 1.0).is_empty());
    }
}
