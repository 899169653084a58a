//! Native application driver
//!
//! Opens a `winit` window that stands in for the drawing surface, runs the
//! bootstrapper and the product builder against it, attaches the GPU
//! backend and drives the frame loop.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{DeviceEvent, DeviceId, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::config::ViewerConfig;
use crate::error::{Result, ViewerError};
use crate::gfx::rendering::render_engine::{EngineSettings, RenderEngine};
use crate::host::{CanvasSelector, Host, SurfaceHandle, Viewport};
use crate::product::create_product;
use crate::viewer::Viewer;

/// [`Host`] backed by a single window
///
/// The window is the only surface; its id is the selector's id. It starts
/// hidden and is shown when the surface is appended.
pub struct WindowHost {
    window: Arc<Window>,
    surface_id: String,
    attached: bool,
}

impl WindowHost {
    pub fn new(window: Arc<Window>, surface_id: &str) -> Self {
        Self {
            window,
            surface_id: surface_id.to_owned(),
            attached: false,
        }
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }
}

impl Host for WindowHost {
    fn find_surface(&self, selector: &CanvasSelector) -> Option<SurfaceHandle> {
        (selector.id() == self.surface_id).then(|| SurfaceHandle::new(&self.surface_id))
    }

    fn viewport(&self) -> Viewport {
        let size = self
            .window
            .inner_size()
            .to_logical::<f64>(self.window.scale_factor());
        Viewport::new(size.width, size.height)
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.scale_factor()
    }

    fn append_surface(&mut self, surface: &SurfaceHandle) -> bool {
        if surface.id != self.surface_id || self.attached {
            return false;
        }
        self.window.set_visible(true);
        self.attached = true;
        true
    }
}

pub struct ShowroomApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: ViewerConfig,
    host: Option<WindowHost>,
    viewer: Option<Viewer>,
    error: Option<ViewerError>,
}

impl ShowroomApp {
    pub fn new(config: ViewerConfig) -> Result<Self> {
        let event_loop = EventLoop::new()?;
        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                host: None,
                viewer: None,
                error: None,
            },
        })
    }

    /// Runs the event loop until the window closes
    ///
    /// # Errors
    /// The startup or GPU error that ended the loop, if any
    pub fn run(mut self) -> Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .ok_or_else(|| ViewerError::Window("event loop already consumed".into()))?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;

        match self.app_state.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let selector = CanvasSelector::parse(&self.config.canvas_selector)?;
        let (width, height) = self.config.window_size;
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title(selector.id())
                    .with_inner_size(LogicalSize::new(width, height))
                    .with_visible(false),
            )
            .map_err(|e| ViewerError::Window(e.to_string()))?;
        let window = Arc::new(window);

        let mut host = WindowHost::new(window.clone(), selector.id());
        let mut viewer = Viewer::initialize(&mut host, &self.config)?;
        create_product(&mut viewer.scene);

        let (buffer_width, buffer_height) = viewer.renderer.drawing_buffer_size();
        let settings = EngineSettings {
            antialias: self.config.renderer.antialias,
            vsync: self.config.renderer.vsync,
            clear_color: self.config.renderer.clear_color,
            ..Default::default()
        };
        let engine = pollster::block_on(RenderEngine::new(
            window.clone(),
            buffer_width,
            buffer_height,
            settings,
        ))?;
        viewer.renderer.attach_engine(engine);

        window.request_redraw();
        self.host = Some(host);
        self.viewer = Some(viewer);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: ViewerError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewer.is_some() || self.error.is_some() {
            return;
        }
        if let Err(error) = self.start(event_loop) {
            self.fail(event_loop, error);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let (Some(viewer), Some(host)) = (self.viewer.as_mut(), self.host.as_ref()) else {
            return;
        };

        viewer.controls.process_window_event(&event);

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            }
            | WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                viewer.handle_resize(host);
            }
            WindowEvent::RedrawRequested => {
                if let Err(error) = viewer.render() {
                    self.fail(event_loop, error);
                }
            }
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let Some(viewer) = self.viewer.as_mut() {
            viewer.controls.process_device_event(&event, &viewer.camera);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(host) = self.host.as_ref() {
            host.window().request_redraw();
        }
    }
}
