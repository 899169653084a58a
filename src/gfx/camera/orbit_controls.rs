use std::f32::consts::PI;

use cgmath::{InnerSpace, Point3, Vector3, Zero};
use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::perspective_camera::PerspectiveCamera;
use crate::config::ControlsConfig;

/// Keeps the camera off the poles, where the view basis degenerates
const POLAR_EPS: f32 = 1e-3;

/// Squared distance below which an update does not count as movement
const MOVE_EPS: f32 = 1e-6;

/// Dolly factor per wheel notch at `zoom_speed == 1`
const ZOOM_STEP: f32 = 0.95;

/// Pixel-precise wheels report this many pixels per notch
const PIXELS_PER_LINE: f32 = 50.0;

/// Orbit/pan/zoom camera manipulation around a target point
///
/// Input only accumulates deltas; [`OrbitControls::update`] applies them to a
/// camera and must be called once per frame. With damping enabled the deltas
/// decay by `damping_factor` each update instead of being applied at once.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Point3<f32>,

    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_rotate: bool,
    pub enable_pan: bool,
    pub enable_zoom: bool,

    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,

    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,

    spherical_delta: Spherical,
    pan_offset: Vector3<f32>,
    scale: f32,

    is_left_pressed: bool,
    is_right_pressed: bool,
    is_shift_held: bool,
}

impl OrbitControls {
    pub fn new(target: Point3<f32>) -> Self {
        Self::from_config(target, &ControlsConfig::default())
    }

    pub fn from_config(target: Point3<f32>, config: &ControlsConfig) -> Self {
        Self {
            target,
            enable_damping: config.enable_damping,
            damping_factor: config.damping_factor,
            enable_rotate: config.enable_rotate,
            enable_pan: config.enable_pan,
            enable_zoom: config.enable_zoom,
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            pan_speed: config.pan_speed,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            spherical_delta: Spherical::default(),
            pan_offset: Vector3::zero(),
            scale: 1.0,
            is_left_pressed: false,
            is_right_pressed: false,
            is_shift_held: false,
        }
    }

    /// Orbits by a pointer motion in pixels
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        if !self.enable_rotate {
            return;
        }
        self.rotate_left(dx * self.rotate_speed);
        self.rotate_up(dy * self.rotate_speed);
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.phi -= angle;
    }

    /// Moves the target in the view plane by a pointer motion in pixels
    ///
    /// The step scales with the orbit distance so panning feels the same at
    /// every zoom level.
    pub fn pan(&mut self, camera: &PerspectiveCamera, dx: f32, dy: f32) {
        if !self.enable_pan {
            return;
        }
        let distance = (camera.position - self.target).magnitude();
        let step = distance * self.pan_speed;
        self.pan_offset += (-camera.right() * dx + camera.view_up() * dy) * step;
    }

    /// Zooms by wheel notches; positive moves towards the target
    pub fn dolly(&mut self, notches: f32) {
        if !self.enable_zoom {
            return;
        }
        self.scale *= ZOOM_STEP.powf(self.zoom_speed).powf(notches);
    }

    /// Applies pending input to the camera
    ///
    /// Returns true when the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let previous_position = camera.position;
        let previous_target = self.target;

        let mut spherical = Spherical::from_offset(camera.position - self.target);
        let factor = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        spherical.theta += self.spherical_delta.theta * factor;
        spherical.phi += self.spherical_delta.phi * factor;
        spherical.phi = spherical
            .phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(POLAR_EPS, PI - POLAR_EPS);
        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        self.target += self.pan_offset * factor;

        camera.position = self.target + spherical.to_offset();
        camera.look_at(self.target);

        if self.enable_damping {
            self.spherical_delta.theta *= 1.0 - self.damping_factor;
            self.spherical_delta.phi *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.spherical_delta = Spherical::default();
            self.pan_offset = Vector3::zero();
        }
        self.scale = 1.0;

        (camera.position - previous_position).magnitude2() > MOVE_EPS
            || (self.target - previous_target).magnitude2() > MOVE_EPS
    }

    /// Tracks pointer buttons, wheel and modifier keys
    pub fn process_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = *state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.is_left_pressed = pressed,
                    MouseButton::Right => self.is_right_pressed = pressed,
                    _ => (),
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let notches = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => {
                        *y as f32 / PIXELS_PER_LINE
                    }
                };
                self.dolly(notches);
            }
            WindowEvent::KeyboardInput { event, .. } => self.process_keyed_event(event),
            WindowEvent::Focused(false) => {
                self.is_left_pressed = false;
                self.is_right_pressed = false;
                self.is_shift_held = false;
            }
            _ => (),
        }
    }

    fn process_keyed_event(&mut self, event: &KeyEvent) {
        if let KeyEvent {
            physical_key: PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight),
            state,
            ..
        } = event
        {
            self.is_shift_held = *state == ElementState::Pressed;
        }
    }

    /// Turns raw pointer motion into orbit or pan, depending on the held buttons
    pub fn process_device_event(&mut self, event: &DeviceEvent, camera: &PerspectiveCamera) {
        if let DeviceEvent::MouseMotion { delta } = event {
            let (dx, dy) = (delta.0 as f32, delta.1 as f32);
            if self.is_panning() {
                self.pan(camera, dx, dy);
            } else if self.is_rotating() {
                self.rotate(dx, dy);
            }
        }
    }

    /// Right drag, or Shift + left drag
    pub fn is_panning(&self) -> bool {
        self.is_right_pressed || (self.is_left_pressed && self.is_shift_held)
    }

    pub fn is_rotating(&self) -> bool {
        self.is_left_pressed && !self.is_shift_held
    }
}

/// Spherical coordinates around +Y; `theta` is measured from +Z towards +X
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Spherical {
    radius: f32,
    theta: f32,
    phi: f32,
}

impl Spherical {
    fn from_offset(offset: Vector3<f32>) -> Self {
        let radius = offset.magnitude();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vector3<f32> {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vector3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::EuclideanSpace;

    fn stock_camera() -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(60.0, 1.5, 0.1, 1000.0);
        camera.set_position(5.0, 5.0, 5.0);
        camera.look_at(Point3::origin());
        camera
    }

    fn distance(camera: &PerspectiveCamera, controls: &OrbitControls) -> f32 {
        (camera.position - controls.target).magnitude()
    }

    #[test]
    fn test_spherical_round_trip_of_stock_position() {
        let offset = Vector3::new(5.0, 5.0, 5.0);
        let back = Spherical::from_offset(offset).to_offset();
        assert!((back - offset).magnitude() < 1e-4);
    }

    #[test]
    fn test_update_without_input_keeps_camera_still() {
        let mut camera = stock_camera();
        let mut controls = OrbitControls::new(Point3::origin());
        let moved = controls.update(&mut camera);
        assert!(!moved);
        assert!((camera.position - Point3::new(5.0, 5.0, 5.0)).magnitude() < 1e-4);
    }

    #[test]
    fn test_rotation_preserves_distance() {
        let mut camera = stock_camera();
        let mut controls = OrbitControls::new(Point3::origin());
        controls.enable_damping = false;
        let before = distance(&camera, &controls);

        controls.rotate(120.0, 40.0);
        assert!(controls.update(&mut camera));
        assert!((distance(&camera, &controls) - before).abs() < 1e-4);
        assert_eq!(camera.target(), controls.target);
    }

    #[test]
    fn test_damping_converges_to_full_rotation() {
        let mut damped_camera = stock_camera();
        let mut damped = OrbitControls::new(Point3::origin());
        damped.rotate_left(0.5);

        let mut direct_camera = stock_camera();
        let mut direct = OrbitControls::new(Point3::origin());
        direct.enable_damping = false;
        direct.rotate_left(0.5);
        direct.update(&mut direct_camera);

        // First damped step only covers a fraction of the rotation
        damped.update(&mut damped_camera);
        assert!((damped_camera.position - direct_camera.position).magnitude() > 0.1);

        for _ in 0..600 {
            damped.update(&mut damped_camera);
        }
        assert!((damped_camera.position - direct_camera.position).magnitude() < 1e-3);
    }

    #[test]
    fn test_dolly_moves_towards_target() {
        let mut camera = stock_camera();
        let mut controls = OrbitControls::new(Point3::origin());
        let before = distance(&camera, &controls);

        controls.dolly(3.0);
        controls.update(&mut camera);
        assert!(distance(&camera, &controls) < before);

        controls.dolly(-6.0);
        controls.update(&mut camera);
        assert!(distance(&camera, &controls) > before);
    }

    #[test]
    fn test_pan_moves_target_and_camera_together() {
        let mut camera = stock_camera();
        let mut controls = OrbitControls::new(Point3::origin());
        controls.enable_damping = false;
        let offset_before = camera.position - controls.target;

        controls.pan(&camera, 30.0, 0.0);
        controls.update(&mut camera);

        assert!(controls.target.to_vec().magnitude() > 0.0);
        assert!(((camera.position - controls.target) - offset_before).magnitude() < 1e-4);
    }

    #[test]
    fn test_disabled_features_ignore_input() {
        let mut camera = stock_camera();
        let mut controls = OrbitControls::new(Point3::origin());
        controls.enable_rotate = false;
        controls.enable_pan = false;
        controls.enable_zoom = false;

        controls.rotate(100.0, 100.0);
        controls.pan(&camera, 100.0, 100.0);
        controls.dolly(5.0);
        assert!(!controls.update(&mut camera));
    }

    #[test]
    fn test_polar_angle_is_clamped() {
        let mut camera = stock_camera();
        let mut controls = OrbitControls::new(Point3::origin());
        controls.enable_damping = false;

        controls.rotate_up(10.0);
        controls.update(&mut camera);
        assert!(camera.position.y > 0.0);
        let right = camera.right();
        assert!(right.x.is_finite() && right.y.is_finite() && right.z.is_finite());
    }
}
