use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use cgmath::*;

/// Remaps OpenGL clip depth [-1, 1] to wgpu's [0, 1]
///
/// `Matrix4::new` takes columns: `z' = 0.5 * z + 0.5 * w`.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Perspective camera looking at a target point, Y up
///
/// The projection matrix is cached: after changing `fovy`, `aspect`, `znear`
/// or `zfar`, call [`PerspectiveCamera::update_projection_matrix`].
#[derive(Debug, Clone, Copy)]
pub struct PerspectiveCamera {
    pub fovy: Deg<f32>,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
    pub position: Point3<f32>,
    pub up: Vector3<f32>,
    target: Point3<f32>,
    projection: Matrix4<f32>,
    pub uniform: CameraUniform,
}

impl Camera for PerspectiveCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection * self.view_matrix()
    }
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, aspect: f32, znear: f32, zfar: f32) -> Self {
        let mut camera = Self {
            fovy: Deg(fov_degrees),
            aspect,
            znear,
            zfar,
            position: Point3::origin(),
            up: Vector3::unit_y(),
            target: Point3::new(0.0, 0.0, -1.0),
            projection: Matrix4::identity(),
            uniform: CameraUniform::default(),
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Point3::new(x, y, z);
    }

    /// Orients the camera towards `target`
    pub fn look_at(&mut self, target: Point3<f32>) {
        self.target = target;
    }

    pub fn target(&self) -> Point3<f32> {
        self.target
    }

    /// Recomputes the cached projection from the current lens parameters
    pub fn update_projection_matrix(&mut self) {
        self.projection =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn forward(&self) -> Vector3<f32> {
        (self.target - self.position).normalize()
    }

    pub fn right(&self) -> Vector3<f32> {
        self.forward().cross(self.up).normalize()
    }

    /// The camera's own up axis, orthogonal to its view direction
    pub fn view_up(&self) -> Vector3<f32> {
        self.right().cross(self.forward()).normalize()
    }

    /// Shader-side view of the current camera state
    pub fn uniform_data(&self) -> CameraUniform {
        let right = self.right();
        let up = self.view_up();
        CameraUniform {
            view_position: [self.position.x, self.position.y, self.position.z, 1.0],
            view_proj: convert_matrix4_to_array(self.build_view_projection_matrix()),
            right: [right.x, right.y, right.z, 0.0],
            up: [up.x, up.y, up.z, 0.0],
        }
    }

    pub fn update_view_proj(&mut self) {
        self.uniform = self.uniform_data();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_projection_is_cached_until_updated() {
        let mut camera = PerspectiveCamera::new(60.0, 1.0, 0.1, 1000.0);
        let before = camera.projection_matrix();

        camera.aspect = 2.0;
        assert_eq!(camera.projection_matrix(), before);

        camera.update_projection_matrix();
        assert_ne!(camera.projection_matrix(), before);
        // x scale halves when the aspect doubles
        assert!(approx(camera.projection_matrix().x.x * 2.0, before.x.x));
    }

    #[test]
    fn test_look_at_origin_centers_target() {
        let mut camera = PerspectiveCamera::new(60.0, 1.5, 0.1, 1000.0);
        camera.set_position(5.0, 5.0, 5.0);
        camera.look_at(Point3::origin());

        let clip = camera.build_view_projection_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!(approx(clip.x / clip.w, 0.0));
        assert!(approx(clip.y / clip.w, 0.0));
        let depth = clip.z / clip.w;
        assert!(depth > 0.0 && depth < 1.0);
    }

    #[test]
    fn test_frustum_edges_map_to_wgpu_clip_space() {
        // Default camera sits at the origin looking down -Z
        let camera = PerspectiveCamera::new(60.0, 1.0, 0.1, 1000.0);
        let project = |p: Vector4<f32>| {
            let clip = camera.build_view_projection_matrix() * p;
            clip.truncate() / clip.w
        };

        let half_fov = 30.0_f32.to_radians();
        let top = project(Vector4::new(0.0, 10.0 * half_fov.tan(), -10.0, 1.0));
        assert!(approx(top.y, 1.0), "top edge at ndc y {}", top.y);

        let near = project(Vector4::new(0.0, 0.0, -0.1, 1.0));
        assert!(approx(near.z, 0.0), "near plane at ndc z {}", near.z);

        let far = project(Vector4::new(0.0, 0.0, -1000.0, 1.0));
        assert!((far.z - 1.0).abs() < 1e-3, "far plane at ndc z {}", far.z);
    }

    #[test]
    fn test_view_axes_are_orthonormal() {
        let mut camera = PerspectiveCamera::new(60.0, 1.0, 0.1, 100.0);
        camera.set_position(5.0, 5.0, 5.0);
        camera.look_at(Point3::origin());

        let (right, up, forward) = (camera.right(), camera.view_up(), camera.forward());
        assert!(approx(right.magnitude(), 1.0));
        assert!(approx(up.magnitude(), 1.0));
        assert!(approx(right.dot(up), 0.0));
        assert!(approx(right.dot(forward), 0.0));
        assert!(right.y.abs() < 1e-5);
        assert!(up.y > 0.0);
    }
}
