use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

/// Right-handed perspective camera looking down its local -Z axis.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    pub fov_y_degrees: f32,
    aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl PerspectiveCamera {
    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y_degrees,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
        }
    }

    pub fn from_config(config: &CameraConfig, width: u32, height: u32) -> Self {
        let aspect = width as f32 / height.max(1) as f32;
        let mut camera = Self::new(config.fov_y_degrees, aspect, config.near, config.far);
        camera.position = config.position;
        camera
    }

    /// Fixed at construction; the camera does not follow surface resizes.
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn aspect_from_surface_size() {
        let camera = PerspectiveCamera::from_config(&CameraConfig::default(), 800, 600);
        assert_relative_eq!(camera.aspect(), 800.0 / 600.0);
        assert_eq!(camera.fov_y_degrees, 75.0);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 1000.0);
        assert_eq!(camera.position, Vec3::new(0.0, 2.0, 10.0));
    }

    #[test]
    fn zero_height_does_not_divide_by_zero() {
        let camera = PerspectiveCamera::from_config(&CameraConfig::default(), 800, 0);
        assert!(camera.aspect().is_finite());
    }

    #[test]
    fn looks_down_negative_z() {
        let camera = PerspectiveCamera::from_config(&CameraConfig::default(), 800, 600);
        let ahead = camera
            .view_projection_matrix()
            .project_point3(Vec3::new(0.0, 2.0, 0.0));
        assert_relative_eq!(ahead.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(ahead.y, 0.0, epsilon = 1e-6);
        assert!(ahead.z > 0.0 && ahead.z < 1.0);
    }

    #[test]
    fn near_and_far_map_to_depth_range() {
        let camera = PerspectiveCamera::from_config(&CameraConfig::default(), 800, 600);
        let vp = camera.view_projection_matrix();
        let near = vp.project_point3(camera.position - Vec3::Z * camera.near);
        let far = vp.project_point3(camera.position - Vec3::Z * camera.far);
        assert_relative_eq!(near.z, 0.0, epsilon = 1e-5);
        assert_relative_eq!(far.z, 1.0, epsilon = 1e-5);
    }
}
