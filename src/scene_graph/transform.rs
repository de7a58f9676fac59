use glam::{Mat3, Mat4, Quat, Vec3};
use std::cell::{Cell, Ref, RefCell};

/// Translation, Euler rotation and uniform scale of a scene object.
///
/// Rotation is `(x, y, z)` in radians, applied intrinsically in X, Y, Z
/// order. The composed matrices are cached and rebuilt lazily.
#[derive(Debug, Clone)]
pub struct Transform {
    translation: Vec3,
    rotation: Vec3,
    scale: f32,

    local_matrix: RefCell<Mat4>,
    world_matrix: RefCell<Mat4>,
    normal_matrix: RefCell<Mat3>,
    local_dirty: Cell<bool>,
    world_dirty: Cell<bool>,
    has_changed_since_last_update: Cell<bool>,
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Vec3::ZERO,
            scale: 1.0,
            local_matrix: RefCell::new(Mat4::IDENTITY),
            world_matrix: RefCell::new(Mat4::IDENTITY),
            normal_matrix: RefCell::new(Mat3::IDENTITY),
            local_dirty: Cell::new(true),
            world_dirty: Cell::new(true),
            has_changed_since_last_update: Cell::new(true),
        }
    }

    pub fn quaternion(&self) -> Quat {
        Quat::from_rotation_x(self.rotation.x)
            * Quat::from_rotation_y(self.rotation.y)
            * Quat::from_rotation_z(self.rotation.z)
    }

    pub fn get_local_matrix(&self) -> Ref<'_, Mat4> {
        if self.local_dirty.get() {
            let matrix = Mat4::from_scale_rotation_translation(
                Vec3::splat(self.scale),
                self.quaternion(),
                self.translation,
            );

            self.local_matrix.replace(matrix);
            self.local_dirty.set(false);
            self.invalidate_world();
        }

        self.local_matrix.borrow()
    }

    pub fn get_world_matrix(&self) -> Ref<'_, Mat4> {
        self.world_matrix.borrow()
    }

    pub fn get_normal_matrix(&self) -> Ref<'_, Mat3> {
        self.normal_matrix.borrow()
    }

    pub fn set_world_matrix(&self, world_matrix: Mat4) {
        self.world_matrix.replace(world_matrix);
        self.world_dirty.set(false);
        self.has_changed_since_last_update.set(true);
        self.normal_matrix
            .replace(Mat3::from_mat4(world_matrix).inverse().transpose());
    }

    pub fn invalidate_local(&self) {
        self.local_dirty.set(true);
        self.world_dirty.set(true);
        self.has_changed_since_last_update.set(true);
    }

    pub fn invalidate_world(&self) {
        self.world_dirty.set(true);
    }

    pub fn is_world_dirty(&self) -> bool {
        self.world_dirty.get()
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.invalidate_local();
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
        self.invalidate_local();
    }

    #[allow(dead_code)]
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
        self.invalidate_local();
    }

    #[allow(dead_code)]
    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    #[allow(dead_code)]
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    #[allow(dead_code)]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn reset_flags(&self) {
        self.has_changed_since_last_update.set(false);
    }

    #[allow(dead_code)]
    pub fn has_changed(&self) -> bool {
        self.has_changed_since_last_update.get()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_translation(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn local_matrix_places_translation() {
        let transform = Transform::from_translation(Vec3::new(0.0, 3.0, 0.0));
        let origin = transform.get_local_matrix().transform_point3(Vec3::ZERO);
        assert_eq!(origin, Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn rotating_about_x_tips_plane_normal() {
        let mut transform = Transform::default();
        transform.set_rotation(Vec3::new(1.75, 0.0, 0.0));
        let normal = transform.get_local_matrix().transform_vector3(Vec3::Z);
        assert_relative_eq!(normal.y, -1.75_f32.sin(), epsilon = 1e-6);
        assert_relative_eq!(normal.z, 1.75_f32.cos(), epsilon = 1e-6);
    }

    #[test]
    fn euler_order_is_x_then_y() {
        let mut transform = Transform::default();
        transform.set_rotation(Vec3::new(0.3, 0.5, 0.0));
        let expected = Mat4::from_rotation_x(0.3) * Mat4::from_rotation_y(0.5);
        assert!(transform.get_local_matrix().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn mutation_marks_world_dirty() {
        let mut transform = Transform::default();
        transform.set_world_matrix(*transform.get_local_matrix());
        transform.reset_flags();
        assert!(!transform.is_world_dirty());
        assert!(!transform.has_changed());

        transform.set_scale(2.0);
        assert!(transform.is_world_dirty());
        assert!(transform.has_changed());
    }

    #[test]
    fn normal_matrix_undoes_scale() {
        let mut transform = Transform::default();
        transform.set_scale(2.0);
        transform.set_world_matrix(*transform.get_local_matrix());
        let normal = *transform.get_normal_matrix() * Vec3::Y;
        assert_relative_eq!(normal.y, 0.5);
    }
}
