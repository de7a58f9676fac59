use glam::{Mat4, Vec3};

use crate::color::Color;

#[derive(Debug, Clone)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

#[derive(Debug, Clone)]
pub struct SpotLightShadow {
    pub map_width: u32,
    pub map_height: u32,
    pub near: f32,
    pub far: f32,
    pub fov_degrees: f32,
    pub bias: f32,
}

impl Default for SpotLightShadow {
    fn default() -> Self {
        Self {
            map_width: 512,
            map_height: 512,
            near: 0.5,
            far: 500.0,
            fov_degrees: 50.0,
            bias: 0.0,
        }
    }
}

/// A cone of light aimed at `target`. Where it shines from is the owning
/// object's world position.
#[derive(Debug, Clone)]
pub struct SpotLight {
    pub color: Color,
    pub intensity: f32,
    pub target: Vec3,
    /// Half-angle of the cone in radians.
    pub angle: f32,
    /// Fraction of the cone, from the rim inwards, that fades out.
    pub penumbra: f32,
    /// Range cutoff. 0 means unlimited.
    pub distance: f32,
    pub decay: f32,
    pub cast_shadow: bool,
    pub shadow: SpotLightShadow,
}

impl SpotLight {
    pub fn new(color: Color, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            target: Vec3::ZERO,
            angle: std::f32::consts::FRAC_PI_3,
            penumbra: 0.0,
            distance: 0.0,
            decay: 2.0,
            cast_shadow: false,
            shadow: SpotLightShadow::default(),
        }
    }

    pub fn direction(&self, position: Vec3) -> Vec3 {
        (self.target - position).normalize_or_zero()
    }

    pub fn cone_cos(&self) -> f32 {
        self.angle.cos()
    }

    pub fn penumbra_cos(&self) -> f32 {
        (self.angle * (1.0 - self.penumbra)).cos()
    }

    pub fn shadow_view_projection(&self, position: Vec3) -> Mat4 {
        let direction = self.direction(position);
        // look_at_rh degenerates when looking straight along the up vector.
        let up = if direction.cross(Vec3::Y).length_squared() < 1e-6 {
            Vec3::Z
        } else {
            Vec3::Y
        };

        let view = Mat4::look_at_rh(position, self.target, up);
        let aspect = self.shadow.map_width as f32 / self.shadow.map_height as f32;
        let projection = Mat4::perspective_rh(
            self.shadow.fov_degrees.to_radians(),
            aspect,
            self.shadow.near,
            self.shadow.far,
        );

        projection * view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const OVERHEAD: Vec3 = Vec3::new(0.0, 200.0, 200.0);

    fn overhead_light() -> SpotLight {
        let mut light = SpotLight::new(Color::WHITE, 1.0);
        light.shadow.near = 100.0;
        light.shadow.far = 1000.0;
        light
    }

    #[test]
    fn points_at_target() {
        let light = overhead_light();
        let direction = light.direction(OVERHEAD);
        assert_relative_eq!(direction.y, -std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-6);
        assert_relative_eq!(direction.z, -std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-6);
    }

    #[test]
    fn hard_cone_without_penumbra() {
        let light = overhead_light();
        assert_eq!(light.cone_cos(), light.penumbra_cos());
        assert_relative_eq!(light.cone_cos(), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn shadow_projection_centres_target() {
        let light = overhead_light();
        let projected = light.shadow_view_projection(OVERHEAD).project_point3(Vec3::ZERO);
        assert_relative_eq!(projected.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(projected.y, 0.0, epsilon = 1e-5);
        assert!(projected.z > 0.0 && projected.z < 1.0);
    }

    #[test]
    fn shadow_projection_survives_vertical_light() {
        let light = overhead_light();
        let matrix = light.shadow_view_projection(Vec3::new(0.0, 300.0, 0.0));
        assert!(matrix.is_finite());
    }
}
