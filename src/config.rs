use glam::Vec3;

use crate::color::Color;

#[derive(Debug, Clone, Default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub scene: SceneConfig,
}

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "icoscene".to_string(),
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub antialias: bool,
    pub transparent_background: bool,
    /// Sample count used when `antialias` is on.
    pub msaa_samples: u32,
}

impl RenderConfig {
    pub fn sample_count(&self) -> u32 {
        if self.antialias {
            self.msaa_samples.max(1)
        } else {
            1
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            antialias: true,
            transparent_background: true,
            msaa_samples: 4,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Radians added to the X and Y rotation of the polyhedron every frame.
    pub rotation_speed: f64,
    pub camera: CameraConfig,
    pub polyhedron: PolyhedronConfig,
    pub outline: OutlineConfig,
    pub ground: GroundConfig,
    pub ambient: AmbientLightConfig,
    pub spot: SpotLightConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            rotation_speed: 0.001,
            camera: CameraConfig::default(),
            polyhedron: PolyhedronConfig::default(),
            outline: OutlineConfig::default(),
            ground: GroundConfig::default(),
            ambient: AmbientLightConfig::default(),
            spot: SpotLightConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 2.0, 10.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PolyhedronConfig {
    pub radius: f32,
    pub detail: u32,
    pub color: Color,
    pub wireframe: bool,
    pub position: Vec3,
}

impl Default for PolyhedronConfig {
    fn default() -> Self {
        Self {
            radius: 4.0,
            detail: 0,
            color: Color::from_hex(0xc22e2e),
            wireframe: false,
            position: Vec3::new(0.0, 3.0, 0.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutlineConfig {
    pub color: Color,
    /// In pixels.
    pub line_width: f32,
    pub threshold_degrees: f32,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            line_width: 10.0,
            threshold_degrees: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GroundConfig {
    pub width: f32,
    pub height: f32,
    pub color: Color,
    pub rotation_x: f32,
    pub position: Vec3,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 1000.0,
            color: Color::from_hex(0x77d977),
            rotation_x: 1.75,
            position: Vec3::new(0.0, -1.0, 0.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AmbientLightConfig {
    pub color: Color,
    pub intensity: f32,
}

impl Default for AmbientLightConfig {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpotLightConfig {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub angle: f32,
    pub penumbra: f32,
    /// 0 disables the distance cutoff.
    pub distance: f32,
    pub decay: f32,
    pub cast_shadow: bool,
    pub shadow: ShadowConfig,
}

impl Default for SpotLightConfig {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
            position: Vec3::new(0.0, 200.0, 200.0),
            target: Vec3::ZERO,
            angle: std::f32::consts::FRAC_PI_3,
            penumbra: 0.0,
            distance: 0.0,
            decay: 1.0,
            cast_shadow: true,
            shadow: ShadowConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShadowConfig {
    pub map_width: u32,
    pub map_height: u32,
    pub near: f32,
    pub far: f32,
    pub fov_degrees: f32,
    pub bias: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            map_width: 1024,
            map_height: 1024,
            near: 500.0,
            far: 4000.0,
            fov_degrees: 30.0,
            bias: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_count_follows_antialias() {
        let mut config = RenderConfig::default();
        assert_eq!(config.sample_count(), 4);

        config.antialias = false;
        assert_eq!(config.sample_count(), 1);
    }
}
