use glam::Vec3;
use winit::dpi::PhysicalSize;

use crate::{
    camera::PerspectiveCamera,
    config::SceneConfig,
    geometry::{EdgesGeometry, Geometry},
    light::{AmbientLight, SpotLight, SpotLightShadow},
    material::{LineBasicMaterial, PhongMaterial, Side},
    scene_graph::{Object3D, ObjectId, ObjectKind, Scene},
};

/// Rotation accumulated from a whole number of frames, so that after `k`
/// frames the angle is exactly `k * speed` without summation drift.
#[derive(Debug, Clone, Copy)]
pub struct Spin {
    speed: f64,
    frames: u64,
}

impl Spin {
    pub fn new(speed: f64) -> Self {
        Self { speed, frames: 0 }
    }

    pub fn advance(&mut self) {
        self.frames += 1;
    }

    #[allow(dead_code)]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn angle(&self) -> f64 {
        self.frames as f64 * self.speed
    }

    /// Euler rotation shared by the polyhedron and its outline.
    pub fn rotation(&self) -> Vec3 {
        let angle = self.angle() as f32;
        Vec3::new(angle, angle, 0.0)
    }
}

pub struct DemoState {
    pub camera: PerspectiveCamera,
    pub scene: Scene,
    pub spin: Spin,
    polyhedron: ObjectId,
    outline: ObjectId,
}

impl DemoState {
    pub fn new(surface_size: PhysicalSize<u32>, config: &SceneConfig) -> Self {
        let camera =
            PerspectiveCamera::from_config(&config.camera, surface_size.width, surface_size.height);

        let mut scene = Scene::new();

        let polyhedron_config = &config.polyhedron;
        let polyhedron_geometry =
            Geometry::icosahedron(polyhedron_config.radius, polyhedron_config.detail);
        let edges = EdgesGeometry::new(&polyhedron_geometry, config.outline.threshold_degrees);
        log::debug!(
            "{}: {} vertices, bounding radius {:.2}, {} outline edges",
            polyhedron_geometry.name,
            polyhedron_geometry.vertex_count(),
            polyhedron_geometry.bounding_sphere_radius(),
            edges.len()
        );
        let polyhedron_geometry = scene.add_geometry(polyhedron_geometry);

        let mut outline = Object3D::line_segments(
            "Outline",
            edges,
            LineBasicMaterial::new(config.outline.color, config.outline.line_width),
        );
        outline
            .transform
            .set_translation(polyhedron_config.position);

        let mut polyhedron = Object3D::mesh(
            "Icosahedron",
            polyhedron_geometry,
            PhongMaterial::new(polyhedron_config.color)
                .with_wireframe(polyhedron_config.wireframe),
        )
        .with_shadows(true, false);
        polyhedron
            .transform
            .set_translation(polyhedron_config.position);

        let outline = scene.add_object(outline);
        let polyhedron = scene.add_object(polyhedron);

        let ground_config = &config.ground;
        let ground_geometry =
            scene.add_geometry(Geometry::plane(ground_config.width, ground_config.height));
        let mut ground = Object3D::mesh(
            "Ground",
            ground_geometry,
            PhongMaterial::new(ground_config.color).with_side(Side::Double),
        )
        .with_shadows(false, true);
        ground
            .transform
            .set_rotation(Vec3::new(ground_config.rotation_x, 0.0, 0.0));
        ground.transform.set_translation(ground_config.position);
        scene.add_object(ground);

        scene.add_object(Object3D::new(
            "Ambient light",
            ObjectKind::AmbientLight(AmbientLight {
                color: config.ambient.color,
                intensity: config.ambient.intensity,
            }),
        ));

        let spot_config = &config.spot;
        let shadow_config = &spot_config.shadow;
        let mut spot_light = SpotLight::new(spot_config.color, spot_config.intensity);
        spot_light.target = spot_config.target;
        spot_light.angle = spot_config.angle;
        spot_light.penumbra = spot_config.penumbra;
        spot_light.distance = spot_config.distance;
        spot_light.decay = spot_config.decay;
        spot_light.cast_shadow = spot_config.cast_shadow;
        spot_light.shadow = SpotLightShadow {
            map_width: shadow_config.map_width,
            map_height: shadow_config.map_height,
            near: shadow_config.near,
            far: shadow_config.far,
            fov_degrees: shadow_config.fov_degrees,
            bias: shadow_config.bias,
        };
        let mut spot = Object3D::new("Spot light", ObjectKind::SpotLight(spot_light));
        spot.transform.set_translation(spot_config.position);
        scene.add_object(spot);

        scene.late_update();

        log::info!(
            "Scene ready: {} objects, camera aspect {:.3}",
            scene.len(),
            camera.aspect()
        );

        Self {
            camera,
            scene,
            spin: Spin::new(config.rotation_speed),
            polyhedron,
            outline,
        }
    }

    #[allow(dead_code)]
    pub fn polyhedron(&self) -> ObjectId {
        self.polyhedron
    }

    #[allow(dead_code)]
    pub fn outline(&self) -> ObjectId {
        self.outline
    }

    pub fn update(&mut self) {
        self.spin.advance();

        let rotation = self.spin.rotation();
        self.scene.set_object_rotation(self.polyhedron, rotation);
        self.scene.set_object_rotation(self.outline, rotation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn demo() -> DemoState {
        DemoState::new(PhysicalSize::new(800, 600), &SceneConfig::default())
    }

    fn rotation_of(state: &DemoState, id: ObjectId) -> Vec3 {
        state.scene.get_object_transform(id).unwrap().rotation()
    }

    #[test]
    fn spin_is_exact_multiple_of_speed() {
        let mut spin = Spin::new(0.001);
        for k in 1..=1000u64 {
            spin.advance();
            assert_eq!(spin.angle(), k as f64 * 0.001);
        }
        assert_eq!(spin.angle(), 1.0);
        assert_eq!(spin.frames(), 1000);
    }

    #[test]
    fn scene_has_five_top_level_entries_in_order() {
        let state = demo();
        let names: Vec<_> = state
            .scene
            .objects
            .iter()
            .map(|(_, object)| object.name.as_str())
            .collect();
        assert_eq!(
            names,
            ["Outline", "Icosahedron", "Ground", "Ambient light", "Spot light"]
        );
    }

    #[test]
    fn camera_matches_surface() {
        let state = demo();
        assert_relative_eq!(state.camera.aspect(), 800.0 / 600.0);
        assert_relative_eq!(state.camera.aspect(), 1.333, epsilon = 1e-3);
    }

    #[test]
    fn polyhedron_and_outline_share_placement() {
        let state = demo();
        let polyhedron = state.scene.get_object_transform(state.polyhedron()).unwrap();
        let outline = state.scene.get_object_transform(state.outline()).unwrap();
        assert_eq!(polyhedron.translation(), Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(outline.translation(), polyhedron.translation());
        assert_eq!(polyhedron.rotation(), Vec3::ZERO);
        assert_eq!(outline.rotation(), Vec3::ZERO);
    }

    #[test]
    fn polyhedron_material_and_geometry() {
        let state = demo();
        let object = state.scene.get_object(state.polyhedron()).unwrap();
        let ObjectKind::Mesh { geometry, material } = &object.kind else {
            panic!("polyhedron is not a mesh");
        };
        assert_eq!(material.color.hex(), 0xc22e2e);
        assert!(!material.wireframe);
        assert_eq!(material.specular.hex(), 0x111111);
        assert_eq!(material.shininess, 30.0);

        let geometry = state.scene.get_geometry(*geometry).unwrap();
        assert_eq!(geometry.vertex_count(), 60);
        assert_relative_eq!(geometry.bounding_sphere_radius(), 4.0, epsilon = 1e-5);
    }

    #[test]
    fn outline_is_thick_black_edges() {
        let state = demo();
        let object = state.scene.get_object(state.outline()).unwrap();
        let ObjectKind::LineSegments { edges, material } = &object.kind else {
            panic!("outline is not line segments");
        };
        assert_eq!(edges.len(), 30);
        assert_eq!(material.color.hex(), 0x000000);
        assert_eq!(material.line_width, 10.0);
    }

    #[test]
    fn ground_lies_below_the_polyhedron() {
        let state = demo();
        let id = state.scene.get_object_by_name("Ground").unwrap();
        let ground = state.scene.get_object(id).unwrap();
        assert_eq!(ground.transform.translation(), Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(ground.transform.rotation().x, 1.75);

        let ObjectKind::Mesh { geometry, material } = &ground.kind else {
            panic!("ground is not a mesh");
        };
        assert_eq!(material.side, Side::Double);
        assert_eq!(material.color.hex(), 0x77d977);
        assert_eq!(state.scene.get_geometry(*geometry).unwrap().vertex_count(), 6);
    }

    #[test]
    fn lights_are_configured() {
        let state = demo();

        let ambient = state.scene.get_object_by_name("Ambient light").unwrap();
        let ObjectKind::AmbientLight(ambient) = &state.scene.get_object(ambient).unwrap().kind
        else {
            panic!("not an ambient light");
        };
        assert_eq!(ambient.intensity, 0.1);

        let spot = state.scene.get_object_by_name("Spot light").unwrap();
        let spot = state.scene.get_object(spot).unwrap();
        assert_eq!(spot.transform.translation(), Vec3::new(0.0, 200.0, 200.0));
        let ObjectKind::SpotLight(spot) = &spot.kind else {
            panic!("not a spot light");
        };
        assert_eq!(spot.target, Vec3::ZERO);
        assert!(spot.cast_shadow);
        assert_eq!(spot.decay, 1.0);
        assert_eq!((spot.shadow.map_width, spot.shadow.map_height), (1024, 1024));
        assert_eq!((spot.shadow.near, spot.shadow.far), (500.0, 4000.0));
        assert_eq!(spot.shadow.fov_degrees, 30.0);
    }

    #[test]
    fn rotations_stay_coupled_every_frame() {
        let mut state = demo();
        for _ in 0..250 {
            state.update();
            assert_eq!(
                rotation_of(&state, state.polyhedron()),
                rotation_of(&state, state.outline())
            );
        }
    }

    #[test]
    fn thousand_frames_turn_one_radian() {
        let mut state = demo();
        for _ in 0..1000 {
            state.update();
        }

        let rotation = rotation_of(&state, state.polyhedron());
        assert_eq!(rotation.x, 1.0);
        assert_eq!(rotation.y, 1.0);
        assert_eq!(rotation.z, 0.0);
        assert_eq!(rotation_of(&state, state.outline()), rotation);
    }

    #[test]
    fn update_leaves_static_objects_alone() {
        let mut state = demo();
        let ground = state.scene.get_object_by_name("Ground").unwrap();
        let before = rotation_of(&state, ground);
        state.update();
        assert_eq!(rotation_of(&state, ground), before);
        assert_eq!(state.camera.position, Vec3::new(0.0, 2.0, 10.0));
    }
}
