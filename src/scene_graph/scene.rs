use glam::Vec3;
use id_arena::Arena;

use crate::geometry::{Geometry, GeometryId};
use crate::scene_graph::object3d::{Object3D, ObjectId};
use crate::scene_graph::transform::Transform;

/// Flat container of scene objects. Every object is a top-level entry and
/// objects iterate in insertion order.
pub struct Scene {
    pub objects: Arena<Object3D>,
    pub geometries: Arena<Geometry>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
            geometries: Arena::new(),
        }
    }

    pub fn add_object(&mut self, object: Object3D) -> ObjectId {
        log::debug!("Adding object {} to scene", object.name);
        self.objects.alloc(object)
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        self.geometries.alloc(geometry)
    }

    #[allow(dead_code)]
    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    #[allow(dead_code)]
    pub fn get_object_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    pub fn get_geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.geometries.get(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[allow(dead_code)]
    pub fn set_object_translation(&mut self, object_id: ObjectId, translation: Vec3) {
        if let Some(object) = self.objects.get_mut(object_id) {
            object.transform.set_translation(translation);
        }
    }

    pub fn set_object_rotation(&mut self, object_id: ObjectId, rotation: Vec3) {
        if let Some(object) = self.objects.get_mut(object_id) {
            object.transform.set_rotation(rotation);
        }
    }

    pub fn get_object_transform(&self, object_id: ObjectId) -> Option<&Transform> {
        self.objects.get(object_id).map(|object| &object.transform)
    }

    pub fn early_update(&mut self) {
        for (_, object) in self.objects.iter() {
            object.transform.reset_flags();
        }
    }

    /// Rebuilds the world matrix of every object whose transform changed.
    pub fn late_update(&mut self) {
        for (_, object) in self.objects.iter() {
            if object.transform.is_world_dirty() {
                let local_matrix = *object.transform.get_local_matrix();
                object.transform.set_world_matrix(local_matrix);
            }
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::light::AmbientLight;
    use crate::material::PhongMaterial;
    use crate::scene_graph::object3d::ObjectKind;

    fn scene_with_mesh() -> (Scene, ObjectId) {
        let mut scene = Scene::new();
        let geometry = scene.add_geometry(Geometry::plane(1.0, 1.0));
        let mesh = scene.add_object(Object3D::mesh(
            "Ground",
            geometry,
            PhongMaterial::new(Color::WHITE),
        ));
        (scene, mesh)
    }

    #[test]
    fn finds_objects_by_name() {
        let (mut scene, mesh) = scene_with_mesh();
        let light = scene.add_object(Object3D::new(
            "Ambient",
            ObjectKind::AmbientLight(AmbientLight {
                color: Color::WHITE,
                intensity: 1.0,
            }),
        ));

        assert_eq!(scene.len(), 2);
        assert_eq!(scene.get_object_by_name("Ground"), Some(mesh));
        assert_eq!(scene.get_object_by_name("Ambient"), Some(light));
        assert_eq!(scene.get_object_by_name("Missing"), None);
    }

    #[test]
    fn late_update_applies_pending_changes() {
        let (mut scene, mesh) = scene_with_mesh();
        scene.set_object_translation(mesh, Vec3::new(0.0, -1.0, 0.0));
        scene.late_update();

        let world = *scene.get_object_transform(mesh).unwrap().get_world_matrix();
        assert_eq!(world.transform_point3(Vec3::ZERO), Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn world_matrix_lags_until_late_update() {
        let (mut scene, mesh) = scene_with_mesh();
        scene.late_update();
        scene.early_update();
        assert!(!scene.get_object_transform(mesh).unwrap().has_changed());

        scene.set_object_translation(mesh, Vec3::X);
        let transform = scene.get_object_transform(mesh).unwrap();
        assert_eq!(transform.get_world_matrix().transform_point3(Vec3::ZERO), Vec3::ZERO);

        scene.late_update();
        let transform = scene.get_object_transform(mesh).unwrap();
        assert_eq!(transform.get_world_matrix().transform_point3(Vec3::ZERO), Vec3::X);
    }
}
