use id_arena::Id;

use crate::geometry::{EdgesGeometry, GeometryId};
use crate::light::{AmbientLight, SpotLight};
use crate::material::{LineBasicMaterial, PhongMaterial};
use crate::scene_graph::transform::Transform;

pub type ObjectId = Id<Object3D>;

#[derive(Debug, Clone)]
pub enum ObjectKind {
    Mesh {
        geometry: GeometryId,
        material: PhongMaterial,
    },
    LineSegments {
        edges: EdgesGeometry,
        material: LineBasicMaterial,
    },
    AmbientLight(AmbientLight),
    SpotLight(SpotLight),
}

#[derive(Debug, Clone)]
pub struct Object3D {
    pub name: String,
    pub transform: Transform,
    pub kind: ObjectKind,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Object3D {
    pub fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            kind,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    pub fn mesh(name: impl Into<String>, geometry: GeometryId, material: PhongMaterial) -> Self {
        Self::new(name, ObjectKind::Mesh { geometry, material })
    }

    pub fn line_segments(
        name: impl Into<String>,
        edges: EdgesGeometry,
        material: LineBasicMaterial,
    ) -> Self {
        Self::new(name, ObjectKind::LineSegments { edges, material })
    }

    pub fn with_shadows(mut self, cast_shadow: bool, receive_shadow: bool) -> Self {
        self.cast_shadow = cast_shadow;
        self.receive_shadow = receive_shadow;
        self
    }
}
