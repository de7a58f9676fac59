mod edges;
mod icosahedron;
mod plane;

pub use edges::EdgesGeometry;

use glam::Vec3;
use id_arena::Id;

pub type GeometryId = Id<Geometry>;

/// Non-indexed triangle list: every three consecutive vertices form a face,
/// wound counter-clockwise when seen from the front.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
}

impl Geometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.positions
            .chunks_exact(3)
            .map(|face| [face[0], face[1], face[2]])
    }

    pub fn bounding_sphere_radius(&self) -> f32 {
        self.positions
            .iter()
            .map(|position| position.length())
            .fold(0.0, f32::max)
    }

    fn compute_flat_normals(&mut self) {
        self.normals = self
            .triangles()
            .flat_map(|face| {
                let normal = face_normal(face);
                [normal; 3]
            })
            .collect();
    }
}

pub(crate) fn face_normal([a, b, c]: [Vec3; 3]) -> Vec3 {
    (b - a).cross(c - a).normalize_or_zero()
}
