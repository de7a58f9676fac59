use std::collections::HashMap;

use glam::Vec3;

use super::{face_normal, Geometry};

/// Vertex positions are welded at this many decimal places.
const PRECISION: f32 = 1e4;

type VertexKey = (i64, i64, i64);

fn vertex_key(position: Vec3) -> VertexKey {
    (
        (position.x * PRECISION).round() as i64,
        (position.y * PRECISION).round() as i64,
        (position.z * PRECISION).round() as i64,
    )
}

struct OpenEdge {
    start: Vec3,
    end: Vec3,
    normal: Vec3,
}

/// The visible edges of a triangle mesh, as independent line segments.
///
/// An edge is kept when it borders only one face, or when the normals of
/// its two faces differ by more than the threshold angle.
#[derive(Debug, Clone)]
pub struct EdgesGeometry {
    pub segments: Vec<[Vec3; 2]>,
}

impl EdgesGeometry {
    pub const DEFAULT_THRESHOLD_DEGREES: f32 = 1.0;

    pub fn new(geometry: &Geometry, threshold_degrees: f32) -> Self {
        let threshold_dot = threshold_degrees.to_radians().cos();

        let mut open_edges: Vec<Option<OpenEdge>> = Vec::new();
        let mut edge_lookup: HashMap<(VertexKey, VertexKey), usize> = HashMap::new();
        let mut segments = Vec::new();

        for face in geometry.triangles() {
            let keys = face.map(vertex_key);
            if keys[0] == keys[1] || keys[1] == keys[2] || keys[2] == keys[0] {
                continue;
            }

            let normal = face_normal(face);

            for i in 0..3 {
                let j = (i + 1) % 3;
                let (key_a, key_b) = (keys[i], keys[j]);

                // A neighbouring face walks the shared edge in the other direction.
                if let Some(index) = edge_lookup.remove(&(key_b, key_a)) {
                    if let Some(edge) = open_edges[index].take() {
                        if normal.dot(edge.normal) <= threshold_dot {
                            segments.push([edge.start, edge.end]);
                        }
                    }
                } else if !edge_lookup.contains_key(&(key_a, key_b)) {
                    edge_lookup.insert((key_a, key_b), open_edges.len());
                    open_edges.push(Some(OpenEdge {
                        start: face[i],
                        end: face[j],
                        normal,
                    }));
                }
            }
        }

        segments.extend(
            open_edges
                .into_iter()
                .flatten()
                .map(|edge| [edge.start, edge.end]),
        );

        Self { segments }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}
