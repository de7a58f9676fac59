use glam::Vec3;

use super::Geometry;

const T: f32 = 1.618_034; // golden ratio

const VERTICES: [Vec3; 12] = [
    Vec3::new(-1.0, T, 0.0),
    Vec3::new(1.0, T, 0.0),
    Vec3::new(-1.0, -T, 0.0),
    Vec3::new(1.0, -T, 0.0),
    Vec3::new(0.0, -1.0, T),
    Vec3::new(0.0, 1.0, T),
    Vec3::new(0.0, -1.0, -T),
    Vec3::new(0.0, 1.0, -T),
    Vec3::new(T, 0.0, -1.0),
    Vec3::new(T, 0.0, 1.0),
    Vec3::new(-T, 0.0, -1.0),
    Vec3::new(-T, 0.0, 1.0),
];

const FACES: [[usize; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

impl Geometry {
    /// Icosahedron inscribed in a sphere of `radius`.
    ///
    /// `detail` splits every edge of the 20 base faces into `detail + 1`
    /// pieces and pushes the new vertices out onto the sphere. At detail 0
    /// the faces are shaded flat, above that the normals follow the sphere.
    pub fn icosahedron(radius: f32, detail: u32) -> Geometry {
        let mut positions = Vec::with_capacity(FACES.len() * 3 * (detail as usize + 1).pow(2));

        for [a, b, c] in FACES {
            subdivide_face(&mut positions, VERTICES[a], VERTICES[b], VERTICES[c], detail);
        }

        for position in &mut positions {
            *position = position.normalize() * radius;
        }

        let mut geometry = Geometry {
            name: format!("Icosahedron r={radius} detail={detail}"),
            normals: Vec::new(),
            positions,
        };

        if detail == 0 {
            geometry.compute_flat_normals();
        } else {
            geometry.normals = geometry
                .positions
                .iter()
                .map(|position| position.normalize())
                .collect();
        }

        geometry
    }
}

fn subdivide_face(out: &mut Vec<Vec3>, a: Vec3, b: Vec3, c: Vec3, detail: u32) {
    let cols = detail as usize + 1;

    // Row i runs from the a-c edge to the b-c edge and has cols - i + 1 vertices.
    let grid: Vec<Vec<Vec3>> = (0..=cols)
        .map(|i| {
            let t = i as f32 / cols as f32;
            let aj = a.lerp(c, t);
            let bj = b.lerp(c, t);
            let rows = cols - i;

            (0..=rows)
                .map(|j| {
                    if rows == 0 {
                        aj
                    } else {
                        aj.lerp(bj, j as f32 / rows as f32)
                    }
                })
                .collect()
        })
        .collect();

    for i in 0..cols {
        for j in 0..2 * (cols - i) - 1 {
            let k = j / 2;

            if j % 2 == 0 {
                out.extend([grid[i][k + 1], grid[i + 1][k], grid[i][k]]);
            } else {
                out.extend([grid[i][k + 1], grid[i + 1][k + 1], grid[i + 1][k]]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::face_normal;
    use approx::assert_relative_eq;

    #[test]
    fn base_icosahedron_has_twenty_faces() {
        let geometry = Geometry::icosahedron(4.0, 0);
        assert_eq!(geometry.vertex_count(), 60);
        assert_eq!(geometry.normals.len(), 60);
    }

    #[test]
    fn vertices_lie_on_the_sphere() {
        let geometry = Geometry::icosahedron(4.0, 0);
        for position in &geometry.positions {
            assert_relative_eq!(position.length(), 4.0, epsilon = 1e-5);
        }
        assert_relative_eq!(geometry.bounding_sphere_radius(), 4.0, epsilon = 1e-5);
    }

    #[test]
    fn faces_wind_outwards() {
        let geometry = Geometry::icosahedron(4.0, 0);
        for face in geometry.triangles() {
            let centroid = (face[0] + face[1] + face[2]) / 3.0;
            assert!(face_normal(face).dot(centroid) > 0.0);
        }
    }

    #[test]
    fn detail_zero_is_flat_shaded() {
        let geometry = Geometry::icosahedron(4.0, 0);
        for (face, normals) in geometry.triangles().zip(geometry.normals.chunks_exact(3)) {
            let expected = face_normal(face);
            for normal in normals {
                assert_relative_eq!(normal.dot(expected), 1.0, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn detail_one_quadruples_faces() {
        let geometry = Geometry::icosahedron(1.0, 1);
        assert_eq!(geometry.vertex_count(), 20 * 4 * 3);

        for (position, normal) in geometry.positions.iter().zip(&geometry.normals) {
            assert_relative_eq!(position.length(), 1.0, epsilon = 1e-5);
            assert_relative_eq!(normal.dot(*position), 1.0, epsilon = 1e-5);
        }

        for face in geometry.triangles() {
            let centroid = (face[0] + face[1] + face[2]) / 3.0;
            assert!(face_normal(face).dot(centroid) > 0.0);
        }
    }
}
