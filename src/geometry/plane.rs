use glam::Vec3;

use super::Geometry;

impl Geometry {
    /// A single-segment rectangle in the XY plane facing +Z.
    pub fn plane(width: f32, height: f32) -> Geometry {
        let half_width = width * 0.5;
        let half_height = height * 0.5;

        let top_left = Vec3::new(-half_width, half_height, 0.0);
        let top_right = Vec3::new(half_width, half_height, 0.0);
        let bottom_left = Vec3::new(-half_width, -half_height, 0.0);
        let bottom_right = Vec3::new(half_width, -half_height, 0.0);

        let positions = vec![
            top_left,
            bottom_left,
            top_right,
            bottom_left,
            bottom_right,
            top_right,
        ];

        Geometry {
            name: format!("Plane {width}x{height}"),
            normals: vec![Vec3::Z; positions.len()],
            positions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::face_normal;

    #[test]
    fn two_triangles_facing_z() {
        let plane = Geometry::plane(1000.0, 1000.0);
        assert_eq!(plane.vertex_count(), 6);

        for face in plane.triangles() {
            assert_eq!(face_normal(face), Vec3::Z);
        }
    }

    #[test]
    fn spans_requested_size() {
        let plane = Geometry::plane(4.0, 2.0);
        let max_x = plane.positions.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        let min_y = plane.positions.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        assert_eq!(max_x, 2.0);
        assert_eq!(min_y, -1.0);
    }
}
