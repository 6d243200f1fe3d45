//! The regular icosahedron every planet mesh starts from.

use glam::DVec3;

use crate::project_to_sphere;

/// Number of base faces.
pub const FACE_COUNT: usize = 20;
/// Number of base vertices.
pub const CORNER_COUNT: usize = 12;

/// Golden ratio.
const PHI: f64 = 1.618_033_988_749_895;

/// Vertex triples of the 20 faces, counter-clockwise seen from outside.
const FACES: [[usize; 3]; FACE_COUNT] = [
    // Five faces around vertex 0.
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    // Five adjacent faces.
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    // Five faces around vertex 3.
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    // Five adjacent faces.
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// A regular icosahedron inscribed in a sphere.
#[derive(Clone, Debug)]
pub struct Icosahedron {
    /// The 12 corners, each at distance `radius` from the origin.
    pub vertices: [DVec3; CORNER_COUNT],
    /// The 20 faces as indices into `vertices`, all wound the same way.
    pub faces: [[usize; 3]; FACE_COUNT],
}

impl Icosahedron {
    /// Build the icosahedron for a sphere of `radius`.
    pub fn new(radius: f64) -> Self {
        let unit = [
            DVec3::new(-1.0, PHI, 0.0),
            DVec3::new(1.0, PHI, 0.0),
            DVec3::new(-1.0, -PHI, 0.0),
            DVec3::new(1.0, -PHI, 0.0),
            DVec3::new(0.0, -1.0, PHI),
            DVec3::new(0.0, 1.0, PHI),
            DVec3::new(0.0, -1.0, -PHI),
            DVec3::new(0.0, 1.0, -PHI),
            DVec3::new(PHI, 0.0, -1.0),
            DVec3::new(PHI, 0.0, 1.0),
            DVec3::new(-PHI, 0.0, -1.0),
            DVec3::new(-PHI, 0.0, 1.0),
        ];
        Self {
            vertices: unit.map(|v| project_to_sphere(v, radius)),
            faces: FACES,
        }
    }

    /// Corner positions of face `index` in winding order.
    pub fn face(&self, index: usize) -> [DVec3; 3] {
        self.faces[index].map(|v| self.vertices[v])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_counts() {
        let ico = Icosahedron::new(1.0);
        assert_eq!(ico.vertices.len(), 12);
        assert_eq!(ico.faces.len(), 20);
    }

    #[test]
    fn test_vertices_on_sphere() {
        for radius in [0.5, 1.0, 10.0, 6_371.0] {
            let ico = Icosahedron::new(radius);
            for v in ico.vertices {
                assert!(
                    (v.length() - radius).abs() < EPSILON * radius,
                    "vertex {v} not on sphere of radius {radius}"
                );
            }
        }
    }

    #[test]
    fn test_winding_is_outward_for_every_face() {
        let ico = Icosahedron::new(10.0);
        for i in 0..FACE_COUNT {
            let [a, b, c] = ico.face(i);
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "face {i} is wound inward");
        }
    }

    #[test]
    fn test_every_edge_shared_by_two_faces_in_opposite_directions() {
        let ico = Icosahedron::new(1.0);
        let mut directed = Vec::new();
        for [a, b, c] in ico.faces {
            directed.extend([(a, b), (b, c), (c, a)]);
        }
        for &(a, b) in &directed {
            assert_eq!(directed.iter().filter(|&&e| e == (a, b)).count(), 1);
            assert_eq!(directed.iter().filter(|&&e| e == (b, a)).count(), 1);
        }
    }

    #[test]
    fn test_each_corner_touches_five_faces() {
        let ico = Icosahedron::new(1.0);
        for v in 0..CORNER_COUNT {
            let touching = ico.faces.iter().filter(|f| f.contains(&v)).count();
            assert_eq!(touching, 5, "corner {v} touches {touching} faces");
        }
    }

    #[test]
    fn test_edges_have_equal_length() {
        let ico = Icosahedron::new(3.0);
        let [a, b, _] = ico.face(0);
        let reference = a.distance(b);
        for i in 0..FACE_COUNT {
            let [a, b, c] = ico.face(i);
            for len in [a.distance(b), b.distance(c), c.distance(a)] {
                assert!((len - reference).abs() < EPSILON);
            }
        }
    }
}
