//! Indexed triangle mesh.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Aabb, Triangle};

/// A triangle mesh with indexed vertices.
///
/// The arena form produced by vertex welding: positions live in one flat
/// list, faces reference them by `u32` index. No shared pointers, no
/// per-vertex attributes. Face winding is whatever the input had; the
/// orientation resolver recovers a consistent winding per component
/// without mutating the mesh.
///
/// # Example
///
/// ```
/// use volume_types::{Point3, SurfaceMesh};
///
/// let mut mesh = SurfaceMesh::new();
/// mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
/// mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
/// mesh.vertices.push(Point3::new(0.5, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurfaceMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3<f64>>,
    /// Triangle faces as vertex index triples.
    pub faces: Vec<[u32; 3]>,
}

impl SurfaceMesh {
    /// Create an empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create an empty mesh with preallocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(faces),
        }
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh has no faces.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Get the concrete triangle for a face index.
    ///
    /// # Panics
    ///
    /// Panics if the face index is out of range or the face references a
    /// vertex that does not exist. Meshes built by the welder always have
    /// in-range indices.
    #[inline]
    #[must_use]
    pub fn triangle(&self, face_index: usize) -> Triangle {
        let [i0, i1, i2] = self.faces[face_index];
        Triangle::new(
            self.vertices[i0 as usize],
            self.vertices[i1 as usize],
            self.vertices[i2 as usize],
        )
    }

    /// Iterate over all faces as concrete triangles.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.faces.len()).map(|i| self.triangle(i))
    }

    /// Compute the bounding box over all vertices.
    ///
    /// Returns [`Aabb::empty`] for a mesh with no vertices.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter())
    }
}

/// Helper function to create a unit cube mesh.
///
/// Creates a cube from (0,0,0) to (1,1,1) with outward-facing normals,
/// enclosing exactly 1.0 of volume. Used by tests and benchmarks as the
/// simplest closed mesh.
///
/// # Example
///
/// ```
/// use volume_types::unit_cube;
///
/// let cube = unit_cube();
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.face_count(), 12);
/// ```
#[must_use]
pub fn unit_cube() -> SurfaceMesh {
    let mut mesh = SurfaceMesh::with_capacity(8, 12);

    mesh.vertices.push(Point3::new(0.0, 0.0, 0.0)); // 0
    mesh.vertices.push(Point3::new(1.0, 0.0, 0.0)); // 1
    mesh.vertices.push(Point3::new(1.0, 1.0, 0.0)); // 2
    mesh.vertices.push(Point3::new(0.0, 1.0, 0.0)); // 3
    mesh.vertices.push(Point3::new(0.0, 0.0, 1.0)); // 4
    mesh.vertices.push(Point3::new(1.0, 0.0, 1.0)); // 5
    mesh.vertices.push(Point3::new(1.0, 1.0, 1.0)); // 6
    mesh.vertices.push(Point3::new(0.0, 1.0, 1.0)); // 7

    // Two triangles per cube face, CCW when viewed from outside

    // Bottom (z=0), normal -Z
    mesh.faces.push([0, 2, 1]);
    mesh.faces.push([0, 3, 2]);

    // Top (z=1), normal +Z
    mesh.faces.push([4, 5, 6]);
    mesh.faces.push([4, 6, 7]);

    // Front (y=0), normal -Y
    mesh.faces.push([0, 1, 5]);
    mesh.faces.push([0, 5, 4]);

    // Back (y=1), normal +Y
    mesh.faces.push([3, 7, 6]);
    mesh.faces.push([3, 6, 2]);

    // Left (x=0), normal -X
    mesh.faces.push([0, 4, 7]);
    mesh.faces.push([0, 7, 3]);

    // Right (x=1), normal +X
    mesh.faces.push([1, 2, 6]);
    mesh.faces.push([1, 6, 5]);

    mesh
}
