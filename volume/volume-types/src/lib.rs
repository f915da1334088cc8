//! Core geometry types for STL volume measurement.
//!
//! This crate provides the foundational types shared by the loader and the
//! measurement pipeline:
//!
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`Aabb`] - Axis-aligned bounding box
//! - [`SurfaceMesh`] - A triangle mesh with indexed vertices
//!
//! It has no I/O and no algorithms beyond per-triangle geometry, so it can be
//! used from CLI tools, servers, WASM, or language bindings.
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f64`; volumes come
//! out in the cube of whatever unit the input used.
//!
//! # Coordinate System
//!
//! Right-handed. Face winding is **counter-clockwise when viewed from
//! outside**; normals point outward by the right-hand rule. Input meshes are
//! not trusted to follow this convention, which is why the measurement
//! pipeline re-derives orientation.
//!
//! # Example
//!
//! ```
//! use volume_types::{Point3, SurfaceMesh};
//!
//! let mut mesh = SurfaceMesh::new();
//! mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
//! mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
//! mesh.vertices.push(Point3::new(0.5, 1.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!(!mesh.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod mesh;
mod triangle;

pub use bounds::Aabb;
pub use mesh::{unit_cube, SurfaceMesh};
pub use triangle::Triangle;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
