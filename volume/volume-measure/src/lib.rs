//! Volume measurement for STL triangle meshes.
//!
//! This crate provides tools for:
//! - Degenerate triangle removal
//! - Vertex welding (merge nearby vertices)
//! - Connected component analysis
//! - Winding order repair
//! - Watertightness and manifoldness diagnostics
//! - Ray-cast point-in-mesh classification
//! - Nesting-aware signed volume (internal cavities subtract)
//!
//! The pipeline is deliberately forgiving: meshes straight from export
//! tools often carry duplicated vertices, mixed winding, slivers or open
//! seams, and the measurement still produces a best-effort volume while
//! reporting every issue it worked around.
//!
//! # Example
//!
//! ```
//! use volume_measure::{measure_triangles, unit_cube, VolumeParams};
//!
//! let soup: Vec<_> = unit_cube().triangles().collect();
//! let report = measure_triangles(&soup, &VolumeParams::default());
//!
//! assert!((report.volume - 1.0).abs() < 1e-9);
//! assert_eq!(report.component_count(), 1);
//! assert!(report.is_clean());
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod measure;
mod params;
mod raycast;
mod report;
mod topology;
mod weld;

pub use measure::{calculate_stl_volume, measure_stl_volume, measure_triangles};
pub use params::VolumeParams;
pub use raycast::{find_interior_point, point_in_mesh, ray_triangle_intersection};
pub use report::{ComponentReport, Diagnostic, VolumeReport};
pub use topology::{Component, OrientationResolution, resolve_orientation};
pub use weld::{drop_degenerate, weld_vertices};

pub use volume_types::{Aabb, Point3, SurfaceMesh, Triangle, Vector3, unit_cube};
