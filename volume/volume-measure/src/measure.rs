//! Core volume measurement pipeline.
//!
//! Measurement runs load, degenerate filtering, welding, orientation repair,
//! per-component integration and nesting resolution in sequence. Imperfect
//! meshes never abort the pipeline; issues are logged and recorded as
//! diagnostics while the volume is carried through as a best-effort estimate.

use std::path::Path;

use tracing::{debug, warn};
use volume_io::load_stl;
use volume_types::{Aabb, Point3, SurfaceMesh, Triangle};

use crate::params::VolumeParams;
use crate::raycast::{find_interior_point, point_in_mesh};
use crate::report::{ComponentReport, Diagnostic, VolumeReport};
use crate::topology::{Component, resolve_orientation};
use crate::weld::{drop_degenerate, weld_vertices};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Measure the volume of an STL file.
///
/// This is the high-level entry point: it loads the file, measures it with
/// the default parameters (or the given welding tolerance), and returns the
/// nesting-aware total volume in the cube of the model's units. Unreadable
/// or empty files measure as zero rather than failing.
///
/// # Example
///
/// ```
/// let volume = volume_measure::calculate_stl_volume("no-such-file.stl", None);
/// assert!(volume.abs() < 1e-12);
/// ```
#[must_use]
pub fn calculate_stl_volume<P: AsRef<Path>>(path: P, tolerance: Option<f64>) -> f64 {
    let params = match tolerance {
        Some(value) => VolumeParams::default().with_weld_tolerance(value),
        None => VolumeParams::default(),
    };
    measure_stl_volume(path, &params).volume
}

/// Measure an STL file and return the full report.
///
/// Files that cannot be read are treated as empty models.
#[must_use]
pub fn measure_stl_volume<P: AsRef<Path>>(path: P, params: &VolumeParams) -> VolumeReport {
    match load_stl(path.as_ref()) {
        Ok(triangles) => measure_triangles(&triangles, params),
        Err(error) => {
            debug!("treating unreadable file as empty: {error}");
            VolumeReport::default()
        }
    }
}

/// Measure a triangle soup and return the full report.
///
/// The soup may mix windings, contain duplicate or near-duplicate vertices,
/// and split into several connected components. Closed components nested
/// inside other closed components are treated as cavities: their volume is
/// subtracted when the nesting depth is odd.
///
/// With the `parallel` feature enabled, per-component geometry is computed
/// across threads; results do not depend on the feature.
#[must_use]
pub fn measure_triangles(triangles: &[Triangle], params: &VolumeParams) -> VolumeReport {
    let mut report = VolumeReport::default();
    if triangles.is_empty() {
        return report;
    }

    let mut model_bounds = Aabb::empty();
    for tri in triangles {
        for vertex in tri.vertices() {
            model_bounds.expand_to_include(&vertex);
        }
    }
    let diagonal = model_bounds.diagonal();
    if diagonal <= 0.0 {
        return report;
    }

    let tolerance = params.resolved_weld_tolerance(diagonal);

    let (kept, dropped) = drop_degenerate(triangles, diagonal, params.degenerate_area_factor);
    if dropped > 0 {
        let diagnostic = Diagnostic::DegenerateTriangles { dropped };
        warn!("{diagnostic}");
        report.diagnostics.push(diagnostic);
    }
    if kept.is_empty() {
        return report;
    }

    let mesh = weld_vertices(&kept, tolerance);
    if mesh.is_empty() {
        return report;
    }
    debug!(
        "welded {} triangles into {} vertices and {} faces at tolerance {tolerance:e}",
        kept.len(),
        mesh.vertex_count(),
        mesh.face_count()
    );

    let resolution = resolve_orientation(&mesh);
    for (index, component) in resolution.components.iter().enumerate() {
        if component.boundary_edges > 0 {
            let diagnostic = Diagnostic::NotWatertight {
                component: index,
                boundary_edges: component.boundary_edges,
            };
            warn!("{diagnostic}");
            report.diagnostics.push(diagnostic);
        }
        if component.non_manifold_incidences > 0 {
            let diagnostic = Diagnostic::NonManifoldEdges {
                component: index,
                count: component.non_manifold_incidences,
            };
            warn!("{diagnostic}");
            report.diagnostics.push(diagnostic);
        }
        if component.orientation_conflicts > 0 {
            let diagnostic = Diagnostic::OrientationConflicts {
                component: index,
                count: component.orientation_conflicts,
            };
            warn!("{diagnostic}");
            report.diagnostics.push(diagnostic);
        }
    }

    let eps = (diagonal * 1e-9).max(1e-12);

    #[cfg(feature = "parallel")]
    let geometries: Vec<ComponentGeometry> = resolution
        .components
        .par_iter()
        .map(|component| component_geometry(component, &resolution.flips, &mesh, eps))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let geometries: Vec<ComponentGeometry> = resolution
        .components
        .iter()
        .map(|component| component_geometry(component, &resolution.flips, &mesh, eps))
        .collect();

    // A component is a cavity when an odd number of other closed components
    // enclose its interior point.
    let margin = eps * 10.0;
    let mut depths = vec![0_usize; geometries.len()];
    for (i, geometry) in geometries.iter().enumerate() {
        if !geometry.closed {
            continue;
        }
        let Some(inside) = geometry.interior_point else {
            continue;
        };
        let mut enclosing = 0;
        for (j, other) in geometries.iter().enumerate() {
            if j == i || !other.closed {
                continue;
            }
            if !other.bounds.encloses(&geometry.bounds, margin) {
                continue;
            }
            if point_in_mesh(&inside, &other.triangles, eps) {
                enclosing += 1;
            }
        }
        depths[i] = enclosing;
    }

    let mut total = 0.0;
    for (geometry, &depth) in geometries.iter().zip(&depths) {
        total += if depth % 2 == 1 {
            -geometry.volume
        } else {
            geometry.volume
        };
    }
    report.volume = total.abs();

    report.components = resolution
        .components
        .iter()
        .zip(geometries)
        .zip(depths)
        .map(|((component, geometry), depth)| ComponentReport {
            faces: component.faces.len(),
            volume: geometry.volume,
            surface_area: geometry.surface_area,
            bounds: geometry.bounds,
            closed: geometry.closed,
            nesting_depth: depth,
            interior_point: geometry.interior_point,
        })
        .collect();

    debug!(
        "measured volume {} across {} components",
        report.volume,
        report.components.len()
    );
    report
}

struct ComponentGeometry {
    triangles: Vec<Triangle>,
    bounds: Aabb,
    volume: f64,
    surface_area: f64,
    closed: bool,
    interior_point: Option<Point3<f64>>,
}

fn component_geometry(
    component: &Component,
    flips: &[bool],
    mesh: &SurfaceMesh,
    eps: f64,
) -> ComponentGeometry {
    let triangles: Vec<Triangle> = component
        .faces
        .iter()
        .map(|&face_idx| mesh.triangle(face_idx))
        .collect();

    let mut bounds = Aabb::empty();
    for tri in &triangles {
        for vertex in tri.vertices() {
            bounds.expand_to_include(&vertex);
        }
    }

    let volume = signed_component_volume(component, flips, mesh, bounds.center()).abs();
    let surface_area = triangles.iter().map(Triangle::area).sum();
    let interior_point = find_interior_point(&triangles, &bounds, eps);

    ComponentGeometry {
        triangles,
        bounds,
        volume,
        surface_area,
        closed: component.closed,
        interior_point,
    }
}

/// Signed volume from the divergence theorem, summing tetrahedra spanned by
/// each face and `origin`. Faces marked in `flips` contribute with reversed
/// winding. Integrating about the component's own bounding-box center keeps
/// the tetrahedra small for parts far from the world origin.
fn signed_component_volume(
    component: &Component,
    flips: &[bool],
    mesh: &SurfaceMesh,
    origin: Point3<f64>,
) -> f64 {
    let mut volume = 0.0;
    for &face_idx in &component.faces {
        let [i0, i1, i2] = mesh.faces[face_idx];
        let (i1, i2) = if flips[face_idx] { (i2, i1) } else { (i1, i2) };
        let a = mesh.vertices[i0 as usize] - origin;
        let b = mesh.vertices[i1 as usize] - origin;
        let c = mesh.vertices[i2 as usize] - origin;
        volume += a.dot(&b.cross(&c)) / 6.0;
    }
    volume
}
