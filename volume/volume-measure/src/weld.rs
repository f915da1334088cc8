//! Degenerate-triangle filtering and tolerance-based vertex welding.
//!
//! Raw STL files repeat every vertex once per face, so shared topology has to
//! be recovered before any connectivity analysis. Welding snaps each
//! coordinate to an integer grid at the welding tolerance and merges vertices
//! that land in the same cell. Faces whose three vertices no longer remain
//! distinct after merging are dropped.

use hashbrown::HashMap;
use volume_types::{Point3, SurfaceMesh, Triangle};

/// Remove triangles with near-zero area.
///
/// The threshold scales with the model: a triangle is dropped when the
/// squared norm of its edge cross product is at most `area_factor` times
/// the squared bounding-box diagonal. Returns the surviving triangles and
/// the number removed.
#[must_use]
pub fn drop_degenerate(
    triangles: &[Triangle],
    diagonal: f64,
    area_factor: f64,
) -> (Vec<Triangle>, usize) {
    let threshold = if diagonal > 0.0 {
        area_factor * diagonal * diagonal
    } else {
        area_factor * area_factor
    };

    let mut kept = Vec::with_capacity(triangles.len());
    for tri in triangles {
        // Squared cross-product norm, which is 4x the squared area. The
        // factor is absorbed into `area_factor`.
        if tri.normal_unnormalized().norm_squared() > threshold {
            kept.push(*tri);
        }
    }
    let dropped = triangles.len() - kept.len();
    (kept, dropped)
}

/// Weld vertices closer than `tolerance` and build an indexed mesh.
///
/// Coordinates are quantized to a grid with cell size `tolerance`; vertices
/// in the same cell share one index, keeping the first-seen coordinates.
/// A non-positive tolerance still welds exact duplicates. Faces that collapse
/// to fewer than three distinct vertices are discarded.
#[must_use]
pub fn weld_vertices(triangles: &[Triangle], tolerance: f64) -> SurfaceMesh {
    let inv = if tolerance > 0.0 { 1.0 / tolerance } else { 1e12 };

    let mut cells: HashMap<(i64, i64, i64), u32> = HashMap::new();
    let mut mesh = SurfaceMesh::with_capacity(triangles.len(), triangles.len());

    for tri in triangles {
        let ia = intern(&mut cells, &mut mesh.vertices, tri.a, inv);
        let ib = intern(&mut cells, &mut mesh.vertices, tri.b, inv);
        let ic = intern(&mut cells, &mut mesh.vertices, tri.c, inv);
        if ia == ib || ib == ic || ic == ia {
            continue;
        }
        mesh.faces.push([ia, ib, ic]);
    }

    mesh
}

fn quantize(point: &Point3<f64>, inv: f64) -> (i64, i64, i64) {
    (
        (point.x * inv).round_ties_even() as i64,
        (point.y * inv).round_ties_even() as i64,
        (point.z * inv).round_ties_even() as i64,
    )
}

fn intern(
    cells: &mut HashMap<(i64, i64, i64), u32>,
    vertices: &mut Vec<Point3<f64>>,
    point: Point3<f64>,
    inv: f64,
) -> u32 {
    let key = quantize(&point, inv);
    if let Some(&index) = cells.get(&key) {
        return index;
    }
    let index = vertices.len() as u32;
    cells.insert(key, index);
    vertices.push(point);
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> Triangle {
        Triangle::from_arrays(a, b, c)
    }

    #[test]
    fn drops_zero_area_triangle() {
        let triangles = vec![
            tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]),
        ];
        let (kept, dropped) = drop_degenerate(&triangles, 2.0, 1e-12);
        assert_eq!(kept.len(), 1);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn keeps_small_but_real_triangle() {
        let triangles = vec![tri(
            [0.0, 0.0, 0.0],
            [1e-2, 0.0, 0.0],
            [0.0, 1e-2, 0.0],
        )];
        let (kept, dropped) = drop_degenerate(&triangles, 1.0, 1e-12);
        assert_eq!(kept.len(), 1);
        assert_eq!(dropped, 0);
    }

    #[test]
    fn threshold_scales_with_diagonal() {
        // A 1e-3 sliver is real on a unit model but noise on a planet-sized one.
        let triangles = vec![tri(
            [0.0, 0.0, 0.0],
            [1e-3, 0.0, 0.0],
            [0.0, 1e-3, 0.0],
        )];
        let (kept, _) = drop_degenerate(&triangles, 1e6, 1e-12);
        assert!(kept.is_empty());
    }

    #[test]
    fn welds_exact_duplicates() {
        // Two triangles sharing an edge, each repeating the shared vertices.
        let triangles = vec![
            tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            tri([1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]),
        ];
        let mesh = weld_vertices(&triangles, 1e-6);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
    }

    #[test]
    fn welds_within_tolerance() {
        let triangles = vec![
            tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            tri([1.0, 1e-8, 0.0], [1.0, 1.0, 0.0], [1e-8, 1.0, 0.0]),
        ];
        let mesh = weld_vertices(&triangles, 1e-6);
        assert_eq!(mesh.vertex_count(), 4);
    }

    #[test]
    fn keeps_vertices_outside_tolerance_distinct() {
        let triangles = vec![
            tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            tri([1.0, 0.1, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]),
        ];
        let mesh = weld_vertices(&triangles, 1e-6);
        assert_eq!(mesh.vertex_count(), 5);
    }

    #[test]
    fn first_seen_coordinates_win() {
        let triangles = vec![
            tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            tri([1.0 + 1e-8, 0.0, 0.0], [2.0, 0.0, 0.0], [1.0, 1.0, 0.0]),
        ];
        let mesh = weld_vertices(&triangles, 1e-6);
        assert!((mesh.vertices[1].x - 1.0).abs() < 1e-15);
    }

    #[test]
    fn drops_face_collapsed_by_welding() {
        // A sliver thinner than the tolerance collapses to two vertices.
        let triangles = vec![tri(
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1e-9, 0.0],
        )];
        let mesh = weld_vertices(&triangles, 1e-6);
        assert_eq!(mesh.face_count(), 0);
    }

    #[test]
    fn cube_soup_welds_to_eight_vertices() {
        let soup: Vec<Triangle> = volume_types::unit_cube().triangles().collect();
        let mesh = weld_vertices(&soup, 1e-6);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 12);
    }

    #[test]
    fn zero_tolerance_still_welds_exact_duplicates() {
        let triangles = vec![
            tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            tri([1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]),
        ];
        let mesh = weld_vertices(&triangles, 0.0);
        assert_eq!(mesh.vertex_count(), 4);
    }
}
