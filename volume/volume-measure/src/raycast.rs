//! Ray casting for point-in-mesh classification.
//!
//! Containment is decided by parity voting: axis-aligned rays are cast along
//! +X, +Y and +Z, each ray's crossing count is reduced to odd/even, and the
//! point counts as inside when at least two of the three rays agree. The
//! voting absorbs single-ray misclassifications near edges and vertices, and
//! the ray origin is jittered off the query point so that probes seeded on
//! grid-aligned geometry do not start exactly on a face plane.

use volume_types::{Aabb, Point3, Triangle, Vector3};

/// Intersect a ray with a triangle, returning the ray parameter on a hit.
///
/// Uses the Moller-Trumbore test with `eps` widening the barycentric bounds,
/// so hits slightly outside an edge still count. Rays parallel to the
/// triangle plane and hits at or behind the origin return `None`.
#[must_use]
pub fn ray_triangle_intersection(
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
    tri: &Triangle,
    eps: f64,
) -> Option<f64> {
    let e1 = tri.b - tri.a;
    let e2 = tri.c - tri.a;

    let p = direction.cross(&e2);
    let det = e1.dot(&p);
    if det > -eps && det < eps {
        return None;
    }
    let inv_det = 1.0 / det;

    let to_origin = origin - tri.a;
    let u = to_origin.dot(&p) * inv_det;
    if u < -eps || u > 1.0 + eps {
        return None;
    }

    let q = to_origin.cross(&e1);
    let v = direction.dot(&q) * inv_det;
    if v < -eps || u + v > 1.0 + eps {
        return None;
    }

    let t = e2.dot(&q) * inv_det;
    if t <= eps {
        return None;
    }
    Some(t)
}

/// Test whether a point lies inside a triangle soup by majority vote over
/// three axis-aligned rays.
///
/// An empty soup contains nothing. The soup does not need consistent
/// winding; only crossing parity matters.
#[must_use]
pub fn point_in_mesh(point: &Point3<f64>, triangles: &[Triangle], eps: f64) -> bool {
    if triangles.is_empty() {
        return false;
    }

    let origin = Point3::new(
        point.x + eps * 0.173,
        point.y + eps * 0.349,
        point.z + eps * 0.937,
    );
    let directions = [Vector3::x(), Vector3::y(), Vector3::z()];

    let mut inside_votes = 0;
    for direction in &directions {
        let mut crossings = 0_usize;
        for tri in triangles {
            if ray_triangle_intersection(&origin, direction, tri, eps).is_some() {
                crossings += 1;
            }
        }
        if crossings % 2 == 1 {
            inside_votes += 1;
        }
    }
    inside_votes >= 2
}

/// Find a point strictly inside a component, or `None` if no probe lands
/// inside.
///
/// Tries the bounding-box center and the mean face centroid first. If both
/// fail (a torus or an L-shaped part can put either outside the surface),
/// probes are taken just off the centroids of the first few faces along
/// both normal directions.
#[must_use]
pub fn find_interior_point(
    triangles: &[Triangle],
    bounds: &Aabb,
    eps: f64,
) -> Option<Point3<f64>> {
    let diagonal = bounds.diagonal();
    if diagonal <= 0.0 {
        return None;
    }

    let mut candidates = vec![bounds.center()];
    if !triangles.is_empty() {
        let mut sum = Vector3::zeros();
        for tri in triangles {
            sum += tri.centroid().coords;
        }
        candidates.push(Point3::from(sum / triangles.len() as f64));
    }
    for candidate in &candidates {
        if point_in_mesh(candidate, triangles, eps) {
            return Some(*candidate);
        }
    }

    let step = (diagonal * 1e-6).max(eps * 10.0);
    for tri in triangles.iter().take(10) {
        let normal = tri.normal_unnormalized();
        let length = normal.norm();
        if length <= eps {
            continue;
        }
        let normal = normal / length;
        let centroid = tri.centroid();
        for sign in [1.0, -1.0] {
            let probe = centroid + normal * (sign * step);
            if point_in_mesh(&probe, triangles, eps) {
                return Some(probe);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use volume_types::unit_cube;

    const EPS: f64 = 1e-9;

    fn cube_soup() -> Vec<Triangle> {
        unit_cube().triangles().collect()
    }

    #[test]
    fn ray_hits_facing_triangle() {
        let tri = Triangle::from_arrays([0.0, -1.0, -1.0], [0.0, 1.0, -1.0], [0.0, 0.0, 1.0]);
        let origin = Point3::new(-2.0, 0.0, 0.0);
        let t = ray_triangle_intersection(&origin, &Vector3::x(), &tri, EPS);
        assert!(t.is_some_and(|t| (t - 2.0).abs() < 1e-9));
    }

    #[test]
    fn ray_misses_triangle_behind_origin() {
        let tri = Triangle::from_arrays([0.0, -1.0, -1.0], [0.0, 1.0, -1.0], [0.0, 0.0, 1.0]);
        let origin = Point3::new(2.0, 0.0, 0.0);
        assert!(ray_triangle_intersection(&origin, &Vector3::x(), &tri, EPS).is_none());
    }

    #[test]
    fn ray_parallel_to_triangle_misses() {
        let tri = Triangle::from_arrays([0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]);
        let origin = Point3::new(-1.0, 0.25, 0.0);
        assert!(ray_triangle_intersection(&origin, &Vector3::x(), &tri, EPS).is_none());
    }

    #[test]
    fn ray_outside_barycentric_range_misses() {
        let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let origin = Point3::new(5.0, 5.0, -1.0);
        assert!(ray_triangle_intersection(&origin, &Vector3::z(), &tri, EPS).is_none());
    }

    #[test]
    fn point_inside_cube_is_inside() {
        // Off-center so no ray grazes a face diagonal, where the widened
        // barycentric bounds can count one crossing twice.
        let soup = cube_soup();
        assert!(point_in_mesh(&Point3::new(0.3, 0.4, 0.6), &soup, EPS));
    }

    #[test]
    fn point_outside_cube_is_outside() {
        let soup = cube_soup();
        assert!(!point_in_mesh(&Point3::new(2.0, 0.5, 0.5), &soup, EPS));
        assert!(!point_in_mesh(&Point3::new(-1.0, -1.0, -1.0), &soup, EPS));
    }

    #[test]
    fn empty_soup_contains_nothing() {
        assert!(!point_in_mesh(&Point3::new(0.0, 0.0, 0.0), &[], EPS));
    }

    #[test]
    fn interior_point_of_cube_is_inside() {
        let soup = cube_soup();
        let bounds = unit_cube().bounding_box();
        let point = find_interior_point(&soup, &bounds, EPS);
        assert!(point.is_some_and(|p| point_in_mesh(&p, &soup, EPS)));
    }

    #[test]
    fn degenerate_bounds_give_no_interior_point() {
        let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0]);
        let bounds = Aabb::from_points(tri.vertices().iter());
        // A flat component has no interior to find.
        assert!(find_interior_point(&[tri], &bounds, EPS).is_none());
    }

    #[test]
    fn probe_just_inside_a_face_is_inside() {
        let soup = cube_soup();
        let bounds = unit_cube().bounding_box();
        let step = (bounds.diagonal() * 1e-6).max(EPS * 10.0);
        let centroid = soup[0].centroid();
        let normal = soup[0].normal();
        assert!(normal.is_some_and(|n| {
            let inward = centroid - n * step;
            point_in_mesh(&inward, &soup, EPS)
        }));
    }
}
