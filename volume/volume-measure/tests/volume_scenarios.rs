//! End-to-end measurement scenarios on real STL files.
//!
//! Each test writes an STL file into a temp directory, runs the full
//! measurement pipeline on it, and checks the reported volume against the
//! analytic value for the shape.
//!
//! Run with: cargo test -p volume-measure --test volume_scenarios

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::f64::consts::PI;
use std::path::Path;

use tempfile::tempdir;
use volume_measure::{
    Point3, Triangle, VolumeParams, calculate_stl_volume, measure_stl_volume, unit_cube,
};

// =============================================================================
// STL writers and shape generators
// =============================================================================

fn write_binary_stl(path: &Path, triangles: &[Triangle]) {
    let mut data = vec![0_u8; 80];
    data.extend_from_slice(&u32::try_from(triangles.len()).unwrap().to_le_bytes());
    for tri in triangles {
        for _ in 0..3 {
            data.extend_from_slice(&0.0_f32.to_le_bytes());
        }
        for point in [tri.a, tri.b, tri.c] {
            data.extend_from_slice(&(point.x as f32).to_le_bytes());
            data.extend_from_slice(&(point.y as f32).to_le_bytes());
            data.extend_from_slice(&(point.z as f32).to_le_bytes());
        }
        data.extend_from_slice(&0_u16.to_le_bytes());
    }
    std::fs::write(path, data).unwrap();
}

fn write_ascii_stl(path: &Path, triangles: &[Triangle]) {
    let mut out = String::from("solid part\n");
    for tri in triangles {
        out.push_str("  facet normal 0 0 0\n");
        out.push_str("    outer loop\n");
        for point in [tri.a, tri.b, tri.c] {
            out.push_str(&format!("      vertex {} {} {}\n", point.x, point.y, point.z));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }
    out.push_str("endsolid part\n");
    std::fs::write(path, out).unwrap();
}

fn cube_tris(center: [f64; 3], side: f64) -> Vec<Triangle> {
    let place = |p: Point3<f64>| {
        Point3::new(
            center[0] + (p.x - 0.5) * side,
            center[1] + (p.y - 0.5) * side,
            center[2] + (p.z - 0.5) * side,
        )
    };
    unit_cube()
        .triangles()
        .map(|tri| Triangle::new(place(tri.a), place(tri.b), place(tri.c)))
        .collect()
}

/// Latitude-longitude sphere with `segments` stacks and `2 * segments`
/// slices. Pole quads collapse to single triangles so the surface is closed.
fn sphere_tris(center: [f64; 3], radius: f64, segments: usize) -> Vec<Triangle> {
    let stacks = segments;
    let slices = segments * 2;
    let point = |stack: usize, slice: usize| {
        let phi = PI * stack as f64 / stacks as f64;
        let theta = 2.0 * PI * slice as f64 / slices as f64;
        Point3::new(
            center[0] + radius * phi.sin() * theta.cos(),
            center[1] + radius * phi.sin() * theta.sin(),
            center[2] + radius * phi.cos(),
        )
    };

    let mut out = Vec::new();
    for i in 0..stacks {
        for j in 0..slices {
            let p00 = point(i, j);
            let p01 = point(i, j + 1);
            let p10 = point(i + 1, j);
            let p11 = point(i + 1, j + 1);
            if i + 1 < stacks {
                out.push(Triangle::new(p00, p10, p11));
            }
            if i > 0 {
                out.push(Triangle::new(p00, p11, p01));
            }
        }
    }
    out
}

/// Deterministic pseudo-noise in the given half-range.
fn jitter(value: f64, salt: usize, amplitude: f64) -> f64 {
    let phase = (salt.wrapping_mul(2_654_435_761) % 1000) as f64 / 1000.0;
    value + (phase - 0.5) * 2.0 * amplitude
}

fn noisy_cube_tris(amplitude: f64) -> Vec<Triangle> {
    cube_tris([0.0, 0.0, 0.0], 1.0)
        .iter()
        .enumerate()
        .map(|(face, tri)| {
            let perturb = |point: Point3<f64>, vertex: usize| {
                let salt = face * 9 + vertex * 3;
                Point3::new(
                    jitter(point.x, salt, amplitude),
                    jitter(point.y, salt + 1, amplitude),
                    jitter(point.z, salt + 2, amplitude),
                )
            };
            Triangle::new(perturb(tri.a, 0), perturb(tri.b, 1), perturb(tri.c, 2))
        })
        .collect()
}

// =============================================================================
// Cubes
// =============================================================================

#[test]
fn binary_cube_measures_one() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cube.stl");
    write_binary_stl(&path, &cube_tris([0.0, 0.0, 0.0], 1.0));

    let volume = calculate_stl_volume(&path, None);
    assert!((volume - 1.0).abs() < 1e-6);
}

#[test]
fn ascii_cube_matches_binary_cube() {
    let dir = tempdir().unwrap();
    let triangles = cube_tris([0.0, 0.0, 0.0], 1.0);

    let binary_path = dir.path().join("cube_bin.stl");
    let ascii_path = dir.path().join("cube_ascii.stl");
    write_binary_stl(&binary_path, &triangles);
    write_ascii_stl(&ascii_path, &triangles);

    let from_binary = calculate_stl_volume(&binary_path, None);
    let from_ascii = calculate_stl_volume(&ascii_path, None);
    assert!((from_binary - from_ascii).abs() < 1e-9);
    assert!((from_ascii - 1.0).abs() < 1e-6);
}

#[test]
fn translated_scaled_cube_measures_side_cubed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cube.stl");
    write_binary_stl(&path, &cube_tris([10.0, 20.0, -5.0], 2.5));

    let volume = calculate_stl_volume(&path, None);
    assert!((volume - 15.625).abs() < 1e-6);
}

#[test]
fn two_disjoint_cubes_sum() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pair.stl");
    let mut triangles = cube_tris([0.0, 0.0, 0.0], 1.0);
    triangles.extend(cube_tris([5.0, 0.0, 0.0], 1.0));
    write_binary_stl(&path, &triangles);

    let report = measure_stl_volume(&path, &VolumeParams::default());
    assert!((report.volume - 2.0).abs() < 1e-6);
    assert_eq!(report.component_count(), 2);
    assert!(report.components.iter().all(|comp| comp.closed));
    assert!(report.components.iter().all(|comp| comp.nesting_depth == 0));
}

#[test]
fn open_cube_is_flagged_and_estimated() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("open.stl");
    let mut triangles = cube_tris([0.0, 0.0, 0.0], 1.0);
    triangles.pop();
    write_binary_stl(&path, &triangles);

    let report = measure_stl_volume(&path, &VolumeParams::default());
    assert!(!report.is_watertight());
    assert!(!report.is_clean());
    // Eleven faces integrate to the cube minus one corner tetrahedron.
    assert!((report.volume - 11.0 / 12.0).abs() < 1e-6);
}

// =============================================================================
// Spheres and nesting
// =============================================================================

#[test]
fn sphere_volume_approaches_analytic() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sphere.stl");
    write_binary_stl(&path, &sphere_tris([0.0, 0.0, 0.0], 1.0, 20));

    let volume = calculate_stl_volume(&path, None);
    let analytic = 4.0 / 3.0 * PI;
    assert!((volume - analytic).abs() / analytic < 0.02);
}

#[test]
fn nested_spheres_subtract_the_cavity() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shell.stl");
    let mut triangles = sphere_tris([0.0, 0.0, 0.0], 2.0, 20);
    triangles.extend(sphere_tris([0.0, 0.0, 0.0], 1.0, 20));
    write_binary_stl(&path, &triangles);

    let report = measure_stl_volume(&path, &VolumeParams::default());
    let analytic = 4.0 / 3.0 * PI * (8.0 - 1.0);
    assert!((report.volume - analytic).abs() / analytic < 0.02);
    assert_eq!(report.component_count(), 2);
    assert_eq!(report.components[0].nesting_depth, 0);
    assert_eq!(report.components[1].nesting_depth, 1);
}

// =============================================================================
// Tolerance handling
// =============================================================================

#[test]
fn weld_tolerance_rescues_noisy_export() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("noisy.stl");
    write_binary_stl(&path, &noisy_cube_tris(3e-5));

    // At the default tolerance every facet keeps its own vertices and the
    // soup falls apart into open flakes.
    let strict = measure_stl_volume(&path, &VolumeParams::default());
    assert!(!strict.is_watertight());
    assert!(strict.volume < 0.5);

    let relaxed = measure_stl_volume(
        &path,
        &VolumeParams::default().with_weld_tolerance(1e-3),
    );
    assert!(relaxed.is_watertight());
    assert!((relaxed.volume - 1.0).abs() < 0.01);
}

#[test]
fn negative_tolerance_behaves_like_zero() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cube.stl");
    write_binary_stl(&path, &cube_tris([0.0, 0.0, 0.0], 1.0));

    // Exact duplicates still weld, so a clean cube is unaffected.
    let volume = calculate_stl_volume(&path, Some(-1.0));
    assert!((volume - 1.0).abs() < 1e-6);
}

// =============================================================================
// Robustness
// =============================================================================

#[test]
fn missing_file_measures_zero() {
    let dir = tempdir().unwrap();
    let volume = calculate_stl_volume(dir.path().join("absent.stl"), None);
    assert!(volume.abs() < 1e-15);
}

#[test]
fn empty_file_measures_zero() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.stl");
    std::fs::write(&path, b"").unwrap();

    let report = measure_stl_volume(&path, &VolumeParams::default());
    assert!(report.volume.abs() < 1e-15);
    assert_eq!(report.component_count(), 0);
}

#[test]
fn repeated_measurement_is_bit_identical() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shell.stl");
    let mut triangles = sphere_tris([0.3, -0.2, 0.9], 1.5, 12);
    triangles.extend(cube_tris([6.0, 0.0, 0.0], 2.0));
    write_binary_stl(&path, &triangles);

    let first = calculate_stl_volume(&path, None);
    let second = calculate_stl_volume(&path, None);
    assert_eq!(first.to_bits(), second.to_bits());
}
