//! Edge topology, connected components, and winding repair.
//!
//! Faces are linked through their undirected edges. Each directed face edge
//! `(u, v)` is stored under the canonical key `(min(u, v), max(u, v))`
//! together with a traversal direction: `+1` when the face walks the edge
//! low-to-high, `-1` otherwise. Two neighbouring faces wind consistently
//! exactly when they traverse their shared edge in opposite directions, which
//! reduces orientation repair to propagating a per-face "flip" bit across the
//! adjacency graph.

use hashbrown::HashMap;
use volume_types::SurfaceMesh;

/// Canonical undirected edge between two vertex indices, low index first.
type EdgeKey = (u32, u32);

/// One connected component of a welded mesh.
#[derive(Debug, Clone)]
pub struct Component {
    /// Face indices in traversal order.
    pub faces: Vec<usize>,
    /// Number of edges used by exactly one face.
    pub boundary_edges: usize,
    /// Number of face-edge incidences on edges shared by more than two faces.
    pub non_manifold_incidences: usize,
    /// Number of adjacency links whose winding could not be reconciled.
    pub orientation_conflicts: usize,
    /// Whether the component has no boundary edges.
    pub closed: bool,
}

/// Result of connectivity analysis and winding repair over a welded mesh.
#[derive(Debug, Clone)]
pub struct OrientationResolution {
    /// Connected components, ordered by their lowest face index.
    pub components: Vec<Component>,
    /// Per-face flip flags making each component wind consistently where
    /// possible. Indexed by face.
    pub flips: Vec<bool>,
}

fn directed_edge(u: u32, v: u32) -> (EdgeKey, i8) {
    if u <= v {
        ((u, v), 1)
    } else {
        ((v, u), -1)
    }
}

fn face_edges(face: [u32; 3]) -> [(EdgeKey, i8); 3] {
    let [a, b, c] = face;
    [directed_edge(a, b), directed_edge(b, c), directed_edge(c, a)]
}

/// Split a welded mesh into connected components and repair winding.
///
/// Components are discovered by flood fill across shared edges. Within each
/// component the first face keeps its stored winding and every neighbour is
/// assigned the flip that makes it agree; when a face is reachable through
/// paths that demand different flips, each disagreement is counted as an
/// orientation conflict and the first assignment stands. Boundary and
/// non-manifold edge counts are tallied per component along the way.
#[must_use]
pub fn resolve_orientation(mesh: &SurfaceMesh) -> OrientationResolution {
    let face_count = mesh.face_count();

    let mut edge_faces: HashMap<EdgeKey, Vec<(usize, i8)>> = HashMap::new();
    let mut edge_order: Vec<EdgeKey> = Vec::new();
    for (face_idx, &face) in mesh.faces.iter().enumerate() {
        for (edge, dir) in face_edges(face) {
            let incident = edge_faces.entry(edge).or_insert_with(|| {
                edge_order.push(edge);
                Vec::new()
            });
            incident.push((face_idx, dir));
        }
    }

    // Symmetric adjacency: every pair of faces meeting at an edge is linked
    // both ways, keeping each side's traversal direction. Edges are visited
    // in first-seen order so the traversal is reproducible.
    let mut adjacency: Vec<Vec<(usize, i8, i8)>> = vec![Vec::new(); face_count];
    for edge in &edge_order {
        let incident = &edge_faces[edge];
        for i in 0..incident.len() {
            let (fi, di) = incident[i];
            for &(fj, dj) in &incident[i + 1..] {
                adjacency[fi].push((fj, di, dj));
                adjacency[fj].push((fi, dj, di));
            }
        }
    }

    let mut visited = vec![false; face_count];
    let mut flips = vec![false; face_count];
    let mut components = Vec::new();

    for seed in 0..face_count {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;

        let mut faces = Vec::new();
        let mut edge_use: HashMap<EdgeKey, usize> = HashMap::new();
        let mut non_manifold_incidences = 0;
        let mut orientation_conflicts = 0;

        let mut stack = vec![seed];
        while let Some(current) = stack.pop() {
            faces.push(current);

            for (edge, _) in face_edges(mesh.faces[current]) {
                *edge_use.entry(edge).or_insert(0) += 1;
                if edge_faces[&edge].len() > 2 {
                    non_manifold_incidences += 1;
                }
            }

            let current_flip = flips[current];
            for &(neighbour, my_dir, their_dir) in &adjacency[current] {
                // Opposite directions mean the neighbour already agrees with
                // this face's effective winding.
                let expected = if my_dir == their_dir {
                    !current_flip
                } else {
                    current_flip
                };
                if visited[neighbour] {
                    if flips[neighbour] != expected {
                        orientation_conflicts += 1;
                    }
                } else {
                    visited[neighbour] = true;
                    flips[neighbour] = expected;
                    stack.push(neighbour);
                }
            }
        }

        let boundary_edges = edge_use.values().filter(|&&count| count == 1).count();
        components.push(Component {
            faces,
            boundary_edges,
            non_manifold_incidences,
            orientation_conflicts,
            closed: boundary_edges == 0,
        });
    }

    OrientationResolution { components, flips }
}
