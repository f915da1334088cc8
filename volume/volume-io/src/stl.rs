//! STL (Stereolithography) file parsing.
//!
//! Supports both ASCII and binary STL formats.
//!
//! # Format Detection
//!
//! Binary STL has no magic number, and ASCII files are only loosely
//! structured, so detection goes by the one reliable signal: a binary file
//! is exactly `84 + 50 * n` bytes long, where `n` is the triangle count
//! stored at offset 80. Anything else is treated as ASCII first, and
//! reinterpreted as binary facet records if ASCII parsing finds nothing
//! (renderers sometimes emit binary files with a `solid` header and a
//! wrong count).
//!
//! # Binary Format
//!
//! ```text
//! UINT8[80]    – Header (ignored)
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector (often not accurate)
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count (ignored)
//! end
//! ```
//!
//! # ASCII Format
//!
//! ```text
//! solid name
//!   facet normal ni nj nk
//!     outer loop
//!       vertex v1x v1y v1z
//!       vertex v2x v2y v2z
//!       vertex v3x v3y v3z
//!     endloop
//!   endfacet
//!   ...
//! endsolid name
//! ```
//!
//! # Winding
//!
//! Every parsed triangle is aligned against its stored facet normal: when
//! the geometric normal (cross product of the edges) opposes the stored one,
//! the second and third vertices are swapped. Downstream orientation
//! propagation starts from this normalized winding.

use std::path::Path;

use tracing::{debug, warn};

use volume_types::{Point3, Triangle, Vector3};

use crate::error::{StlError, StlResult};

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle record in binary STL (normal + 3 vertices + attribute).
const TRIANGLE_SIZE: usize = 50;

/// Detected STL flavor, resolved once per load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StlFormat {
    /// 80-byte header, triangle count, fixed 50-byte facet records.
    Binary,
    /// Line-oriented `facet normal` / `vertex` / `endloop` text.
    Ascii,
}

impl StlFormat {
    /// Detect the format of raw STL bytes.
    ///
    /// The data is binary iff its length is exactly `84 + 50 * n` for the
    /// triangle count `n` at offset 80. Everything else reads as ASCII.
    ///
    /// # Example
    ///
    /// ```
    /// use volume_io::StlFormat;
    ///
    /// assert_eq!(StlFormat::detect(b"solid demo\nendsolid demo\n"), StlFormat::Ascii);
    ///
    /// let empty_binary = [vec![0u8; 80], 0u32.to_le_bytes().to_vec()].concat();
    /// assert_eq!(StlFormat::detect(&empty_binary), StlFormat::Binary);
    /// ```
    #[must_use]
    pub fn detect(data: &[u8]) -> Self {
        if data.len() >= HEADER_SIZE + 4 {
            let n = u32::from_le_bytes([data[80], data[81], data[82], data[83]]);
            let expected = (HEADER_SIZE + 4) as u64 + u64::from(n) * TRIANGLE_SIZE as u64;
            if expected == data.len() as u64 {
                return Self::Binary;
            }
        }
        Self::Ascii
    }
}

/// Load triangles from an STL file.
///
/// Automatically detects ASCII vs binary format and normalizes each
/// triangle's winding against its stored facet normal. Malformed content
/// does not error; the worst case is an empty list.
///
/// # Errors
///
/// Returns [`StlError::FileNotFound`] if the path does not exist, or
/// [`StlError::Io`] if the file cannot be read.
///
/// # Example
///
/// ```no_run
/// use volume_io::load_stl;
///
/// let triangles = load_stl("model.stl").unwrap();
/// println!("loaded {} triangles", triangles.len());
/// ```
pub fn load_stl<P: AsRef<Path>>(path: P) -> StlResult<Vec<Triangle>> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StlError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            StlError::Io(e)
        }
    })?;
    Ok(parse_stl(&data))
}

/// Parse triangles from raw STL bytes.
///
/// Never fails: binary files are walked record by record, ASCII files line
/// by line, and an ASCII parse that yields nothing falls back to a binary
/// reinterpretation of the same bytes. Truncated data parses as far as it
/// goes.
#[must_use]
pub fn parse_stl(data: &[u8]) -> Vec<Triangle> {
    match StlFormat::detect(data) {
        StlFormat::Binary => {
            let tris = parse_binary_facets(data);
            debug!("parsed binary STL: {} triangles", tris.len());
            tris
        }
        StlFormat::Ascii => {
            let tris = parse_ascii_facets(data);
            if tris.is_empty() {
                if data.len() >= 5 && data[..5].eq_ignore_ascii_case(b"solid") {
                    warn!("STL starts with 'solid' but no ASCII facets parsed; reinterpreting as binary");
                }
                return parse_binary_facets(data);
            }
            debug!("parsed ASCII STL: {} triangles", tris.len());
            tris
        }
    }
}

/// Read a little-endian f32 at `offset` and widen it to f64.
#[inline]
fn read_f32(data: &[u8], offset: usize) -> f64 {
    let bytes = [
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ];
    f64::from(f32::from_le_bytes(bytes))
}

/// Walk binary facet records starting at offset 84.
///
/// Reads up to the count stored at offset 80, stopping early if the data
/// runs out. Serves both the exact-size binary path and the lenient
/// reinterpretation fallback; for a well-formed file the two are the same
/// walk.
fn parse_binary_facets(data: &[u8]) -> Vec<Triangle> {
    if data.len() < HEADER_SIZE + 4 {
        return Vec::new();
    }
    let count = u32::from_le_bytes([data[80], data[81], data[82], data[83]]);
    let available = (data.len() - (HEADER_SIZE + 4)) / TRIANGLE_SIZE;
    let records = (count as usize).min(available);

    let mut tris = Vec::with_capacity(records);
    let mut pos = HEADER_SIZE + 4;
    for _ in 0..records {
        let normal = Vector3::new(
            read_f32(data, pos),
            read_f32(data, pos + 4),
            read_f32(data, pos + 8),
        );
        let tri = Triangle::new(
            Point3::new(
                read_f32(data, pos + 12),
                read_f32(data, pos + 16),
                read_f32(data, pos + 20),
            ),
            Point3::new(
                read_f32(data, pos + 24),
                read_f32(data, pos + 28),
                read_f32(data, pos + 32),
            ),
            Point3::new(
                read_f32(data, pos + 36),
                read_f32(data, pos + 40),
                read_f32(data, pos + 44),
            ),
        );
        // Two attribute bytes close each record; nothing stores data there
        tris.push(tri.aligned_to(&normal));
        pos += TRIANGLE_SIZE;
    }
    tris
}

/// Parse ASCII facets line by line.
///
/// Deliberately lenient: encoding errors are replaced rather than fatal,
/// unparseable vertex lines are skipped, a facet without a parseable
/// normal keeps its winding as written, and each facet emits at most one
/// triangle from the last three vertices seen before `endloop`.
fn parse_ascii_facets(data: &[u8]) -> Vec<Triangle> {
    let text = String::from_utf8_lossy(data);
    let mut tris = Vec::new();
    let mut verts: Vec<Point3<f64>> = Vec::new();
    let mut collected = false;
    let mut cur_normal: Option<Vector3<f64>> = None;

    for line in text.lines() {
        let s = line.trim();
        if s.is_empty() {
            continue;
        }
        if s.starts_with("vertex") {
            let parts: Vec<&str> = s.split_whitespace().collect();
            if parts.len() >= 4 {
                let xyz = (
                    parts[1].parse::<f64>(),
                    parts[2].parse::<f64>(),
                    parts[3].parse::<f64>(),
                );
                if let (Ok(x), Ok(y), Ok(z)) = xyz {
                    verts.push(Point3::new(x, y, z));
                }
            }
        } else if s.starts_with("endloop") {
            if !collected && verts.len() >= 3 {
                let tri = Triangle::new(
                    verts[verts.len() - 3],
                    verts[verts.len() - 2],
                    verts[verts.len() - 1],
                );
                let tri = match cur_normal {
                    Some(n) => tri.aligned_to(&n),
                    None => tri,
                };
                tris.push(tri);
                collected = true;
            }
        } else if s.starts_with("facet") {
            verts.clear();
            collected = false;
            cur_normal = None;
            let parts: Vec<&str> = s.split_whitespace().collect();
            if parts.len() >= 5 && parts[0] == "facet" && parts[1] == "normal" {
                let nxyz = (
                    parts[2].parse::<f64>(),
                    parts[3].parse::<f64>(),
                    parts[4].parse::<f64>(),
                );
                if let (Ok(nx), Ok(ny), Ok(nz)) = nxyz {
                    cur_normal = Some(Vector3::new(nx, ny, nz));
                }
            }
        }
    }
    tris
}
