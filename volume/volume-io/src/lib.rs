//! STL loading for the volume measurement pipeline.
//!
//! This crate turns a path (or raw bytes) into a flat list of
//! [`Triangle`](volume_types::Triangle)s, with each triangle's winding
//! normalized against the facet normal stored in the file. Format detection,
//! the lenient ASCII parser, and the binary reinterpretation fallback all
//! live in [`stl`].
//!
//! Parsing is total: malformed or truncated content degrades to fewer (or
//! zero) triangles, never an error. Only the filesystem read can fail, and
//! the measurement layer above absorbs even that into a zero volume.
//!
//! # Example
//!
//! ```no_run
//! use volume_io::load_stl;
//!
//! let triangles = load_stl("model.stl")?;
//! println!("{} triangles", triangles.len());
//! # Ok::<(), volume_io::StlError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
pub mod stl;

pub use error::{StlError, StlResult};
pub use stl::{load_stl, parse_stl, StlFormat};
