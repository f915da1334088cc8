//! Measurement reports and mesh-quality diagnostics.
//!
//! Measurement never fails on imperfect input; instead every quality issue
//! encountered along the way is recorded as a [`Diagnostic`] and the volume
//! is reported as a best-effort estimate.

use std::fmt;

use volume_types::{Aabb, Point3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A mesh-quality issue observed during measurement.
///
/// Diagnostics are advisory. The reported volume is still computed, but the
/// closer the mesh is to a clean watertight solid, the more trustworthy the
/// number is.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Diagnostic {
    /// Near-zero-area triangles were removed before measurement.
    DegenerateTriangles {
        /// Number of triangles removed.
        dropped: usize,
    },

    /// A component has boundary edges and does not enclose a volume exactly.
    NotWatertight {
        /// Index of the affected component.
        component: usize,
        /// Number of edges used by only one face.
        boundary_edges: usize,
    },

    /// A component has edges shared by more than two faces.
    NonManifoldEdges {
        /// Index of the affected component.
        component: usize,
        /// Number of face-edge incidences on over-shared edges.
        count: usize,
    },

    /// A component's winding could not be made globally consistent.
    OrientationConflicts {
        /// Index of the affected component.
        component: usize,
        /// Number of adjacency links that disagreed with the repair.
        count: usize,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateTriangles { dropped } => {
                write!(f, "dropped {dropped} degenerate triangles during parsing")
            }
            Self::NotWatertight {
                component,
                boundary_edges,
            } => {
                write!(
                    f,
                    "component {component}: mesh is not watertight ({boundary_edges} boundary edges); result is a best-effort estimate"
                )
            }
            Self::NonManifoldEdges { component, count } => {
                write!(
                    f,
                    "component {component}: non-manifold edges detected ({count}); result may be unreliable"
                )
            }
            Self::OrientationConflicts { component, count } => {
                write!(
                    f,
                    "component {component}: orientation conflicts detected ({count})"
                )
            }
        }
    }
}

/// Per-component measurement results.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComponentReport {
    /// Number of faces after welding.
    pub faces: usize,
    /// Unsigned volume of this component alone.
    pub volume: f64,
    /// Total triangle area of this component.
    pub surface_area: f64,
    /// Axis-aligned bounding box.
    pub bounds: Aabb,
    /// Whether the component has no boundary edges.
    pub closed: bool,
    /// Number of closed components this one sits inside. Odd depth means
    /// the component is a cavity and its volume is subtracted.
    pub nesting_depth: usize,
    /// A point strictly inside the component, when one was found.
    pub interior_point: Option<Point3<f64>>,
}

/// Complete result of measuring a model.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VolumeReport {
    /// Nesting-aware total volume. Always non-negative.
    pub volume: f64,
    /// Connected components, ordered by their lowest face index.
    pub components: Vec<ComponentReport>,
    /// Quality issues observed during measurement, in the order found.
    pub diagnostics: Vec<Diagnostic>,
}

impl VolumeReport {
    /// Check whether measurement completed without any quality issues.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of connected components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Check whether every component is closed.
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.components.iter().all(|comp| comp.closed)
    }
}

impl fmt::Display for VolumeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Volume Report:")?;
        writeln!(f, "  Volume: {}", self.volume)?;
        writeln!(f, "  Components: {}", self.components.len())?;
        for (index, comp) in self.components.iter().enumerate() {
            writeln!(
                f,
                "    [{index}] faces: {}, volume: {}, closed: {}, depth: {}",
                comp.faces,
                comp.volume,
                if comp.closed { "yes" } else { "no" },
                comp.nesting_depth
            )?;
        }
        if !self.diagnostics.is_empty() {
            writeln!(f, "  Diagnostics:")?;
            for diagnostic in &self.diagnostics {
                writeln!(f, "    {diagnostic}")?;
            }
        }
        Ok(())
    }
}
