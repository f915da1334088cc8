//! Configuration parameters for volume measurement.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration parameters for volume measurement.
///
/// All thresholds are in the same units as the mesh coordinates (typically millimeters).
///
/// # Example
///
/// ```
/// use volume_measure::VolumeParams;
///
/// // Use defaults (tolerance scales with the model's bounding box)
/// let params = VolumeParams::default();
///
/// // Or pin the welding tolerance for meshes with known export precision
/// let params = VolumeParams::default().with_weld_tolerance(1e-6);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VolumeParams {
    /// Distance threshold for vertex welding.
    ///
    /// Vertices whose coordinates quantize to the same grid cell at this
    /// resolution are merged into one. When `None`, the tolerance is derived
    /// from the model's bounding-box diagonal. Negative values are clamped
    /// to zero.
    /// Default: `None`
    pub weld_tolerance: Option<f64>,

    /// Scale factor for the degenerate-triangle area threshold.
    ///
    /// Triangles whose squared area falls below this factor times the squared
    /// bounding-box diagonal are removed before welding.
    /// Default: `1e-12`
    pub degenerate_area_factor: f64,
}

impl Default for VolumeParams {
    fn default() -> Self {
        Self {
            weld_tolerance: None,
            degenerate_area_factor: 1e-12,
        }
    }
}

impl VolumeParams {
    /// Create params with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an explicit welding tolerance instead of deriving one from the
    /// bounding-box diagonal.
    #[must_use]
    pub fn with_weld_tolerance(mut self, tolerance: f64) -> Self {
        self.weld_tolerance = Some(tolerance);
        self
    }

    /// Set the degenerate-triangle area factor.
    #[must_use]
    pub fn with_degenerate_area_factor(mut self, factor: f64) -> Self {
        self.degenerate_area_factor = factor;
        self
    }

    /// Resolve the effective welding tolerance for a model with the given
    /// bounding-box diagonal.
    ///
    /// An explicit tolerance is clamped to be non-negative. A derived
    /// tolerance is one part in 10^9 of the diagonal, floored at `1e-12`
    /// so that unit-scale models still weld exact duplicates.
    #[must_use]
    pub fn resolved_weld_tolerance(&self, diagonal: f64) -> f64 {
        match self.weld_tolerance {
            Some(tolerance) => tolerance.max(0.0),
            None => (diagonal * 1e-9).max(1e-12),
        }
    }
}
