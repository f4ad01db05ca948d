//! Error types for style configuration and stripe geometry.

use std::path::PathBuf;

/// Problems with a [`StripeStyle`](crate::style::StripeStyle).
///
/// All of these are configuration errors: the widget cannot be built from a
/// style that fails validation.
#[derive(thiserror::Error, Debug)]
pub enum StyleError {
    /// Rotation normalizes to exactly 90°, which makes the stripe normal
    /// horizontal and the x-axis period infinite.
    #[error("bar stripe rotation degree cannot be 90 (got {raw})")]
    VerticalStripes { raw: f32 },

    #[error("{field} must be {requirement}, got {value}")]
    OutOfRange {
        field: &'static str,
        requirement: &'static str,
        value: f32,
    },

    #[error("invalid color {0:?}, expected #RRGGBB or #AARRGGBB")]
    InvalidColor(String),

    #[error("failed to read style file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse style: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Problems found while laying out the stripe tile for a concrete size.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The bar is so tall relative to the stripe period that covering the
    /// slanted edges needs an unreasonable number of extra stripes.
    #[error("stripe skew of {skew}px needs more than {limit} edge stripes (period {period}px)")]
    ExcessiveSkew { skew: f32, period: f32, limit: usize },

    /// The stripe period is so small against the bar width that one tile
    /// would hold an unreasonable number of stripes.
    #[error("a {bar_width}px bar with a {period}px stripe period needs more than {limit} stripes")]
    TooManyStripes { bar_width: f32, period: f32, limit: usize },

    #[error("stripe tile of {width}x{height}px cannot be allocated")]
    TileAllocation { width: u32, height: u32 },

    #[error("widget layer of {width}x{height}px cannot be allocated")]
    LayerAllocation { width: u32, height: u32 },
}
