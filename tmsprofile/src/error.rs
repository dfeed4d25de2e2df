//! Error types for profile construction and lookups.
//!
//! Coordinate conversions themselves never fail: out-of-range latitudes,
//! longitudes and zoom levels are caller preconditions and produce plain
//! (possibly non-finite) numbers. Only the operations below report errors.

use thiserror::Error;

/// Errors reported by tile profiles.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    /// Tile edge length must be at least one pixel.
    #[error("Invalid tile size: {0} (must be greater than 0)")]
    InvalidTileSize(u32),

    /// The zoom scan found no level fine enough for the requested pixel size.
    #[error("No zoom level in 0..{max_zoom} matches pixel size {pixel_size}")]
    NoZoomForPixelSize { pixel_size: f64, max_zoom: u32 },

    /// Zoom level is too deep for Google/XYZ or QuadTree indices.
    #[error("Invalid zoom level: {zoom} (must be at most {max_zoom})")]
    InvalidZoom { zoom: u32, max_zoom: u32 },

    /// Quadkey contains invalid characters or is too long.
    #[error("Invalid quadkey: '{0}' (must contain only digits 0-3)")]
    InvalidQuadkey(String),
}
