//! Coordinate conversion module
//!
//! Shared pieces of the TMS tile profiles: constants, the [`TileProfile`]
//! trait, and the pixel-to-tile and zoom-scan rules both profiles apply
//! identically.

mod types;

pub use types::{
    TileCoord, EARTH_RADIUS, MAX_LAT, MAX_LON, MAX_SCAN_ZOOM, MAX_TILE_ZOOM, MIN_LAT, MIN_LON,
};

pub(crate) use types::zoom_scale;

use tracing::{trace, warn};

use crate::config::ZoomLookup;
use crate::error::ProfileError;

/// Operations common to every tile profile.
///
/// Implemented by [`crate::MercatorProfile`] and [`crate::GeodeticProfile`],
/// so callers serving both pyramids can stay generic over the profile.
pub trait TileProfile {
    /// Tile edge length in pixels.
    fn tile_size(&self) -> f64;

    /// Projected units per pixel at the given zoom.
    fn resolution(&self, zoom: u32) -> f64;

    /// Converts lat/lon to pyramid pixel coordinates at the given zoom.
    fn lat_lon_to_pixels(&self, lat: f64, lon: f64, zoom: u32) -> (f64, f64);

    /// Bounds of a tile in the profile's projected units.
    fn tile_bounds(&self, tx: i64, ty: i64, zoom: u32) -> (f64, f64, f64, f64);

    /// Zoom level best matching the requested pixel size.
    fn zoom_for_pixel_size(&self, pixel_size: f64) -> Result<i32, ProfileError>;

    /// Returns the tile containing the given pixel.
    fn pixels_to_tile(&self, px: f64, py: f64) -> (i64, i64) {
        pixels_to_tile(px, py, self.tile_size())
    }

    /// Returns the tile containing the given lat/lon at the given zoom.
    fn lat_lon_to_tile(&self, lat: f64, lon: f64, zoom: u32) -> TileCoord {
        let (px, py) = self.lat_lon_to_pixels(lat, lon, zoom);
        let (tx, ty) = self.pixels_to_tile(px, py);
        TileCoord { tx, ty, zoom }
    }
}

/// Maps a pixel to the tile containing it.
///
/// Uses `ceil(p / tile_size) - 1` on each axis, so a pixel exactly on a
/// tile edge belongs to the tile to its left/below. Only valid for
/// positive pixel values: pixel 0 maps to tile -1.
#[inline]
pub fn pixels_to_tile(px: f64, py: f64, tile_size: f64) -> (i64, i64) {
    let tx = ((px / tile_size).ceil() - 1.0) as i64;
    let ty = ((py / tile_size).ceil() - 1.0) as i64;
    (tx, ty)
}

/// Scans zoom levels `0..MAX_SCAN_ZOOM` for the first one whose resolution
/// is finer than `pixel_size`, and maps that crossing to a zoom according
/// to `lookup`.
///
/// Fails with [`ProfileError::NoZoomForPixelSize`] when no level in the
/// range crosses (including a NaN or non-positive `pixel_size`).
pub(crate) fn scan_zoom_for_pixel_size(
    pixel_size: f64,
    lookup: ZoomLookup,
    resolution: impl Fn(u32) -> f64,
) -> Result<i32, ProfileError> {
    for zoom in 0..MAX_SCAN_ZOOM {
        let res = resolution(zoom);
        trace!(zoom, resolution = res, pixel_size, "Scanning zoom level");

        if pixel_size > res {
            let selected = match lookup {
                ZoomLookup::Intended if zoom == 0 => 0,
                ZoomLookup::Intended => zoom as i32 - 1,
                ZoomLookup::Legacy if zoom == 0 => -1,
                ZoomLookup::Legacy => 0,
            };

            if selected < 0 {
                warn!(
                    pixel_size,
                    selected, "Legacy zoom lookup returned a negative zoom"
                );
            }

            return Ok(selected);
        }
    }

    Err(ProfileError::NoZoomForPixelSize {
        pixel_size,
        max_zoom: MAX_SCAN_ZOOM,
    })
}
