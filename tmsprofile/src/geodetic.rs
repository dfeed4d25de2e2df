//! TMS Global Geodetic profile.
//!
//! Plate Carrée (EPSG:4326, "unprojected") conversions. Geodetic degrees are
//! used directly as planar XY, so there is no meters stage: only scaling to
//! the pixel pyramid and cutting into tiles.
//!
//! The top of the pyramid is two tiles side by side: the area
//! `[-180, -90, 180, 90]` is scaled to 512×256 pixels at zoom 0. Pixel and
//! tile origins are at the bottom-left.
//!
//! The first coordinate argument spans the 360° axis and the second spans
//! the 180° axis. They are named `lat` and `lon` for compatibility with
//! existing geodetic pyramids, so `lat_lon_to_pixels(lat, lon, z)` yields
//! `px` from `lat + 180` and `py` from `lon + 90`.

use tracing::debug;

use crate::config::{GeodeticScale, ProfileConfig, ZoomLookup, DEFAULT_TILE_SIZE};
use crate::coord::{self, zoom_scale, TileCoord, TileProfile};
use crate::error::ProfileError;

/// Plate Carrée tile profile.
#[derive(Debug, Clone, PartialEq)]
pub struct GeodeticProfile {
    tile_size: f64,
    /// Pixels per tile edge used by resolution and tile bounds.
    scale_base: f64,
    zoom_lookup: ZoomLookup,
}

impl GeodeticProfile {
    /// Creates a profile for square tiles of `tile_size` pixels.
    ///
    /// Resolution and tile bounds still assume 256-pixel tiles; use
    /// [`GeodeticProfile::from_config`] with [`GeodeticScale::TileSize`]
    /// to scale them by `tile_size` instead.
    pub fn new(tile_size: u32) -> Result<Self, ProfileError> {
        Self::from_config(&ProfileConfig::new().with_tile_size(tile_size))
    }

    /// Creates a profile from a full configuration.
    pub fn from_config(config: &ProfileConfig) -> Result<Self, ProfileError> {
        if config.tile_size == 0 {
            return Err(ProfileError::InvalidTileSize(config.tile_size));
        }

        Ok(Self::build(
            config.tile_size,
            config.geodetic_scale,
            config.zoom_lookup,
        ))
    }

    fn build(tile_size: u32, scale: GeodeticScale, zoom_lookup: ZoomLookup) -> Self {
        let tile_size = f64::from(tile_size);
        let scale_base = match scale {
            GeodeticScale::Fixed256 => 256.0,
            GeodeticScale::TileSize => tile_size,
        };

        debug!(
            tile_size,
            scale_base,
            ?zoom_lookup,
            "Created geodetic profile"
        );

        Self {
            tile_size,
            scale_base,
            zoom_lookup,
        }
    }

    /// Tile edge length in pixels.
    #[inline]
    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    /// Degrees per pixel at the given zoom.
    ///
    /// Zoom levels beyond `i32::MAX` resolve to 0 rather than wrapping.
    #[inline]
    pub fn resolution(&self, zoom: u32) -> f64 {
        180.0 / self.scale_base / zoom_scale(zoom)
    }

    /// Converts lat/lon to pixel coordinates at `zoom`.
    pub fn lat_lon_to_pixels(&self, lat: f64, lon: f64, zoom: u32) -> (f64, f64) {
        let res = self.resolution(zoom);
        let px = (180.0 + lat) / res;
        let py = (90.0 + lon) / res;
        (px, py)
    }

    /// Returns the tile containing the given pixel.
    ///
    /// Uses the configured tile size; pixel 0 maps to tile -1.
    #[inline]
    pub fn pixels_to_tile(&self, px: f64, py: f64) -> (i64, i64) {
        coord::pixels_to_tile(px, py, self.tile_size)
    }

    /// Returns the tile containing the given lat/lon.
    pub fn lat_lon_to_tile(&self, lat: f64, lon: f64, zoom: u32) -> TileCoord {
        let (px, py) = self.lat_lon_to_pixels(lat, lon, zoom);
        let (tx, ty) = self.pixels_to_tile(px, py);
        TileCoord { tx, ty, zoom }
    }

    /// Bounds of the given tile in degrees.
    ///
    /// Returns `(min_x, min_y, max_x, max_y)`, where X spans -180..180 and
    /// Y spans -90..90.
    pub fn tile_bounds(&self, tx: i64, ty: i64, zoom: u32) -> (f64, f64, f64, f64) {
        let res = self.resolution(zoom);
        let span = self.scale_base * res;
        let (tx, ty) = (tx as f64, ty as f64);
        (
            tx * span - 180.0,
            ty * span - 90.0,
            (tx + 1.0) * span - 180.0,
            (ty + 1.0) * span - 90.0,
        )
    }

    /// Maximal scale-down zoom of the pyramid closest to `pixel_size`.
    pub fn zoom_for_pixel_size(&self, pixel_size: f64) -> Result<i32, ProfileError> {
        coord::scan_zoom_for_pixel_size(pixel_size, self.zoom_lookup, |zoom| {
            self.resolution(zoom)
        })
    }
}

impl Default for GeodeticProfile {
    fn default() -> Self {
        Self::build(
            DEFAULT_TILE_SIZE,
            GeodeticScale::default(),
            ZoomLookup::default(),
        )
    }
}

impl TileProfile for GeodeticProfile {
    fn tile_size(&self) -> f64 {
        self.tile_size
    }

    fn resolution(&self, zoom: u32) -> f64 {
        GeodeticProfile::resolution(self, zoom)
    }

    fn lat_lon_to_pixels(&self, lat: f64, lon: f64, zoom: u32) -> (f64, f64) {
        GeodeticProfile::lat_lon_to_pixels(self, lat, lon, zoom)
    }

    fn tile_bounds(&self, tx: i64, ty: i64, zoom: u32) -> (f64, f64, f64, f64) {
        GeodeticProfile::tile_bounds(self, tx, ty, zoom)
    }

    fn zoom_for_pixel_size(&self, pixel_size: f64) -> Result<i32, ProfileError> {
        GeodeticProfile::zoom_for_pixel_size(self, pixel_size)
    }
}
