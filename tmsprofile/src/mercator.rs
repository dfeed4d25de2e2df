//! TMS Global Mercator profile.
//!
//! Spherical Mercator (EPSG:3857, also known as EPSG:900913) conversions
//! for tile pyramids compatible with Google Maps, Bing and OpenLayers:
//!
//! ```text
//!   LatLon      <->      Meters      <->      Pixels      <->      Tile
//!  WGS84 lat/lon    Spherical Mercator   pyramid pixels      TMS indices
//!   EPSG:4326          XY in metres       XY at zoom Z      origin bottom-left
//! ```
//!
//! The projected extent of the Earth is
//! `[-20037508.342789244, -20037508.342789244, 20037508.342789244, 20037508.342789244]`,
//! covered at zoom 0 by a single tile. Latitudes beyond ±85.05112878° fall
//! outside that square and are not clipped; at ±90° the projection diverges.
//!
//! # Example
//!
//! ```
//! use tmsprofile::MercatorProfile;
//!
//! let mercator = MercatorProfile::default();
//! let (mx, my) = mercator.lat_lon_to_meters(51.5, -0.12);
//! let (tx, ty) = mercator.meters_to_tile(mx, my, 10);
//! assert_eq!((tx, ty), (511, 683));
//! ```

use std::f64::consts::PI;

use tracing::{debug, trace};

use crate::config::{ProfileConfig, ZoomLookup, DEFAULT_TILE_SIZE};
use crate::coord::{self, zoom_scale, TileCoord, TileProfile, EARTH_RADIUS, MAX_LAT, MIN_LAT};
use crate::error::ProfileError;

/// Spherical Mercator tile profile.
///
/// Immutable after construction; build a new profile to change the tile size.
#[derive(Debug, Clone, PartialEq)]
pub struct MercatorProfile {
    tile_size: f64,
    initial_resolution: f64,
    origin_shift: f64,
    zoom_lookup: ZoomLookup,
}

impl MercatorProfile {
    /// Creates a profile for square tiles of `tile_size` pixels.
    pub fn new(tile_size: u32) -> Result<Self, ProfileError> {
        Self::from_config(&ProfileConfig::new().with_tile_size(tile_size))
    }

    /// Creates a profile from a full configuration.
    pub fn from_config(config: &ProfileConfig) -> Result<Self, ProfileError> {
        if config.tile_size == 0 {
            return Err(ProfileError::InvalidTileSize(config.tile_size));
        }

        Ok(Self::build(config.tile_size, config.zoom_lookup))
    }

    fn build(tile_size: u32, zoom_lookup: ZoomLookup) -> Self {
        let tile_size = f64::from(tile_size);
        let initial_resolution = 2.0 * PI * EARTH_RADIUS / tile_size;
        let origin_shift = 2.0 * PI * EARTH_RADIUS / 2.0;

        debug!(
            tile_size,
            initial_resolution,
            origin_shift,
            ?zoom_lookup,
            "Created Mercator profile"
        );

        Self {
            tile_size,
            initial_resolution,
            origin_shift,
            zoom_lookup,
        }
    }

    /// Tile edge length in pixels.
    #[inline]
    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    /// Meters per pixel at zoom 0 (156543.03392804062 for 256-pixel tiles).
    #[inline]
    pub fn initial_resolution(&self) -> f64 {
        self.initial_resolution
    }

    /// Half the equatorial circumference in meters (20037508.342789244).
    #[inline]
    pub fn origin_shift(&self) -> f64 {
        self.origin_shift
    }

    /// Converts WGS84 lat/lon to Spherical Mercator meters.
    ///
    /// Returns `(mx, my)`. Latitudes at ±90° produce non-finite values.
    pub fn lat_lon_to_meters(&self, lat: f64, lon: f64) -> (f64, f64) {
        if !(MIN_LAT..=MAX_LAT).contains(&lat) {
            trace!(lat, "Projecting latitude beyond the Mercator clipping bound");
        }

        let mx = lon * self.origin_shift / 180.0;
        let my = ((90.0 + lat) * PI / 360.0).tan().ln() / (PI / 180.0);
        let my = my * self.origin_shift / 180.0;
        (mx, my)
    }

    /// Converts Spherical Mercator meters to WGS84 lat/lon.
    ///
    /// Returns `(lat, lon)`.
    pub fn meters_to_lat_lon(&self, mx: f64, my: f64) -> (f64, f64) {
        let lon = mx / self.origin_shift * 180.0;
        let lat = my / self.origin_shift * 180.0;
        let lat = 180.0 / PI * (2.0 * (lat * PI / 180.0).exp().atan() - PI / 2.0);
        (lat, lon)
    }

    /// Meters per pixel at the given zoom, measured at the equator.
    ///
    /// Zoom levels beyond `i32::MAX` resolve to 0 rather than wrapping.
    #[inline]
    pub fn resolution(&self, zoom: u32) -> f64 {
        self.initial_resolution / zoom_scale(zoom)
    }

    /// Converts pyramid pixel coordinates at `zoom` to meters.
    pub fn pixels_to_meters(&self, px: f64, py: f64, zoom: u32) -> (f64, f64) {
        let res = self.resolution(zoom);
        let mx = px * res - self.origin_shift;
        let my = py * res - self.origin_shift;
        (mx, my)
    }

    /// Converts meters to pyramid pixel coordinates at `zoom`.
    pub fn meters_to_pixels(&self, mx: f64, my: f64, zoom: u32) -> (f64, f64) {
        let res = self.resolution(zoom);
        let px = (mx + self.origin_shift) / res;
        let py = (my + self.origin_shift) / res;
        (px, py)
    }

    /// Converts WGS84 lat/lon straight to pyramid pixels at `zoom`.
    pub fn lat_lon_to_pixels(&self, lat: f64, lon: f64, zoom: u32) -> (f64, f64) {
        let (mx, my) = self.lat_lon_to_meters(lat, lon);
        self.meters_to_pixels(mx, my, zoom)
    }

    /// Returns the tile containing the given pixel.
    ///
    /// See [`coord::pixels_to_tile`] for the edge rule; pixel 0 maps to -1.
    #[inline]
    pub fn pixels_to_tile(&self, px: f64, py: f64) -> (i64, i64) {
        coord::pixels_to_tile(px, py, self.tile_size)
    }

    /// Moves the pixel origin from the bottom-left to the top-left corner.
    ///
    /// Applying it twice at the same zoom returns the original pixel.
    pub fn pixels_to_raster(&self, px: f64, py: f64, zoom: u32) -> (f64, f64) {
        let map_size = self.tile_size * zoom_scale(zoom);
        (px, map_size - py)
    }

    /// Returns the tile containing the given Mercator coordinates.
    pub fn meters_to_tile(&self, mx: f64, my: f64, zoom: u32) -> (i64, i64) {
        let (px, py) = self.meters_to_pixels(mx, my, zoom);
        self.pixels_to_tile(px, py)
    }

    /// Returns the tile containing the given lat/lon.
    pub fn lat_lon_to_tile(&self, lat: f64, lon: f64, zoom: u32) -> TileCoord {
        let (mx, my) = self.lat_lon_to_meters(lat, lon);
        let (tx, ty) = self.meters_to_tile(mx, my, zoom);
        TileCoord { tx, ty, zoom }
    }

    /// Bounds of the given tile in meters: `(minx, miny, maxx, maxy)`.
    pub fn tile_bounds(&self, tx: i64, ty: i64, zoom: u32) -> (f64, f64, f64, f64) {
        let (tx, ty) = (tx as f64, ty as f64);
        let (minx, miny) =
            self.pixels_to_meters(tx * self.tile_size, ty * self.tile_size, zoom);
        let (maxx, maxy) = self.pixels_to_meters(
            (tx + 1.0) * self.tile_size,
            (ty + 1.0) * self.tile_size,
            zoom,
        );
        (minx, miny, maxx, maxy)
    }

    /// Bounds of the given tile in WGS84 degrees.
    ///
    /// Returns `(min_lat, min_lon, max_lat, max_lon)`: the south-west corner
    /// as (lat, lon) followed by the north-east corner as (lat, lon).
    pub fn tile_lat_lon_bounds(&self, tx: i64, ty: i64, zoom: u32) -> (f64, f64, f64, f64) {
        let (minx, miny, maxx, maxy) = self.tile_bounds(tx, ty, zoom);
        let (min_lat, min_lon) = self.meters_to_lat_lon(minx, miny);
        let (max_lat, max_lon) = self.meters_to_lat_lon(maxx, maxy);
        (min_lat, min_lon, max_lat, max_lon)
    }

    /// Maximal scale-down zoom of the pyramid closest to `pixel_size`.
    ///
    /// Behavior at the first crossing follows the configured
    /// [`ZoomLookup`]; only [`ZoomLookup::Legacy`] can return -1.
    pub fn zoom_for_pixel_size(&self, pixel_size: f64) -> Result<i32, ProfileError> {
        coord::scan_zoom_for_pixel_size(pixel_size, self.zoom_lookup, |zoom| {
            self.resolution(zoom)
        })
    }
}

impl Default for MercatorProfile {
    fn default() -> Self {
        Self::build(DEFAULT_TILE_SIZE, ZoomLookup::default())
    }
}

impl TileProfile for MercatorProfile {
    fn tile_size(&self) -> f64 {
        self.tile_size
    }

    fn resolution(&self, zoom: u32) -> f64 {
        MercatorProfile::resolution(self, zoom)
    }

    fn lat_lon_to_pixels(&self, lat: f64, lon: f64, zoom: u32) -> (f64, f64) {
        MercatorProfile::lat_lon_to_pixels(self, lat, lon, zoom)
    }

    fn tile_bounds(&self, tx: i64, ty: i64, zoom: u32) -> (f64, f64, f64, f64) {
        MercatorProfile::tile_bounds(self, tx, ty, zoom)
    }

    fn zoom_for_pixel_size(&self, pixel_size: f64) -> Result<i32, ProfileError> {
        MercatorProfile::zoom_for_pixel_size(self, pixel_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{MAX_LON, MIN_LON};

    fn assert_close(actual: f64, expected: f64, eps: f64) {
        assert!(
            (actual - expected).abs() < eps,
            "expected {} but was {} (eps {})",
            expected,
            actual,
            eps
        );
    }

    #[test]
    fn test_derived_constants_for_256() {
        let mercator = MercatorProfile::new(256).unwrap();
        assert_close(mercator.initial_resolution(), 156543.03392804062, 1e-8);
        assert_close(mercator.origin_shift(), 20037508.342789244, 1e-6);
    }

    #[test]
    fn test_derived_constants_scale_with_tile_size() {
        let mercator = MercatorProfile::new(512).unwrap();
        assert_close(mercator.initial_resolution(), 156543.03392804062 / 2.0, 1e-8);
        // Origin shift does not depend on tile size
        assert_close(mercator.origin_shift(), 20037508.342789244, 1e-6);
    }

    #[test]
    fn test_zero_tile_size_rejected() {
        assert_eq!(
            MercatorProfile::new(0).unwrap_err(),
            ProfileError::InvalidTileSize(0)
        );
    }

    #[test]
    fn test_default_matches_256() {
        assert_eq!(MercatorProfile::default(), MercatorProfile::new(256).unwrap());
    }

    #[test]
    fn test_lat_lon_to_meters_origin() {
        let mercator = MercatorProfile::default();
        let (mx, my) = mercator.lat_lon_to_meters(0.0, 0.0);
        assert_close(mx, 0.0, 1e-9);
        assert_close(my, 0.0, 1e-6);
    }

    #[test]
    fn test_lat_lon_to_meters_extent() {
        let mercator = MercatorProfile::default();
        let (mx, my) = mercator.lat_lon_to_meters(MAX_LAT, 180.0);
        assert_close(mx, 20037508.342789244, 1e-6);
        // The clipping latitude projects onto the square extent
        assert_close(my, 20037508.342789244, 1.0);
    }

    #[test]
    fn test_lat_lon_to_meters_pole_is_not_finite() {
        let mercator = MercatorProfile::default();
        let (_, my) = mercator.lat_lon_to_meters(-90.0, 0.0);
        assert!(!my.is_finite());
    }

    #[test]
    fn test_meters_to_lat_lon_london() {
        let mercator = MercatorProfile::default();
        let (mx, my) = mercator.lat_lon_to_meters(51.5074, -0.1278);
        let (lat, lon) = mercator.meters_to_lat_lon(mx, my);
        assert_close(lat, 51.5074, 1e-9);
        assert_close(lon, -0.1278, 1e-9);
    }

    #[test]
    fn test_resolution_halves() {
        let mercator = MercatorProfile::default();
        for zoom in 0..20 {
            assert_eq!(mercator.resolution(zoom + 1), mercator.resolution(zoom) / 2.0);
        }
    }

    #[test]
    fn test_pixels_to_meters_corners() {
        let mercator = MercatorProfile::default();
        let (mx, my) = mercator.pixels_to_meters(0.0, 0.0, 0);
        assert_close(mx, -20037508.342789244, 1e-6);
        assert_close(my, -20037508.342789244, 1e-6);

        let (mx, my) = mercator.pixels_to_meters(256.0, 256.0, 0);
        assert_close(mx, 20037508.342789244, 1e-6);
        assert_close(my, 20037508.342789244, 1e-6);
    }

    #[test]
    fn test_meters_to_tile_new_york() {
        let mercator = MercatorProfile::default();
        let (mx, my) = mercator.lat_lon_to_meters(40.7128, -74.0060);
        let (tx, ty) = mercator.meters_to_tile(mx, my, 16);

        // Slippy map row 24640 flipped into TMS
        assert_eq!(tx, 19295);
        assert_eq!(ty, (1 << 16) - 1 - 24640);
    }

    #[test]
    fn test_lat_lon_to_tile_matches_meters_to_tile() {
        let mercator = MercatorProfile::default();
        let tile = mercator.lat_lon_to_tile(40.7128, -74.0060, 16);
        let (mx, my) = mercator.lat_lon_to_meters(40.7128, -74.0060);
        assert_eq!((tile.tx, tile.ty), mercator.meters_to_tile(mx, my, 16));
        assert_eq!(tile.to_google().unwrap(), (19295, 24640));
    }

    #[test]
    fn test_tile_bounds_zoom_zero_is_world() {
        let mercator = MercatorProfile::default();
        let (minx, miny, maxx, maxy) = mercator.tile_bounds(0, 0, 0);
        assert_close(minx, -20037508.342789244, 1e-6);
        assert_close(miny, -20037508.342789244, 1e-6);
        assert_close(maxx, 20037508.342789244, 1e-6);
        assert_close(maxy, 20037508.342789244, 1e-6);
    }

    #[test]
    fn test_tile_bounds_ordered() {
        let mercator = MercatorProfile::default();
        let (minx, miny, maxx, maxy) = mercator.tile_bounds(5, 9, 4);
        assert!(minx < maxx);
        assert!(miny < maxy);
    }

    #[test]
    fn test_tile_lat_lon_bounds_order() {
        let mercator = MercatorProfile::default();
        // North-east quarter of the world at zoom 1
        let (min_lat, min_lon, max_lat, max_lon) = mercator.tile_lat_lon_bounds(1, 1, 1);
        assert_close(min_lat, 0.0, 1e-9);
        assert_close(min_lon, 0.0, 1e-9);
        assert_close(max_lat, 85.0511287798066, 1e-9);
        assert_close(max_lon, 180.0, 1e-9);
    }

    #[test]
    fn test_pixels_to_raster_flips_y() {
        let mercator = MercatorProfile::default();
        assert_eq!(mercator.pixels_to_raster(10.0, 0.0, 0), (10.0, 256.0));
        assert_eq!(mercator.pixels_to_raster(10.0, 100.0, 2), (10.0, 924.0));
    }

    #[test]
    fn test_pixels_to_raster_twice_at_deep_zoom() {
        let mercator = MercatorProfile::default();
        let py = 58450.900341817956;
        let map_size = mercator.tile_size() * zoom_scale(17);

        let (rx, ry) = mercator.pixels_to_raster(0.0, py, 17);
        let (px2, py2) = mercator.pixels_to_raster(rx, ry, 17);

        assert_eq!(px2, 0.0);
        assert!((py2 - py).abs() <= 1e-9 * map_size);
    }

    #[test]
    fn test_resolution_huge_zoom_does_not_wrap() {
        let mercator = MercatorProfile::default();
        assert_eq!(mercator.resolution(u32::MAX), 0.0);
        assert!(mercator.resolution(i32::MAX as u32 + 1) <= mercator.resolution(64));
    }

    #[test]
    fn test_zoom_for_pixel_size_intended() {
        let mercator = MercatorProfile::default();
        // Resolution at zoom 10 is ~152.87 m/px
        assert_eq!(mercator.zoom_for_pixel_size(150.0).unwrap(), 10);
        assert_eq!(mercator.zoom_for_pixel_size(160.0).unwrap(), 9);
        assert_eq!(mercator.zoom_for_pixel_size(200_000.0).unwrap(), 0);
    }

    #[test]
    fn test_zoom_for_pixel_size_legacy() {
        let config = ProfileConfig::new().with_zoom_lookup(ZoomLookup::Legacy);
        let mercator = MercatorProfile::from_config(&config).unwrap();
        assert_eq!(mercator.zoom_for_pixel_size(150.0).unwrap(), 0);
        assert_eq!(mercator.zoom_for_pixel_size(200_000.0).unwrap(), -1);
    }

    #[test]
    fn test_zoom_for_pixel_size_too_fine() {
        let mercator = MercatorProfile::default();
        let result = mercator.zoom_for_pixel_size(1e-6);
        assert!(matches!(
            result,
            Err(ProfileError::NoZoomForPixelSize { .. })
        ));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_lat_lon_meters_roundtrip(
                lat in (MIN_LAT + 0.05)..(MAX_LAT - 0.05),
                lon in MIN_LON..MAX_LON
            ) {
                let mercator = MercatorProfile::default();
                let (mx, my) = mercator.lat_lon_to_meters(lat, lon);
                let (lat2, lon2) = mercator.meters_to_lat_lon(mx, my);

                prop_assert!(
                    (lat2 - lat).abs() <= 1e-9 * lat.abs().max(1.0),
                    "Latitude roundtrip failed: {} -> {}", lat, lat2
                );
                prop_assert!(
                    (lon2 - lon).abs() <= 1e-9 * lon.abs().max(1.0),
                    "Longitude roundtrip failed: {} -> {}", lon, lon2
                );
            }

            #[test]
            fn test_pixels_meters_roundtrip(
                fx in 0.0..1.0_f64,
                fy in 0.0..1.0_f64,
                zoom in 0u32..=20
            ) {
                let mercator = MercatorProfile::default();
                let size = 256.0 * zoom_scale(zoom);
                let (px, py) = (fx * size, fy * size);

                let (mx, my) = mercator.pixels_to_meters(px, py, zoom);
                let (px2, py2) = mercator.meters_to_pixels(mx, my, zoom);

                prop_assert!((px2 - px).abs() <= 1e-6 * size.max(1.0));
                prop_assert!((py2 - py).abs() <= 1e-6 * size.max(1.0));
            }

            #[test]
            fn test_pixels_to_raster_involution(
                px in 0.0..65536.0_f64,
                py in 0.0..65536.0_f64,
                zoom in 8u32..=18
            ) {
                let mercator = MercatorProfile::default();
                let (rx, ry) = mercator.pixels_to_raster(px, py, zoom);
                let (px2, py2) = mercator.pixels_to_raster(rx, ry, zoom);
                let map_size = mercator.tile_size() * zoom_scale(zoom);
                prop_assert_eq!(px2, px);
                prop_assert!(
                    (py2 - py).abs() <= 1e-9 * map_size,
                    "Raster flip drifted: {} -> {} (map size {})", py, py2, map_size
                );
            }

            #[test]
            fn test_tile_interior_maps_back(
                raw_tx in 0i64..100_000,
                raw_ty in 0i64..100_000,
                zoom in 1u32..=16,
                fx in 0.01..0.99_f64,
                fy in 0.01..0.99_f64
            ) {
                let mercator = MercatorProfile::default();
                let n = 1i64 << zoom;
                let (tx, ty) = (raw_tx % n, raw_ty % n);

                let px = (tx as f64 + fx) * mercator.tile_size();
                let py = (ty as f64 + fy) * mercator.tile_size();
                prop_assert_eq!(mercator.pixels_to_tile(px, py), (tx, ty));
            }

            #[test]
            fn test_lat_lon_tile_contains_point(
                lat in -85.0..85.0_f64,
                lon in -179.9..179.9_f64,
                zoom in 0u32..=18
            ) {
                let mercator = MercatorProfile::default();
                let tile = mercator.lat_lon_to_tile(lat, lon, zoom);
                let (mx, my) = mercator.lat_lon_to_meters(lat, lon);
                let (minx, miny, maxx, maxy) = mercator.tile_bounds(tile.tx, tile.ty, zoom);

                let slack = 1e-6;
                prop_assert!(mx > minx - slack && mx <= maxx + slack);
                prop_assert!(my > miny - slack && my <= maxy + slack);
            }
        }
    }
}
