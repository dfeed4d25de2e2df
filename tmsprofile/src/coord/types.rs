//! Coordinate type definitions

use std::fmt;

use crate::error::ProfileError;

/// Equatorial radius of the WGS84 ellipsoid, used as the sphere radius.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Southern Web Mercator clipping latitude. Not enforced by the profiles.
pub const MIN_LAT: f64 = -85.05112878;

/// Northern Web Mercator clipping latitude. Not enforced by the profiles.
pub const MAX_LAT: f64 = 85.05112878;

/// Western end of the conventional longitude range.
pub const MIN_LON: f64 = -180.0;

/// Eastern end of the conventional longitude range.
pub const MAX_LON: f64 = 180.0;

/// Zoom levels scanned by `zoom_for_pixel_size` are `0..MAX_SCAN_ZOOM`.
pub const MAX_SCAN_ZOOM: u32 = 30;

/// Deepest zoom supported by Google/XYZ and QuadTree conversions.
///
/// Applies in both directions, so every key produced by
/// [`TileCoord::quadkey`] parses back with [`TileCoord::from_quadkey`].
pub const MAX_TILE_ZOOM: u32 = 30;

/// Tile index in TMS notation (origin at the bottom-left of the pyramid).
///
/// Indices are signed because pixel-to-tile conversion maps pixel 0
/// to tile -1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// X index (west to east)
    pub tx: i64,
    /// Y index (south to north)
    pub ty: i64,
    /// Zoom level
    pub zoom: u32,
}

impl TileCoord {
    /// Creates a TMS tile coordinate.
    #[inline]
    pub fn new(tx: i64, ty: i64, zoom: u32) -> Self {
        Self { tx, ty, zoom }
    }

    /// Converts to Google/XYZ indices (origin at the top-left).
    ///
    /// Only the Y axis differs: `google_y = 2^zoom - 1 - ty`. Fails for
    /// zoom levels above [`MAX_TILE_ZOOM`].
    #[inline]
    pub fn to_google(&self) -> Result<(i64, i64), ProfileError> {
        Ok((self.tx, flip_y(self.ty, self.zoom)?))
    }

    /// Builds a TMS tile from Google/XYZ indices.
    ///
    /// Fails for zoom levels above [`MAX_TILE_ZOOM`].
    #[inline]
    pub fn from_google(x: i64, y: i64, zoom: u32) -> Result<Self, ProfileError> {
        Ok(Self {
            tx: x,
            ty: flip_y(y, zoom)?,
            zoom,
        })
    }

    /// Returns the Microsoft QuadTree key for this tile.
    ///
    /// One digit per zoom level, most significant level first. Zoom 0
    /// yields an empty key. Fails for zoom levels above [`MAX_TILE_ZOOM`].
    pub fn quadkey(&self) -> Result<String, ProfileError> {
        let (x, y) = self.to_google()?;
        let mut key = String::with_capacity(self.zoom as usize);

        for level in (1..=self.zoom).rev() {
            let mask = 1i64 << (level - 1);
            let mut digit = b'0';
            if x & mask != 0 {
                digit += 1;
            }
            if y & mask != 0 {
                digit += 2;
            }
            key.push(digit as char);
        }

        Ok(key)
    }

    /// Parses a QuadTree key into a TMS tile.
    ///
    /// The zoom level is the key length, at most [`MAX_TILE_ZOOM`].
    pub fn from_quadkey(key: &str) -> Result<Self, ProfileError> {
        if key.len() > MAX_TILE_ZOOM as usize {
            return Err(ProfileError::InvalidQuadkey(key.to_string()));
        }

        let zoom = key.len() as u32;
        let mut x = 0i64;
        let mut y = 0i64;

        for (i, c) in key.chars().enumerate() {
            let mask = 1i64 << (zoom as usize - i - 1);
            match c {
                '0' => {}
                '1' => x |= mask,
                '2' => y |= mask,
                '3' => {
                    x |= mask;
                    y |= mask;
                }
                _ => return Err(ProfileError::InvalidQuadkey(key.to_string())),
            }
        }

        Self::from_google(x, y, zoom)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.tx, self.ty)
    }
}

#[inline]
fn flip_y(y: i64, zoom: u32) -> Result<i64, ProfileError> {
    if zoom > MAX_TILE_ZOOM {
        return Err(ProfileError::InvalidZoom {
            zoom,
            max_zoom: MAX_TILE_ZOOM,
        });
    }
    Ok((1i64 << zoom) - 1 - y)
}

/// `2^zoom` as a float, for resolution and map-size scaling.
///
/// Zoom levels above `i32::MAX` saturate to infinity rather than wrapping
/// to a negative exponent.
#[inline]
pub(crate) fn zoom_scale(zoom: u32) -> f64 {
    2.0_f64.powi(i32::try_from(zoom).unwrap_or(i32::MAX))
}
