//! Configuration for tile profiles.
//!
//! A profile is immutable once built; to change any of these settings,
//! build a new profile from an updated [`ProfileConfig`].

use serde::{Deserialize, Serialize};

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// How `zoom_for_pixel_size` maps the first resolution crossing to a zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomLookup {
    /// Return the zoom just before the first level whose resolution drops
    /// below the requested pixel size, or 0 when that is already level 0.
    #[default]
    Intended,

    /// Reproduce the historical control flow exactly: -1 when the crossing
    /// is at level 0, and 0 for a crossing at any other level.
    Legacy,
}

/// Which divisor the geodetic profile uses for resolution and tile bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeodeticScale {
    /// Always divide by 256 pixels, whatever the configured tile size.
    /// Matches existing EPSG:4326 pyramids.
    #[default]
    Fixed256,

    /// Divide by the configured tile size.
    TileSize,
}

/// Settings shared by the Mercator and geodetic profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Tile edge length in pixels.
    ///
    /// Default: 256.
    pub tile_size: u32,

    /// Zoom selection used by `zoom_for_pixel_size`.
    ///
    /// Default: [`ZoomLookup::Intended`].
    pub zoom_lookup: ZoomLookup,

    /// Geodetic resolution divisor. Ignored by the Mercator profile.
    ///
    /// Default: [`GeodeticScale::Fixed256`].
    pub geodetic_scale: GeodeticScale,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            zoom_lookup: ZoomLookup::default(),
            geodetic_scale: GeodeticScale::default(),
        }
    }
}

impl ProfileConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tile size.
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Set the zoom lookup behavior.
    pub fn with_zoom_lookup(mut self, zoom_lookup: ZoomLookup) -> Self {
        self.zoom_lookup = zoom_lookup;
        self
    }

    /// Set the geodetic scale.
    pub fn with_geodetic_scale(mut self, geodetic_scale: GeodeticScale) -> Self {
        self.geodetic_scale = geodetic_scale;
        self
    }
}
