//! TMS Profile - coordinate conversions for raster tile pyramids
//!
//! This library maps geographic points and tile requests onto the pixel and
//! tile addressing used by TMS, WMS and Google Maps style tile pyramids.
//! Two independent profiles are provided:
//!
//! - [`MercatorProfile`]: spherical Mercator (EPSG:3857 / EPSG:900913),
//!   `LatLon <-> Meters <-> Pixels <-> Tile`.
//! - [`GeodeticProfile`]: Plate Carrée (EPSG:4326), `LatLon <-> Pixels <-> Tile`.
//!
//! Pixel and tile coordinates follow TMS notation, with the origin at the
//! bottom-left. [`TileCoord`] converts to Google/XYZ indices and QuadTree keys.
//!
//! Profiles are immutable after construction and every conversion is a pure
//! function, so a single profile can be shared freely across threads.
//! Geographic inputs are not range-checked: callers keep latitudes within
//! ±85.05112878° for Mercator and use non-negative zoom levels.
//!
//! # Example
//!
//! ```
//! use tmsprofile::{GeodeticProfile, MercatorProfile, TileProfile};
//!
//! fn tile_for<P: TileProfile>(profile: &P, lat: f64, lon: f64) -> (i64, i64) {
//!     let tile = profile.lat_lon_to_tile(lat, lon, 2);
//!     (tile.tx, tile.ty)
//! }
//!
//! assert_eq!(tile_for(&GeodeticProfile::default(), 51.5287718, -0.2416819), (5, 1));
//! assert_eq!(tile_for(&MercatorProfile::default(), 51.5287718, -0.2416819), (1, 2));
//! ```

pub mod config;
pub mod coord;
pub mod error;
pub mod geodetic;
pub mod mercator;

pub use config::{GeodeticScale, ProfileConfig, ZoomLookup, DEFAULT_TILE_SIZE};
pub use coord::{pixels_to_tile, TileCoord, TileProfile};
pub use error::ProfileError;
pub use geodetic::GeodeticProfile;
pub use mercator::MercatorProfile;
