//! Tile-count estimation over the Web Mercator slippy-map grid.
//!
//! Each corner of a box is projected on its own and the covered grid
//! rectangle is counted. Boxes that cross the antimeridian are not wrapped:
//! a box with `west > east` is counted as the span between the two columns.

use crate::models::BoundingBox;
use serde::Serialize;
use std::f64::consts::PI;
use std::ops::RangeInclusive;

/// Deepest zoom the estimator is meant for; `2^22` columns still fit comfortably in `u64`.
pub const MAX_ZOOM: u8 = 22;

/// Column/row address of a tile at a zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TileXY {
    pub x: i64,
    pub y: i64,
    pub zoom: u8,
}

/// Tiles needed at a single zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZoomEstimate {
    pub zoom: u8,
    pub tiles: u64,
}

/// Project a coordinate onto the tile grid.
///
/// Values are floored, not clamped, so the poles and `lon = 180` land one
/// step outside `[0, 2^zoom)`; only the difference between two corners matters here.
#[inline]
pub fn lat_lon_to_tile(lat: f64, lon: f64, zoom: u8) -> TileXY {
    let n = 2.0_f64.powi(zoom as i32);
    let lat_rad = lat * PI / 180.0;
    let x = ((lon + 180.0) / 360.0 * n).floor();
    let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).floor();
    TileXY {
        x: saturate(x),
        y: saturate(y),
        zoom,
    }
}

// tan(±90°) is huge but finite, so the y projection at a pole is a large finite number.
fn saturate(v: f64) -> i64 {
    if v.is_nan() {
        0
    } else {
        v.clamp(i64::MIN as f64 / 4.0, i64::MAX as f64 / 4.0) as i64
    }
}

/// Number of tiles covering `bbox` at `zoom`. Always at least 1.
pub fn tile_count(bbox: &BoundingBox, zoom: u8) -> u64 {
    let min = lat_lon_to_tile(bbox.south, bbox.west, zoom);
    let max = lat_lon_to_tile(bbox.north, bbox.east, zoom);

    let tiles_x = max.x.abs_diff(min.x).saturating_add(1);
    let tiles_y = max.y.abs_diff(min.y).saturating_add(1);

    tiles_x.saturating_mul(tiles_y)
}

/// Per-zoom tile counts for an inclusive zoom range.
pub fn zoom_estimates(bbox: &BoundingBox, zooms: RangeInclusive<u8>) -> Vec<ZoomEstimate> {
    zooms
        .map(|zoom| ZoomEstimate {
            zoom,
            tiles: tile_count(bbox, zoom),
        })
        .collect()
}

/// Total tiles a tileset spanning `zooms` would contain for `bbox`.
pub fn total_tile_count(bbox: &BoundingBox, zooms: RangeInclusive<u8>) -> u64 {
    zoom_estimates(bbox, zooms)
        .iter()
        .fold(0u64, |acc, z| acc.saturating_add(z.tiles))
}
