//! Error kinds surfaced by the core.
//!
//! Styling problems (unknown palette, empty breaks) are not errors here: they
//! resolve to neutral values so rendering is never blocked.

use thiserror::Error;

/// Failure while talking to the tile lab server.
///
/// Any of these during a progress poll moves the job to the terminal
/// `Failed` state; the core never retries a job-status fetch on its own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },
    #[error("server answered HTTP {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Why a bounding box was rejected by [`crate::models::BoundingBox::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BoundingBoxError {
    #[error("west ({west}) must be less than east ({east})")]
    InvertedLongitude { west: f64, east: f64 },
    #[error("south ({south}) must be less than north ({north})")]
    InvertedLatitude { south: f64, north: f64 },
    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}
