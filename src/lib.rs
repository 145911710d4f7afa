//! tileset_lab
//!
//! Client-side core of a vector tile lab: users upload datasets, a server
//! turns them into vector tilesets, and the client styles them as a
//! choropleth with an exportable legend. Pairs with the `tlab` CLI.
//!
//! ### Features
//! - Poll ingestion / tileset-generation jobs until they complete or fail
//! - Built-in CARTO color schemes and an endpoint-preserving color sampler
//! - Tier (choropleth) classification with range labels and SVG legends
//! - Web Mercator tile-count estimates for a bounding box and zoom range
//! - Per-layer geometry visibility and tile-load latency monitoring
//!
//! ### Example
//! ```
//! use tileset_lab::{BoundingBox, TierStore, tile_count};
//!
//! let bbox = BoundingBox::new(-74.1, 40.6, -73.8, 40.9);
//! assert!(tile_count(&bbox, 12) > 1);
//!
//! let mut tiers = TierStore::new();
//! tiers.apply_scheme("population", vec![10.0, 20.0, 30.0], "Burg");
//! assert_eq!(tiers.range_label(1), "10 - 20");
//! ```

pub mod api;
pub mod color;
pub mod error;
pub mod legend;
pub mod models;
pub mod monitor;
pub mod palette;
pub mod poller;
pub mod progress;
pub mod session;
pub mod stats;
pub mod storage;
pub mod tier;
pub mod tiles;
pub mod visibility;

pub use api::Client;
pub use color::{sample_colors, tier_colors, tier_range};
pub use error::{BoundingBoxError, TransportError};
pub use models::{BoundingBox, JobProgress, JobRef, JobStatus};
pub use monitor::{TileLoadMetric, TileLoadMonitor, TileLoadStats};
pub use poller::{JobStatusSource, PollHandle, PollScheduler, spawn_poller};
pub use progress::{PollState, ProgressTracker, ProgressView};
pub use session::MapSession;
pub use tier::{LegendItem, TierStore, TierStyleConfig};
pub use tiles::{lat_lon_to_tile, tile_count};
pub use visibility::{LayerType, LayerVisibilityStore};
