//! Tile source load latency tracking.
//!
//! A load is timed from a source's "loading" signal to its "loaded" signal.
//! Only one pending start is kept per source: a second start before the end
//! replaces the first. An end without a pending start is ignored, which
//! happens routinely during fast pan/zoom.

use ahash::AHashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// One completed load. Never modified after it is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLoadMetric {
    pub source_id: String,
    pub load_time: Duration,
    pub timestamp: DateTime<Utc>,
}

impl TileLoadMetric {
    pub fn load_time_ms(&self) -> f64 {
        self.load_time.as_nanos() as f64 / 1_000_000.0
    }
}

/// Aggregate over every recorded load; all zero when nothing was recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TileLoadStats {
    pub initial_load_time: Duration,
    pub avg_load_time: Duration,
    pub max_load_time: Duration,
    pub min_load_time: Duration,
    pub total_requests: usize,
}

/// Source events emitted by the map renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapSourceEvent {
    /// The source started fetching data.
    SourceDataLoading { source_id: String },
    /// The source reported data; `is_source_loaded` is set once everything arrived.
    SourceData {
        source_id: String,
        is_source_loaded: bool,
    },
}

#[derive(Debug, Clone, Default)]
pub struct TileLoadMonitor {
    target: Option<String>,
    metrics: Vec<TileLoadMetric>,
    pending: AHashMap<String, Instant>,
}

impl TileLoadMonitor {
    /// Monitor that records every source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Monitor that only records `source_id`; other sources are ignored.
    pub fn for_source(source_id: impl Into<String>) -> Self {
        Self {
            target: Some(source_id.into()),
            ..Self::default()
        }
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    fn accepts(&self, source_id: &str) -> bool {
        self.target.as_deref().is_none_or(|t| t == source_id)
    }

    pub fn record_start(&mut self, source_id: &str, at: Instant) {
        if !self.accepts(source_id) {
            return;
        }
        self.pending.insert(source_id.to_string(), at);
    }

    /// Close a pending load for `source_id`. Returns the new metric, if one was recorded.
    pub fn record_end(&mut self, source_id: &str, at: Instant) -> Option<&TileLoadMetric> {
        if !self.accepts(source_id) {
            return None;
        }
        let Some(start) = self.pending.remove(source_id) else {
            log::trace!("tile load end for {source_id:?} without a start, ignored");
            return None;
        };
        let metric = TileLoadMetric {
            source_id: source_id.to_string(),
            load_time: at.saturating_duration_since(start),
            timestamp: Utc::now(),
        };
        log::debug!(
            "tiles for {source_id:?} loaded in {:.1} ms",
            metric.load_time_ms()
        );
        self.metrics.push(metric);
        self.metrics.last()
    }

    /// Feed a renderer event observed at `at`.
    pub fn handle_event(&mut self, event: &MapSourceEvent, at: Instant) {
        match event {
            MapSourceEvent::SourceDataLoading { source_id } => self.record_start(source_id, at),
            MapSourceEvent::SourceData {
                source_id,
                is_source_loaded: true,
            } => {
                self.record_end(source_id, at);
            }
            MapSourceEvent::SourceData { .. } => {}
        }
    }

    pub fn stats(&self) -> TileLoadStats {
        let Some(first) = self.metrics.first() else {
            return TileLoadStats::default();
        };
        let times = self.metrics.iter().map(|m| m.load_time);
        let total: Duration = times.clone().sum();
        let count = self.metrics.len();
        TileLoadStats {
            initial_load_time: first.load_time,
            avg_load_time: total / u32::try_from(count).unwrap_or(u32::MAX),
            max_load_time: times.clone().max().unwrap_or_default(),
            min_load_time: times.min().unwrap_or_default(),
            total_requests: count,
        }
    }

    pub fn metrics(&self) -> &[TileLoadMetric] {
        &self.metrics
    }

    pub fn latest_metric(&self) -> Option<&TileLoadMetric> {
        self.metrics.last()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Forget all metrics and pending starts.
    pub fn clear(&mut self) {
        self.metrics.clear();
        self.pending.clear();
    }
}
