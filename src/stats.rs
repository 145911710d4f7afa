use crate::monitor::TileLoadMetric;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Load-time summary for one tile source, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceSummary {
    pub source_id: String,
    pub count: usize,
    pub min_ms: Option<f64>,
    pub max_ms: Option<f64>,
    pub mean_ms: Option<f64>,
    pub median_ms: Option<f64>,
}

/// Compute load-time statistics grouped by source id, sorted by id.
pub fn per_source_summary(metrics: &[TileLoadMetric]) -> Vec<SourceSummary> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for m in metrics {
        groups.entry(m.source_id.as_str()).or_default().push(m.load_time_ms());
    }

    let mut out = Vec::new();
    for (source_id, mut vals) in groups {
        vals.sort_by(f64::total_cmp);
        let count = vals.len();
        let mean = if count > 0 {
            Some(vals.iter().copied().sum::<f64>() / count as f64)
        } else {
            None
        };
        out.push(SourceSummary {
            source_id: source_id.to_string(),
            count,
            min_ms: vals.first().copied(),
            max_ms: vals.last().copied(),
            mean_ms: mean,
            median_ms: median(&vals),
        });
    }
    out
}

/// Median of an already sorted slice.
fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        None
    } else if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}
