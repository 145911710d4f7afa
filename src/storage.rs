use crate::monitor::TileLoadMetric;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Neutralize spreadsheet formulas: cells starting with `= + - @` get a `'` prefix.
fn csv_safe(cell: &str) -> String {
    if cell.starts_with(['=', '+', '-', '@']) {
        format!("'{cell}")
    } else {
        cell.to_string()
    }
}

/// Save the tile-load log as CSV with header.
pub fn save_metrics_csv<P: AsRef<Path>>(metrics: &[TileLoadMetric], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    wtr.serialize(("source_id", "load_time_ms", "timestamp"))?;
    for m in metrics {
        wtr.serialize((
            csv_safe(&m.source_id),
            m.load_time_ms(),
            m.timestamp.to_rfc3339(),
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save the tile-load log as a pretty JSON array.
pub fn save_metrics_json<P: AsRef<Path>>(metrics: &[TileLoadMetric], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let s = serde_json::to_string_pretty(metrics)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::time::Duration;
    use tempfile::tempdir;

    fn metric(source: &str) -> TileLoadMetric {
        TileLoadMetric {
            source_id: source.into(),
            load_time: Duration::from_millis(120),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("m.csv");
        let jsonp = dir.path().join("m.json");
        let ms = vec![metric("dataset-tiles")];
        save_metrics_csv(&ms, &csvp).unwrap();
        save_metrics_json(&ms, &jsonp).unwrap();
        let text = std::fs::read_to_string(&csvp).unwrap();
        assert!(text.starts_with("source_id,load_time_ms,timestamp"));
        assert!(text.contains("dataset-tiles,120.0,"));
        let back: Vec<TileLoadMetric> =
            serde_json::from_str(&std::fs::read_to_string(&jsonp).unwrap()).unwrap();
        assert_eq!(back, ms);
    }

    #[test]
    fn formula_like_cells_are_prefixed() {
        assert_eq!(csv_safe("=SUM(A1)"), "'=SUM(A1)");
        assert_eq!(csv_safe("@cmd"), "'@cmd");
        assert_eq!(csv_safe("tiles"), "tiles");
    }
}
