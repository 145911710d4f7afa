use chrono::Utc;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;
use tileset_lab::monitor::TileLoadMetric;
use tileset_lab::storage;

fn sample(n: usize) -> Vec<TileLoadMetric> {
    (0..n)
        .map(|i| TileLoadMetric {
            source_id: if i % 2 == 0 { "tiles" } else { "=HYPERLINK(\"x\")" }.into(),
            load_time: Duration::from_millis(100 + 10 * i as u64),
            timestamp: Utc::now(),
        })
        .collect()
}

#[test]
fn save_csv_and_json() {
    let rows = sample(3);
    let dir = tempdir().unwrap();

    let csv_path = dir.path().join("metrics.csv");
    storage::save_metrics_csv(&rows, &csv_path).unwrap();
    let csv_txt = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv_txt.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "source_id,load_time_ms,timestamp");
    assert!(lines[1].starts_with("tiles,100.0,"));
    assert!(lines[3].starts_with("tiles,120.0,"));

    let json_path = dir.path().join("metrics.json");
    storage::save_metrics_json(&rows, &json_path).unwrap();
    let back: Vec<TileLoadMetric> =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(back, rows);
}

#[test]
fn csv_cells_are_formula_safe() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("m.csv");
    storage::save_metrics_csv(&sample(2), &path).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let ids: Vec<String> = rdr
        .records()
        .map(|r| r.unwrap()[0].to_string())
        .collect();
    assert_eq!(ids, vec!["tiles".to_string(), "'=HYPERLINK(\"x\")".to_string()]);
}

#[test]
fn writing_into_a_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope").join("m.csv");
    assert!(storage::save_metrics_csv(&sample(1), &path).is_err());
    assert!(storage::save_metrics_json(&sample(1), path.with_extension("json")).is_err());
}
