use std::fs;
use std::path::PathBuf;

use chrono::{Datelike, TimeZone, Utc};

use chanlun::{
    ChanAnalyzer, ChanConfig, DataError, DataReceiver, SBar, load_sbars_from_csv,
    write_parquet_snapshot,
};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("chanlun_{}_{name}", std::process::id()))
}

fn write_csv(name: &str, header: &str, rows: &[String]) -> PathBuf {
    let path = temp_path(name);
    let mut body = String::from(header);
    body.push('\n');
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    fs::write(&path, body).expect("write csv");
    path
}

fn zigzag_rows(count: usize) -> Vec<String> {
    let cycle = [0.0_f64, 2.0, 4.0, 6.0, 3.0, 1.0, -1.0, -3.0];
    (0..count)
        .map(|i| {
            let day = Utc
                .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .single()
                .expect("valid dt")
                + chrono::Duration::days(i as i64);
            let mid = 50.0 + cycle[i % cycle.len()];
            format!(
                "{},{mid},{},{},{mid},{}",
                day.format("%Y-%m-%d"),
                mid + 1.0,
                mid - 1.0,
                100 + i
            )
        })
        .collect()
}

#[test]
fn loads_short_column_names_with_date_only_values() {
    let path = write_csv("short.csv", "date,open,high,low,close,volume", &zigzag_rows(12));
    let bars = load_sbars_from_csv(&path).expect("csv loads");
    fs::remove_file(&path).ok();

    assert_eq!(bars.len(), 12);
    assert_eq!(bars[0].datetime.day(), 1);
    assert_eq!(bars[3].high_price, 57.0);
    assert_eq!(bars[11].volume, 111.0);
}

#[test]
fn loads_long_column_names_without_volume() {
    let rows = vec![
        "20240102,10,12,9,11".to_string(),
        "20240103,11,15,10,14".to_string(),
        "20240104,14,14.5,12,12.5".to_string(),
    ];
    let path = write_csv(
        "long.csv",
        "trade_date,open_price,high_price,low_price,close_price",
        &rows,
    );
    let bars = load_sbars_from_csv(&path).expect("csv loads");
    fs::remove_file(&path).ok();

    assert_eq!(bars.len(), 3);
    assert_eq!(bars[1].close_price, 14.0);
    assert_eq!(bars[2].volume, 0.0);
}

#[test]
fn bad_datetime_is_reported() {
    let rows = vec!["yesterday,10,12,9,11,1".to_string()];
    let path = write_csv("bad.csv", "datetime,open,high,low,close,volume", &rows);
    let result = load_sbars_from_csv(&path);
    fs::remove_file(&path).ok();

    assert!(matches!(result, Err(DataError::InvalidDatetime(v)) if v == "yesterday"));
}

#[test]
fn missing_file_is_an_error() {
    assert!(load_sbars_from_csv(temp_path("does_not_exist.csv")).is_err());
}

#[test]
fn csv_ingest_matches_batch_analysis() {
    let path = write_csv("ingest.csv", "date,open,high,low,close,volume", &zigzag_rows(48));
    let mut receiver = DataReceiver::default();
    let count = receiver.ingest_csv(&path).expect("csv ingests");
    let bars: Vec<SBar> = load_sbars_from_csv(&path).expect("csv loads");
    fs::remove_file(&path).ok();

    assert_eq!(count, 48);
    assert_eq!(receiver.engine().bar_count(), 48);
    let batch = ChanAnalyzer::default().analyze(&bars);
    assert_eq!(receiver.engine().analysis(), batch);
    assert!(batch.stroke_count > 4);
    assert!(batch.pivot_count > 0);
}

#[test]
fn config_loads_from_yaml_file() {
    let path = temp_path("config.yaml");
    fs::write(&path, "second_buy_tolerance: 0.03\nwarmup_bars: 5\n").expect("write yaml");
    let config = ChanConfig::from_yaml_file(&path).expect("yaml loads");
    fs::remove_file(&path).ok();

    assert_eq!(config.second_buy_tolerance, 0.03);
    assert_eq!(config.warmup_bars, 5);
    assert_eq!(config.min_bars, 10);
    assert!(ChanConfig::from_yaml_file(temp_path("missing.yaml")).is_err());
}

#[test]
fn parquet_snapshot_writes_one_file_per_structure() {
    let path = write_csv("parquet.csv", "date,open,high,low,close,volume", &zigzag_rows(40));
    let bars = load_sbars_from_csv(&path).expect("csv loads");
    fs::remove_file(&path).ok();

    let dir = temp_path("snapshot");
    let analysis = ChanAnalyzer::default().analyze(&bars);
    write_parquet_snapshot(&analysis, &dir).expect("snapshot written");
    for name in ["cbar", "fractal", "stroke", "pivot"] {
        assert!(dir.join(format!("{name}.parquet")).exists(), "{name} missing");
    }
    fs::remove_dir_all(&dir).ok();
}
