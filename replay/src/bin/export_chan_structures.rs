use std::fs;
use std::path::{Path, PathBuf};

use chanlun::{
    BarSignal, BsPoint, ChanConfig, DataReceiver, SBar, SignalGenerator, init_logging,
    parse_datetime, write_parquet_snapshot,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Serialize)]
struct ExportPayload {
    bars: Vec<CandlePoint>,
    cbars: Vec<CBarCandlePoint>,
    fractals: Vec<FractalMarker>,
    strokes: Vec<StrokeSegment>,
    pivots: Vec<PivotRange>,
    bs_point: BsPointSummary,
    signals: Vec<BarSignal>,
}

#[derive(Debug, Serialize)]
struct CandlePoint {
    time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

#[derive(Debug, Serialize)]
struct CBarCandlePoint {
    index: usize,
    time: i64,
    high: f64,
    low: f64,
    sbar_start: usize,
    sbar_end: usize,
}

#[derive(Debug, Serialize)]
struct FractalMarker {
    cbar_index: usize,
    time: i64,
    price: f64,
    kind: String,
}

#[derive(Debug, Serialize)]
struct StrokeSegment {
    direction: String,
    t0: i64,
    t1: i64,
    v0: f64,
    v1: f64,
    power: f64,
}

#[derive(Debug, Serialize)]
struct PivotRange {
    t0: i64,
    t1: i64,
    zg: f64,
    zd: f64,
    gg: f64,
    dd: f64,
    strokes: usize,
}

#[derive(Debug, Serialize)]
struct BsPointSummary {
    signal: i8,
    signal_type: String,
    suggestion: String,
    summary: String,
}

impl From<&BsPoint> for BsPointSummary {
    fn from(point: &BsPoint) -> Self {
        Self {
            signal: point.signal,
            signal_type: point.signal_label().to_string(),
            suggestion: point.suggestion.as_str().to_string(),
            summary: point.to_string(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "usage: cargo run -p replay --bin export_chan_structures -- <csv_path> [output_json] [config_yaml|-] [parquet_dir]"
        );
        std::process::exit(2);
    }

    let csv_path = PathBuf::from(&args[1]);
    let output = match args.get(2) {
        Some(raw) => PathBuf::from(raw),
        None => PathBuf::from("replay/output/chan-structures.json"),
    };
    let config = match args.get(3).map(String::as_str) {
        Some("-") | None => ChanConfig::default(),
        Some(raw) => ChanConfig::from_yaml_file(raw)?,
    };
    let parquet_dir = args.get(4).map(PathBuf::from);

    let sbars = load_sbars_lenient(&csv_path)?;
    let mut receiver = DataReceiver::with_config(&config);
    receiver.ingest_batch(sbars.clone());
    let engine = receiver.engine();
    let analysis = engine.analysis();
    let point = engine.bs_point();
    let signals = SignalGenerator::new(config).generate(&sbars);

    let bars = sbars
        .iter()
        .map(|bar| CandlePoint {
            time: bar.datetime.timestamp(),
            open: bar.open_price,
            high: bar.high_price,
            low: bar.low_price,
            close: bar.close_price,
            volume: bar.volume,
        })
        .collect::<Vec<_>>();

    let cbars = analysis
        .cbars
        .iter()
        .enumerate()
        .map(|(index, cbar)| CBarCandlePoint {
            index,
            time: cbar.datetime.timestamp(),
            high: cbar.high_price,
            low: cbar.low_price,
            sbar_start: cbar.sbar_start,
            sbar_end: cbar.sbar_end,
        })
        .collect::<Vec<_>>();

    let fractals = analysis
        .fractals
        .iter()
        .map(|fractal| FractalMarker {
            cbar_index: fractal.cbar_index,
            time: fractal.datetime.timestamp(),
            price: fractal.price(),
            kind: fractal.fractal_type.as_str().to_string(),
        })
        .collect::<Vec<_>>();

    let strokes = analysis
        .strokes
        .iter()
        .map(|stroke| StrokeSegment {
            direction: stroke.direction.as_str().to_string(),
            t0: stroke.start.datetime.timestamp(),
            t1: stroke.end.datetime.timestamp(),
            v0: stroke.start.price(),
            v1: stroke.end.price(),
            power: stroke.power,
        })
        .collect::<Vec<_>>();

    let pivots = analysis
        .pivots
        .iter()
        .map(|pivot| PivotRange {
            t0: pivot.start_datetime.timestamp(),
            t1: pivot.end_datetime.timestamp(),
            zg: pivot.zg,
            zd: pivot.zd,
            gg: pivot.gg,
            dd: pivot.dd,
            strokes: pivot.stroke_count,
        })
        .collect::<Vec<_>>();

    let payload = ExportPayload {
        bars,
        cbars,
        fractals,
        strokes,
        pivots,
        bs_point: BsPointSummary::from(&point),
        signals,
    };

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output, serde_json::to_vec_pretty(&payload)?)?;

    if let Some(dir) = parquet_dir {
        write_parquet_snapshot(&analysis, &dir)?;
        info!(dir = %dir.display(), "parquet snapshot written");
    }

    println!(
        "exported {} bars to {} (cbar={}, fractal={}, stroke={}, pivot={}, latest={})",
        payload.bars.len(),
        output.display(),
        payload.cbars.len(),
        payload.fractals.len(),
        payload.strokes.len(),
        payload.pivots.len(),
        point,
    );

    Ok(())
}

#[derive(Debug, Deserialize)]
struct CsvBarRow {
    #[serde(alias = "date", alias = "trade_date")]
    datetime: String,
    #[serde(alias = "open")]
    open_price: f64,
    #[serde(alias = "high")]
    high_price: f64,
    #[serde(alias = "low")]
    low_price: f64,
    #[serde(alias = "close")]
    close_price: f64,
    #[serde(default, alias = "vol")]
    volume: f64,
}

/// Unlike `chanlun::load_sbars_from_csv`, skips rows that fail to parse.
fn load_sbars_lenient(file_path: &Path) -> Result<Vec<SBar>, Box<dyn std::error::Error>> {
    let mut reader = csv::Reader::from_path(file_path)?;
    let mut out = Vec::new();

    for (line, row) in reader.deserialize::<CsvBarRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                warn!(line = line + 2, error = %err, "skipping malformed csv row");
                continue;
            }
        };
        let datetime = match parse_datetime(row.datetime.trim()) {
            Ok(dt) => dt,
            Err(err) => {
                warn!(line = line + 2, error = %err, "skipping csv row");
                continue;
            }
        };
        out.push(SBar::new(
            datetime,
            row.open_price,
            row.high_price,
            row.low_price,
            row.close_price,
            row.volume,
        ));
    }

    info!(path = %file_path.display(), bars = out.len(), "csv bars loaded");
    Ok(out)
}
