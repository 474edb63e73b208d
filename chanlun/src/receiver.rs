use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::bar::SBar;
use crate::config::ChanConfig;
use crate::constant::DataError;
use crate::engine::{BacktrackIndices, ChanEngine};

/// Feeds bars into a `ChanEngine` one by one, from memory or from a CSV file.
#[derive(Debug, Clone, Default)]
pub struct DataReceiver {
    engine: ChanEngine,
}

impl DataReceiver {
    pub fn new(engine: ChanEngine) -> Self {
        Self { engine }
    }

    pub fn with_config(config: &ChanConfig) -> Self {
        Self::new(ChanEngine::with_config(config))
    }

    pub fn ingest_bar(&mut self, sbar: SBar) -> BacktrackIndices {
        self.engine.append(&sbar)
    }

    pub fn ingest_batch(&mut self, sbars: Vec<SBar>) {
        for sbar in sbars {
            self.ingest_bar(sbar);
        }
    }

    pub fn ingest_csv(&mut self, file_path: impl AsRef<Path>) -> Result<usize, DataError> {
        let sbars = load_sbars_from_csv(file_path)?;
        let count = sbars.len();
        self.ingest_batch(sbars);
        Ok(count)
    }

    pub fn engine(&self) -> &ChanEngine {
        &self.engine
    }
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

/// 读取日线 CSV，按文件顺序返回。
pub fn load_sbars_from_csv(file_path: impl AsRef<Path>) -> Result<Vec<SBar>, DataError> {
    let file_path = file_path.as_ref();
    let mut reader = csv::Reader::from_path(file_path)?;
    let mut out = Vec::new();

    for row in reader.deserialize::<CsvBarRow>() {
        let row = row?;
        let datetime = parse_datetime(row.datetime.trim())?;
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

/// Accepts RFC3339 and the usual timestamp layouts, then falls back to bare
/// dates (`%Y-%m-%d`, `%Y/%m/%d`, `%Y%m%d`) at midnight UTC.
pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>, DataError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    let patterns = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y/%m/%d %H:%M:%S%.f",
        "%Y%m%d%H%M%S%.f",
    ];
    for pattern in patterns {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
            return Ok(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc));
        }
    }

    // 日线常见的纯日期格式
    for pattern in ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"] {
        let parsed = NaiveDate::parse_from_str(value, pattern)
            .ok()
            .and_then(|x| x.and_hms_opt(0, 0, 0));
        if let Some(dt) = parsed {
            return Ok(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc));
        }
    }

    Err(DataError::InvalidDatetime(value.to_string()))
}
