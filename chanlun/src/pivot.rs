//! 中枢识别。
//!
//! 贪心、不重叠的首次匹配扫描：从笔 i 开始取三笔，ZG = min(第二、三笔高点)，
//! ZD = max(第二、三笔低点)，ZG > ZD 即成立中枢，再向后延伸到第一根不再与
//! (ZD, ZG) 重叠的笔为止，然后从那根笔继续扫描。

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::constant::Direction;
use crate::stroke::Stroke;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pivot {
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub zg: f64,
    pub zd: f64,
    pub gg: f64,
    pub dd: f64,
    pub stroke_count: usize,
    pub direction: Direction,
    pub stroke_start: usize,
    pub stroke_end: usize,
}

impl Pivot {
    /// Tries to open a pivot on the three strokes starting at `start` and
    /// extends it greedily.
    pub fn try_at(strokes: &[Stroke], start: usize) -> Option<Self> {
        let window = strokes.get(start..start + 3)?;
        let (bi1, bi2, bi3) = (&window[0], &window[1], &window[2]);

        let zg = bi2.high_price.min(bi3.high_price);
        let zd = bi2.low_price.max(bi3.low_price);
        if zg <= zd {
            return None;
        }

        let mut pivot = Self {
            start_datetime: bi1.start.datetime,
            end_datetime: bi3.end.datetime,
            zg,
            zd,
            gg: window.iter().map(|x| x.high_price).fold(f64::MIN, f64::max),
            dd: window.iter().map(|x| x.low_price).fold(f64::MAX, f64::min),
            stroke_count: 3,
            direction: bi1.direction,
            stroke_start: start,
            stroke_end: start + 2,
        };

        for (index, next) in strokes.iter().enumerate().skip(start + 3) {
            if !pivot.accepts(next) {
                break;
            }
            pivot.gg = pivot.gg.max(next.high_price);
            pivot.dd = pivot.dd.min(next.low_price);
            pivot.stroke_count += 1;
            pivot.end_datetime = next.end.datetime;
            pivot.stroke_end = index;
        }
        Some(pivot)
    }

    /// 后续笔与中枢区间仍有重叠。
    pub fn accepts(&self, stroke: &Stroke) -> bool {
        stroke.low_price < self.zg && stroke.high_price > self.zd
    }

    pub fn contains(&self, price: f64) -> bool {
        self.zd <= price && price <= self.zg
    }

    pub fn height(&self) -> f64 {
        self.zg - self.zd
    }
}

impl Display for Pivot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pivot {} -> {} zg {:.2} zd {:.2} ({} strokes)",
            self.start_datetime.format("%Y-%m-%d"),
            self.end_datetime.format("%Y-%m-%d"),
            self.zg,
            self.zd,
            self.stroke_count
        )
    }
}

/// Runs the greedy scan from `cursor`, appending to `out`. Returns the cursor
/// at which the scan ran out of three-stroke windows.
pub(crate) fn scan_pivots(strokes: &[Stroke], mut cursor: usize, out: &mut Vec<Pivot>) -> usize {
    while cursor + 2 < strokes.len() {
        match Pivot::try_at(strokes, cursor) {
            Some(pivot) => {
                cursor = pivot.stroke_end + 1;
                out.push(pivot);
            }
            None => cursor += 1,
        }
    }
    cursor
}

pub fn detect_pivots(strokes: &[Stroke]) -> Vec<Pivot> {
    let mut rows = Vec::new();
    scan_pivots(strokes, 0, &mut rows);
    rows
}

#[derive(Debug, Clone, Default)]
pub struct PivotManager {
    rows: Vec<Pivot>,
    cursor: usize,
    backtrack_index: Option<usize>,
}

impl PivotManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// `stroke_backtrack` is the first stroke index that changed. A pivot may
    /// change iff the stroke that stopped its extension (`stroke_end + 1`) or
    /// any stroke inside it changed; failed windows only look two strokes
    /// ahead.
    pub fn sync(&mut self, strokes: &[Stroke], stroke_backtrack: usize) -> usize {
        let keep = self
            .rows
            .partition_point(|x| x.stroke_end + 1 < stroke_backtrack);
        let removed_start = self.rows.get(keep).map(|x| x.stroke_start);
        if keep < self.rows.len() {
            debug!(removed = self.rows.len() - keep, "pivots reopened");
        }
        self.rows.truncate(keep);

        let resume = self.rows.last().map_or(0, |x| x.stroke_end + 1);
        let mut cursor = self
            .cursor
            .min(resume.max(stroke_backtrack.saturating_sub(2)));
        if let Some(start) = removed_start {
            cursor = cursor.min(start);
        }

        self.cursor = scan_pivots(strokes, cursor, &mut self.rows);
        self.backtrack_index = Some(keep);
        keep
    }

    pub fn rows(&self) -> &[Pivot] {
        &self.rows
    }

    pub fn last(&self) -> Option<&Pivot> {
        self.rows.last()
    }

    pub fn backtrack_index(&self) -> Option<usize> {
        self.backtrack_index
    }
}
