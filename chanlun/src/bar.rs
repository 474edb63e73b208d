use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constant::FractalType;

/// 原始日线 bar。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SBar {
    pub datetime: DateTime<Utc>,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
    pub volume: f64,
}

impl SBar {
    pub fn new(
        datetime: DateTime<Utc>,
        open_price: f64,
        high_price: f64,
        low_price: f64,
        close_price: f64,
        volume: f64,
    ) -> Self {
        Self {
            datetime,
            open_price,
            high_price,
            low_price,
            close_price,
            volume,
        }
    }

    pub fn is_bullish(&self) -> bool {
        self.close_price > self.open_price
    }
}

/// 包含处理后的 bar。
///
/// `sbar_start..=sbar_end` are the positions of the raw bars folded into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CBar {
    pub sbar_start: usize,
    pub sbar_end: usize,
    pub datetime: DateTime<Utc>,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
}

impl CBar {
    pub fn from_sbar(index: usize, sbar: &SBar) -> Self {
        Self {
            sbar_start: index,
            sbar_end: index,
            datetime: sbar.datetime,
            open_price: sbar.open_price,
            high_price: sbar.high_price,
            low_price: sbar.low_price,
            close_price: sbar.close_price,
        }
    }

    pub fn is_inclusive(&self, other: &Self) -> bool {
        is_inclusive(self.high_price, self.low_price, other.high_price, other.low_price)
    }
}

pub(crate) fn is_inclusive(a_high: f64, a_low: f64, b_high: f64, b_low: f64) -> bool {
    (a_high >= b_high && a_low <= b_low) || (a_high <= b_high && a_low >= b_low)
}

/// 分型。`cbar_index` 指向中间那根 CBar。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fractal {
    pub datetime: DateTime<Utc>,
    pub cbar_index: usize,
    pub fractal_type: FractalType,
    pub high_price: f64,
    pub low_price: f64,
}

impl Fractal {
    /// Strict three-bar rule: the middle bar must beat both neighbours on
    /// high and low at the same time.
    pub fn verify(left: &CBar, middle: &CBar, right: &CBar) -> Option<FractalType> {
        let is_top = middle.high_price > left.high_price
            && middle.high_price > right.high_price
            && middle.low_price > left.low_price
            && middle.low_price > right.low_price;
        if is_top {
            return Some(FractalType::Top);
        }

        let is_bottom = middle.low_price < left.low_price
            && middle.low_price < right.low_price
            && middle.high_price < left.high_price
            && middle.high_price < right.high_price;
        if is_bottom {
            return Some(FractalType::Bottom);
        }
        None
    }

    pub fn from_cbar(cbar_index: usize, cbar: &CBar, fractal_type: FractalType) -> Self {
        Self {
            datetime: cbar.datetime,
            cbar_index,
            fractal_type,
            high_price: cbar.high_price,
            low_price: cbar.low_price,
        }
    }

    /// 分型价格：顶取 high，底取 low。
    pub fn price(&self) -> f64 {
        match self.fractal_type {
            FractalType::Top => self.high_price,
            FractalType::Bottom => self.low_price,
        }
    }

    pub fn is_more_extreme_than(&self, other: &Self) -> bool {
        match (self.fractal_type, other.fractal_type) {
            (FractalType::Top, FractalType::Top) => self.price() > other.price(),
            (FractalType::Bottom, FractalType::Bottom) => self.price() < other.price(),
            (FractalType::Top, FractalType::Bottom) | (FractalType::Bottom, FractalType::Top) => {
                false
            }
        }
    }
}

impl Display for Fractal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} fractal at {} price {:.2}",
            self.fractal_type.as_str(),
            self.datetime.format("%Y-%m-%d"),
            self.price()
        )
    }
}
