//! 买卖点判定。
//!
//! 一买：下跌笔以底分型结束；一卖：上涨笔以顶分型结束。
//! 有中枢时对买点细化：回踩中枢下沿附近且不破 DD 为二买，回踩不破 ZG 为三买。
//! 卖点不做二卖/三卖细化。

use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::bar::Fractal;
use crate::config::ChanConfig;
use crate::constant::{BsPointType, Direction, FractalType, Suggestion};
use crate::pivot::Pivot;
use crate::stroke::Stroke;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BsPoint {
    pub signal: i8,
    pub signal_type: Option<BsPointType>,
    pub suggestion: Suggestion,
    pub latest_fractal: Option<Fractal>,
    pub latest_stroke: Option<Stroke>,
    pub latest_pivot: Option<Pivot>,
}

impl BsPoint {
    pub fn hold() -> Self {
        Self {
            signal: 0,
            signal_type: None,
            suggestion: Suggestion::Hold,
            latest_fractal: None,
            latest_stroke: None,
            latest_pivot: None,
        }
    }

    pub fn signal_label(&self) -> &'static str {
        self.signal_type.map_or("", BsPointType::as_str)
    }
}

impl Display for BsPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.signal_type {
            Some(kind) => write!(
                f,
                "{} (signal {}, suggestion {})",
                kind.as_str(),
                self.signal,
                self.suggestion.as_str()
            ),
            None => write!(f, "no signal (suggestion {})", self.suggestion.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointClassifier {
    second_buy_tolerance: f64,
}

impl Default for PointClassifier {
    fn default() -> Self {
        Self::from_config(&ChanConfig::default())
    }
}

impl PointClassifier {
    pub fn new(second_buy_tolerance: f64) -> Self {
        Self {
            second_buy_tolerance,
        }
    }

    pub fn from_config(config: &ChanConfig) -> Self {
        Self::new(config.second_buy_tolerance)
    }

    /// Classifies the fractal that terminates `stroke`.
    pub fn classify(&self, stroke: Option<&Stroke>, pivot: Option<&Pivot>) -> Option<BsPointType> {
        let stroke = stroke?;
        match (stroke.direction, stroke.end.fractal_type) {
            (Direction::Down, FractalType::Bottom) => {
                Some(self.refine_buy(stroke.end.price(), pivot))
            }
            (Direction::Up, FractalType::Top) => Some(BsPointType::FirstSell),
            (Direction::Down, FractalType::Top) | (Direction::Up, FractalType::Bottom) => None,
        }
    }

    fn refine_buy(&self, price: f64, pivot: Option<&Pivot>) -> BsPointType {
        let Some(pivot) = pivot else {
            return BsPointType::FirstBuy;
        };
        if price >= pivot.zg {
            BsPointType::ThirdBuy
        } else if price <= pivot.zd * (1.0 + self.second_buy_tolerance) && price > pivot.dd {
            BsPointType::SecondBuy
        } else {
            BsPointType::FirstBuy
        }
    }

    pub fn evaluate(
        &self,
        latest_fractal: Option<&Fractal>,
        latest_stroke: Option<&Stroke>,
        latest_pivot: Option<&Pivot>,
    ) -> BsPoint {
        let signal_type = self.classify(latest_stroke, latest_pivot);
        BsPoint {
            signal: signal_type.map_or(0, BsPointType::signal),
            signal_type,
            suggestion: signal_type.map_or(Suggestion::Hold, BsPointType::suggestion),
            latest_fractal: latest_fractal.cloned(),
            latest_stroke: latest_stroke.cloned(),
            latest_pivot: latest_pivot.cloned(),
        }
    }
}
