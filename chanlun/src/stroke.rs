use std::fmt::{Display, Formatter};

use serde::Serialize;
use tracing::debug;

use crate::bar::Fractal;
use crate::constant::{Direction, FractalType};

/// 笔：两个相邻且顶底交替的分型之间的走势。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub start: Fractal,
    pub end: Fractal,
    pub direction: Direction,
    pub high_price: f64,
    pub low_price: f64,
    pub power: f64,
}

impl Stroke {
    /// Bottom -> Top builds an up stroke, Top -> Bottom a down stroke. Two
    /// fractals of the same type do not form a stroke.
    pub fn from_pair(start: &Fractal, end: &Fractal) -> Option<Self> {
        let (direction, high_price, low_price) = match (start.fractal_type, end.fractal_type) {
            (FractalType::Bottom, FractalType::Top) => (Direction::Up, end.price(), start.price()),
            (FractalType::Top, FractalType::Bottom) => {
                (Direction::Down, start.price(), end.price())
            }
            (FractalType::Top, FractalType::Top) | (FractalType::Bottom, FractalType::Bottom) => {
                return None;
            }
        };
        Some(Self {
            start: start.clone(),
            end: end.clone(),
            direction,
            high_price,
            low_price,
            power: stroke_power(high_price, low_price),
        })
    }
}

impl Display for Stroke {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} stroke {} -> {} range [{:.2}, {:.2}] power {:.2}%",
            self.direction.as_str(),
            self.start.datetime.format("%Y-%m-%d"),
            self.end.datetime.format("%Y-%m-%d"),
            self.low_price,
            self.high_price,
            self.power * 100.0
        )
    }
}

fn stroke_power(high_price: f64, low_price: f64) -> f64 {
    if low_price <= 0.0 {
        return 0.0;
    }
    (high_price - low_price).abs() / low_price
}

/// 每个原始分型在过滤时做了什么，回滚时按相反顺序撤销。
#[derive(Debug, Clone)]
enum FilterAction {
    Push,
    Replace(Fractal),
    Skip,
}

fn apply_filter(kept: &mut Vec<Fractal>, fractal: &Fractal) -> FilterAction {
    let Some(last) = kept.last_mut() else {
        kept.push(fractal.clone());
        return FilterAction::Push;
    };

    if last.fractal_type != fractal.fractal_type {
        kept.push(fractal.clone());
        return FilterAction::Push;
    }

    // 同类分型只保留更极端的那个
    if fractal.is_more_extreme_than(last) {
        let previous = std::mem::replace(last, fractal.clone());
        return FilterAction::Replace(previous);
    }
    FilterAction::Skip
}

/// 过滤为严格顶底交替的分型序列。
pub fn filter_fractals(fractals: &[Fractal]) -> Vec<Fractal> {
    let mut kept = Vec::new();
    for fractal in fractals {
        apply_filter(&mut kept, fractal);
    }
    kept
}

pub fn build_strokes(filtered: &[Fractal]) -> Vec<Stroke> {
    filtered
        .windows(2)
        .filter_map(|pair| Stroke::from_pair(&pair[0], &pair[1]))
        .collect()
}

/// Incremental stroke builder.
///
/// Keeps one `FilterAction` per raw fractal so that fractals retracted by the
/// detector can be undone exactly, then re-applies the filter to the new tail.
#[derive(Debug, Clone, Default)]
pub struct StrokeManager {
    fractals: Vec<Fractal>,
    actions: Vec<FilterAction>,
    rows: Vec<Stroke>,
    backtrack_index: Option<usize>,
}

impl StrokeManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// `raw_backtrack` is the first raw fractal index that changed. Returns the
    /// first stroke index that changed.
    pub fn sync(&mut self, raw: &[Fractal], raw_backtrack: usize) -> usize {
        let mut dirty = self.fractals.len();

        while self.actions.len() > raw_backtrack {
            match self.actions.pop() {
                Some(FilterAction::Push) => {
                    self.fractals.pop();
                    dirty = dirty.min(self.fractals.len());
                }
                Some(FilterAction::Replace(previous)) => {
                    if let Some(last) = self.fractals.last_mut() {
                        *last = previous;
                    }
                    dirty = dirty.min(self.fractals.len().saturating_sub(1));
                }
                Some(FilterAction::Skip) | None => {}
            }
        }

        for fractal in raw.iter().skip(self.actions.len()) {
            let action = apply_filter(&mut self.fractals, fractal);
            if !matches!(action, FilterAction::Skip) {
                dirty = dirty.min(self.fractals.len() - 1);
            }
            self.actions.push(action);
        }

        let stroke_backtrack = dirty.saturating_sub(1).min(self.rows.len());
        self.rows.truncate(stroke_backtrack);
        for pair in self.fractals[stroke_backtrack..].windows(2) {
            if let Some(stroke) = Stroke::from_pair(&pair[0], &pair[1]) {
                debug!(
                    direction = stroke.direction.as_str(),
                    high = stroke.high_price,
                    low = stroke.low_price,
                    "stroke updated"
                );
                self.rows.push(stroke);
            }
        }

        self.backtrack_index = Some(stroke_backtrack);
        stroke_backtrack
    }

    /// 过滤后的分型序列。
    pub fn fractals(&self) -> &[Fractal] {
        &self.fractals
    }

    pub fn rows(&self) -> &[Stroke] {
        &self.rows
    }

    pub fn last(&self) -> Option<&Stroke> {
        self.rows.last()
    }

    pub fn backtrack_index(&self) -> Option<usize> {
        self.backtrack_index
    }
}
