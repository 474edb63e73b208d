use std::fmt::{Display, Formatter};

use serde::Serialize;

/// 分型标记：顶分型 / 底分型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FractalType {
    Top,
    Bottom,
}

impl FractalType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "Top",
            Self::Bottom => "Bottom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "Up",
            Self::Down => "Down",
        }
    }
}

/// 买卖点类型。
///
/// Only the buy side carries second/third refinements; the sell side stops at
/// `FirstSell`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BsPointType {
    FirstBuy,
    SecondBuy,
    ThirdBuy,
    FirstSell,
}

impl BsPointType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstBuy => "first buy",
            Self::SecondBuy => "second buy",
            Self::ThirdBuy => "third buy",
            Self::FirstSell => "first sell",
        }
    }

    pub fn signal(self) -> i8 {
        match self {
            Self::FirstBuy | Self::SecondBuy | Self::ThirdBuy => 1,
            Self::FirstSell => -1,
        }
    }

    pub fn suggestion(self) -> Suggestion {
        match self {
            Self::FirstBuy | Self::SecondBuy | Self::ThirdBuy => Suggestion::Buy,
            Self::FirstSell => Suggestion::Sell,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Suggestion {
    Buy,
    Sell,
    Hold,
}

impl Suggestion {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Hold => "hold",
        }
    }
}

#[derive(Debug)]
pub enum DataError {
    InvalidDatetime(String),
    InvalidConfig(String),
    Io(std::io::Error),
    Csv(csv::Error),
    Yaml(serde_yaml::Error),
    Polars(polars::error::PolarsError),
}

impl Display for DataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDatetime(v) => write!(f, "invalid datetime: {v}"),
            Self::InvalidConfig(v) => write!(f, "invalid config: {v}"),
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Csv(e) => write!(f, "csv error: {e}"),
            Self::Yaml(e) => write!(f, "yaml error: {e}"),
            Self::Polars(e) => write!(f, "polars error: {e}"),
        }
    }
}

impl std::error::Error for DataError {}

impl From<std::io::Error> for DataError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for DataError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<serde_yaml::Error> for DataError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Yaml(value)
    }
}

impl From<polars::error::PolarsError> for DataError {
    fn from(value: polars::error::PolarsError) -> Self {
        Self::Polars(value)
    }
}
