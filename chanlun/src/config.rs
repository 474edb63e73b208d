use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constant::DataError;

/// 分析器参数。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChanConfig {
    /// 二买允许高出中枢下沿 ZD 的比例。
    pub second_buy_tolerance: f64,
    /// Series shorter than this produce an all-zero signal column.
    pub min_bars: usize,
    /// Bars before this index never carry a signal.
    pub warmup_bars: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChanConfigPatch {
    pub second_buy_tolerance: Option<f64>,
    pub min_bars: Option<usize>,
    pub warmup_bars: Option<usize>,
}

impl Default for ChanConfig {
    fn default() -> Self {
        Self {
            second_buy_tolerance: 0.02,
            min_bars: 10,
            warmup_bars: 30,
        }
    }
}

impl ChanConfig {
    pub fn apply_patch(mut self, patch: ChanConfigPatch) -> Self {
        if let Some(v) = patch.second_buy_tolerance {
            self.second_buy_tolerance = v;
        }
        if let Some(v) = patch.min_bars {
            self.min_bars = v;
        }
        if let Some(v) = patch.warmup_bars {
            self.warmup_bars = v;
        }
        self
    }

    pub fn validate(&self) -> Result<(), DataError> {
        if !self.second_buy_tolerance.is_finite() || self.second_buy_tolerance < 0.0 {
            return Err(DataError::InvalidConfig(format!(
                "second_buy_tolerance must be a finite non-negative number, got {}",
                self.second_buy_tolerance
            )));
        }
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, DataError> {
        let patch: ChanConfigPatch = serde_yaml::from_str(yaml)?;
        let config = Self::default().apply_patch(patch);
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let raw = fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }
}
