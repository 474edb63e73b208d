//! CBar 管理器实现。
//!
//! 负责：
//! - 基于 SBar 增量构建 CBar（包含处理）；
//! - 记录每次追加后第一个发生变化的 CBar 下标（回溯点）。
//!
//! 只有最后一根 CBar 会被合并修改，之前的 CBar 一经生成即固定。

use tracing::debug;

use crate::bar::{CBar, SBar, is_inclusive};
use crate::constant::Direction;

#[derive(Debug, Clone, Default)]
pub struct CBarManager {
    rows: Vec<CBar>,
    sbar_count: usize,
    backtrack_index: Option<usize>,
}

impl CBarManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one raw bar into the merged sequence and returns the index of the
    /// first merged bar that changed.
    pub fn on_sbar(&mut self, sbar: &SBar) -> usize {
        let index = self.sbar_count;
        self.sbar_count += 1;

        let included = self
            .rows
            .last()
            .map(|last| is_inclusive(last.high_price, last.low_price, sbar.high_price, sbar.low_price))
            .unwrap_or(false);

        if !included {
            self.rows.push(CBar::from_sbar(index, sbar));
            let backtrack = self.rows.len() - 1;
            self.backtrack_index = Some(backtrack);
            return backtrack;
        }

        let direction = self.merge_direction(sbar);
        let backtrack = self.rows.len() - 1;
        if let Some(last) = self.rows.last_mut() {
            // 上涨取高高，下跌取低低
            match direction {
                Direction::Up => {
                    last.high_price = last.high_price.max(sbar.high_price);
                    last.low_price = last.low_price.max(sbar.low_price);
                }
                Direction::Down => {
                    last.high_price = last.high_price.min(sbar.high_price);
                    last.low_price = last.low_price.min(sbar.low_price);
                }
            }
            last.sbar_end = index;
            last.close_price = sbar.close_price;
            debug!(
                cbar = backtrack,
                sbar = index,
                direction = direction.as_str(),
                "sbar merged into cbar"
            );
        }
        self.backtrack_index = Some(backtrack);
        backtrack
    }

    /// 合并方向：有两根及以上 CBar 时比较最后两根的高点，否则看当前 bar 的阴阳。
    fn merge_direction(&self, sbar: &SBar) -> Direction {
        let length = self.rows.len();
        if length >= 2 {
            if self.rows[length - 2].high_price < self.rows[length - 1].high_price {
                Direction::Up
            } else {
                Direction::Down
            }
        } else if sbar.is_bullish() {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    pub fn backtrack_index(&self) -> Option<usize> {
        self.backtrack_index
    }

    pub fn rows(&self) -> &[CBar] {
        &self.rows
    }

    pub fn last_n(&self, n: usize) -> Vec<CBar> {
        let start = self.rows.len().saturating_sub(n);
        self.rows[start..].to_vec()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn sbar_count(&self) -> usize {
        self.sbar_count
    }
}

/// 对整段 SBar 做包含处理。
pub fn merge_bars(sbars: &[SBar]) -> Vec<CBar> {
    let mut manager = CBarManager::new();
    for sbar in sbars {
        manager.on_sbar(sbar);
    }
    manager.rows
}
