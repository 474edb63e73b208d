//! 分型识别。
//!
//! 分型 i 只依赖 CBar i-1、i、i+1，所以 CBar 从下标 k 起发生变化时，
//! 只有中间 bar 下标 >= k-1 的分型需要重算。

use tracing::debug;

use crate::bar::{CBar, Fractal};

#[derive(Debug, Clone, Default)]
pub struct FractalDetector {
    rows: Vec<Fractal>,
    backtrack_index: Option<usize>,
}

impl FractalDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-scans the fractals that may have changed after `cbars` was modified
    /// from `cbar_backtrack` onwards. Returns the first fractal index that was
    /// dropped or added.
    pub fn sync(&mut self, cbars: &[CBar], cbar_backtrack: usize) -> usize {
        let first_dirty = cbar_backtrack.saturating_sub(1).max(1);
        let keep = self.rows.partition_point(|x| x.cbar_index < first_dirty);
        if keep < self.rows.len() {
            debug!(
                retracted = self.rows.len() - keep,
                from_cbar = first_dirty,
                "fractals retracted"
            );
        }
        self.rows.truncate(keep);

        for index in first_dirty..cbars.len().saturating_sub(1) {
            if let Some(fractal) = fractal_at(cbars, index) {
                debug!(
                    cbar = index,
                    kind = fractal.fractal_type.as_str(),
                    price = fractal.price(),
                    "fractal detected"
                );
                self.rows.push(fractal);
            }
        }

        self.backtrack_index = Some(keep);
        keep
    }

    pub fn rows(&self) -> &[Fractal] {
        &self.rows
    }

    pub fn last(&self) -> Option<&Fractal> {
        self.rows.last()
    }

    pub fn backtrack_index(&self) -> Option<usize> {
        self.backtrack_index
    }
}

/// 扫描全部内部 CBar，返回按时间排列的分型（未做顶底交替过滤）。
pub fn detect_fractals(cbars: &[CBar]) -> Vec<Fractal> {
    (1..cbars.len().saturating_sub(1))
        .filter_map(|index| fractal_at(cbars, index))
        .collect()
}

fn fractal_at(cbars: &[CBar], index: usize) -> Option<Fractal> {
    if index == 0 || index + 1 >= cbars.len() {
        return None;
    }
    let middle = &cbars[index];
    let fractal_type = Fractal::verify(&cbars[index - 1], middle, &cbars[index + 1])?;
    Some(Fractal::from_cbar(index, middle, fractal_type))
}
