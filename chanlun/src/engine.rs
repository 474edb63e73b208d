//! 增量分析引擎。
//!
//! 职责：
//! - 串联 `SBar -> CBar -> Fractal -> Stroke -> Pivot`，每追加一根 bar 只处理受影响的尾部；
//! - 输出每层的回溯点（`BacktrackIndices`）；
//! - 结果与对同一前缀调用 `ChanAnalyzer::analyze` 完全一致。

use crate::analyzer::ChanAnalysis;
use crate::bar::{CBar, Fractal, SBar};
use crate::bs_point::{BsPoint, PointClassifier};
use crate::cbar_manager::CBarManager;
use crate::config::ChanConfig;
use crate::fractal::FractalDetector;
use crate::pivot::{Pivot, PivotManager};
use crate::stroke::{Stroke, StrokeManager};

/// First index that changed in each layer after an append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BacktrackIndices {
    pub cbar: usize,
    pub fractal: usize,
    pub stroke: usize,
    pub pivot: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ChanEngine {
    classifier: PointClassifier,
    cbar_manager: CBarManager,
    fractal_detector: FractalDetector,
    stroke_manager: StrokeManager,
    pivot_manager: PivotManager,
}

impl ChanEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &ChanConfig) -> Self {
        Self {
            classifier: PointClassifier::from_config(config),
            ..Self::default()
        }
    }

    pub fn append(&mut self, sbar: &SBar) -> BacktrackIndices {
        let cbar = self.cbar_manager.on_sbar(sbar);
        let fractal = self
            .fractal_detector
            .sync(self.cbar_manager.rows(), cbar);
        let stroke = self
            .stroke_manager
            .sync(self.fractal_detector.rows(), fractal);
        let pivot = self.pivot_manager.sync(self.stroke_manager.rows(), stroke);
        BacktrackIndices {
            cbar,
            fractal,
            stroke,
            pivot,
        }
    }

    pub fn extend<'a>(&mut self, sbars: impl IntoIterator<Item = &'a SBar>) {
        for sbar in sbars {
            self.append(sbar);
        }
    }

    pub fn bar_count(&self) -> usize {
        self.cbar_manager.sbar_count()
    }

    pub fn cbars(&self) -> &[CBar] {
        self.cbar_manager.rows()
    }

    pub fn fractals(&self) -> &[Fractal] {
        self.fractal_detector.rows()
    }

    pub fn stroke_fractals(&self) -> &[Fractal] {
        self.stroke_manager.fractals()
    }

    pub fn strokes(&self) -> &[Stroke] {
        self.stroke_manager.rows()
    }

    pub fn pivots(&self) -> &[Pivot] {
        self.pivot_manager.rows()
    }

    pub fn latest_fractal(&self) -> Option<&Fractal> {
        self.fractal_detector.last()
    }

    pub fn latest_stroke(&self) -> Option<&Stroke> {
        self.stroke_manager.last()
    }

    pub fn latest_pivot(&self) -> Option<&Pivot> {
        self.pivot_manager.last()
    }

    pub fn analysis(&self) -> ChanAnalysis {
        ChanAnalysis::new(
            self.cbars().to_vec(),
            self.fractals().to_vec(),
            self.stroke_fractals().to_vec(),
            self.strokes().to_vec(),
            self.pivots().to_vec(),
        )
    }

    pub fn bs_point(&self) -> BsPoint {
        self.classifier.evaluate(
            self.latest_fractal(),
            self.latest_stroke(),
            self.latest_pivot(),
        )
    }
}
