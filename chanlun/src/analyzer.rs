use serde::Serialize;
use tracing::debug;

use crate::bar::{CBar, Fractal, SBar};
use crate::bs_point::{BsPoint, PointClassifier};
use crate::cbar_manager::merge_bars;
use crate::config::ChanConfig;
use crate::fractal::detect_fractals;
use crate::pivot::{Pivot, detect_pivots};
use crate::stroke::{Stroke, build_strokes, filter_fractals};

/// 一次分析的完整结果。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChanAnalysis {
    pub merged_bar_count: usize,
    pub fractal_count: usize,
    pub stroke_count: usize,
    pub pivot_count: usize,
    pub cbars: Vec<CBar>,
    pub fractals: Vec<Fractal>,
    /// 顶底交替过滤后、用于连笔的分型。
    pub stroke_fractals: Vec<Fractal>,
    pub strokes: Vec<Stroke>,
    pub pivots: Vec<Pivot>,
    pub latest_fractal: Option<Fractal>,
    pub latest_stroke: Option<Stroke>,
    pub latest_pivot: Option<Pivot>,
}

impl ChanAnalysis {
    pub fn new(
        cbars: Vec<CBar>,
        fractals: Vec<Fractal>,
        stroke_fractals: Vec<Fractal>,
        strokes: Vec<Stroke>,
        pivots: Vec<Pivot>,
    ) -> Self {
        Self {
            merged_bar_count: cbars.len(),
            fractal_count: fractals.len(),
            stroke_count: strokes.len(),
            pivot_count: pivots.len(),
            latest_fractal: fractals.last().cloned(),
            latest_stroke: strokes.last().cloned(),
            latest_pivot: pivots.last().cloned(),
            cbars,
            fractals,
            stroke_fractals,
            strokes,
            pivots,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new(), Vec::new(), Vec::new())
    }
}

/// Batch entry point: every call re-runs the whole pipeline over the given
/// bars and shares nothing with other calls.
#[derive(Debug, Clone, Default)]
pub struct ChanAnalyzer {
    classifier: PointClassifier,
}

impl ChanAnalyzer {
    pub fn new(config: ChanConfig) -> Self {
        Self {
            classifier: PointClassifier::from_config(&config),
        }
    }

    pub fn analyze(&self, sbars: &[SBar]) -> ChanAnalysis {
        let cbars = merge_bars(sbars);
        let fractals = detect_fractals(&cbars);
        let stroke_fractals = filter_fractals(&fractals);
        let strokes = build_strokes(&stroke_fractals);
        let pivots = detect_pivots(&strokes);

        let analysis = ChanAnalysis::new(cbars, fractals, stroke_fractals, strokes, pivots);
        debug!(
            sbars = sbars.len(),
            cbars = analysis.merged_bar_count,
            fractals = analysis.fractal_count,
            strokes = analysis.stroke_count,
            pivots = analysis.pivot_count,
            "chan analysis finished"
        );
        analysis
    }

    pub fn bs_point(&self, sbars: &[SBar]) -> BsPoint {
        let analysis = self.analyze(sbars);
        self.classify(&analysis)
    }

    pub fn classify(&self, analysis: &ChanAnalysis) -> BsPoint {
        self.classifier.evaluate(
            analysis.latest_fractal.as_ref(),
            analysis.latest_stroke.as_ref(),
            analysis.latest_pivot.as_ref(),
        )
    }
}
