//! 简化缠论结构分析：包含处理、分型、笔、中枢与买卖点。

pub mod analyzer;
pub mod bar;
pub mod bs_point;
pub mod config;
pub mod constant;
pub mod engine;
pub mod logging;
pub mod receiver;
pub mod signal;
pub mod snapshot;
mod cbar_manager;
mod fractal;
mod pivot;
mod stroke;

pub use analyzer::{ChanAnalysis, ChanAnalyzer};
pub use bar::{CBar, Fractal, SBar};
pub use bs_point::{BsPoint, PointClassifier};
pub use cbar_manager::{CBarManager, merge_bars};
pub use config::{ChanConfig, ChanConfigPatch};
pub use constant::{BsPointType, DataError, Direction, FractalType, Suggestion};
pub use engine::{BacktrackIndices, ChanEngine};
pub use fractal::{FractalDetector, detect_fractals};
pub use logging::init_logging;
pub use pivot::{Pivot, PivotManager, detect_pivots};
pub use receiver::{DataReceiver, load_sbars_from_csv, parse_datetime};
pub use signal::{BarSignal, SignalGenerator};
pub use snapshot::{
    cbar_dataframe, fractal_dataframe, pivot_dataframe, stroke_dataframe, write_parquet_snapshot,
};
pub use stroke::{Stroke, StrokeManager, build_strokes, filter_fractals};
