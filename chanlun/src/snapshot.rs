//! 结构快照导出：把分析结果转成 polars DataFrame，并写出 parquet。

use std::fs::{File, create_dir_all};
use std::path::Path;

use polars::df;
use polars::prelude::{DataFrame, ParquetWriter};

use crate::analyzer::ChanAnalysis;
use crate::bar::{CBar, Fractal};
use crate::constant::DataError;
use crate::pivot::Pivot;
use crate::stroke::Stroke;

pub fn cbar_dataframe(rows: &[CBar]) -> Result<DataFrame, DataError> {
    let df = df!(
        "datetime" => rows.iter().map(|x| x.datetime.timestamp_millis()).collect::<Vec<i64>>(),
        "sbar_start" => rows.iter().map(|x| x.sbar_start as u32).collect::<Vec<u32>>(),
        "sbar_end" => rows.iter().map(|x| x.sbar_end as u32).collect::<Vec<u32>>(),
        "open_price" => rows.iter().map(|x| x.open_price).collect::<Vec<f64>>(),
        "high_price" => rows.iter().map(|x| x.high_price).collect::<Vec<f64>>(),
        "low_price" => rows.iter().map(|x| x.low_price).collect::<Vec<f64>>(),
        "close_price" => rows.iter().map(|x| x.close_price).collect::<Vec<f64>>()
    )?;
    Ok(df)
}

pub fn fractal_dataframe(rows: &[Fractal]) -> Result<DataFrame, DataError> {
    let df = df!(
        "datetime" => rows.iter().map(|x| x.datetime.timestamp_millis()).collect::<Vec<i64>>(),
        "cbar_index" => rows.iter().map(|x| x.cbar_index as u32).collect::<Vec<u32>>(),
        "fractal_type" => rows.iter().map(|x| x.fractal_type.as_str().to_string()).collect::<Vec<String>>(),
        "price" => rows.iter().map(Fractal::price).collect::<Vec<f64>>(),
        "high_price" => rows.iter().map(|x| x.high_price).collect::<Vec<f64>>(),
        "low_price" => rows.iter().map(|x| x.low_price).collect::<Vec<f64>>()
    )?;
    Ok(df)
}

pub fn stroke_dataframe(rows: &[Stroke]) -> Result<DataFrame, DataError> {
    let df = df!(
        "start_datetime" => rows.iter().map(|x| x.start.datetime.timestamp_millis()).collect::<Vec<i64>>(),
        "end_datetime" => rows.iter().map(|x| x.end.datetime.timestamp_millis()).collect::<Vec<i64>>(),
        "start_cbar" => rows.iter().map(|x| x.start.cbar_index as u32).collect::<Vec<u32>>(),
        "end_cbar" => rows.iter().map(|x| x.end.cbar_index as u32).collect::<Vec<u32>>(),
        "direction" => rows.iter().map(|x| x.direction.as_str().to_string()).collect::<Vec<String>>(),
        "high_price" => rows.iter().map(|x| x.high_price).collect::<Vec<f64>>(),
        "low_price" => rows.iter().map(|x| x.low_price).collect::<Vec<f64>>(),
        "power" => rows.iter().map(|x| x.power).collect::<Vec<f64>>()
    )?;
    Ok(df)
}

pub fn pivot_dataframe(rows: &[Pivot]) -> Result<DataFrame, DataError> {
    let df = df!(
        "start_datetime" => rows.iter().map(|x| x.start_datetime.timestamp_millis()).collect::<Vec<i64>>(),
        "end_datetime" => rows.iter().map(|x| x.end_datetime.timestamp_millis()).collect::<Vec<i64>>(),
        "zg" => rows.iter().map(|x| x.zg).collect::<Vec<f64>>(),
        "zd" => rows.iter().map(|x| x.zd).collect::<Vec<f64>>(),
        "gg" => rows.iter().map(|x| x.gg).collect::<Vec<f64>>(),
        "dd" => rows.iter().map(|x| x.dd).collect::<Vec<f64>>(),
        "stroke_count" => rows.iter().map(|x| x.stroke_count as u32).collect::<Vec<u32>>(),
        "stroke_start" => rows.iter().map(|x| x.stroke_start as u32).collect::<Vec<u32>>(),
        "stroke_end" => rows.iter().map(|x| x.stroke_end as u32).collect::<Vec<u32>>(),
        "direction" => rows.iter().map(|x| x.direction.as_str().to_string()).collect::<Vec<String>>()
    )?;
    Ok(df)
}

/// Writes `cbar.parquet`, `fractal.parquet`, `stroke.parquet` and
/// `pivot.parquet` into `output_dir`.
pub fn write_parquet_snapshot(
    analysis: &ChanAnalysis,
    output_dir: impl AsRef<Path>,
) -> Result<(), DataError> {
    let output_dir = output_dir.as_ref();
    create_dir_all(output_dir)?;

    let frames = [
        ("cbar", cbar_dataframe(&analysis.cbars)?),
        ("fractal", fractal_dataframe(&analysis.fractals)?),
        ("stroke", stroke_dataframe(&analysis.strokes)?),
        ("pivot", pivot_dataframe(&analysis.pivots)?),
    ];
    for (name, mut df) in frames {
        let mut file = File::create(output_dir.join(format!("{name}.parquet")))?;
        ParquetWriter::new(&mut file).finish(&mut df)?;
    }

    Ok(())
}
