use chrono::{Duration, TimeZone, Utc};

use chanlun::{ChanAnalyzer, Fractal, FractalDetector, FractalType, SBar, detect_fractals, merge_bars};

#[test]
fn fractal_labels_match_local_three_cbar_rule() {
    let cbars = merge_bars(&sample_bars(160));
    assert!(cbars.len() > 20, "need enough cbar rows for fractal validation");

    let fractals = detect_fractals(&cbars);
    assert!(!fractals.is_empty());
    for i in 1..(cbars.len() - 1) {
        let expected = Fractal::verify(&cbars[i - 1], &cbars[i], &cbars[i + 1]);
        let found = fractals
            .iter()
            .find(|x| x.cbar_index == i)
            .map(|x| x.fractal_type);
        assert_eq!(found, expected, "fractal mismatch at cbar {i}");
    }
    assert!(fractals.iter().all(|x| x.cbar_index != 0 && x.cbar_index != cbars.len() - 1));
}

#[test]
fn incremental_detector_never_uses_future_information() {
    let sbars = sample_bars(120);
    let mut detector = FractalDetector::new();
    let mut merged = chanlun::CBarManager::new();

    for sbar in &sbars {
        let backtrack = merged.on_sbar(sbar);
        detector.sync(merged.rows(), backtrack);
        assert_eq!(detector.rows(), detect_fractals(merged.rows()).as_slice());
    }
}

#[test]
fn five_bar_sequence_yields_top_then_bottom() {
    // (low, high) pairs
    let ranges = [(10.0, 12.0), (11.0, 15.0), (9.0, 13.0), (8.0, 10.0), (9.0, 14.0)];
    let analysis = ChanAnalyzer::default().analyze(&bars_from_ranges(&ranges));

    assert_eq!(analysis.merged_bar_count, 5);
    assert_eq!(analysis.fractal_count, 2);
    assert_eq!(analysis.fractals[0].cbar_index, 1);
    assert_eq!(analysis.fractals[0].fractal_type, FractalType::Top);
    assert_eq!(analysis.fractals[0].price(), 15.0);
    assert_eq!(analysis.fractals[1].cbar_index, 3);
    assert_eq!(analysis.fractals[1].fractal_type, FractalType::Bottom);
    assert_eq!(analysis.fractals[1].price(), 8.0);
}

#[test]
fn fewer_than_three_bars_yield_nothing() {
    let ranges = [(10.0, 12.0), (11.0, 15.0)];
    let analysis = ChanAnalyzer::default().analyze(&bars_from_ranges(&ranges));
    assert_eq!(analysis.fractal_count, 0);
    assert!(analysis.latest_fractal.is_none());
}

#[test]
fn fractal_display_is_one_line() {
    let ranges = [(10.0, 12.0), (11.0, 15.0), (9.0, 13.0)];
    let analysis = ChanAnalyzer::default().analyze(&bars_from_ranges(&ranges));
    let text = analysis.fractals[0].to_string();
    assert!(text.contains("Top"));
    assert!(text.contains("15.00"));
    assert!(!text.contains('\n'));
}

fn bars_from_ranges(ranges: &[(f64, f64)]) -> Vec<SBar> {
    let base_dt = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid dt");
    ranges
        .iter()
        .enumerate()
        .map(|(i, (low, high))| {
            SBar::new(base_dt + Duration::days(i as i64), *low, *high, *low, *high, 1000.0)
        })
        .collect()
}

fn sample_bars(count: usize) -> Vec<SBar> {
    let base_dt = Utc
        .with_ymd_and_hms(2023, 1, 2, 0, 0, 0)
        .single()
        .expect("valid dt");

    let mut bars = Vec::with_capacity(count);
    let mut price = 100.0_f64;
    let cycle = [0.0_f64, 3.1, -2.9, 4.2, -3.3, 2.0, -1.7, 3.5, -2.6, 1.4];
    for i in 0..count {
        let open = price;
        let drift = (i as f64) * 0.02;
        let close = (100.0 + drift + cycle[i % cycle.len()]).max(1.0);
        let high = open.max(close) + 0.9;
        let low = open.min(close) - 0.9;
        price = close;
        bars.push(SBar::new(
            base_dt + Duration::days(i as i64),
            open,
            high,
            low,
            close,
            100.0 + (i as f64 * 1.5),
        ));
    }
    bars
}
