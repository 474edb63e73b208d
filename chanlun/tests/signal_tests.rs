use chrono::{Duration, TimeZone, Utc};

use chanlun::{ChanAnalyzer, ChanConfig, SBar, SignalGenerator};

#[test]
fn series_below_min_bars_is_flat() {
    let bars = sample_bars(9);
    let signals = SignalGenerator::default().generate(&bars);
    assert_eq!(signals.len(), 9);
    assert!(signals.iter().all(|x| x.signal == 0));
    assert_eq!(signals[4].datetime, bars[4].datetime);
}

#[test]
fn warmup_prefix_is_flat() {
    let bars = sample_bars(120);
    let column = SignalGenerator::default().signal_column(&bars);
    assert_eq!(column.len(), bars.len());
    assert!(column[..30].iter().all(|x| *x == 0));
    assert!(column.iter().all(|x| matches!(x, -1..=1)));
}

#[test]
fn signals_equal_batch_verdict_on_every_prefix() {
    let bars = sample_bars(150);
    let config = ChanConfig {
        warmup_bars: 12,
        ..ChanConfig::default()
    };
    let generator = SignalGenerator::new(config.clone());
    let analyzer = ChanAnalyzer::new(config);

    let signals = generator.generate(&bars);
    let mut non_zero = 0;
    for (i, signal) in signals.iter().enumerate() {
        if i < 12 {
            assert_eq!(signal.signal, 0);
            continue;
        }
        let point = analyzer.bs_point(&bars[..=i]);
        assert_eq!(signal.signal, point.signal, "signal mismatch at bar {i}");
        assert_eq!(signal.signal_type, point.signal_type);
        if signal.signal != 0 {
            non_zero += 1;
        }
    }
    assert!(non_zero > 0, "sample should produce at least one signal");
}

fn sample_bars(count: usize) -> Vec<SBar> {
    let base_dt = Utc
        .with_ymd_and_hms(2023, 1, 2, 0, 0, 0)
        .single()
        .expect("valid dt");

    let mut bars = Vec::with_capacity(count);
    let mut price = 100.0_f64;
    let cycle = [0.0_f64, 3.1, -2.9, 4.2, -3.3, 2.0, -1.7, 3.5, -2.6, 1.4, -4.0, 5.1, -0.8];
    for i in 0..count {
        let open = price;
        let drift = ((i as f64) * 0.11).sin() * 5.0;
        let close = (100.0 + drift + cycle[i % cycle.len()]).max(1.0);
        let high = open.max(close) + 0.7;
        let low = open.min(close) - 0.7;
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
