use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::bar::SBar;
use crate::config::ChanConfig;
use crate::constant::BsPointType;
use crate::engine::ChanEngine;

/// 单根 bar 上的信号。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSignal {
    pub datetime: DateTime<Utc>,
    pub signal: i8,
    pub signal_type: Option<BsPointType>,
}

impl BarSignal {
    fn flat(datetime: DateTime<Utc>) -> Self {
        Self {
            datetime,
            signal: 0,
            signal_type: None,
        }
    }
}

/// Per-bar signal column. Bar `i` carries the verdict over `bars[0..=i]`,
/// driven through one `ChanEngine` so the whole series costs one pass.
#[derive(Debug, Clone, Default)]
pub struct SignalGenerator {
    config: ChanConfig,
}

impl SignalGenerator {
    pub fn new(config: ChanConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self, sbars: &[SBar]) -> Vec<BarSignal> {
        if sbars.len() < self.config.min_bars {
            return sbars.iter().map(|x| BarSignal::flat(x.datetime)).collect();
        }

        let mut engine = ChanEngine::with_config(&self.config);
        let mut out = Vec::with_capacity(sbars.len());
        for (index, sbar) in sbars.iter().enumerate() {
            engine.append(sbar);
            if index < self.config.warmup_bars {
                out.push(BarSignal::flat(sbar.datetime));
                continue;
            }
            let point = engine.bs_point();
            match point.signal {
                1 | -1 => out.push(BarSignal {
                    datetime: sbar.datetime,
                    signal: point.signal,
                    signal_type: point.signal_type,
                }),
                _ => out.push(BarSignal::flat(sbar.datetime)),
            }
        }

        let active = out.iter().filter(|x| x.signal != 0).count();
        info!(bars = sbars.len(), active, "signal column generated");
        out
    }

    pub fn signal_column(&self, sbars: &[SBar]) -> Vec<i8> {
        self.generate(sbars).into_iter().map(|x| x.signal).collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn zigzag(count: usize) -> Vec<SBar> {
        let base = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("valid date");
        let cycle = [0.0, 2.0, 4.0, 6.0, 3.0, 1.0, -1.0, -3.0];
        (0..count)
            .map(|i| {
                let mid = 50.0 + cycle[i % cycle.len()];
                SBar::new(base + Duration::days(i as i64), mid, mid + 1.0, mid - 1.0, mid, 100.0)
            })
            .collect()
    }

    #[test]
    fn short_series_is_all_zero() {
        let generator = SignalGenerator::default();
        let signals = generator.generate(&zigzag(9));
        assert_eq!(signals.len(), 9);
        assert!(signals.iter().all(|x| x.signal == 0 && x.signal_type.is_none()));
    }

    #[test]
    fn warmup_bars_carry_no_signal() {
        let generator = SignalGenerator::default();
        let column = generator.signal_column(&zigzag(60));
        assert_eq!(column.len(), 60);
        assert!(column[..30].iter().all(|x| *x == 0));
        assert!(column[30..].iter().any(|x| *x != 0));
    }
}
