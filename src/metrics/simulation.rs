use chrono::{Datelike, Months, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::config::{GrowthSettings, PerformanceSettings};
use crate::model::{PerformancePoint, PerformanceSeries};

/// Independent random streams per client, all derived from one session seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Growth,
    Performance,
}

impl Stream {
    fn tag(self) -> &'static str {
        match self {
            Stream::Growth => "growth",
            Stream::Performance => "performance",
        }
    }
}

fn fnv1a(bytes: impl IntoIterator<Item = u8>, mut hash: u64) -> u64 {
    for byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

pub fn stream_rng(seed: u64, client: &str, stream: Stream) -> StdRng {
    let hash = fnv1a(seed.to_le_bytes(), 0xcbf2_9ce4_8422_2325);
    let hash = fnv1a(client.bytes(), hash);
    let hash = fnv1a(stream.tag().bytes(), hash);
    StdRng::seed_from_u64(hash)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Mock year-over-year growth per holding, uniform over the configured range.
pub fn mock_growth(rng: &mut StdRng, count: usize, settings: &GrowthSettings) -> Vec<f64> {
    (0..count)
        .map(|_| round2(rng.gen_range(settings.min_pct..settings.max_pct)))
        .collect()
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// The `count` month-end dates ending on the latest month end not after
/// `today`, oldest first.
pub fn month_ends(today: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let anchor = match last_day_of_month(today.year(), today.month()) {
        Some(end) if end == today => Some(today),
        _ => today.with_day(1).and_then(|first| first.pred_opt()),
    };

    let Some(anchor) = anchor else {
        return Vec::new();
    };

    let mut months: Vec<NaiveDate> = (0..count as u32)
        .filter_map(|back| {
            let first = anchor.with_day(1)?.checked_sub_months(Months::new(back))?;
            last_day_of_month(first.year(), first.month())
        })
        .collect();
    months.reverse();
    months
}

/// Random walk of portfolio value anchored near the current total:
/// `total - offset + cumulative sum of Normal(drift, step_std_dev)` steps.
pub fn performance_walk(
    rng: &mut StdRng,
    total_value: f64,
    months: &[NaiveDate],
    settings: &PerformanceSettings,
) -> PerformanceSeries {
    let mut level = total_value - settings.walk_offset;

    let points = months
        .iter()
        .map(|month| {
            let z: f64 = rng.sample(StandardNormal);
            level += settings.drift + settings.step_std_dev * z;
            PerformancePoint { month: *month, value: level }
        })
        .collect();

    PerformanceSeries { points }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_ends_stop_before_a_partial_month() {
        let months = month_ends(date(2026, 10, 17), 3);
        assert_eq!(months, vec![date(2026, 7, 31), date(2026, 8, 31), date(2026, 9, 30)]);
    }

    #[test]
    fn month_ends_include_today_on_a_month_end() {
        let months = month_ends(date(2024, 2, 29), 2);
        assert_eq!(months, vec![date(2024, 1, 31), date(2024, 2, 29)]);
    }

    #[test]
    fn month_ends_cross_year_boundary() {
        let months = month_ends(date(2027, 1, 5), 2);
        assert_eq!(months, vec![date(2026, 11, 30), date(2026, 12, 31)]);
    }

    #[test]
    fn same_seed_same_stream_is_reproducible() {
        let settings = GrowthSettings::default();
        let a = mock_growth(&mut stream_rng(42, "Client A", Stream::Growth), 4, &settings);
        let b = mock_growth(&mut stream_rng(42, "Client A", Stream::Growth), 4, &settings);
        assert_eq!(a, b);

        let other_client = mock_growth(&mut stream_rng(42, "Client B", Stream::Growth), 4, &settings);
        assert_ne!(a, other_client);
    }

    #[test]
    fn growth_stays_in_range_with_two_decimals() {
        let settings = GrowthSettings::default();
        let growth = mock_growth(&mut stream_rng(7, "Client C", Stream::Growth), 200, &settings);
        for g in growth {
            assert!((-5.0..=18.0).contains(&g), "{} out of range", g);
            assert!(((g * 100.0).round() - g * 100.0).abs() < 1e-6);
        }
    }

    #[test]
    fn walk_without_noise_is_a_straight_line() {
        let settings = PerformanceSettings {
            step_std_dev: 0.0,
            ..PerformanceSettings::default()
        };
        let months = month_ends(date(2026, 10, 17), 4);
        let series = performance_walk(&mut stream_rng(1, "Client A", Stream::Performance), 280.0, &months, &settings);

        let values = series.values();
        assert_eq!(values, vec![271.5, 273.0, 274.5, 276.0]);
        assert_eq!(series.last_month(), Some(date(2026, 9, 30)));
    }
}
