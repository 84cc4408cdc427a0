use chrono::NaiveDate;
use rust_decimal::prelude::*;

use crate::config::Config;
use crate::error::MetricsError;
use crate::model::*;
use crate::model::profile::profile_for;

pub mod returns;
pub mod simulation;

use simulation::{mock_growth, month_ends, performance_walk, stream_rng, Stream};

pub fn calculate_total_value(holdings: &[Holding]) -> Decimal {
    holdings.iter().map(|h| h.value).sum()
}

/// Percentage of the total held in each holding, rounded to 2 dp.
pub fn calculate_allocations(client: &str, holdings: &[Holding]) -> Result<Vec<Decimal>, MetricsError> {
    if holdings.is_empty() {
        return Err(MetricsError::NoHoldings { client: client.to_string() });
    }

    let total = calculate_total_value(holdings);
    if total.is_zero() {
        return Err(MetricsError::ZeroTotalValue { client: client.to_string() });
    }

    let hundred = Decimal::ONE_HUNDRED;
    Ok(holdings
        .iter()
        .map(|h| (h.value / total * hundred).round_dp(2))
        .collect())
}

pub fn derive_rows(
    client: &str,
    holdings: &[Holding],
    growth: &[f64],
) -> Result<Vec<DerivedRow>, MetricsError> {
    let allocations = calculate_allocations(client, holdings)?;

    Ok(holdings
        .iter()
        .zip(allocations)
        .enumerate()
        .map(|(idx, (holding, allocation_pct))| DerivedRow {
            asset_class: holding.asset_class.clone(),
            value: holding.value,
            allocation_pct,
            growth_pct: growth.get(idx).copied().unwrap_or(0.0),
        })
        .collect())
}

/// Highest and lowest growth rows. Ties go to the row listed first.
pub fn best_and_worst(rows: &[DerivedRow]) -> (Option<AssetMover>, Option<AssetMover>) {
    let mover = |row: &DerivedRow| AssetMover {
        asset_class: row.asset_class.clone(),
        growth_pct: row.growth_pct,
    };

    let mut best: Option<&DerivedRow> = None;
    let mut worst: Option<&DerivedRow> = None;
    for row in rows {
        if best.map_or(true, |b| row.growth_pct > b.growth_pct) {
            best = Some(row);
        }
        if worst.map_or(true, |w| row.growth_pct < w.growth_pct) {
            worst = Some(row);
        }
    }

    (best.map(mover), worst.map(mover))
}

/// Recomputes everything the dashboard shows for one client. Deterministic
/// for a given `(book, client, months, seed, today, config)`.
pub fn build_snapshot(
    book: &PortfolioBook,
    client: &str,
    months: usize,
    seed: u64,
    today: NaiveDate,
    config: &Config,
) -> Result<DashboardSnapshot, MetricsError> {
    let portfolio = book
        .get(client)
        .ok_or_else(|| MetricsError::UnknownClient(client.to_string()))?;

    let holdings = &portfolio.holdings;
    let months = config.performance.clamp_months(months);

    let mut growth_rng = stream_rng(seed, client, Stream::Growth);
    let growth = mock_growth(&mut growth_rng, holdings.len(), &config.growth);
    let rows = derive_rows(client, holdings, &growth)?;

    let total_value = calculate_total_value(holdings);
    let month_axis = month_ends(today, months);
    let mut walk_rng = stream_rng(seed, client, Stream::Performance);
    let performance = performance_walk(
        &mut walk_rng,
        total_value.to_f64().unwrap_or(0.0),
        &month_axis,
        &config.performance,
    );

    let stats = returns::calculate_portfolio_stats(&performance.values());
    let (best_asset, worst_asset) = best_and_worst(&rows);

    Ok(DashboardSnapshot {
        client: client.to_string(),
        profile: profile_for(client),
        rows,
        total_value,
        performance,
        stats,
        best_asset,
        worst_asset,
        months,
        seed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockProvider;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn holdings(values: &[Decimal]) -> Vec<Holding> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Holding::new(format!("Asset {}", i), *v))
            .collect()
    }

    #[test]
    fn total_is_sum_of_holdings() {
        let h = holdings(&[dec!(120), dec!(80), dec!(50), dec!(30)]);
        assert_eq!(calculate_total_value(&h), dec!(280));
    }

    #[test]
    fn allocations_for_client_a() {
        let h = holdings(&[dec!(120), dec!(80), dec!(50), dec!(30)]);
        let alloc = calculate_allocations("Client A", &h).unwrap();
        assert_eq!(alloc, vec![dec!(42.86), dec!(28.57), dec!(17.86), dec!(10.71)]);
    }

    #[test]
    fn allocations_sum_to_one_hundred_within_rounding() {
        let cases = [
            holdings(&[dec!(1), dec!(1), dec!(1)]),
            holdings(&[dec!(0.01), dec!(999999.99)]),
            holdings(&[dec!(7), dec!(13), dec!(17), dec!(19), dec!(23), dec!(29)]),
            holdings(&[dec!(5)]),
        ];
        for h in cases {
            let alloc = calculate_allocations("c", &h).unwrap();
            let sum: Decimal = alloc.iter().sum();
            let tolerance = dec!(0.005) * Decimal::from(h.len());
            assert!((sum - dec!(100)).abs() <= tolerance, "sum {} for {:?}", sum, h);
        }
    }

    #[test]
    fn zero_total_is_an_error() {
        let h = holdings(&[dec!(0), dec!(0)]);
        assert_eq!(
            calculate_allocations("Client Z", &h),
            Err(MetricsError::ZeroTotalValue { client: "Client Z".to_string() })
        );
        assert_eq!(
            calculate_allocations("Client Z", &[]),
            Err(MetricsError::NoHoldings { client: "Client Z".to_string() })
        );
    }

    #[test]
    fn best_and_worst_pick_extremes() {
        let h = holdings(&[dec!(1), dec!(1), dec!(1)]);
        let rows = derive_rows("c", &h, &[3.5, -2.0, 12.25]).unwrap();
        let (best, worst) = best_and_worst(&rows);
        assert_eq!(best.unwrap().asset_class, "Asset 2");
        assert_eq!(worst.unwrap().growth_pct, -2.0);
        assert_eq!(best_and_worst(&[]), (None, None));
    }

    #[test]
    fn snapshot_is_deterministic_for_a_seed() {
        let book = MockProvider::book();
        let config = Config::default();
        let a = build_snapshot(&book, "Client B", 12, 99, today(), &config).unwrap();
        let b = build_snapshot(&book, "Client B", 12, 99, today(), &config).unwrap();
        assert_eq!(a, b);

        let reseeded = build_snapshot(&book, "Client B", 12, 100, today(), &config).unwrap();
        assert_ne!(a.performance, reseeded.performance);
    }

    #[test]
    fn snapshot_matches_holdings() {
        let book = MockProvider::book();
        let snapshot = build_snapshot(&book, "Client C", 24, 5, today(), &Config::default()).unwrap();

        assert_eq!(snapshot.total_value, dec!(330));
        assert_eq!(snapshot.rows.len(), 4);
        assert_eq!(snapshot.performance.points.len(), 24);
        assert_eq!(snapshot.months, 24);
        assert_eq!(snapshot.profile.risk_profile, RiskProfile::Conservative);

        let best = snapshot.best_asset.unwrap();
        assert!(snapshot.rows.iter().all(|r| r.growth_pct <= best.growth_pct));
    }

    #[test]
    fn snapshot_clamps_months_and_rejects_unknown_clients() {
        let book = MockProvider::book();
        let config = Config::default();
        let snapshot = build_snapshot(&book, "Client A", 100, 1, today(), &config).unwrap();
        assert_eq!(snapshot.months, 36);

        assert_eq!(
            build_snapshot(&book, "Nobody", 12, 1, today(), &config),
            Err(MetricsError::UnknownClient("Nobody".to_string()))
        );
    }
}
