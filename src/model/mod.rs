pub mod profile;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use profile::{ClientProfile, RiskProfile};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub asset_class: String,
    pub value: Decimal,
}

impl Holding {
    pub fn new(asset_class: impl Into<String>, value: Decimal) -> Self {
        Self {
            asset_class: asset_class.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientPortfolio {
    pub name: String,
    pub holdings: Vec<Holding>,
}

/// Ordered collection of client portfolios. Client order is the order in
/// which the data source listed them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioBook {
    pub clients: Vec<ClientPortfolio>,
}

impl PortfolioBook {
    pub fn client_names(&self) -> Vec<&str> {
        self.clients.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn get(&self, client: &str) -> Option<&ClientPortfolio> {
        self.clients.iter().find(|c| c.name == client)
    }

    pub fn position(&self, client: &str) -> Option<usize> {
        self.clients.iter().position(|c| c.name == client)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Assets under management: summed value across every client.
    pub fn aum(&self) -> Decimal {
        self.clients
            .iter()
            .flat_map(|c| c.holdings.iter())
            .map(|h| h.value)
            .sum()
    }

    /// Appends a holding, creating the client entry on first sight.
    pub fn push_holding(&mut self, client: &str, holding: Holding) {
        match self.clients.iter_mut().find(|c| c.name == client) {
            Some(portfolio) => portfolio.holdings.push(holding),
            None => self.clients.push(ClientPortfolio {
                name: client.to_string(),
                holdings: vec![holding],
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRow {
    pub asset_class: String,
    pub value: Decimal,
    pub allocation_pct: Decimal,
    pub growth_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformancePoint {
    pub month: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSeries {
    pub points: Vec<PerformancePoint>,
}

impl PerformanceSeries {
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn last_month(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.month)
    }

    /// Label of the most recent month, e.g. `Sep 2026`.
    pub fn last_month_label(&self) -> Option<String> {
        self.last_month().map(|m| m.format("%b %Y").to_string())
    }

    pub fn bounds(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for p in &self.points {
            min = min.min(p.value);
            max = max.max(p.value);
        }
        if min > max {
            (0.0, 0.0)
        } else {
            (min, max)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioStats {
    pub cagr: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub rolling_average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetMover {
    pub asset_class: String,
    pub growth_pct: f64,
}

/// Everything one render cycle shows for the selected client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub client: String,
    pub profile: ClientProfile,
    pub rows: Vec<DerivedRow>,
    pub total_value: Decimal,
    pub performance: PerformanceSeries,
    pub stats: PortfolioStats,
    pub best_asset: Option<AssetMover>,
    pub worst_asset: Option<AssetMover>,
    pub months: usize,
    pub seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn push_holding_groups_by_client_in_first_seen_order() {
        let mut book = PortfolioBook::default();
        book.push_holding("Client B", Holding::new("Equity", dec!(10)));
        book.push_holding("Client A", Holding::new("Debt", dec!(5)));
        book.push_holding("Client B", Holding::new("Gold", dec!(2)));

        assert_eq!(book.client_names(), vec!["Client B", "Client A"]);
        assert_eq!(book.get("Client B").map(|c| c.holdings.len()), Some(2));
        assert_eq!(book.position("Client A"), Some(1));
        assert_eq!(book.aum(), dec!(17));
    }

    #[test]
    fn empty_series_has_no_label() {
        let series = PerformanceSeries::default();
        assert_eq!(series.last_month_label(), None);
        assert_eq!(series.bounds(), (0.0, 0.0));
    }

    #[test]
    fn last_month_label_uses_short_month_name() {
        let series = PerformanceSeries {
            points: vec![PerformancePoint {
                month: NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
                value: 100.0,
            }],
        };
        assert_eq!(series.last_month_label().as_deref(), Some("Sep 2026"));
    }
}
