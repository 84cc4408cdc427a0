use rust_decimal::Decimal;

use crate::api::provider::{DataProvider, DataSource};
use crate::error::ImportError;
use crate::model::*;

const ASSET_CLASSES: [&str; 4] = ["Equity", "Debt", "Real Estate", "Gold"];

/// Built-in demo book. Replace with a real backend for production use.
pub struct MockProvider;

impl MockProvider {
    pub fn book() -> PortfolioBook {
        let table: [(&str, [i64; 4]); 3] = [
            ("Client A", [120, 80, 50, 30]),
            ("Client B", [200, 50, 40, 10]),
            ("Client C", [150, 100, 60, 20]),
        ];

        let clients = table
            .iter()
            .map(|(name, values)| ClientPortfolio {
                name: name.to_string(),
                holdings: ASSET_CLASSES
                    .iter()
                    .zip(values.iter())
                    .map(|(asset, value)| Holding::new(*asset, Decimal::from(*value)))
                    .collect(),
            })
            .collect();

        PortfolioBook { clients }
    }
}

impl DataProvider for MockProvider {
    fn source(&self) -> DataSource {
        DataSource::Static
    }

    fn load_book(&self) -> Result<PortfolioBook, ImportError> {
        Ok(Self::book())
    }
}
