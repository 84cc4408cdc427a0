use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ImportError;
use crate::model::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataSource {
    Static,
    Spreadsheet(String),
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Static => f.write_str("built-in mock data"),
            DataSource::Spreadsheet(path) => write!(f, "spreadsheet {}", path),
        }
    }
}

/// Anything that can hand the dashboard a book of client holdings.
pub trait DataProvider {
    fn source(&self) -> DataSource;

    fn load_book(&self) -> Result<PortfolioBook, ImportError>;
}
