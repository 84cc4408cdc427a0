use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

use crate::api::provider::{DataProvider, DataSource};
use crate::error::ImportError;
use crate::model::*;

pub const CLIENT_COLUMN: &str = "Client";
pub const ASSET_CLASS_COLUMN: &str = "Asset Class";
pub const VALUE_COLUMN: &str = "Value (INR Lakhs)";

/// Holdings uploaded as a delimited spreadsheet with one row per
/// (client, asset class).
pub struct SpreadsheetProvider {
    path: PathBuf,
}

impl SpreadsheetProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataProvider for SpreadsheetProvider {
    fn source(&self) -> DataSource {
        DataSource::Spreadsheet(self.path.display().to_string())
    }

    fn load_book(&self) -> Result<PortfolioBook, ImportError> {
        info!("📥 Importing holdings from {}", self.path.display());
        let file = File::open(&self.path)?;
        let book = parse_holdings(file)?;
        info!(
            "✅ Imported {} client(s), AUM {}",
            book.len(),
            book.aum()
        );
        Ok(book)
    }
}

struct ColumnIndex {
    client: usize,
    asset_class: usize,
    value: usize,
}

fn locate_columns(headers: &StringRecord) -> Result<ColumnIndex, ImportError> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}') == name)
            .ok_or_else(|| ImportError::MissingColumn(name.to_string()))
    };

    Ok(ColumnIndex {
        client: find(CLIENT_COLUMN)?,
        asset_class: find(ASSET_CLASS_COLUMN)?,
        value: find(VALUE_COLUMN)?,
    })
}

fn parse_value(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && *c != '_').collect();
    Decimal::from_str(&cleaned).ok()
}

/// Parses spreadsheet rows into a book. Clients keep the order in which they
/// first appear; extra columns are ignored.
pub fn parse_holdings<R: Read>(reader: R) -> Result<PortfolioBook, ImportError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns = locate_columns(csv_reader.headers()?)?;
    let mut book = PortfolioBook::default();
    // Values are non-negative, so a book total that fits bounds every client total.
    let mut book_total = Decimal::ZERO;

    for (idx, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = idx + 1;

        if record.iter().all(|field| field.is_empty()) {
            debug!("Skipping blank spreadsheet row {}", row);
            continue;
        }

        let field = |column: usize, name: &str| -> Result<String, ImportError> {
            match record.get(column) {
                Some(value) if !value.is_empty() => Ok(value.to_string()),
                other => Err(ImportError::InvalidValue {
                    row,
                    column: name.to_string(),
                    value: other.unwrap_or_default().to_string(),
                }),
            }
        };

        let client = field(columns.client, CLIENT_COLUMN)?;
        let asset_class = field(columns.asset_class, ASSET_CLASS_COLUMN)?;
        let raw_value = field(columns.value, VALUE_COLUMN)?;

        let value = parse_value(&raw_value)
            .filter(|v| !v.is_sign_negative())
            .ok_or_else(|| ImportError::InvalidValue {
                row,
                column: VALUE_COLUMN.to_string(),
                value: raw_value.clone(),
            })?;

        book_total = book_total
            .checked_add(value)
            .ok_or_else(|| ImportError::InvalidValue {
                row,
                column: VALUE_COLUMN.to_string(),
                value: raw_value.clone(),
            })?;

        let duplicate = book
            .get(&client)
            .map(|c| c.holdings.iter().any(|h| h.asset_class == asset_class))
            .unwrap_or(false);
        if duplicate {
            warn!("⚠️ {} lists '{}' more than once (row {})", client, asset_class, row);
        }

        book.push_holding(&client, Holding::new(asset_class, value));
    }

    if book.is_empty() {
        return Err(ImportError::Empty);
    }

    Ok(book)
}
