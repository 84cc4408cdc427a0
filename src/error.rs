use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read spreadsheet: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed spreadsheet: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: invalid value '{value}' in column '{column}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("spreadsheet contains no holdings")]
    Empty,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode report: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetricsError {
    #[error("portfolio of {client} has a total value of zero")]
    ZeroTotalValue { client: String },

    #[error("{client} has no holdings")]
    NoHoldings { client: String },

    #[error("unknown client '{0}'")]
    UnknownClient(String),
}
