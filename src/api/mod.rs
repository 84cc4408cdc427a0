pub mod mock;
pub mod provider;
pub mod spreadsheet;
