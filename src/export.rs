use csv::Writer;
use log::info;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ExportError;
use crate::model::DashboardSnapshot;

/// Client names come from imported spreadsheets, so path separators and
/// control characters are replaced to keep the report inside the export dir.
pub fn report_file_name(client: &str) -> String {
    let stem: String = client
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{}_portfolio_report.csv", stem)
}

/// Writes the holdings table with a trailing `Month` column labelled with the
/// last month of the performance series.
pub fn write_report<W: Write>(
    writer: W,
    snapshot: &DashboardSnapshot,
    currency_label: &str,
) -> Result<(), ExportError> {
    let mut csv_writer = Writer::from_writer(writer);
    let month = snapshot.performance.last_month_label().unwrap_or_default();

    csv_writer.write_record([
        "Asset Class".to_string(),
        format!("Value ({})", currency_label),
        "% Allocation".to_string(),
        "Growth (YoY %)".to_string(),
        "Month".to_string(),
    ])?;

    for row in &snapshot.rows {
        csv_writer.write_record([
            row.asset_class.clone(),
            row.value.normalize().to_string(),
            format!("{:.2}", row.allocation_pct),
            format!("{:.2}", row.growth_pct),
            month.clone(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn export_report(
    export_dir: impl AsRef<Path>,
    snapshot: &DashboardSnapshot,
    currency_label: &str,
) -> Result<PathBuf, ExportError> {
    let path = export_dir.as_ref().join(report_file_name(&snapshot.client));
    let file = File::create(&path)?;
    write_report(file, snapshot, currency_label)?;
    info!("💾 Report for {} written to {}", snapshot.client, path.display());
    Ok(path)
}
