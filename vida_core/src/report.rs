//! CSV inventory report.
//!
//! Writes the monitoring table (every medication with its current
//! classifications) to a CSV file for sharing outside the tool.

use crate::{Inventory, Result, StatusRow, ThresholdSettings};
use chrono::{DateTime, Utc};
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: u32,
    name: String,
    lot: String,
    expiry: String,
    days_until_expiry: i64,
    stock: u32,
    stock_status: &'static str,
    expiry_status: &'static str,
    expired: bool,
}

impl From<&StatusRow<'_>> for CsvRow {
    fn from(row: &StatusRow<'_>) -> Self {
        CsvRow {
            id: row.medication.id,
            name: row.medication.name.clone(),
            lot: row.medication.lot.clone(),
            expiry: row.medication.expiry.to_string(),
            days_until_expiry: row.days_until_expiry,
            stock: row.medication.stock,
            stock_status: row.stock_status.label(),
            expiry_status: row.expiry_status.label(),
            expired: row.expired,
        }
    }
}

/// Write the full monitoring table to `path`
pub fn write_inventory_report(
    inventory: &Inventory,
    settings: &ThresholdSettings,
    now: DateTime<Utc>,
    path: &Path,
) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let rows = inventory.status_report(now, settings);
    let mut writer = csv::Writer::from_path(path)?;
    for row in &rows {
        writer.serialize(CsvRow::from(row))?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} report rows to {:?}", rows.len(), path);
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample;
    use chrono::TimeZone;

    #[test]
    fn report_contains_one_row_per_medication() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("report.csv");

        let inventory = Inventory::new(
            sample::sample_medications(),
            sample::sample_entries(),
            sample::sample_exits(),
        );
        let settings = ThresholdSettings::default();
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();

        let written = write_inventory_report(&inventory, &settings, now, &path).unwrap();
        assert_eq!(written, 5);

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        let header = lines.next().unwrap();
        assert!(header.contains("stock_status"));
        assert_eq!(lines.count(), 5);

        // Metformin: stock 5 is critical at the default thresholds
        assert!(contents.contains("Metformin 850mg"));
        let metformin = contents
            .lines()
            .find(|l| l.contains("Metformin"))
            .unwrap();
        assert!(metformin.contains("critical"));
    }
}
