// File: crates/mzchart-core/src/export.rs
// Summary: Export-service boundary and the CSV data-format implementation.

use std::path::PathBuf;

use serde::Serialize;

use crate::chart::ChartId;
use crate::error::ChartError;
use crate::point::FieldValue;

/// One visible chart point, flattened for export: resolved coordinates, the
/// owning series' label (with the precursor m/z annotation when the point
/// carries one), and the raw stored dependent value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExportRecord {
    pub x: f64,
    pub y: f64,
    pub series_label: String,
    pub value: FieldValue,
}

/// External export boundary. Format ids are opaque to the core; the host
/// builds its save menus from the two lists.
pub trait ExportService {
    fn image_formats(&self) -> Vec<String>;
    fn data_formats(&self) -> Vec<String>;
    fn export_graph(
        &self,
        chart: ChartId,
        format: &str,
        records: &[ExportRecord],
    ) -> Result<(), ChartError>;
}

/// Writes the data-format branch as CSV files, one per chart, under
/// `out_dir`. Image formats belong to the rendering host and are not offered
/// here.
pub struct CsvExporter {
    pub out_dir: PathBuf,
}

impl CsvExporter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self { out_dir: out_dir.into() }
    }
}

impl ExportService for CsvExporter {
    fn image_formats(&self) -> Vec<String> {
        Vec::new()
    }

    fn data_formats(&self) -> Vec<String> {
        vec!["csv".to_string()]
    }

    fn export_graph(
        &self,
        chart: ChartId,
        format: &str,
        records: &[ExportRecord],
    ) -> Result<(), ChartError> {
        if format != "csv" {
            return Err(ChartError::UnsupportedFormat(format.to_string()));
        }
        std::fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(format!("{chart}.csv"));
        let mut writer = csv::Writer::from_path(&path)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        log::info!("wrote {} records to {}", records.len(), path.display());
        Ok(())
    }
}
