// File: crates/mzchart-core/src/error.rs
// Summary: Error taxonomy for the chart core.

use thiserror::Error;

use crate::chart::ChartId;
use crate::descriptor::{SeriesId, SpectrumId};

/// Failures surfaced by the core. Data-integrity variants
/// (`MissingDescriptor`, `UnresolvedSpectrum`, `PointOutOfRange`,
/// `MissingField`) abort the operation that hit them; nothing partial is
/// committed. External-service failures (`Provider`, `Csv`, `Io`) are
/// surfaced to the host, which decides how to present them.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("no series descriptor for series '{series_id}'")]
    MissingDescriptor { series_id: SeriesId },

    #[error("failed to find selected point for fragmentation spectrum ID {spectrum_id}")]
    UnresolvedSpectrum { spectrum_id: SpectrumId },

    #[error("unknown chart '{0}'")]
    UnknownChart(ChartId),

    #[error("point index {index} out of range for chart '{chart}'")]
    PointOutOfRange { chart: ChartId, index: usize },

    #[error("selectable point is missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("data provider error: {0}")]
    Provider(String),

    #[error("unsupported export format '{0}'")]
    UnsupportedFormat(String),

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
