// File: crates/mzchart-core/src/lib.rs
// Summary: Core library entry point; exports the chart-building and selection API.

pub mod chart;
pub mod controller;
pub mod descriptor;
pub mod error;
pub mod export;
pub mod guide;
pub mod palette;
pub mod point;
pub mod provider;
pub mod selection;
pub mod series;

pub use chart::{
    AxisLabels, ChartHandle, ChartId, ChartMode, ChartRegistry, ChartRenderer, ChartSpec,
    ChartState, LegendConfig,
};
pub use controller::ChartController;
pub use descriptor::{SeriesDescriptor, SeriesId, SpectrumId};
pub use error::ChartError;
pub use export::{CsvExporter, ExportRecord, ExportService};
pub use guide::{build_guides, Guide};
pub use palette::{Color, Palette};
pub use point::{FieldValue, Point};
pub use provider::{DataProvider, PlotData, SpectraData};
pub use selection::{ClickEvent, DerivedRequest, SelectOutcome, SelectionEntry, SelectionState};
pub use series::{build_series, BuildOptions, Series, SeriesProto};
