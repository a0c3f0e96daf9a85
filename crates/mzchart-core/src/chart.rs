// File: crates/mzchart-core/src/chart.rs
// Summary: Renderer boundary: chart descriptors, handle/renderer traits, and the chart registry.

use std::collections::BTreeMap;

use crate::descriptor::{SeriesDescriptor, SeriesId};
use crate::guide::Guide;
use crate::point::Point;
use crate::series::Series;

/// The two chart surfaces this core drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChartId {
    Chromatogram,
    MassPeak,
}

impl ChartId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartId::Chromatogram => "chromatogram",
            ChartId::MassPeak => "mass_peak",
        }
    }

    /// The chart whose legend mirrors this one.
    pub fn counterpart(&self) -> ChartId {
        match self {
            ChartId::Chromatogram => ChartId::MassPeak,
            ChartId::MassPeak => ChartId::Chromatogram,
        }
    }
}

impl std::fmt::Display for ChartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct AxisLabels {
    pub x: String,
    pub y: String,
}

impl AxisLabels {
    pub fn chromatogram() -> Self {
        Self { x: "Retention time [s]".to_string(), y: "Intensity [number of ions]".to_string() }
    }

    pub fn mass_peaks() -> Self {
        Self { x: "m/z".to_string(), y: "Intensity [number of ions]".to_string() }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LegendConfig {
    pub enabled: bool,
}

/// Declarative chart description handed to the renderer: the point array,
/// the built series, the guides, and axis/legend configuration. The renderer
/// owns drawing, zoom, cursor and legend widgets; it reports interaction
/// back through the controller entry points.
pub struct ChartSpec<'a> {
    pub chart: ChartId,
    pub points: &'a [Point],
    pub series: &'a [Series],
    pub guides: &'a [Guide],
    pub axis_labels: AxisLabels,
    pub legend: LegendConfig,
}

/// Live handle to one rendered chart.
pub trait ChartHandle {
    /// Redraw from the current (possibly restyled) data.
    fn rerender(&mut self);
    fn hide_series(&mut self, id: &SeriesId);
    fn show_series(&mut self, id: &SeriesId);
}

/// External charting engine boundary.
pub trait ChartRenderer {
    fn make_chart(&mut self, spec: &ChartSpec<'_>) -> Box<dyn ChartHandle>;
}

/// Explicit chart-id to handle map, owned by the controller and passed to
/// whoever needs it. Never ambient state.
#[derive(Default)]
pub struct ChartRegistry {
    charts: BTreeMap<ChartId, Box<dyn ChartHandle>>,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ChartId, handle: Box<dyn ChartHandle>) {
        self.charts.insert(id, handle);
    }

    pub fn get_mut(&mut self, id: ChartId) -> Option<&mut (dyn ChartHandle + 'static)> {
        self.charts.get_mut(&id).map(|h| h.as_mut())
    }

    pub fn rerender(&mut self, id: ChartId) {
        if let Some(handle) = self.charts.get_mut(&id) {
            handle.rerender();
        }
    }

    pub fn rerender_all(&mut self) {
        for handle in self.charts.values_mut() {
            handle.rerender();
        }
    }
}

/// Whether a chart currently shows the base dataset or selection-derived
/// spectra.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartMode {
    Base,
    Derived,
}

/// The controller-side state behind one rendered chart: the mutated point
/// array, the built series and guides, and the descriptors they were built
/// from (needed to resolve axis fields for export).
pub struct ChartState {
    pub id: ChartId,
    pub points: Vec<Point>,
    pub series: Vec<Series>,
    pub guides: Vec<Guide>,
    pub descriptors: BTreeMap<SeriesId, SeriesDescriptor>,
    pub mode: ChartMode,
}

impl ChartState {
    pub fn empty(id: ChartId) -> Self {
        Self {
            id,
            points: Vec::new(),
            series: Vec::new(),
            guides: Vec::new(),
            descriptors: BTreeMap::new(),
            mode: ChartMode::Base,
        }
    }

    pub fn series_for(&self, id: &SeriesId) -> Option<&Series> {
        self.series.iter().find(|s| &s.id == id)
    }
}

/// Find a chart state by id in the controller's chart list.
pub fn chart_state<'a>(charts: &'a [ChartState], id: ChartId) -> Option<&'a ChartState> {
    charts.iter().find(|c| c.id == id)
}

pub fn chart_state_mut<'a>(charts: &'a mut [ChartState], id: ChartId) -> Option<&'a mut ChartState> {
    charts.iter_mut().find(|c| c.id == id)
}
