// File: crates/mzchart-core/src/controller.rs
// Summary: Top-level coordinator: builds both charts, routes clicks through the selection machine, keeps legends in sync.

use std::collections::BTreeMap;

use crate::chart::{
    chart_state, chart_state_mut, AxisLabels, ChartId, ChartMode, ChartRegistry, ChartRenderer,
    ChartSpec, ChartState, LegendConfig,
};
use crate::descriptor::{SeriesDescriptor, SeriesId};
use crate::error::ChartError;
use crate::export::ExportRecord;
use crate::guide::build_guides;
use crate::palette::Palette;
use crate::point::{keys, FieldValue, Point};
use crate::provider::{DataProvider, PlotData, SpectraData};
use crate::selection::{ClickEvent, DerivedRequest, SelectionState};
use crate::series::{build_series, BuildOptions, SeriesProto};

/// Mass peaks are sticks at (near-)coincident m/z values across samples; the
/// outer ground points are pushed apart by this much so the sticks stay
/// distinguishable.
const MASS_PEAK_OFFSET: f64 = 0.5;

/// Owns the chart registry, the selection state, the palette and the most
/// recent base datasets; everything external goes through the renderer,
/// provider and export boundaries.
pub struct ChartController {
    renderer: Box<dyn ChartRenderer>,
    provider: Box<dyn DataProvider>,
    registry: ChartRegistry,
    selection: SelectionState,
    palette: Palette,
    base: PlotData,
    charts: Vec<ChartState>,
}

impl ChartController {
    pub fn new(renderer: Box<dyn ChartRenderer>, provider: Box<dyn DataProvider>) -> Self {
        Self {
            renderer,
            provider,
            registry: ChartRegistry::new(),
            selection: SelectionState::new(),
            palette: Palette::new(),
            base: PlotData::default(),
            charts: vec![
                ChartState::empty(ChartId::Chromatogram),
                ChartState::empty(ChartId::MassPeak),
            ],
        }
    }

    pub fn chart(&self, id: ChartId) -> Option<&ChartState> {
        chart_state(&self.charts, id)
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// New top-level data arrived: drop any selection, rebuild and render the
    /// chromatogram (with guides), then the mass-peak chart from MS1 data.
    pub fn update_plot(&mut self, data: PlotData) -> Result<(), ChartError> {
        log::info!(
            "plot data update: {} chromatogram points, {} mass peaks",
            data.xic_points.len(),
            data.ms1_points.len()
        );
        self.selection.reset();
        self.base = data;
        self.rebuild_chromatogram()?;
        self.rebuild_mass_base()
    }

    /// The sample set changed; show empty charts until new data arrives.
    pub fn clear(&mut self) -> Result<(), ChartError> {
        self.update_plot(PlotData::default())
    }

    /// A click landed on a chart point. Consumes the event, updates the
    /// selection, renders the restyled charts, and only then refreshes the
    /// derived spectra so a stale highlight is never shown next to fresh
    /// derived data. A failed fetch rolls the selection back.
    pub fn point_clicked(
        &mut self,
        event: &mut ClickEvent,
        chart: ChartId,
        point_index: usize,
    ) -> Result<(), ChartError> {
        let snapshot = self.selection.snapshot();
        let outcome =
            self.selection.select(event, chart, point_index, &mut self.palette, &mut self.charts)?;
        if outcome.changed {
            self.registry.rerender_all();
            let request = self.selection.derived_request();
            match self.provider.derived_spectra(&request.keys) {
                Ok(data) => self.apply_derived(&request, data),
                Err(err) => {
                    log::warn!("derived spectra fetch failed, rolling selection back: {err}");
                    self.selection.restore(snapshot, &mut self.charts);
                    self.registry.rerender_all();
                    Err(err)
                }
            }
        } else if outcome.cleared {
            self.registry.rerender_all();
            self.rebuild_mass_base()
        } else {
            Ok(())
        }
    }

    /// A click landed on chart background. Deselects unless a point-click
    /// handler already consumed the event; the mass-peak chart falls back to
    /// the base MS1 dataset.
    pub fn background_clicked(&mut self, event: &ClickEvent) -> Result<(), ChartError> {
        if self.selection.deselect(event, &mut self.charts) {
            self.registry.rerender_all();
            self.rebuild_mass_base()?;
        }
        Ok(())
    }

    /// Install derived spectra for a previously issued request. Discarded
    /// silently when the selection has moved on since the request was made.
    pub fn apply_derived(
        &mut self,
        request: &DerivedRequest,
        data: SpectraData,
    ) -> Result<(), ChartError> {
        if request.generation != self.selection.generation() {
            log::debug!("discarding superseded derived data (generation {})", request.generation);
            return Ok(());
        }
        let mut descriptors = data.descriptors;
        for entry in self.selection.entries() {
            let series_id = SeriesId::spectrum(entry.spectrum_id);
            let desc = descriptors
                .get_mut(&series_id)
                .ok_or(ChartError::UnresolvedSpectrum { spectrum_id: entry.spectrum_id })?;
            desc.scan_id = entry.scan_id.or(desc.scan_id);
            desc.sample_name = self
                .base
                .xic_descriptors
                .get(&entry.series)
                .and_then(|d| d.sample_name.clone());
            desc.color = Some(entry.color);
        }
        self.rebuild_mass(descriptors, data.points, ChartMode::Derived, true)
    }

    /// Legend toggle on one chart: flip the matching guide there, and mirror
    /// the hide/show to the counterpart chart when it shows base data with a
    /// structurally matching series list. Otherwise the sync is skipped,
    /// never forced.
    pub fn set_series_visible(
        &mut self,
        chart_id: ChartId,
        index: usize,
        visible: bool,
    ) -> Result<(), ChartError> {
        let own = chart_state_mut(&mut self.charts, chart_id)
            .ok_or(ChartError::UnknownChart(chart_id))?;
        if index >= own.series.len() {
            return Ok(());
        }
        own.series[index].hidden = !visible;
        if let Some(guide) = own.guides.get_mut(index) {
            guide.visible = visible;
        }
        let own_len = own.series.len();
        let own_first = own.series.first().map(|s| s.title.clone());
        self.registry.rerender(chart_id);

        let other_id = chart_id.counterpart();
        let Some(other) = chart_state_mut(&mut self.charts, other_id) else {
            return Ok(());
        };
        let matching = other.mode == ChartMode::Base
            && other.series.len() == own_len
            && other.series.first().map(|s| s.title.clone()) == own_first;
        if !matching {
            log::debug!("legend sync to '{other_id}' skipped: series lists do not match");
            return Ok(());
        }
        other.series[index].hidden = !visible;
        let series_id = other.series[index].id.clone();
        if let Some(handle) = self.registry.get_mut(other_id) {
            if visible {
                handle.show_series(&series_id);
            } else {
                handle.hide_series(&series_id);
            }
        }
        Ok(())
    }

    /// Simplified records for every visible, non-synthetic point of a chart,
    /// with axis fields resolved through the descriptors the chart was built
    /// from (base or selection-derived, whichever is active).
    pub fn visible_coordinates(&self, chart_id: ChartId) -> Result<Vec<ExportRecord>, ChartError> {
        let state =
            chart_state(&self.charts, chart_id).ok_or(ChartError::UnknownChart(chart_id))?;
        let mut records = Vec::new();
        for point in &state.points {
            if point.synthetic {
                continue;
            }
            let desc = state.descriptors.get(&point.series_id).ok_or_else(|| {
                ChartError::MissingDescriptor { series_id: point.series_id.clone() }
            })?;
            let series = match state.series_for(&point.series_id) {
                Some(s) => s,
                None => continue,
            };
            if series.hidden {
                continue;
            }
            let (Some(x), Some(y)) = (point.number(&desc.x_field), point.number(&desc.y_field))
            else {
                continue;
            };
            let mut series_label = series.title.clone();
            if let Some(mz) = point.precursor_mz() {
                series_label = format!("Precursor m/z: {mz:.4}; {series_label}");
            }
            let value = point.get(&desc.y_field).cloned().unwrap_or(FieldValue::Number(y));
            records.push(ExportRecord { x, y, series_label, value });
        }
        Ok(records)
    }

    fn rebuild_chromatogram(&mut self) -> Result<(), ChartError> {
        let opts = BuildOptions {
            horizontal_offset: 0.0,
            stick_plot: false,
            proto: SeriesProto::chromatogram(),
            decorate: Some(&decorate_chromatogram),
            title: None,
        };
        let (series, points) = build_series(
            &self.base.xic_descriptors,
            &self.base.xic_points,
            &mut self.palette,
            &opts,
        )?;
        let guides = build_guides(&series, &self.base.xic_descriptors);

        let state = chart_state_mut(&mut self.charts, ChartId::Chromatogram)
            .ok_or(ChartError::UnknownChart(ChartId::Chromatogram))?;
        state.points = points;
        state.series = series;
        state.guides = guides;
        state.descriptors = self.base.xic_descriptors.clone();
        state.mode = ChartMode::Base;

        let state = chart_state(&self.charts, ChartId::Chromatogram)
            .ok_or(ChartError::UnknownChart(ChartId::Chromatogram))?;
        let spec = ChartSpec {
            chart: ChartId::Chromatogram,
            points: &state.points,
            series: &state.series,
            guides: &state.guides,
            axis_labels: AxisLabels::chromatogram(),
            legend: LegendConfig { enabled: true },
        };
        let handle = self.renderer.make_chart(&spec);
        self.registry.insert(ChartId::Chromatogram, handle);
        Ok(())
    }

    fn rebuild_mass_base(&mut self) -> Result<(), ChartError> {
        self.rebuild_mass(
            self.base.ms1_descriptors.clone(),
            self.base.ms1_points.clone(),
            ChartMode::Base,
            false,
        )
    }

    fn rebuild_mass(
        &mut self,
        descriptors: BTreeMap<SeriesId, SeriesDescriptor>,
        points: Vec<Point>,
        mode: ChartMode,
        separate_legend: bool,
    ) -> Result<(), ChartError> {
        let opts = BuildOptions {
            horizontal_offset: MASS_PEAK_OFFSET,
            stick_plot: true,
            proto: SeriesProto::mass_peaks(),
            decorate: Some(&decorate_mass_peak),
            title: None,
        };
        let (series, built) = build_series(&descriptors, &points, &mut self.palette, &opts)?;

        let state = chart_state_mut(&mut self.charts, ChartId::MassPeak)
            .ok_or(ChartError::UnknownChart(ChartId::MassPeak))?;
        state.points = built;
        state.series = series;
        state.guides = Vec::new();
        state.descriptors = descriptors;
        state.mode = mode;

        let state = chart_state(&self.charts, ChartId::MassPeak)
            .ok_or(ChartError::UnknownChart(ChartId::MassPeak))?;
        let spec = ChartSpec {
            chart: ChartId::MassPeak,
            points: &state.points,
            series: &state.series,
            guides: &state.guides,
            axis_labels: AxisLabels::mass_peaks(),
            legend: LegendConfig { enabled: separate_legend },
        };
        let handle = self.renderer.make_chart(&spec);
        self.registry.insert(ChartId::MassPeak, handle);
        Ok(())
    }
}

/// MS2 precursor points get a prominent clickable bullet; everything else is
/// left as supplied.
fn decorate_chromatogram(point: &mut Point) {
    if point.is_ms2_selectable() {
        point.set(keys::BULLET, "round");
        point.set(keys::COLOR, "#B22222");
        point.set(keys::BULLET_SIZE, 10.0);
    }
}

/// Mass peaks render as sticks with a tiny bullet on top.
fn decorate_mass_peak(point: &mut Point) {
    point.set(keys::BULLET, "round");
    point.set(keys::BULLET_SIZE, 0.5);
}
