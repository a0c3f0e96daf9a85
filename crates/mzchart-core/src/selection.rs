// File: crates/mzchart-core/src/selection.rs
// Summary: Multi-selection state machine for MS2 precursor points.

use crate::chart::{chart_state_mut, ChartId, ChartState};
use crate::descriptor::{SeriesId, SpectrumId};
use crate::error::ChartError;
use crate::palette::{Color, Palette, DIM_ALPHA};
use crate::point::{keys, FieldValue};

/// A click reported by the host. The point-click handler consumes the event;
/// the background handler checks the flag before deselecting, so one user
/// gesture never both selects and deselects.
#[derive(Clone, Debug)]
pub struct ClickEvent {
    pub modifier: bool,
    consumed: bool,
}

impl ClickEvent {
    pub fn new(modifier: bool) -> Self {
        Self { modifier, consumed: false }
    }

    pub fn consume(&mut self) {
        self.consumed = true;
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

/// What a `select` call did, so the controller knows what to rerender and
/// whether to refresh derived data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectOutcome {
    /// A previously active selection was fully cleared (plain click, or a
    /// toggle-off that emptied the set). The secondary chart must fall back
    /// to the base dataset unless `changed` is also set.
    pub cleared: bool,
    /// The selection set is non-empty and changed; derived data must be
    /// recomputed after the restyled charts are rendered.
    pub changed: bool,
}

/// One selected point, with everything needed to invert the visual mutation
/// exactly on deselect.
#[derive(Clone, Debug)]
pub struct SelectionEntry {
    pub chart: ChartId,
    pub series: SeriesId,
    pub x: f64,
    pub y: f64,
    pub point_index: usize,
    pub color_field: String,
    pub previous_color: Option<FieldValue>,
    pub spectrum_id: SpectrumId,
    pub scan_id: Option<i64>,
    /// Highlight color of this slot; the derived spectrum series reuses it.
    pub color: Color,
}

#[derive(Clone, Debug)]
struct DimmedChart {
    chart: ChartId,
    /// (fill_alpha, line_alpha) per series, in series order.
    alphas: Vec<(f64, f64)>,
}

/// Keys of an issued derived-data request, tagged with the selection
/// generation it belongs to. A result whose generation no longer matches is
/// stale and must be discarded.
#[derive(Clone, Debug)]
pub struct DerivedRequest {
    pub generation: u64,
    pub keys: Vec<SpectrumId>,
}

/// Tracks which points are selected across charts. Created fresh per data
/// load; mutated only through `select`/`deselect`/`reset`.
#[derive(Clone, Debug, Default)]
pub struct SelectionState {
    entries: Vec<SelectionEntry>,
    dimmed: Vec<DimmedChart>,
    active: bool,
    generation: u64,
    next_slot: usize,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn entries(&self) -> &[SelectionEntry] {
        &self.entries
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Forget all bookkeeping without touching chart visuals. Used when the
    /// underlying data is replaced wholesale.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.dimmed.clear();
        self.active = false;
        self.next_slot = 0;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Apply a click on a chart point.
    ///
    /// Plain click replaces the whole selection; a modifier click adds, or
    /// toggles off when the same coordinates are already selected. Clicking
    /// a point without the precursor marker is a no-op beyond the plain-click
    /// clearing. Restyling happens here; rendering and derived-data refresh
    /// are the caller's to sequence.
    pub fn select(
        &mut self,
        event: &mut ClickEvent,
        chart_id: ChartId,
        point_index: usize,
        palette: &mut Palette,
        charts: &mut [ChartState],
    ) -> Result<SelectOutcome, ChartError> {
        event.consume();

        let mut outcome = SelectOutcome::default();
        if !event.modifier {
            outcome.cleared = self.clear_visuals(charts);
        }

        let chart = chart_state_mut(charts, chart_id).ok_or(ChartError::UnknownChart(chart_id))?;
        let point = chart
            .points
            .get(point_index)
            .ok_or(ChartError::PointOutOfRange { chart: chart_id, index: point_index })?;
        if !point.is_ms2_selectable() {
            return Ok(outcome);
        }

        let series = chart.series_for(&point.series_id).ok_or_else(|| {
            ChartError::MissingDescriptor { series_id: point.series_id.clone() }
        })?;
        let series_id = series.id.clone();
        let color_field = series.color_field.clone();
        let x = point.number(&series.x_field).ok_or(ChartError::MissingField { field: "x" })?;
        let y = point.number(&series.y_field).ok_or(ChartError::MissingField { field: "y" })?;

        if event.modifier {
            // Toggle off on coordinate identity, never on index identity.
            if let Some(pos) = self.entries.iter().position(|e| e.x == x && e.y == y) {
                if self.entries.len() == 1 {
                    self.clear_visuals(charts);
                    outcome.cleared = true;
                    return Ok(outcome);
                }
                let entry = self.entries.remove(pos);
                restore_entry(&entry, charts);
                self.generation = self.generation.wrapping_add(1);
                outcome.changed = true;
                log::debug!("deselected point at ({x}, {y}); {} remain", self.entries.len());
                return Ok(outcome);
            }
        }

        let spectrum_id = point
            .spectrum_id()
            .ok_or(ChartError::MissingField { field: keys::SPECTRUM_ID })?;
        let scan_id = point.scan_id();
        let previous_color = point.get(&color_field).cloned();
        let color = palette.slot_color(self.next_slot);
        self.next_slot += 1;

        let point = &mut chart.points[point_index];
        point.set(color_field.as_str(), color.to_string());

        self.entries.push(SelectionEntry {
            chart: chart_id,
            series: series_id,
            x,
            y,
            point_index,
            color_field,
            previous_color,
            spectrum_id,
            scan_id,
            color,
        });

        // Dim the owning chart once, on its first selected point.
        if !self.dimmed.iter().any(|d| d.chart == chart_id) {
            let alphas = chart.series.iter().map(|s| (s.fill_alpha, s.line_alpha)).collect();
            for s in chart.series.iter_mut() {
                s.fill_alpha = DIM_ALPHA;
                s.line_alpha = DIM_ALPHA;
            }
            self.dimmed.push(DimmedChart { chart: chart_id, alphas });
        }

        self.active = true;
        self.generation = self.generation.wrapping_add(1);
        outcome.changed = true;
        log::debug!("selected spectrum {spectrum_id} at ({x}, {y}); {} selected", self.entries.len());
        Ok(outcome)
    }

    /// Background-click deselect. No-op when nothing is selected or when the
    /// triggering event was already consumed by a point click.
    pub fn deselect(&mut self, event: &ClickEvent, charts: &mut [ChartState]) -> bool {
        if event.is_consumed() {
            return false;
        }
        self.clear_visuals(charts)
    }

    /// Keys for the derived fragmentation-spectrum fetch, in selection order.
    pub fn derived_request(&self) -> DerivedRequest {
        DerivedRequest {
            generation: self.generation,
            keys: self.entries.iter().map(|e| e.spectrum_id).collect(),
        }
    }

    /// Cheap copy of the full selection bookkeeping, taken before a mutation
    /// whose derived-data fetch may fail.
    pub fn snapshot(&self) -> SelectionState {
        self.clone()
    }

    /// Roll back to `snapshot`, undoing current visual mutations and
    /// re-applying the snapshot's. The generation moves past both states so
    /// any in-flight request is invalidated.
    pub fn restore(&mut self, snapshot: SelectionState, charts: &mut [ChartState]) {
        self.clear_visuals(charts);
        for dim in &snapshot.dimmed {
            if let Some(chart) = chart_state_mut(charts, dim.chart) {
                for s in chart.series.iter_mut() {
                    s.fill_alpha = DIM_ALPHA;
                    s.line_alpha = DIM_ALPHA;
                }
            }
        }
        for entry in &snapshot.entries {
            if let Some(chart) = chart_state_mut(charts, entry.chart) {
                if let Some(point) = chart.points.get_mut(entry.point_index) {
                    point.set(entry.color_field.as_str(), entry.color.to_string());
                }
            }
        }
        let generation = self.generation.max(snapshot.generation).wrapping_add(1);
        *self = snapshot;
        self.generation = generation;
    }

    /// Restore every stashed visual and empty the selection. Returns whether
    /// there was anything to clear.
    fn clear_visuals(&mut self, charts: &mut [ChartState]) -> bool {
        if !self.active {
            return false;
        }
        for dim in self.dimmed.drain(..) {
            if let Some(chart) = chart_state_mut(charts, dim.chart) {
                for (series, (fill, line)) in chart.series.iter_mut().zip(dim.alphas) {
                    series.fill_alpha = fill;
                    series.line_alpha = line;
                }
            }
        }
        for entry in std::mem::take(&mut self.entries) {
            restore_entry(&entry, charts);
        }
        self.active = false;
        self.next_slot = 0;
        self.generation = self.generation.wrapping_add(1);
        log::debug!("selection cleared");
        true
    }
}

/// Put a point's stashed color value back, exactly as it was.
fn restore_entry(entry: &SelectionEntry, charts: &mut [ChartState]) {
    if let Some(chart) = chart_state_mut(charts, entry.chart) {
        if let Some(point) = chart.points.get_mut(entry.point_index) {
            match &entry.previous_color {
                Some(value) => point.set(entry.color_field.as_str(), value.clone()),
                None => {
                    point.remove(&entry.color_field);
                }
            }
        }
    }
}
