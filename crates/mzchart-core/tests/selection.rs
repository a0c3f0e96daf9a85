// File: crates/mzchart-core/tests/selection.rs
// Purpose: Validate the multi-selection state machine: toggling, restoration, guards.

use std::collections::BTreeMap;

use mzchart_core::chart::{ChartId, ChartState};
use mzchart_core::point::keys;
use mzchart_core::{
    build_series, BuildOptions, ClickEvent, FieldValue, Palette, Point, SelectionState,
    SeriesDescriptor, SeriesId, SpectrumId,
};

fn sid(s: &str) -> SeriesId {
    SeriesId::from(s)
}

fn ms2_point(id: &str, x: f64, y: f64, spectrum: i64, scan: i64, mz: f64) -> Point {
    let mut p = Point::with_xy(sid(id), "x", x, "y", y);
    p.set(keys::PRECURSOR_MZ, mz);
    p.set(keys::SPECTRUM_ID, spectrum);
    p.set(keys::SCAN_ID, scan);
    p
}

/// Chromatogram-style chart with two series and one MS2 precursor in each.
fn fixture() -> (Vec<ChartState>, Palette) {
    let mut descriptors = BTreeMap::new();
    descriptors.insert(sid("a"), SeriesDescriptor::new("x", "y").with_sample("S1"));
    descriptors.insert(sid("b"), SeriesDescriptor::new("x", "y").with_sample("S2"));

    let points = vec![
        Point::with_xy(sid("a"), "x", 1.0, "y", 5.0),
        ms2_point("a", 2.0, 8.0, 100, 7, 301.1),
        Point::with_xy(sid("a"), "x", 3.0, "y", 4.0),
        ms2_point("b", 1.5, 6.0, 200, 9, 410.2),
    ];

    let decorate = |p: &mut Point| {
        if p.is_ms2_selectable() {
            p.set(keys::COLOR, "#B22222");
        }
    };
    let opts = BuildOptions { decorate: Some(&decorate), ..BuildOptions::default() };

    let mut palette = Palette::new();
    let (series, built) = build_series(&descriptors, &points, &mut palette, &opts).unwrap();

    let mut chart = ChartState::empty(ChartId::Chromatogram);
    chart.points = built;
    chart.series = series;
    chart.descriptors = descriptors;

    (vec![chart, ChartState::empty(ChartId::MassPeak)], palette)
}

fn ms2_indices(chart: &ChartState) -> Vec<usize> {
    chart
        .points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_ms2_selectable())
        .map(|(i, _)| i)
        .collect()
}

fn color_at(chart: &ChartState, index: usize) -> Option<FieldValue> {
    chart.points[index].get(keys::COLOR).cloned()
}

#[test]
fn plain_click_selects_and_dims_owning_chart() {
    let (mut charts, mut palette) = fixture();
    let idx = ms2_indices(&charts[0])[0];

    let mut event = ClickEvent::new(false);
    let mut sel = SelectionState::new();
    let outcome = sel
        .select(&mut event, ChartId::Chromatogram, idx, &mut palette, &mut charts)
        .unwrap();

    assert!(event.is_consumed());
    assert!(outcome.changed && !outcome.cleared);
    assert!(sel.is_active());
    assert_eq!(sel.entries().len(), 1);
    assert_eq!(sel.entries()[0].spectrum_id, SpectrumId(100));

    // Highlight replaced the decoration color.
    assert_ne!(color_at(&charts[0], idx), Some(FieldValue::from("#B22222")));
    // Every series of the clicked chart is dimmed.
    for s in &charts[0].series {
        assert_eq!(s.fill_alpha, 0.3);
        assert_eq!(s.line_alpha, 0.3);
    }
}

#[test]
fn modifier_toggle_restores_color_exactly() {
    let (mut charts, mut palette) = fixture();
    let idx = ms2_indices(&charts[0])[0];
    let before_points = charts[0].points.clone();
    let before_alphas: Vec<_> =
        charts[0].series.iter().map(|s| (s.fill_alpha, s.line_alpha)).collect();

    let mut sel = SelectionState::new();
    sel.select(&mut ClickEvent::new(true), ChartId::Chromatogram, idx, &mut palette, &mut charts)
        .unwrap();
    let outcome = sel
        .select(&mut ClickEvent::new(true), ChartId::Chromatogram, idx, &mut palette, &mut charts)
        .unwrap();

    // Toggling off the only entry is a full deselect.
    assert!(outcome.cleared && !outcome.changed);
    assert!(!sel.is_active());
    assert_eq!(charts[0].points, before_points);
    let after_alphas: Vec<_> =
        charts[0].series.iter().map(|s| (s.fill_alpha, s.line_alpha)).collect();
    assert_eq!(after_alphas, before_alphas);
}

#[test]
fn deselect_restores_everything_bit_for_bit() {
    let (mut charts, mut palette) = fixture();
    let idx = ms2_indices(&charts[0])[1];
    let before_points = charts[0].points.clone();
    let before_alphas: Vec<_> =
        charts[0].series.iter().map(|s| (s.fill_alpha, s.line_alpha)).collect();

    let mut sel = SelectionState::new();
    sel.select(&mut ClickEvent::new(false), ChartId::Chromatogram, idx, &mut palette, &mut charts)
        .unwrap();
    assert!(sel.deselect(&ClickEvent::new(false), &mut charts));

    assert!(!sel.is_active());
    assert_eq!(charts[0].points, before_points);
    let after_alphas: Vec<_> =
        charts[0].series.iter().map(|s| (s.fill_alpha, s.line_alpha)).collect();
    assert_eq!(after_alphas, before_alphas);

    // Deselecting again is a no-op.
    assert!(!sel.deselect(&ClickEvent::new(false), &mut charts));
}

#[test]
fn plain_click_replaces_whole_selection() {
    let (mut charts, mut palette) = fixture();
    let [p, q]: [usize; 2] = ms2_indices(&charts[0]).try_into().unwrap();

    let mut sel = SelectionState::new();
    sel.select(&mut ClickEvent::new(false), ChartId::Chromatogram, p, &mut palette, &mut charts)
        .unwrap();
    let outcome = sel
        .select(&mut ClickEvent::new(false), ChartId::Chromatogram, q, &mut palette, &mut charts)
        .unwrap();

    assert!(outcome.cleared && outcome.changed);
    assert_eq!(sel.entries().len(), 1);
    assert_eq!(sel.entries()[0].spectrum_id, SpectrumId(200));
    // The replaced point got its decoration color back.
    assert_eq!(color_at(&charts[0], p), Some(FieldValue::from("#B22222")));
}

#[test]
fn toggle_off_one_of_two_keeps_selection_active() {
    let (mut charts, mut palette) = fixture();
    let [p, q]: [usize; 2] = ms2_indices(&charts[0]).try_into().unwrap();

    let mut sel = SelectionState::new();
    sel.select(&mut ClickEvent::new(true), ChartId::Chromatogram, p, &mut palette, &mut charts)
        .unwrap();
    sel.select(&mut ClickEvent::new(true), ChartId::Chromatogram, q, &mut palette, &mut charts)
        .unwrap();
    assert_eq!(sel.entries().len(), 2);

    let outcome = sel
        .select(&mut ClickEvent::new(true), ChartId::Chromatogram, p, &mut palette, &mut charts)
        .unwrap();

    assert!(outcome.changed && !outcome.cleared);
    assert!(sel.is_active());
    assert_eq!(sel.entries().len(), 1);
    assert_eq!(sel.entries()[0].spectrum_id, SpectrumId(200));
    assert_eq!(color_at(&charts[0], p), Some(FieldValue::from("#B22222")));
    // Chart stays dimmed while the selection is non-empty.
    assert_eq!(charts[0].series[0].fill_alpha, 0.3);
}

#[test]
fn clicking_non_selectable_point_only_clears() {
    let (mut charts, mut palette) = fixture();
    let ms2 = ms2_indices(&charts[0])[0];
    let plain = charts[0]
        .points
        .iter()
        .position(|p| !p.synthetic && !p.is_ms2_selectable())
        .unwrap();

    let mut sel = SelectionState::new();
    sel.select(&mut ClickEvent::new(false), ChartId::Chromatogram, ms2, &mut palette, &mut charts)
        .unwrap();
    let outcome = sel
        .select(&mut ClickEvent::new(false), ChartId::Chromatogram, plain, &mut palette, &mut charts)
        .unwrap();

    assert!(outcome.cleared && !outcome.changed);
    assert!(!sel.is_active());
    assert!(sel.entries().is_empty());
}

#[test]
fn consumed_event_never_deselects() {
    let (mut charts, mut palette) = fixture();
    let idx = ms2_indices(&charts[0])[0];

    let mut sel = SelectionState::new();
    let mut click = ClickEvent::new(false);
    sel.select(&mut click, ChartId::Chromatogram, idx, &mut palette, &mut charts).unwrap();

    // The same gesture reaches the background handler with the flag set.
    assert!(!sel.deselect(&click, &mut charts));
    assert!(sel.is_active());

    // A genuine background click clears.
    assert!(sel.deselect(&ClickEvent::new(false), &mut charts));
    assert!(!sel.is_active());
}

#[test]
fn derived_request_carries_keys_in_selection_order() {
    let (mut charts, mut palette) = fixture();
    let [p, q]: [usize; 2] = ms2_indices(&charts[0]).try_into().unwrap();

    let mut sel = SelectionState::new();
    sel.select(&mut ClickEvent::new(true), ChartId::Chromatogram, q, &mut palette, &mut charts)
        .unwrap();
    let first = sel.derived_request();
    sel.select(&mut ClickEvent::new(true), ChartId::Chromatogram, p, &mut palette, &mut charts)
        .unwrap();
    let second = sel.derived_request();

    assert_eq!(first.keys, vec![SpectrumId(200)]);
    assert_eq!(second.keys, vec![SpectrumId(200), SpectrumId(100)]);
    // Each mutation supersedes the previous request.
    assert_ne!(first.generation, second.generation);
}

#[test]
fn restore_rolls_back_to_snapshot() {
    let (mut charts, mut palette) = fixture();
    let [p, q]: [usize; 2] = ms2_indices(&charts[0]).try_into().unwrap();

    let mut sel = SelectionState::new();
    sel.select(&mut ClickEvent::new(false), ChartId::Chromatogram, p, &mut palette, &mut charts)
        .unwrap();
    let snapshot = sel.snapshot();
    let p_color = color_at(&charts[0], p);

    sel.select(&mut ClickEvent::new(true), ChartId::Chromatogram, q, &mut palette, &mut charts)
        .unwrap();
    let pending = sel.derived_request();
    sel.restore(snapshot, &mut charts);

    assert!(sel.is_active());
    assert_eq!(sel.entries().len(), 1);
    assert_eq!(sel.entries()[0].spectrum_id, SpectrumId(100));
    // q reverted, p re-highlighted with its original slot color.
    assert_eq!(color_at(&charts[0], q), Some(FieldValue::from("#B22222")));
    assert_eq!(color_at(&charts[0], p), p_color);
    // The failed request's result must be discarded.
    assert_ne!(pending.generation, sel.generation());
}

#[test]
fn highlight_color_matches_selection_entry() {
    let (mut charts, mut palette) = fixture();
    let idx = ms2_indices(&charts[0])[0];

    let mut sel = SelectionState::new();
    sel.select(&mut ClickEvent::new(false), ChartId::Chromatogram, idx, &mut palette, &mut charts)
        .unwrap();

    let entry = &sel.entries()[0];
    assert_eq!(color_at(&charts[0], idx), Some(FieldValue::from(entry.color.to_string())));
}
