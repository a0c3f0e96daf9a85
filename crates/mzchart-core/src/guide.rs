// File: crates/mzchart-core/src/guide.rs
// Summary: Shaded range guides derived from series feature start/end metadata.

use std::collections::BTreeMap;

use crate::descriptor::{SeriesDescriptor, SeriesId};
use crate::palette::Color;
use crate::series::Series;

/// A static shaded range overlay on the category axis, one per series,
/// colored to match it. Legend toggling flips `visible` instead of removing
/// the guide.
#[derive(Clone, Debug)]
pub struct Guide {
    pub series: SeriesId,
    pub start: f64,
    pub end: f64,
    pub color: Color,
    pub visible: bool,
}

/// One guide per series whose descriptor carries a feature range. Series
/// without a range (mass-peak and derived-spectrum series) get none. Pure
/// derivation; neither series nor points are touched.
pub fn build_guides(
    series: &[Series],
    descriptors: &BTreeMap<SeriesId, SeriesDescriptor>,
) -> Vec<Guide> {
    series
        .iter()
        .filter_map(|s| {
            let (start, end) = descriptors.get(&s.id)?.feature_range?;
            Some(Guide { series: s.id.clone(), start, end, color: s.color, visible: true })
        })
        .collect()
}
