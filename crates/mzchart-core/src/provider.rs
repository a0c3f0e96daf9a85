// File: crates/mzchart-core/src/provider.rs
// Summary: Data-provider boundary: arrival payloads and the derived-spectra contract.

use std::collections::BTreeMap;

use crate::descriptor::{SeriesDescriptor, SeriesId, SpectrumId};
use crate::error::ChartError;
use crate::point::Point;

/// Everything the provider hands over when the feature selection changes:
/// chromatogram (XIC) and MS1 mass-peak datasets, each a descriptor map plus
/// one flat point sequence.
#[derive(Clone, Debug, Default)]
pub struct PlotData {
    pub xic_descriptors: BTreeMap<SeriesId, SeriesDescriptor>,
    pub xic_points: Vec<Point>,
    pub ms1_descriptors: BTreeMap<SeriesId, SeriesDescriptor>,
    pub ms1_points: Vec<Point>,
}

/// Fragmentation spectra resolved for a selection key set.
#[derive(Clone, Debug, Default)]
pub struct SpectraData {
    pub descriptors: BTreeMap<SeriesId, SeriesDescriptor>,
    pub points: Vec<Point>,
}

/// Resolves selected spectrum keys to fragmentation spectra. Must be a pure
/// function of the key set: same keys, same result, regardless of order —
/// selection toggling relies on that.
pub trait DataProvider {
    fn derived_spectra(&self, keys: &[SpectrumId]) -> Result<SpectraData, ChartError>;
}
