// File: crates/mzchart-core/src/descriptor.rs
// Summary: Series descriptors: axis-field bindings, sample metadata, feature ranges.

use std::fmt;

use crate::palette::Color;

/// Identifies one logical series (one sample/feature trace, or one derived
/// fragmentation spectrum). Every point carries one of these.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesId(pub String);

impl SeriesId {
    /// Id for a sample/feature pair, as used by the chromatogram and the
    /// MS1 mass-peak chart.
    pub fn feature(sample_id: u64, feature_id: u64) -> Self {
        SeriesId(format!("{sample_id}_{feature_id}"))
    }

    /// Id for a derived fragmentation-spectrum series.
    pub fn spectrum(id: SpectrumId) -> Self {
        SeriesId(id.0.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SeriesId {
    fn from(s: &str) -> Self { SeriesId(s.to_string()) }
}

/// Key of a stored fragmentation spectrum; the selection hands sets of these
/// to the data provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpectrumId(pub u64);

impl fmt::Display for SpectrumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Per-series metadata: which point fields hold the independent/dependent
/// values, what to show in the legend, and (for chromatogram series) the
/// feature retention-time range used for guides.
///
/// Invariant: every point's `series_id` must resolve to exactly one
/// descriptor; the series builder aborts otherwise.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesDescriptor {
    pub x_field: String,
    pub y_field: String,
    pub sample_name: Option<String>,
    pub consensus_mz: Option<f64>,
    pub scan_id: Option<i64>,
    pub compound_ids: Vec<String>,
    pub feature_range: Option<(f64, f64)>,
    pub color: Option<Color>,
}

impl SeriesDescriptor {
    pub fn new(x_field: impl Into<String>, y_field: impl Into<String>) -> Self {
        Self {
            x_field: x_field.into(),
            y_field: y_field.into(),
            sample_name: None,
            consensus_mz: None,
            scan_id: None,
            compound_ids: Vec::new(),
            feature_range: None,
            color: None,
        }
    }

    pub fn with_sample(mut self, name: impl Into<String>) -> Self {
        self.sample_name = Some(name.into());
        self
    }

    pub fn with_consensus_mz(mut self, mz: f64) -> Self {
        self.consensus_mz = Some(mz);
        self
    }

    pub fn with_scan_id(mut self, scan_id: i64) -> Self {
        self.scan_id = Some(scan_id);
        self
    }

    pub fn with_compounds(mut self, ids: Vec<String>) -> Self {
        self.compound_ids = ids;
        self
    }

    pub fn with_feature_range(mut self, start: f64, end: f64) -> Self {
        self.feature_range = Some((start, end));
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Default legend title. Scan id wins over consensus m/z so derived
    /// spectra read "Sample: …; Scan ID: …" while MS1-level series read
    /// "Sample: …; Consensus m/z: …".
    pub fn default_title(&self) -> String {
        let mut parts = Vec::new();
        if let Some(name) = &self.sample_name {
            parts.push(format!("Sample: {name}"));
        }
        if let Some(scan_id) = self.scan_id {
            parts.push(format!("Scan ID: {scan_id}"));
        } else if let Some(mz) = self.consensus_mz {
            parts.push(format!("Consensus m/z: {mz:.4}"));
        }
        if !self.compound_ids.is_empty() {
            parts.push(format!("Compounds: {}", self.compound_ids.join(", ")));
        }
        if parts.is_empty() {
            return self.y_field.clone();
        }
        parts.join("; ")
    }
}
