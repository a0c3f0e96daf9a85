// File: crates/mzchart-core/src/point.rs
// Summary: Flat field-map point model shared by the chromatogram and mass-peak charts.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::descriptor::{SeriesId, SpectrumId};

/// Well-known field keys carried by points. Components must treat any other
/// key as opaque; axis fields are always resolved through the series
/// descriptor, never guessed from key names.
pub mod keys {
    pub const PRECURSOR_MZ: &str = "precursor_mz";
    pub const SPECTRUM_ID: &str = "spectrum_id";
    pub const SCAN_ID: &str = "scan_id";
    pub const BULLET: &str = "bullet";
    pub const BULLET_SIZE: &str = "bullet_size";
    pub const COLOR: &str = "color";
}

/// A single stored field value. Numbers and text cover everything the charts
/// carry; integer ids keep their exact value instead of round-tripping
/// through f64.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Int(i64),
    Text(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Int(v) => Some(*v as f64),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self { FieldValue::Number(v) }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self { FieldValue::Int(v) }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self { FieldValue::Text(v.to_string()) }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self { FieldValue::Text(v) }
}

/// One data point: a mapping from field name to value, tagged with the series
/// it belongs to. `synthetic` marks ground points injected by the series
/// builder (and points excluded from processing by decoration), as opposed to
/// points supplied by the data provider.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub series_id: SeriesId,
    pub fields: BTreeMap<String, FieldValue>,
    pub synthetic: bool,
}

impl Point {
    pub fn new(series_id: SeriesId) -> Self {
        Self { series_id, fields: BTreeMap::new(), synthetic: false }
    }

    /// Convenience constructor for a real point with x/y values under the
    /// given field names.
    pub fn with_xy(series_id: SeriesId, x_field: &str, x: f64, y_field: &str, y: f64) -> Self {
        let mut p = Self::new(series_id);
        p.set(x_field, x);
        p.set(y_field, y);
        p
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(FieldValue::as_number)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.remove(key)
    }

    /// A point carrying the precursor marker is eligible to drive the derived
    /// fragmentation-spectrum view.
    pub fn is_ms2_selectable(&self) -> bool {
        self.fields.contains_key(keys::PRECURSOR_MZ)
    }

    pub fn precursor_mz(&self) -> Option<f64> {
        self.number(keys::PRECURSOR_MZ)
    }

    pub fn spectrum_id(&self) -> Option<SpectrumId> {
        self.fields
            .get(keys::SPECTRUM_ID)
            .and_then(FieldValue::as_int)
            .map(|v| SpectrumId(v as u64))
    }

    pub fn scan_id(&self) -> Option<i64> {
        self.fields.get(keys::SCAN_ID).and_then(FieldValue::as_int)
    }
}
