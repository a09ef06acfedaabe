use std::fmt;

use serde::{Deserialize, Serialize};

use crate::axis::{AxisDescriptor, AxisKind};
use crate::error::{ExploreError, ExploreResult};

// ---------------------------------------------------------------------------
// ValueType – declared shape of every record's output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// A single number.
    Double,
    /// An array of numbers.
    Array,
    /// `[label, number]`
    StringDouble,
    /// `[label, [numbers...]]`
    StringArray,
}

impl ValueType {
    pub fn has_string(self) -> bool {
        matches!(self, ValueType::StringDouble | ValueType::StringArray)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ValueType::Double => "double",
            ValueType::Array => "array",
            ValueType::StringDouble => "string_double",
            ValueType::StringArray => "string_array",
        };
        write!(f, "{tag}")
    }
}

// ---------------------------------------------------------------------------
// RecordValue – the output half of a raw record
// ---------------------------------------------------------------------------

/// Output of one raw record, in whichever of the four shapes it arrived.
///
/// Anything else is kept as [`RecordValue::Malformed`] so that a single bad
/// record does not reject the whole blob; projection drops it later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordValue {
    Double(f64),
    Array(Vec<f64>),
    StringDouble(String, f64),
    StringArray(String, Vec<f64>),
    Malformed(serde_json::Value),
}

impl RecordValue {
    /// The value type this value conforms to, if any.
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            RecordValue::Double(_) => Some(ValueType::Double),
            RecordValue::Array(_) => Some(ValueType::Array),
            RecordValue::StringDouble(..) => Some(ValueType::StringDouble),
            RecordValue::StringArray(..) => Some(ValueType::StringArray),
            RecordValue::Malformed(_) => None,
        }
    }

    /// Categorical label of a string-bearing value.
    pub fn label(&self) -> Option<&str> {
        match self {
            RecordValue::StringDouble(s, _) | RecordValue::StringArray(s, _) => Some(s),
            _ => None,
        }
    }

    /// Numeric output at `index`. Scalar outputs answer every index with
    /// the scalar itself.
    pub fn numeric(&self, index: usize) -> Option<f64> {
        match self {
            RecordValue::Double(v) | RecordValue::StringDouble(_, v) => Some(*v),
            RecordValue::Array(a) | RecordValue::StringArray(_, a) => a.get(index).copied(),
            RecordValue::Malformed(_) => None,
        }
    }
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordValue::Double(v) => write!(f, "{v}"),
            RecordValue::Array(a) => write!(f, "[{}]", join_numbers(a)),
            RecordValue::StringDouble(s, v) => write!(f, "\"{s}\", {v}"),
            RecordValue::StringArray(s, a) => write!(f, "\"{s}\", [{}]", join_numbers(a)),
            RecordValue::Malformed(v) => write!(f, "{v}"),
        }
    }
}

fn join_numbers(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// RawRecord – one `[coords, value]` pair of the blob
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(Vec<f64>, RecordValue)", into = "(Vec<f64>, RecordValue)")]
pub struct RawRecord {
    pub coords: Vec<f64>,
    pub value: RecordValue,
}

impl RawRecord {
    pub fn new(coords: Vec<f64>, value: RecordValue) -> Self {
        Self { coords, value }
    }

    /// Reject a record whose value does not have the declared shape.
    pub fn check(&self, declared: ValueType, index: usize) -> ExploreResult<()> {
        match self.value.value_type() {
            Some(actual) if actual == declared => Ok(()),
            Some(actual) => Err(ExploreError::MalformedRecord {
                index,
                reason: format!("expected {declared} value, found {actual}"),
            }),
            None => Err(ExploreError::MalformedRecord {
                index,
                reason: format!("unrecognised value {}", self.value),
            }),
        }
    }

    /// `input: [..]` / `output: ..` summary used by tooltips.
    pub fn describe(&self) -> String {
        format!("input: [{}]\noutput: {}", join_numbers(&self.coords), self.value)
    }
}

impl From<(Vec<f64>, RecordValue)> for RawRecord {
    fn from((coords, value): (Vec<f64>, RecordValue)) -> Self {
        Self { coords, value }
    }
}

impl From<RawRecord> for (Vec<f64>, RecordValue) {
    fn from(record: RawRecord) -> Self {
        (record.coords, record.value)
    }
}

// ---------------------------------------------------------------------------
// AxisValue – the value of one axis on one record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    Number(f64),
    Text(String),
}

impl AxisValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AxisValue::Number(v) => Some(*v),
            AxisValue::Text(_) => None,
        }
    }
}

impl fmt::Display for AxisValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisValue::Number(v) => write!(f, "{v}"),
            AxisValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Read `axis` off `record`.
///
/// This is the one place that knows how input, output and string axes map
/// onto a record; filtering, projection and range scans all go through it.
/// Returns `None` when the record has no value for the axis.
pub fn resolve_axis_value(axis: &AxisDescriptor, record: &RawRecord) -> Option<AxisValue> {
    match axis.kind {
        AxisKind::Input => record
            .coords
            .get(axis.slot()?)
            .copied()
            .map(AxisValue::Number),
        AxisKind::Output => record.value.numeric(axis.slot()?).map(AxisValue::Number),
        AxisKind::String => record
            .value
            .label()
            .map(|s| AxisValue::Text(s.to_string())),
    }
}

/// Observed numeric `(min, max)` of `axis` over `records`, ignoring NaN and
/// records without a value for it.
pub fn axis_range(axis: &AxisDescriptor, records: &[RawRecord]) -> Option<(f64, f64)> {
    records
        .iter()
        .filter_map(|r| resolve_axis_value(axis, r)?.as_f64())
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        })
}

// ---------------------------------------------------------------------------
// DataBlob – the persisted dataset exchanged with the host
// ---------------------------------------------------------------------------

/// Declared metadata of one input axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisInfo {
    pub name: String,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub interval: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicData {
    #[serde(default)]
    pub axes: Vec<AxisInfo>,
    pub value_type: ValueType,
}

/// `{ basic_data: { axes, value_type }, data_value: [[coords, value], ...] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataBlob {
    pub basic_data: BasicData,
    #[serde(default)]
    pub data_value: Vec<RawRecord>,
}

impl DataBlob {
    pub fn value_type(&self) -> ValueType {
        self.basic_data.value_type
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.data_value
    }

    /// Declared input axis names, in order.
    pub fn declared_names(&self) -> Vec<String> {
        self.basic_data.axes.iter().map(|a| a.name.clone()).collect()
    }

    /// Declared metadata of the axis called `name`.
    pub fn axis_info(&self, name: &str) -> Option<&AxisInfo> {
        self.basic_data.axes.iter().find(|a| a.name == name)
    }

    pub fn len(&self) -> usize {
        self.data_value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data_value.is_empty()
    }
}
