//! Dataset shape analysis and the dimensionalities a shape supports.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::data::model::{RawRecord, RecordValue};
use crate::error::{ExploreError, ExploreResult};

pub use crate::data::model::ValueType;

/// Shape parameters derived from a sample record.
///
/// `j` input coordinates and `k` raw outputs (the label counts as one when
/// present). `n = j`, `m` excludes the label, `total_dim = n + m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetShape {
    pub value_type: ValueType,
    pub j: usize,
    pub k: usize,
    pub n: usize,
    pub m: usize,
    pub total_dim: usize,
    pub has_string: bool,
}

impl DatasetShape {
    pub fn new(value_type: ValueType, j: usize, k: usize) -> Self {
        let has_string = value_type.has_string();
        let m = if has_string { k.saturating_sub(1) } else { k };
        Self {
            value_type,
            j,
            k,
            n: j,
            m,
            total_dim: j + m,
            has_string,
        }
    }
}

/// Derive the dataset shape from a sample record and the declared value type.
pub fn analyze(value_type: ValueType, sample: &RawRecord) -> ExploreResult<DatasetShape> {
    let j = sample.coords.len();
    let k = match (&sample.value, value_type) {
        (RecordValue::Double(_), ValueType::Double) => 1,
        (RecordValue::Array(a), ValueType::Array) => a.len(),
        (RecordValue::StringDouble(..), ValueType::StringDouble) => 2,
        (RecordValue::StringArray(_, a), ValueType::StringArray) => 1 + a.len(),
        (other, _) => {
            return Err(ExploreError::config(format!(
                "sample value {other} does not match declared value type {value_type}"
            )))
        }
    };
    let shape = DatasetShape::new(value_type, j, k);
    log::debug!(
        "analyzed shape: j={} k={} n={} m={} total={} string={}",
        shape.j,
        shape.k,
        shape.n,
        shape.m,
        shape.total_dim,
        shape.has_string
    );
    Ok(shape)
}

/// Target dimensionalities (1..=4) that may be requested for `shape`.
///
/// Empty when the shape has fewer than two axes besides the label.
pub fn available_dimensions(shape: &DatasetShape) -> BTreeSet<usize> {
    let upper = match (shape.has_string, shape.total_dim) {
        (_, 0 | 1) => 0,
        (false, 2) => 2,
        (false, 3) => 3,
        (true, 2) => 3,
        _ => 4,
    };
    (1..=upper).collect()
}

/// Like [`available_dimensions`], but an empty set is a configuration error.
pub fn checked_dimensions(shape: &DatasetShape) -> ExploreResult<BTreeSet<usize>> {
    let dims = available_dimensions(shape);
    if dims.is_empty() {
        return Err(ExploreError::config(format!(
            "insufficient dimensionality: n + m = {} (need at least 2)",
            shape.total_dim
        )));
    }
    Ok(dims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: &str) -> RawRecord {
        serde_json::from_str(json).unwrap()
    }

    fn dims(has_string: bool, total_dim: usize) -> Vec<usize> {
        let value_type = if has_string {
            ValueType::StringArray
        } else {
            ValueType::Array
        };
        let shape = DatasetShape {
            value_type,
            j: total_dim,
            k: usize::from(has_string),
            n: total_dim,
            m: 0,
            total_dim,
            has_string,
        };
        available_dimensions(&shape).into_iter().collect()
    }

    #[test]
    fn test_analyze_each_value_type() {
        let s = analyze(ValueType::Double, &record("[[0, 1], 5]")).unwrap();
        assert_eq!((s.j, s.k, s.n, s.m, s.total_dim, s.has_string), (2, 1, 2, 1, 3, false));

        let s = analyze(ValueType::Array, &record("[[0], [1, 2, 3]]")).unwrap();
        assert_eq!((s.k, s.m, s.total_dim), (3, 3, 4));

        let s = analyze(ValueType::StringDouble, &record(r#"[[0], ["a", 1]]"#)).unwrap();
        assert_eq!((s.k, s.m, s.total_dim, s.has_string), (2, 1, 2, true));

        let s = analyze(ValueType::StringArray, &record(r#"[[0, 1], ["a", [1, 2]]]"#)).unwrap();
        assert_eq!((s.j, s.k, s.m, s.total_dim), (2, 3, 2, 4));
    }

    #[test]
    fn test_analyze_rejects_mismatched_sample() {
        let err = analyze(ValueType::Double, &record("[[0], [1, 2]]")).unwrap_err();
        assert!(matches!(err, ExploreError::Configuration(_)));
    }

    #[test]
    fn test_available_dimensions_without_string() {
        assert!(dims(false, 1).is_empty());
        assert_eq!(dims(false, 2), vec![1, 2]);
        assert_eq!(dims(false, 3), vec![1, 2, 3]);
        assert_eq!(dims(false, 4), vec![1, 2, 3, 4]);
        assert_eq!(dims(false, 7), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_available_dimensions_with_string() {
        assert!(dims(true, 1).is_empty());
        assert_eq!(dims(true, 2), vec![1, 2, 3]);
        assert_eq!(dims(true, 3), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_checked_dimensions() {
        let shape = DatasetShape::new(ValueType::Double, 0, 1);
        assert!(checked_dimensions(&shape).is_err());

        let shape = DatasetShape::new(ValueType::Double, 1, 1);
        assert_eq!(checked_dimensions(&shape).unwrap().len(), 2);
    }
}
