use serde::Serialize;

use crate::axis::AxisCatalog;
use crate::enumerate::DatasetView;
use crate::error::ExploreError;

use super::filter::ViewFilters;
use super::model::{resolve_axis_value, AxisValue, RawRecord, ValueType};
use super::window::ViewWindows;

// ---------------------------------------------------------------------------
// ProjectedRecord – one raw record seen through a view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedRecord {
    /// Position of the record in the raw data.
    pub original_index: usize,
    /// `(axis name, value)` for every axis of the view, in view order.
    pub values: Vec<(String, AxisValue)>,
    /// The full original record, for display collaborators.
    pub source: RawRecord,
}

impl ProjectedRecord {
    pub fn value(&self, axis: &str) -> Option<&AxisValue> {
        self.values
            .iter()
            .find(|(name, _)| name == axis)
            .map(|(_, v)| v)
    }

    pub fn number(&self, axis: &str) -> Option<f64> {
        self.value(axis)?.as_f64()
    }

    pub fn describe(&self) -> String {
        self.source.describe()
    }
}

/// Result of projecting a record set onto a view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Projection {
    pub records: Vec<ProjectedRecord>,
    /// Records dropped as malformed.
    pub dropped: usize,
}

impl Projection {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether there are more records than the tightest window allows a
    /// renderer to draw. Always `false` without windows.
    pub fn exceeds_display_limit(&self, windows: &ViewWindows) -> bool {
        windows
            .values()
            .map(|w| w.max_display_count)
            .min()
            .is_some_and(|limit| self.records.len() > limit)
    }
}

// ---------------------------------------------------------------------------
// DataProjector
// ---------------------------------------------------------------------------

/// Projects raw records onto dataset views, applying filters and windows.
///
/// Projection is a pure function of its arguments; the filter and window
/// maps belong to the caller.
#[derive(Debug, Clone, Copy)]
pub struct DataProjector<'a> {
    catalog: &'a AxisCatalog,
    value_type: ValueType,
}

/// Why a record did not make it into a projection.
enum Rejection {
    Filtered,
    Malformed(ExploreError),
}

impl<'a> DataProjector<'a> {
    pub fn new(catalog: &'a AxisCatalog, value_type: ValueType) -> Self {
        Self {
            catalog,
            value_type,
        }
    }

    /// Project `records` onto `view`.
    ///
    /// 1. every view axis is resolved on the record,
    /// 2. active filters on axes outside the view must all pass,
    /// 3. if `windows` is given, every windowed non-string view axis must
    ///    fall in its half-open window.
    ///
    /// Records that do not match the declared value type, or that lack a
    /// value for a resolved axis, are dropped and counted.
    pub fn project(
        &self,
        view: &DatasetView,
        records: &[RawRecord],
        filters: &ViewFilters,
        windows: Option<&ViewWindows>,
    ) -> Projection {
        let mut projection = Projection::default();

        for (index, record) in records.iter().enumerate() {
            match self.project_one(view, index, record, filters, windows) {
                Ok(projected) => projection.records.push(projected),
                Err(Rejection::Filtered) => {}
                Err(Rejection::Malformed(err)) => {
                    log::debug!("dropping record from '{}': {err}", view.name);
                    projection.dropped += 1;
                }
            }
        }

        if projection.dropped > 0 {
            log::warn!(
                "{} malformed record(s) dropped while projecting '{}'",
                projection.dropped,
                view.name
            );
        }
        projection
    }

    fn project_one(
        &self,
        view: &DatasetView,
        index: usize,
        record: &RawRecord,
        filters: &ViewFilters,
        windows: Option<&ViewWindows>,
    ) -> Result<ProjectedRecord, Rejection> {
        record
            .check(self.value_type, index)
            .map_err(Rejection::Malformed)?;

        let mut values = Vec::with_capacity(view.axes.len());
        for axis in &view.axes {
            let value = resolve_axis_value(axis, record)
                .ok_or_else(|| missing(index, &axis.name))?;
            values.push((axis.name.clone(), value));
        }

        for (name, filter) in filters {
            if !filter.is_active() || view.uses_axis(name) {
                continue;
            }
            let Some(axis) = self.catalog.find(name) else {
                continue;
            };
            let value = resolve_axis_value(axis, record).ok_or_else(|| missing(index, name))?;
            if let AxisValue::Number(v) = value {
                if !filter.admits(v) {
                    return Err(Rejection::Filtered);
                }
            }
        }

        if let Some(windows) = windows {
            for (axis, (_, value)) in view.axes.iter().zip(&values) {
                if axis.is_string() {
                    continue;
                }
                let (Some(window), Some(v)) = (windows.get(&axis.name), value.as_f64()) else {
                    continue;
                };
                if !window.contains(v) {
                    return Err(Rejection::Filtered);
                }
            }
        }

        Ok(ProjectedRecord {
            original_index: index,
            values,
            source: record.clone(),
        })
    }
}

fn missing(index: usize, axis: &str) -> Rejection {
    Rejection::Malformed(ExploreError::MalformedRecord {
        index,
        reason: format!("no value for axis '{axis}'"),
    })
}
