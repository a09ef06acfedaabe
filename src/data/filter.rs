use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::axis::AxisCatalog;
use crate::enumerate::{DatasetView, ViewId};

use super::model::{axis_range, RawRecord};

/// Tolerance of the `=` filter mode.
pub const EQ_TOLERANCE: f64 = 1e-4;

/// Observed range assumed for an axis without any numeric value.
const FALLBACK_RANGE: (f64, f64) = (0.0, 100.0);

// ---------------------------------------------------------------------------
// Filter predicate on a single unused axis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterMode {
    /// No restriction.
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<=")]
    Lte,
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            FilterMode::All => "all",
            FilterMode::Gte => ">=",
            FilterMode::Eq => "=",
            FilterMode::Lte => "<=",
        };
        write!(f, "{symbol}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisFilter {
    pub mode: FilterMode,
    pub threshold: f64,
    pub observed_min: f64,
    pub observed_max: f64,
}

impl AxisFilter {
    /// An inactive filter over `[min, max]` with the threshold at the midpoint.
    pub fn new(observed_min: f64, observed_max: f64) -> Self {
        Self {
            mode: FilterMode::All,
            threshold: (observed_min + observed_max) / 2.0,
            observed_min,
            observed_max,
        }
    }

    pub fn is_active(&self) -> bool {
        self.mode != FilterMode::All
    }

    /// Set the threshold, clamped to the observed range. NaN is ignored.
    /// An inverted range clamps to `observed_max`.
    pub fn set_threshold(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        self.threshold = value.max(self.observed_min).min(self.observed_max);
    }

    /// Whether a record with `value` on this axis passes the filter.
    pub fn admits(&self, value: f64) -> bool {
        match self.mode {
            FilterMode::All => true,
            FilterMode::Gte => value >= self.threshold,
            FilterMode::Eq => (value - self.threshold).abs() <= EQ_TOLERANCE,
            FilterMode::Lte => value <= self.threshold,
        }
    }
}

// ---------------------------------------------------------------------------
// FilterState: view id → axis name → filter
// ---------------------------------------------------------------------------

/// Filters of one view, keyed by axis name.
pub type ViewFilters = BTreeMap<String, AxisFilter>;

/// Filters of every view. Owned by the caller and injected into projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    views: BTreeMap<ViewId, ViewFilters>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self, id: ViewId) -> Option<&ViewFilters> {
        self.views.get(&id)
    }

    pub fn get_mut(&mut self, id: ViewId, axis: &str) -> Option<&mut AxisFilter> {
        self.views.get_mut(&id)?.get_mut(axis)
    }

    pub fn insert_view(&mut self, id: ViewId, filters: ViewFilters) {
        self.views.insert(id, filters);
    }
}

/// Build the inactive filters of `view`: one per unused, non-string axis,
/// with the range observed in `records`.
pub fn init_view_filters(view: &DatasetView, catalog: &AxisCatalog, records: &[RawRecord]) -> ViewFilters {
    view.unused_axes(catalog)
        .into_iter()
        .filter(|axis| !axis.is_string())
        .map(|axis| {
            let (min, max) = axis_range(axis, records).unwrap_or(FALLBACK_RANGE);
            (axis.name.clone(), AxisFilter::new(min, max))
        })
        .collect()
}

/// Initialise a [`FilterState`] for every view, all filters inactive.
pub fn init_filter_state(views: &[DatasetView], catalog: &AxisCatalog, records: &[RawRecord]) -> FilterState {
    let mut state = FilterState::new();
    for view in views {
        state.insert_view(view.id, init_view_filters(view, catalog, records));
    }
    state
}
