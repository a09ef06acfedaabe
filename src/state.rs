use std::collections::{BTreeMap, BTreeSet};

use crate::advisor::{analyze, available_dimensions, checked_dimensions, DatasetShape};
use crate::axis::AxisCatalog;
use crate::data::filter::{init_filter_state, AxisFilter, FilterMode, FilterState, ViewFilters};
use crate::data::model::DataBlob;
use crate::data::project::{DataProjector, Projection};
use crate::data::window::{AxisWindow, Direction, Resize, ViewWindows, WindowState};
use crate::encoding::EncodingKind;
use crate::enumerate::{enumerate, DatasetView, ViewId};
use crate::error::{ExploreError, ExploreResult};

// ---------------------------------------------------------------------------
// Explorer session
// ---------------------------------------------------------------------------

/// The full exploration state, independent of rendering.
///
/// Owns the loaded blob, the enumerated views of the selected
/// dimensionality and the per-view filter and window maps that projection
/// reads.
#[derive(Debug, Clone)]
pub struct Explorer {
    blob: DataBlob,
    shape: DatasetShape,
    catalog: AxisCatalog,

    /// Selected dimensionality (None until the user picks one).
    dimension: Option<usize>,

    /// Views of the selected dimensionality.
    views: Vec<DatasetView>,

    /// Index into each view's encoding list.
    active_encodings: BTreeMap<ViewId, usize>,

    filters: FilterState,
    windows: WindowState,
}

impl Explorer {
    /// Ingest a loaded blob. The first record is the shape sample.
    pub fn from_blob(blob: DataBlob) -> ExploreResult<Self> {
        let sample = blob
            .records()
            .first()
            .ok_or_else(|| ExploreError::config("dataset has no records"))?;
        let shape = analyze(blob.value_type(), sample)?;
        let catalog = AxisCatalog::build(shape.j, shape.m, shape.has_string, &blob.declared_names())?;

        log::info!(
            "explorer ready: {} records, {} axes, total dimension {}",
            blob.len(),
            catalog.len(),
            shape.total_dim
        );

        Ok(Self {
            blob,
            shape,
            catalog,
            dimension: None,
            views: Vec::new(),
            active_encodings: BTreeMap::new(),
            filters: FilterState::new(),
            windows: WindowState::new(),
        })
    }

    pub fn blob(&self) -> &DataBlob {
        &self.blob
    }

    pub fn shape(&self) -> &DatasetShape {
        &self.shape
    }

    pub fn catalog(&self) -> &AxisCatalog {
        &self.catalog
    }

    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn views(&self) -> &[DatasetView] {
        &self.views
    }

    pub fn view(&self, id: ViewId) -> ExploreResult<&DatasetView> {
        self.views.get(id).ok_or(ExploreError::UnknownView(id))
    }

    /// Dimensionalities the dataset supports.
    pub fn available_dimensions(&self) -> BTreeSet<usize> {
        available_dimensions(&self.shape)
    }

    /// Enumerate the views of `dimension` and reset every filter and window.
    pub fn select_dimension(&mut self, dimension: usize) -> ExploreResult<&[DatasetView]> {
        let supported = checked_dimensions(&self.shape)?;
        if !supported.contains(&dimension) {
            return Err(ExploreError::config(format!(
                "dimension {dimension} is not available (supported: {supported:?})"
            )));
        }

        let views = enumerate(dimension, &self.shape, &self.catalog);
        if views.is_empty() {
            return Err(ExploreError::config(format!(
                "no dataset view of dimension {dimension} for this shape"
            )));
        }

        self.filters = init_filter_state(&views, &self.catalog, self.blob.records());
        self.windows.clear();
        self.active_encodings.clear();
        self.views = views;
        self.dimension = Some(dimension);

        for id in 0..self.views.len() {
            self.activate(id, 0);
        }

        log::info!("selected dimension {dimension}: {} views", self.views.len());
        Ok(&self.views)
    }

    // -- encodings --------------------------------------------------------

    pub fn active_encoding(&self, view: ViewId) -> ExploreResult<EncodingKind> {
        let v = self.view(view)?;
        let index = self.active_encodings.get(&view).copied().unwrap_or(0);
        v.encoding(index)
            .ok_or_else(|| ExploreError::config(format!("view '{}' has no encodings", v.name)))
    }

    /// Switch the encoding a view is drawn with. Windows follow the axes
    /// the new encoding positions; windows that survive keep their range.
    pub fn set_active_encoding(&mut self, view: ViewId, index: usize) -> ExploreResult<EncodingKind> {
        let v = self.view(view)?;
        let kind = v.encoding(index).ok_or_else(|| {
            ExploreError::config(format!("view '{}' has no encoding #{index}", v.name))
        })?;
        self.activate(view, index);
        log::debug!("view {view}: encoding -> {kind}");
        Ok(kind)
    }

    fn activate(&mut self, id: ViewId, index: usize) {
        let Some(view) = self.views.get(id) else {
            return;
        };
        self.active_encodings.insert(id, index);
        let used: Vec<&str> = match view.encoding(index) {
            Some(kind) => kind
                .windowed_axes(&view.axes)
                .into_iter()
                .map(|a| a.name.as_str())
                .collect(),
            None => Vec::new(),
        };
        self.windows.sync_view(view, &used, &self.blob);
    }

    // -- filters ----------------------------------------------------------

    pub fn filters(&self, view: ViewId) -> ExploreResult<&ViewFilters> {
        self.view(view)?;
        self.filters.view(view).ok_or(ExploreError::UnknownView(view))
    }

    fn filter_mut(&mut self, view: ViewId, axis: &str) -> ExploreResult<&mut AxisFilter> {
        self.view(view)?;
        self.filters
            .get_mut(view, axis)
            .ok_or_else(|| ExploreError::UnknownAxis {
                view,
                axis: axis.to_string(),
                state: "filter",
            })
    }

    pub fn set_filter_mode(&mut self, view: ViewId, axis: &str, mode: FilterMode) -> ExploreResult<()> {
        self.filter_mut(view, axis)?.mode = mode;
        log::debug!("view {view}: filter {axis} mode -> {mode}");
        Ok(())
    }

    /// Set a filter threshold; returns the value actually stored after
    /// clamping to the observed range.
    pub fn set_filter_threshold(&mut self, view: ViewId, axis: &str, value: f64) -> ExploreResult<f64> {
        let filter = self.filter_mut(view, axis)?;
        filter.set_threshold(value);
        let stored = filter.threshold;
        log::debug!("view {view}: filter {axis} threshold -> {stored}");
        Ok(stored)
    }

    // -- windows ----------------------------------------------------------

    pub fn windows(&self, view: ViewId) -> ExploreResult<&ViewWindows> {
        self.view(view)?;
        self.windows.view(view).ok_or(ExploreError::UnknownView(view))
    }

    fn window_mut(&mut self, view: ViewId, axis: &str) -> ExploreResult<&mut AxisWindow> {
        self.view(view)?;
        self.windows
            .get_mut(view, axis)
            .ok_or_else(|| ExploreError::UnknownAxis {
                view,
                axis: axis.to_string(),
                state: "window",
            })
    }

    pub fn move_window(&mut self, view: ViewId, axis: &str, direction: Direction) -> ExploreResult<()> {
        let window = self.window_mut(view, axis)?;
        if let Err(err) = window.shift(direction) {
            log::warn!("view {view}: {err}");
            return Err(err);
        }
        log::debug!("view {view}: window {axis} -> [{}, {})", window.start, window.end);
        Ok(())
    }

    pub fn resize_window(&mut self, view: ViewId, axis: &str, action: Resize) -> ExploreResult<()> {
        let window = self.window_mut(view, axis)?;
        if let Err(err) = window.resize(action) {
            log::warn!("view {view}: {err}");
            return Err(err);
        }
        log::debug!("view {view}: window {axis} -> [{}, {})", window.start, window.end);
        Ok(())
    }

    /// Returns `false` when `step` is not positive and was ignored.
    pub fn set_window_step(&mut self, view: ViewId, axis: &str, step: f64) -> ExploreResult<bool> {
        let accepted = self.window_mut(view, axis)?.set_step_size(step);
        if !accepted {
            log::warn!("view {view}: ignoring non-positive step {step} for {axis}");
        }
        Ok(accepted)
    }

    pub fn set_window_range(&mut self, view: ViewId, axis: &str, start: f64, end: f64) -> ExploreResult<()> {
        let window = self.window_mut(view, axis)?;
        if let Err(err) = window.set_range(start, end) {
            log::warn!("view {view}: {err}");
            return Err(err);
        }
        Ok(())
    }

    // -- projection -------------------------------------------------------

    fn projector(&self) -> DataProjector<'_> {
        DataProjector::new(&self.catalog, self.blob.value_type())
    }

    /// Records of `view` that pass its filters and windows.
    pub fn projection(&self, view: ViewId) -> ExploreResult<Projection> {
        let v = self.view(view)?;
        let empty = ViewFilters::new();
        let filters = self.filters.view(view).unwrap_or(&empty);
        Ok(self
            .projector()
            .project(v, self.blob.records(), filters, self.windows.view(view)))
    }

    /// Like [`Explorer::projection`] but ignoring windows.
    pub fn unwindowed_projection(&self, view: ViewId) -> ExploreResult<Projection> {
        let v = self.view(view)?;
        let empty = ViewFilters::new();
        let filters = self.filters.view(view).unwrap_or(&empty);
        Ok(self.projector().project(v, self.blob.records(), filters, None))
    }

    /// Whether the windowed projection of `view` is too dense to draw.
    pub fn exceeds_display_limit(&self, view: ViewId) -> ExploreResult<bool> {
        let projection = self.projection(view)?;
        Ok(self
            .windows
            .view(view)
            .is_some_and(|w| projection.exceeds_display_limit(w)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_json;

    fn explorer() -> Explorer {
        let blob = parse_json(
            r#"{
                "basic_data": {
                    "axes": [{"name": "t", "min": 0, "max": 9, "interval": 1}],
                    "value_type": "string_array"
                },
                "data_value": [
                    [[0], ["a", [1, 10]]],
                    [[1], ["b", [2, 20]]],
                    [[2], ["a", [3, 30]]],
                    [[3], ["b", [4, 40]]],
                    [[4], ["a", [5, 50]]]
                ]
            }"#,
        )
        .unwrap();
        Explorer::from_blob(blob).unwrap()
    }

    fn view_id(ex: &Explorer, name: &str) -> ViewId {
        ex.views().iter().find(|v| v.name == name).unwrap().id
    }

    #[test]
    fn test_from_blob_rejects_empty_data() {
        let blob = parse_json(r#"{"basic_data": {"value_type": "double"}, "data_value": []}"#).unwrap();
        assert!(matches!(Explorer::from_blob(blob), Err(ExploreError::Configuration(_))));
    }

    #[test]
    fn test_select_dimension() {
        let mut ex = explorer();
        let names: Vec<&str> = ex.catalog().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["t", "String", "Y0", "Y1"]);
        assert_eq!(ex.available_dimensions().into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4]);

        assert_eq!(ex.select_dimension(2).unwrap().len(), 3 + 6);
        assert_eq!(ex.dimension(), Some(2));
        assert!(ex.select_dimension(5).is_err());
        assert_eq!(ex.dimension(), Some(2));
    }

    #[test]
    fn test_windows_follow_active_encoding() {
        let mut ex = explorer();
        ex.select_dimension(2).unwrap();
        let id = view_id(&ex, "2D - t, Y0");

        // size: [x, size] windows only t.
        assert_eq!(ex.active_encoding(id).unwrap(), EncodingKind::Size);
        let keys: Vec<&String> = ex.windows(id).unwrap().keys().collect();
        assert_eq!(keys, vec!["t"]);
        let t = ex.windows(id).unwrap()["t"];
        assert_eq!((t.start, t.end, t.step_size), (0.0, 3.0, 1.0));

        ex.move_window(id, "t", Direction::Right).unwrap();
        assert_eq!(ex.set_active_encoding(id, 2).unwrap(), EncodingKind::Scatter);
        let windows = ex.windows(id).unwrap();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows["t"].start, 1.0);
        assert_eq!((windows["Y0"].start, windows["Y0"].end), (0.0, 3.0));

        // Bar views never window the string axis.
        let bar = view_id(&ex, "2D - String, Y1");
        ex.set_active_encoding(bar, 2).unwrap();
        let keys: Vec<&String> = ex.windows(bar).unwrap().keys().collect();
        assert_eq!(keys, vec!["Y1"]);

        assert!(ex.set_active_encoding(id, 3).is_err());
    }

    #[test]
    fn test_filter_and_window_edits_drive_projection() {
        let mut ex = explorer();
        ex.select_dimension(1).unwrap();
        let id = view_id(&ex, "1D - t");

        assert_eq!(ex.projection(id).unwrap().len(), 3);
        assert_eq!(ex.unwindowed_projection(id).unwrap().len(), 5);

        ex.resize_window(id, "t", Resize::Expand).unwrap();
        ex.resize_window(id, "t", Resize::Expand).unwrap();
        assert_eq!(ex.projection(id).unwrap().len(), 5);

        assert_eq!(ex.set_filter_threshold(id, "Y1", 100.0).unwrap(), 50.0);
        ex.set_filter_threshold(id, "Y1", 25.0).unwrap();
        ex.set_filter_mode(id, "Y1", FilterMode::Lte).unwrap();
        let p = ex.projection(id).unwrap();
        let ts: Vec<f64> = p.records.iter().filter_map(|r| r.number("t")).collect();
        assert_eq!(ts, vec![0.0, 1.0]);

        ex.set_filter_mode(id, "Y1", FilterMode::All).unwrap();
        assert_eq!(ex.projection(id).unwrap().len(), 5);
    }

    #[test]
    fn test_rejected_edits_leave_state_unchanged() {
        let mut ex = explorer();
        ex.select_dimension(1).unwrap();
        let id = view_id(&ex, "1D - t");

        assert!(matches!(
            ex.set_window_range(id, "t", 2.0, 2.0),
            Err(ExploreError::InvalidRange { .. })
        ));
        assert!(!ex.set_window_step(id, "t", 0.0).unwrap());
        ex.resize_window(id, "t", Resize::Shrink).unwrap();
        ex.resize_window(id, "t", Resize::Shrink).unwrap();
        assert!(ex.resize_window(id, "t", Resize::Shrink).is_err());
        let t = ex.windows(id).unwrap()["t"];
        assert_eq!((t.start, t.end, t.step_size), (0.0, 1.0, 1.0));

        assert!(!ex.set_window_step(id, "t", f64::INFINITY).unwrap());
        assert!(ex.set_window_step(id, "t", 1e17).unwrap());
        assert!(matches!(
            ex.move_window(id, "t", Direction::Right),
            Err(ExploreError::InvalidRange { .. })
        ));
        let t = ex.windows(id).unwrap()["t"];
        assert_eq!((t.start, t.end), (0.0, 1.0));

        assert!(matches!(
            ex.set_filter_mode(id, "t", FilterMode::Eq),
            Err(ExploreError::UnknownAxis { state: "filter", .. })
        ));
        assert!(matches!(
            ex.move_window(id, "Y0", Direction::Left),
            Err(ExploreError::UnknownAxis { state: "window", .. })
        ));
        assert!(matches!(ex.projection(99), Err(ExploreError::UnknownView(99))));
    }
}
