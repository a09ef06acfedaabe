use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enumerate::{DatasetView, ViewId};
use crate::error::{ExploreError, ExploreResult};

use super::model::DataBlob;

/// Width, in native units, of a freshly opened window.
pub const INITIAL_WINDOW_WIDTH: f64 = 3.0;

/// Projections above this many records are flagged as too dense to draw.
pub const DEFAULT_MAX_DISPLAY_COUNT: usize = 200;

/// Native `(min, max, interval)` of an axis the blob does not describe.
const FALLBACK_NATIVE: (f64, f64, f64) = (0.0, 10.0, 1.0);

// ---------------------------------------------------------------------------
// AxisWindow – a half-open range sliding along one axis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resize {
    Expand,
    Shrink,
}

/// Visible range `[start, end)` of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisWindow {
    pub start: f64,
    pub end: f64,
    pub step_size: f64,
    pub native_min: f64,
    pub native_max: f64,
    pub max_display_count: usize,
}

impl AxisWindow {
    /// Open a window of [`INITIAL_WINDOW_WIDTH`] at `native_min`.
    pub fn new(native_min: f64, native_max: f64, step_size: f64) -> Self {
        Self {
            start: native_min,
            end: native_min + INITIAL_WINDOW_WIDTH,
            step_size,
            native_min,
            native_max,
            max_display_count: DEFAULT_MAX_DISPLAY_COUNT,
        }
    }

    /// Window for `name`, using the blob's declared axis metadata if any.
    pub fn for_axis(name: &str, blob: &DataBlob) -> Self {
        let (min, max, interval) = FALLBACK_NATIVE;
        match blob.axis_info(name) {
            Some(info) => Self::new(
                info.min.unwrap_or(min),
                info.max.unwrap_or(max),
                info.interval.filter(|i| *i > 0.0).unwrap_or(interval),
            ),
            None => Self::new(min, max, interval),
        }
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    /// Half-open membership: `start <= value < end`.
    pub fn contains(&self, value: f64) -> bool {
        self.start <= value && value < self.end
    }

    /// Slide the window by one step.
    ///
    /// A move whose ends are not finite, or that collapses `[start, end)`
    /// because the step swamps the width, is rejected and leaves the window
    /// unchanged.
    pub fn shift(&mut self, direction: Direction) -> ExploreResult<()> {
        let delta = match direction {
            Direction::Left => -self.step_size,
            Direction::Right => self.step_size,
        };
        let (start, end) = (self.start + delta, self.end + delta);
        check_range(start, end)?;
        self.start = start;
        self.end = end;
        Ok(())
    }

    /// Grow or shrink the window by one step at its end.
    ///
    /// A shrink that would bring `end` down to `start` is rejected and
    /// leaves the window unchanged.
    pub fn resize(&mut self, action: Resize) -> ExploreResult<()> {
        match action {
            Resize::Expand => {
                let end = self.end + self.step_size;
                check_range(self.start, end)?;
                self.end = end;
            }
            Resize::Shrink => {
                let end = self.end - self.step_size;
                check_range(self.start, end)?;
                self.end = end;
            }
        }
        Ok(())
    }

    /// Change the step size. Returns `false` (and keeps the old step) unless
    /// `step` is finite and strictly positive.
    pub fn set_step_size(&mut self, step: f64) -> bool {
        if step.is_finite() && step > 0.0 {
            self.step_size = step;
            true
        } else {
            false
        }
    }

    /// Directly set `[start, end)`; rejected unless `start < end`.
    pub fn set_range(&mut self, start: f64, end: f64) -> ExploreResult<()> {
        check_range(start, end)?;
        self.start = start;
        self.end = end;
        Ok(())
    }
}

/// `start < end` with both ends finite. NaN fails the comparison as well.
fn check_range(start: f64, end: f64) -> ExploreResult<()> {
    if start.is_finite() && end.is_finite() && start < end {
        Ok(())
    } else {
        Err(ExploreError::InvalidRange { start, end })
    }
}

// ---------------------------------------------------------------------------
// WindowState: view id → axis name → window
// ---------------------------------------------------------------------------

/// Windows of one view, keyed by axis name.
pub type ViewWindows = BTreeMap<String, AxisWindow>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowState {
    views: BTreeMap<ViewId, ViewWindows>,
}

impl WindowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self, id: ViewId) -> Option<&ViewWindows> {
        self.views.get(&id)
    }

    pub fn get_mut(&mut self, id: ViewId, axis: &str) -> Option<&mut AxisWindow> {
        self.views.get_mut(&id)?.get_mut(axis)
    }

    /// Keep exactly one window per axis in `used`, opening missing ones and
    /// dropping windows of axes the active encoding no longer positions.
    /// Existing windows keep their range.
    pub fn sync_view(&mut self, view: &DatasetView, used: &[&str], blob: &DataBlob) {
        let windows = self.views.entry(view.id).or_default();
        windows.retain(|name, _| used.contains(&name.as_str()));
        for name in used {
            windows
                .entry((*name).to_string())
                .or_insert_with(|| AxisWindow::for_axis(name, blob));
        }
    }

    pub fn clear(&mut self) {
        self.views.clear();
    }
}
