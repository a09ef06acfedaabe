//! Facet exploration of multi-dimensional datasets.
//!
//! Given the shape of a dataset (input coordinates, numeric outputs and an
//! optional categorical label), enumerate every 1D-4D combination of axes
//! together with the chart encodings that can draw it, then project the raw
//! records onto a view under per-view filters and sliding windows.

pub mod advisor;
pub mod axis;
pub mod data;
pub mod encoding;
pub mod enumerate;
pub mod error;
pub mod permute;
pub mod state;

pub use advisor::{analyze, available_dimensions, DatasetShape};
pub use axis::{AxisCatalog, AxisDescriptor, AxisKind};
pub use data::filter::FilterMode;
pub use data::model::{DataBlob, RawRecord, RecordValue, ValueType};
pub use data::project::{DataProjector, ProjectedRecord, Projection};
pub use data::window::{Direction, Resize};
pub use encoding::{AxisRole, EncodingKind};
pub use enumerate::{generate_views, DatasetView, Enumeration, ViewId};
pub use error::{ExploreError, ExploreResult};
pub use state::Explorer;
