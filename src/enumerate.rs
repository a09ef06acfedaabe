use serde::{Deserialize, Serialize};

use crate::advisor::DatasetShape;
use crate::axis::{AxisCatalog, AxisDescriptor};
use crate::encoding::{EncodingKind, VisualizationEncoding};
use crate::error::ExploreResult;
use crate::permute::permute;

/// Position of a view in its enumeration result; keys filter/window state.
pub type ViewId = usize;

/// Highest dimensionality a view can have.
pub const MAX_DIMENSION: usize = 4;

const LINE: &[EncodingKind] = &[EncodingKind::Line1d];
const CATEGORY: &[EncodingKind] = &[EncodingKind::Category];
const PLANE: &[EncodingKind] = &[EncodingKind::Size, EncodingKind::Color, EncodingKind::Scatter];
const BAR: &[EncodingKind] = &[EncodingKind::BarSize, EncodingKind::BarColor, EncodingKind::Bar];
const SPACE: &[EncodingKind] = &[
    EncodingKind::SizeColor,
    EncodingKind::ScatterSize,
    EncodingKind::ScatterColor,
];
const GROUPED_BAR: &[EncodingKind] = &[
    EncodingKind::GroupedBarSize,
    EncodingKind::GroupedBar,
    EncodingKind::GroupedBarColor,
];
const HYPER: &[EncodingKind] = &[EncodingKind::ScatterSizeColor];
const GROUPED_SCATTER: &[EncodingKind] = &[EncodingKind::GroupedScatterSizeColor];

// ---------------------------------------------------------------------------
// DatasetView – one axis tuple plus the encodings that can draw it
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetView {
    pub id: ViewId,
    /// Display name, e.g. `"2D - X0, Y1"`.
    pub name: String,
    pub axes: Vec<AxisDescriptor>,
    /// `"<d>D"`, or `"<d>D-String"` when the view carries the string axis.
    pub data_type: String,
    pub visualization_encodings: Vec<VisualizationEncoding>,
}

impl DatasetView {
    fn new(axes: Vec<AxisDescriptor>, kinds: &[EncodingKind]) -> Self {
        let dimension = axes.len();
        let names: Vec<&str> = axes.iter().map(|a| a.name.as_str()).collect();
        let data_type = if axes.iter().any(AxisDescriptor::is_string) {
            format!("{dimension}D-String")
        } else {
            format!("{dimension}D")
        };
        Self {
            id: 0,
            name: format!("{dimension}D - {}", names.join(", ")),
            axes,
            data_type,
            visualization_encodings: kinds.iter().copied().map(Into::into).collect(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.axes.len()
    }

    pub fn has_string(&self) -> bool {
        self.axes.iter().any(AxisDescriptor::is_string)
    }

    pub fn uses_axis(&self, name: &str) -> bool {
        self.axes.iter().any(|a| a.name == name)
    }

    /// Catalog axes this view does not display, in catalog order.
    pub fn unused_axes<'a>(&self, catalog: &'a AxisCatalog) -> Vec<&'a AxisDescriptor> {
        catalog.iter().filter(|a| !self.uses_axis(&a.name)).collect()
    }

    pub fn encoding(&self, index: usize) -> Option<EncodingKind> {
        self.visualization_encodings
            .get(index)
            .map(|e| e.encoding_kind)
    }

    pub fn encoding_kinds(&self) -> Vec<EncodingKind> {
        self.visualization_encodings
            .iter()
            .map(|e| e.encoding_kind)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Enumeration
// ---------------------------------------------------------------------------

/// Enumerate every dataset view of the requested dimensionality.
///
/// Returns an empty vector when `dimension` is outside 1..=4 or the shape
/// has too few axes for it; callers decide whether that is a problem.
pub fn enumerate(dimension: usize, shape: &DatasetShape, catalog: &AxisCatalog) -> Vec<DatasetView> {
    if !(1..=MAX_DIMENSION).contains(&dimension) {
        return Vec::new();
    }

    let mut views = if shape.has_string {
        match catalog.string_axis() {
            Some(string_axis) => {
                enumerate_with_string(dimension, shape.total_dim, string_axis, &catalog.non_string())
            }
            None => {
                log::warn!("shape declares a string component but the catalog has no string axis");
                Vec::new()
            }
        }
    } else {
        enumerate_numeric(dimension, shape.total_dim, catalog.axes())
    };

    for (id, view) in views.iter_mut().enumerate() {
        view.id = id;
    }
    log::debug!("enumerated {} views for dimension {dimension}", views.len());
    views
}

fn enumerate_numeric(dimension: usize, total_dim: usize, axes: &[AxisDescriptor]) -> Vec<DatasetView> {
    if total_dim < dimension {
        return Vec::new();
    }
    let kinds = match dimension {
        1 => LINE,
        2 => PLANE,
        3 => SPACE,
        _ => HYPER,
    };
    permute(axes, dimension)
        .map(|perm| DatasetView::new(perm, kinds))
        .collect()
}

fn enumerate_with_string(
    dimension: usize,
    total_dim: usize,
    string_axis: &AxisDescriptor,
    rest: &[AxisDescriptor],
) -> Vec<DatasetView> {
    if total_dim + 1 < dimension {
        return Vec::new();
    }

    let with_string = |perm: Vec<AxisDescriptor>| {
        let mut axes = Vec::with_capacity(perm.len() + 1);
        axes.push(string_axis.clone());
        axes.extend(perm);
        axes
    };

    let mut views = Vec::new();
    match dimension {
        1 => {
            views.push(DatasetView::new(vec![string_axis.clone()], CATEGORY));
            views.extend(rest.iter().map(|a| DatasetView::new(vec![a.clone()], LINE)));
        }
        2 => {
            views.extend(
                rest.iter()
                    .map(|a| DatasetView::new(with_string(vec![a.clone()]), BAR)),
            );
            views.extend(permute(rest, 2).map(|perm| DatasetView::new(perm, PLANE)));
        }
        3 => {
            views.extend(
                permute(rest, 2).map(|perm| DatasetView::new(with_string(perm), GROUPED_BAR)),
            );
            if rest.len() > 2 {
                views.extend(permute(rest, 3).map(|perm| DatasetView::new(perm, SPACE)));
            }
        }
        _ => {
            views.extend(
                permute(rest, 3).map(|perm| DatasetView::new(with_string(perm), GROUPED_SCATTER)),
            );
            if total_dim > 3 {
                views.extend(permute(rest, 4).map(|perm| DatasetView::new(perm, HYPER)));
            }
        }
    }
    views
}

// ---------------------------------------------------------------------------
// Output handed to the rendering collaborator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enumeration {
    pub all_axes: Vec<AxisDescriptor>,
    pub datasets: Vec<DatasetView>,
}

/// Build the axis catalog for `shape` and enumerate its views.
pub fn generate_views(
    dimension: usize,
    shape: &DatasetShape,
    declared_names: &[String],
) -> ExploreResult<Enumeration> {
    let catalog = AxisCatalog::build(shape.j, shape.m, shape.has_string, declared_names)?;
    let datasets = enumerate(dimension, shape, &catalog);
    Ok(Enumeration {
        all_axes: catalog.axes().to_vec(),
        datasets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::ValueType;

    fn shape(j: usize, m: usize, has_string: bool) -> DatasetShape {
        let value_type = match (has_string, m) {
            (false, 1) => ValueType::Double,
            (false, _) => ValueType::Array,
            (true, 1) => ValueType::StringDouble,
            (true, _) => ValueType::StringArray,
        };
        DatasetShape::new(value_type, j, m + usize::from(has_string))
    }

    fn run(dimension: usize, j: usize, m: usize, has_string: bool) -> Vec<DatasetView> {
        let shape = shape(j, m, has_string);
        let catalog = AxisCatalog::build(j, m, has_string, &[]).unwrap();
        enumerate(dimension, &shape, &catalog)
    }

    fn names(view: &DatasetView) -> Vec<&str> {
        view.axes.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_numeric_dimension_one() {
        let views = run(1, 2, 2, false);
        assert_eq!(views.len(), 4);
        for view in &views {
            assert_eq!(view.encoding_kinds(), vec![EncodingKind::Line1d]);
            assert_eq!(view.data_type, "1D");
        }
        assert_eq!(views[0].name, "1D - X0");
    }

    #[test]
    fn test_numeric_dimension_two_counts() {
        let views = run(2, 2, 2, false);
        assert_eq!(views.len(), 12);
        for view in &views {
            assert_eq!(view.visualization_encodings.len(), 3);
            assert_eq!(
                view.encoding_kinds(),
                vec![EncodingKind::Size, EncodingKind::Color, EncodingKind::Scatter]
            );
        }
        assert_eq!(views[0].name, "2D - X0, X1");
        assert_eq!(views[11].name, "2D - Y1, Y0");
    }

    #[test]
    fn test_numeric_higher_dimensions() {
        let views = run(3, 2, 2, false);
        assert_eq!(views.len(), 24);
        assert_eq!(views[0].visualization_encodings.len(), 3);

        let views = run(4, 2, 2, false);
        assert_eq!(views.len(), 24);
        assert_eq!(views[0].encoding_kinds(), vec![EncodingKind::ScatterSizeColor]);
    }

    #[test]
    fn test_unsupported_dimension_is_empty() {
        assert!(run(3, 1, 1, false).is_empty());
        assert!(run(0, 2, 2, false).is_empty());
        assert!(run(5, 3, 3, false).is_empty());
        assert!(run(4, 1, 1, true).is_empty());
    }

    #[test]
    fn test_string_dimension_one() {
        let views = run(1, 1, 1, true);
        assert_eq!(views.len(), 3);
        assert_eq!(names(&views[0]), vec!["String"]);
        assert_eq!(views[0].encoding_kinds(), vec![EncodingKind::Category]);
        assert_eq!(views[0].data_type, "1D-String");
        assert_eq!(names(&views[1]), vec!["X0"]);
        assert_eq!(names(&views[2]), vec!["Y0"]);
    }

    #[test]
    fn test_string_dimension_two() {
        let views = run(2, 1, 2, true);
        // 3 bar views + 3P2 scatter views
        assert_eq!(views.len(), 3 + 6);
        assert_eq!(names(&views[0]), vec!["String", "X0"]);
        assert_eq!(
            views[0].encoding_kinds(),
            vec![EncodingKind::BarSize, EncodingKind::BarColor, EncodingKind::Bar]
        );
        assert!(!views[3].has_string());
        assert_eq!(views[3].visualization_encodings.len(), 3);
    }

    #[test]
    fn test_string_dimension_three_counts() {
        let views = run(3, 2, 1, true);
        assert_eq!(views.len(), 12);

        let (grouped, plain): (Vec<_>, Vec<_>) = views.iter().partition(|v| v.has_string());
        assert_eq!(grouped.len(), 6);
        assert_eq!(plain.len(), 6);
        for view in &grouped {
            assert_eq!(view.axes[0].name, "String");
            assert_eq!(
                view.encoding_kinds(),
                vec![
                    EncodingKind::GroupedBarSize,
                    EncodingKind::GroupedBar,
                    EncodingKind::GroupedBarColor
                ]
            );
        }
        for view in &plain {
            assert_eq!(view.visualization_encodings.len(), 3);
        }
    }

    #[test]
    fn test_string_dimension_three_with_two_axes() {
        let views = run(3, 1, 1, true);
        assert_eq!(views.len(), 2);
        assert!(views.iter().all(DatasetView::has_string));
        assert_eq!(views[0].name, "3D - String, X0, Y0");
    }

    #[test]
    fn test_string_dimension_four() {
        let views = run(4, 1, 2, true);
        // 3P3 grouped scatter views, no 4-permutation of three axes
        assert_eq!(views.len(), 6);
        assert!(views
            .iter()
            .all(|v| v.encoding_kinds() == vec![EncodingKind::GroupedScatterSizeColor]));

        let views = run(4, 2, 2, true);
        assert_eq!(views.len(), 24 + 24);
        assert_eq!(views[24].encoding_kinds(), vec![EncodingKind::ScatterSizeColor]);
    }

    #[test]
    fn test_ids_follow_order() {
        let views = run(2, 1, 2, true);
        for (i, view) in views.iter().enumerate() {
            assert_eq!(view.id, i);
        }
    }

    #[test]
    fn test_generate_views_output_shape() {
        let shape = shape(1, 1, false);
        let out = generate_views(2, &shape, &["t".to_string()]).unwrap();
        assert_eq!(out.all_axes.len(), 2);
        assert_eq!(out.datasets.len(), 2);
        assert_eq!(out.datasets[0].name, "2D - t, Y0");

        let json = serde_json::to_value(&out).unwrap();
        assert!(json.get("allAxes").is_some());
        assert_eq!(
            json["datasets"][0]["visualizationEncodings"][2]["encodingKind"],
            "scatter"
        );
    }
}
