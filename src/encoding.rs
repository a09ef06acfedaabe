use std::fmt;

use serde::{Deserialize, Serialize};

use crate::axis::AxisDescriptor;

// ---------------------------------------------------------------------------
// Axis roles
// ---------------------------------------------------------------------------

/// The part a view axis plays in a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisRole {
    X,
    Y,
    Size,
    Color,
    Category,
}

// ---------------------------------------------------------------------------
// EncodingKind – closed set of visualization encodings
// ---------------------------------------------------------------------------

/// Every encoding a dataset view can be rendered with.
///
/// Serialized as the snake_case tags the rendering adapters understand
/// (`line1d`, `bar_size`, `grouped_scatter_size_color`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingKind {
    Line1d,
    Category,
    Size,
    Color,
    Scatter,
    Bar,
    BarSize,
    BarColor,
    SizeColor,
    ScatterSize,
    ScatterColor,
    GroupedBar,
    GroupedBarSize,
    GroupedBarColor,
    ScatterSizeColor,
    GroupedScatterSizeColor,
}

impl EncodingKind {
    pub const ALL: [EncodingKind; 16] = [
        EncodingKind::Line1d,
        EncodingKind::Category,
        EncodingKind::Size,
        EncodingKind::Color,
        EncodingKind::Scatter,
        EncodingKind::Bar,
        EncodingKind::BarSize,
        EncodingKind::BarColor,
        EncodingKind::SizeColor,
        EncodingKind::ScatterSize,
        EncodingKind::ScatterColor,
        EncodingKind::GroupedBar,
        EncodingKind::GroupedBarSize,
        EncodingKind::GroupedBarColor,
        EncodingKind::ScatterSizeColor,
        EncodingKind::GroupedScatterSizeColor,
    ];

    /// Roles consumed from `view.axes`, by position.
    pub fn roles(self) -> &'static [AxisRole] {
        use AxisRole::*;
        match self {
            EncodingKind::Line1d => &[X],
            EncodingKind::Category => &[Category],
            EncodingKind::Size => &[X, Size],
            EncodingKind::Color => &[X, Color],
            EncodingKind::Scatter => &[X, Y],
            EncodingKind::Bar => &[Category, Y],
            EncodingKind::BarSize => &[Category, Size],
            EncodingKind::BarColor => &[Category, Color],
            EncodingKind::SizeColor => &[X, Size, Color],
            EncodingKind::ScatterSize => &[X, Y, Size],
            EncodingKind::ScatterColor => &[X, Y, Color],
            EncodingKind::GroupedBar => &[Category, X, Y],
            EncodingKind::GroupedBarSize => &[Category, X, Size],
            EncodingKind::GroupedBarColor => &[Category, X, Color],
            EncodingKind::ScatterSizeColor => &[X, Y, Size, Color],
            EncodingKind::GroupedScatterSizeColor => &[Category, X, Y, Size],
        }
    }

    /// Human readable label shown next to the chart.
    pub fn display_name(self) -> &'static str {
        match self {
            EncodingKind::Line1d => "Number line",
            EncodingKind::Category => "Category",
            EncodingKind::Size => "Size",
            EncodingKind::Color => "Color",
            EncodingKind::Scatter => "Scatter",
            EncodingKind::Bar => "Bar",
            EncodingKind::BarSize => "Bar (size)",
            EncodingKind::BarColor => "Bar (color)",
            EncodingKind::SizeColor => "Size + color",
            EncodingKind::ScatterSize => "Scatter + size",
            EncodingKind::ScatterColor => "Scatter + color",
            EncodingKind::GroupedBar => "Grouped bar",
            EncodingKind::GroupedBarSize => "Grouped bar (size)",
            EncodingKind::GroupedBarColor => "Grouped bar (color)",
            EncodingKind::ScatterSizeColor => "Scatter + size + color",
            EncodingKind::GroupedScatterSizeColor => "Grouped scatter + size + color",
        }
    }

    /// The axis of `axes` that plays `role`, if this encoding uses it.
    ///
    /// Grouped scatter views carry four axes, so their colour channel reads
    /// a fifth axis when present and otherwise shares the size axis.
    pub fn axis_for_role(self, axes: &[AxisDescriptor], role: AxisRole) -> Option<&AxisDescriptor> {
        let roles = self.roles();
        if let Some(pos) = roles.iter().position(|r| *r == role) {
            return axes.get(pos);
        }
        if self == EncodingKind::GroupedScatterSizeColor && role == AxisRole::Color {
            return axes.get(roles.len()).or_else(|| axes.get(3));
        }
        None
    }

    /// Axes whose range is restricted by a window for this encoding:
    /// the non-string axes in an `x` or `y` role.
    pub fn windowed_axes(self, axes: &[AxisDescriptor]) -> Vec<&AxisDescriptor> {
        self.roles()
            .iter()
            .zip(axes)
            .filter(|(role, axis)| matches!(role, AxisRole::X | AxisRole::Y) && !axis.is_string())
            .map(|(_, axis)| axis)
            .collect()
    }
}

impl fmt::Display for EncodingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ---------------------------------------------------------------------------
// VisualizationEncoding – an entry of a view's encoding list
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationEncoding {
    pub display_name: String,
    pub encoding_kind: EncodingKind,
}

impl From<EncodingKind> for VisualizationEncoding {
    fn from(kind: EncodingKind) -> Self {
        Self {
            display_name: kind.display_name().to_string(),
            encoding_kind: kind,
        }
    }
}
