use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ExploreError, ExploreResult};

/// Name given to the single categorical axis of a string-bearing dataset.
pub const STRING_AXIS_NAME: &str = "String";

// ---------------------------------------------------------------------------
// AxisDescriptor – one addressable axis of the dataset
// ---------------------------------------------------------------------------

/// Where an axis reads its value from in a raw record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    /// A coordinate of the record's input vector.
    Input,
    /// A numeric slot of the record's output value.
    Output,
    /// The categorical label of a string-bearing output.
    String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisDescriptor {
    pub name: String,
    pub kind: AxisKind,
    /// Coordinate or output slot; `-1` for the string axis.
    pub index: i32,
}

impl AxisDescriptor {
    pub fn input(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            kind: AxisKind::Input,
            index: index as i32,
        }
    }

    pub fn output(index: usize) -> Self {
        Self {
            name: format!("Y{index}"),
            kind: AxisKind::Output,
            index: index as i32,
        }
    }

    pub fn string() -> Self {
        Self {
            name: STRING_AXIS_NAME.to_string(),
            kind: AxisKind::String,
            index: -1,
        }
    }

    /// The slot this axis reads, `None` for the string axis.
    pub fn slot(&self) -> Option<usize> {
        usize::try_from(self.index).ok()
    }

    pub fn is_string(&self) -> bool {
        self.kind == AxisKind::String
    }
}

impl fmt::Display for AxisDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// ---------------------------------------------------------------------------
// AxisCatalog – the canonical, ordered list of axes
// ---------------------------------------------------------------------------

/// Ordered axes of a dataset: inputs, then the string axis (if any), then outputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AxisCatalog {
    axes: Vec<AxisDescriptor>,
}

impl AxisCatalog {
    /// Build the catalog for `j` inputs and `m` numeric outputs.
    ///
    /// Input axes take their name from `declared_names` when one is given
    /// for that position and fall back to `X{i}` otherwise. Any name clash
    /// (declared vs. declared, or declared vs. synthesized) is rejected.
    pub fn build(
        j: usize,
        m: usize,
        has_string: bool,
        declared_names: &[String],
    ) -> ExploreResult<Self> {
        let mut axes = Vec::with_capacity(j + m + usize::from(has_string));

        for i in 0..j {
            let name = match declared_names.get(i) {
                Some(name) if !name.trim().is_empty() => name.clone(),
                _ => format!("X{i}"),
            };
            axes.push(AxisDescriptor::input(name, i));
        }
        if has_string {
            axes.push(AxisDescriptor::string());
        }
        for i in 0..m {
            axes.push(AxisDescriptor::output(i));
        }

        let mut seen = HashSet::new();
        for axis in &axes {
            if !seen.insert(axis.name.as_str()) {
                return Err(ExploreError::config(format!(
                    "duplicate axis name '{}'",
                    axis.name
                )));
            }
        }

        Ok(Self { axes })
    }

    pub fn axes(&self) -> &[AxisDescriptor] {
        &self.axes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AxisDescriptor> {
        self.axes.iter()
    }

    pub fn len(&self) -> usize {
        self.axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    /// Look up an axis by name.
    pub fn find(&self, name: &str) -> Option<&AxisDescriptor> {
        self.axes.iter().find(|a| a.name == name)
    }

    pub fn string_axis(&self) -> Option<&AxisDescriptor> {
        self.axes.iter().find(|a| a.is_string())
    }

    /// All axes except the string axis, in catalog order.
    pub fn non_string(&self) -> Vec<AxisDescriptor> {
        self.axes.iter().filter(|a| !a.is_string()).cloned().collect()
    }
}

impl<'a> IntoIterator for &'a AxisCatalog {
    type Item = &'a AxisDescriptor;
    type IntoIter = std::slice::Iter<'a, AxisDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.axes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(catalog: &AxisCatalog) -> Vec<&str> {
        catalog.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_synthesized_names_and_order() {
        let catalog = AxisCatalog::build(2, 2, true, &[]).unwrap();
        assert_eq!(names(&catalog), vec!["X0", "X1", "String", "Y0", "Y1"]);

        let string_axis = catalog.string_axis().unwrap();
        assert_eq!(string_axis.index, -1);
        assert_eq!(string_axis.slot(), None);
        assert_eq!(catalog.find("Y1").unwrap().slot(), Some(1));
        assert_eq!(catalog.non_string().len(), 4);
    }

    #[test]
    fn test_declared_names_with_fallback() {
        let declared = vec!["time".to_string(), "  ".to_string()];
        let catalog = AxisCatalog::build(3, 1, false, &declared).unwrap();
        assert_eq!(names(&catalog), vec!["time", "X1", "X2", "Y0"]);
        assert_eq!(catalog.find("time").unwrap().kind, AxisKind::Input);
    }

    #[test]
    fn test_name_collision_is_rejected() {
        // A declared "X1" collides with the synthesized name of slot 1.
        let declared = vec!["X1".to_string()];
        let err = AxisCatalog::build(2, 1, false, &declared).unwrap_err();
        assert!(matches!(err, ExploreError::Configuration(_)));

        let declared = vec!["Y0".to_string()];
        assert!(AxisCatalog::build(1, 1, false, &declared).is_err());

        let declared = vec!["String".to_string()];
        assert!(AxisCatalog::build(1, 1, true, &declared).is_err());
        assert!(AxisCatalog::build(1, 1, false, &declared).is_ok());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&AxisDescriptor::string()).unwrap();
        assert_eq!(json, r#"{"name":"String","kind":"string","index":-1}"#);
    }
}
