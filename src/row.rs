//! Display rows
//!
//! The renderer's only output. A presentation layer turns each [`Row`] into
//! one line of its table.

use serde::{Deserialize, Serialize};

use crate::reference::CellId;

/// Marker drawn in front of references that are array items
pub const ARRAY_ITEM_MARKER: &str = "⤷";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// Opening row of an object (`{`) or array (`[`)
    Header,
    /// Closing brace or bracket
    Closer,
    /// Primitive / untyped schema
    Leaf,
    /// `Any of` / `One of` / `All of`
    CombinatorHeader,
    /// `or` / `and` between combinator branches
    Separator,
    /// Collapsed `$ref`
    Reference,
    /// A subtree or reference that failed to render
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleAction {
    Expand,
    Collapse,
}

/// Clickable affordance attached to a row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Toggle {
    pub cell: CellId,
    pub action: ToggleAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub kind: RowKind,
    /// Indentation depth
    pub depth: usize,
    pub primary_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_lines: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub array_item: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toggle: Option<Toggle>,
}

impl Row {
    pub fn new(kind: RowKind, depth: usize, primary_text: impl Into<String>) -> Self {
        Self {
            kind,
            depth,
            primary_text: primary_text.into(),
            type_annotation: None,
            title: None,
            validation_lines: Vec::new(),
            description: None,
            array_item: false,
            toggle: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_toggle(mut self, cell: CellId, action: ToggleAction) -> Self {
        self.toggle = Some(Toggle { cell, action });
        self
    }

    pub fn is_reference_toggle_affordance(&self) -> bool {
        self.toggle.is_some()
    }

    /// Cell this row expands, if it is a collapsed reference
    pub fn expandable_cell(&self) -> Option<&CellId> {
        match &self.toggle {
            Some(Toggle { cell, action: ToggleAction::Expand }) => Some(cell),
            _ => None,
        }
    }
}

/// `name : marker`, or whichever half is present
pub(crate) fn labelled(label: Option<&str>, marker: &str) -> String {
    match (label, marker.is_empty()) {
        (Some(label), false) => format!("{} : {}", label, marker),
        (Some(label), true) => label.to_string(),
        (None, _) => marker.to_string(),
    }
}

/// Ids of every collapsed reference visible in `rows`, in row order
pub fn collapsed_cells(rows: &[Row]) -> Vec<CellId> {
    rows.iter().filter_map(Row::expandable_cell).cloned().collect()
}
