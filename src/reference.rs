//! Reference Cells
//!
//! A `$ref` node renders as a collapsed cell until the caller expands it.
//! The expanded/collapsed flags live in an [`ExpansionState`] owned by the
//! caller; the renderer only reads it. Resolution happens lazily, on every
//! render pass of an expanded cell.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Component, Path};
use url::Url;

use crate::error::{Result, ViewerError};
use crate::resolver::DocumentResolver;

/// Description shown on every collapsed reference row
pub const COLLAPSED_DESCRIPTION: &str = "Click to expand for details.";

// =============================================================================
// Cell identity
// =============================================================================

/// Identifies a reference cell by the pointer path of its `$ref` node
/// within the rendered tree (`#/properties/owner`, `#/items/1`).
///
/// Paths continue through expanded references, so the same definition
/// reached twice (or recursively) gets a distinct cell each time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(String);

impl CellId {
    pub fn root() -> Self {
        CellId("#".to_string())
    }

    /// Append one pointer segment; `/` and `~` in property keys are escaped
    pub fn child(&self, segment: &str) -> Self {
        let escaped = segment.replace('~', "~0").replace('/', "~1");
        CellId(format!("{}/{}", self.0, escaped))
    }

    /// Append a pre-built path such as `items/2`
    pub(crate) fn join(&self, path: &str) -> Self {
        CellId(format!("{}/{}", self.0, path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CellId {
    fn from(s: &str) -> Self {
        CellId(s.to_string())
    }
}

impl From<String> for CellId {
    fn from(s: String) -> Self {
        CellId(s)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Expansion state
// =============================================================================

/// Which reference cells are expanded. Everything absent is collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionState {
    expanded: BTreeSet<CellId>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, cell: &CellId) -> bool {
        self.expanded.contains(cell)
    }

    /// Flip a cell and return whether it is now expanded.
    ///
    /// Two toggles of the same cell restore the previous state.
    pub fn toggle(&mut self, cell: &CellId) -> bool {
        if self.expanded.remove(cell) {
            tracing::debug!(cell = %cell, "collapsed reference");
            false
        } else {
            tracing::debug!(cell = %cell, "expanded reference");
            self.expanded.insert(cell.clone());
            true
        }
    }

    pub fn expand(&mut self, cell: CellId) {
        self.expanded.insert(cell);
    }

    pub fn collapse(&mut self, cell: &CellId) {
        self.expanded.remove(cell);
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CellId> {
        self.expanded.iter()
    }
}

impl FromIterator<CellId> for ExpansionState {
    fn from_iter<I: IntoIterator<Item = CellId>>(iter: I) -> Self {
        Self {
            expanded: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// Reference descriptor
// =============================================================================

/// Everything a collapsed reference row shows, plus what expansion needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefDescriptor {
    /// Display label of the node holding the `$ref`
    pub name: Option<String>,
    /// Last `/` segment of the URI (`Widget` for `#/definitions/Widget`)
    pub ref_name: String,
    pub title: Option<String>,
    pub description: String,
    pub uri: String,
    /// Document that contained the `$ref`
    pub document_source: String,
}

/// Where a reference points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefTarget {
    pub document: String,
    /// Text after `#`, if the URI has one
    pub fragment: Option<String>,
}

/// A dereferenced schema and the document it came from
#[derive(Debug, Clone)]
pub struct Resolved {
    pub document: String,
    pub node: Value,
}

impl RefDescriptor {
    pub fn new(uri: &str, name: Option<&str>, title: Option<&str>, document_source: &str) -> Self {
        let ref_name = uri.rsplit('/').next().unwrap_or(uri).to_string();
        Self {
            name: name.map(String::from),
            ref_name,
            title: title.map(String::from),
            description: COLLAPSED_DESCRIPTION.to_string(),
            uri: uri.to_string(),
            document_source: document_source.to_string(),
        }
    }

    /// Split the URI on `#`; an empty document part means the originating document
    pub fn target(&self) -> RefTarget {
        let (document, fragment) = match self.uri.split_once('#') {
            Some((doc, fragment)) => (doc, Some(fragment.to_string())),
            None => (self.uri.as_str(), None),
        };

        let document = if document.is_empty() {
            self.document_source.clone()
        } else {
            normalize_document(document, &self.document_source)
        };

        RefTarget { document, fragment }
    }

    /// Fetch the target document and pull the referenced definition out of it
    pub fn resolve(&self, resolver: &dyn DocumentResolver) -> Result<Resolved> {
        let target = self.target();
        tracing::debug!(uri = %self.uri, document = %target.document, "resolving reference");

        let document = resolver.resolve(&target.document)?;

        let whole_document = target
            .fragment
            .as_deref()
            .map(|f| f.is_empty() || f == "/")
            .unwrap_or(true);

        let node = if whole_document {
            document.into_owned()
        } else {
            lookup_definition(&document, &self.ref_name)
                .cloned()
                .ok_or_else(|| ViewerError::DanglingReference {
                    name: self.ref_name.clone(),
                    document: target.document.clone(),
                })?
        };

        Ok(Resolved {
            document: target.document,
            node,
        })
    }
}

/// `definitions[name]`, falling back to `$defs[name]`
fn lookup_definition<'a>(document: &'a Value, name: &str) -> Option<&'a Value> {
    ["definitions", "$defs"]
        .iter()
        .find_map(|section| document.get(*section).and_then(|defs| defs.get(name)))
}

/// Resolve a document part of a `$ref` against the document containing it.
/// Absolute URLs and absolute paths are kept as written; relative parts
/// inside an `http(s)` document are joined as URLs.
pub fn normalize_document(reference: &str, source: &str) -> String {
    if Url::parse(reference).is_ok() || reference.starts_with('/') {
        return reference.to_string();
    }

    if let Ok(base) = Url::parse(source) {
        if matches!(base.scheme(), "http" | "https") {
            if let Ok(joined) = base.join(reference) {
                return joined.to_string();
            }
        }
    }

    let parent = Path::new(source).parent().unwrap_or(Path::new(""));
    let joined = parent.join(reference);

    let mut components: Vec<String> = Vec::new();
    for component in joined.components() {
        match component {
            Component::ParentDir => {
                components.pop();
            }
            Component::Normal(s) => components.push(s.to_string_lossy().to_string()),
            _ => {}
        }
    }

    components.join("/")
}
