//! Demo Views
//!
//! A small set of schemas compiled into the binary, grouped the way the
//! viewer's demo walks through them: one view per schema feature.

use include_dir::{include_dir, Dir};

use crate::error::{Result, ViewerError};
use crate::resolver::DocumentStore;

static DEMO_SCHEMAS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/schemas");

/// Load every embedded demo document
pub fn demo_store() -> anyhow::Result<DocumentStore> {
    DocumentStore::from_embedded(&DEMO_SCHEMAS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DemoView {
    Example,
    DefaultTypes,
    ArrayTypes,
    ObjectType,
    RefTypes,
    CombTypes,
}

impl DemoView {
    pub fn all() -> [DemoView; 6] {
        [
            DemoView::Example,
            DemoView::DefaultTypes,
            DemoView::ArrayTypes,
            DemoView::ObjectType,
            DemoView::RefTypes,
            DemoView::CombTypes,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            DemoView::Example => "example",
            DemoView::DefaultTypes => "default",
            DemoView::ArrayTypes => "array",
            DemoView::ObjectType => "object",
            DemoView::RefTypes => "ref",
            DemoView::CombTypes => "comb",
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            DemoView::Example => "Example Schema",
            DemoView::DefaultTypes => "Default Data Types",
            DemoView::ArrayTypes => "Array Types",
            DemoView::ObjectType => "Object Type",
            DemoView::RefTypes => "Ref Types",
            DemoView::CombTypes => "Combination Schema Types",
        }
    }

    pub fn blurb(&self) -> &'static str {
        match self {
            DemoView::Example => "actual JSON example used in Taskcluster (Auth - List Clients)",
            DemoView::DefaultTypes => "string, number, integer, boolean, null",
            DemoView::ArrayTypes => "[ ] marks array item schemas: list and tuple validation",
            DemoView::ObjectType => "{ } marks nested object structure",
            DemoView::RefTypes => "$ref is resolved only when its cell is expanded, one level at a time",
            DemoView::CombTypes => "anyOf / oneOf / allOf with // or and // and separators",
        }
    }

    /// Document ids shown by this view, in display order
    pub fn documents(&self) -> &'static [&'static str] {
        match self {
            DemoView::Example => &["example.json"],
            DemoView::DefaultTypes => &["data-types/default-data-type.json"],
            DemoView::ArrayTypes => &[
                "data-types/array-type-complex-example.json",
                "data-types/array-type-list-validation.json",
                "data-types/array-type-tuple-validation.json",
            ],
            DemoView::ObjectType => &["data-types/object-type.json"],
            DemoView::RefTypes => &[
                "data-types/ref-schema.json",
                "data-types/ref-circular-reference.json",
            ],
            DemoView::CombTypes => &[
                "data-types/anyof.json",
                "data-types/oneof.json",
                "data-types/allof.json",
            ],
        }
    }

    /// Pick a view by key, or by the best fuzzy match on key and heading
    pub fn find(query: &str) -> Result<DemoView> {
        use fuzzy_matcher::skim::SkimMatcherV2;
        use fuzzy_matcher::FuzzyMatcher;

        let query = query.trim();
        if let Some(view) = Self::all().into_iter().find(|v| v.key().eq_ignore_ascii_case(query)) {
            return Ok(view);
        }

        let matcher = SkimMatcherV2::default();
        Self::all()
            .into_iter()
            .filter_map(|view| {
                let score = matcher
                    .fuzzy_match(view.heading(), query)
                    .into_iter()
                    .chain(matcher.fuzzy_match(view.key(), query))
                    .max()?;
                Some((score, view))
            })
            .max_by_key(|(score, _)| *score)
            .map(|(_, view)| view)
            .ok_or_else(|| ViewerError::UnknownView(query.to_string()))
    }
}
