//! Document Resolution
//!
//! The renderer never loads documents itself. Callers hand it a
//! [`DocumentResolver`] that maps a document id (a relative path such as
//! `data-types/ref-schema.json`) to a parsed schema document.

use include_dir::Dir;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Result, ViewerError};

/// Looks up schema documents by id
pub trait DocumentResolver {
    fn resolve(&self, document_id: &str) -> Result<Cow<'_, Value>>;
}

impl<F> DocumentResolver for F
where
    F: Fn(&str) -> Result<Value>,
{
    fn resolve(&self, document_id: &str) -> Result<Cow<'_, Value>> {
        self(document_id).map(Cow::Owned)
    }
}

/// Configuration for directory loading
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Skip documents matching these path prefixes
    pub skip_prefixes: Vec<String>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            skip_prefixes: vec![
                "target/".to_string(),
                ".git/".to_string(),
                "node_modules/".to_string(),
            ],
        }
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// Already-loaded documents keyed by id
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: BTreeMap<String, Value>,
}

/// A fuzzy search hit
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub id: String,
    pub title: Option<String>,
    pub score: i64,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, document: Value) {
        self.documents.insert(id.into(), document);
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.documents.get(normalize_id(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Load every `.json` file under `dir`, keyed by its path relative to `dir`
    pub fn from_directory(dir: &Path, config: &LoadConfig) -> anyhow::Result<Self> {
        let mut store = Self::new();

        for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().map(|e| e != "json").unwrap_or(true) {
                continue;
            }

            let relative = path.strip_prefix(dir)?;
            let id = path_to_id(relative);
            if config.skip_prefixes.iter().any(|p| id.starts_with(p)) {
                continue;
            }

            let content = fs::read_to_string(path)?;
            let json: Value = serde_json::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse JSON in {}: {}", path.display(), e))?;

            store.insert(id, json);
        }

        tracing::debug!(dir = %dir.display(), documents = store.len(), "loaded schema documents");
        Ok(store)
    }

    /// Load documents compiled in with `include_dir!`
    pub fn from_embedded(dir: &'static Dir<'static>) -> anyhow::Result<Self> {
        let mut store = Self::new();
        collect_embedded(dir, &mut store)?;
        Ok(store)
    }

    /// Search document ids and titles (fuzzy)
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        use fuzzy_matcher::skim::SkimMatcherV2;
        use fuzzy_matcher::FuzzyMatcher;

        let matcher = SkimMatcherV2::default();
        let mut results: Vec<SearchResult> = Vec::new();

        for (id, document) in &self.documents {
            let title = document.get("title").and_then(Value::as_str);
            let score = title
                .and_then(|t| matcher.fuzzy_match(t, query))
                .into_iter()
                .chain(matcher.fuzzy_match(id, query))
                .max();

            if let Some(score) = score {
                results.push(SearchResult {
                    id: id.clone(),
                    title: title.map(String::from),
                    score,
                });
            }
        }

        results.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        results.truncate(limit);
        results
    }
}

impl DocumentResolver for DocumentStore {
    fn resolve(&self, document_id: &str) -> Result<Cow<'_, Value>> {
        self.get(document_id)
            .map(Cow::Borrowed)
            .ok_or_else(|| ViewerError::UnresolvableDocument(document_id.to_string()))
    }
}

fn collect_embedded(dir: &'static Dir<'static>, store: &mut DocumentStore) -> anyhow::Result<()> {
    for file in dir.files() {
        let path = file.path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            if let Some(content) = file.contents_utf8() {
                let json: Value = serde_json::from_str(content)
                    .map_err(|e| anyhow::anyhow!("Failed to parse embedded {}: {}", path.display(), e))?;
                store.insert(path_to_id(path), json);
            }
        }
    }

    for subdir in dir.dirs() {
        collect_embedded(subdir, store)?;
    }
    Ok(())
}

// =============================================================================
// Filesystem resolver
// =============================================================================

/// Reads documents from disk on every lookup, so an edited file shows up the
/// next time a reference into it is expanded. Ids must stay inside `root`:
/// absolute paths, URLs and `..` segments are unresolvable.
#[derive(Debug, Clone)]
pub struct FileResolver {
    root: PathBuf,
}

impl FileResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentResolver for FileResolver {
    fn resolve(&self, document_id: &str) -> Result<Cow<'_, Value>> {
        let relative = Path::new(normalize_id(document_id));
        let confined = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !confined || document_id.contains("://") {
            tracing::warn!(document = %document_id, "refusing document outside the schema directory");
            return Err(ViewerError::UnresolvableDocument(document_id.to_string()));
        }

        let path = self.root.join(relative);
        if !path.is_file() {
            return Err(ViewerError::UnresolvableDocument(document_id.to_string()));
        }

        let content = fs::read_to_string(&path)?;
        Ok(Cow::Owned(serde_json::from_str(&content)?))
    }
}

fn normalize_id(id: &str) -> &str {
    id.strip_prefix("./").unwrap_or(id)
}

fn path_to_id(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
