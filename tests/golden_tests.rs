//! Golden Tests for Row Rendering
//!
//! Renders fixture documents and checks the exact row sequences.

use std::path::{Path, PathBuf};

use serde_json::Value;

use schema_viewer::{
    collapsed_cells, demo_store, expand_levels, CellId, DemoView, DocumentResolver, DocumentStore,
    ExpansionState, FileResolver, LoadConfig, Renderer, Row, RowKind, TableFormatter, ToggleAction,
    ViewerError,
};

fn fixtures_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture_store() -> DocumentStore {
    DocumentStore::from_directory(&fixtures_path(), &LoadConfig::default()).unwrap()
}

fn render(store: &DocumentStore, id: &str, state: &ExpansionState) -> Vec<Row> {
    let root = store.get(id).unwrap();
    Renderer::new(store, state).render(root, id)
}

fn texts(rows: &[Row]) -> Vec<&str> {
    rows.iter().map(|r| r.primary_text.as_str()).collect()
}

fn depths(rows: &[Row]) -> Vec<usize> {
    rows.iter().map(|r| r.depth).collect()
}

// =============================================================================
// Basic shapes
// =============================================================================

#[test]
fn test_object_with_age() {
    let schema: Value = serde_json::from_str(include_str!("fixtures/object_age.json")).unwrap();
    let store = fixture_store();
    let state = ExpansionState::new();

    let rows = Renderer::new(&store, &state).render(&schema, "object_age.json");

    assert_eq!(texts(&rows), vec!["{", "age", "}"]);
    assert_eq!(rows[1].type_annotation.as_deref(), Some("(integer)"));
    assert_eq!(rows[1].validation_lines, vec!["minimum: 0"]);
}

#[test]
fn test_widget_reference_collapsed_and_expanded() {
    let store = fixture_store();
    let mut state = ExpansionState::new();

    let collapsed = render(&store, "ref_widget.json", &state);
    assert_eq!(collapsed.len(), 1);
    assert_eq!(collapsed[0].kind, RowKind::Reference);
    assert_eq!(collapsed[0].primary_text, "Widget");

    state.toggle(&CellId::root());
    let expanded = render(&store, "ref_widget.json", &state);
    assert_eq!(expanded.len(), 1);
    assert_eq!(expanded[0].kind, RowKind::Leaf);
    assert_eq!(expanded[0].type_annotation.as_deref(), Some("(string)"));
    assert_eq!(expanded[0].depth, collapsed[0].depth);

    state.toggle(&CellId::root());
    assert_eq!(render(&store, "ref_widget.json", &state), collapsed);
}

#[test]
fn test_any_of_has_single_separator() {
    let store = fixture_store();
    let rows = render(&store, "anyof_pair.json", &ExpansionState::new());

    let kinds: Vec<RowKind> = rows.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![RowKind::CombinatorHeader, RowKind::Leaf, RowKind::Separator, RowKind::Leaf]
    );
    assert_eq!(rows[1].type_annotation.as_deref(), Some("(string)"));
    assert_eq!(rows[3].type_annotation.as_deref(), Some("(number)"));
}

// =============================================================================
// Composite document
// =============================================================================

#[test]
fn test_order_collapsed() {
    let store = fixture_store();
    let rows = render(&store, "order.json", &ExpansionState::new());

    assert_eq!(
        texts(&rows),
        vec![
            "{",
            "id",
            "lines : [",
            "⤷ line",
            "]",
            "shipping : address",
            "location : [",
            "lat",
            "lon",
            "]",
            "status : One of",
            "",
            "or",
            "",
            "broken",
            "}",
        ]
    );
    assert_eq!(
        depths(&rows),
        vec![0, 1, 1, 2, 1, 1, 1, 2, 2, 1, 1, 1, 1, 1, 1, 0]
    );
    assert_eq!(rows[0].validation_lines, vec!["required: id, lines"]);
    assert_eq!(rows[14].kind, RowKind::Error);
    assert_eq!(
        collapsed_cells(&rows),
        vec![
            CellId::from("#/properties/lines/items"),
            CellId::from("#/properties/shipping"),
        ]
    );
}

#[test]
fn test_order_external_reference_uses_its_own_document() {
    let store = fixture_store();
    let mut state = ExpansionState::new();
    state.expand(CellId::from("#/properties/shipping"));
    state.expand(CellId::from("#/properties/shipping/properties/country"));

    let rows = render(&store, "order.json", &state);
    let start = rows.iter().position(|r| r.primary_text == "shipping : {").unwrap();

    assert_eq!(
        texts(&rows[start..start + 4]),
        vec!["shipping : {", "city", "country", "}"]
    );
    assert_eq!(depths(&rows[start..start + 4]), vec![1, 2, 2, 1]);
    assert_eq!(rows[start + 2].validation_lines, vec!["pattern: ^[A-Z]{2}$"]);
    assert_eq!(
        rows[start].toggle.as_ref().map(|t| (t.cell.as_str(), t.action)),
        Some(("#/properties/shipping", ToggleAction::Collapse))
    );
}

#[test]
fn test_order_expanding_one_cell_leaves_siblings_alone() {
    let store = fixture_store();
    let collapsed = render(&store, "order.json", &ExpansionState::new());

    let mut state = ExpansionState::new();
    state.expand(CellId::from("#/properties/lines/items"));
    let expanded = render(&store, "order.json", &state);

    // the single reference row became header + 2 properties + closer
    assert_eq!(expanded.len(), collapsed.len() + 3);
    assert_eq!(texts(&expanded[3..7]), vec!["{", "sku", "quantity", "}"]);
    assert!(expanded[3].array_item);
    assert_eq!(texts(&expanded[7..]), texts(&collapsed[4..]));
}

#[test]
fn test_strict_render_fails_on_broken_array() {
    let store = fixture_store();
    let state = ExpansionState::new();
    let root = store.get("order.json").unwrap();

    let err = Renderer::new(&store, &state).try_render(root, "order.json").unwrap_err();
    assert!(matches!(err, ViewerError::StructuralSchema { ref path, .. } if path == "#/properties/broken"));
}

#[test]
fn test_missing_external_document_is_local_error() {
    let store = fixture_store();
    let id = "missing_external.json";
    let collapsed = render(&store, id, &ExpansionState::new());

    let remote = CellId::from("#/properties/remote");
    let item = CellId::from("#/properties/items/items");
    let state: ExpansionState = [remote.clone(), item.clone()].into_iter().collect();
    let rows = render(&store, id, &state);

    assert_eq!(texts(&rows), vec!["{", "remote", "items : [", "", "]", "local", "}"]);
    assert_eq!(depths(&rows), depths(&collapsed));

    assert_eq!(rows[1].kind, RowKind::Error);
    assert!(rows[1].description.as_deref().unwrap().contains("vendor/absent.json"));
    assert_eq!(
        rows[1].toggle.as_ref().map(|t| (t.cell.clone(), t.action)),
        Some((remote, ToggleAction::Collapse))
    );

    assert_eq!(rows[3].kind, RowKind::Error);
    assert!(rows[3].array_item);
    assert_eq!(
        rows[3].toggle.as_ref().map(|t| (t.cell.clone(), t.action)),
        Some((item, ToggleAction::Collapse))
    );

    assert_eq!(rows[5], collapsed[5]);
    assert_eq!(rows[5].type_annotation.as_deref(), Some("(string)"));

    let files = FileResolver::new(fixtures_path());
    let root = files.resolve(id).unwrap().into_owned();
    assert_eq!(Renderer::new(&files, &state).render(&root, id), rows);

    let err = Renderer::new(&store, &state).try_render(&root, id).unwrap_err();
    assert!(matches!(err, ViewerError::UnresolvableDocument(ref doc) if doc == "vendor/absent.json"));
}

#[test]
fn test_file_resolver_matches_store() {
    let store = fixture_store();
    let files = FileResolver::new(fixtures_path());
    let mut state = ExpansionState::new();
    state.expand(CellId::from("#/properties/shipping"));

    let root = files.resolve("order.json").unwrap().into_owned();
    let from_files = Renderer::new(&files, &state).render(&root, "order.json");

    assert_eq!(from_files, render(&store, "order.json", &state));
}

#[test]
fn test_rendering_twice_is_identical() {
    let store = fixture_store();
    let mut state = ExpansionState::new();
    expand_levels(&store, store.get("order.json").unwrap(), "order.json", &mut state, 3);

    let first = render(&store, "order.json", &state);
    let second = render(&store, "order.json", &state);
    assert_eq!(first, second);
    assert!(collapsed_cells(&first).is_empty());
}

// =============================================================================
// Demo set
// =============================================================================

#[test]
fn test_demo_views_render_without_errors() {
    let store = demo_store().unwrap();

    for view in DemoView::all() {
        for id in view.documents() {
            let mut state = ExpansionState::new();
            let root = store.get(id).unwrap();
            expand_levels(&store, root, id, &mut state, 2);

            let rows = Renderer::new(&store, &state).render(root, id);
            assert!(!rows.is_empty(), "{} rendered nothing", id);
            assert!(
                rows.iter().all(|r| r.kind != RowKind::Error),
                "{} produced an error row",
                id
            );
        }
    }
}

#[test]
fn test_demo_circular_reference_table() {
    let store = demo_store().unwrap();
    let id = "data-types/ref-circular-reference.json";
    let mut state = ExpansionState::new();
    state.expand(CellId::root());

    let rows = render(&store, id, &state);
    let table = TableFormatter::new(2, false).format(&rows);
    let structure: Vec<&str> = table.lines().map(|l| l.split("  (").next().unwrap().trim_end()).collect();

    assert_eq!(structure[0], "{ (-)");
    assert!(table.contains("⤷ node (+)"));
    assert_eq!(rows.len(), 6);
}
