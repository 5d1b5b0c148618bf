//! Schema Rendering
//!
//! Walks a schema depth-first and produces display rows. The renderer is a
//! pure function of its inputs: the schema, the caller's
//! [`ExpansionState`] snapshot and the [`DocumentResolver`]. It never writes
//! to the schema; property keys and reference names travel down as labels
//! in the [`RenderContext`].
//!
//! ```text
//! {"type":"object","properties":{"age":{"type":"integer","minimum":0}}}
//!
//! {                  |
//!   age  (integer)   | minimum: 0
//! }                  |
//! ```

use serde_json::Value;

use crate::error::{Result, ViewerError};
use crate::reference::{CellId, ExpansionState, RefDescriptor, Resolved};
use crate::resolver::DocumentResolver;
use crate::row::{collapsed_cells, labelled, Row, RowKind, Toggle, ToggleAction, ARRAY_ITEM_MARKER};
use crate::schema::{self, CombinatorKind, Items, SchemaKind};

/// Where a node sits in the rendered tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    /// Indentation depth
    pub depth: usize,
    /// The node is (one of) its parent array's item schemas
    pub array_item: bool,
    /// The node replaces an expanded reference; its first row gets the
    /// collapse affordance for the cell at `path`
    pub top_level: bool,
    /// Pointer path of the node, used for cell ids and error locations
    pub path: CellId,
    /// Document the node came from; local `#/...` refs resolve against it
    pub document_source: String,
    /// Display name: the node's own `name`, its property key, or the name
    /// of the reference it was reached through
    pub label: Option<String>,
}

impl RenderContext {
    /// Context for a document's root node; the root shows its own `name`
    pub fn root(root: &Value, document_source: impl Into<String>) -> Self {
        Self {
            depth: 0,
            array_item: false,
            top_level: false,
            path: CellId::root(),
            document_source: document_source.into(),
            label: schema::name(root).map(String::from),
        }
    }

    fn property(&self, key: &str, child: &Value) -> Self {
        Self {
            depth: self.depth + 1,
            array_item: false,
            top_level: false,
            path: self.path.child("properties").child(key),
            document_source: self.document_source.clone(),
            label: Some(schema::name(child).unwrap_or(key).to_string()),
        }
    }

    fn item(&self, segment: &str, item: &Value) -> Self {
        Self {
            depth: self.depth + 1,
            array_item: true,
            top_level: false,
            path: self.path.join(segment),
            document_source: self.document_source.clone(),
            label: schema::name(item).map(String::from),
        }
    }

    fn branch(&self, kind: CombinatorKind, index: usize, branch: &Value) -> Self {
        Self {
            depth: self.depth,
            array_item: false,
            top_level: false,
            path: self.path.child(kind.keyword()).child(&index.to_string()),
            document_source: self.document_source.clone(),
            label: schema::name(branch).map(String::from),
        }
    }
}

/// Renders schema nodes into rows
pub struct Renderer<'a> {
    resolver: &'a dyn DocumentResolver,
    state: &'a ExpansionState,
}

impl<'a> Renderer<'a> {
    pub fn new(resolver: &'a dyn DocumentResolver, state: &'a ExpansionState) -> Self {
        Self { resolver, state }
    }

    /// Render a root schema. Failures become error rows local to the
    /// subtree or reference that produced them.
    pub fn render(&self, root: &Value, document_source: &str) -> Vec<Row> {
        self.render_with(root, &RenderContext::root(root, document_source))
    }

    /// Render a node in an explicit context
    pub fn render_with(&self, node: &Value, ctx: &RenderContext) -> Vec<Row> {
        let mut rows = Vec::new();
        let outcome = self.render_child(node, ctx, &mut rows, false);
        debug_assert!(outcome.is_ok(), "lenient rendering substitutes error rows");
        rows
    }

    /// Like [`Renderer::render`], but the first error aborts the whole render
    pub fn try_render(&self, root: &Value, document_source: &str) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        self.render_node(root, &RenderContext::root(root, document_source), &mut rows, true)?;
        Ok(rows)
    }

    /// Ids of the collapsed references visible when rendering `root`
    pub fn reference_cells(&self, root: &Value, document_source: &str) -> Vec<CellId> {
        collapsed_cells(&self.render(root, document_source))
    }

    fn render_child(&self, node: &Value, ctx: &RenderContext, rows: &mut Vec<Row>, strict: bool) -> Result<()> {
        let mark = rows.len();
        match self.render_node(node, ctx, rows, strict) {
            Err(err) if !strict => {
                tracing::warn!(path = %ctx.path, error = %err, "substituting error row");
                rows.truncate(mark);
                rows.push(error_row(ctx, &err));
                Ok(())
            }
            other => other,
        }
    }

    fn render_node(&self, node: &Value, ctx: &RenderContext, rows: &mut Vec<Row>, strict: bool) -> Result<()> {
        let kind = schema::classify(node, ctx.path.as_str())?;
        tracing::debug!(path = %ctx.path, kind = kind.name(), depth = ctx.depth, "rendering schema node");

        match kind {
            SchemaKind::Combinator { kind, branches } => {
                self.render_combinator(node, kind, branches, ctx, rows, strict)
            }
            SchemaKind::Reference { uri } => self.render_reference(node, uri, ctx, rows, strict),
            SchemaKind::Object { properties } => {
                rows.push(self.header(node, ctx, "{"));
                for (key, child) in properties.into_iter().flatten() {
                    self.render_child(child, &ctx.property(key, child), rows, strict)?;
                }
                rows.push(closer(ctx, "}"));
                Ok(())
            }
            SchemaKind::Array { items } => self.render_array(node, items, ctx, rows, strict),
            SchemaKind::Primitive => {
                rows.push(leaf_row(node, ctx));
                Ok(())
            }
        }
    }

    fn render_array(
        &self,
        node: &Value,
        items: Items<'_>,
        ctx: &RenderContext,
        rows: &mut Vec<Row>,
        strict: bool,
    ) -> Result<()> {
        rows.push(self.header(node, ctx, "["));
        for (segment, item) in items.entries() {
            self.render_child(item, &ctx.item(&segment, item), rows, strict)?;
        }
        rows.push(closer(ctx, "]"));
        Ok(())
    }

    fn render_combinator(
        &self,
        node: &Value,
        kind: CombinatorKind,
        branches: &[Value],
        ctx: &RenderContext,
        rows: &mut Vec<Row>,
        strict: bool,
    ) -> Result<()> {
        let mut header = Row::new(
            RowKind::CombinatorHeader,
            ctx.depth,
            labelled(ctx.label.as_deref(), kind.label()),
        )
        .with_description(kind.hint());
        header.title = schema::title(node).map(String::from);
        header.array_item = ctx.array_item;
        if ctx.top_level {
            header = header.with_toggle(ctx.path.clone(), ToggleAction::Collapse);
        }
        rows.push(header);

        for (index, branch) in branches.iter().enumerate() {
            if index > 0 {
                rows.push(Row::new(RowKind::Separator, ctx.depth, kind.separator()));
            }
            self.render_child(branch, &ctx.branch(kind, index, branch), rows, strict)?;
        }
        Ok(())
    }

    fn render_reference(
        &self,
        node: &Value,
        uri: &str,
        ctx: &RenderContext,
        rows: &mut Vec<Row>,
        strict: bool,
    ) -> Result<()> {
        let descriptor = RefDescriptor::new(
            uri,
            ctx.label.as_deref(),
            schema::title(node),
            &ctx.document_source,
        );
        let cell = ctx.path.clone();

        if !self.state.is_expanded(&cell) {
            rows.push(collapsed_row(&descriptor, ctx, cell));
            return Ok(());
        }

        let resolved = match self.resolve_chain(&descriptor, &cell) {
            Ok(resolved) => resolved,
            Err(err) if !strict => {
                tracing::warn!(cell = %cell, error = %err, "reference expansion failed");
                rows.push(error_row(ctx, &err).with_toggle(cell, ToggleAction::Collapse));
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        let expanded = RenderContext {
            depth: ctx.depth,
            array_item: ctx.array_item,
            top_level: true,
            path: cell,
            document_source: resolved.document,
            label: descriptor.name.clone(),
        };
        self.render_child(&resolved.node, &expanded, rows, strict)
    }

    /// Resolve `descriptor`, following targets that are themselves bare
    /// `$ref`s until a renderable node turns up. A target seen twice is a
    /// circular reference.
    fn resolve_chain(&self, descriptor: &RefDescriptor, cell: &CellId) -> Result<Resolved> {
        let mut seen = vec![descriptor.target()];
        let mut resolved = descriptor.resolve(self.resolver)?;

        loop {
            let next = match schema::classify(&resolved.node, cell.as_str()) {
                Ok(SchemaKind::Reference { uri }) => RefDescriptor::new(uri, None, None, &resolved.document),
                _ => return Ok(resolved),
            };

            let target = next.target();
            if seen.contains(&target) {
                return Err(ViewerError::CircularReference(descriptor.uri.clone()));
            }
            tracing::debug!(cell = %cell, uri = %next.uri, "following reference alias");
            seen.push(target);
            resolved = next.resolve(self.resolver)?;
        }
    }

    fn header(&self, node: &Value, ctx: &RenderContext, marker: &str) -> Row {
        let mut row = Row::new(RowKind::Header, ctx.depth, labelled(ctx.label.as_deref(), marker));
        fill_meta(&mut row, node, ctx);
        row
    }
}

/// Expand every visible reference, one level per round, `levels` times
pub fn expand_levels(
    resolver: &dyn DocumentResolver,
    root: &Value,
    document_source: &str,
    state: &mut ExpansionState,
    levels: usize,
) {
    for level in 0..levels {
        let cells = Renderer::new(resolver, state).reference_cells(root, document_source);
        if cells.is_empty() {
            break;
        }
        tracing::debug!(level, cells = cells.len(), "expanding reference level");
        for cell in cells {
            state.expand(cell);
        }
    }
}

fn fill_meta(row: &mut Row, node: &Value, ctx: &RenderContext) {
    row.title = schema::title(node).map(String::from);
    row.validation_lines = schema::validation_lines(node);
    row.description = schema::description(node).map(String::from);
    row.array_item = ctx.array_item;
    if ctx.top_level {
        row.toggle = Some(Toggle {
            cell: ctx.path.clone(),
            action: ToggleAction::Collapse,
        });
    }
}

fn leaf_row(node: &Value, ctx: &RenderContext) -> Row {
    let mut row = Row::new(RowKind::Leaf, ctx.depth, labelled(ctx.label.as_deref(), ""));
    row.type_annotation = schema::type_annotation(node);
    fill_meta(&mut row, node, ctx);
    row
}

fn closer(ctx: &RenderContext, marker: &str) -> Row {
    Row::new(RowKind::Closer, ctx.depth, marker)
}

fn collapsed_row(descriptor: &RefDescriptor, ctx: &RenderContext, cell: CellId) -> Row {
    let text = labelled(descriptor.name.as_deref(), &descriptor.ref_name);
    let primary_text = if ctx.array_item {
        format!("{} {}", ARRAY_ITEM_MARKER, text)
    } else {
        text
    };

    let mut row = Row::new(RowKind::Reference, ctx.depth, primary_text)
        .with_description(descriptor.description.clone())
        .with_toggle(cell, ToggleAction::Expand);
    row.type_annotation = Some("($ref)".to_string());
    row.title = descriptor.title.clone();
    row.array_item = ctx.array_item;
    row
}

fn error_row(ctx: &RenderContext, err: &ViewerError) -> Row {
    let mut row = Row::new(RowKind::Error, ctx.depth, labelled(ctx.label.as_deref(), ""))
        .with_description(err.to_string());
    row.type_annotation = Some("(error)".to_string());
    row.array_item = ctx.array_item;
    if ctx.top_level {
        row = row.with_toggle(ctx.path.clone(), ToggleAction::Collapse);
    }
    row
}
