//! Schema Viewer
//!
//! Renders JSON Schema documents as nested, expandable tables.
//!
//! ## Features
//!
//! - **Row Rendering**: Objects, arrays (list and tuple validation), primitives
//!   and `anyOf`/`oneOf`/`allOf` become an ordered sequence of display rows
//! - **Lazy `$ref` Expansion**: References render collapsed and are only
//!   resolved when the caller expands their cell
//! - **Injected Resolution**: Documents come from a caller-supplied
//!   [`DocumentResolver`] (in-memory store, filesystem, or closure)
//! - **Stateless Core**: Expansion state is passed in as a snapshot, and the
//!   schema is never written to
//!
//! ## Architecture
//!
//! ```text
//! Value ──classify──▶ SchemaKind ──Renderer──▶ Vec<Row> ──TableFormatter──▶ text
//!                                    │   ▲
//!                     ExpansionState ┘   └ DocumentResolver ($ref targets)
//! ```

pub mod config;
pub mod demo;
pub mod error;
pub mod reference;
pub mod render;
pub mod resolver;
pub mod row;
pub mod schema;
pub mod table;

pub use config::{OutputFormat, ViewerConfig};
pub use demo::{demo_store, DemoView};
pub use error::{Result, ViewerError};
pub use reference::{CellId, ExpansionState, RefDescriptor, RefTarget, Resolved};
pub use render::{expand_levels, RenderContext, Renderer};
pub use resolver::{DocumentResolver, DocumentStore, FileResolver, LoadConfig};
pub use row::{collapsed_cells, Row, RowKind, Toggle, ToggleAction};
pub use schema::{classify, CombinatorKind, Items, SchemaKind};
pub use table::{format_json, TableFormatter};
