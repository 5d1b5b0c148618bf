//! Schema Node Classification
//!
//! Turns a raw JSON schema node into a closed [`SchemaKind`] in one step.
//! Every later stage matches on the kind instead of probing for keys.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, ViewerError};

/// Validation keywords shown in the meta column, in display order
pub const VALIDATION_KEYWORDS: [&str; 9] = [
    "additionalProperties",
    "uniqueItems",
    "format",
    "pattern",
    "maxLength",
    "minLength",
    "multipleOf",
    "maximum",
    "minimum",
];

// =============================================================================
// Combinators
// =============================================================================

/// `anyOf` / `oneOf` / `allOf`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CombinatorKind {
    AnyOf,
    OneOf,
    AllOf,
}

impl CombinatorKind {
    /// Checked in this order when a node carries more than one combinator
    pub const ALL: [CombinatorKind; 3] = [
        CombinatorKind::AnyOf,
        CombinatorKind::OneOf,
        CombinatorKind::AllOf,
    ];

    /// The JSON key for this combinator
    pub fn keyword(&self) -> &'static str {
        match self {
            CombinatorKind::AnyOf => "anyOf",
            CombinatorKind::OneOf => "oneOf",
            CombinatorKind::AllOf => "allOf",
        }
    }

    /// Header label
    pub fn label(&self) -> &'static str {
        match self {
            CombinatorKind::AnyOf => "Any of",
            CombinatorKind::OneOf => "One of",
            CombinatorKind::AllOf => "All of",
        }
    }

    /// Human-readable matching rule shown next to the label
    pub fn hint(&self) -> &'static str {
        match self {
            CombinatorKind::AnyOf => "any one may match",
            CombinatorKind::OneOf => "exactly one must match",
            CombinatorKind::AllOf => "all must match",
        }
    }

    /// Word placed between consecutive branches
    pub fn separator(&self) -> &'static str {
        match self {
            CombinatorKind::AnyOf | CombinatorKind::OneOf => "or",
            CombinatorKind::AllOf => "and",
        }
    }
}

// =============================================================================
// Schema Kind
// =============================================================================

/// Array item schemas
#[derive(Debug, Clone, Copy)]
pub enum Items<'a> {
    /// List validation: one schema governs every element
    List(&'a Value),
    /// Tuple validation: one schema per position
    Tuple(&'a [Value]),
}

impl<'a> Items<'a> {
    /// Item schemas paired with their pointer segment (`items` or `items/N`)
    pub fn entries(&self) -> Vec<(String, &'a Value)> {
        match *self {
            Items::List(item) => vec![("items".to_string(), item)],
            Items::Tuple(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| (format!("items/{}", i), item))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Items::List(_) => 1,
            Items::Tuple(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What a schema node is, decided once per node
#[derive(Debug, Clone, Copy)]
pub enum SchemaKind<'a> {
    Combinator {
        kind: CombinatorKind,
        branches: &'a [Value],
    },
    Reference {
        uri: &'a str,
    },
    Object {
        properties: Option<&'a Map<String, Value>>,
    },
    Array {
        items: Items<'a>,
    },
    /// string, number, integer, boolean, null, or no recognised type
    Primitive,
}

impl SchemaKind<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            SchemaKind::Combinator { .. } => "combinator",
            SchemaKind::Reference { .. } => "reference",
            SchemaKind::Object { .. } => "object",
            SchemaKind::Array { .. } => "array",
            SchemaKind::Primitive => "primitive",
        }
    }
}

/// Classify a schema node.
///
/// Precedence is combinator, then `$ref`, then `type`. `path` is only used
/// to locate structural errors.
pub fn classify<'a>(node: &'a Value, path: &str) -> Result<SchemaKind<'a>> {
    let obj = node
        .as_object()
        .ok_or_else(|| ViewerError::structural(path, format!("expected a schema object, found {}", json_kind(node))))?;

    for kind in CombinatorKind::ALL {
        if let Some(value) = obj.get(kind.keyword()) {
            let branches = value.as_array().ok_or_else(|| {
                ViewerError::structural(path, format!("{} must be an array", kind.keyword()))
            })?;
            return Ok(SchemaKind::Combinator { kind, branches });
        }
    }

    if let Some(value) = obj.get("$ref") {
        let uri = value
            .as_str()
            .ok_or_else(|| ViewerError::structural(path, "$ref must be a string"))?;
        return Ok(SchemaKind::Reference { uri });
    }

    match obj.get("type").and_then(Value::as_str) {
        Some("object") => {
            let properties = match obj.get("properties") {
                None => None,
                Some(Value::Object(map)) => Some(map),
                Some(other) => {
                    return Err(ViewerError::structural(
                        path,
                        format!("properties must be an object, found {}", json_kind(other)),
                    ))
                }
            };
            Ok(SchemaKind::Object { properties })
        }
        Some("array") => {
            let items = match obj.get("items") {
                None => {
                    return Err(ViewerError::structural(path, "array schema has no items"));
                }
                Some(Value::Array(items)) => Items::Tuple(items.as_slice()),
                Some(item @ Value::Object(_)) => Items::List(item),
                Some(other) => {
                    return Err(ViewerError::structural(
                        path,
                        format!("items must be a schema or an array of schemas, found {}", json_kind(other)),
                    ))
                }
            };
            Ok(SchemaKind::Array { items })
        }
        _ => Ok(SchemaKind::Primitive),
    }
}

// =============================================================================
// Field accessors
// =============================================================================

/// The node's own `name`, if it carries one
pub fn name(node: &Value) -> Option<&str> {
    node.get("name").and_then(Value::as_str)
}

pub fn title(node: &Value) -> Option<&str> {
    node.get("title").and_then(Value::as_str)
}

pub fn description(node: &Value) -> Option<&str> {
    node.get("description").and_then(Value::as_str)
}

/// `(type)` annotation; union types are joined with ` | `
pub fn type_annotation(node: &Value) -> Option<String> {
    match node.get("type")? {
        Value::String(ty) => Some(format!("({})", ty)),
        Value::Array(types) => {
            let names: Vec<&str> = types.iter().filter_map(Value::as_str).collect();
            if names.is_empty() {
                None
            } else {
                Some(format!("({})", names.join(" | ")))
            }
        }
        _ => None,
    }
}

/// `key: value` lines for every present validation keyword, then `required`
pub fn validation_lines(node: &Value) -> Vec<String> {
    let Some(obj) = node.as_object() else {
        return Vec::new();
    };

    let mut lines: Vec<String> = VALIDATION_KEYWORDS
        .iter()
        .filter_map(|keyword| obj.get(*keyword).map(|value| format!("{}: {}", keyword, display_value(value))))
        .collect();

    if let Some(required) = obj.get("required").and_then(Value::as_array) {
        let fields: Vec<&str> = required.iter().filter_map(Value::as_str).collect();
        lines.push(format!("required: {}", fields.join(", ")));
    }

    lines
}

/// Strings verbatim, everything else as compact JSON
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_combinator_wins_over_ref_and_type() {
        let schema = json!({
            "type": "string",
            "$ref": "#/definitions/Foo",
            "allOf": [{ "type": "string" }]
        });

        match classify(&schema, "").unwrap() {
            SchemaKind::Combinator { kind, branches } => {
                assert_eq!(kind, CombinatorKind::AllOf);
                assert_eq!(branches.len(), 1);
            }
            other => panic!("Expected Combinator, got {:?}", other),
        }
    }

    #[test]
    fn test_ref_wins_over_type() {
        let schema = json!({ "type": "object", "$ref": "#/definitions/Foo" });
        match classify(&schema, "").unwrap() {
            SchemaKind::Reference { uri } => assert_eq!(uri, "#/definitions/Foo"),
            other => panic!("Expected Reference, got {:?}", other),
        }
    }

    #[test]
    fn test_any_of_checked_before_one_of() {
        let schema = json!({ "oneOf": [], "anyOf": [] });
        match classify(&schema, "").unwrap() {
            SchemaKind::Combinator { kind, .. } => assert_eq!(kind, CombinatorKind::AnyOf),
            other => panic!("Expected Combinator, got {:?}", other),
        }
    }

    #[test]
    fn test_list_and_tuple_items() {
        let list = json!({ "type": "array", "items": { "type": "string" } });
        let tuple = json!({ "type": "array", "items": [{ "type": "string" }, { "type": "number" }] });

        match classify(&list, "").unwrap() {
            SchemaKind::Array { items: Items::List(_) } => {}
            other => panic!("Expected list items, got {:?}", other),
        }
        match classify(&tuple, "").unwrap() {
            SchemaKind::Array { items } => {
                let entries = items.entries();
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[1].0, "items/1");
            }
            other => panic!("Expected tuple items, got {:?}", other),
        }
    }

    #[test]
    fn test_array_without_items_is_structural_error() {
        let schema = json!({ "type": "array" });
        let err = classify(&schema, "/properties/tags").unwrap_err();
        match err {
            ViewerError::StructuralSchema { path, message } => {
                assert_eq!(path, "/properties/tags");
                assert!(message.contains("items"));
            }
            other => panic!("Expected StructuralSchema, got {:?}", other),
        }
    }

    #[test]
    fn test_non_object_properties_rejected() {
        let schema = json!({ "type": "object", "properties": ["a", "b"] });
        assert!(matches!(
            classify(&schema, ""),
            Err(ViewerError::StructuralSchema { .. })
        ));
    }

    #[test]
    fn test_non_object_node_rejected() {
        assert!(classify(&json!(true), "/items").is_err());
        assert!(classify(&json!({ "$ref": 4 }), "").is_err());
        assert!(classify(&json!({ "oneOf": {} }), "").is_err());
    }

    #[test]
    fn test_untyped_node_is_primitive() {
        assert!(matches!(classify(&json!({}), "").unwrap(), SchemaKind::Primitive));
        assert!(matches!(
            classify(&json!({ "type": "integer" }), "").unwrap(),
            SchemaKind::Primitive
        ));
    }

    #[test]
    fn test_validation_lines_in_declared_order() {
        let schema = json!({
            "type": "string",
            "minimum": 0,
            "pattern": "^[a-z]+$",
            "maxLength": 12,
            "format": "email",
            "required": ["a", "b"]
        });

        assert_eq!(
            validation_lines(&schema),
            vec![
                "format: email",
                "pattern: ^[a-z]+$",
                "maxLength: 12",
                "minimum: 0",
                "required: a, b",
            ]
        );
    }

    #[test]
    fn test_non_string_values_render_as_json() {
        let schema = json!({ "additionalProperties": false, "uniqueItems": true, "multipleOf": 0.5 });
        assert_eq!(
            validation_lines(&schema),
            vec!["additionalProperties: false", "uniqueItems: true", "multipleOf: 0.5"]
        );
    }

    #[test]
    fn test_type_annotation() {
        assert_eq!(type_annotation(&json!({ "type": "integer" })).as_deref(), Some("(integer)"));
        assert_eq!(
            type_annotation(&json!({ "type": ["string", "null"] })).as_deref(),
            Some("(string | null)")
        );
        assert_eq!(type_annotation(&json!({})), None);
    }
}
