//! Plain-text table output
//!
//! Lays rows out in three columns: structure, meta and description.

use crate::row::{Row, RowKind, ToggleAction};

const COLUMN_GAP: &str = "  ";

/// Formats rows for a terminal
#[derive(Debug, Clone)]
pub struct TableFormatter {
    /// Spaces per depth level
    pub indent_width: usize,
    /// Include validation keyword lines in the meta column
    pub show_validation: bool,
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self {
            indent_width: 2,
            show_validation: true,
        }
    }
}

impl TableFormatter {
    pub fn new(indent_width: usize, show_validation: bool) -> Self {
        Self {
            indent_width,
            show_validation,
        }
    }

    /// Structure column text for one row
    pub fn structure(&self, row: &Row) -> String {
        let indent = " ".repeat(self.indent_width * row.depth);
        let comment = match row.kind {
            RowKind::CombinatorHeader | RowKind::Separator => "// ",
            _ => "",
        };
        let affordance = match row.toggle.as_ref().map(|t| t.action) {
            Some(ToggleAction::Expand) => " (+)",
            Some(ToggleAction::Collapse) => " (-)",
            None => "",
        };
        format!("{}{}{}{}", indent, comment, row.primary_text, affordance)
    }

    /// Meta column text: title, type annotation and validation lines
    pub fn meta(&self, row: &Row) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(title) = &row.title {
            parts.push(title);
        }
        if let Some(annotation) = &row.type_annotation {
            parts.push(annotation);
        }
        if self.show_validation {
            parts.extend(row.validation_lines.iter().map(String::as_str));
        }
        parts.join("; ")
    }

    pub fn format(&self, rows: &[Row]) -> String {
        let cells: Vec<(String, String, &str)> = rows
            .iter()
            .map(|row| {
                (
                    self.structure(row),
                    self.meta(row),
                    row.description.as_deref().unwrap_or(""),
                )
            })
            .collect();

        let structure_width = cells.iter().map(|c| c.0.chars().count()).max().unwrap_or(0);
        let meta_width = cells.iter().map(|c| c.1.chars().count()).max().unwrap_or(0);

        let mut out = String::new();
        for (structure, meta, description) in cells {
            let line = format!(
                "{:<sw$}{gap}{:<mw$}{gap}{}",
                structure,
                meta,
                description,
                sw = structure_width,
                mw = meta_width,
                gap = COLUMN_GAP,
            );
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

/// Rows as pretty JSON
pub fn format_json(rows: &[Row]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::CellId;

    fn sample() -> Vec<Row> {
        let mut header = Row::new(RowKind::Header, 0, "{");
        header.description = Some("A person".to_string());

        let mut age = Row::new(RowKind::Leaf, 1, "age");
        age.type_annotation = Some("(integer)".to_string());
        age.validation_lines = vec!["minimum: 0".to_string()];

        let owner = Row::new(RowKind::Reference, 1, "owner : Person")
            .with_toggle(CellId::from("#/properties/owner"), ToggleAction::Expand);

        vec![header, age, owner, Row::new(RowKind::Closer, 0, "}")]
    }

    #[test]
    fn test_structure_column() {
        let formatter = TableFormatter::default();
        let rows = sample();
        assert_eq!(formatter.structure(&rows[1]), "  age");
        assert_eq!(formatter.structure(&rows[2]), "  owner : Person (+)");

        let separator = Row::new(RowKind::Separator, 1, "or");
        assert_eq!(formatter.structure(&separator), "  // or");
    }

    #[test]
    fn test_meta_column() {
        let rows = sample();
        assert_eq!(TableFormatter::default().meta(&rows[1]), "(integer); minimum: 0");
        assert_eq!(TableFormatter::new(2, false).meta(&rows[1]), "(integer)");
    }

    #[test]
    fn test_columns_are_aligned() {
        let out = TableFormatter::new(4, true).format(&sample());
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3], "}");
        let description_col = lines[0].find("A person").unwrap();
        assert!(description_col > "    owner : Person (+)".len());
    }

    #[test]
    fn test_json_output() {
        let json = format_json(&sample()).unwrap();
        let parsed: Vec<Row> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample());
    }
}
