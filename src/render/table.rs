//! Tabular result normalization.
//!
//! Converts the service's row records into a rectangular grid. The header
//! set comes from the first row only; later rows are projected onto it.

use crate::payload::RowRecord;
use serde::Serialize;
use serde_json::Value;

/// Placeholder shown instead of a grid when there are no rows.
pub const NO_DATA_MESSAGE: &str = "No data returned from query.";

/// Literal shown for an explicit null.
pub const NULL_TOKEN: &str = "NULL";

/// A single normalized cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Cell {
    /// A present, non-null value in textual form.
    Value(String),
    /// The row carried the column with an explicit `null`.
    Null,
    /// The row did not carry the column at all.
    Missing,
}

impl Cell {
    /// Returns the text shown for this cell.
    pub fn as_display(&self) -> &str {
        match self {
            Self::Value(text) => text,
            Self::Null => NULL_TOKEN,
            Self::Missing => "",
        }
    }

    /// Returns true if the cell is an explicit null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Displayable result of [`render_table`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableContent {
    /// No rows; rendered as [`NO_DATA_MESSAGE`].
    Empty,
    /// Headers plus one cell per header for every row.
    Grid {
        headers: Vec<String>,
        rows: Vec<Vec<Cell>>,
    },
}

impl TableContent {
    /// Number of data rows (zero for the placeholder).
    pub fn row_count(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Grid { rows, .. } => rows.len(),
        }
    }
}

/// Normalizes row records into a grid.
pub fn render_table(rows: Option<&[RowRecord]>) -> TableContent {
    let rows = rows.unwrap_or_default();
    let Some(first) = rows.first() else {
        return TableContent::Empty;
    };

    let headers: Vec<String> = first.keys().cloned().collect();

    let grid = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|header| cell_for(row.get(header)))
                .collect()
        })
        .collect();

    TableContent::Grid {
        headers,
        rows: grid,
    }
}

fn cell_for(value: Option<&Value>) -> Cell {
    match value {
        None => Cell::Missing,
        Some(Value::Null) => Cell::Null,
        Some(Value::String(s)) => Cell::Value(s.clone()),
        // Numbers, booleans and nested values keep their JSON text.
        Some(other) => Cell::Value(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn rows(value: Value) -> Vec<RowRecord> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_rows_yield_placeholder() {
        assert_eq!(render_table(Some(&[])), TableContent::Empty);
        assert_eq!(render_table(None), TableContent::Empty);
    }

    #[test]
    fn test_headers_follow_first_row_order() {
        let data = rows(json!([{"id": 1, "name": "a"}, {"id": 2, "name": null}]));
        let TableContent::Grid { headers, rows } = render_table(Some(&data)) else {
            panic!("expected grid");
        };

        assert_eq!(headers, vec!["id", "name"]);
        assert_eq!(
            rows,
            vec![
                vec![Cell::Value("1".into()), Cell::Value("a".into())],
                vec![Cell::Value("2".into()), Cell::Null],
            ]
        );
        assert_eq!(rows[1][1].as_display(), "NULL");
    }

    #[test]
    fn test_zero_and_empty_string_are_not_null() {
        let data = rows(json!([{"count": 0, "label": "", "flag": false}]));
        let TableContent::Grid { rows, .. } = render_table(Some(&data)) else {
            panic!("expected grid");
        };

        let displayed: Vec<&str> = rows[0].iter().map(Cell::as_display).collect();
        assert_eq!(displayed, vec!["0", "", "false"]);
        assert!(rows[0].iter().all(|c| !c.is_null()));
    }

    #[test]
    fn test_missing_key_renders_blank() {
        let data = rows(json!([{"id": 1, "email": "a@b.c"}, {"id": 2}]));
        let TableContent::Grid { rows, .. } = render_table(Some(&data)) else {
            panic!("expected grid");
        };

        assert_eq!(rows[1][1], Cell::Missing);
        assert_eq!(rows[1][1].as_display(), "");
    }

    #[test]
    fn test_extra_keys_in_later_rows_are_ignored() {
        let data = rows(json!([{"id": 1}, {"id": 2, "surprise": "x"}]));
        let TableContent::Grid { headers, rows } = render_table(Some(&data)) else {
            panic!("expected grid");
        };

        assert_eq!(headers, vec!["id"]);
        assert!(rows.iter().all(|r| r.len() == 1));
    }

    #[test]
    fn test_nested_values_render_as_compact_json() {
        let data = rows(json!([{"tags": ["a", "b"], "meta": {"k": 1}}]));
        let TableContent::Grid { rows, .. } = render_table(Some(&data)) else {
            panic!("expected grid");
        };

        assert_eq!(rows[0][0].as_display(), r#"["a","b"]"#);
        assert_eq!(rows[0][1].as_display(), r#"{"k":1}"#);
    }

    #[test]
    fn test_row_count() {
        let data = rows(json!([{"id": 1}, {"id": 2}, {"id": 3}]));
        assert_eq!(render_table(Some(&data)).row_count(), 3);
        assert_eq!(TableContent::Empty.row_count(), 0);
    }
}
