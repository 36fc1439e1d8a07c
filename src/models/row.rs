use crate::error::AppError;
use serde_json::Value;
use std::str::FromStr;

/// A single spreadsheet row, decoded from a JSON array.
///
/// Cells are kept as loosely-typed JSON values and passed to the API as-is.
/// Nested arrays and objects are not flattened.
#[derive(Debug, Clone, PartialEq)]
pub struct Row(Vec<Value>);

impl Row {
    pub fn cells(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for Row {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells: Vec<Value> = serde_json::from_str(s).map_err(|e| {
            AppError::Values(format!("Failed to parse values as JSON array: {}", e))
        })?;

        Ok(Self(cells))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_preserves_order_and_types() {
        let row: Row = r#"["b", 1, "a", true, null, 2.5]"#.parse().unwrap();
        assert_eq!(
            row.cells(),
            &[
                json!("b"),
                json!(1),
                json!("a"),
                json!(true),
                Value::Null,
                json!(2.5)
            ]
        );
    }

    #[test]
    fn test_parse_keeps_nested_values() {
        let row: Row = r#"["x", [1, 2], {"k": "v"}]"#.parse().unwrap();
        assert_eq!(row.len(), 3, "nested values should not be flattened");
        assert_eq!(row.cells()[1], json!([1, 2]));
        assert_eq!(row.cells()[2], json!({"k": "v"}));
    }

    #[test]
    fn test_parse_empty_array() {
        let row: Row = "[]".parse().unwrap();
        assert!(row.is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        let err = "[\"a\", ".parse::<Row>().unwrap_err();
        assert!(matches!(err, AppError::Values(_)), "got {:?}", err);
    }

    #[test]
    fn test_parse_rejects_non_array() {
        for input in [r#"{"a": 1}"#, r#""a""#, "42"] {
            let err = input.parse::<Row>().unwrap_err();
            assert!(
                matches!(err, AppError::Values(_)),
                "{input} should be rejected, got {:?}",
                err
            );
        }
    }
}
