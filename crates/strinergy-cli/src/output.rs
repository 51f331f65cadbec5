// crates/strinergy-cli/src/output.rs
//
// Output formatting utilities for the Strinergy CLI.
// Supports table and JSON output modes.

use serde::Serialize;
use std::str::FromStr;
use tabled::{Table, Tabled};

use strinergy_core::error::StrinergyError;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed table output (default).
    Table,
    /// JSON output for machine consumption.
    Json,
}

impl FromStr for OutputFormat {
    type Err = StrinergyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(StrinergyError::InvalidConfig(format!(
                "unknown output format '{}' (expected table or json)",
                other
            ))),
        }
    }
}

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Format a serializable value as a pretty-printed JSON string.
pub fn format_json<T: Serialize>(data: &T) -> Result<String, StrinergyError> {
    Ok(serde_json::to_string_pretty(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Tabled, Serialize)]
    struct Row {
        name: String,
        value: u64,
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_format_table_has_headers() {
        let rows = vec![Row {
            name: "p1".to_string(),
            value: 9_000,
        }];
        let table = format_table(&rows);
        assert!(table.contains("name"));
        assert!(table.contains("9000"));
    }

    #[test]
    fn test_format_json() {
        let rows = vec![Row {
            name: "p1".to_string(),
            value: 9_000,
        }];
        let json = format_json(&rows).unwrap();
        assert!(json.contains("\"value\": 9000"));
    }
}
