use crate::domain::error::{AppError, Result};
use crate::domain::test_case::{TestCaseRecord, TestCaseSet, UNKNOWN_COMPONENT};
use once_cell::sync::Lazy;
use regex::Regex;

static COMPONENT_LINE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^[ \t]*Component[ \t]*:[ \t]*(.*?)[ \t\r]*$").unwrap());

const COLUMN_SEPARATOR: char = '|';
const HEADER_TOKEN: &str = "Test Case ID";

/// Header row, separator row and at least one data row.
const MIN_TABLE_LINES: usize = 3;

/// Value of the first `Component: <name>` line with a non-blank name, or
/// `"Unknown"`. The name never extends past its own line.
pub(crate) fn extract_component(output: &str) -> String {
    COMPONENT_LINE_PATTERN
        .captures_iter(output)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .find(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_COMPONENT)
        .to_string()
}

pub(crate) fn clean_cell(value: &str) -> String {
    value.replace("<br>", "\n").replace("\\n", "\n").trim().to_string()
}

/// Inner cells of a `| a | b |` row; the segments outside the outer pipes are dropped.
fn split_row(line: &str) -> Vec<&str> {
    let parts: Vec<&str> = line.split(COLUMN_SEPARATOR).collect();
    if parts.len() < 2 {
        return Vec::new();
    }
    parts[1..parts.len() - 1].to_vec()
}

/// Parses the first markdown table whose header mentions `Test Case ID`.
///
/// Text before and after the table is ignored. Data rows whose cell count
/// differs from the header are skipped without error.
pub(crate) fn parse_markdown_table(output: &str) -> Result<TestCaseSet> {
    let lines: Vec<&str> = output.lines().collect();

    let start_idx = lines
        .iter()
        .position(|line| line.contains(COLUMN_SEPARATOR) && line.contains(HEADER_TOKEN))
        .ok_or(AppError::TableNotFound)?;

    let table_lines: Vec<&str> = lines[start_idx..]
        .iter()
        .take_while(|line| line.contains(COLUMN_SEPARATOR))
        .copied()
        .collect();

    if table_lines.len() < MIN_TABLE_LINES {
        return Err(AppError::IncompleteTable);
    }

    let headers: Vec<String> = split_row(table_lines[0])
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();

    let records = table_lines[2..]
        .iter()
        .filter_map(|row| {
            let cells: Vec<String> = split_row(row).into_iter().map(clean_cell).collect();
            (cells.len() == headers.len())
                .then(|| TestCaseRecord::from_pairs(headers.iter().cloned().zip(cells)))
        })
        .collect();

    TestCaseSet::new(records)
}
