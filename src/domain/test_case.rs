use crate::domain::error::{AppError, Result};
use indexmap::IndexMap;
use serde::Serialize;

/// Column names the generated table must carry, in spreadsheet order.
pub const TEST_CASE_FIELDS: [&str; 7] = [
    "Test Case ID",
    "Preconditions",
    "Test Condition",
    "Steps with description",
    "Expected Result",
    "Actual Result",
    "Remarks",
];

pub const UNKNOWN_COMPONENT: &str = "Unknown";

/// One admitted table row, keyed by the table's own header names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestCaseRecord {
    fields: IndexMap<String, String>,
}

impl TestCaseRecord {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Ordered, never-empty collection of parsed test cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCaseSet {
    records: Vec<TestCaseRecord>,
}

impl TestCaseSet {
    pub fn new(records: Vec<TestCaseRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(AppError::EmptyResult);
        }
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestCaseRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[TestCaseRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a TestCaseSet {
    type Item = &'a TestCaseRecord;
    type IntoIter = std::slice::Iter<'a, TestCaseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Result of one job; printed by the CLI, optionally as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationSummary {
    pub component: String,
    pub test_case_count: usize,
    pub output_path: String,
}
