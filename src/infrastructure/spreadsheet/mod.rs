use crate::domain::error::{AppError, Result};
use crate::domain::test_case::{TestCaseSet, TEST_CASE_FIELDS};
use std::path::Path;
use tracing::{debug, info};
use umya_spreadsheet::Worksheet;

pub const TESTCASE_SHEET: &str = "Testcases";
pub const COMPONENT_LABEL: &str = "Component";

/// Header region scanned for labelled cells, 1-based and inclusive.
const HEADER_ROWS: std::ops::RangeInclusive<u32> = 1..=9;
const HEADER_COLUMNS: std::ops::RangeInclusive<u32> = 1..=11;

/// Cell written when the template has no `Component:` label (E2).
const FALLBACK_COMPONENT_CELL: (u32, u32) = (5, 2);

const FIRST_DATA_ROW: u32 = 6;
const FIRST_DATA_COLUMN: u32 = 2;

/// Loads the template, writes the component label and one row per test case,
/// and saves the result as a new workbook. The template is only read.
pub fn fill_excel_template(
    test_cases: &TestCaseSet,
    template_path: &Path,
    output_path: &Path,
    component_name: &str,
) -> Result<()> {
    let mut book = umya_spreadsheet::reader::xlsx::read(template_path).map_err(|e| {
        AppError::TemplateStructure(format!(
            "Failed to open template {}: {}",
            template_path.display(),
            e
        ))
    })?;

    let sheet = book.get_sheet_by_name_mut(TESTCASE_SHEET).ok_or_else(|| {
        AppError::TemplateStructure(format!(
            "Worksheet '{}' not found in {}",
            TESTCASE_SHEET,
            template_path.display()
        ))
    })?;

    if !set_header(sheet, COMPONENT_LABEL, component_name) {
        debug!(
            cell = ?FALLBACK_COMPONENT_CELL,
            "No component label in template header, using fallback cell"
        );
        sheet
            .get_cell_mut(FALLBACK_COMPONENT_CELL)
            .set_value_string(format!("{}: {}", COMPONENT_LABEL, component_name));
    }

    write_rows(sheet, test_cases);

    umya_spreadsheet::writer::xlsx::write(&book, output_path).map_err(|e| {
        AppError::WorkbookWrite(format!(
            "Failed to save workbook {}: {}",
            output_path.display(),
            e
        ))
    })?;

    info!(
        output = %output_path.display(),
        rows = test_cases.len(),
        "Saved test case workbook"
    );
    Ok(())
}

/// Finds the first `label:` cell in the header region (row by row) and
/// replaces its value, keeping the label text as written in the template.
fn set_header(sheet: &mut Worksheet, label: &str, value: &str) -> bool {
    match find_label_cell(sheet, label) {
        Some((coordinate, prefix)) => {
            sheet
                .get_cell_mut(coordinate)
                .set_value_string(format!("{}: {}", prefix, value));
            true
        }
        None => false,
    }
}

fn find_label_cell(sheet: &Worksheet, label: &str) -> Option<((u32, u32), String)> {
    let needle = format!("{}:", label.to_lowercase().trim_end_matches(':'));
    for row in HEADER_ROWS {
        for col in HEADER_COLUMNS {
            let Some(cell) = sheet.get_cell((col, row)) else {
                continue;
            };
            let text = cell.get_value();
            if text.to_lowercase().starts_with(&needle) {
                let prefix = text.split(':').next().unwrap_or(label).to_string();
                return Some(((col, row), prefix));
            }
        }
    }
    None
}

fn write_rows(sheet: &mut Worksheet, test_cases: &TestCaseSet) {
    for (row, test_case) in (FIRST_DATA_ROW..).zip(test_cases.iter()) {
        for (col, field) in (FIRST_DATA_COLUMN..).zip(TEST_CASE_FIELDS.iter()) {
            sheet
                .get_cell_mut((col, row))
                .set_value_string(test_case.get(field).unwrap_or_default());
        }
    }
}
