use std::collections::HashMap;

use crate::export::labels::{LabelKind, LabelTables};
use crate::export::table::{PATH_SEPARATOR, columns};
use crate::models::{Priority, TestCaseRecord};
use crate::outline::ResolvedPath;

use super::steps::parse_steps;
use super::{ImportError, ImportedCase};

const REQUIRED: [&str; 2] = [columns::MODULE, columns::TITLE];

/// Header name → column index, matched case-insensitively.
struct HeaderMap(HashMap<String, usize>);

impl HeaderMap {
    fn new(headers: &csv::StringRecord) -> Self {
        Self(
            headers
                .iter()
                .enumerate()
                .map(|(i, h)| (normalize_header(h), i))
                .collect(),
        )
    }

    fn missing(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| !self.0.contains_key(&normalize_header(name)))
            .map(|name| name.to_string())
            .collect()
    }

    fn cell<'r>(&self, row: &'r csv::StringRecord, name: &str) -> &'r str {
        self.0
            .get(&normalize_header(name))
            .and_then(|&i| row.get(i))
            .map_or("", str::trim)
    }
}

fn normalize_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

/// Read rows of a CSV case table.
///
/// Rows with a blank title are skipped. Steps are parsed per row, so later
/// merging only ever appends whole step lists.
pub fn read_table(bytes: &[u8], labels: &LabelTables) -> Result<Vec<ImportedCase>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers = HeaderMap::new(reader.headers()?);
    let missing = headers.missing(&REQUIRED);
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns(missing));
    }

    let mut cases = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let row = row?;
        let title = headers.cell(&row, columns::TITLE);
        if title.is_empty() {
            log::debug!("Skipping row {} with no title", line + 2);
            continue;
        }

        let path = ResolvedPath::parse(headers.cell(&row, columns::MODULE)).or_unclassified();
        let priority = headers.cell(&row, columns::PRIORITY);
        let priority = labels
            .code_for(LabelKind::Priority, priority)
            .unwrap_or(Priority::Medium.code());

        let case = TestCaseRecord {
            title: title.to_string(),
            preconditions: non_empty(headers.cell(&row, columns::PRECONDITIONS)),
            steps: parse_steps(
                headers.cell(&row, columns::STEPS),
                headers.cell(&row, columns::EXPECTED),
            ),
            priority: Some(priority.to_string()),
            category: reverse_label(labels, LabelKind::Category, headers.cell(&row, columns::CATEGORY)),
            design_method: reverse_label(labels, LabelKind::Method, headers.cell(&row, columns::METHOD)),
            import_module_name: Some(path.join(PATH_SEPARATOR)),
            ..TestCaseRecord::default()
        };
        cases.push(ImportedCase::new(path, case));
    }

    log::debug!("Read {} rows from case table", cases.len());
    Ok(cases)
}

/// Code for a label cell, or the raw text when it matches no label.
fn reverse_label(labels: &LabelTables, kind: LabelKind, text: &str) -> Option<String> {
    let code = labels.code_for(kind, text).unwrap_or(text);
    non_empty(code)
}
