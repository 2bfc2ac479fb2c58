use crate::models::{Step, TestCaseRecord};
use crate::outline::ResolvedPath;

use super::labels::{LabelKind, LabelTables};

/// Column headers shared by the tabular exporter, importer and template.
pub mod columns {
    pub const SEQUENCE: &str = "No.";
    pub const MODULE: &str = "Module";
    pub const TITLE: &str = "Title";
    pub const PRECONDITIONS: &str = "Preconditions";
    pub const STEPS: &str = "Steps";
    pub const EXPECTED: &str = "Expected";
    pub const PRIORITY: &str = "Priority";
    pub const CATEGORY: &str = "Category";
    pub const METHOD: &str = "Design method";
    pub const STATUS: &str = "Status";
    pub const EXECUTION_STATUS: &str = "Execution status";
    pub const EXECUTION_COMMENT: &str = "Execution comment";
}

/// Separator between path segments in the module column.
pub const PATH_SEPARATOR: &str = "/";

pub const CASE_HEADERS: [&str; 10] = [
    columns::SEQUENCE,
    columns::MODULE,
    columns::TITLE,
    columns::PRECONDITIONS,
    columns::STEPS,
    columns::EXPECTED,
    columns::PRIORITY,
    columns::CATEGORY,
    columns::METHOD,
    columns::STATUS,
];

const TEMPLATE_HEADERS: [&str; 8] = [
    columns::MODULE,
    columns::TITLE,
    columns::PRECONDITIONS,
    columns::STEPS,
    columns::EXPECTED,
    columns::PRIORITY,
    columns::METHOD,
    columns::CATEGORY,
];

/// `"1. first\n2. second"`
pub fn numbered_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| format!("{}. {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Numbered action and expected-result columns for a step list
pub fn step_columns(steps: &[Step]) -> (String, String) {
    (
        numbered_lines(steps.iter().map(|s| s.action.as_str())),
        numbered_lines(steps.iter().map(|s| s.expected.as_str())),
    )
}

pub(crate) fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, csv::Error> {
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// One CSV row per case, numbered from 1, in input order.
pub fn write_cases<'a>(
    rows: impl IntoIterator<Item = (ResolvedPath, &'a TestCaseRecord)>,
    labels: &LabelTables,
) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CASE_HEADERS)?;

    for (index, (path, case)) in rows.into_iter().enumerate() {
        let (steps, expected) = step_columns(&case.steps);
        writer.write_record([
            (index + 1).to_string().as_str(),
            path.join(PATH_SEPARATOR).as_str(),
            case.title.as_str(),
            case.preconditions.as_deref().unwrap_or(""),
            steps.as_str(),
            expected.as_str(),
            labels.label_or_empty(LabelKind::Priority, case.priority.as_deref()),
            labels.label_or_empty(LabelKind::Category, case.category.as_deref()),
            labels.label_or_empty(LabelKind::Method, case.design_method.as_deref()),
            labels.label_or_empty(LabelKind::Status, case.status.as_deref()),
        ])?;
    }

    finish(writer)
}

/// Import template: the importer's header row plus one filled-in example.
pub fn template(labels: &LabelTables) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(TEMPLATE_HEADERS)?;
    writer.write_record([
        "User management",
        "Login succeeds",
        "User is registered and active",
        "1. Enter a valid user name\n2. Enter the right password\n3. Press login",
        "1. User name accepted\n2. Password accepted\n3. Home page opens",
        labels.label(LabelKind::Priority, "high"),
        labels.label(LabelKind::Method, "scenario"),
        labels.label(LabelKind::Category, "functional"),
    ])?;
    finish(writer)
}
