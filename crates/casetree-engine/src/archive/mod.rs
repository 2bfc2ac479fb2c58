//! # Archive
//!
//! A frozen copy of selected test cases together with the results of running
//! them. The copied case data never changes after the snapshot; only the
//! execution results do, and only while the archive is active.
//!
//! Archives export the same way live cases do (outline and table), with the
//! results folded in, plus a Markdown execution report.

pub mod report;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::codec::OutlineCodec;
use crate::export::labels::{LabelKind, LabelTables};
use crate::export::table::{self as table_export, columns};
use crate::export::{ExportError, ExportFile, file_name};
use crate::models::{ModuleIndex, Step, SuiteTree, TestCaseRecord};
use crate::outline::{OutlineBuilder, ResolvedPath, place_under, resolve};

pub use report::{ArchiveSummary, render_report};

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("No test cases selected for the archive")]
    Empty,
    #[error("Archived case {0} not found")]
    CaseNotFound(u64),
    #[error("Archive '{0}' is closed")]
    Closed(String),
    #[error(transparent)]
    Export(#[from] ExportError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Passed,
    Failed,
    Blocked,
    #[default]
    Skipped,
    InProgress,
}

impl ExecutionStatus {
    pub fn code(self) -> &'static str {
        match self {
            ExecutionStatus::Passed => "passed",
            ExecutionStatus::Failed => "failed",
            ExecutionStatus::Blocked => "blocked",
            ExecutionStatus::Skipped => "skipped",
            ExecutionStatus::InProgress => "in_progress",
        }
    }

    /// Failed or blocked
    pub fn is_abnormal(self) -> bool {
        matches!(self, ExecutionStatus::Failed | ExecutionStatus::Blocked)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveStatus {
    #[default]
    Active,
    Closed,
}

/// Result of running one step, keyed by its 1-based step number.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepResult {
    pub status: ExecutionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub step_results: BTreeMap<usize, StepResult>,
}

/// A change to one case's execution result. `None` fields are left as they
/// were; the status is always replaced.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionUpdate {
    pub status: ExecutionStatus,
    pub comment: Option<String>,
    pub step_results: Option<BTreeMap<usize, StepResult>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedCase {
    id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    original_case_id: Option<u64>,
    case: TestCaseRecord,
    module_full_path: String,
    #[serde(default)]
    execution: ExecutionResult,
}

impl ArchivedCase {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn original_case_id(&self) -> Option<u64> {
        self.original_case_id
    }

    pub fn case(&self) -> &TestCaseRecord {
        &self.case
    }

    pub fn title(&self) -> &str {
        &self.case.title
    }

    /// Module path captured at snapshot time, segments joined by `/`
    pub fn module_full_path(&self) -> &str {
        &self.module_full_path
    }

    pub fn execution(&self) -> &ExecutionResult {
        &self.execution
    }

    /// Step actions with `[PASS]` / `[FAIL: actual]` appended where a result
    /// was recorded.
    fn annotated_steps(&self) -> Vec<Step> {
        self.case
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                let suffix = match self.execution.step_results.get(&(i + 1)) {
                    Some(r) if r.status == ExecutionStatus::Passed => " [PASS]".to_string(),
                    Some(r) if r.status == ExecutionStatus::Failed => {
                        format!(" [FAIL: {}]", r.actual.as_deref().unwrap_or(""))
                    }
                    _ => String::new(),
                };
                Step::new(format!("{}{suffix}", step.action), step.expected.clone())
            })
            .collect()
    }

    /// Case description with the execution result appended.
    fn summary(&self) -> String {
        let mut summary = self.case.description.clone().unwrap_or_default();
        if !summary.is_empty() {
            summary.push_str("\n\n");
        }
        summary.push_str(&format!("[Execution result] {}", self.execution.status.code()));
        if let Some(comment) = &self.execution.comment {
            summary.push_str(&format!("\nComment: {comment}"));
        }
        summary
    }

    /// Numbered step lines with each step's recorded result.
    fn step_lines(&self, labels: &LabelTables) -> String {
        let lines: Vec<String> = self
            .case
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                let mut line = step.action.clone();
                if let Some(result) = self.execution.step_results.get(&(i + 1)) {
                    line.push_str(&format!(
                        " [{}]",
                        labels.label(LabelKind::Execution, result.status.code())
                    ));
                    if let Some(actual) = result.actual.as_deref().filter(|a| !a.is_empty()) {
                        line.push_str(&format!(" Actual: {actual}"));
                    }
                }
                line
            })
            .collect();
        table_export::numbered_lines(lines.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archive {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    status: ArchiveStatus,
    cases: Vec<ArchivedCase>,
}

impl Archive {
    /// Copy `cases` into a new active archive. Each archived case records
    /// its module path as it resolves right now.
    pub fn snapshot(
        name: impl Into<String>,
        description: Option<String>,
        cases: &[TestCaseRecord],
        modules: &ModuleIndex,
    ) -> Result<Self, ArchiveError> {
        if cases.is_empty() {
            return Err(ArchiveError::Empty);
        }

        let cases = cases
            .iter()
            .zip(1u64..)
            .map(|(record, id)| ArchivedCase {
                id,
                original_case_id: record.id,
                module_full_path: resolve(record, modules).join(table_export::PATH_SEPARATOR),
                case: record.clone(),
                execution: ExecutionResult::default(),
            })
            .collect::<Vec<_>>();

        let archive = Self {
            name: name.into(),
            description,
            status: ArchiveStatus::Active,
            cases,
        };
        log::info!("Archived {} cases as '{}'", archive.cases.len(), archive.name);
        Ok(archive)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn status(&self) -> ArchiveStatus {
        self.status
    }

    pub fn is_closed(&self) -> bool {
        self.status == ArchiveStatus::Closed
    }

    pub fn cases(&self) -> &[ArchivedCase] {
        &self.cases
    }

    pub fn case(&self, id: u64) -> Option<&ArchivedCase> {
        self.cases.iter().find(|c| c.id == id)
    }

    pub fn close(&mut self) {
        self.status = ArchiveStatus::Closed;
    }

    pub fn record_execution(
        &mut self,
        case_id: u64,
        update: ExecutionUpdate,
    ) -> Result<&ArchivedCase, ArchiveError> {
        if self.is_closed() {
            return Err(ArchiveError::Closed(self.name.clone()));
        }

        let case = self
            .cases
            .iter_mut()
            .find(|c| c.id == case_id)
            .ok_or(ArchiveError::CaseNotFound(case_id))?;

        case.execution.status = update.status;
        if let Some(comment) = update.comment {
            case.execution.comment = Some(comment);
        }
        if let Some(step_results) = update.step_results {
            case.execution.step_results = step_results;
        }

        log::debug!("Recorded {} for archived case {case_id}", update.status.code());
        Ok(case)
    }

    pub fn summary(&self) -> ArchiveSummary {
        ArchiveSummary::of(&self.cases)
    }

    /// Outline of the archived cases, placed the same way live exports are,
    /// with execution results folded into steps and descriptions.
    pub fn outline(&self) -> SuiteTree {
        let mut builder = OutlineBuilder::new(self.name.clone());

        for archived in &self.cases {
            let structural = ResolvedPath::parse(&archived.module_full_path).or_unclassified();
            let placement = place_under(structural, archived.title());
            let case = TestCaseRecord {
                id: Some(archived.id),
                title: placement.name,
                description: Some(archived.summary()),
                steps: archived.annotated_steps(),
                ..archived.case.clone()
            };
            builder.attach(&placement.path, case);
        }

        builder.finish()
    }

    pub fn export_outline(&self, codec: &dyn OutlineCodec) -> Result<ExportFile, ArchiveError> {
        let bytes = codec
            .serialize(&self.outline())
            .map_err(ExportError::from)?;
        Ok(ExportFile {
            file_name: file_name(&self.name, "archive", codec.extension()),
            bytes,
        })
    }

    /// CSV with the case columns plus execution status and comment.
    pub fn export_table(&self, labels: &LabelTables) -> Result<ExportFile, ArchiveError> {
        let bytes = self.write_table(labels).map_err(ExportError::from)?;
        Ok(ExportFile {
            file_name: file_name(&self.name, "archive", "csv"),
            bytes,
        })
    }

    fn write_table(&self, labels: &LabelTables) -> Result<Vec<u8>, csv::Error> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([
            columns::SEQUENCE,
            columns::MODULE,
            columns::TITLE,
            columns::PRECONDITIONS,
            columns::STEPS,
            columns::EXPECTED,
            columns::PRIORITY,
            columns::CATEGORY,
            columns::METHOD,
            columns::EXECUTION_STATUS,
            columns::EXECUTION_COMMENT,
        ])?;

        for (index, archived) in self.cases.iter().enumerate() {
            let case = &archived.case;
            let expected = table_export::numbered_lines(case.steps.iter().map(|s| s.expected.as_str()));
            writer.write_record([
                (index + 1).to_string().as_str(),
                archived.module_full_path.as_str(),
                case.title.as_str(),
                case.preconditions.as_deref().unwrap_or(""),
                archived.step_lines(labels).as_str(),
                expected.as_str(),
                labels.label_or_empty(LabelKind::Priority, case.priority.as_deref()),
                labels.label_or_empty(LabelKind::Category, case.category.as_deref()),
                labels.label_or_empty(LabelKind::Method, case.design_method.as_deref()),
                labels.label(LabelKind::Execution, archived.execution.status.code()),
                archived.execution.comment.as_deref().unwrap_or(""),
            ])?;
        }

        table_export::finish(writer)
    }

    pub fn export_report(&self, labels: &LabelTables) -> ExportFile {
        ExportFile {
            file_name: file_name(&self.name, "report", "md"),
            bytes: render_report(self, labels).into_bytes(),
        }
    }
}
