use std::fmt::Write;

use crate::export::labels::{LabelKind, LabelTables};

use super::{Archive, ArchivedCase, ExecutionStatus};

/// Execution counts over an archive's cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArchiveSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub blocked: usize,
    pub skipped: usize,
    pub in_progress: usize,
}

impl ArchiveSummary {
    pub fn of(cases: &[ArchivedCase]) -> Self {
        let mut summary = Self {
            total: cases.len(),
            ..Self::default()
        };
        for case in cases {
            match case.execution().status {
                ExecutionStatus::Passed => summary.passed += 1,
                ExecutionStatus::Failed => summary.failed += 1,
                ExecutionStatus::Blocked => summary.blocked += 1,
                ExecutionStatus::Skipped => summary.skipped += 1,
                ExecutionStatus::InProgress => summary.in_progress += 1,
            }
        }
        summary
    }

    /// Passed cases as a percentage of all cases; 0 for an empty archive.
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 / self.total as f64 * 100.0
        }
    }
}

/// Table cells must stay on one line and not open new columns.
fn cell(text: &str) -> String {
    text.replace('\n', " ").replace('|', "\\|")
}

/// Markdown execution report: summary counts, details of failed and
/// blocked cases, then every case in one table.
pub fn render_report(archive: &Archive, labels: &LabelTables) -> String {
    let summary = archive.summary();
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "# {} - execution report\n", archive.name());
    if let Some(description) = archive.description().filter(|d| !d.trim().is_empty()) {
        let _ = writeln!(out, "{description}\n");
    }

    let _ = writeln!(out, "## Summary\n");
    let _ = writeln!(out, "- **Total**: {}", summary.total);
    let _ = writeln!(out, "- **Passed**: {}", summary.passed);
    let _ = writeln!(out, "- **Failed**: {}", summary.failed);
    let _ = writeln!(out, "- **Blocked**: {}", summary.blocked);
    let _ = writeln!(out, "- **Skipped**: {}", summary.skipped);
    let _ = writeln!(out, "- **Pass rate**: {:.2}%\n", summary.pass_rate());

    let abnormal: Vec<_> = archive
        .cases()
        .iter()
        .filter(|c| c.execution().status.is_abnormal())
        .collect();
    if !abnormal.is_empty() {
        let _ = writeln!(out, "## Failed and blocked cases\n");
        for (i, case) in abnormal.iter().enumerate() {
            write_abnormal(&mut out, i + 1, case, labels);
        }
    }

    let _ = writeln!(out, "## All cases\n");
    let _ = writeln!(out, "| ID | Module | Title | Priority | Status | Comment |");
    let _ = writeln!(out, "|----|--------|-------|----------|--------|---------|");
    for case in archive.cases() {
        let record = case.case();
        let execution = case.execution();
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} |",
            case.id(),
            cell(case.module_full_path()),
            cell(case.title()),
            labels.label_or_empty(LabelKind::Priority, record.priority.as_deref()),
            labels.label(LabelKind::Execution, execution.status.code()),
            cell(execution.comment.as_deref().unwrap_or("")),
        );
    }

    out
}

fn write_abnormal(out: &mut String, number: usize, case: &ArchivedCase, labels: &LabelTables) {
    let execution = case.execution();
    let icon = if execution.status == ExecutionStatus::Failed {
        "❌"
    } else {
        "🚫"
    };

    let _ = writeln!(out, "### {number}. {icon} {}", case.title());
    let _ = writeln!(out, "- **ID**: {}", case.id());
    let _ = writeln!(out, "- **Module**: {}", case.module_full_path());
    let _ = writeln!(
        out,
        "- **Status**: {}",
        labels.label(LabelKind::Execution, execution.status.code())
    );
    if let Some(comment) = &execution.comment {
        let _ = writeln!(out, "- **Comment**: {comment}");
    }

    let failed_steps: Vec<_> = execution
        .step_results
        .iter()
        .filter(|(_, r)| r.status.is_abnormal())
        .collect();
    if !failed_steps.is_empty() {
        let _ = writeln!(out, "- **Failed steps**:");
        for (step, result) in failed_steps {
            let _ = writeln!(
                out,
                "  - Step {step}: {} - actual: {}",
                result.status.code(),
                result.actual.as_deref().unwrap_or("")
            );
        }
    }
    out.push('\n');
}
