use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

const PRIORITY_LABELS: &[(&str, &str)] = &[("high", "High"), ("medium", "Medium"), ("low", "Low")];

const STATUS_LABELS: &[(&str, &str)] = &[
    ("draft", "Draft"),
    ("under_review", "Under review"),
    ("approved", "Approved"),
];

const CATEGORY_LABELS: &[(&str, &str)] = &[
    ("functional", "Functional"),
    ("performance", "Performance"),
    ("security", "Security"),
    ("compatibility", "Compatibility"),
    ("usability", "Usability"),
];

const METHOD_LABELS: &[(&str, &str)] = &[
    ("scenario", "Scenario"),
    ("equivalence_partitioning", "Equivalence partitioning"),
    ("boundary_value", "Boundary value"),
    ("error_guessing", "Error guessing"),
    ("cause_effect", "Cause-effect graph"),
];

const EXECUTION_LABELS: &[(&str, &str)] = &[
    ("passed", "Passed"),
    ("failed", "Failed"),
    ("blocked", "Blocked"),
    ("skipped", "Skipped"),
    ("in_progress", "In progress"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Priority,
    Status,
    Category,
    Method,
    Execution,
}

/// Code → display label tables used when writing human-facing files.
///
/// Codes without an entry are written as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelTables {
    pub priority: BTreeMap<String, String>,
    pub status: BTreeMap<String, String>,
    pub category: BTreeMap<String, String>,
    pub method: BTreeMap<String, String>,
    pub execution: BTreeMap<String, String>,
}

fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(code, label)| (code.to_string(), label.to_string()))
        .collect()
}

impl Default for LabelTables {
    fn default() -> Self {
        Self {
            priority: table(PRIORITY_LABELS),
            status: table(STATUS_LABELS),
            category: table(CATEGORY_LABELS),
            method: table(METHOD_LABELS),
            execution: table(EXECUTION_LABELS),
        }
    }
}

impl LabelTables {
    pub fn table(&self, kind: LabelKind) -> &BTreeMap<String, String> {
        match kind {
            LabelKind::Priority => &self.priority,
            LabelKind::Status => &self.status,
            LabelKind::Category => &self.category,
            LabelKind::Method => &self.method,
            LabelKind::Execution => &self.execution,
        }
    }

    fn table_mut(&mut self, kind: LabelKind) -> &mut BTreeMap<String, String> {
        match kind {
            LabelKind::Priority => &mut self.priority,
            LabelKind::Status => &mut self.status,
            LabelKind::Category => &mut self.category,
            LabelKind::Method => &mut self.method,
            LabelKind::Execution => &mut self.execution,
        }
    }

    pub fn label<'a>(&'a self, kind: LabelKind, code: &'a str) -> &'a str {
        self.table(kind).get(code).map_or(code, String::as_str)
    }

    /// Label for an optional code; absent codes give an empty cell.
    pub fn label_or_empty<'a>(&'a self, kind: LabelKind, code: Option<&'a str>) -> &'a str {
        code.map_or("", |c| self.label(kind, c))
    }

    /// Reverse lookup: the code whose code or label matches `text`.
    pub fn code_for(&self, kind: LabelKind, text: &str) -> Option<&str> {
        let text = text.trim();
        self.table(kind)
            .iter()
            .find(|(code, label)| code.as_str() == text || label.as_str() == text)
            .map(|(code, _)| code.as_str())
    }

    /// Replace or add labels for one table, keeping the remaining defaults.
    pub fn with_overrides(
        mut self,
        kind: LabelKind,
        overrides: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        self.table_mut(kind).extend(overrides);
        self
    }
}
