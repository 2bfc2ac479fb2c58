use serde::{Deserialize, Serialize};

use super::module::ModuleId;

/// One step of a test case: the action to perform and what should happen.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Step {
    pub action: String,
    #[serde(default)]
    pub expected: String,
}

impl Step {
    pub fn new(action: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            expected: expected.into(),
        }
    }
}

/// Priority codes understood by the outline codec and the label tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn code(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    /// Mind-map importance marker number (1 is most important).
    pub fn importance(self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    /// Unknown importance values fall back to medium.
    pub fn from_importance(importance: u8) -> Self {
        match importance {
            1 => Priority::High,
            3 => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

/// A test case as it flows through export and import.
///
/// Only `title` is required; every other field degrades to "absent" rather
/// than failing, so partially filled rows and hand-edited outline files can
/// still be converted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TestCaseRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preconditions: Option<String>,
    pub steps: Vec<Step>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_id: Option<ModuleId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_point_id: Option<u64>,
    /// Free-text module label captured when the case was imported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_module_name: Option<String>,
}

impl TestCaseRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_module(mut self, module_id: ModuleId) -> Self {
        self.module_id = Some(module_id);
        self
    }

    pub fn with_import_label(mut self, label: impl Into<String>) -> Self {
        self.import_module_name = Some(label.into());
        self
    }

    pub fn with_preconditions(mut self, preconditions: impl Into<String>) -> Self {
        self.preconditions = Some(preconditions.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority.code().to_string());
        self
    }

    pub fn with_steps(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.steps = steps.into_iter().collect();
        self
    }

    /// Parsed priority, if the stored code is one of the known ones.
    pub fn priority(&self) -> Option<Priority> {
        self.priority.as_deref().and_then(Priority::from_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_importance_mapping() {
        for priority in [Priority::High, Priority::Medium, Priority::Low] {
            assert_eq!(Priority::from_importance(priority.importance()), priority);
            assert_eq!(Priority::from_code(priority.code()), Some(priority));
        }
        assert_eq!(Priority::from_importance(0), Priority::Medium);
        assert_eq!(Priority::from_importance(9), Priority::Medium);
    }

    #[test]
    fn test_record_deserializes_with_only_title() {
        let record: TestCaseRecord = serde_json::from_str(r#"{"title": "Login"}"#).unwrap();
        assert_eq!(record.title, "Login");
        assert!(record.steps.is_empty());
        assert!(record.module_id.is_none());
    }

    #[test]
    fn test_unknown_priority_code_is_not_parsed() {
        let mut record = TestCaseRecord::new("Login");
        record.priority = Some("urgent".to_string());
        assert_eq!(record.priority(), None);
    }
}
