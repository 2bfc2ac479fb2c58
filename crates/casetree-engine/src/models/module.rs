use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::case::TestCaseRecord;

pub type ModuleId = u64;

/// A module a test case can be filed under. Modules are flat: the name is
/// the full path, and may itself contain `/` separators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleNode {
    pub id: ModuleId,
    pub name: String,
}

impl ModuleNode {
    pub fn new(id: ModuleId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Test point link, attaching a test point to the module that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestPointLink {
    pub test_point_id: u64,
    pub module_id: ModuleId,
}

/// Lookup from module ids (and test point ids) to module names.
#[derive(Debug, Default, Clone)]
pub struct ModuleIndex {
    names: HashMap<ModuleId, String>,
    test_points: HashMap<u64, ModuleId>,
}

impl ModuleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, module: ModuleNode) {
        self.names.insert(module.id, module.name);
    }

    pub fn link_test_point(&mut self, link: TestPointLink) {
        self.test_points.insert(link.test_point_id, link.module_id);
    }

    pub fn name(&self, id: ModuleId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// The module a case belongs to: its test point's module when the test
    /// point is known, otherwise its own module id.
    pub fn module_for(&self, record: &TestCaseRecord) -> Option<ModuleId> {
        record
            .test_point_id
            .and_then(|tp| self.test_points.get(&tp).copied())
            .or(record.module_id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<ModuleNode> for ModuleIndex {
    fn from_iter<I: IntoIterator<Item = ModuleNode>>(iter: I) -> Self {
        let mut index = Self::new();
        for module in iter {
            index.insert(module);
        }
        index
    }
}

/// Module list as stored on disk, with optional test point links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleCatalog {
    pub modules: Vec<ModuleNode>,
    #[serde(default)]
    pub test_points: Vec<TestPointLink>,
}

impl From<ModuleCatalog> for ModuleIndex {
    fn from(catalog: ModuleCatalog) -> Self {
        let mut index: ModuleIndex = catalog.modules.into_iter().collect();
        for link in catalog.test_points {
            index.link_test_point(link);
        }
        index
    }
}
