use std::collections::HashMap;

use crate::models::{SuiteId, SuiteTree, TestCaseRecord};

use super::path::ResolvedPath;

/// Builds a [`SuiteTree`] by attaching cases at paths, creating suites
/// lazily and sharing them between every case that shares a path prefix.
pub struct OutlineBuilder {
    tree: SuiteTree,
    suites: HashMap<Vec<String>, SuiteId>,
}

impl OutlineBuilder {
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            tree: SuiteTree::new(root_name),
            suites: HashMap::new(),
        }
    }

    /// Look up or create the suite at `path`. The empty path is the root.
    pub fn suite_for(&mut self, path: &ResolvedPath) -> SuiteId {
        let segments = path.segments();
        let mut current = self.tree.root();

        for depth in 1..=segments.len() {
            let key = &segments[..depth];
            current = match self.suites.get(key) {
                Some(id) => *id,
                None => {
                    let id = self.tree.add_child(current, segments[depth - 1].clone());
                    self.suites.insert(key.to_vec(), id);
                    id
                }
            };
        }

        current
    }

    /// Attach a case under `path`, after any cases already there.
    pub fn attach(&mut self, path: &ResolvedPath, case: TestCaseRecord) -> SuiteId {
        let suite = self.suite_for(path);
        self.tree.attach_case(suite, case);
        suite
    }

    pub fn finish(self) -> SuiteTree {
        self.tree
    }
}
