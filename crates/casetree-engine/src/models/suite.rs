use super::case::TestCaseRecord;

/// Index of a suite inside its owning [`SuiteTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SuiteId(usize);

impl SuiteId {
    pub const ROOT: SuiteId = SuiteId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// A named grouping node in an outline: child suites plus attached cases.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteNode {
    name: String,
    children: Vec<SuiteId>,
    cases: Vec<TestCaseRecord>,
}

impl SuiteNode {
    fn new(name: String) -> Self {
        Self {
            name,
            children: Vec::new(),
            cases: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Child suites in insertion order
    pub fn children(&self) -> &[SuiteId] {
        &self.children
    }

    /// Cases attached directly to this suite, in attachment order
    pub fn cases(&self) -> &[TestCaseRecord] {
        &self.cases
    }
}

/// Arena-backed outline tree. Children are referenced by [`SuiteId`], so
/// the tree has no parent pointers and no reference cycles.
///
/// Equality is structural: two trees are equal when their suites have the
/// same names, child order and case lists, whatever order the arena slots
/// were allocated in.
#[derive(Debug, Clone)]
pub struct SuiteTree {
    nodes: Vec<SuiteNode>,
}

impl SuiteTree {
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![SuiteNode::new(root_name.into())],
        }
    }

    pub fn root(&self) -> SuiteId {
        SuiteId::ROOT
    }

    pub fn node(&self, id: SuiteId) -> &SuiteNode {
        &self.nodes[id.0]
    }

    pub fn root_name(&self) -> &str {
        self.node(SuiteId::ROOT).name()
    }

    /// Append a new child suite. Does not check for an existing sibling of
    /// the same name; callers that need sharing go through the outline builder.
    pub fn add_child(&mut self, parent: SuiteId, name: impl Into<String>) -> SuiteId {
        let id = SuiteId(self.nodes.len());
        self.nodes.push(SuiteNode::new(name.into()));
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn attach_case(&mut self, suite: SuiteId, case: TestCaseRecord) {
        self.nodes[suite.0].cases.push(case);
    }

    pub fn child_named(&self, parent: SuiteId, name: &str) -> Option<SuiteId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|child| self.node(*child).name == name)
    }

    /// Number of suites, root included
    pub fn suite_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn case_count(&self) -> usize {
        self.nodes.iter().map(|n| n.cases.len()).sum()
    }

    /// Indented text outline: suites by name, cases as `- name`, a suite's
    /// own cases listed before its child suites.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        let mut stack = vec![(SuiteId::ROOT, 0usize)];

        while let Some((id, depth)) = stack.pop() {
            let node = self.node(id);
            let indent = "  ".repeat(depth);
            lines.push(format!("{indent}{}", node.name));
            for case in &node.cases {
                lines.push(format!("{indent}  - {}", case.title));
            }
            for child in node.children.iter().rev() {
                stack.push((*child, depth + 1));
            }
        }

        lines.join("\n")
    }
}

impl PartialEq for SuiteTree {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(SuiteId::ROOT, SuiteId::ROOT)];

        while let Some((a, b)) = stack.pop() {
            let (left, right) = (self.node(a), other.node(b));
            if left.name != right.name
                || left.cases != right.cases
                || left.children.len() != right.children.len()
            {
                return false;
            }
            stack.extend(
                left.children
                    .iter()
                    .copied()
                    .zip(right.children.iter().copied()),
            );
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_tree_has_only_root() {
        let tree = SuiteTree::new("Project");
        assert_eq!(tree.suite_count(), 1);
        assert_eq!(tree.case_count(), 0);
        assert_eq!(tree.root_name(), "Project");
        assert!(tree.node(tree.root()).children().is_empty());
    }

    #[test]
    fn test_add_child_and_attach_case() {
        let mut tree = SuiteTree::new("Project");
        let auth = tree.add_child(tree.root(), "Auth");
        tree.attach_case(auth, TestCaseRecord::new("Login"));

        assert_eq!(tree.child_named(tree.root(), "Auth"), Some(auth));
        assert_eq!(tree.child_named(tree.root(), "Billing"), None);
        assert_eq!(tree.node(auth).cases()[0].title, "Login");
        assert_eq!(tree.case_count(), 1);
    }

    #[test]
    fn test_render_lists_cases_before_children() {
        let mut tree = SuiteTree::new("Project");
        let auth = tree.add_child(tree.root(), "Auth");
        let login = tree.add_child(auth, "Login");
        tree.attach_case(auth, TestCaseRecord::new("Logout"));
        tree.attach_case(login, TestCaseRecord::new("Success"));
        tree.add_child(tree.root(), "Billing");

        assert_eq!(
            tree.render(),
            "Project\n  Auth\n    - Logout\n    Login\n      - Success\n  Billing"
        );
    }

    #[test]
    fn test_equality_ignores_arena_allocation_order() {
        let mut first = SuiteTree::new("Project");
        let a = first.add_child(first.root(), "A");
        let b = first.add_child(first.root(), "B");
        first.add_child(a, "A1");
        first.add_child(b, "B1");

        let mut second = SuiteTree::new("Project");
        let a = second.add_child(second.root(), "A");
        second.add_child(a, "A1");
        let b = second.add_child(second.root(), "B");
        second.add_child(b, "B1");

        assert_eq!(first, second);
    }

    #[test]
    fn test_equality_detects_child_order() {
        let mut first = SuiteTree::new("Project");
        first.add_child(first.root(), "A");
        first.add_child(first.root(), "B");

        let mut second = SuiteTree::new("Project");
        second.add_child(second.root(), "B");
        second.add_child(second.root(), "A");

        assert_ne!(first, second);
    }
}
