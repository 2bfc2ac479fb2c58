use std::slice;

use crate::models::{SuiteId, SuiteTree, TestCaseRecord};

use super::path::ResolvedPath;

/// Depth-first pre-order walk over a suite tree, yielding each case with the
/// names of the suites above it. The root is the outermost wrapper and is
/// not part of any path, so cases attached to the root get an empty path.
///
/// A suite's own cases are yielded before any of its child suites are
/// entered. Uses an explicit stack, so nesting depth does not grow the call
/// stack.
pub struct Flatten<'a> {
    tree: &'a SuiteTree,
    stack: Vec<(SuiteId, ResolvedPath)>,
    current: Option<(ResolvedPath, slice::Iter<'a, TestCaseRecord>)>,
}

impl<'a> Iterator for Flatten<'a> {
    type Item = (ResolvedPath, &'a TestCaseRecord);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((path, cases)) = &mut self.current
                && let Some(case) = cases.next()
            {
                return Some((path.clone(), case));
            }

            let (id, path) = self.stack.pop()?;
            let node = self.tree.node(id);
            for child in node.children().iter().rev() {
                let child_path = path.child(self.tree.node(*child).name());
                self.stack.push((*child, child_path));
            }
            self.current = Some((path, node.cases().iter()));
        }
    }
}

pub fn flatten(tree: &SuiteTree) -> Flatten<'_> {
    Flatten {
        tree,
        stack: vec![(tree.root(), ResolvedPath::default())],
        current: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flattened(tree: &SuiteTree) -> Vec<(String, String)> {
        flatten(tree)
            .map(|(path, case)| (path.join("/"), case.title.clone()))
            .collect()
    }

    #[test]
    fn test_cases_before_children_in_preorder() {
        let mut tree = SuiteTree::new("file.json");
        let auth = tree.add_child(tree.root(), "Auth");
        let login = tree.add_child(auth, "Login");
        let billing = tree.add_child(tree.root(), "Billing");
        tree.attach_case(login, TestCaseRecord::new("Success"));
        tree.attach_case(auth, TestCaseRecord::new("Logout"));
        tree.attach_case(billing, TestCaseRecord::new("Refund"));
        tree.attach_case(auth, TestCaseRecord::new("Expire"));

        assert_eq!(
            flattened(&tree),
            vec![
                ("Auth".to_string(), "Logout".to_string()),
                ("Auth".to_string(), "Expire".to_string()),
                ("Auth/Login".to_string(), "Success".to_string()),
                ("Billing".to_string(), "Refund".to_string()),
            ]
        );
    }

    #[test]
    fn test_root_cases_have_empty_path() {
        let mut tree = SuiteTree::new("file.json");
        tree.attach_case(tree.root(), TestCaseRecord::new("Loose"));

        let items: Vec<_> = flatten(&tree).collect();
        assert_eq!(items.len(), 1);
        assert!(items[0].0.is_empty());
    }

    #[test]
    fn test_empty_suites_yield_nothing() {
        let mut tree = SuiteTree::new("file.json");
        let a = tree.add_child(tree.root(), "A");
        tree.add_child(a, "B");

        assert_eq!(flatten(&tree).count(), 0);
    }

    #[test]
    fn test_deep_nesting_does_not_recurse() {
        let mut tree = SuiteTree::new("file.json");
        let mut current = tree.root();
        for depth in 0..2_000 {
            current = tree.add_child(current, format!("level{depth}"));
        }
        tree.attach_case(current, TestCaseRecord::new("Bottom"));

        let (path, case) = flatten(&tree).next().unwrap();
        assert_eq!(path.len(), 2_000);
        assert_eq!(case.title, "Bottom");
    }
}
