use indexmap::IndexMap;
use indexmap::map::Entry;

use super::ImportedCase;
use crate::outline::ResolvedPath;

/// Collapse imported cases sharing a (path, title) key into one record.
/// Paths compare segment by segment, so a suite titled `A / B` is not the
/// same as `A` holding `B`.
///
/// The first case seen under a key is kept as the target. Later ones add
/// their preconditions (on a new line, unless the target already contains
/// that text) and append their steps. Output order is first-seen key order.
pub fn merge_records(cases: impl IntoIterator<Item = ImportedCase>) -> Vec<ImportedCase> {
    let mut groups: IndexMap<(ResolvedPath, String), ImportedCase> = IndexMap::new();
    let mut merged = 0usize;

    for incoming in cases {
        let key = (incoming.path.clone(), incoming.case.title.clone());
        match groups.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(incoming);
            }
            Entry::Occupied(mut slot) => {
                absorb(slot.get_mut(), incoming);
                merged += 1;
            }
        }
    }

    if merged > 0 {
        log::debug!("Merged {merged} duplicate cases into {} records", groups.len());
    }
    groups.into_values().collect()
}

fn absorb(target: &mut ImportedCase, incoming: ImportedCase) {
    let ImportedCase { case, .. } = incoming;

    if let Some(extra) = case.preconditions.filter(|p| !p.trim().is_empty()) {
        match target.case.preconditions.as_mut() {
            Some(existing) if existing.contains(extra.as_str()) => {}
            Some(existing) if !existing.trim().is_empty() => {
                existing.push('\n');
                existing.push_str(&extra);
            }
            _ => target.case.preconditions = Some(extra),
        }
    }

    target.case.steps.extend(case.steps);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Step, TestCaseRecord};
    use pretty_assertions::assert_eq;

    fn imported(path: &[&str], case: TestCaseRecord) -> ImportedCase {
        ImportedCase::new(ResolvedPath::from_segments(path), case)
    }

    fn steps(prefix: &str, count: usize) -> Vec<Step> {
        (1..=count)
            .map(|i| Step::new(format!("{prefix}{i}"), ""))
            .collect()
    }

    #[test]
    fn test_merge_is_additive() {
        // Given two cases sharing a path and title with three and two steps
        let first = imported(&["Auth"], TestCaseRecord::new("Login").with_steps(steps("a", 3)));
        let second = imported(&["Auth"], TestCaseRecord::new("Login").with_steps(steps("b", 2)));

        // When merged
        let merged = merge_records([first, second]);

        // Then one record holds all five steps in source order
        assert_eq!(merged.len(), 1);
        let actions: Vec<_> = merged[0].case.steps.iter().map(|s| s.action.as_str()).collect();
        assert_eq!(actions, vec!["a1", "a2", "a3", "b1", "b2"]);
    }

    #[test]
    fn test_groups_keep_first_seen_order() {
        let merged = merge_records([
            imported(&["B"], TestCaseRecord::new("two")),
            imported(&["A"], TestCaseRecord::new("one")),
            imported(&["B"], TestCaseRecord::new("two")),
            imported(&["A"], TestCaseRecord::new("three")),
        ]);

        let keys: Vec<_> = merged
            .iter()
            .map(|c| (c.path.to_string(), c.case.title.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("B".to_string(), "two"),
                ("A".to_string(), "one"),
                ("A".to_string(), "three"),
            ]
        );
    }

    #[test]
    fn test_same_title_under_different_paths_stays_apart() {
        let merged = merge_records([
            imported(&["Auth"], TestCaseRecord::new("Success")),
            imported(&["Auth", "Login"], TestCaseRecord::new("Success")),
        ]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_slash_inside_a_segment_is_not_a_nested_path() {
        let merged = merge_records([
            imported(&["A / B"], TestCaseRecord::new("t").with_steps(steps("x", 1))),
            imported(&["A", "B"], TestCaseRecord::new("t").with_steps(steps("y", 1))),
        ]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].path.to_string(), merged[1].path.to_string());
        assert_eq!(merged[0].case.steps, steps("x", 1));
        assert_eq!(merged[1].case.steps, steps("y", 1));
    }

    #[test]
    fn test_preconditions_concatenate_without_repeats() {
        let merged = merge_records([
            imported(&["A"], TestCaseRecord::new("t")),
            imported(&["A"], TestCaseRecord::new("t").with_preconditions("Logged in")),
            imported(&["A"], TestCaseRecord::new("t").with_preconditions("Cart empty")),
            imported(&["A"], TestCaseRecord::new("t").with_preconditions("Logged in")),
        ]);

        assert_eq!(
            merged[0].case.preconditions.as_deref(),
            Some("Logged in\nCart empty")
        );
    }
}
