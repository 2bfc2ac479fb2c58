use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Priority, Step, SuiteId, SuiteTree, TestCaseRecord};

use super::{CodecError, OutlineCodec};

const PRIORITY_MARKER_PREFIX: &str = "priority-";

/// Mind-map outline stored as a JSON array of sheets, each holding a tree
/// of topics.
///
/// - Suites are plain topics.
/// - Cases are topics carrying a `priority-N` marker; preconditions live in
///   the topic notes and other fields in `caseMeta`.
/// - Steps are the case topic's children: the step topic's title is the
///   action, its children's titles are the expected result.
///
/// Only the first sheet is read back.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonOutlineCodec;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Sheet {
    #[serde(default)]
    id: String,
    #[serde(default)]
    class: String,
    #[serde(default)]
    title: String,
    root_topic: Topic,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Topic {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    markers: Vec<Marker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<Notes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    case_meta: Option<CaseMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Children>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Marker {
    marker_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Notes {
    plain: PlainNote,
}

#[derive(Debug, Serialize, Deserialize)]
struct PlainNote {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Children {
    #[serde(default)]
    attached: Vec<Topic>,
}

/// Case fields with no native place in a mind-map topic.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CaseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected_result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    design_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    module_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    test_point_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    import_module_name: Option<String>,
}

impl CaseMeta {
    fn from_record(case: &TestCaseRecord) -> Option<Self> {
        let meta = CaseMeta {
            id: case.id,
            description: case.description.clone(),
            expected_result: case.expected_result.clone(),
            category: case.category.clone(),
            design_method: case.design_method.clone(),
            status: case.status.clone(),
            module_id: case.module_id,
            test_point_id: case.test_point_id,
            import_module_name: case.import_module_name.clone(),
        };
        let empty = meta.id.is_none()
            && meta.description.is_none()
            && meta.expected_result.is_none()
            && meta.category.is_none()
            && meta.design_method.is_none()
            && meta.status.is_none()
            && meta.module_id.is_none()
            && meta.test_point_id.is_none()
            && meta.import_module_name.is_none();
        (!empty).then_some(meta)
    }
}

fn new_topic_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn plain_topic(title: &str) -> Topic {
    Topic {
        id: new_topic_id(),
        title: title.to_string(),
        ..Topic::default()
    }
}

fn attach_children(topic: &mut Topic, attached: Vec<Topic>) {
    if !attached.is_empty() {
        topic.children = Some(Children { attached });
    }
}

fn case_topic(case: &TestCaseRecord) -> Topic {
    let priority = case.priority().unwrap_or(Priority::Medium);
    let mut topic = plain_topic(&case.title);
    topic.markers = vec![Marker {
        marker_id: format!("{PRIORITY_MARKER_PREFIX}{}", priority.importance()),
    }];
    topic.notes = case
        .preconditions
        .as_ref()
        .filter(|p| !p.is_empty())
        .map(|content| Notes {
            plain: PlainNote {
                content: content.clone(),
            },
        });
    topic.case_meta = CaseMeta::from_record(case);

    let steps = case
        .steps
        .iter()
        .map(|step| {
            let mut step_topic = plain_topic(&step.action);
            if !step.expected.is_empty() {
                attach_children(&mut step_topic, vec![plain_topic(&step.expected)]);
            }
            step_topic
        })
        .collect();
    attach_children(&mut topic, steps);
    topic
}

fn case_priority(topic: &Topic) -> Option<Priority> {
    topic.markers.iter().find_map(|m| {
        m.marker_id
            .strip_prefix(PRIORITY_MARKER_PREFIX)
            .and_then(|n| n.parse::<u8>().ok())
            .map(Priority::from_importance)
    })
}

fn topic_case(topic: &Topic, priority: Priority) -> TestCaseRecord {
    let meta = topic.case_meta.as_ref();
    let steps = topic
        .children
        .iter()
        .flat_map(|c| &c.attached)
        .map(|step| {
            let expected = step
                .children
                .iter()
                .flat_map(|c| &c.attached)
                .map(|t| t.title.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            Step::new(step.title.clone(), expected)
        })
        .collect();

    TestCaseRecord {
        id: meta.and_then(|m| m.id),
        title: topic.title.clone(),
        description: meta.and_then(|m| m.description.clone()),
        preconditions: topic
            .notes
            .as_ref()
            .map(|n| n.plain.content.clone())
            .filter(|c| !c.is_empty()),
        steps,
        expected_result: meta.and_then(|m| m.expected_result.clone()),
        priority: Some(priority.code().to_string()),
        category: meta.and_then(|m| m.category.clone()),
        design_method: meta.and_then(|m| m.design_method.clone()),
        status: meta.and_then(|m| m.status.clone()),
        module_id: meta.and_then(|m| m.module_id),
        test_point_id: meta.and_then(|m| m.test_point_id),
        import_module_name: meta.and_then(|m| m.import_module_name.clone()),
    }
}

impl JsonOutlineCodec {
    /// Topic tree for `tree`, built bottom-up: walking the pre-order list
    /// backwards visits every suite after all of its descendants.
    fn root_topic(tree: &SuiteTree) -> Topic {
        let mut order = Vec::with_capacity(tree.suite_count());
        let mut stack = vec![tree.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(tree.node(id).children().iter().rev().copied());
        }

        let mut built: HashMap<SuiteId, Topic> = HashMap::with_capacity(order.len());
        for id in order.into_iter().rev() {
            let node = tree.node(id);
            let mut topic = plain_topic(node.name());
            let mut attached: Vec<Topic> = node.cases().iter().map(case_topic).collect();
            attached.extend(
                node.children()
                    .iter()
                    .filter_map(|child| built.remove(child)),
            );
            attach_children(&mut topic, attached);
            built.insert(id, topic);
        }

        built.remove(&tree.root()).unwrap_or_default()
    }
}

impl OutlineCodec for JsonOutlineCodec {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn serialize(&self, tree: &SuiteTree) -> Result<Vec<u8>, CodecError> {
        let sheet = Sheet {
            id: new_topic_id(),
            class: "sheet".to_string(),
            title: tree.root_name().to_string(),
            root_topic: Self::root_topic(tree),
        };
        Ok(serde_json::to_vec_pretty(&[sheet])?)
    }

    fn parse(&self, bytes: &[u8]) -> Result<SuiteTree, CodecError> {
        let sheets: Vec<Sheet> = serde_json::from_slice(bytes)?;
        if sheets.len() > 1 {
            log::warn!("Outline has {} sheets, reading only the first", sheets.len());
        }
        let sheet = sheets.into_iter().next().ok_or(CodecError::NoSheets)?;

        let mut tree = SuiteTree::new(sheet.root_topic.title.clone());
        let mut stack = vec![(&sheet.root_topic, tree.root())];

        while let Some((topic, suite)) = stack.pop() {
            let mut pending = Vec::new();
            for child in topic.children.iter().flat_map(|c| &c.attached) {
                match case_priority(child) {
                    Some(priority) => tree.attach_case(suite, topic_case(child, priority)),
                    None => pending.push((child, tree.add_child(suite, child.title.clone()))),
                }
            }
            stack.extend(pending.into_iter().rev());
        }

        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_tree() -> SuiteTree {
        let mut tree = SuiteTree::new("Project - cases");
        let auth = tree.add_child(tree.root(), "Auth");
        let login = tree.add_child(auth, "Login");
        tree.add_child(tree.root(), "Empty");

        let mut success = TestCaseRecord::new("Success")
            .with_priority(Priority::High)
            .with_preconditions("User exists")
            .with_steps([
                Step::new("Enter name", "Name shown"),
                Step::new("Press login", ""),
            ]);
        success.id = Some(7);
        success.category = Some("functional".to_string());
        tree.attach_case(login, success);
        tree.attach_case(
            auth,
            TestCaseRecord::new("Logout").with_priority(Priority::Low),
        );
        tree.attach_case(
            tree.root(),
            TestCaseRecord::new("Loose").with_priority(Priority::Medium),
        );
        tree
    }

    #[test]
    fn test_roundtrip_reproduces_tree() {
        let codec = JsonOutlineCodec;
        let tree = sample_tree();

        let bytes = codec.serialize(&tree).unwrap();
        let parsed = codec.parse(&bytes).unwrap();

        assert_eq!(parsed.render(), tree.render());
        assert_eq!(parsed, tree);
    }

    #[test]
    fn test_missing_priority_reads_back_as_medium() {
        let codec = JsonOutlineCodec;
        let mut tree = SuiteTree::new("Project");
        tree.attach_case(tree.root(), TestCaseRecord::new("No priority"));

        let parsed = codec.parse(&codec.serialize(&tree).unwrap()).unwrap();
        let case = &parsed.node(parsed.root()).cases()[0];
        assert_eq!(case.priority(), Some(Priority::Medium));
    }

    #[test]
    fn test_parse_hand_written_outline() {
        let json = r#"[{
            "title": "Sheet 1",
            "rootTopic": {
                "title": "Mobile app",
                "children": {"attached": [
                    {"title": "Auth", "children": {"attached": [
                        {"title": "Login ok", "markers": [{"markerId": "priority-1"}],
                         "notes": {"plain": {"content": "Account exists"}},
                         "children": {"attached": [
                            {"title": "Open app", "children": {"attached": [{"title": "Splash shown"}]}},
                            {"title": "Sign in"}
                         ]}}
                    ]}}
                ]}
            }
        }]"#;

        let tree = JsonOutlineCodec.parse(json.as_bytes()).unwrap();
        assert_eq!(tree.root_name(), "Mobile app");

        let auth = tree.child_named(tree.root(), "Auth").unwrap();
        let case = &tree.node(auth).cases()[0];
        assert_eq!(case.title, "Login ok");
        assert_eq!(case.priority(), Some(Priority::High));
        assert_eq!(case.preconditions.as_deref(), Some("Account exists"));
        assert_eq!(
            case.steps,
            vec![Step::new("Open app", "Splash shown"), Step::new("Sign in", "")]
        );
    }

    #[test]
    fn test_parse_rejects_malformed_bytes() {
        let err = JsonOutlineCodec.parse(b"not json").unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
    }

    #[test]
    fn test_parse_rejects_empty_sheet_list() {
        let err = JsonOutlineCodec.parse(b"[]").unwrap_err();
        assert!(matches!(err, CodecError::NoSheets));
    }
}
