use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::models::Step;

static NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();

fn number_regex() -> &'static Regex {
    NUMBER_REGEX.get_or_init(|| Regex::new(r"(\d+)\.\s*").expect("Invalid step number regex"))
}

/// Split `"1. open 2. submit"` into numbered entries.
///
/// Text before the first number is dropped. A repeated number keeps its
/// last text. Entries whose text is blank are skipped.
pub fn parse_numbered(text: &str) -> BTreeMap<u32, String> {
    let regex = number_regex();
    let mut entries = BTreeMap::new();
    let matches: Vec<_> = regex.captures_iter(text).collect();

    for (i, caps) in matches.iter().enumerate() {
        let Some(whole) = caps.get(0) else { continue };
        let Ok(number) = caps[1].parse::<u32>() else {
            continue;
        };
        let end = matches
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(text.len(), |m| m.start());
        let body = text[whole.end()..end].trim();
        if !body.is_empty() {
            entries.insert(number, body.to_string());
        }
    }

    entries
}

/// Pair numbered actions with numbered expected results.
///
/// Steps are ordered by number. An action with no matching expected result
/// gets an empty one. Text with no numbering at all becomes a single step.
pub fn parse_steps(steps_text: &str, expected_text: &str) -> Vec<Step> {
    let steps_text = steps_text.trim();
    let expected_text = expected_text.trim();
    if steps_text.is_empty() {
        return Vec::new();
    }

    let actions = parse_numbered(steps_text);
    if actions.is_empty() {
        return vec![Step::new(steps_text, expected_text)];
    }

    let mut expected = parse_numbered(expected_text);
    actions
        .into_iter()
        .map(|(number, action)| {
            let result = expected.remove(&number).unwrap_or_default();
            Step::new(action, result)
        })
        .collect()
}
