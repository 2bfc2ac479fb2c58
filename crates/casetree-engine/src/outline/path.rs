use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{ModuleIndex, TestCaseRecord};

/// Reserved segment for cases with no resolvable module.
pub const UNCLASSIFIED: &str = "unclassified";

/// Separator used when a path is written out as a single string.
pub const DISPLAY_SEPARATOR: &str = " / ";

/// Ordered suite names from the outline root down to a suite.
///
/// Segments are always trimmed and never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedPath(Vec<String>);

impl ResolvedPath {
    pub fn unclassified() -> Self {
        Self(vec![UNCLASSIFIED.to_string()])
    }

    /// Split a module name or label on `/` and `\`. May return an empty path.
    pub fn parse(label: &str) -> Self {
        Self::from_segments(label.split(['/', '\\']))
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            segments
                .into_iter()
                .map(|s| s.as_ref().trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_unclassified(&self) -> bool {
        self.0.len() == 1 && self.0[0] == UNCLASSIFIED
    }

    /// Replace an empty path with the unclassified placeholder
    pub fn or_unclassified(self) -> Self {
        if self.is_empty() {
            Self::unclassified()
        } else {
            self
        }
    }

    /// This path extended by one segment. Blank names are skipped.
    pub fn child(&self, name: &str) -> ResolvedPath {
        let mut segments = self.0.clone();
        let name = name.trim();
        if !name.is_empty() {
            segments.push(name.to_string());
        }
        ResolvedPath(segments)
    }

    pub fn join(&self, separator: &str) -> String {
        self.0.join(separator)
    }

    /// Merge a title-derived prefix onto this structural path.
    ///
    /// The structural path always comes first. A leading overlap between the
    /// two is collapsed; interior or trailing matches are not. An unclassified
    /// structural path carries no structure and is replaced by the prefix.
    pub fn merge(&self, title_prefix: &ResolvedPath) -> ResolvedPath {
        if title_prefix.is_empty() {
            return self.clone();
        }
        if self.is_unclassified() {
            return title_prefix.clone();
        }

        let overlap = self
            .0
            .iter()
            .zip(&title_prefix.0)
            .take_while(|(a, b)| a == b)
            .count();

        let mut merged = self.0.clone();
        merged.extend_from_slice(&title_prefix.0[overlap..]);
        ResolvedPath(merged)
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(DISPLAY_SEPARATOR))
    }
}

impl<S: AsRef<str>> FromIterator<S> for ResolvedPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_segments(iter)
    }
}

/// Structural path of a case: its module's name, else its import-time label,
/// else the unclassified placeholder. Never fails; a module id missing from
/// the index counts as no module.
pub fn resolve(record: &TestCaseRecord, modules: &ModuleIndex) -> ResolvedPath {
    let from_module = modules
        .module_for(record)
        .and_then(|id| modules.name(id))
        .map(ResolvedPath::parse)
        .filter(|path| !path.is_empty());

    if let Some(path) = from_module {
        return path;
    }

    record
        .import_module_name
        .as_deref()
        .map(ResolvedPath::parse)
        .filter(|path| !path.is_empty())
        .unwrap_or_else(ResolvedPath::unclassified)
}
