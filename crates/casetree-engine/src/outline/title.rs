use std::sync::OnceLock;

use regex::Regex;

use super::path::ResolvedPath;

/// Display name used when a title has no usable text at all.
pub const PLACEHOLDER_NAME: &str = "unnamed case";

/// A title broken into the name shown on its outline leaf and the suite
/// path prefix carried in front of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitTitle {
    pub name: String,
    pub prefix: ResolvedPath,
}

fn separators() -> &'static Regex {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    SEPARATORS.get_or_init(|| Regex::new(r"[-/\\—]+").expect("Invalid title separator regex"))
}

/// Split `"Buttons - Review - Favourite"` into prefix `["Buttons", "Review"]`
/// and name `"Favourite"`.
///
/// Titles with fewer than two parts keep their trimmed text as the name and
/// get an empty prefix. A title that trims to nothing is named
/// [`PLACEHOLDER_NAME`].
pub fn split_title(title: &str) -> SplitTitle {
    let mut parts: Vec<&str> = separators()
        .split(title)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    if parts.len() > 1 {
        let name = parts.pop().unwrap_or_default().to_string();
        return SplitTitle {
            name,
            prefix: ResolvedPath::from_segments(parts),
        };
    }

    let trimmed = title.trim();
    SplitTitle {
        name: if trimmed.is_empty() {
            PLACEHOLDER_NAME.to_string()
        } else {
            trimmed.to_string()
        },
        prefix: ResolvedPath::default(),
    }
}
