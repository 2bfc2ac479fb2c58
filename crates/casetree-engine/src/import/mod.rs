//! # Import
//!
//! Reads an uploaded case file back into flat records, one per distinct
//! (path, title).
//!
//! Outline files go through the codec and the flattener; CSV tables are read
//! row by row. Both feed the same merger, so a case split over several rows
//! or several outline branches comes back as a single record.

pub mod merge;
pub mod steps;
pub mod table;

pub use merge::merge_records;
pub use steps::{parse_numbered, parse_steps};

use serde::{Deserialize, Serialize};

use crate::codec::{CodecError, OutlineCodec};
use crate::export::labels::LabelTables;
use crate::models::{Priority, SuiteTree, TestCaseRecord};
use crate::outline::{ResolvedPath, flatten};

/// Category given to cases read from an outline file
pub const DEFAULT_CATEGORY: &str = "functional";
/// Design method given to cases read from an outline file
pub const DEFAULT_METHOD: &str = "scenario";

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Unsupported import file: {0}")]
    UnsupportedFormat(String),
    #[error("File is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("File contains no test cases")]
    NothingToImport,
    #[error("Failed to read table: {0}")]
    Table(#[from] csv::Error),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Import file kind, chosen by file name suffix only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Table,
    Outline,
}

impl ImportFormat {
    pub fn from_file_name(file_name: &str, codec: &dyn OutlineCodec) -> Option<Self> {
        let (_, extension) = file_name.rsplit_once('.')?;
        let extension = extension.to_lowercase();
        if extension == "csv" {
            Some(ImportFormat::Table)
        } else if extension == codec.extension() {
            Some(ImportFormat::Outline)
        } else {
            None
        }
    }
}

/// A record read from an import file, with the suite path it was found under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedCase {
    pub path: ResolvedPath,
    #[serde(flatten)]
    pub case: TestCaseRecord,
}

impl ImportedCase {
    pub fn new(path: ResolvedPath, case: TestCaseRecord) -> Self {
        Self { path, case }
    }
}

/// Flatten a parsed outline into imported cases.
///
/// Cases sitting directly under the root get the unclassified path. Each
/// case's import label is set to its path so later exports find it again.
/// Module and test point links carried in the outline are dropped, since
/// they outrank the label and would move the case out of its suite.
pub fn import_outline(tree: &SuiteTree) -> Vec<ImportedCase> {
    flatten(tree)
        .filter(|(_, case)| !case.title.trim().is_empty())
        .map(|(path, case)| {
            let path = path.or_unclassified();
            let mut case = case.clone();
            case.title = case.title.trim().to_string();
            case.priority.get_or_insert_with(|| Priority::Medium.code().to_string());
            case.category.get_or_insert_with(|| DEFAULT_CATEGORY.to_string());
            case.design_method.get_or_insert_with(|| DEFAULT_METHOD.to_string());
            case.module_id = None;
            case.test_point_id = None;
            case.import_module_name = Some(path.join("/"));
            ImportedCase::new(path, case)
        })
        .collect()
}

/// Read `bytes` as the file named `file_name` and return merged records.
pub fn import_file(
    file_name: &str,
    bytes: &[u8],
    codec: &dyn OutlineCodec,
    labels: &LabelTables,
) -> Result<Vec<ImportedCase>, ImportError> {
    let format = ImportFormat::from_file_name(file_name, codec)
        .ok_or_else(|| ImportError::UnsupportedFormat(file_name.to_string()))?;

    let cases = match format {
        ImportFormat::Table => table::read_table(bytes, labels)?,
        ImportFormat::Outline => import_outline(&codec.parse(bytes)?),
    };
    let read = cases.len();

    let merged = merge_records(cases);
    if merged.is_empty() {
        return Err(ImportError::NothingToImport);
    }

    log::info!(
        "Imported {} cases from '{file_name}' ({read} before merging)",
        merged.len()
    );
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonOutlineCodec;
    use crate::models::{ModuleIndex, ModuleNode, Step};
    use crate::outline::build_outline;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("cases.csv", Some(ImportFormat::Table))]
    #[case("CASES.CSV", Some(ImportFormat::Table))]
    #[case("outline.json", Some(ImportFormat::Outline))]
    #[case("outline.xlsx", None)]
    #[case("no_extension", None)]
    fn test_format_from_file_name(#[case] name: &str, #[case] expected: Option<ImportFormat>) {
        assert_eq!(ImportFormat::from_file_name(name, &JsonOutlineCodec), expected);
    }

    #[test]
    fn test_import_outline_defaults_and_root_cases() {
        // Given an outline with a case on the root and one nested
        let mut tree = SuiteTree::new("upload");
        let auth = tree.add_child(tree.root(), "Auth");
        tree.attach_case(tree.root(), TestCaseRecord::new("Loose"));
        tree.attach_case(auth, TestCaseRecord::new("Login"));
        tree.attach_case(auth, TestCaseRecord::new("   "));

        // When flattened for import
        let cases = import_outline(&tree);

        // Then root cases are unclassified and defaults are filled in
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].path, ResolvedPath::unclassified());
        assert_eq!(cases[1].path, ResolvedPath::from_segments(["Auth"]));
        assert_eq!(cases[1].case.category.as_deref(), Some(DEFAULT_CATEGORY));
        assert_eq!(cases[1].case.design_method.as_deref(), Some(DEFAULT_METHOD));
        assert_eq!(cases[1].case.priority.as_deref(), Some("medium"));
        assert_eq!(cases[1].case.import_module_name.as_deref(), Some("Auth"));
    }

    #[test]
    fn test_outline_import_drops_stale_module_links() {
        // Given a case exported under a known module
        let modules: ModuleIndex = [ModuleNode::new(1, "Auth")].into_iter().collect();
        let records = vec![TestCaseRecord::new("Login - Success").with_module(1)];
        let exported = build_outline("P", &records, &modules);
        let parsed = JsonOutlineCodec
            .parse(&JsonOutlineCodec.serialize(&exported).unwrap())
            .unwrap();

        // When imported and built again with the same modules
        let cases = import_outline(&parsed);
        assert_eq!(cases[0].case.module_id, None);
        assert_eq!(cases[0].case.test_point_id, None);
        let again: Vec<_> = cases.into_iter().map(|c| c.case).collect();
        let rebuilt = build_outline("P", &again, &modules);

        // Then the case stays in its suite
        assert_eq!(rebuilt.render(), "P\n  Auth\n    Login\n      - Success");
    }

    #[test]
    fn test_import_csv_merges_rows() {
        let csv = "Module,Title,Steps,Expected\n\
                   Auth,Login,\"1. a\n2. b\n3. c\",\n\
                   Auth,Login,\"1. d\n2. e\",\n";

        let cases = import_file("cases.csv", csv.as_bytes(), &JsonOutlineCodec, &LabelTables::default())
            .unwrap();

        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].case.steps.len(), 5);
        assert_eq!(cases[0].case.steps[3], Step::new("d", ""));
    }

    #[test]
    fn test_header_only_file_is_nothing_to_import() {
        let result = import_file(
            "cases.csv",
            b"Module,Title\n",
            &JsonOutlineCodec,
            &LabelTables::default(),
        );
        assert!(matches!(result, Err(ImportError::NothingToImport)));
    }

    #[test]
    fn test_unsupported_suffix_is_rejected() {
        let result = import_file("cases.txt", b"", &JsonOutlineCodec, &LabelTables::default());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(name)) if name == "cases.txt"));
    }

    #[test]
    fn test_malformed_outline_propagates() {
        let result = import_file("x.json", b"{not json", &JsonOutlineCodec, &LabelTables::default());
        assert!(matches!(result, Err(ImportError::Codec(_))));
    }

    #[test]
    fn test_imported_case_serializes_flat() {
        let case = ImportedCase::new(
            ResolvedPath::from_segments(["Auth"]),
            TestCaseRecord::new("Login"),
        );
        let json = serde_json::to_value(&case).unwrap();
        assert_eq!(json["path"], serde_json::json!(["Auth"]));
        assert_eq!(json["title"], "Login");
    }
}
