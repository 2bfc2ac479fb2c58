//! # Export
//!
//! Writes test cases out as an outline file (through an [`OutlineCodec`]) or
//! as a CSV table.
//!
//! - **`labels`**: code → display label tables, passed in as configuration
//! - **`table`**: CSV rows, numbered step columns, import template

pub mod labels;
pub mod table;

pub use labels::{LabelKind, LabelTables};

use serde::{Deserialize, Serialize};

use crate::codec::{CodecError, OutlineCodec};
use crate::models::{ModuleIndex, TestCaseRecord};
use crate::outline::{self, resolve};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No test cases to export")]
    NothingToExport,
    #[error("Failed to write table: {0}")]
    Table(#[from] csv::Error),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Outline,
    Table,
}

/// A finished export ready to be saved or downloaded.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Download file name: `"{prefix}_{kind}.{extension}"`, with path separators
/// in `prefix` replaced so the name stays a single path component.
pub fn file_name(prefix: &str, kind: &str, extension: &str) -> String {
    let prefix: String = prefix
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{prefix}_{kind}.{extension}")
}

/// Outline root name for a project export
pub fn outline_root_name(project: &str) -> String {
    format!("{project} - test cases")
}

pub fn export_outline(
    project: &str,
    records: &[TestCaseRecord],
    modules: &ModuleIndex,
    codec: &dyn OutlineCodec,
) -> Result<ExportFile, ExportError> {
    if records.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let tree = outline::build_outline(&outline_root_name(project), records, modules);
    let bytes = codec.serialize(&tree)?;
    log::info!(
        "Exported {} cases into {} suites for '{project}'",
        tree.case_count(),
        tree.suite_count() - 1
    );

    Ok(ExportFile {
        file_name: file_name(project, "test_cases", codec.extension()),
        bytes,
    })
}

/// CSV export. The module column holds each case's module path (not merged
/// with its title) and the title column the full title, so the file reads
/// back through the tabular importer unchanged.
pub fn export_table(
    project: &str,
    records: &[TestCaseRecord],
    modules: &ModuleIndex,
    labels: &LabelTables,
) -> Result<ExportFile, ExportError> {
    if records.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let rows = records.iter().map(|r| (resolve(r, modules), r));
    let bytes = table::write_cases(rows, labels)?;
    log::info!("Exported {} table rows for '{project}'", records.len());

    Ok(ExportFile {
        file_name: file_name(project, "test_cases", "csv"),
        bytes,
    })
}

pub fn export(
    format: ExportFormat,
    project: &str,
    records: &[TestCaseRecord],
    modules: &ModuleIndex,
    codec: &dyn OutlineCodec,
    labels: &LabelTables,
) -> Result<ExportFile, ExportError> {
    match format {
        ExportFormat::Outline => export_outline(project, records, modules, codec),
        ExportFormat::Table => export_table(project, records, modules, labels),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonOutlineCodec;
    use crate::models::ModuleNode;

    #[test]
    fn test_empty_export_is_rejected() {
        let modules = ModuleIndex::new();
        let labels = LabelTables::default();

        for format in [ExportFormat::Outline, ExportFormat::Table] {
            let result = export(format, "Shop", &[], &modules, &JsonOutlineCodec, &labels);
            assert!(matches!(result, Err(ExportError::NothingToExport)));
        }
    }

    #[test]
    fn test_file_name_flattens_separators() {
        assert_eq!(file_name("Shop/Web", "test_cases", "csv"), "Shop_Web_test_cases.csv");
    }

    #[test]
    fn test_outline_export_round_trips_through_codec() {
        let modules: ModuleIndex = [ModuleNode::new(1, "Auth")].into_iter().collect();
        let records = vec![
            TestCaseRecord::new("Login - Success").with_module(1),
            TestCaseRecord::new("Smoke Test"),
        ];

        let file = export_outline("Shop", &records, &modules, &JsonOutlineCodec).unwrap();
        assert_eq!(file.file_name, "Shop_test_cases.json");

        let tree = JsonOutlineCodec.parse(&file.bytes).unwrap();
        assert_eq!(tree.root_name(), "Shop - test cases");
        assert_eq!(
            tree.render(),
            "Shop - test cases\n  Auth\n    Login\n      - Success\n  unclassified\n    - Smoke Test"
        );
    }

    #[test]
    fn test_table_export_uses_structural_path_and_full_title() {
        let modules: ModuleIndex = [ModuleNode::new(1, "Auth")].into_iter().collect();
        let records = vec![TestCaseRecord::new("Login - Success").with_module(1)];

        let file = export_table("Shop", &records, &modules, &LabelTables::default()).unwrap();
        let text = String::from_utf8(file.bytes).unwrap();
        assert!(text.contains("1,Auth,Login - Success,"));
    }
}
