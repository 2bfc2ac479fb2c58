//! # Outline Building
//!
//! Turns flat test case records into a nested suite/case outline, and walks
//! an outline back into (path, case) pairs.
//!
//! ## Export pipeline
//!
//! 1. **Resolve** (`path::resolve`): module name, else import label, else
//!    `unclassified`, split on `/` and `\`
//! 2. **Split title** (`title::split_title`): `"Login - Success"` becomes
//!    prefix `["Login"]` and name `"Success"`
//! 3. **Merge** (`ResolvedPath::merge`): structural path first, leading
//!    overlap with the title prefix collapsed
//! 4. **Build** (`builder::OutlineBuilder`): suites created lazily, one per
//!    distinct path
//!
//! ## Import direction
//!
//! - **`flatten`**: lazy pre-order walk yielding each case with its suite path
//!
//! ## Key Invariants
//!
//! - Paths never contain blank segments
//! - No suite has two children with the same name
//! - Cases under one suite keep their input order

pub mod builder;
pub mod flatten;
pub mod path;
pub mod title;

pub use builder::OutlineBuilder;
pub use flatten::{Flatten, flatten};
pub use path::{DISPLAY_SEPARATOR, ResolvedPath, UNCLASSIFIED, resolve};
pub use title::{PLACEHOLDER_NAME, SplitTitle, split_title};

use crate::models::{ModuleIndex, SuiteTree, TestCaseRecord};

/// Where a case lands in an exported outline, and the name it is shown under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub path: ResolvedPath,
    pub name: String,
}

pub fn place(record: &TestCaseRecord, modules: &ModuleIndex) -> Placement {
    place_under(resolve(record, modules), &record.title)
}

/// Placement for a case whose structural path is already known.
pub fn place_under(structural: ResolvedPath, title: &str) -> Placement {
    let split = split_title(title);
    Placement {
        path: structural.merge(&split.prefix),
        name: split.name,
    }
}

/// Build the outline for `records`, in order, under a root named `root_name`.
/// Each attached case is a copy of its record titled with its display name.
pub fn build_outline<'a>(
    root_name: &str,
    records: impl IntoIterator<Item = &'a TestCaseRecord>,
    modules: &ModuleIndex,
) -> SuiteTree {
    let mut builder = OutlineBuilder::new(root_name);

    for record in records {
        let placement = place(record, modules);
        let case = TestCaseRecord {
            title: placement.name,
            ..record.clone()
        };
        builder.attach(&placement.path, case);
    }

    let tree = builder.finish();
    log::debug!(
        "Built outline '{root_name}' with {} suites and {} cases",
        tree.suite_count(),
        tree.case_count()
    );
    tree
}
