use casetree_engine::models::{ModuleIndex, ModuleNode, Step, TestCaseRecord};

// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_modules(count: u64) -> ModuleIndex {
    (1..=count)
        .map(|id| ModuleNode::new(id, format!("Area {}/Module {id}", id % 5)))
        .collect()
}

#[allow(dead_code)]
pub fn generate_records(count: usize, modules: u64) -> Vec<TestCaseRecord> {
    (0..count)
        .map(|i| {
            let record = TestCaseRecord::new(format!("Feature {} - Scenario {i}", i % 20))
                .with_preconditions("User is logged in")
                .with_steps([
                    Step::new("Open the page", "Page shown"),
                    Step::new("Submit the form", "Saved"),
                ]);
            match i as u64 % (modules + 1) {
                0 => record.with_import_label("Imported/Legacy"),
                id => record.with_module(id),
            }
        })
        .collect()
}
