pub mod case;
pub mod module;
pub mod suite;

pub use case::{Priority, Step, TestCaseRecord};
pub use module::{ModuleCatalog, ModuleId, ModuleIndex, ModuleNode, TestPointLink};
pub use suite::{SuiteId, SuiteNode, SuiteTree};
