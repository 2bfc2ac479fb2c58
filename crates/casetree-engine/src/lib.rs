pub mod archive;
pub mod codec;
pub mod export;
pub mod import;
pub mod io;
pub mod models;
pub mod outline;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use archive::{Archive, ArchiveError, ExecutionStatus, ExecutionUpdate, StepResult};
pub use codec::{CodecError, JsonOutlineCodec, OutlineCodec};
pub use export::{ExportError, ExportFile, ExportFormat, LabelKind, LabelTables};
pub use import::{ImportError, ImportFormat, ImportedCase};
pub use io::IoError;
pub use models::*;
pub use outline::{ResolvedPath, build_outline, flatten};
