//! # Outline Codecs
//!
//! Serialization of a [`SuiteTree`] to a downloadable outline file and back.
//! The rest of the engine only relies on [`OutlineCodec`]; the byte layout
//! belongs to each implementation.
//!
//! `parse(serialize(tree))` must give back an equal tree: same suite names,
//! same child order, same cases per suite, same steps per case.

pub mod json;

pub use json::JsonOutlineCodec;

use crate::models::SuiteTree;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Malformed outline file: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Outline file contains no sheets")]
    NoSheets,
}

pub trait OutlineCodec {
    /// File extension (without the dot) this codec reads and writes
    fn extension(&self) -> &'static str;

    fn serialize(&self, tree: &SuiteTree) -> Result<Vec<u8>, CodecError>;

    fn parse(&self, bytes: &[u8]) -> Result<SuiteTree, CodecError>;
}
