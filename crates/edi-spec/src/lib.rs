#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # edi-spec
//!
//! Canonical model and editing primitives for X12 EDI implementation
//! specifications.
//!
//! A [`Specification`] owns a forest of loops, each holding segments and
//! elements. Documents are immutable values: every edit goes through the
//! path-addressed updater in [`update`], which rebuilds only the ancestors of
//! the edited node and shares every other subtree with the previous document.

/// Worked example maintenance on the document appendix.
pub mod examples;
/// Code-list edits for identifier elements.
pub mod codes;
/// Specification document and its metadata.
pub mod document;
/// Opaque node identities.
pub mod id;
/// Loop, segment, element and supporting value types.
pub mod model;
/// Partial field replacements consumed by the updater.
pub mod patch;
/// JSON persistence of whole documents.
pub mod storage;
/// Built-in transaction set table.
pub mod templates;
/// Visitors, node lookup and statistics over the loop forest.
pub mod traversal;
/// Path-addressed copy-on-write updates.
pub mod update;
/// Variant and discriminator rule edits.
pub mod variants;

pub use document::{Specification, SpecificationMetadata};
pub use id::NodeId;
pub use model::{
    CodeValue, DataType, DiscriminatorOperator, DiscriminatorRule, Element, ExampleEdi, Loop,
    Segment, Usage, Variant, WorkedExample,
};
pub use patch::{ElementPatch, ExamplePatch, LoopPatch, MetadataPatch, NodeKind, Patch, SegmentPatch};
pub use templates::{TransactionSetTemplate, TransactionSetTemplates};
pub use traversal::{Located, Statistics, Visitor};

use thiserror::Error;

/// Errors that can occur when working with specification documents
#[derive(Error, Debug)]
pub enum Error {
    #[error("Node not found: {kind} {id}")]
    NodeNotFound { kind: NodeKind, id: String },

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Build a node-not-found error for a lookup by identity.
    pub fn node_not_found(kind: NodeKind, id: impl Into<String>) -> Self {
        Self::NodeNotFound {
            kind,
            id: id.into(),
        }
    }

    /// Build an invalid-path error with the rendered path and reason.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

/// Crate-local result type for specification operations.
pub type Result<T> = std::result::Result<T, Error>;
