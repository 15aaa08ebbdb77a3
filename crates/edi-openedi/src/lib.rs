//! # edi-openedi
//!
//! Import of OpenEDI transaction set definitions.
//!
//! OpenEDI exports are loosely typed: most fields are optional and numbers
//! sometimes arrive as strings. This crate reads them permissively into
//! [`model`] records and converts those into an [`edi_spec::Specification`],
//! normalizing usage codes and recording the as-imported values so later
//! edits can be shown as overrides.

pub mod convert;
pub mod import;
pub mod model;
pub mod usage;

pub use convert::{convert_element, convert_loop, convert_segment};
pub use import::{import_specification, parse_and_import, parse_external_payload};
pub use model::{OpenEdiCode, OpenEdiElement, OpenEdiLoop, OpenEdiSegment, OpenEdiTransactionSet};
pub use usage::normalize_usage;

use thiserror::Error;

/// Errors that can occur when importing OpenEDI payloads
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid JSON, or JSON whose shape cannot hold a transaction set
    #[error("OpenEDI parse error: {0}")]
    Parse(String),

    #[error("Empty specification array")]
    EmptySpecification,
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
