//! JSON persistence
//!
//! Documents are stored as pretty-printed JSON with camelCase field names.
//! Every field survives a save/load cycle.

use crate::document::Specification;
use crate::Result;
use tracing::debug;

/// File extension used for saved specifications
pub const SPEC_FILE_EXTENSION: &str = "edispec";

/// Serialize a document for saving
pub fn to_json(spec: &Specification) -> Result<String> {
    let json = serde_json::to_string_pretty(spec)?;
    debug!(bytes = json.len(), spec = %spec.id, "Serialized specification");
    Ok(json)
}

/// Parse a saved document
pub fn from_json(json: &str) -> Result<Specification> {
    let spec: Specification = serde_json::from_str(json)?;
    debug!(spec = %spec.id, loops = spec.loops.len(), "Loaded specification");
    Ok(spec)
}
