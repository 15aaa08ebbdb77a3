//! Specification document and metadata
#![allow(clippy::must_use_candidate)] // Constructor API intentionally omits pervasive #[must_use].

use crate::id::NodeId;
use crate::model::{ExampleEdi, Loop};
use crate::templates::{DEFAULT_EDI_VERSION, TransactionSetTemplates};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Version every new or imported specification starts at
pub const INITIAL_SPEC_VERSION: &str = "1.0";

/// An implementation specification for one transaction set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specification {
    pub id: NodeId,

    pub metadata: SpecificationMetadata,

    /// Top-level loops in document order
    #[serde(default)]
    pub loops: Vec<Arc<Loop>>,

    /// Appendix samples in display order
    #[serde(default)]
    pub examples: Vec<ExampleEdi>,
}

/// Descriptive metadata of a specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecificationMetadata {
    pub name: String,

    /// Version of the implementation document itself, not the EDI release
    pub version: String,

    /// Transaction set id, e.g. `810`
    pub transaction_set: String,

    pub transaction_set_name: String,

    /// X12 release, e.g. `005010`
    pub edi_version: String,

    #[serde(with = "timestamp")]
    pub created_date: DateTime<Utc>,

    /// Refreshed on every successful edit
    #[serde(with = "timestamp")]
    pub modified_date: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Provenance of an imported document; read-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_spec_reference: Option<String>,
}

/// Current time at the millisecond precision documents are saved with
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// RFC 3339 timestamps with exactly three fractional digits and a `Z` suffix
mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

impl Specification {
    /// Create an empty specification for a transaction set.
    ///
    /// The built-in template table supplies the default name; unknown ids are
    /// accepted and fall back to `Transaction Set {id}`.
    pub fn create_empty(
        transaction_set_id: &str,
        name: Option<&str>,
        edi_version: Option<&str>,
    ) -> Self {
        let template = TransactionSetTemplates::get(transaction_set_id);
        let name = name
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .or_else(|| template.map(|t| t.name.to_string()))
            .unwrap_or_else(|| format!("Transaction Set {transaction_set_id}"));
        let transaction_set_name =
            template.map_or_else(|| transaction_set_id.to_string(), |t| t.name.to_string());
        let now = now();

        debug!(
            transaction_set = transaction_set_id,
            known = template.is_some(),
            "Creating empty specification"
        );

        Self {
            id: NodeId::generate(),
            metadata: SpecificationMetadata {
                name,
                version: INITIAL_SPEC_VERSION.to_string(),
                transaction_set: transaction_set_id.to_string(),
                transaction_set_name,
                edi_version: edi_version
                    .filter(|v| !v.is_empty())
                    .unwrap_or(DEFAULT_EDI_VERSION)
                    .to_string(),
                created_date: now,
                modified_date: now,
                partner: None,
                description: None,
                base_spec_reference: None,
            },
            loops: Vec::new(),
            examples: Vec::new(),
        }
    }

    /// Whether the document originated from an import
    pub fn is_imported(&self) -> bool {
        self.metadata.base_spec_reference.is_some()
    }

    /// Stamp the modification time; used by every successful edit
    pub(crate) fn touched(mut self) -> Self {
        self.metadata.modified_date = now();
        self
    }
}
