//! OpenEDI payload parsing and import

use crate::convert::convert_loop;
use crate::model::OpenEdiTransactionSet;
use crate::{Error, Result};
use edi_spec::document::{self, INITIAL_SPEC_VERSION};
use edi_spec::templates::{DEFAULT_EDI_VERSION, TransactionSetTemplates};
use edi_spec::{NodeId, Specification, SpecificationMetadata};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Parse raw OpenEDI JSON into a transaction set record.
///
/// Exporters sometimes wrap the transaction set in an array; the first element
/// is taken and any others are discarded.
///
/// # Errors
///
/// [`Error::Parse`] when the text is not JSON or cannot hold a transaction set,
/// [`Error::EmptySpecification`] for an empty array.
pub fn parse_external_payload(raw: &str) -> Result<OpenEdiTransactionSet> {
    let value: Value = serde_json::from_str(raw)?;
    let value = match value {
        Value::Array(items) => {
            let total = items.len();
            let first = items.into_iter().next().ok_or(Error::EmptySpecification)?;
            if total > 1 {
                warn!(discarded = total - 1, "Payload holds several transaction sets, importing the first");
            }
            first
        }
        other => other,
    };
    Ok(serde_json::from_value(value)?)
}

/// Build a fresh specification from a transaction set record
#[must_use]
pub fn import_specification(external: &OpenEdiTransactionSet) -> Specification {
    let id = external.transaction_set_id.as_str();
    let transaction_set_name = external
        .name
        .clone()
        .or_else(|| TransactionSetTemplates::get(id).map(|t| t.name.to_string()))
        .unwrap_or_else(|| id.to_string());
    let edi_version = external
        .version
        .clone()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_EDI_VERSION.to_string());
    let now = document::now();

    let loops: Vec<_> = external
        .loops
        .iter()
        .map(|l| Arc::new(convert_loop(l)))
        .collect();

    info!(
        transaction_set = id,
        edi_version = %edi_version,
        loops = loops.len(),
        "Imported OpenEDI specification"
    );

    Specification {
        id: NodeId::generate(),
        metadata: SpecificationMetadata {
            name: format!("{id} - {transaction_set_name}"),
            version: INITIAL_SPEC_VERSION.to_string(),
            transaction_set: id.to_string(),
            base_spec_reference: Some(format!("OpenEDI/{edi_version}/{id}")),
            transaction_set_name,
            edi_version,
            created_date: now,
            modified_date: now,
            partner: None,
            description: None,
        },
        loops,
        examples: Vec::new(),
    }
}

/// Parse and import in one step
///
/// # Errors
///
/// See [`parse_external_payload`].
pub fn parse_and_import(raw: &str) -> Result<Specification> {
    parse_external_payload(raw).map(|external| import_specification(&external))
}
