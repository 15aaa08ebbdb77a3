//! Built-in transaction set table
//!
//! Advisory defaults for well-known X12 transaction sets. Lookups of unknown
//! ids simply return `None`; nothing here validates user input.

/// Name and description of a known transaction set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionSetTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

const fn template(
    id: &'static str,
    name: &'static str,
    description: &'static str,
) -> TransactionSetTemplate {
    TransactionSetTemplate {
        id,
        name,
        description,
    }
}

// Sorted by id.
static TEMPLATES: &[TransactionSetTemplate] = &[
    template("204", "Motor Carrier Load Tender", "Load tender"),
    template(
        "210",
        "Motor Carrier Freight Details and Invoice",
        "Freight invoice",
    ),
    template(
        "214",
        "Transportation Carrier Shipment Status Message",
        "Shipment status",
    ),
    template(
        "270",
        "Eligibility, Coverage or Benefit Inquiry",
        "Healthcare eligibility inquiry",
    ),
    template(
        "271",
        "Eligibility, Coverage or Benefit Information",
        "Healthcare eligibility response",
    ),
    template(
        "276",
        "Health Care Claim Status Request",
        "Claim status request",
    ),
    template(
        "277",
        "Health Care Claim Status Response",
        "Claim status response",
    ),
    template("810", "Invoice", "Invoice transaction set"),
    template(
        "820",
        "Payment Order/Remittance Advice",
        "Payment information",
    ),
    template(
        "834",
        "Benefit Enrollment and Maintenance",
        "Enrollment transaction",
    ),
    template(
        "835",
        "Health Care Claim Payment/Advice",
        "Remittance advice",
    ),
    template(
        "837",
        "Health Care Claim",
        "Healthcare claim (Professional/Institutional/Dental)",
    ),
    template("850", "Purchase Order", "Purchase order transaction set"),
    template(
        "855",
        "Purchase Order Acknowledgment",
        "PO acknowledgment",
    ),
    template("856", "Ship Notice/Manifest", "Advance ship notice (ASN)"),
    template("997", "Functional Acknowledgment", "FA transaction set"),
    template("999", "Implementation Acknowledgment", "IA transaction set"),
];

/// EDI versions offered when creating or editing a specification
pub static EDI_VERSIONS: &[&str] = &[
    "004010", "005010", "005020", "006010", "006020", "007010", "007020", "008010",
];

/// Version assumed when none is given
pub const DEFAULT_EDI_VERSION: &str = "005010";

/// Read-only view over the built-in transaction set table
pub struct TransactionSetTemplates;

impl TransactionSetTemplates {
    /// Look up a transaction set by id
    #[must_use]
    pub fn get(id: &str) -> Option<&'static TransactionSetTemplate> {
        TEMPLATES
            .binary_search_by(|t| t.id.cmp(id))
            .ok()
            .map(|idx| &TEMPLATES[idx])
    }

    /// Check whether an id is in the table
    #[must_use]
    pub fn contains(id: &str) -> bool {
        Self::get(id).is_some()
    }

    /// All templates, ordered by id
    pub fn iter() -> impl Iterator<Item = &'static TransactionSetTemplate> {
        TEMPLATES.iter()
    }
}
