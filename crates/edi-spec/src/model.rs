//! Loop, segment and element types of the canonical document
#![allow(clippy::must_use_candidate)] // Constructor helpers read clearly without #[must_use].

use crate::id::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Requirement designator of a loop, segment or element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Usage {
    /// Must be present
    #[serde(rename = "M")]
    Mandatory,

    /// May be present
    #[default]
    #[serde(rename = "O")]
    Optional,

    /// Required only when a documented condition holds
    #[serde(rename = "C")]
    Conditional,
}

impl Usage {
    /// Single-letter code used in saved documents
    pub fn code(self) -> &'static str {
        match self {
            Usage::Mandatory => "M",
            Usage::Optional => "O",
            Usage::Conditional => "C",
        }
    }

    /// Minimum occurrence implied by this usage
    pub fn implied_min_use(self) -> u32 {
        u32::from(self == Usage::Mandatory)
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Usage::Mandatory => "Mandatory",
            Usage::Optional => "Optional",
            Usage::Conditional => "Conditional",
        };
        f.write_str(label)
    }
}

impl FromStr for Usage {
    type Err = String;

    /// Strict parse of a canonical code. Imports use the lenient normalizer instead.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "M" | "MANDATORY" => Ok(Usage::Mandatory),
            "O" | "OPTIONAL" => Ok(Usage::Optional),
            "C" | "CONDITIONAL" => Ok(Usage::Conditional),
            other => Err(format!("unknown usage '{other}', expected M, O or C")),
        }
    }
}

/// Representation of an element value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataType {
    /// `AN`
    #[default]
    Alphanumeric,
    /// `ID`
    Identifier,
    /// `N0`
    Numeric,
    /// `N2`
    NumericTwoDecimals,
    /// `R`
    Decimal,
    /// `DT`
    Date,
    /// `TM`
    Time,
    /// Any other code, kept verbatim
    Other(String),
}

impl DataType {
    /// X12 data type code
    pub fn code(&self) -> &str {
        match self {
            DataType::Alphanumeric => "AN",
            DataType::Identifier => "ID",
            DataType::Numeric => "N0",
            DataType::NumericTwoDecimals => "N2",
            DataType::Decimal => "R",
            DataType::Date => "DT",
            DataType::Time => "TM",
            DataType::Other(code) => code,
        }
    }
}

impl From<String> for DataType {
    fn from(code: String) -> Self {
        match code.as_str() {
            "AN" => DataType::Alphanumeric,
            "ID" => DataType::Identifier,
            "N0" => DataType::Numeric,
            "N2" => DataType::NumericTwoDecimals,
            "R" => DataType::Decimal,
            "DT" => DataType::Date,
            "TM" => DataType::Time,
            _ => DataType::Other(code),
        }
    }
}

impl From<&str> for DataType {
    fn from(code: &str) -> Self {
        DataType::from(code.to_string())
    }
}

impl From<DataType> for String {
    fn from(data_type: DataType) -> Self {
        match data_type {
            DataType::Other(code) => code,
            known => known.code().to_string(),
        }
    }
}

/// One legal value of an identifier element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeValue {
    pub code: String,

    pub description: String,

    /// Whether the implementation accepts this code
    pub included: bool,

    /// Set once the imported description has been replaced by the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_custom_description: Option<bool>,
}

impl CodeValue {
    /// Create an included code value
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            included: true,
            is_custom_description: None,
        }
    }
}

/// A worked example attached to a segment or element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkedExample {
    /// Literal EDI line (segments) or element value
    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A data field within a segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: NodeId,

    /// 1-based position within the owning segment
    pub position: u32,

    pub name: String,

    #[serde(default)]
    pub data_type: DataType,

    #[serde(default)]
    pub min_length: u32,

    #[serde(default)]
    pub max_length: u32,

    pub usage: Usage,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_values: Option<Vec<CodeValue>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_usage: Option<Usage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_codes: Option<Vec<CodeValue>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<WorkedExample>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl Element {
    /// Create an optional alphanumeric element with no base snapshot
    pub fn new(position: u32, name: impl Into<String>) -> Self {
        Self {
            id: NodeId::generate(),
            position,
            name: name.into(),
            data_type: DataType::default(),
            min_length: 0,
            max_length: 0,
            usage: Usage::Optional,
            condition_description: None,
            code_values: None,
            base_usage: None,
            base_codes: None,
            example: None,
            comments: None,
        }
    }

    /// Code values, or an empty slice when the element has none
    pub fn codes(&self) -> &[CodeValue] {
        self.code_values.as_deref().unwrap_or_default()
    }

    /// Usage differs from the imported usage
    pub fn is_usage_overridden(&self) -> bool {
        self.base_usage.is_some_and(|base| base != self.usage)
    }

    /// Code list differs from the imported code list
    pub fn are_codes_overridden(&self) -> bool {
        match &self.base_codes {
            Some(base) => base.as_slice() != self.codes(),
            None => false,
        }
    }
}

/// A record type within a loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: NodeId,

    /// Segment tag, e.g. `N1`
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub usage: Usage,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_description: Option<String>,

    #[serde(default)]
    pub min_use: u32,

    #[serde(default)]
    pub max_use: u32,

    #[serde(default)]
    pub elements: Vec<Arc<Element>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<WorkedExample>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_usage: Option<Usage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_min_use: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_max_use: Option<u32>,
}

impl Segment {
    /// Create an optional, non-repeating segment with no elements
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: NodeId::generate(),
            description: name.clone(),
            name,
            usage: Usage::Optional,
            condition_description: None,
            min_use: 0,
            max_use: 1,
            elements: Vec::new(),
            example: None,
            base_usage: None,
            base_min_use: None,
            base_max_use: None,
        }
    }

    pub fn is_usage_overridden(&self) -> bool {
        self.base_usage.is_some_and(|base| base != self.usage)
    }

    pub fn are_bounds_overridden(&self) -> bool {
        self.base_min_use.is_some_and(|base| base != self.min_use)
            || self.base_max_use.is_some_and(|base| base != self.max_use)
    }

    /// Position the next appended element would take
    pub fn next_position(&self) -> u32 {
        self.elements.iter().map(|e| e.position).max().unwrap_or(0) + 1
    }
}

/// Comparison applied by a discriminator rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscriminatorOperator {
    #[default]
    Equals,
    OneOf,
}

/// A condition on one element's value selecting a variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscriminatorRule {
    /// Element reference, e.g. `N101`
    pub element_id: String,

    pub operator: DiscriminatorOperator,

    pub values: Vec<String>,
}

impl DiscriminatorRule {
    /// Check an element value against this rule
    pub fn matches(&self, value: &str) -> bool {
        match self.operator {
            DiscriminatorOperator::Equals => self.values.first().is_some_and(|v| v == value),
            DiscriminatorOperator::OneOf => self.values.iter().any(|v| v == value),
        }
    }
}

impl Default for DiscriminatorRule {
    fn default() -> Self {
        Self {
            element_id: String::new(),
            operator: DiscriminatorOperator::Equals,
            values: vec![String::new()],
        }
    }
}

/// An alternative configuration of a loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: NodeId,

    pub label: String,

    #[serde(default)]
    pub discriminators: Vec<DiscriminatorRule>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_override: Option<Usage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl Variant {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: NodeId::generate(),
            label: label.into(),
            discriminators: Vec::new(),
            usage_override: None,
            comments: None,
        }
    }

    /// True when every rule matches the value `lookup` returns for its element.
    /// A variant without rules never matches.
    pub fn matches<'v>(&self, lookup: impl Fn(&str) -> Option<&'v str>) -> bool {
        !self.discriminators.is_empty()
            && self
                .discriminators
                .iter()
                .all(|rule| lookup(&rule.element_id).is_some_and(|value| rule.matches(value)))
    }
}

/// A repeatable group of segments and nested loops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loop {
    pub id: NodeId,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub usage: Usage,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_description: Option<String>,

    #[serde(default)]
    pub min_use: u32,

    #[serde(default)]
    pub max_use: u32,

    #[serde(default)]
    pub segments: Vec<Arc<Segment>>,

    #[serde(default)]
    pub loops: Vec<Arc<Loop>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<Variant>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_usage: Option<Usage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_min_use: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_max_use: Option<u32>,
}

impl Loop {
    /// Create an optional, non-repeating loop with no children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::generate(),
            name: name.into(),
            description: None,
            usage: Usage::Optional,
            condition_description: None,
            min_use: 0,
            max_use: 1,
            segments: Vec::new(),
            loops: Vec::new(),
            variants: None,
            base_usage: None,
            base_min_use: None,
            base_max_use: None,
        }
    }

    pub fn is_usage_overridden(&self) -> bool {
        self.base_usage.is_some_and(|base| base != self.usage)
    }

    pub fn are_bounds_overridden(&self) -> bool {
        self.base_min_use.is_some_and(|base| base != self.min_use)
            || self.base_max_use.is_some_and(|base| base != self.max_use)
    }

    /// Variants, or an empty slice when none are defined
    pub fn variant_list(&self) -> &[Variant] {
        self.variants.as_deref().unwrap_or_default()
    }
}

/// A complete EDI sample shown in the document appendix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleEdi {
    pub id: NodeId,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Raw EDI text, stored verbatim
    #[serde(default)]
    pub content: String,
}

impl ExampleEdi {
    /// Create an example with the given title and raw EDI content
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: NodeId::generate(),
            title: title.into(),
            description: None,
            content: content.into(),
        }
    }
}
