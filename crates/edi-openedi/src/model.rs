//! OpenEDI record types
//!
//! Only the fields the converters read are modelled; everything else in an
//! export is ignored. Numeric fields accept numbers or numeric strings and
//! fall back to `None` otherwise. String fields accept numbers too, since
//! some exporters write ids such as `810` unquoted.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Top-level transaction set definition
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OpenEdiTransactionSet {
    #[serde(deserialize_with = "required_text")]
    pub transaction_set_id: String,

    #[serde(default, deserialize_with = "text")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub version: Option<String>,

    #[serde(default, deserialize_with = "list")]
    pub loops: Vec<OpenEdiLoop>,
}

/// Loop definition
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OpenEdiLoop {
    #[serde(default, deserialize_with = "text")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub req: Option<String>,

    #[serde(default, deserialize_with = "count")]
    pub max: Option<u32>,

    #[serde(default, deserialize_with = "list")]
    pub segments: Vec<OpenEdiSegment>,

    #[serde(default, deserialize_with = "list")]
    pub loops: Vec<OpenEdiLoop>,
}

/// Segment definition
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OpenEdiSegment {
    #[serde(default, deserialize_with = "text")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub req: Option<String>,

    #[serde(default, deserialize_with = "count")]
    pub max: Option<u32>,

    #[serde(default, deserialize_with = "list")]
    pub elements: Vec<OpenEdiElement>,
}

/// Element definition
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OpenEdiElement {
    #[serde(default, deserialize_with = "text")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub data_type: Option<String>,

    #[serde(default, deserialize_with = "count")]
    pub min_length: Option<u32>,

    #[serde(default, deserialize_with = "count")]
    pub max_length: Option<u32>,

    #[serde(default, deserialize_with = "text")]
    pub req: Option<String>,

    #[serde(default, deserialize_with = "list")]
    pub codes: Vec<OpenEdiCode>,
}

/// Code list entry
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OpenEdiCode {
    #[serde(default, deserialize_with = "text")]
    pub code: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub description: Option<String>,
}

fn text_from_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn count_from_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    // Saturating float-to-int cast.
                    .map(|f| f as u32)
            }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(text_from_value))
}

fn required_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    text_from_value(value).ok_or_else(|| serde::de::Error::custom("expected a string or number"))
}

fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(count_from_value))
}

/// A missing or `null` list reads as empty. Non-array values are rejected.
fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
