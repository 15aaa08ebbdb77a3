//! Partial field replacements
//!
//! A patch names only the fields it replaces. `None` leaves a field alone;
//! for optional fields `Some(None)` clears the value. Base snapshot fields
//! (`baseUsage`, `baseMinUse`, `baseMaxUse`, `baseCodes`) are not patchable,
//! and JSON patches that mention them are rejected.
#![allow(clippy::option_option)] // Option<Option<T>> distinguishes "leave" from "clear".

use crate::model::{CodeValue, DataType, Element, ExampleEdi, Loop, Segment, Usage, Variant, WorkedExample};
use crate::document::SpecificationMetadata;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// Keeps an explicit `null` as `Some(None)` instead of collapsing it to `None`.
fn explicit<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn replace<T: Clone>(slot: &mut T, value: Option<&T>) {
    if let Some(value) = value {
        slot.clone_from(value);
    }
}

/// Kind of node a path addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Loop,
    Segment,
    Element,
}

impl NodeKind {
    /// Number of trailing non-loop ids in a path to a node of this kind
    pub(crate) fn tail_len(self) -> usize {
        match self {
            NodeKind::Loop => 0,
            NodeKind::Segment => 1,
            NodeKind::Element => 2,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Loop => "loop",
            NodeKind::Segment => "segment",
            NodeKind::Element => "element",
        })
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "loop" => Ok(NodeKind::Loop),
            "segment" => Ok(NodeKind::Segment),
            "element" => Ok(NodeKind::Element),
            other => Err(format!("unknown node kind '{other}'")),
        }
    }
}

/// Editable loop fields
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoopPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "explicit")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub usage: Option<Usage>,
    #[serde(default, deserialize_with = "explicit")]
    pub condition_description: Option<Option<String>>,
    #[serde(default)]
    pub min_use: Option<u32>,
    #[serde(default)]
    pub max_use: Option<u32>,
    #[serde(default, deserialize_with = "explicit")]
    pub variants: Option<Option<Vec<Variant>>>,
}

impl LoopPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Copy of `target` with the patched fields replaced
    #[must_use]
    pub fn applied(&self, target: &Loop) -> Loop {
        let mut next = target.clone();
        replace(&mut next.name, self.name.as_ref());
        replace(&mut next.description, self.description.as_ref());
        replace(&mut next.usage, self.usage.as_ref());
        replace(&mut next.condition_description, self.condition_description.as_ref());
        replace(&mut next.min_use, self.min_use.as_ref());
        replace(&mut next.max_use, self.max_use.as_ref());
        replace(&mut next.variants, self.variants.as_ref());
        next
    }
}

/// Editable segment fields
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SegmentPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub usage: Option<Usage>,
    #[serde(default, deserialize_with = "explicit")]
    pub condition_description: Option<Option<String>>,
    #[serde(default)]
    pub min_use: Option<u32>,
    #[serde(default)]
    pub max_use: Option<u32>,
    #[serde(default, deserialize_with = "explicit")]
    pub example: Option<Option<WorkedExample>>,
}

impl SegmentPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Copy of `target` with the patched fields replaced
    #[must_use]
    pub fn applied(&self, target: &Segment) -> Segment {
        let mut next = target.clone();
        replace(&mut next.name, self.name.as_ref());
        replace(&mut next.description, self.description.as_ref());
        replace(&mut next.usage, self.usage.as_ref());
        replace(&mut next.condition_description, self.condition_description.as_ref());
        replace(&mut next.min_use, self.min_use.as_ref());
        replace(&mut next.max_use, self.max_use.as_ref());
        replace(&mut next.example, self.example.as_ref());
        next
    }
}

/// Editable element fields
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ElementPatch {
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub data_type: Option<DataType>,
    #[serde(default)]
    pub min_length: Option<u32>,
    #[serde(default)]
    pub max_length: Option<u32>,
    #[serde(default)]
    pub usage: Option<Usage>,
    #[serde(default, deserialize_with = "explicit")]
    pub condition_description: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit")]
    pub code_values: Option<Option<Vec<CodeValue>>>,
    #[serde(default, deserialize_with = "explicit")]
    pub example: Option<Option<WorkedExample>>,
    #[serde(default, deserialize_with = "explicit")]
    pub comments: Option<Option<String>>,
}

impl ElementPatch {
    /// Patch replacing the code list; an empty list clears it
    #[must_use]
    pub fn codes(codes: Vec<CodeValue>) -> Self {
        Self {
            code_values: Some((!codes.is_empty()).then_some(codes)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Copy of `target` with the patched fields replaced
    #[must_use]
    pub fn applied(&self, target: &Element) -> Element {
        let mut next = target.clone();
        replace(&mut next.position, self.position.as_ref());
        replace(&mut next.name, self.name.as_ref());
        replace(&mut next.data_type, self.data_type.as_ref());
        replace(&mut next.min_length, self.min_length.as_ref());
        replace(&mut next.max_length, self.max_length.as_ref());
        replace(&mut next.usage, self.usage.as_ref());
        replace(&mut next.condition_description, self.condition_description.as_ref());
        replace(&mut next.code_values, self.code_values.as_ref());
        replace(&mut next.example, self.example.as_ref());
        replace(&mut next.comments, self.comments.as_ref());
        next
    }
}

/// Editable metadata fields. Creation time and import provenance are fixed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MetadataPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub transaction_set: Option<String>,
    #[serde(default)]
    pub transaction_set_name: Option<String>,
    #[serde(default)]
    pub edi_version: Option<String>,
    #[serde(default, deserialize_with = "explicit")]
    pub partner: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit")]
    pub description: Option<Option<String>>,
}

impl MetadataPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply_to(&self, metadata: &mut SpecificationMetadata) {
        replace(&mut metadata.name, self.name.as_ref());
        replace(&mut metadata.version, self.version.as_ref());
        replace(&mut metadata.transaction_set, self.transaction_set.as_ref());
        replace(&mut metadata.transaction_set_name, self.transaction_set_name.as_ref());
        replace(&mut metadata.edi_version, self.edi_version.as_ref());
        replace(&mut metadata.partner, self.partner.as_ref());
        replace(&mut metadata.description, self.description.as_ref());
    }
}

/// Editable example fields
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExamplePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "explicit")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub content: Option<String>,
}

impl ExamplePatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply_to(&self, example: &mut ExampleEdi) {
        replace(&mut example.title, self.title.as_ref());
        replace(&mut example.description, self.description.as_ref());
        replace(&mut example.content, self.content.as_ref());
    }
}

/// A patch together with the kind of node it targets.
///
/// The variant decides how a path is read: a loop chain, a loop chain plus a
/// segment id, or a loop chain plus segment and element ids.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", content = "fields", rename_all = "lowercase")]
pub enum Patch {
    Loop(LoopPatch),
    Segment(SegmentPatch),
    Element(ElementPatch),
}

impl Patch {
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Patch::Loop(_) => NodeKind::Loop,
            Patch::Segment(_) => NodeKind::Segment,
            Patch::Element(_) => NodeKind::Element,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Patch::Loop(p) => p.is_empty(),
            Patch::Segment(p) => p.is_empty(),
            Patch::Element(p) => p.is_empty(),
        }
    }

    /// Usage-only patch for a node of the given kind
    #[must_use]
    pub fn usage(kind: NodeKind, usage: Usage) -> Self {
        match kind {
            NodeKind::Loop => Patch::Loop(LoopPatch {
                usage: Some(usage),
                ..LoopPatch::default()
            }),
            NodeKind::Segment => Patch::Segment(SegmentPatch {
                usage: Some(usage),
                ..SegmentPatch::default()
            }),
            NodeKind::Element => Patch::Element(ElementPatch {
                usage: Some(usage),
                ..ElementPatch::default()
            }),
        }
    }
}

impl From<LoopPatch> for Patch {
    fn from(patch: LoopPatch) -> Self {
        Patch::Loop(patch)
    }
}

impl From<SegmentPatch> for Patch {
    fn from(patch: SegmentPatch) -> Self {
        Patch::Segment(patch)
    }
}

impl From<ElementPatch> for Patch {
    fn from(patch: ElementPatch) -> Self {
        Patch::Element(patch)
    }
}
