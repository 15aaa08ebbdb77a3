//! Conversion of OpenEDI records into specification nodes
//!
//! Every converter records the computed usage (and occurrence bounds or code
//! list) as the node's base snapshot, so later edits show up as overrides.

use crate::model::{OpenEdiCode, OpenEdiElement, OpenEdiLoop, OpenEdiSegment};
use crate::usage::normalize_usage;
use edi_spec::{CodeValue, DataType, Element, Loop, Segment, Usage};
use std::sync::Arc;
use tracing::trace;

/// Occurrence bounds implied by a usage and an external `Max`
fn bounds(usage: Usage, max: Option<u32>) -> (u32, u32) {
    let max_use = max.filter(|m| *m > 0).unwrap_or(1);
    (usage.implied_min_use(), max_use)
}

fn convert_code(code: &OpenEdiCode) -> CodeValue {
    CodeValue::new(
        code.code.clone().unwrap_or_default(),
        code.description.clone().unwrap_or_default(),
    )
}

/// Convert an element; `position` is its 1-based index in the owning segment
#[must_use]
pub fn convert_element(external: &OpenEdiElement, position: u32) -> Element {
    let usage = normalize_usage(external.req.as_deref());
    let name = external
        .name
        .clone()
        .or_else(|| external.id.clone())
        .unwrap_or_default();

    let codes: Vec<CodeValue> = external.codes.iter().map(convert_code).collect();
    let codes = (!codes.is_empty()).then_some(codes);

    trace!(id = ?external.id, position, %usage, "Converted element");

    Element {
        data_type: external
            .data_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(DataType::from)
            .unwrap_or_default(),
        min_length: external.min_length.unwrap_or(0),
        max_length: external.max_length.unwrap_or(0),
        usage,
        base_usage: Some(usage),
        base_codes: codes.clone(),
        code_values: codes,
        ..Element::new(position, name)
    }
}

/// Convert a segment and its elements
#[must_use]
pub fn convert_segment(external: &OpenEdiSegment) -> Segment {
    let usage = normalize_usage(external.req.as_deref());
    let (min_use, max_use) = bounds(usage, external.max);
    let name = external
        .id
        .clone()
        .or_else(|| external.name.clone())
        .unwrap_or_default();
    let description = external.name.clone().unwrap_or_else(|| name.clone());

    let elements = external
        .elements
        .iter()
        .zip(1u32..)
        .map(|(element, position)| Arc::new(convert_element(element, position)))
        .collect();

    trace!(segment = %name, %usage, min_use, max_use, "Converted segment");

    Segment {
        description,
        usage,
        min_use,
        max_use,
        elements,
        base_usage: Some(usage),
        base_min_use: Some(min_use),
        base_max_use: Some(max_use),
        ..Segment::new(name)
    }
}

/// Convert a loop, its segments and its nested loops
#[must_use]
pub fn convert_loop(external: &OpenEdiLoop) -> Loop {
    let usage = normalize_usage(external.req.as_deref());
    let (min_use, max_use) = bounds(usage, external.max);
    let name = external
        .id
        .clone()
        .or_else(|| external.name.clone())
        .unwrap_or_default();

    let segments = external
        .segments
        .iter()
        .map(|s| Arc::new(convert_segment(s)))
        .collect();
    let loops = external
        .loops
        .iter()
        .map(|l| Arc::new(convert_loop(l)))
        .collect();

    trace!(loop_name = %name, %usage, min_use, max_use, "Converted loop");

    Loop {
        description: external.name.clone(),
        usage,
        min_use,
        max_use,
        segments,
        loops,
        base_usage: Some(usage),
        base_min_use: Some(min_use),
        base_max_use: Some(max_use),
        ..Loop::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(code: &str, description: &str) -> OpenEdiCode {
        OpenEdiCode {
            code: Some(code.to_string()),
            description: Some(description.to_string()),
        }
    }

    #[test]
    fn test_convert_element_defaults() {
        let element = convert_element(&OpenEdiElement::default(), 4);
        assert_eq!(element.position, 4);
        assert_eq!(element.name, "");
        assert_eq!(element.data_type, DataType::Alphanumeric);
        assert_eq!(element.min_length, 0);
        assert_eq!(element.max_length, 0);
        assert_eq!(element.usage, Usage::Optional);
        assert_eq!(element.base_usage, Some(Usage::Optional));
        assert!(element.code_values.is_none());
        assert!(element.base_codes.is_none());
    }

    #[test]
    fn test_convert_element_name_falls_back_to_id() {
        let external = OpenEdiElement {
            id: Some("N101".to_string()),
            ..OpenEdiElement::default()
        };
        assert_eq!(convert_element(&external, 1).name, "N101");

        let external = OpenEdiElement {
            name: Some("Entity Identifier Code".to_string()),
            ..external
        };
        assert_eq!(convert_element(&external, 1).name, "Entity Identifier Code");
    }

    #[test]
    fn test_convert_element_codes_and_snapshot() {
        let external = OpenEdiElement {
            id: Some("N101".to_string()),
            data_type: Some("ID".to_string()),
            min_length: Some(2),
            max_length: Some(3),
            req: Some("m".to_string()),
            codes: vec![code("ST", "Ship To"), code("BT", "Bill To")],
            ..OpenEdiElement::default()
        };
        let element = convert_element(&external, 1);
        assert_eq!(element.data_type, DataType::Identifier);
        assert_eq!(element.usage, Usage::Mandatory);
        let codes = element.code_values.as_deref().unwrap();
        assert_eq!(codes.len(), 2);
        assert!(codes.iter().all(|c| c.included));
        assert_eq!(element.base_codes.as_deref(), Some(codes));
        assert!(!element.are_codes_overridden());
    }

    #[test]
    fn test_convert_element_keeps_unknown_data_type() {
        let external = OpenEdiElement {
            data_type: Some("N1".to_string()),
            ..OpenEdiElement::default()
        };
        assert_eq!(
            convert_element(&external, 1).data_type,
            DataType::Other("N1".to_string())
        );
    }

    #[test]
    fn test_convert_segment_bounds() {
        let external = OpenEdiSegment {
            id: Some("N1".to_string()),
            name: Some("Party Identification".to_string()),
            req: Some("M".to_string()),
            max: None,
            elements: vec![OpenEdiElement::default(), OpenEdiElement::default()],
        };
        let segment = convert_segment(&external);
        assert_eq!(segment.name, "N1");
        assert_eq!(segment.description, "Party Identification");
        assert_eq!((segment.min_use, segment.max_use), (1, 1));
        assert_eq!(segment.base_min_use, Some(1));
        assert_eq!(segment.base_max_use, Some(1));
        let positions: Vec<u32> = segment.elements.iter().map(|e| e.position).collect();
        assert_eq!(positions, [1, 2]);

        let optional = convert_segment(&OpenEdiSegment {
            id: Some("PER".to_string()),
            req: Some("O".to_string()),
            max: Some(3),
            ..OpenEdiSegment::default()
        });
        assert_eq!((optional.min_use, optional.max_use), (0, 3));
        assert_eq!(optional.description, "PER");
    }

    #[test]
    fn test_zero_max_falls_back_to_one() {
        let segment = convert_segment(&OpenEdiSegment {
            max: Some(0),
            ..OpenEdiSegment::default()
        });
        assert_eq!(segment.max_use, 1);
    }

    #[test]
    fn test_convert_loop_recurses() {
        let external = OpenEdiLoop {
            id: None,
            name: Some("Party".to_string()),
            req: Some("C".to_string()),
            max: Some(200),
            segments: vec![OpenEdiSegment::default()],
            loops: vec![OpenEdiLoop {
                id: Some("N2_LOOP".to_string()),
                ..OpenEdiLoop::default()
            }],
        };
        let converted = convert_loop(&external);
        assert_eq!(converted.name, "Party");
        assert_eq!(converted.description.as_deref(), Some("Party"));
        assert_eq!(converted.usage, Usage::Conditional);
        assert_eq!((converted.min_use, converted.max_use), (0, 200));
        assert_eq!(converted.segments.len(), 1);
        assert_eq!(converted.loops[0].name, "N2_LOOP");
        assert!(converted.loops[0].description.is_none());
        assert_eq!(converted.loops[0].base_max_use, Some(1));
    }

    #[test]
    fn test_converted_nodes_get_distinct_ids() {
        let external = OpenEdiSegment {
            elements: vec![OpenEdiElement::default(), OpenEdiElement::default()],
            ..OpenEdiSegment::default()
        };
        let segment = convert_segment(&external);
        assert_ne!(segment.elements[0].id, segment.elements[1].id);
        assert_ne!(segment.id, segment.elements[0].id);
    }
}
