//! Code-list edits
//!
//! Each edit maps an element's current code list to the next one. The result
//! is applied through the updater with [`ElementPatch::codes`], so the base
//! code snapshot on the element is never touched.

use crate::model::{CodeValue, Element};
use crate::patch::ElementPatch;

/// One change to an element's code list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeListEdit {
    /// Flip `included` on every entry with this code
    Toggle(String),
    /// Replace the description of a code and mark it custom
    Describe { code: String, description: String },
    /// Append a blank, included, custom entry
    AddBlank,
    /// Replace the entry at `index`
    Replace { index: usize, value: CodeValue },
    /// Delete the entry at `index`
    Remove(usize),
    IncludeAll,
    ExcludeAll,
}

impl CodeListEdit {
    /// Next code list after this edit. Out-of-range indexes leave the list as is.
    #[must_use]
    pub fn apply_to(&self, codes: &[CodeValue]) -> Vec<CodeValue> {
        let mut next = codes.to_vec();
        match self {
            CodeListEdit::Toggle(code) => {
                for value in next.iter_mut().filter(|c| &c.code == code) {
                    value.included = !value.included;
                }
            }
            CodeListEdit::Describe { code, description } => {
                for value in next.iter_mut().filter(|c| &c.code == code) {
                    value.description.clone_from(description);
                    value.is_custom_description = Some(true);
                }
            }
            CodeListEdit::AddBlank => next.push(CodeValue {
                code: String::new(),
                description: String::new(),
                included: true,
                is_custom_description: Some(true),
            }),
            CodeListEdit::Replace { index, value } => {
                if let Some(slot) = next.get_mut(*index) {
                    *slot = value.clone();
                }
            }
            CodeListEdit::Remove(index) => {
                if *index < next.len() {
                    next.remove(*index);
                }
            }
            CodeListEdit::IncludeAll => next.iter_mut().for_each(|c| c.included = true),
            CodeListEdit::ExcludeAll => next.iter_mut().for_each(|c| c.included = false),
        }
        next
    }

    /// Patch that applies this edit to `element`
    #[must_use]
    pub fn patch_for(&self, element: &Element) -> ElementPatch {
        ElementPatch::codes(self.apply_to(element.codes()))
    }
}

/// Case-insensitive filter over code and description, as used by code pickers.
/// Returns `(index, value)` pairs so callers can address entries by index.
pub fn filter_codes<'a>(codes: &'a [CodeValue], query: &str) -> Vec<(usize, &'a CodeValue)> {
    let query = query.to_lowercase();
    codes
        .iter()
        .enumerate()
        .filter(|(_, c)| {
            query.is_empty()
                || c.code.to_lowercase().contains(&query)
                || c.description.to_lowercase().contains(&query)
        })
        .collect()
}

/// Counts of `(included, excluded)` codes
#[must_use]
pub fn inclusion_counts(codes: &[CodeValue]) -> (usize, usize) {
    let included = codes.iter().filter(|c| c.included).count();
    (included, codes.len() - included)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<CodeValue> {
        vec![
            CodeValue::new("ST", "Ship To"),
            CodeValue::new("BT", "Bill To"),
            CodeValue::new("SU", "Supplier"),
        ]
    }

    #[test]
    fn test_toggle_code() {
        let codes = CodeListEdit::Toggle("BT".to_string()).apply_to(&sample());
        assert!(codes[0].included);
        assert!(!codes[1].included);
        assert_eq!(inclusion_counts(&codes), (2, 1));

        let codes = CodeListEdit::Toggle("BT".to_string()).apply_to(&codes);
        assert!(codes[1].included);
    }

    #[test]
    fn test_describe_marks_custom() {
        let edit = CodeListEdit::Describe {
            code: "SU".to_string(),
            description: "Vendor".to_string(),
        };
        let codes = edit.apply_to(&sample());
        assert_eq!(codes[2].description, "Vendor");
        assert_eq!(codes[2].is_custom_description, Some(true));
        assert_eq!(codes[0].is_custom_description, None);
    }

    #[test]
    fn test_add_replace_remove() {
        let codes = CodeListEdit::AddBlank.apply_to(&sample());
        assert_eq!(codes.len(), 4);
        assert!(codes[3].code.is_empty());
        assert!(codes[3].included);

        let codes = CodeListEdit::Replace {
            index: 3,
            value: CodeValue::new("RE", "Remit To"),
        }
        .apply_to(&codes);
        assert_eq!(codes[3].code, "RE");

        let codes = CodeListEdit::Remove(0).apply_to(&codes);
        assert_eq!(codes[0].code, "BT");
        assert_eq!(CodeListEdit::Remove(42).apply_to(&codes), codes);
    }

    #[test]
    fn test_include_exclude_all() {
        let codes = CodeListEdit::ExcludeAll.apply_to(&sample());
        assert_eq!(inclusion_counts(&codes), (0, 3));
        let codes = CodeListEdit::IncludeAll.apply_to(&codes);
        assert_eq!(inclusion_counts(&codes), (3, 0));
    }

    #[test]
    fn test_patch_for_element_without_codes() {
        let element = Element::new(1, "N101");
        let patch = CodeListEdit::AddBlank.patch_for(&element);
        assert_eq!(patch.code_values.unwrap().unwrap().len(), 1);

        let mut element = Element::new(1, "N101");
        element.code_values = Some(vec![CodeValue::new("ST", "Ship To")]);
        let patch = CodeListEdit::Remove(0).patch_for(&element);
        assert_eq!(patch.code_values, Some(None));
    }

    #[test]
    fn test_filter_codes() {
        let codes = sample();
        let hits = filter_codes(&codes, "to");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[1].0, 1);
        assert_eq!(filter_codes(&codes, "").len(), 3);
        assert_eq!(filter_codes(&codes, "su")[0].1.code, "SU");
    }
}
