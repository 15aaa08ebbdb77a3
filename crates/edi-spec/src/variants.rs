//! Variant and discriminator rule edits on loops

use crate::document::Specification;
use crate::id::NodeId;
use crate::model::{DiscriminatorRule, Usage, Variant};
use crate::patch::LoopPatch;
use crate::traversal::loop_at;
use crate::update::apply;
use tracing::debug;

/// One change to a loop's variant list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantEdit {
    Add(Variant),
    Relabel { variant: NodeId, label: String },
    SetUsageOverride { variant: NodeId, usage: Option<Usage> },
    SetComments { variant: NodeId, comments: Option<String> },
    Delete(NodeId),
    /// Append a blank `equals` rule
    AddRule(NodeId),
    UpdateRule {
        variant: NodeId,
        index: usize,
        rule: DiscriminatorRule,
    },
    RemoveRule { variant: NodeId, index: usize },
}

impl VariantEdit {
    /// Next variant list, or `None` when the edit refers to something absent
    #[must_use]
    pub fn apply_to(&self, variants: &[Variant]) -> Option<Vec<Variant>> {
        let mut next = variants.to_vec();
        match self {
            VariantEdit::Add(variant) => next.push(variant.clone()),
            VariantEdit::Relabel { variant, label } => {
                find(&mut next, variant)?.label.clone_from(label);
            }
            VariantEdit::SetUsageOverride { variant, usage } => {
                find(&mut next, variant)?.usage_override = *usage;
            }
            VariantEdit::SetComments { variant, comments } => {
                find(&mut next, variant)?.comments.clone_from(comments);
            }
            VariantEdit::Delete(variant) => {
                let idx = next.iter().position(|v| &v.id == variant)?;
                next.remove(idx);
            }
            VariantEdit::AddRule(variant) => {
                find(&mut next, variant)?
                    .discriminators
                    .push(DiscriminatorRule::default());
            }
            VariantEdit::UpdateRule {
                variant,
                index,
                rule,
            } => {
                let slot = find(&mut next, variant)?.discriminators.get_mut(*index)?;
                *slot = rule.clone();
            }
            VariantEdit::RemoveRule { variant, index } => {
                let rules = &mut find(&mut next, variant)?.discriminators;
                if *index >= rules.len() {
                    return None;
                }
                rules.remove(*index);
            }
        }
        Some(next)
    }
}

fn find<'a>(variants: &'a mut [Variant], id: &NodeId) -> Option<&'a mut Variant> {
    variants.iter_mut().find(|v| &v.id == id)
}

/// Apply `edit` to the variants of the loop at `loop_path`.
///
/// Unknown loops, variants or rule indexes leave the document unchanged.
pub fn edit_variants(spec: &Specification, loop_path: &[NodeId], edit: &VariantEdit) -> Specification {
    let Some(target) = loop_at(spec, loop_path) else {
        debug!("Variant edit on missing loop");
        return spec.clone();
    };
    let Some(variants) = edit.apply_to(target.variant_list()) else {
        debug!(?edit, "Variant edit did not resolve");
        return spec.clone();
    };
    let patch = LoopPatch {
        variants: Some((!variants.is_empty()).then_some(variants)),
        ..LoopPatch::default()
    };
    apply(spec, loop_path, patch)
}

/// Split a comma-separated value list into trimmed values
#[must_use]
pub fn parse_values(input: &str) -> Vec<String> {
    input.split(',').map(|v| v.trim().to_string()).collect()
}
