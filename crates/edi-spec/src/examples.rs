//! Appendix example maintenance
//!
//! Examples live directly on the document, so these edits copy only the
//! example list and share the whole loop forest.

use crate::document::Specification;
use crate::id::NodeId;
use crate::model::ExampleEdi;
use crate::patch::ExamplePatch;
use tracing::debug;

/// Direction for [`move_example`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Append a new example titled `Example {n}` and return its id.
pub fn add_example(spec: &Specification, content: impl Into<String>) -> (Specification, NodeId) {
    let example = ExampleEdi::new(format!("Example {}", spec.examples.len() + 1), content);
    let id = example.id.clone();
    let mut next = spec.clone();
    next.examples.push(example);
    (next.touched(), id)
}

/// Apply `patch` to the example with `id`.
pub fn update_example(spec: &Specification, id: &NodeId, patch: &ExamplePatch) -> Specification {
    if patch.is_empty() {
        return spec.clone();
    }
    let Some(idx) = index_of(spec, id) else {
        return spec.clone();
    };
    let mut next = spec.clone();
    patch.apply_to(&mut next.examples[idx]);
    next.touched()
}

/// Delete the example with `id`.
pub fn delete_example(spec: &Specification, id: &NodeId) -> Specification {
    let Some(idx) = index_of(spec, id) else {
        return spec.clone();
    };
    let mut next = spec.clone();
    next.examples.remove(idx);
    next.touched()
}

/// Swap the example with its neighbour. Moving past either end does nothing.
pub fn move_example(spec: &Specification, id: &NodeId, direction: Direction) -> Specification {
    let Some(idx) = index_of(spec, id) else {
        return spec.clone();
    };
    let target = match direction {
        Direction::Up => idx.checked_sub(1),
        Direction::Down => Some(idx + 1).filter(|&i| i < spec.examples.len()),
    };
    let Some(target) = target else {
        return spec.clone();
    };
    let mut next = spec.clone();
    next.examples.swap(idx, target);
    next.touched()
}

fn index_of(spec: &Specification, id: &NodeId) -> Option<usize> {
    let idx = spec.examples.iter().position(|ex| &ex.id == id);
    if idx.is_none() {
        debug!(example = %id, "Example not found");
    }
    idx
}
