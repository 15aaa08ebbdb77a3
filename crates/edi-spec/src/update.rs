//! Path-addressed copy-on-write updates
//!
//! A path lists node ids from the document root down to a target: first the
//! chain of loop ids, then a segment id for segment targets, then an element
//! id for element targets. Updates rebuild the target and its ancestors and
//! share every other subtree with the input document, so the previous
//! document stays valid and unchanged.
//!
//! Paths that do not resolve are not errors. The input is returned as-is
//! (sharing all nodes) and `modifiedDate` is left alone, which keeps stale
//! selections in an editor harmless.

use crate::document::Specification;
use crate::id::NodeId;
use crate::model::{Element, Loop, Segment};
use crate::patch::{MetadataPatch, NodeKind, Patch};
use crate::traversal::{element_at, loop_at, segment_at};
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{debug, trace};

type LoopList = Vec<Arc<Loop>>;

/// Apply `patch` to the node at `path`, returning the next document.
pub fn apply(spec: &Specification, path: &[NodeId], patch: impl Into<Patch>) -> Specification {
    let patch: Patch = patch.into();
    if patch.is_empty() {
        trace!("Skipping empty {} patch", patch.kind());
        return spec.clone();
    }

    let loops = match &patch {
        Patch::Loop(p) => rewrite_loop(&spec.loops, path, &mut |l| changed(l, p.applied(l))),
        Patch::Segment(p) => rewrite_segment(&spec.loops, path, &mut |s| changed(s, p.applied(s))),
        Patch::Element(p) => rewrite_element(&spec.loops, path, &mut |e| changed(e, p.applied(e))),
    };

    commit(spec, loops, path, patch.kind())
}

/// Like [`apply`], failing with [`Error::InvalidPath`] when `path` does not
/// address a node of the patch's kind.
pub fn try_apply(spec: &Specification, path: &[NodeId], patch: impl Into<Patch>) -> Result<Specification> {
    let patch: Patch = patch.into();
    let kind = patch.kind();
    let resolved = match kind {
        NodeKind::Loop => loop_at(spec, path).is_some(),
        NodeKind::Segment => segment_at(spec, path).is_some(),
        NodeKind::Element => element_at(spec, path).is_some(),
    };
    if !resolved {
        return Err(Error::invalid_path(render_path(path), format!("no {kind} at this path")));
    }
    Ok(apply(spec, path, patch))
}

/// Apply a metadata patch. An empty patch leaves the document untouched.
pub fn apply_metadata(spec: &Specification, patch: &MetadataPatch) -> Specification {
    if patch.is_empty() {
        return spec.clone();
    }
    let mut next = spec.clone();
    patch.apply_to(&mut next.metadata);
    next.touched()
}

/// Append `new_loop` under the loop at `parent`, or at top level when `parent` is empty.
pub fn insert_loop(spec: &Specification, parent: &[NodeId], new_loop: Loop) -> Specification {
    let new_loop = Arc::new(new_loop);
    let loops = rewrite_loop_list(&spec.loops, parent, &mut |siblings| {
        let mut next = siblings.to_vec();
        next.push(Arc::clone(&new_loop));
        Some(next)
    });
    commit(spec, loops, parent, NodeKind::Loop)
}

/// Append `segment` to the loop at `loop_path`.
pub fn insert_segment(spec: &Specification, loop_path: &[NodeId], segment: Segment) -> Specification {
    let segment = Arc::new(segment);
    let loops = rewrite_loop(&spec.loops, loop_path, &mut |l| {
        let mut next = l.clone();
        next.segments.push(Arc::clone(&segment));
        Some(next)
    });
    commit(spec, loops, loop_path, NodeKind::Loop)
}

/// Append `element` to the segment at `segment_path`.
pub fn insert_element(spec: &Specification, segment_path: &[NodeId], element: Element) -> Specification {
    let element = Arc::new(element);
    let loops = rewrite_segment(&spec.loops, segment_path, &mut |s| {
        let mut next = s.clone();
        next.elements.push(Arc::clone(&element));
        Some(next)
    });
    commit(spec, loops, segment_path, NodeKind::Segment)
}

/// Remove the node of `kind` at `path` from its parent's child list.
pub fn remove(spec: &Specification, path: &[NodeId], kind: NodeKind) -> Specification {
    let Some((target, parent)) = path.split_last() else {
        return spec.clone();
    };

    let loops = match kind {
        NodeKind::Loop => rewrite_loop_list(&spec.loops, parent, &mut |siblings| {
            without(siblings, |l| &l.id, target)
        }),
        NodeKind::Segment => rewrite_loop(&spec.loops, parent, &mut |l| {
            let segments = without(&l.segments, |s| &s.id, target)?;
            Some(Loop {
                segments,
                ..l.clone()
            })
        }),
        NodeKind::Element => rewrite_segment(&spec.loops, parent, &mut |s| {
            let elements = without(&s.elements, |e| &e.id, target)?;
            Some(Segment {
                elements,
                ..s.clone()
            })
        }),
    };

    commit(spec, loops, path, kind)
}

fn commit(
    spec: &Specification,
    loops: Option<LoopList>,
    path: &[NodeId],
    kind: NodeKind,
) -> Specification {
    match loops {
        Some(loops) => {
            trace!(depth = path.len(), "Updated {kind}");
            Specification {
                loops,
                ..spec.clone()
            }
            .touched()
        }
        None => {
            debug!(path = %render_path(path), "No {kind} at path, document unchanged");
            spec.clone()
        }
    }
}

/// `next`, or `None` when it equals `current` so the document is left untouched.
fn changed<T: PartialEq>(current: &T, next: T) -> Option<T> {
    (next != *current).then_some(next)
}

/// Human-readable form of a path for logs and errors
pub fn render_path(path: &[NodeId]) -> String {
    path.iter()
        .map(NodeId::as_str)
        .collect::<Vec<_>>()
        .join("/")
}

/// Child list of `items` without the entry whose id is `target`, or `None` if absent.
fn without<T>(items: &[Arc<T>], id_of: impl Fn(&T) -> &NodeId, target: &NodeId) -> Option<Vec<Arc<T>>> {
    let idx = items.iter().position(|item| id_of(item) == target)?;
    let mut next = items.to_vec();
    next.remove(idx);
    Some(next)
}

/// Replace the entry whose id is `target` with `edit(entry)`, sharing all siblings.
fn replace_child<T>(
    items: &[Arc<T>],
    id_of: impl Fn(&T) -> &NodeId,
    target: &NodeId,
    edit: &mut dyn FnMut(&T) -> Option<T>,
) -> Option<Vec<Arc<T>>> {
    let idx = items.iter().position(|item| id_of(item) == target)?;
    let replacement = edit(&items[idx])?;
    let mut next = items.to_vec();
    next[idx] = Arc::new(replacement);
    Some(next)
}

/// Descend through the loop ids in `chain` and hand the loop list found there to `edit`.
fn rewrite_loop_list(
    loops: &[Arc<Loop>],
    chain: &[NodeId],
    edit: &mut dyn FnMut(&[Arc<Loop>]) -> Option<LoopList>,
) -> Option<LoopList> {
    let Some((head, rest)) = chain.split_first() else {
        return edit(loops);
    };
    replace_child(loops, |l| &l.id, head, &mut |l| {
        let children = rewrite_loop_list(&l.loops, rest, edit)?;
        Some(Loop {
            loops: children,
            ..l.clone()
        })
    })
}

/// Rebuild the loop at the end of `chain`.
fn rewrite_loop(
    loops: &[Arc<Loop>],
    chain: &[NodeId],
    edit: &mut dyn FnMut(&Loop) -> Option<Loop>,
) -> Option<LoopList> {
    let (target, parents) = chain.split_last()?;
    rewrite_loop_list(loops, parents, &mut |siblings| {
        replace_child(siblings, |l| &l.id, target, edit)
    })
}

/// Rebuild the segment addressed by a loop chain followed by a segment id.
fn rewrite_segment(
    loops: &[Arc<Loop>],
    path: &[NodeId],
    edit: &mut dyn FnMut(&Segment) -> Option<Segment>,
) -> Option<LoopList> {
    let (segment_id, chain) = path.split_last()?;
    rewrite_loop(loops, chain, &mut |l| {
        let segments = replace_child(&l.segments, |s| &s.id, segment_id, edit)?;
        Some(Loop {
            segments,
            ..l.clone()
        })
    })
}

/// Rebuild the element addressed by a loop chain, a segment id and an element id.
fn rewrite_element(
    loops: &[Arc<Loop>],
    path: &[NodeId],
    edit: &mut dyn FnMut(&Element) -> Option<Element>,
) -> Option<LoopList> {
    let (element_id, segment_path) = path.split_last()?;
    rewrite_segment(loops, segment_path, &mut |s| {
        let elements = replace_child(&s.elements, |e| &e.id, element_id, edit)?;
        Some(Segment {
            elements,
            ..s.clone()
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Usage;
    use crate::patch::{ElementPatch, LoopPatch, SegmentPatch};
    use chrono::DateTime;

    struct Fixture {
        spec: Specification,
        outer: NodeId,
        inner: NodeId,
        sibling_loop: NodeId,
        segment: NodeId,
        sibling_segment: NodeId,
        element: NodeId,
        sibling_element: NodeId,
    }

    /// outer
    ///   N1 [N101, N102]
    ///   N3 []
    ///   inner
    ///     PER [PER01]
    /// sibling
    fn fixture() -> Fixture {
        let n101 = Element::new(1, "N101");
        let n102 = Element::new(2, "N102");
        let mut n1 = Segment::new("N1");
        let (element, sibling_element) = (n101.id.clone(), n102.id.clone());
        n1.elements = vec![Arc::new(n101), Arc::new(n102)];
        let n3 = Segment::new("N3");

        let mut per = Segment::new("PER");
        per.elements.push(Arc::new(Element::new(1, "PER01")));
        let mut inner = Loop::new("PER_LOOP");
        inner.segments.push(Arc::new(per));

        let mut outer = Loop::new("N1_LOOP");
        let (segment, sibling_segment) = (n1.id.clone(), n3.id.clone());
        outer.segments = vec![Arc::new(n1), Arc::new(n3)];
        let inner_id = inner.id.clone();
        outer.loops.push(Arc::new(inner));

        let sibling = Loop::new("LX_LOOP");

        let mut spec = Specification::create_empty("810", None, None);
        spec.metadata.modified_date = DateTime::UNIX_EPOCH;
        let (outer_id, sibling_loop) = (outer.id.clone(), sibling.id.clone());
        spec.loops = vec![Arc::new(outer), Arc::new(sibling)];

        Fixture {
            spec,
            outer: outer_id,
            inner: inner_id,
            sibling_loop,
            segment,
            sibling_segment,
            element,
            sibling_element,
        }
    }

    #[test]
    fn test_element_update_shares_siblings() {
        let f = fixture();
        let patch = ElementPatch {
            usage: Some(Usage::Mandatory),
            ..ElementPatch::default()
        };
        let path = [f.outer.clone(), f.segment.clone(), f.element.clone()];
        let next = apply(&f.spec, &path, patch);

        let outer = &next.loops[0];
        let n1 = &outer.segments[0];
        assert_eq!(n1.elements[0].usage, Usage::Mandatory);
        assert_eq!(n1.elements[0].name, "N101");

        assert!(!Arc::ptr_eq(&next.loops[0], &f.spec.loops[0]));
        assert!(Arc::ptr_eq(&next.loops[1], &f.spec.loops[1]));
        assert!(Arc::ptr_eq(&outer.segments[1], &f.spec.loops[0].segments[1]));
        assert!(Arc::ptr_eq(&outer.loops[0], &f.spec.loops[0].loops[0]));
        assert!(Arc::ptr_eq(&n1.elements[1], &f.spec.loops[0].segments[0].elements[1]));
        assert_eq!(n1.elements[1].id, f.sibling_element);

        assert!(next.metadata.modified_date > DateTime::UNIX_EPOCH);
        assert_eq!(next.metadata.created_date, f.spec.metadata.created_date);

        // Previous document is untouched
        assert_eq!(f.spec.loops[0].segments[0].elements[0].usage, Usage::Optional);
    }

    #[test]
    fn test_nested_loop_update() {
        let f = fixture();
        let patch = LoopPatch {
            max_use: Some(99),
            ..LoopPatch::default()
        };
        let next = apply(&f.spec, &[f.outer.clone(), f.inner.clone()], patch);

        assert_eq!(next.loops[0].loops[0].max_use, 99);
        assert_eq!(next.loops[0].max_use, 1);
        assert!(Arc::ptr_eq(&next.loops[0].segments[0], &f.spec.loops[0].segments[0]));
        assert!(Arc::ptr_eq(
            &next.loops[0].loops[0].segments[0],
            &f.spec.loops[0].loops[0].segments[0]
        ));
    }

    #[test]
    fn test_top_level_loop_update() {
        let f = fixture();
        let patch = LoopPatch {
            name: Some("LX".to_string()),
            ..LoopPatch::default()
        };
        let next = apply(&f.spec, &[f.sibling_loop.clone()], patch);
        assert_eq!(next.loops[1].name, "LX");
        assert!(Arc::ptr_eq(&next.loops[0], &f.spec.loops[0]));
    }

    #[test]
    fn test_segment_update() {
        let f = fixture();
        let patch = SegmentPatch {
            min_use: Some(1),
            usage: Some(Usage::Mandatory),
            ..SegmentPatch::default()
        };
        let next = apply(&f.spec, &[f.outer.clone(), f.sibling_segment.clone()], patch);
        let n3 = &next.loops[0].segments[1];
        assert_eq!(n3.usage, Usage::Mandatory);
        assert_eq!(n3.min_use, 1);
        assert!(Arc::ptr_eq(&next.loops[0].segments[0], &f.spec.loops[0].segments[0]));
    }

    #[test]
    fn test_stale_path_is_noop() {
        let f = fixture();
        let patch = ElementPatch {
            name: Some("changed".to_string()),
            ..ElementPatch::default()
        };
        let path = [f.outer.clone(), f.segment.clone(), NodeId::from("missing")];
        let next = apply(&f.spec, &path, patch);

        assert_eq!(next, f.spec);
        assert_eq!(next.metadata.modified_date, DateTime::UNIX_EPOCH);
        assert!(Arc::ptr_eq(&next.loops[0], &f.spec.loops[0]));
    }

    #[test]
    fn test_path_shape_mismatch_is_noop() {
        let f = fixture();
        // A segment id in a loop-chain position does not resolve.
        let patch = LoopPatch {
            max_use: Some(5),
            ..LoopPatch::default()
        };
        let next = apply(&f.spec, &[f.outer.clone(), f.segment.clone()], patch);
        assert_eq!(next, f.spec);

        let next = apply(&f.spec, &[], ElementPatch::codes(Vec::new()));
        assert_eq!(next.metadata.modified_date, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let f = fixture();
        let next = apply(&f.spec, &[f.outer.clone()], LoopPatch::default());
        assert_eq!(next.metadata.modified_date, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_patch_matching_current_values_is_noop() {
        let f = fixture();
        let path = [f.outer.clone(), f.segment.clone(), f.element.clone()];
        let patch = ElementPatch {
            usage: Some(Usage::Optional),
            name: Some("N101".to_string()),
            ..ElementPatch::default()
        };
        let next = apply(&f.spec, &path, patch);
        assert_eq!(next.metadata.modified_date, DateTime::UNIX_EPOCH);
        assert!(Arc::ptr_eq(&next.loops[0], &f.spec.loops[0]));

        let next = apply(
            &f.spec,
            &[f.outer.clone()],
            LoopPatch {
                max_use: Some(1),
                ..LoopPatch::default()
            },
        );
        assert_eq!(next.metadata.modified_date, DateTime::UNIX_EPOCH);
        assert!(Arc::ptr_eq(&next.loops[0], &f.spec.loops[0]));
    }

    #[test]
    fn test_base_snapshot_survives_edit() {
        let mut f = fixture();
        let mut n101 = (*f.spec.loops[0].segments[0].elements[0]).clone();
        n101.base_usage = Some(Usage::Optional);
        let path = [f.outer.clone(), f.segment.clone(), f.element.clone()];
        f.spec = remove(&f.spec, &path, NodeKind::Element);
        f.spec = insert_element(&f.spec, &path[..2], n101);

        let path = [f.outer.clone(), f.segment.clone(), f.element.clone()];
        let next = apply(
            &f.spec,
            &path,
            ElementPatch {
                usage: Some(Usage::Conditional),
                ..ElementPatch::default()
            },
        );
        let element = next.loops[0].segments[0]
            .elements
            .iter()
            .find(|e| e.id == f.element)
            .unwrap();
        assert_eq!(element.usage, Usage::Conditional);
        assert_eq!(element.base_usage, Some(Usage::Optional));
        assert!(element.is_usage_overridden());
    }

    #[test]
    fn test_apply_metadata() {
        let f = fixture();
        let patch = MetadataPatch {
            partner: Some(Some("Acme Corp".to_string())),
            ..MetadataPatch::default()
        };
        let next = apply_metadata(&f.spec, &patch);
        assert_eq!(next.metadata.partner.as_deref(), Some("Acme Corp"));
        assert!(next.metadata.modified_date > DateTime::UNIX_EPOCH);
        assert!(Arc::ptr_eq(&next.loops[0], &f.spec.loops[0]));

        let unchanged = apply_metadata(&f.spec, &MetadataPatch::default());
        assert_eq!(unchanged.metadata.modified_date, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_insert_top_level_and_nested_loop() {
        let f = fixture();
        let next = insert_loop(&f.spec, &[], Loop::new("SE_LOOP"));
        assert_eq!(next.loops.len(), 3);
        assert_eq!(next.loops[2].name, "SE_LOOP");
        assert!(Arc::ptr_eq(&next.loops[0], &f.spec.loops[0]));

        let next = insert_loop(&f.spec, &[f.outer.clone(), f.inner.clone()], Loop::new("DEEP"));
        assert_eq!(next.loops[0].loops[0].loops[0].name, "DEEP");
    }

    #[test]
    fn test_insert_segment_and_element() {
        let f = fixture();
        let next = insert_segment(&f.spec, &[f.sibling_loop.clone()], Segment::new("LX"));
        assert_eq!(next.loops[1].segments.len(), 1);

        let next = insert_element(
            &f.spec,
            &[f.outer.clone(), f.sibling_segment.clone()],
            Element::new(1, "N301"),
        );
        assert_eq!(next.loops[0].segments[1].elements[0].name, "N301");
        assert!(next.metadata.modified_date > DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_insert_under_missing_parent_is_noop() {
        let f = fixture();
        let next = insert_segment(&f.spec, &[NodeId::from("gone")], Segment::new("LX"));
        assert_eq!(next, f.spec);
        assert_eq!(next.metadata.modified_date, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_remove_nodes() {
        let f = fixture();

        let next = remove(&f.spec, &[f.sibling_loop.clone()], NodeKind::Loop);
        assert_eq!(next.loops.len(), 1);

        let next = remove(&f.spec, &[f.outer.clone(), f.inner.clone()], NodeKind::Loop);
        assert!(next.loops[0].loops.is_empty());
        assert_eq!(next.loops[0].segments.len(), 2);

        let next = remove(&f.spec, &[f.outer.clone(), f.segment.clone()], NodeKind::Segment);
        assert_eq!(next.loops[0].segments.len(), 1);
        assert_eq!(next.loops[0].segments[0].name, "N3");

        let path = [f.outer.clone(), f.segment.clone(), f.element.clone()];
        let next = remove(&f.spec, &path, NodeKind::Element);
        assert_eq!(next.loops[0].segments[0].elements.len(), 1);
        assert_eq!(next.loops[0].segments[0].elements[0].id, f.sibling_element);

        let next = remove(&f.spec, &[NodeId::from("missing")], NodeKind::Loop);
        assert_eq!(next.metadata.modified_date, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_deep_nesting() {
        let mut spec = Specification::create_empty("837", None, None);
        let mut chain = Vec::new();
        for depth in 0..64 {
            let new_loop = Loop::new(format!("L{depth}"));
            chain.push(new_loop.id.clone());
            spec = insert_loop(&spec, &chain[..depth], new_loop);
        }
        let patch = LoopPatch {
            usage: Some(Usage::Mandatory),
            ..LoopPatch::default()
        };
        let next = apply(&spec, &chain, patch);

        let mut current = &next.loops[0];
        for _ in 1..64 {
            current = &current.loops[0];
        }
        assert_eq!(current.name, "L63");
        assert_eq!(current.usage, Usage::Mandatory);
    }

    #[test]
    fn test_try_apply_reports_unresolved_path() {
        let f = fixture();
        let patch = SegmentPatch {
            max_use: Some(2),
            ..SegmentPatch::default()
        };
        let next = try_apply(&f.spec, &[f.outer.clone(), f.segment.clone()], patch.clone()).unwrap();
        assert_eq!(next.loops[0].segments[0].max_use, 2);

        let err = try_apply(&f.spec, &[f.outer.clone(), f.inner.clone()], patch).unwrap_err();
        assert!(matches!(err, Error::InvalidPath { .. }));
        assert_eq!(
            err.to_string(),
            format!("Invalid path '{}/{}': no segment at this path", f.outer, f.inner)
        );
    }

    #[test]
    fn test_render_path() {
        let path = [NodeId::from("a"), NodeId::from("b")];
        assert_eq!(render_path(&path), "a/b");
    }
}
