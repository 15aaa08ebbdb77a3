//! Visitors, lookups and statistics over the loop forest

use crate::document::Specification;
use crate::id::NodeId;
use crate::model::{Element, Loop, Segment};
use crate::patch::NodeKind;
use crate::{Error, Result};
use serde::Serialize;
use std::sync::Arc;

/// Trait for visiting every node of a specification.
///
/// `path` is the full id path of the visited node, usable with the updater.
pub trait Visitor {
    fn visit_loop(&mut self, _node: &Loop, _path: &[NodeId]) {}

    fn visit_segment(&mut self, _segment: &Segment, _path: &[NodeId]) {}

    fn visit_element(&mut self, _element: &Element, _path: &[NodeId]) {}

    /// Returns true if traversal should continue
    fn should_continue(&self) -> bool {
        true
    }
}

/// Walk the document in order: each loop, then its segments and elements,
/// then its nested loops.
pub fn walk<V: Visitor>(spec: &Specification, visitor: &mut V) {
    walk_loops(&spec.loops, visitor, &mut Vec::new());
}

fn walk_loops<V: Visitor>(loops: &[Arc<Loop>], visitor: &mut V, path: &mut Vec<NodeId>) {
    for node in loops {
        if !visitor.should_continue() {
            return;
        }
        path.push(node.id.clone());
        visitor.visit_loop(node, path);

        for segment in &node.segments {
            path.push(segment.id.clone());
            visitor.visit_segment(segment, path);
            for element in &segment.elements {
                path.push(element.id.clone());
                visitor.visit_element(element, path);
                path.pop();
            }
            path.pop();
        }

        walk_loops(&node.loops, visitor, path);
        path.pop();
    }
}

/// Node counts of a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub loops: usize,
    pub segments: usize,
    pub elements: usize,
    pub examples: usize,
}

impl Visitor for Statistics {
    fn visit_loop(&mut self, _node: &Loop, _path: &[NodeId]) {
        self.loops += 1;
    }

    fn visit_segment(&mut self, _segment: &Segment, _path: &[NodeId]) {
        self.segments += 1;
    }

    fn visit_element(&mut self, _element: &Element, _path: &[NodeId]) {
        self.elements += 1;
    }
}

impl Statistics {
    /// Count every loop, segment and element at any depth, plus examples
    #[must_use]
    pub fn of(spec: &Specification) -> Self {
        let mut stats = Self {
            examples: spec.examples.len(),
            ..Self::default()
        };
        walk(spec, &mut stats);
        stats
    }
}

/// Where a node lives in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub kind: NodeKind,
    /// Full path from the root, ready for the updater
    pub path: Vec<NodeId>,
}

impl Located {
    /// Loop ids leading to the node (the node itself for loops)
    #[must_use]
    pub fn loop_chain(&self) -> &[NodeId] {
        &self.path[..self.path.len() - self.kind.tail_len()]
    }
}

struct Locator<'q> {
    kind: NodeKind,
    id: &'q NodeId,
    found: Option<Vec<NodeId>>,
}

impl Locator<'_> {
    fn check(&mut self, kind: NodeKind, id: &NodeId, path: &[NodeId]) {
        if self.found.is_none() && kind == self.kind && id == self.id {
            self.found = Some(path.to_vec());
        }
    }
}

impl Visitor for Locator<'_> {
    fn visit_loop(&mut self, node: &Loop, path: &[NodeId]) {
        self.check(NodeKind::Loop, &node.id, path);
    }

    fn visit_segment(&mut self, segment: &Segment, path: &[NodeId]) {
        self.check(NodeKind::Segment, &segment.id, path);
    }

    fn visit_element(&mut self, element: &Element, path: &[NodeId]) {
        self.check(NodeKind::Element, &element.id, path);
    }

    fn should_continue(&self) -> bool {
        self.found.is_none()
    }
}

/// Find a node by kind and id anywhere in the document
#[must_use]
pub fn locate(spec: &Specification, kind: NodeKind, id: &NodeId) -> Option<Located> {
    let mut locator = Locator {
        kind,
        id,
        found: None,
    };
    walk(spec, &mut locator);
    locator.found.map(|path| Located { kind, path })
}

/// Like [`locate`], failing with [`Error::NodeNotFound`]
pub fn require(spec: &Specification, kind: NodeKind, id: &NodeId) -> Result<Located> {
    locate(spec, kind, id).ok_or_else(|| Error::node_not_found(kind, id.as_str()))
}

/// Resolve a loop chain
#[must_use]
pub fn loop_at<'a>(spec: &'a Specification, chain: &[NodeId]) -> Option<&'a Loop> {
    let (first, rest) = chain.split_first()?;
    let mut current = spec.loops.iter().find(|l| &l.id == first)?;
    for id in rest {
        current = current.loops.iter().find(|l| &l.id == id)?;
    }
    Some(current.as_ref())
}

/// Resolve a loop chain followed by a segment id
#[must_use]
pub fn segment_at<'a>(spec: &'a Specification, path: &[NodeId]) -> Option<&'a Segment> {
    let (segment_id, chain) = path.split_last()?;
    loop_at(spec, chain)?
        .segments
        .iter()
        .find(|s| &s.id == segment_id)
        .map(Arc::as_ref)
}

/// Resolve a loop chain followed by segment and element ids
#[must_use]
pub fn element_at<'a>(spec: &'a Specification, path: &[NodeId]) -> Option<&'a Element> {
    let (element_id, segment_path) = path.split_last()?;
    segment_at(spec, segment_path)?
        .elements
        .iter()
        .find(|e| &e.id == element_id)
        .map(Arc::as_ref)
}
