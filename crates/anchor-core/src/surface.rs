//! The rendering collaborator as seen by the hit-tester and exporters.
//!
//! A surface exposes the live hierarchy: a root container, children in
//! document order, a stable id and the *current* bounding rectangle of each
//! unit. Rectangles are queried on every call and never cached here.

use crate::geometry::Rect;
use crate::id::UnitId;
use crate::model::TextDocument;
use petgraph::graph::NodeIndex;

pub trait TextSurface {
    /// Opaque handle to one unit of the hierarchy.
    type Unit: Clone;

    /// The root container, or `None` if nothing is rendered.
    fn root(&self) -> Option<Self::Unit>;

    /// Children of `unit` in document order.
    fn children(&self, unit: &Self::Unit) -> Vec<Self::Unit>;

    /// Current bounding rectangle in document coordinates.
    fn bounds(&self, unit: &Self::Unit) -> Option<Rect>;

    /// Stable identifier of `unit`.
    fn unit_id(&self, unit: &Self::Unit) -> Option<UnitId>;

    /// Text content of `unit` (words only; empty for markup-only tokens).
    fn text(&self, unit: &Self::Unit) -> String;

    /// Identifiers of every word, in document order.
    fn word_ids(&self) -> Vec<UnitId> {
        let Some(root) = self.root() else {
            return Vec::new();
        };
        let mut level = vec![root];
        for _ in 0..WORD_DEPTH {
            level = level.iter().flat_map(|u| self.children(u)).collect();
        }
        level.iter().filter_map(|u| self.unit_id(u)).collect()
    }
}

/// Number of levels between the root container and a word.
pub const WORD_DEPTH: usize = 4;

impl TextSurface for TextDocument {
    type Unit = NodeIndex;

    fn root(&self) -> Option<NodeIndex> {
        Some(self.root)
    }

    fn children(&self, unit: &NodeIndex) -> Vec<NodeIndex> {
        TextDocument::children(self, *unit)
    }

    fn bounds(&self, unit: &NodeIndex) -> Option<Rect> {
        self.graph.node_weight(*unit).and_then(|u| u.bounds)
    }

    fn unit_id(&self, unit: &NodeIndex) -> Option<UnitId> {
        self.graph.node_weight(*unit).map(|u| u.id)
    }

    fn text(&self, unit: &NodeIndex) -> String {
        self.graph
            .node_weight(*unit)
            .map(|u| u.text.clone())
            .unwrap_or_default()
    }
}
