//! Text-unit hierarchy: page → paragraph → sentence → word.
//!
//! The document is a tree whose root is the rendering container. Edges go
//! parent → child; the nesting order is fixed, so every word has exactly
//! one page, paragraph and sentence ancestor. Bounding rectangles are
//! supplied by the host's layout and can change at any time.

use crate::geometry::Rect;
use crate::id::UnitId;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

// ─── Levels ──────────────────────────────────────────────────────────────

/// Depth of a unit in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    /// The root container holding every page.
    Container,
    Page,
    Paragraph,
    Sentence,
    Word,
}

impl Level {
    /// The level every child of a unit at `self` must have.
    pub fn child(self) -> Option<Level> {
        match self {
            Level::Container => Some(Level::Page),
            Level::Page => Some(Level::Paragraph),
            Level::Paragraph => Some(Level::Sentence),
            Level::Sentence => Some(Level::Word),
            Level::Word => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Container => "container",
            Level::Page => "page",
            Level::Paragraph => "paragraph",
            Level::Sentence => "sentence",
            Level::Word => "word",
        }
    }
}

// ─── Units ───────────────────────────────────────────────────────────────

/// A single node of the hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextUnit {
    pub id: UnitId,
    pub level: Level,
    /// Text content. Only meaningful for words; may be empty for
    /// markup-only tokens, which are still addressable.
    pub text: String,
    /// Current layout rectangle, if the host has laid this unit out.
    pub bounds: Option<Rect>,
}

impl TextUnit {
    pub fn new(id: UnitId, level: Level) -> Self {
        Self {
            id,
            level,
            text: String::new(),
            bounds: None,
        }
    }

    pub fn word(id: UnitId, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::new(id, Level::Word)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("a {child} cannot be placed inside a {parent}")]
    InvalidNesting { parent: &'static str, child: &'static str },

    #[error("duplicate identifier `{0}`")]
    DuplicateId(UnitId),

    #[error("unknown identifier `{0}`")]
    UnknownId(UnitId),
}

// ─── Document ────────────────────────────────────────────────────────────

/// The complete four-level text document.
#[derive(Debug, Clone)]
pub struct TextDocument {
    /// The underlying tree.
    pub graph: StableDiGraph<TextUnit, ()>,

    /// The container node index.
    pub root: NodeIndex,

    /// Index from UnitId → NodeIndex for fast lookup.
    pub id_index: HashMap<UnitId, NodeIndex>,
}

impl TextDocument {
    /// Create an empty document with only the root container.
    #[must_use]
    pub fn new() -> Self {
        Self::with_root_id(UnitId::intern("text-container"))
    }

    /// Create an empty document whose container carries `id`.
    #[must_use]
    pub fn with_root_id(id: UnitId) -> Self {
        let mut graph = StableDiGraph::new();
        let root = graph.add_node(TextUnit::new(id, Level::Container));

        let mut id_index = HashMap::new();
        id_index.insert(id, root);

        Self {
            graph,
            root,
            id_index,
        }
    }

    /// Add `unit` as the last child of `parent`.
    ///
    /// The unit's level must be exactly one below its parent's and its id
    /// must be unused.
    pub fn add_unit(&mut self, parent: NodeIndex, unit: TextUnit) -> Result<NodeIndex, ModelError> {
        let parent_level = self.graph[parent].level;
        if parent_level.child() != Some(unit.level) {
            return Err(ModelError::InvalidNesting {
                parent: parent_level.as_str(),
                child: unit.level.as_str(),
            });
        }
        if self.id_index.contains_key(&unit.id) {
            return Err(ModelError::DuplicateId(unit.id));
        }
        let id = unit.id;
        let idx = self.graph.add_node(unit);
        self.graph.add_edge(parent, idx, ());
        self.id_index.insert(id, idx);
        Ok(idx)
    }

    /// Look up a unit by its id.
    pub fn get_by_id(&self, id: UnitId) -> Option<&TextUnit> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    /// Get the index for a UnitId.
    pub fn index_of(&self, id: UnitId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    /// Get the parent index of a unit.
    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .next()
    }

    /// Get children of a unit in document (insertion) order.
    ///
    /// Sorts by `NodeIndex` so the result is deterministic regardless of
    /// how `petgraph` iterates its adjacency list.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .collect();
        children.sort();
        children
    }

    /// All words in document order.
    pub fn words(&self) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        self.collect_words(self.root, &mut out);
        out
    }

    fn collect_words(&self, idx: NodeIndex, out: &mut Vec<NodeIndex>) {
        if self.graph[idx].level == Level::Word {
            out.push(idx);
            return;
        }
        for child in self.children(idx) {
            self.collect_words(child, out);
        }
    }

    /// Record the host's current layout rectangle for a unit.
    pub fn set_bounds(&mut self, id: UnitId, bounds: Rect) -> Result<(), ModelError> {
        let idx = self.index_of(id).ok_or(ModelError::UnknownId(id))?;
        self.graph[idx].bounds = Some(bounds);
        Ok(())
    }

    /// Forget every layout rectangle (e.g. before a re-layout pass).
    pub fn clear_bounds(&mut self) {
        for idx in self.graph.node_indices().collect::<Vec<_>>() {
            self.graph[idx].bounds = None;
        }
    }
}

impl Default for TextDocument {
    fn default() -> Self {
        Self::new()
    }
}
