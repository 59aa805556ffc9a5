//! Structured snapshot of the live hierarchy.
//!
//! Serialized as nested arrays, page → paragraph → sentence → word:
//!
//! ```json
//! [[[[{"text":"foo","anchorMs":0},{"text":"bar","anchorMs":300}]]]]
//! ```
//!
//! A level whose children would all be empty is left out entirely.

use crate::error::ExportError;
use anchor_core::xml::escape_text;
use anchor_core::{AnchorStore, TextSurface};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordEntry {
    /// Markup-escaped word text.
    pub text: String,
    /// Anchor time, or `0` for an unanchored word.
    pub anchor_ms: u64,
}

pub type SentenceEntry = Vec<WordEntry>;
pub type ParagraphEntry = Vec<SentenceEntry>;
pub type PageEntry = Vec<ParagraphEntry>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    pub pages: Vec<PageEntry>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn word_count(&self) -> usize {
        self.pages.iter().flatten().flatten().map(Vec::len).sum()
    }
}

/// Walk `surface` top-down and pair every word with its anchor time.
pub fn snapshot<S: TextSurface>(surface: &S, store: &AnchorStore) -> Snapshot {
    let Some(root) = surface.root() else {
        return Snapshot::default();
    };

    let word = |unit: &S::Unit| -> Option<WordEntry> {
        let id = surface.unit_id(unit)?;
        Some(WordEntry {
            text: escape_text(&surface.text(unit)).into_owned(),
            anchor_ms: store.get(id).map_or(0, |a| a.time_ms),
        })
    };

    let pages = surface
        .children(&root)
        .iter()
        .map(|page| {
            surface
                .children(page)
                .iter()
                .map(|para| {
                    surface
                        .children(para)
                        .iter()
                        .map(|sentence| {
                            surface
                                .children(sentence)
                                .iter()
                                .filter_map(&word)
                                .collect::<SentenceEntry>()
                        })
                        .filter(|s| !s.is_empty())
                        .collect::<ParagraphEntry>()
                })
                .filter(|p| !p.is_empty())
                .collect::<PageEntry>()
        })
        .filter(|p| !p.is_empty())
        .collect();

    Snapshot { pages }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_core::{Anchor, Level, NodeIndex, TextDocument, TextUnit, UnitId};
    use pretty_assertions::assert_eq;

    fn unit(doc: &mut TextDocument, parent: NodeIndex, id: &str, level: Level) -> NodeIndex {
        doc.add_unit(parent, TextUnit::new(UnitId::intern(id), level))
            .unwrap()
    }

    #[test]
    fn single_sentence() {
        let mut doc = TextDocument::new();
        let root = doc.root;
        let page = unit(&mut doc, root, "sn_pg", Level::Page);
        let para = unit(&mut doc, page, "sn_p", Level::Paragraph);
        let sent = unit(&mut doc, para, "sn_s", Level::Sentence);
        doc.add_unit(sent, TextUnit::word(UnitId::intern("sn_1"), "foo"))
            .unwrap();
        doc.add_unit(sent, TextUnit::word(UnitId::intern("sn_2"), "bar"))
            .unwrap();

        let mut store = AnchorStore::new();
        store.put(Anchor::new(UnitId::intern("sn_2"), 300, ""));

        let json = snapshot(&doc, &store).to_json().unwrap();
        assert_eq!(
            json,
            r#"[[[[{"text":"foo","anchorMs":0},{"text":"bar","anchorMs":300}]]]]"#
        );
    }

    #[test]
    fn empty_levels_are_omitted() {
        let mut doc = TextDocument::new();
        let root = doc.root;
        let page = unit(&mut doc, root, "se_pg", Level::Page);
        let para = unit(&mut doc, page, "se_p", Level::Paragraph);
        unit(&mut doc, para, "se_empty", Level::Sentence);
        let sent = unit(&mut doc, para, "se_s", Level::Sentence);
        doc.add_unit(sent, TextUnit::word(UnitId::intern("se_1"), "a<b"))
            .unwrap();
        unit(&mut doc, page, "se_p2", Level::Paragraph);
        unit(&mut doc, root, "se_pg2", Level::Page);

        let snap = snapshot(&doc, &AnchorStore::new());
        assert_eq!(
            snap.pages,
            vec![vec![vec![vec![WordEntry {
                text: "a&lt;b".into(),
                anchor_ms: 0
            }]]]]
        );
        assert_eq!(snap.word_count(), 1);
    }

    #[test]
    fn empty_document() {
        let snap = snapshot(&TextDocument::new(), &AnchorStore::new());
        assert_eq!(snap.to_json().unwrap(), "[]");
    }
}
