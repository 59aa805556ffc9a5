//! Source XML → `TextDocument`.
//!
//! Walks the token stream from `xml::tokenize` and builds the four-level
//! hierarchy. Which elements count as pages, paragraphs, sentences and
//! words is decided by a `DocumentSchema`; everything else (headers,
//! inline markup inside words, existing anchors) is skipped, but text
//! nested inside a word still contributes to that word's content.

use crate::id::UnitId;
use crate::model::{Level, TextDocument, TextUnit};
use crate::xml::{ParseError, TokenKind, tokenize, unescape};
use petgraph::graph::NodeIndex;
use smallvec::{SmallVec, smallvec};

// ─── Schema ──────────────────────────────────────────────────────────────

/// Matches one element shape, e.g. `div[type=page]` or plain `w`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementMatch {
    pub name: String,
    /// Required `(attribute, value)` pair, if any.
    pub attribute: Option<(String, String)>,
}

impl ElementMatch {
    pub fn element(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attribute: None,
        }
    }

    pub fn with_attribute(name: &str, attr: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            attribute: Some((attr.to_string(), value.to_string())),
        }
    }

    fn matches(&self, kind: &TokenKind<'_>) -> bool {
        let TokenKind::StartTag { name, .. } = kind else {
            return false;
        };
        if *name != self.name {
            return false;
        }
        match &self.attribute {
            None => true,
            Some((attr, value)) => kind
                .attribute(attr)
                .is_some_and(|a| a.value() == value.as_str()),
        }
    }
}

/// Element names for each level of the hierarchy.
#[derive(Debug, Clone)]
pub struct DocumentSchema {
    pub page: SmallVec<[ElementMatch; 2]>,
    pub paragraph: SmallVec<[ElementMatch; 2]>,
    pub sentence: SmallVec<[ElementMatch; 2]>,
    pub word: SmallVec<[ElementMatch; 2]>,
    /// Attributes tried in order when reading a unit's identifier.
    pub id_attributes: SmallVec<[String; 2]>,
}

impl Default for DocumentSchema {
    fn default() -> Self {
        Self {
            page: smallvec![
                ElementMatch::with_attribute("div", "type", "page"),
                ElementMatch::element("page"),
            ],
            paragraph: smallvec![ElementMatch::element("p")],
            sentence: smallvec![ElementMatch::element("s")],
            word: smallvec![ElementMatch::element("w")],
            id_attributes: smallvec!["id".to_string(), "xml:id".to_string()],
        }
    }
}

impl DocumentSchema {
    fn level_of(&self, kind: &TokenKind<'_>) -> Option<Level> {
        let any = |set: &[ElementMatch]| set.iter().any(|m| m.matches(kind));
        if any(&self.word[..]) {
            Some(Level::Word)
        } else if any(&self.sentence[..]) {
            Some(Level::Sentence)
        } else if any(&self.paragraph[..]) {
            Some(Level::Paragraph)
        } else if any(&self.page[..]) {
            Some(Level::Page)
        } else {
            None
        }
    }

    fn id_of(&self, kind: &TokenKind<'_>) -> Option<UnitId> {
        self.id_attributes
            .iter()
            .find_map(|attr| kind.attribute(attr))
            .map(|a| UnitId::intern(&a.value()))
    }
}

// ─── Parsing ─────────────────────────────────────────────────────────────

/// Parse a source document with the default schema.
#[must_use = "parsing result should be used"]
pub fn parse_document(input: &str) -> Result<TextDocument, ParseError> {
    parse_document_with(input, &DocumentSchema::default())
}

/// Parse a source document, classifying elements with `schema`.
pub fn parse_document_with(
    input: &str,
    schema: &DocumentSchema,
) -> Result<TextDocument, ParseError> {
    let tokens = tokenize(input)?;
    let mut doc = TextDocument::new();

    // One entry per open element: the unit it opened, if any.
    let mut stack: Vec<Option<NodeIndex>> = Vec::new();
    // The word currently collecting text.
    let mut word: Option<(NodeIndex, String)> = None;

    for token in &tokens {
        match &token.kind {
            TokenKind::StartTag { self_closing, .. } => {
                let kind = &token.kind;
                let opened = match schema.level_of(kind) {
                    Some(level) => {
                        let parent = stack.iter().rev().find_map(|u| *u).unwrap_or(doc.root);
                        let id = match (schema.id_of(kind), level) {
                            (Some(id), _) => id,
                            (None, Level::Word) => {
                                return Err(ParseError::MissingWordId {
                                    offset: token.span.start,
                                });
                            }
                            (None, _) => UnitId::with_prefix(level.as_str()),
                        };
                        let idx = doc.add_unit(parent, TextUnit::new(id, level))?;
                        if level == Level::Word && !*self_closing {
                            word = Some((idx, String::new()));
                        }
                        Some(idx)
                    }
                    None => None,
                };
                if !*self_closing {
                    stack.push(opened);
                }
            }
            TokenKind::EndTag { .. } => {
                if let Some(Some(idx)) = stack.pop()
                    && word.as_ref().is_some_and(|(w, _)| *w == idx)
                    && let Some((_, text)) = word.take()
                {
                    doc.graph[idx].text = text;
                }
            }
            TokenKind::Text(raw) => {
                if let Some((_, text)) = word.as_mut() {
                    text.push_str(&unescape(raw));
                }
            }
            TokenKind::CData(raw) => {
                if let Some((_, text)) = word.as_mut() {
                    text.push_str(raw);
                }
            }
            _ => {}
        }
    }

    log::debug!(
        "parsed document: {} units, {} words",
        doc.graph.node_count() - 1,
        doc.words().len()
    );
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelError;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<TEI>
  <text>
    <body>
      <div type="page">
        <p>
          <s><w id="p_w1">Hello</w> <w id="p_w2">big &amp; bold</w></s>
          <s><w id="p_w3"><anchor time="1s"/>again</w><w id="p_w4"/></s>
        </p>
      </div>
    </body>
  </text>
</TEI>"#;

    #[test]
    fn parses_hierarchy() {
        let doc = parse_document(SAMPLE).expect("parse failed");
        let pages = doc.children(doc.root);
        assert_eq!(pages.len(), 1);
        let paras = doc.children(pages[0]);
        assert_eq!(paras.len(), 1);
        let sentences = doc.children(paras[0]);
        assert_eq!(sentences.len(), 2);
        assert_eq!(doc.children(sentences[0]).len(), 2);
        assert_eq!(doc.children(sentences[1]).len(), 2);
    }

    #[test]
    fn word_text_is_unescaped_and_includes_nested_text() {
        let doc = parse_document(SAMPLE).expect("parse failed");
        let text = |id: &str| doc.get_by_id(UnitId::intern(id)).unwrap().text.clone();
        assert_eq!(text("p_w1"), "Hello");
        assert_eq!(text("p_w2"), "big & bold");
        assert_eq!(text("p_w3"), "again");
        assert_eq!(text("p_w4"), "");
    }

    #[test]
    fn structural_units_get_generated_ids() {
        let doc = parse_document(SAMPLE).expect("parse failed");
        let page = doc.children(doc.root)[0];
        assert!(doc.graph[page].id.as_str().starts_with("_page_"));
    }

    #[test]
    fn word_without_id_is_rejected() {
        let src = r#"<div type="page"><p><s><w>nope</w></s></p></div>"#;
        assert!(matches!(
            parse_document(src),
            Err(ParseError::MissingWordId { .. })
        ));
    }

    #[test]
    fn word_outside_sentence_is_rejected() {
        let src = r#"<div type="page"><p><w id="p_bad">x</w></p></div>"#;
        assert_eq!(
            parse_document(src).unwrap_err(),
            ParseError::Model(ModelError::InvalidNesting {
                parent: "paragraph",
                child: "word"
            })
        );
    }

    #[test]
    fn xml_id_is_accepted() {
        let src = r#"<page><p><s><w xml:id="p_x1">hi</w></s></p></page>"#;
        let doc = parse_document(src).expect("parse failed");
        assert!(doc.get_by_id(UnitId::intern("p_x1")).is_some());
    }
}
