//! Markup merge: splice one time marker into the source document per anchor.
//!
//! The document is tokenized losslessly and edited by byte span, so
//! everything outside the inserted markers is reproduced byte for byte.

use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::query::PathQuery;
use anchor_core::xml::{Token, TokenKind, escape_text, tokenize};
use anchor_core::{Anchor, AnchorStore, WordId};
use serde::Serialize;

/// An anchor whose target element was not found in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedTarget {
    pub target: WordId,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub xml: String,
    pub merged: usize,
    pub skipped: Vec<SkippedTarget>,
}

impl MergeReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

struct Splice {
    at: usize,
    /// Bytes of the source replaced by `text` (non-zero only when a
    /// self-closing target is expanded).
    replaced: usize,
    text: String,
}

/// Merge every anchor in `store` into `source`.
///
/// Anchors are visited in document order. A target that cannot be found
/// is logged and reported in `MergeReport::skipped`; the rest still merge.
pub fn merge_anchors(
    source: &str,
    store: &AnchorStore,
    config: &ExportConfig,
) -> Result<MergeReport, ExportError> {
    let tokens = tokenize(source)?;
    let mut splices = Vec::with_capacity(store.len());
    let mut skipped = Vec::new();

    for anchor in store.in_document_order() {
        let query = PathQuery::for_target(config, anchor.target_id);
        match tokens.iter().find(|t| query.matches(&t.kind)) {
            Some(token) => splices.push(splice_for(source, token, anchor, config)),
            None => {
                log::warn!(
                    "no element matches {query}; anchor {} skipped",
                    anchor.target_id
                );
                skipped.push(SkippedTarget {
                    target: anchor.target_id,
                    query: query.to_string(),
                });
            }
        }
    }

    splices.sort_by_key(|s| s.at);
    let merged = splices.len();
    let mut xml = String::with_capacity(source.len() + merged * 32);
    let mut cursor = 0;
    for splice in splices {
        xml.push_str(&source[cursor..splice.at]);
        xml.push_str(&splice.text);
        cursor = splice.at + splice.replaced;
    }
    xml.push_str(&source[cursor..]);

    Ok(MergeReport {
        xml,
        merged,
        skipped,
    })
}

/// The marker element for one anchor, e.g. `<anchor time="1500s"/>`.
pub fn marker_markup(anchor: &Anchor, config: &ExportConfig) -> String {
    format!(
        "<{} {}=\"{}\"/>",
        config.marker_element,
        config.time_attribute,
        escape_text(&config.time_format.format(anchor.time_ms))
    )
}

fn splice_for(source: &str, token: &Token<'_>, anchor: &Anchor, config: &ExportConfig) -> Splice {
    let marker = marker_markup(anchor, config);
    match token.kind {
        TokenKind::StartTag {
            name,
            self_closing: true,
            ..
        } => {
            // `<w id="x"/>` becomes `<w id="x"><anchor …/></w>`.
            let tag = &source[token.span.clone()];
            let open = tag.trim_end_matches('>').trim_end_matches('/').trim_end();
            Splice {
                at: token.span.start,
                replaced: token.span.len(),
                text: format!("{open}>{marker}</{name}>"),
            }
        }
        _ => Splice {
            at: token.span.end,
            replaced: 0,
            text: marker,
        },
    }
}
