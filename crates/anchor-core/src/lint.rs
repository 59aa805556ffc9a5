//! Lint diagnostics for ingested documents.
//!
//! Anchor validation sorts by the number at the end of each word id, so
//! that number must grow with document position. These rules check the
//! contract once, when a document is loaded, instead of trusting it.

use crate::id::UnitId;
use crate::model::TextDocument;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Ordering checks will be unreliable for this word.
    Warning,
    /// Informational.
    Info,
}

/// A single lint diagnostic for a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintDiagnostic {
    pub unit_id: UnitId,
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "missing-position").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the document and return diagnostics.
#[must_use]
pub fn lint_document(doc: &TextDocument) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_word_positions(doc, &mut diags);
    diags
}

// ─── Rules ────────────────────────────────────────────────────────────────

/// Every word id needs a numeric suffix, and suffixes must strictly
/// increase in document order.
fn lint_word_positions(doc: &TextDocument, diags: &mut Vec<LintDiagnostic>) {
    let mut previous: Option<(UnitId, u64)> = None;

    for idx in doc.words() {
        let id = doc.graph[idx].id;
        let Some(pos) = id.position() else {
            diags.push(LintDiagnostic {
                unit_id: id,
                message: format!("Word `{id}` has no numeric suffix; its anchor cannot be ordered."),
                severity: LintSeverity::Warning,
                rule: "missing-position",
            });
            continue;
        };

        if let Some((prev_id, prev_pos)) = previous
            && pos <= prev_pos
        {
            diags.push(LintDiagnostic {
                unit_id: id,
                message: format!(
                    "Word `{id}` (position {pos}) follows `{prev_id}` (position {prev_pos}); \
                     positions must increase through the document."
                ),
                severity: LintSeverity::Warning,
                rule: "non-monotonic-position",
            });
        }
        previous = Some((id, pos));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;

    #[test]
    fn clean_document_has_no_diagnostics() {
        let doc = parse_document(
            r#"<page><p><s><w id="l_w1">a</w><w id="l_w2">b</w></s><s><w id="l_w10">c</w></s></p></page>"#,
        )
        .unwrap();
        assert!(lint_document(&doc).is_empty());
    }

    #[test]
    fn flags_missing_suffix() {
        let doc = parse_document(r#"<page><p><s><w id="l_word">a</w></s></p></page>"#).unwrap();
        let diags = lint_document(&doc);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule, "missing-position");
    }

    #[test]
    fn flags_restarting_suffix() {
        // Per-sentence numbering restarts at 0 and breaks ordering.
        let doc = parse_document(
            r#"<page><p><s><w id="l_s0w0">a</w><w id="l_s0w1">b</w></s><s><w id="l_s1w0">c</w></s></p></page>"#,
        )
        .unwrap();
        let diags = lint_document(&doc);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule, "non-monotonic-position");
        assert_eq!(diags[0].unit_id, UnitId::intern("l_s1w0"));
    }
}
