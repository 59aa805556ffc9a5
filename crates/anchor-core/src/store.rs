//! Anchor store and chronological-order validator.
//!
//! Anchors are keyed by their target word, so a second `put` for the same
//! word replaces the first. Each entry also remembers when its target was
//! first anchored; that sequence number breaks ties when two anchors share
//! a document position during validation.

use crate::id::WordId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A binding of one word to an offset on the audio timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
    pub target_id: WordId,
    /// Non-negative offset into the audio, in milliseconds.
    pub time_ms: u64,
    #[serde(default)]
    pub label: String,
}

impl Anchor {
    pub fn new(target_id: WordId, time_ms: u64, label: impl Into<String>) -> Self {
        Self {
            target_id,
            time_ms,
            label: label.into(),
        }
    }

    /// Name shown to the operator: the label, or the target id if unlabeled.
    pub fn display_name(&self) -> &str {
        if self.label.is_empty() {
            self.target_id.as_str()
        } else {
            &self.label
        }
    }
}

/// Outcome of `AnchorStore::validate_order`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Ok,
    /// `offending` comes later in the document than `previous` but has a
    /// strictly smaller time.
    OutOfOrder { offending: Anchor, previous: Anchor },
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, ValidationResult::Ok)
    }

    /// Operator-facing warning, if there is anything to warn about.
    pub fn message(&self) -> Option<String> {
        match self {
            ValidationResult::Ok => None,
            ValidationResult::OutOfOrder {
                offending,
                previous,
            } => Some(format!(
                "{} is earlier than the previous {}",
                offending.display_name(),
                previous.display_name()
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    seq: u64,
    anchor: Anchor,
}

/// All live anchors of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorStore {
    entries: HashMap<WordId, Entry>,
    next_seq: u64,
}

impl AnchorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the anchor for `anchor.target_id`.
    /// Returns the anchor it replaced, if any.
    pub fn put(&mut self, anchor: Anchor) -> Option<Anchor> {
        log::debug!("put anchor {} @ {}ms", anchor.target_id, anchor.time_ms);
        match self.entries.get_mut(&anchor.target_id) {
            Some(entry) => Some(std::mem::replace(&mut entry.anchor, anchor)),
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.entries.insert(anchor.target_id, Entry { seq, anchor });
                None
            }
        }
    }

    /// Remove the anchor for `target`. Removing an absent anchor is a no-op.
    pub fn remove(&mut self, target: WordId) -> Option<Anchor> {
        let removed = self.entries.remove(&target).map(|e| e.anchor);
        if removed.is_some() {
            log::debug!("removed anchor {target}");
        }
        removed
    }

    pub fn get(&self, target: WordId) -> Option<&Anchor> {
        self.entries.get(&target).map(|e| &e.anchor)
    }

    /// Whether `target` currently has an anchor.
    pub fn contains(&self, target: WordId) -> bool {
        self.entries.contains_key(&target)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every anchor (export target changed).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Keep only anchors for which `keep` returns true; returns the rest.
    pub fn retain(&mut self, mut keep: impl FnMut(&Anchor) -> bool) -> Vec<Anchor> {
        let dropped: Vec<WordId> = self
            .entries
            .values()
            .filter(|e| !keep(&e.anchor))
            .map(|e| e.anchor.target_id)
            .collect();
        dropped.into_iter().filter_map(|id| self.remove(id)).collect()
    }

    /// Anchors in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Anchor> {
        self.entries.values().map(|e| &e.anchor)
    }

    /// Snapshot sorted by the document position encoded in each target id,
    /// ties broken by first-insertion order. Ids without a numeric suffix
    /// sort after every positioned id.
    pub fn in_document_order(&self) -> Vec<&Anchor> {
        let mut entries: Vec<&Entry> = self.entries.values().collect();
        entries.sort_by_key(|e| {
            let pos = e.anchor.target_id.position();
            (pos.is_none(), pos.unwrap_or(0), e.seq)
        });
        entries.into_iter().map(|e| &e.anchor).collect()
    }

    /// Report the first anchor whose time goes backwards relative to the
    /// anchor before it in document order.
    pub fn validate_order(&self) -> ValidationResult {
        let sorted = self.in_document_order();
        for pair in sorted.windows(2) {
            let (previous, current) = (pair[0], pair[1]);
            if current.time_ms < previous.time_ms {
                return ValidationResult::OutOfOrder {
                    offending: current.clone(),
                    previous: previous.clone(),
                };
            }
        }
        ValidationResult::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn anchor(id: &str, ms: u64) -> Anchor {
        Anchor::new(WordId::intern(id), ms, id)
    }

    fn store_of(anchors: &[(&str, u64)]) -> AnchorStore {
        let mut store = AnchorStore::new();
        for (id, ms) in anchors {
            store.put(anchor(id, *ms));
        }
        store
    }

    #[test]
    fn put_then_get() {
        let mut store = AnchorStore::new();
        store.put(anchor("w1", 100));
        assert_eq!(store.get(WordId::intern("w1")), Some(&anchor("w1", 100)));
    }

    #[test]
    fn put_is_idempotent() {
        let mut once = AnchorStore::new();
        once.put(anchor("w1", 100));
        let mut twice = AnchorStore::new();
        twice.put(anchor("w1", 100));
        twice.put(anchor("w1", 100));
        assert_eq!(once, twice);
        assert_eq!(twice.len(), 1);
    }

    #[test]
    fn put_replaces_existing() {
        let mut store = AnchorStore::new();
        store.put(anchor("w1", 100));
        let prev = store.put(Anchor::new(WordId::intern("w1"), 250, "moved"));
        assert_eq!(prev, Some(anchor("w1", 100)));
        assert_eq!(store.get(WordId::intern("w1")).unwrap().time_ms, 250);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut store = store_of(&[("w1", 100)]);
        let before = store.clone();
        assert_eq!(store.remove(WordId::intern("w99")), None);
        assert_eq!(store, before);
    }

    #[test]
    fn validate_reports_first_regression() {
        let store = store_of(&[("w3", 200), ("w1", 100), ("w2", 50)]);
        assert_eq!(
            store.validate_order(),
            ValidationResult::OutOfOrder {
                offending: anchor("w2", 50),
                previous: anchor("w1", 100),
            }
        );
    }

    #[test]
    fn validate_accepts_monotonic_times() {
        let store = store_of(&[("w1", 100), ("w2", 150), ("w3", 200)]);
        assert!(store.validate_order().is_ok());
    }

    #[test]
    fn validate_allows_equal_times() {
        let store = store_of(&[("w1", 100), ("w2", 100)]);
        assert_eq!(store.validate_order(), ValidationResult::Ok);
    }

    #[test]
    fn validate_sorts_numerically_not_lexically() {
        // Lexical order would put w10 before w9.
        let store = store_of(&[("w9", 100), ("w10", 200)]);
        assert!(store.validate_order().is_ok());
    }

    #[test]
    fn empty_and_single_are_ok() {
        assert!(AnchorStore::new().validate_order().is_ok());
        assert!(store_of(&[("w5", 0)]).validate_order().is_ok());
    }

    #[test]
    fn message_names_both_anchors() {
        let result = store_of(&[("w1", 100), ("w2", 50)]).validate_order();
        assert_eq!(
            result.message().as_deref(),
            Some("w2 is earlier than the previous w1")
        );
    }

    #[test]
    fn retain_returns_dropped() {
        let mut store = store_of(&[("w1", 1), ("w2", 2), ("w3", 3)]);
        let dropped = store.retain(|a| a.time_ms != 2);
        assert_eq!(dropped, vec![anchor("w2", 2)]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn anchor_serializes_camel_case() {
        let json = serde_json::to_string(&anchor("w7", 1500)).unwrap();
        assert_eq!(json, r#"{"targetId":"w7","timeMs":1500,"label":"w7"}"#);
    }

    #[test]
    fn missing_label_defaults_to_empty() {
        let anchor: Anchor = serde_json::from_str(r#"{"targetId":"w9","timeMs":40}"#).unwrap();
        assert_eq!(anchor, Anchor::new(WordId::intern("w9"), 40, ""));
        assert_eq!(anchor.display_name(), "w9");
    }
}
