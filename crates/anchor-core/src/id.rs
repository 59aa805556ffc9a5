use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for text-unit IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier for a page, paragraph, sentence or word.
/// Internally a `Spur` index: 4 bytes, `Copy`, O(1) `Eq` and `Hash`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitId(Spur);

/// Identifier of a Word, the only level anchors can target.
pub type WordId = UnitId;

impl UnitId {
    /// Intern a string as a UnitId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        UnitId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Document position encoded in the identifier: its trailing run of
    /// ASCII digits (`w123` → `123`, `t0b0d0p0s0w12` → `12`).
    ///
    /// Identifiers are required to encode monotonic document position;
    /// `lint_document` checks that contract when a document is ingested.
    /// Returns `None` if the id has no numeric suffix or it overflows.
    pub fn position(&self) -> Option<u64> {
        let s = self.as_str();
        let digits = s.len() - s.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            return None;
        }
        s[s.len() - digits..].parse().ok()
    }

    /// Generate a unique ID with a level prefix (e.g. `_page_1`, `_s_2`).
    /// Used for structural units that carry no `id` attribute in the source.
    pub fn with_prefix(prefix: &str) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("_{prefix}_{n}"))
    }
}

impl fmt::Debug for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for UnitId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UnitId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(UnitId::intern(&s))
    }
}
