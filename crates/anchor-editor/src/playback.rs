//! Playback collaborator and marker mirroring.
//!
//! Every anchor has exactly one marker on the waveform widget. `MarkerSync`
//! keeps the two in step: store changes are pushed to the widget, and a
//! marker dragged on the widget updates its anchor's time.

use crate::menu::AnchorChange;
use anchor_core::{Anchor, AnchorStore, WordId};
use std::collections::HashMap;

/// Opaque marker reference handed out by the playback widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u32);

/// The audio widget, as seen by the session.
pub trait Playback {
    fn play_pause(&mut self);

    fn current_time_ms(&self) -> u64;

    fn add_marker(&mut self, time_ms: u64, label: &str) -> MarkerHandle;

    fn remove_marker(&mut self, handle: MarkerHandle);
}

#[derive(Debug, Default)]
pub struct MarkerSync {
    by_target: HashMap<WordId, MarkerHandle>,
}

impl MarkerSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_for(&self, target: WordId) -> Option<MarkerHandle> {
        self.by_target.get(&target).copied()
    }

    pub fn len(&self) -> usize {
        self.by_target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_target.is_empty()
    }

    /// Mirror a committed store change onto the widget.
    pub fn apply<P: Playback + ?Sized>(&mut self, change: &AnchorChange, playback: &mut P) {
        match change {
            AnchorChange::Added(anchor) => self.place(anchor, playback),
            AnchorChange::Updated { after, .. } => {
                self.drop_marker(after.target_id, playback);
                self.place(after, playback);
            }
            AnchorChange::Removed(anchor) => self.drop_marker(anchor.target_id, playback),
        }
    }

    /// The widget moved `handle` to `time_ms`. Returns the resulting update,
    /// or `None` for a handle this session does not own.
    pub fn marker_moved(
        &mut self,
        handle: MarkerHandle,
        time_ms: u64,
        store: &mut AnchorStore,
    ) -> Option<AnchorChange> {
        let target = self
            .by_target
            .iter()
            .find_map(|(target, h)| (*h == handle).then_some(*target))?;
        let before = store.get(target)?.clone();
        if before.time_ms == time_ms {
            return None;
        }
        let after = Anchor::new(target, time_ms, before.label.clone());
        store.put(after.clone());
        log::debug!("marker {} moved {target} to {time_ms}ms", handle.0);
        Some(AnchorChange::Updated { before, after })
    }

    /// Remove every marker this session placed.
    pub fn clear<P: Playback + ?Sized>(&mut self, playback: &mut P) {
        for (_, handle) in self.by_target.drain() {
            playback.remove_marker(handle);
        }
    }

    fn place<P: Playback + ?Sized>(&mut self, anchor: &Anchor, playback: &mut P) {
        let handle = playback.add_marker(anchor.time_ms, anchor.display_name());
        if let Some(stale) = self.by_target.insert(anchor.target_id, handle) {
            playback.remove_marker(stale);
        }
    }

    fn drop_marker<P: Playback + ?Sized>(&mut self, target: WordId, playback: &mut P) {
        if let Some(handle) = self.by_target.remove(&target) {
            playback.remove_marker(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// In-memory widget recording its markers.
    #[derive(Debug, Default)]
    struct FakePlayback {
        pub playing: bool,
        pub now_ms: u64,
        pub markers: Vec<(MarkerHandle, u64, String)>,
        next: u32,
    }

    impl Playback for FakePlayback {
        fn play_pause(&mut self) {
            self.playing = !self.playing;
        }

        fn current_time_ms(&self) -> u64 {
            self.now_ms
        }

        fn add_marker(&mut self, time_ms: u64, label: &str) -> MarkerHandle {
            self.next += 1;
            let handle = MarkerHandle(self.next);
            self.markers.push((handle, time_ms, label.to_string()));
            handle
        }

        fn remove_marker(&mut self, handle: MarkerHandle) {
            self.markers.retain(|(h, _, _)| *h != handle);
        }
    }

    fn anchor(id: &str, ms: u64) -> Anchor {
        Anchor::new(WordId::intern(id), ms, "")
    }

    #[test]
    fn add_update_remove_mirror_markers() {
        let mut sync = MarkerSync::new();
        let mut playback = FakePlayback::default();

        sync.apply(&AnchorChange::Added(anchor("p1", 100)), &mut playback);
        assert_eq!(playback.markers.len(), 1);
        assert_eq!(playback.markers[0].2, "p1", "unlabeled markers show the id");

        sync.apply(
            &AnchorChange::Updated {
                before: anchor("p1", 100),
                after: anchor("p1", 250),
            },
            &mut playback,
        );
        assert_eq!(playback.markers.len(), 1);
        assert_eq!(playback.markers[0].1, 250);
        assert_eq!(sync.handle_for(WordId::intern("p1")), Some(playback.markers[0].0));

        sync.apply(&AnchorChange::Removed(anchor("p1", 250)), &mut playback);
        assert!(playback.markers.is_empty());
        assert!(sync.is_empty());
    }

    #[test]
    fn moved_marker_updates_store() {
        let mut sync = MarkerSync::new();
        let mut playback = FakePlayback::default();
        let mut store = AnchorStore::new();
        store.put(anchor("p2", 400));
        sync.apply(&AnchorChange::Added(anchor("p2", 400)), &mut playback);

        let handle = sync.handle_for(WordId::intern("p2")).unwrap();
        let change = sync.marker_moved(handle, 450, &mut store);
        assert_eq!(
            change,
            Some(AnchorChange::Updated {
                before: anchor("p2", 400),
                after: anchor("p2", 450),
            })
        );
        assert_eq!(store.get(WordId::intern("p2")).map(|a| a.time_ms), Some(450));

        assert_eq!(sync.marker_moved(handle, 450, &mut store), None);
        assert_eq!(sync.marker_moved(MarkerHandle(99), 1, &mut store), None);
    }

    #[test]
    fn clear_removes_all_markers() {
        let mut sync = MarkerSync::new();
        let mut playback = FakePlayback::default();
        sync.apply(&AnchorChange::Added(anchor("p3", 1)), &mut playback);
        sync.apply(&AnchorChange::Added(anchor("p4", 2)), &mut playback);
        sync.clear(&mut playback);
        assert!(playback.markers.is_empty());
        assert_eq!(sync.len(), 0);
    }
}
