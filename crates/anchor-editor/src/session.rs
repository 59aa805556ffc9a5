//! One editing session: the anchor store, the menu, and the playback
//! widget, driven by host events.
//!
//! All handlers are synchronous and run in event order. The playback
//! widget is injected; the session never reaches for globals.

use crate::input::{Modifiers, MouseButton};
use crate::menu::{AnchorChange, DismissReason, MenuAction, MenuConfig, MenuController, MenuError, MenuMode};
use crate::playback::{MarkerHandle, MarkerSync, Playback};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use anchor_core::{Anchor, AnchorStore, PointerEvent, TextSurface, ValidationResult, Viewport};
use std::collections::HashSet;

pub struct Session<P: Playback> {
    store: AnchorStore,
    menu: MenuController,
    markers: MarkerSync,
    playback: P,
    viewport: Viewport,
}

impl<P: Playback> Session<P> {
    pub fn new(playback: P, viewport: Viewport) -> Self {
        Self::with_config(playback, viewport, MenuConfig::default())
    }

    pub fn with_config(playback: P, viewport: Viewport, config: MenuConfig) -> Self {
        Self {
            store: AnchorStore::new(),
            menu: MenuController::new(config),
            markers: MarkerSync::new(),
            playback,
            viewport,
        }
    }

    pub fn store(&self) -> &AnchorStore {
        &self.store
    }

    pub fn menu(&self) -> &MenuController {
        &self.menu
    }

    pub fn markers(&self) -> &MarkerSync {
        &self.markers
    }

    pub fn playback(&self) -> &P {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut P {
        &mut self.playback
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    // ─── Host events ─────────────────────────────────────────────────────

    /// Right-click / long-press. New anchors default to the current
    /// playback position.
    pub fn context_menu<S: TextSurface>(&mut self, surface: &S, event: &PointerEvent) -> MenuMode {
        let now = self.playback.current_time_ms();
        self.menu
            .open(surface, event, &self.store, self.viewport, Some(now))
    }

    pub fn click(&mut self, event: &PointerEvent, button: MouseButton) -> bool {
        self.menu.click(event, button)
    }

    pub fn key(&mut self, key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        let action = ShortcutMap::resolve(key, modifiers)?;
        match action {
            ShortcutAction::CloseMenu => {
                self.menu.dismiss(DismissReason::Escape);
            }
            ShortcutAction::PlayPause => self.playback.play_pause(),
        }
        Some(action)
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.menu.dismiss(DismissReason::Resize);
    }

    /// The host measured its rendered menu.
    pub fn set_menu_size(&mut self, width: f64, height: f64) {
        self.menu.set_size(width, height);
    }

    pub fn set_time(&mut self, time_ms: Option<u64>) {
        self.menu.set_time(time_ms);
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.menu.set_label(label);
    }

    /// Commit a menu action and mirror it onto the playback widget.
    pub fn confirm(&mut self, action: MenuAction) -> Result<AnchorChange, MenuError> {
        let change = self.menu.confirm(action, &mut self.store)?;
        self.markers.apply(&change, &mut self.playback);
        Ok(change)
    }

    /// A marker was dragged on the waveform. Only the store follows; the
    /// widget already shows the marker at its new place and keeps its handle.
    pub fn marker_moved(&mut self, handle: MarkerHandle, time_ms: u64) -> Option<AnchorChange> {
        self.markers.marker_moved(handle, time_ms, &mut self.store)
    }

    /// Advisory chronological check, run before an export.
    pub fn check_order(&self) -> ValidationResult {
        self.store.validate_order()
    }

    /// The export target changed: drop every anchor and marker.
    pub fn reset(&mut self) {
        self.menu.dismiss(DismissReason::Reset);
        self.markers.clear(&mut self.playback);
        self.store.clear();
        log::debug!("session reset");
    }

    /// The host re-rendered the document. Anchors whose word no longer
    /// exists are dropped along with their markers.
    pub fn reload<S: TextSurface>(&mut self, surface: &S) -> Vec<Anchor> {
        let live: HashSet<_> = surface.word_ids().into_iter().collect();
        let dropped = self.store.retain(|a| live.contains(&a.target_id));
        for anchor in &dropped {
            self.markers
                .apply(&AnchorChange::Removed(anchor.clone()), &mut self.playback);
        }
        if !dropped.is_empty() {
            log::debug!("reload dropped {} anchor(s)", dropped.len());
        }
        dropped
    }
}
