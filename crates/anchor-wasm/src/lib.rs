//! WASM bridge for Audio Anchor: exposes the session to the editor page.
//!
//! Compiled via `wasm-pack build --target web`. Every call that can fail
//! returns a JSON string, `{"ok":true,…}` or `{"ok":false,"error":"…"}`.

mod dom;
mod playback;

pub use dom::{DomConfig, DomNode, DomSurface};
pub use playback::{AudioWidget, JsPlayback};

use anchor_core::{AnchorStore, LintSeverity, Viewport, lint_document, parse_document};
use anchor_editor::{
    AnchorChange, MarkerHandle, MenuAction, MenuController, MenuError, MenuMode, Modifiers,
    MouseButton, Session,
};
use anchor_export::{ExportConfig, merge_anchors, snapshot};
use serde_json::{Value, json};
use std::fmt::Display;
use wasm_bindgen::prelude::*;

/// One anchoring session bound to a text container and an audio widget.
#[wasm_bindgen]
pub struct AnchorSession {
    session: Session<JsPlayback>,
    dom: DomConfig,
    export: ExportConfig,
}

#[wasm_bindgen]
impl AnchorSession {
    /// `width`/`height` are the viewport size.
    #[wasm_bindgen(constructor)]
    pub fn new(widget: AudioWidget, width: f64, height: f64) -> Self {
        console_error_panic_hook_setup();

        Self {
            session: Session::new(JsPlayback::new(widget), Viewport { width, height }),
            dom: DomConfig::default(),
            export: ExportConfig::default(),
        }
    }

    /// Replace the container and level selectors from a JSON object;
    /// missing keys keep their defaults. Returns `true` on success.
    pub fn set_dom_config(&mut self, config: &str) -> bool {
        match serde_json::from_str::<DomConfig>(config) {
            Ok(config) => {
                self.dom = config;
                true
            }
            Err(e) => {
                log::warn!("ignoring DOM config: {e}");
                false
            }
        }
    }

    /// The rendered menu's `offsetWidth` and `offsetHeight`, used to keep
    /// it inside the viewport.
    pub fn set_menu_size(&mut self, width: f64, height: f64) {
        self.session.set_menu_size(width, height);
    }

    // ─── Menu ────────────────────────────────────────────────────────────

    /// Right-click or long-press. Returns the menu state as JSON; `mode`
    /// is `"closed"` when nothing was under the pointer.
    pub fn handle_context_menu(&mut self, event: &web_sys::Event) -> String {
        let surface = DomSurface::resolve(&self.dom);
        self.session
            .context_menu(&surface, &dom::pointer_event(event));
        menu_json(self.session.menu()).to_string()
    }

    /// Returns `true` if the click closed the menu.
    pub fn handle_click(&mut self, event: &web_sys::MouseEvent) -> bool {
        let button = MouseButton::from_button(event.button());
        self.session.click(&dom::pointer_event(event.as_ref()), button)
    }

    /// Handle a keyboard event. Returns the action name, or `"none"`.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> String {
        let modifiers = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        self.session
            .key(key, modifiers)
            .map_or("none", |a| a.as_str())
            .to_string()
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.session.resize(Viewport { width, height });
    }

    /// Set the pending time (ms). `undefined` clears it.
    pub fn set_time(&mut self, time_ms: Option<f64>) {
        self.session.set_time(time_ms.map(playback::ms_from_js));
    }

    pub fn set_label(&mut self, label: &str) {
        self.session.set_label(label);
    }

    pub fn menu_state(&self) -> String {
        menu_json(self.session.menu()).to_string()
    }

    /// Apply a menu action (`add-anchor`, `update-anchor`, `del-anchor`, …).
    ///
    /// On success the result carries the change and, if the new anchor
    /// breaks chronological order, a `warning` for the operator.
    pub fn confirm(&mut self, action: &str) -> String {
        let result = action
            .parse::<MenuAction>()
            .and_then(|action| self.session.confirm(action));
        confirm_json(result, self.session.store())
    }

    // ─── Playback ────────────────────────────────────────────────────────

    /// The widget reported a dragged marker. Returns `true` if an anchor moved.
    pub fn marker_moved(&mut self, handle: u32, time_ms: f64) -> bool {
        self.session
            .marker_moved(MarkerHandle(handle), playback::ms_from_js(time_ms))
            .is_some()
    }

    // ─── Store ───────────────────────────────────────────────────────────

    /// `{"ok":true}` or `{"ok":false,"error":"<message naming both anchors>"}`.
    pub fn check_order(&self) -> String {
        match self.session.check_order().message() {
            None => json!({ "ok": true }).to_string(),
            Some(message) => error_json(message),
        }
    }

    /// Re-read the container after the host re-rendered it. Returns how
    /// many anchors were dropped because their word disappeared.
    pub fn reload(&mut self) -> u32 {
        let surface = DomSurface::resolve(&self.dom);
        self.session.reload(&surface).len() as u32
    }

    /// Forget every anchor and marker (export target changed).
    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// All anchors in document order, as a JSON array.
    pub fn anchors_json(&self) -> String {
        anchors_json(self.session.store())
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// Replace the export naming from a JSON object; missing keys keep
    /// their defaults. Returns `true` on success.
    pub fn set_export_config(&mut self, config: &str) -> bool {
        match serde_json::from_str::<ExportConfig>(config) {
            Ok(config) => {
                self.export = config;
                true
            }
            Err(e) => {
                log::warn!("ignoring export config: {e}");
                false
            }
        }
    }

    /// Merge all anchors into a freshly fetched source document.
    /// Returns `{"ok":true,"xml":"…","skipped":[…]}`.
    pub fn merge_document(&self, source: &str) -> String {
        merge_json(source, self.session.store(), &self.export)
    }

    /// Nested page/paragraph/sentence/word JSON of the live container.
    pub fn snapshot_json(&self) -> String {
        let surface = DomSurface::resolve(&self.dom);
        match snapshot(&surface, self.session.store()).to_json() {
            Ok(json) => json,
            Err(e) => error_json(e),
        }
    }
}

// ─── JSON helpers ────────────────────────────────────────────────────────

fn error_json(error: impl Display) -> String {
    json!({ "ok": false, "error": error.to_string() }).to_string()
}

fn mode_name(mode: MenuMode) -> &'static str {
    match mode {
        MenuMode::Closed => "closed",
        MenuMode::OpenForCreate => "create",
        MenuMode::OpenForUpdate => "update",
    }
}

fn menu_json(menu: &MenuController) -> Value {
    let state = menu.state();
    let actions: Vec<&str> = menu.available_actions().iter().map(|a| a.as_str()).collect();
    json!({
        "mode": mode_name(state.mode),
        "target": state.target.map(|t| t.as_str().to_string()),
        "x": state.position.x,
        "y": state.position.y,
        "timeMs": state.fields.time_ms,
        "delay": state.fields.delay_display(),
        "label": state.fields.label,
        "actions": actions,
    })
}

fn change_json(change: &AnchorChange) -> Value {
    match change {
        AnchorChange::Added(anchor) => json!({ "kind": "added", "anchor": anchor }),
        AnchorChange::Updated { before, after } => {
            json!({ "kind": "updated", "before": before, "anchor": after })
        }
        AnchorChange::Removed(anchor) => json!({ "kind": "removed", "anchor": anchor }),
    }
}

/// The store is read after the change, so `warning` reflects it.
fn confirm_json(result: Result<AnchorChange, MenuError>, store: &AnchorStore) -> String {
    match result {
        Ok(change) => json!({
            "ok": true,
            "change": change_json(&change),
            "warning": store.validate_order().message(),
        })
        .to_string(),
        Err(e) => error_json(e),
    }
}

fn merge_json(source: &str, store: &AnchorStore, config: &ExportConfig) -> String {
    match merge_anchors(source, store, config) {
        Ok(report) => json!({
            "ok": true,
            "xml": report.xml,
            "merged": report.merged,
            "skipped": report.skipped,
        })
        .to_string(),
        Err(e) => error_json(e),
    }
}

fn anchors_json(store: &AnchorStore) -> String {
    serde_json::to_string(&store.in_document_order()).unwrap_or_else(|_| "[]".to_string())
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Audio Anchor WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone functions (no session needed) ────────────────────────────

/// Check that a source document can be anchored. Returns
/// `{"ok":true,"words":n,"diagnostics":[…]}` or `{"ok":false,"error":"…"}`.
#[wasm_bindgen]
pub fn validate(source: &str) -> String {
    match parse_document(source) {
        Ok(doc) => {
            let diagnostics: Vec<Value> = lint_document(&doc)
                .into_iter()
                .map(|d| {
                    json!({
                        "id": d.unit_id.as_str(),
                        "rule": d.rule,
                        "message": d.message,
                        "severity": match d.severity {
                            LintSeverity::Warning => "warning",
                            LintSeverity::Info => "info",
                        },
                    })
                })
                .collect();
            json!({
                "ok": true,
                "words": doc.words().len(),
                "diagnostics": diagnostics,
            })
            .to_string()
        }
        Err(e) => error_json(e),
    }
}
