//! Context-menu state machine.
//!
//! ```text
//! Closed --context-menu on a word--> OpenForCreate | OpenForUpdate
//! Closed --context-menu on nothing--> Closed
//! Open*  --confirm (valid)--> Closed
//! Open*  --escape | resize | outside click--> Closed
//! ```
//!
//! Every trigger first forces `Closed`, so there is never more than one
//! menu. Pending field edits live only in `MenuState` and are dropped on
//! close. The store is mutated only by `confirm`.

use crate::hit;
use crate::input::MouseButton;
use anchor_core::{
    Anchor, AnchorStore, Point, PointerEvent, Rect, TextSurface, Viewport, WordId, contains_point,
    pointer_position,
};
use std::fmt;
use std::str::FromStr;

// ─── Configuration ───────────────────────────────────────────────────────

/// Menu geometry and field defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuConfig {
    /// Rendered menu width in CSS pixels.
    pub width: f64,
    /// Rendered menu height in CSS pixels.
    pub height: f64,
    /// Gap kept between the menu and a viewport edge it was pushed against.
    pub edge_margin: f64,
    /// Pre-fill the label of a new anchor with the word's text.
    pub default_label_from_text: bool,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            width: 160.0,
            height: 96.0,
            edge_margin: 4.0,
            default_label_from_text: true,
        }
    }
}

// ─── State ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MenuMode {
    #[default]
    Closed,
    OpenForCreate,
    OpenForUpdate,
}

impl MenuMode {
    pub fn is_open(self) -> bool {
        self != MenuMode::Closed
    }
}

/// Editable fields shown in the open menu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuFields {
    pub time_ms: Option<u64>,
    pub label: String,
}

impl MenuFields {
    /// Text for the delay slider, e.g. `1500ms`.
    pub fn delay_display(&self) -> Option<String> {
        self.time_ms.map(format_delay)
    }
}

pub fn format_delay(ms: u64) -> String {
    format!("{ms}ms")
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuState {
    pub mode: MenuMode,
    pub target: Option<WordId>,
    /// Top-left corner in viewport coordinates, already clamped.
    pub position: Point,
    pub fields: MenuFields,
}

/// User-facing menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Add,
    Update,
    Remove,
}

impl MenuAction {
    pub fn as_str(self) -> &'static str {
        match self {
            MenuAction::Add => "add",
            MenuAction::Update => "update",
            MenuAction::Remove => "remove",
        }
    }
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MenuAction {
    type Err = MenuError;

    /// Accepts the short names and the menu item keys (`add-anchor`, …).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" | "add-anchor" => Ok(MenuAction::Add),
            "update" | "update-anchor" => Ok(MenuAction::Update),
            "remove" | "delete" | "del-anchor" => Ok(MenuAction::Remove),
            other => Err(MenuError::UnknownAction(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    Escape,
    Resize,
    OutsideClick,
    Reset,
}

/// A committed store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorChange {
    Added(Anchor),
    Updated { before: Anchor, after: Anchor },
    Removed(Anchor),
}

impl AnchorChange {
    pub fn target(&self) -> WordId {
        match self {
            AnchorChange::Added(a) | AnchorChange::Removed(a) => a.target_id,
            AnchorChange::Updated { after, .. } => after.target_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MenuError {
    #[error("the anchor menu is not open")]
    NotOpen,
    #[error("`{action}` is not available while the menu is {mode:?}")]
    ActionUnavailable { action: MenuAction, mode: MenuMode },
    #[error("enter a time before adding an anchor")]
    MissingTime,
    #[error("the anchor already has this time and label")]
    Unchanged,
    #[error("{0} has no anchor")]
    NotAnchored(WordId),
    #[error("unknown menu action `{0}`")]
    UnknownAction(String),
}

// ─── Controller ──────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MenuController {
    config: MenuConfig,
    state: MenuState,
}

impl MenuController {
    pub fn new(config: MenuConfig) -> Self {
        Self {
            config,
            state: MenuState::default(),
        }
    }

    pub fn state(&self) -> &MenuState {
        &self.state
    }

    pub fn mode(&self) -> MenuMode {
        self.state.mode
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// Record the rendered menu size; the next `open` clamps with it.
    /// Non-finite or negative sizes are ignored.
    pub fn set_size(&mut self, width: f64, height: f64) {
        if width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0 {
            self.config.width = width;
            self.config.height = height;
        } else {
            log::warn!("ignoring menu size {width}x{height}");
        }
    }

    /// Handle a context-menu event. `default_time_ms` pre-fills the time of
    /// a new anchor (normally the current playback position).
    pub fn open<S: TextSurface>(
        &mut self,
        surface: &S,
        event: &PointerEvent,
        store: &AnchorStore,
        viewport: Viewport,
        default_time_ms: Option<u64>,
    ) -> MenuMode {
        self.close();

        let point = pointer_position(event);
        let Some(unit) = hit::locate_unit(surface, point) else {
            return MenuMode::Closed;
        };
        let Some(target) = surface.unit_id(&unit) else {
            return MenuMode::Closed;
        };

        let (mode, fields) = match store.get(target) {
            Some(anchor) => (
                MenuMode::OpenForUpdate,
                MenuFields {
                    time_ms: Some(anchor.time_ms),
                    label: anchor.label.clone(),
                },
            ),
            None => {
                let label = if self.config.default_label_from_text {
                    surface.text(&unit)
                } else {
                    String::new()
                };
                (
                    MenuMode::OpenForCreate,
                    MenuFields {
                        time_ms: default_time_ms,
                        label,
                    },
                )
            }
        };

        let screen = Point::new(point.x - event.scroll.x, point.y - event.scroll.y);
        self.state = MenuState {
            mode,
            target: Some(target),
            position: self.clamp(screen, viewport),
            fields,
        };
        log::debug!("menu {mode:?} for {target}");
        mode
    }

    /// Push the menu back inside the viewport when it would overflow the
    /// right or bottom edge.
    fn clamp(&self, at: Point, viewport: Viewport) -> Point {
        let span_x = self.config.width + self.config.edge_margin;
        let span_y = self.config.height + self.config.edge_margin;
        let x = if viewport.width - at.x < span_x {
            viewport.width - span_x
        } else {
            at.x
        };
        let y = if viewport.height - at.y < span_y {
            viewport.height - span_y
        } else {
            at.y
        };
        Point::new(x.max(0.0), y.max(0.0))
    }

    /// The menu's rectangle in viewport coordinates, if open.
    pub fn bounds(&self) -> Option<Rect> {
        self.state.mode.is_open().then(|| {
            Rect::from_xywh(
                self.state.position.x,
                self.state.position.y,
                self.config.width,
                self.config.height,
            )
        })
    }

    pub fn set_time(&mut self, time_ms: Option<u64>) {
        if self.state.mode.is_open() {
            self.state.fields.time_ms = time_ms;
        }
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        if self.state.mode.is_open() {
            self.state.fields.label = label.into();
        }
    }

    pub fn available_actions(&self) -> &'static [MenuAction] {
        match self.state.mode {
            MenuMode::Closed => &[],
            MenuMode::OpenForCreate => &[MenuAction::Add],
            MenuMode::OpenForUpdate => &[MenuAction::Update, MenuAction::Remove],
        }
    }

    /// Apply `action` to the store and close the menu.
    ///
    /// On error the menu stays open with its fields intact and the store
    /// is untouched.
    pub fn confirm(
        &mut self,
        action: MenuAction,
        store: &mut AnchorStore,
    ) -> Result<AnchorChange, MenuError> {
        let mode = self.state.mode;
        let target = match (mode, self.state.target) {
            (MenuMode::Closed, _) | (_, None) => return Err(MenuError::NotOpen),
            (_, Some(target)) => target,
        };
        if !self.available_actions().contains(&action) {
            return Err(MenuError::ActionUnavailable { action, mode });
        }

        let fields = &self.state.fields;
        let change = match action {
            MenuAction::Add => {
                let time_ms = fields.time_ms.ok_or(MenuError::MissingTime)?;
                let anchor = Anchor::new(target, time_ms, fields.label.clone());
                store.put(anchor.clone());
                AnchorChange::Added(anchor)
            }
            MenuAction::Update => {
                let time_ms = fields.time_ms.ok_or(MenuError::MissingTime)?;
                let before = store
                    .get(target)
                    .cloned()
                    .ok_or(MenuError::NotAnchored(target))?;
                if before.time_ms == time_ms && before.label == fields.label {
                    return Err(MenuError::Unchanged);
                }
                let after = Anchor::new(target, time_ms, fields.label.clone());
                store.put(after.clone());
                AnchorChange::Updated { before, after }
            }
            MenuAction::Remove => {
                let removed = store.remove(target).ok_or(MenuError::NotAnchored(target))?;
                AnchorChange::Removed(removed)
            }
        };

        log::debug!("menu {action} on {target}");
        self.close();
        Ok(change)
    }

    /// Close the menu, discarding pending edits. Returns whether it was open.
    pub fn dismiss(&mut self, reason: DismissReason) -> bool {
        let was_open = self.state.mode.is_open();
        if was_open {
            log::debug!("menu dismissed: {reason:?}");
        }
        self.close();
        was_open
    }

    /// A click anywhere on the page. A primary click outside the open menu
    /// closes it.
    pub fn click(&mut self, event: &PointerEvent, button: MouseButton) -> bool {
        let Some(bounds) = self.bounds() else {
            return false;
        };
        if button != MouseButton::Primary {
            return false;
        }
        let point = pointer_position(event);
        let screen = Point::new(point.x - event.scroll.x, point.y - event.scroll.y);
        if contains_point(&bounds, screen) {
            return false;
        }
        self.dismiss(DismissReason::OutsideClick)
    }

    fn close(&mut self) {
        self.state = MenuState::default();
    }
}
