//! Keyboard shortcut mapping.
//!
//! Maps `KeyboardEvent.key` values plus modifiers to semantic actions.
//! The map lives in Rust so the WASM bridge and native hosts share it.

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Close the context menu, discarding pending edits.
    CloseMenu,
    /// Toggle audio playback.
    PlayPause,
}

impl ShortcutAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ShortcutAction::CloseMenu => "close-menu",
            ShortcutAction::PlayPause => "play-pause",
        }
    }
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action, or `None` if unbound.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        match key {
            // Escape closes regardless of modifiers.
            "Escape" | "Esc" => Some(ShortcutAction::CloseMenu),
            " " | "Spacebar" if !modifiers.any() => Some(ShortcutAction::PlayPause),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_closes() {
        assert_eq!(
            ShortcutMap::resolve("Escape", Modifiers::NONE),
            Some(ShortcutAction::CloseMenu)
        );
        let shifted = Modifiers {
            shift: true,
            ..Modifiers::NONE
        };
        assert_eq!(
            ShortcutMap::resolve("Escape", shifted),
            Some(ShortcutAction::CloseMenu)
        );
    }

    #[test]
    fn space_toggles_playback_without_modifiers() {
        assert_eq!(
            ShortcutMap::resolve(" ", Modifiers::NONE),
            Some(ShortcutAction::PlayPause)
        );
        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        };
        assert_eq!(ShortcutMap::resolve(" ", ctrl), None);
    }

    #[test]
    fn unbound_keys() {
        assert_eq!(ShortcutMap::resolve("a", Modifiers::NONE), None);
        assert_eq!(ShortcutMap::resolve("Enter", Modifiers::NONE), None);
    }
}
