//! Input abstraction layer.
//!
//! Normalizes the DOM's mouse-button numbering and keyboard modifiers so
//! the menu and shortcut code never see raw event fields.

/// Which mouse button triggered a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Primary,
    Auxiliary,
    Secondary,
    Other(i16),
}

impl MouseButton {
    /// From `MouseEvent.button` (0 = primary, 1 = auxiliary, 2 = secondary).
    pub fn from_button(button: i16) -> Self {
        match button {
            0 => Self::Primary,
            1 => Self::Auxiliary,
            2 => Self::Secondary,
            n => Self::Other(n),
        }
    }

    /// From the legacy `MouseEvent.which` (1 = left, 2 = middle, 3 = right).
    pub fn from_which(which: u32) -> Self {
        match which {
            1 => Self::Primary,
            2 => Self::Auxiliary,
            3 => Self::Secondary,
            n => i16::try_from(n).map_or(Self::Other(i16::MAX), Self::Other),
        }
    }
}

/// Modifier key state for keyboard events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_numbering() {
        assert_eq!(MouseButton::from_button(0), MouseButton::Primary);
        assert_eq!(MouseButton::from_button(2), MouseButton::Secondary);
        assert_eq!(MouseButton::from_which(1), MouseButton::Primary);
        assert_eq!(MouseButton::from_which(3), MouseButton::Secondary);
        assert_eq!(MouseButton::from_button(4), MouseButton::Other(4));
    }

    #[test]
    fn oversized_which_saturates() {
        assert_eq!(MouseButton::from_which(5), MouseButton::Other(5));
        assert_eq!(MouseButton::from_which(70_000), MouseButton::Other(i16::MAX));
        assert_eq!(MouseButton::from_which(u32::MAX), MouseButton::Other(i16::MAX));
    }
}
