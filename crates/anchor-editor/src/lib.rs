pub mod hit;
pub mod input;
pub mod menu;
pub mod playback;
pub mod session;
pub mod shortcuts;

pub use hit::{locate, locate_point};
pub use input::{Modifiers, MouseButton};
pub use menu::{
    AnchorChange, DismissReason, MenuAction, MenuConfig, MenuController, MenuError, MenuFields,
    MenuMode, MenuState,
};
pub use playback::{MarkerHandle, MarkerSync, Playback};
pub use session::Session;
pub use shortcuts::{ShortcutAction, ShortcutMap};
