//! winit key and cursor translation tables

use winit::event::MouseButton as WinitMouseButton;
use winit::keyboard::{Key as WinitKey, KeyLocation, NamedKey};
use winit::window::CursorIcon;

use crate::keys::{Key, MouseButton, MouseCursor};

/// Translates a winit logical key plus its location into an engine
/// [`Key`]. The location disambiguates the sided modifiers and the
/// numpad; anything the engine has no slot for yields `None`.
#[allow(clippy::too_many_lines)]
pub fn map_key(key: &WinitKey, location: KeyLocation) -> Option<Key> {
    let engine_key = match (key.as_ref(), location) {
        (WinitKey::Named(NamedKey::Tab), _) => Key::Tab,
        (WinitKey::Named(NamedKey::ArrowLeft), _) => Key::LeftArrow,
        (WinitKey::Named(NamedKey::ArrowRight), _) => Key::RightArrow,
        (WinitKey::Named(NamedKey::ArrowUp), _) => Key::UpArrow,
        (WinitKey::Named(NamedKey::ArrowDown), _) => Key::DownArrow,
        (WinitKey::Named(NamedKey::PageUp), _) => Key::PageUp,
        (WinitKey::Named(NamedKey::PageDown), _) => Key::PageDown,
        (WinitKey::Named(NamedKey::Home), _) => Key::Home,
        (WinitKey::Named(NamedKey::End), _) => Key::End,
        (WinitKey::Named(NamedKey::Insert), _) => Key::Insert,
        (WinitKey::Named(NamedKey::Delete), _) => Key::Delete,
        (WinitKey::Named(NamedKey::Backspace), _) => Key::Backspace,
        (WinitKey::Named(NamedKey::Space), _) => Key::Space,
        (WinitKey::Named(NamedKey::Enter), KeyLocation::Numpad) => Key::KeypadEnter,
        (WinitKey::Named(NamedKey::Enter), _) => Key::Enter,
        (WinitKey::Named(NamedKey::Escape), _) => Key::Escape,
        (WinitKey::Named(NamedKey::Control), KeyLocation::Right) => Key::RightCtrl,
        (WinitKey::Named(NamedKey::Control), _) => Key::LeftCtrl,
        (WinitKey::Named(NamedKey::Shift), KeyLocation::Right) => Key::RightShift,
        (WinitKey::Named(NamedKey::Shift), _) => Key::LeftShift,
        (WinitKey::Named(NamedKey::Alt), KeyLocation::Right) => Key::RightAlt,
        (WinitKey::Named(NamedKey::Alt), _) => Key::LeftAlt,
        (WinitKey::Named(NamedKey::Super), KeyLocation::Right) => Key::RightSuper,
        (WinitKey::Named(NamedKey::Super), _) => Key::LeftSuper,
        (WinitKey::Named(NamedKey::ContextMenu), _) => Key::Menu,
        (WinitKey::Named(NamedKey::CapsLock), _) => Key::CapsLock,
        (WinitKey::Named(NamedKey::ScrollLock), _) => Key::ScrollLock,
        (WinitKey::Named(NamedKey::NumLock), _) => Key::NumLock,
        (WinitKey::Named(NamedKey::PrintScreen), _) => Key::PrintScreen,
        (WinitKey::Named(NamedKey::Pause), _) => Key::Pause,
        (WinitKey::Named(NamedKey::F1), _) => Key::F1,
        (WinitKey::Named(NamedKey::F2), _) => Key::F2,
        (WinitKey::Named(NamedKey::F3), _) => Key::F3,
        (WinitKey::Named(NamedKey::F4), _) => Key::F4,
        (WinitKey::Named(NamedKey::F5), _) => Key::F5,
        (WinitKey::Named(NamedKey::F6), _) => Key::F6,
        (WinitKey::Named(NamedKey::F7), _) => Key::F7,
        (WinitKey::Named(NamedKey::F8), _) => Key::F8,
        (WinitKey::Named(NamedKey::F9), _) => Key::F9,
        (WinitKey::Named(NamedKey::F10), _) => Key::F10,
        (WinitKey::Named(NamedKey::F11), _) => Key::F11,
        (WinitKey::Named(NamedKey::F12), _) => Key::F12,
        (WinitKey::Character("0"), KeyLocation::Numpad) => Key::Keypad0,
        (WinitKey::Character("1"), KeyLocation::Numpad) => Key::Keypad1,
        (WinitKey::Character("2"), KeyLocation::Numpad) => Key::Keypad2,
        (WinitKey::Character("3"), KeyLocation::Numpad) => Key::Keypad3,
        (WinitKey::Character("4"), KeyLocation::Numpad) => Key::Keypad4,
        (WinitKey::Character("5"), KeyLocation::Numpad) => Key::Keypad5,
        (WinitKey::Character("6"), KeyLocation::Numpad) => Key::Keypad6,
        (WinitKey::Character("7"), KeyLocation::Numpad) => Key::Keypad7,
        (WinitKey::Character("8"), KeyLocation::Numpad) => Key::Keypad8,
        (WinitKey::Character("9"), KeyLocation::Numpad) => Key::Keypad9,
        (WinitKey::Character("0"), _) => Key::Alpha0,
        (WinitKey::Character("1"), _) => Key::Alpha1,
        (WinitKey::Character("2"), _) => Key::Alpha2,
        (WinitKey::Character("3"), _) => Key::Alpha3,
        (WinitKey::Character("4"), _) => Key::Alpha4,
        (WinitKey::Character("5"), _) => Key::Alpha5,
        (WinitKey::Character("6"), _) => Key::Alpha6,
        (WinitKey::Character("7"), _) => Key::Alpha7,
        (WinitKey::Character("8"), _) => Key::Alpha8,
        (WinitKey::Character("9"), _) => Key::Alpha9,
        (WinitKey::Character("a"), _) => Key::A,
        (WinitKey::Character("b"), _) => Key::B,
        (WinitKey::Character("c"), _) => Key::C,
        (WinitKey::Character("d"), _) => Key::D,
        (WinitKey::Character("e"), _) => Key::E,
        (WinitKey::Character("f"), _) => Key::F,
        (WinitKey::Character("g"), _) => Key::G,
        (WinitKey::Character("h"), _) => Key::H,
        (WinitKey::Character("i"), _) => Key::I,
        (WinitKey::Character("j"), _) => Key::J,
        (WinitKey::Character("k"), _) => Key::K,
        (WinitKey::Character("l"), _) => Key::L,
        (WinitKey::Character("m"), _) => Key::M,
        (WinitKey::Character("n"), _) => Key::N,
        (WinitKey::Character("o"), _) => Key::O,
        (WinitKey::Character("p"), _) => Key::P,
        (WinitKey::Character("q"), _) => Key::Q,
        (WinitKey::Character("r"), _) => Key::R,
        (WinitKey::Character("s"), _) => Key::S,
        (WinitKey::Character("t"), _) => Key::T,
        (WinitKey::Character("u"), _) => Key::U,
        (WinitKey::Character("v"), _) => Key::V,
        (WinitKey::Character("w"), _) => Key::W,
        (WinitKey::Character("x"), _) => Key::X,
        (WinitKey::Character("y"), _) => Key::Y,
        (WinitKey::Character("z"), _) => Key::Z,
        (WinitKey::Character("'"), _) => Key::Apostrophe,
        (WinitKey::Character(","), _) => Key::Comma,
        (WinitKey::Character("-"), KeyLocation::Numpad) => Key::KeypadSubtract,
        (WinitKey::Character("-"), _) => Key::Minus,
        (WinitKey::Character("."), KeyLocation::Numpad) => Key::KeypadDecimal,
        (WinitKey::Character("."), _) => Key::Period,
        (WinitKey::Character("/"), KeyLocation::Numpad) => Key::KeypadDivide,
        (WinitKey::Character("/"), _) => Key::Slash,
        (WinitKey::Character(";"), _) => Key::Semicolon,
        (WinitKey::Character("="), KeyLocation::Numpad) => Key::KeypadEqual,
        (WinitKey::Character("="), _) => Key::Equal,
        (WinitKey::Character("["), _) => Key::LeftBracket,
        (WinitKey::Character("\\"), _) => Key::Backslash,
        (WinitKey::Character("]"), _) => Key::RightBracket,
        (WinitKey::Character("`"), _) => Key::GraveAccent,
        (WinitKey::Character("*"), KeyLocation::Numpad) => Key::KeypadMultiply,
        (WinitKey::Character("+"), KeyLocation::Numpad) => Key::KeypadAdd,
        _ => return None,
    };
    Some(engine_key)
}

/// Translates a winit mouse button; winit's dedicated back/forward
/// buttons land on the two extra slots.
pub fn map_mouse_button(button: WinitMouseButton) -> Option<MouseButton> {
    match button {
        WinitMouseButton::Left | WinitMouseButton::Other(0) => Some(MouseButton::Left),
        WinitMouseButton::Right | WinitMouseButton::Other(1) => Some(MouseButton::Right),
        WinitMouseButton::Middle | WinitMouseButton::Other(2) => Some(MouseButton::Middle),
        WinitMouseButton::Back | WinitMouseButton::Other(3) => Some(MouseButton::Extra1),
        WinitMouseButton::Forward | WinitMouseButton::Other(4) => Some(MouseButton::Extra2),
        WinitMouseButton::Other(_) => None,
    }
}

/// Picks the winit cursor icon for an engine cursor shape.
pub fn cursor_icon(cursor: MouseCursor) -> CursorIcon {
    match cursor {
        MouseCursor::Arrow => CursorIcon::Default,
        MouseCursor::TextInput => CursorIcon::Text,
        MouseCursor::ResizeAll => CursorIcon::Move,
        MouseCursor::ResizeNs => CursorIcon::NsResize,
        MouseCursor::ResizeEw => CursorIcon::EwResize,
        MouseCursor::ResizeNesw => CursorIcon::NeswResize,
        MouseCursor::ResizeNwse => CursorIcon::NwseResize,
        MouseCursor::Hand => CursorIcon::Grab,
        MouseCursor::NotAllowed => CursorIcon::NotAllowed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::SmolStr;

    #[test]
    fn test_named_key_translation() {
        let key = WinitKey::Named(NamedKey::Escape);
        assert_eq!(map_key(&key, KeyLocation::Standard), Some(Key::Escape));
        let key = WinitKey::Named(NamedKey::ArrowLeft);
        assert_eq!(map_key(&key, KeyLocation::Standard), Some(Key::LeftArrow));
    }

    #[test]
    fn test_location_splits_sided_modifiers() {
        let key: WinitKey = WinitKey::Named(NamedKey::Shift);
        assert_eq!(map_key(&key, KeyLocation::Left), Some(Key::LeftShift));
        assert_eq!(map_key(&key, KeyLocation::Right), Some(Key::RightShift));
    }

    #[test]
    fn test_location_splits_numpad_digits() {
        let key = WinitKey::Character(SmolStr::new("7"));
        assert_eq!(map_key(&key, KeyLocation::Standard), Some(Key::Alpha7));
        assert_eq!(map_key(&key, KeyLocation::Numpad), Some(Key::Keypad7));

        let enter = WinitKey::Named(NamedKey::Enter);
        assert_eq!(map_key(&enter, KeyLocation::Numpad), Some(Key::KeypadEnter));
    }

    #[test]
    fn test_unmapped_key_is_unhandled() {
        let key = WinitKey::Character(SmolStr::new("ß"));
        assert_eq!(map_key(&key, KeyLocation::Standard), None);
        let key = WinitKey::Named(NamedKey::MediaPlayPause);
        assert_eq!(map_key(&key, KeyLocation::Standard), None);
    }

    #[test]
    fn test_mouse_button_translation() {
        assert_eq!(map_mouse_button(WinitMouseButton::Left), Some(MouseButton::Left));
        assert_eq!(map_mouse_button(WinitMouseButton::Back), Some(MouseButton::Extra1));
        assert_eq!(map_mouse_button(WinitMouseButton::Other(4)), Some(MouseButton::Extra2));
        assert_eq!(map_mouse_button(WinitMouseButton::Other(9)), None);
    }
}
