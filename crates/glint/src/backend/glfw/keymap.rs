//! GLFW code translation tables
//!
//! All translation works on the raw C constants so the callback
//! trampolines and the polled-event path share one table.

use glfw::ffi;
use std::os::raw::c_int;

use crate::keys::{Key, MouseButton, MouseCursor};

/// Translates a raw GLFW key code into an engine [`Key`].
///
/// Returns `None` for `GLFW_KEY_UNKNOWN` and any code outside the
/// recognized set, which callers surface as an unhandled event.
#[allow(clippy::too_many_lines)]
pub fn map_key_code(code: c_int) -> Option<Key> {
    let key = match code {
        ffi::KEY_TAB => Key::Tab,
        ffi::KEY_LEFT => Key::LeftArrow,
        ffi::KEY_RIGHT => Key::RightArrow,
        ffi::KEY_UP => Key::UpArrow,
        ffi::KEY_DOWN => Key::DownArrow,
        ffi::KEY_PAGE_UP => Key::PageUp,
        ffi::KEY_PAGE_DOWN => Key::PageDown,
        ffi::KEY_HOME => Key::Home,
        ffi::KEY_END => Key::End,
        ffi::KEY_INSERT => Key::Insert,
        ffi::KEY_DELETE => Key::Delete,
        ffi::KEY_BACKSPACE => Key::Backspace,
        ffi::KEY_SPACE => Key::Space,
        ffi::KEY_ENTER => Key::Enter,
        ffi::KEY_ESCAPE => Key::Escape,
        ffi::KEY_APOSTROPHE => Key::Apostrophe,
        ffi::KEY_COMMA => Key::Comma,
        ffi::KEY_MINUS => Key::Minus,
        ffi::KEY_PERIOD => Key::Period,
        ffi::KEY_SLASH => Key::Slash,
        ffi::KEY_SEMICOLON => Key::Semicolon,
        ffi::KEY_EQUAL => Key::Equal,
        ffi::KEY_LEFT_BRACKET => Key::LeftBracket,
        ffi::KEY_BACKSLASH => Key::Backslash,
        ffi::KEY_RIGHT_BRACKET => Key::RightBracket,
        ffi::KEY_GRAVE_ACCENT => Key::GraveAccent,
        ffi::KEY_CAPS_LOCK => Key::CapsLock,
        ffi::KEY_SCROLL_LOCK => Key::ScrollLock,
        ffi::KEY_NUM_LOCK => Key::NumLock,
        ffi::KEY_PRINT_SCREEN => Key::PrintScreen,
        ffi::KEY_PAUSE => Key::Pause,
        ffi::KEY_KP_0 => Key::Keypad0,
        ffi::KEY_KP_1 => Key::Keypad1,
        ffi::KEY_KP_2 => Key::Keypad2,
        ffi::KEY_KP_3 => Key::Keypad3,
        ffi::KEY_KP_4 => Key::Keypad4,
        ffi::KEY_KP_5 => Key::Keypad5,
        ffi::KEY_KP_6 => Key::Keypad6,
        ffi::KEY_KP_7 => Key::Keypad7,
        ffi::KEY_KP_8 => Key::Keypad8,
        ffi::KEY_KP_9 => Key::Keypad9,
        ffi::KEY_KP_DECIMAL => Key::KeypadDecimal,
        ffi::KEY_KP_DIVIDE => Key::KeypadDivide,
        ffi::KEY_KP_MULTIPLY => Key::KeypadMultiply,
        ffi::KEY_KP_SUBTRACT => Key::KeypadSubtract,
        ffi::KEY_KP_ADD => Key::KeypadAdd,
        ffi::KEY_KP_ENTER => Key::KeypadEnter,
        ffi::KEY_KP_EQUAL => Key::KeypadEqual,
        ffi::KEY_LEFT_SHIFT => Key::LeftShift,
        ffi::KEY_LEFT_CONTROL => Key::LeftCtrl,
        ffi::KEY_LEFT_ALT => Key::LeftAlt,
        ffi::KEY_LEFT_SUPER => Key::LeftSuper,
        ffi::KEY_RIGHT_SHIFT => Key::RightShift,
        ffi::KEY_RIGHT_CONTROL => Key::RightCtrl,
        ffi::KEY_RIGHT_ALT => Key::RightAlt,
        ffi::KEY_RIGHT_SUPER => Key::RightSuper,
        ffi::KEY_MENU => Key::Menu,
        ffi::KEY_0 => Key::Alpha0,
        ffi::KEY_1 => Key::Alpha1,
        ffi::KEY_2 => Key::Alpha2,
        ffi::KEY_3 => Key::Alpha3,
        ffi::KEY_4 => Key::Alpha4,
        ffi::KEY_5 => Key::Alpha5,
        ffi::KEY_6 => Key::Alpha6,
        ffi::KEY_7 => Key::Alpha7,
        ffi::KEY_8 => Key::Alpha8,
        ffi::KEY_9 => Key::Alpha9,
        ffi::KEY_A => Key::A,
        ffi::KEY_B => Key::B,
        ffi::KEY_C => Key::C,
        ffi::KEY_D => Key::D,
        ffi::KEY_E => Key::E,
        ffi::KEY_F => Key::F,
        ffi::KEY_G => Key::G,
        ffi::KEY_H => Key::H,
        ffi::KEY_I => Key::I,
        ffi::KEY_J => Key::J,
        ffi::KEY_K => Key::K,
        ffi::KEY_L => Key::L,
        ffi::KEY_M => Key::M,
        ffi::KEY_N => Key::N,
        ffi::KEY_O => Key::O,
        ffi::KEY_P => Key::P,
        ffi::KEY_Q => Key::Q,
        ffi::KEY_R => Key::R,
        ffi::KEY_S => Key::S,
        ffi::KEY_T => Key::T,
        ffi::KEY_U => Key::U,
        ffi::KEY_V => Key::V,
        ffi::KEY_W => Key::W,
        ffi::KEY_X => Key::X,
        ffi::KEY_Y => Key::Y,
        ffi::KEY_Z => Key::Z,
        ffi::KEY_F1 => Key::F1,
        ffi::KEY_F2 => Key::F2,
        ffi::KEY_F3 => Key::F3,
        ffi::KEY_F4 => Key::F4,
        ffi::KEY_F5 => Key::F5,
        ffi::KEY_F6 => Key::F6,
        ffi::KEY_F7 => Key::F7,
        ffi::KEY_F8 => Key::F8,
        ffi::KEY_F9 => Key::F9,
        ffi::KEY_F10 => Key::F10,
        ffi::KEY_F11 => Key::F11,
        ffi::KEY_F12 => Key::F12,
        _ => return None,
    };
    Some(key)
}

/// Translates a GLFW mouse button index. GLFW exposes eight buttons;
/// the engine tracks five, the rest are unhandled.
pub fn map_mouse_button(button: c_int) -> Option<MouseButton> {
    match button {
        ffi::MOUSE_BUTTON_LEFT => Some(MouseButton::Left),
        ffi::MOUSE_BUTTON_RIGHT => Some(MouseButton::Right),
        ffi::MOUSE_BUTTON_MIDDLE => Some(MouseButton::Middle),
        3 => Some(MouseButton::Extra1),
        4 => Some(MouseButton::Extra2),
        _ => None,
    }
}

/// Picks the GLFW standard cursor shape for an engine cursor.
///
/// GLFW 3.3 only ships six standard shapes; the resize-all and diagonal
/// shapes fall back to the closest available one.
pub fn cursor_shape_code(cursor: MouseCursor) -> c_int {
    match cursor {
        MouseCursor::Arrow | MouseCursor::ResizeAll | MouseCursor::NotAllowed => ffi::ARROW_CURSOR,
        MouseCursor::TextInput => ffi::IBEAM_CURSOR,
        MouseCursor::ResizeNs => ffi::VRESIZE_CURSOR,
        MouseCursor::ResizeEw => ffi::HRESIZE_CURSOR,
        MouseCursor::ResizeNesw | MouseCursor::ResizeNwse => ffi::CROSSHAIR_CURSOR,
        MouseCursor::Hand => ffi::HAND_CURSOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_code_translation() {
        assert_eq!(map_key_code(ffi::KEY_A), Some(Key::A));
        assert_eq!(map_key_code(ffi::KEY_ESCAPE), Some(Key::Escape));
        assert_eq!(map_key_code(ffi::KEY_KP_ENTER), Some(Key::KeypadEnter));
        assert_eq!(map_key_code(ffi::KEY_RIGHT_SUPER), Some(Key::RightSuper));
    }

    #[test]
    fn test_unknown_key_code_is_unhandled() {
        assert_eq!(map_key_code(ffi::KEY_UNKNOWN), None);
        assert_eq!(map_key_code(10_000), None);
        // World keys have no engine equivalent.
        assert_eq!(map_key_code(ffi::KEY_WORLD_1), None);
    }

    #[test]
    fn test_safe_enum_and_raw_code_agree() {
        // The polled-event path casts `glfw::Key` to its C code; both
        // paths must land on the same engine key.
        assert_eq!(glfw::Key::Space as c_int, ffi::KEY_SPACE);
        assert_eq!(
            map_key_code(glfw::Key::Comma as c_int),
            Some(Key::Comma)
        );
    }

    #[test]
    fn test_mouse_button_translation() {
        assert_eq!(map_mouse_button(0), Some(MouseButton::Left));
        assert_eq!(map_mouse_button(2), Some(MouseButton::Middle));
        assert_eq!(map_mouse_button(4), Some(MouseButton::Extra2));
        assert_eq!(map_mouse_button(5), None);
    }

    #[test]
    fn test_every_cursor_has_a_shape() {
        for cursor in MouseCursor::ALL {
            let code = cursor_shape_code(cursor);
            assert!(code >= ffi::ARROW_CURSOR, "unmapped cursor {cursor:?}");
        }
    }
}
