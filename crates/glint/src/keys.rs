//! Input identifiers shared by all platform backends
//!
//! Backends translate their library-specific key and button codes into these
//! closed sets before queuing events. Indices are stable and dense so the
//! values can cross the C boundary and index per-key state arrays.

/// Named key identifier, independent of layout and platform scancodes.
///
/// Keyboard keys come first, gamepad navigation inputs last. The discriminant
/// doubles as the dense index used for per-key state storage and for the C
/// boundary; see [`Key::from_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Key {
    Tab,
    LeftArrow,
    RightArrow,
    UpArrow,
    DownArrow,
    PageUp,
    PageDown,
    Home,
    End,
    Insert,
    Delete,
    Backspace,
    Space,
    Enter,
    Escape,
    LeftCtrl,
    LeftShift,
    LeftAlt,
    LeftSuper,
    RightCtrl,
    RightShift,
    RightAlt,
    RightSuper,
    Menu,
    Alpha0,
    Alpha1,
    Alpha2,
    Alpha3,
    Alpha4,
    Alpha5,
    Alpha6,
    Alpha7,
    Alpha8,
    Alpha9,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Apostrophe,
    Comma,
    Minus,
    Period,
    Slash,
    Semicolon,
    Equal,
    LeftBracket,
    Backslash,
    RightBracket,
    GraveAccent,
    CapsLock,
    ScrollLock,
    NumLock,
    PrintScreen,
    Pause,
    Keypad0,
    Keypad1,
    Keypad2,
    Keypad3,
    Keypad4,
    Keypad5,
    Keypad6,
    Keypad7,
    Keypad8,
    Keypad9,
    KeypadDecimal,
    KeypadDivide,
    KeypadMultiply,
    KeypadSubtract,
    KeypadAdd,
    KeypadEnter,
    KeypadEqual,
    GamepadStart,
    GamepadBack,
    GamepadFaceLeft,
    GamepadFaceRight,
    GamepadFaceUp,
    GamepadFaceDown,
    GamepadDpadLeft,
    GamepadDpadRight,
    GamepadDpadUp,
    GamepadDpadDown,
    GamepadL1,
    GamepadR1,
    GamepadL2,
    GamepadR2,
    GamepadL3,
    GamepadR3,
    GamepadLStickLeft,
    GamepadLStickRight,
    GamepadLStickUp,
    GamepadLStickDown,
    GamepadRStickLeft,
    GamepadRStickRight,
    GamepadRStickUp,
    GamepadRStickDown,
}

impl Key {
    /// Number of key identifiers; per-key state arrays use this length.
    pub const COUNT: usize = 129;

    /// All keys in declaration (index) order.
    pub const ALL: [Key; Key::COUNT] = [
        Key::Tab,
        Key::LeftArrow,
        Key::RightArrow,
        Key::UpArrow,
        Key::DownArrow,
        Key::PageUp,
        Key::PageDown,
        Key::Home,
        Key::End,
        Key::Insert,
        Key::Delete,
        Key::Backspace,
        Key::Space,
        Key::Enter,
        Key::Escape,
        Key::LeftCtrl,
        Key::LeftShift,
        Key::LeftAlt,
        Key::LeftSuper,
        Key::RightCtrl,
        Key::RightShift,
        Key::RightAlt,
        Key::RightSuper,
        Key::Menu,
        Key::Alpha0,
        Key::Alpha1,
        Key::Alpha2,
        Key::Alpha3,
        Key::Alpha4,
        Key::Alpha5,
        Key::Alpha6,
        Key::Alpha7,
        Key::Alpha8,
        Key::Alpha9,
        Key::A,
        Key::B,
        Key::C,
        Key::D,
        Key::E,
        Key::F,
        Key::G,
        Key::H,
        Key::I,
        Key::J,
        Key::K,
        Key::L,
        Key::M,
        Key::N,
        Key::O,
        Key::P,
        Key::Q,
        Key::R,
        Key::S,
        Key::T,
        Key::U,
        Key::V,
        Key::W,
        Key::X,
        Key::Y,
        Key::Z,
        Key::F1,
        Key::F2,
        Key::F3,
        Key::F4,
        Key::F5,
        Key::F6,
        Key::F7,
        Key::F8,
        Key::F9,
        Key::F10,
        Key::F11,
        Key::F12,
        Key::Apostrophe,
        Key::Comma,
        Key::Minus,
        Key::Period,
        Key::Slash,
        Key::Semicolon,
        Key::Equal,
        Key::LeftBracket,
        Key::Backslash,
        Key::RightBracket,
        Key::GraveAccent,
        Key::CapsLock,
        Key::ScrollLock,
        Key::NumLock,
        Key::PrintScreen,
        Key::Pause,
        Key::Keypad0,
        Key::Keypad1,
        Key::Keypad2,
        Key::Keypad3,
        Key::Keypad4,
        Key::Keypad5,
        Key::Keypad6,
        Key::Keypad7,
        Key::Keypad8,
        Key::Keypad9,
        Key::KeypadDecimal,
        Key::KeypadDivide,
        Key::KeypadMultiply,
        Key::KeypadSubtract,
        Key::KeypadAdd,
        Key::KeypadEnter,
        Key::KeypadEqual,
        Key::GamepadStart,
        Key::GamepadBack,
        Key::GamepadFaceLeft,
        Key::GamepadFaceRight,
        Key::GamepadFaceUp,
        Key::GamepadFaceDown,
        Key::GamepadDpadLeft,
        Key::GamepadDpadRight,
        Key::GamepadDpadUp,
        Key::GamepadDpadDown,
        Key::GamepadL1,
        Key::GamepadR1,
        Key::GamepadL2,
        Key::GamepadR2,
        Key::GamepadL3,
        Key::GamepadR3,
        Key::GamepadLStickLeft,
        Key::GamepadLStickRight,
        Key::GamepadLStickUp,
        Key::GamepadLStickDown,
        Key::GamepadRStickLeft,
        Key::GamepadRStickRight,
        Key::GamepadRStickUp,
        Key::GamepadRStickDown,
    ];

    /// Dense index of this key, in `0..Key::COUNT`.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Looks up a key by dense index; out-of-range indices yield `None`.
    ///
    /// This is the entry point for untrusted values arriving over the C
    /// boundary.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Whether this key is a gamepad navigation input.
    #[must_use]
    pub fn is_gamepad(self) -> bool {
        (self as u32) >= (Key::GamepadStart as u32)
    }

    /// Whether this key is one of the eight modifier keys.
    #[must_use]
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Key::LeftCtrl
                | Key::LeftShift
                | Key::LeftAlt
                | Key::LeftSuper
                | Key::RightCtrl
                | Key::RightShift
                | Key::RightAlt
                | Key::RightSuper
        )
    }
}

/// Mouse button identifier; index doubles as the per-button state slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MouseButton {
    /// Primary button
    Left,
    /// Secondary button
    Right,
    /// Wheel button
    Middle,
    /// First extra button
    Extra1,
    /// Second extra button
    Extra2,
}

impl MouseButton {
    /// Number of tracked buttons.
    pub const COUNT: usize = 5;

    /// All buttons in index order.
    pub const ALL: [MouseButton; MouseButton::COUNT] = [
        MouseButton::Left,
        MouseButton::Right,
        MouseButton::Middle,
        MouseButton::Extra1,
        MouseButton::Extra2,
    ];

    /// Dense index of this button.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Looks up a button by dense index; out-of-range indices yield `None`.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Cursor shape the engine wants the platform backend to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MouseCursor {
    /// Default pointer
    Arrow,
    /// Text insertion beam
    TextInput,
    /// Four-way move
    ResizeAll,
    /// Vertical resize
    ResizeNs,
    /// Horizontal resize
    ResizeEw,
    /// Diagonal resize, bottom-left to top-right
    ResizeNesw,
    /// Diagonal resize, top-left to bottom-right
    ResizeNwse,
    /// Link hand
    Hand,
    /// Action not allowed
    NotAllowed,
}

impl MouseCursor {
    /// Number of cursor shapes.
    pub const COUNT: usize = 9;

    /// All shapes in index order.
    pub const ALL: [MouseCursor; MouseCursor::COUNT] = [
        MouseCursor::Arrow,
        MouseCursor::TextInput,
        MouseCursor::ResizeAll,
        MouseCursor::ResizeNs,
        MouseCursor::ResizeEw,
        MouseCursor::ResizeNesw,
        MouseCursor::ResizeNwse,
        MouseCursor::Hand,
        MouseCursor::NotAllowed,
    ];

    /// Dense index of this shape.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_indices_are_dense() {
        for (i, key) in Key::ALL.iter().enumerate() {
            assert_eq!(key.index(), i);
            assert_eq!(Key::from_index(i), Some(*key));
        }
        assert_eq!(Key::from_index(Key::COUNT), None);
    }

    #[test]
    fn test_gamepad_range() {
        assert!(!Key::KeypadEqual.is_gamepad());
        assert!(Key::GamepadStart.is_gamepad());
        assert!(Key::GamepadRStickDown.is_gamepad());
    }

    #[test]
    fn test_modifier_classification() {
        assert!(Key::LeftCtrl.is_modifier());
        assert!(Key::RightSuper.is_modifier());
        assert!(!Key::A.is_modifier());
        assert!(!Key::GamepadStart.is_modifier());
    }

    #[test]
    fn test_mouse_button_indices() {
        for (i, button) in MouseButton::ALL.iter().enumerate() {
            assert_eq!(button.index(), i);
            assert_eq!(MouseButton::from_index(i), Some(*button));
        }
        assert_eq!(MouseButton::from_index(MouseButton::COUNT), None);
    }
}
