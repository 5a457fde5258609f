//! Per-context input/output state
//!
//! [`Io`] is the meeting point between platform backends and the engine core.
//! Backends queue [`InputEvent`]s as they observe platform activity; the
//! context drains the queue in arrival order when a frame begins and exposes
//! the resulting pointer/key state plus the capture outputs the embedding
//! application polls to decide who owns an event.

use std::collections::VecDeque;

use crate::keys::{Key, MouseButton, MouseCursor};

/// Mouse position reported while the pointer is absent or unknown.
pub const MOUSE_POS_INVALID: [f32; 2] = [-f32::MAX, -f32::MAX];

bitflags::bitflags! {
    /// Application-set behavior switches, read by backends every frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ConfigFlags: u32 {
        /// Drive navigation from keyboard events.
        const NAV_ENABLE_KEYBOARD = 1 << 0;
        /// Drive navigation from gamepad events; backends poll pads only
        /// when this is set.
        const NAV_ENABLE_GAMEPAD = 1 << 1;
        /// Allow the engine to reposition the OS pointer; backends honor
        /// [`Io::take_mouse_pos_request`] only when this is set.
        const NAV_ENABLE_SET_MOUSE_POS = 1 << 2;
        /// Ignore all mouse events.
        const NO_MOUSE = 1 << 4;
        /// Backends must not change the OS cursor shape.
        const NO_MOUSE_CURSOR_CHANGE = 1 << 5;
        /// Framebuffer is sRGB; renderers may select an sRGB-aware path.
        const IS_SRGB = 1 << 6;
        /// Enable the dock-node subsystem.
        #[cfg(feature = "docking")]
        const DOCKING_ENABLE = 1 << 7;
    }
}

bitflags::bitflags! {
    /// Capability flags set by backends during their init.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BackendFlags: u32 {
        /// Platform backend can poll a gamepad.
        const HAS_GAMEPAD = 1 << 0;
        /// Platform backend can change the OS cursor shape.
        const HAS_MOUSE_CURSORS = 1 << 1;
        /// Platform backend can warp the OS pointer.
        const HAS_SET_MOUSE_POS = 1 << 2;
        /// Renderer honors [`DrawCmd::vtx_offset`](crate::draw::DrawCmd),
        /// allowing draw lists beyond 65535 vertices.
        const RENDERER_HAS_VTX_OFFSET = 1 << 3;
    }
}

/// Source device of subsequent pointer events.
#[cfg(feature = "latest")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseSource {
    /// Actual mouse.
    #[default]
    Mouse,
    /// Touch screen contact mapped to the pointer.
    TouchScreen,
    /// Stylus mapped to the pointer.
    Pen,
}

/// One translated platform event, queued until the next frame begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to a position in screen coordinates.
    MousePos { x: f32, y: f32 },
    /// Button state changed.
    MouseButton { button: MouseButton, down: bool },
    /// Wheel scrolled; one unit is one line.
    MouseWheel { h: f32, v: f32 },
    /// Key state changed.
    Key { key: Key, down: bool },
    /// Key state changed with an analog magnitude (gamepad sticks and
    /// triggers).
    KeyAnalog { key: Key, down: bool, value: f32 },
    /// Text input produced a character.
    Character(char),
    /// Window keyboard focus changed.
    Focus(bool),
    /// Pointer events that follow come from this device kind.
    #[cfg(feature = "latest")]
    MouseSourceChange(MouseSource),
}

/// Input/output block of one context.
///
/// Writes before `new_frame` (display geometry, queued events) are inputs;
/// everything else is state the drain step derives from them.
#[derive(Debug)]
pub struct Io {
    /// Display size in screen coordinates, set by the platform backend.
    pub display_size: [f32; 2],
    /// Framebuffer pixels per screen coordinate.
    pub display_framebuffer_scale: [f32; 2],
    /// Seconds since the previous frame, set by the platform backend.
    pub delta_time: f32,
    /// Behavior switches.
    pub config_flags: ConfigFlags,
    /// Backend capabilities.
    pub backend_flags: BackendFlags,
    /// Draw the cursor inside the frame instead of using the OS cursor.
    pub mouse_draw_cursor: bool,

    // State derived when the queue drains.
    mouse_pos: [f32; 2],
    mouse_down: [bool; MouseButton::COUNT],
    mouse_wheel: f32,
    mouse_wheel_h: f32,
    keys_down: [bool; Key::COUNT],
    keys_analog: [f32; Key::COUNT],
    key_ctrl: bool,
    key_shift: bool,
    key_alt: bool,
    key_super: bool,
    input_characters: Vec<char>,
    app_focus_lost: bool,
    #[cfg(feature = "latest")]
    mouse_source: MouseSource,
    #[cfg(feature = "latest")]
    swap_mouse_wheel_axes: bool,

    // Outputs read by the application and by backends.
    want_capture_mouse: bool,
    want_capture_keyboard: bool,
    want_text_input: bool,
    mouse_cursor: MouseCursor,
    mouse_pos_request: Option<[f32; 2]>,
    backend_platform_name: Option<String>,
    backend_renderer_name: Option<String>,

    events: VecDeque<InputEvent>,
    framerate: f32,
}

impl Default for Io {
    fn default() -> Self {
        Self::new()
    }
}

impl Io {
    /// Creates the block with nothing pressed and no display attached.
    #[must_use]
    pub fn new() -> Self {
        Self {
            display_size: [0.0, 0.0],
            display_framebuffer_scale: [1.0, 1.0],
            delta_time: 1.0 / 60.0,
            config_flags: ConfigFlags::empty(),
            backend_flags: BackendFlags::empty(),
            mouse_draw_cursor: false,
            mouse_pos: MOUSE_POS_INVALID,
            mouse_down: [false; MouseButton::COUNT],
            mouse_wheel: 0.0,
            mouse_wheel_h: 0.0,
            keys_down: [false; Key::COUNT],
            keys_analog: [0.0; Key::COUNT],
            key_ctrl: false,
            key_shift: false,
            key_alt: false,
            key_super: false,
            input_characters: Vec::new(),
            app_focus_lost: false,
            #[cfg(feature = "latest")]
            mouse_source: MouseSource::Mouse,
            #[cfg(feature = "latest")]
            swap_mouse_wheel_axes: false,
            want_capture_mouse: false,
            want_capture_keyboard: false,
            want_text_input: false,
            mouse_cursor: MouseCursor::Arrow,
            mouse_pos_request: None,
            backend_platform_name: None,
            backend_renderer_name: None,
            events: VecDeque::new(),
            framerate: 0.0,
        }
    }

    /// Queues a pointer move in screen coordinates.
    pub fn add_mouse_pos_event(&mut self, x: f32, y: f32) {
        self.events.push_back(InputEvent::MousePos { x, y });
    }

    /// Queues a button change.
    pub fn add_mouse_button_event(&mut self, button: MouseButton, down: bool) {
        self.events.push_back(InputEvent::MouseButton { button, down });
    }

    /// Queues wheel motion; positive `v` scrolls up, positive `h` scrolls
    /// left.
    pub fn add_mouse_wheel_event(&mut self, h: f32, v: f32) {
        self.events.push_back(InputEvent::MouseWheel { h, v });
    }

    /// Queues a key change.
    pub fn add_key_event(&mut self, key: Key, down: bool) {
        self.events.push_back(InputEvent::Key { key, down });
    }

    /// Queues a key change carrying an analog magnitude in `0.0..=1.0`.
    pub fn add_key_analog_event(&mut self, key: Key, down: bool, value: f32) {
        self.events.push_back(InputEvent::KeyAnalog { key, down, value });
    }

    /// Queues a text character. Control characters other than `'\t'` and
    /// `'\n'` are dropped at drain time.
    pub fn add_input_character(&mut self, c: char) {
        self.events.push_back(InputEvent::Character(c));
    }

    /// Queues a focus change. Losing focus releases every key and modifier
    /// so no key appears stuck when focus returns.
    pub fn add_focus_event(&mut self, focused: bool) {
        self.events.push_back(InputEvent::Focus(focused));
    }

    /// Queues a pointer-source change.
    #[cfg(feature = "latest")]
    pub fn add_mouse_source_event(&mut self, source: MouseSource) {
        self.events.push_back(InputEvent::MouseSourceChange(source));
    }

    /// Applies subsequent wheel events with their axes exchanged, for
    /// platforms where a modifier redirects vertical scrolling into
    /// horizontal at the source.
    #[cfg(feature = "latest")]
    pub fn set_swap_mouse_wheel_axes(&mut self, swap: bool) {
        self.swap_mouse_wheel_axes = swap;
    }

    /// Number of events waiting for the next frame.
    #[must_use]
    pub fn queued_events(&self) -> usize {
        self.events.len()
    }

    /// Pointer position after the last drain, or [`MOUSE_POS_INVALID`].
    #[must_use]
    pub fn mouse_pos(&self) -> [f32; 2] {
        self.mouse_pos
    }

    /// Whether `button` was down after the last drain.
    #[must_use]
    pub fn mouse_down(&self, button: MouseButton) -> bool {
        self.mouse_down[button.index()]
    }

    /// Vertical wheel travel accumulated over the last drain.
    #[must_use]
    pub fn mouse_wheel(&self) -> f32 {
        self.mouse_wheel
    }

    /// Horizontal wheel travel accumulated over the last drain.
    #[must_use]
    pub fn mouse_wheel_h(&self) -> f32 {
        self.mouse_wheel_h
    }

    /// Whether `key` was down after the last drain.
    #[must_use]
    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down[key.index()]
    }

    /// Analog magnitude of `key` after the last drain.
    #[must_use]
    pub fn key_analog(&self, key: Key) -> f32 {
        self.keys_analog[key.index()]
    }

    /// Ctrl modifier state after the last drain.
    #[must_use]
    pub fn key_ctrl(&self) -> bool {
        self.key_ctrl
    }

    /// Shift modifier state after the last drain.
    #[must_use]
    pub fn key_shift(&self) -> bool {
        self.key_shift
    }

    /// Alt modifier state after the last drain.
    #[must_use]
    pub fn key_alt(&self) -> bool {
        self.key_alt
    }

    /// Super (Cmd/Win) modifier state after the last drain.
    #[must_use]
    pub fn key_super(&self) -> bool {
        self.key_super
    }

    /// Characters typed since the previous frame, in arrival order.
    #[must_use]
    pub fn input_characters(&self) -> &[char] {
        &self.input_characters
    }

    /// Whether the window lost keyboard focus during the last drain.
    #[must_use]
    pub fn app_focus_lost(&self) -> bool {
        self.app_focus_lost
    }

    /// Device kind of the most recent pointer events.
    #[cfg(feature = "latest")]
    #[must_use]
    pub fn mouse_source(&self) -> MouseSource {
        self.mouse_source
    }

    /// Whether the UI claims mouse events this frame.
    #[must_use]
    pub fn want_capture_mouse(&self) -> bool {
        self.want_capture_mouse
    }

    /// Whether the UI claims keyboard events this frame.
    #[must_use]
    pub fn want_capture_keyboard(&self) -> bool {
        self.want_capture_keyboard
    }

    /// Whether a text-entry field is active.
    #[must_use]
    pub fn want_text_input(&self) -> bool {
        self.want_text_input
    }

    /// Marks a text-entry field active or inactive; the widget layer above
    /// this crate drives it.
    pub fn set_want_text_input(&mut self, active: bool) {
        self.want_text_input = active;
    }

    /// Cursor shape the engine wants displayed.
    #[must_use]
    pub fn mouse_cursor(&self) -> MouseCursor {
        self.mouse_cursor
    }

    /// Sets the cursor shape request for the current frame.
    pub fn set_mouse_cursor(&mut self, cursor: MouseCursor) {
        self.mouse_cursor = cursor;
    }

    /// Asks the platform backend to warp the OS pointer next frame.
    /// Honored only when [`ConfigFlags::NAV_ENABLE_SET_MOUSE_POS`] is set
    /// and the backend advertises [`BackendFlags::HAS_SET_MOUSE_POS`].
    pub fn request_mouse_pos(&mut self, pos: [f32; 2]) {
        self.mouse_pos_request = Some(pos);
    }

    /// Consumes a pending pointer-warp request, if permitted by the flags.
    pub fn take_mouse_pos_request(&mut self) -> Option<[f32; 2]> {
        if self.config_flags.contains(ConfigFlags::NAV_ENABLE_SET_MOUSE_POS)
            && self.backend_flags.contains(BackendFlags::HAS_SET_MOUSE_POS)
        {
            self.mouse_pos_request.take()
        } else {
            self.mouse_pos_request = None;
            None
        }
    }

    /// Identity string of the attached platform backend.
    #[must_use]
    pub fn backend_platform_name(&self) -> Option<&str> {
        self.backend_platform_name.as_deref()
    }

    /// Records the platform backend identity; `None` on shutdown.
    pub fn set_backend_platform_name(&mut self, name: Option<String>) {
        self.backend_platform_name = name;
    }

    /// Identity string of the attached renderer backend.
    #[must_use]
    pub fn backend_renderer_name(&self) -> Option<&str> {
        self.backend_renderer_name.as_deref()
    }

    /// Records the renderer backend identity; `None` on shutdown.
    pub fn set_backend_renderer_name(&mut self, name: Option<String>) {
        self.backend_renderer_name = name;
    }

    /// Smoothed frames-per-second estimate.
    #[must_use]
    pub fn framerate(&self) -> f32 {
        self.framerate
    }

    /// Applies every queued event in arrival order and recomputes the
    /// derived state. Called by the context when a frame begins.
    pub(crate) fn drain_events(&mut self) {
        self.mouse_wheel = 0.0;
        self.mouse_wheel_h = 0.0;
        self.input_characters.clear();
        self.app_focus_lost = false;

        while let Some(event) = self.events.pop_front() {
            self.apply_event(event);
        }

        self.want_capture_mouse = !self.config_flags.contains(ConfigFlags::NO_MOUSE)
            && self.mouse_down.iter().any(|down| *down);
        self.want_capture_keyboard = self.want_text_input;

        // Exponential moving average over roughly the last second.
        if self.delta_time > 0.0 {
            let instantaneous = 1.0 / self.delta_time;
            self.framerate = if self.framerate == 0.0 {
                instantaneous
            } else {
                self.framerate + (instantaneous - self.framerate) * 0.05
            };
        }
    }

    fn apply_event(&mut self, event: InputEvent) {
        let ignore_mouse = self.config_flags.contains(ConfigFlags::NO_MOUSE);
        match event {
            InputEvent::MousePos { x, y } => {
                if !ignore_mouse {
                    self.mouse_pos = [x, y];
                }
            }
            InputEvent::MouseButton { button, down } => {
                if !ignore_mouse {
                    self.mouse_down[button.index()] = down;
                }
            }
            InputEvent::MouseWheel { h, v } => {
                if !ignore_mouse {
                    #[cfg(feature = "latest")]
                    let (h, v) = if self.swap_mouse_wheel_axes { (v, h) } else { (h, v) };
                    self.mouse_wheel_h += h;
                    self.mouse_wheel += v;
                }
            }
            InputEvent::Key { key, down } => self.set_key(key, down, if down { 1.0 } else { 0.0 }),
            InputEvent::KeyAnalog { key, down, value } => self.set_key(key, down, value),
            InputEvent::Character(c) => {
                if !c.is_control() || c == '\t' || c == '\n' {
                    self.input_characters.push(c);
                }
            }
            InputEvent::Focus(focused) => {
                if !focused {
                    self.app_focus_lost = true;
                    self.keys_down = [false; Key::COUNT];
                    self.keys_analog = [0.0; Key::COUNT];
                    self.key_ctrl = false;
                    self.key_shift = false;
                    self.key_alt = false;
                    self.key_super = false;
                }
            }
            #[cfg(feature = "latest")]
            InputEvent::MouseSourceChange(source) => self.mouse_source = source,
        }
    }

    fn set_key(&mut self, key: Key, down: bool, value: f32) {
        self.keys_down[key.index()] = down;
        self.keys_analog[key.index()] = value;
        match key {
            Key::LeftCtrl | Key::RightCtrl => self.key_ctrl = down,
            Key::LeftShift | Key::RightShift => self.key_shift = down,
            Key::LeftAlt | Key::RightAlt => self.key_alt = down,
            Key::LeftSuper | Key::RightSuper => self.key_super = down,
            _ => {}
        }
    }
}
