//! GLFW platform backend
//!
//! Attaches an engine context to a GLFW window: display geometry and
//! frame timing, keyboard/mouse/gamepad translation, OS cursor shapes,
//! pointer warping and clipboard access.
//!
//! Events reach the backend one of two ways. With `install_callbacks`
//! the backend hooks the window's C callbacks through
//! [`callbacks`] trampolines, remembers the previously installed
//! callbacks and chains to them, and drains the buffered events at
//! [`GlfwPlatform::new_frame`]. Applications that poll
//! [`glfw::WindowEvent`]s themselves instead feed each event through
//! [`GlfwPlatform::handle_window_event`] or the per-kind handlers.
//!
//! The window must stay alive until [`GlfwPlatform::shutdown`]; the
//! backend holds the raw window handle, not a borrow.

mod callbacks;
mod keymap;

use std::ffi::{CStr, CString};
use std::os::raw::c_int;

use glfw::ffi;
use glfw::Context as _;

use crate::backend::{PlatformBackend, PlatformError, PlatformResult};
use crate::clipboard::ClipboardBackend;
use crate::context::Context;
use crate::io::{BackendFlags, ConfigFlags, Io, MOUSE_POS_INVALID};
use crate::keys::{Key, MouseCursor};

use callbacks::PendingEvent;

/// Graphics API the window was created for. The backend only needs the
/// distinction for logging and capability reporting; input handling is
/// identical across the three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientApi {
    /// Window owns an OpenGL (or GLES) context.
    OpenGl,
    /// Window created with `CLIENT_API = NO_API` for Vulkan rendering.
    Vulkan,
    /// Any other rendering arrangement.
    Other,
}

/// How the backend selects the gamepad it polls each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamepadMode {
    /// Poll the first connected joystick with a gamepad mapping.
    #[default]
    Auto,
    /// Never poll gamepads, even when navigation asks for them.
    Disabled,
    /// Poll exactly this joystick id (`0..=15`).
    Joystick(u32),
}

/// Platform backend for GLFW windows.
pub struct GlfwPlatform {
    window: *mut ffi::GLFWwindow,
    client_api: ClientApi,
    installed_callbacks: bool,
    chain_all_windows: bool,
    gamepad_mode: GamepadMode,
    time: f64,
    last_valid_mouse_pos: [f32; 2],
    monitor_changed: bool,
    cursors: [Option<*mut ffi::GLFWcursor>; MouseCursor::COUNT],
    detached: bool,
}

impl GlfwPlatform {
    /// Attaches to a window that owns an OpenGL context.
    ///
    /// With `install_callbacks` the backend hooks the window's input
    /// callbacks and chains to whatever was installed before; without
    /// it the application forwards events itself.
    pub fn init_for_opengl(
        window: &mut glfw::Window,
        install_callbacks: bool,
        ctx: &mut Context,
    ) -> PlatformResult<Self> {
        // SAFETY: the pointer comes from a live window the caller
        // borrowed to us; liveness until shutdown is a documented
        // requirement of this backend.
        unsafe { Self::init_from_raw(window.window_ptr(), ClientApi::OpenGl, install_callbacks, ctx) }
    }

    /// Attaches to a window created without a client API, for Vulkan.
    pub fn init_for_vulkan(
        window: &mut glfw::Window,
        install_callbacks: bool,
        ctx: &mut Context,
    ) -> PlatformResult<Self> {
        // SAFETY: as for init_for_opengl.
        unsafe { Self::init_from_raw(window.window_ptr(), ClientApi::Vulkan, install_callbacks, ctx) }
    }

    /// Attaches to a window for any other rendering arrangement.
    pub fn init_for_other(
        window: &mut glfw::Window,
        install_callbacks: bool,
        ctx: &mut Context,
    ) -> PlatformResult<Self> {
        // SAFETY: as for init_for_opengl.
        unsafe { Self::init_from_raw(window.window_ptr(), ClientApi::Other, install_callbacks, ctx) }
    }

    /// Attaches to a raw window handle; the C facade lands here.
    ///
    /// Fails when the handle is null, when monitor introspection is
    /// unavailable (a broken display environment would otherwise
    /// surface as nonsense geometry later), or when another backend
    /// already installed callbacks on this window.
    ///
    /// # Safety
    ///
    /// `window` must point to a live GLFW window that outlives this
    /// backend, and the call must happen on the main thread.
    pub unsafe fn init_from_raw(
        window: *mut ffi::GLFWwindow,
        client_api: ClientApi,
        install_callbacks: bool,
        ctx: &mut Context,
    ) -> PlatformResult<Self> {
        if window.is_null() {
            return Err(PlatformError::NullWindow);
        }
        let monitor = ffi::glfwGetPrimaryMonitor();
        if monitor.is_null() {
            return Err(PlatformError::MonitorUnavailable);
        }
        let mut scale = [0.0f32, 0.0f32];
        ffi::glfwGetMonitorContentScale(monitor, &mut scale[0], &mut scale[1]);
        log::debug!("primary monitor content scale {}x{}", scale[0], scale[1]);

        if install_callbacks {
            callbacks::install(window, false)?;
        }

        let io = ctx.io_mut();
        io.backend_flags.insert(
            BackendFlags::HAS_GAMEPAD
                | BackendFlags::HAS_MOUSE_CURSORS
                | BackendFlags::HAS_SET_MOUSE_POS,
        );
        io.set_backend_platform_name(Some("glint-glfw".to_owned()));
        ctx.set_clipboard_backend(Box::new(GlfwClipboard { window }));

        log::info!("GLFW platform backend attached ({client_api:?})");
        Ok(Self {
            window,
            client_api,
            installed_callbacks: install_callbacks,
            chain_all_windows: false,
            gamepad_mode: GamepadMode::default(),
            time: 0.0,
            last_valid_mouse_pos: MOUSE_POS_INVALID,
            monitor_changed: false,
            cursors: Self::create_standard_cursors(),
            detached: false,
        })
    }

    fn create_standard_cursors() -> [Option<*mut ffi::GLFWcursor>; MouseCursor::COUNT] {
        let mut cursors = [None; MouseCursor::COUNT];
        for shape in MouseCursor::ALL {
            let cursor =
                unsafe { ffi::glfwCreateStandardCursor(keymap::cursor_shape_code(shape)) };
            if !cursor.is_null() {
                cursors[shape.index()] = Some(cursor);
            }
        }
        cursors
    }

    /// Graphics API this backend was initialized for.
    #[must_use]
    pub const fn client_api(&self) -> ClientApi {
        self.client_api
    }

    /// Selects which gamepad [`new_frame`](Self::new_frame) polls.
    pub fn set_gamepad_mode(&mut self, mode: GamepadMode) {
        self.gamepad_mode = mode;
    }

    /// Controls whether chained previous callbacks also run for events
    /// arriving from windows other than the one this backend attached
    /// to. Off by default: foreign windows keep their events.
    pub fn set_callbacks_chain_for_all_windows(&mut self, chain_all: bool) {
        self.chain_all_windows = chain_all;
        if self.installed_callbacks {
            callbacks::set_chain_all(self.window as usize, chain_all);
        }
    }

    /// Hooks the window's input callbacks after an init without them.
    pub fn install_callbacks(&mut self) -> PlatformResult<()> {
        if self.installed_callbacks {
            return Err(PlatformError::AlreadyInstalled);
        }
        // SAFETY: window is live until shutdown per init contract.
        unsafe { callbacks::install(self.window, self.chain_all_windows)? };
        self.installed_callbacks = true;
        Ok(())
    }

    /// Puts the previously installed callbacks back on the window.
    /// No-op when callbacks were never installed.
    pub fn restore_callbacks(&mut self) {
        if self.installed_callbacks {
            // SAFETY: window is live until shutdown per init contract.
            unsafe { callbacks::uninstall(self.window) };
            self.installed_callbacks = false;
        }
    }

    /// Detaches from the window: restores its callbacks, destroys the
    /// cursors this backend created and clears the backend identity
    /// from [`Io`]. The backend must not be used afterwards.
    pub fn shutdown(&mut self, ctx: &mut Context) {
        if self.detached {
            return;
        }
        self.restore_callbacks();
        for cursor in &mut self.cursors {
            if let Some(cursor) = cursor.take() {
                // SAFETY: cursor came from glfwCreateStandardCursor and
                // is destroyed exactly once.
                unsafe { ffi::glfwDestroyCursor(cursor) };
            }
        }
        let io = ctx.io_mut();
        io.backend_flags.remove(
            BackendFlags::HAS_GAMEPAD
                | BackendFlags::HAS_MOUSE_CURSORS
                | BackendFlags::HAS_SET_MOUSE_POS,
        );
        io.set_backend_platform_name(None);
        ctx.clear_clipboard_backend();
        self.detached = true;
        log::debug!("GLFW platform backend detached");
    }

    /// Refreshes [`Io`] for the frame about to begin: display geometry,
    /// delta time, buffered callback events, pointer warp requests,
    /// cursor shape and gamepad state.
    ///
    /// # Panics
    ///
    /// Panics when called after [`shutdown`](Self::shutdown).
    pub fn new_frame(&mut self, ctx: &mut Context) {
        assert!(!self.detached, "GlfwPlatform used after shutdown");
        let io = ctx.io_mut();

        let (mut w, mut h) = (0, 0);
        let (mut fb_w, mut fb_h) = (0, 0);
        // SAFETY: window is live until shutdown per init contract; all
        // further GLFW calls in this frame rely on the same guarantee.
        unsafe {
            ffi::glfwGetWindowSize(self.window, &mut w, &mut h);
            ffi::glfwGetFramebufferSize(self.window, &mut fb_w, &mut fb_h);
        }
        io.display_size = [w as f32, h as f32];
        if w > 0 && h > 0 {
            io.display_framebuffer_scale = [fb_w as f32 / w as f32, fb_h as f32 / h as f32];
        }

        let now = unsafe { ffi::glfwGetTime() };
        let delta = (now - self.time) as f32;
        // First frame, or a clock that did not advance.
        io.delta_time = if self.time > 0.0 && delta > 0.0 {
            delta
        } else {
            1.0 / 60.0
        };
        self.time = now;

        if self.monitor_changed {
            self.monitor_changed = false;
            let monitor = unsafe { ffi::glfwGetPrimaryMonitor() };
            if !monitor.is_null() {
                let mut scale = [0.0f32, 0.0f32];
                unsafe { ffi::glfwGetMonitorContentScale(monitor, &mut scale[0], &mut scale[1]) };
                log::debug!(
                    "monitor configuration changed, content scale now {}x{}",
                    scale[0],
                    scale[1]
                );
            }
        }

        if self.installed_callbacks {
            for event in callbacks::take_pending(self.window as usize) {
                self.apply_pending(io, event);
            }
        }

        if let Some([x, y]) = io.take_mouse_pos_request() {
            let focused =
                unsafe { ffi::glfwGetWindowAttrib(self.window, ffi::FOCUSED) } == ffi::TRUE;
            if focused {
                unsafe { ffi::glfwSetCursorPos(self.window, f64::from(x), f64::from(y)) };
            }
        }

        self.update_cursor(io);
        self.update_gamepads(io);
    }

    fn apply_pending(&mut self, io: &mut Io, event: PendingEvent) {
        match event {
            PendingEvent::CursorPos { x, y } => {
                self.cursor_pos_event(io, x, y);
            }
            PendingEvent::MouseButton { button, action, mods } => {
                self.mouse_button_event(io, button, action, mods);
            }
            PendingEvent::Scroll { x, y } => {
                self.scroll_event(io, x, y);
            }
            PendingEvent::Key { key, action, mods } => {
                self.key_event(io, key, 0, action, mods);
            }
            PendingEvent::Char { codepoint } => {
                self.char_event(io, codepoint);
            }
            PendingEvent::CursorEnter { entered } => {
                self.cursor_enter_event(io, entered);
            }
            PendingEvent::Focus { focused } => {
                self.window_focus_event(io, focused);
            }
            PendingEvent::MonitorChange => {
                self.monitor_event();
            }
        }
    }

    /// Queues a pointer move. Returns `true` when the event was
    /// recognized and applied, like every per-event handler here.
    pub fn cursor_pos_event(&mut self, io: &mut Io, x: f64, y: f64) -> bool {
        let pos = [x as f32, y as f32];
        self.last_valid_mouse_pos = pos;
        io.add_mouse_pos_event(pos[0], pos[1]);
        true
    }

    /// Queues a button change from raw GLFW button/action codes.
    /// Buttons past the tracked five and actions other than
    /// press/release are unhandled.
    pub fn mouse_button_event(&mut self, io: &mut Io, button: i32, action: i32, _mods: i32) -> bool {
        let Some(button) = keymap::map_mouse_button(button) else {
            return false;
        };
        let down = match action {
            ffi::PRESS => true,
            ffi::RELEASE => false,
            _ => return false,
        };
        io.add_mouse_button_event(button, down);
        true
    }

    /// Queues wheel motion; one GLFW offset unit is one line.
    pub fn scroll_event(&mut self, io: &mut Io, x: f64, y: f64) -> bool {
        io.add_mouse_wheel_event(x as f32, y as f32);
        true
    }

    /// Queues a key change from raw GLFW codes. Repeats are recognized
    /// but not queued (key repeat is synthesized downstream); unknown
    /// key codes are unhandled.
    pub fn key_event(&mut self, io: &mut Io, key: i32, _scancode: i32, action: i32, _mods: i32) -> bool {
        let down = match action {
            ffi::PRESS => true,
            ffi::RELEASE => false,
            ffi::REPEAT => return true,
            _ => return false,
        };
        let Some(key) = keymap::map_key_code(key) else {
            return false;
        };
        io.add_key_event(key, down);
        true
    }

    /// Queues a text character; codepoints outside Unicode scalar range
    /// are unhandled.
    pub fn char_event(&mut self, io: &mut Io, codepoint: u32) -> bool {
        let Some(c) = char::from_u32(codepoint) else {
            return false;
        };
        io.add_input_character(c);
        true
    }

    /// Queues pointer enter/leave. Leaving parks the pointer at the
    /// invalid position; entering restores the last position seen.
    pub fn cursor_enter_event(&mut self, io: &mut Io, entered: bool) -> bool {
        if entered {
            if self.last_valid_mouse_pos != MOUSE_POS_INVALID {
                io.add_mouse_pos_event(self.last_valid_mouse_pos[0], self.last_valid_mouse_pos[1]);
            }
        } else {
            io.add_mouse_pos_event(MOUSE_POS_INVALID[0], MOUSE_POS_INVALID[1]);
        }
        true
    }

    /// Queues a window focus change.
    pub fn window_focus_event(&mut self, io: &mut Io, focused: bool) -> bool {
        io.add_focus_event(focused);
        true
    }

    /// Notes a monitor configuration change; the next
    /// [`new_frame`](Self::new_frame) re-reads the content scale.
    pub fn monitor_event(&mut self) -> bool {
        self.monitor_changed = true;
        true
    }

    /// Feeds one polled [`glfw::WindowEvent`] through the matching
    /// handler. Returns `false` for event kinds that carry no input.
    pub fn handle_window_event(&mut self, io: &mut Io, event: &glfw::WindowEvent) -> bool {
        match *event {
            glfw::WindowEvent::CursorPos(x, y) => self.cursor_pos_event(io, x, y),
            glfw::WindowEvent::MouseButton(button, action, mods) => {
                self.mouse_button_event(io, button as c_int, action as c_int, mods.bits())
            }
            glfw::WindowEvent::Scroll(x, y) => self.scroll_event(io, x, y),
            glfw::WindowEvent::Key(key, scancode, action, mods) => {
                self.key_event(io, key as c_int, scancode, action as c_int, mods.bits())
            }
            glfw::WindowEvent::Char(c) => self.char_event(io, u32::from(c)),
            glfw::WindowEvent::CursorEnter(entered) => self.cursor_enter_event(io, entered),
            glfw::WindowEvent::Focus(focused) => self.window_focus_event(io, focused),
            _ => false,
        }
    }

    fn update_cursor(&mut self, io: &Io) {
        if io.config_flags.contains(ConfigFlags::NO_MOUSE_CURSOR_CHANGE) {
            return;
        }
        // SAFETY: window is live until shutdown per init contract.
        unsafe {
            if ffi::glfwGetInputMode(self.window, ffi::CURSOR) == ffi::CURSOR_DISABLED {
                return;
            }
            if io.mouse_draw_cursor {
                ffi::glfwSetInputMode(self.window, ffi::CURSOR, ffi::CURSOR_HIDDEN);
            } else {
                let shape = io.mouse_cursor();
                let cursor = self.cursors[shape.index()]
                    .or_else(|| self.cursors[MouseCursor::Arrow.index()])
                    .unwrap_or(std::ptr::null_mut());
                ffi::glfwSetCursor(self.window, cursor);
                ffi::glfwSetInputMode(self.window, ffi::CURSOR, ffi::CURSOR_NORMAL);
            }
        }
    }

    fn update_gamepads(&mut self, io: &mut Io) {
        if self.gamepad_mode == GamepadMode::Disabled
            || !io.config_flags.contains(ConfigFlags::NAV_ENABLE_GAMEPAD)
        {
            return;
        }
        let jid = match self.gamepad_mode {
            // SAFETY: joystick queries are valid on any id in range.
            GamepadMode::Auto => (ffi::JOYSTICK_1..=ffi::JOYSTICK_LAST)
                .find(|&jid| unsafe { ffi::glfwJoystickIsGamepad(jid) } == ffi::TRUE),
            GamepadMode::Joystick(id) => Some(id as c_int),
            GamepadMode::Disabled => unreachable!(),
        };
        let mut state = ffi::GLFWgamepadstate {
            buttons: [0; 15],
            axes: [0.0; 6],
        };
        let connected = jid.is_some_and(|jid| {
            // SAFETY: state is a valid out-pointer for the duration of
            // the call.
            unsafe { ffi::glfwGetGamepadState(jid, &mut state) == ffi::TRUE }
        });
        if !connected {
            io.backend_flags.remove(BackendFlags::HAS_GAMEPAD);
            return;
        }
        io.backend_flags.insert(BackendFlags::HAS_GAMEPAD);

        const BUTTONS: [(c_int, Key); 14] = [
            (ffi::GAMEPAD_BUTTON_START, Key::GamepadStart),
            (ffi::GAMEPAD_BUTTON_BACK, Key::GamepadBack),
            (ffi::GAMEPAD_BUTTON_X, Key::GamepadFaceLeft),
            (ffi::GAMEPAD_BUTTON_B, Key::GamepadFaceRight),
            (ffi::GAMEPAD_BUTTON_Y, Key::GamepadFaceUp),
            (ffi::GAMEPAD_BUTTON_A, Key::GamepadFaceDown),
            (ffi::GAMEPAD_BUTTON_DPAD_LEFT, Key::GamepadDpadLeft),
            (ffi::GAMEPAD_BUTTON_DPAD_RIGHT, Key::GamepadDpadRight),
            (ffi::GAMEPAD_BUTTON_DPAD_UP, Key::GamepadDpadUp),
            (ffi::GAMEPAD_BUTTON_DPAD_DOWN, Key::GamepadDpadDown),
            (ffi::GAMEPAD_BUTTON_LEFT_BUMPER, Key::GamepadL1),
            (ffi::GAMEPAD_BUTTON_RIGHT_BUMPER, Key::GamepadR1),
            (ffi::GAMEPAD_BUTTON_LEFT_THUMB, Key::GamepadL3),
            (ffi::GAMEPAD_BUTTON_RIGHT_THUMB, Key::GamepadR3),
        ];
        for (index, key) in BUTTONS {
            let down = state.buttons[index as usize] == 1;
            if io.key_down(key) != down {
                io.add_key_event(key, down);
            }
        }

        const AXES: [(c_int, Key, f32, f32); 10] = [
            (ffi::GAMEPAD_AXIS_LEFT_TRIGGER, Key::GamepadL2, -0.75, 1.0),
            (ffi::GAMEPAD_AXIS_RIGHT_TRIGGER, Key::GamepadR2, -0.75, 1.0),
            (ffi::GAMEPAD_AXIS_LEFT_X, Key::GamepadLStickLeft, -0.25, -1.0),
            (ffi::GAMEPAD_AXIS_LEFT_X, Key::GamepadLStickRight, 0.25, 1.0),
            (ffi::GAMEPAD_AXIS_LEFT_Y, Key::GamepadLStickUp, -0.25, -1.0),
            (ffi::GAMEPAD_AXIS_LEFT_Y, Key::GamepadLStickDown, 0.25, 1.0),
            (ffi::GAMEPAD_AXIS_RIGHT_X, Key::GamepadRStickLeft, -0.25, -1.0),
            (ffi::GAMEPAD_AXIS_RIGHT_X, Key::GamepadRStickRight, 0.25, 1.0),
            (ffi::GAMEPAD_AXIS_RIGHT_Y, Key::GamepadRStickUp, -0.25, -1.0),
            (ffi::GAMEPAD_AXIS_RIGHT_Y, Key::GamepadRStickDown, 0.25, 1.0),
        ];
        for (index, key, dead, full) in AXES {
            let value = ((state.axes[index as usize] - dead) / (full - dead)).clamp(0.0, 1.0);
            io.add_key_analog_event(key, value > 0.1, value);
        }
    }
}

impl PlatformBackend for GlfwPlatform {
    fn new_frame(&mut self, ctx: &mut Context) {
        Self::new_frame(self, ctx);
    }

    fn shutdown(&mut self, ctx: &mut Context) {
        Self::shutdown(self, ctx);
    }
}

impl Drop for GlfwPlatform {
    fn drop(&mut self) {
        if !self.detached {
            // Touching GLFW here would be unsound if the window is
            // already gone, so only the leak gets reported.
            log::warn!("GlfwPlatform dropped without shutdown; window callbacks left installed");
        }
    }
}

/// Clipboard backed by the GLFW window's clipboard functions.
struct GlfwClipboard {
    window: *mut ffi::GLFWwindow,
}

impl ClipboardBackend for GlfwClipboard {
    fn get(&mut self) -> Option<String> {
        // SAFETY: window outlives the backend per init contract, and the
        // context drops this clipboard at backend shutdown.
        let ptr = unsafe { ffi::glfwGetClipboardString(self.window) };
        if ptr.is_null() {
            return None;
        }
        // SAFETY: GLFW returns a NUL-terminated string valid until the
        // next clipboard call.
        let text = unsafe { CStr::from_ptr(ptr) };
        text.to_str().ok().map(str::to_owned)
    }

    fn set(&mut self, text: &str) {
        let Ok(text) = CString::new(text) else {
            return;
        };
        // SAFETY: as for get; GLFW copies the string before returning.
        unsafe { ffi::glfwSetClipboardString(self.window, text.as_ptr()) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Window-free construction for handler tests; everything that
    // needs a live window stays out of reach of the test by keeping
    // `installed_callbacks` false and never calling new_frame.
    fn detached_platform() -> GlfwPlatform {
        GlfwPlatform {
            window: std::ptr::null_mut(),
            client_api: ClientApi::Other,
            installed_callbacks: false,
            chain_all_windows: false,
            gamepad_mode: GamepadMode::default(),
            time: 0.0,
            last_valid_mouse_pos: MOUSE_POS_INVALID,
            monitor_changed: false,
            cursors: [None; MouseCursor::COUNT],
            detached: false,
        }
    }

    #[test]
    fn test_unknown_key_code_reports_unhandled() {
        let mut platform = detached_platform();
        let mut io = Io::new();
        assert!(!platform.key_event(&mut io, ffi::KEY_UNKNOWN, 0, ffi::PRESS, 0));
        assert_eq!(io.queued_events(), 0);
    }

    #[test]
    fn test_key_repeat_is_recognized_but_not_queued() {
        let mut platform = detached_platform();
        let mut io = Io::new();
        assert!(platform.key_event(&mut io, ffi::KEY_W, 0, ffi::REPEAT, 0));
        assert_eq!(io.queued_events(), 0);
        assert!(platform.key_event(&mut io, ffi::KEY_W, 0, ffi::PRESS, 0));
        assert_eq!(io.queued_events(), 1);
    }

    #[test]
    fn test_mouse_button_out_of_range_reports_unhandled() {
        let mut platform = detached_platform();
        let mut io = Io::new();
        assert!(!platform.mouse_button_event(&mut io, 7, ffi::PRESS, 0));
        assert!(platform.mouse_button_event(&mut io, 0, ffi::PRESS, 0));
        assert_eq!(io.queued_events(), 1);
    }

    #[test]
    fn test_cursor_leave_parks_pointer_and_enter_restores_it() {
        let mut platform = detached_platform();
        let mut ctx = Context::create();
        ctx.io_mut().display_size = [640.0, 480.0];

        platform.cursor_pos_event(ctx.io_mut(), 40.0, 60.0);
        platform.cursor_enter_event(ctx.io_mut(), false);
        ctx.new_frame();
        assert_eq!(ctx.io().mouse_pos(), MOUSE_POS_INVALID);

        platform.cursor_enter_event(ctx.io_mut(), true);
        ctx.new_frame();
        assert_eq!(ctx.io().mouse_pos(), [40.0, 60.0]);
    }

    #[test]
    fn test_invalid_codepoint_reports_unhandled() {
        let mut platform = detached_platform();
        let mut io = Io::new();
        assert!(!platform.char_event(&mut io, 0xD800));
        assert!(platform.char_event(&mut io, u32::from('g')));
    }

    #[test]
    fn test_polled_event_translation_covers_input_kinds() {
        let mut platform = detached_platform();
        let mut io = Io::new();
        let handled = platform.handle_window_event(
            &mut io,
            &glfw::WindowEvent::Key(glfw::Key::Escape, 9, glfw::Action::Press, glfw::Modifiers::empty()),
        );
        assert!(handled);
        assert!(platform.handle_window_event(&mut io, &glfw::WindowEvent::Scroll(0.0, -1.0)));
        assert!(!platform.handle_window_event(&mut io, &glfw::WindowEvent::Refresh));
        assert!(!platform.handle_window_event(&mut io, &glfw::WindowEvent::Pos(10, 10)));
        assert_eq!(io.queued_events(), 2);
    }

    #[test]
    fn test_chain_toggle_without_callbacks_only_records_intent() {
        let mut platform = detached_platform();
        platform.set_callbacks_chain_for_all_windows(true);
        assert!(platform.chain_all_windows);
    }
}
