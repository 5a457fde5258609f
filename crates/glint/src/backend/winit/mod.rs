//! winit platform backend
//!
//! Unlike the GLFW backend this one never holds a window handle: winit
//! applications own their `Window` inside an `ApplicationHandler`, so
//! every call that needs the window borrows it. The expected frame flow
//! is `update_delta_time` when events start, `handle_window_event` (or
//! [`WinitPlatform::handle_event`]) per event, `prepare_frame` before
//! building the frame and `prepare_render` right before drawing.

mod keymap;

use std::cmp::Ordering;
use std::time::Instant;

use winit::dpi::{LogicalPosition, LogicalSize};
use winit::error::ExternalError;
use winit::event::{ElementState, Event, MouseScrollDelta, TouchPhase, WindowEvent};
use winit::platform::modifier_supplement::KeyEventExtModifierSupplement;
use winit::window::Window;

use crate::backend::PlatformBackend;
use crate::clipboard::LocalClipboard;
use crate::context::Context;
use crate::io::{BackendFlags, ConfigFlags, Io, MOUSE_POS_INVALID};
use crate::keys::MouseCursor;

/// DPI factor handling mode.
///
/// With a mode other than [`Default`](HiDpiMode::Default) the engine and
/// winit use different logical coordinate spaces; the `scale_*` helpers
/// convert between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HiDpiMode {
    /// Use the winit scale factor unchanged.
    Default,
    /// Round the winit scale factor to an integer, trading exact sizing
    /// for crisp glyphs on fractional-DPI displays.
    Rounded,
    /// Ignore winit and force this factor.
    Locked(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ActiveHiDpiMode {
    Default,
    Rounded,
    Locked,
}

impl HiDpiMode {
    fn apply(self, scale_factor: f64) -> (ActiveHiDpiMode, f64) {
        match self {
            Self::Default => (ActiveHiDpiMode::Default, scale_factor),
            Self::Rounded => (ActiveHiDpiMode::Rounded, scale_factor.round()),
            Self::Locked(value) => (ActiveHiDpiMode::Locked, value),
        }
    }
}

/// Cursor state last pushed to the window, kept to skip redundant
/// platform calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CursorSettings {
    cursor: MouseCursor,
    draw_cursor: bool,
}

impl CursorSettings {
    fn apply(self, window: &Window) {
        if self.draw_cursor {
            window.set_cursor_visible(false);
        } else {
            window.set_cursor_visible(true);
            window.set_cursor(keymap::cursor_icon(self.cursor));
        }
    }
}

/// Platform backend for winit windows.
#[derive(Debug)]
pub struct WinitPlatform {
    hidpi_mode: ActiveHiDpiMode,
    hidpi_factor: f64,
    cursor_cache: Option<CursorSettings>,
    last_frame: Instant,
    last_valid_mouse_pos: [f32; 2],
}

impl WinitPlatform {
    /// Attaches to a window: reports capabilities, installs an
    /// in-process clipboard and seeds display geometry from the
    /// window's current size and scale factor.
    pub fn attach(window: &Window, hidpi_mode: HiDpiMode, ctx: &mut Context) -> Self {
        let (hidpi_mode, hidpi_factor) = hidpi_mode.apply(window.scale_factor());
        let io = ctx.io_mut();
        io.backend_flags
            .insert(BackendFlags::HAS_MOUSE_CURSORS | BackendFlags::HAS_SET_MOUSE_POS);
        io.set_backend_platform_name(Some("glint-winit".to_owned()));
        io.display_framebuffer_scale = [hidpi_factor as f32, hidpi_factor as f32];

        let platform = Self {
            hidpi_mode,
            hidpi_factor,
            cursor_cache: None,
            last_frame: Instant::now(),
            last_valid_mouse_pos: MOUSE_POS_INVALID,
        };
        let logical_size = window.inner_size().to_logical(hidpi_factor);
        let logical_size = platform.scale_size_from_winit(window, logical_size);
        io.display_size = [logical_size.width as f32, logical_size.height as f32];

        ctx.set_clipboard_backend(Box::new(LocalClipboard::default()));
        log::info!("winit platform backend attached, scale factor {hidpi_factor}");
        platform
    }

    /// DPI factor in effect; differs from winit's under
    /// [`HiDpiMode::Rounded`] and [`HiDpiMode::Locked`].
    #[must_use]
    pub const fn hidpi_factor(&self) -> f64 {
        self.hidpi_factor
    }

    /// Converts a winit logical size into the engine's logical space.
    #[must_use]
    pub fn scale_size_from_winit(
        &self,
        window: &Window,
        logical_size: LogicalSize<f64>,
    ) -> LogicalSize<f64> {
        match self.hidpi_mode {
            ActiveHiDpiMode::Default => logical_size,
            _ => logical_size
                .to_physical::<f64>(window.scale_factor())
                .to_logical(self.hidpi_factor),
        }
    }

    /// Converts a winit logical position into the engine's logical
    /// space.
    #[must_use]
    pub fn scale_pos_from_winit(
        &self,
        window: &Window,
        logical_pos: LogicalPosition<f64>,
    ) -> LogicalPosition<f64> {
        match self.hidpi_mode {
            ActiveHiDpiMode::Default => logical_pos,
            _ => logical_pos
                .to_physical::<f64>(window.scale_factor())
                .to_logical(self.hidpi_factor),
        }
    }

    /// Converts an engine logical position into winit's logical space,
    /// for calls back into winit such as pointer warping.
    #[must_use]
    pub fn scale_pos_for_winit(
        &self,
        window: &Window,
        logical_pos: LogicalPosition<f64>,
    ) -> LogicalPosition<f64> {
        match self.hidpi_mode {
            ActiveHiDpiMode::Default => logical_pos,
            _ => logical_pos
                .to_physical::<f64>(self.hidpi_factor)
                .to_logical(window.scale_factor()),
        }
    }

    /// Advances the frame clock; call once when a new event batch
    /// begins.
    pub fn update_delta_time(&mut self, io: &mut Io) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame).as_secs_f32();
        if delta > 0.0 {
            io.delta_time = delta;
        }
        self.last_frame = now;
    }

    /// Routes an event-loop event to
    /// [`handle_window_event`](Self::handle_window_event) when it
    /// belongs to `window`. Returns whether the event fed the input
    /// queue.
    pub fn handle_event<T>(&mut self, io: &mut Io, window: &Window, event: &Event<T>) -> bool {
        match event {
            Event::WindowEvent { window_id, event } if *window_id == window.id() => {
                self.handle_window_event(io, window, event)
            }
            _ => false,
        }
    }

    /// Translates one window event. Returns `true` when the event was
    /// recognized and queued; geometry bookkeeping (resize, scale
    /// change) is applied but reported as `false` because it feeds no
    /// input.
    pub fn handle_window_event(&mut self, io: &mut Io, window: &Window, event: &WindowEvent) -> bool {
        match *event {
            WindowEvent::Resized(physical_size) => {
                let logical_size = physical_size.to_logical(window.scale_factor());
                let logical_size = self.scale_size_from_winit(window, logical_size);
                io.display_size = [logical_size.width as f32, logical_size.height as f32];
                false
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let hidpi_factor = match self.hidpi_mode {
                    ActiveHiDpiMode::Default => scale_factor,
                    ActiveHiDpiMode::Rounded => scale_factor.round(),
                    ActiveHiDpiMode::Locked => return false,
                };
                // The cached position is in the old scale; requeue it
                // in the new one before it goes stale.
                let [x, y] = io.mouse_pos();
                if x.is_finite() && y.is_finite() {
                    let rescale = (hidpi_factor / self.hidpi_factor) as f32;
                    io.add_mouse_pos_event(x * rescale, y * rescale);
                }
                self.hidpi_factor = hidpi_factor;
                io.display_framebuffer_scale = [hidpi_factor as f32, hidpi_factor as f32];
                let logical_size = window.inner_size().to_logical(scale_factor);
                let logical_size = self.scale_size_from_winit(window, logical_size);
                io.display_size = [logical_size.width as f32, logical_size.height as f32];
                false
            }
            WindowEvent::KeyboardInput { ref event, .. } => {
                if let Some(text) = &event.text {
                    for c in text.chars() {
                        io.add_input_character(c);
                    }
                }
                let pressed = event.state == ElementState::Pressed;
                match keymap::map_key(&event.key_without_modifiers(), event.location) {
                    Some(key) => {
                        io.add_key_event(key, pressed);
                        true
                    }
                    None => event.text.is_some(),
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = position.to_logical(window.scale_factor());
                let position = self.scale_pos_from_winit(window, position);
                let pos = [position.x as f32, position.y as f32];
                self.last_valid_mouse_pos = pos;
                io.add_mouse_pos_event(pos[0], pos[1]);
                true
            }
            WindowEvent::CursorLeft { .. } => {
                io.add_mouse_pos_event(MOUSE_POS_INVALID[0], MOUSE_POS_INVALID[1]);
                true
            }
            WindowEvent::CursorEntered { .. } => {
                if self.last_valid_mouse_pos != MOUSE_POS_INVALID {
                    io.add_mouse_pos_event(
                        self.last_valid_mouse_pos[0],
                        self.last_valid_mouse_pos[1],
                    );
                }
                true
            }
            WindowEvent::MouseWheel {
                delta,
                phase: TouchPhase::Moved,
                ..
            } => {
                let (h, v) = normalize_wheel_delta(delta, self.hidpi_factor);
                io.add_mouse_wheel_event(h, v);
                true
            }
            WindowEvent::MouseInput { state, button, .. } => {
                match keymap::map_mouse_button(button) {
                    Some(button) => {
                        io.add_mouse_button_event(button, state == ElementState::Pressed);
                        true
                    }
                    None => false,
                }
            }
            WindowEvent::Focused(focused) => {
                io.add_focus_event(focused);
                true
            }
            _ => false,
        }
    }

    /// Applies pending engine requests that need the window, currently
    /// pointer warping. Call once per frame before `Context::new_frame`.
    ///
    /// # Errors
    ///
    /// Forwards the platform error when the pointer cannot be moved.
    pub fn prepare_frame(&self, io: &mut Io, window: &Window) -> Result<(), ExternalError> {
        if let Some([x, y]) = io.take_mouse_pos_request() {
            let logical_pos = self.scale_pos_for_winit(
                window,
                LogicalPosition::new(f64::from(x), f64::from(y)),
            );
            window.set_cursor_position(logical_pos)?;
        }
        Ok(())
    }

    /// Pushes the cursor shape the engine wants onto the window; call
    /// right before rendering. Redundant updates are skipped through a
    /// cache.
    pub fn prepare_render(&mut self, io: &Io, window: &Window) {
        if io.config_flags.contains(ConfigFlags::NO_MOUSE_CURSOR_CHANGE) {
            return;
        }
        let cursor = CursorSettings {
            cursor: io.mouse_cursor(),
            draw_cursor: io.mouse_draw_cursor,
        };
        if self.cursor_cache != Some(cursor) {
            cursor.apply(window);
            self.cursor_cache = Some(cursor);
        }
    }

    /// Clears the backend identity from the context. The window itself
    /// holds no state to restore.
    pub fn shutdown(&mut self, ctx: &mut Context) {
        let io = ctx.io_mut();
        io.backend_flags
            .remove(BackendFlags::HAS_MOUSE_CURSORS | BackendFlags::HAS_SET_MOUSE_POS);
        io.set_backend_platform_name(None);
        ctx.clear_clipboard_backend();
        log::debug!("winit platform backend detached");
    }
}

impl PlatformBackend for WinitPlatform {
    fn new_frame(&mut self, ctx: &mut Context) {
        self.update_delta_time(ctx.io_mut());
    }

    fn shutdown(&mut self, ctx: &mut Context) {
        Self::shutdown(self, ctx);
    }
}

/// Normalizes a winit scroll delta to line units: line deltas pass
/// through, pixel deltas collapse to one line per event in the sign of
/// the motion.
fn normalize_wheel_delta(delta: MouseScrollDelta, hidpi_factor: f64) -> (f32, f32) {
    match delta {
        MouseScrollDelta::LineDelta(h, v) => (h, v),
        MouseScrollDelta::PixelDelta(pos) => {
            let pos = pos.to_logical::<f64>(hidpi_factor);
            let step = |value: f64| -> f32 {
                match value.partial_cmp(&0.0) {
                    Some(Ordering::Greater) => 1.0,
                    Some(Ordering::Less) => -1.0,
                    _ => 0.0,
                }
            };
            (step(pos.x), step(pos.y))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn test_hidpi_mode_resolution() {
        assert_eq!(HiDpiMode::Default.apply(1.25), (ActiveHiDpiMode::Default, 1.25));
        assert_eq!(HiDpiMode::Rounded.apply(1.25), (ActiveHiDpiMode::Rounded, 1.0));
        assert_eq!(HiDpiMode::Rounded.apply(1.75), (ActiveHiDpiMode::Rounded, 2.0));
        assert_eq!(HiDpiMode::Locked(1.0).apply(2.6), (ActiveHiDpiMode::Locked, 1.0));
    }

    #[test]
    fn test_line_wheel_delta_passes_through() {
        let (h, v) = normalize_wheel_delta(MouseScrollDelta::LineDelta(2.0, -3.5), 1.0);
        assert_eq!((h, v), (2.0, -3.5));
    }

    #[test]
    fn test_pixel_wheel_delta_collapses_to_signs() {
        let delta = MouseScrollDelta::PixelDelta(PhysicalPosition::new(-14.0, 57.0));
        let (h, v) = normalize_wheel_delta(delta, 1.0);
        assert_eq!((h, v), (-1.0, 1.0));

        let delta = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 0.0));
        assert_eq!(normalize_wheel_delta(delta, 2.0), (0.0, 0.0));
    }
}
