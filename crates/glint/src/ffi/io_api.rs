//! Input/output entry points: frame inputs, event intake and clipboard
//! text.
//!
//! The `add_*` intake functions return `bool` wherever an argument can
//! name a value outside the recognized set; a `false` return queues
//! nothing.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_uint};

use crate::context::Context;
use crate::io::{BackendFlags, ConfigFlags};
use crate::keys::{Key, MouseButton};

use super::abort_on_panic;

pub(super) const SYMBOLS: &[&str] = &[
    "glint_io_set_display_size",
    "glint_io_set_framebuffer_scale",
    "glint_io_set_delta_time",
    "glint_io_config_flags",
    "glint_io_set_config_flags",
    "glint_io_backend_flags",
    "glint_io_set_backend_flags",
    "glint_io_add_mouse_pos_event",
    "glint_io_add_mouse_button_event",
    "glint_io_add_mouse_wheel_event",
    "glint_io_add_key_event",
    "glint_io_add_key_analog_event",
    "glint_io_add_input_character",
    "glint_io_add_focus_event",
    "glint_io_clipboard_text",
    "glint_io_set_clipboard_text",
];

/// Sets the display size in screen coordinates.
#[no_mangle]
pub unsafe extern "C" fn glint_io_set_display_size(ctx: *mut Context, width: f32, height: f32) {
    abort_on_panic("glint_io_set_display_size", || {
        unsafe { &mut *ctx }.io_mut().display_size = [width, height];
    });
}

/// Sets framebuffer pixels per screen coordinate.
#[no_mangle]
pub unsafe extern "C" fn glint_io_set_framebuffer_scale(ctx: *mut Context, x: f32, y: f32) {
    abort_on_panic("glint_io_set_framebuffer_scale", || {
        unsafe { &mut *ctx }.io_mut().display_framebuffer_scale = [x, y];
    });
}

/// Sets seconds elapsed since the previous frame.
#[no_mangle]
pub unsafe extern "C" fn glint_io_set_delta_time(ctx: *mut Context, seconds: f32) {
    abort_on_panic("glint_io_set_delta_time", || {
        unsafe { &mut *ctx }.io_mut().delta_time = seconds;
    });
}

/// Current behavior switches as a bit set.
#[no_mangle]
pub unsafe extern "C" fn glint_io_config_flags(ctx: *const Context) -> u32 {
    abort_on_panic("glint_io_config_flags", || {
        unsafe { &*ctx }.io().config_flags.bits()
    })
}

/// Replaces the behavior switches; unknown bits are dropped.
#[no_mangle]
pub unsafe extern "C" fn glint_io_set_config_flags(ctx: *mut Context, flags: u32) {
    abort_on_panic("glint_io_set_config_flags", || {
        unsafe { &mut *ctx }.io_mut().config_flags = ConfigFlags::from_bits_truncate(flags);
    });
}

/// Capabilities advertised by the attached backends.
#[no_mangle]
pub unsafe extern "C" fn glint_io_backend_flags(ctx: *const Context) -> u32 {
    abort_on_panic("glint_io_backend_flags", || {
        unsafe { &*ctx }.io().backend_flags.bits()
    })
}

/// Replaces the backend capability flags; for callers bringing their own
/// platform or renderer instead of the compiled-in ones. Unknown bits
/// are dropped.
#[no_mangle]
pub unsafe extern "C" fn glint_io_set_backend_flags(ctx: *mut Context, flags: u32) {
    abort_on_panic("glint_io_set_backend_flags", || {
        unsafe { &mut *ctx }.io_mut().backend_flags = BackendFlags::from_bits_truncate(flags);
    });
}

/// Queues a pointer move in screen coordinates.
#[no_mangle]
pub unsafe extern "C" fn glint_io_add_mouse_pos_event(ctx: *mut Context, x: f32, y: f32) {
    abort_on_panic("glint_io_add_mouse_pos_event", || {
        unsafe { &mut *ctx }.io_mut().add_mouse_pos_event(x, y);
    });
}

/// Queues a button change; false when `button` is not a known index.
#[no_mangle]
pub unsafe extern "C" fn glint_io_add_mouse_button_event(
    ctx: *mut Context,
    button: c_uint,
    down: bool,
) -> bool {
    abort_on_panic("glint_io_add_mouse_button_event", || {
        match MouseButton::from_index(button as usize) {
            Some(button) => {
                unsafe { &mut *ctx }.io_mut().add_mouse_button_event(button, down);
                true
            }
            None => false,
        }
    })
}

/// Queues wheel travel; one unit is one line.
#[no_mangle]
pub unsafe extern "C" fn glint_io_add_mouse_wheel_event(ctx: *mut Context, h: f32, v: f32) {
    abort_on_panic("glint_io_add_mouse_wheel_event", || {
        unsafe { &mut *ctx }.io_mut().add_mouse_wheel_event(h, v);
    });
}

/// Queues a key change; false when `key` is not a known index.
#[no_mangle]
pub unsafe extern "C" fn glint_io_add_key_event(ctx: *mut Context, key: c_uint, down: bool) -> bool {
    abort_on_panic("glint_io_add_key_event", || {
        match Key::from_index(key as usize) {
            Some(key) => {
                unsafe { &mut *ctx }.io_mut().add_key_event(key, down);
                true
            }
            None => false,
        }
    })
}

/// Queues a key change with an analog magnitude in `0.0..=1.0`; false
/// when `key` is not a known index.
#[no_mangle]
pub unsafe extern "C" fn glint_io_add_key_analog_event(
    ctx: *mut Context,
    key: c_uint,
    down: bool,
    value: f32,
) -> bool {
    abort_on_panic("glint_io_add_key_analog_event", || {
        match Key::from_index(key as usize) {
            Some(key) => {
                unsafe { &mut *ctx }.io_mut().add_key_analog_event(key, down, value);
                true
            }
            None => false,
        }
    })
}

/// Queues a text character; false when `codepoint` is not a Unicode
/// scalar value.
#[no_mangle]
pub unsafe extern "C" fn glint_io_add_input_character(ctx: *mut Context, codepoint: u32) -> bool {
    abort_on_panic("glint_io_add_input_character", || {
        match char::from_u32(codepoint) {
            Some(c) => {
                unsafe { &mut *ctx }.io_mut().add_input_character(c);
                true
            }
            None => false,
        }
    })
}

/// Queues a window focus change.
#[no_mangle]
pub unsafe extern "C" fn glint_io_add_focus_event(ctx: *mut Context, focused: bool) {
    abort_on_panic("glint_io_add_focus_event", || {
        unsafe { &mut *ctx }.io_mut().add_focus_event(focused);
    });
}

/// Current clipboard text, or null when no platform backend provides
/// one. The pointer stays valid until the next call to this function on
/// the same context, or until the context is destroyed.
#[no_mangle]
pub unsafe extern "C" fn glint_io_clipboard_text(ctx: *mut Context) -> *const c_char {
    abort_on_panic("glint_io_clipboard_text", || {
        let ctx = unsafe { &mut *ctx };
        ctx.clipboard_cache = ctx
            .clipboard_text()
            .and_then(|text| CString::new(text).ok());
        ctx.clipboard_cache
            .as_deref()
            .map_or(std::ptr::null(), CStr::as_ptr)
    })
}

/// Writes the clipboard through the installed backend. Null pointers
/// and non-UTF-8 bytes are ignored.
#[no_mangle]
pub unsafe extern "C" fn glint_io_set_clipboard_text(ctx: *mut Context, text: *const c_char) {
    abort_on_panic("glint_io_set_clipboard_text", || {
        if text.is_null() {
            return;
        }
        let text = unsafe { CStr::from_ptr(text) };
        if let Ok(text) = text.to_str() {
            unsafe { &mut *ctx }.set_clipboard_text(text);
        } else {
            log::warn!("clipboard text at the C boundary is not UTF-8; ignored");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::super::context_api::{glint_context_create, glint_context_destroy};
    use super::*;

    #[test]
    fn test_intake_rejects_out_of_range_values() {
        let ctx = glint_context_create();
        unsafe {
            assert!(!glint_io_add_mouse_button_event(ctx, 99, true));
            assert!(!glint_io_add_key_event(ctx, 9_999, true));
            assert!(!glint_io_add_key_analog_event(ctx, 9_999, true, 0.5));
            // Unpaired surrogate.
            assert!(!glint_io_add_input_character(ctx, 0xD800));
            assert_eq!((*ctx).io().queued_events(), 0);

            assert!(glint_io_add_mouse_button_event(ctx, 0, true));
            assert!(glint_io_add_key_event(ctx, Key::A.index() as c_uint, true));
            assert!(glint_io_add_input_character(ctx, u32::from('x')));
            assert_eq!((*ctx).io().queued_events(), 3);

            glint_context_destroy(ctx);
        }
    }

    #[test]
    fn test_flags_round_trip_as_bits() {
        let ctx = glint_context_create();
        unsafe {
            let bits = (ConfigFlags::NAV_ENABLE_KEYBOARD | ConfigFlags::NO_MOUSE).bits();
            glint_io_set_config_flags(ctx, bits | 0x8000_0000);
            assert_eq!(glint_io_config_flags(ctx), bits);

            glint_io_set_backend_flags(ctx, BackendFlags::HAS_GAMEPAD.bits() | 0x8000_0000);
            assert_eq!(glint_io_backend_flags(ctx), BackendFlags::HAS_GAMEPAD.bits());

            glint_context_destroy(ctx);
        }
    }

    #[test]
    fn test_frame_inputs_land_in_io() {
        let ctx = glint_context_create();
        unsafe {
            glint_io_set_display_size(ctx, 800.0, 600.0);
            glint_io_set_framebuffer_scale(ctx, 2.0, 2.0);
            glint_io_set_delta_time(ctx, 0.25);
            assert_eq!((*ctx).io().display_size, [800.0, 600.0]);
            assert_eq!((*ctx).io().display_framebuffer_scale, [2.0, 2.0]);
            assert_eq!((*ctx).io().delta_time, 0.25);
            glint_context_destroy(ctx);
        }
    }

    #[test]
    fn test_clipboard_without_backend_is_null_and_ignores_writes() {
        let ctx = glint_context_create();
        unsafe {
            assert!(glint_io_clipboard_text(ctx).is_null());
            glint_io_set_clipboard_text(ctx, std::ptr::null());
            glint_io_set_clipboard_text(ctx, c"hello".as_ptr());
            glint_context_destroy(ctx);
        }
    }

    #[test]
    fn test_clipboard_round_trip_with_local_backend() {
        let ctx = glint_context_create();
        unsafe {
            (*ctx).set_clipboard_backend(Box::new(crate::clipboard::LocalClipboard::default()));
            glint_io_set_clipboard_text(ctx, c"copied".as_ptr());
            let text = glint_io_clipboard_text(ctx);
            assert!(!text.is_null());
            assert_eq!(CStr::from_ptr(text).to_str().unwrap(), "copied");
            glint_context_destroy(ctx);
        }
    }
}
