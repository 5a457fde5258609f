//! Context lifecycle, frame loop and identity entry points.

use std::ffi::CString;
use std::os::raw::c_char;
use std::sync::OnceLock;

use crate::context::Context;
use crate::draw::DrawData;
use crate::variant::{self, BuildVariant};

use super::abort_on_panic;

pub(super) const SYMBOLS: &[&str] = &[
    "glint_context_create",
    "glint_context_destroy",
    "glint_new_frame",
    "glint_render",
    "glint_get_draw_data",
    "glint_frame_count",
    "glint_want_capture_mouse",
    "glint_want_capture_keyboard",
    "glint_want_text_input",
    "glint_version_string",
    "glint_variant_label",
];

/// Creates a session and returns its handle. Release it with
/// `glint_context_destroy`.
#[no_mangle]
pub extern "C" fn glint_context_create() -> *mut Context {
    abort_on_panic("glint_context_create", || {
        Box::into_raw(Box::new(Context::create()))
    })
}

/// Destroys a session. Backends still parked on it are dropped with it,
/// so a parked renderer needs its graphics context current here, as it
/// would for its own shutdown.
#[no_mangle]
pub unsafe extern "C" fn glint_context_destroy(ctx: *mut Context) {
    abort_on_panic("glint_context_destroy", || {
        if !ctx.is_null() {
            drop(unsafe { Box::from_raw(ctx) });
        }
    });
}

/// Begins a frame: drains queued input and resets the draw lists.
#[no_mangle]
pub unsafe extern "C" fn glint_new_frame(ctx: *mut Context) {
    abort_on_panic("glint_new_frame", || unsafe { &mut *ctx }.new_frame());
}

/// Seals the frame; fetch the result with `glint_get_draw_data`.
#[no_mangle]
pub unsafe extern "C" fn glint_render(ctx: *mut Context) {
    abort_on_panic("glint_render", || {
        let _ = unsafe { &mut *ctx }.render();
    });
}

/// The most recently sealed frame. The pointer stays valid until the
/// next `glint_new_frame` or the context is destroyed; its `valid`
/// field is false between new-frame and render.
#[no_mangle]
pub unsafe extern "C" fn glint_get_draw_data(ctx: *const Context) -> *const DrawData {
    abort_on_panic("glint_get_draw_data", || {
        let ctx = unsafe { &*ctx };
        std::ptr::from_ref(ctx.draw_data())
    })
}

/// Frames begun on this context since creation.
#[no_mangle]
pub unsafe extern "C" fn glint_frame_count(ctx: *const Context) -> u64 {
    abort_on_panic("glint_frame_count", || unsafe { &*ctx }.frame_count())
}

/// Whether the UI claims mouse events this frame.
#[no_mangle]
pub unsafe extern "C" fn glint_want_capture_mouse(ctx: *const Context) -> bool {
    abort_on_panic("glint_want_capture_mouse", || {
        unsafe { &*ctx }.io().want_capture_mouse()
    })
}

/// Whether the UI claims keyboard events this frame.
#[no_mangle]
pub unsafe extern "C" fn glint_want_capture_keyboard(ctx: *const Context) -> bool {
    abort_on_panic("glint_want_capture_keyboard", || {
        unsafe { &*ctx }.io().want_capture_keyboard()
    })
}

/// Whether a text-entry field is active.
#[no_mangle]
pub unsafe extern "C" fn glint_want_text_input(ctx: *const Context) -> bool {
    abort_on_panic("glint_want_text_input", || {
        unsafe { &*ctx }.io().want_text_input()
    })
}

/// Version-and-variant identity, e.g. `glint 0.1.0 (docking)`. The
/// pointer is static for the life of the process.
#[no_mangle]
pub extern "C" fn glint_version_string() -> *const c_char {
    static VERSION: OnceLock<CString> = OnceLock::new();
    abort_on_panic("glint_version_string", || {
        VERSION
            .get_or_init(|| CString::new(variant::version_string()).unwrap_or_default())
            .as_ptr()
    })
}

/// Variant tag alone, e.g. `vanilla`. Static for the life of the
/// process.
#[no_mangle]
pub extern "C" fn glint_variant_label() -> *const c_char {
    static LABEL: OnceLock<CString> = OnceLock::new();
    abort_on_panic("glint_variant_label", || {
        LABEL
            .get_or_init(|| CString::new(BuildVariant::current().label()).unwrap_or_default())
            .as_ptr()
    })
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;

    use super::*;

    #[test]
    fn test_context_round_trip_through_raw_handles() {
        let ctx = glint_context_create();
        assert!(!ctx.is_null());
        unsafe {
            (*ctx).io_mut().display_size = [640.0, 480.0];
            assert_eq!(glint_frame_count(ctx), 0);

            glint_new_frame(ctx);
            glint_render(ctx);
            assert_eq!(glint_frame_count(ctx), 1);

            let draw_data = glint_get_draw_data(ctx);
            assert!((*draw_data).valid);
            assert_eq!((*draw_data).display_size, [640.0, 480.0]);

            glint_context_destroy(ctx);
        }
    }

    #[test]
    fn test_destroy_tolerates_null() {
        unsafe { glint_context_destroy(std::ptr::null_mut()) };
    }

    #[test]
    fn test_identity_strings_are_stable() {
        let first = glint_version_string();
        let second = glint_version_string();
        assert_eq!(first, second);

        let version = unsafe { CStr::from_ptr(first) }.to_str().unwrap();
        assert!(version.contains(variant::VERSION));

        let label = unsafe { CStr::from_ptr(glint_variant_label()) }.to_str().unwrap();
        assert!(version.contains(label));
    }

    #[test]
    fn test_capture_queries_follow_io_state() {
        let ctx = glint_context_create();
        unsafe {
            assert!(!glint_want_capture_mouse(ctx));
            assert!(!glint_want_capture_keyboard(ctx));

            (*ctx).io_mut().display_size = [100.0, 100.0];
            (*ctx)
                .io_mut()
                .add_mouse_button_event(crate::keys::MouseButton::Left, true);
            glint_new_frame(ctx);
            assert!(glint_want_capture_mouse(ctx));

            (*ctx).io_mut().set_want_text_input(true);
            glint_new_frame(ctx);
            assert!(glint_want_capture_keyboard(ctx));
            assert!(glint_want_text_input(ctx));

            glint_context_destroy(ctx);
        }
    }
}
