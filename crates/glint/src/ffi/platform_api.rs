//! GLFW platform backend entry points.
//!
//! The init functions construct a [`GlfwPlatform`] and park it on the
//! context, so C callers keep no backend pointer of their own. The
//! per-event set mirrors the backend's handlers for applications that
//! forward GLFW callbacks manually instead of installing ours; each
//! returns whether the backend recognized the event.

use std::os::raw::{c_int, c_uint};

use glfw::ffi::GLFWwindow;

use crate::backend::glfw::{ClientApi, GamepadMode, GlfwPlatform};
use crate::context::Context;

use super::abort_on_panic;

pub(super) const SYMBOLS: &[&str] = &[
    "glint_glfw_init_for_opengl",
    "glint_glfw_init_for_vulkan",
    "glint_glfw_init_for_other",
    "glint_glfw_shutdown",
    "glint_glfw_new_frame",
    "glint_glfw_install_callbacks",
    "glint_glfw_restore_callbacks",
    "glint_glfw_set_callbacks_chain_for_all_windows",
    "glint_glfw_set_gamepad_mode",
    "glint_glfw_cursor_pos_event",
    "glint_glfw_mouse_button_event",
    "glint_glfw_scroll_event",
    "glint_glfw_key_event",
    "glint_glfw_char_event",
    "glint_glfw_cursor_enter_event",
    "glint_glfw_window_focus_event",
    "glint_glfw_monitor_event",
];

unsafe fn init_backend(
    ctx: *mut Context,
    window: *mut GLFWwindow,
    client_api: ClientApi,
    install_callbacks: bool,
) -> bool {
    let ctx = unsafe { &mut *ctx };
    match unsafe { GlfwPlatform::init_from_raw(window, client_api, install_callbacks, ctx) } {
        Ok(platform) => {
            ctx.set_platform_backend(platform);
            true
        }
        Err(e) => {
            log::error!("GLFW backend init failed: {e}");
            false
        }
    }
}

/// Pulls the parked backend off the context for a call that needs the
/// backend and the whole context at once.
fn take_backend(ctx: &mut Context) -> Option<Box<GlfwPlatform>> {
    match ctx.take_platform_backend()?.downcast() {
        Ok(platform) => Some(platform),
        Err(other) => {
            ctx.park_platform_boxed(other);
            log::error!("parked platform backend is not the GLFW backend");
            None
        }
    }
}

/// Attaches the GLFW backend to a window that owns an OpenGL context.
#[no_mangle]
pub unsafe extern "C" fn glint_glfw_init_for_opengl(
    ctx: *mut Context,
    window: *mut GLFWwindow,
    install_callbacks: bool,
) -> bool {
    abort_on_panic("glint_glfw_init_for_opengl", || unsafe {
        init_backend(ctx, window, ClientApi::OpenGl, install_callbacks)
    })
}

/// Attaches the GLFW backend to a window created without a client API,
/// for Vulkan rendering.
#[no_mangle]
pub unsafe extern "C" fn glint_glfw_init_for_vulkan(
    ctx: *mut Context,
    window: *mut GLFWwindow,
    install_callbacks: bool,
) -> bool {
    abort_on_panic("glint_glfw_init_for_vulkan", || unsafe {
        init_backend(ctx, window, ClientApi::Vulkan, install_callbacks)
    })
}

/// Attaches the GLFW backend for any other rendering arrangement.
#[no_mangle]
pub unsafe extern "C" fn glint_glfw_init_for_other(
    ctx: *mut Context,
    window: *mut GLFWwindow,
    install_callbacks: bool,
) -> bool {
    abort_on_panic("glint_glfw_init_for_other", || unsafe {
        init_backend(ctx, window, ClientApi::Other, install_callbacks)
    })
}

/// Detaches the backend: restores the window's callbacks, frees the
/// cursors it created and drops it.
#[no_mangle]
pub unsafe extern "C" fn glint_glfw_shutdown(ctx: *mut Context) {
    abort_on_panic("glint_glfw_shutdown", || {
        let ctx = unsafe { &mut *ctx };
        if let Some(mut platform) = take_backend(ctx) {
            platform.shutdown(ctx);
        } else {
            log::warn!("glint_glfw_shutdown with no GLFW backend attached");
        }
    });
}

/// Refreshes the input block for the frame about to begin; call before
/// `glint_new_frame`.
#[no_mangle]
pub unsafe extern "C" fn glint_glfw_new_frame(ctx: *mut Context) {
    abort_on_panic("glint_glfw_new_frame", || {
        let ctx = unsafe { &mut *ctx };
        if let Some(mut platform) = take_backend(ctx) {
            platform.new_frame(ctx);
            ctx.park_platform_boxed(platform);
        } else {
            log::warn!("glint_glfw_new_frame with no GLFW backend attached");
        }
    });
}

/// Hooks the window's input callbacks after an init without them; false
/// when they are already installed or no backend is attached.
#[no_mangle]
pub unsafe extern "C" fn glint_glfw_install_callbacks(ctx: *mut Context) -> bool {
    abort_on_panic("glint_glfw_install_callbacks", || {
        match unsafe { &mut *ctx }.platform_backend_mut::<GlfwPlatform>() {
            Some(platform) => match platform.install_callbacks() {
                Ok(()) => true,
                Err(e) => {
                    log::error!("install_callbacks failed: {e}");
                    false
                }
            },
            None => false,
        }
    })
}

/// Puts the previously installed callbacks back on the window.
#[no_mangle]
pub unsafe extern "C" fn glint_glfw_restore_callbacks(ctx: *mut Context) {
    abort_on_panic("glint_glfw_restore_callbacks", || {
        if let Some(platform) = unsafe { &mut *ctx }.platform_backend_mut::<GlfwPlatform>() {
            platform.restore_callbacks();
        }
    });
}

/// Controls whether chained previous callbacks also run for events from
/// windows other than the one the backend attached to.
#[no_mangle]
pub unsafe extern "C" fn glint_glfw_set_callbacks_chain_for_all_windows(
    ctx: *mut Context,
    chain_all: bool,
) {
    abort_on_panic("glint_glfw_set_callbacks_chain_for_all_windows", || {
        if let Some(platform) = unsafe { &mut *ctx }.platform_backend_mut::<GlfwPlatform>() {
            platform.set_callbacks_chain_for_all_windows(chain_all);
        }
    });
}

/// Selects the gamepad polled each frame: mode 0 polls the first mapped
/// joystick, 1 disables polling, 2 polls exactly the joystick in
/// `joystick` (0..=15). False for other values or when no backend is
/// attached.
#[no_mangle]
pub unsafe extern "C" fn glint_glfw_set_gamepad_mode(
    ctx: *mut Context,
    mode: c_uint,
    joystick: c_uint,
) -> bool {
    abort_on_panic("glint_glfw_set_gamepad_mode", || {
        let mode = match mode {
            0 => GamepadMode::Auto,
            1 => GamepadMode::Disabled,
            2 if joystick <= 15 => GamepadMode::Joystick(joystick),
            _ => return false,
        };
        match unsafe { &mut *ctx }.platform_backend_mut::<GlfwPlatform>() {
            Some(platform) => {
                platform.set_gamepad_mode(mode);
                true
            }
            None => false,
        }
    })
}

/// Forwards a cursor-position callback.
#[no_mangle]
pub unsafe extern "C" fn glint_glfw_cursor_pos_event(ctx: *mut Context, x: f64, y: f64) -> bool {
    abort_on_panic("glint_glfw_cursor_pos_event", || {
        let (platform, io) = unsafe { &mut *ctx }.platform_backend_with_io::<GlfwPlatform>();
        platform.is_some_and(|platform| platform.cursor_pos_event(io, x, y))
    })
}

/// Forwards a mouse-button callback.
#[no_mangle]
pub unsafe extern "C" fn glint_glfw_mouse_button_event(
    ctx: *mut Context,
    button: c_int,
    action: c_int,
    mods: c_int,
) -> bool {
    abort_on_panic("glint_glfw_mouse_button_event", || {
        let (platform, io) = unsafe { &mut *ctx }.platform_backend_with_io::<GlfwPlatform>();
        platform.is_some_and(|platform| platform.mouse_button_event(io, button, action, mods))
    })
}

/// Forwards a scroll callback.
#[no_mangle]
pub unsafe extern "C" fn glint_glfw_scroll_event(ctx: *mut Context, x: f64, y: f64) -> bool {
    abort_on_panic("glint_glfw_scroll_event", || {
        let (platform, io) = unsafe { &mut *ctx }.platform_backend_with_io::<GlfwPlatform>();
        platform.is_some_and(|platform| platform.scroll_event(io, x, y))
    })
}

/// Forwards a key callback.
#[no_mangle]
pub unsafe extern "C" fn glint_glfw_key_event(
    ctx: *mut Context,
    key: c_int,
    scancode: c_int,
    action: c_int,
    mods: c_int,
) -> bool {
    abort_on_panic("glint_glfw_key_event", || {
        let (platform, io) = unsafe { &mut *ctx }.platform_backend_with_io::<GlfwPlatform>();
        platform.is_some_and(|platform| platform.key_event(io, key, scancode, action, mods))
    })
}

/// Forwards a character callback.
#[no_mangle]
pub unsafe extern "C" fn glint_glfw_char_event(ctx: *mut Context, codepoint: c_uint) -> bool {
    abort_on_panic("glint_glfw_char_event", || {
        let (platform, io) = unsafe { &mut *ctx }.platform_backend_with_io::<GlfwPlatform>();
        platform.is_some_and(|platform| platform.char_event(io, codepoint))
    })
}

/// Forwards a cursor-enter callback; `entered` is a GLFW boolean.
#[no_mangle]
pub unsafe extern "C" fn glint_glfw_cursor_enter_event(ctx: *mut Context, entered: c_int) -> bool {
    abort_on_panic("glint_glfw_cursor_enter_event", || {
        let (platform, io) = unsafe { &mut *ctx }.platform_backend_with_io::<GlfwPlatform>();
        platform.is_some_and(|platform| platform.cursor_enter_event(io, entered != 0))
    })
}

/// Forwards a window-focus callback; `focused` is a GLFW boolean.
#[no_mangle]
pub unsafe extern "C" fn glint_glfw_window_focus_event(ctx: *mut Context, focused: c_int) -> bool {
    abort_on_panic("glint_glfw_window_focus_event", || {
        let (platform, io) = unsafe { &mut *ctx }.platform_backend_with_io::<GlfwPlatform>();
        platform.is_some_and(|platform| platform.window_focus_event(io, focused != 0))
    })
}

/// Notes a monitor-configuration change so the next frame refreshes
/// content scale.
#[no_mangle]
pub unsafe extern "C" fn glint_glfw_monitor_event(ctx: *mut Context) -> bool {
    abort_on_panic("glint_glfw_monitor_event", || {
        match unsafe { &mut *ctx }.platform_backend_mut::<GlfwPlatform>() {
            Some(platform) => platform.monitor_event(),
            None => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::super::context_api::{glint_context_create, glint_context_destroy};
    use super::*;

    // Window-bound paths need a live GLFW session; what runs headlessly
    // is the no-backend behavior every entry point shares.
    #[test]
    fn test_entry_points_without_backend_return_false() {
        let ctx = glint_context_create();
        unsafe {
            assert!(!glint_glfw_cursor_pos_event(ctx, 1.0, 2.0));
            assert!(!glint_glfw_mouse_button_event(ctx, 0, 1, 0));
            assert!(!glint_glfw_scroll_event(ctx, 0.0, 1.0));
            assert!(!glint_glfw_key_event(ctx, 65, 0, 1, 0));
            assert!(!glint_glfw_char_event(ctx, u32::from('a')));
            assert!(!glint_glfw_cursor_enter_event(ctx, 1));
            assert!(!glint_glfw_window_focus_event(ctx, 1));
            assert!(!glint_glfw_monitor_event(ctx));
            assert!(!glint_glfw_install_callbacks(ctx));
            assert!(!glint_glfw_set_gamepad_mode(ctx, 0, 0));
            assert_eq!((*ctx).io().queued_events(), 0);

            glint_glfw_restore_callbacks(ctx);
            glint_glfw_set_callbacks_chain_for_all_windows(ctx, true);
            glint_glfw_shutdown(ctx);

            glint_context_destroy(ctx);
        }
    }

    #[test]
    fn test_gamepad_mode_rejects_unknown_values() {
        let ctx = glint_context_create();
        unsafe {
            // Rejected before the backend lookup.
            assert!(!glint_glfw_set_gamepad_mode(ctx, 7, 0));
            assert!(!glint_glfw_set_gamepad_mode(ctx, 2, 99));
            glint_context_destroy(ctx);
        }
    }
}
