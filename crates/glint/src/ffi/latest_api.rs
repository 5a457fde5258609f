//! Entry points present only in latest builds.
//!
//! The latest variant tracks additions that have not settled into the
//! stable surface yet; today that is pointer-source reporting and the
//! wheel-axis swap some platforms need for modifier-scrolled wheels.

use std::os::raw::c_uint;

use crate::context::Context;
use crate::io::MouseSource;

use super::abort_on_panic;

pub(super) const SYMBOLS: &[&str] = &[
    "glint_io_add_mouse_source_event",
    "glint_io_set_swap_mouse_wheel_axes",
];

/// Queues a pointer-source change: subsequent pointer events come from
/// `source` (0 mouse, 1 touch screen, 2 pen). False for other values.
#[no_mangle]
pub unsafe extern "C" fn glint_io_add_mouse_source_event(
    ctx: *mut Context,
    source: c_uint,
) -> bool {
    abort_on_panic("glint_io_add_mouse_source_event", || {
        let source = match source {
            0 => MouseSource::Mouse,
            1 => MouseSource::TouchScreen,
            2 => MouseSource::Pen,
            _ => return false,
        };
        unsafe { &mut *ctx }.io_mut().add_mouse_source_event(source);
        true
    })
}

/// Applies subsequent wheel events with their axes exchanged.
#[no_mangle]
pub unsafe extern "C" fn glint_io_set_swap_mouse_wheel_axes(ctx: *mut Context, swap: bool) {
    abort_on_panic("glint_io_set_swap_mouse_wheel_axes", || {
        unsafe { &mut *ctx }.io_mut().set_swap_mouse_wheel_axes(swap);
    });
}

#[cfg(test)]
mod tests {
    use super::super::context_api::{glint_context_create, glint_context_destroy, glint_new_frame};
    use super::super::io_api::{
        glint_io_add_mouse_wheel_event, glint_io_set_delta_time, glint_io_set_display_size,
    };
    use super::*;

    #[test]
    fn test_mouse_source_values_map_to_devices() {
        let ctx = glint_context_create();
        unsafe {
            assert!(glint_io_add_mouse_source_event(ctx, 2));
            assert!(!glint_io_add_mouse_source_event(ctx, 3));
            glint_io_set_display_size(ctx, 640.0, 480.0);
            glint_io_set_delta_time(ctx, 1.0 / 60.0);
            glint_new_frame(ctx);
            assert_eq!((*ctx).io().mouse_source(), MouseSource::Pen);
            glint_context_destroy(ctx);
        }
    }

    #[test]
    fn test_wheel_axis_swap_through_the_facade() {
        let ctx = glint_context_create();
        unsafe {
            glint_io_set_swap_mouse_wheel_axes(ctx, true);
            glint_io_add_mouse_wheel_event(ctx, 0.5, 2.0);
            glint_io_set_display_size(ctx, 640.0, 480.0);
            glint_io_set_delta_time(ctx, 1.0 / 60.0);
            glint_new_frame(ctx);
            assert_eq!((*ctx).io().mouse_wheel(), 0.5);
            assert_eq!((*ctx).io().mouse_wheel_h(), 2.0);
            glint_context_destroy(ctx);
        }
    }
}
