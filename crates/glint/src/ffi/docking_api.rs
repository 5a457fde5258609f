//! Dock-node entry points, present only in docking builds.
//!
//! Node handles are the same 64-bit values [`DockNodeId`] wraps; zero
//! names no node. Layout follows the display size once the docking
//! config flag is set, so callers should split after the first frame.

use std::os::raw::c_uint;

use crate::context::Context;
use crate::docking::{DockNodeId, SplitDirection};

use super::abort_on_panic;

pub(super) const SYMBOLS: &[&str] = &[
    "glint_dock_space",
    "glint_dock_split_node",
    "glint_dock_collapse_node",
    "glint_dock_node_rect",
    "glint_dock_node_count",
];

/// Returns the root dock node covering the display, creating it on
/// first use.
#[no_mangle]
pub unsafe extern "C" fn glint_dock_space(ctx: *mut Context) -> u64 {
    abort_on_panic("glint_dock_space", || {
        unsafe { &mut *ctx }.docking_mut().dock_space().to_raw()
    })
}

/// Splits a leaf node in two. `direction` picks the side the first
/// child occupies (0 left, 1 right, 2 up, 3 down) and `ratio` in
/// (0, 1) its share of the parent. The child ids are written through
/// any non-null out pointers. False for an unknown direction, an
/// out-of-range ratio, a stale node or a node already split.
#[no_mangle]
pub unsafe extern "C" fn glint_dock_split_node(
    ctx: *mut Context,
    node: u64,
    direction: c_uint,
    ratio: f32,
    out_first: *mut u64,
    out_second: *mut u64,
) -> bool {
    abort_on_panic("glint_dock_split_node", || {
        let Some(direction) = SplitDirection::from_index(direction) else {
            return false;
        };
        let split = unsafe { &mut *ctx }
            .docking_mut()
            .split_node(DockNodeId::from_raw(node), direction, ratio);
        match split {
            Ok((first, second)) => {
                if !out_first.is_null() {
                    unsafe { out_first.write(first.to_raw()) };
                }
                if !out_second.is_null() {
                    unsafe { out_second.write(second.to_raw()) };
                }
                true
            }
            Err(e) => {
                log::warn!("split_node failed: {e}");
                false
            }
        }
    })
}

/// Removes a node's children and their subtrees, making it a leaf
/// again; false when the id names no live node.
#[no_mangle]
pub unsafe extern "C" fn glint_dock_collapse_node(ctx: *mut Context, node: u64) -> bool {
    abort_on_panic("glint_dock_collapse_node", || {
        unsafe { &mut *ctx }
            .docking_mut()
            .collapse(DockNodeId::from_raw(node))
            .is_ok()
    })
}

/// Writes a node's `[min_x, min_y, max_x, max_y]` rectangle through
/// `out_rect` (four floats); false for stale ids or a null pointer.
#[no_mangle]
pub unsafe extern "C" fn glint_dock_node_rect(
    ctx: *const Context,
    node: u64,
    out_rect: *mut f32,
) -> bool {
    abort_on_panic("glint_dock_node_rect", || {
        if out_rect.is_null() {
            return false;
        }
        match unsafe { &*ctx }.docking().node_rect(DockNodeId::from_raw(node)) {
            Some(rect) => {
                unsafe { std::ptr::copy_nonoverlapping(rect.as_ptr(), out_rect, rect.len()) };
                true
            }
            None => false,
        }
    })
}

/// Number of live dock nodes.
#[no_mangle]
pub unsafe extern "C" fn glint_dock_node_count(ctx: *const Context) -> usize {
    abort_on_panic("glint_dock_node_count", || {
        unsafe { &*ctx }.docking().node_count()
    })
}

#[cfg(test)]
mod tests {
    use super::super::context_api::{glint_context_create, glint_context_destroy, glint_new_frame};
    use super::super::io_api::{
        glint_io_set_config_flags, glint_io_set_delta_time, glint_io_set_display_size,
    };
    use super::*;
    use crate::io::ConfigFlags;

    #[test]
    fn test_dock_layout_through_the_facade() {
        let ctx = glint_context_create();
        unsafe {
            glint_io_set_config_flags(ctx, ConfigFlags::DOCKING_ENABLE.bits());
            glint_io_set_display_size(ctx, 800.0, 600.0);
            glint_io_set_delta_time(ctx, 1.0 / 60.0);
            glint_new_frame(ctx);

            let root = glint_dock_space(ctx);
            assert_ne!(root, 0);
            let mut rect = [0.0f32; 4];
            assert!(glint_dock_node_rect(ctx, root, rect.as_mut_ptr()));
            assert_eq!(rect, [0.0, 0.0, 800.0, 600.0]);

            let mut first = 0u64;
            let mut second = 0u64;
            assert!(glint_dock_split_node(ctx, root, 0, 0.25, &mut first, &mut second));
            assert!(glint_dock_node_rect(ctx, first, rect.as_mut_ptr()));
            assert_eq!(rect, [0.0, 0.0, 200.0, 600.0]);
            assert_eq!(glint_dock_node_count(ctx), 3);

            assert!(glint_dock_collapse_node(ctx, root));
            assert_eq!(glint_dock_node_count(ctx), 1);

            glint_context_destroy(ctx);
        }
    }

    #[test]
    fn test_split_rejects_bad_arguments() {
        let ctx = glint_context_create();
        unsafe {
            let root = glint_dock_space(ctx);
            let null = std::ptr::null_mut();
            // Unknown direction, out-of-range ratio, stale node.
            assert!(!glint_dock_split_node(ctx, root, 9, 0.5, null, null));
            assert!(!glint_dock_split_node(ctx, root, 0, 0.0, null, null));
            assert!(!glint_dock_split_node(ctx, 0, 0, 0.5, null, null));
            assert!(!glint_dock_node_rect(ctx, 0, std::ptr::null_mut()));
            glint_context_destroy(ctx);
        }
    }
}
