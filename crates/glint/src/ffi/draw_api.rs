//! Background draw-list and font-atlas entry points.
//!
//! The draw functions append to the context's background list and are
//! only valid between `glint_new_frame` and `glint_render`, like their
//! Rust counterparts.

use std::ffi::CStr;
use std::os::raw::c_char;

use crate::context::Context;
use crate::textures::TextureId;

use super::abort_on_panic;

pub(super) const SYMBOLS: &[&str] = &[
    "glint_draw_rect_filled",
    "glint_draw_rect",
    "glint_draw_line",
    "glint_draw_image",
    "glint_draw_text",
    "glint_draw_push_clip_rect",
    "glint_draw_pop_clip_rect",
    "glint_draw_push_texture_id",
    "glint_draw_pop_texture_id",
    "glint_fonts_texture_id",
    "glint_fonts_set_texture_id",
    "glint_fonts_pixels",
];

/// Filled axis-aligned rectangle.
#[no_mangle]
pub unsafe extern "C" fn glint_draw_rect_filled(
    ctx: *mut Context,
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
    col: u32,
) {
    abort_on_panic("glint_draw_rect_filled", || {
        unsafe { &mut *ctx }
            .background_draw_list()
            .add_rect_filled([min_x, min_y], [max_x, max_y], col);
    });
}

/// Rectangle outline of the given thickness, drawn inward.
#[no_mangle]
pub unsafe extern "C" fn glint_draw_rect(
    ctx: *mut Context,
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
    col: u32,
    thickness: f32,
) {
    abort_on_panic("glint_draw_rect", || {
        unsafe { &mut *ctx }
            .background_draw_list()
            .add_rect([min_x, min_y], [max_x, max_y], col, thickness);
    });
}

/// Line segment.
#[no_mangle]
pub unsafe extern "C" fn glint_draw_line(
    ctx: *mut Context,
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    col: u32,
    thickness: f32,
) {
    abort_on_panic("glint_draw_line", || {
        unsafe { &mut *ctx }
            .background_draw_list()
            .add_line([x1, y1], [x2, y2], col, thickness);
    });
}

/// Textured quad addressing the registered texture `texture`.
#[no_mangle]
pub unsafe extern "C" fn glint_draw_image(
    ctx: *mut Context,
    texture: u64,
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
    uv_min_x: f32,
    uv_min_y: f32,
    uv_max_x: f32,
    uv_max_y: f32,
    col: u32,
) {
    abort_on_panic("glint_draw_image", || {
        unsafe { &mut *ctx }.background_draw_list().add_image(
            TextureId::from_raw(texture),
            [min_x, min_y],
            [max_x, max_y],
            [uv_min_x, uv_min_y],
            [uv_max_x, uv_max_y],
            col,
        );
    });
}

/// Text run in the atlas default font; false when `text` is null or
/// not UTF-8.
#[no_mangle]
pub unsafe extern "C" fn glint_draw_text(
    ctx: *mut Context,
    x: f32,
    y: f32,
    col: u32,
    text: *const c_char,
) -> bool {
    abort_on_panic("glint_draw_text", || {
        if text.is_null() {
            return false;
        }
        let Ok(text) = unsafe { CStr::from_ptr(text) }.to_str() else {
            return false;
        };
        let (list, fonts) = unsafe { &mut *ctx }.draw();
        list.add_text(fonts, [x, y], col, text);
        true
    })
}

/// Pushes a clip rectangle, optionally intersected with the current
/// one.
#[no_mangle]
pub unsafe extern "C" fn glint_draw_push_clip_rect(
    ctx: *mut Context,
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
    intersect: bool,
) {
    abort_on_panic("glint_draw_push_clip_rect", || {
        unsafe { &mut *ctx }
            .background_draw_list()
            .push_clip_rect([min_x, min_y], [max_x, max_y], intersect);
    });
}

/// Pops the top clip rectangle.
#[no_mangle]
pub unsafe extern "C" fn glint_draw_pop_clip_rect(ctx: *mut Context) {
    abort_on_panic("glint_draw_pop_clip_rect", || {
        unsafe { &mut *ctx }.background_draw_list().pop_clip_rect();
    });
}

/// Pushes a texture for subsequent primitives.
#[no_mangle]
pub unsafe extern "C" fn glint_draw_push_texture_id(ctx: *mut Context, texture: u64) {
    abort_on_panic("glint_draw_push_texture_id", || {
        unsafe { &mut *ctx }
            .background_draw_list()
            .push_texture_id(TextureId::from_raw(texture));
    });
}

/// Pops the top pushed texture.
#[no_mangle]
pub unsafe extern "C" fn glint_draw_pop_texture_id(ctx: *mut Context) {
    abort_on_panic("glint_draw_pop_texture_id", || {
        unsafe { &mut *ctx }.background_draw_list().pop_texture_id();
    });
}

/// Texture id the font atlas renders with; 0 until a renderer uploads
/// it or the application assigns one.
#[no_mangle]
pub unsafe extern "C" fn glint_fonts_texture_id(ctx: *const Context) -> u64 {
    abort_on_panic("glint_fonts_texture_id", || {
        unsafe { &*ctx }.fonts().texture_id().to_raw()
    })
}

/// Assigns the texture id the atlas renders with, for applications
/// uploading the atlas themselves.
#[no_mangle]
pub unsafe extern "C" fn glint_fonts_set_texture_id(ctx: *mut Context, texture: u64) {
    abort_on_panic("glint_fonts_set_texture_id", || {
        unsafe { &mut *ctx }
            .fonts_mut()
            .set_texture_id(TextureId::from_raw(texture));
    });
}

/// Builds the atlas if needed and returns its RGBA pixels, writing the
/// dimensions through the non-null out-pointers. Null when the build
/// fails. The pointer stays valid until fonts are added or the context
/// is destroyed.
#[no_mangle]
pub unsafe extern "C" fn glint_fonts_pixels(
    ctx: *mut Context,
    out_width: *mut u32,
    out_height: *mut u32,
) -> *const u8 {
    abort_on_panic("glint_fonts_pixels", || {
        let fonts = unsafe { &mut *ctx }.fonts_mut();
        if let Err(e) = fonts.ensure_built() {
            log::warn!("font atlas build failed at the C boundary: {e}");
            return std::ptr::null();
        }
        let (width, height) = fonts.dimensions();
        if !out_width.is_null() {
            unsafe { *out_width = width };
        }
        if !out_height.is_null() {
            unsafe { *out_height = height };
        }
        fonts.pixels().map_or(std::ptr::null(), |pixels| pixels.as_ptr())
    })
}

#[cfg(test)]
mod tests {
    use super::super::context_api::{
        glint_context_create, glint_context_destroy, glint_get_draw_data, glint_new_frame,
        glint_render,
    };
    use super::super::io_api::glint_io_set_display_size;
    use super::*;
    use crate::draw::col32;

    #[test]
    fn test_primitives_land_in_sealed_draw_data() {
        let ctx = glint_context_create();
        unsafe {
            glint_io_set_display_size(ctx, 320.0, 240.0);
            glint_new_frame(ctx);

            glint_draw_rect_filled(ctx, 0.0, 0.0, 10.0, 10.0, col32(255, 0, 0, 255));
            glint_draw_line(ctx, 0.0, 0.0, 50.0, 50.0, col32(0, 255, 0, 255), 2.0);

            glint_render(ctx);
            let draw_data = glint_get_draw_data(ctx);
            assert!((*draw_data).valid);
            // One quad per primitive.
            assert_eq!((*draw_data).total_vtx_count, 8);
            assert_eq!((*draw_data).total_idx_count, 12);

            glint_context_destroy(ctx);
        }
    }

    #[test]
    fn test_clip_and_texture_stacks_split_commands() {
        let ctx = glint_context_create();
        unsafe {
            glint_io_set_display_size(ctx, 320.0, 240.0);
            glint_new_frame(ctx);

            glint_draw_rect_filled(ctx, 0.0, 0.0, 10.0, 10.0, col32(255, 255, 255, 255));
            glint_draw_push_clip_rect(ctx, 5.0, 5.0, 100.0, 100.0, true);
            glint_draw_push_texture_id(ctx, 0xBEEF);
            glint_draw_rect_filled(ctx, 6.0, 6.0, 20.0, 20.0, col32(255, 255, 255, 255));
            glint_draw_pop_texture_id(ctx);
            glint_draw_pop_clip_rect(ctx);

            glint_render(ctx);
            let draw_data = glint_get_draw_data(ctx);
            let lists = (*draw_data).draw_lists();
            assert_eq!(lists.len(), 1);
            assert!(lists[0].commands().len() >= 2);

            glint_context_destroy(ctx);
        }
    }

    #[test]
    fn test_text_rejects_null_and_invalid_utf8() {
        let ctx = glint_context_create();
        unsafe {
            glint_io_set_display_size(ctx, 320.0, 240.0);
            glint_new_frame(ctx);

            assert!(!glint_draw_text(ctx, 0.0, 0.0, 0xFFFF_FFFF, std::ptr::null()));
            let invalid = [0xC3u8 as c_char, 0x28, 0];
            assert!(!glint_draw_text(ctx, 0.0, 0.0, 0xFFFF_FFFF, invalid.as_ptr()));
            assert!(glint_draw_text(ctx, 0.0, 0.0, 0xFFFF_FFFF, c"ok".as_ptr()));

            glint_context_destroy(ctx);
        }
    }

    #[test]
    fn test_fonts_pixels_reports_dimensions() {
        let ctx = glint_context_create();
        unsafe {
            let (mut width, mut height) = (0u32, 0u32);
            let pixels = glint_fonts_pixels(ctx, &mut width, &mut height);
            assert!(!pixels.is_null());
            assert!(width > 0 && height > 0);

            glint_fonts_set_texture_id(ctx, 7);
            assert_eq!(glint_fonts_texture_id(ctx), 7);

            glint_context_destroy(ctx);
        }
    }
}
