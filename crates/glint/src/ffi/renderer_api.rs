//! OpenGL renderer backend entry points.
//!
//! Init takes a symbol loader instead of a linked GL: the caller hands
//! us the same `(name, user_data)` resolver it gives every other GL
//! consumer, and the renderer builds its [`glow::Context`] from it.
//! Device objects follow the usual lazy scheme, so most applications
//! only ever call init, new-frame, render and shutdown.

use std::ffi::{CStr, CString};
use std::num::NonZeroU32;
use std::os::raw::{c_char, c_uint, c_void};
use std::rc::Rc;

use crate::context::Context;
use crate::draw::DrawData;
use crate::render::opengl::versions::GlslVersion;
use crate::render::opengl::GlowRenderer;
use crate::textures::TextureId;

use super::abort_on_panic;

pub(super) const SYMBOLS: &[&str] = &[
    "glint_opengl_init",
    "glint_opengl_shutdown",
    "glint_opengl_new_frame",
    "glint_opengl_render_draw_data",
    "glint_opengl_create_device_objects",
    "glint_opengl_destroy_device_objects",
    "glint_opengl_create_fonts_texture",
    "glint_opengl_destroy_fonts_texture",
    "glint_opengl_register_texture",
    "glint_opengl_unregister_texture",
];

/// Resolver for GL symbols, shaped like `glfwGetProcAddress` with a
/// user-data slot so wrappers can close over their own loader state.
pub type GlLoaderFn =
    unsafe extern "C" fn(name: *const c_char, user_data: *mut c_void) -> *mut c_void;

/// Pulls the parked renderer off the context for a call that needs the
/// renderer and the whole context at once.
fn take_backend(ctx: &mut Context) -> Option<Box<GlowRenderer>> {
    match ctx.take_renderer_backend()?.downcast() {
        Ok(renderer) => Some(renderer),
        Err(other) => {
            ctx.park_renderer_boxed(other);
            log::error!("parked renderer backend is not the OpenGL renderer");
            None
        }
    }
}

/// Builds the renderer over the GL context reachable through `loader`
/// and parks it on the context. The loader must resolve symbols for the
/// GL context that is current on this thread.
///
/// `glsl_version` may name the `#version` directive to compile shaders
/// with (`"#version 130"`, `"#version 300 es"` and the like); pass null
/// to let the driver's reported versions pick it.
#[no_mangle]
pub unsafe extern "C" fn glint_opengl_init(
    ctx: *mut Context,
    glsl_version: *const c_char,
    loader: Option<GlLoaderFn>,
    user_data: *mut c_void,
) -> bool {
    abort_on_panic("glint_opengl_init", || {
        let Some(loader) = loader else {
            log::error!("glint_opengl_init requires a symbol loader");
            return false;
        };
        let directive = if glsl_version.is_null() {
            None
        } else {
            let raw = unsafe { CStr::from_ptr(glsl_version) }.to_string_lossy();
            match GlslVersion::parse_directive(&raw) {
                Some(directive) => Some(directive),
                None => {
                    log::error!("unusable GLSL version directive {raw:?}");
                    return false;
                }
            }
        };
        let gl = unsafe {
            glow::Context::from_loader_function(|symbol| {
                CString::new(symbol).map_or(std::ptr::null(), |name| {
                    unsafe { loader(name.as_ptr(), user_data) }.cast_const()
                })
            })
        };
        let ctx = unsafe { &mut *ctx };
        let attached = match directive {
            Some(directive) => GlowRenderer::with_glsl_override(Rc::new(gl), ctx, directive),
            None => GlowRenderer::initialize(gl, ctx),
        };
        match attached {
            Ok(renderer) => {
                ctx.set_renderer_backend(renderer);
                true
            }
            Err(e) => {
                log::error!("OpenGL renderer init failed: {e}");
                false
            }
        }
    })
}

/// Destroys the renderer's GL objects and drops it. The GL context must
/// still be current.
#[no_mangle]
pub unsafe extern "C" fn glint_opengl_shutdown(ctx: *mut Context) {
    abort_on_panic("glint_opengl_shutdown", || {
        let ctx = unsafe { &mut *ctx };
        if let Some(mut renderer) = take_backend(ctx) {
            renderer.shutdown(ctx);
        } else {
            log::warn!("glint_opengl_shutdown with no OpenGL renderer attached");
        }
    });
}

/// Ensures device objects and the font texture exist for the coming
/// frame; call before `glint_new_frame`.
#[no_mangle]
pub unsafe extern "C" fn glint_opengl_new_frame(ctx: *mut Context) -> bool {
    abort_on_panic("glint_opengl_new_frame", || {
        let ctx = unsafe { &mut *ctx };
        let Some(mut renderer) = take_backend(ctx) else {
            return false;
        };
        let result = renderer.new_frame(ctx);
        ctx.park_renderer_boxed(renderer);
        match result {
            Ok(()) => true,
            Err(e) => {
                log::error!("OpenGL new_frame failed: {e}");
                false
            }
        }
    })
}

/// Draws sealed frame output into the bound framebuffer, saving and
/// restoring the GL state it touches.
#[no_mangle]
pub unsafe extern "C" fn glint_opengl_render_draw_data(
    ctx: *mut Context,
    draw_data: *const DrawData,
) -> bool {
    abort_on_panic("glint_opengl_render_draw_data", || {
        // draw_data usually points into ctx itself, so each context
        // borrow stays local to one step.
        let Some(mut renderer) = take_backend(unsafe { &mut *ctx }) else {
            return false;
        };
        let result = renderer.render_draw_data(unsafe { &*draw_data });
        unsafe { &mut *ctx }.park_renderer_boxed(renderer);
        match result {
            Ok(()) => true,
            Err(e) => {
                log::error!("render_draw_data failed: {e}");
                false
            }
        }
    })
}

/// Creates the shader program and buffers now instead of lazily.
#[no_mangle]
pub unsafe extern "C" fn glint_opengl_create_device_objects(ctx: *mut Context) -> bool {
    abort_on_panic("glint_opengl_create_device_objects", || {
        match unsafe { &mut *ctx }.renderer_backend_mut::<GlowRenderer>() {
            Some(renderer) => match renderer.create_device_objects() {
                Ok(()) => true,
                Err(e) => {
                    log::error!("create_device_objects failed: {e}");
                    false
                }
            },
            None => false,
        }
    })
}

/// Releases the shader program, buffers and font texture; the next
/// frame recreates them.
#[no_mangle]
pub unsafe extern "C" fn glint_opengl_destroy_device_objects(ctx: *mut Context) {
    abort_on_panic("glint_opengl_destroy_device_objects", || {
        let (renderer, fonts) = unsafe { &mut *ctx }.renderer_backend_with_fonts::<GlowRenderer>();
        if let Some(renderer) = renderer {
            renderer.destroy_device_objects(fonts);
        }
    });
}

/// Re-uploads the font atlas, replacing any previous font texture.
#[no_mangle]
pub unsafe extern "C" fn glint_opengl_create_fonts_texture(ctx: *mut Context) -> bool {
    abort_on_panic("glint_opengl_create_fonts_texture", || {
        let (renderer, fonts) = unsafe { &mut *ctx }.renderer_backend_with_fonts::<GlowRenderer>();
        match renderer {
            Some(renderer) => match renderer.create_fonts_texture(fonts) {
                Ok(()) => true,
                Err(e) => {
                    log::error!("create_fonts_texture failed: {e}");
                    false
                }
            },
            None => false,
        }
    })
}

/// Deletes the font texture and clears the atlas binding.
#[no_mangle]
pub unsafe extern "C" fn glint_opengl_destroy_fonts_texture(ctx: *mut Context) {
    abort_on_panic("glint_opengl_destroy_fonts_texture", || {
        let (renderer, fonts) = unsafe { &mut *ctx }.renderer_backend_with_fonts::<GlowRenderer>();
        if let Some(renderer) = renderer {
            renderer.destroy_fonts_texture(fonts);
        }
    });
}

/// Registers a caller-owned GL texture and returns the id draw calls
/// use for it. Zero (a null id) when the handle is zero or no renderer
/// is attached; the renderer never deletes registered textures.
#[no_mangle]
pub unsafe extern "C" fn glint_opengl_register_texture(ctx: *mut Context, gl_texture: c_uint) -> u64 {
    abort_on_panic("glint_opengl_register_texture", || {
        let Some(raw) = NonZeroU32::new(gl_texture) else {
            return TextureId::null().to_raw();
        };
        match unsafe { &mut *ctx }.renderer_backend_mut::<GlowRenderer>() {
            Some(renderer) => renderer
                .textures_mut()
                .insert(glow::NativeTexture(raw))
                .to_raw(),
            None => TextureId::null().to_raw(),
        }
    })
}

/// Forgets a registered texture; false when the id was not registered.
#[no_mangle]
pub unsafe extern "C" fn glint_opengl_unregister_texture(ctx: *mut Context, texture: u64) -> bool {
    abort_on_panic("glint_opengl_unregister_texture", || {
        match unsafe { &mut *ctx }.renderer_backend_mut::<GlowRenderer>() {
            Some(renderer) => renderer
                .textures_mut()
                .remove(TextureId::from_raw(texture))
                .is_some(),
            None => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::super::context_api::{glint_context_create, glint_context_destroy};
    use super::*;

    // Everything past init needs a current GL context; headless tests
    // cover the paths that fail before touching GL.
    #[test]
    fn test_entry_points_without_renderer_fail_cleanly() {
        let ctx = glint_context_create();
        unsafe {
            assert!(!glint_opengl_new_frame(ctx));
            assert!(!glint_opengl_create_device_objects(ctx));
            assert!(!glint_opengl_create_fonts_texture(ctx));
            assert_eq!(glint_opengl_register_texture(ctx, 3), 0);
            assert!(!glint_opengl_unregister_texture(ctx, 3));

            glint_opengl_destroy_device_objects(ctx);
            glint_opengl_destroy_fonts_texture(ctx);
            glint_opengl_shutdown(ctx);

            glint_context_destroy(ctx);
        }
    }

    #[test]
    fn test_init_requires_a_loader() {
        let ctx = glint_context_create();
        unsafe {
            assert!(!glint_opengl_init(ctx, std::ptr::null(), None, std::ptr::null_mut()));
            glint_context_destroy(ctx);
        }
    }

    #[test]
    fn test_init_rejects_a_garbage_directive() {
        unsafe extern "C" fn null_loader(_name: *const c_char, _data: *mut c_void) -> *mut c_void {
            std::ptr::null_mut()
        }

        let ctx = glint_context_create();
        // The directive is vetted before any GL symbol is resolved.
        unsafe {
            assert!(!glint_opengl_init(
                ctx,
                c"#version banana".as_ptr(),
                Some(null_loader),
                std::ptr::null_mut(),
            ));
            glint_context_destroy(ctx);
        }
    }

    #[test]
    fn test_register_rejects_the_zero_handle() {
        let ctx = glint_context_create();
        // Zero is GL's "no texture"; rejected before the backend lookup.
        unsafe {
            assert_eq!(glint_opengl_register_texture(ctx, 0), 0);
            glint_context_destroy(ctx);
        }
    }
}
