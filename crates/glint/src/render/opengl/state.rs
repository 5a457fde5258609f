//! GL state capture around draw submission
//!
//! The draw path leans on global GL state, so the caller's bindings and
//! toggles are snapshotted before submission and reinstated afterwards.
//! State that only exists on some versions is captured behind the same
//! runtime gates the draw path uses, never queried blind.

use std::num::NonZeroU32;

use glow::HasContext;

use super::versions::GlVersion;

#[derive(Default)]
pub(super) struct GlStateBackup {
    active_texture: u32,
    program: u32,
    texture: u32,
    sampler: Option<u32>,
    array_buffer: u32,
    vertex_array: Option<u32>,
    polygon_mode: Option<[i32; 2]>,
    viewport: [i32; 4],
    scissor_box: [i32; 4],
    blend_src_rgb: i32,
    blend_dst_rgb: i32,
    blend_src_alpha: i32,
    blend_dst_alpha: i32,
    blend_equation_rgb: i32,
    blend_equation_alpha: i32,
    blend_enabled: bool,
    cull_face_enabled: bool,
    depth_test_enabled: bool,
    stencil_test_enabled: bool,
    scissor_test_enabled: bool,
    primitive_restart_enabled: Option<bool>,
}

/// Wraps a raw queried handle back into glow's typed form; zero means
/// "no binding".
pub(super) fn to_native<T>(handle: u32, wrap: fn(NonZeroU32) -> T) -> Option<T> {
    NonZeroU32::new(handle).map(wrap)
}

impl GlStateBackup {
    #[allow(clippy::cast_sign_loss)]
    pub(super) fn save(&mut self, gl: &glow::Context, version: GlVersion) {
        unsafe {
            self.active_texture = gl.get_parameter_i32(glow::ACTIVE_TEXTURE) as u32;
            self.program = gl.get_parameter_i32(glow::CURRENT_PROGRAM) as u32;
            self.texture = gl.get_parameter_i32(glow::TEXTURE_BINDING_2D) as u32;
            self.sampler = version
                .bind_sampler_support()
                .then(|| gl.get_parameter_i32(glow::SAMPLER_BINDING) as u32);
            self.array_buffer = gl.get_parameter_i32(glow::ARRAY_BUFFER_BINDING) as u32;
            self.vertex_array = version
                .bind_vertex_array_support()
                .then(|| gl.get_parameter_i32(glow::VERTEX_ARRAY_BINDING) as u32);

            self.polygon_mode = if version.polygon_mode_support() {
                let mut mode = [0_i32; 2];
                gl.get_parameter_i32_slice(glow::POLYGON_MODE, &mut mode);
                Some(mode)
            } else {
                None
            };

            gl.get_parameter_i32_slice(glow::VIEWPORT, &mut self.viewport);
            gl.get_parameter_i32_slice(glow::SCISSOR_BOX, &mut self.scissor_box);
            self.blend_src_rgb = gl.get_parameter_i32(glow::BLEND_SRC_RGB);
            self.blend_dst_rgb = gl.get_parameter_i32(glow::BLEND_DST_RGB);
            self.blend_src_alpha = gl.get_parameter_i32(glow::BLEND_SRC_ALPHA);
            self.blend_dst_alpha = gl.get_parameter_i32(glow::BLEND_DST_ALPHA);
            self.blend_equation_rgb = gl.get_parameter_i32(glow::BLEND_EQUATION_RGB);
            self.blend_equation_alpha = gl.get_parameter_i32(glow::BLEND_EQUATION_ALPHA);
            self.blend_enabled = gl.is_enabled(glow::BLEND);
            self.cull_face_enabled = gl.is_enabled(glow::CULL_FACE);
            self.depth_test_enabled = gl.is_enabled(glow::DEPTH_TEST);
            self.stencil_test_enabled = gl.is_enabled(glow::STENCIL_TEST);
            self.scissor_test_enabled = gl.is_enabled(glow::SCISSOR_TEST);
            self.primitive_restart_enabled = version
                .primitive_restart_support()
                .then(|| gl.is_enabled(glow::PRIMITIVE_RESTART));
        }
    }

    #[allow(clippy::cast_sign_loss)]
    pub(super) fn restore(&self, gl: &glow::Context) {
        unsafe {
            gl.use_program(to_native(self.program, glow::NativeProgram));
            gl.bind_texture(glow::TEXTURE_2D, to_native(self.texture, glow::NativeTexture));
            if let Some(sampler) = self.sampler {
                gl.bind_sampler(0, to_native(sampler, glow::NativeSampler));
            }
            gl.active_texture(self.active_texture);
            if let Some(vertex_array) = self.vertex_array {
                gl.bind_vertex_array(to_native(vertex_array, glow::NativeVertexArray));
            }
            gl.bind_buffer(
                glow::ARRAY_BUFFER,
                to_native(self.array_buffer, glow::NativeBuffer),
            );
            gl.blend_equation_separate(
                self.blend_equation_rgb as u32,
                self.blend_equation_alpha as u32,
            );
            gl.blend_func_separate(
                self.blend_src_rgb as u32,
                self.blend_dst_rgb as u32,
                self.blend_src_alpha as u32,
                self.blend_dst_alpha as u32,
            );
            set_enabled(gl, glow::BLEND, self.blend_enabled);
            set_enabled(gl, glow::CULL_FACE, self.cull_face_enabled);
            set_enabled(gl, glow::DEPTH_TEST, self.depth_test_enabled);
            set_enabled(gl, glow::STENCIL_TEST, self.stencil_test_enabled);
            set_enabled(gl, glow::SCISSOR_TEST, self.scissor_test_enabled);
            if let Some(restart) = self.primitive_restart_enabled {
                set_enabled(gl, glow::PRIMITIVE_RESTART, restart);
            }
            if let Some([mode, _]) = self.polygon_mode {
                gl.polygon_mode(glow::FRONT_AND_BACK, mode as u32);
            }
            gl.viewport(
                self.viewport[0],
                self.viewport[1],
                self.viewport[2],
                self.viewport[3],
            );
            gl.scissor(
                self.scissor_box[0],
                self.scissor_box[1],
                self.scissor_box[2],
                self.scissor_box[3],
            );
        }
    }
}

unsafe fn set_enabled(gl: &glow::Context, cap: u32, enabled: bool) {
    if enabled {
        gl.enable(cap);
    } else {
        gl.disable(cap);
    }
}
