//! OpenGL renderer backend over [`glow`]
//!
//! [`GlowRenderer`] owns the GPU half of a frame: the shader program,
//! vertex and index buffers, the font atlas texture and the registry of
//! user textures. Draw submission replays sealed
//! [`DrawData`](crate::draw::DrawData) into whatever GL context is
//! current, saving and restoring the caller's GL state around it.
//!
//! Anything from OpenGL 3.0 / OpenGL ES 3.0 up is handled by probing
//! the driver's version strings at init; there are no compile-time GL
//! profiles.

mod shaders;
mod state;
pub mod versions;

use std::mem::{offset_of, size_of};
use std::rc::Rc;

use glow::HasContext;

use crate::context::Context;
use crate::draw::{DrawCmd, DrawData, DrawIdx, DrawListData, DrawVert};
use crate::fonts::FontAtlas;
use crate::io::{BackendFlags, ConfigFlags};
use crate::render::{RendererBackend, RendererError, RendererResult};
use crate::textures::{TextureId, Textures};

use shaders::Shaders;
use state::{to_native, GlStateBackup};
use versions::{GlVersion, GlslVersion};

/// GPU objects that exist between `create_device_objects` and
/// `destroy_device_objects`.
struct DeviceObjects {
    shaders: Shaders,
    vbo: glow::Buffer,
    ebo: glow::Buffer,
}

/// The current font atlas upload, tagged with the atlas revision it was
/// built from so edits to the atlas trigger a re-upload.
struct FontTexture {
    raw: glow::Texture,
    id: TextureId,
    atlas_version: u64,
}

/// Renderer backend submitting draw data through [`glow`].
pub struct GlowRenderer {
    gl: Rc<glow::Context>,
    gl_version: GlVersion,
    glsl_override: Option<GlslVersion>,
    has_clip_origin_support: bool,
    output_srgb: bool,
    state_backup: GlStateBackup,
    device: Option<DeviceObjects>,
    font_texture: Option<FontTexture>,
    textures: Textures<glow::Texture>,
    detached: bool,
}

impl GlowRenderer {
    /// Attaches a renderer to `ctx`, taking ownership of the GL
    /// context.
    ///
    /// Device objects and the font atlas texture are created eagerly so
    /// driver problems surface here rather than mid-frame. The GL
    /// context must be current on this thread.
    ///
    /// # Errors
    /// Fails when the driver version is unsupported or any GPU object
    /// cannot be created.
    pub fn initialize(gl: glow::Context, ctx: &mut Context) -> RendererResult<Self> {
        Self::from_shared_context(Rc::new(gl), ctx)
    }

    /// Like [`initialize`](Self::initialize) for a GL context the
    /// application also keeps a handle to.
    ///
    /// # Errors
    /// Fails when the driver version is unsupported or any GPU object
    /// cannot be created.
    pub fn from_shared_context(gl: Rc<glow::Context>, ctx: &mut Context) -> RendererResult<Self> {
        Self::attach(gl, ctx, None)
    }

    /// Like [`from_shared_context`](Self::from_shared_context) but with
    /// a caller-chosen GLSL `#version` directive instead of the one
    /// negotiated from the driver's version strings, for drivers that
    /// misreport what they compile.
    ///
    /// # Errors
    /// Fails when the driver version is unsupported or any GPU object
    /// cannot be created.
    pub fn with_glsl_override(
        gl: Rc<glow::Context>,
        ctx: &mut Context,
        directive: GlslVersion,
    ) -> RendererResult<Self> {
        Self::attach(gl, ctx, Some(directive))
    }

    fn attach(
        gl: Rc<glow::Context>,
        ctx: &mut Context,
        glsl_override: Option<GlslVersion>,
    ) -> RendererResult<Self> {
        let gl_version = GlVersion::read(&gl);
        let has_clip_origin_support = gl_version.clip_origin_support()
            || (!gl_version.is_gles && has_clip_control_extension(&gl));
        // With an sRGB framebuffer the hardware encodes on write, so the
        // shader must not encode a second time.
        let output_srgb = !ctx.io().config_flags.contains(ConfigFlags::IS_SRGB);

        let mut renderer = Self {
            gl,
            gl_version,
            glsl_override,
            has_clip_origin_support,
            output_srgb,
            state_backup: GlStateBackup::default(),
            device: None,
            font_texture: None,
            textures: Textures::new(),
            detached: false,
        };
        renderer.create_device_objects()?;
        renderer.create_fonts_texture(ctx.fonts_mut())?;

        let io = ctx.io_mut();
        if gl_version.vertex_offset_support() {
            io.backend_flags.insert(BackendFlags::RENDERER_HAS_VTX_OFFSET);
        }
        io.set_backend_renderer_name(Some("glint-glow".to_owned()));

        log::info!(
            "glow renderer attached: {} {}.{}",
            if gl_version.is_gles { "OpenGL ES" } else { "OpenGL" },
            gl_version.major,
            gl_version.minor,
        );
        Ok(renderer)
    }

    /// The GL context this renderer submits into.
    #[must_use]
    pub fn gl_context(&self) -> &Rc<glow::Context> {
        &self.gl
    }

    /// Parsed driver version.
    #[must_use]
    pub const fn gl_version(&self) -> GlVersion {
        self.gl_version
    }

    /// Registry of user textures drawable through
    /// [`TextureId`](crate::textures::TextureId).
    #[must_use]
    pub const fn textures(&self) -> &Textures<glow::Texture> {
        &self.textures
    }

    /// Mutable texture registry, for registering and retiring user
    /// textures.
    pub fn textures_mut(&mut self) -> &mut Textures<glow::Texture> {
        &mut self.textures
    }

    /// Creates the shader program and vertex/index buffers if they do
    /// not currently exist.
    ///
    /// # Errors
    /// Fails when the driver version is unsupported or a GPU object
    /// cannot be created.
    pub fn create_device_objects(&mut self) -> RendererResult<()> {
        self.assert_attached();
        if self.device.is_some() {
            return Ok(());
        }

        let gl = &self.gl;
        let shaders = Shaders::compile(gl, self.gl_version, self.glsl_override, self.output_srgb)?;
        let vbo = create_buffer(gl, "vertex buffer")?;
        let ebo = create_buffer(gl, "index buffer")?;
        self.device = Some(DeviceObjects { shaders, vbo, ebo });
        log::debug!("created GL device objects");
        Ok(())
    }

    /// Deletes the shader program, buffers and font atlas texture.
    /// Harmless when nothing exists.
    pub fn destroy_device_objects(&mut self, fonts: &mut FontAtlas) {
        self.assert_attached();
        self.destroy_fonts_texture(fonts);
        if let Some(device) = self.device.take() {
            device.shaders.destroy(&self.gl);
            unsafe {
                self.gl.delete_buffer(device.vbo);
                self.gl.delete_buffer(device.ebo);
            }
            log::debug!("destroyed GL device objects");
        }
    }

    /// Builds the atlas if needed and (re)uploads it as an sRGB
    /// texture, replacing any previous upload and recording the new id
    /// in `fonts`.
    ///
    /// # Errors
    /// Fails when the atlas cannot be built or the texture cannot be
    /// created.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn create_fonts_texture(&mut self, fonts: &mut FontAtlas) -> RendererResult<()> {
        self.assert_attached();
        fonts.ensure_built()?;
        let (width, height) = fonts.dimensions();
        let pixels = fonts.pixels().ok_or(RendererError::AtlasNotBuilt)?;

        if let Some(prev) = self.font_texture.take() {
            unsafe { self.gl.delete_texture(prev.raw) };
            self.textures.remove(prev.id);
        }

        let gl = &self.gl;
        let raw = unsafe { gl.create_texture() }
            .map_err(|detail| RendererError::CreateObject { what: "font atlas texture", detail })?;

        unsafe {
            let prev_active = gl.get_parameter_i32(glow::ACTIVE_TEXTURE) as u32;
            gl.active_texture(glow::TEXTURE0);
            let prev_binding = gl.get_parameter_i32(glow::TEXTURE_BINDING_2D) as u32;
            let prev_unpack = gl.get_parameter_i32(glow::UNPACK_ALIGNMENT);

            gl.bind_texture(glow::TEXTURE_2D, Some(raw));
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::SRGB8_ALPHA8 as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels)),
            );

            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, prev_unpack);
            gl.bind_texture(glow::TEXTURE_2D, to_native(prev_binding, glow::NativeTexture));
            gl.active_texture(prev_active);
        }

        let id = self.textures.insert(raw);
        fonts.set_texture_id(id);
        self.font_texture = Some(FontTexture { raw, id, atlas_version: fonts.version() });
        log::debug!("uploaded font atlas texture ({width}x{height})");
        Ok(())
    }

    /// Deletes the font atlas texture and clears the id recorded in
    /// `fonts`. Harmless when no upload exists.
    pub fn destroy_fonts_texture(&mut self, fonts: &mut FontAtlas) {
        self.assert_attached();
        if let Some(prev) = self.font_texture.take() {
            unsafe { self.gl.delete_texture(prev.raw) };
            self.textures.remove(prev.id);
            fonts.set_texture_id(TextureId::null());
            log::debug!("destroyed font atlas texture");
        }
    }

    /// Ensures device objects exist and the uploaded font texture
    /// matches the atlas revision, re-uploading after font changes.
    ///
    /// # Errors
    /// Fails when recreating a missing device object fails.
    pub fn new_frame(&mut self, ctx: &mut Context) -> RendererResult<()> {
        self.assert_attached();
        self.create_device_objects()?;

        let fonts = ctx.fonts_mut();
        let uploaded = self.font_texture.as_ref().map(|font| font.atlas_version);
        if uploaded != Some(fonts.version()) {
            self.create_fonts_texture(fonts)?;
        }
        Ok(())
    }

    /// Replays `draw_data` into the current GL context.
    ///
    /// The caller's GL state is captured before submission and restored
    /// afterwards. Draw commands whose texture id no longer resolves
    /// are skipped.
    ///
    /// # Errors
    /// Fails when a missing device object cannot be recreated.
    ///
    /// # Panics
    /// Panics when `draw_data` has been invalidated by a later
    /// `new_frame`.
    pub fn render_draw_data(&mut self, draw_data: &DrawData) -> RendererResult<()> {
        self.assert_attached();
        let lists = draw_data.draw_lists();

        let fb_width = draw_data.display_size[0] * draw_data.framebuffer_scale[0];
        let fb_height = draw_data.display_size[1] * draw_data.framebuffer_scale[1];
        let renderable = fb_width > 0.0 && fb_height > 0.0;
        if !renderable {
            return Ok(());
        }

        self.create_device_objects()?;
        let Some(device) = self.device.as_ref() else {
            return Ok(());
        };

        self.state_backup.save(&self.gl, self.gl_version);
        let result = self.submit(device, lists, draw_data, fb_width, fb_height);
        self.state_backup.restore(&self.gl);
        result
    }

    /// Reverses init: destroys every GPU object and clears the renderer
    /// identity from `ctx`.
    pub fn shutdown(&mut self, ctx: &mut Context) {
        if self.detached {
            return;
        }
        self.destroy_device_objects(ctx.fonts_mut());
        for texture in self.textures.drain() {
            unsafe { self.gl.delete_texture(texture) };
        }

        let io = ctx.io_mut();
        io.backend_flags.remove(BackendFlags::RENDERER_HAS_VTX_OFFSET);
        io.set_backend_renderer_name(None);
        self.detached = true;
        log::info!("glow renderer detached");
    }

    fn submit(
        &self,
        device: &DeviceObjects,
        lists: &[DrawListData],
        draw_data: &DrawData,
        fb_width: f32,
        fb_height: f32,
    ) -> RendererResult<()> {
        let gl = &self.gl;

        // A throwaway VAO keeps attribute setup off the caller's state.
        let vao = if self.gl_version.bind_vertex_array_support() {
            let vao = unsafe { gl.create_vertex_array() }.map_err(|detail| {
                RendererError::CreateObject { what: "vertex array object", detail }
            })?;
            unsafe { gl.bind_vertex_array(Some(vao)) };
            Some(vao)
        } else {
            None
        };

        self.apply_render_state(device, draw_data, fb_width, fb_height);

        for list in lists {
            unsafe {
                gl.buffer_data_u8_slice(
                    glow::ARRAY_BUFFER,
                    bytemuck::cast_slice(list.vertices()),
                    glow::STREAM_DRAW,
                );
                gl.buffer_data_u8_slice(
                    glow::ELEMENT_ARRAY_BUFFER,
                    bytemuck::cast_slice(list.indices()),
                    glow::STREAM_DRAW,
                );
            }
            for cmd in list.commands() {
                self.draw_command(cmd, draw_data, fb_width, fb_height);
            }
        }

        if let Some(vao) = vao {
            unsafe { gl.delete_vertex_array(vao) };
        }
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn apply_render_state(
        &self,
        device: &DeviceObjects,
        draw_data: &DrawData,
        fb_width: f32,
        fb_height: f32,
    ) {
        let gl = &self.gl;
        unsafe {
            gl.active_texture(glow::TEXTURE0);
            gl.enable(glow::BLEND);
            gl.blend_equation(glow::FUNC_ADD);
            gl.blend_func_separate(
                glow::SRC_ALPHA,
                glow::ONE_MINUS_SRC_ALPHA,
                glow::ONE,
                glow::ONE_MINUS_SRC_ALPHA,
            );
            gl.disable(glow::CULL_FACE);
            gl.disable(glow::DEPTH_TEST);
            gl.disable(glow::STENCIL_TEST);
            gl.enable(glow::SCISSOR_TEST);
            if self.gl_version.primitive_restart_support() {
                gl.disable(glow::PRIMITIVE_RESTART);
            }
            if self.gl_version.polygon_mode_support() {
                gl.polygon_mode(glow::FRONT_AND_BACK, glow::FILL);
            }

            gl.viewport(0, 0, fb_width as i32, fb_height as i32);
        }

        let clip_origin_is_lower_left = if self.has_clip_origin_support {
            (unsafe { gl.get_parameter_i32(glow::CLIP_ORIGIN) }) != glow::UPPER_LEFT as i32
        } else {
            true
        };
        let projection = ortho_projection(draw_data, clip_origin_is_lower_left);

        let stride = size_of::<DrawVert>() as i32;
        unsafe {
            gl.use_program(Some(device.shaders.program));
            gl.uniform_1_i32(Some(&device.shaders.texture_uniform), 0);
            gl.uniform_matrix_4_f32_slice(
                Some(&device.shaders.projection_uniform),
                false,
                &projection,
            );
            if self.gl_version.bind_sampler_support() {
                gl.bind_sampler(0, None);
            }

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(device.vbo));
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(device.ebo));
            gl.enable_vertex_attrib_array(device.shaders.position_attrib);
            gl.vertex_attrib_pointer_f32(
                device.shaders.position_attrib,
                2,
                glow::FLOAT,
                false,
                stride,
                offset_of!(DrawVert, pos) as i32,
            );
            gl.enable_vertex_attrib_array(device.shaders.uv_attrib);
            gl.vertex_attrib_pointer_f32(
                device.shaders.uv_attrib,
                2,
                glow::FLOAT,
                false,
                stride,
                offset_of!(DrawVert, uv) as i32,
            );
            gl.enable_vertex_attrib_array(device.shaders.color_attrib);
            gl.vertex_attrib_pointer_f32(
                device.shaders.color_attrib,
                4,
                glow::UNSIGNED_BYTE,
                true,
                stride,
                offset_of!(DrawVert, col) as i32,
            );
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn draw_command(&self, cmd: &DrawCmd, draw_data: &DrawData, fb_width: f32, fb_height: f32) {
        let Some(scissor) = scissor_rect(
            cmd.clip_rect,
            draw_data.display_pos,
            draw_data.framebuffer_scale,
            fb_width,
            fb_height,
        ) else {
            return;
        };

        let Some(texture) = self.textures.get(cmd.texture_id).copied() else {
            log::trace!("skipping draw command with stale texture id {:?}", cmd.texture_id);
            return;
        };

        let gl = &self.gl;
        unsafe {
            gl.scissor(scissor[0], scissor[1], scissor[2], scissor[3]);
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));

            // DrawIdx is pinned to u16 by the C layout.
            let count = cmd.elem_count as i32;
            let idx_byte_offset = (cmd.idx_offset as usize * size_of::<DrawIdx>()) as i32;
            if self.gl_version.vertex_offset_support() {
                gl.draw_elements_base_vertex(
                    glow::TRIANGLES,
                    count,
                    glow::UNSIGNED_SHORT,
                    idx_byte_offset,
                    cmd.vtx_offset as i32,
                );
            } else {
                gl.draw_elements(glow::TRIANGLES, count, glow::UNSIGNED_SHORT, idx_byte_offset);
            }
        }
    }

    fn assert_attached(&self) {
        assert!(!self.detached, "GlowRenderer used after shutdown");
    }
}

impl RendererBackend for GlowRenderer {
    fn new_frame(&mut self, ctx: &mut Context) -> RendererResult<()> {
        Self::new_frame(self, ctx)
    }

    fn render_draw_data(&mut self, draw_data: &DrawData) -> RendererResult<()> {
        Self::render_draw_data(self, draw_data)
    }

    fn shutdown(&mut self, ctx: &mut Context) {
        Self::shutdown(self, ctx)
    }
}

/// GPU objects are deleted on drop when `shutdown` never ran; the GL
/// context must still be current on this thread for that to reach the
/// driver.
impl Drop for GlowRenderer {
    fn drop(&mut self) {
        if self.detached {
            return;
        }
        if let Some(device) = self.device.take() {
            device.shaders.destroy(&self.gl);
            unsafe {
                self.gl.delete_buffer(device.vbo);
                self.gl.delete_buffer(device.ebo);
            }
        }
        if let Some(font) = self.font_texture.take() {
            unsafe { self.gl.delete_texture(font.raw) };
        }
        for texture in self.textures.drain() {
            unsafe { self.gl.delete_texture(texture) };
        }
    }
}

fn create_buffer(gl: &glow::Context, what: &'static str) -> RendererResult<glow::Buffer> {
    unsafe { gl.create_buffer() }.map_err(|detail| RendererError::CreateObject { what, detail })
}

fn has_clip_control_extension(gl: &glow::Context) -> bool {
    let count = unsafe { gl.get_parameter_i32(glow::NUM_EXTENSIONS) };
    let count = u32::try_from(count).unwrap_or(0);
    (0..count).any(|index| {
        (unsafe { gl.get_parameter_indexed_string(glow::EXTENSIONS, index) }) == "GL_ARB_clip_control"
    })
}

/// Orthographic projection from display space to clip space, flipped
/// vertically when the context's clip origin is upper-left.
fn ortho_projection(draw_data: &DrawData, clip_origin_is_lower_left: bool) -> [f32; 16] {
    let left = draw_data.display_pos[0];
    let right = draw_data.display_pos[0] + draw_data.display_size[0];
    let top = draw_data.display_pos[1];
    let bottom = draw_data.display_pos[1] + draw_data.display_size[1];

    let (top, bottom) = if clip_origin_is_lower_left {
        (top, bottom)
    } else {
        (bottom, top)
    };

    [
        2.0 / (right - left),
        0.0,
        0.0,
        0.0,
        0.0,
        2.0 / (top - bottom),
        0.0,
        0.0,
        0.0,
        0.0,
        -1.0,
        0.0,
        (right + left) / (left - right),
        (top + bottom) / (bottom - top),
        0.0,
        1.0,
    ]
}

/// Maps a draw command's clip rectangle into framebuffer scissor
/// coordinates (Y up); `None` when the rectangle misses the
/// framebuffer entirely.
#[allow(clippy::cast_possible_truncation)]
fn scissor_rect(
    clip_rect: [f32; 4],
    clip_off: [f32; 2],
    scale: [f32; 2],
    fb_width: f32,
    fb_height: f32,
) -> Option<[i32; 4]> {
    let x1 = (clip_rect[0] - clip_off[0]) * scale[0];
    let y1 = (clip_rect[1] - clip_off[1]) * scale[1];
    let x2 = (clip_rect[2] - clip_off[0]) * scale[0];
    let y2 = (clip_rect[3] - clip_off[1]) * scale[1];

    if x1 >= fb_width || y1 >= fb_height || x2 < 0.0 || y2 < 0.0 {
        return None;
    }

    Some([
        x1 as i32,
        (fb_height - y2) as i32,
        (x2 - x1) as i32,
        (y2 - y1) as i32,
    ])
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn project(matrix: &[f32; 16], x: f32, y: f32) -> (f32, f32) {
        (
            matrix[0] * x + matrix[12],
            matrix[5] * y + matrix[13],
        )
    }

    fn draw_data_for(display_pos: [f32; 2], display_size: [f32; 2]) -> DrawData {
        let mut draw_data = DrawData::invalid();
        draw_data.display_pos = display_pos;
        draw_data.display_size = display_size;
        draw_data.framebuffer_scale = [1.0, 1.0];
        draw_data
    }

    #[test]
    fn test_ortho_projection_maps_display_corners_to_ndc() {
        let draw_data = draw_data_for([0.0, 0.0], [800.0, 600.0]);
        let matrix = ortho_projection(&draw_data, true);

        let (x, y) = project(&matrix, 0.0, 0.0);
        assert_relative_eq!(x, -1.0);
        assert_relative_eq!(y, 1.0);

        let (x, y) = project(&matrix, 800.0, 600.0);
        assert_relative_eq!(x, 1.0);
        assert_relative_eq!(y, -1.0);
    }

    #[test]
    fn test_ortho_projection_honors_display_pos_offset() {
        let draw_data = draw_data_for([100.0, 50.0], [800.0, 600.0]);
        let matrix = ortho_projection(&draw_data, true);

        let (x, y) = project(&matrix, 100.0, 50.0);
        assert_relative_eq!(x, -1.0);
        assert_relative_eq!(y, 1.0);
    }

    #[test]
    fn test_ortho_projection_flips_for_upper_left_clip_origin() {
        let draw_data = draw_data_for([0.0, 0.0], [800.0, 600.0]);
        let matrix = ortho_projection(&draw_data, false);

        let (_, y) = project(&matrix, 0.0, 0.0);
        assert_relative_eq!(y, -1.0);

        let (_, y) = project(&matrix, 0.0, 600.0);
        assert_relative_eq!(y, 1.0);
    }

    #[test]
    fn test_scissor_rect_flips_y_and_scales() {
        let rect = scissor_rect(
            [10.0, 20.0, 110.0, 70.0],
            [0.0, 0.0],
            [2.0, 2.0],
            1600.0,
            1200.0,
        )
        .unwrap();
        // Y measures up from the bottom of the framebuffer.
        assert_eq!(rect, [20, 1200 - 140, 200, 100]);
    }

    #[test]
    fn test_scissor_rect_subtracts_display_origin() {
        let rect = scissor_rect(
            [110.0, 70.0, 210.0, 170.0],
            [100.0, 50.0],
            [1.0, 1.0],
            800.0,
            600.0,
        )
        .unwrap();
        assert_eq!(rect, [10, 600 - 120, 100, 100]);
    }

    #[test]
    fn test_scissor_rect_culls_fully_offscreen_commands() {
        assert!(scissor_rect([900.0, 0.0, 950.0, 50.0], [0.0, 0.0], [1.0, 1.0], 800.0, 600.0)
            .is_none());
        assert!(scissor_rect([-50.0, 0.0, -10.0, 50.0], [0.0, 0.0], [1.0, 1.0], 800.0, 600.0)
            .is_none());
        assert!(scissor_rect([0.0, 700.0, 50.0, 750.0], [0.0, 0.0], [1.0, 1.0], 800.0, 600.0)
            .is_none());
    }

    #[test]
    fn test_scissor_rect_keeps_partially_visible_commands() {
        // Straddling the left edge still scissors; GL clamps for us.
        let rect = scissor_rect(
            [-20.0, 10.0, 30.0, 60.0],
            [0.0, 0.0],
            [1.0, 1.0],
            800.0,
            600.0,
        )
        .unwrap();
        assert_eq!(rect, [-20, 600 - 60, 50, 50]);
    }
}
