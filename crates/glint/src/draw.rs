//! Frame geometry: vertices, draw commands, draw lists and [`DrawData`]
//!
//! Draw lists record triangles between `new_frame` and `render`; `render`
//! seals them into a [`DrawData`] block that renderer backends (and C
//! callers) consume. [`DrawVert`], [`DrawCmd`], [`DrawListData`] and
//! [`DrawData`] are `#[repr(C)]` because they cross the C boundary as raw
//! memory; their layout is pinned by tests and must only change together
//! with a facade rebuild.
//!
//! Untextured primitives sample the font atlas white pixel so that shapes,
//! text and images interleave into as few commands as possible. Commands
//! split only when the clip rectangle, the bound texture, or the 16-bit
//! index window changes.

use crate::fonts::FontAtlas;
use crate::textures::TextureId;

/// Index element type of every draw list.
pub type DrawIdx = u16;

/// Vertices addressable by one command's 16-bit indices.
const VTX_WINDOW: u32 = 1 << 16;

/// Packs one RGBA color into the `0xAABBGGRR` form stored in [`DrawVert`].
///
/// Byte order in memory is R, G, B, A on little-endian targets, matching
/// the layout renderers feed to 4-byte normalized vertex attributes.
#[must_use]
pub const fn col32(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (r as u32) | ((g as u32) << 8) | ((b as u32) << 16) | ((a as u32) << 24)
}

/// One interleaved vertex: position, atlas coordinates, packed color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawVert {
    /// Position in screen coordinates.
    pub pos: [f32; 2],
    /// Texture coordinates, normalized.
    pub uv: [f32; 2],
    /// Packed RGBA color, see [`col32`].
    pub col: u32,
}

unsafe impl bytemuck::Pod for DrawVert {}
unsafe impl bytemuck::Zeroable for DrawVert {}

/// One draw call: a clipped, textured range of a list's index buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCmd {
    /// Clip rectangle `[min_x, min_y, max_x, max_y]` in screen coordinates.
    pub clip_rect: [f32; 4],
    /// Texture bound for this range.
    pub texture_id: TextureId,
    /// Value added to every index in the range; nonzero only when the list
    /// outgrew one 16-bit index window.
    pub vtx_offset: u32,
    /// First index of the range.
    pub idx_offset: u32,
    /// Number of indices in the range; always a multiple of 3.
    pub elem_count: u32,
}

/// Records triangles for one layer of a frame.
///
/// Reset by the context at `new_frame`; filled through the `add_*` methods;
/// borrowed immutably by [`DrawData`] between `render` and the next
/// `new_frame`.
#[derive(Debug, Default)]
pub struct DrawList {
    vtx: Vec<DrawVert>,
    idx: Vec<DrawIdx>,
    cmds: Vec<DrawCmd>,
    clip_stack: Vec<[f32; 4]>,
    texture_stack: Vec<TextureId>,
    frame_clip: [f32; 4],
    atlas_texture: TextureId,
    white_uv: [f32; 2],
    vtx_base: u32,
}

impl DrawList {
    /// Clears recorded geometry and rebinds the per-frame shared state:
    /// the full-display clip rectangle, the font atlas texture and its
    /// white-pixel coordinates.
    pub(crate) fn reset(&mut self, frame_clip: [f32; 4], atlas_texture: TextureId, white_uv: [f32; 2]) {
        self.vtx.clear();
        self.idx.clear();
        self.cmds.clear();
        self.clip_stack.clear();
        self.texture_stack.clear();
        self.frame_clip = frame_clip;
        self.atlas_texture = atlas_texture;
        self.white_uv = white_uv;
        self.vtx_base = 0;
    }

    /// Recorded vertex count.
    #[must_use]
    pub fn vtx_count(&self) -> usize {
        self.vtx.len()
    }

    /// Recorded index count.
    #[must_use]
    pub fn idx_count(&self) -> usize {
        self.idx.len()
    }

    /// Recorded commands.
    #[must_use]
    pub fn commands(&self) -> &[DrawCmd] {
        &self.cmds
    }

    /// Recorded vertices.
    #[must_use]
    pub fn vertices(&self) -> &[DrawVert] {
        &self.vtx
    }

    /// Recorded indices.
    #[must_use]
    pub fn indices(&self) -> &[DrawIdx] {
        &self.idx
    }

    /// Narrows the active clip rectangle; `intersect` clips against the
    /// current rectangle instead of replacing it.
    pub fn push_clip_rect(&mut self, min: [f32; 2], max: [f32; 2], intersect: bool) {
        let mut rect = [min[0], min[1], max[0], max[1]];
        if intersect {
            let cur = self.current_clip();
            rect = [
                rect[0].max(cur[0]),
                rect[1].max(cur[1]),
                rect[2].min(cur[2]),
                rect[3].min(cur[3]),
            ];
        }
        if rect[2] < rect[0] {
            rect[2] = rect[0];
        }
        if rect[3] < rect[1] {
            rect[3] = rect[1];
        }
        self.clip_stack.push(rect);
    }

    /// Restores the clip rectangle active before the matching push.
    ///
    /// # Panics
    /// Panics when no clip rectangle is pushed; it is a call-order error.
    pub fn pop_clip_rect(&mut self) {
        assert!(self.clip_stack.pop().is_some(), "pop_clip_rect without matching push");
    }

    /// Binds `texture` for subsequent primitives.
    pub fn push_texture_id(&mut self, texture: TextureId) {
        self.texture_stack.push(texture);
    }

    /// Restores the texture bound before the matching push.
    ///
    /// # Panics
    /// Panics when no texture is pushed; it is a call-order error.
    pub fn pop_texture_id(&mut self) {
        assert!(self.texture_stack.pop().is_some(), "pop_texture_id without matching push");
    }

    /// Active clip rectangle.
    #[must_use]
    pub fn current_clip(&self) -> [f32; 4] {
        self.clip_stack.last().copied().unwrap_or(self.frame_clip)
    }

    /// Active texture.
    #[must_use]
    pub fn current_texture(&self) -> TextureId {
        self.texture_stack.last().copied().unwrap_or(self.atlas_texture)
    }

    /// Filled axis-aligned rectangle.
    pub fn add_rect_filled(&mut self, min: [f32; 2], max: [f32; 2], col: u32) {
        if (col >> 24) == 0 {
            return;
        }
        let uv = self.white_uv;
        self.push_quad(
            [min, [max[0], min[1]], max, [min[0], max[1]]],
            [uv, uv, uv, uv],
            col,
        );
    }

    /// Rectangle outline of the given thickness, drawn inward.
    pub fn add_rect(&mut self, min: [f32; 2], max: [f32; 2], col: u32, thickness: f32) {
        let t = thickness.max(0.0);
        if (col >> 24) == 0 || t == 0.0 {
            return;
        }
        self.add_rect_filled(min, [max[0], min[1] + t], col);
        self.add_rect_filled([min[0], max[1] - t], max, col);
        self.add_rect_filled([min[0], min[1] + t], [min[0] + t, max[1] - t], col);
        self.add_rect_filled([max[0] - t, min[1] + t], max, col);
    }

    /// Line segment as a screen-aligned quad.
    pub fn add_line(&mut self, p1: [f32; 2], p2: [f32; 2], col: u32, thickness: f32) {
        if (col >> 24) == 0 {
            return;
        }
        let dx = p2[0] - p1[0];
        let dy = p2[1] - p1[1];
        let len = (dx * dx + dy * dy).sqrt();
        if len <= 0.0 {
            return;
        }
        let half = thickness.max(1.0) * 0.5;
        let nx = -dy / len * half;
        let ny = dx / len * half;
        let uv = self.white_uv;
        self.push_quad(
            [
                [p1[0] + nx, p1[1] + ny],
                [p2[0] + nx, p2[1] + ny],
                [p2[0] - nx, p2[1] - ny],
                [p1[0] - nx, p1[1] - ny],
            ],
            [uv, uv, uv, uv],
            col,
        );
    }

    /// Textured quad; `uv_min`/`uv_max` address the given texture.
    pub fn add_image(
        &mut self,
        texture: TextureId,
        min: [f32; 2],
        max: [f32; 2],
        uv_min: [f32; 2],
        uv_max: [f32; 2],
        col: u32,
    ) {
        if (col >> 24) == 0 {
            return;
        }
        self.push_texture_id(texture);
        self.push_quad(
            [min, [max[0], min[1]], max, [min[0], max[1]]],
            [
                uv_min,
                [uv_max[0], uv_min[1]],
                uv_max,
                [uv_min[0], uv_max[1]],
            ],
            col,
        );
        self.pop_texture_id();
    }

    /// Text run in the atlas default font; `pos` is the top-left corner of
    /// the first line. `'\n'` starts a new line; characters the atlas does
    /// not cover are skipped.
    pub fn add_text(&mut self, atlas: &FontAtlas, pos: [f32; 2], col: u32, text: &str) {
        if (col >> 24) == 0 {
            return;
        }
        let Some(font) = atlas.default_font() else {
            log::debug!("add_text with no font in the atlas");
            return;
        };
        let mut x = pos[0];
        let mut y = pos[1] + font.ascent();
        for c in text.chars() {
            if c == '\n' {
                x = pos[0];
                y += font.line_height();
                continue;
            }
            let Some(glyph) = font.glyph(c) else { continue };
            if glyph.size[0] > 0.0 && glyph.size[1] > 0.0 {
                let gx = x + glyph.offset[0];
                let gy = y + glyph.offset[1];
                self.push_quad(
                    [
                        [gx, gy],
                        [gx + glyph.size[0], gy],
                        [gx + glyph.size[0], gy + glyph.size[1]],
                        [gx, gy + glyph.size[1]],
                    ],
                    [
                        glyph.uv_min,
                        [glyph.uv_max[0], glyph.uv_min[1]],
                        glyph.uv_max,
                        [glyph.uv_min[0], glyph.uv_max[1]],
                    ],
                    col,
                );
            }
            x += glyph.advance;
        }
    }

    /// Appends one quad as two triangles, extending the current command or
    /// opening a new one as the clip/texture/index-window state requires.
    fn push_quad(&mut self, p: [[f32; 2]; 4], uv: [[f32; 2]; 4], col: u32) {
        self.ensure_command(4);
        let base = self.vtx.len() as u32 - self.vtx_base;
        debug_assert!(base + 4 <= VTX_WINDOW);
        for i in 0..4 {
            self.vtx.push(DrawVert { pos: p[i], uv: uv[i], col });
        }
        let b = base as DrawIdx;
        self.idx.extend_from_slice(&[b, b + 1, b + 2, b, b + 2, b + 3]);
        let cmd = self.cmds.last_mut().unwrap();
        cmd.elem_count += 6;
    }

    /// Guarantees the last command can take `vtx_add` more vertices with the
    /// active clip and texture.
    fn ensure_command(&mut self, vtx_add: u32) {
        let clip = self.current_clip();
        let texture = self.current_texture();
        let window_used = self.vtx.len() as u32 - self.vtx_base;

        if window_used + vtx_add > VTX_WINDOW {
            self.vtx_base = self.vtx.len() as u32;
        } else if let Some(cmd) = self.cmds.last() {
            if cmd.clip_rect == clip && cmd.texture_id == texture && cmd.vtx_offset == self.vtx_base
            {
                return;
            }
        }
        self.cmds.push(DrawCmd {
            clip_rect: clip,
            texture_id: texture,
            vtx_offset: self.vtx_base,
            idx_offset: self.idx.len() as u32,
            elem_count: 0,
        });
    }
}

/// C-visible view of one sealed draw list: raw slices into the list's
/// buffers. Valid for the same window as the owning [`DrawData`].
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct DrawListData {
    /// Vertex buffer.
    pub vtx_data: *const DrawVert,
    /// Index buffer.
    pub idx_data: *const DrawIdx,
    /// Command array.
    pub cmd_data: *const DrawCmd,
    /// Vertex count.
    pub vtx_len: i32,
    /// Index count.
    pub idx_len: i32,
    /// Command count.
    pub cmd_len: i32,
}

impl DrawListData {
    pub(crate) fn from_list(list: &DrawList) -> Self {
        Self {
            vtx_data: list.vtx.as_ptr(),
            idx_data: list.idx.as_ptr(),
            cmd_data: list.cmds.as_ptr(),
            vtx_len: list.vtx.len() as i32,
            idx_len: list.idx.len() as i32,
            cmd_len: list.cmds.len() as i32,
        }
    }

    /// Vertices of this list.
    #[must_use]
    pub fn vertices(&self) -> &[DrawVert] {
        // Pointers come from the context-owned vectors and stay untouched
        // while the DrawData that carries this view is valid.
        unsafe { std::slice::from_raw_parts(self.vtx_data, self.vtx_len as usize) }
    }

    /// Indices of this list.
    #[must_use]
    pub fn indices(&self) -> &[DrawIdx] {
        unsafe { std::slice::from_raw_parts(self.idx_data, self.idx_len as usize) }
    }

    /// Commands of this list.
    #[must_use]
    pub fn commands(&self) -> &[DrawCmd] {
        unsafe { std::slice::from_raw_parts(self.cmd_data, self.cmd_len as usize) }
    }
}

/// Sealed output of one frame.
///
/// Produced by `render`, invalidated by the next `new_frame`. The struct is
/// handed to C callers by pointer; renderers written in Rust use
/// [`DrawData::draw_lists`].
#[repr(C)]
#[derive(Debug)]
pub struct DrawData {
    /// Whether the block describes a sealed frame. Cleared by `new_frame`.
    pub valid: bool,
    /// Sealed list views; `cmd_lists_count` entries.
    pub cmd_lists: *const DrawListData,
    /// Number of entries behind `cmd_lists`.
    pub cmd_lists_count: i32,
    /// Sum of all list index counts.
    pub total_idx_count: i32,
    /// Sum of all list vertex counts.
    pub total_vtx_count: i32,
    /// Top-left of the rendered area in screen coordinates.
    pub display_pos: [f32; 2],
    /// Size of the rendered area in screen coordinates.
    pub display_size: [f32; 2],
    /// Framebuffer pixels per screen coordinate.
    pub framebuffer_scale: [f32; 2],
}

impl DrawData {
    pub(crate) fn invalid() -> Self {
        Self {
            valid: false,
            cmd_lists: std::ptr::null(),
            cmd_lists_count: 0,
            total_idx_count: 0,
            total_vtx_count: 0,
            display_pos: [0.0, 0.0],
            display_size: [0.0, 0.0],
            framebuffer_scale: [1.0, 1.0],
        }
    }

    /// Sealed draw lists of this frame.
    ///
    /// # Panics
    /// Panics when the block is not valid; the frame was not sealed or a
    /// later `new_frame` already invalidated it.
    #[must_use]
    pub fn draw_lists(&self) -> &[DrawListData] {
        assert!(self.valid, "draw data used outside its render..new_frame window");
        if self.cmd_lists.is_null() {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(self.cmd_lists, self.cmd_lists_count as usize) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{align_of, offset_of, size_of};

    fn test_list() -> DrawList {
        let mut list = DrawList::default();
        list.reset([0.0, 0.0, 800.0, 600.0], TextureId::null(), [0.5, 0.5]);
        list
    }

    #[test]
    fn test_col32_packing() {
        assert_eq!(col32(0xff, 0, 0, 0xff), 0xff00_00ff);
        assert_eq!(col32(0x11, 0x22, 0x33, 0x44), 0x4433_2211);
        assert_eq!(col32(0, 0, 0, 0), 0);
    }

    #[test]
    fn test_vert_layout_is_pinned() {
        assert_eq!(size_of::<DrawVert>(), 20);
        assert_eq!(align_of::<DrawVert>(), 4);
        assert_eq!(offset_of!(DrawVert, pos), 0);
        assert_eq!(offset_of!(DrawVert, uv), 8);
        assert_eq!(offset_of!(DrawVert, col), 16);
        assert_eq!(size_of::<DrawIdx>(), 2);
    }

    #[test]
    fn test_cmd_layout_is_pinned() {
        assert_eq!(size_of::<DrawCmd>(), 40);
        assert_eq!(align_of::<DrawCmd>(), 8);
        assert_eq!(offset_of!(DrawCmd, clip_rect), 0);
        assert_eq!(offset_of!(DrawCmd, texture_id), 16);
        assert_eq!(offset_of!(DrawCmd, vtx_offset), 24);
        assert_eq!(offset_of!(DrawCmd, idx_offset), 28);
        assert_eq!(offset_of!(DrawCmd, elem_count), 32);
    }

    #[test]
    fn test_draw_data_layout_is_pinned() {
        assert_eq!(size_of::<DrawData>(), 56);
        assert_eq!(align_of::<DrawData>(), 8);
        assert_eq!(offset_of!(DrawData, valid), 0);
        assert_eq!(offset_of!(DrawData, cmd_lists), 8);
        assert_eq!(offset_of!(DrawData, cmd_lists_count), 16);
        assert_eq!(offset_of!(DrawData, total_idx_count), 20);
        assert_eq!(offset_of!(DrawData, total_vtx_count), 24);
        assert_eq!(offset_of!(DrawData, display_pos), 28);
        assert_eq!(offset_of!(DrawData, display_size), 36);
        assert_eq!(offset_of!(DrawData, framebuffer_scale), 44);

        assert_eq!(size_of::<DrawListData>(), 40);
        assert_eq!(offset_of!(DrawListData, vtx_data), 0);
        assert_eq!(offset_of!(DrawListData, idx_data), 8);
        assert_eq!(offset_of!(DrawListData, cmd_data), 16);
        assert_eq!(offset_of!(DrawListData, vtx_len), 24);
        assert_eq!(offset_of!(DrawListData, idx_len), 28);
        assert_eq!(offset_of!(DrawListData, cmd_len), 32);
    }

    #[test]
    fn test_rect_emits_one_quad() {
        let mut list = test_list();
        list.add_rect_filled([10.0, 10.0], [20.0, 20.0], col32(255, 0, 0, 255));
        assert_eq!(list.vtx_count(), 4);
        assert_eq!(list.idx_count(), 6);
        assert_eq!(list.commands().len(), 1);
        assert_eq!(list.commands()[0].elem_count, 6);
    }

    #[test]
    fn test_transparent_color_is_dropped() {
        let mut list = test_list();
        list.add_rect_filled([0.0, 0.0], [5.0, 5.0], col32(255, 255, 255, 0));
        assert_eq!(list.vtx_count(), 0);
        assert_eq!(list.commands().len(), 0);
    }

    #[test]
    fn test_same_state_merges_into_one_command() {
        let mut list = test_list();
        let col = col32(0, 255, 0, 255);
        list.add_rect_filled([0.0, 0.0], [5.0, 5.0], col);
        list.add_rect_filled([10.0, 0.0], [15.0, 5.0], col);
        list.add_line([0.0, 0.0], [10.0, 10.0], col, 1.0);
        assert_eq!(list.commands().len(), 1);
        assert_eq!(list.commands()[0].elem_count, 18);
    }

    #[test]
    fn test_clip_change_splits_commands() {
        let mut list = test_list();
        let col = col32(0, 0, 255, 255);
        list.add_rect_filled([0.0, 0.0], [5.0, 5.0], col);
        list.push_clip_rect([0.0, 0.0], [100.0, 100.0], true);
        list.add_rect_filled([10.0, 0.0], [15.0, 5.0], col);
        list.pop_clip_rect();
        list.add_rect_filled([20.0, 0.0], [25.0, 5.0], col);
        let cmds = list.commands();
        assert_eq!(cmds.len(), 3);
        assert_eq!(cmds[1].clip_rect, [0.0, 0.0, 100.0, 100.0]);
        assert_eq!(cmds[2].clip_rect, [0.0, 0.0, 800.0, 600.0]);
    }

    #[test]
    fn test_clip_intersection_clamps_to_current() {
        let mut list = test_list();
        list.push_clip_rect([100.0, 100.0], [300.0, 300.0], false);
        list.push_clip_rect([50.0, 200.0], [400.0, 400.0], true);
        assert_eq!(list.current_clip(), [100.0, 200.0, 300.0, 300.0]);
        list.pop_clip_rect();
        list.pop_clip_rect();
        assert_eq!(list.current_clip(), [0.0, 0.0, 800.0, 600.0]);
    }

    #[test]
    fn test_image_binds_its_texture_and_restores() {
        let mut list = test_list();
        let tex = TextureId::from_raw(7);
        list.add_rect_filled([0.0, 0.0], [5.0, 5.0], col32(255, 255, 255, 255));
        list.add_image(tex, [0.0, 0.0], [8.0, 8.0], [0.0, 0.0], [1.0, 1.0], col32(255, 255, 255, 255));
        list.add_rect_filled([10.0, 0.0], [15.0, 5.0], col32(255, 255, 255, 255));
        let cmds = list.commands();
        assert_eq!(cmds.len(), 3);
        assert_eq!(cmds[1].texture_id, tex);
        assert_eq!(cmds[0].texture_id, cmds[2].texture_id);
    }

    #[test]
    fn test_index_window_overflow_starts_offset_command() {
        let mut list = test_list();
        let col = col32(255, 255, 255, 255);
        // 16384 quads fill the first 65536-vertex window exactly.
        for i in 0..16385 {
            let x = (i % 100) as f32;
            let y = (i / 100) as f32;
            list.add_rect_filled([x, y], [x + 0.5, y + 0.5], col);
        }
        let cmds = list.commands();
        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[0].vtx_offset, 0);
        assert_eq!(cmds[0].elem_count, 16384 * 6);
        assert_eq!(cmds[1].vtx_offset, 65536);
        assert_eq!(cmds[1].elem_count, 6);
        assert_eq!(list.vtx_count(), 16385 * 4);
    }

    #[test]
    #[should_panic(expected = "pop_clip_rect without matching push")]
    fn test_unbalanced_clip_pop_panics() {
        let mut list = test_list();
        list.pop_clip_rect();
    }
}
