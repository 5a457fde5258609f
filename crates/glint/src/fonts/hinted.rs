//! FreeType-backed rasterization with hint processing
//!
//! Compiled only under the `hinting` feature: it links the system FreeType
//! library, which is the external dependency the hinting build variant
//! exists to isolate. Glyphs come out through the same [`GlyphRasterizer`]
//! seam as the default rasterizer, with `TARGET_LIGHT` hinting applied.

use freetype::face::LoadFlag;

use crate::fonts::{FontError, FontResult, GlyphRasterizer, LineMetrics, RasterGlyph};

/// [`GlyphRasterizer`] over a FreeType face.
pub struct FreetypeRasterizer {
    _library: freetype::Library,
    face: freetype::face::Face,
}

impl FreetypeRasterizer {
    /// Parses TTF/OTF bytes through FreeType.
    pub fn from_bytes(data: &[u8]) -> FontResult<Self> {
        let library =
            freetype::Library::init().map_err(|e| FontError::LoadFailed(e.to_string()))?;
        let face = library
            .new_memory_face(data.to_vec(), 0)
            .map_err(|e| FontError::LoadFailed(e.to_string()))?;
        Ok(Self {
            _library: library,
            face,
        })
    }

    fn apply_size(&self, size_px: f32) -> bool {
        self.face.set_pixel_sizes(0, size_px.max(1.0) as u32).is_ok()
    }
}

impl GlyphRasterizer for FreetypeRasterizer {
    fn line_metrics(&self, size_px: f32) -> LineMetrics {
        let fallback = LineMetrics {
            ascent: size_px * 0.8,
            descent: size_px * -0.2,
            line_height: size_px * 1.2,
        };
        if !self.apply_size(size_px) {
            return fallback;
        }
        // 26.6 fixed point throughout the size metrics.
        self.face.size_metrics().map_or(fallback, |m| LineMetrics {
            ascent: m.ascender as f32 / 64.0,
            descent: m.descender as f32 / 64.0,
            line_height: m.height as f32 / 64.0,
        })
    }

    fn covers(&self, c: char) -> bool {
        self.face.get_char_index(c as usize).is_some()
    }

    fn rasterize(&self, c: char, size_px: f32) -> Option<RasterGlyph> {
        if !self.covers(c) || !self.apply_size(size_px) {
            return None;
        }
        self.face
            .load_char(c as usize, LoadFlag::RENDER | LoadFlag::TARGET_LIGHT)
            .ok()?;

        let slot = self.face.glyph();
        let bitmap = slot.bitmap();
        let width = bitmap.width().max(0) as u32;
        let height = bitmap.rows().max(0) as u32;
        let pitch = bitmap.pitch();
        let buffer = bitmap.buffer();

        let mut coverage = vec![0u8; (width * height) as usize];
        for row in 0..height {
            // Negative pitch stores rows bottom-up.
            let src_row = if pitch >= 0 {
                row as usize * pitch as usize
            } else {
                (height - 1 - row) as usize * pitch.unsigned_abs() as usize
            };
            let dst_row = (row * width) as usize;
            coverage[dst_row..dst_row + width as usize]
                .copy_from_slice(&buffer[src_row..src_row + width as usize]);
        }

        Some(RasterGlyph {
            coverage,
            width,
            height,
            // bitmap_top is baseline-to-top, positive upward.
            offset: [slot.bitmap_left() as f32, -(slot.bitmap_top() as f32)],
            advance: slot.advance().x as f32 / 64.0,
        })
    }
}
