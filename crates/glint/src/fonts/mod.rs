//! Font atlas and glyph rasterization seam
//!
//! The atlas owns packed glyph coverage for every registered font plus the
//! white pixel untextured primitives sample. Rasterization itself is
//! delegated through [`GlyphRasterizer`]: the default implementation wraps
//! `fontdue`; the `hinting` build variant adds a FreeType-backed one with
//! proper hint processing. The GPU side only ever sees the packed RGBA
//! pixels; uploading them and parking the resulting [`TextureId`]
//! (crate::textures::TextureId) back on the atlas is the renderer backend's
//! job.

mod atlas;
#[cfg(feature = "hinting")]
mod hinted;

pub use atlas::{Font, FontAtlas, FontConfig, FontId, Glyph};
#[cfg(feature = "hinting")]
pub use hinted::FreetypeRasterizer;

/// Result type for font operations.
pub type FontResult<T> = Result<T, FontError>;

/// Errors that can occur while loading fonts or building the atlas.
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// Font data could not be parsed.
    #[error("Failed to load font: {0}")]
    LoadFailed(String),

    /// A glyph could not be rasterized.
    #[error("Failed to rasterize glyph '{0}'")]
    RasterizeFailed(char),

    /// The packed glyphs exceed the maximum atlas size.
    #[error("Font atlas overflow: required height {required_height} exceeds the maximum")]
    AtlasOverflow {
        /// Height the packing would have needed.
        required_height: u32,
    },
}

/// Vertical metrics of a font at a given pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    /// Pixels from the baseline to the top of the tallest glyph.
    pub ascent: f32,
    /// Pixels from the baseline to the bottom of the lowest glyph;
    /// negative below the baseline.
    pub descent: f32,
    /// Baseline-to-baseline distance.
    pub line_height: f32,
}

/// One rasterized glyph: a coverage bitmap plus placement metrics.
#[derive(Debug, Clone)]
pub struct RasterGlyph {
    /// 8-bit coverage, row-major, `width * height` bytes.
    pub coverage: Vec<u8>,
    /// Bitmap width in pixels.
    pub width: u32,
    /// Bitmap height in pixels.
    pub height: u32,
    /// Offset from the pen position (on the baseline) to the bitmap's
    /// top-left corner, in screen coordinates (y grows downward).
    pub offset: [f32; 2],
    /// Horizontal pen advance.
    pub advance: f32,
}

/// Rasterization seam between the atlas and a font library.
pub trait GlyphRasterizer {
    /// Vertical metrics at `size_px`.
    fn line_metrics(&self, size_px: f32) -> LineMetrics;

    /// Whether the font has a glyph for `c`.
    fn covers(&self, c: char) -> bool;

    /// Rasterizes `c` at `size_px`; `None` when the font has no glyph
    /// for it.
    fn rasterize(&self, c: char, size_px: f32) -> Option<RasterGlyph>;
}

/// Default rasterizer wrapping a `fontdue` font.
pub struct FontdueRasterizer {
    font: fontdue::Font,
}

impl FontdueRasterizer {
    /// Parses TTF/OTF bytes.
    pub fn from_bytes(data: &[u8]) -> FontResult<Self> {
        let font = fontdue::Font::from_bytes(data, fontdue::FontSettings::default())
            .map_err(|e| FontError::LoadFailed(e.to_string()))?;
        Ok(Self { font })
    }
}

impl GlyphRasterizer for FontdueRasterizer {
    fn line_metrics(&self, size_px: f32) -> LineMetrics {
        self.font.horizontal_line_metrics(size_px).map_or(
            LineMetrics {
                ascent: size_px * 0.8,
                descent: size_px * -0.2,
                line_height: size_px * 1.2,
            },
            |m| LineMetrics {
                ascent: m.ascent,
                descent: m.descent,
                line_height: m.new_line_size,
            },
        )
    }

    fn covers(&self, c: char) -> bool {
        self.font.lookup_glyph_index(c) != 0
    }

    fn rasterize(&self, c: char, size_px: f32) -> Option<RasterGlyph> {
        if !self.covers(c) {
            return None;
        }
        let (metrics, coverage) = self.font.rasterize(c, size_px);
        Some(RasterGlyph {
            coverage,
            width: metrics.width as u32,
            height: metrics.height as u32,
            // fontdue reports ymin upward from the baseline to the bitmap
            // bottom; screen space wants baseline-to-top, y down.
            offset: [
                metrics.xmin as f32,
                -(metrics.ymin as f32 + metrics.height as f32),
            ],
            advance: metrics.advance_width,
        })
    }
}
