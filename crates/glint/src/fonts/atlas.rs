//! Atlas packing and per-font glyph tables

use std::collections::HashMap;
use std::ops::RangeInclusive;

use crate::fonts::{FontError, FontResult, FontdueRasterizer, GlyphRasterizer, RasterGlyph};
use crate::textures::TextureId;

const ATLAS_WIDTH: u32 = 1024;
const MAX_ATLAS_HEIGHT: u32 = 8192;
const PADDING: u32 = 1;

/// Handle to one font registered on the atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontId(usize);

/// Size and glyph coverage of a font being added.
pub struct FontConfig {
    /// Rasterization size in pixels.
    pub size_px: f32,
    /// Unicode ranges to pack. Defaults to printable ASCII plus the
    /// Latin-1 supplement.
    pub glyph_ranges: Vec<RangeInclusive<char>>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            size_px: 16.0,
            glyph_ranges: vec![' '..='~', '\u{a0}'..='\u{ff}'],
        }
    }
}

/// One glyph's placement within the atlas.
#[derive(Debug, Clone, Copy)]
pub struct Glyph {
    /// Top-left atlas coordinates, normalized.
    pub uv_min: [f32; 2],
    /// Bottom-right atlas coordinates, normalized.
    pub uv_max: [f32; 2],
    /// Bitmap size in pixels.
    pub size: [f32; 2],
    /// Offset from the pen position to the bitmap top-left; y grows
    /// downward.
    pub offset: [f32; 2],
    /// Horizontal pen advance.
    pub advance: f32,
}

/// A registered font with its packed glyph table.
pub struct Font {
    rasterizer: Box<dyn GlyphRasterizer>,
    size_px: f32,
    ascent: f32,
    line_height: f32,
    ranges: Vec<RangeInclusive<char>>,
    glyphs: HashMap<char, Glyph>,
}

impl Font {
    /// Glyph table entry for `c`, present after the atlas was built.
    #[must_use]
    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c)
    }

    /// Pixels from the text top to the baseline.
    #[must_use]
    pub fn ascent(&self) -> f32 {
        self.ascent
    }

    /// Baseline-to-baseline distance.
    #[must_use]
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Rasterization size in pixels.
    #[must_use]
    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    /// Width and height one run of text will occupy. `'\n'` starts a new
    /// line; uncovered characters contribute nothing.
    #[must_use]
    pub fn text_size(&self, text: &str) -> [f32; 2] {
        let mut width = 0.0f32;
        let mut line = 0.0f32;
        let mut lines = 1.0f32;
        for c in text.chars() {
            if c == '\n' {
                width = width.max(line);
                line = 0.0;
                lines += 1.0;
                continue;
            }
            if let Some(glyph) = self.glyphs.get(&c) {
                line += glyph.advance;
            }
        }
        [width.max(line), lines * self.line_height]
    }
}

/// CPU side of the font texture.
///
/// Fonts are registered up front; [`FontAtlas::build`] rasterizes and packs
/// them together with the white pixel into one RGBA image. Registering or
/// clearing fonts invalidates the build and any uploaded texture; the
/// renderer backend re-uploads before the next frame is rendered, watching
/// [`FontAtlas::version`].
pub struct FontAtlas {
    fonts: Vec<Font>,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    white_uv: [f32; 2],
    built: bool,
    version: u64,
    texture_id: TextureId,
}

impl Default for FontAtlas {
    fn default() -> Self {
        Self::new()
    }
}

impl FontAtlas {
    /// Creates an empty, unbuilt atlas.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fonts: Vec::new(),
            width: 0,
            height: 0,
            pixels: Vec::new(),
            white_uv: [0.0, 0.0],
            built: false,
            version: 0,
            texture_id: TextureId::null(),
        }
    }

    /// Registers a font from TTF/OTF bytes using the default rasterizer.
    /// Invalidates the current build.
    pub fn add_font_from_bytes(&mut self, data: &[u8], config: FontConfig) -> FontResult<FontId> {
        let rasterizer = FontdueRasterizer::from_bytes(data)?;
        Ok(self.add_font_with_rasterizer(Box::new(rasterizer), config))
    }

    /// Registers a font from TTF/OTF bytes using the FreeType rasterizer,
    /// which applies hint processing. Invalidates the current build.
    #[cfg(feature = "hinting")]
    pub fn add_hinted_font_from_bytes(
        &mut self,
        data: &[u8],
        config: FontConfig,
    ) -> FontResult<FontId> {
        let rasterizer = crate::fonts::FreetypeRasterizer::from_bytes(data)?;
        Ok(self.add_font_with_rasterizer(Box::new(rasterizer), config))
    }

    /// Registers a font behind any [`GlyphRasterizer`]. Invalidates the
    /// current build.
    pub fn add_font_with_rasterizer(
        &mut self,
        rasterizer: Box<dyn GlyphRasterizer>,
        config: FontConfig,
    ) -> FontId {
        let metrics = rasterizer.line_metrics(config.size_px);
        self.fonts.push(Font {
            rasterizer,
            size_px: config.size_px,
            ascent: metrics.ascent,
            line_height: metrics.line_height,
            ranges: config.glyph_ranges,
            glyphs: HashMap::new(),
        });
        self.invalidate();
        FontId(self.fonts.len() - 1)
    }

    /// Removes every font. Invalidates the current build.
    pub fn clear_fonts(&mut self) {
        self.fonts.clear();
        self.invalidate();
    }

    /// First registered font, the one text primitives use.
    #[must_use]
    pub fn default_font(&self) -> Option<&Font> {
        self.fonts.first()
    }

    /// Font behind a [`FontId`].
    #[must_use]
    pub fn font(&self, id: FontId) -> Option<&Font> {
        self.fonts.get(id.0)
    }

    /// Number of registered fonts.
    #[must_use]
    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    /// Whether the current font set has been packed.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Build generation; bumped by every successful [`FontAtlas::build`].
    /// Renderers compare it against the generation they last uploaded.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Texture the renderer uploaded for the current build, or the null id.
    #[must_use]
    pub fn texture_id(&self) -> TextureId {
        self.texture_id
    }

    /// Records the uploaded texture; called by the renderer backend after
    /// create-fonts-texture.
    pub fn set_texture_id(&mut self, id: TextureId) {
        self.texture_id = id;
    }

    /// Atlas coordinates of the white pixel.
    #[must_use]
    pub fn white_uv(&self) -> [f32; 2] {
        self.white_uv
    }

    /// Packed image dimensions, valid after a build.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Packed RGBA pixels, `None` before the first build.
    #[must_use]
    pub fn pixels(&self) -> Option<&[u8]> {
        if self.built {
            Some(&self.pixels)
        } else {
            None
        }
    }

    /// Builds the atlas unless it is already current.
    pub fn ensure_built(&mut self) -> FontResult<()> {
        if self.built {
            Ok(())
        } else {
            self.build()
        }
    }

    /// Rasterizes every registered glyph and packs the atlas image.
    ///
    /// An atlas with no fonts still builds: it carries the white pixel so
    /// untextured primitives work. Glyph coverage lands in the alpha
    /// channel over white, so the same texture serves text and shapes.
    pub fn build(&mut self) -> FontResult<()> {
        // Rasterize everything first; packing needs the final extents.
        let mut rasterized: Vec<Vec<(char, RasterGlyph)>> = Vec::with_capacity(self.fonts.len());
        for font in &self.fonts {
            let mut glyphs = Vec::new();
            for range in &font.ranges {
                for c in range.clone() {
                    if !font.rasterizer.covers(c) {
                        continue;
                    }
                    let glyph = font
                        .rasterizer
                        .rasterize(c, font.size_px)
                        .ok_or(FontError::RasterizeFailed(c))?;
                    if glyph.width > ATLAS_WIDTH {
                        return Err(FontError::AtlasOverflow {
                            required_height: glyph.width,
                        });
                    }
                    glyphs.push((c, glyph));
                }
            }
            rasterized.push(glyphs);
        }

        let mut packer = ShelfPacker::new(ATLAS_WIDTH);
        let white_rect = packer.place(2, 2);
        let mut placements: Vec<Vec<(u32, u32)>> = Vec::with_capacity(rasterized.len());
        for glyphs in &rasterized {
            let mut rects = Vec::with_capacity(glyphs.len());
            for (_, glyph) in glyphs {
                rects.push(packer.place(glyph.width, glyph.height));
            }
            placements.push(rects);
        }

        let used_height = packer.used_height();
        if used_height > MAX_ATLAS_HEIGHT {
            return Err(FontError::AtlasOverflow {
                required_height: used_height,
            });
        }
        let height = used_height.max(2).next_power_of_two();

        self.width = ATLAS_WIDTH;
        self.height = height;
        self.pixels = vec![0; (ATLAS_WIDTH * height * 4) as usize];

        self.blit_white(white_rect);
        self.white_uv = [
            (white_rect.0 as f32 + 1.0) / ATLAS_WIDTH as f32,
            (white_rect.1 as f32 + 1.0) / height as f32,
        ];

        for ((font, glyphs), rects) in self
            .fonts
            .iter_mut()
            .zip(rasterized.into_iter())
            .zip(placements.into_iter())
        {
            font.glyphs.clear();
            for ((c, glyph), (x, y)) in glyphs.into_iter().zip(rects.into_iter()) {
                blit_coverage(&mut self.pixels, ATLAS_WIDTH, &glyph, x, y);
                font.glyphs.insert(
                    c,
                    Glyph {
                        uv_min: [
                            x as f32 / ATLAS_WIDTH as f32,
                            y as f32 / height as f32,
                        ],
                        uv_max: [
                            (x + glyph.width) as f32 / ATLAS_WIDTH as f32,
                            (y + glyph.height) as f32 / height as f32,
                        ],
                        size: [glyph.width as f32, glyph.height as f32],
                        offset: glyph.offset,
                        advance: glyph.advance,
                    },
                );
            }
        }

        self.built = true;
        self.version += 1;
        log::info!(
            "Font atlas built: {}x{}, {} font(s), generation {}",
            self.width,
            self.height,
            self.fonts.len(),
            self.version
        );
        Ok(())
    }

    fn invalidate(&mut self) {
        self.built = false;
        self.texture_id = TextureId::null();
    }

    fn blit_white(&mut self, (x, y): (u32, u32)) {
        for row in y..y + 2 {
            for col in x..x + 2 {
                let at = ((row * self.width + col) * 4) as usize;
                self.pixels[at..at + 4].copy_from_slice(&[255, 255, 255, 255]);
            }
        }
    }
}

fn blit_coverage(pixels: &mut [u8], atlas_width: u32, glyph: &RasterGlyph, x: u32, y: u32) {
    for row in 0..glyph.height {
        for col in 0..glyph.width {
            let coverage = glyph.coverage[(row * glyph.width + col) as usize];
            let at = (((y + row) * atlas_width + x + col) * 4) as usize;
            pixels[at..at + 4].copy_from_slice(&[255, 255, 255, coverage]);
        }
    }
}

/// Left-to-right, top-to-bottom shelf packing with one pixel of padding.
struct ShelfPacker {
    width: u32,
    cursor_x: u32,
    cursor_y: u32,
    shelf_height: u32,
}

impl ShelfPacker {
    fn new(width: u32) -> Self {
        Self {
            width,
            cursor_x: 0,
            cursor_y: 0,
            shelf_height: 0,
        }
    }

    fn place(&mut self, w: u32, h: u32) -> (u32, u32) {
        if self.cursor_x + w + PADDING > self.width {
            self.cursor_y += self.shelf_height;
            self.cursor_x = 0;
            self.shelf_height = 0;
        }
        let pos = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + PADDING;
        self.shelf_height = self.shelf_height.max(h + PADDING);
        pos
    }

    fn used_height(&self) -> u32 {
        self.cursor_y + self.shelf_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawList;
    use crate::fonts::LineMetrics;

    /// Fixed-size synthetic glyphs; covers ASCII letters, digits and space.
    struct StubRasterizer;

    impl GlyphRasterizer for StubRasterizer {
        fn line_metrics(&self, _size_px: f32) -> LineMetrics {
            LineMetrics {
                ascent: 8.0,
                descent: -2.0,
                line_height: 10.0,
            }
        }

        fn covers(&self, c: char) -> bool {
            c == ' ' || c.is_ascii_alphanumeric()
        }

        fn rasterize(&self, c: char, _size_px: f32) -> Option<RasterGlyph> {
            if !self.covers(c) {
                return None;
            }
            let (w, h) = if c == ' ' { (0, 0) } else { (4, 4) };
            Some(RasterGlyph {
                coverage: vec![200; (w * h) as usize],
                width: w,
                height: h,
                offset: [0.0, -(h as f32)],
                advance: 5.0,
            })
        }
    }

    fn stub_atlas() -> FontAtlas {
        let mut atlas = FontAtlas::new();
        atlas.add_font_with_rasterizer(Box::new(StubRasterizer), FontConfig::default());
        atlas
    }

    #[test]
    fn test_empty_atlas_builds_white_pixel_only() {
        let mut atlas = FontAtlas::new();
        atlas.build().unwrap();
        assert!(atlas.is_built());
        let (w, h) = atlas.dimensions();
        assert_eq!(w, 1024);
        assert!(h >= 2);
        let pixels = atlas.pixels().unwrap();
        assert_eq!(pixels.len(), (w * h * 4) as usize);
        // The reserved block at the origin is opaque white.
        assert_eq!(&pixels[0..4], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_build_packs_registered_glyphs() {
        let mut atlas = stub_atlas();
        atlas.build().unwrap();
        let font = atlas.default_font().unwrap();
        let glyph = font.glyph('A').unwrap();
        assert_eq!(glyph.size, [4.0, 4.0]);
        assert_eq!(glyph.advance, 5.0);
        assert!(glyph.uv_min[0] >= 0.0 && glyph.uv_max[0] <= 1.0);
        assert!(glyph.uv_min[1] >= 0.0 && glyph.uv_max[1] <= 1.0);
        assert!(glyph.uv_min[0] < glyph.uv_max[0]);
        assert!(font.glyph('!').is_none());
    }

    #[test]
    fn test_glyph_coverage_lands_in_alpha() {
        let mut atlas = stub_atlas();
        atlas.build().unwrap();
        let (w, h) = atlas.dimensions();
        let font = atlas.default_font().unwrap();
        let glyph = *font.glyph('A').unwrap();
        let x = (glyph.uv_min[0] * w as f32) as u32;
        let y = (glyph.uv_min[1] * h as f32) as u32;
        let at = ((y * w + x) * 4) as usize;
        let pixels = atlas.pixels().unwrap();
        assert_eq!(&pixels[at..at + 4], &[255, 255, 255, 200]);
    }

    #[test]
    fn test_registering_font_invalidates_build() {
        let mut atlas = stub_atlas();
        atlas.build().unwrap();
        let first_version = atlas.version();
        atlas.set_texture_id(TextureId::from_raw(9));
        assert!(atlas.is_built());

        atlas.add_font_with_rasterizer(Box::new(StubRasterizer), FontConfig::default());
        assert!(!atlas.is_built());
        assert!(atlas.texture_id().is_null());

        atlas.build().unwrap();
        assert_eq!(atlas.version(), first_version + 1);
    }

    #[test]
    fn test_ensure_built_is_idempotent() {
        let mut atlas = stub_atlas();
        atlas.ensure_built().unwrap();
        let version = atlas.version();
        atlas.ensure_built().unwrap();
        assert_eq!(atlas.version(), version);
    }

    #[test]
    fn test_text_size_counts_lines_and_advances() {
        let mut atlas = stub_atlas();
        atlas.build().unwrap();
        let font = atlas.default_font().unwrap();
        assert_eq!(font.text_size("ab"), [10.0, 10.0]);
        assert_eq!(font.text_size("ab\nabcd"), [20.0, 20.0]);
    }

    #[test]
    fn test_add_text_emits_quads_for_covered_glyphs() {
        let mut atlas = stub_atlas();
        atlas.build().unwrap();

        let mut list = DrawList::default();
        list.reset([0.0, 0.0, 640.0, 480.0], atlas.texture_id(), atlas.white_uv());
        // Space advances the pen without geometry; '!' is not covered.
        list.add_text(&atlas, [10.0, 10.0], crate::draw::col32(255, 255, 255, 255), "a b!");
        assert_eq!(list.vtx_count(), 8);
        assert_eq!(list.idx_count(), 12);
        assert_eq!(list.commands().len(), 1);
    }
}
