//! Monospace glyph atlas built at startup.
//!
//! The embedded TTF is rasterized once with `fontdue` into a fixed-cell grid
//! covering printable ASCII, then uploaded as a single texture. All text
//! drawing and measurement works in cell units, which keeps editor cursor
//! math trivial.

use std::sync::Arc;

use glam::{Vec2, Vec4};

use crate::abs::{Texture, TextureOptions};
use crate::ui::renderer::{DrawCommand, UiRenderMode};

/// First rasterized character; the range runs through `~` (0x7E).
pub const FIRST_CHAR: char = ' ';
const CHAR_COUNT: u32 = 95;
const COLS: u32 = 16;

/// CPU-side atlas image produced by [`build_atlas`].
pub struct AtlasImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub cell_width: u32,
    pub cell_height: u32,
}

/// Rasterizes printable ASCII into a fixed-cell RGBA grid.
///
/// Cell width comes from the font's monospace advance, cell height from the
/// line metrics. White pixels with glyph coverage in the alpha channel, so a
/// tint color multiplies cleanly in the shader.
pub fn build_atlas(font: &fontdue::Font, px: f32) -> AtlasImage {
    let line = font
        .horizontal_line_metrics(px)
        .expect("font has no horizontal metrics");
    let cell_width = font.metrics('M', px).advance_width.ceil() as u32;
    let cell_height = (line.ascent - line.descent).ceil() as u32;
    let baseline = line.ascent.round() as i32;

    let rows = CHAR_COUNT.div_ceil(COLS);
    let width = COLS * cell_width;
    let height = rows * cell_height;
    let mut pixels = vec![0u8; (width * height * 4) as usize];

    for index in 0..CHAR_COUNT {
        let ch = char::from_u32(FIRST_CHAR as u32 + index).unwrap();
        let (metrics, coverage) = font.rasterize(ch, px);

        let cell_x = ((index % COLS) * cell_width) as i32;
        let cell_y = ((index / COLS) * cell_height) as i32;
        let glyph_x = cell_x + metrics.xmin;
        let glyph_y = cell_y + baseline - metrics.height as i32 - metrics.ymin;

        for gy in 0..metrics.height {
            for gx in 0..metrics.width {
                let x = glyph_x + gx as i32;
                let y = glyph_y + gy as i32;
                // clip glyphs that poke outside their cell
                if x < cell_x
                    || x >= cell_x + cell_width as i32
                    || y < cell_y
                    || y >= cell_y + cell_height as i32
                {
                    continue;
                }
                let alpha = coverage[gy * metrics.width + gx];
                let i = ((y as u32 * width + x as u32) * 4) as usize;
                pixels[i] = 255;
                pixels[i + 1] = 255;
                pixels[i + 2] = 255;
                pixels[i + 3] = alpha;
            }
        }
    }

    AtlasImage {
        pixels,
        width,
        height,
        cell_width,
        cell_height,
    }
}

/// A glyph atlas texture with fixed-cell metrics.
pub struct Font {
    atlas: Texture,
    cell: Vec2,
    cols: u32,
    rows: u32,
}

impl Font {
    /// Parses the TTF bytes and uploads the rasterized atlas.
    pub fn new(gl: &Arc<glow::Context>, ttf: &[u8], px: f32) -> Result<Self, String> {
        let font = fontdue::Font::from_bytes(ttf, fontdue::FontSettings::default())
            .map_err(|e| e.to_string())?;
        let image = build_atlas(&font, px);

        let options = TextureOptions {
            min_filter: glow::LINEAR,
            mag_filter: glow::LINEAR,
            wrap: glow::CLAMP_TO_EDGE,
            mipmaps: false,
        };
        let atlas = Texture::from_rgba(gl, image.width, image.height, &image.pixels, options);

        Ok(Self {
            atlas,
            cell: Vec2::new(image.cell_width as f32, image.cell_height as f32),
            cols: COLS,
            rows: CHAR_COUNT.div_ceil(COLS),
        })
    }

    /// Gets the atlas UV rectangle for the given character.
    pub fn glyph_uvs(&self, c: char) -> Option<[Vec2; 2]> {
        let index = (c as u32).checked_sub(FIRST_CHAR as u32)?;
        if index >= CHAR_COUNT {
            return None;
        }

        let col = index % self.cols;
        let row = index / self.cols;
        let uv_size = Vec2::new(1.0 / self.cols as f32, 1.0 / self.rows as f32);
        let uv_min = Vec2::new(col as f32 * uv_size.x, row as f32 * uv_size.y);
        Some([uv_min, uv_min + uv_size])
    }

    /// The on-screen size of one character cell at the given font size.
    pub fn char_size(&self, font_size: f32) -> Vec2 {
        Vec2::new(font_size * (self.cell.x / self.cell.y), font_size)
    }

    /// Calculates the width and height of the given text at the given size.
    pub fn measure_text(&self, text: &str, font_size: f32) -> Vec2 {
        let char_size = self.char_size(font_size);
        let lines: Vec<&str> = text.split('\n').collect();
        let max_width = lines
            .iter()
            .map(|line| line.chars().count() as f32 * char_size.x)
            .fold(0.0, f32::max);
        Vec2::new(max_width, lines.len() as f32 * font_size)
    }

    /// Builds draw commands for the given text, relative to the origin.
    pub fn text(&self, text: &str, font_size: f32, color: Vec4) -> Vec<DrawCommand> {
        let mut commands = Vec::new();
        let mut cursor = Vec2::ZERO;
        let char_size = self.char_size(font_size);

        for line in text.split('\n') {
            for c in line.chars() {
                if let Some(uvs) = self.glyph_uvs(c) {
                    commands.push(DrawCommand {
                        rect: [cursor, cursor + char_size],
                        uv_rect: uvs,
                        mode: UiRenderMode::Texture(self.atlas.handle(), color),
                    });
                }
                cursor.x += char_size.x;
            }
            cursor.x = 0.0;
            cursor.y += char_size.y;
        }

        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTF: &[u8] = include_bytes!("../../assets/DejaVuSansMono.ttf");

    fn test_font() -> fontdue::Font {
        fontdue::Font::from_bytes(TTF, fontdue::FontSettings::default()).unwrap()
    }

    #[test]
    fn atlas_covers_printable_ascii() {
        let image = build_atlas(&test_font(), 16.0);
        assert_eq!(image.width, 16 * image.cell_width);
        assert_eq!(image.height, 6 * image.cell_height);
        assert_eq!(
            image.pixels.len(),
            (image.width * image.height * 4) as usize
        );
    }

    #[test]
    fn visible_glyphs_have_coverage() {
        let image = build_atlas(&test_font(), 16.0);
        for ch in ['A', '#', '0', '~'] {
            let index = ch as u32 - FIRST_CHAR as u32;
            let cell_x = (index % 16) * image.cell_width;
            let cell_y = (index / 16) * image.cell_height;
            let mut covered = 0u32;
            for y in cell_y..cell_y + image.cell_height {
                for x in cell_x..cell_x + image.cell_width {
                    if image.pixels[((y * image.width + x) * 4 + 3) as usize] > 0 {
                        covered += 1;
                    }
                }
            }
            assert!(covered > 0, "glyph {ch:?} rasterized to nothing");
        }
    }

    #[test]
    fn space_cell_is_blank() {
        let image = build_atlas(&test_font(), 16.0);
        for y in 0..image.cell_height {
            for x in 0..image.cell_width {
                assert_eq!(image.pixels[((y * image.width + x) * 4 + 3) as usize], 0);
            }
        }
    }
}
