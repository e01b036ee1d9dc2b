// Glyph rasterizer: renders the hero text offscreen and keeps only its opacity.
// Visual: nothing is shown; the mask decides where particles may rest.

use crate::types::OpacityMask;
use tracing::{debug, warn};

/// Below this canvas width we use the smaller cap/divisor for the font.
pub const NARROW_VIEWPORT: usize = 768;

/// Sub-samples per pixel axis used to anti-alias glyph edges (4x4 = 16 taps).
const SUPERSAMPLE: usize = 4;

/// Glyph face geometry, in cells: 5x7 glyph plus 1 cell of spacing.
const GLYPH_W: usize = 5;
const GLYPH_H: usize = 7;
const ADVANCE: usize = GLYPH_W + 1;

/// Font size divided by this gives the cell edge, so caps are ~0.7em tall.
const CELLS_PER_EM: f32 = 10.0;

/// Result of one rasterization pass.
pub struct Raster {
    /// `None` when there is no surface to render into.
    pub mask: Option<OpacityMask>,
    /// Font size normalized by 100; 0 when no surface exists.
    pub scale: f32,
}

/// Responsive font size in pixels for a canvas `width` pixels wide.
pub fn font_size(width: usize) -> f32 {
    let w = width as f32;
    if width < NARROW_VIEWPORT {
        (w / 6.0).min(80.0)
    } else {
        (w / 4.0).min(160.0)
    }
}

/// Render `text` centered on a `width` x `height` canvas and return its mask.
pub fn rasterize(width: usize, height: usize, text: &str) -> Raster {
    if width == 0 || height == 0 {
        warn!(width, height, "no rendering surface; skipping rasterization");
        return Raster { mask: None, scale: 0.0 };
    }

    let font = font_size(width);
    let layout = TextLayout::centered(text, width, height, font / CELLS_PER_EM);
    let mut alpha = vec![0u8; width * height];

    // Only the text's bounding box can hold ink; everything else stays 0.
    let (x0, y0, x1, y1) = layout.pixel_bounds(width, height);
    let taps = (SUPERSAMPLE * SUPERSAMPLE) as u32;
    let step = 1.0 / SUPERSAMPLE as f32;

    for py in y0..y1 {
        for px in x0..x1 {
            let mut hits = 0u32;
            for sy in 0..SUPERSAMPLE {
                for sx in 0..SUPERSAMPLE {
                    let fx = px as f32 + (sx as f32 + 0.5) * step;
                    let fy = py as f32 + (sy as f32 + 0.5) * step;
                    if layout.covers(fx, fy) {
                        hits += 1;
                    }
                }
            }
            alpha[py * width + px] = ((hits * 255 + taps / 2) / taps) as u8;
        }
    }

    let mask = OpacityMask::new(width, height, alpha);
    debug!(width, height, font, ink = mask.ink_pixels(), "text mask rasterized");
    Raster { mask: Some(mask), scale: font / 100.0 }
}

/// Placement of a string of 5x7 glyphs on the canvas.
struct TextLayout {
    glyphs: Vec<Option<[u8; 7]>>,
    left: f32,
    top: f32,
    cell: f32,
}

impl TextLayout {
    /// Center horizontally, and vertically on the glyph middle (baseline "middle").
    fn centered(text: &str, width: usize, height: usize, cell: f32) -> Self {
        let glyphs: Vec<_> = text.chars().map(|c| glyph5x7(c.to_ascii_uppercase())).collect();
        let cols = (glyphs.len() * ADVANCE).saturating_sub(1);
        let text_w = cols as f32 * cell;
        let text_h = GLYPH_H as f32 * cell;
        Self {
            glyphs,
            left: (width as f32 - text_w) * 0.5,
            top: (height as f32 - text_h) * 0.5,
            cell,
        }
    }

    /// Pixel rectangle [x0,x1) x [y0,y1) touched by the text, clipped to the canvas.
    fn pixel_bounds(&self, width: usize, height: usize) -> (usize, usize, usize, usize) {
        let cols = (self.glyphs.len() * ADVANCE).saturating_sub(1) as f32;
        let clip = |v: f32, max: usize| v.max(0.0).min(max as f32) as usize;
        (
            clip(self.left.floor(), width),
            clip(self.top.floor(), height),
            clip((self.left + cols * self.cell).ceil(), width),
            clip((self.top + GLYPH_H as f32 * self.cell).ceil(), height),
        )
    }

    /// True if the point (x,y) falls inside a lit glyph cell.
    fn covers(&self, x: f32, y: f32) -> bool {
        let cx = (x - self.left) / self.cell;
        let cy = (y - self.top) / self.cell;
        if cx < 0.0 || cy < 0.0 {
            return false;
        }
        let (col, row) = (cx as usize, cy as usize);
        if row >= GLYPH_H || col % ADVANCE >= GLYPH_W {
            return false;
        }
        match self.glyphs.get(col / ADVANCE) {
            Some(Some(rows)) => rows[row] & (1 << (GLYPH_W - 1 - col % ADVANCE)) != 0,
            _ => false,
        }
    }
}

/* ---------- 5x7 bitmap face (uppercase, digits, a little punctuation) ---------- */

/// Return a 5x7 glyph bitmap for a limited character set.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
pub(crate) fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),
        '?' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b00000,0b00100),

        _ => None,
    }
}
