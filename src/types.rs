// Core types shared by the rasterizer, seeder, simulator and window.

/// Software canvas. Each entry is 0x00RRGGBB for minifb.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Opaque fill of the whole canvas.
    /// Visual: wipes last frame's particles.
    pub fn fill(&mut self, color: u32) {
        for px in &mut self.pixels {
            *px = color;
        }
    }

    /// Reallocate for a new window size; contents are cleared to black.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, 0);
    }
}

/// Per-pixel opacity (0..=255) of the rendered text, one snapshot per
/// (text, canvas size). Read-only once built.
#[derive(Clone, Debug)]
pub struct OpacityMask {
    pub width: usize,
    pub height: usize,
    pub alpha: Vec<u8>,   // length = width * height
    ink_pixels: usize,    // how many pixels pass INK_THRESHOLD
}

/// Alpha a mask pixel must exceed before a particle may rest on it.
pub const INK_THRESHOLD: u8 = 128;

impl OpacityMask {
    pub fn new(width: usize, height: usize, alpha: Vec<u8>) -> Self {
        debug_assert_eq!(alpha.len(), width * height);
        let ink_pixels = alpha.iter().filter(|&&a| a > INK_THRESHOLD).count();
        Self { width, height, alpha, ink_pixels }
    }

    #[inline]
    pub fn alpha_at(&self, x: usize, y: usize) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.alpha[y * self.width + x]
    }

    #[inline]
    pub fn is_ink(&self, x: usize, y: usize) -> bool {
        self.alpha_at(x, y) > INK_THRESHOLD
    }

    pub fn ink_pixels(&self) -> usize {
        self.ink_pixels
    }
}

/// One particle of the field.
/// Visual: a tiny square sitting on the text; flies off near the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub base_x: f32,            // rest position on the glyph; never changes
    pub base_y: f32,
    pub size: f32,              // side length in pixels
    pub rest_color: u32,        // 0x00RRGGBB when undisturbed
    pub scattered_color: u32,   // 0x00RRGGBB while repelled
    pub life: u32,              // frames left before recycling
}

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

#[inline]
pub fn unpack_rgb(px: u32) -> (u8, u8, u8) {
    (((px >> 16) & 0xFF) as u8, ((px >> 8) & 0xFF) as u8, (px & 0xFF) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_counts_ink_strictly_above_threshold() {
        let mask = OpacityMask::new(3, 1, vec![128, 129, 255]);
        assert_eq!(mask.ink_pixels(), 2);
        assert!(!mask.is_ink(0, 0));
        assert!(mask.is_ink(1, 0));
        assert!(!mask.is_ink(7, 0));
    }

    #[test]
    fn resize_clears_and_reallocates() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.fill(0x00FF_FFFF);
        fb.resize(3, 1);
        assert_eq!(fb.pixels, vec![0, 0, 0]);
    }

    #[test]
    fn rgb_packing_is_symmetric() {
        assert_eq!(pack_rgb(0xFF, 0x8C, 0x1A), 0x00FF_8C1A);
        assert_eq!(unpack_rgb(0x00FF_8C1A), (0xFF, 0x8C, 0x1A));
    }
}
