// Headless output: write the canvas to a PNG instead of a window.

use crate::error::Error;
use crate::types::{unpack_rgb, FrameBuffer};
use image::{Rgb, RgbImage};
use std::path::Path;

pub fn save_png(fb: &FrameBuffer, path: &Path) -> Result<(), Error> {
    let img = RgbImage::from_fn(fb.width as u32, fb.height as u32, |x, y| {
        let (r, g, b) = unpack_rgb(fb.pixels[y as usize * fb.width + x as usize]);
        Rgb([r, g, b])
    });
    img.save(path)?;
    Ok(())
}
