// Window + software drawing utilities.
// Visual effects provided here:
// 1) A resizable window that shows the particle canvas.
// 2) Anti-aliased filled rectangles (each particle is one).
// 3) The 5x7 bitmap face reused for a small HUD line.

use crate::error::Error;
use crate::pointer::InputEvent;
use crate::raster::glyph5x7;
use crate::types::{pack_rgb, unpack_rgb, FrameBuffer};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

pub struct Drawer {
    window: Window,
    input: InputAdapter,
}

impl Drawer {
    /// Create a resizable window paced at `fps` frames per second.
    /// Visual: a new black window appears with your chosen title.
    pub fn new(
        title: &str,
        width: usize,
        height: usize,
        fps: usize,
        touch_emulation: bool,
    ) -> Result<Self, Error> {
        let options = WindowOptions { resize: true, ..WindowOptions::default() };
        let mut window = Window::new(title, width, height, options)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(fps);
        Ok(Self { window, input: InputAdapter::new(touch_emulation) })
    }

    /// Push the pixels for this frame to the screen.
    /// The update call also blocks until the next frame slot, which is what paces the loop.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Pump window events without presenting (e.g. while minimized to 0x0).
    pub fn idle(&mut self) {
        self.window.update();
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    pub fn h_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::H, KeyRepeat::No)
    }

    pub fn t_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::T, KeyRepeat::No)
    }

    /// Current client area in pixels; changes when the user resizes the window.
    pub fn size(&self) -> (usize, usize) {
        self.window.get_size()
    }

    /// Translate this frame's mouse state into engine input events.
    pub fn poll_input(&mut self) -> Vec<InputEvent> {
        let pos = self.window.get_mouse_pos(MouseMode::Discard);
        let down = self.window.get_mouse_down(MouseButton::Left);
        self.input.translate(pos, down)
    }
}

/// Turns polled mouse state into pointer/touch events.
/// With touch emulation on, the left button stands in for a finger.
pub struct InputAdapter {
    touch_emulation: bool,
    last_pos: Option<(f32, f32)>,
    finger_down: bool,
}

impl InputAdapter {
    pub fn new(touch_emulation: bool) -> Self {
        Self { touch_emulation, last_pos: None, finger_down: false }
    }

    /// `pos` is `None` while the cursor is outside the window.
    pub fn translate(&mut self, pos: Option<(f32, f32)>, button_down: bool) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let moved = pos.is_some() && pos != self.last_pos;

        if self.touch_emulation {
            let down = button_down && pos.is_some();
            if down && !self.finger_down {
                events.push(InputEvent::TouchStart);
            }
            if down {
                if let Some((x, y)) = pos {
                    if moved || !self.finger_down {
                        events.push(InputEvent::TouchMove { x, y });
                    }
                }
            }
            if !down && self.finger_down {
                events.push(InputEvent::TouchEnd);
            }
            self.finger_down = down;
        } else {
            match pos {
                Some((x, y)) if moved => events.push(InputEvent::PointerMove { x, y }),
                None if self.last_pos.is_some() => events.push(InputEvent::PointerLeave),
                _ => {}
            }
        }

        self.last_pos = pos;
        events
    }
}

/* ---------- Software drawing: pixels, rects, tiny bitmap font ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Mix `color` over the pixel at (x,y) with opacity `coverage` in [0,1].
#[inline]
fn blend_pixel(fb: &mut FrameBuffer, x: usize, y: usize, color: u32, coverage: f32) {
    let idx = y * fb.width + x;
    if coverage >= 1.0 {
        fb.pixels[idx] = color;
        return;
    }
    let (dr, dg, db) = unpack_rgb(fb.pixels[idx]);
    let (sr, sg, sb) = unpack_rgb(color);
    let mix = |d: u8, s: u8| (d as f32 + (s as f32 - d as f32) * coverage).round() as u8;
    fb.pixels[idx] = pack_rgb(mix(dr, sr), mix(dg, sg), mix(db, sb));
}

/// Fill the rectangle [x, x+w) x [y, y+h) with sub-pixel coverage, clipped to the canvas.
/// Visual: a particle; sizes below one pixel show up as dimmer dots.
pub fn fill_rect(fb: &mut FrameBuffer, x: f32, y: f32, w: f32, h: f32, color: u32) {
    if !(w > 0.0 && h > 0.0) {
        return;
    }
    let (right, bottom) = (x + w, y + h);
    let x0 = x.floor().max(0.0) as usize;
    let y0 = y.floor().max(0.0) as usize;
    let x1 = (right.ceil().max(0.0) as usize).min(fb.width);
    let y1 = (bottom.ceil().max(0.0) as usize).min(fb.height);

    for py in y0..y1 {
        let cov_y = bottom.min(py as f32 + 1.0) - y.max(py as f32);
        if cov_y <= 0.0 {
            continue;
        }
        for px in x0..x1 {
            let cov_x = right.min(px as f32 + 1.0) - x.max(px as f32);
            if cov_x > 0.0 {
                blend_pixel(fb, px, py, color, cov_x * cov_y);
            }
        }
    }
}

/// Draw a single 5x7 character at (x,y) with a 1-pixel black shadow for contrast.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    let Some(rows) = glyph5x7(ch.to_ascii_uppercase()) else { return };
    for (offset, ink) in [(1, 0x0000_0000), (0, color)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1u8 << (4 - rx))) != 0 {
                    put_pixel(fb, x + rx + offset, y + ry as i32 + offset, ink);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs (5 pixels glyph + 1 pixel spacing).
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6;
    }
}
