// Window + software drawing utilities.
// Visual effects provided here:
// 1) The window that shows the page (heart, button, confetti).
// 2) Pointer/keyboard polling for scratching and quitting.
// 3) A tiny 5x7 bitmap font for the hidden message and the button label.

use minifb::{Key, MouseButton, MouseMode, Window, WindowOptions};

use crate::error::Error;
use crate::types::{Colour, FrameBuffer};

pub struct Drawer {
    window: Window,
}

impl Drawer {
    /// Open a window of the page size, capped at ~60 FPS.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Pointer position in window pixels, None while outside the window.
    pub fn mouse_pos(&self) -> Option<(f32, f32)> {
        self.window.get_mouse_pos(MouseMode::Discard)
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }
}

/* ---------- 5x7 bitmap font (just the letters the page uses) ---------- */

/// Return a 5x7 glyph bitmap. Each u8 is a row; bit 4 is the leftmost pixel.
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'N' => g!(0b10001,0b11001,0b10101,0b10011,0b10001,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),
        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        _ => None,
    }
}

/// Width in pixels of `text` drawn at `scale`.
pub fn text_width_5x7(text: &str, scale: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 { 0 } else { (n * 6 - 1) * scale }
}

/// Draw `text` with its top-left at (x,y); each glyph cell is scale x scale pixels.
/// `opacity` lets the button fade in.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: Colour, scale: i32, opacity: f32) {
    for ch in text.chars() {
        if let Some(rows) = glyph5x7(ch) {
            for (ry, rowbits) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if (rowbits & (1 << (4 - rx))) == 0 {
                        continue;
                    }
                    for sy in 0..scale {
                        for sx in 0..scale {
                            let px = x + rx * scale + sx;
                            let py = y + ry as i32 * scale + sy;
                            fb.blend(px, py, color, opacity);
                        }
                    }
                }
            }
        }
        x += 6 * scale; // 5 pixels glyph width + 1 pixel spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width() {
        assert_eq!(text_width_5x7("", 1), 0);
        assert_eq!(text_width_5x7("A", 1), 5);
        assert_eq!(text_width_5x7("ADD", 2), 34);
    }

    #[test]
    fn test_glyphs_cover_page_text() {
        for ch in "SAVE THE DATE! ADD TO CALENDAR".chars() {
            assert!(glyph5x7(ch).is_some(), "missing glyph {ch:?}");
        }
    }

    #[test]
    fn test_draw_text_scaled() {
        let mut fb = FrameBuffer::new(20, 20);
        draw_text_5x7(&mut fb, 0, 0, "T", Colour::rgb(255, 255, 255), 2, 1.0);
        // Top bar of the T spans the full scaled width
        assert_eq!(fb.pixels[0], 0x00FF_FFFF);
        assert_eq!(fb.pixels[9], 0x00FF_FFFF);
        assert_eq!(fb.pixels[10], 0);
        // Stem in the middle column, below the bar
        assert_eq!(fb.pixels[4 * 20 + 4], 0x00FF_FFFF);
        assert_eq!(fb.pixels[4 * 20], 0);
    }
}
