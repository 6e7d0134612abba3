// Core types shared by the surface, the page and the FX.
use crate::error::Error;

/// What the window shows: one u32 per pixel, 0x00RRGGBB for minifb.
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

    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Mix `color` over the pixel at (x,y) with opacity `a` in [0,1].
    #[inline]
    pub fn blend(&mut self, x: i32, y: i32, color: Colour, a: f32) {
        if x < 0 || y < 0 || a <= 0.0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y * self.width + x;
        let old = self.pixels[idx];
        let a = a.min(1.0);
        let mix = |src: u8, dst: u32| -> u32 {
            (src as f32 * a + dst as f32 * (1.0 - a)).round().clamp(0.0, 255.0) as u32
        };
        let r = mix(color.r, (old >> 16) & 0xFF);
        let g = mix(color.g, (old >> 8) & 0xFF);
        let b = mix(color.b, old & 0xFF);
        self.pixels[idx] = (r << 16) | (g << 8) | b;
    }
}

/// Per-pixel coverage in [0,1]. 1 = fully inside the shape/stroke.
#[derive(Clone)]
pub struct Mask {
    pub width: usize,
    pub height: usize,
    pub alpha: Vec<f32>,
}

impl Mask {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, alpha: vec![0.0; width * height] }
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> f32 {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return 0.0;
        }
        self.alpha[y as usize * self.width + x as usize]
    }
}

/// A position in surface or window pixels (fractional allowed).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        let (dx, dy) = (other.x - self.x, other.y - self.y);
        (dx * dx + dy * dy).sqrt()
    }
}

/// Straight-alpha colour, the same shape as a CSS `rgba()` value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Colour {
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse `#rrggbb` (the form the palette and fallback fill use).
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(Error::Colour(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| Error::Colour(s.to_string()))
        };
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colour() {
        let c = Colour::from_hex("#a53860").unwrap();
        assert_eq!((c.r, c.g, c.b), (0xa5, 0x38, 0x60));
        assert_eq!(c.to_u32(), 0x00a5_3860);
        assert!(Colour::from_hex("#abc").is_err());
        assert!(Colour::from_hex("#zzzzzz").is_err());
    }

    #[test]
    fn test_framebuffer_blend() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.fill(0x00FF_FFFF);
        fb.blend(0, 0, Colour::rgb(0, 0, 0), 0.5);
        assert_eq!(fb.pixels[0], 0x0080_8080);
        // Out of bounds is ignored
        fb.blend(5, 5, Colour::rgb(0, 0, 0), 1.0);
        assert_eq!(fb.pixels[3], 0x00FF_FFFF);
    }
}
