//! The fixed-size RGBA drawing surface that holds the scratch-off cover.
//!
//! Pixels are straight (non-premultiplied) RGBA8, the same layout a 2D
//! canvas hands back from `getImageData`. The surface never changes size.

use image::{Rgba, RgbaImage};

use crate::heart::HeartPath;
use crate::raster::{box_blur_mask, edge_coverage, fill_coverage, stroke_coverage};
use crate::types::{Colour, FrameBuffer, Mask, Point};

/// Stroke width of the inset shading passes.
const INSET_LINE_WIDTH: f32 = 4.0;
/// Stroke width of the final rim.
const RIM_LINE_WIDTH: f32 = 1.5;

const ROSE_SHADOW: Colour = Colour::rgba(180, 130, 140, 0.45);
const ROSE_LINE: Colour = Colour::rgba(180, 130, 140, 0.15);
const WHITE_GLOW: Colour = Colour::rgba(255, 255, 255, 0.7);
const WHITE_LINE: Colour = Colour::rgba(255, 255, 255, 0.4);

/// One stroke pass with a canvas-style drop shadow under it.
struct ShadedStroke {
    /// Blurred, offset stroke coverage.
    shadow: Mask,
    shadow_colour: Colour,
    line_colour: Colour,
}

pub struct ScratchSurface {
    width: u32,
    height: u32,
    pixels: RgbaImage,
    /// Heart fill coverage, used as the clip for everything but the rim.
    clip: Mask,
    inset_stroke: Mask,
    rim: Mask,
    passes: [ShadedStroke; 2],
    fallback_fill: Colour,
    texture_offset_y: i32,
}

impl ScratchSurface {
    /// Build the surface and every geometry mask from the heart outline.
    /// Nothing is drawn until `render`.
    pub fn new(size: u32, heart: &HeartPath, fallback_fill: Colour, texture_offset_y: i32) -> Self {
        let (w, h) = (size as usize, size as usize);
        let clip = fill_coverage(heart, w, h);
        let inset_stroke = stroke_coverage(heart, INSET_LINE_WIDTH, w, h);
        let rim = stroke_coverage(heart, RIM_LINE_WIDTH, w, h);

        // Pass 1: recessed shadow, blur 11, pushed toward bottom-right (+3,+3).
        // Pass 2: highlight, blur 9, pushed toward top-left (-3,-3).
        let passes = [
            ShadedStroke {
                shadow: shifted(&box_blur_mask(&inset_stroke, 11 / 2), 3, 3),
                shadow_colour: ROSE_SHADOW,
                line_colour: ROSE_LINE,
            },
            ShadedStroke {
                shadow: shifted(&box_blur_mask(&inset_stroke, 9 / 2), -3, -3),
                shadow_colour: WHITE_GLOW,
                line_colour: WHITE_LINE,
            },
        ];

        Self {
            width: size,
            height: size,
            pixels: RgbaImage::new(size, size),
            clip,
            inset_stroke,
            rim,
            passes,
            fallback_fill,
            texture_offset_y,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Redraw the whole cover. Reads nothing but geometry and `texture`,
    /// so calling it twice gives the same pixels.
    /// `texture` must already be scaled to the surface size.
    pub fn render(&mut self, texture: Option<&RgbaImage>) {
        // Visual: a fresh glittery (or flat pink) heart with soft inner shading.
        // 1) Clear
        for px in self.pixels.pixels_mut() {
            *px = Rgba([0, 0, 0, 0]);
        }

        let w = self.width as usize;
        for (x, y, px) in self.pixels.enumerate_pixels_mut() {
            let idx = y as usize * w + x as usize;
            let clip = self.clip.alpha[idx];

            // 2) Heart body: texture shifted up, or the flat fallback
            if clip > 0.0 {
                match texture {
                    Some(tex) => {
                        let ty = y as i32 - self.texture_offset_y;
                        if ty >= 0 && (ty as u32) < tex.height() && x < tex.width() {
                            let t = tex.get_pixel(x, ty as u32);
                            let c = Colour::rgb(t[0], t[1], t[2]);
                            blend_over(px, c, t[3] as f32 / 255.0 * clip);
                        }
                    }
                    None => blend_over(px, self.fallback_fill, clip),
                }

                // 3) Inset shading, shadow under each stroke, clipped to the heart
                for pass in &self.passes {
                    let shadow = pass.shadow.alpha[idx] * pass.line_colour.a;
                    blend_over(px, pass.shadow_colour, pass.shadow_colour.a * shadow * clip);
                    let line = self.inset_stroke.alpha[idx];
                    blend_over(px, pass.line_colour, pass.line_colour.a * line * clip);
                }
            }

            // 4) Rim, not clipped
            let rim = self.rim.alpha[idx];
            blend_over(px, ROSE_LINE, ROSE_LINE.a * rim);
        }
    }

    /// Destination-out a filled disc: alpha under the disc drops toward 0,
    /// colour is left alone. Nothing is painted.
    pub fn erase_disc(&mut self, center: Point, radius: f32) {
        let x0 = (center.x - radius - 1.0).floor().max(0.0) as u32;
        let y0 = (center.y - radius - 1.0).floor().max(0.0) as u32;
        let x1 = ((center.x + radius + 1.0).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((center.y + radius + 1.0).ceil().max(0.0) as u32).min(self.height);

        for y in y0..y1 {
            for x in x0..x1 {
                let d = center.distance(Point::new(x as f32 + 0.5, y as f32 + 0.5));
                let cov = edge_coverage(radius, d);
                if cov <= 0.0 {
                    continue;
                }
                // Visual: the page shows through, edges fade over one pixel.
                let px = self.pixels.get_pixel_mut(x, y);
                px[3] = (px[3] as f32 * (1.0 - cov)).round() as u8;
            }
        }
    }

    /// Destination-out over the full surface.
    pub fn clear_all(&mut self) {
        for px in self.pixels.pixels_mut() {
            px[3] = 0;
        }
    }

    /// Pixels that still have any opacity (the unscratched part).
    pub fn count_covered(&self) -> usize {
        self.pixels.pixels().filter(|p| p[3] > 0).count()
    }

    pub fn is_fully_clear(&self) -> bool {
        self.count_covered() == 0
    }

    /// Draw the cover onto the window framebuffer with its top-left at `origin`.
    pub fn composite_onto(&self, fb: &mut FrameBuffer, origin: (i32, i32)) {
        for (x, y, px) in self.pixels.enumerate_pixels() {
            if px[3] == 0 {
                continue;
            }
            let c = Colour::rgb(px[0], px[1], px[2]);
            fb.blend(origin.0 + x as i32, origin.1 + y as i32, c, px[3] as f32 / 255.0);
        }
    }
}

/// Straight-alpha source-over of `colour` at opacity `a` onto `dst`.
fn blend_over(dst: &mut Rgba<u8>, colour: Colour, a: f32) {
    if a <= 0.0 {
        return;
    }
    let sa = a.min(1.0);
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return;
    }
    let mix = |s: u8, d: u8| -> u8 {
        ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a).round().clamp(0.0, 255.0) as u8
    };
    *dst = Rgba([
        mix(colour.r, dst[0]),
        mix(colour.g, dst[1]),
        mix(colour.b, dst[2]),
        (out_a * 255.0).round() as u8,
    ]);
}

/// Move a mask by (dx, dy); uncovered area becomes 0.
fn shifted(src: &Mask, dx: i32, dy: i32) -> Mask {
    let mut out = Mask::new(src.width, src.height);
    for y in 0..src.height as i32 {
        for x in 0..src.width as i32 {
            out.alpha[y as usize * src.width + x as usize] = src.get(x - dx, y - dy);
        }
    }
    out
}
