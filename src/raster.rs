// Software rasterisation into coverage masks.
// Fill and stroke coverage come from the same flattened heart outline;
// the blur is the sliding-window box blur, run on a single alpha channel.
use crate::heart::HeartPath;
use crate::types::{Mask, Point};

/// Sub-scanlines per pixel row for anti-aliased fills.
const SUBSAMPLES: usize = 4;

/// Non-zero winding fill coverage of `path` on a `width` x `height` grid.
pub fn fill_coverage(path: &HeartPath, width: usize, height: usize) -> Mask {
    let mut mask = Mask::new(width, height);
    let edges: Vec<(Point, Point)> = path.edges().filter(|(a, b)| a.y != b.y).collect();
    let weight = 1.0 / SUBSAMPLES as f32;
    let mut crossings: Vec<(f32, i32)> = Vec::with_capacity(16);

    for y in 0..height {
        let row = &mut mask.alpha[y * width..(y + 1) * width];
        for s in 0..SUBSAMPLES {
            let sy = y as f32 + (s as f32 + 0.5) / SUBSAMPLES as f32;

            // Where does this sub-scanline cross the outline, and which way?
            crossings.clear();
            for &(a, b) in &edges {
                let (top, bottom, dir) = if a.y < b.y { (a, b, 1) } else { (b, a, -1) };
                if sy < top.y || sy >= bottom.y {
                    continue;
                }
                let t = (sy - top.y) / (bottom.y - top.y);
                crossings.push((top.x + t * (bottom.x - top.x), dir));
            }
            crossings.sort_by(|l, r| l.0.total_cmp(&r.0));

            // Walk left to right; spans with non-zero winding are inside.
            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if winding != 0 {
                    add_span(row, pair[0].0, pair[1].0, weight);
                }
            }
        }
        for a in row.iter_mut() {
            *a = a.min(1.0);
        }
    }
    mask
}

/// Add `weight` x horizontal overlap of [x0, x1) to each pixel in the row.
fn add_span(row: &mut [f32], x0: f32, x1: f32, weight: f32) {
    let w = row.len() as f32;
    let (x0, x1) = (x0.clamp(0.0, w), x1.clamp(0.0, w));
    if x1 <= x0 {
        return;
    }
    let first = x0.floor() as usize;
    let last = (x1.ceil() as usize).min(row.len());
    for (px, cell) in row.iter_mut().enumerate().take(last).skip(first) {
        let left = x0.max(px as f32);
        let right = x1.min(px as f32 + 1.0);
        if right > left {
            *cell += (right - left) * weight;
        }
    }
}

/// Coverage of a stroke of `line_width` centred on the outline.
pub fn stroke_coverage(path: &HeartPath, line_width: f32, width: usize, height: usize) -> Mask {
    let mut mask = Mask::new(width, height);
    let half = line_width / 2.0;
    let edges: Vec<(Point, Point)> = path.edges().collect();

    // Only pixels near the outline can be touched.
    let (min, max) = path.bounds();
    let reach = half + 1.0;
    let x_range = (min.x - reach).floor().max(0.0) as usize..((max.x + reach).ceil().max(0.0) as usize).min(width);
    let y_range = (min.y - reach).floor().max(0.0) as usize..((max.y + reach).ceil().max(0.0) as usize).min(height);

    for y in y_range {
        for x in x_range.clone() {
            let p = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            let d = edges
                .iter()
                .map(|&(a, b)| distance_to_segment(p, a, b))
                .fold(f32::MAX, f32::min);
            mask.alpha[y * width + x] = edge_coverage(half, d);
        }
    }
    mask
}

/// Approximate pixel coverage for something whose edge is `d` px from the
/// pixel centre and `radius` px from its own centre line.
#[inline]
pub fn edge_coverage(radius: f32, d: f32) -> f32 {
    (radius + 0.5 - d).clamp(0.0, 1.0)
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let len2 = abx * abx + aby * aby;
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len2).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * abx, a.y + t * aby))
}

/// Two-pass box blur of a mask. Outside the mask counts as 0
/// (a shadow fades into nothing, it does not smear the border).
pub fn box_blur_mask(src: &Mask, radius: usize) -> Mask {
    if radius == 0 {
        return src.clone();
    }
    let w = src.width as i32;
    let h = src.height as i32;
    let r = radius as i32;
    let win = (2 * r + 1) as f32;
    let mut tmp = Mask::new(src.width, src.height);
    let mut dst = Mask::new(src.width, src.height);

    let at = |m: &Mask, x: i32, y: i32| m.get(x, y);

    /* ---- Pass 1: horizontal (src -> tmp) ---- */
    for y in 0..h {
        let mut sum: f32 = (0..=r).map(|x| at(src, x, y)).sum();
        for x in 0..w {
            tmp.alpha[(y * w + x) as usize] = sum / win;
            sum += at(src, x + r + 1, y) - at(src, x - r, y);
        }
    }

    /* ---- Pass 2: vertical (tmp -> dst) ---- */
    for x in 0..w {
        let mut sum: f32 = (0..=r).map(|y| at(&tmp, x, y)).sum();
        for y in 0..h {
            dst.alpha[(y * w + x) as usize] = sum.max(0.0) / win;
            sum += at(&tmp, x, y + r + 1) - at(&tmp, x, y - r);
        }
    }

    dst
}
