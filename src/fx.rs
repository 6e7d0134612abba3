// FX: a one-shot confetti burst, fully software-drawn.
// Visual outcomes:
// - On completion a fan of coloured flakes shoots up out of the heart,
//   slows down, tumbles and falls, fading out over ~3 seconds.

use crate::types::{Colour, FrameBuffer};

/// Frames the burst is tuned for; motion is per-tick at this rate.
const TICKS_PER_SEC: f32 = 60.0;
/// Lifetime of every flake, in ticks.
const TOTAL_TICKS: f32 = 200.0;
const START_VELOCITY: f32 = 45.0;
const DECAY: f32 = 0.9;
const GRAVITY: f32 = 1.0;
const FLAKE_SIZE: f32 = 5.0;

// ----------------------------- tiny RNG (no external crate) -----------------------------

/// Deterministic xorshift32 RNG for lightweight randomness.
#[derive(Clone)]
struct Rng32 {
    state: u32,
}

impl Rng32 {
    fn from_seed(seed: u32) -> Self {
        Self { state: seed | 1 }
    }
    #[inline]
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
    /// Uniform [0,1)
    #[inline]
    fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / ((1u32 << 24) as f32)
    }
    #[inline]
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }
}

// ----------------------------- burst description -----------------------------------------

/// What the page asks for: the same knobs a confetti call takes.
#[derive(Debug, Clone)]
pub struct Burst {
    pub particle_count: usize,
    /// Degrees, centred on straight up.
    pub spread: f32,
    /// Launch point in [0,1] viewport coordinates.
    pub origin: (f32, f32),
    pub colors: Vec<Colour>,
}

/// One flake. Visual: a small tumbling rectangle that arcs and fades.
pub struct Particle {
    pub x: f32,
    pub y: f32,
    /// Direction of travel in radians (screen space, y down).
    pub angle: f32,
    /// px per tick
    pub velocity: f32,
    pub wobble: f32,
    pub wobble_speed: f32,
    pub tick: f32,
    pub color: Colour,
}

impl Particle {
    #[inline]
    fn alive(&self) -> bool {
        self.tick < TOTAL_TICKS
    }
}

/// Every flake currently in the air.
pub struct Confetti {
    rng: Rng32,
    particles: Vec<Particle>,
}

impl Confetti {
    pub fn new() -> Self {
        Self { rng: Rng32::from_seed(0xC0FFEEu32), particles: Vec::new() }
    }

    pub fn is_active(&self) -> bool {
        !self.particles.is_empty()
    }

    #[cfg(test)]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Launch `burst` inside a `width` x `height` viewport.
    pub fn fire(&mut self, burst: &Burst, width: usize, height: usize) {
        let x = burst.origin.0 * width as f32;
        let y = burst.origin.1 * height as f32;
        let spread = burst.spread.to_radians();
        let up = -std::f32::consts::FRAC_PI_2;
        let fallback = [Colour::rgb(255, 255, 255)];
        let colors: &[Colour] = if burst.colors.is_empty() { &fallback } else { &burst.colors };

        self.particles.reserve(burst.particle_count);
        for i in 0..burst.particle_count {
            let angle = up + (0.5 * spread - self.rng.next_f32() * spread);
            let velocity = START_VELOCITY * 0.5 + self.rng.next_f32() * START_VELOCITY;
            self.particles.push(Particle {
                x,
                y,
                angle,
                velocity,
                wobble: self.rng.range(0.0, 10.0),
                wobble_speed: self.rng.range(0.05, 0.1),
                tick: 0.0,
                color: colors[i % colors.len()],
            });
        }
    }

    /// Step by `dt` seconds and draw every flake on top of `fb`.
    pub fn update_and_render(&mut self, fb: &mut FrameBuffer, dt: f32) {
        let ticks = dt * TICKS_PER_SEC;
        let decay = DECAY.powf(ticks);

        let mut i = 0;
        while i < self.particles.len() {
            let p = &mut self.particles[i];

            p.x += p.angle.cos() * p.velocity * ticks;
            p.y += (p.angle.sin() * p.velocity + GRAVITY * 3.0) * ticks;
            p.velocity *= decay;
            p.wobble += p.wobble_speed * ticks;
            p.tick += ticks;

            if p.alive() {
                let opacity = 1.0 - p.tick / TOTAL_TICKS;
                // Flakes look like they flip: height follows the wobble phase.
                let h = (FLAKE_SIZE * p.wobble.sin().abs()).max(1.0);
                fill_rect(fb, p.x, p.y, FLAKE_SIZE, h, p.color, opacity);
                i += 1;
            } else {
                // Remove dead particle (swap-remove, O(1))
                self.particles.swap_remove(i);
            }
        }
    }
}

/// Blend an axis-aligned rectangle centred at (cx, cy).
fn fill_rect(fb: &mut FrameBuffer, cx: f32, cy: f32, w: f32, h: f32, color: Colour, opacity: f32) {
    let x0 = (cx - w / 2.0).round() as i32;
    let y0 = (cy - h / 2.0).round() as i32;
    for y in y0..y0 + h.round() as i32 {
        for x in x0..x0 + w.round() as i32 {
            fb.blend(x, y, color, opacity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn burst() -> Burst {
        Burst {
            particle_count: 150,
            spread: 70.0,
            origin: (0.5, 0.4),
            colors: vec![Colour::rgb(0xa5, 0x38, 0x60), Colour::rgb(0xff, 0xff, 0xff)],
        }
    }

    #[test]
    fn test_fire_spawns_at_origin_within_spread() {
        let mut confetti = Confetti::new();
        confetti.fire(&burst(), 300, 500);
        assert_eq!(confetti.particles().len(), 150);

        let up = -std::f32::consts::FRAC_PI_2;
        let half = 35f32.to_radians();
        for p in confetti.particles() {
            assert_eq!((p.x, p.y), (150.0, 200.0));
            assert!((p.angle - up).abs() <= half + 1e-5);
            assert!(p.velocity >= 22.5 && p.velocity < 67.5);
        }
    }

    #[test]
    fn test_flakes_rise_then_expire() {
        let mut confetti = Confetti::new();
        confetti.fire(&burst(), 300, 500);
        let mut fb = FrameBuffer::new(300, 500);

        confetti.update_and_render(&mut fb, 1.0 / 60.0);
        assert!(confetti.particles().iter().all(|p| p.y < 200.0));
        assert!(fb.pixels.iter().any(|&px| px != 0));

        // ~3.3s lifetime
        for _ in 0..240 {
            confetti.update_and_render(&mut fb, 1.0 / 60.0);
        }
        assert!(!confetti.is_active());
    }
}
