//! The page the scratch card lives on: layout, the hidden message under the
//! heart, and the call-to-action button that appears on completion.

use std::time::{Duration, Instant};

use log::info;

use crate::draw::{draw_text_5x7, text_width_5x7};
use crate::fx::Burst;
use crate::heart::HeartPath;
use crate::raster::fill_coverage;
use crate::scratch::ScratchCard;
use crate::types::{Colour, FrameBuffer, Mask, Point};

const BACKGROUND: Colour = Colour::rgb(0xff, 0xf0, 0xf5);
const REVEAL_FILL: Colour = Colour::rgb(0xa5, 0x38, 0x60);
const REVEAL_TEXT: Colour = Colour::rgb(0xff, 0xff, 0xff);
const BUTTON_FILL: Colour = Colour::rgb(0x3a, 0x7c, 0xa5);
const BUTTON_TEXT: Colour = Colour::rgb(0xff, 0xff, 0xff);

const MESSAGE: &str = "SAVE THE DATE!";
const BUTTON_LABEL: &str = "ADD TO CALENDAR";

/// Length of the button's fade/scale-in.
const CTA_TRANSITION: Duration = Duration::from_millis(500);
const CTA_START_SCALE: f32 = 0.9;
const SURFACE_TOP: i32 = 60;
const BUTTON_GAP: i32 = 30;
const BUTTON_PADDING: (i32, i32) = (14, 10);

/// Window-space rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x as f32
            && p.y >= self.y as f32
            && p.x < (self.x + self.w) as f32
            && p.y < (self.y + self.h) as f32
    }

    pub fn center(&self) -> Point {
        Point::new(self.x as f32 + self.w as f32 / 2.0, self.y as f32 + self.h as f32 / 2.0)
    }
}

/// Where things sit inside the viewport.
#[derive(Debug, Clone)]
pub struct Layout {
    pub viewport: (usize, usize),
    /// Bounding box of the drawing surface.
    pub surface: Rect,
    pub button: Rect,
}

impl Layout {
    /// Surface centred horizontally near the top, button centred below it.
    pub fn new(viewport: (usize, usize), surface_size: u32) -> Self {
        let size = surface_size as i32;
        let surface = Rect { x: (viewport.0 as i32 - size) / 2, y: SURFACE_TOP, w: size, h: size };

        let bw = text_width_5x7(BUTTON_LABEL, 1) + 2 * BUTTON_PADDING.0;
        let bh = 7 + 2 * BUTTON_PADDING.1;
        let button = Rect {
            x: (viewport.0 as i32 - bw) / 2,
            y: surface.y + surface.h + BUTTON_GAP,
            w: bw,
            h: bh,
        };
        Self { viewport, surface, button }
    }

    /// Window position -> surface-local position (subtract the box origin).
    pub fn to_surface(&self, p: Point) -> Point {
        Point::new(p.x - self.surface.x as f32, p.y - self.surface.y as f32)
    }

    /// Surface centre in [0,1] viewport coordinates.
    pub fn surface_center_normalized(&self) -> (f32, f32) {
        let c = self.surface.center();
        (c.x / self.viewport.0 as f32, c.y / self.viewport.1 as f32)
    }
}

/// Stroke edge produced by one frame of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stroke {
    #[default]
    Unchanged,
    /// Pressed inside the surface.
    Start,
    /// Released, or left the surface while drawing.
    End,
}

/// What one polled frame of mouse input means for the page.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    /// Button went down this frame, anywhere.
    pub pressed: bool,
    /// Window position of that press, for button hits.
    pub click: Option<Point>,
    pub stroke: Stroke,
    /// Surface-local point to scratch at. Only set when the pointer moved.
    pub scratch: Option<Point>,
}

/// Turns polled (position, button) samples into press/stroke/move events.
#[derive(Debug, Default)]
pub struct Pointer {
    was_down: bool,
    last_pos: Option<Point>,
    drawing: bool,
}

impl Pointer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, pos: Option<Point>, down: bool, layout: &Layout) -> PointerEvent {
        let over_surface = pos.filter(|p| layout.surface.contains(*p));
        let mut event = PointerEvent::default();

        if down && !self.was_down {
            event.pressed = true;
            event.click = pos;
            if over_surface.is_some() {
                self.drawing = true;
                event.stroke = Stroke::Start;
            }
        } else if !down && self.was_down && self.drawing {
            self.drawing = false;
            event.stroke = Stroke::End;
        }
        self.was_down = down;

        if self.drawing {
            match over_surface {
                Some(p) if self.last_pos != Some(p) => event.scratch = Some(layout.to_surface(p)),
                Some(_) => {}
                None => {
                    self.drawing = false;
                    event.stroke = Stroke::End;
                }
            }
        }
        self.last_pos = pos;
        event
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CtaState {
    /// Invisible and ignores clicks.
    Hidden,
    /// Visible and clickable; fading in since the instant.
    Shown(Instant),
}

/// The "add to calendar" button.
pub struct CallToAction {
    state: CtaState,
}

impl CallToAction {
    pub fn new() -> Self {
        Self { state: CtaState::Hidden }
    }

    #[cfg(test)]
    pub fn state(&self) -> CtaState {
        self.state
    }

    /// Hidden -> Shown. Later calls keep the original start time.
    pub fn reveal(&mut self, now: Instant) {
        if self.state == CtaState::Hidden {
            info!("showing call-to-action");
            self.state = CtaState::Shown(now);
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self.state, CtaState::Shown(_))
    }

    /// 0 while hidden, ramps to 1 over the transition.
    pub fn opacity(&self, now: Instant) -> f32 {
        match self.state {
            CtaState::Hidden => 0.0,
            CtaState::Shown(since) => {
                let t = now.saturating_duration_since(since).as_secs_f32() / CTA_TRANSITION.as_secs_f32();
                t.clamp(0.0, 1.0)
            }
        }
    }

    pub fn scale(&self, now: Instant) -> f32 {
        CTA_START_SCALE + (1.0 - CTA_START_SCALE) * self.opacity(now)
    }
}

pub struct Page {
    layout: Layout,
    /// Heart coverage in window space, for the revealed art.
    reveal: Mask,
    cta: CallToAction,
    burst: Burst,
}

impl Page {
    pub fn new(layout: Layout, heart: &HeartPath, burst: Burst) -> Self {
        let placed = heart.translated(layout.surface.x as f32, layout.surface.y as f32);
        let reveal = fill_coverage(&placed, layout.viewport.0, layout.viewport.1);
        Self { layout, reveal, cta: CallToAction::new(), burst }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Completion side of the page: show the button and hand back the
    /// confetti burst aimed at the surface centre.
    pub fn on_finished(&mut self, now: Instant) -> Burst {
        self.cta.reveal(now);
        Burst { origin: self.layout.surface_center_normalized(), ..self.burst.clone() }
    }

    /// A press at window position `p`. True if it hit the visible button.
    pub fn click(&self, p: Point) -> bool {
        if self.cta.is_interactive() && self.layout.button.contains(p) {
            info!("calendar button pressed");
            return true;
        }
        false
    }

    /// Draw background, hidden art, the cover on top, then the button.
    pub fn compose(&self, fb: &mut FrameBuffer, card: &ScratchCard, now: Instant) {
        fb.fill(BACKGROUND.to_u32());

        for (i, &a) in self.reveal.alpha.iter().enumerate() {
            if a > 0.0 {
                let (x, y) = ((i % fb.width) as i32, (i / fb.width) as i32);
                fb.blend(x, y, REVEAL_FILL, a);
            }
        }
        let s = self.layout.surface;
        let msg_w = text_width_5x7(MESSAGE, 2);
        draw_text_5x7(fb, s.x + (s.w - msg_w) / 2, s.y + s.h / 2 - 7, MESSAGE, REVEAL_TEXT, 2, 1.0);

        // Visual: wherever the cover was scratched, the rose heart and its message show.
        card.surface().composite_onto(fb, (s.x, s.y));

        self.draw_button(fb, now);
    }

    fn draw_button(&self, fb: &mut FrameBuffer, now: Instant) {
        let opacity = self.cta.opacity(now);
        if opacity <= 0.0 {
            return;
        }
        // Visual: the blue button grows from 90 % while fading in.
        let scale = self.cta.scale(now);
        let b = self.layout.button;
        let c = b.center();
        let (w, h) = (b.w as f32 * scale, b.h as f32 * scale);
        let x0 = (c.x - w / 2.0).round() as i32;
        let y0 = (c.y - h / 2.0).round() as i32;
        for y in y0..y0 + h.round() as i32 {
            for x in x0..x0 + w.round() as i32 {
                fb.blend(x, y, BUTTON_FILL, opacity);
            }
        }
        let tw = text_width_5x7(BUTTON_LABEL, 1);
        draw_text_5x7(fb, c.x as i32 - tw / 2, c.y as i32 - 3, BUTTON_LABEL, BUTTON_TEXT, 1, opacity);
    }
}
