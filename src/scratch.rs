//! Scratch progress: erase input, the throttled coverage check and the
//! one-way Active -> Finished latch.

use std::time::{Duration, Instant};

use log::info;

use crate::surface::ScratchSurface;
use crate::texture::TextureState;
use crate::types::Point;

/// Tuning for erase + completion.
#[derive(Debug, Clone)]
pub struct ScratchSettings {
    pub brush_radius: f32,
    pub check_interval: Duration,
    /// Percentage that must be exceeded (strictly) to finish.
    pub threshold: f64,
    /// Opaque pixels a fresh heart is assumed to have.
    pub estimated_total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScratchState {
    Active,
    Finished,
}

/// Result of one progress check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Progress {
    /// Inside the cooldown window or already finished; nothing was scanned.
    Skipped,
    /// Scanned; percentage not above the threshold.
    Measured(f64),
    /// Scanned and crossed the threshold: the card just finished.
    Completed(f64),
}

/// Scratched share of the estimate, in percent. Can go negative when more
/// pixels are covered than the estimate assumes.
pub fn scratched_percentage(still_covered: usize, estimated_total: usize) -> f64 {
    if estimated_total == 0 {
        return 100.0;
    }
    let total = estimated_total as f64;
    let scratched = total - still_covered as f64;
    scratched / total * 100.0
}

pub struct ScratchCard {
    surface: ScratchSurface,
    settings: ScratchSettings,
    state: ScratchState,
    drawing: bool,
    last_check: Option<Instant>,
    /// Last erase point of the current stroke, for gap filling.
    last_point: Option<Point>,
}

impl ScratchCard {
    /// Take ownership of the surface and draw the cover once with whatever
    /// texture state exists right now.
    pub fn new(mut surface: ScratchSurface, settings: ScratchSettings, texture: &TextureState) -> Self {
        surface.render(texture.image());
        Self {
            surface,
            settings,
            state: ScratchState::Active,
            drawing: false,
            last_check: None,
            last_point: None,
        }
    }

    pub fn surface(&self) -> &ScratchSurface {
        &self.surface
    }

    #[cfg(test)]
    pub fn state(&self) -> ScratchState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == ScratchState::Finished
    }

    #[cfg(test)]
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    #[cfg(test)]
    pub fn last_check(&self) -> Option<Instant> {
        self.last_check
    }

    /// Redraw the cover after the texture settles. A finished card stays revealed.
    pub fn rerender(&mut self, texture: &TextureState) {
        if self.is_finished() {
            return;
        }
        self.surface.render(texture.image());
    }

    /// Pointer went down on the surface.
    pub fn press(&mut self) {
        self.drawing = true;
        self.last_point = None;
    }

    /// Pointer released or left the surface.
    pub fn release(&mut self) {
        self.drawing = false;
        self.last_point = None;
    }

    /// Pointer moved to `p` (surface-local). Erases only while pressed; fills
    /// the gap from the previous point with evenly spaced dabs.
    /// Returns true if this move finished the card.
    pub fn drag(&mut self, p: Point, now: Instant) -> bool {
        if !self.drawing || self.is_finished() {
            return false;
        }
        let spacing = (self.settings.brush_radius / 2.0).max(1.0);
        let from = self.last_point.unwrap_or(p);
        let steps = (from.distance(p) / spacing).ceil().max(1.0) as usize;
        self.last_point = Some(p);

        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            let dab = Point::new(from.x + (p.x - from.x) * t, from.y + (p.y - from.y) * t);
            if self.scratch(dab, now) {
                return true;
            }
        }
        false
    }

    /// One erase followed by a progress check. Returns true if it finished the card.
    pub fn scratch(&mut self, p: Point, now: Instant) -> bool {
        if !self.erase(p) {
            return false;
        }
        matches!(self.check_progress(now), Progress::Completed(_))
    }

    /// Clear a disc at `p`. Ignored once finished; returns whether it erased.
    pub fn erase(&mut self, p: Point) -> bool {
        if self.is_finished() {
            return false;
        }
        // Visual: a round hole opens in the cover under the pointer.
        self.surface.erase_disc(p, self.settings.brush_radius);
        true
    }

    /// Throttled coverage scan. At most one scan per `check_interval`.
    pub fn check_progress(&mut self, now: Instant) -> Progress {
        if self.is_finished() {
            return Progress::Skipped;
        }
        if let Some(last) = self.last_check {
            if now.saturating_duration_since(last) < self.settings.check_interval {
                return Progress::Skipped;
            }
        }
        self.last_check = Some(now);

        let percentage = self.percentage();
        if percentage > self.settings.threshold {
            self.finish(percentage);
            return Progress::Completed(percentage);
        }
        Progress::Measured(percentage)
    }

    /// Current scratched percentage (unthrottled scan).
    pub fn percentage(&self) -> f64 {
        scratched_percentage(self.surface.count_covered(), self.settings.estimated_total)
    }

    fn finish(&mut self, percentage: f64) {
        self.state = ScratchState::Finished;
        self.drawing = false;
        // Visual: whatever cover is left vanishes at once, the message shows through.
        self.surface.clear_all();
        info!("scratch card finished at {percentage:.1}%");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HEART_PATH;
    use crate::heart::HeartPath;
    use crate::types::Colour;

    fn settings() -> ScratchSettings {
        ScratchSettings {
            brush_radius: 20.0,
            check_interval: Duration::from_millis(200),
            threshold: 80.0,
            estimated_total: 18_000,
        }
    }

    fn card() -> ScratchCard {
        let heart = HeartPath::parse(HEART_PATH).unwrap();
        let surface = ScratchSurface::new(200, &heart, Colour::rgb(0xff, 0xf5, 0xf8), -13);
        ScratchCard::new(surface, settings(), &TextureState::Failed)
    }

    /// Every point on a grid across the whole surface.
    fn sweep() -> Vec<Point> {
        let mut points = Vec::new();
        for y in (0..=200).step_by(10) {
            for x in (0..=200).step_by(10) {
                points.push(Point::new(x as f32, y as f32));
            }
        }
        points
    }

    #[test]
    fn test_percentage_formula() {
        assert_eq!(scratched_percentage(18_000, 18_000), 0.0);
        assert_eq!(scratched_percentage(3_600, 18_000), 80.0);
        assert!(scratched_percentage(3_599, 18_000) > 80.0);
        assert!((scratched_percentage(3_599, 18_000) - 80.0056).abs() < 1e-3);
        assert!(scratched_percentage(20_000, 18_000) < 0.0);
    }

    #[test]
    fn test_exactly_threshold_does_not_finish() {
        let covered = card().surface().count_covered();
        // Pick the estimate so the fresh card reads exactly 80 %
        let settings = ScratchSettings { estimated_total: covered * 5, ..settings() };
        let heart = HeartPath::parse(HEART_PATH).unwrap();
        let surface = ScratchSurface::new(200, &heart, Colour::rgb(0xff, 0xf5, 0xf8), -13);
        let mut card = ScratchCard::new(surface, settings, &TextureState::Failed);

        let t0 = Instant::now();
        assert_eq!(card.check_progress(t0), Progress::Measured(80.0));
        assert!(!card.is_finished());
        assert!(!card.surface().is_fully_clear());

        // One more dab tips it over
        assert!(card.erase(Point::new(100.0, 100.0)));
        match card.check_progress(t0 + Duration::from_millis(200)) {
            Progress::Completed(p) => assert!(p > 80.0, "p = {p}"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(card.is_finished());
    }

    #[test]
    fn test_fresh_card_is_not_scratched() {
        let mut card = card();
        assert_eq!(card.state(), ScratchState::Active);
        // The real heart is larger than the estimate, so the reading starts below 0.
        match card.check_progress(Instant::now()) {
            Progress::Measured(p) => assert!(p <= 0.0, "p = {p}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_fallback_cover_is_scratchable() {
        let mut card = card();
        let before = card.surface().count_covered();
        assert!(before > 18_000);
        assert!(card.erase(Point::new(100.0, 100.0)));
        assert!(card.surface().count_covered() < before);
    }

    #[test]
    fn test_percentage_is_monotonic() {
        let mut card = card();
        let mut last = card.percentage();
        for p in sweep() {
            card.erase(p);
            let now = card.percentage();
            assert!(now >= last, "{now} < {last}");
            last = now;
        }
    }

    #[test]
    fn test_rate_limit() {
        let mut card = card();
        let t0 = Instant::now();
        assert!(matches!(card.check_progress(t0), Progress::Measured(_)));
        assert_eq!(card.last_check(), Some(t0));

        let early = t0 + Duration::from_millis(199);
        assert_eq!(card.check_progress(early), Progress::Skipped);
        assert_eq!(card.last_check(), Some(t0));

        let later = t0 + Duration::from_millis(200);
        assert!(matches!(card.check_progress(later), Progress::Measured(_)));
        assert_eq!(card.last_check(), Some(later));
    }

    #[test]
    fn test_finishes_exactly_once_and_clears() {
        let mut card = card();
        let t0 = Instant::now();
        for p in sweep() {
            card.erase(p);
        }
        assert!(card.percentage() > 80.0);

        assert!(matches!(card.check_progress(t0), Progress::Completed(_)));
        assert!(card.is_finished());
        assert!(card.surface().is_fully_clear());

        // Further checks and scratches never complete again
        let later = t0 + Duration::from_secs(5);
        assert_eq!(card.check_progress(later), Progress::Skipped);
        assert!(!card.scratch(Point::new(100.0, 100.0), later));
        assert_eq!(card.last_check(), Some(t0));
    }

    #[test]
    fn test_erase_after_finish_is_ignored() {
        let mut card = card();
        for p in sweep() {
            card.erase(p);
        }
        card.check_progress(Instant::now());
        assert!(card.is_finished());

        assert!(!card.erase(Point::new(50.0, 50.0)));
        card.rerender(&TextureState::Failed);
        assert!(card.surface().is_fully_clear());
    }

    #[test]
    fn test_drag_needs_press() {
        let mut card = card();
        let before = card.surface().count_covered();
        assert!(!card.drag(Point::new(100.0, 100.0), Instant::now()));
        assert_eq!(card.surface().count_covered(), before);

        card.press();
        assert!(card.is_drawing());
        card.drag(Point::new(100.0, 100.0), Instant::now());
        assert!(card.surface().count_covered() < before);

        card.release();
        assert!(!card.is_drawing());
    }

    #[test]
    fn test_drag_fills_gaps() {
        let mut card = card();
        let t0 = Instant::now();
        card.press();
        card.drag(Point::new(40.0, 100.0), t0);
        card.drag(Point::new(160.0, 100.0), t0);
        // Midway between the two samples is erased too
        assert_eq!(card.surface().pixels().get_pixel(100, 100)[3], 0);
    }

    #[test]
    fn test_drag_can_finish() {
        let mut card = card();
        let t0 = Instant::now();
        card.press();
        let mut finished = 0;
        for (i, row) in (0..=200).step_by(15).enumerate() {
            let now = t0 + Duration::from_millis(250 * i as u64);
            card.release();
            card.press();
            if card.drag(Point::new(0.0, row as f32), now) {
                finished += 1;
            }
            if card.drag(Point::new(200.0, row as f32), now) {
                finished += 1;
            }
        }
        // One more check after the last stroke settles it
        if matches!(card.check_progress(t0 + Duration::from_secs(60)), Progress::Completed(_)) {
            finished += 1;
        }
        assert_eq!(finished, 1);
        assert!(card.surface().is_fully_clear());
    }
}
