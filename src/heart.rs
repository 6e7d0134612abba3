// The heart outline: parsed once from SVG path data, flattened to polygons.
// Every layer (fill, inset shading, rim, reveal art) is rasterised from this
// one flattened outline, so they all line up pixel for pixel.

use kurbo::{BezPath, PathEl};

use crate::error::Error;
use crate::types::Point;

/// Max distance (px) between the curve and its flattened polygon.
const FLATTEN_TOLERANCE: f64 = 0.05;

/// A closed outline made of one or more flattened contours.
#[derive(Debug, Clone)]
pub struct HeartPath {
    contours: Vec<Vec<Point>>,
}

impl HeartPath {
    /// Parse SVG path data (absolute or relative commands) and flatten it.
    /// Data that encloses no area is rejected.
    pub fn parse(d: &str) -> Result<Self, Error> {
        let bez = BezPath::from_svg(d.trim()).map_err(|e| Error::HeartPath(e.to_string()))?;

        let mut contours: Vec<Vec<Point>> = Vec::new();
        let mut current: Vec<Point> = Vec::new();
        kurbo::flatten(bez.iter(), FLATTEN_TOLERANCE, |el| match el {
            PathEl::MoveTo(p) => {
                if current.len() > 2 {
                    contours.push(std::mem::take(&mut current));
                }
                current.clear();
                current.push(Point::new(p.x as f32, p.y as f32));
            }
            PathEl::LineTo(p) => current.push(Point::new(p.x as f32, p.y as f32)),
            PathEl::ClosePath => {
                if current.len() > 2 {
                    contours.push(std::mem::take(&mut current));
                }
                current.clear();
            }
            // flatten only emits moves, lines and closes
            PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
        });
        if current.len() > 2 {
            contours.push(current);
        }

        let heart = Self { contours };
        if heart.contours.is_empty() || heart.area() < 1.0 {
            return Err(Error::HeartPath("path encloses no area".to_string()));
        }
        Ok(heart)
    }

    /// Closed polygons; the last point connects back to the first.
    #[cfg(test)]
    pub fn contours(&self) -> &[Vec<Point>] {
        &self.contours
    }

    /// Every edge of every contour, closing edge included.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.contours.iter().flat_map(|c| {
            let n = c.len();
            (0..n).map(move |k| (c[k], c[(k + 1) % n]))
        })
    }

    /// Shoelace area of the flattened outline.
    pub fn area(&self) -> f32 {
        self.contours
            .iter()
            .map(|c| {
                let n = c.len();
                let twice: f32 = (0..n)
                    .map(|k| {
                        let (a, b) = (c[k], c[(k + 1) % n]);
                        a.x * b.y - b.x * a.y
                    })
                    .sum();
                twice / 2.0
            })
            .sum::<f32>()
            .abs()
    }

    /// (min, max) corners of the outline.
    pub fn bounds(&self) -> (Point, Point) {
        let mut min = Point::new(f32::MAX, f32::MAX);
        let mut max = Point::new(f32::MIN, f32::MIN);
        for p in self.contours.iter().flatten() {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (min, max)
    }

    /// Same shape moved by (dx, dy).
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        let contours = self
            .contours
            .iter()
            .map(|c| c.iter().map(|p| Point::new(p.x + dx, p.y + dy)).collect())
            .collect();
        Self { contours }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HEART_PATH;

    fn near(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.5
    }

    #[test]
    fn test_parse_heart() {
        let heart = HeartPath::parse(HEART_PATH).unwrap();
        assert_eq!(heart.contours().len(), 1);
        assert!(heart.contours()[0].len() > 40);

        let (min, max) = heart.bounds();
        assert!(near(min.x, 5.0), "{min:?}");
        assert!(near(max.x, 195.0), "{max:?}");
        assert!(near(max.y, 190.0), "{max:?}");
        assert!(min.y > 13.5 && min.y < 15.0, "{min:?}");

        // Real area is ~23.8k px, well above the 18k estimate.
        let area = heart.area();
        assert!(area > 23_000.0 && area < 24_500.0, "area = {area}");
    }

    #[test]
    fn test_parse_relative_commands() {
        let square = HeartPath::parse("m10,10 l10,0 l0,10 l-10,0 z").unwrap();
        let (min, max) = square.bounds();
        assert_eq!(min, Point::new(10.0, 10.0));
        assert_eq!(max, Point::new(20.0, 20.0));
        assert!((square.area() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_parse_compact_numbers() {
        // "0.5.5" is two numbers, "1e1" is ten
        let tri = HeartPath::parse("M0,0 L1e1,0 L0.5.5 Z").unwrap();
        let (min, max) = tri.bounds();
        assert_eq!(min, Point::new(0.0, 0.0));
        assert_eq!(max, Point::new(10.0, 0.5));
    }

    #[test]
    fn test_parse_lines_and_edges() {
        let square = HeartPath::parse("M0 0 L10 0 L10 10 L0 10 Z").unwrap();
        assert!((square.area() - 100.0).abs() < 1e-3);
        assert_eq!(square.edges().count(), square.contours()[0].len());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(HeartPath::parse(""), Err(Error::HeartPath(_))));
        assert!(matches!(HeartPath::parse("M 1"), Err(Error::HeartPath(_))));
        assert!(matches!(HeartPath::parse("M 0 0 # 1"), Err(Error::HeartPath(_))));
        // An open line has no area
        assert!(matches!(HeartPath::parse("M 0 0 L 5 0"), Err(Error::HeartPath(_))));
    }

    #[test]
    fn test_translated() {
        let square = HeartPath::parse("M0,0 L10,0 L10,10 L0,10 Z").unwrap();
        let moved = square.translated(5.0, 1.0);
        let (min, max) = moved.bounds();
        assert_eq!(min, Point::new(5.0, 1.0));
        assert_eq!(max, Point::new(15.0, 11.0));
        assert!((moved.area() - 100.0).abs() < 1e-2);
    }
}
