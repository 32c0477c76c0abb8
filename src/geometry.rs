//! Integer pixel geometry: points and axis-aligned boxes.

use std::fmt;
use std::ops::{Add, Sub};

use image::Rgba;

use crate::error::{Error, Result};
use crate::surface::Surface;

/// A 2D pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True when either coordinate exceeds `other`'s. Not a total order;
    /// only meaningful for corner comparisons.
    pub fn exceeds(self, other: Point) -> bool {
        self.x > other.x || self.y > other.y
    }

    #[allow(dead_code)]
    pub fn as_tuple(self) -> (i32, i32) {
        (self.x, self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Scalar operand, broadcast to both axes.
impl Add<i32> for Point {
    type Output = Point;

    fn add(self, rhs: i32) -> Point {
        Point::new(self.x + rhs, self.y + rhs)
    }
}

impl Add<(i32, i32)> for Point {
    type Output = Point;

    fn add(self, rhs: (i32, i32)) -> Point {
        Point::new(self.x + rhs.0, self.y + rhs.1)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Sub<i32> for Point {
    type Output = Point;

    fn sub(self, rhs: i32) -> Point {
        Point::new(self.x - rhs, self.y - rhs)
    }
}

impl Sub<(i32, i32)> for Point {
    type Output = Point;

    fn sub(self, rhs: (i32, i32)) -> Point {
        Point::new(self.x - rhs.0, self.y - rhs.1)
    }
}

/// How to change a box's corners in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resize {
    /// Expand outward by this many pixels on all four sides.
    Uniform(i32),
    /// Independent deltas added to (x0, y0, x1, y1).
    Delta(i32, i32, i32, i32),
}

/// Axis-aligned rectangle. `start` is the top-left corner, `end` the
/// bottom-right; the other two corners are cached and refreshed on every
/// mutation. A box is exclusively owned by its caller for the duration of
/// one draw call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Box {
    start: Point,
    end: Point,
    top_right: Point,
    bottom_left: Point,
}

impl Box {
    pub fn new(start: Point, end: Point) -> Result<Self> {
        if !end.exceeds(start) {
            return Err(Error::InvertedBox { start, end });
        }
        let mut bx = Self {
            start,
            end,
            top_right: Point::default(),
            bottom_left: Point::default(),
        };
        bx.refresh_corners();
        Ok(bx)
    }

    pub fn from_corners(x0: i32, y0: i32, x1: i32, y1: i32) -> Result<Self> {
        Self::new(Point::new(x0, y0), Point::new(x1, y1))
    }

    fn refresh_corners(&mut self) {
        self.top_right = Point::new(self.end.x, self.start.y);
        self.bottom_left = Point::new(self.start.x, self.end.y);
    }

    pub fn start(&self) -> Point {
        self.start
    }

    #[allow(dead_code)]
    pub fn end(&self) -> Point {
        self.end
    }

    pub fn width(&self) -> i32 {
        (self.end.x - self.start.x).abs()
    }

    pub fn height(&self) -> i32 {
        (self.end.y - self.start.y).abs()
    }

    /// Average of the two corners, f64 division truncated on consumption.
    pub fn midpoint(&self) -> Point {
        Point::new(
            (self.end.x as f64 - self.width() as f64 / 2.0) as i32,
            (self.end.y as f64 - self.height() as f64 / 2.0) as i32,
        )
    }

    /// Move the corners; fails without mutating when the change would
    /// invert the box.
    pub fn resize(&mut self, change: Resize) -> Result<()> {
        let (start, end) = match change {
            Resize::Uniform(n) => (self.start - n, self.end + n),
            Resize::Delta(a, b, c, d) => (self.start + (a, b), self.end + (c, d)),
        };
        if !end.exceeds(start) {
            return Err(Error::InvertedBox { start, end });
        }
        self.start = start;
        self.end = end;
        self.refresh_corners();
        Ok(())
    }

    /// Smallest square sharing this box's midpoint, side `max(width,
    /// height)` with an integer-truncated half-side.
    pub fn encapsulating_square(&self) -> Result<Box> {
        let half_side = self.width().max(self.height()) / 2;
        let mid = self.midpoint();
        Box::new(mid - half_side, mid + half_side)
    }

    /// Translate the box so both corners move by `point`.
    pub fn anchor_to(&mut self, point: Point) {
        self.start = self.start + point;
        self.end = self.end + point;
        self.refresh_corners();
    }

    /// Strict containment under the corner comparison: a point exactly on
    /// an edge counts as inside only when it clears the corner on the
    /// other axis.
    #[allow(dead_code)]
    pub fn contains(&self, p: Point) -> bool {
        p.exceeds(self.start) && self.end.exceeds(p)
    }

    pub fn as_tuple(&self) -> (i32, i32, i32, i32) {
        (self.start.x, self.start.y, self.end.x, self.end.y)
    }

    /// Outline the rectangle as four line segments.
    pub fn draw(&self, surface: &mut Surface, ink: Rgba<u8>, line_width: u32) {
        surface.draw_line(self.start, self.top_right, ink, line_width);
        surface.draw_line(self.top_right, self.end, ink, line_width);
        surface.draw_line(self.bottom_left, self.end, ink, line_width);
        surface.draw_line(self.start, self.bottom_left, ink, line_width);
    }
}

impl fmt::Display for Box {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} -> {}]", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_add_sub_round_trip() {
        let p = Point::new(3, -7);
        let q = Point::new(11, 4);
        assert_eq!(p + q - q, p);
    }

    #[test]
    fn test_point_scalar_and_tuple_operands() {
        assert_eq!(Point::new(1, 1) + 1, Point::new(2, 2));
        assert_eq!(Point::new(1, 1) + (1, 2), Point::new(2, 3));
        assert_eq!(Point::new(1, 1) + Point::new(2, 2), Point::new(3, 3));
        assert_eq!(Point::new(2, 3) - (1, 2), Point::new(1, 1));
        assert_eq!(Point::new(2, 2) - 1, Point::new(1, 1));
    }

    #[test]
    fn test_exceeds_is_not_a_total_order() {
        // either axis suffices, so both can exceed each other
        assert!(Point::new(1, 2).exceeds(Point::new(2, 1)));
        assert!(Point::new(2, 1).exceeds(Point::new(1, 2)));
        assert!(!Point::new(1, 1).exceeds(Point::new(1, 1)));
    }

    #[test]
    fn test_box_from_corners() {
        let bx = Box::from_corners(1, 1, 2, 2).unwrap();
        assert_eq!(bx.as_tuple(), (1, 1, 2, 2));
        assert_eq!(bx.width(), 1);
        assert_eq!(bx.height(), 1);
    }

    #[test]
    fn test_box_rejects_inverted_corners() {
        assert!(matches!(
            Box::from_corners(2, 2, 1, 1),
            Err(Error::InvertedBox { .. })
        ));
        // a zero-area box has no corner that exceeds the other
        assert!(Box::from_corners(1, 1, 1, 1).is_err());
        // zero width with positive height is still a valid box
        assert!(Box::from_corners(1, 1, 1, 5).is_ok());
    }

    #[test]
    fn test_midpoint_and_encapsulating_square() {
        let bx = Box::from_corners(100, 100, 300, 200).unwrap();
        assert_eq!(bx.midpoint(), Point::new(200, 150));
        let square = bx.encapsulating_square().unwrap();
        assert_eq!(square, Box::from_corners(100, 50, 300, 250).unwrap());
    }

    #[test]
    fn test_resize_uniform_and_delta_invert_each_other() {
        let mut bx = Box::from_corners(100, 100, 200, 200).unwrap();
        bx.resize(Resize::Uniform(5)).unwrap();
        assert_eq!(bx.as_tuple(), (95, 95, 205, 205));
        bx.resize(Resize::Delta(5, 5, -5, -5)).unwrap();
        assert_eq!(bx.as_tuple(), (100, 100, 200, 200));
    }

    #[test]
    fn test_resize_never_leaves_an_inverted_box() {
        let mut bx = Box::from_corners(0, 0, 10, 10).unwrap();
        assert!(bx.resize(Resize::Uniform(-6)).is_err());
        // the failed resize must not have touched the corners
        assert_eq!(bx.as_tuple(), (0, 0, 10, 10));
        assert!(bx.end().exceeds(bx.start()));
    }

    #[test]
    fn test_anchor_to_translates_both_corners() {
        let mut bx = Box::from_corners(0, -3, 20, 10).unwrap();
        bx.anchor_to(Point::new(100, 50));
        assert_eq!(bx.as_tuple(), (100, 47, 120, 60));
        assert!(bx.end().exceeds(bx.start()));
    }

    #[test]
    fn test_strict_containment() {
        let bx = Box::from_corners(10, 10, 20, 20).unwrap();
        assert!(bx.contains(Point::new(15, 15)));
        assert!(bx.contains(Point::new(19, 20)));
        assert!(bx.contains(Point::new(10, 11)));
        assert!(!bx.contains(Point::new(0, 0)));
        assert!(!bx.contains(Point::new(21, 21)));
    }
}
