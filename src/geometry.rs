//! Passive geometry: points, segments and the leaves that hang off them.

/// RGB triple, the same shape the color scheme uses
pub type Rgb = (u8, u8, u8);

/// Leaf radius bounds, `[min, max)`
pub const LEAF_RADIUS_MIN: i32 = 1;
pub const LEAF_RADIUS_MAX: i32 = 7;

/// Every leaf is painted in this color
pub const LEAF_COLOR: Rgb = (50, 205, 50);

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point reached by walking `length` along `angle` (radians) from here
    pub fn polar_offset(self, length: f64, angle: f64) -> Self {
        Self {
            x: self.x + angle.cos() * length,
            y: self.y + angle.sin() * length,
        }
    }
}

/// Terminal marker at the tip of a segment
#[derive(Clone, Debug, PartialEq)]
pub struct Leaf {
    pub position: Point,
    pub radius: i32,
    pub color: Rgb,
}

/// Straight line between two fixed endpoints
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    start: Point,
    end: Point,
    leaf: Option<Leaf>,
}

impl Segment {
    /// Derive the segment from a start point and polar parameters.
    /// The endpoints never change afterwards.
    pub fn from_polar(start: Point, length: f64, angle: f64) -> Self {
        Self {
            start,
            end: start.polar_offset(length, angle),
            leaf: None,
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn leaf(&self) -> Option<&Leaf> {
        self.leaf.as_ref()
    }

    /// Attach a leaf at the far endpoint. Returns false if one is already there.
    pub fn attach_leaf(&mut self, radius: i32) -> bool {
        if self.leaf.is_some() {
            return false;
        }
        self.leaf = Some(Leaf {
            position: self.end,
            radius,
            color: LEAF_COLOR,
        });
        true
    }

    pub fn length(&self) -> f64 {
        (self.end.x - self.start.x).hypot(self.end.y - self.start.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    #[test]
    fn zero_angle_points_along_x() {
        let seg = Segment::from_polar(Point::new(3.0, 4.0), 10.0, 0.0);
        assert!((seg.end().x - 13.0).abs() < EPS);
        assert!((seg.end().y - 4.0).abs() < EPS);
    }

    #[test]
    fn quarter_turn_points_along_y() {
        let seg = Segment::from_polar(Point::new(0.0, 0.0), 5.0, FRAC_PI_2);
        assert!(seg.end().x.abs() < EPS);
        assert!((seg.end().y - 5.0).abs() < EPS);
        assert!((seg.length() - 5.0).abs() < EPS);
    }

    #[test]
    fn leaf_attaches_once_at_far_end() {
        let mut seg = Segment::from_polar(Point::new(1.0, 1.0), 2.0, 0.0);
        assert!(seg.leaf().is_none());
        assert!(seg.attach_leaf(4));
        assert!(!seg.attach_leaf(6));

        let leaf = seg.leaf().unwrap();
        assert_eq!(leaf.radius, 4);
        assert_eq!(leaf.position, seg.end());
        assert_eq!(leaf.color, LEAF_COLOR);
    }
}
