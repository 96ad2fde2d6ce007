//! Collaborator traits the growth engine draws and rolls dice through.

use crate::geometry::{Point, Rgb};
use rand::rngs::StdRng;
use rand::Rng;

/// Line style handed to [`Surface::draw_line`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Rgb,
    /// Depth of the node the segment leads to
    pub depth: u32,
}

/// 2D drawing primitives
pub trait Surface {
    fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke);
    fn draw_circle(&mut self, center: Point, radius: f64, color: Rgb);
}

/// Bounded random integers, `min` inclusive, `max` exclusive
pub trait RandomSource {
    fn random_int(&mut self, min: i32, max: i32) -> i32;
}

impl RandomSource for StdRng {
    fn random_int(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.gen_range(min..max)
    }
}

/// Everything a broadcast might need from the outside world
pub trait Host: Surface + RandomSource {}

impl<T: Surface + RandomSource> Host for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn std_rng_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let v = rng.random_int(1, 7);
            assert!((1..7).contains(&v));
        }
    }

    #[test]
    fn empty_range_returns_min() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(rng.random_int(3, 3), 3);
        assert_eq!(rng.random_int(5, 2), 5);
    }
}
