use crate::error::ParamError;
use crate::geometry::{Point, Rgb};
use std::f64::consts::FRAC_PI_2;

/// Default scaling laws, taken from the classic canvas demo tree
pub const DEFAULT_LENGTH_FACTOR: f64 = 0.6;
pub const DEFAULT_ANGLE_FACTOR: f64 = 0.5;
pub const DEFAULT_BRANCH_FACTOR: usize = 3;
pub const DEFAULT_START_DEPTH: u32 = 2;
pub const DEFAULT_TERMINAL_DEPTH: u32 = 7;
/// Screen y grows downward, so this points up
pub const DEFAULT_START_ANGLE: f64 = -FRAC_PI_2;

/// Configuration for the terminal grower
#[derive(Clone)]
pub struct GrowConfig {
    pub live: bool,
    pub infinite: bool,
    pub print: bool,
    pub time_step: f32,
    pub time_wait: f64,
    /// Ticks between growth steps
    pub ticks_per_level: u32,
    pub seed: Option<u64>,
    /// Print mode canvas size in cells; the tty size when unset
    pub size: Option<(u16, u16)>,
    pub tree: TreeOverrides,
    pub colors: ColorScheme,
}

/// Tree parameters as they arrive from CLI / settings; unset values are
/// filled in from the terminal size or the defaults above.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeOverrides {
    pub root: Option<Point>,
    pub start_length: Option<f64>,
    pub length_factor: Option<f64>,
    pub start_angle: Option<f64>,
    pub angle_factor: Option<f64>,
    pub branch_factor: Option<usize>,
    pub start_depth: Option<u32>,
    pub terminal_depth: Option<u32>,
}

impl TreeOverrides {
    /// Resolve against a dot grid of `width` x `height`: root at the bottom
    /// center, trunk 30% of the height.
    pub fn resolve(&self, width: f64, height: f64) -> TreeSpec {
        TreeSpec {
            root: self
                .root
                .unwrap_or_else(|| Point::new(width / 2.0, height - 1.0)),
            start_length: self.start_length.unwrap_or(height * 0.3),
            length_factor: self.length_factor.unwrap_or(DEFAULT_LENGTH_FACTOR),
            start_angle: self.start_angle.unwrap_or(DEFAULT_START_ANGLE),
            angle_factor: self.angle_factor.unwrap_or(DEFAULT_ANGLE_FACTOR),
            branch_factor: self.branch_factor.unwrap_or(DEFAULT_BRANCH_FACTOR),
            start_depth: self.start_depth.unwrap_or(DEFAULT_START_DEPTH),
            terminal_depth: self.terminal_depth.unwrap_or(DEFAULT_TERMINAL_DEPTH),
        }
    }

    /// Fill unset fields from `other`
    pub fn or(self, other: &TreeOverrides) -> Self {
        Self {
            root: self.root.or(other.root),
            start_length: self.start_length.or(other.start_length),
            length_factor: self.length_factor.or(other.length_factor),
            start_angle: self.start_angle.or(other.start_angle),
            angle_factor: self.angle_factor.or(other.angle_factor),
            branch_factor: self.branch_factor.or(other.branch_factor),
            start_depth: self.start_depth.or(other.start_depth),
            terminal_depth: self.terminal_depth.or(other.terminal_depth),
        }
    }
}

/// Everything needed to build a [`crate::controller::GrowthController`]
#[derive(Clone, Debug, PartialEq)]
pub struct TreeSpec {
    pub root: Point,
    pub start_length: f64,
    pub length_factor: f64,
    pub start_angle: f64,
    pub angle_factor: f64,
    pub branch_factor: usize,
    pub start_depth: u32,
    pub terminal_depth: u32,
}

impl TreeSpec {
    pub fn validate(&self) -> Result<(), ParamError> {
        for (name, value) in [
            ("root x", self.root.x),
            ("root y", self.root.y),
            ("start length", self.start_length),
            ("start angle", self.start_angle),
            ("length factor", self.length_factor),
            ("angle factor", self.angle_factor),
        ] {
            if !value.is_finite() {
                return Err(ParamError::NotFinite { name, value });
            }
        }
        for (name, value) in [
            ("length factor", self.length_factor),
            ("angle factor", self.angle_factor),
        ] {
            if value <= 0.0 || value >= 1.0 {
                return Err(ParamError::FactorOutOfRange { name, value });
            }
        }
        if self.start_length <= 0.0 {
            return Err(ParamError::NonPositiveLength(self.start_length));
        }
        if self.branch_factor == 0 {
            return Err(ParamError::ZeroBranchFactor);
        }
        if self.terminal_depth < self.start_depth {
            return Err(ParamError::TerminalBelowStart {
                start: self.start_depth,
                terminal: self.terminal_depth,
            });
        }
        Ok(())
    }
}

/// Read-only constants shared by every node of one tree
#[derive(Clone, Debug, PartialEq)]
pub struct GrowthParams {
    pub start_length: f64,
    pub length_factor: f64,
    pub start_angle: f64,
    pub angle_factor: f64,
    pub children_count: usize,
    pub terminal_depth: u32,
    pub colors: ColorScheme,
}

impl GrowthParams {
    pub fn new(spec: &TreeSpec, colors: ColorScheme) -> Self {
        Self {
            start_length: spec.start_length,
            length_factor: spec.length_factor,
            start_angle: spec.start_angle,
            angle_factor: spec.angle_factor,
            children_count: spec.branch_factor,
            terminal_depth: spec.terminal_depth,
            colors,
        }
    }
}

/// Color scheme for rendering
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorScheme {
    pub wood_dark: Rgb,
    pub wood_light: Rgb,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            wood_dark: (101, 67, 33),      // Brown
            wood_light: (139, 90, 43),     // Lighter brown
        }
    }
}

impl ColorScheme {
    /// Blend from dark wood at depth 0 to light wood at `terminal_depth`
    pub fn wood_at(&self, depth: u32, terminal_depth: u32) -> Rgb {
        let t = if terminal_depth == 0 {
            1.0
        } else {
            (depth as f64 / terminal_depth as f64).min(1.0)
        };
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        (
            lerp(self.wood_dark.0, self.wood_light.0),
            lerp(self.wood_dark.1, self.wood_light.1),
            lerp(self.wood_dark.2, self.wood_light.2),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> TreeSpec {
        TreeOverrides::default().resolve(100.0, 80.0)
    }

    #[test]
    fn resolve_uses_bottom_center_and_defaults() {
        let s = spec();
        assert_eq!(s.root, Point::new(50.0, 79.0));
        assert!((s.start_length - 24.0).abs() < 1e-9);
        assert_eq!(s.branch_factor, DEFAULT_BRANCH_FACTOR);
        assert_eq!(s.start_depth, 2);
        assert_eq!(s.terminal_depth, 7);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn overrides_win_over_fallback() {
        let cli = TreeOverrides {
            branch_factor: Some(5),
            ..Default::default()
        };
        let file = TreeOverrides {
            branch_factor: Some(2),
            terminal_depth: Some(4),
            ..Default::default()
        };
        let merged = cli.or(&file);
        assert_eq!(merged.branch_factor, Some(5));
        assert_eq!(merged.terminal_depth, Some(4));
    }

    #[test]
    fn rejects_bad_factors() {
        let mut s = spec();
        s.length_factor = 1.0;
        assert_eq!(
            s.validate(),
            Err(ParamError::FactorOutOfRange { name: "length factor", value: 1.0 })
        );

        let mut s = spec();
        s.angle_factor = f64::NAN;
        assert!(matches!(s.validate(), Err(ParamError::NotFinite { name: "angle factor", .. })));
    }

    #[test]
    fn rejects_terminal_below_start() {
        let mut s = spec();
        s.start_depth = 5;
        s.terminal_depth = 4;
        assert_eq!(
            s.validate(),
            Err(ParamError::TerminalBelowStart { start: 5, terminal: 4 })
        );
    }

    #[test]
    fn rejects_zero_branches_and_length() {
        let mut s = spec();
        s.branch_factor = 0;
        assert_eq!(s.validate(), Err(ParamError::ZeroBranchFactor));

        let mut s = spec();
        s.start_length = 0.0;
        assert_eq!(s.validate(), Err(ParamError::NonPositiveLength(0.0)));
    }

    #[test]
    fn wood_gradient_endpoints() {
        let c = ColorScheme::default();
        assert_eq!(c.wood_at(0, 7), c.wood_dark);
        assert_eq!(c.wood_at(7, 7), c.wood_light);
        assert_eq!(c.wood_at(12, 7), c.wood_light);
    }
}
