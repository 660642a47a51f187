use std::f64::consts::{PI, TAU};

pub mod calendar;
pub mod constants;

pub use calendar::{MonthLocale, YearCalendar};
pub use constants::{GeometryConstants, Proportion};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A position relative to the wheel centre, angle in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polar {
    pub radius: f64,
    pub angle: f64,
}

/// Maps any angle into `[0, 2π)`.
pub fn normalize_radians(angle: f64) -> f64 {
    let normalized = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if normalized >= TAU { 0.0 } else { normalized }
}

pub fn normalize_degrees(angle: f64) -> f64 {
    let normalized = angle.rem_euclid(360.0);
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Signed shortest rotation from `b` to `a`, in `[-π, π)`.
pub fn angle_difference(a: f64, b: f64) -> f64 {
    (a - b + PI).rem_euclid(TAU) - PI
}

pub fn polar_to_cartesian(center: Point, polar: Polar) -> Point {
    Point::new(
        center.x + polar.radius * polar.angle.cos(),
        center.y + polar.radius * polar.angle.sin(),
    )
}

pub fn cartesian_to_polar(center: Point, point: Point) -> Polar {
    let (dx, dy) = (point.x - center.x, point.y - center.y);
    Polar {
        radius: dx.hypot(dy),
        angle: normalize_radians(dy.atan2(dx)),
    }
}
