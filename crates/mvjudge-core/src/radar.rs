use std::f64::consts::PI;

use serde::Serialize;

use crate::types::{DimensionSpec, ReviewScores};

/// Radius fractions of the background grid rings.
pub const GRID_LEVELS: [f64; 5] = [0.2, 0.4, 0.6, 0.8, 1.0];

/// Default canvas edge length.
pub const DEFAULT_SIZE: f64 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A spoke from the center to the outer ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Axis {
    pub start: Point,
    pub end: Point,
}

/// Layout of a radar chart on a square canvas with y growing downwards.
///
/// Axis `i` of `n` sits at angle `2πi/n − π/2`: the first axis points up and
/// the rest follow clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadarGeometry {
    pub size: f64,
    pub center: Point,
    pub max_radius: f64,
    /// Label distance beyond `max_radius`, horizontally.
    pub label_offset_x: f64,
    /// Label distance beyond `max_radius`, vertically.
    pub label_offset_y: f64,
}

impl RadarGeometry {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            center: Point::new(size / 2.0, size / 2.0),
            max_radius: size * 0.35,
            label_offset_x: 40.0,
            label_offset_y: 20.0,
        }
    }

    /// Angle in radians of axis `index` out of `count`.
    pub fn angle(index: usize, count: usize) -> f64 {
        (2.0 * PI * index as f64) / count as f64 - PI / 2.0
    }

    fn point_at(&self, angle: f64, radius: f64) -> Point {
        Point::new(
            self.center.x + radius * angle.cos(),
            self.center.y + radius * angle.sin(),
        )
    }

    /// Polygon vertices for `values` on a 0–100 scale, one axis per value.
    /// Values are clamped into range; non-finite values count as 0.
    pub fn polygon(&self, values: &[f64]) -> Vec<Point> {
        let count = values.len();
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                let value = if value.is_finite() {
                    value.clamp(0.0, 100.0)
                } else {
                    0.0
                };
                self.point_at(Self::angle(i, count), value / 100.0 * self.max_radius)
            })
            .collect()
    }

    /// Data polygon for `scores` over `dimensions`, in registry order.
    pub fn score_polygon(&self, scores: &ReviewScores, dimensions: &[DimensionSpec]) -> Vec<Point> {
        let values: Vec<f64> = dimensions.iter().map(|d| scores.get(d.key)).collect();
        self.polygon(&values)
    }

    /// One `count`-gon per entry in `levels`, each at `level × max_radius`.
    pub fn grid_rings(&self, count: usize, levels: &[f64]) -> Vec<Vec<Point>> {
        levels
            .iter()
            .map(|level| {
                (0..count)
                    .map(|i| self.point_at(Self::angle(i, count), level * self.max_radius))
                    .collect()
            })
            .collect()
    }

    pub fn axes(&self, count: usize) -> Vec<Axis> {
        (0..count)
            .map(|i| Axis {
                start: self.center,
                end: self.point_at(Self::angle(i, count), self.max_radius),
            })
            .collect()
    }

    /// Anchor points for axis labels, just outside the outer ring.
    pub fn label_anchors(&self, count: usize) -> Vec<Point> {
        (0..count)
            .map(|i| {
                let angle = Self::angle(i, count);
                Point::new(
                    self.center.x + (self.max_radius + self.label_offset_x) * angle.cos(),
                    self.center.y + (self.max_radius + self.label_offset_y) * angle.sin(),
                )
            })
            .collect()
    }
}

impl Default for RadarGeometry {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE)
    }
}
