//! Lesson fan placement.
//!
//! Lessons spread evenly over an arc centred on their module's branch
//! direction. The arc widens by a fixed share per lesson until it covers
//! [`MAX_FAN_FRACTION`] of a full circle, leaving a gap that faces back
//! towards the module's course.

use std::f32::consts::TAU;

use coursemap_core::geometry::Point;

/// Largest share of a full circle a fan may cover.
pub const MAX_FAN_FRACTION: f32 = 0.8;

/// An arc of `count` evenly spaced angles centred on `base`.
///
/// # Examples
///
/// ```
/// # use coursemap::layout::Fan;
/// let fan = Fan::new(0.0, 3, 30f32.to_radians());
/// let angles: Vec<f32> = fan.angles().collect();
/// assert_eq!(angles.len(), 3);
/// assert!((angles[1] - 0.0).abs() < 1e-6);
/// assert!((angles[2] - angles[0] - fan.window()).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fan {
    base: f32,
    count: usize,
    window: f32,
}

impl Fan {
    /// Creates a fan of `count` members, each adding `arc` radians of width.
    pub fn new(base: f32, count: usize, arc: f32) -> Self {
        Self {
            base,
            count,
            window: Self::window_for(count, arc),
        }
    }

    /// Angular width of a fan with `count` members.
    ///
    /// Zero for fewer than two members, otherwise `count × arc` capped at
    /// [`MAX_FAN_FRACTION`] of a full turn.
    pub fn window_for(count: usize, arc: f32) -> f32 {
        if count < 2 {
            return 0.0;
        }
        (count as f32 * arc).min(MAX_FAN_FRACTION * TAU)
    }

    pub fn window(&self) -> f32 {
        self.window
    }

    /// Member angles from one end of the window to the other, ends inclusive.
    pub fn angles(&self) -> impl Iterator<Item = f32> + '_ {
        let start = self.base - self.window / 2.0;
        let step = if self.count > 1 {
            self.window / (self.count - 1) as f32
        } else {
            0.0
        };
        (0..self.count).map(move |i| start + step * i as f32)
    }

    /// Member positions at `radius` around `center`.
    pub fn positions(&self, center: Point, radius: f32) -> impl Iterator<Item = Point> + '_ {
        self.angles()
            .map(move |angle| center.add_point(Point::from_polar(angle, radius)))
    }
}
