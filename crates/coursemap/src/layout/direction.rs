//! Placement directions.
//!
//! Courses take one of four [`Cardinal`] directions around the root. Each
//! cardinal direction fans its modules out along three [`Compass`]
//! directions: its own and the two diagonals beside it.

use std::f32::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4, PI};

use coursemap_core::geometry::Point;

use super::Side;

/// Direction of a course relative to the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinal {
    North,
    East,
    South,
    West,
}

impl Cardinal {
    /// All cardinal directions, in the order courses claim them.
    pub const ALL: [Cardinal; 4] = [Self::North, Self::East, Self::South, Self::West];

    pub fn compass(self) -> Compass {
        match self {
            Self::North => Compass::North,
            Self::East => Compass::East,
            Self::South => Compass::South,
            Self::West => Compass::West,
        }
    }

    /// Branch directions available to the modules of a course placed here.
    ///
    /// # Examples
    ///
    /// ```
    /// # use coursemap::layout::{Cardinal, Compass};
    /// assert_eq!(
    ///     Cardinal::North.branches(),
    ///     [Compass::NorthWest, Compass::North, Compass::NorthEast]
    /// );
    /// ```
    pub fn branches(self) -> [Compass; 3] {
        match self {
            Self::North => [Compass::NorthWest, Compass::North, Compass::NorthEast],
            Self::East => [Compass::NorthEast, Compass::East, Compass::SouthEast],
            Self::South => [Compass::SouthEast, Compass::South, Compass::SouthWest],
            Self::West => [Compass::SouthWest, Compass::West, Compass::NorthWest],
        }
    }

    /// Sides of the root→course edge: (root exit, course entry).
    pub fn edge_sides(self) -> (Side, Side) {
        let exit = match self {
            Self::North => Side::Top,
            Self::East => Side::Right,
            Self::South => Side::Bottom,
            Self::West => Side::Left,
        };
        (exit, exit.opposite())
    }
}

/// One of the eight compass directions used for module branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compass {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Compass {
    /// Screen angle in radians (north is negative Y).
    pub fn angle(self) -> f32 {
        match self {
            Self::East => 0.0,
            Self::SouthEast => FRAC_PI_4,
            Self::South => FRAC_PI_2,
            Self::SouthWest => 3.0 * FRAC_PI_4,
            Self::West => PI,
            Self::NorthWest => -3.0 * FRAC_PI_4,
            Self::North => -FRAC_PI_2,
            Self::NorthEast => -FRAC_PI_4,
        }
    }

    /// Unit vector of this direction.
    ///
    /// Axis directions are exact, diagonals use exactly `1/√2` per axis, so
    /// placements along them are symmetric.
    pub fn unit(self) -> Point {
        let d = FRAC_1_SQRT_2;
        match self {
            Self::North => Point::new(0.0, -1.0),
            Self::NorthEast => Point::new(d, -d),
            Self::East => Point::new(1.0, 0.0),
            Self::SouthEast => Point::new(d, d),
            Self::South => Point::new(0.0, 1.0),
            Self::SouthWest => Point::new(-d, d),
            Self::West => Point::new(-1.0, 0.0),
            Self::NorthWest => Point::new(-d, -d),
        }
    }

    /// The point `distance` away from `origin` in this direction.
    pub fn offset(self, origin: Point, distance: f32) -> Point {
        origin.add_point(self.unit().scale(distance))
    }
}
