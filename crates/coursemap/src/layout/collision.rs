//! Collision avoidance for node boxes.
//!
//! [`PlacedBoxes`] is the working set of padded boxes committed so far in one
//! layout run. [`SpiralSearch`] proposes alternative centres along an
//! outward spiral when the desired box would overlap one of them.

use coursemap_core::geometry::{Bounds, Insets, Point, Size};

/// Padded boxes already committed during the current layout run.
#[derive(Debug)]
pub(super) struct PlacedBoxes {
    boxes: Vec<Bounds>,
    padding: Insets,
}

impl PlacedBoxes {
    pub fn new(padding: f32) -> Self {
        Self {
            boxes: Vec::new(),
            padding: Insets::uniform(padding),
        }
    }

    fn padded(&self, center: Point, size: Size) -> Bounds {
        center.to_bounds(size).add_padding(self.padding)
    }

    /// Returns true if a box of `size` centred at `center` would overlap a committed box.
    pub fn collides(&self, center: Point, size: Size) -> bool {
        let candidate = self.padded(center, size);
        self.boxes.iter().any(|placed| placed.intersects(&candidate))
    }

    pub fn commit(&mut self, center: Point, size: Size) {
        let padded = self.padded(center, size);
        self.boxes.push(padded);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }
}

/// Outcome of placing one box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Placement {
    /// The desired position was free.
    Clear(Point),
    /// The spiral found a free position after `attempt` tries.
    Nudged { position: Point, attempt: usize },
    /// No free position within budget; the desired position was kept.
    Fallback(Point),
}

impl Placement {
    pub fn position(self) -> Point {
        match self {
            Self::Clear(position) | Self::Fallback(position) => position,
            Self::Nudged { position, .. } => position,
        }
    }
}

/// Outward spiral of candidate positions around a desired centre.
///
/// Attempt `k` (1-based) is `k × growth` away from the desired centre at
/// angle `k × step`, so the search is deterministic and bounded by
/// `attempts × growth`.
#[derive(Debug, Clone, Copy)]
pub(super) struct SpiralSearch {
    attempts: usize,
    step: f32,
    growth: f32,
}

impl SpiralSearch {
    pub fn new(attempts: usize, step: f32, growth: f32) -> Self {
        Self {
            attempts,
            step,
            growth,
        }
    }

    fn candidates(&self, desired: Point) -> impl Iterator<Item = (usize, Point)> + '_ {
        (1..=self.attempts).map(move |attempt| {
            let k = attempt as f32;
            let offset = Point::from_polar(k * self.step, k * self.growth);
            (attempt, desired.add_point(offset))
        })
    }

    /// Finds a free position for a box of `size` near `desired` and commits it.
    ///
    /// The box is committed even when the search fails so later boxes still
    /// steer around it.
    pub fn place(&self, boxes: &mut PlacedBoxes, desired: Point, size: Size) -> Placement {
        let placement = if !boxes.collides(desired, size) {
            Placement::Clear(desired)
        } else {
            self.candidates(desired)
                .find(|&(_, candidate)| !boxes.collides(candidate, size))
                .map(|(attempt, position)| Placement::Nudged { position, attempt })
                .unwrap_or(Placement::Fallback(desired))
        };

        boxes.commit(placement.position(), size);
        placement
    }
}
